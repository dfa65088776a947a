//! Zabbix "ZBXD" frame codec.
//!
//! Every agent response is framed with:
//! - A 5-byte header: `"ZBXD"` followed by protocol version `0x01`
//! - An 8-byte little-endian data length
//! - Exactly that many data bytes
//!
//! The reader never trusts a single `read` call to deliver a whole field,
//! so frames split across arbitrary TCP segments parse the same as frames
//! held in memory.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_frame, encode_frame, Frame, FrameConfig, DEFAULT_MAX_DATA_SIZE, HEADER, HEADER_SIZE,
    LENGTH_SIZE, NOT_SUPPORTED, PREFIX_SIZE,
};
pub use error::{FrameError, FrameField, Result};
pub use reader::{read_frame, FrameReader};
pub use writer::FrameWriter;
