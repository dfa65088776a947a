//! TCP transport for the Zabbix agent protocol.
//!
//! This is the lowest layer of zbxutils. A connection is an [`AgentStream`]:
//! a blocking byte stream that implements `Read + Write` and is closed when
//! dropped. [`TcpTransport::connect`] bounds only connection establishment
//! by the supplied timeout.

pub mod error;
pub mod stream;
pub mod tcp;

pub use error::{Result, TransportError};
pub use stream::AgentStream;
pub use tcp::TcpTransport;
