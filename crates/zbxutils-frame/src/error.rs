use std::fmt;

use crate::codec::Frame;

/// A fixed-size field that precedes the frame data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameField {
    Header,
    Length,
}

impl fmt::Display for FrameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameField::Header => f.write_str("header"),
            FrameField::Length => f.write_str("length"),
        }
    }
}

/// Errors that can occur during frame encoding/decoding.
///
/// Every decoding failure carries the frame as far as it was assembled:
/// the header bytes and declared length are filled in once read, and the
/// data holds whatever arrived before the stream ended.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The frame header is not "ZBXD\x01".
    #[error("invalid frame header {:02x?} (expected \"ZBXD\\x01\")", .partial.header)]
    InvalidHeader { partial: Frame },

    /// The stream ended before the header or length field was complete.
    #[error("stream ended after {read} of {expected} {field} bytes")]
    ShortRead {
        field: FrameField,
        read: usize,
        expected: usize,
        partial: Frame,
    },

    /// The stream ended before the declared data length was satisfied.
    #[error("invalid data length: declared {declared} bytes, stream ended after {received}")]
    InvalidDataLen {
        declared: u64,
        received: usize,
        partial: Frame,
    },

    /// The declared data length exceeds the configured maximum.
    #[error("data too large ({declared} bytes, max {max})")]
    DataTooLarge {
        declared: u64,
        max: u64,
        partial: Frame,
    },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {source}")]
    Io {
        source: std::io::Error,
        partial: Option<Frame>,
    },

    /// The peer stopped accepting bytes before a frame was fully written.
    #[error("connection closed (incomplete frame written)")]
    ConnectionClosed,
}

impl FrameError {
    /// The partially assembled frame, if the error happened while decoding.
    pub fn partial(&self) -> Option<&Frame> {
        match self {
            FrameError::InvalidHeader { partial }
            | FrameError::ShortRead { partial, .. }
            | FrameError::InvalidDataLen { partial, .. }
            | FrameError::DataTooLarge { partial, .. } => Some(partial),
            FrameError::Io { partial, .. } => partial.as_ref(),
            FrameError::ConnectionClosed => None,
        }
    }

    /// Consume the error and return the partially assembled frame.
    pub fn into_partial(self) -> Option<Frame> {
        match self {
            FrameError::InvalidHeader { partial }
            | FrameError::ShortRead { partial, .. }
            | FrameError::InvalidDataLen { partial, .. }
            | FrameError::DataTooLarge { partial, .. } => Some(partial),
            FrameError::Io { partial, .. } => partial,
            FrameError::ConnectionClosed => None,
        }
    }

    /// Whether the peer sent a malformed or truncated frame, as opposed to
    /// the transport failing underneath.
    pub fn is_protocol(&self) -> bool {
        !matches!(self, FrameError::Io { .. } | FrameError::ConnectionClosed)
    }
}

impl From<std::io::Error> for FrameError {
    fn from(source: std::io::Error) -> Self {
        FrameError::Io {
            source,
            partial: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
