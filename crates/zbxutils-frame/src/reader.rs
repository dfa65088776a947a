use std::io::{self, Read};

use bytes::Bytes;
use tracing::{debug, warn};
use zbxutils_transport::AgentStream;

use crate::codec::{Frame, FrameConfig, HEADER_SIZE, LENGTH_SIZE};
use crate::error::{FrameError, FrameField, Result};

/// Read a single frame from `reader` with the default configuration.
pub fn read_frame<R: Read>(reader: R) -> Result<Frame> {
    FrameReader::new(reader).read_frame()
}

/// Reads complete frames from any `Read` stream.
///
/// Short reads are retried internally, so callers only see complete frames.
pub struct FrameReader<T> {
    inner: T,
    config: FrameConfig,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Consumes exactly the header, the length and the declared number of
    /// data bytes; nothing past the frame is read.
    pub fn read_frame(&mut self) -> Result<Frame> {
        let mut frame = Frame::empty();
        let mut buf = Vec::with_capacity(LENGTH_SIZE);

        let res = read_full(&mut self.inner, HEADER_SIZE as u64, &mut buf);
        frame.header[..buf.len()].copy_from_slice(&buf);
        if let Err(source) = res {
            return Err(io_error(source, frame));
        }
        if buf.len() < HEADER_SIZE {
            return Err(short_read(FrameField::Header, buf.len(), HEADER_SIZE, frame));
        }
        if !frame.valid_header() {
            warn!(header = ?frame.header, "invalid frame header");
            return Err(FrameError::InvalidHeader { partial: frame });
        }

        buf.clear();
        let res = read_full(&mut self.inner, LENGTH_SIZE as u64, &mut buf);
        if let Err(source) = res {
            return Err(io_error(source, frame));
        }
        let Ok(length) = <[u8; LENGTH_SIZE]>::try_from(buf.as_slice()) else {
            return Err(short_read(FrameField::Length, buf.len(), LENGTH_SIZE, frame));
        };
        frame.length = u64::from_le_bytes(length);

        if frame.length > self.config.max_data_size {
            warn!(
                declared = frame.length,
                max = self.config.max_data_size,
                "frame data too large"
            );
            return Err(FrameError::DataTooLarge {
                declared: frame.length,
                max: self.config.max_data_size,
                partial: frame,
            });
        }

        // Memory grows with the bytes received, not with the declared length.
        let mut data = Vec::new();
        let res = read_full(&mut self.inner, frame.length, &mut data);
        let received = data.len();
        frame.data = Bytes::from(data);
        if let Err(source) = res {
            return Err(io_error(source, frame));
        }
        if (received as u64) < frame.length {
            warn!(declared = frame.length, received, "frame data truncated");
            return Err(FrameError::InvalidDataLen {
                declared: frame.length,
                received,
                partial: frame,
            });
        }

        debug!(length = frame.length, "frame received");
        Ok(frame)
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame reader configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameReader<AgentStream> {
    /// Create a frame reader for `AgentStream` and apply read timeout from config.
    pub fn with_config_stream(inner: AgentStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_read_timeout(config.read_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}

/// Append up to `len` bytes from `reader` to `buf`, looping over short reads.
///
/// Stops at `len` bytes, at end-of-data, or on a read error. `Interrupted`
/// is retried. Bytes read before an error stay in `buf`, so a short `buf`
/// after `Ok` means the stream ended early.
fn read_full<R: Read + ?Sized>(reader: &mut R, len: u64, buf: &mut Vec<u8>) -> io::Result<()> {
    reader.take(len).read_to_end(buf).map(|_| ())
}

fn short_read(field: FrameField, read: usize, expected: usize, partial: Frame) -> FrameError {
    warn!(%field, read, expected, "stream ended mid-frame");
    FrameError::ShortRead {
        field,
        read,
        expected,
        partial,
    }
}

fn io_error(source: std::io::Error, partial: Frame) -> FrameError {
    FrameError::Io {
        source,
        partial: Some(partial),
    }
}

pub(crate) fn transport_to_frame_error(err: zbxutils_transport::TransportError) -> FrameError {
    match err {
        zbxutils_transport::TransportError::Io(io)
        | zbxutils_transport::TransportError::Resolve { source: io, .. }
        | zbxutils_transport::TransportError::Connect { source: io, .. } => FrameError::from(io),
        other => FrameError::from(std::io::Error::other(other.to_string())),
    }
}
