use std::io::{ErrorKind, Write};

use bytes::BytesMut;
use zbxutils_transport::AgentStream;

use crate::codec::{encode_frame, Frame, FrameConfig};
use crate::error::{FrameError, Result};
use crate::reader::transport_to_frame_error;

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Writes complete frames to any `Write` stream.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
    config: FrameConfig,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a new frame writer with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            config,
        }
    }

    /// Write a frame exactly as its fields stand (blocking).
    ///
    /// Header and length are not recomputed, so a deliberately invalid
    /// frame reaches the wire unchanged.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.check_size(frame.data.len())?;
        self.buf.clear();
        frame.encode(&mut self.buf);
        self.write_buffered()
    }

    /// Frame `data` and send it.
    pub fn send(&mut self, data: &[u8]) -> Result<()> {
        self.check_size(data.len())?;
        self.buf.clear();
        encode_frame(data, &mut self.buf);
        self.write_buffered()
    }

    /// Write `bytes` as they are, without a header or length.
    ///
    /// Agents accept a bare item key as a request.
    pub fn write_unframed(&mut self, bytes: &[u8]) -> Result<()> {
        self.buf.clear();
        self.buf.extend_from_slice(bytes);
        self.write_buffered()
    }

    fn check_size(&self, len: usize) -> Result<()> {
        let size = len as u64;
        if size > self.config.max_data_size {
            return Err(FrameError::DataTooLarge {
                declared: size,
                max: self.config.max_data_size,
                partial: Frame::empty(),
            });
        }
        Ok(())
    }

    // The stream is blocking, so `WouldBlock` only means an expired write
    // timeout and is returned as an I/O error.
    fn write_buffered(&mut self) -> Result<()> {
        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::from(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::from(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Current frame writer configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl FrameWriter<AgentStream> {
    /// Create a frame writer for `AgentStream` and apply write timeout from config.
    pub fn with_config_stream(inner: AgentStream, config: FrameConfig) -> Result<Self> {
        inner
            .set_write_timeout(config.write_timeout)
            .map_err(transport_to_frame_error)?;
        Ok(Self::with_config(inner, config))
    }
}
