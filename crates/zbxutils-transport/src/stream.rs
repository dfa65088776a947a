use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

use tracing::debug;

use crate::error::Result;

/// A connected agent stream (Read + Write).
///
/// The socket is shut down and closed when the stream is dropped, so a
/// connection never outlives the value that owns it.
pub struct AgentStream {
    inner: TcpStream,
}

impl Read for AgentStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for AgentStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl From<TcpStream> for AgentStream {
    fn from(inner: TcpStream) -> Self {
        Self { inner }
    }
}

impl AgentStream {
    /// Set read timeout on the underlying socket.
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.inner.set_read_timeout(timeout).map_err(Into::into)
    }

    /// Set write timeout on the underlying socket.
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<()> {
        self.inner.set_write_timeout(timeout).map_err(Into::into)
    }

    /// Address of the connected agent.
    pub fn peer_addr(&self) -> Result<SocketAddr> {
        self.inner.peer_addr().map_err(Into::into)
    }

    /// Borrow the underlying TCP stream.
    pub fn get_ref(&self) -> &TcpStream {
        &self.inner
    }
}

impl Drop for AgentStream {
    fn drop(&mut self) {
        // The peer may already have closed its side; NotConnected is expected then.
        if let Err(err) = self.inner.shutdown(Shutdown::Both) {
            debug!(error = %err, "socket shutdown on close failed");
        } else {
            debug!("agent connection closed");
        }
    }
}

impl std::fmt::Debug for AgentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentStream")
            .field("peer", &self.inner.peer_addr().ok())
            .finish()
    }
}
