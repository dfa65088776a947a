/// Errors that can occur while establishing or using an agent connection.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The host name could not be resolved to any socket address.
    #[error("failed to resolve {addr}: {source}")]
    Resolve {
        addr: String,
        source: std::io::Error,
    },

    /// Resolution succeeded but produced no addresses.
    #[error("no addresses found for {addr}")]
    NoAddresses { addr: String },

    /// Failed to connect to the specified address.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    /// Port 0 cannot be connected to.
    #[error("invalid port {0} (expected 1-65535)")]
    InvalidPort(u16),

    /// An I/O error occurred on the connected stream.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Whether the failure was the connect timeout expiring.
    pub fn is_timeout(&self) -> bool {
        match self {
            TransportError::Connect { source, .. } | TransportError::Io(source) => matches!(
                source.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;
