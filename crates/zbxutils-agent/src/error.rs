use zbxutils_frame::{Frame, FrameError};
use zbxutils_transport::TransportError;

/// Errors that can occur while querying an agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Connecting to the agent failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Writing the request failed.
    #[error("failed to send {key}: {source}")]
    Send {
        key: String,
        source: std::io::Error,
    },

    /// The response could not be read or was malformed.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The agent answered with `ZBX_NOTSUPPORTED`.
    #[error("{key} is not supported")]
    NotSupported { key: String, frame: Frame },
}

impl AgentError {
    /// Whether the agent could not be reached or the connection failed.
    pub fn is_transport(&self) -> bool {
        match self {
            AgentError::Transport(_) | AgentError::Send { .. } => true,
            AgentError::Frame(err) => !err.is_protocol(),
            AgentError::NotSupported { .. } => false,
        }
    }

    /// Whether the agent sent a malformed or truncated frame.
    pub fn is_protocol(&self) -> bool {
        matches!(self, AgentError::Frame(err) if err.is_protocol())
    }

    /// Whether the agent rejected the key as unsupported.
    pub fn is_not_supported(&self) -> bool {
        matches!(self, AgentError::NotSupported { .. })
    }

    /// Whether the failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            AgentError::Transport(err) => err.is_timeout(),
            AgentError::Send { source, .. }
            | AgentError::Frame(FrameError::Io { source, .. }) => matches!(
                source.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }

    /// The response frame, complete or partial, that came with this error.
    pub fn frame(&self) -> Option<&Frame> {
        match self {
            AgentError::NotSupported { frame, .. } => Some(frame),
            AgentError::Frame(err) => err.partial(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
