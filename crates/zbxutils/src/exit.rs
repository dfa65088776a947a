use std::fmt;
use std::io;

use zbxutils_agent::AgentError;
use zbxutils_frame::FrameError;
use zbxutils_transport::TransportError;

// Process exit codes. Timeout follows the coreutils `timeout(1)` convention.
pub const SUCCESS: i32 = 0;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PING_FAILED: i32 = 30;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const NOT_SUPPORTED: i32 = 61;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    let code = match &err {
        _ if err.is_timeout() => TIMEOUT,
        TransportError::InvalidPort(_) => USAGE,
        _ => TRANSPORT_ERROR,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io { source, .. } => io_error(context, source),
        closed @ FrameError::ConnectionClosed => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {closed}"))
        }
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn agent_error(context: &str, err: AgentError) -> CliError {
    match err {
        AgentError::Transport(err) => transport_error(context, err),
        AgentError::Frame(err) => frame_error(context, err),
        AgentError::Send { source, key } => io_error(&format!("{context}: sending {key}"), source),
        unsupported @ AgentError::NotSupported { .. } => {
            CliError::new(NOT_SUPPORTED, format!("{context}: {unsupported}"))
        }
    }
}
