//! Zabbix protocol framing and agent client.
//!
//! zbxutils marshals and unmarshals data according to the Zabbix "ZBXD"
//! protocol and queries Zabbix agents over TCP.
//!
//! # Crate Structure
//!
//! - [`transport`]: Timed TCP connections to agents
//! - [`frame`]: ZBXD frame codec with guaranteed-full stream reads
//! - [`agent`]: Agent client (`get`, `ping`, `hostname`, `version`)

/// Re-export transport types.
pub mod transport {
    pub use zbxutils_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use zbxutils_frame::*;
}

/// Re-export agent types.
pub mod agent {
    pub use zbxutils_agent::*;
}

pub use zbxutils_agent::{Agent, AgentConfig, AgentError};
pub use zbxutils_frame::{Frame, FrameError};
