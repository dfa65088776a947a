//! Synchronous Zabbix agent client.
//!
//! An [`Agent`] names a remote endpoint. Every call opens its own
//! connection, writes the item key, reads one framed response and closes
//! the connection again, so one `Agent` can be shared freely between
//! threads.

pub mod agent;
pub mod error;

pub use agent::{
    Agent, AgentConfig, DEFAULT_AGENT_HOST, DEFAULT_AGENT_PORT, DEFAULT_AGENT_TIMEOUT,
    HOSTNAME_KEY, PING_KEY, VERSION_KEY,
};
pub use error::{AgentError, Result};
