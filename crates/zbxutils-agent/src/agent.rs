use std::time::Duration;

use tracing::{debug, warn};
use zbxutils_frame::{
    Frame, FrameConfig, FrameError, FrameReader, FrameWriter, DEFAULT_MAX_DATA_SIZE,
};
use zbxutils_transport::{AgentStream, TcpTransport};

use crate::error::{AgentError, Result};

/// Default port for contacting a Zabbix agent.
pub const DEFAULT_AGENT_PORT: u16 = 10050;
/// Default host for contacting a Zabbix agent.
pub const DEFAULT_AGENT_HOST: &str = "localhost";
/// Default connect timeout.
pub const DEFAULT_AGENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Key answered with "1" by any reachable agent.
pub const PING_KEY: &str = "agent.ping";
/// Key returning the agent's configured hostname.
pub const HOSTNAME_KEY: &str = "agent.hostname";
/// Key returning the agent's version string.
pub const VERSION_KEY: &str = "agent.version";

/// Connection parameters for an [`Agent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Host name or address of the agent.
    pub host: String,
    /// Agent port (1-65535).
    pub port: u16,
    /// Bound on connection establishment. Default: 30s.
    pub timeout: Duration,
    /// Deadline for each write and read once connected. Default: none, so a
    /// stalled agent blocks the call after the connection is up.
    pub read_timeout: Option<Duration>,
    /// Send the key inside a ZBXD frame instead of as plain text.
    pub framed_requests: bool,
    /// Maximum accepted response size. Default: 1 GiB.
    pub max_data_size: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_AGENT_HOST.to_string(),
            port: DEFAULT_AGENT_PORT,
            timeout: DEFAULT_AGENT_TIMEOUT,
            read_timeout: None,
            framed_requests: false,
            max_data_size: DEFAULT_MAX_DATA_SIZE,
        }
    }
}

/// A remote Zabbix agent.
#[derive(Debug, Clone, Default)]
pub struct Agent {
    config: AgentConfig,
}

impl Agent {
    /// An agent on localhost:10050.
    pub fn new() -> Self {
        Self::default()
    }

    /// An agent on `host` at the default port.
    pub fn with_host(host: impl Into<String>) -> Self {
        Self::with_config(AgentConfig {
            host: host.into(),
            ..AgentConfig::default()
        })
    }

    /// An agent on `host:port`.
    pub fn with_host_port(host: impl Into<String>, port: u16) -> Self {
        Self::with_config(AgentConfig {
            host: host.into(),
            port,
            ..AgentConfig::default()
        })
    }

    /// An agent with explicit configuration.
    pub fn with_config(config: AgentConfig) -> Self {
        Self { config }
    }

    pub fn host(&self) -> &str {
        &self.config.host
    }

    pub fn port(&self) -> u16 {
        self.config.port
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Query `key` using the configured connect timeout.
    pub fn get(&self, key: &str) -> Result<Frame> {
        self.get_with_timeout(key, self.config.timeout)
    }

    /// Query `key`, bounding connection establishment by `timeout`.
    ///
    /// A `ZBX_NOTSUPPORTED` answer is returned as
    /// [`AgentError::NotSupported`], which carries the response frame.
    pub fn get_with_timeout(&self, key: &str, timeout: Duration) -> Result<Frame> {
        debug!(host = %self.config.host, port = self.config.port, key, "querying agent");
        let stream = TcpTransport::connect(&self.config.host, self.config.port, timeout)?;

        // The stream is owned by the exchange and closed when it returns,
        // whether or not a frame was read.
        let frame = self.exchange(stream, key)?;

        if frame.is_not_supported() {
            warn!(key, "item key not supported by agent");
            return Err(AgentError::NotSupported {
                key: key.to_string(),
                frame,
            });
        }

        debug!(key, length = frame.length, "agent responded");
        Ok(frame)
    }

    /// Call `agent.ping`. True only if the agent answered exactly "1".
    pub fn ping(&self) -> Result<bool> {
        let frame = self.get(PING_KEY)?;
        Ok(frame.data.as_ref() == b"1")
    }

    /// Call `agent.hostname`.
    pub fn hostname(&self) -> Result<String> {
        Ok(self.get(HOSTNAME_KEY)?.text().into_owned())
    }

    /// Call `agent.version`.
    pub fn version(&self) -> Result<String> {
        Ok(self.get(VERSION_KEY)?.text().into_owned())
    }

    fn exchange(&self, stream: AgentStream, key: &str) -> Result<Frame> {
        let frame_config = FrameConfig {
            max_data_size: self.config.max_data_size,
            read_timeout: self.config.read_timeout,
            write_timeout: self.config.read_timeout,
        };

        let mut writer = FrameWriter::with_config_stream(stream, frame_config.clone())?;
        let sent = if self.config.framed_requests {
            writer.send(key.as_bytes())
        } else {
            writer.write_unframed(key.as_bytes())
        };
        sent.map_err(|err| send_error(key, err))?;

        let mut reader = FrameReader::with_config_stream(writer.into_inner(), frame_config)?;
        Ok(reader.read_frame()?)
    }
}

fn send_error(key: &str, err: FrameError) -> AgentError {
    let source = match err {
        FrameError::Io { source, .. } => source,
        FrameError::ConnectionClosed => std::io::Error::from(std::io::ErrorKind::WriteZero),
        other => return AgentError::Frame(other),
    };
    AgentError::Send {
        key: key.to_string(),
        source,
    }
}
