use std::time::Duration;

use clap::{Args, Subcommand};
use zbxutils_agent::{Agent, AgentConfig, DEFAULT_AGENT_HOST, DEFAULT_AGENT_PORT};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod get;
pub mod ping;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Query a single item key.
    Get(GetArgs),
    /// Check that the agent answers agent.ping with 1.
    Ping,
    /// Print the agent's configured hostname.
    Hostname,
    /// Print the agent's version.
    AgentVersion,
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, connection: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Get(args) => get::run(args, connection, format),
        Command::Ping => ping::run(connection, format),
        Command::Hostname => get::hostname(connection, format),
        Command::AgentVersion => get::agent_version(connection, format),
        Command::Version(args) => version::run(args),
    }
}

/// Where and how to reach the agent.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Agent host name or address.
    #[arg(long, short = 's', env = "ZABBIX_HOST", default_value = DEFAULT_AGENT_HOST, global = true)]
    pub host: String,
    /// Agent port.
    #[arg(
        long,
        short = 'p',
        env = "ZABBIX_PORT",
        default_value_t = DEFAULT_AGENT_PORT,
        value_parser = clap::value_parser!(u16).range(1..),
        global = true
    )]
    pub port: u16,
    /// Connect timeout (e.g. 30s, 500ms).
    #[arg(
        long,
        short = 't',
        env = "ZABBIX_TIMEOUT",
        default_value = "30s",
        value_parser = parse_duration,
        global = true
    )]
    pub timeout: Duration,
    /// Deadline for sending the key and reading the answer. Unbounded if unset.
    #[arg(long, value_name = "DURATION", value_parser = parse_duration, global = true)]
    pub read_timeout: Option<Duration>,
    /// Send the key inside a ZBXD frame instead of as plain text.
    #[arg(long, global = true)]
    pub framed: bool,
}

impl ConnectionArgs {
    pub fn agent(&self) -> Agent {
        Agent::with_config(AgentConfig {
            host: self.host.clone(),
            port: self.port,
            timeout: self.timeout,
            read_timeout: self.read_timeout,
            framed_requests: self.framed,
            ..AgentConfig::default()
        })
    }
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Item key, e.g. agent.version or system.uname.
    pub key: String,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

pub fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        "s" => Ok(Duration::from_secs(value)),
        _ => Err(CliError::new(
            USAGE,
            format!("unsupported duration unit: {unit}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_duration_seconds_and_millis() {
        assert_eq!(parse_duration("2s").unwrap(), Duration::from_secs(2));
        assert_eq!(parse_duration("150ms").unwrap(), Duration::from_millis(150));
        assert_eq!(parse_duration("3").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn parse_duration_rejects_invalid_values() {
        assert!(parse_duration("0s").is_err());
        assert!(parse_duration("bad").is_err());
        assert!(parse_duration("").is_err());
    }

    #[test]
    fn connection_args_build_agent() {
        let args = ConnectionArgs {
            host: "zbx01".to_string(),
            port: 10070,
            timeout: Duration::from_secs(3),
            read_timeout: Some(Duration::from_millis(500)),
            framed: true,
        };
        let agent = args.agent();

        assert_eq!(agent.host(), "zbx01");
        assert_eq!(agent.port(), 10070);
        assert_eq!(agent.config().timeout, Duration::from_secs(3));
        assert_eq!(agent.config().read_timeout, Some(Duration::from_millis(500)));
        assert!(agent.config().framed_requests);
    }
}
