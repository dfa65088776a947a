mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::{Command, ConnectionArgs};
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "zbxutils", version, about = "Query Zabbix agents over the ZBXD protocol")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, &cli.connection, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn parses_get_subcommand() {
        let cli = Cli::try_parse_from([
            "zbxutils",
            "get",
            "system.uname",
            "--host",
            "zbx01",
            "--port",
            "10070",
            "--timeout",
            "3s",
        ])
        .expect("get args should parse");

        match cli.command {
            Command::Get(args) => assert_eq!(args.key, "system.uname"),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.connection.host, "zbx01");
        assert_eq!(cli.connection.port, 10070);
        assert_eq!(cli.connection.timeout, Duration::from_secs(3));
        assert!(cli.connection.read_timeout.is_none());
        assert!(!cli.connection.framed);
    }

    #[test]
    fn connection_flags_precede_subcommand() {
        let cli = Cli::try_parse_from([
            "zbxutils",
            "-s",
            "10.0.0.5",
            "--read-timeout",
            "250ms",
            "--framed",
            "ping",
        ])
        .expect("ping args should parse");

        assert!(matches!(cli.command, Command::Ping));
        assert_eq!(cli.connection.host, "10.0.0.5");
        assert_eq!(cli.connection.read_timeout, Some(Duration::from_millis(250)));
        assert!(cli.connection.framed);
    }

    #[test]
    fn rejects_port_zero() {
        let err = Cli::try_parse_from(["zbxutils", "ping", "--port", "0"])
            .expect_err("port zero should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = Cli::try_parse_from(["zbxutils", "ping", "--timeout", "0s"])
            .expect_err("zero timeout should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn get_requires_key() {
        let err = Cli::try_parse_from(["zbxutils", "get"]).expect_err("missing key should fail");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn parses_version_subcommand() {
        let cli = Cli::try_parse_from(["zbxutils", "version", "--extended"])
            .expect("version args should parse");
        assert!(matches!(cli.command, Command::Version(args) if args.extended));
    }
}
