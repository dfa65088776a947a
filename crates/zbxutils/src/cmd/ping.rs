use zbxutils_agent::AgentError;

use crate::cmd::ConnectionArgs;
use crate::exit::{agent_error, CliResult, PING_FAILED, SUCCESS};
use crate::output::{print_ping, OutputFormat, PingOutput};

pub fn run(connection: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    let pingable =
        check(connection.agent().ping()).map_err(|err| agent_error("ping failed", err))?;

    let out = PingOutput {
        host: &connection.host,
        port: connection.port,
        pingable,
    };
    print_ping(&out, format);

    Ok(if pingable { SUCCESS } else { PING_FAILED })
}

/// An unsupported `agent.ping` means the agent answered but is not pingable.
fn check(result: Result<bool, AgentError>) -> Result<bool, AgentError> {
    match result {
        Err(AgentError::NotSupported { .. }) => Ok(false),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use zbxutils_frame::{Frame, NOT_SUPPORTED};

    use super::*;

    #[test]
    fn unsupported_ping_is_not_pingable() {
        let err = AgentError::NotSupported {
            key: "agent.ping".to_string(),
            frame: Frame::new(NOT_SUPPORTED),
        };
        assert!(!check(Err(err)).unwrap());
    }

    #[test]
    fn other_results_pass_through() {
        assert!(check(Ok(true)).unwrap());
        assert!(!check(Ok(false)).unwrap());

        let err = AgentError::Send {
            key: "agent.ping".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::BrokenPipe),
        };
        assert!(check(Err(err)).is_err());
    }
}
