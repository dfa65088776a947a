use tracing::info;
use zbxutils_agent::{AgentError, HOSTNAME_KEY, VERSION_KEY};
use zbxutils_frame::Frame;

use crate::cmd::{ConnectionArgs, GetArgs};
use crate::exit::{agent_error, CliResult, SUCCESS};
use crate::output::{print_item, print_raw, ItemOutput, OutputFormat};

pub fn run(args: GetArgs, connection: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    let agent = connection.agent();
    info!(host = %connection.host, port = connection.port, key = %args.key, "get");

    match agent.get(&args.key) {
        Ok(frame) => {
            emit(connection, &args.key, &frame, format);
            Ok(SUCCESS)
        }
        Err(err @ AgentError::NotSupported { .. }) => {
            // Print the sentinel like any other answer before failing.
            if let Some(frame) = err.frame() {
                emit(connection, &args.key, frame, format);
            }
            Err(agent_error("get failed", err))
        }
        Err(err) => Err(agent_error("get failed", err)),
    }
}

pub fn hostname(connection: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    let value = connection
        .agent()
        .hostname()
        .map_err(|err| agent_error("hostname failed", err))?;
    let item = ItemOutput::from_text(&connection.host, connection.port, HOSTNAME_KEY, value);
    print_item(&item, format);
    Ok(SUCCESS)
}

pub fn agent_version(connection: &ConnectionArgs, format: OutputFormat) -> CliResult<i32> {
    let value = connection
        .agent()
        .version()
        .map_err(|err| agent_error("agent-version failed", err))?;
    let item = ItemOutput::from_text(&connection.host, connection.port, VERSION_KEY, value);
    print_item(&item, format);
    Ok(SUCCESS)
}

fn emit(connection: &ConnectionArgs, key: &str, frame: &Frame, format: OutputFormat) {
    match format {
        OutputFormat::Raw => print_raw(frame.data.as_ref()),
        other => {
            let item = ItemOutput::from_frame(&connection.host, connection.port, key, frame);
            print_item(&item, other);
        }
    }
}
