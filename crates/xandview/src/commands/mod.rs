//! Command dispatch: bridges CLI args -> dashboard engine -> output formatting.

pub mod config_cmd;
pub mod history;
pub mod network;
pub mod nodes;
pub mod util;
pub mod watch;

use xandview_core::DashboardConfig;

use crate::cli::Command;
use crate::error::CliError;
use crate::output::OutputOpts;

/// Dispatch a data-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, config: DashboardConfig, out: &OutputOpts) -> Result<(), CliError> {
    match cmd {
        Command::Nodes(args) => nodes::handle(config, args, out).await,
        Command::Network => network::handle(config, out).await,
        Command::History(args) => history::handle(config, args, out).await,
        Command::Watch(args) => watch::handle(config, args, out).await,
        Command::Config(_) | Command::Completions(_) => {
            Err(CliError::Internal("command is handled before dispatch".into()))
        }
    }
}
