//! Subcommand dispatch.

use anyhow::Result;

use shellguard_engine::Config;

use super::args::{Cli, Commands};

/// Dispatch a CLI command to its handler.
pub async fn dispatch_command(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Check(check_cli) => check_cli.run(config),
        Commands::Run(run_cli) => run_cli.run(config).await,
        Commands::History(history_cli) => history_cli.run(config).await,
    }
}
