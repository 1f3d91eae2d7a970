//! The `run` command

use super::within_limit;
use crate::{
    config::{CommandConfig, parse_port, run_mode},
    core::{registry::Command, toolchain::GoToolchain},
};
use anyhow::Context;
use tracing::{info, instrument, warn};

pub const USAGE: &str = "run [import path] [run mode] [port]";
pub const SHORT: &str = "run an application";
pub const LONG: &str = "\
Run the application in the given run mode.

The import path defaults to the current directory and the run mode to
\"dev\". A numeric last argument is taken as the port to listen on.

For example:

    appcmd run example.com/shop prod 9000";

#[derive(Debug, Default)]
pub struct RunCommand;

impl Command for RunCommand {
    fn usage_line(&self) -> &'static str {
        USAGE
    }

    fn short(&self) -> &'static str {
        SHORT
    }

    fn long(&self) -> &'static str {
        LONG
    }

    fn update_config(&self, config: &mut CommandConfig, args: &[String]) -> bool {
        if !within_limit(self.name(), args, 3) {
            return false;
        }

        let (rest, port) = match args.split_last() {
            Some((last, rest)) if !last.is_empty() && last.chars().all(|c| c.is_ascii_digit()) => {
                match parse_port(last) {
                    Ok(port) => (rest, Some(port)),
                    Err(message) => {
                        warn!("{}", message);
                        return false;
                    }
                }
            }
            _ => (args, None),
        };

        if !within_limit(self.name(), rest, 2) {
            return false;
        }
        if let Some(path) = rest.first() {
            config.run.import_path = Some(path.clone());
        }
        if let Some(mode) = rest.get(1) {
            config.run.mode = Some(mode.clone());
        }
        if port.is_some() {
            config.run.port = port;
        }
        true
    }

    #[instrument(skip(self, config))]
    fn run(&self, config: &CommandConfig) -> anyhow::Result<()> {
        let workspace = config.workspace()?;
        let mode = run_mode(config.run.mode.as_deref());

        info!("Running {} in {} mode", workspace.import_path, mode);
        GoToolchain::from_env(config.verbose > 1)
            .run(workspace, &config.build_flags, mode, config.run.port)
            .context("Failed to run application")
    }
}
