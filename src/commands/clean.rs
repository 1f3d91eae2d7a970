//! The `clean` command

use super::within_limit;
use crate::{
    config::CommandConfig, core::registry::Command, error::CliError, utils::fs::FileSystemUtils,
};
use tracing::{info, instrument};

pub const USAGE: &str = "clean [import path]";
pub const SHORT: &str = "clean an application's generated files";
pub const LONG: &str = "\
Remove the generated files of an application: app/tmp and app/routes.

For example:

    appcmd clean example.com/shop";

/// Generated directories, relative to the application
const GENERATED_DIRS: [&str; 2] = ["app/tmp", "app/routes"];

#[derive(Debug, Default)]
pub struct CleanCommand;

impl Command for CleanCommand {
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
        if !within_limit(self.name(), args, 1) {
            return false;
        }
        config.clean.import_path = args.first().cloned();
        true
    }

    #[instrument(skip(self, config))]
    fn run(&self, config: &CommandConfig) -> anyhow::Result<()> {
        let workspace = config.workspace()?;
        let fs_utils = FileSystemUtils::new();

        let mut removed = 0;
        for dir in GENERATED_DIRS {
            let path = workspace.app_path.join(dir);
            if fs_utils
                .remove_dir_all_if_exists(&path)
                .map_err(|e| CliError::file_system("remove", &path, e))?
            {
                info!("Removed {}", path.display());
                removed += 1;
            }
        }

        let noun = if removed == 1 { "directory" } else { "directories" };
        info!("Cleaned {} ({} {} removed)", workspace.import_path, removed, noun);
        Ok(())
    }
}
