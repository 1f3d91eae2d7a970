//! The `new` command

use super::within_limit;
use crate::{
    config::CommandConfig, core::registry::Command, error::CliError, utils::fs::FileSystemUtils,
};
use anyhow::{Context, bail};
use tracing::{info, instrument};

pub const USAGE: &str = "new [path] [skeleton]";
pub const SHORT: &str = "create a new application";
pub const LONG: &str = "\
Create a new application directory with a go.mod declaring its import path.

The path is the import path of the application, for example
github.com/acme/shop. It is created relative to the current directory.
An existing, non-empty directory is never overwritten.

A skeleton, when given, is fetched as a module dependency of the new
application.";

/// Go language version written to new modules
const GO_VERSION: &str = "1.21";

#[derive(Debug, Default)]
pub struct NewCommand;

impl Command for NewCommand {
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
        if !within_limit(self.name(), args, 2) {
            return false;
        }
        if let Some(path) = args.first() {
            config.new.import_path = Some(path.clone());
        }
        if let Some(skeleton) = args.get(1) {
            config.new.skeleton = Some(skeleton.clone());
        }
        true
    }

    #[instrument(skip(self, config))]
    fn run(&self, config: &CommandConfig) -> anyhow::Result<()> {
        let workspace = config.workspace()?;
        let fs_utils = FileSystemUtils::new();
        let app_path = &workspace.app_path;

        if fs_utils.is_dir(app_path) {
            let empty = fs_utils
                .is_empty_dir(app_path)
                .map_err(|e| CliError::file_system("read", app_path, e))?;
            if !empty {
                bail!("{} already exists and is not empty", app_path.display());
            }
        }

        info!("Creating application {} in {}", workspace.import_path, app_path.display());
        fs_utils
            .create_dir_all(app_path)
            .map_err(|e| CliError::file_system("create", app_path, e))?;

        let go_mod = app_path.join("go.mod");
        fs_utils
            .write_file(&go_mod, module_file(&workspace.import_path))
            .map_err(|e| CliError::file_system("write", &go_mod, e))?;

        if let Some(skeleton) = config.new.skeleton.as_deref().filter(|s| !s.is_empty()) {
            config
                .package_resolver()?
                .resolve(skeleton)
                .with_context(|| format!("Failed to fetch skeleton {skeleton}"))?;
        }

        info!("Your application is ready: {}", app_path.display());
        Ok(())
    }
}

fn module_file(import_path: &str) -> String {
    format!("module {import_path}\n\ngo {GO_VERSION}\n")
}
