//! The `build` command

use super::within_limit;
use crate::{
    config::{CommandConfig, run_mode},
    core::{registry::Command, toolchain::GoToolchain, workspace::Workspace},
    error::CliError,
    utils::fs::FileSystemUtils,
};
use anyhow::Context;
use std::path::PathBuf;
use tracing::{info, instrument};

pub const USAGE: &str = "build [import path] [target path] [run mode]";
pub const SHORT: &str = "build an application binary";
pub const LONG: &str = "\
Build the application into a target directory.

The binary is named after the application and written to the target
path, which defaults to the \"target\" directory of the application.
Flags given with -X are passed to the go toolchain.

For example:

    appcmd build example.com/shop /srv/shop prod";

#[derive(Debug, Default)]
pub struct BuildCommand;

impl BuildCommand {
    /// Directory the binary goes to
    pub fn target_dir(config: &CommandConfig, workspace: &Workspace) -> PathBuf {
        config
            .build
            .target_path
            .clone()
            .unwrap_or_else(|| workspace.app_path.join("target"))
    }
}

impl Command for BuildCommand {
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
        if let Some(path) = args.first() {
            config.build.import_path = Some(path.clone());
        }
        if let Some(target) = args.get(1) {
            config.build.target_path = Some(PathBuf::from(target));
        }
        if let Some(mode) = args.get(2) {
            config.build.mode = Some(mode.clone());
        }
        true
    }

    #[instrument(skip(self, config))]
    fn run(&self, config: &CommandConfig) -> anyhow::Result<()> {
        let workspace = config.workspace()?;
        let mode = run_mode(config.build.mode.as_deref());
        let target = Self::target_dir(config, workspace);

        FileSystemUtils::new()
            .create_dir_all(&target)
            .map_err(|e| CliError::file_system("create", &target, e))?;

        let output = target.join(&workspace.app_name);
        info!("Building {} ({} mode) into {}", workspace.import_path, mode, output.display());
        GoToolchain::from_env(config.verbose > 1)
            .build(workspace, &config.build_flags, &output)
            .context("Failed to build application")?;

        info!("Build completed: {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> Workspace {
        Workspace {
            import_path: "example.com/shop".to_string(),
            app_path: PathBuf::from("/src/shop"),
            app_name: "shop".to_string(),
            src_root: PathBuf::from("/src"),
        }
    }

    #[test]
    fn test_update_config_positional() {
        let mut config = CommandConfig::new();
        let args: Vec<String> = ["example.com/shop", "/srv/shop", "prod"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        assert!(BuildCommand.update_config(&mut config, &args));
        assert_eq!(config.build.import_path.as_deref(), Some("example.com/shop"));
        assert_eq!(config.build.target_path, Some(PathBuf::from("/srv/shop")));
        assert_eq!(config.build.mode.as_deref(), Some("prod"));
    }

    #[test]
    fn test_update_config_rejects_extra_arguments() {
        let mut config = CommandConfig::new();
        let args = vec!["x".to_string(); 4];
        assert!(!BuildCommand.update_config(&mut config, &args));
        assert!(config.build.import_path.is_none());
    }

    #[test]
    fn test_target_dir_default_and_override() {
        let mut config = CommandConfig::new();
        assert_eq!(
            BuildCommand::target_dir(&config, &workspace()),
            PathBuf::from("/src/shop/target")
        );

        config.build.target_path = Some(PathBuf::from("/out"));
        assert_eq!(BuildCommand::target_dir(&config, &workspace()), PathBuf::from("/out"));
    }
}
