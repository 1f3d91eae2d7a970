//! The `package` command

use super::within_limit;
use crate::{
    config::{CommandConfig, run_mode},
    core::{registry::Command, toolchain::GoToolchain, workspace::Workspace},
    error::CliError,
    utils::fs::FileSystemUtils,
};
use anyhow::{Context, bail};
use std::path::PathBuf;
use tracing::{info, instrument};

pub const USAGE: &str = "package [import path] [run mode]";
pub const SHORT: &str = "package an application for deployment";
pub const LONG: &str = "\
Build the application into a staging directory ready for deployment.

The staging directory is named <app>-<run mode> and placed in the target
path, which defaults to the directory containing the application. An
existing staging directory is replaced.

For example:

    appcmd package example.com/shop prod";

#[derive(Debug, Default)]
pub struct PackageCommand;

impl PackageCommand {
    /// Directory the package is staged in
    pub fn staging_dir(config: &CommandConfig, workspace: &Workspace, mode: &str) -> PathBuf {
        let target = config
            .package
            .target_path
            .clone()
            .unwrap_or_else(|| workspace.src_root.clone());
        target.join(format!("{}-{}", workspace.app_name, mode))
    }
}

impl Command for PackageCommand {
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
            config.package.import_path = Some(path.clone());
        }
        if let Some(mode) = args.get(1) {
            config.package.mode = Some(mode.clone());
        }
        true
    }

    #[instrument(skip(self, config))]
    fn run(&self, config: &CommandConfig) -> anyhow::Result<()> {
        let workspace = config.workspace()?;
        let mode = run_mode(config.package.mode.as_deref());
        let staging = Self::staging_dir(config, workspace, mode);

        if staging == workspace.app_path {
            bail!("staging directory {} is the application itself", staging.display());
        }

        let fs_utils = FileSystemUtils::new();
        fs_utils
            .remove_dir_all_if_exists(&staging)
            .map_err(|e| CliError::file_system("remove", &staging, e))?;
        fs_utils
            .create_dir_all(&staging)
            .map_err(|e| CliError::file_system("create", &staging, e))?;

        let output = staging.join(&workspace.app_name);
        info!("Packaging {} ({} mode) into {}", workspace.import_path, mode, staging.display());
        GoToolchain::from_env(config.verbose > 1)
            .build(workspace, &config.build_flags, &output)
            .context("Failed to build application for packaging")?;

        info!("Package ready: {}", staging.display());
        Ok(())
    }
}
