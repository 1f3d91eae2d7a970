//! The `version` command

use super::within_limit;
use crate::{
    config::CommandConfig,
    core::{registry::Command, toolchain::GoToolchain},
};
use anyhow::Context;
use tracing::{instrument, warn};

pub const USAGE: &str = "version [import path]";
pub const SHORT: &str = "display version information";
pub const LONG: &str = "\
Display the version of this tool and of the go toolchain.

With --update, the dependencies of the application are moved to their
latest versions first.

For example:

    appcmd version --update";

/// Package pattern covering every dependency of the application
const ALL_PACKAGES: &str = "./...";

#[derive(Debug, Default)]
pub struct VersionCommand;

impl Command for VersionCommand {
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
        config.version.import_path = args.first().cloned();
        true
    }

    #[instrument(skip(self, config))]
    fn run(&self, config: &CommandConfig) -> anyhow::Result<()> {
        if config.version.update {
            config
                .package_resolver()?
                .update(ALL_PACKAGES)
                .context("Failed to update dependencies")?;
        }

        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

        let toolchain = GoToolchain::from_env(config.verbose > 1);
        if !toolchain.is_available() {
            warn!("Go toolchain '{}' not found", toolchain.go_cmd());
            return Ok(());
        }
        match toolchain.version() {
            Ok(version) => println!("{version}"),
            Err(e) => warn!("Unable to read go version: {}", e),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::package_resolver::PackageResolver;

    #[test]
    fn test_update_config() {
        let mut config = CommandConfig::new();
        assert!(VersionCommand.update_config(&mut config, &["example.com/shop".to_string()]));
        assert_eq!(config.version.import_path.as_deref(), Some("example.com/shop"));
        assert!(!VersionCommand.update_config(&mut config, &["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_run_without_update_succeeds() {
        VersionCommand.run(&CommandConfig::new()).unwrap();
    }

    #[test]
    fn test_update_requires_package_resolver() {
        let mut config = CommandConfig::new();
        config.version.update = true;
        assert!(VersionCommand.run(&config).is_err());

        config.package_resolver = Some(PackageResolver::new("false", ".", false));
        let err = VersionCommand.run(&config).unwrap_err();
        assert!(err.to_string().contains("Failed to update dependencies"));
    }
}
