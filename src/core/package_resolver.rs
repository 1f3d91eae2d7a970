//! Package resolver handle
//!
//! Fetches Go packages into the module cache on behalf of commands.

use crate::{error::Result, utils::process::ProcessRunner};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Fetches packages with `go get` from the application directory
#[derive(Debug, Clone)]
pub struct PackageResolver {
    go_cmd: String,
    work_dir: PathBuf,
    debug: bool,
}

impl PackageResolver {
    /// Create a resolver running `go_cmd` inside `work_dir`
    pub fn new(go_cmd: impl Into<String>, work_dir: impl Into<PathBuf>, debug: bool) -> Self {
        Self {
            go_cmd: go_cmd.into(),
            work_dir: work_dir.into(),
            debug,
        }
    }

    /// Go executable used for fetching
    pub fn go_cmd(&self) -> &str {
        &self.go_cmd
    }

    /// Directory the fetch runs in
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Arguments for fetching `package`
    pub fn get_args(package: &str, update: bool) -> Vec<String> {
        let mut args = vec!["get".to_string()];
        if update {
            args.push("-u".to_string());
        }
        args.push(package.to_string());
        args
    }

    /// Make `package` available to the application
    #[instrument(skip(self))]
    pub fn resolve(&self, package: &str) -> Result<()> {
        info!("Resolving package {}", package);
        self.go_get(package, false)
    }

    /// Move `package` to its latest version
    #[instrument(skip(self))]
    pub fn update(&self, package: &str) -> Result<()> {
        info!("Updating package {}", package);
        self.go_get(package, true)
    }

    fn go_get(&self, package: &str, update: bool) -> Result<()> {
        let args = Self::get_args(package, update);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        ProcessRunner::new(self.debug)
            .in_dir(&self.work_dir)
            .run_command(&self.go_cmd, &args)
    }
}
