//! Go toolchain invocations
//!
//! Commands describe what they want in terms of a [`Workspace`]; this module
//! turns that into `go` command lines.

use crate::{
    core::workspace::Workspace,
    error::Result,
    utils::{env::EnvUtils, process::ProcessRunner},
};
use std::path::Path;
use tracing::{debug, instrument};

/// Wrapper around the `go` executable
#[derive(Debug, Clone)]
pub struct GoToolchain {
    go_cmd: String,
    debug: bool,
}

impl GoToolchain {
    /// Toolchain using `go_cmd`
    pub fn new(go_cmd: impl Into<String>, debug: bool) -> Self {
        Self {
            go_cmd: go_cmd.into(),
            debug,
        }
    }

    /// Toolchain named by the environment
    pub fn from_env(debug: bool) -> Self {
        Self::new(EnvUtils::go_command(), debug)
    }

    /// Go executable in use
    pub fn go_cmd(&self) -> &str {
        &self.go_cmd
    }

    /// True when the go executable can be found
    pub fn is_available(&self) -> bool {
        Path::new(&self.go_cmd).is_file()
            || ProcessRunner::new(self.debug).command_exists(&self.go_cmd)
    }

    /// `go build` arguments producing `output`
    pub fn build_args(build_flags: &[String], output: &Path) -> Vec<String> {
        let mut args = vec!["build".to_string()];
        args.extend(build_flags.iter().cloned());
        args.push("-o".to_string());
        args.push(output.to_string_lossy().into_owned());
        args.push(".".to_string());
        args
    }

    /// `go run` arguments starting the application
    pub fn run_args(
        build_flags: &[String],
        workspace: &Workspace,
        mode: &str,
        port: Option<u16>,
    ) -> Vec<String> {
        let mut args = vec!["run".to_string()];
        args.extend(build_flags.iter().cloned());
        args.push(".".to_string());
        args.push("-importPath".to_string());
        args.push(workspace.import_path.clone());
        args.push("-runMode".to_string());
        args.push(mode.to_string());
        if let Some(port) = port {
            args.push("-port".to_string());
            args.push(port.to_string());
        }
        args
    }

    /// `go test` arguments, optionally filtered to one suite or function
    pub fn test_args(build_flags: &[String], function: Option<&str>) -> Vec<String> {
        let mut args = vec!["test".to_string()];
        args.extend(build_flags.iter().cloned());
        args.push("./...".to_string());
        if let Some(function) = function.filter(|f| !f.is_empty()) {
            args.push("-run".to_string());
            args.push(function.to_string());
        }
        args
    }

    /// Build the application into `output`
    #[instrument(skip(self, workspace, build_flags))]
    pub fn build(
        &self,
        workspace: &Workspace,
        build_flags: &[String],
        output: &Path,
    ) -> Result<()> {
        self.go(workspace, &Self::build_args(build_flags, output), &[])
    }

    /// Run the application in the foreground
    #[instrument(skip(self, workspace, build_flags))]
    pub fn run(
        &self,
        workspace: &Workspace,
        build_flags: &[String],
        mode: &str,
        port: Option<u16>,
    ) -> Result<()> {
        self.go(workspace, &Self::run_args(build_flags, workspace, mode, port), &[])
    }

    /// Run the application's tests with `RUN_MODE` set
    #[instrument(skip(self, workspace, build_flags))]
    pub fn test(
        &self,
        workspace: &Workspace,
        build_flags: &[String],
        mode: &str,
        function: Option<&str>,
    ) -> Result<()> {
        let env_vars = [("RUN_MODE".to_string(), mode.to_string())];
        self.go(workspace, &Self::test_args(build_flags, function), &env_vars)
    }

    /// Output of `go version`
    #[instrument(skip(self))]
    pub fn version(&self) -> Result<String> {
        let result =
            ProcessRunner::new(self.debug).run_command_with_output(&self.go_cmd, &["version"])?;
        Ok(result.stdout.trim().to_string())
    }

    fn go(
        &self,
        workspace: &Workspace,
        args: &[String],
        env_vars: &[(String, String)],
    ) -> Result<()> {
        debug!("Invoking {} in {}", self.go_cmd, workspace.app_path.display());
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        ProcessRunner::new(self.debug)
            .in_dir(&workspace.app_path)
            .run_command_with_env(&self.go_cmd, &args, env_vars)
    }
}
