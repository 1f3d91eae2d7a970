//! Process execution utilities
//!
//! Runs toolchain commands with proper error handling and logging.

use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, instrument};

/// Utility for running external processes
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    debug: bool,
    dir: Option<PathBuf>,
}

/// Result of a process execution
#[derive(Debug)]
pub struct ProcessResult {
    /// Exit status code
    pub exit_code: Option<i32>,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Whether the process was successful
    pub success: bool,
}

impl ProcessRunner {
    /// Create a new process runner
    #[must_use]
    pub const fn new(debug: bool) -> Self {
        Self { debug, dir: None }
    }

    /// Run commands inside `dir` instead of the process working directory
    #[must_use]
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.dir = Some(dir.as_ref().to_path_buf());
        self
    }

    fn command(&self, command: &str, args: &[&str], env_vars: &[(String, String)]) -> Command {
        let mut cmd = Command::new(command);
        cmd.args(args);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        for (key, value) in env_vars {
            cmd.env(key, value);
        }
        cmd
    }

    /// Run a command with arguments, inheriting stdout/stderr
    #[instrument(skip(self))]
    pub fn run_command(&self, command: &str, args: &[&str]) -> Result<()> {
        self.run_command_with_env(command, args, &[])
    }

    /// Run a command with arguments and environment variables
    #[instrument(skip(self, env_vars))]
    pub fn run_command_with_env(
        &self,
        command: &str,
        args: &[&str],
        env_vars: &[(String, String)],
    ) -> Result<()> {
        let cmd_str = format!("{} {}", command, args.join(" "));

        if self.debug {
            debug!("Running command: {}", cmd_str);
            if !env_vars.is_empty() {
                debug!("Environment variables: {:?}", env_vars);
            }
        } else {
            info!("+ {}", cmd_str);
        }

        let status = self
            .command(command, args, env_vars)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| {
                CliError::process(
                    cmd_str.clone(),
                    None,
                    String::new(),
                    format!("Failed to execute command: {e}"),
                )
            })?;

        if !status.success() {
            let exit_code = status.code();
            return Err(CliError::process(
                cmd_str,
                exit_code,
                String::new(),
                format!("Command failed with exit code: {exit_code:?}"),
            ));
        }

        debug!("Command completed successfully");
        Ok(())
    }

    /// Run a command and capture its output
    #[instrument(skip(self))]
    pub fn run_command_with_output(&self, command: &str, args: &[&str]) -> Result<ProcessResult> {
        let cmd_str = format!("{} {}", command, args.join(" "));

        debug!("Running command with output capture: {}", cmd_str);

        let output = self
            .command(command, args, &[])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                CliError::process(
                    cmd_str.clone(),
                    None,
                    String::new(),
                    format!("Failed to execute command: {e}"),
                )
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let success = output.status.success();
        let exit_code = output.status.code();

        debug!(
            "Command finished: success={}, exit_code={:?}, stdout_len={}, stderr_len={}",
            success,
            exit_code,
            stdout.len(),
            stderr.len()
        );

        if !success {
            debug!("Command stderr: {}", stderr);
            return Err(CliError::process(cmd_str, exit_code, stdout, stderr));
        }

        Ok(ProcessResult {
            exit_code,
            stdout,
            stderr,
            success,
        })
    }

    /// Check if a command exists in PATH
    #[instrument(skip(self))]
    pub fn command_exists(&self, command: &str) -> bool {
        debug!("Checking if command exists: {}", command);

        let result = Command::new("which")
            .arg(command)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match result {
            Ok(status) => {
                let exists = status.success();
                debug!("Command '{}' exists: {}", command, exists);
                exists
            }
            Err(e) => {
                debug!("Failed to check if command '{}' exists: {}", command, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_process_runner_creation() {
        let runner = ProcessRunner::new(true);
        assert!(runner.debug);
        assert!(runner.dir.is_none());

        let runner = ProcessRunner::default();
        assert!(!runner.debug);
    }

    #[test]
    fn test_run_simple_command() {
        let runner = ProcessRunner::new(false);
        let result = runner.run_command("echo", &["hello"]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_command_with_output() {
        let runner = ProcessRunner::new(false);
        let result = runner
            .run_command_with_output("echo", &["hello", "world"])
            .unwrap();

        assert!(result.success);
        assert_eq!(result.stdout.trim(), "hello world");
        assert!(result.stderr.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_in_dir() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("marker.txt"), "x").unwrap();

        let result = ProcessRunner::new(false)
            .in_dir(temp_dir.path())
            .run_command_with_output("ls", &[])
            .unwrap();

        assert!(result.stdout.contains("marker.txt"));
    }

    #[test]
    fn test_command_exists() {
        let runner = ProcessRunner::new(false);

        assert!(runner.command_exists("echo"));
        assert!(!runner.command_exists("nonexistent_command_12345"));
    }

    #[test]
    fn test_run_failing_command() {
        let runner = ProcessRunner::new(false);
        let result = runner.run_command("false", &[]);

        if let Err(CliError::Process {
            command, exit_code, ..
        }) = result
        {
            assert_eq!(command, "false ");
            assert_eq!(exit_code, Some(1));
        } else {
            panic!("Expected process error");
        }
    }

    #[test]
    fn test_run_command_with_env() {
        let runner = ProcessRunner::new(false);
        let env_vars = vec![("APP_MODE".to_string(), "prod".to_string())];

        let result =
            runner.run_command_with_env("sh", &["-c", "test \"$APP_MODE\" = prod"], &env_vars);
        assert!(result.is_ok());
    }
}
