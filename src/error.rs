//! Error types for the command shell
//!
//! Separates user-input failures (which print usage) from setup and
//! execution failures (which go through the logger).

use crate::core::registry::CommandKind;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for argument resolution, dispatch and the built-in commands
#[derive(Error, Debug)]
pub enum CliError {
    /// Malformed arguments rejected by the flag parser
    #[error("{0}")]
    Parse(#[from] clap::Error),

    /// No subcommand token matched a registered command
    #[error("Unknown command {args:?}")]
    UnknownCommand { args: Vec<String> },

    /// Leftover positional arguments rejected by the selected command
    #[error("Invalid command line arguments {args:?}")]
    InvalidArguments { args: Vec<String> },

    /// The registry has nothing to run for this index
    #[error("No command registered for index {} ({kind:?})", .kind.index())]
    MissingCommand { kind: CommandKind },

    /// The INI override file could not be read or parsed
    #[error("Failed to load options from {path}: {source}")]
    Ini {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// The INI override file names an option that does not exist
    #[error("Invalid option in [{section}] {key}: {message}")]
    IniOption {
        section: String,
        key: String,
        message: String,
    },

    /// The application path could not be derived from the working directory
    #[error("Workspace error: {message}")]
    Workspace { message: String },

    /// File system operation errors
    #[error("File system error: {operation} failed on {path}")]
    FileSystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Process execution errors
    #[error("Process error: {command} failed")]
    Process {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// The process logger could not be reconfigured
    #[error("Logging error: {message}")]
    Logging { message: String },

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl CliError {
    /// Create a new unknown command error
    pub fn unknown_command<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::UnknownCommand {
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a new invalid arguments error
    pub fn invalid_arguments(args: &[String]) -> Self {
        Self::InvalidArguments {
            args: args.to_vec(),
        }
    }

    /// Create a new INI option error
    pub fn ini_option(
        section: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::IniOption {
            section: section.into(),
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a new workspace error
    pub fn workspace(message: impl Into<String>) -> Self {
        Self::Workspace {
            message: message.into(),
        }
    }

    /// Create a new file system error
    pub fn file_system<P: Into<PathBuf>>(
        operation: impl Into<String>,
        path: P,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a new process error
    pub fn process(
        command: impl Into<String>,
        exit_code: Option<i32>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::Process {
            command: command.into(),
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a new logging error
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// True for user-input errors, which are answered with usage text
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::Parse(_)
                | Self::UnknownCommand { .. }
                | Self::InvalidArguments { .. }
                | Self::Ini { .. }
                | Self::IniOption { .. }
        )
    }

    /// True when the parser produced requested output such as `--help`
    pub fn is_informational(&self) -> bool {
        match self {
            Self::Parse(err) => matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp
                    | clap::error::ErrorKind::DisplayVersion
                    | clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ),
            _ => false,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CliError>;
