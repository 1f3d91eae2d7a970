//! Invocation configuration
//!
//! A single [`CommandConfig`] is created per process, filled in by argument
//! resolution, extended with workspace details by the dispatcher and then
//! handed to the selected command.

use crate::{
    core::{package_resolver::PackageResolver, registry::CommandKind, workspace::Workspace},
    error::CliError,
};
use clap::Args;
use ini::Ini;
use std::path::PathBuf;
use tracing::debug;

/// Run mode used when none is given
pub const DEFAULT_RUN_MODE: &str = "dev";

/// INI section holding global options, besides the unnamed general section
pub const GLOBAL_SECTION: &str = "Application Options";

// Options of the `new` command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct NewOptions {
    /// Import path of the application to create
    #[arg(short = 'a', long = "application-path", value_name = "PATH")]
    pub import_path: Option<String>,

    /// Skeleton the application is based on
    #[arg(short = 's', long = "skeleton", value_name = "PATH")]
    pub skeleton: Option<String>,
}

// Options of the `run` command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Import path of the application to run
    #[arg(short = 'a', long = "application-path", value_name = "PATH")]
    pub import_path: Option<String>,

    /// Run mode passed to the application
    #[arg(short = 'm', long = "run-mode", value_name = "MODE")]
    pub mode: Option<String>,

    /// Port the application listens on
    #[arg(short = 'p', long = "port", value_name = "PORT")]
    pub port: Option<u16>,
}

// Options of the `build` command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Import path of the application to build
    #[arg(short = 'a', long = "application-path", value_name = "PATH")]
    pub import_path: Option<String>,

    /// Directory the binary is written to
    #[arg(short = 't', long = "target-path", value_name = "DIR")]
    pub target_path: Option<PathBuf>,

    /// Run mode the build is prepared for
    #[arg(short = 'm', long = "run-mode", value_name = "MODE")]
    pub mode: Option<String>,
}

// Options of the `package` command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageOptions {
    /// Import path of the application to package
    #[arg(short = 'a', long = "application-path", value_name = "PATH")]
    pub import_path: Option<String>,

    /// Directory the package is staged in
    #[arg(short = 't', long = "target-path", value_name = "DIR")]
    pub target_path: Option<PathBuf>,

    /// Run mode the package is prepared for
    #[arg(short = 'm', long = "run-mode", value_name = "MODE")]
    pub mode: Option<String>,
}

// Options of the `clean` command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanOptions {
    /// Import path of the application to clean
    #[arg(short = 'a', long = "application-path", value_name = "PATH")]
    pub import_path: Option<String>,
}

// Options of the `test` command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct TestOptions {
    /// Import path of the application to test
    #[arg(short = 'a', long = "application-path", value_name = "PATH")]
    pub import_path: Option<String>,

    /// Run mode the tests run in
    #[arg(short = 'm', long = "run-mode", value_name = "MODE")]
    pub mode: Option<String>,

    /// Only run this suite or suite.function
    #[arg(short = 'f', long = "suite-function", value_name = "NAME")]
    pub function: Option<String>,
}

// Options of the `version` command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionOptions {
    /// Import path of the application to inspect
    #[arg(short = 'a', long = "application-path", value_name = "PATH")]
    pub import_path: Option<String>,

    /// Update the application's dependencies to their latest versions
    #[arg(short = 'u', long = "update")]
    pub update: bool,
}

/// Shared state for one invocation
#[derive(Debug, Default)]
pub struct CommandConfig {
    /// Selected command, `Unset` until resolution picks one
    pub index: CommandKind,
    /// How many times the verbosity flag was given
    pub verbose: u8,
    /// GOPATH override
    pub gopath: Option<PathBuf>,
    /// Extra flags for toolchain builds
    pub build_flags: Vec<String>,

    pub new: NewOptions,
    pub run: RunOptions,
    pub build: BuildOptions,
    pub package: PackageOptions,
    pub clean: CleanOptions,
    pub test: TestOptions,
    pub version: VersionOptions,

    /// Resolved application location, set by the dispatcher
    pub workspace: Option<Workspace>,
    /// GOPATH entries in effect, set by the dispatcher
    pub gopaths: Vec<PathBuf>,
    /// Package resolver handle, set by the dispatcher
    pub package_resolver: Option<PackageResolver>,
}

impl CommandConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Import path given to the selected command, if any
    pub fn import_path(&self) -> Option<&str> {
        let path = match self.index {
            CommandKind::Unset => None,
            CommandKind::New => self.new.import_path.as_deref(),
            CommandKind::Run => self.run.import_path.as_deref(),
            CommandKind::Build => self.build.import_path.as_deref(),
            CommandKind::Package => self.package.import_path.as_deref(),
            CommandKind::Clean => self.clean.import_path.as_deref(),
            CommandKind::Test => self.test.import_path.as_deref(),
            CommandKind::Version => self.version.import_path.as_deref(),
        };
        path.filter(|p| !p.is_empty())
    }

    /// Resolved workspace, failing if the dispatcher has not set it
    pub fn workspace(&self) -> Result<&Workspace, CliError> {
        self.workspace
            .as_ref()
            .ok_or_else(|| CliError::workspace("application path has not been resolved"))
    }

    /// Package resolver, failing if the dispatcher has not set it
    pub fn package_resolver(&self) -> Result<&PackageResolver, CliError> {
        self.package_resolver
            .as_ref()
            .ok_or_else(|| CliError::validation("package resolver has not been initialized"))
    }

    /// Apply options loaded from an INI file.
    ///
    /// Global options live in the general section or in
    /// `[Application Options]`; command options live in a section named
    /// after the command. The selected command is left untouched.
    pub fn apply_ini(&mut self, ini: &Ini) -> Result<(), CliError> {
        for (section, properties) in ini.iter() {
            let section = section.unwrap_or("");
            for (key, value) in properties.iter() {
                debug!("INI option [{}] {} = {}", section, key, value);
                let global = section.is_empty() || section.eq_ignore_ascii_case(GLOBAL_SECTION);
                let applied = if global {
                    self.apply_global_option(key, value)
                } else {
                    match CommandKind::from_name(&section.to_ascii_lowercase()) {
                        Some(kind) => self.apply_command_option(kind, key, value),
                        None => Err("unknown section".to_string()),
                    }
                };
                applied.map_err(|message| CliError::ini_option(section, key, message))?;
            }
        }
        Ok(())
    }

    fn apply_global_option(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "debug" | "verbose" => {
                if let Ok(count) = value.trim().parse::<u64>() {
                    let count = u8::try_from(count).unwrap_or(u8::MAX);
                    self.verbose = self.verbose.saturating_add(count);
                } else if parse_flag(value)? {
                    self.verbose = self.verbose.saturating_add(1);
                }
            }
            "gopath" => self.gopath = Some(PathBuf::from(value)),
            "build-flags" => self.build_flags.push(value.to_string()),
            _ => return Err("unknown option".to_string()),
        }
        Ok(())
    }

    fn apply_command_option(
        &mut self,
        kind: CommandKind,
        key: &str,
        value: &str,
    ) -> Result<(), String> {
        let text = || Some(value.to_string());
        match (kind, key) {
            (CommandKind::New, "application-path") => self.new.import_path = text(),
            (CommandKind::New, "skeleton") => self.new.skeleton = text(),

            (CommandKind::Run, "application-path") => self.run.import_path = text(),
            (CommandKind::Run, "run-mode") => self.run.mode = text(),
            (CommandKind::Run, "port") => self.run.port = Some(parse_port(value)?),

            (CommandKind::Build, "application-path") => self.build.import_path = text(),
            (CommandKind::Build, "target-path") => {
                self.build.target_path = Some(PathBuf::from(value))
            }
            (CommandKind::Build, "run-mode") => self.build.mode = text(),

            (CommandKind::Package, "application-path") => self.package.import_path = text(),
            (CommandKind::Package, "target-path") => {
                self.package.target_path = Some(PathBuf::from(value))
            }
            (CommandKind::Package, "run-mode") => self.package.mode = text(),

            (CommandKind::Clean, "application-path") => self.clean.import_path = text(),

            (CommandKind::Test, "application-path") => self.test.import_path = text(),
            (CommandKind::Test, "run-mode") => self.test.mode = text(),
            (CommandKind::Test, "suite-function") => self.test.function = text(),

            (CommandKind::Version, "application-path") => self.version.import_path = text(),
            (CommandKind::Version, "update") => self.version.update = parse_flag(value)?,

            _ => return Err("unknown option".to_string()),
        }
        Ok(())
    }
}

/// Run mode or the default one
pub fn run_mode(mode: Option<&str>) -> &str {
    mode.filter(|m| !m.is_empty()).unwrap_or(DEFAULT_RUN_MODE)
}

/// Parse a boolean option value
pub fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(format!("'{other}' is not a boolean")),
    }
}

/// Parse a port number
pub fn parse_port(value: &str) -> Result<u16, String> {
    value
        .trim()
        .parse::<u16>()
        .map_err(|_| format!("'{value}' is not a valid port"))
}
