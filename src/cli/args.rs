//! Command-line argument definitions

use crate::{
    commands::{build, clean, new, package, run, test, version},
    config::{
        BuildOptions, CleanOptions, NewOptions, PackageOptions, RunOptions, TestOptions,
        VersionOptions,
    },
};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Binary name used when rendering help
pub const BIN_NAME: &str = "appcmd";

/// Value of `--ini` that disables the INI override
pub const NO_INI: &str = "none";

/// Create, run, build and package web applications
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, author, version, about, long_about = None)]
#[command(disable_help_subcommand = true)]
pub struct Args {
    #[command(flatten)]
    pub repeated: RepeatedArgs,

    /// Load options from an INI file instead of the command line
    #[arg(long, global = true, value_name = "FILE", default_value = NO_INI)]
    pub ini: String,

    /// GOPATH used to map import paths to directories
    #[arg(long, global = true, value_name = "DIR")]
    pub gopath: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<CommandArgs>,
}

// Options that accumulate across occurrences. Declared on the top level and
// on every subcommand; the levels are summed by `Args::repeated_total`.
#[derive(clap::Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct RepeatedArgs {
    /// Increase logging verbosity (-v for info, -vv for debug)
    #[arg(short = 'v', long = "debug", action = ArgAction::Count)]
    pub verbose: u8,

    /// Flag passed to the go toolchain when building (repeatable)
    #[arg(
        short = 'X',
        long = "build-flags",
        value_name = "FLAG",
        allow_hyphen_values = true
    )]
    pub build_flags: Vec<String>,
}

impl RepeatedArgs {
    /// Fold the values given at another level into these
    pub fn merge(&mut self, other: Self) {
        self.verbose = self.verbose.saturating_add(other.verbose);
        self.build_flags.extend(other.build_flags);
    }
}

impl Args {
    /// Verbosity and build flags from both sides of the subcommand
    pub fn repeated_total(&self) -> RepeatedArgs {
        let mut total = self.repeated.clone();
        if let Some(command) = &self.command {
            total.merge(command.repeated().clone());
        }
        total
    }
}

/// Available commands; names and help come from the command modules
#[derive(Subcommand, Debug)]
pub enum CommandArgs {
    #[command(name = "new", about = new::SHORT, long_about = new::LONG)]
    New {
        #[command(flatten)]
        repeated: RepeatedArgs,

        #[command(flatten)]
        options: NewOptions,

        /// Positional arguments handed to the command
        #[arg(value_name = "ARGS")]
        args: Vec<String>,
    },

    #[command(name = "run", about = run::SHORT, long_about = run::LONG)]
    Run {
        #[command(flatten)]
        repeated: RepeatedArgs,

        #[command(flatten)]
        options: RunOptions,

        /// Positional arguments handed to the command
        #[arg(value_name = "ARGS")]
        args: Vec<String>,
    },

    #[command(name = "build", about = build::SHORT, long_about = build::LONG)]
    Build {
        #[command(flatten)]
        repeated: RepeatedArgs,

        #[command(flatten)]
        options: BuildOptions,

        /// Positional arguments handed to the command
        #[arg(value_name = "ARGS")]
        args: Vec<String>,
    },

    #[command(name = "package", about = package::SHORT, long_about = package::LONG)]
    Package {
        #[command(flatten)]
        repeated: RepeatedArgs,

        #[command(flatten)]
        options: PackageOptions,

        /// Positional arguments handed to the command
        #[arg(value_name = "ARGS")]
        args: Vec<String>,
    },

    #[command(name = "clean", about = clean::SHORT, long_about = clean::LONG)]
    Clean {
        #[command(flatten)]
        repeated: RepeatedArgs,

        #[command(flatten)]
        options: CleanOptions,

        /// Positional arguments handed to the command
        #[arg(value_name = "ARGS")]
        args: Vec<String>,
    },

    #[command(name = "test", about = test::SHORT, long_about = test::LONG)]
    Test {
        #[command(flatten)]
        repeated: RepeatedArgs,

        #[command(flatten)]
        options: TestOptions,

        /// Positional arguments handed to the command
        #[arg(value_name = "ARGS")]
        args: Vec<String>,
    },

    #[command(name = "version", about = version::SHORT, long_about = version::LONG)]
    Version {
        #[command(flatten)]
        repeated: RepeatedArgs,

        #[command(flatten)]
        options: VersionOptions,

        /// Positional arguments handed to the command
        #[arg(value_name = "ARGS")]
        args: Vec<String>,
    },
}

impl CommandArgs {
    /// Repeatable options given after the subcommand name
    pub fn repeated(&self) -> &RepeatedArgs {
        match self {
            Self::New { repeated, .. }
            | Self::Run { repeated, .. }
            | Self::Build { repeated, .. }
            | Self::Package { repeated, .. }
            | Self::Clean { repeated, .. }
            | Self::Test { repeated, .. }
            | Self::Version { repeated, .. } => repeated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::Registry;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_subcommands_match_registry_names() {
        let registry = Registry::standard();
        let cli = Args::command();
        let subcommands: Vec<&str> = cli.get_subcommands().map(|s| s.get_name()).collect();
        let registered: Vec<&str> = registry.iter().map(|(_, c)| c.name()).collect();
        assert_eq!(subcommands, registered);
    }

    #[test]
    fn test_parse_repeated_verbosity() {
        let args = Args::try_parse_from(["appcmd", "-vv", "run"]).unwrap();
        assert_eq!(args.repeated_total().verbose, 2);

        let args = Args::try_parse_from(["appcmd", "run", "-v", "--debug"]).unwrap();
        assert_eq!(args.repeated_total().verbose, 2);
    }

    #[test]
    fn test_verbosity_on_both_sides_is_added() {
        let args = Args::try_parse_from(["appcmd", "-v", "run", "-v"]).unwrap();
        assert_eq!(args.repeated.verbose, 1);
        assert_eq!(args.repeated_total().verbose, 2);

        let args = Args::try_parse_from(["appcmd", "--debug", "test", "-vv", "x"]).unwrap();
        assert_eq!(args.repeated_total().verbose, 3);
    }

    #[test]
    fn test_parse_defaults() {
        let args = Args::try_parse_from(["appcmd", "clean"]).unwrap();
        assert_eq!(args.repeated_total(), RepeatedArgs::default());
        assert_eq!(args.ini, NO_INI);
        assert!(args.gopath.is_none());
        assert!(matches!(args.command, Some(CommandArgs::Clean { .. })));
    }

    #[test]
    fn test_parse_command_options_and_positionals() {
        let args = Args::try_parse_from([
            "appcmd", "run", "-m", "prod", "--port", "9000", "example.com/shop",
        ])
        .unwrap();

        match args.command {
            Some(CommandArgs::Run { options, args, .. }) => {
                assert_eq!(options.mode.as_deref(), Some("prod"));
                assert_eq!(options.port, Some(9000));
                assert_eq!(args, vec!["example.com/shop"]);
            }
            other => panic!("Expected run command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_build_flags_with_hyphens() {
        let args =
            Args::try_parse_from(["appcmd", "-X", "-race", "build", "-X", "-trimpath"]).unwrap();
        assert_eq!(args.repeated_total().build_flags, vec!["-race", "-trimpath"]);
    }
}
