//! Argument resolution
//!
//! Turns raw process arguments into a command selection and its options.
//! Arguments are either parsed directly or, when `--ini <file>` names a
//! file, the options are loaded from that file instead.

use crate::{
    cli::args::{Args, BIN_NAME, CommandArgs, NO_INI},
    config::CommandConfig,
    core::registry::{CommandKind, Registry},
    error::{CliError, Result},
};
use clap::{CommandFactory, FromArgMatches, error::ErrorKind};
use ini::Ini;
use std::path::PathBuf;
use tracing::{debug, info, instrument};

/// Resolves raw arguments against a registry
#[derive(Debug)]
pub struct ArgumentResolver<'a> {
    registry: &'a Registry,
}

impl<'a> ArgumentResolver<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// INI file named by `--ini`, unless absent or `none`
    pub fn ini_override(raw_args: &[String]) -> Option<PathBuf> {
        let mut tokens = raw_args.iter().take_while(|arg| arg.as_str() != "--");
        let mut found = None;

        while let Some(arg) = tokens.next() {
            if arg == "--ini" {
                found = tokens.next().cloned();
            } else if let Some(value) = arg.strip_prefix("--ini=") {
                found = Some(value.to_string());
            }
        }

        found
            .filter(|path| path != NO_INI)
            .map(PathBuf::from)
    }

    /// Resolve `raw_args` (without the program name) into `config`
    #[instrument(skip(self, config, raw_args))]
    pub fn resolve<I, S>(&self, config: &mut CommandConfig, raw_args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let raw_args: Vec<String> = raw_args.into_iter().map(Into::into).collect();

        if let Some(path) = Self::ini_override(&raw_args) {
            return self.resolve_ini(config, path);
        }

        self.resolve_direct(config, raw_args)
    }

    /// Load options from an INI file; the command selection is left as is
    fn resolve_ini(&self, config: &mut CommandConfig, path: PathBuf) -> Result<()> {
        info!("Loading options from {}", path.display());
        let ini = Ini::load_from_file(&path).map_err(|source| CliError::Ini {
            path: path.clone(),
            source,
        })?;
        config.apply_ini(&ini)
    }

    fn resolve_direct(&self, config: &mut CommandConfig, raw_args: Vec<String>) -> Result<()> {
        let argv = std::iter::once(BIN_NAME.to_string()).chain(raw_args.iter().cloned());
        let matches = Args::command()
            .try_get_matches_from(argv)
            .map_err(|err| match err.kind() {
                ErrorKind::InvalidSubcommand => CliError::unknown_command(raw_args.iter().cloned()),
                _ => CliError::Parse(err),
            })?;

        let active = matches.subcommand_name().map(str::to_string);
        let args = Args::from_arg_matches(&matches)?;

        let repeated = args.repeated_total();
        config.verbose = config.verbose.saturating_add(repeated.verbose);
        config.build_flags.extend(repeated.build_flags);
        if args.gopath.is_some() {
            config.gopath = args.gopath;
        }

        let leftover = match args.command {
            Some(command) => store_options(config, command),
            None => Vec::new(),
        };

        let kind = active
            .as_deref()
            .and_then(CommandKind::from_name)
            .ok_or_else(|| CliError::unknown_command(raw_args.iter().cloned()))?;
        config.index = kind;
        debug!("Selected command '{}' (index {})", kind, kind.index());

        if !leftover.is_empty() {
            info!("Found additional arguments, setting them");
            let command = self.registry.lookup(kind)?;
            if !command.update_config(config, &leftover) {
                return Err(CliError::invalid_arguments(&leftover));
            }
        }

        Ok(())
    }
}

/// Move parsed options into the config, returning the positional leftovers
fn store_options(config: &mut CommandConfig, command: CommandArgs) -> Vec<String> {
    match command {
        CommandArgs::New { options, args, .. } => {
            config.new = options;
            args
        }
        CommandArgs::Run { options, args, .. } => {
            config.run = options;
            args
        }
        CommandArgs::Build { options, args, .. } => {
            config.build = options;
            args
        }
        CommandArgs::Package { options, args, .. } => {
            config.package = options;
            args
        }
        CommandArgs::Clean { options, args, .. } => {
            config.clean = options;
            args
        }
        CommandArgs::Test { options, args, .. } => {
            config.test = options;
            args
        }
        CommandArgs::Version { options, args, .. } => {
            config.version = options;
            args
        }
    }
}
