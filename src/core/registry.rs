//! Command registry
//!
//! Commands are addressed by [`CommandKind`]. Slot 0 of the registry is a
//! sentinel that never holds a command, so an unresolved kind fails lookup
//! instead of running something.

use crate::{commands, config::CommandConfig, error::CliError};
use std::fmt;
use tracing::debug;

/// The enumerated command kinds, in registry order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandKind {
    /// No command selected yet
    #[default]
    Unset,
    New,
    Run,
    Build,
    Package,
    Clean,
    Test,
    Version,
}

/// Fixed table mapping subcommand names to kinds
const NAME_TABLE: [(&str, CommandKind); 7] = [
    ("new", CommandKind::New),
    ("run", CommandKind::Run),
    ("build", CommandKind::Build),
    ("package", CommandKind::Package),
    ("clean", CommandKind::Clean),
    ("test", CommandKind::Test),
    ("version", CommandKind::Version),
];

impl CommandKind {
    /// Every selectable kind, in index order
    pub const ALL: [CommandKind; 7] = [
        CommandKind::New,
        CommandKind::Run,
        CommandKind::Build,
        CommandKind::Package,
        CommandKind::Clean,
        CommandKind::Test,
        CommandKind::Version,
    ];

    /// Registry index of this kind; `Unset` is 0
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a kind by subcommand name
    pub fn from_name(name: &str) -> Option<Self> {
        NAME_TABLE
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, kind)| *kind)
    }

    /// Subcommand name, empty for `Unset`
    pub fn name(self) -> &'static str {
        NAME_TABLE
            .iter()
            .find(|(_, kind)| *kind == self)
            .map_or("", |(name, _)| name)
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unset => f.write_str("<unset>"),
            kind => f.write_str(kind.name()),
        }
    }
}

/// A registered unit of CLI functionality
pub trait Command {
    /// Usage line; its first word is the command name
    fn usage_line(&self) -> &'static str;

    /// One-line description shown in the command list
    fn short(&self) -> &'static str;

    /// Full description shown by `<command> --help`
    fn long(&self) -> &'static str;

    /// Short name derived from the usage line
    fn name(&self) -> &'static str {
        name_of(self.usage_line())
    }

    /// Accept leftover positional arguments into the config.
    ///
    /// Returns `false` when the arguments are not valid for this command.
    fn update_config(&self, config: &mut CommandConfig, args: &[String]) -> bool;

    /// Execute the command against the resolved config
    fn run(&self, config: &CommandConfig) -> anyhow::Result<()>;
}

/// Text of a usage line before its first whitespace
pub fn name_of(usage_line: &str) -> &str {
    match usage_line.find(char::is_whitespace) {
        Some(end) => &usage_line[..end],
        None => usage_line,
    }
}

/// Ordered command table indexed by [`CommandKind`]
pub struct Registry {
    entries: Vec<Option<Box<dyn Command>>>,
}

impl Registry {
    /// Registry holding the built-in implementation of every kind
    pub fn standard() -> Self {
        let mut entries: Vec<Option<Box<dyn Command>>> =
            Vec::with_capacity(CommandKind::ALL.len() + 1);
        entries.push(None);
        entries.extend(CommandKind::ALL.iter().map(|kind| commands::builtin(*kind)));
        Self { entries }
    }

    /// Look up the command for a kind.
    ///
    /// `Unset` always fails, whatever the table holds.
    pub fn lookup(&self, kind: CommandKind) -> Result<&dyn Command, CliError> {
        if kind == CommandKind::Unset {
            return Err(CliError::MissingCommand { kind });
        }

        self.entries
            .get(kind.index())
            .and_then(Option::as_deref)
            .ok_or(CliError::MissingCommand { kind })
    }

    /// Swap the implementation registered for a kind
    pub fn replace(
        &mut self,
        kind: CommandKind,
        command: Box<dyn Command>,
    ) -> Result<(), CliError> {
        if kind == CommandKind::Unset {
            return Err(CliError::MissingCommand { kind });
        }

        debug!("Replacing registered command '{}'", kind);
        match self.entries.get_mut(kind.index()) {
            Some(slot) => {
                *slot = Some(command);
                Ok(())
            }
            None => Err(CliError::MissingCommand { kind }),
        }
    }

    /// Number of slots, sentinel included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no command is registered
    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(Option::is_none)
    }

    /// Registered commands in index order
    pub fn iter(&self) -> impl Iterator<Item = (CommandKind, &dyn Command)> + '_ {
        CommandKind::ALL
            .iter()
            .filter_map(|kind| self.lookup(*kind).ok().map(|command| (*kind, command)))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|slot| slot.as_ref().map(|c| c.name())))
            .finish()
    }
}
