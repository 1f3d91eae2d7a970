//! Built-in command implementations
//!
//! Each module exposes its usage text as constants so the argument parser
//! and the registry describe a command the same way.

pub mod build;
pub mod clean;
pub mod new;
pub mod package;
pub mod run;
pub mod version;

use crate::core::registry::{Command, CommandKind};
use tracing::warn;

pub use build::BuildCommand;
pub use clean::CleanCommand;
pub use new::NewCommand;
pub use package::PackageCommand;
pub use run::RunCommand;
pub use test::TestCommand;
pub use version::VersionCommand;

/// Built-in implementation of a kind; `Unset` has none
pub fn builtin(kind: CommandKind) -> Option<Box<dyn Command>> {
    let command: Box<dyn Command> = match kind {
        CommandKind::Unset => return None,
        CommandKind::New => Box::new(NewCommand),
        CommandKind::Run => Box::new(RunCommand),
        CommandKind::Build => Box::new(BuildCommand),
        CommandKind::Package => Box::new(PackageCommand),
        CommandKind::Clean => Box::new(CleanCommand),
        CommandKind::Test => Box::new(TestCommand),
        CommandKind::Version => Box::new(VersionCommand),
    };
    Some(command)
}

/// Reject more than `max` positional arguments
fn within_limit(command: &str, args: &[String], max: usize) -> bool {
    if args.len() > max {
        warn!(
            "'{}' accepts at most {} argument(s), got {}: {:?}",
            command,
            max,
            args.len(),
            args
        );
        return false;
    }
    true
}
