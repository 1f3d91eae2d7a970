//! Main control flow
//!
//! `parse → reconfigure logging → resolve workspace → init package resolver
//! → look up command → execute`, translated into a process exit code.

use crate::{
    cli::{ArgumentResolver, args::Args},
    config::CommandConfig,
    core::{
        registry::Registry,
        workspace::{GoWorkspace, WorkspaceResolver},
    },
    logging::{LogLevel, Logger},
};
use clap::CommandFactory;
use tracing::{debug, error, info};

/// Exit code of a successful invocation
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code of any failed invocation
pub const EXIT_FAILURE: i32 = 1;

/// Runs one invocation from raw arguments to exit code
#[derive(Debug)]
pub struct Dispatcher<W = GoWorkspace> {
    registry: Registry,
    workspace: W,
    logger: Logger,
}

impl Dispatcher<GoWorkspace> {
    /// Dispatcher with the built-in commands, resolving against the process cwd
    pub fn standard(logger: Logger) -> Self {
        Self::new(Registry::standard(), GoWorkspace::new(), logger)
    }
}

impl<W: WorkspaceResolver> Dispatcher<W> {
    pub fn new(registry: Registry, workspace: W, logger: Logger) -> Self {
        Self {
            registry,
            workspace,
            logger,
        }
    }

    /// Logger as last configured
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Workspace collaborator
    pub fn workspace(&self) -> &W {
        &self.workspace
    }

    /// Run one invocation; `raw_args` excludes the program name
    pub fn run<I, S>(&mut self, raw_args: I) -> i32
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = CommandConfig::new();

        if let Err(err) = ArgumentResolver::new(&self.registry).resolve(&mut config, raw_args) {
            if err.is_informational() {
                print!("{err}");
                return EXIT_SUCCESS;
            }
            eprintln!("{err}");
            if err.is_usage_error() {
                print!("{}", Args::command().render_help());
            }
            return EXIT_FAILURE;
        }

        if let Err(err) = self.logger.reconfigure(LogLevel::from_verbosity(config.verbose)) {
            eprintln!("{err}");
        }

        if let Err(err) = self.workspace.resolve_import_path(&mut config) {
            error!("Unable to determine application path: {}", err);
            return EXIT_FAILURE;
        }

        self.workspace.init_package_resolver(&mut config);
        debug!("Resolved configuration: {:?}", config);

        let command = match self.registry.lookup(config.index) {
            Ok(command) => command,
            Err(err) => {
                error!("Unable to select a command: {}", err);
                return EXIT_FAILURE;
            }
        };

        info!("Executing: {}", command.short());
        if let Err(err) = command.run(&config) {
            error!("Unable to execute: {:#}", err);
            return EXIT_FAILURE;
        }

        EXIT_SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::registry::{Command, CommandKind},
        error::{CliError, Result},
    };
    use std::{cell::Cell, fs, rc::Rc};
    use tempfile::TempDir;

    /// Workspace double recording which steps ran
    #[derive(Default)]
    struct FakeWorkspace {
        fail: bool,
        resolved: Cell<usize>,
        resolver_inits: Cell<usize>,
    }

    impl WorkspaceResolver for FakeWorkspace {
        fn resolve_import_path(&self, _config: &mut CommandConfig) -> Result<()> {
            self.resolved.set(self.resolved.get() + 1);
            if self.fail {
                return Err(CliError::workspace("no application here"));
            }
            Ok(())
        }

        fn init_package_resolver(&self, _config: &mut CommandConfig) {
            self.resolver_inits.set(self.resolver_inits.get() + 1);
        }
    }

    /// Command double counting executions
    struct Recording {
        usage: &'static str,
        runs: Rc<Cell<usize>>,
        outcome: fn() -> anyhow::Result<()>,
    }

    impl Command for Recording {
        fn usage_line(&self) -> &'static str {
            self.usage
        }

        fn short(&self) -> &'static str {
            "recording"
        }

        fn long(&self) -> &'static str {
            "recording command"
        }

        fn update_config(&self, _config: &mut CommandConfig, _args: &[String]) -> bool {
            false
        }

        fn run(&self, _config: &CommandConfig) -> anyhow::Result<()> {
            self.runs.set(self.runs.get() + 1);
            (self.outcome)()
        }
    }

    fn dispatcher(
        workspace: FakeWorkspace,
        kind: CommandKind,
        outcome: fn() -> anyhow::Result<()>,
    ) -> (Dispatcher<FakeWorkspace>, Rc<Cell<usize>>) {
        let runs = Rc::new(Cell::new(0));
        let mut registry = Registry::standard();
        registry
            .replace(
                kind,
                Box::new(Recording {
                    usage: kind.name(),
                    runs: Rc::clone(&runs),
                    outcome,
                }),
            )
            .unwrap();
        let logger = Logger::detached(LogLevel::Error);
        (Dispatcher::new(registry, workspace, logger), runs)
    }

    fn succeed() -> anyhow::Result<()> {
        Ok(())
    }

    fn fail() -> anyhow::Result<()> {
        anyhow::bail!("compilation failed")
    }

    #[test]
    fn test_run_without_verbosity_sets_warn() {
        let (mut dispatcher, runs) =
            dispatcher(FakeWorkspace::default(), CommandKind::Run, succeed);

        assert_eq!(dispatcher.run(["run"]), EXIT_SUCCESS);
        assert_eq!(dispatcher.logger().level(), LogLevel::Warn);
        assert_eq!(dispatcher.workspace().resolved.get(), 1);
        assert_eq!(dispatcher.workspace().resolver_inits.get(), 1);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_single_verbose_flag_sets_info() {
        let (mut dispatcher, _) = dispatcher(FakeWorkspace::default(), CommandKind::Run, succeed);
        assert_eq!(dispatcher.run(["run", "-v"]), EXIT_SUCCESS);
        assert_eq!(dispatcher.logger().level(), LogLevel::Info);
    }

    #[test]
    fn test_double_verbose_flag_sets_debug() {
        let (mut dispatcher, _) = dispatcher(FakeWorkspace::default(), CommandKind::Run, succeed);
        assert_eq!(dispatcher.run(["-vv", "run"]), EXIT_SUCCESS);
        assert_eq!(dispatcher.logger().level(), LogLevel::Debug);
    }

    #[test]
    fn test_verbose_flags_around_command_add_up() {
        let (mut dispatcher, _) = dispatcher(FakeWorkspace::default(), CommandKind::Run, succeed);
        assert_eq!(dispatcher.run(["-v", "run", "-v"]), EXIT_SUCCESS);
        assert_eq!(dispatcher.logger().level(), LogLevel::Debug);
    }

    #[test]
    fn test_unknown_command_skips_workspace() {
        let (mut dispatcher, runs) =
            dispatcher(FakeWorkspace::default(), CommandKind::Run, succeed);

        assert_eq!(dispatcher.run(["bogus"]), EXIT_FAILURE);
        assert_eq!(dispatcher.workspace().resolved.get(), 0);
        assert_eq!(dispatcher.logger().level(), LogLevel::Error);
        assert_eq!(runs.get(), 0);
    }

    #[test]
    fn test_rejected_arguments_fail_before_workspace() {
        let (mut dispatcher, runs) =
            dispatcher(FakeWorkspace::default(), CommandKind::New, succeed);

        assert_eq!(dispatcher.run(["new", "extra1", "extra2"]), EXIT_FAILURE);
        assert_eq!(dispatcher.workspace().resolved.get(), 0);
        assert_eq!(runs.get(), 0);
    }

    #[test]
    fn test_workspace_failure_stops_everything() {
        let workspace = FakeWorkspace {
            fail: true,
            ..FakeWorkspace::default()
        };
        let (mut dispatcher, runs) = dispatcher(workspace, CommandKind::Run, succeed);

        assert_eq!(dispatcher.run(["run", "-v"]), EXIT_FAILURE);
        assert_eq!(dispatcher.logger().level(), LogLevel::Info);
        assert_eq!(dispatcher.workspace().resolved.get(), 1);
        assert_eq!(dispatcher.workspace().resolver_inits.get(), 0);
        assert_eq!(runs.get(), 0);
    }

    #[test]
    fn test_command_failure_exits_with_failure() {
        let (mut dispatcher, runs) = dispatcher(FakeWorkspace::default(), CommandKind::Build, fail);

        assert_eq!(dispatcher.run(["build"]), EXIT_FAILURE);
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn test_ini_override_without_command_fails_lookup() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("opts.ini");
        fs::write(&path, "[run]\nrun-mode = prod\n").unwrap();
        let path_arg = path.to_string_lossy().into_owned();

        let (mut dispatcher, runs) =
            dispatcher(FakeWorkspace::default(), CommandKind::Run, succeed);

        assert_eq!(dispatcher.run(["--ini", path_arg.as_str(), "run"]), EXIT_FAILURE);
        assert_eq!(dispatcher.workspace().resolved.get(), 1);
        assert_eq!(runs.get(), 0);
    }

    #[test]
    fn test_help_exits_successfully() {
        let (mut dispatcher, runs) =
            dispatcher(FakeWorkspace::default(), CommandKind::Run, succeed);
        assert_eq!(dispatcher.run(["--help"]), EXIT_SUCCESS);
        assert_eq!(dispatcher.workspace().resolved.get(), 0);
        assert_eq!(runs.get(), 0);
    }
}
