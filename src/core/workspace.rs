//! Workspace resolution
//!
//! Maps the working directory and the requested import path onto an
//! application directory, and prepares the package resolver that commands
//! use to fetch dependencies.

use crate::{
    config::CommandConfig,
    core::{package_resolver::PackageResolver, registry::CommandKind},
    error::{CliError, Result},
    utils::{env::EnvUtils, fs::FileSystemUtils},
};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Where the application lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Import path of the application
    pub import_path: String,
    /// Absolute application directory
    pub app_path: PathBuf,
    /// Application name, the last element of the application directory
    pub app_name: String,
    /// Directory containing the application directory
    pub src_root: PathBuf,
}

/// Collaborator that derives the workspace for an invocation
pub trait WorkspaceResolver {
    /// Fill in `config.workspace`; an error aborts the invocation
    fn resolve_import_path(&self, config: &mut CommandConfig) -> Result<()>;

    /// Fill in `config.gopaths` and `config.package_resolver`
    fn init_package_resolver(&self, config: &mut CommandConfig);
}

/// GOPATH and go.mod aware workspace resolution
#[derive(Debug)]
pub struct GoWorkspace {
    fs_utils: FileSystemUtils,
    cwd: Option<PathBuf>,
}

impl GoWorkspace {
    /// Resolve against the process working directory
    pub fn new() -> Self {
        Self {
            fs_utils: FileSystemUtils::new(),
            cwd: None,
        }
    }

    /// Resolve against a fixed directory instead of the process one
    pub fn with_current_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            fs_utils: FileSystemUtils::new(),
            cwd: Some(cwd.into()),
        }
    }

    fn current_dir(&self) -> Result<PathBuf> {
        match &self.cwd {
            Some(dir) => Ok(dir.clone()),
            None => self
                .fs_utils
                .current_dir()
                .map_err(|e| CliError::workspace(format!("cannot read working directory: {e}"))),
        }
    }

    fn gopaths(config: &CommandConfig) -> Vec<PathBuf> {
        match &config.gopath {
            Some(path) => vec![path.clone()],
            None => EnvUtils::gopath_entries(),
        }
    }

    /// Find the application directory for the selected command
    fn locate(&self, config: &CommandConfig, cwd: &Path, gopaths: &[PathBuf]) -> Result<PathBuf> {
        let Some(requested) = config.import_path() else {
            return Ok(cwd.to_path_buf());
        };

        let candidate = cwd.join(requested);
        if self.fs_utils.is_dir(&candidate) {
            return Ok(candidate);
        }

        if let Some(dir) = gopaths
            .iter()
            .map(|gopath| gopath.join("src").join(requested))
            .find(|dir| self.fs_utils.is_dir(dir))
        {
            return Ok(dir);
        }

        if config.index == CommandKind::New {
            return Ok(candidate);
        }

        Err(CliError::workspace(format!(
            "application '{requested}' was not found in {} or GOPATH",
            cwd.display()
        )))
    }

    /// Derive the import path of an application directory
    fn import_path_of(
        &self,
        config: &CommandConfig,
        app_path: &Path,
        gopaths: &[PathBuf],
    ) -> String {
        for gopath in gopaths {
            if let Ok(relative) = app_path.strip_prefix(gopath.join("src")) {
                if relative.components().next().is_some() {
                    return slash_path(relative);
                }
            }
        }

        if let Some((root, module)) = self.find_module(app_path) {
            return match app_path.strip_prefix(&root) {
                Ok(relative) if relative.components().next().is_some() => {
                    format!("{module}/{}", slash_path(relative))
                }
                _ => module,
            };
        }

        if let Some(requested) = config.import_path() {
            if !Path::new(requested).is_absolute() {
                return requested.to_string();
            }
        }

        dir_name(app_path)
    }

    /// Nearest go.mod at or above `start` and the module path it declares
    fn find_module(&self, start: &Path) -> Option<(PathBuf, String)> {
        let pattern = Regex::new(r"(?m)^\s*module\s+(\S+)").ok()?;

        start.ancestors().find_map(|dir| {
            let go_mod = dir.join("go.mod");
            if !self.fs_utils.is_file(&go_mod) {
                return None;
            }
            let content = self.fs_utils.read_file_to_string(&go_mod).ok()?;
            let module = pattern.captures(&content)?.get(1)?.as_str().trim_matches('"').to_string();
            debug!("Found module '{}' in {}", module, go_mod.display());
            Some((dir.to_path_buf(), module))
        })
    }
}

impl Default for GoWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl WorkspaceResolver for GoWorkspace {
    #[instrument(skip(self, config))]
    fn resolve_import_path(&self, config: &mut CommandConfig) -> Result<()> {
        let cwd = self.current_dir()?;
        let gopaths = Self::gopaths(config);

        let app_path = self.locate(config, &cwd, &gopaths)?;
        let import_path = self.import_path_of(config, &app_path, &gopaths);
        let app_name = dir_name(&app_path);
        if app_name.is_empty() {
            return Err(CliError::workspace(format!(
                "{} has no usable application name",
                app_path.display()
            )));
        }
        let src_root = app_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| app_path.clone());

        info!("Application '{}' at {}", import_path, app_path.display());
        config.workspace = Some(Workspace {
            import_path,
            app_path,
            app_name,
            src_root,
        });
        Ok(())
    }

    fn init_package_resolver(&self, config: &mut CommandConfig) {
        config.gopaths = Self::gopaths(config);
        debug!("GOPATH entries: {:?}", config.gopaths);

        let work_dir = config
            .workspace
            .as_ref()
            .map(|workspace| workspace.app_path.clone())
            .unwrap_or_else(|| PathBuf::from("."));
        config.package_resolver = Some(PackageResolver::new(
            EnvUtils::go_command(),
            work_dir,
            config.verbose > 1,
        ));
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(kind: CommandKind, gopath: &Path) -> CommandConfig {
        let mut config = CommandConfig::new();
        config.index = kind;
        config.gopath = Some(gopath.to_path_buf());
        config
    }

    #[test]
    fn test_resolves_current_dir_without_import_path() {
        let temp = TempDir::new().unwrap();
        let app = temp.path().join("myapp");
        fs::create_dir(&app).unwrap();

        let mut config = config_for(CommandKind::Run, &temp.path().join("gopath"));
        GoWorkspace::with_current_dir(&app)
            .resolve_import_path(&mut config)
            .unwrap();

        let workspace = config.workspace().unwrap();
        assert_eq!(workspace.app_path, app);
        assert_eq!(workspace.app_name, "myapp");
        assert_eq!(workspace.import_path, "myapp");
        assert_eq!(workspace.src_root, temp.path());
    }

    #[test]
    fn test_resolves_import_path_under_gopath() {
        let temp = TempDir::new().unwrap();
        let gopath = temp.path().join("go");
        let app = gopath.join("src").join("example.com").join("shop");
        fs::create_dir_all(&app).unwrap();

        let mut config = config_for(CommandKind::Build, &gopath);
        config.build.import_path = Some("example.com/shop".to_string());
        GoWorkspace::with_current_dir(temp.path())
            .resolve_import_path(&mut config)
            .unwrap();

        let workspace = config.workspace().unwrap();
        assert_eq!(workspace.app_path, app);
        assert_eq!(workspace.import_path, "example.com/shop");
        assert_eq!(workspace.app_name, "shop");
    }

    #[test]
    fn test_import_path_from_go_mod() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("repo");
        let app = root.join("services").join("api");
        fs::create_dir_all(&app).unwrap();
        fs::write(root.join("go.mod"), "module github.com/acme/repo\n\ngo 1.21\n").unwrap();

        let mut config = config_for(CommandKind::Test, &temp.path().join("go"));
        GoWorkspace::with_current_dir(&app)
            .resolve_import_path(&mut config)
            .unwrap();

        assert_eq!(
            config.workspace().unwrap().import_path,
            "github.com/acme/repo/services/api"
        );
    }

    #[test]
    fn test_missing_application_fails() {
        let temp = TempDir::new().unwrap();
        let mut config = config_for(CommandKind::Run, &temp.path().join("go"));
        config.run.import_path = Some("example.com/missing".to_string());

        let result = GoWorkspace::with_current_dir(temp.path()).resolve_import_path(&mut config);
        assert!(matches!(result, Err(CliError::Workspace { .. })));
        assert!(config.workspace.is_none());
    }

    #[test]
    fn test_new_accepts_missing_application() {
        let temp = TempDir::new().unwrap();
        let mut config = config_for(CommandKind::New, &temp.path().join("go"));
        config.new.import_path = Some("example.com/fresh".to_string());

        GoWorkspace::with_current_dir(temp.path())
            .resolve_import_path(&mut config)
            .unwrap();

        let workspace = config.workspace().unwrap();
        assert_eq!(workspace.app_path, temp.path().join("example.com/fresh"));
        assert_eq!(workspace.import_path, "example.com/fresh");
        assert_eq!(workspace.app_name, "fresh");
    }

    #[test]
    fn test_init_package_resolver_uses_app_path() {
        let temp = TempDir::new().unwrap();
        let gopath = temp.path().join("go");
        let mut config = config_for(CommandKind::Version, &gopath);
        let resolver = GoWorkspace::with_current_dir(temp.path());

        resolver.resolve_import_path(&mut config).unwrap();
        resolver.init_package_resolver(&mut config);

        assert_eq!(config.gopaths, vec![gopath]);
        assert_eq!(config.package_resolver().unwrap().work_dir(), temp.path());
    }
}
