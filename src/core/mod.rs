//! Core functionality for command resolution
//!
//! Contains the command registry and the collaborators commands rely on:
//! workspace resolution, package resolution and the toolchain.

pub mod package_resolver;
pub mod registry;
pub mod toolchain;
pub mod workspace;

pub use package_resolver::PackageResolver;
pub use registry::{Command, CommandKind, Registry};
pub use toolchain::GoToolchain;
pub use workspace::{GoWorkspace, Workspace, WorkspaceResolver};
