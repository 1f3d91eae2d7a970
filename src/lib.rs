//! # appcmd
//!
//! Entry point and command resolution for a multi-command developer tool
//! for Go web applications (`appcmd new`, `appcmd run`, `appcmd build`, ...).
//!
//! ## Features
//!
//! - Two argument modes: direct flag parsing or options loaded from an INI file
//! - Command registry with an unselectable sentinel slot
//! - Verbosity tiers driven by a repeated `-v` flag
//! - Workspace resolution from GOPATH or the nearest go.mod
//! - Exit codes limited to success (0) and failure (1)
//!
//! ## Example
//!
//! ```no_run
//! use appcmd::{config::CommandConfig, cli::ArgumentResolver, core::Registry};
//!
//! let registry = Registry::standard();
//! let mut config = CommandConfig::new();
//! ArgumentResolver::new(&registry).resolve(&mut config, ["run", "-v"])?;
//! println!("Selected: {}", registry.lookup(config.index)?.name());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod utils;
