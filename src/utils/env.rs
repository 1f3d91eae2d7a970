//! Environment handling utilities
//!
//! Reads the toolchain settings that shape workspace resolution.

use std::{env, path::PathBuf};
use tracing::debug;

/// Go executable used when `GO` is not set
pub const DEFAULT_GO_COMMAND: &str = "go";

/// Environment variable utilities
#[derive(Debug)]
pub struct EnvUtils;

impl EnvUtils {
    /// Get an environment variable with a default value
    pub fn get_var_or_default(key: &str, default: &str) -> String {
        env::var(key)
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// Go executable, from `GO` or the default
    pub fn go_command() -> String {
        Self::get_var_or_default("GO", DEFAULT_GO_COMMAND)
    }

    /// GOPATH entries, from `GOPATH` or `$HOME/go`
    pub fn gopath_entries() -> Vec<PathBuf> {
        let entries = env::var_os("GOPATH")
            .map(|value| Self::split_gopath(&value))
            .unwrap_or_default();

        if !entries.is_empty() {
            return entries;
        }

        match env::var_os("HOME") {
            Some(home) if !home.is_empty() => {
                let fallback = PathBuf::from(home).join("go");
                debug!("GOPATH not set, using {}", fallback.display());
                vec![fallback]
            }
            _ => Vec::new(),
        }
    }

    /// Split a GOPATH value on the platform separator, dropping empty entries
    pub fn split_gopath(value: &std::ffi::OsStr) -> Vec<PathBuf> {
        env::split_paths(value)
            .filter(|path| !path.as_os_str().is_empty())
            .collect()
    }
}
