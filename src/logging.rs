//! Process logging
//!
//! The logger is installed once with a coarse level before arguments are
//! parsed, then reconfigured with the level chosen by the verbosity flag.

use crate::error::CliError;
use std::fmt;
use tracing::debug;
use tracing_subscriber::{
    EnvFilter, Registry, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

/// Logging levels the tool switches between
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    /// Level for a count of repeated verbosity flags
    pub const fn from_verbosity(count: u8) -> Self {
        match count {
            0 => Self::Warn,
            1 => Self::Info,
            _ => Self::Debug,
        }
    }

    /// Filter directive for this level
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    fn filter(self) -> EnvFilter {
        EnvFilter::new(self.as_str())
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle on the process-wide log filter
pub struct Logger {
    level: LogLevel,
    handle: Option<reload::Handle<EnvFilter, Registry>>,
}

impl Logger {
    /// Install the global subscriber at `level`.
    ///
    /// When a subscriber is already installed the returned logger only
    /// tracks its level.
    pub fn install(level: LogLevel) -> Self {
        let (filter, handle) = reload::Layer::new(level.filter());

        let installed = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_level(true)
                    .compact(),
            )
            .try_init()
            .is_ok();

        Self {
            level,
            handle: installed.then_some(handle),
        }
    }

    /// Logger that does not own process output
    pub fn detached(level: LogLevel) -> Self {
        Self {
            level,
            handle: None,
        }
    }

    /// Current level
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// True when this logger controls the global subscriber
    pub fn is_installed(&self) -> bool {
        self.handle.is_some()
    }

    /// Switch to `level`; the last call wins
    pub fn reconfigure(&mut self, level: LogLevel) -> Result<(), CliError> {
        if let Some(handle) = &self.handle {
            handle
                .reload(level.filter())
                .map_err(|e| CliError::logging(format!("Failed to reconfigure logging: {e}")))?;
        }
        self.level = level;
        debug!("Log level set to {}", level);
        Ok(())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level)
            .field("installed", &self.is_installed())
            .finish()
    }
}
