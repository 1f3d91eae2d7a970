//! Command-line interface module
//!
//! Provides argument definitions and their resolution into a
//! [`CommandConfig`](crate::config::CommandConfig).

pub mod args;
pub mod resolver;

pub use args::{Args, CommandArgs, RepeatedArgs};
pub use resolver::ArgumentResolver;
