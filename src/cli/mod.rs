//! Command-line interface module.

pub mod apply;
mod args;
pub mod check;
pub mod common;
pub mod watch;

pub use args::{ApplyArgs, Cli, Commands, WatchArgs};
