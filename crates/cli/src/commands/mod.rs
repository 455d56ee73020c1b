//! Subcommand implementations.

pub mod calendar;
pub mod migrate;
pub mod tasks;
