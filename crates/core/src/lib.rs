//! Daily Planner Core - Shared types library.
//!
//! This crate provides the types used across all daily planner components:
//! - `server` - Task store HTTP service and planner page
//! - `client` - HTTP client, planner state machine and local snapshot
//! - `cli` - Command-line planner and migration tool
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! on both sides of the wire.
//!
//! # Modules
//!
//! - [`types`] - Task record, task id, plan date, clock time and the
//!   create-task validation boundary
//! - [`calendar`] - Month grid used to render the date picker

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod calendar;
pub mod types;

pub use calendar::{CalendarDay, MonthGrid};
pub use types::*;
