//! Core types for the daily planner.
//!
//! This module provides type-safe wrappers for the planner's domain concepts.

pub mod date;
pub mod id;
pub mod task;
pub mod time;

pub use date::{PlanDate, PlanDateError};
pub use id::{TaskId, TaskIdError};
pub use task::{
    CompletionUpdate, CreateTaskRequest, NewTask, Task, TaskInputError, ValidationMode,
};
pub use time::{ClockTime, ClockTimeError};
