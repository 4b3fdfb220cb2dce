// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running external commands using
//! `std::process::Command` and translating process-level failures into one
//! error contract.
//!
//! - [`backend`] provides the `CommandExecutor` trait and the concrete
//!   `SystemExecutor` used in production, which tests can replace with a
//!   fake implementation.
//! - [`invocation`] spawns a process with stdout and stderr merged into one
//!   pipe.
//! - [`stdin`] owns a child's stdin and runs the partial-write loop.
//! - [`failure`] holds the structured `SubprocessFailure`.

pub mod backend;
pub mod failure;
pub mod invocation;
pub mod stdin;

pub use backend::{CommandExecutor, Result, SystemExecutor};
pub use failure::{Cause, FailureKind, MessageStyle, SubprocessFailure};
pub use invocation::Invocation;
pub use stdin::{InputPipe, PartialWrite};
