// src/exec/mod.rs

//! Command execution layer.
//!
//! This module is responsible for actually invoking external programs
//! (the container runtime CLI, in practice) and classifying the outcome.
//!
//! - [`runner`] owns the process plumbing: spawn, bounded wait, output
//!   capture, and the line-streamed variant for long-running builds.
//! - [`backend`] provides the `CommandExecutor` trait and a concrete
//!   `RealExecutor` used in production, which tests can replace with a
//!   fake implementation.

pub mod backend;
pub mod runner;

pub use backend::{CommandExecutor, RealExecutor, DEFAULT_TIMEOUT};
pub use runner::{CommandError, CommandResult};
