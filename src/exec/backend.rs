// src/exec/backend.rs

//! Pluggable command execution abstraction.
//!
//! The manager talks to a `CommandExecutor` instead of spawning processes
//! directly. This makes it easy to swap in a fake executor in tests while
//! keeping the production process plumbing in [`runner`](crate::exec::runner).

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::exec::runner::{self, CommandResult};

/// Default bounded wait for short operations (status, stop, logs).
///
/// Start/restart/build-adjacent operations pass longer, explicit timeouts.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait abstracting external program invocation.
///
/// Errors are never returned out-of-band: every outcome, including spawn
/// failures and timeouts, is folded into the [`CommandResult`] so callers
/// have a single classification point.
pub trait CommandExecutor: Send + Sync {
    /// Run `argv`, capturing stdout/stderr, waiting at most `timeout`.
    fn execute(
        &self,
        argv: Vec<String>,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + '_>>;

    /// Run `argv` with no deadline, streaming output line-by-line into the
    /// log under `label`. The result carries only the exit classification.
    fn execute_streaming(
        &self,
        argv: Vec<String>,
        label: String,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + '_>>;
}

/// Real executor used in production.
#[derive(Debug, Clone, Default)]
pub struct RealExecutor;

impl RealExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl CommandExecutor for RealExecutor {
    fn execute(
        &self,
        argv: Vec<String>,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + '_>> {
        Box::pin(async move { runner::run_captured(&argv, timeout).await })
    }

    fn execute_streaming(
        &self,
        argv: Vec<String>,
        label: String,
    ) -> Pin<Box<dyn Future<Output = CommandResult> + Send + '_>> {
        Box::pin(async move { runner::run_streaming(&argv, &label).await })
    }
}
