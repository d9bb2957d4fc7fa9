// src/exec/runner.rs

//! Process invocation with timeout, output capture and streaming.

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, error, info, warn};

/// How many characters of captured output to include in log lines.
///
/// Only logging is truncated; the returned result always carries the full
/// output.
const LOG_SNIPPET_CHARS: usize = 500;

/// Why a process could not be observed to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The bounded wait elapsed before the process exited.
    Timeout { seconds: u64 },
    /// The process could not be launched or waited on at all.
    Execution(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Timeout { seconds } => write!(
                f,
                "command timed out after {seconds}s; a long-running operation may still be in progress"
            ),
            CommandError::Execution(msg) => f.write_str(msg),
        }
    }
}

/// Outcome of one external invocation. Ephemeral; never persisted.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    /// Set only when the process could not be observed to completion.
    pub error: Option<CommandError>,
}

impl CommandResult {
    pub fn execution_error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            error: Some(CommandError::Execution(message)),
        }
    }

    pub fn timed_out(seconds: u64) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            error: Some(CommandError::Timeout { seconds }),
        }
    }

    /// Best human-readable diagnostic for a failed invocation: stderr if the
    /// process produced any, otherwise the error classification, otherwise
    /// the exit code.
    pub fn failure_detail(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        if let Some(err) = &self.error {
            return err.to_string();
        }
        match self.exit_code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Run `argv` and capture its output, waiting at most `timeout`.
///
/// No shell is involved: `argv[0]` is the program and the rest are passed
/// verbatim. Callers that need shell interpretation construct an explicit
/// `sh -c` vector themselves.
pub(crate) async fn run_captured(argv: &[String], timeout: Duration) -> CommandResult {
    let Some((program, args)) = argv.split_first() else {
        return CommandResult::execution_error("empty argument vector");
    };

    info!(
        cmd = %argv.join(" "),
        timeout_secs = timeout.as_secs(),
        "executing command"
    );

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            error!(cmd = %program, error = %err, "failed to spawn command");
            return CommandResult::execution_error(err.to_string());
        }
    };

    // Dropping the wait future on timeout kills the child via kill_on_drop.
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(err)) => {
            error!(error = %err, "failed waiting for command");
            return CommandResult::execution_error(err.to_string());
        }
        Err(_elapsed) => {
            warn!(timeout_secs = timeout.as_secs(), "command timed out");
            return CommandResult::timed_out(timeout.as_secs());
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !stdout.is_empty() {
        debug!(stdout = %snippet(&stdout, LOG_SNIPPET_CHARS), "command stdout");
    }
    if !stderr.is_empty() {
        debug!(stderr = %snippet(&stderr, LOG_SNIPPET_CHARS), "command stderr");
    }

    CommandResult {
        success: output.status.success(),
        stdout,
        stderr,
        exit_code: output.status.code(),
        error: None,
    }
}

/// Run `argv` without a deadline, streaming each output line into the log
/// under `label`.
///
/// Builds run for many minutes and can emit unbounded output, so nothing is
/// buffered: both streams are consumed line-by-line and the result carries
/// only the exit classification.
pub(crate) async fn run_streaming(argv: &[String], label: &str) -> CommandResult {
    let Some((program, args)) = argv.split_first() else {
        return CommandResult::execution_error("empty argument vector");
    };

    info!(
        cmd = %argv.join(" "),
        op = %label,
        "executing long-running command (streaming output)"
    );

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            error!(cmd = %program, error = %err, "failed to spawn command");
            return CommandResult::execution_error(err.to_string());
        }
    };

    if let Some(stdout) = child.stdout.take() {
        let label = label.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(op = %label, "{line}");
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        let label = label.to_string();
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                info!(op = %label, "{line}");
            }
        });
    }

    let status = match child.wait().await {
        Ok(status) => status,
        Err(err) => {
            error!(op = %label, error = %err, "failed waiting for command");
            return CommandResult::execution_error(err.to_string());
        }
    };

    info!(
        op = %label,
        exit_code = ?status.code(),
        success = status.success(),
        "long-running command exited"
    );

    CommandResult {
        success: status.success(),
        stdout: String::new(),
        stderr: String::new(),
        exit_code: status.code(),
        error: None,
    }
}

/// Char-boundary-safe prefix of `s`, at most `max_chars` characters.
fn snippet(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
