#![allow(dead_code)]

use nodeman::exec::{CommandError, CommandResult};

/// Successful result with the given stdout.
pub fn ok(stdout: &str) -> CommandResult {
    CommandResult {
        success: true,
        stdout: stdout.to_string(),
        stderr: String::new(),
        exit_code: Some(0),
        error: None,
    }
}

/// Failed result with an exit code and stderr text.
pub fn failed(exit_code: i32, stderr: &str) -> CommandResult {
    CommandResult {
        success: false,
        stdout: String::new(),
        stderr: stderr.to_string(),
        exit_code: Some(exit_code),
        error: None,
    }
}

/// Result for a process that could not be launched at all.
pub fn exec_error(message: &str) -> CommandResult {
    CommandResult::execution_error(message)
}

/// Result for a bounded wait that elapsed.
pub fn timed_out(seconds: u64) -> CommandResult {
    CommandResult::timed_out(seconds)
}
