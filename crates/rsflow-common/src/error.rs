//! Error types for external tool invocation.

use thiserror::Error;

/// Errors that can occur when running an external command-line tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The program could not be found on `PATH`.
    #[error("External tool '{program}' not found")]
    NotFound {
        /// Program name as given to the runner.
        program: String,
    },

    /// The program exists but could not be started.
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        /// Program name as given to the runner.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The program ran and exited unsuccessfully.
    #[error("'{command}' failed with {}: {stderr}", exit_description(.code))]
    Failed {
        /// Rendered command line.
        command: String,
        /// Exit code, `None` when terminated by a signal.
        code: Option<i32>,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
