//! External command invocation.
//!
//! Mosaicking and clipping are delegated to GDAL command-line tools. The
//! [`CommandRunner`] trait is the seam between the code that decides *what* to
//! run and the code that actually spawns processes, so that filename and
//! argument construction can be tested without GDAL installed.

use crate::ToolError;
use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::Command;
use tracing::{debug, trace};

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Program name or path.
    pub program: String,
    /// Arguments in order.
    pub args: Vec<OsString>,
}

impl ToolCommand {
    /// Create a command with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.as_os_str())
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Arguments rendered lossily as strings (for logging and tests).
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Runs external commands to completion.
pub trait CommandRunner {
    /// Run `command`, blocking until it exits.
    ///
    /// Returns `Ok(())` only when the process exits successfully.
    fn run(&self, command: &ToolCommand) -> Result<(), ToolError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &ToolCommand) -> Result<(), ToolError> {
        (**self).run(command)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, command: &ToolCommand) -> Result<(), ToolError> {
        (**self).run(command)
    }
}

/// [`CommandRunner`] that spawns real child processes.
///
/// Standard output and standard error are captured; standard error is
/// attached to [`ToolError::Failed`] when the process exits unsuccessfully.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a new process runner.
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &ToolCommand) -> Result<(), ToolError> {
        debug!("Running {}", command);

        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ToolError::NotFound {
                    program: command.program.clone(),
                },
                _ => ToolError::Spawn {
                    program: command.program.clone(),
                    source: e,
                },
            })?;

        trace!(
            "{} stdout: {}",
            command.program,
            String::from_utf8_lossy(&output.stdout).trim()
        );

        if !output.status.success() {
            return Err(ToolError::Failed {
                command: command.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
