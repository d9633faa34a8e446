//! # rsflow-common
//!
//! Types shared by the rsflow tools:
//!
//! - [`ToolCommand`] / [`CommandRunner`]: invoking external command-line tools
//!   such as `gdalwarp`, with [`ProcessRunner`] as the real implementation.
//! - [`BatchReport`] / [`BatchPolicy`]: per-item outcomes for operations that
//!   loop over a list of inputs.
//! - [`ProgressEvent`] / [`ProgressCallback`]: structured progress reporting
//!   injected into each operation.

mod batch;
mod command;
mod error;
mod progress;

pub use batch::{BatchPolicy, BatchReport, ItemOutcome};
pub use command::{CommandRunner, ProcessRunner, ToolCommand};
pub use error::ToolError;
pub use progress::{emit, ProgressCallback, ProgressEvent};
