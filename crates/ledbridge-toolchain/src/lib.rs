//! Orchestration of the external `arduino-cli` binary.
//!
//! Builds a deterministic per-working-directory configuration file, constructs
//! argument vectors with a stable global-flag prefix, runs the binary as a
//! subprocess and classifies the outcome by exit code. Filesystem and process
//! execution sit behind traits so the service logic is testable without
//! touching disk or spawning anything.

pub mod error;
pub mod exec;
pub mod fs;
pub mod service;

pub use error::{Error, Result};
pub use exec::{ExecOutput, Executor, Invocation, ShellExecutor};
pub use fs::{Fs, StdFs};
pub use service::{ToolchainService, CONFIG_FILE_NAME, DEFAULT_LOG_LEVEL, TOOLCHAIN_BINARY};
