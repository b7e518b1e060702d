//! The toolchain service: config lifecycle, argument construction, execution.

use crate::exec::{Executor, Invocation, ShellExecutor};
use crate::fs::{Fs, StdFs};
use crate::{Error, Result};
use ledbridge_proto::Board;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the external toolchain binary.
pub const TOOLCHAIN_BINARY: &str = "arduino-cli";

/// Per-directory configuration file name.
pub const CONFIG_FILE_NAME: &str = "arduino-cli.yaml";

/// Log level passed to the toolchain when the caller does not choose one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Deterministic wrapper around `arduino-cli`.
///
/// Each instance is bound to one working directory at construction; its
/// config file path never changes afterwards, and instances bound to
/// different directories never observe each other's config. Sequential
/// invocations are independent subprocess runs.
pub struct ToolchainService<F: Fs, E: Executor> {
    workdir: PathBuf,
    config_path: PathBuf,
    log_level: String,
    fs: F,
    executor: E,
}

impl ToolchainService<StdFs, ShellExecutor> {
    /// Creates a service bound to `workdir` with the real filesystem and
    /// shell executor.
    pub fn new(workdir: PathBuf, log_level: Option<&str>) -> Self {
        Self::with_collaborators(workdir, log_level, StdFs, ShellExecutor)
    }
}

impl<F: Fs, E: Executor> ToolchainService<F, E> {
    pub fn with_collaborators(
        workdir: PathBuf,
        log_level: Option<&str>,
        fs: F,
        executor: E,
    ) -> Self {
        let config_path = workdir.join(CONFIG_FILE_NAME);
        Self {
            workdir,
            config_path,
            log_level: log_level.unwrap_or(DEFAULT_LOG_LEVEL).to_string(),
            fs,
            executor,
        }
    }

    /// Path of this directory's toolchain config file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Writes the default config when absent; leaves an existing file alone.
    pub fn ensure_config(&self) -> Result<()> {
        if self.fs.exists(&self.config_path) {
            return Ok(());
        }
        info!("Writing toolchain config to {}", self.config_path.display());
        self.fs
            .write_text(&self.config_path, &default_config(&self.workdir))
    }

    /// Prepends the stable global-flag prefix to the subcommand arguments.
    ///
    /// Global flags always come first, in this exact order:
    /// `--log --log-level <level> --config-file <path>`.
    pub fn build_args(&self, sub_args: &[&str]) -> Vec<String> {
        let mut args = vec![
            "--log".to_string(),
            "--log-level".to_string(),
            self.log_level.clone(),
            "--config-file".to_string(),
            self.config_path.display().to_string(),
        ];
        args.extend(sub_args.iter().map(|a| a.to_string()));
        args
    }

    /// Ensures the config exists, runs the toolchain and classifies the exit.
    ///
    /// Exit 0 resolves to the trimmed standard output; any other exit code
    /// fails with the code and the standard-error text verbatim. Failures
    /// are never retried.
    pub async fn execute(&self, sub_args: &[&str]) -> Result<String> {
        self.ensure_config()?;
        let invocation = Invocation {
            binary: TOOLCHAIN_BINARY.to_string(),
            args: self.build_args(sub_args),
            cwd: self.workdir.clone(),
            shell: true,
        };
        let output = self.executor.run(&invocation).await?;
        if output.exit_code == 0 {
            debug!("{} {} succeeded", TOOLCHAIN_BINARY, sub_args.join(" "));
            Ok(output.stdout.trim().to_string())
        } else {
            Err(Error::ExecutionFailed {
                exit_code: output.exit_code,
                stderr: output.stderr,
            })
        }
    }

    /// Reports the toolchain version.
    pub async fn version(&self) -> Result<String> {
        self.execute(&["version"]).await
    }

    /// Lists installed platform cores.
    pub async fn list_cores(&self) -> Result<String> {
        self.execute(&["core", "list"]).await
    }

    /// Lists installed libraries.
    pub async fn list_libs(&self) -> Result<String> {
        self.execute(&["lib", "list"]).await
    }

    /// Sketch directory layout: `<workdir>/boards/<board>/sketches/<sketch>`.
    pub fn sketch_dir(&self, board: &Board, sketch: &str) -> PathBuf {
        self.workdir
            .join("boards")
            .join(&board.name)
            .join("sketches")
            .join(sketch)
    }

    /// Compiles a sketch for the given board.
    pub async fn compile(&self, sketch: &str, board: &Board) -> Result<String> {
        let sketch_path = self.checked_sketch_dir(board, sketch)?;
        self.execute(&["compile", "--fqbn", &board.fqbn, &sketch_path])
            .await
    }

    /// Uploads a sketch to the board over the given port.
    pub async fn upload(&self, sketch: &str, board: &Board, port: &str) -> Result<String> {
        let sketch_path = self.checked_sketch_dir(board, sketch)?;
        self.execute(&[
            "upload",
            "--port",
            port,
            "--fqbn",
            &board.fqbn,
            &sketch_path,
        ])
        .await
    }

    /// Installs the board's platform core and libraries.
    ///
    /// Without a board this falls back to refreshing the core and library
    /// indexes, a legacy compatibility path rather than an error.
    pub async fn install(&self, board: Option<&Board>) -> Result<String> {
        match board {
            Some(board) => {
                let mut out = self.execute(&["core", "install", &board.platform]).await?;
                for library in &board.libraries {
                    let lib_out = self.execute(&["lib", "install", library]).await?;
                    out.push('\n');
                    out.push_str(&lib_out);
                }
                Ok(out)
            }
            None => {
                let core = self.execute(&["core", "update-index"]).await?;
                let lib = self.execute(&["lib", "update-index"]).await?;
                Ok(format!("{core}\n{lib}"))
            }
        }
    }

    /// Validates the sketch directory and returns it as a string path.
    /// Nothing is spawned when the sketch is missing.
    fn checked_sketch_dir(&self, board: &Board, sketch: &str) -> Result<String> {
        let path = self.sketch_dir(board, sketch);
        if !self.fs.exists(&path) {
            return Err(Error::SketchNotFound(path));
        }
        Ok(path.display().to_string())
    }
}

fn default_config(workdir: &Path) -> String {
    // arduino-cli owns this format; pinning the directories under the
    // working directory keeps invocations from different directories
    // independent of each other.
    let data = workdir.join(".arduino15");
    format!(
        "directories:\n  data: {}\n  downloads: {}\n  user: {}\n",
        data.display(),
        data.join("staging").display(),
        data.join("user").display()
    )
}
