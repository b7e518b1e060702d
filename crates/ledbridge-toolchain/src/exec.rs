//! Process-executor collaborator and the real shell-backed implementation.

use crate::Result;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

/// One external-process execution: binary, ordered arguments, working
/// directory and whether to run through a shell wrapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub binary: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub shell: bool,
}

/// Accumulated output of a finished subprocess.
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs invocations to completion. No timeout and no mid-run cancellation;
/// those are caller concerns.
#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(&self, invocation: &Invocation) -> Result<ExecOutput>;
}

/// Real executor over `tokio::process`, running through `sh -c` when the
/// invocation asks for a shell wrapper.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellExecutor;

impl Executor for ShellExecutor {
    async fn run(&self, invocation: &Invocation) -> Result<ExecOutput> {
        let mut cmd = if invocation.shell {
            let mut line = shell_quote(&invocation.binary);
            for arg in &invocation.args {
                line.push(' ');
                line.push_str(&shell_quote(arg));
            }
            let mut cmd = tokio::process::Command::new("sh");
            cmd.arg("-c").arg(line);
            cmd
        } else {
            let mut cmd = tokio::process::Command::new(&invocation.binary);
            cmd.args(&invocation.args);
            cmd
        };
        cmd.current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!(
            "Running {} {} (cwd: {})",
            invocation.binary,
            invocation.args.join(" "),
            invocation.cwd.display()
        );

        let mut child = cmd.spawn()?;
        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        // Drain both pipes while waiting, so neither side can fill and stall
        // the child.
        let (stdout, stderr, status) =
            tokio::join!(drain(stdout_pipe), drain(stderr_pipe), child.wait());
        let status = status?;

        Ok(ExecOutput {
            // Signal-terminated processes report no code; fold to -1.
            exit_code: status.code().unwrap_or(-1),
            stdout,
            stderr,
        })
    }
}

/// Accumulates a pipe's streamed chunks into a string. A mid-stream read
/// error ends the capture with whatever arrived so far; the truncation is
/// logged so a short capture is diagnosable.
async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let Some(mut reader) = pipe else {
        return String::new();
    };
    let mut collected = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => collected.extend_from_slice(&chunk[..n]),
            Err(e) => {
                warn!("Pipe read failed, output captured so far is kept: {}", e);
                break;
            }
        }
    }
    String::from_utf8_lossy(&collected).into_owned()
}

/// Single-quotes a token for `sh -c` unless it is plainly safe.
fn shell_quote(token: &str) -> String {
    let safe = !token.is_empty()
        && token
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'/' | b':' | b'='));
    if safe {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("--fqbn"), "--fqbn");
        assert_eq!(shell_quote("arduino:renesas_uno"), "arduino:renesas_uno");
        assert_eq!(shell_quote("Adafruit NeoPixel"), "'Adafruit NeoPixel'");
        assert_eq!(shell_quote("a'b"), r#"'a'\''b'"#);
        assert_eq!(shell_quote(""), "''");
    }

    #[tokio::test]
    async fn test_run_captures_output_and_code() {
        let dir = tempfile::tempdir().unwrap();
        let invocation = Invocation {
            binary: "echo".to_string(),
            args: vec!["hello".to_string(), "world".to_string()],
            cwd: dir.path().to_path_buf(),
            shell: true,
        };
        let output = ShellExecutor.run(&invocation).await.unwrap();
        assert_eq!(output.exit_code, 0);
        assert_eq!(output.stdout, "hello world\n");
        assert_eq!(output.stderr, "");
    }

    #[tokio::test]
    async fn test_run_nonzero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let invocation = Invocation {
            binary: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "echo oops >&2; exit 3".to_string(),
            ],
            cwd: dir.path().to_path_buf(),
            shell: false,
        };
        let output = ShellExecutor.run(&invocation).await.unwrap();
        assert_eq!(output.exit_code, 3);
        assert_eq!(output.stderr, "oops\n");
    }

    /// Yields one chunk, then fails every subsequent read.
    struct FailingReader {
        sent: bool,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            let this = self.get_mut();
            if this.sent {
                std::task::Poll::Ready(Err(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "pipe gone",
                )))
            } else {
                this.sent = true;
                buf.put_slice(b"partial output");
                std::task::Poll::Ready(Ok(()))
            }
        }
    }

    #[tokio::test]
    async fn test_drain_keeps_output_before_read_error() {
        let text = drain(Some(FailingReader { sent: false })).await;
        assert_eq!(text, "partial output");
    }

    #[tokio::test]
    async fn test_run_pins_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let invocation = Invocation {
            binary: "pwd".to_string(),
            args: Vec::new(),
            cwd: dir.path().to_path_buf(),
            shell: true,
        };
        let output = ShellExecutor.run(&invocation).await.unwrap();
        let reported = PathBuf::from(output.stdout.trim());
        // Compare canonicalized paths; tempdirs may sit behind symlinks.
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }
}
