use std::ffi::OsStr;
use std::fmt::Debug;
use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{Error, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Stdout of a successful run, or the tool's diagnostic as an error.
    pub fn into_success(self, tool: &str) -> Result<String> {
        if self.status.success() {
            return Ok(self.stdout);
        }
        let stderr = self.stderr.trim();
        let message = if stderr.is_empty() {
            format!("exited with {}", self.status)
        } else {
            stderr.to_string()
        };
        Err(Error::ToolExecutionError {
            tool: tool.to_string(),
            message,
        })
    }
}

/// Run an external tool to completion, killing it once `timeout` elapses.
///
/// A non-zero exit is not an error here; callers decide what it means.
pub fn run_tool<S>(program: &str, args: &[S], timeout: Duration) -> Result<ToolOutput>
where
    S: AsRef<OsStr> + Debug,
{
    debug!(program, ?args, ?timeout, "running external tool");
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| spawn_error(program, err))?;

    // Pipes are drained on their own threads while we poll for exit.
    let stdout = child.stdout.take().map(drain);
    let stderr = child.stderr.take().map(drain);

    let start = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::ToolExecutionError {
                        tool: program.to_string(),
                        message: format!("timed out after {}s", timeout.as_secs_f64()),
                    });
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::ToolExecutionError {
                    tool: program.to_string(),
                    message: err.to_string(),
                });
            }
        }
    };

    let output = ToolOutput {
        status,
        stdout: join_drain(stdout),
        stderr: join_drain(stderr),
    };
    debug!(program, status = %output.status, bytes = output.stdout.len(), "tool finished");
    Ok(output)
}

fn spawn_error(program: &str, err: io::Error) -> Error {
    if err.kind() == io::ErrorKind::NotFound {
        Error::ToolNotFound {
            tool: program.to_string(),
        }
    } else {
        Error::ToolExecutionError {
            tool: program.to_string(),
            message: err.to_string(),
        }
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_drain(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}
