//! External process execution.
//!
//! Runs the generator, converter and version commands with piped stdio and a
//! bounded wait. Output pipes are drained on background threads so a child
//! that fills its pipe buffer before exiting cannot deadlock the wait.

use std::io::{ErrorKind, Read, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use tracing::debug;
use wait_timeout::ChildExt;

use crate::config::CommandSpec;
use crate::error::{DiscoveryError, Result};

/// Checks whether `command` resolves on `PATH`.
pub fn command_exists(command: &str) -> bool {
    Command::new("which")
        .arg(command)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Returns the subset of `executables` that are not installed, in order.
pub fn missing_executables(executables: &[String]) -> Vec<String> {
    executables
        .iter()
        .filter(|name| !command_exists(name))
        .cloned()
        .collect()
}

/// Runs `spec` to completion and returns its stdout.
///
/// When `stdin` is given it is written to the child on a separate thread;
/// otherwise the child's stdin is null. `timeout` bounds both the wait for
/// the child and the drain of its output pipes, which a background
/// descendant may keep open after the child itself exits.
///
/// # Errors
///
/// - [`DiscoveryError::NotInstalled`] when the program does not exist.
/// - [`DiscoveryError::Spawn`] for other spawn failures.
/// - [`DiscoveryError::Timeout`] when the child or its output outlives
///   `timeout` (the child is killed).
/// - [`DiscoveryError::CommandFailed`] on a non-zero exit.
pub fn run_command(spec: &CommandSpec, stdin: Option<&[u8]>, timeout: Duration) -> Result<String> {
    let command_line = spec.display();
    debug!(command = %command_line, stdin_len = stdin.map(<[u8]>::len), "Running command");
    let deadline = Instant::now() + timeout;

    let mut command = Command::new(&spec.program);
    command
        .args(&spec.args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            DiscoveryError::NotInstalled(vec![spec.program.clone()])
        } else {
            DiscoveryError::Spawn {
                command: command_line.clone(),
                source,
            }
        }
    })?;

    if let (Some(mut pipe), Some(input)) = (child.stdin.take(), stdin) {
        let input = input.to_vec();
        let command = command_line.clone();
        std::thread::spawn(move || {
            // The child may exit without reading everything.
            if let Err(e) = pipe.write_all(&input) {
                debug!(command = %command, error = %e, "Failed to write stdin");
            }
        });
    }
    let stdout_rx = child.stdout.take().map(drain);
    let stderr_rx = child.stderr.take().map(drain);

    let status = match child.wait_timeout(timeout)? {
        Some(status) => status,
        None => {
            debug!(
                command = %command_line,
                timeout_ms = timeout.as_millis() as u64,
                "Command timed out, killing process"
            );
            let _ = child.kill();
            let _ = child.wait();
            return Err(DiscoveryError::Timeout {
                command: command_line,
                timeout,
            });
        }
    };

    let (stdout, stderr) = match (collect(stdout_rx, deadline), collect(stderr_rx, deadline)) {
        (Ok(stdout), Ok(stderr)) => (stdout, stderr),
        (Err(Collect::TimedOut), _) | (_, Err(Collect::TimedOut)) => {
            debug!(
                command = %command_line,
                timeout_ms = timeout.as_millis() as u64,
                "Output still open after exit, giving up"
            );
            return Err(DiscoveryError::Timeout {
                command: command_line,
                timeout,
            });
        }
        (Err(Collect::Io(e)), _) | (_, Err(Collect::Io(e))) => return Err(e.into()),
    };

    if !status.success() {
        return Err(DiscoveryError::CommandFailed {
            command: command_line,
            status: status.to_string(),
            stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
        });
    }

    debug!(command = %command_line, length = stdout.len(), "Command finished");
    Ok(String::from_utf8_lossy(&stdout).into_owned())
}

/// Runs a version command and returns the first line of its stdout.
///
/// # Errors
///
/// Same as [`run_command`].
pub fn capture_version(spec: &CommandSpec, timeout: Duration) -> Result<String> {
    let output = run_command(spec, None, timeout)?;
    Ok(output.split('\n').next().unwrap_or_default().to_string())
}

type Drained = std::io::Result<Vec<u8>>;

enum Collect {
    TimedOut,
    Io(std::io::Error),
}

/// Reads `pipe` to end on a detached thread and sends the bytes back.
fn drain<R: Read + Send + 'static>(mut pipe: R) -> Receiver<Drained> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        let result = pipe.read_to_end(&mut buf).map(|_| buf);
        let _ = tx.send(result);
    });
    rx
}

fn collect(rx: Option<Receiver<Drained>>, deadline: Instant) -> std::result::Result<Vec<u8>, Collect> {
    let Some(rx) = rx else {
        return Ok(Vec::new());
    };
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(result) => result.map_err(Collect::Io),
        Err(RecvTimeoutError::Timeout) => Err(Collect::TimedOut),
        Err(RecvTimeoutError::Disconnected) => {
            Err(Collect::Io(std::io::Error::other("output reader thread panicked")))
        }
    }
}
