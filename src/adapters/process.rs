//! Subprocess adapter
//!
//! Implements `ProcessRunner` with `std::process`, polling the child until it
//! exits or its deadline passes.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::core::ports::{ProcessError, ProcessOutput, ProcessRunner};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs programs on the host
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    /// Create a runner
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemProcessRunner {
    fn run(
        &self,
        argv: &[String],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<ProcessOutput, ProcessError> {
        let (program, args) = argv.split_first().ok_or(ProcessError::EmptyCommand)?;
        log::debug!("running {} in {}", argv.join(" "), cwd.display());

        let mut child = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Drain both pipes while waiting so a chatty tool can't fill one and stall
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = wait_with_deadline(&mut child, program, timeout)?;

        Ok(ProcessOutput {
            status: status.code(),
            stdout: collect(stdout),
            stderr: collect(stderr),
        })
    }
}

fn wait_with_deadline(
    child: &mut Child,
    program: &str,
    timeout: Duration,
) -> Result<std::process::ExitStatus, ProcessError> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {},
            Err(source) => {
                return Err(ProcessError::Wait {
                    program: program.to_string(),
                    source,
                });
            },
        }
        if start.elapsed() > timeout {
            log::warn!("{program} exceeded {}s, killing it", timeout.as_secs());
            if let Err(e) = child.kill() {
                log::debug!("kill failed: {e}");
            }
            // Reap so no zombie outlives the run
            let _ = child.wait();
            return Err(ProcessError::TimedOut {
                program: program.to_string(),
                timeout,
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            if let Err(e) = pipe.read_to_end(&mut buf) {
                log::debug!("failed reading child output: {e}");
            }
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}
