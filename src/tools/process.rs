//! Process runner backed by tokio.

use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use super::{ProcessOutput, ProcessRunner, RunError};

/// Runs real processes with a hard timeout.
///
/// Each call spins up a current-thread runtime; a child that outlives the
/// timeout is killed when its handle is dropped. Called from inside an
/// existing tokio runtime, the call moves to a scoped helper thread, since
/// a runtime cannot block on another runtime's thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(
        &self,
        program: &Path,
        args: &[String],
        timeout: Duration,
    ) -> Result<ProcessOutput, RunError> {
        if tokio::runtime::Handle::try_current().is_err() {
            return run_blocking(program, args, timeout);
        }

        std::thread::scope(|scope| {
            scope
                .spawn(|| run_blocking(program, args, timeout))
                .join()
                .unwrap_or_else(|_| {
                    Err(RunError::Io(io::Error::new(
                        io::ErrorKind::Other,
                        "process runner thread panicked",
                    )))
                })
        })
    }
}

fn run_blocking(
    program: &Path,
    args: &[String],
    timeout: Duration,
) -> Result<ProcessOutput, RunError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    RunError::NotFound(program.display().to_string())
                } else {
                    RunError::Io(e)
                }
            })?;

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| RunError::Timeout(timeout))??;

        Ok::<_, RunError>(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    })
}
