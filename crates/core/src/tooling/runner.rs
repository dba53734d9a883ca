//! Tool execution: the [`ToolRunner`] seam and its process-spawning
//! implementation.

use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::invocation::{ToolInvocation, ToolOutput};
use crate::error::ShowcaseError;

/// Maximum stdout or stderr size captured per stream (10 MiB).
const MAX_OUTPUT_BYTES: u64 = 10 * 1024 * 1024;

/// Runs external tools.
///
/// A non-zero exit is not an error at this level: it comes back as a
/// [`ToolOutput`] and the caller decides what to do with it. Errors are
/// reserved for the process never running to completion.
pub trait ToolRunner: Send + Sync {
    fn run(
        &self,
        invocation: &ToolInvocation,
    ) -> impl std::future::Future<Output = Result<ToolOutput, ShowcaseError>> + Send;
}

/// Spawns real child processes and waits for each to exit.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Runner that waits for every tool indefinitely.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill a tool that is still running after `timeout`.
    pub fn with_timeout(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl ToolRunner for SystemRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, ShowcaseError> {
        let program = invocation.program_name();

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        for (key, value) in &invocation.env_vars {
            cmd.env(key, value);
        }
        if let Some(dir) = &invocation.working_directory {
            cmd.current_dir(dir);
        }

        tracing::debug!(command = %invocation.display(), "Spawning tool");
        let start = Instant::now();

        let mut child = cmd.spawn().map_err(|source| ShowcaseError::Spawn {
            program: program.clone(),
            source,
        })?;

        // Drain the pipes concurrently so a chatty tool cannot block on a
        // full pipe while we wait for it.
        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();
        let stdout_task = tokio::spawn(async move { read_stream(stdout_handle).await });
        let stderr_task = tokio::spawn(async move { read_stream(stderr_handle).await });

        let status = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status?,
                Err(_elapsed) => {
                    // Dropping `child` kills the process (`kill_on_drop`).
                    return Err(ShowcaseError::Timeout {
                        program,
                        elapsed_ms: start.elapsed().as_millis() as u64,
                    });
                }
            },
            None => child.wait().await?,
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let stdout_bytes = stdout_task.await.unwrap_or_default();
        let stderr_bytes = stderr_task.await.unwrap_or_default();

        Ok(ToolOutput {
            exit_code: status.code(),
            stdout: String::from_utf8_lossy(&stdout_bytes).into_owned(),
            stderr: String::from_utf8_lossy(&stderr_bytes).into_owned(),
            duration_ms,
        })
    }
}

/// Read an output stream to EOF, keeping at most [`MAX_OUTPUT_BYTES`].
///
/// Bytes past the cap are discarded but still read, so the tool never
/// sees a closed pipe.
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h).take(MAX_OUTPUT_BYTES).read_to_end(&mut buf).await;
        let _ = tokio::io::copy(&mut h, &mut tokio::io::sink()).await;
    }
    buf
}
