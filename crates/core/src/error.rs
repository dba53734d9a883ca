use std::path::PathBuf;

/// Errors raised while generating the report gallery.
///
/// Every variant is fatal to the run: the orchestrator stops at the first
/// error and the binary maps it to a process exit code via
/// [`ShowcaseError::exit_code`].
#[derive(Debug, thiserror::Error)]
pub enum ShowcaseError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} failed (exit code {exit_code:?}): {stderr}")]
    ToolFailed {
        program: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("{program} timed out after {elapsed_ms}ms")]
    Timeout { program: String, elapsed_ms: u64 },

    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to scan {} for SVG files: {source}", .dir.display())]
    Scan {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tables: {0}")]
    InvalidTables(String),

    #[error("failed to read tables file {}: {source}", .path.display())]
    TablesFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed tables file {}: {source}", .path.display())]
    TablesFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShowcaseError {
    /// Process exit code for this error.
    ///
    /// A tool that exited non-zero hands its own code through; everything
    /// else (including a tool killed by a signal) maps to `1`.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ToolFailed {
                exit_code: Some(code),
                ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}
