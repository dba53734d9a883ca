//! `showcase` library crate.
//!
//! Turns parsed arguments and environment configuration into a
//! [`RunPlan`] and runs it. The binary entrypoint lives in `main.rs`.

pub mod args;
pub mod config;

use std::io::Write;

use showcase_core::{Orchestrator, RunPlan, RunSummary, ShowcaseError, SystemRunner, Tables};

pub use args::{is_usage_error, Cli, USAGE};
pub use config::{ConfigError, ShowcaseConfig};

/// Errors that end a CLI run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Showcase(#[from] ShowcaseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Process exit code: a failing tool's own code, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Showcase(err) => err.exit_code(),
            _ => 1,
        }
    }
}

/// Resolve the tables and tool locations for a run.
///
/// The report tool writes into the current directory, which becomes the
/// plan's work dir.
pub async fn build_plan(cli: &Cli, config: &ShowcaseConfig) -> Result<RunPlan, CliError> {
    let tables = match &cli.tables {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading tables file");
            Tables::from_json_file(path).await?
        }
        None => Tables::builtin(&cli.source_dir, &config.repos_root),
    };

    Ok(RunPlan {
        source_dir: cli.source_dir.clone(),
        output_dir: cli.output_dir.clone(),
        work_dir: std::env::current_dir()?,
        report_tool: config.report_tool(&cli.source_dir),
        rasterizer: config.rasterizer(),
        tables,
        skip_reports: cli.skip_reports,
        skip_thumbnails: cli.skip_thumbnails,
    })
}

/// Run the whole gallery generation, writing progress to `progress`.
pub async fn run<W: Write + Send>(
    cli: &Cli,
    config: &ShowcaseConfig,
    progress: &mut W,
) -> Result<RunSummary, CliError> {
    let plan = build_plan(cli, config).await?;

    tracing::info!(
        source_dir = %plan.source_dir.display(),
        output_dir = %plan.output_dir.display(),
        report_tool = %plan.report_tool.program.display(),
        rasterizer = %plan.rasterizer.program.display(),
        pairs = plan.tables.pair_count(),
        "Starting gallery generation",
    );

    let runner = SystemRunner::with_timeout(config.tool_timeout);
    let summary = Orchestrator::new(plan, runner).run(progress).await?;
    progress.flush()?;
    Ok(summary)
}
