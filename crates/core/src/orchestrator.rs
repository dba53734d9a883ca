//! Gallery generation: reports first, thumbnails second.
//!
//! Everything runs strictly in sequence. Each tool call is awaited and its
//! exit status checked before the next step starts; the first failure ends
//! the run (no retries, no skip-and-continue).

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::ShowcaseError;
use crate::rasterizer::{Rasterizer, RENDITIONS};
use crate::report_tool::ReportTool;
use crate::tables::Tables;
use crate::tooling::{ToolInvocation, ToolOutput, ToolRunner};

/// Everything a run needs, fixed at startup.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Checkout holding the report tool and its report definitions.
    pub source_dir: PathBuf,
    /// Directory receiving the gallery SVGs and PNGs.
    pub output_dir: PathBuf,
    /// Directory the report tool writes into before the rename.
    pub work_dir: PathBuf,
    pub report_tool: ReportTool,
    pub rasterizer: Rasterizer,
    pub tables: Tables,
    pub skip_reports: bool,
    pub skip_thumbnails: bool,
}

/// What a completed run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub svgs: Vec<PathBuf>,
    pub pngs: Vec<PathBuf>,
}

pub struct Orchestrator<R> {
    plan: RunPlan,
    runner: R,
}

impl<R: ToolRunner> Orchestrator<R> {
    pub fn new(plan: RunPlan, runner: R) -> Self {
        Self { plan, runner }
    }

    /// Generate reports, then thumbnails, writing progress lines to
    /// `progress`.
    pub async fn run<W: Write + Send>(
        &self,
        progress: &mut W,
    ) -> Result<RunSummary, ShowcaseError> {
        let mut summary = RunSummary::default();
        if self.plan.skip_reports {
            tracing::info!("Skipping report generation");
        } else {
            summary.svgs = self.generate_reports(progress).await?;
        }

        if self.plan.skip_thumbnails {
            tracing::info!("Skipping thumbnail generation");
        } else {
            summary.pngs = self.generate_thumbnails(progress).await?;
        }

        tracing::info!(
            svgs = summary.svgs.len(),
            pngs = summary.pngs.len(),
            "Gallery generation complete",
        );
        Ok(summary)
    }

    /// Render every repository × report pair and move each SVG into the
    /// output directory as `<file>-<repo>.svg`.
    pub async fn generate_reports<W: Write + Send>(
        &self,
        progress: &mut W,
    ) -> Result<Vec<PathBuf>, ShowcaseError> {
        let tables = &self.plan.tables;
        tables.validate()?;

        tracing::info!(
            repositories = tables.repositories.len(),
            reports = tables.reports.len(),
            output_dir = %self.plan.output_dir.display(),
            "Generating reports",
        );

        let mut produced = Vec::with_capacity(tables.pair_count());
        for repo in &tables.repositories {
            writeln!(progress, ">> Generating reports for {}", repo.name)?;
            for report in &tables.reports {
                writeln!(progress, ">>> {}", report.name)?;

                let inv = self.plan.report_tool.invocation(repo, report, &self.plan.work_dir);
                self.run_checked(&inv).await?;

                let from = self.plan.work_dir.join(report.output_file_name());
                let to = self.plan.output_dir.join(report.gallery_file_name(repo));
                move_into_gallery(&from, &to).await?;

                tracing::info!(
                    repo = %repo.name,
                    report = %report.name,
                    path = %to.display(),
                    "Report generated",
                );
                produced.push(to);
            }
        }

        Ok(produced)
    }

    /// Rasterize every SVG currently in the output directory into a
    /// full-size PNG and a thumbnail.
    pub async fn generate_thumbnails<W: Write + Send>(
        &self,
        progress: &mut W,
    ) -> Result<Vec<PathBuf>, ShowcaseError> {
        writeln!(progress, ">> Generating thumbnails")?;

        let svgs = scan_svgs(&self.plan.output_dir).await?;
        tracing::info!(count = svgs.len(), "Generating thumbnails");

        let mut produced = Vec::with_capacity(svgs.len() * RENDITIONS.len());
        for svg in &svgs {
            let name = svg.file_name().unwrap_or(svg.as_os_str()).to_string_lossy();
            writeln!(progress, ">>> {name}")?;

            for rendition in &RENDITIONS {
                let inv = self.plan.rasterizer.invocation(svg, rendition);
                self.run_checked(&inv).await?;
                produced.push(rendition.output_path(svg));
            }
        }

        Ok(produced)
    }

    /// Run `inv` and turn a non-zero exit into [`ShowcaseError::ToolFailed`].
    async fn run_checked(&self, inv: &ToolInvocation) -> Result<ToolOutput, ShowcaseError> {
        let output = self.runner.run(inv).await?;

        if !output.stdout.trim().is_empty() {
            tracing::debug!(
                program = %inv.program_name(),
                stdout = %output.stdout.trim(),
                "Tool output",
            );
        }

        if output.success() {
            if !output.stderr.trim().is_empty() {
                tracing::warn!(
                    program = %inv.program_name(),
                    stderr = %output.stderr.trim(),
                    "Tool succeeded with diagnostics on stderr",
                );
            }
            tracing::debug!(
                program = %inv.program_name(),
                elapsed_ms = output.duration_ms,
                "Tool finished",
            );
            return Ok(output);
        }

        tracing::error!(
            command = %inv.display(),
            exit_code = ?output.exit_code,
            stderr = %output.stderr.trim(),
            "Tool failed",
        );
        Err(ShowcaseError::ToolFailed {
            program: inv.program_name(),
            exit_code: output.exit_code,
            stderr: output.stderr.trim().to_string(),
        })
    }
}

/// Move a freshly rendered SVG to its gallery name.
///
/// A plain rename: the destination either keeps its old content or gets the
/// complete new file, never a partial one.
async fn move_into_gallery(from: &Path, to: &Path) -> Result<(), ShowcaseError> {
    tokio::fs::rename(from, to)
        .await
        .map_err(|source| ShowcaseError::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })
}

/// List the `*.svg` files directly inside `dir`, sorted by path.
///
/// Matches like a shell glob: dotfiles are skipped and the extension must
/// be exactly `svg`. Only regular files (or links to them) are returned.
pub async fn scan_svgs(dir: &Path) -> Result<Vec<PathBuf>, ShowcaseError> {
    let scan_err = |source| ShowcaseError::Scan {
        dir: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(scan_err)?;
    let mut svgs = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(scan_err)? {
        let path = entry.path();
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        let is_svg = path.extension().is_some_and(|ext| ext == "svg");
        if hidden || !is_svg {
            continue;
        }
        let is_file = tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        if is_file {
            svgs.push(path);
        }
    }

    svgs.sort();
    Ok(svgs)
}
