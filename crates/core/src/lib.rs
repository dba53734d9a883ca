//! Report gallery generation for pepper.
//!
//! Drives the `pepper` report tool over a fixed repository × report matrix,
//! collects the rendered SVGs into one directory and rasterizes each of them
//! into a full-size PNG and a thumbnail. All process management goes through
//! the [`tooling::ToolRunner`] seam so the orchestration can be tested
//! without the real tools installed.

pub mod error;
pub mod orchestrator;
pub mod rasterizer;
pub mod report_tool;
pub mod tables;
pub mod tooling;

pub use error::ShowcaseError;
pub use orchestrator::{Orchestrator, RunPlan, RunSummary};
pub use rasterizer::{Rasterizer, RasterizerStyle};
pub use report_tool::ReportTool;
pub use tables::{ReportEntry, RepositoryEntry, Tables};
pub use tooling::{SystemRunner, ToolInvocation, ToolOutput, ToolRunner};
