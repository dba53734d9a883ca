//! External tool invocation layer.
//!
//! The orchestrator only ever talks to a [`ToolRunner`]; the production
//! [`SystemRunner`] spawns real processes while tests swap in a recording
//! fake.

pub mod invocation;
pub mod runner;

pub use invocation::{ToolInvocation, ToolOutput};
pub use runner::{SystemRunner, ToolRunner};
