use std::path::{Path, PathBuf};
use std::time::Duration;

use showcase_core::{Rasterizer, RasterizerStyle, ReportTool};

/// Configuration errors raised while reading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Tool locations and limits, loaded from environment variables.
///
/// All fields have defaults matching the layout of a pepper checkout and
/// the author's machine; override via the environment or a `.env` file.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowcaseConfig {
    /// Report tool executable; `None` means `<source>/src/pepper`.
    pub report_tool: Option<PathBuf>,
    /// Rasterizer executable.
    pub rasterizer: PathBuf,
    /// Rasterizer dialect; inferred from the executable name when `None`.
    pub rasterizer_style: Option<RasterizerStyle>,
    /// Root of the repositories the built-in tables analyze.
    pub repos_root: PathBuf,
    /// Per-invocation timeout; `None` waits indefinitely.
    pub tool_timeout: Option<Duration>,
}

impl ShowcaseConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default               |
    /// |------------------------------|-----------------------|
    /// | `SHOWCASE_REPORT_TOOL`       | `<source>/src/pepper` |
    /// | `SHOWCASE_RASTERIZER`        | `rsvg`                |
    /// | `SHOWCASE_RASTERIZER_STYLE`  | inferred              |
    /// | `SHOWCASE_REPOS_ROOT`        | `~/data/repos`        |
    /// | `SHOWCASE_TOOL_TIMEOUT_SECS` | unset (no timeout)    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable
    /// source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let report_tool = get("SHOWCASE_REPORT_TOOL").map(PathBuf::from);

        let rasterizer = get("SHOWCASE_RASTERIZER")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("rsvg"));

        let rasterizer_style = get("SHOWCASE_RASTERIZER_STYLE")
            .map(|value| {
                value.parse().map_err(|reason| ConfigError::Invalid {
                    var: "SHOWCASE_RASTERIZER_STYLE",
                    value,
                    reason,
                })
            })
            .transpose()?;

        let repos_root = get("SHOWCASE_REPOS_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join("data").join("repos"));

        let tool_timeout = match get("SHOWCASE_TOOL_TIMEOUT_SECS") {
            Some(value) => {
                let secs: u64 = value.trim().parse().map_err(|e| ConfigError::Invalid {
                    var: "SHOWCASE_TOOL_TIMEOUT_SECS",
                    reason: format!("{e}"),
                    value,
                })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            report_tool,
            rasterizer,
            rasterizer_style,
            repos_root,
            tool_timeout,
        })
    }

    pub fn report_tool(&self, source_dir: &Path) -> ReportTool {
        match &self.report_tool {
            Some(program) => ReportTool::with_program(source_dir, program),
            None => ReportTool::in_source_dir(source_dir),
        }
    }

    pub fn rasterizer(&self) -> Rasterizer {
        match self.rasterizer_style {
            Some(style) => Rasterizer::with_style(&self.rasterizer, style),
            None => Rasterizer::new(&self.rasterizer),
        }
    }
}
