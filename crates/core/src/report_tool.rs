//! Command builder for the `pepper` report tool.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::tables::{ReportEntry, RepositoryEntry};
use crate::tooling::ToolInvocation;

/// Environment variable pepper consults to find report definitions.
pub const REPORTS_ENV_VAR: &str = "PEPPER_REPORTS";

/// The report tool and the source checkout it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTool {
    /// Report tool executable.
    pub program: PathBuf,
    /// Source checkout holding the `reports/` definitions.
    pub source_dir: PathBuf,
}

impl ReportTool {
    /// Tool built inside `source_dir`, at `<source>/src/pepper`.
    pub fn in_source_dir(source_dir: &Path) -> Self {
        Self {
            program: source_dir.join("src").join("pepper"),
            source_dir: source_dir.to_path_buf(),
        }
    }

    pub fn with_program(source_dir: &Path, program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            source_dir: source_dir.to_path_buf(),
        }
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.source_dir.join("reports")
    }

    /// Path of the definition for `report`.
    pub fn definition_path(&self, report: &ReportEntry) -> PathBuf {
        self.reports_dir().join(&report.name)
    }

    /// Build the call that renders `report` for `repo` into
    /// `<work_dir>/<report.file>.svg`.
    ///
    /// The output path is passed relative so the tool writes into its
    /// working directory. Tables are validated before this is called, so an
    /// author-scoped report always finds a maintainer.
    pub fn invocation(
        &self,
        repo: &RepositoryEntry,
        report: &ReportEntry,
        work_dir: &Path,
    ) -> ToolInvocation {
        let mut inv = ToolInvocation::new(&self.program)
            .arg("--quiet")
            .arg(self.definition_path(report))
            .arg(format!("--branch={}", repo.branch))
            .arg(format!("--tags={}", repo.tags))
            .arg(format!("--output={}", report.output_file_name()))
            .args(&report.options);

        if report.author_option {
            if let Some(maintainer) = &repo.maintainer {
                inv = inv.arg(format!("--author={maintainer}"));
            }
        }

        inv.arg(OsString::from(repo.directory.as_os_str()))
            .current_dir(work_dir)
            .env(REPORTS_ENV_VAR, self.reports_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_repo() -> RepositoryEntry {
        RepositoryEntry {
            name: "demo".to_string(),
            directory: PathBuf::from("/repos/demo"),
            branch: "main".to_string(),
            tags: String::new(),
            maintainer: None,
        }
    }

    fn args(inv: &ToolInvocation) -> Vec<String> {
        inv.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// The default report tool and its definitions live in the source checkout.
    #[test]
    fn default_program_lives_in_source_tree() {
        let tool = ReportTool::in_source_dir(Path::new("/src"));
        assert_eq!(tool.program, PathBuf::from("/src/src/pepper"));
        assert_eq!(tool.reports_dir(), PathBuf::from("/src/reports"));
    }

    /// One pair produces the full pepper command line, directory and environment.
    #[test]
    fn builds_argument_list_for_pair() {
        let tool = ReportTool::in_source_dir(Path::new("/src"));
        let inv = tool.invocation(&demo_repo(), &ReportEntry::new("loc", "loc"), Path::new("/work"));

        assert_eq!(
            args(&inv),
            vec![
                "--quiet",
                "/src/reports/loc",
                "--branch=main",
                "--tags=",
                "--output=loc.svg",
                "/repos/demo",
            ]
        );
        assert_eq!(inv.working_directory, Some(PathBuf::from("/work")));
        assert_eq!(
            inv.env_vars,
            vec![(REPORTS_ENV_VAR.to_string(), OsString::from("/src/reports"))]
        );
    }

    /// An empty branch becomes a bare `--branch=`.
    #[test]
    fn empty_branch_is_passed_through() {
        let tool = ReportTool::in_source_dir(Path::new("/src"));
        let mut repo = demo_repo();
        repo.branch = String::new();
        let inv = tool.invocation(&repo, &ReportEntry::new("loc", "loc"), Path::new("/work"));
        assert_eq!(args(&inv)[2], "--branch=");
    }

    /// The definition path uses the report name, the output uses its file.
    #[test]
    fn definition_uses_report_name_and_output_uses_file() {
        let tool = ReportTool::in_source_dir(Path::new("/src"));
        let mut repo = demo_repo();
        repo.tags = "^v2.6.[0-9]*$".to_string();
        let inv = tool.invocation(
            &repo,
            &ReportEntry::new("commits_per_month", "cpm"),
            Path::new("/work"),
        );

        let args = args(&inv);
        assert_eq!(args[1], "/src/reports/commits_per_month");
        assert_eq!(args[3], "--tags=^v2.6.[0-9]*$");
        assert_eq!(args[4], "--output=cpm.svg");
    }

    /// Report options and `--author` sit between `--output=` and the repository.
    #[test]
    fn extra_options_and_author_precede_repository() {
        let tool = ReportTool::with_program(Path::new("/src"), "pepper");
        let mut repo = demo_repo();
        repo.maintainer = Some("Junio C Hamano".to_string());
        let report = ReportEntry {
            name: "participation".to_string(),
            file: "participation".to_string(),
            options: vec!["--split=directories".to_string()],
            author_option: true,
        };

        let inv = tool.invocation(&repo, &report, Path::new("/work"));
        let args = args(&inv);
        assert_eq!(inv.program, PathBuf::from("pepper"));
        assert_eq!(
            &args[5..],
            &["--split=directories", "--author=Junio C Hamano", "/repos/demo"]
        );
    }
}
