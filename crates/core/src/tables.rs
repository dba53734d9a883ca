//! Repository and report tables.
//!
//! The tables are the whole configuration of a run: every repository is
//! combined with every report. They are built once at startup (either the
//! built-in set or a JSON file) and never mutated afterwards.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ShowcaseError;

/// A repository the report tool analyzes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryEntry {
    /// Identifier, also the suffix of every output file name.
    pub name: String,
    /// Repository location handed to the report tool as its last argument.
    pub directory: PathBuf,
    /// Branch to analyze.
    pub branch: String,
    /// Tag filter pattern; empty means no filter.
    #[serde(default)]
    pub tags: String,
    /// Most prolific committer, used by author-scoped reports.
    #[serde(default)]
    pub maintainer: Option<String>,
}

/// A report definition the report tool renders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportEntry {
    /// Report definition name, resolved under `<source>/reports/`.
    pub name: String,
    /// Basename (without `.svg`) the report tool writes.
    pub file: String,
    /// Extra arguments placed after `--output=`.
    #[serde(default)]
    pub options: Vec<String>,
    /// Pass `--author=<maintainer>` for the analyzed repository.
    #[serde(default)]
    pub author_option: bool,
}

impl ReportEntry {
    /// Report that takes no extra options.
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            options: Vec::new(),
            author_option: false,
        }
    }

    /// File name the report tool writes in its working directory.
    pub fn output_file_name(&self) -> String {
        format!("{}.svg", self.file)
    }

    /// File name of this report for `repo` inside the output directory.
    pub fn gallery_file_name(&self, repo: &RepositoryEntry) -> String {
        format!("{}-{}.svg", self.file, repo.name)
    }
}

/// The repository × report matrix for one run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tables {
    pub repositories: Vec<RepositoryEntry>,
    pub reports: Vec<ReportEntry>,
}

impl Tables {
    /// The gallery published on pepper's homepage.
    ///
    /// `pepper` analyzes its own checkout at `source_dir`; the other
    /// repositories live under `repos_root`.
    pub fn builtin(source_dir: &Path, repos_root: &Path) -> Self {
        let repo = |name: &str, directory: PathBuf, branch: &str, tags: &str| RepositoryEntry {
            name: name.to_string(),
            directory,
            branch: branch.to_string(),
            tags: tags.to_string(),
            maintainer: None,
        };

        Self {
            repositories: vec![
                repo("pepper", source_dir.to_path_buf(), "master", ""),
                repo("hg", repos_root.join("hg"), "default", "^[0-9].[0-9]$"),
                repo("git", repos_root.join("git"), "master", "^v[1-9].[4-9].[0-9]$"),
                repo("linux", repos_root.join("linux-2.6"), "master", "^v2.6.[0-9]*$"),
            ],
            reports: vec![
                ReportEntry::new("loc", "loc"),
                ReportEntry::new("authors", "authors"),
                ReportEntry::new("directories", "directories"),
                ReportEntry::new("commits_per_month", "cpm"),
            ],
        }
    }

    /// Parse tables from a JSON document.
    ///
    /// A leading `~/` in a repository directory expands to the home
    /// directory.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let mut tables: Tables = serde_json::from_str(json)?;
        for repo in &mut tables.repositories {
            repo.directory = expand_home(&repo.directory);
        }
        Ok(tables)
    }

    /// Read and parse a JSON tables file.
    pub async fn from_json_file(path: &Path) -> Result<Self, ShowcaseError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ShowcaseError::TablesFile {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&content).map_err(|source| ShowcaseError::TablesFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Number of report tool invocations a run performs.
    pub fn pair_count(&self) -> usize {
        self.repositories.len() * self.reports.len()
    }

    /// Check the tables before anything is spawned.
    pub fn validate(&self) -> Result<(), ShowcaseError> {
        let mut repo_names = HashSet::new();
        for repo in &self.repositories {
            if !is_safe_component(&repo.name) {
                return Err(invalid(format!(
                    "repository name {:?} is not usable in a file name",
                    repo.name
                )));
            }
            if !repo_names.insert(repo.name.as_str()) {
                return Err(invalid(format!("duplicate repository {:?}", repo.name)));
            }
        }

        let mut files = HashSet::new();
        for report in &self.reports {
            if report.name.is_empty() {
                return Err(invalid("report with empty name".to_string()));
            }
            if !is_safe_component(&report.file) {
                return Err(invalid(format!(
                    "report file {:?} is not usable in a file name",
                    report.file
                )));
            }
            if !files.insert(report.file.as_str()) {
                return Err(invalid(format!("duplicate report file {:?}", report.file)));
            }
            if report.author_option {
                if let Some(repo) = self.repositories.iter().find(|r| r.maintainer.is_none()) {
                    return Err(invalid(format!(
                        "report {:?} needs a maintainer but repository {:?} has none",
                        report.name, repo.name
                    )));
                }
            }
        }

        Ok(())
    }
}

fn invalid(message: String) -> ShowcaseError {
    ShowcaseError::InvalidTables(message)
}

/// A single file name component: non-empty, no separators, not `.`/`..`.
fn is_safe_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

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

    /// The built-in gallery is four repositories by four reports.
    #[test]
    fn builtin_tables_cover_sixteen_pairs() {
        let tables = Tables::builtin(Path::new("/src/pepper"), Path::new("/data/repos"));
        assert_eq!(tables.pair_count(), 16);
        assert!(tables.validate().is_ok());

        let pepper = &tables.repositories[0];
        assert_eq!(pepper.name, "pepper");
        assert_eq!(pepper.directory, PathBuf::from("/src/pepper"));
        assert_eq!(pepper.tags, "");

        let linux = &tables.repositories[3];
        assert_eq!(linux.directory, PathBuf::from("/data/repos/linux-2.6"));
        assert_eq!(linux.tags, "^v2.6.[0-9]*$");

        let cpm = &tables.reports[3];
        assert_eq!(cpm.name, "commits_per_month");
        assert_eq!(cpm.output_file_name(), "cpm.svg");
    }

    /// Gallery names are `<file>-<repo>.svg`.
    #[test]
    fn gallery_file_name_joins_report_and_repo() {
        let report = ReportEntry::new("loc", "loc");
        assert_eq!(report.gallery_file_name(&demo_repo()), "loc-demo.svg");
    }

    /// Omitted optional fields take their defaults.
    #[test]
    fn json_defaults_optional_fields() {
        let tables = Tables::from_json_str(
            r#"{
                "repositories": [
                    {"name": "demo", "directory": "/repos/demo", "branch": "main"}
                ],
                "reports": [{"name": "loc", "file": "loc"}]
            }"#,
        )
        .expect("parse tables");

        assert_eq!(tables.repositories, vec![demo_repo()]);
        assert_eq!(tables.reports, vec![ReportEntry::new("loc", "loc")]);
    }

    /// A leading `~` in a repository directory expands to the home directory.
    #[test]
    fn json_expands_home_directory() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let tables = Tables::from_json_str(
            r#"{
                "repositories": [
                    {"name": "hg", "directory": "~/data/repos/hg", "branch": "default"}
                ],
                "reports": []
            }"#,
        )
        .expect("parse tables");
        assert_eq!(tables.repositories[0].directory, home.join("data/repos/hg"));
    }

    /// `branch` is required in a tables file.
    #[test]
    fn json_rejects_missing_branch() {
        let result = Tables::from_json_str(
            r#"{"repositories": [{"name": "demo", "directory": "/x"}], "reports": []}"#,
        );
        assert!(result.is_err());
    }

    /// Two repositories with one name would overwrite each other's outputs.
    #[test]
    fn validate_rejects_duplicate_repositories() {
        let tables = Tables {
            repositories: vec![demo_repo(), demo_repo()],
            reports: vec![ReportEntry::new("loc", "loc")],
        };
        assert_matches!(tables.validate(), Err(ShowcaseError::InvalidTables(msg)) if msg.contains("duplicate"));
    }

    /// Two reports writing the same file are rejected.
    #[test]
    fn validate_rejects_duplicate_report_files() {
        let tables = Tables {
            repositories: vec![demo_repo()],
            reports: vec![ReportEntry::new("loc", "out"), ReportEntry::new("authors", "out")],
        };
        assert_matches!(tables.validate(), Err(ShowcaseError::InvalidTables(_)));
    }

    /// Names that would leave the output directory are rejected.
    #[test]
    fn validate_rejects_path_separators() {
        let mut repo = demo_repo();
        repo.name = "../escape".to_string();
        let tables = Tables {
            repositories: vec![repo],
            reports: vec![ReportEntry::new("loc", "loc")],
        };
        assert_matches!(tables.validate(), Err(ShowcaseError::InvalidTables(_)));

        let tables = Tables {
            repositories: vec![demo_repo()],
            reports: vec![ReportEntry::new("loc", "sub/loc")],
        };
        assert_matches!(tables.validate(), Err(ShowcaseError::InvalidTables(_)));
    }

    /// Author-scoped reports need a maintainer on every repository.
    #[test]
    fn validate_requires_maintainer_for_author_reports() {
        let mut participation = ReportEntry::new("participation", "participation");
        participation.author_option = true;

        let tables = Tables {
            repositories: vec![demo_repo()],
            reports: vec![participation.clone()],
        };
        assert_matches!(tables.validate(), Err(ShowcaseError::InvalidTables(msg)) if msg.contains("maintainer"));

        let mut repo = demo_repo();
        repo.maintainer = Some("Matt Mackall".to_string());
        let tables = Tables {
            repositories: vec![repo],
            reports: vec![participation],
        };
        assert!(tables.validate().is_ok());
    }

    /// An empty branch is handed through as `--branch=`.
    #[test]
    fn empty_branch_is_accepted() {
        let mut repo = demo_repo();
        repo.branch = String::new();
        let tables = Tables {
            repositories: vec![repo],
            reports: vec![ReportEntry::new("loc", "loc")],
        };
        assert!(tables.validate().is_ok());
    }

    /// Empty tables are valid and produce no pairs.
    #[test]
    fn empty_tables_are_valid() {
        let tables = Tables {
            repositories: vec![],
            reports: vec![],
        };
        assert!(tables.validate().is_ok());
        assert_eq!(tables.pair_count(), 0);
    }

    /// An unreadable tables file names its path.
    #[tokio::test]
    async fn missing_tables_file_is_reported() {
        let result = Tables::from_json_file(Path::new("/nonexistent/tables.json")).await;
        assert_matches!(result, Err(ShowcaseError::TablesFile { .. }));
    }

    /// Invalid JSON is a format error.
    #[tokio::test]
    async fn malformed_tables_file_is_reported() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("tables.json");
        std::fs::write(&path, "{ not json").expect("write tables");
        let result = Tables::from_json_file(&path).await;
        assert_matches!(result, Err(ShowcaseError::TablesFormat { .. }));
    }
}
