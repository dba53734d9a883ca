//! Command-line argument definitions.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

/// Printed on stdout when the positional arguments are missing or invalid.
pub const USAGE: &str = "Usage: showcase <source-directory> <output-directory>";

/// showcase - generate pepper's example report gallery.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "showcase", version, about, long_about = None)]
pub struct Cli {
    /// pepper source checkout holding `src/pepper` and `reports/`.
    pub source_dir: PathBuf,

    /// Directory receiving the SVGs and PNGs.
    pub output_dir: PathBuf,

    /// JSON file replacing the built-in repository and report tables.
    #[arg(long)]
    pub tables: Option<PathBuf>,

    /// Only rasterize the SVGs already in the output directory.
    #[arg(long)]
    pub skip_reports: bool,

    /// Only generate the SVG reports.
    #[arg(long)]
    pub skip_thumbnails: bool,
}

impl Cli {
    /// Parse arguments (including the program name) without exiting.
    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::try_parse_from(args)
    }
}

/// Whether `err` is a real argument error rather than a `--help` or
/// `--version` request.
pub fn is_usage_error(err: &clap::Error) -> bool {
    !matches!(
        err.kind(),
        ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two positionals are all a run needs.
    #[test]
    fn parses_two_positionals() {
        let cli = Cli::try_parse_args(["showcase", "/src", "/out"]).expect("parse");
        assert_eq!(cli.source_dir, PathBuf::from("/src"));
        assert_eq!(cli.output_dir, PathBuf::from("/out"));
        assert_eq!(cli.tables, None);
        assert!(!cli.skip_reports);
        assert!(!cli.skip_thumbnails);
    }

    /// Flags may come before the positionals.
    #[test]
    fn parses_optional_flags() {
        let cli = Cli::try_parse_args([
            "showcase",
            "--tables",
            "gallery.json",
            "--skip-thumbnails",
            "/src",
            "/out",
        ])
        .expect("parse");
        assert_eq!(cli.tables, Some(PathBuf::from("gallery.json")));
        assert!(cli.skip_thumbnails);
    }

    /// Zero or one positional is a usage error.
    #[test]
    fn missing_arguments_are_usage_errors() {
        let err = Cli::try_parse_args(["showcase"]).expect_err("no args");
        assert!(is_usage_error(&err));

        let err = Cli::try_parse_args(["showcase", "/src"]).expect_err("one arg");
        assert!(is_usage_error(&err));
    }

    /// `--help` keeps clap's own output and exit code.
    #[test]
    fn help_is_not_a_usage_error() {
        let err = Cli::try_parse_args(["showcase", "--help"]).expect_err("help");
        assert!(!is_usage_error(&err));
    }
}
