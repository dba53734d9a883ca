//! `showcase` -- generates the example report gallery for pepper's homepage.
//!
//! Renders every built-in (or `--tables`) repository × report pair with
//! the pepper report tool, then rasterizes each SVG in the output directory
//! into `<name>.png` and `<name>-thumb.png`.
//!
//! # Environment variables
//!
//! | Variable                     | Default               | Description                      |
//! |------------------------------|-----------------------|----------------------------------|
//! | `SHOWCASE_REPORT_TOOL`       | `<source>/src/pepper` | Report tool executable           |
//! | `SHOWCASE_RASTERIZER`        | `rsvg`                | Rasterizer executable            |
//! | `SHOWCASE_RASTERIZER_STYLE`  | inferred              | `rsvg` or `rsvg-convert`         |
//! | `SHOWCASE_REPOS_ROOT`        | `~/data/repos`        | Root of the analyzed repositories|
//! | `SHOWCASE_TOOL_TIMEOUT_SECS` | unset                 | Kill a tool running longer       |

use showcase_cli::{Cli, ShowcaseConfig};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the progress lines.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "showcase=info,showcase_cli=info,showcase_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match Cli::try_parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) if !showcase_cli::is_usage_error(&err) => err.exit(),
        Err(err) => {
            println!("{}", showcase_cli::USAGE);
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    let config = ShowcaseConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    let mut stdout = std::io::stdout();
    if let Err(e) = showcase_cli::run(&cli, &config, &mut stdout).await {
        tracing::error!(error = %e, "Gallery generation failed");
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}
