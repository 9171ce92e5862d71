//! jira-epic CLI - file JSON stories and their sub-tasks under a Jira epic.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jira_epic::{report, Config, EpicClient, JiraClient, Outcome, Story};

/// Create Jira stories and sub-tasks from JSON story files.
///
/// Credentials and targets come from the environment (or a `.env` file):
/// `JIRA_EMAIL`, `JIRA_TOKEN`, `JIRA_ID`, `JIRA_HOST`, `JIRA_PROJECT`,
/// `JIRA_EPIC_KEY` and optionally `JIRA_TIMEOUT_SECS`.
#[derive(Parser)]
#[command(name = "jira-epic", version)]
struct Cli {
    /// Story files to create, in order.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output format for the creation report.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let directive = if verbose {
        "jira_epic=debug"
    } else {
        "jira_epic=info"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();
    Ok(())
}

/// Returns whether every story and task was created.
async fn run(cli: Cli) -> Result<bool> {
    // Parse everything up front so a bad file never leaves a half-filed batch.
    let stories = load_stories(&cli.files)?;

    if dotenvy::dotenv().is_ok() {
        info!("Loaded .env");
    }
    let config = Config::from_env().context("Failed to load Jira configuration")?;
    info!(project = %config.project, epic = %config.epic_key, "Configuration loaded");

    let tracker = JiraClient::new(&config).context("Failed to build Jira client")?;
    let epic = EpicClient::connect(config, tracker)
        .await
        .context("Failed to connect to Jira")?;

    let batch = epic.create_stories(&stories).await;

    match cli.format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&batch)?),
        Format::Text => {
            if !std::io::stdout().is_terminal() {
                colored::control::set_override(false);
            }
            print!("{}", report::render_text_with(&batch.results, styled));
        }
    }

    if let Some(e) = &batch.aborted {
        error!(error = %e, "Batch aborted; later stories were not attempted");
    }
    Ok(batch.is_complete())
}

fn load_stories(files: &[PathBuf]) -> Result<Vec<Story>> {
    let mut stories = Vec::with_capacity(files.len());
    let mut failures = 0;

    for path in files {
        match Story::from_json_file(path) {
            Ok(story) => stories.push(story),
            Err(e) => {
                error!(file = %path.display(), error = %e, "Invalid story file");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} story files could not be loaded", files.len());
    }
    Ok(stories)
}

fn styled(summary: &str, outcome: &Outcome) -> String {
    match outcome {
        Outcome::Created { key } => format!("{} {} {summary}", "✓".green(), key.cyan()),
        Outcome::Failed { reason } => format!("{} {summary}: {}", "✗".red(), reason.red()),
    }
}
