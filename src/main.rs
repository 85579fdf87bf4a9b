//! Research a job candidate and print a dossier.
//!
//! Requires the `ANTHROPIC_API_KEY` environment variable and the `claude`
//! CLI (or another engine binary via `--engine-bin`).
//!
//! # Examples
//!
//! ```sh
//! candidate-research --url https://linkedin.com/in/someone
//! candidate-research --name "John Smith" --company "Acme Corp"
//! candidate-research --name "Jane Doe" --verbose --json
//! ```

use candidate_research::{Format, ResearchConfig, Researcher, Subject, render};
use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

/// AI-powered candidate research agent for hiring decisions.
#[derive(Parser)]
#[command(name = "candidate-research", version)]
struct Cli {
    // ── Candidate ──────────────────────────────────────────────
    /// LinkedIn profile URL
    #[arg(short, long)]
    url: Option<String>,

    /// Candidate name
    #[arg(short, long)]
    name: Option<String>,

    /// Current company (use with --name)
    #[arg(short, long)]
    company: Option<String>,

    // ── Output ─────────────────────────────────────────────────
    /// Show research progress on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Output raw JSON instead of markdown
    #[arg(long)]
    json: bool,

    // ── Engine ─────────────────────────────────────────────────
    /// Model for the research engine
    #[arg(long)]
    model: Option<String>,

    /// Maximum engine turns
    #[arg(long)]
    max_turns: Option<u32>,

    /// Research engine executable
    #[arg(long, env = "CANDIDATE_RESEARCH_ENGINE", default_value = "claude")]
    engine_bin: String,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn usage_error(message: &str) -> ! {
    eprintln!("Error: {message}");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  candidate-research --url https://linkedin.com/in/someone");
    eprintln!("  candidate-research --name \"John Smith\" --company \"Acme Corp\"");
    eprintln!("  candidate-research --name \"Jane Doe\"");
    process::exit(1);
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let subject = match Subject::new(cli.url, cli.name, cli.company) {
        Ok(subject) => subject,
        Err(_) => usage_error("Provide either --url or --name (with optional --company)"),
    };

    if std::env::var_os("ANTHROPIC_API_KEY").is_none() {
        eprintln!("Error: ANTHROPIC_API_KEY environment variable is required");
        eprintln!();
        eprintln!("Set it with:");
        eprintln!("  export ANTHROPIC_API_KEY=\"your-api-key\"");
        process::exit(1);
    }

    let mut config = ResearchConfig::new()
        .engine_bin(cli.engine_bin)
        .verbose(cli.verbose);
    if let Some(model) = cli.model {
        config = config.model(model);
    }
    if let Some(max_turns) = cli.max_turns {
        config = config.max_turns(max_turns);
    }

    tracing::info!(?subject, "Starting candidate research...");

    let researcher = Researcher::new(config);
    let record = match researcher.run(&subject).await {
        Ok(record) => record,
        Err(e) => {
            eprintln!("Error during research: {e}");
            process::exit(1);
        }
    };

    let format = if cli.json {
        Format::Json
    } else {
        Format::Markdown
    };
    match render(&record, format) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error rendering report: {e}");
            process::exit(1);
        }
    }
}
