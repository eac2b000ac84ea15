//! Co-op Shortlist Scraper
//!
//! Logs into the job board, scrapes every posting on the shortlist
//! and saves them to shortlist.csv

use anyhow::{Context, Result};
use clap::Parser;
use common::export::JobWriter;
use shortlist_scraper::config::{Cli, Command, Settings};
use shortlist_scraper::credentials::{self, Bootstrap};
use shortlist_scraper::pipeline::{self, Outcome};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,reqwest=warn,html5ever=error".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Scrape) {
        Command::Scrape => scrape(&cli.settings),
        Command::Init => init(&cli.settings.credentials),
        Command::Parse { file } => parse(&file),
    }
}

fn scrape(settings: &Settings) -> Result<()> {
    println!("🔍 Starting shortlist scraper...\n");

    let outcome = pipeline::run(settings).context("Failed to scrape the shortlist")?;

    match outcome {
        Outcome::CredentialsCreated(path) => {
            println!(
                "📁 Created {}; fill in your username and password, then run again.",
                path.display()
            );
        }
        Outcome::Finished(summary) => {
            println!(
                "💾 Saved {} jobs to {:?}",
                summary.written, summary.output
            );
            if summary.skipped > 0 {
                println!("⚠️  Skipped {} postings that could not be read", summary.skipped);
            }
            println!("\n✨ Scraping complete!");
        }
    }
    Ok(())
}

fn init(path: &Path) -> Result<()> {
    match credentials::bootstrap(path).context("Failed to create the credentials file")? {
        Bootstrap::Created(path) => println!("📁 Created {}", path.display()),
        Bootstrap::Existing(path) => println!("✅ {} already exists, left untouched", path.display()),
    }
    Ok(())
}

fn parse(file: &Path) -> Result<()> {
    let job = pipeline::parse_saved_posting(file)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    println!("{job}\n");

    let mut writer = JobWriter::new(std::io::stdout()).context("Failed to write CSV")?;
    writer.write(&job).context("Failed to write CSV")?;
    writer.finish().context("Failed to write CSV")?;
    Ok(())
}
