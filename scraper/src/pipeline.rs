//! One scraping run: credentials, login, shortlist, postings, CSV.

use crate::config::Settings;
use crate::credentials::{self, Bootstrap};
use crate::error::Result;
use crate::posting::parse_posting;
use crate::session::Session;
use crate::shortlist::{self, ShortlistEntry};
use common::export::JobWriter;
use common::Job;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub skipped: usize,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The credentials file did not exist; a placeholder was written instead of scraping.
    CredentialsCreated(PathBuf),
    Finished(RunSummary),
}

pub fn run(settings: &Settings) -> Result<Outcome> {
    if let Bootstrap::Created(path) = credentials::bootstrap(&settings.credentials)? {
        return Ok(Outcome::CredentialsCreated(path));
    }
    let credentials = credentials::load(&settings.credentials, &settings.domain)?;

    let session = Session::new(settings, credentials)?;
    session.login()?;

    let page = session.open_shortlist()?;
    let entries = shortlist::job_links(&page.html, &page.url);
    tracing::info!(count = entries.len(), "Found shortlisted postings");

    let mut writer = JobWriter::create(&settings.output)?;
    let bar = progress_bar(entries.len() as u64);
    let mut skipped = 0;

    for entry in &entries {
        bar.set_message(entry.label.clone());

        match scrape_entry(&session, entry) {
            Ok(job) => {
                writer.write(&job)?;
                if settings.print {
                    bar.println(job.to_string());
                }
            }
            Err(e) => {
                skipped += 1;
                bar.suspend(|| {
                    tracing::warn!(posting = %entry.label, link = %entry.link, error = %e, "Skipping posting")
                });
            }
        }

        bar.inc(1);
    }
    bar.finish_and_clear();

    let written = writer.rows();
    writer.finish()?;
    tracing::info!(written, skipped, output = %settings.output.display(), "Shortlist exported");

    Ok(Outcome::Finished(RunSummary {
        written,
        skipped,
        output: settings.output.clone(),
    }))
}

fn scrape_entry(session: &Session, entry: &ShortlistEntry) -> Result<Job> {
    let page = session.follow(&entry.link)?;
    parse_posting(&page.html, &entry.link.to_string())
}

/// Parses a posting page saved to disk; the file path stands in for the link.
pub fn parse_saved_posting(path: &Path) -> Result<Job> {
    let html = fs::read_to_string(path)?;
    parse_posting(&html, &path.display().to_string())
}

fn progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("Scraping jobs [{bar:40.green/dim}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░");
    pb.set_style(style);
    pb
}
