//! CSV export of scraped jobs.
//!
//! The header row is written as soon as the writer is created so that an
//! empty shortlist still produces a well-formed file, and rows are appended
//! one posting at a time while the scrape is in progress.

use crate::Job;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

pub struct JobWriter<W: Write> {
    inner: csv::Writer<W>,
    rows: usize,
}

impl JobWriter<File> {
    /// Creates (or truncates) the output file and writes the header row.
    pub fn create(path: impl AsRef<Path>) -> csv::Result<Self> {
        let file = File::create(path)?;
        Self::new(file)
    }
}

impl<W: Write> JobWriter<W> {
    pub fn new(writer: W) -> csv::Result<Self> {
        // Headers come from `Job::CSV_HEADERS`, not from the first serialized row.
        let mut inner = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        inner.write_record(Job::CSV_HEADERS)?;
        Ok(Self { inner, rows: 0 })
    }

    /// Appends one row and flushes, so an interrupted run keeps what it scraped.
    pub fn write(&mut self, job: &Job) -> csv::Result<()> {
        self.inner.serialize(job)?;
        self.inner.flush()?;
        self.rows += 1;
        Ok(())
    }

    /// Number of job rows written so far (header excluded).
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(mut self) -> csv::Result<W> {
        self.inner.flush()?;
        self.inner
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }
}

/// Reads back a CSV written by [`JobWriter`].
pub fn read_jobs<R: Read>(reader: R) -> csv::Result<Vec<Job>> {
    csv::Reader::from_reader(reader).deserialize().collect()
}
