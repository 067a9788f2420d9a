//! Append-only CSV result storage.
//!
//! One row per processed URL, written as soon as that URL's worker finishes,
//! so partial progress survives a crash. The file is opened in append mode:
//! repeated runs accumulate rows, nothing is ever rewritten. No header row;
//! columns are url, nav_logo_url, nav_svg_logo, logo_url, image_file_name.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// The flattened, persisted form of one URL's selection result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRow {
    pub url: String,
    pub nav_logo_url: String,
    pub nav_svg_logo: String,
    pub logo_url: String,
    pub image_file_name: String,
}

pub struct ResultSink {
    writer: csv::Writer<File>,
    path: PathBuf,
    count: usize,
}

impl ResultSink {
    /// Open the results file for appending, creating it (and its parent
    /// directory) if missing.
    pub fn append_to(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open results file: {}", path.display()))?;

        Ok(Self {
            writer: WriterBuilder::new().has_headers(false).from_writer(file),
            path: path.to_path_buf(),
            count: 0,
        })
    }

    /// Append a single row and flush immediately. A crash after this call
    /// returns loses nothing already appended.
    pub fn append_one(&mut self, row: &ResultRow) -> Result<()> {
        self.writer
            .write_record([
                &row.url,
                &row.nav_logo_url,
                &row.nav_svg_logo,
                &row.logo_url,
                &row.image_file_name,
            ])
            .with_context(|| format!("Failed to write result row for {}", row.url))?;
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush results file: {}", self.path.display()))?;
        self.count += 1;
        Ok(())
    }

    /// Rows written through this sink instance (not rows already in the file).
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
