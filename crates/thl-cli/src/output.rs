//! Output destinations and the existing-file policy

use chrono::{NaiveDate, TimeDelta};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Where records are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Standard output
    Stdout,
    /// A file path
    File(PathBuf),
}

impl OutputTarget {
    /// Pick the destination from command-line choices
    ///
    /// `--stdout` wins over an explicit file; without either the file is
    /// `<output_dir>/<dataset>-YYYYMMDD.json`.
    #[must_use]
    pub fn resolve(
        stdout: bool,
        output_file: Option<PathBuf>,
        output_dir: &Path,
        dataset: &str,
        datadate: NaiveDate,
    ) -> Self {
        if stdout {
            return Self::Stdout;
        }
        Self::File(
            output_file.unwrap_or_else(|| output_dir.join(default_filename(dataset, datadate))),
        )
    }
}

/// As-of date: `today` moved back by `offset` days
///
/// Returns `None` if the offset leaves the calendar range.
#[must_use]
pub fn datadate(today: NaiveDate, offset: i64) -> Option<NaiveDate> {
    today.checked_sub_signed(TimeDelta::try_days(offset)?)
}

/// `<dataset>-YYYYMMDD.json`
#[must_use]
pub fn default_filename(dataset: &str, datadate: NaiveDate) -> String {
    format!("{dataset}-{}.json", datadate.format("%Y%m%d"))
}

/// Check whether an earlier run's output must be left alone
///
/// A missing or empty file is always replaced.
#[must_use]
pub fn keep_existing(path: &Path, overwrite: bool) -> bool {
    !overwrite && std::fs::metadata(path).is_ok_and(|meta| meta.len() > 0)
}

/// Output file that is removed unless committed
///
/// Dropping it uncommitted (a failed run) deletes the file, so truncated
/// output never sits next to complete files.
#[derive(Debug)]
pub struct PartialFile {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl PartialFile {
    /// Create or truncate the file
    ///
    /// # Errors
    /// File creation failure
    pub fn create(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = File::create(&path)?;
        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    /// Path being written
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and keep the file
    ///
    /// # Errors
    /// Flush failure; the file is removed in that case
    pub fn commit(mut self) -> io::Result<PathBuf> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        self.writer = None;
        Ok(std::mem::take(&mut self.path))
    }

    fn writer(&mut self) -> io::Result<&mut BufWriter<File>> {
        self.writer
            .as_mut()
            .ok_or_else(|| io::Error::other("output file already committed"))
    }
}

impl Write for PartialFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer()?.flush()
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.writer.take().is_some() {
            let path = self.path.display();
            match std::fs::remove_file(&self.path) {
                Ok(()) => tracing::warn!(path = %path, "incomplete output removed"),
                Err(err) => tracing::warn!(path = %path, %err, "cannot remove incomplete output"),
            }
        }
    }
}
