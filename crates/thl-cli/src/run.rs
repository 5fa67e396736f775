//! One dataset run: resolve, fetch, decode, compact, write

use crate::cli::RunOptions;
use crate::fetch::Fetcher;
use crate::output::{datadate, keep_existing, OutputTarget, PartialFile};
use crate::settings::Settings;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use thl_compact::{run, Descriptor, RecordSink, RunSummary};
use thl_cube::Payload;

/// Result of a run that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Records were written
    Written {
        /// Destination
        target: OutputTarget,
        /// Pipeline counters
        summary: RunSummary,
    },
    /// A non-empty output file already existed and was left alone
    Kept(PathBuf),
}

/// Execute one dataset run
///
/// `today` anchors the as-of date so callers control the clock.
///
/// # Errors
/// Unknown dataset, transport, decode, merge or output failure. A file
/// target is removed when the run fails after creating it.
pub async fn execute(
    options: &RunOptions,
    settings: &Settings,
    today: NaiveDate,
) -> Result<Outcome> {
    let descriptor = thl_datasets::find(&options.dataset)?;
    let as_of = datadate(today, options.date_offset)
        .with_context(|| format!("date offset {} out of range", options.date_offset))?;

    let target = OutputTarget::resolve(
        options.stdout,
        options.output_file.clone(),
        &settings.output_dir,
        descriptor.name(),
        as_of,
    );
    if let OutputTarget::File(path) = &target {
        if keep_existing(path, options.overwrite) {
            return Ok(Outcome::Kept(path.clone()));
        }
    }

    let payload = load_payload(&descriptor, options, settings).await?;
    let datadate = as_of.to_string();

    let summary = match &target {
        OutputTarget::Stdout => {
            let stdout = BufWriter::new(io::stdout().lock());
            let mut sink = RecordSink::for_descriptor(stdout, &descriptor, datadate);
            let summary = run(&descriptor, &payload, &mut sink)?;
            sink.finish()?.flush()?;
            summary
        }
        OutputTarget::File(path) => {
            let file = PartialFile::create(path)
                .with_context(|| format!("cannot create {}", path.display()))?;
            let mut sink = RecordSink::for_descriptor(file, &descriptor, datadate);
            let summary = run(&descriptor, &payload, &mut sink)
                .with_context(|| format!("dataset {} failed", descriptor.name()))?;
            sink.finish()?
                .commit()
                .with_context(|| format!("cannot write {}", path.display()))?;
            summary
        }
    };

    Ok(Outcome::Written { target, summary })
}

async fn load_payload(
    descriptor: &Descriptor,
    options: &RunOptions,
    settings: &Settings,
) -> Result<Payload> {
    if let Some(path) = &options.input {
        tracing::info!(path = %path.display(), "reading local payload");
        return Payload::from_path(path)
            .with_context(|| format!("cannot load {}", path.display()));
    }

    let fetcher = Fetcher::new(settings)?;
    let body = fetcher.fetch(descriptor.url()).await?;
    Payload::from_slice(&body)
        .with_context(|| format!("malformed payload from {}", descriptor.url()))
}
