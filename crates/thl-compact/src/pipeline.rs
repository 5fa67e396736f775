//! Decode, compact and write one payload

use crate::compactor::compact;
use crate::descriptor::Descriptor;
use crate::error::CompactResult;
use crate::sink::RecordSink;
use std::io::Write;
use thl_cube::{decode, Payload};

/// Counters for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Present cells decoded
    pub cells: usize,
    /// Groups formed, including suppressed ones
    pub groups: usize,
    /// Groups dropped by the anchor guard
    pub suppressed: usize,
    /// Records written
    pub records: usize,
}

/// Stream a payload through the descriptor into the sink
///
/// Stops at the first error. Records written before it stay in the sink.
///
/// # Errors
/// Decode, merge or output errors
pub fn run<W: Write>(
    descriptor: &Descriptor,
    payload: &Payload,
    sink: &mut RecordSink<W>,
) -> CompactResult<RunSummary> {
    let span = tracing::info_span!("compact", dataset = descriptor.name());
    let _guard = span.enter();

    let cells = decode(payload)?;
    let mut summary = RunSummary {
        cells: cells.len(),
        ..RunSummary::default()
    };

    let mut records = compact(cells, descriptor);
    for record in records.by_ref() {
        sink.write(record?)?;
        summary.records += 1;
    }
    summary.groups = records.groups();
    summary.suppressed = records.suppressed();

    tracing::info!(
        cells = summary.cells,
        records = summary.records,
        suppressed = summary.suppressed,
        "dataset compacted"
    );
    Ok(summary)
}
