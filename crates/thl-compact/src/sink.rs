//! Newline-delimited JSON output

use crate::descriptor::Descriptor;
use crate::error::CompactResult;
use crate::record::{WideRecord, DATADATE_FIELD, TYPE_FIELD};
use std::io::Write;

/// Writes wide records as one JSON object per line
///
/// Every record is stamped with the dataset's `type` and the run's
/// `datadate` before it is written; both overwrite same-named fields.
#[derive(Debug)]
pub struct RecordSink<W: Write> {
    writer: W,
    record_type: String,
    datadate: String,
    written: usize,
}

impl<W: Write> RecordSink<W> {
    /// Create sink over a writer
    pub fn new(writer: W, record_type: impl Into<String>, datadate: impl Into<String>) -> Self {
        Self {
            writer,
            record_type: record_type.into(),
            datadate: datadate.into(),
            written: 0,
        }
    }

    /// Create sink stamping the descriptor's record type
    pub fn for_descriptor(writer: W, descriptor: &Descriptor, datadate: impl Into<String>) -> Self {
        Self::new(writer, descriptor.record_type(), datadate)
    }

    /// Stamp and write one record
    ///
    /// # Errors
    /// Serialization or writer failure
    pub fn write(&mut self, mut record: WideRecord) -> CompactResult<()> {
        record.set(TYPE_FIELD, self.record_type.as_str());
        record.set(DATADATE_FIELD, self.datadate.as_str());
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Records written so far
    #[inline]
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and return the writer
    ///
    /// # Errors
    /// Writer flush failure
    pub fn finish(mut self) -> CompactResult<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
