//! Group-merge compaction of decoded pivot cells
//!
//! Decoded cells are narrow: one value per record. Consumers want one record
//! per entity (per area, per week, per area and dose). This crate folds runs
//! of narrow records that share a group key into wide records and writes
//! them as newline-delimited JSON.
//!
//! # Core Concepts
//!
//! - [`Descriptor`]: Per-dataset renames, group key, anchor and merge policy
//! - [`MergePolicy`]: How one narrow record lands in the wide record
//! - [`Coercion`]: Raw cell string to typed [`FieldValue`]
//! - [`compact`]: Lazy stream of [`WideRecord`]s, flushed on key change and at end
//! - [`RecordSink`]: NDJSON writer stamping `type` and `datadate`
//!
//! # Example
//!
//! ```rust,ignore
//! use thl_compact::{run, RecordSink};
//!
//! let mut sink = RecordSink::for_descriptor(std::io::stdout(), &descriptor, "2020-05-01");
//! let summary = run(&descriptor, &payload, &mut sink)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod coerce;
mod compactor;
mod descriptor;
mod error;
mod pipeline;
mod policy;
mod record;
mod sink;
mod template;
mod value;

pub use coerce::{Coercion, MISSING};
pub use compactor::{compact, Compactor};
pub use descriptor::{Descriptor, DescriptorBuilder, KeyField, RenameTable};
pub use error::{CoercionFailure, CompactError, CompactResult, ErrorKind};
pub use pipeline::{run, RunSummary};
pub use policy::{CopyFields, Marginals, MeasureTable, MergePolicy, Merged, Pivot, SkipWhen};
pub use record::{WideRecord, DATADATE_FIELD, TYPE_FIELD};
pub use sink::RecordSink;
pub use template::FieldTemplate;
pub use value::FieldValue;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
