//! Pivot-table cube decoding
//!
//! A pivot payload describes a dense multi-dimensional array, serialized as a
//! sparse map from flattened cell index to raw value. This crate turns that
//! payload into an ordered stream of fully labeled cells.
//!
//! # Core Concepts
//!
//! - [`Payload`]: Validated dimension metadata plus the sparse value map
//! - [`Dimension`]: One axis with its ordered category labels
//! - [`Radix`]: Mixed-radix arithmetic over the dimension sizes
//! - [`decode`]: Lazy iterator of [`NarrowRecord`]s in ascending index order
//!
//! # Example
//!
//! ```rust,ignore
//! use thl_cube::{decode, Payload};
//!
//! let payload = Payload::from_slice(&bytes)?;
//! for record in decode(&payload)? {
//!     println!("{:?} = {}", record.get("area"), record.value());
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod decoder;
mod error;
mod payload;
mod radix;
mod record;

pub use decoder::{decode, Cells};
pub use error::{CubeError, CubeResult};
pub use payload::{Dimension, Payload};
pub use radix::Radix;
pub use record::{NarrowRecord, VALUE_FIELD};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
