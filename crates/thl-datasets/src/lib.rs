//! Built-in pivot-table datasets
//!
//! Each dataset is a [`Descriptor`](thl_compact::Descriptor): payload URL,
//! dimension and label renames, group key and merge policy.
//!
//! # Core Concepts
//!
//! - [`Catalog`]: Name to descriptor constructor, listed in sorted order
//! - [`epirapo`]: Case, test, death and hospital care datasets
//! - [`vaccreg`]: Vaccination register datasets
//! - [`inci`]: Monthly incidence by vaccination status

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod catalog;
mod error;

pub mod epirapo;
pub mod inci;
pub mod vaccreg;

pub use catalog::{find, names, Catalog, DescriptorFn};
pub use error::{DatasetError, DatasetResult};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
