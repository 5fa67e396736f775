//! `thldata` command-line fetcher
//!
//! Fetches a named pivot dataset, decodes it and writes one NDJSON record
//! per group to stdout or to a dated file.
//!
//! # Core Concepts
//!
//! - [`Settings`]: User agent, timeout, output directory and log format (TOML)
//! - [`Fetcher`]: HTTP download with status checking
//! - [`OutputTarget`]: Stdout or file, with the existing-file policy
//! - [`execute`]: One complete dataset run

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod cli;
mod fetch;
mod logging;
mod output;
mod run;
mod settings;

pub use cli::{command, dataset_listing, Invocation, RunOptions};
pub use fetch::{FetchError, Fetcher};
pub use logging::{init_logging, LogFormat};
pub use output::{datadate, default_filename, keep_existing, OutputTarget, PartialFile};
pub use run::{execute, Outcome};
pub use settings::{Settings, SettingsError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
