//! Command-line definition

use crate::logging::LogFormat;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Options for one dataset run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunOptions {
    /// Dataset name
    pub dataset: String,
    /// Write to stdout instead of a file
    pub stdout: bool,
    /// Explicit output file
    pub output_file: Option<PathBuf>,
    /// Days subtracted from today for the as-of date
    pub date_offset: i64,
    /// Replace a non-empty existing output file
    pub overwrite: bool,
    /// Read the payload from this file instead of fetching it
    pub input: Option<PathBuf>,
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Run options; `None` when no dataset was named
    pub run: Option<RunOptions>,
    /// Settings file
    pub config: Option<PathBuf>,
    /// Log format override
    pub log_format: Option<LogFormat>,
}

/// Build the `thldata` command
#[must_use]
pub fn command() -> Command {
    Command::new("thldata")
        .version(crate::VERSION)
        .about("Fetch statistical pivot datasets and write them as NDJSON records")
        .arg(
            Arg::new("dataset")
                .value_name("DATASET")
                .help("Dataset to fetch; omit to list datasets"),
        )
        .arg(
            Arg::new("stdout")
                .short('s')
                .long("stdout")
                .action(ArgAction::SetTrue)
                .help("Output to stdout"),
        )
        .arg(
            Arg::new("outputfile")
                .short('f')
                .long("outputfile")
                .value_parser(value_parser!(PathBuf))
                .help("Output file name"),
        )
        .arg(
            Arg::new("date")
                .short('d')
                .long("date")
                .default_value("0")
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i64))
                .help("Offset date by X days"),
        )
        .arg(
            Arg::new("overwrite")
                .short('o')
                .long("overwrite")
                .action(ArgAction::SetTrue)
                .help("Overwrite existing output file"),
        )
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_parser(value_parser!(PathBuf))
                .help("Decode a local payload file instead of fetching"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("Settings file (TOML)"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_parser(["pretty", "json"])
                .help("Log output format"),
        )
}

/// Line printed when no dataset is named
#[must_use]
pub fn dataset_listing(names: &[String]) -> String {
    format!("CMDS: {}", names.join(", "))
}

impl Invocation {
    /// Read an invocation from parsed matches
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        let run = matches.get_one::<String>("dataset").map(|dataset| RunOptions {
            dataset: dataset.clone(),
            stdout: matches.get_flag("stdout"),
            output_file: matches.get_one::<PathBuf>("outputfile").cloned(),
            date_offset: matches.get_one::<i64>("date").copied().unwrap_or_default(),
            overwrite: matches.get_flag("overwrite"),
            input: matches.get_one::<PathBuf>("input").cloned(),
        });

        Self {
            run,
            config: matches.get_one::<PathBuf>("config").cloned(),
            log_format: matches
                .get_one::<String>("log-format")
                .and_then(|format| format.parse().ok()),
        }
    }
}
