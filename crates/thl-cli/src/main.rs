use anyhow::{Context, Result};
use std::process::ExitCode;
use thl_cli::{command, dataset_listing, execute, init_logging, Invocation, Outcome, Settings};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let invocation = Invocation::from_matches(&command().get_matches());

    match run(invocation).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("thldata: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(invocation: Invocation) -> Result<()> {
    let mut settings = match &invocation.config {
        Some(path) => Settings::load(path).context("loading settings")?,
        None => Settings::new(),
    };
    if let Some(format) = invocation.log_format {
        settings = settings.with_log_format(format);
    }
    init_logging(settings.log_format);

    let Some(options) = invocation.run else {
        println!("{}", dataset_listing(&thl_datasets::names()));
        return Ok(());
    };

    let today = chrono::Local::now().date_naive();
    match execute(&options, &settings, today).await? {
        Outcome::Kept(path) => println!("{} exists", path.display()),
        Outcome::Written { target, summary } => {
            tracing::info!(?target, records = summary.records, "run complete");
        }
    }
    Ok(())
}
