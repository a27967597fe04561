use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::Parser;
use ott_digest::{logging, AppResult, Config, Pipeline};

/// Weekly digest of new OTT releases, delivered to Telegram
#[derive(Debug, Parser)]
#[command(name = "ott-digest", version, about)]
struct Cli {
    /// Print the digest to stdout instead of sending it
    #[arg(long)]
    dry_run: bool,

    /// Run as if today were this date
    #[arg(long, value_name = "YYYY-MM-DD")]
    date: Option<NaiveDate>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "OTT digest run failed");
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let config = Config::from_env()?;
    let credentials = config.credentials(!cli.dry_run)?;
    let pipeline = Pipeline::from_config(&config, credentials);

    let today = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let report = pipeline.run(today).await?;

    if cli.dry_run {
        println!("{}", report.message);
    }

    tracing::info!(
        window = %report.window,
        releases = report.unique,
        delivered = report.delivered,
        "OTT digest run finished"
    );

    Ok(())
}
