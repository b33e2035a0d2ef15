use std::{error::Error, fs, path::PathBuf, process::exit};

use clap::Parser;
use time::OffsetDateTime;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use budget_buddy::{
    dashboard::{MetricsAggregator, ShortEnglishLabels},
    get_local_timezone,
    transaction::{RawDate, TransactionRecord, parse_transaction_date},
};

/// Compute the dashboard metrics for a JSON file of transactions and print them as JSON.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to a JSON array of transactions.
    #[arg(long, short)]
    input: PathBuf,

    /// Compute the metrics as if it were this date, e.g. "2024-02-01".
    /// Defaults to the current time.
    #[arg(long)]
    now: Option<String>,

    /// The canonical name of the timezone used to decide which day and month
    /// a transaction falls in.
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let args = Args::parse();

    let Some(local_timezone) = get_local_timezone(&args.timezone) else {
        eprintln!(
            "\"{}\" is not a canonical timezone name, e.g. \"Pacific/Auckland\".",
            args.timezone
        );
        exit(1);
    };

    let now = match args.now {
        Some(text) => parse_transaction_date(&RawDate::Text(text), local_timezone)?.instant(),
        None => OffsetDateTime::now_utc(),
    };

    tracing::debug!("Reading transactions from {:?}", args.input);
    let records: Vec<TransactionRecord> = serde_json::from_str(&fs::read_to_string(&args.input)?)?;

    let aggregator = MetricsAggregator::new(local_timezone, ShortEnglishLabels);
    let metrics = match aggregator.compute(&records, now) {
        Ok(metrics) => metrics,
        Err(error) => {
            for issue in &error.issues {
                eprintln!("{issue}");
            }
            tracing::warn!("Rejected {} invalid transaction field(s)", error.issues.len());
            exit(1);
        }
    };

    println!("{}", serde_json::to_string_pretty(&metrics)?);

    Ok(())
}
