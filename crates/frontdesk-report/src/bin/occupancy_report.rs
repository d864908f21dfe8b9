//! # Occupancy Report
//!
//! Prints the reconciliation report (or booking action flags) for a snapshot
//! directory as JSON on stdout. Logs go to stderr.
//!
//! ## Usage
//! ```bash
//! # Last `range_days` days (default: 30) from the configured snapshot dir
//! cargo run -p frontdesk-report --bin occupancy-report
//!
//! # Explicit range and snapshot directory
//! cargo run -p frontdesk-report --bin occupancy-report -- \
//!     --from 2024-03-01 --to 2024-03-31 --dir ./snapshot
//!
//! # Cancel / add-service flags for every booking
//! cargo run -p frontdesk-report --bin occupancy-report -- --flags
//! ```

use std::env;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use frontdesk_core::validation::parse_report_date;
use frontdesk_core::{CoreError, DateRange};
use frontdesk_report::{booking_flags, JsonDirSource, ReportBuilder, ReportConfig, ReportError};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Args {
    from: Option<String>,
    to: Option<String>,
    dir: Option<PathBuf>,
    config: Option<PathBuf>,
    flags: bool,
}

fn print_help() {
    println!("Frontdesk Occupancy Report");
    println!();
    println!("Usage: occupancy-report [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -f, --from <DATE>     First day of the range (YYYY-MM-DD)");
    println!("  -t, --to <DATE>       Last day of the range (default: today)");
    println!("  -d, --dir <PATH>      Snapshot directory (overrides config)");
    println!("  -c, --config <PATH>   Config file (default: platform config dir)");
    println!("      --flags           Print booking action flags instead of the report");
    println!("  -h, --help            Show this help message");
}

/// What the command line asked for.
#[derive(Debug)]
enum Command {
    Run(Args),
    Help,
}

/// Parses arguments after the program name.
fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut parsed = Args::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let flag = arg.as_str();
        let mut value = || {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("Missing value for {flag}"))
        };
        match flag {
            "--from" | "-f" => parsed.from = Some(value()?),
            "--to" | "-t" => parsed.to = Some(value()?),
            "--dir" | "-d" => parsed.dir = Some(PathBuf::from(value()?)),
            "--config" | "-c" => parsed.config = Some(PathBuf::from(value()?)),
            "--flags" => parsed.flags = true,
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("Unknown argument: {other}")),
        }
    }

    Ok(Command::Run(parsed))
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - Default: `info,frontdesk=debug`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,frontdesk=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves the report range from arguments, falling back to the config.
fn resolve_range(args: &Args, config: &ReportConfig, today: NaiveDate) -> Result<DateRange, ReportError> {
    let to = match &args.to {
        Some(raw) => parse_report_date("to", raw).map_err(CoreError::from)?,
        None => today,
    };

    match &args.from {
        Some(raw) => {
            let from = parse_report_date("from", raw).map_err(CoreError::from)?;
            Ok(DateRange::new(from, to)?.with_offset(config.utc_offset()))
        }
        None => config.default_range(to),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), ReportError> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let argv: Vec<String> = env::args().skip(1).collect();
    let args = match parse_args(&argv) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            print_help();
            return Ok(());
        }
        Err(message) => {
            eprintln!("{message}");
            print_help();
            process::exit(2);
        }
    };

    let mut config = ReportConfig::load(args.config.clone())?;
    if let Some(dir) = &args.dir {
        config.snapshot.dir = dir.clone();
    }
    debug!(?config, "Resolved report config");

    let now = Utc::now();
    let source =
        Arc::new(JsonDirSource::new(config.snapshot.dir.clone()).with_utc_offset(config.utc_offset()));

    if args.flags {
        let flags = booking_flags(source.as_ref(), &config, now).await?;
        info!(bookings = flags.len(), "Booking flags ready");
        print_json(&flags, config.report.pretty)?;
        return Ok(());
    }

    let range = resolve_range(&args, &config, config.today(now))?;
    let report = ReportBuilder::new(source).build(&range).await?;
    print_json(&report, config.report.pretty)?;

    Ok(())
}
