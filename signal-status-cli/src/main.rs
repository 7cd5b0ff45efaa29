//! Signal Status CLI Application
//!
//! Command-line front end for the signal-status library. It:
//! - Replays a recorded signal log (or runs a simulated controller session)
//! - Tracks the current status of every signal while the stream runs
//! - Prints a TXT or JSON status report once the stream ends

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use signal_status::{ReplaySource, SignalTracker, SimulatedIo, SourceSelectors};

mod config;
mod report;
mod simulate;

use config::{AppConfig, OutputFormat};
use report::{Report, ReportView};

/// Signal Status - Track I/O signal status from an event stream
#[derive(Parser, Debug)]
#[command(name = "signal-status-cli")]
#[command(about = "Aggregate I/O signal events into a current status report", long_about = None)]
#[command(version)]
struct Args {
    /// JSON-lines signal log to replay
    #[arg(short, long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Run the built-in simulated controller session
    #[arg(long, conflicts_with = "replay")]
    simulate: bool,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Primary source id
    #[arg(long, value_name = "ID")]
    primary: Option<String>,

    /// Secondary source id
    #[arg(long, value_name = "ID")]
    secondary: Option<String>,

    /// Only report signals whose identifier starts with PREFIX (e.g. "DO ")
    #[arg(long, value_name = "PREFIX", conflicts_with = "signal")]
    prefix: Option<String>,

    /// Only report this signal (e.g. "AI 0")
    #[arg(long, value_name = "ID")]
    signal: Option<String>,

    /// Category prefix for the default report (repeatable, replaces the configured list)
    #[arg(long = "category", value_name = "PREFIX")]
    categories: Vec<String>,

    /// Report format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Delay between replayed records, in milliseconds
    #[arg(long, value_name = "MS")]
    interval_ms: Option<u64>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Signal Status CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using signal-status library v{}", signal_status::VERSION);

    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };
    apply_overrides(&mut config, &args);

    let report = if let Some(path) = config.input.replay.clone() {
        replay_mode(path, &config).await?
    } else if config.input.simulate {
        simulate_mode(&config).await?
    } else {
        // No input - show help
        println!("Signal Status - No input specified");
        println!("\nQuick Start:");
        println!("  signal-status-cli --replay session.jsonl");
        println!("  signal-status-cli --simulate --prefix \"DO \"");
        println!("\nWith a configuration file:");
        println!("  signal-status-cli --config config.toml");
        println!("\nUse --help for more options");
        return Ok(());
    };

    write_report(&report, &config)
}

/// Command-line flags win over the configuration file
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(replay) = &args.replay {
        config.input.replay = Some(replay.clone());
    }
    if args.simulate {
        config.input.simulate = true;
        config.input.replay = None;
    }
    if let Some(primary) = &args.primary {
        config.tracker.selectors.primary = primary.clone();
    }
    if let Some(secondary) = &args.secondary {
        config.tracker.selectors.secondary = secondary.clone();
    }
    if let Some(prefix) = &args.prefix {
        config.output.prefix = Some(prefix.clone());
        config.output.signal = None;
    }
    if let Some(signal) = &args.signal {
        config.output.signal = Some(signal.clone());
        config.output.prefix = None;
    }
    if !args.categories.is_empty() {
        config.tracker = std::mem::take(&mut config.tracker).with_categories(args.categories.clone());
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(output) = &args.output {
        config.output.file = Some(output.clone());
    }
    if let Some(interval_ms) = args.interval_ms {
        config.tracker.replay_interval_ms = Some(interval_ms);
    }
}

/// Replay a signal log until it ends, then report
async fn replay_mode(path: PathBuf, config: &AppConfig) -> Result<Report> {
    let source = ReplaySource::new(path).with_interval(config.tracker.replay_interval());
    match source.interval() {
        Some(interval) => log::info!("Pacing {:?} at {:?} per record", source.path(), interval),
        None => log::debug!("Replaying {:?} unpaced", source.path()),
    }
    let mut tracker = SignalTracker::new(Arc::new(source));
    let mut watcher = tracker.watch();

    tracker
        .start(config.tracker.selectors.clone())
        .await
        .context("Failed to start replay")?;
    let state = watcher.wait_until_stopped().await;
    log::info!("Replay finished ({} updates)", tracker.version());

    Ok(Report::build(&tracker.snapshot(), state, &report_view(config)))
}

/// Run the simulated controller session, then report
async fn simulate_mode(config: &AppConfig) -> Result<Report> {
    let io = Arc::new(SimulatedIo::new());
    let mut tracker = SignalTracker::new(io.clone()).with_output(io.clone());
    let mut watcher = tracker.watch();

    let selectors = if config.tracker.selectors == SourceSelectors::default() {
        SourceSelectors::new("simulated", "io")
    } else {
        config.tracker.selectors.clone()
    };
    tracker.start(selectors).await?;
    simulate::run_session(&io, &tracker).await?;
    let state = watcher.wait_until_stopped().await;

    Ok(Report::build(&tracker.snapshot(), state, &report_view(config)))
}

fn report_view(config: &AppConfig) -> ReportView {
    match (&config.output.signal, &config.output.prefix) {
        (Some(signal), _) => ReportView::Single(signal.clone()),
        (None, Some(prefix)) => ReportView::Prefix(prefix.clone()),
        (None, None) => ReportView::Categories(config.tracker.categories.clone()),
    }
}

fn write_report(report: &Report, config: &AppConfig) -> Result<()> {
    let rendered = report.render(config.output.format)?;
    match &config.output.file {
        Some(path) => {
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
