use aggregator::{Aggregator, SeriesSnapshot};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use configuration::{AppConfig, LoggingSettings, Overrides};
use core_types::Period;
use record_store::JsonRecordStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod render;

/// The main entry point for the streakwatch statistics tool.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = configuration::load_config(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    config.apply(&cli.overrides);

    let _guard = init_logging(&config.logging)?;
    tracing::debug!(?config, "Effective configuration");

    match cli.command {
        Commands::Report(args) => handle_report(&config, args, cli.json).await,
        Commands::Streaks(args) => handle_streaks(&config, args, cli.json).await,
        Commands::Ranges(args) => handle_ranges(&config, args, cli.json).await,
        Commands::Summary => handle_summary(&config, cli.json).await,
        Commands::Period(args) => handle_period(&config, args, cli.json).await,
        Commands::Record(args) => handle_record(&config, args, cli.json).await,
        Commands::Watch(args) => handle_watch(&config, args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Win-rate, streak and kill-marker statistics over per-period series records.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Print results as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Every metric for one series, or for all configured series.
    Report(ReportArgs),
    /// Kill streaks at least `min_streak` long, longest first.
    Streaks(SeriesArgs),
    /// Longest kill streak per range of recent records.
    Ranges(ReportArgs),
    /// One summary row per series plus the best win rate.
    Summary,
    /// Comprehensive rates over a range of periods.
    Period(PeriodArgs),
    /// Show a single record.
    Record(RecordArgs),
    /// Recompute every series on a fixed interval until interrupted.
    Watch(WatchArgs),
}

#[derive(Parser)]
struct SeriesArgs {
    /// The series to analyze (e.g., "sf1"). Defaults to every configured series.
    #[arg(long)]
    series: Option<String>,
}

#[derive(Parser)]
struct ReportArgs {
    #[command(flatten)]
    target: SeriesArgs,

    /// Limit the global kill-streak maximum to the most recent N records.
    #[arg(long)]
    period_range: Option<usize>,
}

#[derive(Parser)]
struct PeriodArgs {
    #[arg(long)]
    series: String,

    /// First period of the range (inclusive).
    #[arg(long)]
    from: Period,

    /// Last period of the range (inclusive).
    #[arg(long)]
    to: Period,
}

#[derive(Parser)]
struct RecordArgs {
    #[arg(long)]
    series: String,

    #[arg(long)]
    period: Period,
}

#[derive(Parser)]
struct WatchArgs {
    /// Overrides `scheduler.interval_secs`.
    #[arg(long)]
    interval_secs: Option<u64>,
}

// ==============================================================================
// Setup
// ==============================================================================

/// Logs to stderr, and to a daily rolling file when a directory is configured.
/// The returned guard must live until exit so buffered file output is flushed.
fn init_logging(settings: &LoggingSettings) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.filter.as_deref().unwrap_or("info")))
        .context("Invalid log filter")?;

    let (file_layer, guard) = match &settings.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "streakwatch.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

fn build_aggregator(config: &AppConfig, period_range: Option<usize>) -> Aggregator {
    let store = Arc::new(JsonRecordStore::new(&config.data.directory));
    Aggregator::new(store, config.analysis.to_params(), config.data.series.clone())
        .with_period_range(period_range)
}

/// Recomputes either the named series or every configured one.
async fn recompute(
    aggregator: &Aggregator,
    series: Option<&str>,
) -> Result<Vec<Arc<SeriesSnapshot>>> {
    if let Some(name) = series {
        let snapshot = aggregator
            .recompute_series(name)
            .await
            .with_context(|| format!("Failed to analyze series '{name}'"))?;
        return Ok(vec![snapshot]);
    }

    let mut snapshots = Vec::new();
    for (name, outcome) in aggregator.recompute_all().await? {
        match outcome {
            Ok(snapshot) => snapshots.push(snapshot),
            Err(e) => eprintln!("Skipping series '{name}': {e}"),
        }
    }
    Ok(snapshots)
}

// ==============================================================================
// Command Handlers
// ==============================================================================

async fn handle_report(config: &AppConfig, args: ReportArgs, json: bool) -> Result<()> {
    let aggregator = build_aggregator(config, args.period_range);
    let snapshots = recompute(&aggregator, args.target.series.as_deref()).await?;

    if json {
        let maps: Vec<_> = snapshots.iter().map(|s| s.flat_metrics()).collect();
        println!("{}", serde_json::to_string_pretty(&maps)?);
        return Ok(());
    }
    for snapshot in &snapshots {
        println!("{}", render::snapshot_header(snapshot));
        println!("{}", render::metrics_table(&snapshot.flat_metrics()));
    }
    Ok(())
}

async fn handle_streaks(config: &AppConfig, args: SeriesArgs, json: bool) -> Result<()> {
    let aggregator = build_aggregator(config, None);
    let snapshots = recompute(&aggregator, args.series.as_deref()).await?;

    for snapshot in &snapshots {
        let history = snapshot
            .kill_streak_history
            .clone()
            .with_context(|| format!("Kill streaks unavailable for '{}'", snapshot.series))?;
        if json {
            println!("{}", serde_json::to_string_pretty(&history)?);
        } else {
            println!("{}", render::snapshot_header(snapshot));
            println!("{}", render::streaks_table(&history));
        }
    }
    Ok(())
}

async fn handle_ranges(config: &AppConfig, args: ReportArgs, json: bool) -> Result<()> {
    let aggregator = build_aggregator(config, args.period_range);
    let snapshots = recompute(&aggregator, args.target.series.as_deref()).await?;

    for snapshot in &snapshots {
        let buckets = snapshot
            .range_buckets
            .clone()
            .with_context(|| format!("Range analysis unavailable for '{}'", snapshot.series))?;
        if json {
            println!("{}", serde_json::to_string_pretty(&buckets.flat_metrics())?);
        } else {
            println!("{}", render::snapshot_header(snapshot));
            println!("{}", render::ranges_table(&buckets));
        }
    }
    Ok(())
}

async fn handle_summary(config: &AppConfig, json: bool) -> Result<()> {
    let aggregator = build_aggregator(config, None);
    recompute(&aggregator, None).await?;

    let rows = aggregator.summary();
    let comparison = aggregator.compare_win_rates();
    if json {
        let output = serde_json::json!({ "summary": rows, "comparison": comparison });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", render::summary_table(&rows));
        println!("{}", render::comparison_line(&comparison));
    }
    Ok(())
}

async fn handle_period(config: &AppConfig, args: PeriodArgs, json: bool) -> Result<()> {
    let aggregator = build_aggregator(config, None);
    let analysis = aggregator
        .period_analysis(&args.series, args.from, args.to)
        .await
        .with_context(|| format!("Failed to analyze periods of '{}'", args.series))?;

    let value = serde_json::to_value(&analysis)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else if let serde_json::Value::Object(map) = value {
        println!("{}", render::metrics_table(&map));
    }
    Ok(())
}

async fn handle_record(config: &AppConfig, args: RecordArgs, json: bool) -> Result<()> {
    let aggregator = build_aggregator(config, None);
    let record = aggregator.record(&args.series, args.period).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", render::record_table(&record));
    }
    Ok(())
}

async fn handle_watch(config: &AppConfig, args: WatchArgs) -> Result<()> {
    let interval_secs = args
        .interval_secs
        .unwrap_or(config.scheduler.interval_secs)
        .max(1);
    let aggregator = build_aggregator(config, None);
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    tracing::info!(interval_secs, series = ?config.data.series, "Starting periodic recomputation");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match aggregator.recompute_all().await {
                    Ok(_) => {
                        let table = render::summary_table(&aggregator.summary());
                        tracing::info!("Summary\n{table}");
                    }
                    Err(e) => tracing::error!(error = %e, "Could not list series; will retry"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping");
                return Ok(());
            }
        }
    }
}
