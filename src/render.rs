//! Table rendering for the CLI.

use aggregator::{SeriesSnapshot, SummaryRow, WinRateComparison};
use analytics::{KillStreakHistory, RangeBuckets};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use core_types::Record;
use serde_json::{Map, Value};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

pub fn snapshot_header(snapshot: &SeriesSnapshot) -> String {
    let mut header = format!(
        "== {} == {} records, latest period {}, generation {}, computed {}",
        snapshot.series,
        snapshot.record_count,
        opt(snapshot.latest_period),
        snapshot.generation,
        snapshot.computed_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );
    let failed = snapshot.failed_metrics();
    if !failed.is_empty() {
        header.push_str(&format!(" (failed: {})", failed.join(", ")));
    }
    header
}

pub fn metrics_table(metrics: &Map<String, Value>) -> Table {
    let mut table = new_table(vec!["Metric", "Value"]);
    for (name, value) in metrics {
        table.add_row(vec![name.clone(), cell(value)]);
    }
    table
}

pub fn streaks_table(history: &KillStreakHistory) -> Table {
    let mut table = new_table(vec!["Length", "Start", "End", "Periods Ago"]);
    for streak in &history.streaks {
        table.add_row(vec![
            streak.streak_count.to_string(),
            streak.start_period.to_string(),
            streak.end_period.to_string(),
            streak.period_diff.to_string(),
        ]);
    }
    table
}

pub fn ranges_table(buckets: &RangeBuckets) -> Table {
    let mut table = new_table(vec!["Range", "Records", "Max Kills", "Start", "End", "Periods Ago"]);
    // Buckets are contiguous, so the first upper bound is the width.
    let width = buckets.buckets.first().map_or(0, |b| b.range);
    for bucket in &buckets.buckets {
        table.add_row(vec![
            format!("{}-{}", bucket.range - width + 1, bucket.range),
            bucket.record_count.to_string(),
            bucket.max_consecutive_kills.to_string(),
            opt(bucket.start_period),
            opt(bucket.end_period),
            opt(bucket.period_diff),
        ]);
    }
    table.add_row(vec![
        "all".to_string(),
        buckets.overall.records_scanned.to_string(),
        buckets.overall.max_consecutive_kills.to_string(),
        opt(buckets.overall.start_period),
        opt(buckets.overall.end_period),
        buckets.overall.period_diff.to_string(),
    ]);
    table
}

pub fn summary_table(rows: &[SummaryRow]) -> Table {
    let mut table = new_table(vec![
        "Series",
        "Total",
        "Correct",
        "Prediction",
        "Actual",
        "Recent",
        "Kill",
        "Cur +/-",
        "Cur Profit/Loss",
        "Single",
        "Double",
        "Max +/-",
    ]);
    for row in rows {
        table.add_row(vec![
            row.series.clone(),
            row.total_count.to_string(),
            row.correct_count.to_string(),
            row.prediction_win_rate.to_string(),
            row.actual_win_rate.to_string(),
            opt(row.recent_win_rate),
            row.kill_rate.to_string(),
            format!("{}/{}", row.current_correct, row.current_incorrect),
            format!("{}/{}", row.current_profit, row.current_loss),
            row.single_rate.to_string(),
            row.double_rate.to_string(),
            format!("{}/{}", row.max_consecutive_correct, row.max_consecutive_incorrect),
        ]);
    }
    table
}

pub fn comparison_line(comparison: &WinRateComparison) -> String {
    match &comparison.best_server {
        Some(best) => format!("Best win rate: {best} at {}", comparison.best_rate),
        None => "No series analyzed.".to_string(),
    }
}

pub fn record_table(record: &Record) -> Table {
    let mut table = new_table(vec!["Field", "Value"]);
    table.add_row(vec!["period".to_string(), record.period.to_string()]);
    table.add_row(vec!["outcome".to_string(), format!("{:?}", record.outcome)]);
    table.add_row(vec!["betting".to_string(), format!("{:?}", record.betting)]);
    table.add_row(vec!["killMarker".to_string(), record.kill_marker.to_string()]);
    table.add_row(vec!["parity".to_string(), format!("{:?}", record.parity)]);
    table.add_row(vec!["predictedParity".to_string(), format!("{:?}", record.predicted_parity)]);
    table.add_row(vec!["numericSum".to_string(), opt(record.numeric_sum)]);
    table.add_row(vec!["pending".to_string(), record.is_pending().to_string()]);
    table
}
