use analytics::{
    AnalyticsEngine, AnalyticsError, ComprehensiveRates, CurrentStreaks, DetailedDistribution,
    HistoricalStreaks, KillStreakHistory, MaxKillStreak, RangeBuckets, WinRate, WindowRate,
    WindowRates,
};
use chrono::{DateTime, Utc};
use core_types::{Period, Series};
use serde::Serialize;
use serde_json::{Map, Value, json};

/// The outcome of one metric group. A failed group carries its error and
/// leaves its siblings untouched.
pub type Metric<T> = Result<T, AnalyticsError>;

/// Every metric computed for one series at one point in time.
///
/// Snapshots are immutable once built; a recomputation produces a new one
/// which replaces the old as a whole.
#[derive(Debug, Clone)]
pub struct SeriesSnapshot {
    pub series: String,
    /// Set by the cache when the snapshot is published.
    pub generation: u64,
    pub computed_at: DateTime<Utc>,
    pub record_count: usize,
    pub latest_period: Option<Period>,
    pub win_rate: WinRate,
    pub recent_win_rate: Metric<WindowRate>,
    pub window_rates: Metric<WindowRates>,
    pub comprehensive: ComprehensiveRates,
    pub current_streaks: Metric<CurrentStreaks>,
    pub historical_streaks: HistoricalStreaks,
    pub max_kill_streak: Metric<MaxKillStreak>,
    pub kill_streak_history: Metric<KillStreakHistory>,
    pub range_buckets: Metric<RangeBuckets>,
    pub distribution: DetailedDistribution,
}

/// Runs every analyzer over `series`. Never fails as a whole.
pub fn compute_snapshot(
    engine: &AnalyticsEngine,
    series: &Series,
    period_range: Option<usize>,
) -> SeriesSnapshot {
    let desc = series.descending();
    let asc = series.ascending();
    let name = series.name.as_str();

    SeriesSnapshot {
        series: series.name.clone(),
        generation: 0,
        computed_at: Utc::now(),
        record_count: desc.len(),
        latest_period: desc.first().map(|r| r.period),
        win_rate: engine.win_rate(&desc),
        recent_win_rate: logged(name, "recentWinRate", engine.recent_win_rate(&desc)),
        window_rates: logged(name, "windowRates", engine.window_rates(&desc)),
        comprehensive: engine.comprehensive_rates(&desc),
        current_streaks: logged(name, "currentStreaks", engine.current_streaks(&desc)),
        historical_streaks: engine.historical_streaks(&asc),
        max_kill_streak: logged(
            name,
            "maxKillStreak",
            engine.max_kill_streak(&desc, period_range),
        ),
        kill_streak_history: logged(
            name,
            "killStreakHistory",
            engine.kill_streak_history(&desc, None),
        ),
        range_buckets: logged(name, "rangeBuckets", engine.range_buckets(&desc)),
        distribution: engine.distribution(&desc),
    }
}

fn logged<T>(series: &str, metric: &str, result: Metric<T>) -> Metric<T> {
    if let Err(e) = &result {
        tracing::error!(series, metric, error = %e, "Metric failed; continuing with the rest");
    }
    result
}

impl SeriesSnapshot {
    /// The flat metric-name to value mapping handed to presentation.
    ///
    /// A failed group contributes a single `<group>Error` entry instead of
    /// its fields.
    pub fn flat_metrics(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("series".to_string(), json!(self.series));
        map.insert("recordCount".to_string(), json!(self.record_count));
        map.insert("latestPeriod".to_string(), json!(self.latest_period));

        merge(&mut map, &self.win_rate);
        match &self.recent_win_rate {
            Ok(recent) => {
                map.insert("recentWinRate".to_string(), json!(recent.win_rate));
                map.insert("recentCount".to_string(), json!(recent.total_count));
            }
            Err(e) => insert_error(&mut map, "recentWinRate", e),
        }
        match &self.window_rates {
            Ok(windows) => map.extend(windows.flat_metrics()),
            Err(e) => insert_error(&mut map, "windowRates", e),
        }
        merge(&mut map, &self.comprehensive);
        merge_metric(&mut map, "currentStreaks", &self.current_streaks);
        merge(&mut map, &self.historical_streaks);
        match &self.range_buckets {
            Ok(buckets) => map.extend(buckets.flat_metrics()),
            Err(e) => insert_error(&mut map, "rangeBuckets", e),
        }
        // Written after the buckets so the period-range limited maximum wins.
        merge_metric(&mut map, "maxKillStreak", &self.max_kill_streak);
        match &self.kill_streak_history {
            Ok(history) => {
                map.insert("streaks".to_string(), json!(history.streaks));
                map.insert("minStreak".to_string(), json!(history.min_streak));
            }
            Err(e) => insert_error(&mut map, "killStreakHistory", e),
        }
        merge(&mut map, &self.distribution);
        map
    }

    /// Names of the metric groups that failed in this snapshot.
    pub fn failed_metrics(&self) -> Vec<&'static str> {
        let checks = [
            ("recentWinRate", self.recent_win_rate.is_err()),
            ("windowRates", self.window_rates.is_err()),
            ("currentStreaks", self.current_streaks.is_err()),
            ("maxKillStreak", self.max_kill_streak.is_err()),
            ("killStreakHistory", self.kill_streak_history.is_err()),
            ("rangeBuckets", self.range_buckets.is_err()),
        ];
        checks
            .into_iter()
            .filter_map(|(name, failed)| failed.then_some(name))
            .collect()
    }
}

fn merge<T: Serialize>(map: &mut Map<String, Value>, value: &T) {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => map.extend(fields),
        Ok(other) => tracing::warn!(value = %other, "Expected a metric object"),
        Err(e) => tracing::error!(error = %e, "Failed to serialize metric"),
    }
}

fn merge_metric<T: Serialize>(map: &mut Map<String, Value>, group: &str, metric: &Metric<T>) {
    match metric {
        Ok(value) => merge(map, value),
        Err(e) => insert_error(map, group, e),
    }
}

fn insert_error(map: &mut Map<String, Value>, group: &str, error: &AnalyticsError) {
    map.insert(format!("{group}Error"), json!(error.to_string()));
}
