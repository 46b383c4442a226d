use crate::snapshot::SeriesSnapshot;
use analytics::{CurrentStreaks, Percentage};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The figures every series exposes for the cross-series summary table.
pub trait SeriesStatistics {
    fn series_name(&self) -> &str;
    fn total_count(&self) -> usize;
    fn correct_count(&self) -> usize;
    fn prediction_win_rate(&self) -> Percentage;
    fn actual_win_rate(&self) -> Percentage;
    /// `None` when the recent window could not be computed.
    fn recent_win_rate(&self) -> Option<Percentage>;
    fn kill_rate(&self) -> Percentage;
    fn current_streaks(&self) -> Option<CurrentStreaks>;
    fn single_rate(&self) -> Percentage;
    fn double_rate(&self) -> Percentage;
    fn max_consecutive_correct(&self) -> u32;
    fn max_consecutive_incorrect(&self) -> u32;
}

impl SeriesStatistics for SeriesSnapshot {
    fn series_name(&self) -> &str {
        &self.series
    }

    fn total_count(&self) -> usize {
        self.comprehensive.total_count
    }

    fn correct_count(&self) -> usize {
        self.comprehensive.correct_count
    }

    fn prediction_win_rate(&self) -> Percentage {
        self.comprehensive.prediction_win_rate
    }

    fn actual_win_rate(&self) -> Percentage {
        self.comprehensive.actual_win_rate
    }

    fn recent_win_rate(&self) -> Option<Percentage> {
        self.recent_win_rate.as_ref().ok().map(|w| w.win_rate)
    }

    fn kill_rate(&self) -> Percentage {
        self.comprehensive.killed_rate
    }

    fn current_streaks(&self) -> Option<CurrentStreaks> {
        self.current_streaks.as_ref().ok().copied()
    }

    fn single_rate(&self) -> Percentage {
        self.distribution.base.single_rate
    }

    fn double_rate(&self) -> Percentage {
        self.distribution.base.double_rate
    }

    fn max_consecutive_correct(&self) -> u32 {
        self.historical_streaks.max_consecutive_correct
    }

    fn max_consecutive_incorrect(&self) -> u32 {
        self.historical_streaks.max_consecutive_incorrect
    }
}

/// One row of the cross-series summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRow {
    pub series: String,
    pub total_count: usize,
    pub correct_count: usize,
    pub prediction_win_rate: Percentage,
    pub actual_win_rate: Percentage,
    pub recent_win_rate: Option<Percentage>,
    pub kill_rate: Percentage,
    pub current_correct: u32,
    pub current_incorrect: u32,
    pub current_profit: u32,
    pub current_loss: u32,
    pub single_rate: Percentage,
    pub double_rate: Percentage,
    pub max_consecutive_correct: u32,
    pub max_consecutive_incorrect: u32,
}

impl SummaryRow {
    pub fn from_stats<S: SeriesStatistics + ?Sized>(stats: &S) -> Self {
        let streaks = stats.current_streaks().unwrap_or_default();
        Self {
            series: stats.series_name().to_string(),
            total_count: stats.total_count(),
            correct_count: stats.correct_count(),
            prediction_win_rate: stats.prediction_win_rate(),
            actual_win_rate: stats.actual_win_rate(),
            recent_win_rate: stats.recent_win_rate(),
            kill_rate: stats.kill_rate(),
            current_correct: streaks.consecutive_correct,
            current_incorrect: streaks.consecutive_incorrect,
            current_profit: streaks.consecutive_profit,
            current_loss: streaks.consecutive_loss,
            single_rate: stats.single_rate(),
            double_rate: stats.double_rate(),
            max_consecutive_correct: stats.max_consecutive_correct(),
            max_consecutive_incorrect: stats.max_consecutive_incorrect(),
        }
    }
}

/// Win rates of every series side by side, with the best one picked out.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinRateComparison {
    pub server_rates: BTreeMap<String, Percentage>,
    pub best_server: Option<String>,
    pub best_rate: Percentage,
}

/// Compares the `winRate` entries of already-published flat metric maps.
///
/// Values are re-parsed from their `"NN.NN%"` form; a missing or malformed
/// value counts as 0.00% for that series only. The first series in the
/// given order wins ties.
pub fn compare_win_rates<'a, I>(metrics: I) -> WinRateComparison
where
    I: IntoIterator<Item = (&'a str, &'a Map<String, Value>)>,
{
    let mut comparison = WinRateComparison::default();
    for (series, map) in metrics {
        let rate = match map.get("winRate") {
            Some(Value::String(text)) => Percentage::parse_or_zero(text),
            other => {
                tracing::warn!(series, value = ?other, "winRate missing or not a string, using 0.00%");
                Percentage::ZERO
            }
        };
        if comparison.best_server.is_none() || rate > comparison.best_rate {
            comparison.best_server = Some(series.to_string());
            comparison.best_rate = rate;
        }
        comparison.server_rates.insert(series.to_string(), rate);
    }
    comparison
}
