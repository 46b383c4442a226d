//! Result structs for every analyzer. Field names serialize to the metric
//! names consumed by the presentation layer.

use crate::percent::Percentage;
use core_types::Period;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Overall win rate from pre-counted totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinRate {
    pub total_count: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub win_rate: Percentage,
}

/// Win and kill rates over the most recent `recent_count` records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRate {
    /// The requested window size.
    pub recent_count: usize,
    /// How many records the window actually held.
    pub total_count: usize,
    pub correct_count: usize,
    pub incorrect_count: usize,
    pub killed_count: usize,
    pub win_rate: Percentage,
    pub kill_rate: Percentage,
}

/// One `WindowRate` per requested size, all drawn from the same base sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRates {
    pub pending_dropped: bool,
    pub windows: Vec<WindowRate>,
}

impl WindowRates {
    /// `winRate30`, `killRate30`, `winRate50`, ... keyed by window size.
    pub fn flat_metrics(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for w in &self.windows {
            map.insert(format!("winRate{}", w.recent_count), json!(w.win_rate));
            map.insert(format!("killRate{}", w.recent_count), json!(w.kill_rate));
        }
        map
    }

    pub fn get(&self, window: usize) -> Option<&WindowRate> {
        self.windows.iter().find(|w| w.recent_count == window)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComprehensiveRates {
    #[serde(rename = "totalPredictionCount")]
    pub total_count: usize,
    #[serde(rename = "correctPredictionCount")]
    pub correct_count: usize,
    #[serde(rename = "incorrectPredictionCount")]
    pub incorrect_count: usize,
    pub killed_count: usize,
    pub correct_but_killed_count: usize,
    pub profit_count: usize,
    pub loss_count: usize,

    pub prediction_win_rate: Percentage,
    /// Correct predictions that were not killed, over all predictions.
    pub actual_win_rate: Percentage,
    pub killed_rate: Percentage,
    /// Killed share of the correct predictions.
    pub correct_killed_rate: Percentage,
    pub profit_rate: Percentage,
    pub loss_rate: Percentage,
}

/// `ComprehensiveRates` computed over a caller-chosen slice of periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRateAnalysis {
    pub analyze_type: String,
    pub first_period: Option<Period>,
    pub last_period: Option<Period>,
    #[serde(flatten)]
    pub rates: ComprehensiveRates,
}

/// Current run lengths counted from the most recent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStreaks {
    pub consecutive_correct: u32,
    pub consecutive_incorrect: u32,
    pub consecutive_profit: u32,
    pub consecutive_loss: u32,
}

/// The longest run ever seen for each category and where it began.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalStreaks {
    pub max_consecutive_correct: u32,
    pub max_consecutive_incorrect: u32,
    pub max_consecutive_profit: u32,
    pub max_consecutive_loss: u32,
    pub max_correct_start_period: Option<Period>,
    pub max_incorrect_start_period: Option<Period>,
    pub max_profit_start_period: Option<Period>,
    pub max_loss_start_period: Option<Period>,
}

/// A closed run of consecutive kill-marked records.
///
/// `start_period` is the chronologically older boundary and `end_period`
/// the more recent one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KillRun {
    pub length: usize,
    pub start_period: Period,
    pub end_period: Period,
}

impl KillRun {
    /// Distance from `latest` to the older boundary of the run.
    pub fn distance_from(&self, latest: Period) -> Period {
        latest - self.start_period.min(self.end_period)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxKillStreak {
    pub max_consecutive_kills: usize,
    pub start_period: Option<Period>,
    pub end_period: Option<Period>,
    pub period_diff: Period,
    /// Number of records the scan covered after `periodRange` was applied.
    pub records_scanned: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifyingStreak {
    pub streak_count: usize,
    pub start_period: Period,
    pub end_period: Period,
    pub period_diff: Period,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KillStreakHistory {
    pub streaks: Vec<QualifyingStreak>,
    pub count: usize,
    pub min_streak: usize,
}

/// Longest kill run inside one index-based bucket.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeBucket {
    /// Exclusive upper index of the bucket, e.g. 100 for records 1-100.
    pub range: usize,
    pub record_count: usize,
    pub max_consecutive_kills: usize,
    pub start_period: Option<Period>,
    pub end_period: Option<Period>,
    pub period_diff: Option<Period>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeBuckets {
    pub overall: MaxKillStreak,
    pub latest_period: Option<Period>,
    pub buckets: Vec<RangeBucket>,
}

impl RangeBuckets {
    /// The flat `range100`, `range100Start`, `range100End`, `range100Diff` shape.
    pub fn flat_metrics(&self) -> Map<String, Value> {
        let mut map = match serde_json::to_value(&self.overall) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        for bucket in &self.buckets {
            let key = format!("range{}", bucket.range);
            map.insert(key.clone(), json!(bucket.max_consecutive_kills));
            if bucket.record_count == 0 {
                continue;
            }
            map.insert(format!("{key}Start"), json!(bucket.start_period));
            map.insert(format!("{key}End"), json!(bucket.end_period));
            if let Some(diff) = bucket.period_diff {
                map.insert(format!("{key}Diff"), json!(diff));
            }
        }
        map
    }
}

/// Histogram bins for `numericSum`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SumRange {
    #[serde(rename = "0-10")]
    UpToTen,
    #[serde(rename = "11-20")]
    ElevenToTwenty,
    #[serde(rename = "21-30")]
    TwentyOneToThirty,
    #[serde(rename = "30+")]
    AboveThirty,
}

impl SumRange {
    pub fn of(sum: i32) -> Self {
        match sum {
            i32::MIN..=10 => SumRange::UpToTen,
            11..=20 => SumRange::ElevenToTwenty,
            21..=30 => SumRange::TwentyOneToThirty,
            _ => SumRange::AboveThirty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDistribution {
    pub total_records: usize,
    pub single_count: usize,
    pub double_count: usize,
    pub single_rate: Percentage,
    pub double_rate: Percentage,
    /// Count per exact `numericSum` value.
    pub total_number_distribution: BTreeMap<i32, usize>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedDistribution {
    #[serde(flatten)]
    pub base: ResultDistribution,
    pub killed_single_count: usize,
    pub killed_double_count: usize,
    pub killed_single_rate: Percentage,
    pub killed_double_rate: Percentage,
    pub correct_single_predictions: usize,
    pub correct_double_predictions: usize,
    /// Matched parity predictions over records with a known predicted and drawn parity.
    pub parity_prediction_accuracy: Percentage,
    pub number_range_distribution: BTreeMap<SumRange, usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_range_boundaries() {
        assert_eq!(SumRange::of(0), SumRange::UpToTen);
        assert_eq!(SumRange::of(10), SumRange::UpToTen);
        assert_eq!(SumRange::of(11), SumRange::ElevenToTwenty);
        assert_eq!(SumRange::of(20), SumRange::ElevenToTwenty);
        assert_eq!(SumRange::of(21), SumRange::TwentyOneToThirty);
        assert_eq!(SumRange::of(30), SumRange::TwentyOneToThirty);
        assert_eq!(SumRange::of(31), SumRange::AboveThirty);
    }

    #[test]
    fn kill_run_distance_uses_older_boundary() {
        let run = KillRun { length: 3, start_period: 95, end_period: 97 };
        assert_eq!(run.distance_from(100), 5);
    }

    #[test]
    fn range_bucket_flat_metrics_skip_empty_buckets() {
        let buckets = RangeBuckets {
            overall: MaxKillStreak::default(),
            latest_period: Some(10),
            buckets: vec![
                RangeBucket {
                    range: 100,
                    record_count: 10,
                    max_consecutive_kills: 2,
                    start_period: Some(7),
                    end_period: Some(8),
                    period_diff: Some(2),
                },
                RangeBucket { range: 200, ..Default::default() },
            ],
        };
        let map = buckets.flat_metrics();
        assert_eq!(map["range100"], json!(2));
        assert_eq!(map["range100Diff"], json!(2));
        assert_eq!(map["range200"], json!(0));
        assert!(!map.contains_key("range200Start"));
        assert_eq!(map["maxConsecutiveKills"], json!(0));
    }
}
