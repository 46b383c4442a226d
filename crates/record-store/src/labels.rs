use core_types::{BettingCategory, OutcomeCategory, Parity, Period, Record};
use serde::{Deserialize, Serialize};

/// One record as it is stored upstream, with free-text labels.
///
/// Labels are mapped to closed enums by [`RawRecord::normalize`]; nothing
/// past this module looks at the strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRecord {
    pub period: Period,
    /// The drawn numbers, e.g. "3,5,9". Informational only.
    pub numbers: Option<String>,
    /// The predicted parity label ("单" or "双").
    pub prediction: Option<String>,
    /// "中" for a correct prediction, "错" for an incorrect one.
    pub outcome: Option<String>,
    pub total_number: Option<i32>,
    /// Non-empty when the kill marker was set for the period.
    pub kill_number: Option<String>,
    pub betting_result: Option<String>,
    /// The drawn parity label ("单" or "双").
    pub open_result: Option<String>,
}

pub fn outcome_from_label(label: Option<&str>) -> OutcomeCategory {
    match label.map(str::trim) {
        Some("中") => OutcomeCategory::Match,
        Some("错") => OutcomeCategory::Mismatch,
        _ => OutcomeCategory::Special,
    }
}

pub fn betting_from_label(label: Option<&str>) -> BettingCategory {
    match label.map(str::trim) {
        Some("命中盈利") | Some("未命中盈利") => BettingCategory::ProfitLike,
        Some("命中被杀") | Some("未命中亏损") => BettingCategory::LossLike,
        _ => BettingCategory::Special,
    }
}

pub fn parity_from_label(label: Option<&str>) -> Parity {
    match label.map(str::trim) {
        Some("单") => Parity::Odd,
        Some("双") => Parity::Even,
        _ => Parity::Unknown,
    }
}

fn is_marked(kill_number: Option<&str>) -> bool {
    kill_number.is_some_and(|k| !k.trim().is_empty())
}

impl RawRecord {
    pub fn normalize(&self) -> Record {
        Record {
            period: self.period,
            outcome: outcome_from_label(self.outcome.as_deref()),
            betting: betting_from_label(self.betting_result.as_deref()),
            kill_marker: is_marked(self.kill_number.as_deref()),
            parity: parity_from_label(self.open_result.as_deref()),
            predicted_parity: parity_from_label(self.prediction.as_deref()),
            numeric_sum: self.total_number,
        }
    }
}
