use crate::enums::{BettingCategory, OutcomeCategory, Parity};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Period numbers identify a record's time slot. Larger is more recent.
pub type Period = i64;

/// One finalized (or pending) period of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub period: Period,
    pub outcome: OutcomeCategory,
    pub betting: BettingCategory,
    pub kill_marker: bool,
    /// Parity of the drawn result.
    pub parity: Parity,
    #[serde(default)]
    pub predicted_parity: Parity,
    pub numeric_sum: Option<i32>,
}

impl Record {
    /// A record is pending when no result has been drawn for it yet.
    pub fn is_pending(&self) -> bool {
        self.outcome == OutcomeCategory::Special && self.numeric_sum.is_none()
    }
}

/// The records of one named series.
///
/// The core never sorts on behalf of the analyzers; this type exists so the
/// callers that feed them have one place to establish the order each
/// analyzer expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub records: Vec<Record>,
}

impl Series {
    pub fn new(name: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Checks that no period number is repeated within the series.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "series name".to_string(),
                "must not be empty".to_string(),
            ));
        }
        let mut seen = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if !seen.insert(record.period) {
                tracing::warn!(series = %self.name, period = record.period, "Duplicate period in series");
                return Err(CoreError::DuplicatePeriod {
                    series: self.name.clone(),
                    period: record.period,
                });
            }
        }
        Ok(())
    }

    /// Most-recent-first copy of the records.
    pub fn descending(&self) -> Vec<Record> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| b.period.cmp(&a.period));
        records
    }

    /// Chronological copy of the records.
    pub fn ascending(&self) -> Vec<Record> {
        let mut records = self.records.clone();
        records.sort_by_key(|r| r.period);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(period: Period) -> Record {
        Record {
            period,
            outcome: OutcomeCategory::Match,
            betting: BettingCategory::ProfitLike,
            kill_marker: false,
            parity: Parity::Odd,
            predicted_parity: Parity::Odd,
            numeric_sum: Some(7),
        }
    }

    #[test]
    fn series_orders_by_period() {
        let series = Series::new("sf1", vec![record(2), record(3), record(1)]);
        let desc: Vec<_> = series.descending().iter().map(|r| r.period).collect();
        let asc: Vec<_> = series.ascending().iter().map(|r| r.period).collect();
        assert_eq!(desc, vec![3, 2, 1]);
        assert_eq!(asc, vec![1, 2, 3]);
    }

    #[test]
    fn validate_rejects_duplicate_periods() {
        let series = Series::new("sf1", vec![record(1), record(2), record(1)]);
        assert!(matches!(
            series.validate(),
            Err(CoreError::DuplicatePeriod { period: 1, .. })
        ));
        assert!(Series::new("sf1", vec![record(1), record(2)]).validate().is_ok());
        assert!(Series::new(" ", vec![]).validate().is_err());
    }

    #[test]
    fn pending_requires_missing_outcome_and_sum() {
        let mut r = record(10);
        assert!(!r.is_pending());
        r.outcome = OutcomeCategory::Special;
        assert!(!r.is_pending());
        r.numeric_sum = None;
        assert!(r.is_pending());
    }

    #[test]
    fn record_uses_camel_case_on_the_wire() {
        let json = serde_json::to_value(record(5)).unwrap();
        assert!(json.get("killMarker").is_some());
        assert!(json.get("numericSum").is_some());
    }
}
