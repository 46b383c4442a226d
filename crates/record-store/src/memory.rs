use crate::error::StoreError;
use crate::RecordSource;
use async_trait::async_trait;
use core_types::Series;
use std::collections::BTreeMap;
use std::sync::RwLock;

/// A `RecordSource` backed by a map of series held in memory.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    series: RwLock<BTreeMap<String, Series>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a series after checking it for duplicate periods.
    pub fn insert(&self, series: Series) -> Result<(), StoreError> {
        series.validate()?;
        let mut map = self.series.write().unwrap_or_else(|e| e.into_inner());
        map.insert(series.name.clone(), series);
        Ok(())
    }
}

#[async_trait]
impl RecordSource for MemoryRecordStore {
    async fn series_names(&self) -> Result<Vec<String>, StoreError> {
        let map = self.series.read().unwrap_or_else(|e| e.into_inner());
        Ok(map.keys().cloned().collect())
    }

    async fn load_series(&self, name: &str) -> Result<Series, StoreError> {
        let map = self.series.read().unwrap_or_else(|e| e.into_inner());
        map.get(name)
            .cloned()
            .ok_or_else(|| StoreError::SeriesNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{BettingCategory, OutcomeCategory, Parity, Record};

    fn record(period: i64) -> Record {
        Record {
            period,
            outcome: OutcomeCategory::Match,
            betting: BettingCategory::ProfitLike,
            kill_marker: false,
            parity: Parity::Odd,
            predicted_parity: Parity::Odd,
            numeric_sum: Some(11),
        }
    }

    #[tokio::test]
    async fn insert_replaces_the_whole_series() {
        let store = MemoryRecordStore::new();
        store.insert(Series::new("sf1", vec![record(1)])).unwrap();
        store
            .insert(Series::new("sf1", vec![record(1), record(2)]))
            .unwrap();
        assert_eq!(store.load_series("sf1").await.unwrap().len(), 2);
        assert_eq!(store.series_names().await.unwrap(), vec!["sf1"]);
    }

    #[test]
    fn rejects_duplicate_periods() {
        let store = MemoryRecordStore::new();
        let result = store.insert(Series::new("sf1", vec![record(1), record(1)]));
        assert!(matches!(result, Err(StoreError::Invalid(_))));
    }
}
