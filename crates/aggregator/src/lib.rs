//! # Aggregator
//!
//! Runs the analytics engine over every configured series and publishes one
//! immutable snapshot per series into a shared `ResultCache`.
//!
//! ## Failure isolation
//!
//! A failing metric is recorded inside its snapshot and logged; the other
//! metrics of that snapshot are still computed. A series that cannot be
//! loaded keeps its previously published snapshot and does not stop the
//! other series in the same batch.

use analytics::{AnalysisParams, AnalyticsEngine, PeriodRateAnalysis};
use core_types::{Period, Record};
use futures::future::join_all;
use record_store::RecordSource;
use std::sync::Arc;
use std::time::Instant;

pub mod cache;
pub mod error;
pub mod snapshot;
pub mod summary;

pub use cache::ResultCache;
pub use error::AggregatorError;
pub use snapshot::{Metric, SeriesSnapshot, compute_snapshot};
pub use summary::{SeriesStatistics, SummaryRow, WinRateComparison, compare_win_rates};

/// The result of recomputing one series in a batch.
pub type SeriesOutcome = (String, Result<Arc<SeriesSnapshot>, AggregatorError>);

pub struct Aggregator {
    source: Arc<dyn RecordSource>,
    engine: Arc<AnalyticsEngine>,
    /// Series to recompute. Empty means every series the source knows.
    series: Vec<String>,
    period_range: Option<usize>,
    cache: Arc<ResultCache>,
}

impl Aggregator {
    pub fn new(source: Arc<dyn RecordSource>, params: AnalysisParams, series: Vec<String>) -> Self {
        Self {
            source,
            engine: Arc::new(AnalyticsEngine::new(params)),
            series,
            period_range: None,
            cache: Arc::new(ResultCache::new()),
        }
    }

    /// Limits the global kill-streak maximum to the most recent `range` records.
    pub fn with_period_range(mut self, range: Option<usize>) -> Self {
        self.period_range = range;
        self
    }

    pub fn engine(&self) -> &AnalyticsEngine {
        &self.engine
    }

    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    async fn series_names(&self) -> Result<Vec<String>, AggregatorError> {
        if self.series.is_empty() {
            Ok(self.source.series_names().await?)
        } else {
            Ok(self.series.clone())
        }
    }

    /// Loads one series, computes its snapshot on the blocking pool and publishes it.
    pub async fn recompute_series(&self, name: &str) -> Result<Arc<SeriesSnapshot>, AggregatorError> {
        let started = Instant::now();
        tracing::info!(series = name, "Recomputing series");

        let series = self.source.load_series(name).await?;
        let engine = Arc::clone(&self.engine);
        let period_range = self.period_range;
        let snapshot =
            tokio::task::spawn_blocking(move || compute_snapshot(&engine, &series, period_range))
                .await
                .map_err(|e| AggregatorError::TaskFailed {
                    series: name.to_string(),
                    reason: e.to_string(),
                })?;

        let published = self.cache.publish(snapshot);
        tracing::info!(
            series = name,
            generation = published.generation,
            records = published.record_count,
            failed = ?published.failed_metrics(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Series recomputed"
        );
        Ok(published)
    }

    /// Recomputes every series concurrently. Only listing the series can fail
    /// the batch as a whole.
    pub async fn recompute_all(&self) -> Result<Vec<SeriesOutcome>, AggregatorError> {
        let names = self.series_names().await?;
        let started = Instant::now();

        let results = join_all(names.iter().map(|name| self.recompute_series(name))).await;
        let outcomes: Vec<SeriesOutcome> = names.into_iter().zip(results).collect();

        let failed = outcomes.iter().filter(|(_, r)| r.is_err()).count();
        for (name, result) in &outcomes {
            if let Err(e) = result {
                tracing::error!(series = %name, error = %e, "Series recomputation failed; keeping previous snapshot");
            }
        }
        tracing::info!(
            series = outcomes.len(),
            failed,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Batch recomputation finished"
        );
        Ok(outcomes)
    }

    pub fn snapshot(&self, name: &str) -> Result<Arc<SeriesSnapshot>, AggregatorError> {
        self.cache
            .get(name)
            .ok_or_else(|| AggregatorError::UnknownSeries(name.to_string()))
    }

    pub fn summary(&self) -> Vec<SummaryRow> {
        self.cache
            .all()
            .iter()
            .map(|snapshot| SummaryRow::from_stats(snapshot.as_ref()))
            .collect()
    }

    /// Compares the published `winRate` of every cached series.
    pub fn compare_win_rates(&self) -> WinRateComparison {
        let maps: Vec<_> = self
            .cache
            .all()
            .iter()
            .map(|s| (s.series.clone(), s.flat_metrics()))
            .collect();
        compare_win_rates(maps.iter().map(|(name, map)| (name.as_str(), map)))
    }

    /// Comprehensive rates over the records whose period lies in `first..=last`.
    pub async fn period_analysis(
        &self,
        name: &str,
        first: Period,
        last: Period,
    ) -> Result<PeriodRateAnalysis, AggregatorError> {
        let series = self.source.load_series(name).await?;
        let selected: Vec<Record> = series
            .descending()
            .into_iter()
            .filter(|r| (first..=last).contains(&r.period))
            .collect();
        Ok(self.engine.period_rate_analysis(&selected))
    }

    pub async fn record(&self, name: &str, period: Period) -> Result<Record, AggregatorError> {
        Ok(self.source.by_period(name, period).await?)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use core_types::{BettingCategory, OutcomeCategory, Parity, Period, Record, Series};

    /// `len` records with periods 1001.. and a repeating mix of outcomes,
    /// betting results, kill markers and sums.
    pub fn series(name: &str, len: usize) -> Series {
        let records = (0..len)
            .map(|i| Record {
                period: 1001 + i as Period,
                outcome: match i % 4 {
                    0 | 1 => OutcomeCategory::Match,
                    2 => OutcomeCategory::Mismatch,
                    _ => OutcomeCategory::Special,
                },
                betting: if i % 3 == 0 {
                    BettingCategory::LossLike
                } else {
                    BettingCategory::ProfitLike
                },
                kill_marker: i % 5 != 0,
                parity: if i % 2 == 0 { Parity::Odd } else { Parity::Even },
                predicted_parity: Parity::Odd,
                numeric_sum: Some((i % 35) as i32),
            })
            .collect();
        Series::new(name, records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::series;
    use record_store::{MemoryRecordStore, StoreError};

    fn aggregator(store: Arc<MemoryRecordStore>, names: &[&str]) -> Aggregator {
        Aggregator::new(
            store,
            AnalysisParams::default(),
            names.iter().map(|n| n.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn a_missing_series_does_not_stop_the_batch() {
        let store = Arc::new(MemoryRecordStore::new());
        store.insert(series("sf1", 60)).unwrap();
        store.insert(series("sf3", 25)).unwrap();
        let agg = aggregator(store, &["sf1", "sf3", "sf9"]);

        let outcomes = agg.recompute_all().await.unwrap();
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].1.is_ok());
        assert!(outcomes[1].1.is_ok());
        assert!(matches!(
            outcomes[2].1,
            Err(AggregatorError::Store(StoreError::SeriesNotFound(_)))
        ));
        assert_eq!(agg.summary().len(), 2);
        assert!(matches!(agg.snapshot("sf9"), Err(AggregatorError::UnknownSeries(_))));
    }

    #[tokio::test]
    async fn recomputation_replaces_snapshots() {
        let store = Arc::new(MemoryRecordStore::new());
        store.insert(series("sf1", 10)).unwrap();
        let agg = aggregator(Arc::clone(&store), &[]);

        agg.recompute_all().await.unwrap();
        let before = agg.snapshot("sf1").unwrap();

        store.insert(series("sf1", 30)).unwrap();
        agg.recompute_all().await.unwrap();
        let after = agg.snapshot("sf1").unwrap();

        assert_eq!(before.record_count, 10);
        assert_eq!(after.record_count, 30);
        assert!(after.generation > before.generation);
    }

    #[tokio::test]
    async fn failed_load_keeps_the_previous_snapshot() {
        let store = Arc::new(MemoryRecordStore::new());
        store.insert(series("sf1", 10)).unwrap();
        let agg = aggregator(store, &["sf1"]);
        agg.recompute_all().await.unwrap();

        let agg = Aggregator {
            source: Arc::new(MemoryRecordStore::new()),
            ..agg
        };
        let outcomes = agg.recompute_all().await.unwrap();
        assert!(outcomes[0].1.is_err());
        assert_eq!(agg.snapshot("sf1").unwrap().record_count, 10);
    }

    #[tokio::test]
    async fn comparison_uses_cached_win_rates() {
        let store = Arc::new(MemoryRecordStore::new());
        store.insert(series("sf1", 40)).unwrap();
        store.insert(series("sf3", 41)).unwrap();
        let agg = aggregator(store, &[]);
        agg.recompute_all().await.unwrap();

        let comparison = agg.compare_win_rates();
        assert_eq!(comparison.server_rates.len(), 2);
        assert!(comparison.best_server.is_some());
        let best = comparison.best_server.clone().unwrap();
        assert_eq!(comparison.server_rates[&best], comparison.best_rate);
    }

    #[tokio::test]
    async fn period_analysis_filters_by_period() {
        let store = Arc::new(MemoryRecordStore::new());
        store.insert(series("sf1", 20)).unwrap();
        let agg = aggregator(store, &["sf1"]);

        let analysis = agg.period_analysis("sf1", 1005, 1008).await.unwrap();
        assert_eq!(analysis.analyze_type, "periodAnalysis");
        assert_eq!(analysis.first_period, Some(1005));
        assert_eq!(analysis.last_period, Some(1008));
        assert_eq!(analysis.rates.total_count, 4);

        assert_eq!(agg.record("sf1", 1003).await.unwrap().period, 1003);
    }

    #[tokio::test]
    async fn period_range_limits_the_global_maximum() {
        let store = Arc::new(MemoryRecordStore::new());
        store.insert(series("sf1", 50)).unwrap();
        let agg = aggregator(store, &["sf1"]).with_period_range(Some(10));
        let snapshot = agg.recompute_series("sf1").await.unwrap();
        let max = snapshot.max_kill_streak.as_ref().unwrap();
        assert_eq!(max.records_scanned, 10);
    }
}
