//! # Record Store
//!
//! The ingestion boundary. Upstream data arrives as per-series lists of
//! records with free-text labels; this crate maps them to the closed enums in
//! `core-types` and hands out `Series` values. Nothing downstream sees a raw
//! label.
//!
//! ## Public API
//!
//! - `RecordSource`: the async interface the aggregator reads through.
//! - `JsonRecordStore`: one `<series>.json` file per series.
//! - `MemoryRecordStore`: an in-memory source for tests and embedding.
//! - `RawRecord` and the label mapping functions.

use async_trait::async_trait;
use core_types::{Period, Record, Series};

pub mod error;
mod file;
pub mod labels;
mod memory;

pub use error::StoreError;
pub use file::JsonRecordStore;
pub use labels::RawRecord;
pub use memory::MemoryRecordStore;

/// Read access to the records of every known series.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn series_names(&self) -> Result<Vec<String>, StoreError>;

    /// All records of a series, in stored order.
    async fn load_series(&self, name: &str) -> Result<Series, StoreError>;

    /// The `limit` most recent records, most recent first.
    async fn recent(&self, name: &str, limit: usize) -> Result<Vec<Record>, StoreError> {
        let mut records = self.load_series(name).await?.descending();
        records.truncate(limit);
        Ok(records)
    }

    async fn by_period(&self, name: &str, period: Period) -> Result<Record, StoreError> {
        let series = self.load_series(name).await?;
        series
            .records
            .into_iter()
            .find(|r| r.period == period)
            .ok_or_else(|| StoreError::PeriodNotFound {
                series: name.to_string(),
                period,
            })
    }
}
