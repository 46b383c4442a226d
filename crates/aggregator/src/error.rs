use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregatorError {
    #[error("Record store error: {0}")]
    Store(#[from] record_store::StoreError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("No results have been computed for series '{0}'")]
    UnknownSeries(String),

    #[error("The analysis task for series '{series}' did not complete: {reason}")]
    TaskFailed { series: String, reason: String },
}
