use core_types::{CoreError, Period};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read record data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse record data for series '{series}': {source}")]
    Json {
        series: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Series '{0}' was not found.")]
    SeriesNotFound(String),

    #[error("Series '{series}' has no record for period {period}.")]
    PeriodNotFound { series: String, period: Period },

    #[error("'{0}' is not a valid series name.")]
    InvalidSeriesName(String),

    #[error("Stored records are inconsistent: {0}")]
    Invalid(#[from] CoreError),
}
