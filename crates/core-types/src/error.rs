use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Period {period} appears more than once in series '{series}'")]
    DuplicatePeriod { series: String, period: i64 },
}
