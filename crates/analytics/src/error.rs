use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Could not parse '{0}' as a number")]
    MalformedNumber(String),
}

impl AnalyticsError {
    pub(crate) fn must_be_positive(name: &'static str) -> Self {
        AnalyticsError::InvalidParameter {
            name,
            reason: "must be greater than zero".to_string(),
        }
    }
}
