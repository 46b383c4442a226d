//! # Series Analytics
//!
//! Pure, stateless statistics over the records of one series: win and kill
//! rates, current and historical streaks, kill-marker range analysis and
//! result distributions.
//!
//! ## Ordering
//!
//! Most analyzers expect most-recent-first records. `historical_streaks`
//! expects chronological records. Neither order is validated; misordered
//! input produces results consistent with the order given.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: binds every analyzer to one `AnalysisParams`.
//! - `Percentage`: the two-decimal `"NN.NN%"` value every rate is reported in.
//! - the free functions in `rates`, `streaks`, `historical`, `ranges` and
//!   `distribution` for callers that want a single analyzer.

pub mod distribution;
pub mod engine;
pub mod error;
pub mod historical;
pub mod percent;
pub mod ranges;
pub mod rates;
pub mod report;
pub mod sequence;
pub mod streaks;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{AnalysisParams, AnalyticsEngine};
pub use error::AnalyticsError;
pub use percent::Percentage;
pub use report::*;
