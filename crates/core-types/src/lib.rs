//! Shared vocabulary for every crate in the workspace: the per-period
//! `Record`, its closed category enums and the `Series` wrapper.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{BettingCategory, OutcomeCategory, Parity, StreakCategory};
pub use error::CoreError;
pub use structs::{Period, Record, Series};
