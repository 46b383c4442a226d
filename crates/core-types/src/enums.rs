use serde::{Deserialize, Serialize};

/// Whether the prediction for a period was correct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeCategory {
    Match,
    Mismatch,
    /// Empty, placeholder or unrecognized outcome labels.
    Special,
}

/// The financial result of the betting action for a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BettingCategory {
    /// "hit-and-profit" or "miss-but-profit".
    ProfitLike,
    /// "hit-but-lost" or "miss-and-loss".
    LossLike,
    Special,
}

/// Parity of a drawn (or predicted) result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Parity {
    Odd,
    Even,
    #[default]
    Unknown,
}

/// A two-sided category with a third "special" value that is neither side.
///
/// The streak analyzers are written against this trait so the outcome pair
/// and the betting pair share one state machine.
pub trait StreakCategory: Copy + PartialEq {
    fn is_special(&self) -> bool;
}

impl StreakCategory for OutcomeCategory {
    fn is_special(&self) -> bool {
        matches!(self, OutcomeCategory::Special)
    }
}

impl StreakCategory for BettingCategory {
    fn is_special(&self) -> bool {
        matches!(self, BettingCategory::Special)
    }
}

impl Parity {
    pub fn is_known(&self) -> bool {
        !matches!(self, Parity::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_third_value_is_special() {
        assert!(OutcomeCategory::Special.is_special());
        assert!(!OutcomeCategory::Match.is_special());
        assert!(!OutcomeCategory::Mismatch.is_special());
        assert!(BettingCategory::Special.is_special());
        assert!(!BettingCategory::ProfitLike.is_special());
        assert!(!BettingCategory::LossLike.is_special());
    }

    #[test]
    fn parity_defaults_to_unknown() {
        assert_eq!(Parity::default(), Parity::Unknown);
        assert!(!Parity::Unknown.is_known());
        assert!(Parity::Odd.is_known());
    }
}
