use crate::error::AnalyticsError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A percentage rounded to two decimal places, rendered as `"NN.NN%"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Percentage(Decimal);

impl Percentage {
    pub const ZERO: Percentage = Percentage(Decimal::ZERO);

    /// `part / whole * 100`, rounded half away from zero. A zero `whole` yields 0.00.
    pub fn of(part: usize, whole: usize) -> Self {
        if whole == 0 {
            return Self::ZERO;
        }
        let raw = Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole);
        Self(raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Parses a previously formatted percentage, falling back to zero.
    ///
    /// Used where cached output is compared across series; a bad value
    /// only zeroes that one comparison input.
    pub fn parse_or_zero(text: &str) -> Self {
        match text.parse::<Percentage>() {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(input = text, error = %e, "Malformed percentage, using 0.00%");
                Self::ZERO
            }
        }
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

impl FromStr for Percentage {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
        let value = Decimal::from_str(number)
            .map_err(|_| AnalyticsError::MalformedNumber(s.to_string()))?;
        Ok(Self(value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)))
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_denominator_is_zero() {
        assert_eq!(Percentage::of(0, 0), Percentage::ZERO);
        assert_eq!(Percentage::of(5, 0).to_string(), "0.00%");
    }

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(Percentage::of(1, 3).value(), dec!(33.33));
        assert_eq!(Percentage::of(2, 3).value(), dec!(66.67));
        assert_eq!(Percentage::of(1, 8).to_string(), "12.50%");
        assert_eq!(Percentage::of(7, 7).to_string(), "100.00%");
    }

    #[test]
    fn parses_formatted_output() {
        let p: Percentage = "45.67%".parse().unwrap();
        assert_eq!(p.value(), dec!(45.67));
        assert_eq!(" 12 ".parse::<Percentage>().unwrap().to_string(), "12.00%");
    }

    #[test]
    fn malformed_input_falls_back_to_zero() {
        assert!("--%".parse::<Percentage>().is_err());
        assert_eq!(Percentage::parse_or_zero("--%"), Percentage::ZERO);
        assert_eq!(Percentage::parse_or_zero(""), Percentage::ZERO);
    }

    #[test]
    fn serializes_as_string() {
        let json = serde_json::to_string(&Percentage::of(1, 4)).unwrap();
        assert_eq!(json, "\"25.00%\"");
        let back: Percentage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Percentage::of(1, 4));
    }
}
