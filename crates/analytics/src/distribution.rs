use crate::percent::Percentage;
use crate::report::{DetailedDistribution, ResultDistribution, SumRange};
use core_types::{Parity, Record};

/// Odd/even counts and the exact-sum histogram over the whole series.
pub fn result_distribution(records: &[Record]) -> ResultDistribution {
    let mut dist = ResultDistribution {
        total_records: records.len(),
        ..Default::default()
    };

    for record in records {
        match record.parity {
            Parity::Odd => dist.single_count += 1,
            Parity::Even => dist.double_count += 1,
            Parity::Unknown => {}
        }
        if let Some(sum) = record.numeric_sum {
            *dist.total_number_distribution.entry(sum).or_insert(0) += 1;
        }
    }

    dist.single_rate = Percentage::of(dist.single_count, dist.total_records);
    dist.double_rate = Percentage::of(dist.double_count, dist.total_records);
    dist
}

/// `result_distribution` plus kill-conditioned parity, parity prediction
/// accuracy and the ranged sum histogram.
pub fn detailed_distribution(records: &[Record]) -> DetailedDistribution {
    let base = result_distribution(records);
    let mut detailed = DetailedDistribution::default();
    let mut parity_predictions = 0;

    for record in records {
        if record.kill_marker {
            match record.parity {
                Parity::Odd => detailed.killed_single_count += 1,
                Parity::Even => detailed.killed_double_count += 1,
                Parity::Unknown => {}
            }
        }

        if record.parity.is_known() && record.predicted_parity.is_known() {
            parity_predictions += 1;
        }
        match (record.predicted_parity, record.parity) {
            (Parity::Odd, Parity::Odd) => detailed.correct_single_predictions += 1,
            (Parity::Even, Parity::Even) => detailed.correct_double_predictions += 1,
            _ => {}
        }

        if let Some(sum) = record.numeric_sum {
            *detailed.number_range_distribution.entry(SumRange::of(sum)).or_insert(0) += 1;
        }
    }

    detailed.killed_single_rate = Percentage::of(detailed.killed_single_count, base.single_count);
    detailed.killed_double_rate = Percentage::of(detailed.killed_double_count, base.double_count);
    detailed.parity_prediction_accuracy = Percentage::of(
        detailed.correct_single_predictions + detailed.correct_double_predictions,
        parity_predictions,
    );
    detailed.base = base;
    detailed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::fixtures::record;

    fn drawn(period: i64, parity: Parity, predicted: Parity, sum: Option<i32>, kill: bool) -> Record {
        Record {
            parity,
            predicted_parity: predicted,
            numeric_sum: sum,
            kill_marker: kill,
            ..record(period)
        }
    }

    fn sample() -> Vec<Record> {
        vec![
            drawn(6, Parity::Odd, Parity::Odd, Some(5), true),
            drawn(5, Parity::Even, Parity::Odd, Some(12), false),
            drawn(4, Parity::Even, Parity::Even, Some(12), true),
            drawn(3, Parity::Odd, Parity::Even, Some(25), false),
            drawn(2, Parity::Unknown, Parity::Odd, None, true),
            drawn(1, Parity::Odd, Parity::Unknown, Some(33), false),
        ]
    }

    #[test]
    fn parity_counts_and_rates() {
        let dist = result_distribution(&sample());
        assert_eq!(dist.total_records, 6);
        assert_eq!(dist.single_count, 3);
        assert_eq!(dist.double_count, 2);
        assert_eq!(dist.single_rate.to_string(), "50.00%");
        assert_eq!(dist.double_rate.to_string(), "33.33%");
        assert_eq!(dist.total_number_distribution.get(&12), Some(&2));
        assert_eq!(dist.total_number_distribution.len(), 4);
    }

    #[test]
    fn kill_conditioned_parity() {
        let d = detailed_distribution(&sample());
        assert_eq!(d.killed_single_count, 1);
        assert_eq!(d.killed_double_count, 1);
        assert_eq!(d.killed_single_rate.to_string(), "33.33%");
        assert_eq!(d.killed_double_rate.to_string(), "50.00%");
    }

    #[test]
    fn parity_prediction_accuracy_ignores_unknowns() {
        let d = detailed_distribution(&sample());
        assert_eq!(d.correct_single_predictions, 1);
        assert_eq!(d.correct_double_predictions, 1);
        assert_eq!(d.parity_prediction_accuracy.to_string(), "50.00%");
    }

    #[test]
    fn sum_histogram_uses_fixed_ranges() {
        let d = detailed_distribution(&sample());
        assert_eq!(d.number_range_distribution.get(&SumRange::UpToTen), Some(&1));
        assert_eq!(d.number_range_distribution.get(&SumRange::ElevenToTwenty), Some(&2));
        assert_eq!(d.number_range_distribution.get(&SumRange::TwentyOneToThirty), Some(&1));
        assert_eq!(d.number_range_distribution.get(&SumRange::AboveThirty), Some(&1));
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["numberRangeDistribution"]["11-20"], 2);
        assert_eq!(json["singleRate"], "50.00%");
    }

    #[test]
    fn empty_input_is_zeroed() {
        let d = detailed_distribution(&[]);
        assert_eq!(d.base.total_records, 0);
        assert_eq!(d.killed_single_rate.to_string(), "0.00%");
        assert!(d.number_range_distribution.is_empty());
    }
}
