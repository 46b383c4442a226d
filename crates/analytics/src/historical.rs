use crate::report::HistoricalStreaks;
use core_types::{BettingCategory, OutcomeCategory, Period, Record};

/// Running state for one category during the chronological scan.
#[derive(Debug, Default)]
struct RunTracker {
    current: u32,
    start: Option<Period>,
    best: u32,
    best_start: Option<Period>,
}

impl RunTracker {
    fn extend(&mut self, period: Period) {
        if self.current == 0 {
            self.start = Some(period);
        }
        self.current += 1;
    }

    /// Commits the open run if it beats the maximum, then resets it.
    /// Ties keep the earlier run.
    fn close(&mut self) {
        if self.current > self.best {
            self.best = self.current;
            self.best_start = self.start;
        }
        self.current = 0;
    }
}

/// Longest correct/incorrect/profit/loss runs in a single forward pass.
///
/// Expects chronological (ascending period) input. Every non-match outcome,
/// special values included, counts toward the incorrect run. A special
/// betting value closes both the profit and the loss run.
pub fn historical_streaks(records: &[Record]) -> HistoricalStreaks {
    let mut correct = RunTracker::default();
    let mut incorrect = RunTracker::default();
    let mut profit = RunTracker::default();
    let mut loss = RunTracker::default();

    if let [first, second, ..] = records {
        if first.period > second.period {
            tracing::debug!(
                first = first.period,
                second = second.period,
                "Records do not appear to be in ascending period order"
            );
        }
    }

    for record in records {
        match record.outcome {
            OutcomeCategory::Match => {
                incorrect.close();
                correct.extend(record.period);
            }
            OutcomeCategory::Mismatch | OutcomeCategory::Special => {
                correct.close();
                incorrect.extend(record.period);
            }
        }

        match record.betting {
            BettingCategory::ProfitLike => {
                loss.close();
                profit.extend(record.period);
            }
            BettingCategory::LossLike => {
                profit.close();
                loss.extend(record.period);
            }
            BettingCategory::Special => {
                profit.close();
                loss.close();
            }
        }
    }

    for tracker in [&mut correct, &mut incorrect, &mut profit, &mut loss] {
        tracker.close();
    }

    HistoricalStreaks {
        max_consecutive_correct: correct.best,
        max_consecutive_incorrect: incorrect.best,
        max_consecutive_profit: profit.best,
        max_consecutive_loss: loss.best,
        max_correct_start_period: correct.best_start,
        max_incorrect_start_period: incorrect.best_start,
        max_profit_start_period: profit.best_start,
        max_loss_start_period: loss.best_start,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::fixtures::record;
    use BettingCategory::{LossLike as L, ProfitLike as P, Special as B};
    use OutcomeCategory::{Match as M, Mismatch as X, Special as S};

    fn ascending(outcomes: &[OutcomeCategory], betting: &[BettingCategory]) -> Vec<Record> {
        outcomes
            .iter()
            .zip(betting)
            .enumerate()
            .map(|(i, (&outcome, &betting))| Record {
                outcome,
                betting,
                ..record(i as Period + 1)
            })
            .collect()
    }

    #[test]
    fn longest_runs_and_their_starts() {
        let records = ascending(&[M, M, X, M, M, M, X], &[P, P, L, L, L, P, P]);
        let h = historical_streaks(&records);
        assert_eq!(h.max_consecutive_correct, 3);
        assert_eq!(h.max_correct_start_period, Some(4));
        assert_eq!(h.max_consecutive_incorrect, 1);
        assert_eq!(h.max_incorrect_start_period, Some(3));
        assert_eq!(h.max_consecutive_loss, 3);
        assert_eq!(h.max_loss_start_period, Some(3));
        assert_eq!(h.max_consecutive_profit, 2);
        assert_eq!(h.max_profit_start_period, Some(1));
    }

    #[test]
    fn special_outcome_counts_as_incorrect() {
        let records = ascending(&[M, S, S, S, M], &[P, P, P, P, P]);
        let h = historical_streaks(&records);
        assert_eq!(h.max_consecutive_incorrect, 3);
        assert_eq!(h.max_incorrect_start_period, Some(2));
    }

    #[test]
    fn special_betting_closes_both_runs() {
        let records = ascending(&[M, M, M, M, M, M], &[L, L, B, L, P, P]);
        let h = historical_streaks(&records);
        assert_eq!(h.max_consecutive_loss, 2);
        assert_eq!(h.max_loss_start_period, Some(1));
        assert_eq!(h.max_consecutive_profit, 2);
        assert_eq!(h.max_profit_start_period, Some(5));
    }

    #[test]
    fn ties_keep_the_first_run() {
        let records = ascending(&[M, M, X, M, M], &[P, P, P, P, P]);
        let h = historical_streaks(&records);
        assert_eq!(h.max_consecutive_correct, 2);
        assert_eq!(h.max_correct_start_period, Some(1));
    }

    #[test]
    fn open_runs_are_flushed_at_the_end() {
        let records = ascending(&[X, M, M, M], &[P, L, L, L]);
        let h = historical_streaks(&records);
        assert_eq!(h.max_consecutive_correct, 3);
        assert_eq!(h.max_consecutive_loss, 3);
        assert_eq!(h.max_loss_start_period, Some(2));
    }

    #[test]
    fn empty_input_is_zeroed() {
        assert_eq!(historical_streaks(&[]), HistoricalStreaks::default());
    }
}
