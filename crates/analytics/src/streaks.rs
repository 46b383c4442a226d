use crate::report::CurrentStreaks;
use crate::sequence::hint_if_not_descending;
use core_types::{BettingCategory, OutcomeCategory, Record, StreakCategory};

/// Length of the run of `target` at the head of a most-recent-first sequence.
///
/// Leading special values are skipped, special values inside the run are
/// skipped without counting, and the first opposite value ends the scan.
pub fn current_run<C, I>(categories: I, target: C) -> u32
where
    C: StreakCategory + std::fmt::Debug,
    I: IntoIterator<Item = C>,
{
    let mut count = 0;
    for (index, category) in categories.into_iter().enumerate() {
        if category == target {
            count += 1;
        } else if category.is_special() {
            tracing::trace!(index, ?category, "special value skipped");
        } else {
            tracing::trace!(index, ?category, ?target, count, "run ended");
            break;
        }
    }
    count
}

/// Current correct/incorrect/profit/loss streaks, each from its own pass.
///
/// Expects most-recent-first input.
pub fn current_streaks(records: &[Record]) -> CurrentStreaks {
    if records.is_empty() {
        return CurrentStreaks::default();
    }
    hint_if_not_descending("current_streaks", records);

    let outcomes = || records.iter().map(|r| r.outcome);
    let bettings = || records.iter().map(|r| r.betting);

    let streaks = CurrentStreaks {
        consecutive_correct: current_run(outcomes(), OutcomeCategory::Match),
        consecutive_incorrect: current_run(outcomes(), OutcomeCategory::Mismatch),
        consecutive_profit: current_run(bettings(), BettingCategory::ProfitLike),
        consecutive_loss: current_run(bettings(), BettingCategory::LossLike),
    };
    tracing::debug!(records = records.len(), ?streaks, "Current streaks computed");
    streaks
}
