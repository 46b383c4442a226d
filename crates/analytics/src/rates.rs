use crate::error::AnalyticsError;
use crate::percent::Percentage;
use crate::report::{ComprehensiveRates, PeriodRateAnalysis, WinRate, WindowRate, WindowRates};
use crate::sequence::{hint_if_not_descending, strip_pending, window};
use core_types::{BettingCategory, OutcomeCategory, Record};

/// `hits / total * 100` rounded to two places; a zero total yields 0.00.
pub fn basic_rate(total: usize, hits: usize) -> Percentage {
    Percentage::of(hits, total)
}

/// Overall win rate from counts the caller already has.
pub fn win_rate(total: usize, correct: usize, incorrect: usize) -> WinRate {
    WinRate {
        total_count: total,
        correct_count: correct,
        incorrect_count: incorrect,
        win_rate: basic_rate(total, correct),
    }
}

/// Counts over a whole sequence and turns them into a `WinRate`.
pub fn win_rate_of(records: &[Record]) -> WinRate {
    let correct = count_outcome(records, OutcomeCategory::Match);
    let incorrect = count_outcome(records, OutcomeCategory::Mismatch);
    win_rate(records.len(), correct, incorrect)
}

/// Win and kill rate over the most recent `window_size` records.
///
/// Expects most-recent-first input.
pub fn windowed_rate(records: &[Record], window_size: usize) -> Result<WindowRate, AnalyticsError> {
    if window_size == 0 {
        return Err(AnalyticsError::must_be_positive("window_size"));
    }
    hint_if_not_descending("windowed_rate", records);

    let recent = window(records, window_size);
    let total = recent.len();
    let correct = count_outcome(recent, OutcomeCategory::Match);
    let killed = recent.iter().filter(|r| r.kill_marker).count();

    Ok(WindowRate {
        recent_count: window_size,
        total_count: total,
        correct_count: correct,
        incorrect_count: count_outcome(recent, OutcomeCategory::Mismatch),
        killed_count: killed,
        win_rate: basic_rate(total, correct),
        kill_rate: basic_rate(total, killed),
    })
}

/// `windowed_rate` for each size, every window taken from the same base.
///
/// With `drop_pending` set, a pending newest record is removed once before
/// any window is cut.
pub fn multi_window_rates(
    records: &[Record],
    sizes: &[usize],
    drop_pending: bool,
) -> Result<WindowRates, AnalyticsError> {
    let base = if drop_pending { strip_pending(records) } else { records };
    let windows = sizes
        .iter()
        .map(|&size| windowed_rate(base, size))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WindowRates {
        pending_dropped: base.len() != records.len(),
        windows,
    })
}

/// The 30, 50, then 100..=1000 step 50 window set.
pub fn default_window_sizes() -> Vec<usize> {
    let mut sizes = vec![30, 50];
    sizes.extend((100..=1000).step_by(50));
    sizes
}

pub fn comprehensive_rates(records: &[Record]) -> ComprehensiveRates {
    let total = records.len();
    let mut rates = ComprehensiveRates {
        total_count: total,
        ..Default::default()
    };

    for record in records {
        match record.outcome {
            OutcomeCategory::Match => {
                rates.correct_count += 1;
                if record.kill_marker {
                    rates.correct_but_killed_count += 1;
                }
            }
            OutcomeCategory::Mismatch => rates.incorrect_count += 1,
            OutcomeCategory::Special => {}
        }
        if record.kill_marker {
            rates.killed_count += 1;
        }
        match record.betting {
            BettingCategory::ProfitLike => rates.profit_count += 1,
            BettingCategory::LossLike => rates.loss_count += 1,
            BettingCategory::Special => {}
        }
    }

    rates.prediction_win_rate = basic_rate(total, rates.correct_count);
    rates.actual_win_rate = basic_rate(total, rates.correct_count - rates.correct_but_killed_count);
    rates.killed_rate = basic_rate(total, rates.killed_count);
    rates.correct_killed_rate = basic_rate(rates.correct_count, rates.correct_but_killed_count);
    rates.profit_rate = basic_rate(total, rates.profit_count);
    rates.loss_rate = basic_rate(total, rates.loss_count);
    rates
}

/// `comprehensive_rates` over a sub-range of periods chosen by the caller.
pub fn period_rate_analysis(records: &[Record]) -> PeriodRateAnalysis {
    PeriodRateAnalysis {
        analyze_type: "periodAnalysis".to_string(),
        first_period: records.iter().map(|r| r.period).min(),
        last_period: records.iter().map(|r| r.period).max(),
        rates: comprehensive_rates(records),
    }
}

fn count_outcome(records: &[Record], target: OutcomeCategory) -> usize {
    records.iter().filter(|r| r.outcome == target).count()
}
