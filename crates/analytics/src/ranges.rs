//! Kill-marker streak analysis over most-recent-first sequences.
//!
//! Every entry point first drops a pending newest record. Run boundaries are
//! reported chronologically: `start_period` is the older end of the run and
//! `end_period` the more recent one.

use crate::error::AnalyticsError;
use crate::report::{
    KillRun, KillStreakHistory, MaxKillStreak, QualifyingStreak, RangeBucket, RangeBuckets,
};
use crate::sequence::{hint_if_not_descending, strip_pending, window};
use core_types::{Period, Record};

pub const DEFAULT_MIN_STREAK: usize = 5;
pub const DEFAULT_BUCKET_WIDTH: usize = 100;
pub const DEFAULT_BUCKET_COUNT: usize = 10;

/// Every maximal run of kill-marked records, in traversal order.
pub fn kill_runs(records: &[Record]) -> Vec<KillRun> {
    let mut runs = Vec::new();
    let mut open: Option<KillRun> = None;

    for record in records {
        if record.kill_marker {
            match open.as_mut() {
                Some(run) => {
                    run.length += 1;
                    run.start_period = record.period;
                }
                None => {
                    open = Some(KillRun {
                        length: 1,
                        start_period: record.period,
                        end_period: record.period,
                    })
                }
            }
        } else if let Some(run) = open.take() {
            runs.push(run);
        }
    }
    runs.extend(open);
    runs
}

/// The longest run; on ties the first one encountered wins.
pub fn longest_run(records: &[Record]) -> Option<KillRun> {
    kill_runs(records).into_iter().fold(None, |best, run| match best {
        Some(b) if run.length <= b.length => Some(b),
        _ => Some(run),
    })
}

/// Longest kill run over the most recent `period_range` records, or over
/// everything when no range is given.
pub fn max_kill_streak(
    records: &[Record],
    period_range: Option<usize>,
) -> Result<MaxKillStreak, AnalyticsError> {
    if period_range == Some(0) {
        return Err(AnalyticsError::must_be_positive("period_range"));
    }
    let filtered = strip_pending(records);
    hint_if_not_descending("max_kill_streak", filtered);

    let scanned = match period_range {
        Some(n) => window(filtered, n),
        None => filtered,
    };
    let latest = filtered.first().map(|r| r.period);
    Ok(summarize(longest_run(scanned), latest, scanned.len()))
}

/// Every closed run at least `min_streak` long, longest first.
pub fn kill_streak_history(
    records: &[Record],
    min_streak: usize,
) -> Result<KillStreakHistory, AnalyticsError> {
    if min_streak == 0 {
        return Err(AnalyticsError::must_be_positive("min_streak"));
    }
    let filtered = strip_pending(records);
    let Some(latest) = filtered.first().map(|r| r.period) else {
        return Ok(KillStreakHistory {
            min_streak,
            ..Default::default()
        });
    };

    let mut streaks: Vec<QualifyingStreak> = kill_runs(filtered)
        .into_iter()
        .filter(|run| run.length >= min_streak)
        .map(|run| QualifyingStreak {
            streak_count: run.length,
            start_period: run.start_period,
            end_period: run.end_period,
            period_diff: run.distance_from(latest),
        })
        .collect();
    // Stable, so equal lengths stay most-recent-first.
    streaks.sort_by(|a, b| b.streak_count.cmp(&a.streak_count));

    tracing::debug!(min_streak, found = streaks.len(), "Qualifying kill streaks enumerated");
    Ok(KillStreakHistory {
        count: streaks.len(),
        streaks,
        min_streak,
    })
}

/// Longest kill run inside each index bucket `[i*width, (i+1)*width)`.
///
/// Runs never cross a bucket boundary. Buckets past the end of the data are
/// reported empty.
pub fn range_buckets(
    records: &[Record],
    bucket_width: usize,
    bucket_count: usize,
) -> Result<RangeBuckets, AnalyticsError> {
    if bucket_width == 0 {
        return Err(AnalyticsError::must_be_positive("bucket_width"));
    }
    let filtered = strip_pending(records);
    let latest = filtered.first().map(|r| r.period);

    let buckets = (0..bucket_count)
        .map(|i| {
            let range = (i + 1).saturating_mul(bucket_width);
            let start = i.saturating_mul(bucket_width);
            if start >= filtered.len() {
                return RangeBucket {
                    range,
                    ..Default::default()
                };
            }
            let slice = &filtered[start..range.min(filtered.len())];
            let run = longest_run(slice);
            RangeBucket {
                range,
                record_count: slice.len(),
                max_consecutive_kills: run.map_or(0, |r| r.length),
                start_period: run.map(|r| r.start_period),
                end_period: run.map(|r| r.end_period),
                period_diff: latest.zip(run).map(|(l, r)| r.distance_from(l)),
            }
        })
        .collect();

    Ok(RangeBuckets {
        overall: summarize(longest_run(filtered), latest, filtered.len()),
        latest_period: latest,
        buckets,
    })
}

fn summarize(run: Option<KillRun>, latest: Option<Period>, scanned: usize) -> MaxKillStreak {
    let period_diff = match (run, latest) {
        (Some(run), Some(latest)) => {
            let diff = run.distance_from(latest);
            if diff < 0 {
                tracing::warn!(diff, latest, "Negative period distance, using 0");
                0
            } else {
                diff
            }
        }
        _ => 0,
    };
    MaxKillStreak {
        max_consecutive_kills: run.map_or(0, |r| r.length),
        start_period: run.map(|r| r.start_period),
        end_period: run.map(|r| r.end_period),
        period_diff,
        records_scanned: scanned,
    }
}
