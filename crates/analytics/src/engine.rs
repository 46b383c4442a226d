use crate::error::AnalyticsError;
use crate::rates::{default_window_sizes, multi_window_rates, windowed_rate};
use crate::ranges::{DEFAULT_BUCKET_COUNT, DEFAULT_BUCKET_WIDTH, DEFAULT_MIN_STREAK};
use crate::report::{
    ComprehensiveRates, CurrentStreaks, DetailedDistribution, HistoricalStreaks,
    KillStreakHistory, MaxKillStreak, PeriodRateAnalysis, RangeBuckets, WinRate, WindowRate,
    WindowRates,
};
use crate::sequence::window;
use crate::{distribution, historical, ranges, rates, streaks};
use core_types::Record;

/// Tunables shared by the analyzers.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisParams {
    /// Window for `recentWinRate`.
    pub recent_window: usize,
    /// How many of the most recent records the current-streak scan sees.
    pub current_streak_lookback: usize,
    pub window_sizes: Vec<usize>,
    pub drop_pending: bool,
    pub min_streak: usize,
    pub bucket_width: usize,
    pub bucket_count: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            recent_window: 100,
            current_streak_lookback: 100,
            window_sizes: default_window_sizes(),
            drop_pending: true,
            min_streak: DEFAULT_MIN_STREAK,
            bucket_width: DEFAULT_BUCKET_WIDTH,
            bucket_count: DEFAULT_BUCKET_COUNT,
        }
    }
}

/// A stateless calculator that binds the analyzers to one set of parameters.
///
/// Methods taking `desc` expect most-recent-first records; `historical_streaks`
/// expects chronological records.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    params: AnalysisParams,
}

impl AnalyticsEngine {
    pub fn new(params: AnalysisParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    pub fn win_rate(&self, desc: &[Record]) -> WinRate {
        rates::win_rate_of(desc)
    }

    pub fn recent_win_rate(&self, desc: &[Record]) -> Result<WindowRate, AnalyticsError> {
        windowed_rate(desc, self.params.recent_window)
    }

    pub fn window_rates(&self, desc: &[Record]) -> Result<WindowRates, AnalyticsError> {
        multi_window_rates(desc, &self.params.window_sizes, self.params.drop_pending)
    }

    pub fn comprehensive_rates(&self, desc: &[Record]) -> ComprehensiveRates {
        rates::comprehensive_rates(desc)
    }

    /// Rates over an arbitrary sub-range; order does not matter.
    pub fn period_rate_analysis(&self, records: &[Record]) -> PeriodRateAnalysis {
        rates::period_rate_analysis(records)
    }

    pub fn current_streaks(&self, desc: &[Record]) -> Result<CurrentStreaks, AnalyticsError> {
        if self.params.current_streak_lookback == 0 {
            return Err(AnalyticsError::must_be_positive("current_streak_lookback"));
        }
        Ok(streaks::current_streaks(window(desc, self.params.current_streak_lookback)))
    }

    pub fn historical_streaks(&self, asc: &[Record]) -> HistoricalStreaks {
        historical::historical_streaks(asc)
    }

    pub fn distribution(&self, desc: &[Record]) -> DetailedDistribution {
        distribution::detailed_distribution(desc)
    }

    pub fn max_kill_streak(
        &self,
        desc: &[Record],
        period_range: Option<usize>,
    ) -> Result<MaxKillStreak, AnalyticsError> {
        ranges::max_kill_streak(desc, period_range)
    }

    /// Uses the configured `min_streak` unless the caller overrides it.
    pub fn kill_streak_history(
        &self,
        desc: &[Record],
        min_streak: Option<usize>,
    ) -> Result<KillStreakHistory, AnalyticsError> {
        ranges::kill_streak_history(desc, min_streak.unwrap_or(self.params.min_streak))
    }

    pub fn range_buckets(&self, desc: &[Record]) -> Result<RangeBuckets, AnalyticsError> {
        ranges::range_buckets(desc, self.params.bucket_width, self.params.bucket_count)
    }
}
