use analytics::AnalysisParams;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSettings,
    pub analysis: AnalysisSettings,
    pub scheduler: SchedulerSettings,
    pub logging: LoggingSettings,
}

/// Where the record files live and which series to analyze.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding one `<series>.json` file per series.
    pub directory: PathBuf,
    /// Series to analyze. Empty means every `<series>.json` in `directory`.
    pub series: Vec<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data"),
            series: vec!["sf1".to_string()],
        }
    }
}

/// An inclusive `start..=end` range of window sizes stepping by `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WindowRange {
    pub start: usize,
    pub end: usize,
    pub step: usize,
}

/// Parameters for the statistics engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Window for the recent win rate.
    pub recent_window: usize,
    /// Records fed to the current-streak scan.
    pub current_streak_lookback: usize,
    /// Fixed window sizes listed before the generated range.
    pub window_sizes: Vec<usize>,
    pub window_range: Option<WindowRange>,
    /// Remove a pending newest record before cutting rate windows.
    pub drop_pending: bool,
    pub min_streak: usize,
    pub bucket_width: usize,
    pub bucket_count: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            recent_window: 100,
            current_streak_lookback: 100,
            window_sizes: vec![30, 50],
            window_range: Some(WindowRange {
                start: 100,
                end: 1000,
                step: 50,
            }),
            drop_pending: true,
            min_streak: 5,
            bucket_width: 100,
            bucket_count: 10,
        }
    }
}

impl AnalysisSettings {
    /// The fixed sizes followed by every size in `window_range`.
    pub fn all_window_sizes(&self) -> Vec<usize> {
        let mut sizes = self.window_sizes.clone();
        if let Some(range) = self.window_range {
            if range.step > 0 {
                sizes.extend((range.start..=range.end).step_by(range.step));
            }
        }
        sizes
    }

    pub fn to_params(&self) -> AnalysisParams {
        AnalysisParams {
            recent_window: self.recent_window,
            current_streak_lookback: self.current_streak_lookback,
            window_sizes: self.all_window_sizes(),
            drop_pending: self.drop_pending,
            min_streak: self.min_streak,
            bucket_width: self.bucket_width,
            bucket_count: self.bucket_count,
        }
    }
}

/// Settings for periodic recomputation (`watch`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SchedulerSettings {
    pub interval_secs: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// When set, logs are also written to a daily rolling file here.
    pub directory: Option<PathBuf>,
    /// Default filter when `RUST_LOG` is unset, e.g. "info" or "analytics=debug".
    pub filter: Option<String>,
}

/// Command-line overrides applied on top of the loaded file.
#[cfg_attr(feature = "clap", derive(clap::Args))]
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Minimum length for a kill streak to be listed.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub min_streak: Option<usize>,

    /// Directory holding the `<series>.json` record files.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub data_dir: Option<PathBuf>,

    /// Keep a pending newest record in the rate windows.
    #[cfg_attr(feature = "clap", arg(long, global = true))]
    pub keep_pending: bool,
}

impl Config {
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(min_streak) = overrides.min_streak {
            self.analysis.min_streak = min_streak;
        }
        if let Some(dir) = &overrides.data_dir {
            self.data.directory = dir.clone();
        }
        if overrides.keep_pending {
            self.analysis.drop_pending = false;
        }
    }
}
