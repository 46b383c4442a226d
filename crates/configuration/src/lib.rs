use crate::error::ConfigError;
use crate::settings::Config;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalysisSettings, DataSettings, LoggingSettings, Overrides, SchedulerSettings, WindowRange,
};
pub use settings::Config as AppConfig;

/// Loads the application configuration from a TOML file.
///
/// Every section is optional and falls back to its defaults. Values can be
/// overridden with `APP_`-prefixed environment variables, using `__` between
/// nested keys (e.g. `APP_ANALYSIS__MIN_STREAK=3`).
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("data.series")
                .with_list_parse_key("analysis.window_sizes"),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;
    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Rejects settings the analyzers would refuse at calculation time.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    let analysis = &config.analysis;
    let positive = [
        ("analysis.recent_window", analysis.recent_window),
        ("analysis.current_streak_lookback", analysis.current_streak_lookback),
        ("analysis.min_streak", analysis.min_streak),
        ("analysis.bucket_width", analysis.bucket_width),
    ];
    for (name, value) in positive {
        if value == 0 {
            return Err(ConfigError::ValidationError(format!(
                "{name} must be greater than zero"
            )));
        }
    }
    if analysis.window_sizes.contains(&0) {
        return Err(ConfigError::ValidationError(
            "analysis.window_sizes must not contain 0".to_string(),
        ));
    }
    if let Some(range) = analysis.window_range {
        if range.step == 0 || range.start == 0 || range.start > range.end {
            return Err(ConfigError::ValidationError(format!(
                "analysis.window_range {}..={} step {} is not a usable range",
                range.start, range.end, range.step
            )));
        }
    }
    if config.scheduler.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "scheduler.interval_secs must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_sections_use_defaults() {
        let file = write_config("[data]\nseries = [\"sf1\", \"sf3\"]\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.data.series, vec!["sf1", "sf3"]);
        assert_eq!(config.analysis.min_streak, 5);
        assert_eq!(config.scheduler.interval_secs, 30);
    }

    #[test]
    fn window_sizes_expand_the_range() {
        let file = write_config(
            "[analysis]\nwindow_sizes = [10]\nwindow_range = { start = 100, end = 200, step = 50 }\n",
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.analysis.all_window_sizes(), vec![10, 100, 150, 200]);
        assert_eq!(config.analysis.to_params().window_sizes.len(), 4);
    }

    #[test]
    fn default_windows_match_the_engine_defaults() {
        let settings = AnalysisSettings::default();
        assert_eq!(
            settings.to_params().window_sizes,
            analytics::AnalysisParams::default().window_sizes
        );
    }

    #[test]
    fn zero_values_fail_validation() {
        let file = write_config("[analysis]\nbucket_width = 0\n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn empty_series_list_is_valid() {
        let mut config = Config::default();
        config.data.series.clear();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = Config::default();
        config.apply(&Overrides {
            min_streak: Some(3),
            data_dir: None,
            keep_pending: true,
        });
        assert_eq!(config.analysis.min_streak, 3);
        assert!(!config.analysis.drop_pending);
    }
}
