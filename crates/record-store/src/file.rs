use crate::error::StoreError;
use crate::labels::RawRecord;
use crate::RecordSource;
use async_trait::async_trait;
use core_types::Series;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads each series from `<directory>/<series>.json`, a JSON array of
/// [`RawRecord`]s. Files are re-read on every call so updates made by the
/// upstream writer are picked up on the next recomputation.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    directory: PathBuf,
}

impl JsonRecordStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidSeriesName(name.to_string()));
        }
        Ok(self.directory.join(format!("{name}.json")))
    }
}

#[async_trait]
impl RecordSource for JsonRecordStore {
    async fn series_names(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.directory).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    async fn load_series(&self, name: &str) -> Result<Series, StoreError> {
        let path = self.path_for(name)?;
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::SeriesNotFound(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let raw: Vec<RawRecord> =
            serde_json::from_str(&contents).map_err(|source| StoreError::Json {
                series: name.to_string(),
                source,
            })?;
        let series = Series::new(name, raw.iter().map(RawRecord::normalize).collect());
        series.validate()?;

        tracing::debug!(series = name, records = series.len(), path = %path.display(), "Loaded series");
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::OutcomeCategory;

    fn write_series(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(format!("{name}.json")), body).unwrap();
    }

    #[tokio::test]
    async fn loads_and_normalizes_a_series() {
        let dir = tempfile::tempdir().unwrap();
        write_series(
            dir.path(),
            "sf1",
            r#"[{"period": 2, "outcome": "错", "totalNumber": 9},
                {"period": 3, "outcome": "中", "totalNumber": 12},
                {"period": 4, "prediction": "单"}]"#,
        );
        let store = JsonRecordStore::new(dir.path());

        let series = store.load_series("sf1").await.unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.records[0].outcome, OutcomeCategory::Mismatch);

        let recent = store.recent("sf1", 2).await.unwrap();
        assert_eq!(recent.iter().map(|r| r.period).collect::<Vec<_>>(), vec![4, 3]);
        assert!(recent[0].is_pending());

        assert_eq!(store.by_period("sf1", 3).await.unwrap().numeric_sum, Some(12));
        assert!(matches!(
            store.by_period("sf1", 99).await,
            Err(StoreError::PeriodNotFound { period: 99, .. })
        ));
    }

    #[tokio::test]
    async fn lists_json_files_only() {
        let dir = tempfile::tempdir().unwrap();
        write_series(dir.path(), "sf3", "[]");
        write_series(dir.path(), "sf1", "[]");
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        let store = JsonRecordStore::new(dir.path());
        assert_eq!(store.series_names().await.unwrap(), vec!["sf1", "sf3"]);
    }

    #[tokio::test]
    async fn missing_and_malformed_series_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_series(dir.path(), "broken", "{not json");
        write_series(dir.path(), "dupes", r#"[{"period": 1}, {"period": 1}]"#);
        let store = JsonRecordStore::new(dir.path());

        assert!(matches!(
            store.load_series("absent").await,
            Err(StoreError::SeriesNotFound(_))
        ));
        assert!(matches!(store.load_series("broken").await, Err(StoreError::Json { .. })));
        assert!(matches!(store.load_series("dupes").await, Err(StoreError::Invalid(_))));
        assert!(matches!(
            store.load_series("../etc/passwd").await,
            Err(StoreError::InvalidSeriesName(_))
        ));
    }
}
