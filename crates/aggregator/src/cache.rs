use crate::snapshot::SeriesSnapshot;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

/// The latest published snapshot per series.
///
/// Readers get an `Arc` to a complete snapshot; publishing swaps the whole
/// entry, so a reader sees either the previous result or the new one.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: RwLock<BTreeMap<String, Arc<SeriesSnapshot>>>,
    generation: AtomicU64,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps the snapshot with the next generation and makes it current.
    pub fn publish(&self, mut snapshot: SeriesSnapshot) -> Arc<SeriesSnapshot> {
        snapshot.generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Arc::new(snapshot);
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(snapshot.series.clone(), Arc::clone(&snapshot));
        snapshot
    }

    pub fn get(&self, series: &str) -> Option<Arc<SeriesSnapshot>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(series).cloned()
    }

    /// Every current snapshot, ordered by series name.
    pub fn all(&self) -> Vec<Arc<SeriesSnapshot>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.values().cloned().collect()
    }

    /// The number of snapshots published so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::compute_snapshot;
    use crate::test_support::series;
    use analytics::AnalyticsEngine;

    #[test]
    fn publishing_replaces_the_whole_snapshot() {
        let cache = ResultCache::new();
        let engine = AnalyticsEngine::default();

        let first = cache.publish(compute_snapshot(&engine, &series("sf1", 10), None));
        let held = cache.get("sf1").unwrap();
        let second = cache.publish(compute_snapshot(&engine, &series("sf1", 20), None));

        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
        assert_eq!(cache.generation(), 2);
        // A reader holding the old snapshot keeps a consistent view.
        assert_eq!(held.record_count, 10);
        assert_eq!(cache.get("sf1").unwrap().record_count, 20);
        assert_eq!(cache.all().len(), 1);
    }

    #[test]
    fn unknown_series_is_absent() {
        assert!(ResultCache::new().get("sf4").is_none());
    }
}
