//! Report cache owned by the caller.
//!
//! The engine never keeps reports between calls on its own; callers that want
//! reuse pass a [`ReportCache`] to [`Engine::compare_cached`](crate::Engine::compare_cached).

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::CacheConfig;
use crate::types::{ComparisonReport, Snapshot};
use crate::Result;

/// Content hash of a design/implementation pair plus the comparator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportKey(u64);

impl ReportKey {
    /// An absent snapshot hashes like an empty one, matching how the engine
    /// compares it.
    pub fn for_snapshots(
        design: Option<&Snapshot>,
        implementation: Option<&Snapshot>,
        fingerprints: &[String],
    ) -> Result<Self> {
        let empty = Snapshot::default();
        let mut hasher = DefaultHasher::new();
        serde_json::to_string(design.unwrap_or(&empty))?.hash(&mut hasher);
        serde_json::to_string(implementation.unwrap_or(&empty))?.hash(&mut hasher);
        fingerprints.hash(&mut hasher);
        Ok(Self(hasher.finish()))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

pub trait ReportCache {
    fn get(&mut self, key: &ReportKey) -> Option<ComparisonReport>;
    fn insert(&mut self, key: ReportKey, report: ComparisonReport);
}

#[derive(Debug, Clone)]
struct CacheEntry {
    report: ComparisonReport,
    inserted_at: Instant,
}

/// Bounded in-memory cache; entries expire `ttl` after insertion and the
/// oldest entry is evicted when full.
#[derive(Debug, Clone)]
pub struct InMemoryReportCache {
    ttl: Duration,
    capacity: usize,
    entries: HashMap<ReportKey, CacheEntry>,
}

impl InMemoryReportCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            entries: HashMap::new(),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.ttl, config.capacity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get_at(&mut self, key: &ReportKey, now: Instant) -> Option<ComparisonReport> {
        let expired = match self.entries.get(key) {
            Some(entry) => now.saturating_duration_since(entry.inserted_at) >= self.ttl,
            None => return None,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.report.clone())
    }

    pub fn insert_at(&mut self, key: ReportKey, report: ComparisonReport, now: Instant) {
        self.evict_expired(now);
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.inserted_at)
                .map(|(key, _)| *key);
            if let Some(oldest) = oldest {
                debug!(key = oldest.value(), "evicting oldest cached report");
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(
            key,
            CacheEntry {
                report,
                inserted_at: now,
            },
        );
    }

    pub fn evict_expired(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.inserted_at) < ttl);
    }
}

impl ReportCache for InMemoryReportCache {
    fn get(&mut self, key: &ReportKey) -> Option<ComparisonReport> {
        self.get_at(key, Instant::now())
    }

    fn insert(&mut self, key: ReportKey, report: ComparisonReport) {
        self.insert_at(key, report, Instant::now());
    }
}
