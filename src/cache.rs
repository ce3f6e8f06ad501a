//! Per-area graph cache with time-based eviction.
//!
//! Keyed by the request's bounding box quantized to roughly one kilometer,
//! so nearby requests share one built graph. Entries hold immutable graphs
//! behind an `Arc`; readers run concurrently, inserts are serialized and
//! opportunistically sweep out anything past the TTL.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use log::debug;

use crate::geometry::BoundingBox;
use crate::model::RoadGraph;

/// How long a built graph stays reusable.
pub const CACHE_TTL: Duration = Duration::from_secs(600);

/// Cache key grid size, in degrees. About one kilometer.
const KEY_PRECISION_DEG: f64 = 0.01;

/// Quantized cache key for a request's (un-padded) bounding box: min sides
/// floored, max sides ceiled to the key grid.
pub(crate) fn cache_key(bbox: &BoundingBox) -> String {
    let floor = |v: f64| (v / KEY_PRECISION_DEG).floor() * KEY_PRECISION_DEG;
    let ceil = |v: f64| (v / KEY_PRECISION_DEG).ceil() * KEY_PRECISION_DEG;
    format!(
        "{:.2}:{:.2}:{:.2}:{:.2}",
        floor(bbox.south),
        floor(bbox.west),
        ceil(bbox.north),
        ceil(bbox.east)
    )
}

struct CacheEntry {
    graph: Arc<RoadGraph>,
    inserted_at: Instant,
}

/// Shared cache of built road graphs.
pub(crate) struct GraphCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl GraphCache {
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Fetches a graph younger than the TTL. Stale entries count as misses
    /// and stay in place until the next insert sweeps them.
    pub fn get(&self, key: &str) -> Option<Arc<RoadGraph>> {
        let entries = self.entries.read().expect("graph cache lock poisoned");
        let entry = entries.get(key)?;
        if entry.inserted_at.elapsed() >= self.ttl {
            debug!("Cache entry {key} is stale");
            return None;
        }
        Some(Arc::clone(&entry.graph))
    }

    /// Stores a freshly built graph, sweeping out expired entries first.
    /// Concurrent builders for the same key race benignly; the last writer
    /// wins.
    pub fn insert(&self, key: String, graph: Arc<RoadGraph>) {
        let mut entries = self.entries.write().expect("graph cache lock poisoned");
        let before = entries.len();
        entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        let swept = before - entries.len();
        if swept > 0 {
            debug!("Swept {swept} stale graph cache entries");
        }
        entries.insert(
            key,
            CacheEntry {
                graph,
                inserted_at: Instant::now(),
            },
        );
    }
}
