//! Per-community clustering cache.
//!
//! One entry per community id, held in process memory with unbounded
//! retention until overwritten or explicitly invalidated. Nothing persists
//! across restarts.
//!
//! Concurrency: the map lock is never held across an await, so two
//! concurrent misses for the same community both invoke the orchestrator and
//! the chronologically later write wins. Misses are deliberately not
//! coalesced: regenerating is wasteful but harmless, and coalescing would
//! change observable behavior.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, Utc};

use crate::domain::circles::CirclesResult;
use crate::domain::member::MemberProfile;

use super::orchestrator::ClusterOrchestrator;

/// Default cache time-to-live: 72 hours.
#[must_use]
pub fn default_ttl() -> Duration {
    Duration::hours(72)
}

/// A cached clustering result and the instant it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: CirclesResult,
    pub timestamp: DateTime<Utc>,
}

/// Thread-safe cache of clustering results, keyed by community id.
#[derive(Debug, Clone)]
pub struct CircleCache {
    inner: Arc<CacheInner>,
}

#[derive(Debug)]
struct CacheInner {
    entries: RwLock<HashMap<String, CacheEntry>>,
    orchestrator: ClusterOrchestrator,
    ttl: Duration,
}

impl CircleCache {
    #[must_use]
    pub fn new(orchestrator: ClusterOrchestrator, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                entries: RwLock::new(HashMap::new()),
                orchestrator,
                ttl,
            }),
        }
    }

    /// Return the cached result for a community, regenerating on miss,
    /// expiry, or `force_refresh`.
    pub async fn get_or_generate(
        &self,
        community_id: &str,
        members: &[MemberProfile],
        force_refresh: bool,
    ) -> CirclesResult {
        if !force_refresh {
            let entries = self.inner.entries.read().unwrap();
            if let Some(entry) = entries.get(community_id) {
                if Utc::now() - entry.timestamp < self.inner.ttl {
                    tracing::debug!(community_id = %community_id, "Circle cache hit");
                    return entry.result.clone();
                }
                tracing::debug!(community_id = %community_id, "Circle cache entry expired");
            }
        }

        tracing::info!(
            community_id = %community_id,
            member_count = members.len(),
            force_refresh = force_refresh,
            "Regenerating circles"
        );
        let result = self.inner.orchestrator.generate(members).await;

        let mut entries = self.inner.entries.write().unwrap();
        entries.insert(
            community_id.to_string(),
            CacheEntry {
                result: result.clone(),
                timestamp: Utc::now(),
            },
        );

        result
    }

    /// Unconditionally drop a community's entry. The next
    /// [`Self::get_or_generate`] call regenerates from scratch.
    pub fn invalidate(&self, community_id: &str) {
        let mut entries = self.inner.entries.write().unwrap();
        if entries.remove(community_id).is_some() {
            tracing::info!(community_id = %community_id, "Circle cache invalidated");
        }
    }
}
