// Eligibility snapshot cache
//
// Holds the last computed set of eligible promotions as an immutable Arc.
// Readers clone the Arc; a refresh builds a new set and swaps it in, so no
// reader ever observes a half-updated list. A snapshot goes stale after a TTL
// or as soon as the restaurant's calendar day changes.

use crate::engine::error::EngineResult;
use crate::models::{Promotion, PromotionItem};
use chrono::NaiveDate;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Default time-to-live of a snapshot (60 seconds)
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(60);

/// Eligible promotions for one calendar day, most recent first, with their links
#[derive(Debug, Clone)]
pub struct EligibleSet {
    pub day: NaiveDate,
    pub promotions: Vec<Promotion>,
    pub links: Vec<PromotionItem>,
    loaded_at: Instant,
}

impl EligibleSet {
    pub fn new(day: NaiveDate, promotions: Vec<Promotion>, links: Vec<PromotionItem>) -> Self {
        Self {
            day,
            promotions,
            links,
            loaded_at: Instant::now(),
        }
    }

    fn is_stale(&self, today: NaiveDate, ttl: Duration) -> bool {
        self.day != today || self.loaded_at.elapsed() > ttl
    }
}

/// Copy-on-write cache of the eligible promotion set
///
/// `generation` counts invalidations. It only changes under the write lock.
pub struct EligibilityCache {
    current: RwLock<Option<Arc<EligibleSet>>>,
    generation: AtomicU64,
    ttl: Duration,
}

impl EligibilityCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            current: RwLock::new(None),
            generation: AtomicU64::new(0),
            ttl,
        }
    }

    /// Number of invalidations so far
    ///
    /// Read it before loading a set that will go through `publish_if_current`.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Fresh snapshot for `today`, if any
    pub async fn current(&self, today: NaiveDate) -> Option<Arc<EligibleSet>> {
        let guard = self.current.read().await;
        guard
            .as_ref()
            .filter(|set| !set.is_stale(today, self.ttl))
            .cloned()
    }

    /// Replace the snapshot
    pub async fn publish(&self, set: EligibleSet) -> Arc<EligibleSet> {
        let set = Arc::new(set);
        *self.current.write().await = Some(set.clone());
        set
    }

    /// Replace the snapshot unless it was invalidated since `generation`
    ///
    /// A set loaded before a write is discarded, and `None` is returned.
    pub async fn publish_if_current(
        &self,
        set: EligibleSet,
        generation: u64,
    ) -> Option<Arc<EligibleSet>> {
        let mut guard = self.current.write().await;
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!(
                "Discarding eligibility snapshot for {} loaded before an invalidation",
                set.day
            );
            return None;
        }

        let set = Arc::new(set);
        *guard = Some(set.clone());
        Some(set)
    }

    /// Drop the snapshot so the next read reloads
    pub async fn invalidate(&self) {
        let mut guard = self.current.write().await;
        self.generation.fetch_add(1, Ordering::AcqRel);
        *guard = None;
    }

    /// Return the fresh snapshot or load and publish a new one
    ///
    /// Concurrent callers that find the cache stale wait on the write lock;
    /// only the first one runs the loader.
    pub async fn get_or_refresh<F, Fut>(&self, today: NaiveDate, loader: F) -> EngineResult<Arc<EligibleSet>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = EngineResult<EligibleSet>>,
    {
        if let Some(set) = self.current(today).await {
            return Ok(set);
        }

        let mut guard = self.current.write().await;

        // Another caller may have refreshed while we waited
        if let Some(set) = guard.as_ref() {
            if !set.is_stale(today, self.ttl) {
                return Ok(set.clone());
            }
        }

        tracing::debug!("Refreshing eligible promotion snapshot for {}", today);
        let set = Arc::new(loader().await?);
        *guard = Some(set.clone());
        Ok(set)
    }
}

impl Default for EligibilityCache {
    fn default() -> Self {
        Self::new(DEFAULT_SNAPSHOT_TTL)
    }
}
