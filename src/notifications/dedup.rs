// src/notifications/dedup.rs
//! Process-local record of reminders already sent
//!
//! Entries are volatile: a restart forgets them, so a reminder can repeat
//! after a restart inside the same hour bucket.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::common::HOUR_MS;

/// (interview, hour bucket) pair; at most one reminder is sent per key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReminderKey {
    pub interview_id: String,
    pub hour_bucket: i64,
}

impl ReminderKey {
    pub fn new(interview_id: impl Into<String>, start_time_ms: i64) -> Self {
        Self {
            interview_id: interview_id.into(),
            hour_bucket: hour_bucket(start_time_ms),
        }
    }

    /// Start of the bucket in epoch millis
    pub fn bucket_start_ms(&self) -> i64 {
        self.hour_bucket * HOUR_MS
    }
}

/// `floor(ts / 1h)`, also for instants before the epoch
pub fn hour_bucket(start_time_ms: i64) -> i64 {
    start_time_ms.div_euclid(HOUR_MS)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvictionPolicy {
    /// Eviction only runs once the cache holds more than this many entries
    pub max_entries: usize,
    /// Entries whose bucket started longer ago than this are dropped
    pub max_age: Duration,
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            max_age: Duration::from_secs(24 * 60 * 60),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryState {
    /// Claimed by a scan that is still sending
    Pending,
    Sent,
}

#[async_trait]
pub trait ReminderDedupCache: Send + Sync {
    /// Atomically claims `key`; false when another claim or a sent entry already holds it
    async fn try_claim(&self, key: &ReminderKey) -> bool;

    /// Turns a claim into a permanent "already reminded" entry
    async fn mark_sent(&self, key: &ReminderKey);

    /// Drops a claim whose send did not complete, so a later scan can retry
    async fn release(&self, key: &ReminderKey);

    async fn contains(&self, key: &ReminderKey) -> bool;

    async fn len(&self) -> usize;

    /// Applies the eviction policy; returns how many entries were removed
    async fn evict_stale(&self, now_ms: i64) -> usize;
}

/// Mutex-guarded map; claims and eviction share the one lock
#[derive(Debug, Default)]
pub struct InMemoryReminderCache {
    entries: Mutex<HashMap<ReminderKey, EntryState>>,
    policy: EvictionPolicy,
}

impl InMemoryReminderCache {
    pub fn new(policy: EvictionPolicy) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            policy,
        }
    }

    pub fn policy(&self) -> EvictionPolicy {
        self.policy
    }
}

#[async_trait]
impl ReminderDedupCache for InMemoryReminderCache {
    async fn try_claim(&self, key: &ReminderKey) -> bool {
        let mut entries = self.entries.lock().await;
        if entries.contains_key(key) {
            return false;
        }
        entries.insert(key.clone(), EntryState::Pending);
        true
    }

    async fn mark_sent(&self, key: &ReminderKey) {
        self.entries
            .lock()
            .await
            .insert(key.clone(), EntryState::Sent);
    }

    async fn release(&self, key: &ReminderKey) {
        let mut entries = self.entries.lock().await;
        if entries.get(key) == Some(&EntryState::Pending) {
            entries.remove(key);
        }
    }

    async fn contains(&self, key: &ReminderKey) -> bool {
        self.entries.lock().await.contains_key(key)
    }

    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    async fn evict_stale(&self, now_ms: i64) -> usize {
        let mut entries = self.entries.lock().await;
        if entries.len() <= self.policy.max_entries {
            return 0;
        }

        let cutoff = now_ms - self.policy.max_age.as_millis() as i64;
        let before = entries.len();
        // A pending claim this old belongs to a scan that never finished
        entries.retain(|key, _| key.bucket_start_ms() >= cutoff);
        let removed = before - entries.len();

        debug!(removed, remaining = entries.len(), "Evicted stale reminder entries");
        removed
    }
}

/// A held claim on one key
///
/// Dropping the guard without `commit` or `release` (a scan cancelled
/// mid-send) hands the key back on the current runtime, so a later scan can
/// retry it.
pub struct ReminderClaim {
    cache: Arc<dyn ReminderDedupCache>,
    key: Option<ReminderKey>,
}

impl ReminderClaim {
    /// None when the key is already claimed or sent
    pub async fn acquire(cache: &Arc<dyn ReminderDedupCache>, key: ReminderKey) -> Option<Self> {
        if !cache.try_claim(&key).await {
            return None;
        }
        Some(Self {
            cache: Arc::clone(cache),
            key: Some(key),
        })
    }

    /// Records the reminder as sent
    pub async fn commit(mut self) {
        if let Some(key) = &self.key {
            self.cache.mark_sent(key).await;
        }
        self.key = None;
    }

    pub async fn release(mut self) {
        if let Some(key) = &self.key {
            self.cache.release(key).await;
        }
        self.key = None;
    }
}

impl Drop for ReminderClaim {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };

        match Handle::try_current() {
            Ok(handle) => {
                debug!(interview_id = %key.interview_id, bucket = key.hour_bucket, "Releasing abandoned reminder claim");
                let cache = Arc::clone(&self.cache);
                handle.spawn(async move {
                    cache.release(&key).await;
                });
            }
            Err(_) => {
                warn!(
                    interview_id = %key.interview_id,
                    bucket = key.hour_bucket,
                    "No runtime to release reminder claim; eviction will drop it"
                );
            }
        }
    }
}
