//! Response cache - deduplicates generator calls for repeated transcripts.
//!
//! Keys are a SHA-256 digest over the full transcript, so two dispatches
//! only share a cached reply when every message matches. Expiry is lazy:
//! a stale entry is dropped the first time a read finds it, not by a
//! background task.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::domain::dialogue::Message;

/// Default time a cached reply stays valid.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// A reply served from the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedResponse {
    pub text: String,
    pub confidence: f32,
}

#[derive(Debug, Clone)]
struct CacheSlot {
    text: String,
    confidence: f32,
    inserted_at: Instant,
    last_used: Instant,
}

/// Transcript-keyed response cache with lazy TTL expiry and an optional
/// least-recently-used size bound.
#[derive(Debug)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheSlot>>,
    ttl: Duration,
    max_entries: Option<usize>,
}

impl ResponseCache {
    /// Creates a cache with the default TTL and no size bound.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Creates a cache with a specific TTL and no size bound.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries: None,
        }
    }

    /// Bounds the cache to at most `max` entries, evicting the least
    /// recently used slot on overflow.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = Some(max);
        self
    }

    /// Deterministic key over the whole transcript.
    pub fn cache_key(messages: &[Message]) -> String {
        let mut hasher = Sha256::new();
        for msg in messages {
            hasher.update(msg.role.as_str().as_bytes());
            hasher.update(b":");
            hasher.update(msg.content.as_bytes());
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }

    /// Looks up a live reply for this transcript. A stale hit is removed
    /// and reported as a miss.
    pub fn get(&self, messages: &[Message]) -> Option<CachedResponse> {
        let key = Self::cache_key(messages);
        let now = Instant::now();
        let mut entries = self.entries.lock().ok()?;

        match entries.get_mut(&key) {
            Some(slot) if now.duration_since(slot.inserted_at) < self.ttl => {
                slot.last_used = now;
                Some(CachedResponse {
                    text: slot.text.clone(),
                    confidence: slot.confidence,
                })
            }
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    /// Stores a reply for this transcript, evicting the least recently
    /// used entry if the bound is hit.
    pub fn set(&self, messages: &[Message], text: impl Into<String>, confidence: f32) {
        let key = Self::cache_key(messages);
        let now = Instant::now();
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };

        if let Some(max) = self.max_entries {
            if !entries.contains_key(&key) && entries.len() >= max {
                let evict = entries
                    .iter()
                    .min_by_key(|(_, slot)| slot.last_used)
                    .map(|(k, _)| k.clone());
                if let Some(evict) = evict {
                    entries.remove(&evict);
                }
            }
        }

        entries.insert(
            key,
            CacheSlot {
                text: text.into(),
                confidence,
                inserted_at: now,
                last_used: now,
            },
        );
    }

    /// Number of entries currently held, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// True when no entries are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops all entries.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}
