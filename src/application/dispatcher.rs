//! Dialogue dispatcher - the tiered, never-fail reply pipeline.
//!
//! Every dispatch walks a strict tier order: crisis interception, cache,
//! primary generator, pattern fallback, basic fallback. Each tier either
//! produces the reply or hands off to the next; no tier error ever
//! reaches the caller. The final tier is a fixed string, so the pipeline
//! is infallible by construction.
//!
//! # Example
//!
//! ```ignore
//! let dispatcher = DialogueDispatcher::new()
//!     .with_primary(Arc::new(HttpGenerator::new(config)));
//!
//! let result = dispatcher.dispatch(&session_id, &messages).await;
//! // result.text is always populated, whatever failed along the way
//! ```

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::application::cache::ResponseCache;
use crate::domain::dialogue::{
    last_user_message, DialogueResult, Message, PatternLibrary, ResponseSource, SafetyClassifier,
    CRISIS_RESOURCE_MESSAGE,
};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::ports::Generator;

/// Consecutive primary failures before the dispatcher reports unhealthy.
pub const DEFAULT_UNHEALTHY_AFTER: u32 = 3;

/// Confidence attached to primary-generator replies.
pub const PRIMARY_CONFIDENCE: f32 = 0.9;

/// Point-in-time health snapshot of the pipeline.
///
/// Fallback successes never count against health; only the primary
/// generator moves these numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    /// False once primary failures pass the consecutive-error threshold.
    pub is_healthy: bool,
    /// Total primary failures since construction.
    pub error_count: u64,
    /// Dispatches currently in flight.
    pub queue_length: u64,
    /// Entries currently held by the response cache.
    pub cache_size: usize,
    /// When the primary generator last failed.
    pub last_error_time: Option<Timestamp>,
}

/// The tiered dialogue pipeline.
pub struct DialogueDispatcher {
    safety: SafetyClassifier,
    cache: Arc<ResponseCache>,
    primary: Option<Arc<dyn Generator>>,
    patterns: PatternLibrary,
    unhealthy_after: u32,
    error_count: AtomicU64,
    consecutive_errors: AtomicU32,
    queue_length: AtomicU64,
    last_error_time: Mutex<Option<Timestamp>>,
}

impl DialogueDispatcher {
    /// Creates a dispatcher with default tiers and no primary generator.
    ///
    /// Without a primary, dispatches go crisis → cache → pattern → basic.
    pub fn new() -> Self {
        Self {
            safety: SafetyClassifier::with_defaults(),
            cache: Arc::new(ResponseCache::new()),
            primary: None,
            patterns: PatternLibrary::with_defaults(),
            unhealthy_after: DEFAULT_UNHEALTHY_AFTER,
            error_count: AtomicU64::new(0),
            consecutive_errors: AtomicU32::new(0),
            queue_length: AtomicU64::new(0),
            last_error_time: Mutex::new(None),
        }
    }

    /// Sets the primary generator.
    pub fn with_primary(mut self, generator: Arc<dyn Generator>) -> Self {
        self.primary = Some(generator);
        self
    }

    /// Replaces the response cache.
    pub fn with_cache(mut self, cache: Arc<ResponseCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Replaces the safety classifier.
    pub fn with_safety(mut self, safety: SafetyClassifier) -> Self {
        self.safety = safety;
        self
    }

    /// Replaces the pattern library.
    pub fn with_patterns(mut self, patterns: PatternLibrary) -> Self {
        self.patterns = patterns;
        self
    }

    /// Sets the consecutive-failure threshold for unhealthy reporting.
    pub fn with_unhealthy_after(mut self, threshold: u32) -> Self {
        self.unhealthy_after = threshold;
        self
    }

    /// Produces a reply for the conversation so far. Never fails.
    ///
    /// Dropping the returned future cancels any in-flight primary call;
    /// no partial state is left behind beyond health counters.
    pub async fn dispatch(&self, session_id: &SessionId, messages: &[Message]) -> DialogueResult {
        let started = Instant::now();
        let _guard = QueueGuard::enter(&self.queue_length);

        let user_text = last_user_message(messages)
            .map(|m| m.content.as_str())
            .unwrap_or("");

        // Tier 1: crisis interception. Fixed text, never generated,
        // never cached.
        let verdict = self.safety.classify(user_text);
        if verdict.is_crisis {
            tracing::warn!(
                session_id = %session_id,
                keywords = ?verdict.matched_keywords,
                "crisis language detected, serving resource message"
            );
            return self.finish(
                CRISIS_RESOURCE_MESSAGE,
                true,
                DialogueResult::CRISIS_CONFIDENCE,
                ResponseSource::Crisis,
                started,
            );
        }

        // Tier 2: cache.
        if let Some(hit) = self.cache.get(messages) {
            tracing::debug!(session_id = %session_id, "serving cached reply");
            return self.finish(hit.text, false, hit.confidence, ResponseSource::Cache, started);
        }

        // Tier 3: primary generator, skipped entirely when none is
        // configured.
        if let Some(ref generator) = self.primary {
            let request = crate::ports::GenerationRequest::from_messages(messages.to_vec());
            match generator.complete(request).await {
                Ok(generated) => {
                    self.record_primary_success();
                    self.cache.set(messages, &generated.content, PRIMARY_CONFIDENCE);
                    return self.finish(
                        generated.content,
                        false,
                        PRIMARY_CONFIDENCE,
                        ResponseSource::Primary,
                        started,
                    );
                }
                Err(err) => {
                    self.record_primary_failure();
                    tracing::warn!(
                        session_id = %session_id,
                        error = %err,
                        "primary generation failed, falling back to patterns"
                    );
                }
            }
        }

        // Tier 4: pattern fallback. Infallible; its own internal
        // fallback is the basic tier.
        let reply = self.patterns.generate(user_text);
        let source = if reply.matched_category == "basic-fallback" {
            ResponseSource::BasicFallback
        } else {
            ResponseSource::PatternFallback
        };
        tracing::debug!(
            session_id = %session_id,
            category = %reply.matched_category,
            "serving fallback reply"
        );
        self.finish(reply.text, false, reply.confidence, source, started)
    }

    /// Current health snapshot.
    pub fn health(&self) -> HealthStatus {
        let consecutive = self.consecutive_errors.load(Ordering::Relaxed);
        HealthStatus {
            is_healthy: consecutive < self.unhealthy_after,
            error_count: self.error_count.load(Ordering::Relaxed),
            queue_length: self.queue_length.load(Ordering::Relaxed),
            cache_size: self.cache.len(),
            last_error_time: self.last_error_time.lock().ok().and_then(|t| *t),
        }
    }

    fn finish(
        &self,
        text: impl Into<String>,
        is_crisis: bool,
        confidence: f32,
        source: ResponseSource,
        started: Instant,
    ) -> DialogueResult {
        DialogueResult {
            text: text.into(),
            is_crisis,
            confidence,
            source,
            latency_ms: started.elapsed().as_millis() as u64,
        }
    }

    fn record_primary_success(&self) {
        self.consecutive_errors.store(0, Ordering::Relaxed);
    }

    fn record_primary_failure(&self) {
        self.error_count.fetch_add(1, Ordering::Relaxed);
        self.consecutive_errors.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_error_time.lock() {
            *last = Some(Timestamp::now());
        }
    }
}

impl Default for DialogueDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// In-flight gauge that survives future cancellation.
struct QueueGuard<'a> {
    gauge: &'a AtomicU64,
}

impl<'a> QueueGuard<'a> {
    fn enter(gauge: &'a AtomicU64) -> Self {
        gauge.fetch_add(1, Ordering::Relaxed);
        Self { gauge }
    }
}

impl Drop for QueueGuard<'_> {
    fn drop(&mut self) {
        self.gauge.fetch_sub(1, Ordering::Relaxed);
    }
}
