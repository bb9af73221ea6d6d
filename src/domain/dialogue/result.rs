//! Dialogue result types produced by the dispatcher.

use serde::{Deserialize, Serialize};

/// Which pipeline tier produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseSource {
    /// Safety interceptor short-circuit; fixed resource text.
    Crisis,
    /// Served from the response cache.
    Cache,
    /// Generated by the primary backend.
    Primary,
    /// Rule-engine template reply.
    PatternFallback,
    /// Last-resort fixed string; the guaranteed terminal tier.
    BasicFallback,
}

/// The single result of one dispatch call.
///
/// Produced exactly once per call; never partially populated. The
/// dispatcher never returns an error, so this is the only shape callers
/// ever see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueResult {
    /// The reply text.
    pub text: String,
    /// True only when the safety interceptor fired.
    pub is_crisis: bool,
    /// Confidence in [0, 1]. For crisis this is a fixed policy signal
    /// (0.9), not a quality score.
    pub confidence: f32,
    /// The tier that produced this response.
    pub source: ResponseSource,
    /// Wall-clock time from dispatch entry to return.
    pub latency_ms: u64,
}

impl DialogueResult {
    /// Confidence attached to crisis interceptions. A policy signal, not
    /// a quality score.
    pub const CRISIS_CONFIDENCE: f32 = 0.9;

    /// Confidence attached to basic-fallback replies.
    pub const BASIC_FALLBACK_CONFIDENCE: f32 = 0.5;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_serializes_kebab_case() {
        let json = serde_json::to_string(&ResponseSource::PatternFallback).unwrap();
        assert_eq!(json, "\"pattern-fallback\"");

        let json = serde_json::to_string(&ResponseSource::BasicFallback).unwrap();
        assert_eq!(json, "\"basic-fallback\"");
    }

    #[test]
    fn result_roundtrips_through_json() {
        let result = DialogueResult {
            text: "You are not alone.".to_string(),
            is_crisis: true,
            confidence: DialogueResult::CRISIS_CONFIDENCE,
            source: ResponseSource::Crisis,
            latency_ms: 3,
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: DialogueResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
