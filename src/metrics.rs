//! Metrics describing the outcome of a training run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Reason vocabulary assignment stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// The configured capacity was reached and lower-ranked tokens were dropped.
    CapacityReached,
    /// Every distinct corpus token received an id.
    CorpusExhausted,
}

/// Occurrence count of a single token across the corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenFrequency {
    /// Token text.
    pub token: String,
    /// Number of occurrences.
    pub count: usize,
}

/// Aggregate metrics produced by a training session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingMetrics {
    /// Number of corpus strings scanned.
    pub sequences: usize,
    /// Total token occurrences produced by the segmenter.
    pub total_tokens: usize,
    /// Number of distinct token texts observed.
    pub distinct_tokens: usize,
    /// Tokens that received an id after the special tokens.
    pub learned_tokens: usize,
    /// Distinct tokens left out because the capacity was exhausted.
    pub dropped_tokens: usize,
    /// Most frequent tokens in rank order.
    pub top_tokens: Vec<TokenFrequency>,
    /// Total duration of the training session.
    pub total_duration: Duration,
    /// Reason assignment terminated.
    pub stop_reason: StopReason,
}
