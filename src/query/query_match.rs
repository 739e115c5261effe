//! Core query match contract shared by all match implementations.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::query::inspection::QueryInspectionNode;

/// Identifier of a stored document.
///
/// Two reserved values act as iteration sentinels and are never valid
/// document ids: [`START`] and [`INVALID`].
pub type DocId = i64;

/// Iteration has not produced a document yet.
pub const START: DocId = -1;

/// Iteration is exhausted; no further documents will be produced.
pub const INVALID: DocId = DocId::MIN;

/// Confidence attached to an estimated result count.
///
/// Estimates start out `Low` (planner guesses, per-term upper bounds)
/// and are upgraded to `High` once every term has been scanned to
/// exhaustion at least once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueryCountConfidence {
    /// The count is a guess and may be far from the real total.
    Low,
    /// The count was derived from a full scan of all terms.
    High,
}

impl std::fmt::Display for QueryCountConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryCountConfidence::Low => write!(f, "Low"),
            QueryCountConfidence::High => write!(f, "High"),
        }
    }
}

/// Contract implemented by every query match stream.
///
/// This is the sole boundary through which the query executor drives a
/// match: pull-based [`fill`](QueryMatch::fill), candidate-set
/// intersection via [`and_with`](QueryMatch::and_with), relevance
/// dispatch via [`score`](QueryMatch::score), plus count/confidence
/// estimation and plan inspection.
pub trait QueryMatch: Debug {
    /// Best-effort estimate of the total number of matching documents.
    fn count(&self) -> u64;

    /// Confidence level of the [`count`](QueryMatch::count) estimate.
    fn confidence(&self) -> QueryCountConfidence;

    /// The last document id emitted, [`START`] before iteration begins,
    /// or [`INVALID`] once the stream is exhausted.
    fn current(&self) -> DocId;

    /// Whether this match accumulates relevance-scoring inputs.
    fn is_boosting(&self) -> bool;

    /// Write up to `buffer.len()` document ids in ascending,
    /// deduplicated order. Returns the number written; 0 only when the
    /// stream is exhausted.
    fn fill(&mut self, buffer: &mut [DocId]) -> usize;

    /// Intersect the ascending candidate ids in `buffer[..matches]`
    /// with this match's documents, writing the surviving ids back
    /// into `buffer` in ascending order. Returns the new count.
    fn and_with(&mut self, buffer: &mut [DocId], matches: usize) -> usize;

    /// Apply accumulated relevance contributions for `matches` into the
    /// parallel `scores` array. No-op unless boosting.
    fn score(&mut self, matches: &[DocId], scores: &mut [f32], boost_factor: f32);

    /// Build a read-only inspection node describing this match.
    fn inspect(&self) -> QueryInspectionNode;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_reserved() {
        assert!(START < 0);
        assert!(INVALID < START);
        assert_ne!(START, INVALID);
    }

    #[test]
    fn test_confidence_display() {
        assert_eq!(QueryCountConfidence::Low.to_string(), "Low");
        assert_eq!(QueryCountConfidence::High.to_string(), "High");
    }
}
