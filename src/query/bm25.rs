//! Per-term BM25 relevance accumulation.

use std::sync::Arc;

use crate::index::postings::{FieldStats, PostingList};
use crate::query::DocId;

/// Per-term relevance accumulator.
///
/// Captures the term-frequency statistics needed to compute a BM25
/// contribution against a set of matched documents. A term match owns
/// its accumulator until the multi-term combinator detaches it; each
/// accumulator is scored at most once and dropped afterward.
#[derive(Debug, Clone)]
pub struct Bm25Relevance {
    /// The term's posting list (doc ids and frequencies).
    postings: Arc<PostingList>,
    /// Precomputed IDF component.
    idf: f32,
    /// Average field length.
    avg_field_length: f32,
    /// BM25 k1 parameter.
    k1: f32,
    /// BM25 b parameter.
    b: f32,
}

impl Bm25Relevance {
    /// Create a new accumulator for a term with default BM25 parameters.
    pub fn new(postings: Arc<PostingList>, stats: &FieldStats) -> Self {
        Self::with_params(postings, stats, 1.2, 0.75)
    }

    /// Create a new accumulator with custom BM25 parameters.
    pub fn with_params(postings: Arc<PostingList>, stats: &FieldStats, k1: f32, b: f32) -> Self {
        let idf = Self::idf(postings.len() as u64, stats.doc_count);
        Bm25Relevance {
            postings,
            idf,
            avg_field_length: stats.avg_length as f32,
            k1,
            b,
        }
    }

    /// Calculate the IDF (Inverse Document Frequency) component.
    fn idf(doc_freq: u64, total_docs: u64) -> f32 {
        if doc_freq == 0 || total_docs == 0 {
            return 0.0;
        }

        let n = total_docs as f32;
        let df = doc_freq as f32;

        // IDF = log((N - df + 0.5) / (df + 0.5))
        ((n - df + 0.5) / (df + 0.5)).ln().max(0.0)
    }

    /// Calculate the TF (Term Frequency) component.
    fn tf(&self, term_freq: f32) -> f32 {
        if term_freq == 0.0 {
            return 0.0;
        }

        // Field length is approximated by the average field length.
        // TODO: carry per-document field lengths in PostingList.
        let field_length = self.avg_field_length.max(1.0);
        let avg_len = self.avg_field_length.max(1.0);
        let norm_factor = 1.0 - self.b + self.b * (field_length / avg_len);

        // TF = (tf * (k1 + 1)) / (tf + k1 * norm_factor)
        (term_freq * (self.k1 + 1.0)) / (term_freq + self.k1 * norm_factor)
    }

    /// The term whose contribution this accumulator captures.
    pub fn term(&self) -> &str {
        self.postings.term()
    }

    /// Add this term's contribution to every matched document that
    /// contains the term.
    ///
    /// `matches` and `scores` are parallel arrays; contributions are
    /// accumulated into `scores`, scaled by `boost_factor`.
    pub fn score(&self, matches: &[DocId], scores: &mut [f32], boost_factor: f32) {
        assert_eq!(
            matches.len(),
            scores.len(),
            "matches and scores must be parallel"
        );

        for (i, &doc_id) in matches.iter().enumerate() {
            if let Some(term_freq) = self.postings.term_freq(doc_id) {
                scores[i] += self.idf * self.tf(term_freq as f32) * boost_factor;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> FieldStats {
        FieldStats::new(100, 10.0)
    }

    fn postings(doc_ids: Vec<DocId>, freqs: Vec<u32>) -> Arc<PostingList> {
        Arc::new(PostingList::new("term", doc_ids, freqs).unwrap())
    }

    #[test]
    fn test_scores_only_matching_documents() {
        let relevance = Bm25Relevance::new(postings(vec![1, 3, 5], vec![2, 1, 4]), &stats());

        let matches = [1, 2, 3];
        let mut scores = [0.0; 3];
        relevance.score(&matches, &mut scores, 1.0);

        assert!(scores[0] > 0.0);
        assert_eq!(scores[1], 0.0);
        assert!(scores[2] > 0.0);
    }

    #[test]
    fn test_higher_frequency_scores_higher() {
        let relevance = Bm25Relevance::new(postings(vec![1, 2], vec![10, 1]), &stats());

        let mut scores = [0.0; 2];
        relevance.score(&[1, 2], &mut scores, 1.0);
        assert!(scores[0] > scores[1]);
    }

    #[test]
    fn test_boost_factor_scales_contribution() {
        let relevance = Bm25Relevance::new(postings(vec![1], vec![2]), &stats());

        let mut plain = [0.0];
        relevance.score(&[1], &mut plain, 1.0);
        let mut boosted = [0.0];
        relevance.score(&[1], &mut boosted, 2.0);
        assert!((boosted[0] - plain[0] * 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_contributions_accumulate() {
        let relevance = Bm25Relevance::new(postings(vec![1], vec![2]), &stats());

        let mut scores = [0.0];
        relevance.score(&[1], &mut scores, 1.0);
        let once = scores[0];
        relevance.score(&[1], &mut scores, 1.0);
        assert!((scores[0] - 2.0 * once).abs() < 1e-6);
    }

    #[test]
    fn test_empty_statistics_give_zero() {
        let relevance = Bm25Relevance::new(
            postings(vec![1], vec![1]),
            &FieldStats::new(0, 0.0),
        );

        let mut scores = [0.0];
        relevance.score(&[1], &mut scores, 1.0);
        assert_eq!(scores[0], 0.0);
    }

    #[test]
    #[should_panic(expected = "parallel")]
    fn test_mismatched_arrays_panic() {
        let relevance = Bm25Relevance::new(postings(vec![1], vec![1]), &stats());
        let mut scores = [0.0; 2];
        relevance.score(&[1], &mut scores, 1.0);
    }
}
