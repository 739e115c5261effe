//! Single-term match streams over posting lists.

use std::sync::Arc;

use crate::index::postings::PostingList;
use crate::query::DocId;
use crate::query::bm25::Bm25Relevance;
use crate::query::inspection::QueryInspectionNode;

/// One term's posting list exposed as a pull-based match stream.
///
/// Document ids come out ascending and duplicate-free, in batches
/// bounded by the caller's buffer. When the queried field is boosted,
/// the stream owns a [`Bm25Relevance`] accumulator until the consumer
/// detaches it with [`take_relevance`](TermMatch::take_relevance).
#[derive(Debug)]
pub struct TermMatch {
    /// The term's posting list.
    postings: Arc<PostingList>,
    /// Fill cursor into the posting list.
    position: usize,
    /// Relevance accumulator, present when the field is boosted.
    relevance: Option<Bm25Relevance>,
}

impl TermMatch {
    /// Create a new term match without relevance accumulation.
    pub fn new(postings: Arc<PostingList>) -> Self {
        TermMatch {
            postings,
            position: 0,
            relevance: None,
        }
    }

    /// Create a new term match owning a relevance accumulator.
    pub fn with_relevance(postings: Arc<PostingList>, relevance: Bm25Relevance) -> Self {
        TermMatch {
            postings,
            position: 0,
            relevance: Some(relevance),
        }
    }

    /// Total number of documents containing the term.
    pub fn count(&self) -> u64 {
        self.postings.len() as u64
    }

    /// The term text.
    pub fn term(&self) -> &str {
        self.postings.term()
    }

    /// Write up to `buffer.len()` document ids into `buffer`, advancing
    /// the stream. Returns the number written; 0 once exhausted.
    pub fn fill(&mut self, buffer: &mut [DocId]) -> usize {
        let ids = self.postings.doc_ids();
        let remaining = ids.len() - self.position;
        let read = remaining.min(buffer.len());
        buffer[..read].copy_from_slice(&ids[self.position..self.position + read]);
        self.position += read;
        read
    }

    /// Intersect the ascending candidates in `buffer[..matches]` with
    /// this term's documents, compacting survivors to the front of
    /// `buffer`. Returns the surviving count.
    ///
    /// Intersection runs against the full posting list, independent of
    /// the fill cursor.
    pub fn and_with(&mut self, buffer: &mut [DocId], matches: usize) -> usize {
        assert!(
            matches <= buffer.len(),
            "candidate count {} exceeds buffer length {}",
            matches,
            buffer.len()
        );

        let ids = self.postings.doc_ids();
        let mut pos = 0;
        let mut write = 0;
        for read in 0..matches {
            let candidate = buffer[read];
            while pos < ids.len() && ids[pos] < candidate {
                pos += 1;
            }
            if pos == ids.len() {
                break;
            }
            if ids[pos] == candidate {
                buffer[write] = candidate;
                write += 1;
            }
        }
        write
    }

    /// Detach the owned relevance accumulator, if any.
    pub fn take_relevance(&mut self) -> Option<Bm25Relevance> {
        self.relevance.take()
    }

    /// Build a read-only inspection node for this stream.
    pub fn inspect(&self) -> QueryInspectionNode {
        QueryInspectionNode::new("TermMatch")
            .with_parameter("term", self.postings.term())
            .with_parameter("count", self.count().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::postings::FieldStats;

    fn postings(doc_ids: Vec<DocId>) -> Arc<PostingList> {
        let freqs = vec![1; doc_ids.len()];
        Arc::new(PostingList::new("term", doc_ids, freqs).unwrap())
    }

    #[test]
    fn test_fill_in_batches() {
        let mut term = TermMatch::new(postings(vec![1, 2, 5, 8, 13]));
        assert_eq!(term.count(), 5);

        let mut buffer = [0; 2];
        assert_eq!(term.fill(&mut buffer), 2);
        assert_eq!(buffer, [1, 2]);

        assert_eq!(term.fill(&mut buffer), 2);
        assert_eq!(buffer, [5, 8]);

        assert_eq!(term.fill(&mut buffer), 1);
        assert_eq!(buffer[0], 13);

        assert_eq!(term.fill(&mut buffer), 0);
    }

    #[test]
    fn test_fill_empty_postings() {
        let mut term = TermMatch::new(Arc::new(PostingList::empty("missing")));
        let mut buffer = [0; 4];
        assert_eq!(term.fill(&mut buffer), 0);
    }

    #[test]
    fn test_and_with_intersects_candidates() {
        let mut term = TermMatch::new(postings(vec![2, 4, 6, 8]));

        let mut buffer = [1, 2, 3, 4, 9];
        let count = term.and_with(&mut buffer, 5);
        assert_eq!(&buffer[..count], &[2, 4]);
    }

    #[test]
    fn test_and_with_ignores_fill_cursor() {
        let mut term = TermMatch::new(postings(vec![1, 2, 3]));

        let mut drain = [0; 8];
        term.fill(&mut drain);

        let mut buffer = [1, 3];
        let count = term.and_with(&mut buffer, 2);
        assert_eq!(&buffer[..count], &[1, 3]);
    }

    #[test]
    fn test_and_with_no_overlap() {
        let mut term = TermMatch::new(postings(vec![10, 20]));
        let mut buffer = [1, 2, 3];
        assert_eq!(term.and_with(&mut buffer, 3), 0);
    }

    #[test]
    #[should_panic(expected = "exceeds buffer length")]
    fn test_and_with_bad_matches_panics() {
        let mut term = TermMatch::new(postings(vec![1]));
        let mut buffer = [1, 2];
        term.and_with(&mut buffer, 3);
    }

    #[test]
    fn test_take_relevance_detaches_once() {
        let list = postings(vec![1, 2]);
        let relevance = Bm25Relevance::new(Arc::clone(&list), &FieldStats::new(10, 5.0));
        let mut term = TermMatch::with_relevance(list, relevance);

        assert!(term.take_relevance().is_some());
        assert!(term.take_relevance().is_none());
    }

    #[test]
    fn test_inspect_reports_term_and_count() {
        let term = TermMatch::new(postings(vec![1, 2, 3]));
        let node = term.inspect();
        assert_eq!(node.name(), "TermMatch");
        assert_eq!(node.parameters().get("count").unwrap(), "3");
        assert_eq!(node.parameters().get("term").unwrap(), "term");
    }
}
