//! Term providers: lazy, restartable sequences of term match streams.

use std::fmt::Debug;
use std::sync::Arc;

use crate::index::postings::{FieldStats, PostingList};
use crate::query::FieldMetadata;
use crate::query::bm25::Bm25Relevance;
use crate::query::inspection::QueryInspectionNode;
use crate::query::term_match::TermMatch;

/// A lazy, restartable sequence of per-term match streams for one
/// field.
///
/// Multi-term queries (wildcard, prefix, range, fuzzy) expand to
/// several dictionary terms; a provider yields one [`TermMatch`] per
/// expanded term. After [`reset`](TermProvider::reset), iteration
/// restarts from the first term with fresh streams.
pub trait TermProvider: Debug {
    /// Advance to the next term, returning its match stream, or `None`
    /// when all terms have been yielded.
    fn next(&mut self) -> Option<TermMatch>;

    /// Rewind to the first term.
    fn reset(&mut self);

    /// Build a read-only inspection node for this provider.
    fn inspect(&self) -> QueryInspectionNode;
}

/// Term provider over in-memory posting lists.
///
/// Stands in for the term-dictionary-backed providers of a storage
/// engine; the planner hands it the posting lists a query expansion
/// resolved to, in term order.
#[derive(Debug)]
pub struct MemoryTermProvider {
    /// The queried field.
    field: FieldMetadata,
    /// One posting list per expanded term.
    postings: Vec<Arc<PostingList>>,
    /// Field statistics backing relevance accumulation.
    stats: FieldStats,
    /// Index of the next term to yield.
    position: usize,
}

impl MemoryTermProvider {
    /// Create a new provider over the given posting lists.
    pub fn new(field: FieldMetadata, postings: Vec<Arc<PostingList>>, stats: FieldStats) -> Self {
        MemoryTermProvider {
            field,
            postings,
            stats,
            position: 0,
        }
    }

    /// The queried field.
    pub fn field(&self) -> &FieldMetadata {
        &self.field
    }

    /// Number of expanded terms.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }
}

impl TermProvider for MemoryTermProvider {
    fn next(&mut self) -> Option<TermMatch> {
        let list = Arc::clone(self.postings.get(self.position)?);
        self.position += 1;

        if self.field.has_boost() {
            let relevance = Bm25Relevance::new(Arc::clone(&list), &self.stats);
            Some(TermMatch::with_relevance(list, relevance))
        } else {
            Some(TermMatch::new(list))
        }
    }

    fn reset(&mut self) {
        self.position = 0;
    }

    fn inspect(&self) -> QueryInspectionNode {
        let mut node = QueryInspectionNode::new("MemoryTermProvider")
            .with_parameter("field", self.field.name())
            .with_parameter("terms", self.postings.len().to_string());
        for list in &self.postings {
            node = node.with_child(
                QueryInspectionNode::new("TermMatch")
                    .with_parameter("term", list.term())
                    .with_parameter("count", list.len().to_string()),
            );
        }
        node
    }
}
