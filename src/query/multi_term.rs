//! Multi-term match: an OR-combinator over per-term posting streams.

use std::sync::Arc;

use crate::memory::context::AllocationContext;
use crate::memory::relevance_pool::relevance_pool;
use crate::query::FieldMetadata;
use crate::query::bm25::Bm25Relevance;
use crate::query::inspection::QueryInspectionNode;
use crate::query::provider::TermProvider;
use crate::query::query_match::{DocId, INVALID, QueryCountConfidence, QueryMatch, START};
use crate::query::term_match::TermMatch;
use crate::util::{merge, sorting};

/// Slots in a freshly rented relevance array.
const INITIAL_RELEVANCE_CAPACITY: usize = 64;

/// Match stream over the union of several terms' posting lists.
///
/// A multi-term query (wildcard, prefix, range, fuzzy) expands to many
/// dictionary terms; this combinator drains them one at a time from a
/// [`TermProvider`] and presents a single ascending, deduplicated
/// document stream. Batches that interleave more than one term are
/// sorted and deduplicated on the way out; single-term batches pass
/// through untouched. When the queried field is boosted, each drained
/// term's [`Bm25Relevance`] is retained in a pool-backed array until
/// [`score`](QueryMatch::score) is called.
#[derive(Debug)]
pub struct MultiTermMatch<P: TermProvider> {
    /// Provider of per-term match streams.
    inner: P,
    /// The term currently being drained. At most one is live.
    current_term: Option<TermMatch>,
    /// Last document id emitted, or a sentinel.
    current: DocId,
    /// Estimated total matching documents.
    total_results: u64,
    /// Confidence of the estimate.
    confidence: QueryCountConfidence,
    /// Whether relevance inputs are accumulated.
    is_boosting: bool,
    /// Retained relevance accumulators; `None` unless boosting.
    frequencies: Option<Vec<Bm25Relevance>>,
    /// Scratch allocator for intersection passes.
    context: Arc<AllocationContext>,
}

impl<P: TermProvider> MultiTermMatch<P> {
    /// Create a new multi-term match over `inner`'s terms.
    ///
    /// Advances the provider once; a provider with no terms yields an
    /// instance that is exhausted from the start. A boosted field rents
    /// an initial relevance array from the process-wide pool.
    pub fn new(field: &FieldMetadata, context: Arc<AllocationContext>, mut inner: P) -> Self {
        let current_term = inner.next();
        let current = if current_term.is_some() { START } else { INVALID };

        let is_boosting = field.has_boost();
        let frequencies = is_boosting.then(|| relevance_pool().rent(INITIAL_RELEVANCE_CAPACITY));

        MultiTermMatch {
            inner,
            current_term,
            current,
            total_results: 0,
            confidence: QueryCountConfidence::Low,
            is_boosting,
            frequencies,
            context,
        }
    }

    /// Seed the result-count estimate, e.g. from planner statistics.
    pub fn with_count_estimate(
        mut self,
        total_results: u64,
        confidence: QueryCountConfidence,
    ) -> Self {
        self.total_results = total_results;
        self.confidence = confidence;
        self
    }

    /// Detach the finished term's relevance accumulator into the
    /// retained array. Terms that matched nothing are skipped.
    fn add_term_relevance(&mut self, term: &mut TermMatch) {
        if !self.is_boosting || term.count() == 0 {
            return;
        }
        let Some(relevance) = term.take_relevance() else {
            return;
        };

        let holder = self
            .frequencies
            .get_or_insert_with(|| relevance_pool().rent(INITIAL_RELEVANCE_CAPACITY));
        if holder.len() == holder.capacity() {
            Self::grow_relevance_buffer(holder);
        }
        holder.push(relevance);
    }

    /// Double the retained array's capacity through the pool.
    fn grow_relevance_buffer(holder: &mut Vec<Bm25Relevance>) {
        let pool = relevance_pool();
        let mut next = pool.rent(2 * holder.capacity().max(1));
        next.extend(holder.drain(..));
        pool.return_buffer(std::mem::replace(holder, next));
    }

    /// Drop any retained accumulators and start a fresh accumulation
    /// cycle, re-renting the array if `score` consumed it.
    fn reset_relevance_buffer(&mut self) {
        if !self.is_boosting {
            return;
        }
        match self.frequencies.as_mut() {
            Some(holder) => holder.clear(),
            None => self.frequencies = Some(relevance_pool().rent(INITIAL_RELEVANCE_CAPACITY)),
        }
    }
}

impl<P: TermProvider> QueryMatch for MultiTermMatch<P> {
    fn count(&self) -> u64 {
        self.total_results
    }

    fn confidence(&self) -> QueryCountConfidence {
        self.confidence
    }

    fn current(&self) -> DocId {
        self.current
    }

    fn is_boosting(&self) -> bool {
        self.is_boosting
    }

    fn fill(&mut self, buffer: &mut [DocId]) -> usize {
        if self.current == INVALID {
            return 0;
        }

        let mut count = 0;
        let mut requires_sort = false;
        let mut provider_exhausted = false;

        while count < buffer.len() {
            let read = match self.current_term.as_mut() {
                Some(term) => term.fill(&mut buffer[count..]),
                None => 0,
            };

            if read == 0 {
                if let Some(mut finished) = self.current_term.take() {
                    self.add_term_relevance(&mut finished);
                }
                match self.inner.next() {
                    Some(next) => {
                        // Ids from the new term are not ordered relative
                        // to ids already in the buffer.
                        requires_sort |= count != 0;
                        self.current_term = Some(next);
                    }
                    None => {
                        provider_exhausted = true;
                        break;
                    }
                }
                continue;
            }

            count += read;
        }

        if provider_exhausted {
            self.current = INVALID;
        } else {
            self.current = if count != 0 { buffer[count - 1] } else { INVALID };
        }

        if requires_sort && count > 1 {
            count = sorting::sort_and_remove_duplicates(&mut buffer[..count]);
        }

        count
    }

    fn and_with(&mut self, buffer: &mut [DocId], matches: usize) -> usize {
        assert!(
            matches <= buffer.len(),
            "candidate count {} exceeds buffer length {}",
            matches,
            buffer.len()
        );

        // Every call rescans all terms from the start; there is no
        // cross-call memoization. At what term count or buffer size an
        // auxiliary structure (bloom filters, cached unions) would pay
        // off is unresolved policy.
        let len = buffer.len();
        let context = Arc::clone(&self.context);
        let mut scratch = context.allocate(3 * len);

        // PERF: the merge input region sits at the far end of the
        // allocation so it does not share cache lines with the two
        // regions rewritten every round.
        let (results, rest) = scratch.split_at_mut(len);
        let (tmp, tmp2) = rest.split_at_mut(len);

        self.inner.reset();
        self.reset_relevance_buffer();

        let mut total_read: u64 = 0;
        let mut total_size = 0;
        let mut provider_exhausted = false;

        while total_size < len {
            let Some(mut term) = self.inner.next() else {
                provider_exhausted = true;
                self.current_term = None;
                break;
            };
            total_read += term.count();

            tmp[..matches].copy_from_slice(&buffer[..matches]);
            let read = term.and_with(tmp, matches);
            if read != 0 {
                tmp2[..total_size].copy_from_slice(&results[..total_size]);
                total_size = merge::or(results, &tmp2[..total_size], &tmp[..read]);
            }

            self.add_term_relevance(&mut term);
            self.current_term = Some(term);
        }

        // A pass that saw every term to exhaustion yields a stronger
        // estimate than whatever the constructor was seeded with.
        if provider_exhausted {
            self.total_results = total_read;
            self.confidence = QueryCountConfidence::High;
        }

        buffer[..total_size].copy_from_slice(&results[..total_size]);
        total_size
    }

    fn score(&mut self, matches: &[DocId], scores: &mut [f32], boost_factor: f32) {
        if !self.is_boosting {
            return;
        }
        let Some(mut holder) = self.frequencies.take() else {
            return;
        };

        // Every retained term contributes, in term encounter order.
        for relevance in holder.drain(..) {
            relevance.score(matches, scores, boost_factor);
        }

        relevance_pool().return_buffer(holder);
    }

    fn inspect(&self) -> QueryInspectionNode {
        QueryInspectionNode::new("MultiTermMatch")
            .with_parameter("is_boosting", self.is_boosting.to_string())
            .with_parameter(
                "count",
                format!("{} [{}]", self.total_results, self.confidence),
            )
            .with_child(self.inner.inspect())
    }
}

impl<P: TermProvider> Drop for MultiTermMatch<P> {
    fn drop(&mut self) {
        if let Some(holder) = self.frequencies.take() {
            relevance_pool().return_buffer(holder);
        }
    }
}
