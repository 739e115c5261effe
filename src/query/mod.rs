//! Query execution layer: match streams over posting lists.

pub mod bm25;
pub mod inspection;
pub mod multi_term;
pub mod provider;
pub mod query_match;
pub mod statistics;
pub mod term_match;

pub use self::bm25::Bm25Relevance;
pub use self::inspection::QueryInspectionNode;
pub use self::multi_term::MultiTermMatch;
pub use self::provider::{MemoryTermProvider, TermProvider};
pub use self::query_match::{DocId, INVALID, QueryCountConfidence, QueryMatch, START};
pub use self::statistics::{QueryResultSummary, QueryStatistics};
pub use self::term_match::TermMatch;

/// Metadata of a queried field.
///
/// The match pipeline reads only the boost declaration: a boosted
/// field enables relevance accumulation in the matches built for it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMetadata {
    /// The field name.
    name: String,
    /// Relevance boost declared for the field, if any.
    boost: Option<f32>,
}

impl FieldMetadata {
    /// Create metadata for an unboosted field.
    pub fn new<S: Into<String>>(name: S) -> Self {
        FieldMetadata {
            name: name.into(),
            boost: None,
        }
    }

    /// Declare a relevance boost for the field.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = Some(boost);
        self
    }

    /// Get the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the field declares a relevance boost.
    pub fn has_boost(&self) -> bool {
        self.boost.is_some()
    }

    /// The declared boost factor, defaulting to 1.0.
    pub fn boost(&self) -> f32 {
        self.boost.unwrap_or(1.0)
    }
}
