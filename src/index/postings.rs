//! Posting lists and field-level statistics.
//!
//! The term dictionary and storage engine are external to this crate;
//! [`PostingList`] is the in-memory shape they hand to the query
//! execution layer: one term's ascending, deduplicated document ids
//! with parallel term frequencies.

use serde::{Deserialize, Serialize};

use crate::error::{Result, XystonError};
use crate::query::DocId;

/// The posting list of a single term: ascending, duplicate-free
/// document ids with parallel within-document term frequencies.
#[derive(Debug, Clone)]
pub struct PostingList {
    /// The term text.
    term: String,
    /// Document IDs in the posting list.
    doc_ids: Vec<DocId>,
    /// Term frequencies for each document.
    term_freqs: Vec<u32>,
}

impl PostingList {
    /// Create a new posting list.
    ///
    /// Validates that the id and frequency vectors have the same
    /// length and that document ids are strictly ascending and
    /// non-negative (the negative range is reserved for iteration
    /// sentinels).
    pub fn new<S: Into<String>>(
        term: S,
        doc_ids: Vec<DocId>,
        term_freqs: Vec<u32>,
    ) -> Result<Self> {
        if doc_ids.len() != term_freqs.len() {
            return Err(XystonError::index(
                "Document IDs and term frequencies must have the same length",
            ));
        }

        for (i, &doc_id) in doc_ids.iter().enumerate() {
            if doc_id < 0 {
                return Err(XystonError::index(format!(
                    "Document ID {doc_id} is in the reserved sentinel range"
                )));
            }
            if i > 0 && doc_id <= doc_ids[i - 1] {
                return Err(XystonError::index(
                    "Document IDs must be strictly ascending",
                ));
            }
        }

        Ok(PostingList {
            term: term.into(),
            doc_ids,
            term_freqs,
        })
    }

    /// Create an empty posting list.
    pub fn empty<S: Into<String>>(term: S) -> Self {
        PostingList {
            term: term.into(),
            doc_ids: Vec::new(),
            term_freqs: Vec::new(),
        }
    }

    /// Get the term text.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Get the document ids.
    pub fn doc_ids(&self) -> &[DocId] {
        &self.doc_ids
    }

    /// Get the term frequencies, parallel to the document ids.
    pub fn term_freqs(&self) -> &[u32] {
        &self.term_freqs
    }

    /// Number of documents containing the term.
    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    /// Whether the posting list has no documents.
    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }

    /// Term frequency for a document, if the document contains the term.
    pub fn term_freq(&self, doc_id: DocId) -> Option<u32> {
        self.doc_ids
            .binary_search(&doc_id)
            .ok()
            .map(|pos| self.term_freqs[pos])
    }
}

/// Collection-level statistics for a field, used as BM25 inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    /// Number of documents containing the field.
    pub doc_count: u64,
    /// Average field length across those documents.
    pub avg_length: f64,
}

impl FieldStats {
    /// Create new field statistics.
    pub fn new(doc_count: u64, avg_length: f64) -> Self {
        FieldStats {
            doc_count,
            avg_length,
        }
    }
}

impl Default for FieldStats {
    fn default() -> Self {
        FieldStats {
            doc_count: 0,
            avg_length: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posting_list_creation() {
        let postings = PostingList::new("hello", vec![1, 3, 5], vec![2, 1, 4]).unwrap();

        assert_eq!(postings.term(), "hello");
        assert_eq!(postings.len(), 3);
        assert!(!postings.is_empty());
        assert_eq!(postings.doc_ids(), &[1, 3, 5]);
        assert_eq!(postings.term_freq(3), Some(1));
        assert_eq!(postings.term_freq(4), None);
    }

    #[test]
    fn test_posting_list_length_mismatch() {
        let result = PostingList::new("hello", vec![1, 2], vec![1]);
        assert!(result.is_err());
    }

    #[test]
    fn test_posting_list_rejects_unsorted() {
        let result = PostingList::new("hello", vec![3, 1], vec![1, 1]);
        assert!(result.is_err());

        let result = PostingList::new("hello", vec![1, 1], vec![1, 1]);
        assert!(result.is_err());
    }

    #[test]
    fn test_posting_list_rejects_sentinel_range() {
        let result = PostingList::new("hello", vec![-1, 2], vec![1, 1]);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_posting_list() {
        let postings = PostingList::empty("missing");
        assert!(postings.is_empty());
        assert_eq!(postings.len(), 0);
    }
}
