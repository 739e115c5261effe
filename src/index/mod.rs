//! In-memory posting list representation and field statistics.

pub mod postings;

pub use postings::{FieldStats, PostingList};
