//! Pooled and scoped memory for query evaluation.

pub mod context;
pub mod relevance_pool;

pub use context::{AllocationContext, ScratchBuffer};
pub use relevance_pool::{RelevancePool, relevance_pool};
