//! # Xyston
//!
//! Query execution primitives for a full-text search engine.
//!
//! ## Features
//!
//! - Pure Rust implementation
//! - Streaming multi-term match combinator with deferred sort/dedup
//! - Candidate-set intersection over term unions
//! - BM25 relevance accumulation with pooled scratch storage
//! - Query-plan inspection trees

pub mod error;
pub mod index;
pub mod memory;
pub mod query;
pub mod util;

pub mod prelude {}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
