//! Utility modules for Xyston.

pub mod merge;
pub mod sorting;

// Re-export commonly used helpers
pub use merge::or;
pub use sorting::sort_and_remove_duplicates;
