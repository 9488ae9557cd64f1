//! Player state: the snapshot the ranker reads, and its JSON file.

pub mod persistence;
pub mod types;

pub use persistence::*;
pub use types::*;
