//! Artifacts: inventory and active effects, chest odds and awakening.

pub mod chests;
pub mod types;

pub use chests::*;
pub use types::*;
