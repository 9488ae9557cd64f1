//! Stat kinds, stat sources and the rules for combining them.

pub mod aliases;
pub mod combine;
pub mod types;

pub use aliases::*;
pub use combine::*;
pub use types::*;
