//! Equipment: slots, base stats and potentials.

pub mod types;

pub use types::*;
