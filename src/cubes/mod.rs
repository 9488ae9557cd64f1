//! Potential cubes: rates, pools and roll distributions.

pub mod outcomes;
pub mod tables;

pub use outcomes::*;
pub use tables::*;
