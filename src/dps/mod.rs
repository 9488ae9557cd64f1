//! DPS estimation consumed by the upgrade ranker.

pub mod model;

pub use model::*;
