//! Hero power: rerollable lines bought with medals.

pub mod rolls;
pub mod types;

pub use rolls::*;
pub use types::*;
