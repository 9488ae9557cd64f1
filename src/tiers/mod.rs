//! One-way tier progression with pity: potential cubes and artifact chests.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
