//! Starforce enhancement: the stage table, the Markov solver, cost
//! projection under protection strategies and Monte Carlo validation.

pub mod cost;
pub mod markov;
pub mod simulate;
pub mod types;

pub use cost::*;
pub use markov::*;
pub use simulate::*;
pub use types::*;
