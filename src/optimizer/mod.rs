//! Upgrade efficiency ranking across cubes, starforce, hero power and
//! artifacts.

pub mod budget;
pub mod cache;
pub mod candidate;
pub mod cube_metrics;
pub mod hero_lock;
pub mod ranker;
pub mod report;

pub use budget::*;
pub use cache::*;
pub use candidate::*;
pub use cube_metrics::*;
pub use hero_lock::*;
pub use ranker::*;
pub use report::*;
