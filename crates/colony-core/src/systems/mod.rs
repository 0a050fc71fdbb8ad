//! Systems - per-tick logic over the colony state

mod production;
mod requirements;
mod scheduler;

pub use production::*;
pub use requirements::*;
pub use scheduler::*;
