//! Economy model data.
//!
//! Plain data structs owned by one colony engine. Behavior lives in
//! `systems` and `engine`.

mod colony;
mod ship;

pub use colony::*;
pub use ship::*;
