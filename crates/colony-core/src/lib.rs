//! Colony Core - tick-driven economy engine for one space colony
//!
//! Buildings extract ore, draw and generate energy, and take time to build.
//! Research and ship construction run through the same job scheduler. The
//! whole economy advances only when the host calls [`ColonyEngine::tick`].
//!
//! # Architecture
//!
//! - **Catalog**: immutable definitions from `colony_logic`, shared as
//!   `Arc<Catalog>` between colonies
//! - **Components**: per-colony state (ledger, level tables) and ship
//!   instances, which live as `hecs` entities
//! - **Systems**: production/energy, scheduler and requirement checks that
//!   run over that state
//! - **Commands**: validated player actions that either apply fully or not
//!   at all
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use colony_core::prelude::*;
//!
//! let catalog = Arc::new(Catalog::standard());
//! let mut engine = ColonyEngine::new(catalog, ColonyConfig::default()).unwrap();
//! engine.grant(OreType::Copper, 10.0);
//!
//! engine
//!     .issue_command(Command::BuildOrUpgrade { building: "iron_refinery".into() })
//!     .unwrap();
//!
//! let deposits = OreRichness::Rich;
//! engine.tick(10.0, &deposits);
//! assert_eq!(engine.building_level("iron_refinery"), 1);
//! ```

pub mod commands;
pub mod components;
pub mod config;
pub mod engine;
pub mod fleet;
pub mod sector;
pub mod snapshot;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::commands::{Applied, Command, CommandError};
    pub use crate::components::*;
    pub use crate::config::ColonyConfig;
    pub use crate::engine::ColonyEngine;
    pub use crate::sector::{OreRichnessSource, SectorCoord, SectorDeposits};
    pub use crate::snapshot::ColonySnapshot;
    pub use crate::systems::JobTarget;
    pub use colony_logic::catalog::Catalog;
    pub use colony_logic::ore::{OreAmounts, OreRichness, OreType};
}
