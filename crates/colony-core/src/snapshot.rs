//! Read-only, owned view of a colony for presentation layers.

use std::collections::BTreeMap;

use colony_logic::economy::EnergyState;
use colony_logic::ore::OreAmounts;
use serde::{Deserialize, Serialize};

use crate::components::{ShipId, ShipInstance};
use crate::sector::SectorCoord;
use crate::systems::Job;

/// Progress of an in-flight job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProgress {
    pub started_at_ms: f64,
    pub duration_ms: u64,
    /// Percent in [0, 100].
    pub progress: f64,
    pub target_level: Option<u32>,
}

impl JobProgress {
    pub fn of(job: &Job, now_ms: f64) -> Self {
        Self {
            started_at_ms: job.started_at_ms,
            duration_ms: job.duration_ms,
            progress: job.progress(now_ms),
            target_level: job.kind.target_level(),
        }
    }
}

/// A leveled entry (building or research) with any job working on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelView {
    pub level: u32,
    pub in_progress: Option<JobProgress>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipView {
    pub ship: ShipInstance,
    pub build_progress: Option<JobProgress>,
}

/// Everything a renderer needs, copied out of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColonySnapshot {
    pub name: String,
    pub location: SectorCoord,
    pub sim_time_ms: f64,
    pub resources: OreAmounts,
    pub storage_capacity: OreAmounts,
    /// Stored over capacity per ore, in [0, 1].
    pub storage_fill: OreAmounts,
    pub energy: EnergyState,
    pub efficiency: f64,
    /// Built or under construction.
    pub buildings: BTreeMap<String, LevelView>,
    /// Completed or in progress.
    pub research: BTreeMap<String, LevelView>,
    pub ships: BTreeMap<ShipId, ShipView>,
}

impl ColonySnapshot {
    pub fn building_level(&self, id: &str) -> u32 {
        self.buildings.get(id).map(|b| b.level).unwrap_or(0)
    }

    pub fn research_level(&self, id: &str) -> u32 {
        self.research.get(id).map(|r| r.level).unwrap_or(0)
    }
}
