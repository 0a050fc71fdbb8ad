//! Player commands - validated in full before any state changes
//!
//! Every handler checks its preconditions in a fixed order and returns the
//! first failure as a [`CommandError`]. Only after all checks pass does it
//! touch the ledger, the job queue or the fleet, so a rejected command leaves
//! the engine exactly as it was.

use std::sync::Arc;

use colony_logic::leveling::ship_build_time;
use colony_logic::ore::OreType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{ShipId, ShipInstance, ShipLocation, ShipStatus};
use crate::engine::ColonyEngine;
use crate::sector::SectorCoord;
use crate::systems::{requirements_met, Job, JobKind, JobTarget};

/// A request to change the colony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Construct a building at level 1 or raise it one level.
    BuildOrUpgrade { building: String },
    BuildShip { ship_type: String },
    /// Research the next level of a technology.
    Research { research: String },
    MoveShip { ship: ShipId, destination: SectorCoord },
    DockShip { ship: ShipId },
    /// Positive `amount` loads from the colony, negative unloads into it.
    ManageCargo { ship: ShipId, ore: OreType, amount: f64 },
    /// Drop an in-flight job. Nothing is refunded.
    Cancel { target: JobTarget },
}

/// What an accepted command did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Applied {
    ConstructionStarted {
        building: String,
        target_level: u32,
        duration_ms: u64,
    },
    ResearchStarted {
        research: String,
        target_level: u32,
        duration_ms: u64,
    },
    ShipQueued {
        ship: ShipId,
        duration_ms: u64,
    },
    ShipOrdered {
        ship: ShipId,
        status: ShipStatus,
    },
    CargoTransferred {
        ship: ShipId,
        ore: OreType,
        /// Signed like the command: positive was loaded.
        amount: f64,
    },
    JobCancelled {
        target: JobTarget,
    },
}

/// Why a command was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown id `{0}`")]
    UnknownId(String),
    #[error("`{0}` is already at its max level")]
    MaxLevelReached(String),
    #[error("`{0}` already has a job in progress")]
    AlreadyInProgress(String),
    #[error("requirements for `{0}` are not met")]
    RequirementsNotMet(String),
    #[error("insufficient resources")]
    InsufficientResources,
    #[error("missing prerequisite building `{0}`")]
    MissingPrerequisiteBuilding(String),
    #[error("no research facility built")]
    MissingLab,
    #[error("{0} is unavailable")]
    ShipUnavailable(ShipId),
    #[error("{0} cargo capacity exceeded")]
    CargoCapacityExceeded(ShipId),
    #[error("no job in progress for {0}")]
    NoSuchJob(JobTarget),
}

impl ColonyEngine {
    /// Validate and apply one command.
    pub fn issue_command(&mut self, command: Command) -> Result<Applied, CommandError> {
        let result = match command {
            Command::BuildOrUpgrade { building } => self.build_or_upgrade(&building),
            Command::BuildShip { ship_type } => self.build_ship(&ship_type),
            Command::Research { research } => self.start_research(&research),
            Command::MoveShip { ship, destination } => self.move_ship(ship, destination),
            Command::DockShip { ship } => self.dock_ship(ship),
            Command::ManageCargo { ship, ore, amount } => self.manage_cargo(ship, ore, amount),
            Command::Cancel { target } => self.cancel_job(&target),
        };
        match &result {
            Ok(applied) => {
                self.refresh_derived();
                log::debug!("applied {:?}", applied);
            }
            Err(err) => log::debug!("rejected: {}", err),
        }
        result
    }

    fn build_or_upgrade(&mut self, id: &str) -> Result<Applied, CommandError> {
        let catalog = Arc::clone(&self.catalog);
        let def = catalog
            .building(id)
            .ok_or_else(|| CommandError::UnknownId(id.to_string()))?;

        let target_level = self.buildings.level(id) + 1;
        if target_level > def.max_level {
            return Err(CommandError::MaxLevelReached(id.to_string()));
        }
        if self.jobs.contains(&JobTarget::Building(id.to_string())) {
            return Err(CommandError::AlreadyInProgress(id.to_string()));
        }
        if !requirements_met(&def.requires, &self.buildings, &self.research) {
            return Err(CommandError::RequirementsNotMet(id.to_string()));
        }
        let cost = def.cost_at(target_level);
        if !self.ledger.can_afford(&cost) {
            return Err(CommandError::InsufficientResources);
        }

        let duration_ms = def.construction_time(target_level);
        self.ledger.stored.deduct(&cost);
        self.jobs.add_job(Job::new(
            JobKind::Building {
                id: id.to_string(),
                target_level,
            },
            self.sim_time_ms,
            duration_ms,
        ));
        Ok(Applied::ConstructionStarted {
            building: id.to_string(),
            target_level,
            duration_ms,
        })
    }

    fn start_research(&mut self, id: &str) -> Result<Applied, CommandError> {
        let catalog = Arc::clone(&self.catalog);
        let def = catalog
            .research(id)
            .ok_or_else(|| CommandError::UnknownId(id.to_string()))?;

        let has_lab = catalog
            .research_labs()
            .any(|lab| self.buildings.is_built(&lab.id));
        if !has_lab {
            return Err(CommandError::MissingLab);
        }
        let target_level = self.research.level(id) + 1;
        if target_level > def.max_level {
            return Err(CommandError::MaxLevelReached(id.to_string()));
        }
        if self.jobs.contains(&JobTarget::Research(id.to_string())) {
            return Err(CommandError::AlreadyInProgress(id.to_string()));
        }
        if !requirements_met(&def.requires, &self.buildings, &self.research) {
            return Err(CommandError::RequirementsNotMet(id.to_string()));
        }
        let cost = def.cost_at(target_level);
        if !self.ledger.can_afford(&cost) {
            return Err(CommandError::InsufficientResources);
        }

        let duration_ms = def.research_time(target_level);
        self.ledger.stored.deduct(&cost);
        self.jobs.add_job(Job::new(
            JobKind::Research {
                id: id.to_string(),
                target_level,
            },
            self.sim_time_ms,
            duration_ms,
        ));
        Ok(Applied::ResearchStarted {
            research: id.to_string(),
            target_level,
            duration_ms,
        })
    }

    fn build_ship(&mut self, type_id: &str) -> Result<Applied, CommandError> {
        let catalog = Arc::clone(&self.catalog);
        let def = catalog
            .ship_type(type_id)
            .ok_or_else(|| CommandError::UnknownId(type_id.to_string()))?;

        let shipyard = catalog
            .shipyard()
            .ok_or_else(|| CommandError::MissingPrerequisiteBuilding("shipyard".to_string()))?;
        let facility_level = self.buildings.level(&shipyard.id);
        if facility_level == 0 {
            return Err(CommandError::MissingPrerequisiteBuilding(shipyard.id.clone()));
        }
        if !requirements_met(&def.requires, &self.buildings, &self.research) {
            return Err(CommandError::RequirementsNotMet(type_id.to_string()));
        }
        if !self.ledger.can_afford(&def.cost) {
            return Err(CommandError::InsufficientResources);
        }

        let duration_ms = ship_build_time(def.base_build_ms, facility_level);
        self.ledger.stored.deduct(&def.cost);
        let ship = self.fleet.allocate_id();
        self.fleet.spawn(ShipInstance::new(
            ship,
            &def.id,
            format!("{} #{}", def.name, ship.0),
            def.cargo_capacity,
        ));
        self.jobs
            .add_job(Job::new(JobKind::Ship { ship }, self.sim_time_ms, duration_ms));
        Ok(Applied::ShipQueued { ship, duration_ms })
    }

    /// A ship that exists and has finished construction.
    fn ready_ship(&self, ship: ShipId) -> Result<ShipInstance, CommandError> {
        let instance = self
            .fleet
            .get(ship)
            .ok_or_else(|| CommandError::UnknownId(ship.to_string()))?;
        if instance.is_constructing() {
            return Err(CommandError::ShipUnavailable(ship));
        }
        Ok(instance)
    }

    fn move_ship(&mut self, ship: ShipId, destination: SectorCoord) -> Result<Applied, CommandError> {
        self.ready_ship(ship)?;
        self.fleet.update(ship, |s| {
            s.status = ShipStatus::Moving;
            s.destination = Some(destination);
        });
        Ok(Applied::ShipOrdered {
            ship,
            status: ShipStatus::Moving,
        })
    }

    fn dock_ship(&mut self, ship: ShipId) -> Result<Applied, CommandError> {
        self.ready_ship(ship)?;
        self.fleet.update(ship, |s| {
            s.status = ShipStatus::Docked;
            s.location = ShipLocation::Docked;
            s.destination = None;
        });
        Ok(Applied::ShipOrdered {
            ship,
            status: ShipStatus::Docked,
        })
    }

    fn manage_cargo(&mut self, ship: ShipId, ore: OreType, amount: f64) -> Result<Applied, CommandError> {
        let instance = self.ready_ship(ship)?;
        if !instance.is_docked() {
            return Err(CommandError::ShipUnavailable(ship));
        }
        if !amount.is_finite() {
            return Err(CommandError::InsufficientResources);
        }

        if amount >= 0.0 {
            if self.ledger.stored[ore] < amount {
                return Err(CommandError::InsufficientResources);
            }
            if amount > instance.cargo_free() {
                return Err(CommandError::CargoCapacityExceeded(ship));
            }
            self.ledger.stored[ore] -= amount;
            self.fleet.update(ship, |s| s.cargo[ore] += amount);
        } else {
            let unload = -amount;
            if instance.cargo_of(ore) < unload {
                return Err(CommandError::InsufficientResources);
            }
            self.fleet
                .update(ship, |s| s.cargo[ore] = (s.cargo[ore] - unload).max(0.0));
            // Overflow past capacity is discarded.
            self.grant(ore, unload);
        }
        Ok(Applied::CargoTransferred { ship, ore, amount })
    }

    fn cancel_job(&mut self, target: &JobTarget) -> Result<Applied, CommandError> {
        let job = self
            .jobs
            .cancel(target)
            .ok_or_else(|| CommandError::NoSuchJob(target.clone()))?;
        if let JobKind::Ship { ship } = job.kind {
            self.fleet.despawn(ship);
        }
        Ok(Applied::JobCancelled {
            target: target.clone(),
        })
    }
}
