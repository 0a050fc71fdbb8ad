//! Ship components. Each ship is one hecs entity carrying the parts below;
//! `ShipInstance` is the assembled owned record.

use std::fmt;

use colony_logic::ore::{OreAmounts, OreType};
use serde::{Deserialize, Serialize};

use crate::sector::SectorCoord;

/// Unique ship instance id within a colony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShipId(pub u64);

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ship-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipStatus {
    Constructing,
    Idle,
    Moving,
    Mining,
    Trading,
    Docked,
}

/// Where a ship is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipLocation {
    Docked,
    Sector(SectorCoord),
}

/// Immutable identity of a ship: its catalog type, display name and hold size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipHull {
    pub type_id: String,
    pub name: String,
    pub cargo_capacity: f64,
}

/// Ore in a ship's hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cargo(pub OreAmounts);

/// Sector a moving ship is headed for. Absent when the ship has no orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination(pub SectorCoord);

/// A ship owned by the colony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipInstance {
    pub id: ShipId,
    pub type_id: String,
    pub name: String,
    pub status: ShipStatus,
    pub location: ShipLocation,
    pub destination: Option<SectorCoord>,
    pub cargo: OreAmounts,
    pub cargo_capacity: f64,
}

impl ShipInstance {
    /// A freshly queued ship: constructing, docked, empty hold.
    pub fn new(id: ShipId, type_id: &str, name: String, cargo_capacity: f64) -> Self {
        Self {
            id,
            type_id: type_id.to_string(),
            name,
            status: ShipStatus::Constructing,
            location: ShipLocation::Docked,
            destination: None,
            cargo: OreAmounts::default(),
            cargo_capacity,
        }
    }

    pub fn is_constructing(&self) -> bool {
        self.status == ShipStatus::Constructing
    }

    pub fn is_docked(&self) -> bool {
        self.location == ShipLocation::Docked
    }

    /// Unused hold space.
    pub fn cargo_free(&self) -> f64 {
        (self.cargo_capacity - self.cargo.total()).max(0.0)
    }

    pub fn cargo_of(&self, ore: OreType) -> f64 {
        self.cargo[ore]
    }

    /// Construction finished: idle in the dock.
    pub fn finish_construction(&mut self) {
        self.status = ShipStatus::Idle;
        self.location = ShipLocation::Docked;
        self.destination = None;
    }
}
