//! Ore types, deposit richness, and fixed per-ore amount tables.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// Minable ore. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OreType {
    Iron = 0,
    Copper = 1,
    Gold = 2,
    Titanium = 3,
    Uranium = 4,
}

impl OreType {
    pub const COUNT: usize = 5;

    pub fn all() -> &'static [OreType] {
        &[
            Self::Iron,
            Self::Copper,
            Self::Gold,
            Self::Titanium,
            Self::Uranium,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Iron => "Iron",
            Self::Copper => "Copper",
            Self::Gold => "Gold",
            Self::Titanium => "Titanium",
            Self::Uranium => "Uranium",
        }
    }
}

impl fmt::Display for OreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Qualitative abundance of an ore at a location. Ordered richest first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OreRichness {
    Rich,
    Poor,
    Trace,
    #[default]
    None,
}

impl OreRichness {
    /// Production yield multiplier for this richness.
    pub fn yield_multiplier(self) -> f64 {
        match self {
            Self::Rich => 1.0,
            Self::Poor => 0.3,
            Self::Trace => 0.05,
            Self::None => 0.0,
        }
    }
}

/// One amount per ore. Missing ores are zero.
///
/// Used for the colony ledger, storage capacity, build costs and ship cargo.
/// Serializes as a map of ore name to amount with zero entries omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<OreType, f64>", into = "BTreeMap<OreType, f64>")]
pub struct OreAmounts([f64; OreType::COUNT]);

impl OreAmounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(ore, amount)` pairs. Later pairs for the same ore win.
    pub fn from_pairs(pairs: &[(OreType, f64)]) -> Self {
        let mut amounts = Self::default();
        for &(ore, amount) in pairs {
            amounts[ore] = amount;
        }
        amounts
    }

    pub fn get(&self, ore: OreType) -> f64 {
        self.0[ore.index()]
    }

    pub fn set(&mut self, ore: OreType, amount: f64) {
        self.0[ore.index()] = amount;
    }

    /// Iterate all ores, including zero entries.
    pub fn iter(&self) -> impl Iterator<Item = (OreType, f64)> + '_ {
        OreType::all().iter().map(move |&ore| (ore, self.get(ore)))
    }

    /// Iterate only ores with a nonzero amount.
    pub fn nonzero(&self) -> impl Iterator<Item = (OreType, f64)> + '_ {
        self.iter().filter(|(_, amount)| *amount != 0.0)
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|amount| *amount == 0.0)
    }

    /// True if every entry of `self` is at least the matching entry of `cost`.
    pub fn covers(&self, cost: &OreAmounts) -> bool {
        OreType::all()
            .iter()
            .all(|&ore| self.get(ore) >= cost.get(ore))
    }

    /// Subtract `cost` entry-wise, flooring each entry at zero.
    pub fn deduct(&mut self, cost: &OreAmounts) {
        for &ore in OreType::all() {
            self[ore] = (self[ore] - cost[ore]).max(0.0);
        }
    }

    /// Apply `f` to every entry.
    pub fn map(&self, mut f: impl FnMut(OreType, f64) -> f64) -> OreAmounts {
        let mut out = OreAmounts::default();
        for &ore in OreType::all() {
            out[ore] = f(ore, self[ore]);
        }
        out
    }

    /// Clamp every entry into `[0, cap]` for the matching `cap` entry.
    pub fn clamp_to(&mut self, capacity: &OreAmounts) {
        for &ore in OreType::all() {
            self[ore] = self[ore].clamp(0.0, capacity[ore].max(0.0));
        }
    }
}

impl Index<OreType> for OreAmounts {
    type Output = f64;

    fn index(&self, ore: OreType) -> &f64 {
        &self.0[ore.index()]
    }
}

impl IndexMut<OreType> for OreAmounts {
    fn index_mut(&mut self, ore: OreType) -> &mut f64 {
        &mut self.0[ore.index()]
    }
}

impl From<BTreeMap<OreType, f64>> for OreAmounts {
    fn from(map: BTreeMap<OreType, f64>) -> Self {
        let mut amounts = Self::default();
        for (ore, amount) in map {
            amounts[ore] = amount;
        }
        amounts
    }
}

impl From<OreAmounts> for BTreeMap<OreType, f64> {
    fn from(amounts: OreAmounts) -> Self {
        amounts.nonzero().collect()
    }
}
