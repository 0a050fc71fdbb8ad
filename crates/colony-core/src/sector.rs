//! Sector collaborator - read-only ore richness at a map location.
//!
//! Map generation lives outside the engine. The engine only needs to ask
//! "how rich is ore X where this colony sits", which is the
//! [`OreRichnessSource`] trait. [`SectorDeposits`] is a plain map-backed
//! implementation for embedders and tests.

use std::collections::HashMap;

use colony_logic::ore::{OreRichness, OreType};
use serde::{Deserialize, Serialize};

/// Grid coordinate of a sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SectorCoord {
    pub x: i32,
    pub y: i32,
}

impl SectorCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One ore deposit in a sector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OreDeposit {
    pub amount: f64,
    pub richness: OreRichness,
}

/// Anything that can report ore richness at a location.
pub trait OreRichnessSource {
    fn ore_richness_at(&self, location: SectorCoord, ore: OreType) -> OreRichness;
}

/// Map-backed deposits keyed by sector. Unknown sectors and ores are
/// [`OreRichness::None`].
#[derive(Debug, Clone, Default)]
pub struct SectorDeposits {
    sectors: HashMap<SectorCoord, HashMap<OreType, OreDeposit>>,
}

impl SectorDeposits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_deposit(&mut self, location: SectorCoord, ore: OreType, deposit: OreDeposit) {
        self.sectors.entry(location).or_default().insert(ore, deposit);
    }

    /// Same richness for every ore at `location`.
    pub fn uniform(location: SectorCoord, richness: OreRichness, amount: f64) -> Self {
        let mut deposits = Self::new();
        for &ore in OreType::all() {
            deposits.set_deposit(location, ore, OreDeposit { amount, richness });
        }
        deposits
    }

    pub fn deposit(&self, location: SectorCoord, ore: OreType) -> Option<&OreDeposit> {
        self.sectors.get(&location).and_then(|ores| ores.get(&ore))
    }
}

impl OreRichnessSource for SectorDeposits {
    fn ore_richness_at(&self, location: SectorCoord, ore: OreType) -> OreRichness {
        self.deposit(location, ore)
            .map(|d| d.richness)
            .unwrap_or(OreRichness::None)
    }
}

/// Fixed richness everywhere.
impl OreRichnessSource for OreRichness {
    fn ore_richness_at(&self, _location: SectorCoord, _ore: OreType) -> OreRichness {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sector_is_none() {
        let deposits = SectorDeposits::new();
        assert_eq!(
            deposits.ore_richness_at(SectorCoord::new(3, 4), OreType::Iron),
            OreRichness::None
        );
    }

    #[test]
    fn test_deposit_lookup() {
        let here = SectorCoord::new(1, 1);
        let mut deposits = SectorDeposits::new();
        deposits.set_deposit(
            here,
            OreType::Gold,
            OreDeposit {
                amount: 400.0,
                richness: OreRichness::Poor,
            },
        );
        assert_eq!(deposits.ore_richness_at(here, OreType::Gold), OreRichness::Poor);
        assert_eq!(deposits.ore_richness_at(here, OreType::Iron), OreRichness::None);
        assert_eq!(
            deposits.ore_richness_at(SectorCoord::new(0, 0), OreType::Gold),
            OreRichness::None
        );
    }

    #[test]
    fn test_uniform() {
        let here = SectorCoord::new(2, 2);
        let deposits = SectorDeposits::uniform(here, OreRichness::Rich, 1000.0);
        for &ore in OreType::all() {
            assert_eq!(deposits.ore_richness_at(here, ore), OreRichness::Rich);
        }
    }

    #[test]
    fn test_constant_source() {
        let source = OreRichness::Trace;
        assert_eq!(
            source.ore_richness_at(SectorCoord::default(), OreType::Copper),
            OreRichness::Trace
        );
    }
}
