//! Production and energy - per-tick extraction, brownout and storage caps

use colony_logic::catalog::{BuildingCategory, BuildingDef, Catalog};
use colony_logic::economy::{accumulate_clamped, EnergyState};
use colony_logic::ore::OreAmounts;
use serde::{Deserialize, Serialize};

use crate::components::{BuildingLevels, ResourceLedger};
use crate::sector::{OreRichnessSource, SectorCoord};
use crate::systems::JobQueue;

/// What one production pass did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductionReport {
    pub energy: EnergyState,
    pub efficiency: f64,
    /// Ore produced before the capacity clamp.
    pub generated: OreAmounts,
    pub capacity: OreAmounts,
}

/// Built buildings that are not under construction, with their definitions.
/// Ids missing from the catalog are skipped.
pub fn active_buildings<'a>(
    catalog: &'a Catalog,
    buildings: &'a BuildingLevels,
    jobs: &'a JobQueue,
) -> impl Iterator<Item = (&'a BuildingDef, u32)> + 'a {
    buildings
        .iter()
        .filter(move |(id, _)| !jobs.is_constructing(id))
        .filter_map(move |(id, level)| catalog.building(id).map(|def| (def, level)))
}

/// Energy production and consumption of every active building.
pub fn energy_totals(catalog: &Catalog, buildings: &BuildingLevels, jobs: &JobQueue) -> EnergyState {
    let mut energy = EnergyState::default();
    for (def, level) in active_buildings(catalog, buildings, jobs) {
        energy.production += def.energy_production(level);
        energy.consumption += def.energy_consumption(level);
    }
    energy
}

/// Per-ore storage cap.
///
/// The Core hub contributes its table at its current level, including while
/// it upgrades. Storage buildings contribute only while not under
/// construction.
pub fn storage_capacity(catalog: &Catalog, buildings: &BuildingLevels, jobs: &JobQueue) -> OreAmounts {
    let mut capacity = match catalog.core_hub() {
        Some(hub) if buildings.is_built(&hub.id) => {
            hub.initial_capacity(buildings.level(&hub.id))
        }
        _ => OreAmounts::default(),
    };
    for (def, level) in active_buildings(catalog, buildings, jobs) {
        if def.category != BuildingCategory::Storage {
            continue;
        }
        if let Some(ore) = def.target_ore {
            capacity[ore] += def.capacity_increase(level);
        }
    }
    capacity
}

/// Effective extraction per second for every ore after richness and
/// efficiency.
pub fn production_rates(
    catalog: &Catalog,
    buildings: &BuildingLevels,
    jobs: &JobQueue,
    efficiency: f64,
    location: SectorCoord,
    sectors: &dyn OreRichnessSource,
) -> OreAmounts {
    let mut rates = OreAmounts::default();
    for (def, level) in active_buildings(catalog, buildings, jobs) {
        if !def.is_extractor() {
            continue;
        }
        let Some(ore) = def.target_ore else {
            continue;
        };
        let richness = sectors.ore_richness_at(location, ore);
        rates[ore] += def.production_rate(level) * richness.yield_multiplier() * efficiency;
    }
    rates
}

/// Run one production pass of `dt_seconds` against the ledger.
///
/// Output is clamped per ore at capacity and the overflow discarded. The
/// whole ledger is then clamped into `[0, capacity]`.
pub fn production_system(
    catalog: &Catalog,
    ledger: &mut ResourceLedger,
    buildings: &BuildingLevels,
    jobs: &JobQueue,
    location: SectorCoord,
    sectors: &dyn OreRichnessSource,
    dt_seconds: f64,
) -> ProductionReport {
    let energy = energy_totals(catalog, buildings, jobs);
    let efficiency = energy.efficiency();
    let capacity = storage_capacity(catalog, buildings, jobs);
    let rates = production_rates(catalog, buildings, jobs, efficiency, location, sectors);

    let mut generated = OreAmounts::default();
    for (ore, rate) in rates.nonzero() {
        let amount = rate * dt_seconds;
        ledger.stored[ore] = accumulate_clamped(ledger.stored[ore], amount, capacity[ore]);
        generated[ore] = amount;
    }

    ledger.stored.clamp_to(&capacity);
    ledger.energy = energy;

    ProductionReport {
        energy,
        efficiency,
        generated,
        capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::LevelTable;
    use crate::systems::{Job, JobKind};
    use colony_logic::catalog::CatalogData;
    use colony_logic::ore::{OreRichness, OreType};

    fn hub(iron_capacity: f64) -> BuildingDef {
        let mut def = BuildingDef::new("hub", "Hub", BuildingCategory::Core, OreAmounts::default(), 1_000);
        def.max_level = 3;
        def.capacity_multiplier = Some(2.0);
        def.base_initial_capacity = Some(OreAmounts::from_pairs(&[(OreType::Iron, iron_capacity)]));
        def
    }

    fn refinery(rate: f64, energy_cost: f64) -> BuildingDef {
        let mut def = BuildingDef::new(
            "refinery",
            "Refinery",
            BuildingCategory::Production,
            OreAmounts::default(),
            1_000,
        );
        def.target_ore = Some(OreType::Iron);
        def.base_production_rate = Some(rate);
        def.base_energy_cost = Some(energy_cost);
        def
    }

    fn generator(output: f64) -> BuildingDef {
        let mut def = BuildingDef::new("generator", "Generator", BuildingCategory::Power, OreAmounts::default(), 1_000);
        def.base_energy_production = Some(output);
        def
    }

    fn silo(capacity: f64) -> BuildingDef {
        let mut def = BuildingDef::new("silo", "Silo", BuildingCategory::Storage, OreAmounts::default(), 1_000);
        def.max_level = 2;
        def.target_ore = Some(OreType::Iron);
        def.base_capacity_increase = Some(capacity);
        def
    }

    fn catalog(buildings: Vec<BuildingDef>) -> Catalog {
        Catalog::new(CatalogData {
            buildings,
            ..Default::default()
        })
        .unwrap()
    }

    fn levels(entries: &[(&str, u32)]) -> LevelTable {
        let mut table = LevelTable::new();
        for (id, level) in entries {
            table.set_level(id, *level);
        }
        table
    }

    #[test]
    fn test_brownout_halves_output() {
        // balance -10, consumption 20 -> efficiency 0.5
        let catalog = catalog(vec![hub(1_000.0), refinery(1.0, 20.0), generator(10.0)]);
        let buildings = levels(&[("hub", 1), ("refinery", 1), ("generator", 1)]);
        let jobs = JobQueue::new();
        let mut ledger = ResourceLedger::default();

        let report = production_system(
            &catalog,
            &mut ledger,
            &buildings,
            &jobs,
            SectorCoord::default(),
            &OreRichness::Rich,
            1.0,
        );
        assert_eq!(report.energy.balance(), -10.0);
        assert_eq!(report.efficiency, 0.5);
        assert_eq!(ledger.stored[OreType::Iron], 0.5);
        assert_eq!(ledger.energy, report.energy);
    }

    #[test]
    fn test_output_clamped_at_capacity() {
        let catalog = catalog(vec![hub(100.0), refinery(1.0, 0.0)]);
        let buildings = levels(&[("hub", 1), ("refinery", 1)]);
        let jobs = JobQueue::new();
        let mut ledger = ResourceLedger::new(OreAmounts::from_pairs(&[(OreType::Iron, 95.0)]));

        let report = production_system(
            &catalog,
            &mut ledger,
            &buildings,
            &jobs,
            SectorCoord::default(),
            &OreRichness::Rich,
            10.0,
        );
        assert_eq!(report.generated[OreType::Iron], 10.0);
        assert_eq!(ledger.stored[OreType::Iron], 100.0);
    }

    #[test]
    fn test_richness_scales_output() {
        let catalog = catalog(vec![hub(1_000.0), refinery(1.0, 0.0)]);
        let buildings = levels(&[("hub", 1), ("refinery", 1)]);
        let jobs = JobQueue::new();
        let rates = production_rates(
            &catalog,
            &buildings,
            &jobs,
            1.0,
            SectorCoord::default(),
            &OreRichness::Poor,
        );
        assert_eq!(rates[OreType::Iron], 0.3);

        let none = production_rates(
            &catalog,
            &buildings,
            &jobs,
            1.0,
            SectorCoord::default(),
            &OreRichness::None,
        );
        assert!(none.is_zero());
    }

    #[test]
    fn test_constructing_building_is_inactive() {
        let catalog = catalog(vec![hub(1_000.0), refinery(1.0, 5.0), generator(10.0)]);
        let buildings = levels(&[("hub", 1), ("refinery", 1), ("generator", 1)]);
        let mut jobs = JobQueue::new();
        jobs.add_job(Job::new(
            JobKind::Building {
                id: "refinery".into(),
                target_level: 2,
            },
            0.0,
            1_000,
        ));

        let energy = energy_totals(&catalog, &buildings, &jobs);
        assert_eq!(energy, EnergyState::new(10.0, 0.0));

        let mut ledger = ResourceLedger::default();
        production_system(
            &catalog,
            &mut ledger,
            &buildings,
            &jobs,
            SectorCoord::default(),
            &OreRichness::Rich,
            5.0,
        );
        assert_eq!(ledger.stored[OreType::Iron], 0.0);
    }

    #[test]
    fn test_capacity_sums_hub_and_storage() {
        let catalog = catalog(vec![hub(100.0), silo(50.0)]);
        let jobs = JobQueue::new();
        let capacity = storage_capacity(&catalog, &levels(&[("hub", 2), ("silo", 1)]), &jobs);
        assert_eq!(capacity[OreType::Iron], 250.0);
        assert_eq!(capacity[OreType::Gold], 0.0);

        let no_hub = storage_capacity(&catalog, &levels(&[("silo", 1)]), &jobs);
        assert_eq!(no_hub[OreType::Iron], 50.0);
    }

    #[test]
    fn test_hub_counts_while_upgrading_storage_does_not() {
        let catalog = catalog(vec![hub(100.0), silo(50.0)]);
        let buildings = levels(&[("hub", 1), ("silo", 1)]);
        let mut jobs = JobQueue::new();
        jobs.add_job(Job::new(
            JobKind::Building {
                id: "hub".into(),
                target_level: 2,
            },
            0.0,
            1_000,
        ));
        jobs.add_job(Job::new(
            JobKind::Building {
                id: "silo".into(),
                target_level: 2,
            },
            0.0,
            1_000,
        ));
        let capacity = storage_capacity(&catalog, &buildings, &jobs);
        assert_eq!(capacity[OreType::Iron], 100.0);
    }

    #[test]
    fn test_ledger_clamped_when_capacity_shrinks() {
        let catalog = catalog(vec![hub(100.0), silo(50.0)]);
        let buildings = levels(&[("hub", 1), ("silo", 1)]);
        let mut jobs = JobQueue::new();
        jobs.add_job(Job::new(
            JobKind::Building {
                id: "silo".into(),
                target_level: 2,
            },
            0.0,
            1_000,
        ));
        let mut ledger = ResourceLedger::new(OreAmounts::from_pairs(&[(OreType::Iron, 140.0)]));
        production_system(
            &catalog,
            &mut ledger,
            &buildings,
            &jobs,
            SectorCoord::default(),
            &OreRichness::Rich,
            1.0,
        );
        assert_eq!(ledger.stored[OreType::Iron], 100.0);
    }
}
