//! Built-in catalog tables - the standard buildings, research and ships.
//!
//! `data/catalog.json` at the workspace root carries the same tables as
//! data; the simtest harness checks the two agree.

use crate::catalog::{
    BuildingCategory, BuildingDef, CatalogData, Requirement, ResearchDef, ShipTypeDef,
};
use crate::ore::OreType::{Copper, Gold, Iron, Titanium, Uranium};
use crate::ore::{OreAmounts, OreType};

fn cost(pairs: &[(OreType, f64)]) -> OreAmounts {
    OreAmounts::from_pairs(pairs)
}

fn research(id: &str) -> Requirement {
    Requirement::Research(id.to_string())
}

fn building(id: &str) -> Requirement {
    Requirement::Building(id.to_string())
}

fn building_level(id: &str, level: u32) -> Requirement {
    Requirement::BuildingLevel {
        id: id.to_string(),
        level,
    }
}

// ============================================================================
// BUILDINGS
// ============================================================================

fn refinery(
    ore: OreType,
    base_cost: OreAmounts,
    base_construction_ms: u64,
    rate: f64,
) -> BuildingDef {
    let id = format!("{}_refinery", ore.name().to_lowercase());
    let name = format!("{} Refinery", ore.name());
    BuildingDef {
        description: format!(
            "Extracts {} ore. Output depends on deposit richness.",
            ore.name()
        ),
        cost_multiplier: Some(1.5),
        time_multiplier: Some(1.4),
        max_level: 10,
        base_energy_cost: Some(5.0),
        energy_multiplier: Some(1.1),
        target_ore: Some(ore),
        base_production_rate: Some(rate),
        production_multiplier: Some(1.2),
        ..BuildingDef::new(
            &id,
            &name,
            BuildingCategory::Production,
            base_cost,
            base_construction_ms,
        )
    }
}

fn storage(ore: OreType, base_cost: OreAmounts, capacity: f64) -> BuildingDef {
    let id = format!("{}_storage", ore.name().to_lowercase());
    let name = format!("{} Storage Tank", ore.name());
    BuildingDef {
        description: format!("Increases storage capacity for {}.", ore.name()),
        cost_multiplier: Some(1.6),
        time_multiplier: Some(1.3),
        max_level: 10,
        target_ore: Some(ore),
        base_capacity_increase: Some(capacity),
        ..BuildingDef::new(&id, &name, BuildingCategory::Storage, base_cost, 15_000)
    }
}

pub fn buildings() -> Vec<BuildingDef> {
    let mut out = vec![BuildingDef {
        description: "Central structure. Provides base storage and power.".into(),
        cost_multiplier: Some(2.0),
        time_multiplier: Some(1.5),
        max_level: 5,
        base_energy_production: Some(20.0),
        energy_multiplier: Some(1.5),
        base_initial_capacity: Some(cost(&[
            (Iron, 2000.0),
            (Copper, 1000.0),
            (Gold, 500.0),
            (Titanium, 500.0),
            (Uranium, 200.0),
        ])),
        capacity_multiplier: Some(1.5),
        ..BuildingDef::new(
            "colony_hub",
            "Colony Hub",
            BuildingCategory::Core,
            cost(&[(Iron, 500.0), (Copper, 100.0)]),
            60_000,
        )
    }];

    out.push(refinery(Iron, cost(&[(Iron, 50.0), (Copper, 10.0)]), 10_000, 1.0));
    out.push(refinery(Copper, cost(&[(Iron, 60.0), (Copper, 5.0)]), 12_000, 0.8));
    out.push(refinery(Gold, cost(&[(Iron, 120.0), (Copper, 40.0)]), 20_000, 0.3));
    out.push(BuildingDef {
        requires: vec![building_level("colony_hub", 2)],
        ..refinery(
            Titanium,
            cost(&[(Iron, 150.0), (Copper, 60.0), (Gold, 10.0)]),
            25_000,
            0.25,
        )
    });
    out.push(BuildingDef {
        base_energy_cost: Some(10.0),
        requires: vec![building_level("colony_hub", 3)],
        ..refinery(Uranium, cost(&[(Iron, 200.0), (Titanium, 40.0)]), 30_000, 0.1)
    });

    // Iron storage scales on its own curve; the rest fall back to cost.
    out.push(BuildingDef {
        capacity_multiplier: Some(1.5),
        ..storage(Iron, cost(&[(Iron, 100.0), (Copper, 20.0)]), 1000.0)
    });
    out.push(storage(Copper, cost(&[(Iron, 100.0), (Copper, 20.0)]), 1000.0));
    out.push(storage(Gold, cost(&[(Iron, 120.0), (Copper, 30.0)]), 500.0));
    out.push(storage(Titanium, cost(&[(Iron, 120.0), (Copper, 30.0)]), 500.0));
    out.push(storage(Uranium, cost(&[(Iron, 150.0), (Titanium, 20.0)]), 250.0));

    out.push(BuildingDef {
        description: "Low output, cheap, low maintenance.".into(),
        cost_multiplier: Some(1.4),
        time_multiplier: Some(1.3),
        max_level: 10,
        base_energy_production: Some(20.0),
        energy_multiplier: Some(1.25),
        ..BuildingDef::new(
            "solar_plant",
            "Solar Plant",
            BuildingCategory::Power,
            cost(&[(Iron, 80.0), (Copper, 20.0)]),
            8_000,
        )
    });
    out.push(BuildingDef {
        description: "High output, expensive.".into(),
        cost_multiplier: Some(1.8),
        time_multiplier: Some(1.4),
        max_level: 5,
        base_energy_production: Some(100.0),
        energy_multiplier: Some(1.3),
        requires: vec![research("nuclear_power")],
        ..BuildingDef::new(
            "nuclear_reactor",
            "Nuclear Reactor",
            BuildingCategory::Power,
            cost(&[(Iron, 400.0), (Titanium, 100.0), (Uranium, 10.0)]),
            45_000,
        )
    });
    out.push(BuildingDef {
        description: "Unlocks the research tree.".into(),
        cost_multiplier: Some(1.7),
        time_multiplier: Some(1.5),
        max_level: 5,
        base_energy_cost: Some(10.0),
        enables_research: true,
        ..BuildingDef::new(
            "research_lab",
            "Research Lab",
            BuildingCategory::Utility,
            cost(&[(Iron, 150.0), (Copper, 50.0)]),
            20_000,
        )
    });
    out.push(BuildingDef {
        description: "Allows trade of ore for resources.".into(),
        cost_multiplier: Some(1.5),
        max_level: 3,
        base_energy_cost: Some(5.0),
        ..BuildingDef::new(
            "trade_port",
            "Trade Port",
            BuildingCategory::Utility,
            cost(&[(Iron, 75.0), (Gold, 10.0)]),
            15_000,
        )
    });
    out.push(BuildingDef {
        description: "Improves worker efficiency and reduces downtime.".into(),
        cost_multiplier: Some(1.5),
        max_level: 3,
        base_energy_cost: Some(8.0),
        ..BuildingDef::new(
            "medical_lab",
            "Medical Lab",
            BuildingCategory::Utility,
            cost(&[(Iron, 100.0), (Copper, 30.0)]),
            15_000,
        )
    });
    out.push(BuildingDef {
        description: "Increases population cap and worker allocation.".into(),
        cost_multiplier: Some(1.6),
        max_level: 5,
        base_energy_cost: Some(5.0),
        requires: vec![building_level("colony_hub", 2)],
        ..BuildingDef::new(
            "colony_expansion",
            "Colony Expansion",
            BuildingCategory::Utility,
            cost(&[(Iron, 200.0), (Titanium, 20.0)]),
            40_000,
        )
    });
    out.push(BuildingDef {
        description: "Builds ships. Higher levels build faster.".into(),
        cost_multiplier: Some(1.5),
        time_multiplier: Some(1.3),
        max_level: 10,
        base_energy_cost: Some(15.0),
        ..BuildingDef::new(
            "ship_facility",
            "Ship Facility",
            BuildingCategory::Shipyard,
            cost(&[(Iron, 250.0), (Titanium, 50.0)]),
            30_000,
        )
    });
    out.push(BuildingDef {
        description: "Basic planetary defense.".into(),
        cost_multiplier: Some(1.5),
        max_level: 5,
        base_energy_cost: Some(20.0),
        requires: vec![research("laser_tech")],
        ..BuildingDef::new(
            "laser_turret",
            "Laser Turret",
            BuildingCategory::Defense,
            cost(&[(Iron, 100.0), (Copper, 40.0)]),
            12_000,
        )
    });
    out.push(BuildingDef {
        description: "Long-range planetary defense.".into(),
        cost_multiplier: Some(1.5),
        max_level: 5,
        base_energy_cost: Some(25.0),
        ..BuildingDef::new(
            "missile_battery",
            "Missile Battery",
            BuildingCategory::Defense,
            cost(&[(Iron, 180.0), (Titanium, 30.0)]),
            18_000,
        )
    });
    out.push(BuildingDef {
        description: "Protects the colony from orbital bombardment.".into(),
        cost_multiplier: Some(1.8),
        max_level: 3,
        base_energy_cost: Some(50.0),
        requires: vec![research("adv_shielding")],
        ..BuildingDef::new(
            "shield_generator",
            "Shield Generator",
            BuildingCategory::Defense,
            cost(&[(Iron, 300.0), (Gold, 50.0), (Titanium, 75.0)]),
            40_000,
        )
    });

    out
}

// ============================================================================
// RESEARCH
// ============================================================================

pub fn research_items() -> Vec<ResearchDef> {
    vec![
        ResearchDef {
            description: "Increase ship speed and travel range.".into(),
            cost_multiplier: Some(2.0),
            time_multiplier: Some(1.5),
            max_level: 3,
            ..ResearchDef::new(
                "adv_engines",
                "Advanced Engines",
                cost(&[(Copper, 50.0), (Titanium, 20.0)]),
                30_000,
            )
        },
        ResearchDef {
            description: "Improve laser weapon damage and efficiency.".into(),
            unlocks: Some("laser_turret".into()),
            ..ResearchDef::new(
                "laser_tech",
                "Laser Technology",
                cost(&[(Iron, 100.0), (Gold, 15.0)]),
                25_000,
            )
        },
        ResearchDef {
            description: "Unlocks Nuclear Reactors for high energy output.".into(),
            unlocks: Some("nuclear_reactor".into()),
            ..ResearchDef::new(
                "nuclear_power",
                "Nuclear Power",
                cost(&[(Titanium, 150.0), (Uranium, 30.0)]),
                60_000,
            )
        },
        ResearchDef {
            description: "Improve ship and planetary shield strength.".into(),
            unlocks: Some("shield_generator".into()),
            requires: vec![research("laser_tech")],
            ..ResearchDef::new(
                "adv_shielding",
                "Advanced Shielding",
                cost(&[(Titanium, 100.0), (Gold, 40.0)]),
                45_000,
            )
        },
    ]
}

// ============================================================================
// SHIPS
// ============================================================================

pub fn ship_types() -> Vec<ShipTypeDef> {
    vec![
        ShipTypeDef {
            id: "scout".into(),
            name: "Scout".into(),
            description: "Fast exploration vessel, reveals nearby sectors.".into(),
            cost: cost(&[(Iron, 30.0), (Copper, 10.0)]),
            base_build_ms: 20_000,
            cargo_capacity: 10.0,
            speed: 3.0,
            requires: vec![],
        },
        ShipTypeDef {
            id: "cargo".into(),
            name: "Cargo Ship".into(),
            description: "Transports resources between colonies or stations.".into(),
            cost: cost(&[(Iron, 80.0), (Titanium, 15.0)]),
            base_build_ms: 45_000,
            cargo_capacity: 200.0,
            speed: 1.0,
            requires: vec![building("trade_port")],
        },
        ShipTypeDef {
            id: "fighter".into(),
            name: "Fighter".into(),
            description: "Basic combat ship for defense and offense.".into(),
            cost: cost(&[(Iron, 100.0), (Copper, 25.0), (Titanium, 10.0)]),
            base_build_ms: 60_000,
            cargo_capacity: 0.0,
            speed: 2.0,
            requires: vec![research("laser_tech")],
        },
    ]
}

/// All standard tables.
pub fn standard_data() -> CatalogData {
    CatalogData {
        buildings: buildings(),
        research: research_items(),
        ships: ship_types(),
    }
}
