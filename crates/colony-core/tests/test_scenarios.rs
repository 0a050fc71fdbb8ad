//! End-to-end economy scenarios.
//!
//! Exercises: ColonyConfig → commands → tick → snapshot, against both the
//! standard catalog and small hand-built catalogs.

use std::sync::Arc;

use colony_core::prelude::*;
use colony_core::systems::JobKind;
use colony_logic::catalog::{BuildingCategory, BuildingDef, CatalogData};

// ── Helpers ────────────────────────────────────────────────────────────

fn standard_engine() -> ColonyEngine {
    ColonyEngine::new(Arc::new(Catalog::standard()), ColonyConfig::default()).unwrap()
}

fn build(id: &str) -> Command {
    Command::BuildOrUpgrade {
        building: id.to_string(),
    }
}

/// Hub holding `iron_capacity` iron, a 1.0/s iron refinery drawing
/// `draw` energy, and a generator producing `supply`.
fn small_catalog(iron_capacity: f64, draw: f64, supply: f64) -> Catalog {
    let mut hub = BuildingDef::new("hub", "Hub", BuildingCategory::Core, OreAmounts::new(), 1_000);
    hub.base_initial_capacity = Some(OreAmounts::from_pairs(&[(OreType::Iron, iron_capacity)]));

    let mut refinery = BuildingDef::new(
        "refinery",
        "Refinery",
        BuildingCategory::Production,
        OreAmounts::new(),
        1_000,
    );
    refinery.target_ore = Some(OreType::Iron);
    refinery.base_production_rate = Some(1.0);
    refinery.base_energy_cost = Some(draw);

    let mut generator =
        BuildingDef::new("generator", "Generator", BuildingCategory::Power, OreAmounts::new(), 1_000);
    generator.base_energy_production = Some(supply);

    Catalog::new(CatalogData {
        buildings: vec![hub, refinery, generator],
        ..Default::default()
    })
    .unwrap()
}

fn small_engine(catalog: Catalog, iron: f64) -> ColonyEngine {
    let config = ColonyConfig {
        starting_resources: OreAmounts::from_pairs(&[(OreType::Iron, iron)]),
        starting_buildings: [("hub", 1), ("refinery", 1), ("generator", 1)]
            .into_iter()
            .map(|(id, level)| (id.to_string(), level))
            .collect(),
        ..Default::default()
    };
    ColonyEngine::new(Arc::new(catalog), config).unwrap()
}

// ── Scenarios ──────────────────────────────────────────────────────────

#[test]
fn scenario_a_refinery_without_copper_is_rejected() {
    let mut engine = standard_engine();
    let before = engine.snapshot();

    let result = engine.issue_command(build("iron_refinery"));

    assert_eq!(result, Err(CommandError::InsufficientResources));
    assert_eq!(engine.snapshot(), before);
    assert!(engine.jobs().is_empty());
}

#[test]
fn scenario_b_refinery_after_grant_is_accepted() {
    let mut engine = standard_engine();
    engine.grant(OreType::Copper, 10.0);

    let applied = engine.issue_command(build("iron_refinery")).unwrap();

    assert_eq!(
        applied,
        Applied::ConstructionStarted {
            building: "iron_refinery".into(),
            target_level: 1,
            duration_ms: 10_000,
        }
    );
    assert_eq!(engine.resources()[OreType::Iron], 950.0);
    assert_eq!(engine.resources()[OreType::Copper], 0.0);
    let job = engine.jobs().iter().next().unwrap();
    assert_eq!(
        job.kind,
        JobKind::Building {
            id: "iron_refinery".into(),
            target_level: 1
        }
    );
}

#[test]
fn scenario_c_refinery_completes_then_produces() {
    let mut engine = standard_engine();
    engine.grant(OreType::Copper, 10.0);
    engine.issue_command(build("iron_refinery")).unwrap();

    engine.tick(10.0, &OreRichness::Rich);
    assert_eq!(engine.building_level("iron_refinery"), 1);
    assert!(engine.jobs().is_empty());
    // Not active during the tick it completed in.
    assert_eq!(engine.resources()[OreType::Iron], 950.0);

    engine.tick(1.0, &OreRichness::Rich);
    assert_eq!(engine.resources()[OreType::Iron], 951.0);
}

#[test]
fn scenario_d_brownout_halves_output() {
    let mut engine = small_engine(small_catalog(1_000.0, 20.0, 10.0), 0.0);
    assert_eq!(engine.energy().balance(), -10.0);
    assert_eq!(engine.efficiency(), 0.5);

    engine.tick(1.0, &OreRichness::Rich);
    assert_eq!(engine.resources()[OreType::Iron], 0.5);

    engine.tick(2.0, &OreRichness::Rich);
    assert_eq!(engine.resources()[OreType::Iron], 1.5);
}

#[test]
fn scenario_e_overflow_is_discarded() {
    let mut engine = small_engine(small_catalog(100.0, 0.0, 0.0), 95.0);
    engine.tick(10.0, &OreRichness::Rich);
    assert_eq!(engine.resources()[OreType::Iron], 100.0);
    assert_eq!(engine.snapshot().storage_capacity[OreType::Iron], 100.0);
}

// ── Other behavior ─────────────────────────────────────────────────────

#[test]
fn chunking_of_time_does_not_change_output() {
    let run = |ticks: &[f64]| {
        let mut engine = standard_engine();
        engine.grant(OreType::Copper, 10.0);
        engine.issue_command(build("iron_refinery")).unwrap();
        for &dt in ticks {
            engine.tick(dt, &OreRichness::Rich);
        }
        engine.resources()[OreType::Iron]
    };

    // completes at 10s, then 10s of output at 1.0/s
    let one = run(&[20.0]);
    let halves = run(&[10.0, 10.0]);
    let seconds = run(&[1.0; 20]);
    assert_eq!(one, 960.0);
    assert_eq!(halves, 960.0);
    assert!((seconds - 960.0).abs() < 1e-9, "{}", seconds);
}

#[test]
fn long_tick_switches_on_power_mid_span() {
    // refinery draws 20 against a generator still being built
    let catalog = small_catalog(1_000.0, 20.0, 20.0);
    let config = ColonyConfig {
        starting_resources: OreAmounts::new(),
        starting_buildings: [("hub".to_string(), 1), ("refinery".to_string(), 1)]
            .into_iter()
            .collect(),
        ..Default::default()
    };
    let mut engine = ColonyEngine::new(Arc::new(catalog), config).unwrap();
    assert_eq!(engine.efficiency(), 0.0);

    // generator costs nothing and takes 1s
    engine.issue_command(build("generator")).unwrap();
    engine.tick(5.0, &OreRichness::Rich);

    assert_eq!(engine.building_level("generator"), 1);
    assert_eq!(engine.efficiency(), 1.0);
    assert_eq!(engine.resources()[OreType::Iron], 4.0);
    assert_eq!(engine.sim_time_ms(), 5_000.0);
}

#[test]
fn richness_comes_from_the_colony_location() {
    let here = SectorCoord::new(2, 3);
    let catalog = small_catalog(1_000.0, 0.0, 0.0);
    let mut engine = ColonyEngine::new(
        Arc::new(catalog),
        ColonyConfig {
            location: here,
            starting_resources: OreAmounts::new(),
            starting_buildings: [("hub".to_string(), 1), ("refinery".to_string(), 1)]
                .into_iter()
                .collect(),
            ..Default::default()
        },
    )
    .unwrap();

    let mut deposits = SectorDeposits::uniform(SectorCoord::new(0, 0), OreRichness::Rich, 1_000.0);
    engine.tick(10.0, &deposits);
    assert_eq!(engine.resources()[OreType::Iron], 0.0);

    deposits = SectorDeposits::uniform(here, OreRichness::Trace, 1_000.0);
    engine.tick(10.0, &deposits);
    assert_eq!(engine.resources()[OreType::Iron], 0.5);
}

#[test]
fn storage_upgrade_shrinks_capacity_until_done() {
    let config = ColonyConfig::default()
        .with_building("iron_storage", 1)
        .with_resources(OreAmounts::from_pairs(&[
            (OreType::Iron, 3_000.0),
            (OreType::Copper, 100.0),
        ]));
    let mut engine = ColonyEngine::new(Arc::new(Catalog::standard()), config).unwrap();
    assert_eq!(engine.storage_capacity()[OreType::Iron], 3_000.0);

    // 100 * 1.6 iron, 20 * 1.6 copper
    engine.issue_command(build("iron_storage")).unwrap();
    assert_eq!(engine.storage_capacity()[OreType::Iron], 2_000.0);
    assert_eq!(engine.resources()[OreType::Iron], 2_000.0);

    // 15000 * 1.3
    engine.tick(19.5, &OreRichness::None);
    assert_eq!(engine.building_level("iron_storage"), 2);
    assert_eq!(engine.storage_capacity()[OreType::Iron], 3_500.0);
}

#[test]
fn jobs_completing_together_apply_in_one_tick() {
    let config = ColonyConfig::default()
        .with_building("research_lab", 1)
        .with_resources(OreAmounts::from_pairs(&[
            (OreType::Iron, 2_000.0),
            (OreType::Copper, 1_000.0),
            (OreType::Gold, 500.0),
        ]));
    let mut engine = ColonyEngine::new(Arc::new(Catalog::standard()), config).unwrap();
    engine.issue_command(build("solar_plant")).unwrap();
    engine.issue_command(build("iron_refinery")).unwrap();
    engine
        .issue_command(Command::Research {
            research: "laser_tech".into(),
        })
        .unwrap();
    assert_eq!(engine.jobs().len(), 3);

    engine.tick(60.0, &OreRichness::Rich);
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.building_level("solar_plant"), 1);
    assert_eq!(snapshot.building_level("iron_refinery"), 1);
    assert_eq!(snapshot.research_level("laser_tech"), 1);
    assert!(engine.jobs().is_empty());
}

#[test]
fn snapshot_reports_ship_build_progress() {
    let config = ColonyConfig::default()
        .with_building("ship_facility", 1)
        .with_resources(OreAmounts::from_pairs(&[
            (OreType::Iron, 100.0),
            (OreType::Copper, 100.0),
        ]));
    let mut engine = ColonyEngine::new(Arc::new(Catalog::standard()), config).unwrap();
    let Ok(Applied::ShipQueued { ship, .. }) = engine.issue_command(Command::BuildShip {
        ship_type: "scout".into(),
    }) else {
        panic!("scout should queue");
    };

    engine.tick(5.0, &OreRichness::None);
    let snapshot = engine.snapshot();
    let view = &snapshot.ships[&ship];
    assert_eq!(view.ship.status, ShipStatus::Constructing);
    assert_eq!(view.build_progress.as_ref().map(|p| p.progress), Some(25.0));

    engine.tick(15.0, &OreRichness::None);
    let view = &engine.snapshot().ships[&ship];
    assert_eq!(view.ship.status, ShipStatus::Idle);
    assert!(view.build_progress.is_none());
}

#[test]
fn colonies_share_a_catalog_independently() {
    let catalog = Arc::new(Catalog::standard());
    let mut a = ColonyEngine::new(Arc::clone(&catalog), ColonyConfig::default()).unwrap();
    let b = ColonyEngine::new(Arc::clone(&catalog), ColonyConfig::default()).unwrap();

    a.grant(OreType::Copper, 10.0);
    a.issue_command(build("iron_refinery")).unwrap();

    assert_eq!(a.resources()[OreType::Iron], 950.0);
    assert_eq!(b.resources()[OreType::Iron], 1_000.0);
    assert!(b.jobs().is_empty());
}
