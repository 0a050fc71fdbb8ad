//! Colony Economy Headless Harness
//!
//! Validates the catalog data file and runs economy scenarios and seeded
//! invariant sweeps against the engine. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p colony-simtest
//!   cargo run -p colony-simtest -- --verbose

use std::sync::Arc;

use colony_core::prelude::*;
use colony_logic::catalog::{BuildingCategory, BuildingDef, CatalogData};
use colony_logic::constants::MIN_SHIP_BUILD_MS;
use colony_logic::content::standard_data;
use colony_logic::economy;
use colony_logic::leveling::{resolve_multiplier, ship_build_time};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

// ── Catalog data (same JSON embedders ship) ─────────────────────────────
const CATALOG_JSON: &str = include_str!("../../../data/catalog.json");

/// Loose view of the data file, independent of the typed catalog.
#[derive(Debug, Deserialize)]
struct RawCatalog {
    buildings: Vec<RawEntry>,
    research: Vec<RawEntry>,
    ships: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    id: String,
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Colony Economy Harness ===\n");

    let mut results = Vec::new();

    // 1. Catalog data file
    let catalog = match Catalog::from_json(CATALOG_JSON) {
        Ok(catalog) => Some(Arc::new(catalog)),
        Err(e) => {
            results.push(TestResult {
                name: "catalog_load".into(),
                passed: false,
                detail: format!("catalog.json rejected: {}", e),
            });
            None
        }
    };
    results.extend(validate_catalog_data(verbose));

    if let Some(catalog) = catalog {
        // 2. Leveling curves
        results.extend(validate_curves(&catalog, verbose));

        // 3. Scenarios
        results.extend(validate_scenarios(&catalog, verbose));

        // 4. Command validation
        results.extend(validate_commands(&catalog, verbose));

        // 5. Seeded invariant sweeps
        results.extend(validate_invariants(&catalog, verbose));
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn engine_with(catalog: &Arc<Catalog>, config: ColonyConfig) -> Option<ColonyEngine> {
    ColonyEngine::new(Arc::clone(catalog), config).ok()
}

// ── 1. Catalog Data ─────────────────────────────────────────────────────

fn validate_catalog_data(verbose: bool) -> Vec<TestResult> {
    println!("--- Catalog Data ---");
    let mut results = Vec::new();

    let raw: RawCatalog = match serde_json::from_str(CATALOG_JSON) {
        Ok(raw) => raw,
        Err(e) => {
            results.push(TestResult {
                name: "catalog_parse".into(),
                passed: false,
                detail: format!("JSON parse error: {}", e),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "catalog_not_empty".into(),
        passed: raw.buildings.len() >= 15 && !raw.research.is_empty() && !raw.ships.is_empty(),
        detail: format!(
            "{} buildings, {} research, {} ships",
            raw.buildings.len(),
            raw.research.len(),
            raw.ships.len()
        ),
    });

    let mut ids: Vec<&str> = raw
        .buildings
        .iter()
        .chain(&raw.research)
        .chain(&raw.ships)
        .map(|e| e.id.as_str())
        .collect();
    let count = ids.len();
    ids.sort_unstable();
    ids.dedup();
    results.push(TestResult {
        name: "catalog_unique_ids".into(),
        passed: ids.len() == count,
        detail: format!("{} ids, {} unique", count, ids.len()),
    });

    let typed: Result<CatalogData, _> = serde_json::from_str(CATALOG_JSON);
    let matches_builtin = typed.as_ref().map(|d| *d == standard_data()).unwrap_or(false);
    results.push(TestResult {
        name: "catalog_matches_builtin".into(),
        passed: matches_builtin,
        detail: "data/catalog.json equals the built-in tables".into(),
    });

    if verbose {
        for e in &raw.buildings {
            println!("    building {}", e.id);
        }
    }

    results
}

// ── 2. Leveling Curves ──────────────────────────────────────────────────

fn validate_curves(catalog: &Catalog, verbose: bool) -> Vec<TestResult> {
    println!("--- Leveling Curves ---");
    let mut results = Vec::new();

    let mut checked = 0;
    let mut mismatches = Vec::new();
    for b in catalog.buildings() {
        let multiplier = resolve_multiplier(None, b.cost_multiplier);
        for level in 1..=b.max_level {
            let cost = b.cost_at(level);
            for &ore in OreType::all() {
                let expected = (b.base_cost[ore] * multiplier.powi(level as i32 - 1)).floor();
                checked += 1;
                if cost[ore] != expected {
                    mismatches.push(format!("{}@{} {}", b.id, level, ore));
                }
            }
        }
    }
    results.push(TestResult {
        name: "cost_law_all_levels".into(),
        passed: mismatches.is_empty(),
        detail: format!("{} entries checked, mismatches: {:?}", checked, mismatches),
    });

    let monotonic = catalog.buildings().iter().all(|b| {
        (1..b.max_level).all(|l| {
            b.construction_time(l + 1) >= b.construction_time(l)
                && b.production_rate(l + 1) >= b.production_rate(l)
                && b.capacity_increase(l + 1) >= b.capacity_increase(l)
        })
    });
    results.push(TestResult {
        name: "curves_monotonic".into(),
        passed: monotonic,
        detail: "time, rate and capacity never drop with level".into(),
    });

    let curve: Vec<u64> = (1..=6).map(|l| ship_build_time(20_000, l)).collect();
    results.push(TestResult {
        name: "shipyard_speedup".into(),
        passed: curve[0] == 20_000 && curve[1] == 17_000 && curve.windows(2).all(|w| w[1] <= w[0]),
        detail: format!("scout build ms by facility level: {:?}", curve),
    });

    results.push(TestResult {
        name: "ship_build_floor".into(),
        passed: ship_build_time(1_500, 10) == MIN_SHIP_BUILD_MS,
        detail: format!("1500ms base at level 10 → {}ms", ship_build_time(1_500, 10)),
    });

    if verbose {
        if let Some(hub) = catalog.core_hub() {
            for level in 1..=hub.max_level {
                println!(
                    "    {} L{}: iron cap {}",
                    hub.id,
                    level,
                    hub.initial_capacity(level)[OreType::Iron]
                );
            }
        }
    }

    results
}

// ── 3. Scenarios ────────────────────────────────────────────────────────

fn small_catalog(iron_capacity: f64, draw: f64, supply: f64) -> Option<Arc<Catalog>> {
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
    .ok()
    .map(Arc::new)
}

fn small_config(iron: f64) -> ColonyConfig {
    let mut config = ColonyConfig::default();
    config.starting_buildings.clear();
    config
        .with_resources(OreAmounts::from_pairs(&[(OreType::Iron, iron)]))
        .with_building("refinery", 1)
        .with_building("generator", 1)
        .with_building("hub", 1)
}

fn validate_scenarios(catalog: &Arc<Catalog>, _verbose: bool) -> Vec<TestResult> {
    println!("--- Scenarios ---");
    let mut results = Vec::new();
    let refinery = || Command::BuildOrUpgrade {
        building: "iron_refinery".into(),
    };

    let Some(mut engine) = engine_with(catalog, ColonyConfig::default()) else {
        results.push(TestResult {
            name: "scenario_setup".into(),
            passed: false,
            detail: "default colony rejected".into(),
        });
        return results;
    };

    // A: no copper
    let before = engine.snapshot();
    let a = engine.issue_command(refinery());
    results.push(TestResult {
        name: "scenario_a_insufficient".into(),
        passed: a == Err(CommandError::InsufficientResources) && engine.snapshot() == before,
        detail: format!("{:?}", a),
    });

    // B: grant copper and retry
    engine.grant(OreType::Copper, 10.0);
    let b = engine.issue_command(refinery());
    let ledger = *engine.resources();
    results.push(TestResult {
        name: "scenario_b_accepted".into(),
        passed: matches!(b, Ok(Applied::ConstructionStarted { duration_ms: 10_000, .. }))
            && ledger[OreType::Iron] == 950.0
            && ledger[OreType::Copper] == 0.0,
        detail: format!("iron {}, copper {}", ledger[OreType::Iron], ledger[OreType::Copper]),
    });

    // C: completes, then produces
    engine.tick(10.0, &OreRichness::Rich);
    let built = engine.building_level("iron_refinery");
    let iron_at_completion = engine.resources()[OreType::Iron];
    engine.tick(1.0, &OreRichness::Rich);
    let iron_after = engine.resources()[OreType::Iron];
    results.push(TestResult {
        name: "scenario_c_complete_then_produce".into(),
        passed: built == 1 && iron_at_completion == 950.0 && iron_after == 951.0,
        detail: format!("level {}, iron {} → {}", built, iron_at_completion, iron_after),
    });

    // D: brownout
    let d = small_catalog(1_000.0, 20.0, 10.0).and_then(|c| engine_with(&c, small_config(0.0)));
    match d {
        Some(mut engine) => {
            let efficiency = engine.efficiency();
            engine.tick(1.0, &OreRichness::Rich);
            let iron = engine.resources()[OreType::Iron];
            results.push(TestResult {
                name: "scenario_d_brownout".into(),
                passed: efficiency == 0.5 && iron == 0.5,
                detail: format!("efficiency {}, 1s output {}", efficiency, iron),
            });
        }
        None => results.push(TestResult {
            name: "scenario_d_brownout".into(),
            passed: false,
            detail: "setup failed".into(),
        }),
    }

    // E: overflow discarded
    let e = small_catalog(100.0, 0.0, 0.0).and_then(|c| engine_with(&c, small_config(95.0)));
    match e {
        Some(mut engine) => {
            engine.tick(10.0, &OreRichness::Rich);
            let iron = engine.resources()[OreType::Iron];
            results.push(TestResult {
                name: "scenario_e_capacity_clamp".into(),
                passed: iron == 100.0,
                detail: format!("95 + 10 into 100 → {}", iron),
            });
        }
        None => results.push(TestResult {
            name: "scenario_e_capacity_clamp".into(),
            passed: false,
            detail: "setup failed".into(),
        }),
    }

    // Same 20s of sim time in different tick sizes
    let chunked = |ticks: &[f64]| -> Option<f64> {
        let mut engine = engine_with(catalog, ColonyConfig::default())?;
        engine.grant(OreType::Copper, 10.0);
        engine.issue_command(refinery()).ok()?;
        for &dt in ticks {
            engine.tick(dt, &OreRichness::Rich);
        }
        Some(engine.resources()[OreType::Iron])
    };
    let outcomes = [chunked(&[20.0]), chunked(&[10.0, 10.0]), chunked(&[1.0; 20])];
    let agree = outcomes
        .iter()
        .all(|iron| iron.is_some_and(|iron| (iron - 960.0).abs() < 1e-9));
    results.push(TestResult {
        name: "tick_granularity_independent".into(),
        passed: agree,
        detail: format!("1x20s / 2x10s / 20x1s → {:?}", outcomes),
    });

    results
}

// ── 4. Command Validation ───────────────────────────────────────────────

fn validate_commands(catalog: &Arc<Catalog>, _verbose: bool) -> Vec<TestResult> {
    println!("--- Commands ---");
    let mut results = Vec::new();

    let config = ColonyConfig::default()
        .with_building("ship_facility", 1)
        .with_resources(OreAmounts::from_pairs(&[
            (OreType::Iron, 2_000.0),
            (OreType::Copper, 1_000.0),
            (OreType::Titanium, 500.0),
        ]));
    let Some(mut engine) = engine_with(catalog, config) else {
        results.push(TestResult {
            name: "commands_setup".into(),
            passed: false,
            detail: "colony rejected".into(),
        });
        return results;
    };

    let cases = [
        (
            "reject_unknown_building",
            Command::BuildOrUpgrade {
                building: "moon_base".into(),
            },
            CommandError::UnknownId("moon_base".into()),
        ),
        (
            "reject_locked_building",
            Command::BuildOrUpgrade {
                building: "shield_generator".into(),
            },
            CommandError::RequirementsNotMet("shield_generator".into()),
        ),
        (
            "reject_research_without_lab",
            Command::Research {
                research: "adv_engines".into(),
            },
            CommandError::MissingLab,
        ),
        (
            "reject_locked_ship",
            Command::BuildShip {
                ship_type: "fighter".into(),
            },
            CommandError::RequirementsNotMet("fighter".into()),
        ),
    ];
    for (name, command, expected) in cases {
        let before = engine.snapshot();
        let result = engine.issue_command(command);
        results.push(TestResult {
            name: name.into(),
            passed: result.as_ref().err() == Some(&expected) && engine.snapshot() == before,
            detail: format!("{:?}", result),
        });
    }

    let first = engine.issue_command(Command::BuildOrUpgrade {
        building: "solar_plant".into(),
    });
    let second = engine.issue_command(Command::BuildOrUpgrade {
        building: "solar_plant".into(),
    });
    results.push(TestResult {
        name: "one_job_per_building".into(),
        passed: first.is_ok()
            && second == Err(CommandError::AlreadyInProgress("solar_plant".into())),
        detail: format!("second order → {:?}", second),
    });

    let ship = engine.issue_command(Command::BuildShip {
        ship_type: "scout".into(),
    });
    let cancelled = match &ship {
        Ok(Applied::ShipQueued { ship, .. }) => {
            let id = *ship;
            engine
                .issue_command(Command::Cancel {
                    target: JobTarget::Ship(id),
                })
                .is_ok()
                && engine.ship(id).is_none()
        }
        _ => false,
    };
    results.push(TestResult {
        name: "cancel_ship_despawns".into(),
        passed: cancelled,
        detail: format!("{:?}", ship),
    });

    results
}

// ── 5. Invariant Sweeps ─────────────────────────────────────────────────

fn random_command(engine: &ColonyEngine, rng: &mut StdRng) -> Command {
    let catalog = Arc::clone(engine.catalog());
    let pick = |ids: Vec<&str>, rng: &mut StdRng| {
        ids.choose(rng).map(|s| s.to_string()).unwrap_or_default()
    };
    match rng.gen_range(0..8) {
        0..=4 => Command::BuildOrUpgrade {
            building: pick(catalog.buildings().iter().map(|b| b.id.as_str()).collect(), rng),
        },
        5 | 6 => Command::Research {
            research: pick(catalog.research_items().iter().map(|r| r.id.as_str()).collect(), rng),
        },
        _ => Command::BuildShip {
            ship_type: pick(catalog.ship_types().iter().map(|s| s.id.as_str()).collect(), rng),
        },
    }
}

fn validate_invariants(catalog: &Arc<Catalog>, verbose: bool) -> Vec<TestResult> {
    println!("--- Invariant Sweeps ---");
    let mut results = Vec::new();

    let mut violations = Vec::new();
    let mut accepted = 0;
    let mut steps = 0;
    for seed in 0..16u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let config = ColonyConfig::default()
            .with_building("research_lab", 1)
            .with_resources(OreAmounts::from_pairs(&[
                (OreType::Iron, 2_000.0),
                (OreType::Copper, 1_000.0),
                (OreType::Gold, 500.0),
                (OreType::Titanium, 500.0),
                (OreType::Uranium, 200.0),
            ]));
        let Some(mut engine) = engine_with(catalog, config) else {
            violations.push(format!("seed {}: setup failed", seed));
            continue;
        };

        for step in 0..250 {
            steps += 1;
            let before = engine.snapshot();
            match engine.issue_command(random_command(&engine, &mut rng)) {
                Ok(_) => accepted += 1,
                Err(_) if engine.snapshot() != before => {
                    violations.push(format!("seed {} step {}: rejected command mutated state", seed, step));
                }
                Err(_) => {}
            }

            engine.tick(rng.gen_range(0.0..20.0), &OreRichness::Rich);

            let capacity = engine.storage_capacity();
            for &ore in OreType::all() {
                let stored = engine.resources()[ore];
                if !(0.0..=capacity[ore]).contains(&stored) {
                    violations.push(format!(
                        "seed {} step {}: {} {} > cap {}",
                        seed, step, ore, stored, capacity[ore]
                    ));
                }
            }
            let efficiency = engine.efficiency();
            if !(0.0..=1.0).contains(&efficiency) {
                violations.push(format!("seed {} step {}: efficiency {}", seed, step, efficiency));
            }
        }

        if verbose {
            let snapshot = engine.snapshot();
            println!(
                "    seed {:2}: t={:.0}s, {} buildings, {} ships, efficiency {:.2}",
                seed,
                snapshot.sim_time_ms / 1000.0,
                snapshot.buildings.len(),
                snapshot.ships.len(),
                snapshot.efficiency
            );
        }
    }

    results.push(TestResult {
        name: "sweep_ledger_within_capacity".into(),
        passed: violations.is_empty(),
        detail: format!(
            "{} steps, {} commands accepted, {} violations {:?}",
            steps,
            accepted,
            violations.len(),
            violations.iter().take(3).collect::<Vec<_>>()
        ),
    });

    let mut rng = StdRng::seed_from_u64(42);
    let bounded = (0..10_000).all(|_| {
        let e = economy::efficiency(rng.gen_range(0.0..500.0), rng.gen_range(0.0..500.0));
        (0.0..=1.0).contains(&e)
    });
    results.push(TestResult {
        name: "efficiency_bounds".into(),
        passed: bounded,
        detail: "10000 random production/consumption pairs".into(),
    });

    results
}
