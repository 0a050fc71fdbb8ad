//! Colony engine - main entry point for running one colony

use std::collections::BTreeMap;
use std::sync::Arc;

use colony_logic::catalog::{Catalog, CatalogError};
use colony_logic::constants::time::MS_PER_SECOND;
use colony_logic::economy::{accumulate_clamped, fill_ratio, EnergyState};
use colony_logic::ore::{OreAmounts, OreType};

use crate::components::*;
use crate::config::ColonyConfig;
use crate::fleet::Fleet;
use crate::sector::{OreRichnessSource, SectorCoord};
use crate::snapshot::{ColonySnapshot, JobProgress, LevelView, ShipView};
use crate::systems::*;

/// One colony's mutable economy state plus a shared catalog.
pub struct ColonyEngine {
    pub(crate) catalog: Arc<Catalog>,
    pub(crate) name: String,
    pub(crate) location: SectorCoord,
    pub(crate) ledger: ResourceLedger,
    pub(crate) buildings: BuildingLevels,
    pub(crate) research: ResearchLevels,
    pub(crate) jobs: JobQueue,
    pub(crate) fleet: Fleet,
    /// Simulation time in milliseconds since the colony was founded
    pub(crate) sim_time_ms: f64,
    time_scale: f64,
}

impl ColonyEngine {
    /// Found a colony. Starting ids must exist in the catalog; starting
    /// levels above a definition's max are clamped to it.
    pub fn new(catalog: Arc<Catalog>, config: ColonyConfig) -> Result<Self, CatalogError> {
        let mut buildings = BuildingLevels::new();
        for (id, &level) in &config.starting_buildings {
            let def = catalog.building(id).ok_or_else(|| CatalogError::UnknownId {
                kind: "building",
                id: id.clone(),
            })?;
            if level > def.max_level {
                log::warn!("starting level {} for {} clamped to {}", level, id, def.max_level);
            }
            buildings.set_level(id, level.min(def.max_level));
        }

        let mut research = ResearchLevels::new();
        for (id, &level) in &config.starting_research {
            let def = catalog.research(id).ok_or_else(|| CatalogError::UnknownId {
                kind: "research",
                id: id.clone(),
            })?;
            research.set_level(id, level.min(def.max_level));
        }

        let mut engine = Self {
            catalog,
            name: config.name,
            location: config.location,
            ledger: ResourceLedger::new(config.starting_resources),
            buildings,
            research,
            jobs: JobQueue::new(),
            fleet: Fleet::new(),
            sim_time_ms: 0.0,
            time_scale: 1.0,
        };
        engine.set_time_scale(config.time_scale);
        engine.refresh_derived();
        log::debug!(
            "colony {} founded at ({}, {}) with {} buildings",
            engine.name,
            engine.location.x,
            engine.location.y,
            engine.buildings.len()
        );
        Ok(engine)
    }

    /// Advance the colony by `delta_seconds` of wall time.
    ///
    /// The span is cut at every job completion instant inside it. Each slice
    /// runs production against the levels in force during that slice, then
    /// completes the jobs due at its end, so the outcome does not depend on
    /// how the host chunks time. Non-finite and non-positive deltas are
    /// ignored.
    pub fn tick(&mut self, delta_seconds: f64, sectors: &dyn OreRichnessSource) {
        if !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            return;
        }
        let scaled = delta_seconds * self.time_scale;
        if scaled <= 0.0 {
            return;
        }
        let end_ms = self.sim_time_ms + scaled * MS_PER_SECOND;

        let mut generated = 0.0;
        let mut completed = 0;
        let mut slices = 0;
        loop {
            let slice_end = match self.jobs.next_completion_ms() {
                Some(at) if at < end_ms => at.max(self.sim_time_ms),
                _ => end_ms,
            };
            let slice_seconds = (slice_end - self.sim_time_ms) / MS_PER_SECOND;
            if slice_seconds > 0.0 {
                let report = production_system(
                    &self.catalog,
                    &mut self.ledger,
                    &self.buildings,
                    &self.jobs,
                    self.location,
                    sectors,
                    slice_seconds,
                );
                generated += report.generated.total();
            }
            self.sim_time_ms = slice_end;
            slices += 1;

            let done = scheduler_system(
                &mut self.jobs,
                self.sim_time_ms,
                &mut self.buildings,
                &mut self.research,
                &mut self.fleet,
            );
            if !done.is_empty() {
                completed += done.len();
                self.refresh_derived();
            }
            if slice_end >= end_ms {
                break;
            }
        }

        log::trace!(
            "tick {:.3}s in {} slices: efficiency {:.2}, generated {:.3}, {} jobs done, {} pending",
            scaled,
            slices,
            self.ledger.energy.efficiency(),
            generated,
            completed,
            self.jobs.len()
        );
    }

    /// Recompute energy totals and re-clamp the ledger after levels or jobs
    /// change.
    pub(crate) fn refresh_derived(&mut self) {
        self.ledger.energy = energy_totals(&self.catalog, &self.buildings, &self.jobs);
        let capacity = self.storage_capacity();
        self.ledger.stored.clamp_to(&capacity);
    }

    /// Add ore from outside the economy, clamped to capacity. Returns the
    /// amount actually stored.
    pub fn grant(&mut self, ore: OreType, amount: f64) -> f64 {
        if !amount.is_finite() || amount <= 0.0 {
            return 0.0;
        }
        let capacity = self.storage_capacity();
        let before = self.ledger.stored[ore];
        let after = accumulate_clamped(before, amount, capacity[ore]);
        self.ledger.stored[ore] = after;
        after - before
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> SectorCoord {
        self.location
    }

    pub fn sim_time_ms(&self) -> f64 {
        self.sim_time_ms
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn resources(&self) -> &OreAmounts {
        &self.ledger.stored
    }

    pub fn buildings(&self) -> &BuildingLevels {
        &self.buildings
    }

    pub fn research(&self) -> &ResearchLevels {
        &self.research
    }

    pub fn jobs(&self) -> &JobQueue {
        &self.jobs
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn building_level(&self, id: &str) -> u32 {
        self.buildings.level(id)
    }

    pub fn research_level(&self, id: &str) -> u32 {
        self.research.level(id)
    }

    pub fn ship(&self, id: ShipId) -> Option<ShipInstance> {
        self.fleet.get(id)
    }

    pub fn storage_capacity(&self) -> OreAmounts {
        storage_capacity(&self.catalog, &self.buildings, &self.jobs)
    }

    pub fn energy(&self) -> EnergyState {
        energy_totals(&self.catalog, &self.buildings, &self.jobs)
    }

    pub fn efficiency(&self) -> f64 {
        self.energy().efficiency()
    }

    /// Percent complete of the job on `target`, if one is in flight.
    pub fn job_progress(&self, target: &JobTarget) -> Option<f64> {
        self.jobs.get(target).map(|job| job.progress(self.sim_time_ms))
    }

    /// Owned copy of everything observable.
    pub fn snapshot(&self) -> ColonySnapshot {
        let now = self.sim_time_ms;
        let progress_of =
            |target: JobTarget| self.jobs.get(&target).map(|job| JobProgress::of(job, now));

        let mut buildings: BTreeMap<String, LevelView> = self
            .buildings
            .iter()
            .map(|(id, level)| {
                let view = LevelView {
                    level,
                    in_progress: progress_of(JobTarget::Building(id.to_string())),
                };
                (id.to_string(), view)
            })
            .collect();
        let mut research: BTreeMap<String, LevelView> = self
            .research
            .iter()
            .map(|(id, level)| {
                let view = LevelView {
                    level,
                    in_progress: progress_of(JobTarget::Research(id.to_string())),
                };
                (id.to_string(), view)
            })
            .collect();

        // Level-0 entries with a first job in flight.
        for job in self.jobs.iter() {
            match &job.kind {
                JobKind::Building { id, .. } => {
                    buildings.entry(id.clone()).or_insert_with(|| LevelView {
                        level: 0,
                        in_progress: Some(JobProgress::of(job, now)),
                    });
                }
                JobKind::Research { id, .. } => {
                    research.entry(id.clone()).or_insert_with(|| LevelView {
                        level: 0,
                        in_progress: Some(JobProgress::of(job, now)),
                    });
                }
                JobKind::Ship { .. } => {}
            }
        }

        let ships = self
            .fleet
            .ships()
            .into_iter()
            .map(|ship| {
                let view = ShipView {
                    build_progress: progress_of(JobTarget::Ship(ship.id)),
                    ship,
                };
                (view.ship.id, view)
            })
            .collect();

        let energy = self.energy();
        let storage_capacity = self.storage_capacity();
        let stored = self.ledger.stored;
        ColonySnapshot {
            name: self.name.clone(),
            location: self.location,
            sim_time_ms: now,
            resources: stored,
            storage_capacity,
            storage_fill: storage_capacity.map(|ore, cap| fill_ratio(stored[ore], cap)),
            energy,
            efficiency: energy.efficiency(),
            buildings,
            research,
            ships,
        }
    }
}
