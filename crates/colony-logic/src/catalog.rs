//! Catalog - immutable definitions of buildings, research and ship types.
//!
//! A catalog is loaded once (from the built-in tables in [`crate::content`]
//! or from JSON), validated, and then shared read-only by every colony.
//! Nothing in here is per-colony state.
//!
//! ```
//! use colony_logic::catalog::Catalog;
//!
//! let catalog = Catalog::standard();
//! let refinery = catalog.building("iron_refinery").unwrap();
//! assert_eq!(refinery.construction_time(1), refinery.base_construction_ms);
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::DEFAULT_MAX_LEVEL;
use crate::leveling::{
    cost_at_level, duration_at_level, rate_at_level, resolve_multiplier, value_at_level,
};
use crate::ore::{OreAmounts, OreType};

/// What a building is for. Drives which solver pass looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingCategory {
    Core,
    Production,
    Storage,
    Power,
    Defense,
    Utility,
    Shipyard,
}

/// One entry of a conjunctive requirement list. References catalog ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Research completed to level 1 or more.
    Research(String),
    /// Building built (level 1 or more).
    Building(String),
    /// Building at `level` or more.
    BuildingLevel { id: String, level: u32 },
}

impl Requirement {
    /// The catalog id this requirement points at.
    pub fn target_id(&self) -> &str {
        match self {
            Self::Research(id) | Self::Building(id) => id,
            Self::BuildingLevel { id, .. } => id,
        }
    }
}

fn default_max_level() -> u32 {
    DEFAULT_MAX_LEVEL
}

/// Building definition. All per-level values are derived from level-1 bases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingDef {
    pub id: String,
    pub name: String,
    pub category: BuildingCategory,
    #[serde(default)]
    pub description: String,
    pub base_cost: OreAmounts,
    #[serde(default)]
    pub cost_multiplier: Option<f64>,
    /// Level-1 construction time in milliseconds.
    pub base_construction_ms: u64,
    #[serde(default)]
    pub time_multiplier: Option<f64>,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    #[serde(default)]
    pub base_energy_cost: Option<f64>,
    #[serde(default)]
    pub base_energy_production: Option<f64>,
    #[serde(default)]
    pub energy_multiplier: Option<f64>,
    /// Ore extracted (Production) or stored (Storage).
    #[serde(default)]
    pub target_ore: Option<OreType>,
    /// Units per second at level 1 on a rich deposit.
    #[serde(default)]
    pub base_production_rate: Option<f64>,
    #[serde(default)]
    pub production_multiplier: Option<f64>,
    /// Extra capacity for `target_ore` at level 1 (Storage).
    #[serde(default)]
    pub base_capacity_increase: Option<f64>,
    /// Capacity for every ore at level 1 (Core hub).
    #[serde(default)]
    pub base_initial_capacity: Option<OreAmounts>,
    #[serde(default)]
    pub capacity_multiplier: Option<f64>,
    #[serde(default)]
    pub requires: Vec<Requirement>,
    /// Research can only start while a building with this flag is built.
    #[serde(default)]
    pub enables_research: bool,
}

impl BuildingDef {
    /// A level-1-only building with no energy, production or storage role.
    pub fn new(
        id: &str,
        name: &str,
        category: BuildingCategory,
        base_cost: OreAmounts,
        base_construction_ms: u64,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
            description: String::new(),
            base_cost,
            cost_multiplier: None,
            base_construction_ms,
            time_multiplier: None,
            max_level: DEFAULT_MAX_LEVEL,
            base_energy_cost: None,
            base_energy_production: None,
            energy_multiplier: None,
            target_ore: None,
            base_production_rate: None,
            production_multiplier: None,
            base_capacity_increase: None,
            base_initial_capacity: None,
            capacity_multiplier: None,
            requires: Vec::new(),
            enables_research: false,
        }
    }

    fn multiplier(&self, dedicated: Option<f64>) -> f64 {
        resolve_multiplier(dedicated, self.cost_multiplier)
    }

    /// Cost to reach `level`.
    pub fn cost_at(&self, level: u32) -> OreAmounts {
        cost_at_level(&self.base_cost, self.multiplier(None), level)
    }

    /// Construction time in ms to reach `level`.
    pub fn construction_time(&self, level: u32) -> u64 {
        duration_at_level(
            self.base_construction_ms,
            self.multiplier(self.time_multiplier),
            level,
        )
    }

    /// Energy drawn at `level`.
    pub fn energy_consumption(&self, level: u32) -> f64 {
        self.base_energy_cost
            .map(|base| value_at_level(base, self.multiplier(self.energy_multiplier), level))
            .unwrap_or(0.0)
    }

    /// Energy generated at `level`.
    pub fn energy_production(&self, level: u32) -> f64 {
        self.base_energy_production
            .map(|base| value_at_level(base, self.multiplier(self.energy_multiplier), level))
            .unwrap_or(0.0)
    }

    /// Extraction rate per second at `level` on a rich deposit.
    pub fn production_rate(&self, level: u32) -> f64 {
        self.base_production_rate
            .map(|base| rate_at_level(base, self.multiplier(self.production_multiplier), level))
            .unwrap_or(0.0)
    }

    /// Storage added for `target_ore` at `level`.
    pub fn capacity_increase(&self, level: u32) -> f64 {
        self.base_capacity_increase
            .map(|base| value_at_level(base, self.multiplier(self.capacity_multiplier), level))
            .unwrap_or(0.0)
    }

    /// Per-ore base capacity provided at `level` (Core hub).
    pub fn initial_capacity(&self, level: u32) -> OreAmounts {
        match &self.base_initial_capacity {
            Some(base) => {
                let multiplier = self.multiplier(self.capacity_multiplier);
                base.map(|_, amount| value_at_level(amount, multiplier, level))
            }
            None => OreAmounts::default(),
        }
    }

    /// True for Production buildings that actually extract something.
    pub fn is_extractor(&self) -> bool {
        self.category == BuildingCategory::Production
            && self.target_ore.is_some()
            && self.base_production_rate.unwrap_or(0.0) > 0.0
    }
}

/// Research definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_cost: OreAmounts,
    #[serde(default)]
    pub cost_multiplier: Option<f64>,
    /// Level-1 research time in milliseconds.
    pub base_research_ms: u64,
    #[serde(default)]
    pub time_multiplier: Option<f64>,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    /// Building or ship id this research opens up. Informational.
    #[serde(default)]
    pub unlocks: Option<String>,
    #[serde(default)]
    pub requires: Vec<Requirement>,
}

impl ResearchDef {
    pub fn new(id: &str, name: &str, base_cost: OreAmounts, base_research_ms: u64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            base_cost,
            cost_multiplier: None,
            base_research_ms,
            time_multiplier: None,
            max_level: DEFAULT_MAX_LEVEL,
            unlocks: None,
            requires: Vec::new(),
        }
    }

    pub fn cost_at(&self, level: u32) -> OreAmounts {
        cost_at_level(
            &self.base_cost,
            resolve_multiplier(None, self.cost_multiplier),
            level,
        )
    }

    /// Research time in ms to reach `level`.
    pub fn research_time(&self, level: u32) -> u64 {
        duration_at_level(
            self.base_research_ms,
            resolve_multiplier(self.time_multiplier, self.cost_multiplier),
            level,
        )
    }
}

/// Ship type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipTypeDef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: OreAmounts,
    /// Build time in ms at shipyard level 1.
    pub base_build_ms: u64,
    #[serde(default)]
    pub cargo_capacity: f64,
    /// Sectors per second.
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub requires: Vec<Requirement>,
}

/// Raw catalog tables as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    #[serde(default)]
    pub buildings: Vec<BuildingDef>,
    #[serde(default)]
    pub research: Vec<ResearchDef>,
    #[serde(default)]
    pub ships: Vec<ShipTypeDef>,
}

/// Catalog loading and validation errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate catalog id `{0}`")]
    DuplicateId(String),
    #[error("`{owner}` requires unknown {kind} `{id}`")]
    UnknownRequirement {
        owner: String,
        kind: &'static str,
        id: String,
    },
    #[error("`{owner}` requires `{id}` at level {level}, above its max level {max_level}")]
    UnreachableRequirement {
        owner: String,
        id: String,
        level: u32,
        max_level: u32,
    },
    #[error("`{owner}` unlocks unknown id `{id}`")]
    UnknownUnlock { owner: String, id: String },
    #[error("`{0}` needs a target ore")]
    MissingTargetOre(String),
    #[error("`{0}` has max level 0")]
    ZeroMaxLevel(String),
    #[error("`{owner}` has invalid multiplier {value}")]
    InvalidMultiplier { owner: String, value: f64 },
    #[error("`{owner}` has invalid {field} {value}")]
    InvalidValue {
        owner: String,
        field: &'static str,
        value: f64,
    },
    #[error("unknown {kind} id `{id}`")]
    UnknownId { kind: &'static str, id: String },
}

/// Validated, indexed, read-only catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    data: CatalogData,
    building_index: HashMap<String, usize>,
    research_index: HashMap<String, usize>,
    ship_index: HashMap<String, usize>,
}

impl Catalog {
    /// Validate and index catalog tables.
    pub fn new(data: CatalogData) -> Result<Self, CatalogError> {
        validate(&data)?;
        Ok(Self::index(data))
    }

    /// Parse and validate a JSON catalog.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;
        Self::new(data)
    }

    /// The built-in catalog.
    pub fn standard() -> Self {
        let data = crate::content::standard_data();
        debug_assert!(validate(&data).is_ok(), "built-in catalog is invalid");
        Self::index(data)
    }

    fn index(data: CatalogData) -> Self {
        let building_index = data
            .buildings
            .iter()
            .enumerate()
            .map(|(i, b)| (b.id.clone(), i))
            .collect();
        let research_index = data
            .research
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        let ship_index = data
            .ships
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        Self {
            data,
            building_index,
            research_index,
            ship_index,
        }
    }

    pub fn data(&self) -> &CatalogData {
        &self.data
    }

    pub fn building(&self, id: &str) -> Option<&BuildingDef> {
        self.building_index.get(id).map(|&i| &self.data.buildings[i])
    }

    pub fn research(&self, id: &str) -> Option<&ResearchDef> {
        self.research_index.get(id).map(|&i| &self.data.research[i])
    }

    pub fn ship_type(&self, id: &str) -> Option<&ShipTypeDef> {
        self.ship_index.get(id).map(|&i| &self.data.ships[i])
    }

    pub fn buildings(&self) -> &[BuildingDef] {
        &self.data.buildings
    }

    pub fn research_items(&self) -> &[ResearchDef] {
        &self.data.research
    }

    pub fn ship_types(&self) -> &[ShipTypeDef] {
        &self.data.ships
    }

    /// The ship construction facility (first Shipyard-category building).
    pub fn shipyard(&self) -> Option<&BuildingDef> {
        self.data
            .buildings
            .iter()
            .find(|b| b.category == BuildingCategory::Shipyard)
    }

    /// Buildings that allow research to start.
    pub fn research_labs(&self) -> impl Iterator<Item = &BuildingDef> {
        self.data.buildings.iter().filter(|b| b.enables_research)
    }

    /// The Core hub providing base storage (first Core building with an
    /// initial capacity table).
    pub fn core_hub(&self) -> Option<&BuildingDef> {
        self.data.buildings.iter().find(|b| {
            b.category == BuildingCategory::Core && b.base_initial_capacity.is_some()
        })
    }

    /// Storage buildings for `ore`.
    pub fn storage_for(&self, ore: OreType) -> impl Iterator<Item = &BuildingDef> {
        self.data.buildings.iter().filter(move |b| {
            b.category == BuildingCategory::Storage && b.target_ore == Some(ore)
        })
    }
}

fn check_multiplier(owner: &str, value: Option<f64>) -> Result<(), CatalogError> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(CatalogError::InvalidMultiplier {
            owner: owner.to_string(),
            value: v,
        }),
        _ => Ok(()),
    }
}

/// Base quantities must be finite and non-negative.
fn check_value(owner: &str, field: &'static str, value: f64) -> Result<(), CatalogError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidValue {
            owner: owner.to_string(),
            field,
            value,
        })
    }
}

fn check_amounts(owner: &str, field: &'static str, amounts: &OreAmounts) -> Result<(), CatalogError> {
    for (_, value) in amounts.iter() {
        check_value(owner, field, value)?;
    }
    Ok(())
}

fn check_requirements(
    data: &CatalogData,
    owner: &str,
    requires: &[Requirement],
) -> Result<(), CatalogError> {
    for req in requires {
        match req {
            Requirement::Research(id) => {
                if !data.research.iter().any(|r| &r.id == id) {
                    return Err(CatalogError::UnknownRequirement {
                        owner: owner.to_string(),
                        kind: "research",
                        id: id.clone(),
                    });
                }
            }
            Requirement::Building(id) | Requirement::BuildingLevel { id, .. } => {
                let Some(building) = data.buildings.iter().find(|b| &b.id == id) else {
                    return Err(CatalogError::UnknownRequirement {
                        owner: owner.to_string(),
                        kind: "building",
                        id: id.clone(),
                    });
                };
                if let Requirement::BuildingLevel { level, .. } = req {
                    if *level > building.max_level {
                        return Err(CatalogError::UnreachableRequirement {
                            owner: owner.to_string(),
                            id: id.clone(),
                            level: *level,
                            max_level: building.max_level,
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

/// Check a catalog for internal consistency.
pub fn validate(data: &CatalogData) -> Result<(), CatalogError> {
    let mut seen = std::collections::HashSet::new();
    let ids = data
        .buildings
        .iter()
        .map(|b| &b.id)
        .chain(data.research.iter().map(|r| &r.id))
        .chain(data.ships.iter().map(|s| &s.id));
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(CatalogError::DuplicateId(id.clone()));
        }
    }

    for b in &data.buildings {
        if b.max_level == 0 {
            return Err(CatalogError::ZeroMaxLevel(b.id.clone()));
        }
        for m in [
            b.cost_multiplier,
            b.time_multiplier,
            b.energy_multiplier,
            b.production_multiplier,
            b.capacity_multiplier,
        ] {
            check_multiplier(&b.id, m)?;
        }
        check_amounts(&b.id, "base_cost", &b.base_cost)?;
        if let Some(initial) = &b.base_initial_capacity {
            check_amounts(&b.id, "base_initial_capacity", initial)?;
        }
        for (field, value) in [
            ("base_energy_cost", b.base_energy_cost),
            ("base_energy_production", b.base_energy_production),
            ("base_production_rate", b.base_production_rate),
            ("base_capacity_increase", b.base_capacity_increase),
        ] {
            if let Some(value) = value {
                check_value(&b.id, field, value)?;
            }
        }
        let needs_ore = matches!(
            b.category,
            BuildingCategory::Production | BuildingCategory::Storage
        );
        if needs_ore && b.target_ore.is_none() {
            return Err(CatalogError::MissingTargetOre(b.id.clone()));
        }
        check_requirements(data, &b.id, &b.requires)?;
    }

    for r in &data.research {
        if r.max_level == 0 {
            return Err(CatalogError::ZeroMaxLevel(r.id.clone()));
        }
        check_multiplier(&r.id, r.cost_multiplier)?;
        check_multiplier(&r.id, r.time_multiplier)?;
        check_amounts(&r.id, "base_cost", &r.base_cost)?;
        check_requirements(data, &r.id, &r.requires)?;
        if let Some(unlock) = &r.unlocks {
            let known = data.buildings.iter().any(|b| &b.id == unlock)
                || data.ships.iter().any(|s| &s.id == unlock);
            if !known {
                return Err(CatalogError::UnknownUnlock {
                    owner: r.id.clone(),
                    id: unlock.clone(),
                });
            }
        }
    }

    for s in &data.ships {
        check_amounts(&s.id, "cost", &s.cost)?;
        check_value(&s.id, "cargo_capacity", s.cargo_capacity)?;
        check_value(&s.id, "speed", s.speed)?;
        check_requirements(data, &s.id, &s.requires)?;
    }

    Ok(())
}
