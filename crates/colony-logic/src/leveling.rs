//! Leveled value curves - cost, time, energy, capacity and rate per level.
//!
//! Every curve compounds from the level-1 base value:
//! `value(level) = base * multiplier^(level - 1)`. Integer quantities are
//! floored, rates keep two decimals. The level passed is always the level
//! being built or reached, never the current level.

use crate::constants::{MIN_SHIP_BUILD_MS, RATE_DECIMALS, SHIPYARD_SPEEDUP};
use crate::ore::OreAmounts;

/// Resolve a multiplier through the fallback chain: dedicated, then the
/// general cost multiplier, then 1.0.
pub fn resolve_multiplier(dedicated: Option<f64>, cost_multiplier: Option<f64>) -> f64 {
    dedicated.or(cost_multiplier).unwrap_or(1.0)
}

/// Raw compounded value before rounding. Level 0 reads as level 1.
pub fn scaled(base: f64, multiplier: f64, level: u32) -> f64 {
    let exponent = level.max(1) - 1;
    base * multiplier.powi(exponent as i32)
}

/// Integer-valued quantity at `level`: `floor(base * multiplier^(level-1))`.
pub fn value_at_level(base: f64, multiplier: f64, level: u32) -> f64 {
    scaled(base, multiplier, level).floor()
}

/// Same as [`value_at_level`] for millisecond durations.
pub fn duration_at_level(base_ms: u64, multiplier: f64, level: u32) -> u64 {
    let value = value_at_level(base_ms as f64, multiplier, level);
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

/// Rate-style quantity at `level`, rounded to two decimal places.
pub fn rate_at_level(base: f64, multiplier: f64, level: u32) -> f64 {
    round_to(scaled(base, multiplier, level), RATE_DECIMALS)
}

/// Per-ore cost at `level`, each entry floored.
pub fn cost_at_level(base: &OreAmounts, multiplier: f64, level: u32) -> OreAmounts {
    base.map(|_, amount| value_at_level(amount, multiplier, level))
}

/// Ship build time given the shipyard's current level.
///
/// `max(MIN_SHIP_BUILD_MS, floor(base * 0.85^(facility_level - 1)))`
pub fn ship_build_time(base_build_ms: u64, facility_level: u32) -> u64 {
    duration_at_level(base_build_ms, SHIPYARD_SPEEDUP, facility_level).max(MIN_SHIP_BUILD_MS)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
