//! Pure economy math - energy balance, brownout efficiency, clamped storage.

use serde::{Deserialize, Serialize};

/// Colony-wide energy totals for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyState {
    pub production: f64,
    pub consumption: f64,
}

impl EnergyState {
    pub fn new(production: f64, consumption: f64) -> Self {
        Self {
            production,
            consumption,
        }
    }

    /// Production minus consumption.
    pub fn balance(&self) -> f64 {
        power_balance(self.production, self.consumption)
    }

    /// Production scalar implied by this balance. See [`efficiency`].
    pub fn efficiency(&self) -> f64 {
        efficiency(self.production, self.consumption)
    }
}

/// Power balance: total generation minus total draw.
pub fn power_balance(total_generation: f64, total_draw: f64) -> f64 {
    total_generation - total_draw
}

/// Linear brownout model.
///
/// 1.0 when the balance is non-negative or nothing draws power, otherwise
/// `1 + balance / consumption`, floored at 0. Always in `[0, 1]`.
pub fn efficiency(production: f64, consumption: f64) -> f64 {
    let balance = power_balance(production, consumption);
    if balance >= 0.0 || consumption <= 0.0 {
        return 1.0;
    }
    let value = 1.0 + balance / consumption;
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Add `amount` to `current` without exceeding `capacity`.
///
/// Returns the new stored value. The overflow is discarded, and the result
/// never drops below zero.
pub fn accumulate_clamped(current: f64, amount: f64, capacity: f64) -> f64 {
    let cap = capacity.max(0.0);
    let next = current + amount.max(0.0);
    if next.is_nan() {
        return current.clamp(0.0, cap);
    }
    next.clamp(0.0, cap)
}

/// Fill fraction of a store (0.0 = empty, 1.0 = full).
pub fn fill_ratio(current: f64, cap: f64) -> f64 {
    if cap <= 0.0 {
        0.0
    } else {
        (current / cap).clamp(0.0, 1.0)
    }
}
