//! Engine tunables shared by the engine and the harness.
//!
//! Plain constants with no engine dependency.

/// Build-time factor applied per shipyard level above 1.
pub const SHIPYARD_SPEEDUP: f64 = 0.85;

/// Floor for any ship build time, in milliseconds.
pub const MIN_SHIP_BUILD_MS: u64 = 1_000;

/// Max level for catalog entries that do not state one.
pub const DEFAULT_MAX_LEVEL: u32 = 1;

/// Decimal places kept for rate-style quantities.
pub const RATE_DECIMALS: i32 = 2;

pub mod time {
    pub const MS_PER_SECOND: f64 = 1_000.0;
}
