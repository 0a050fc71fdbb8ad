//! Pure colony economy logic.
//!
//! Everything here is independent of the engine: catalog definitions,
//! leveled value curves and energy math. Functions take plain data and
//! return results, so they are unit-testable on their own and shared by the
//! engine and the headless harness.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Building/research/ship definitions, lookup, validation |
//! | [`constants`] | Shipyard speed curve, default max level, rounding |
//! | [`content`] | The built-in standard catalog tables |
//! | [`economy`] | Energy balance, brownout efficiency, clamped storage |
//! | [`leveling`] | Cost/time/energy/capacity/rate per level, multiplier fallback |
//! | [`ore`] | Ore types, deposit richness, per-ore amount tables |

pub mod catalog;
pub mod constants;
pub mod content;
pub mod economy;
pub mod leveling;
pub mod ore;
