//! Fixed design parameters of the mass economy.
//!
//! Every formula in `game::economy` reads its numbers from here. These are
//! balance constants, not settings: nothing in the crate changes them at runtime.

// ── Mass ────────────────────────────────────────────────────────
/// Mass a fresh run starts with (1 ag).
pub const STARTING_MASS: f64 = 1e-18;
/// Mass gained by one click with no upgrades and no echoes.
pub const BASE_CLICK_MASS: f64 = 1e-18;

// ── Upgrade effects ─────────────────────────────────────────────
/// Impact Force: +15% click mass per level.
pub const IMPACT_FORCE_BONUS: f64 = 0.15;
/// Emitter Speed: automatic clicks per second per level.
pub const EMITTER_CLICKS_PER_SEC: f64 = 0.5;
/// Core Stability: +8% to all generated mass per level.
pub const CORE_STABILITY_BONUS: f64 = 0.08;
/// Radiation Leak: flat mass per second per level.
pub const RADIATION_LEAK_PER_SEC: f64 = 1e-17;

// ── Upgrade costs ───────────────────────────────────────────────
/// Each level of an upgrade costs this much more than the previous one.
pub const UPGRADE_COST_GROWTH: f64 = 1.15;
/// Upper bound on levels resolved by a single max-buy.
pub const MAX_LEVELS_PER_PURCHASE: u32 = 10_000;

// ── Quantum Echo ────────────────────────────────────────────────
/// Mass required for the first echo; also the unlock threshold.
pub const ECHO_BASE_THRESHOLD: f64 = 1e-6;
/// Each echo point multiplies the next threshold by this.
pub const ECHO_THRESHOLD_GROWTH: f64 = 10.0;
/// Generation multiplier per echo point.
pub const ECHO_POWER_BASE: f64 = 2.0;
/// Generation multiplier per echo multiplier level.
pub const ECHO_UPGRADE_BASE: f64 = 1.1;

// ── Save bounds ─────────────────────────────────────────────────
// Loaded counters are clamped to these. Each sits past the point where play
// can still reach: an upgrade level near 5400 already costs more than an f64
// holds, and so does the echo threshold beyond about 314 points.
/// Largest upgrade level accepted from a save.
pub const MAX_SAVED_UPGRADE_LEVEL: u32 = 10_000;
/// Largest echo point count accepted from a save.
pub const MAX_SAVED_ECHO_POINTS: u32 = 320;
/// Largest echo multiplier level accepted from a save.
pub const MAX_SAVED_ECHO_MULTIPLIER_LEVEL: u32 = 320;

// ── Offline progress ────────────────────────────────────────────
/// Share of mass-per-second granted while the game was closed.
pub const OFFLINE_EFFICIENCY: f64 = 0.5;

// ── Meteor ──────────────────────────────────────────────────────
/// A meteor is worth this many clicks.
pub const METEOR_CLICK_MULTIPLIER: f64 = 1000.0;

// ── Timing (10 ticks/sec) ───────────────────────────────────────
pub const TICKS_PER_SEC: u32 = 10;
pub const SECONDS_PER_TICK: f64 = 1.0 / TICKS_PER_SEC as f64;
/// Ticks between meteor strikes (3 minutes).
pub const METEOR_PERIOD_TICKS: u32 = 180 * TICKS_PER_SEC;
/// Ticks between the meteor announcement and its impact (2 seconds).
pub const METEOR_IMPACT_DELAY_TICKS: u32 = 2 * TICKS_PER_SEC;
/// Periodic autosave interval (30 seconds).
pub const AUTOSAVE_INTERVAL_TICKS: u32 = 30 * TICKS_PER_SEC;
/// Minimum gap between saves triggered by passive mass changes (1 second).
pub const MUTATION_SAVE_DEBOUNCE_TICKS: u32 = TICKS_PER_SEC;
