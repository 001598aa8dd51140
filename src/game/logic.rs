//! Collidle game logic. Pure functions over `GameState`, fully testable.
//!
//! Every operation either applies its whole effect or leaves the state
//! untouched. Failed preconditions are reported through the return value,
//! never as errors.

use crate::constants::{
    ECHO_BASE_THRESHOLD, MAX_LEVELS_PER_PURCHASE, METEOR_CLICK_MULTIPLIER, STARTING_MASS,
};
use crate::input::PurchaseAmount;

use super::economy;
use super::state::{GameState, UpgradeKind};

/// Add mass, saturating at `f64::MAX` so the total stays finite.
pub fn add_mass(state: &mut GameState, gain: f64) {
    state.mass = (state.mass + gain).min(f64::MAX);
}

/// Manual click: add mass-per-click. Returns the mass gained.
pub fn click(state: &mut GameState) -> f64 {
    let gain = economy::mass_per_click(state);
    add_mass(state, gain);
    state.total_clicks = state.total_clicks.saturating_add(1);
    gain
}

/// Passive generation over `delta_seconds`. Linear in the delta so any
/// calling cadence yields the same income.
pub fn tick(state: &mut GameState, delta_seconds: f64) -> f64 {
    if !(delta_seconds > 0.0) || !delta_seconds.is_finite() {
        return 0.0;
    }
    let gain = economy::mass_per_second(state) * delta_seconds;
    add_mass(state, gain);
    gain
}

/// Largest number of levels of `kind` the current mass pays for, capped at
/// `MAX_LEVELS_PER_PURCHASE`.
pub fn max_affordable(state: &GameState, kind: UpgradeKind) -> u32 {
    if !state.mass.is_finite() {
        return 0;
    }
    let level = state.level(kind);
    let estimate = economy::affordable_levels_estimate(kind, level, state.mass);
    // The closed form can be off by one level in either direction.
    let limit = (estimate + 2.0).clamp(0.0, MAX_LEVELS_PER_PURCHASE as f64) as u32;

    // Settle against the exact per-level sum, in the same order `bulk_cost`
    // adds it up.
    let mut total = 0.0;
    let mut amount = 0;
    while amount < limit {
        let next = total + economy::upgrade_cost(kind, level.saturating_add(amount));
        if !(next <= state.mass) {
            break;
        }
        total = next;
        amount += 1;
    }
    amount
}

/// Try to buy levels of an upgrade. Returns the number of levels bought
/// (0 when unaffordable or when the request resolves to nothing).
pub fn buy_upgrade(state: &mut GameState, kind: UpgradeKind, amount: PurchaseAmount) -> u32 {
    let amount = match amount {
        PurchaseAmount::Count(n) => n,
        PurchaseAmount::Max => max_affordable(state, kind),
    };
    if amount == 0 || amount > MAX_LEVELS_PER_PURCHASE {
        return 0;
    }

    let level = state.level(kind);
    let Some(new_level) = level.checked_add(amount) else {
        return 0;
    };
    let cost = economy::bulk_cost(kind, level, amount);
    if !(state.mass >= cost) {
        return 0;
    }

    state.mass = (state.mass - cost).max(0.0);
    state.upgrade_mut(kind).level = new_level;
    log::debug!(
        "bought {} x{} (level {}), spent {:e} g",
        kind.name(),
        amount,
        new_level,
        cost
    );
    amount
}

/// Meteor value at this moment. The caller applies it later.
pub fn meteor_bonus(state: &GameState) -> f64 {
    economy::mass_per_click(state) * METEOR_CLICK_MULTIPLIER
}

/// Land a meteor whose value was fixed when it was announced.
pub fn apply_meteor(state: &mut GameState, mass: f64) {
    if mass > 0.0 && mass.is_finite() {
        add_mass(state, mass);
    }
}

/// Perform a Quantum Echo: reset mass and upgrades for one echo point.
/// Returns the new echo point total, or `None` below the threshold.
pub fn perform_echo(state: &mut GameState) -> Option<u32> {
    if !economy::can_echo(state) {
        return None;
    }
    let points = state.echo_points.checked_add(1)?;
    state.mass = STARTING_MASS;
    state.echo_points = points;
    state.upgrades = GameState::create_upgrades();
    log::info!("quantum echo complete, echo points: {}", state.echo_points);
    Some(state.echo_points)
}

/// Spend echo points on one echo multiplier level. Returns true if successful.
pub fn buy_echo_multiplier(state: &mut GameState) -> bool {
    let cost = economy::echo_multiplier_cost(state);
    let Some(level) = state.echo_multiplier_level.checked_add(1) else {
        return false;
    };
    if state.echo_points < cost {
        return false;
    }
    state.echo_points -= cost;
    state.echo_multiplier_level = level;
    log::info!(
        "echo multiplier level {} for {} EP",
        state.echo_multiplier_level,
        cost
    );
    true
}

/// Latch `first_echo_unlocked` once mass reaches the unlock threshold.
/// Returns true only on the call that flips the latch.
pub fn check_first_echo_unlock(state: &mut GameState) -> bool {
    if state.first_echo_unlocked || state.mass < ECHO_BASE_THRESHOLD {
        return false;
    }
    state.first_echo_unlocked = true;
    true
}
