//! Derived values of the mass economy. Pure functions of `GameState`.

use crate::constants::{
    BASE_CLICK_MASS, CORE_STABILITY_BONUS, ECHO_BASE_THRESHOLD, ECHO_POWER_BASE,
    ECHO_THRESHOLD_GROWTH, ECHO_UPGRADE_BASE, EMITTER_CLICKS_PER_SEC, IMPACT_FORCE_BONUS,
    RADIATION_LEAK_PER_SEC, UPGRADE_COST_GROWTH,
};

use super::state::{compound, GameState, UpgradeKind};

/// Click mass before stability and echo multipliers.
pub fn base_click_value(state: &GameState) -> f64 {
    BASE_CLICK_MASS * (1.0 + state.level(UpgradeKind::ImpactForce) as f64 * IMPACT_FORCE_BONUS)
}

/// Core Stability multiplier on everything the core generates from clicks.
pub fn mass_multiplier(state: &GameState) -> f64 {
    1.0 + state.level(UpgradeKind::CoreStability) as f64 * CORE_STABILITY_BONUS
}

/// `2^echo_points`.
pub fn echo_power_factor(state: &GameState) -> f64 {
    compound(ECHO_POWER_BASE, state.echo_points)
}

/// `1.1^echo_multiplier_level`.
pub fn echo_upgrade_factor(state: &GameState) -> f64 {
    compound(ECHO_UPGRADE_BASE, state.echo_multiplier_level)
}

/// Combined permanent multiplier from echoes.
pub fn echo_factor(state: &GameState) -> f64 {
    echo_power_factor(state) * echo_upgrade_factor(state)
}

pub fn mass_per_click(state: &GameState) -> f64 {
    base_click_value(state) * mass_multiplier(state) * echo_factor(state)
}

pub fn auto_clicks_per_second(state: &GameState) -> f64 {
    state.level(UpgradeKind::EmitterSpeed) as f64 * EMITTER_CLICKS_PER_SEC
}

pub fn passive_flat_gain(state: &GameState) -> f64 {
    state.level(UpgradeKind::RadiationLeak) as f64 * RADIATION_LEAK_PER_SEC
}

pub fn mass_per_second(state: &GameState) -> f64 {
    let emitted = auto_clicks_per_second(state) * base_click_value(state) * mass_multiplier(state);
    (emitted + passive_flat_gain(state)) * echo_factor(state)
}

/// Cost of one level of `kind` bought at `level`.
pub fn upgrade_cost(kind: UpgradeKind, level: u32) -> f64 {
    kind.cost_at(level)
}

/// Total cost of buying `amount` levels of `kind` starting at `level`.
///
/// Summed level by level so the result matches a sequence of single purchases.
pub fn bulk_cost(kind: UpgradeKind, level: u32, amount: u32) -> f64 {
    (0..amount)
        .map(|i| upgrade_cost(kind, level.saturating_add(i)))
        .sum()
}

/// Estimate of the largest affordable amount from the geometric series
/// `cost * (r^n - 1) / (r - 1) <= budget`. May be off by one either way.
pub fn affordable_levels_estimate(kind: UpgradeKind, level: u32, budget: f64) -> f64 {
    let next = upgrade_cost(kind, level);
    if !(budget >= next) {
        return 0.0;
    }
    let r = UPGRADE_COST_GROWTH;
    // Work in log space so astronomically large budgets don't overflow.
    let ln_x = budget.ln() + (r - 1.0).ln() - next.ln();
    let ln_sum = if ln_x > 30.0 { ln_x } else { ln_x.exp().ln_1p() };
    (ln_sum / r.ln()).floor()
}

/// Mass needed for the next Quantum Echo.
pub fn echo_threshold(state: &GameState) -> f64 {
    ECHO_BASE_THRESHOLD * compound(ECHO_THRESHOLD_GROWTH, state.echo_points)
}

/// Progress towards the next echo, capped at 100.
pub fn echo_progress_percent(state: &GameState) -> f64 {
    (state.mass / echo_threshold(state) * 100.0).min(100.0)
}

pub fn can_echo(state: &GameState) -> bool {
    state.mass >= echo_threshold(state)
}

/// Echo points needed for the next echo multiplier level.
pub fn echo_multiplier_cost(state: &GameState) -> u32 {
    state.echo_multiplier_level.saturating_add(1)
}

pub fn can_buy_echo_multiplier(state: &GameState) -> bool {
    state.echo_points >= echo_multiplier_cost(state)
}

/// Whether `amount` levels of `kind` are affordable right now.
pub fn can_afford(state: &GameState, kind: UpgradeKind, amount: u32) -> bool {
    state.mass >= bulk_cost(kind, state.level(kind), amount)
}
