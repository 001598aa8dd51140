//! Collidle game state definitions.

use crate::constants::{
    CORE_STABILITY_BONUS, EMITTER_CLICKS_PER_SEC, IMPACT_FORCE_BONUS, RADIATION_LEAK_PER_SEC,
    STARTING_MASS, UPGRADE_COST_GROWTH,
};
use crate::format::format_mass;

/// Kinds of upgrades bought with mass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UpgradeKind {
    ImpactForce,
    EmitterSpeed,
    CoreStability,
    RadiationLeak,
}

impl UpgradeKind {
    /// All upgrade kinds in display order.
    pub fn all() -> &'static [UpgradeKind] {
        &[
            UpgradeKind::ImpactForce,
            UpgradeKind::EmitterSpeed,
            UpgradeKind::CoreStability,
            UpgradeKind::RadiationLeak,
        ]
    }

    /// Position in `UpgradeKind::all()`, also the index into `GameState::upgrades`.
    pub fn index(&self) -> usize {
        match self {
            UpgradeKind::ImpactForce => 0,
            UpgradeKind::EmitterSpeed => 1,
            UpgradeKind::CoreStability => 2,
            UpgradeKind::RadiationLeak => 3,
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            UpgradeKind::ImpactForce => "Impact Force",
            UpgradeKind::EmitterSpeed => "Emitter Speed",
            UpgradeKind::CoreStability => "Core Stability",
            UpgradeKind::RadiationLeak => "Radiation Leak",
        }
    }

    /// Key used in the persisted JSON.
    pub fn save_key(&self) -> &'static str {
        match self {
            UpgradeKind::ImpactForce => "impactForce",
            UpgradeKind::EmitterSpeed => "emitterSpeed",
            UpgradeKind::CoreStability => "coreStability",
            UpgradeKind::RadiationLeak => "radiationLeak",
        }
    }

    /// Short description of what one level does.
    pub fn effect(&self) -> String {
        match self {
            UpgradeKind::ImpactForce => {
                format!("+{:.0}% mass per click", IMPACT_FORCE_BONUS * 100.0)
            }
            UpgradeKind::EmitterSpeed => format!("+{} particles/sec", EMITTER_CLICKS_PER_SEC),
            UpgradeKind::CoreStability => {
                format!("+{:.0}% all mass gain", CORE_STABILITY_BONUS * 100.0)
            }
            UpgradeKind::RadiationLeak => {
                format!("+{}/sec passive", format_mass(RADIATION_LEAK_PER_SEC))
            }
        }
    }

    /// Cost of the first level.
    pub fn base_cost(&self) -> f64 {
        match self {
            UpgradeKind::ImpactForce => 1e-17,
            UpgradeKind::EmitterSpeed => 1e-16,
            UpgradeKind::CoreStability => 1e-15,
            UpgradeKind::RadiationLeak => 1e-14,
        }
    }

    /// Cost of buying the level after `level`.
    pub fn cost_at(&self, level: u32) -> f64 {
        self.base_cost() * compound(UPGRADE_COST_GROWTH, level)
    }
}

/// `base^count` for a counter. Counts past `i32::MAX` saturate the exponent
/// instead of wrapping negative.
pub fn compound(base: f64, count: u32) -> f64 {
    base.powi(i32::try_from(count).unwrap_or(i32::MAX))
}

/// One upgrade track and how far it has been bought.
#[derive(Clone, Debug, PartialEq)]
pub struct Upgrade {
    pub kind: UpgradeKind,
    pub level: u32,
}

impl Upgrade {
    pub fn new(kind: UpgradeKind) -> Self {
        Self { kind, level: 0 }
    }

    /// Cost of the next level. Always derived from `level`, never stored.
    pub fn cost(&self) -> f64 {
        self.kind.cost_at(self.level)
    }
}

/// Full state of a Collidle game.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Accumulated mass in grams.
    pub mass: f64,
    /// Echo points currently held.
    pub echo_points: u32,
    /// Levels of the permanent echo multiplier.
    pub echo_multiplier_level: u32,
    /// Upgrades, one per kind in `UpgradeKind::all()` order.
    pub upgrades: [Upgrade; 4],
    /// Wall-clock time of the last save (ms since Unix epoch).
    pub last_save: f64,
    /// Manual clicks count.
    pub total_clicks: u64,
    /// Latched once mass first reaches the echo unlock threshold.
    pub first_echo_unlocked: bool,
}

impl GameState {
    /// Fresh game whose last save is `now_ms`.
    pub fn new(now_ms: f64) -> Self {
        Self {
            mass: STARTING_MASS,
            echo_points: 0,
            echo_multiplier_level: 0,
            upgrades: Self::create_upgrades(),
            last_save: now_ms,
            total_clicks: 0,
            first_echo_unlocked: false,
        }
    }

    /// Level-0 upgrades, one per kind.
    pub fn create_upgrades() -> [Upgrade; 4] {
        [
            Upgrade::new(UpgradeKind::ImpactForce),
            Upgrade::new(UpgradeKind::EmitterSpeed),
            Upgrade::new(UpgradeKind::CoreStability),
            Upgrade::new(UpgradeKind::RadiationLeak),
        ]
    }

    pub fn upgrade(&self, kind: UpgradeKind) -> &Upgrade {
        &self.upgrades[kind.index()]
    }

    pub fn upgrade_mut(&mut self, kind: UpgradeKind) -> &mut Upgrade {
        &mut self.upgrades[kind.index()]
    }

    pub fn level(&self, kind: UpgradeKind) -> u32 {
        self.upgrade(kind).level
    }
}
