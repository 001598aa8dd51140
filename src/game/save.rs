//! Collidle セーブ/ロードとオフライン進行の精算。
//!
//! ## バージョニング方針
//!
//! - `SAVE_VERSION`: 現在のセーブ形式バージョン。フィールド追加時にインクリメントする。
//! - `MIN_COMPATIBLE_VERSION`: 互換性を維持できる最小バージョン。
//!   新フィールドの追加のみの場合はこの値を変えない（旧データを維持できる）。
//!   既存フィールドの意味変更や削除など破壊的変更を行った場合のみインクリメントする。
//!
//! `version` フィールドを持たないセーブは、ブラウザ版が書き出していた
//! フラットな camelCase 形式 (v1) とみなす。不足フィールドはデフォルト値で補完し、
//! 未知のフィールドは無視する。
//!
//! ## オフライン進行
//!
//! ロード時に `last_save` からの経過秒数を求め、その間の mass/sec の 50% を付与する。
//! 経過時間は 0 未満にならない（未来日付のセーブは付与 0）。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    MAX_SAVED_ECHO_MULTIPLIER_LEVEL, MAX_SAVED_ECHO_POINTS, MAX_SAVED_UPGRADE_LEVEL,
    OFFLINE_EFFICIENCY,
};

use super::economy;
use super::logic;
use super::state::{GameState, UpgradeKind};

/// セーブデータのフォーマットバージョン。
/// フィールド追加時にインクリメントすること。
pub const SAVE_VERSION: u32 = 2;

/// 互換性を維持できる最小バージョン。
pub const MIN_COMPATIBLE_VERSION: u32 = 1;

/// `version` の無いセーブ（ブラウザ版の形式）のバージョン。
const LEGACY_VERSION: u32 = 1;

/// Why a save could not be used.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("save data could not be parsed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("save version {found} is older than the oldest compatible version {min}")]
    Incompatible { found: u32, min: u32 },
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default)]
#[serde(default)]
struct UpgradeSave {
    level: u32,
    /// 次のレベルのコスト。書き出すだけで、読み込み時は level から再計算する。
    cost: f64,
}

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
struct UpgradesSave {
    impact_force: UpgradeSave,
    emitter_speed: UpgradeSave,
    core_stability: UpgradeSave,
    radiation_leak: UpgradeSave,
}

impl UpgradesSave {
    fn get(&self, kind: UpgradeKind) -> &UpgradeSave {
        match kind {
            UpgradeKind::ImpactForce => &self.impact_force,
            UpgradeKind::EmitterSpeed => &self.emitter_speed,
            UpgradeKind::CoreStability => &self.core_stability,
            UpgradeKind::RadiationLeak => &self.radiation_leak,
        }
    }

    fn get_mut(&mut self, kind: UpgradeKind) -> &mut UpgradeSave {
        match kind {
            UpgradeKind::ImpactForce => &mut self.impact_force,
            UpgradeKind::EmitterSpeed => &mut self.emitter_speed,
            UpgradeKind::CoreStability => &mut self.core_stability,
            UpgradeKind::RadiationLeak => &mut self.radiation_leak,
        }
    }
}

/// シリアライズ用のセーブデータ構造体。
/// 浮動小数のフィールドは `null` や欠損を許容するため Option にしている。
#[derive(Serialize, Deserialize, Debug)]
#[serde(default, rename_all = "camelCase")]
struct GameSave {
    version: u32,
    mass: Option<f64>,
    echo_points: u32,
    upgrades: UpgradesSave,
    echo_multiplier_level: u32,
    last_save: Option<f64>,
    total_clicks: u64,
    first_echo_unlocked: bool,
}

impl Default for GameSave {
    fn default() -> Self {
        Self {
            version: LEGACY_VERSION,
            mass: None,
            echo_points: 0,
            upgrades: UpgradesSave::default(),
            echo_multiplier_level: 0,
            last_save: None,
            total_clicks: 0,
            first_echo_unlocked: false,
        }
    }
}

/// GameState からセーブ用データを抽出する。
fn extract_save(state: &GameState, now_ms: f64) -> GameSave {
    let mut upgrades = UpgradesSave::default();
    for upgrade in &state.upgrades {
        *upgrades.get_mut(upgrade.kind) = UpgradeSave {
            level: upgrade.level,
            cost: upgrade.cost(),
        };
    }
    GameSave {
        version: SAVE_VERSION,
        mass: Some(state.mass),
        echo_points: state.echo_points,
        upgrades,
        echo_multiplier_level: state.echo_multiplier_level,
        last_save: Some(now_ms),
        total_clicks: state.total_clicks,
        first_echo_unlocked: state.first_echo_unlocked,
    }
}

/// 上限を超えたカウンタを上限に丸める。
fn bounded(field: &str, value: u32, max: u32) -> u32 {
    if value > max {
        log::warn!("save field {} = {} is out of range, using {}", field, value, max);
        max
    } else {
        value
    }
}

/// セーブデータをデフォルト状態の上に重ねる。
/// 不正な数値（負、NaN、無限大）はデフォルト値のまま残し、
/// 到達不能な大きさのカウンタは上限に丸める。
fn apply_save(state: &mut GameState, save: &GameSave) {
    if let Some(mass) = save.mass.filter(|m| m.is_finite() && *m >= 0.0) {
        state.mass = mass;
    }
    state.echo_points = bounded("echoPoints", save.echo_points, MAX_SAVED_ECHO_POINTS);
    state.echo_multiplier_level = bounded(
        "echoMultiplierLevel",
        save.echo_multiplier_level,
        MAX_SAVED_ECHO_MULTIPLIER_LEVEL,
    );
    for kind in UpgradeKind::all() {
        state.upgrade_mut(*kind).level = bounded(
            kind.save_key(),
            save.upgrades.get(*kind).level,
            MAX_SAVED_UPGRADE_LEVEL,
        );
    }
    if let Some(last_save) = save.last_save.filter(|t| t.is_finite()) {
        state.last_save = last_save;
    }
    state.total_clicks = save.total_clicks;
    state.first_echo_unlocked = save.first_echo_unlocked;
}

/// Serialize `state` for storage, stamping `last_save = now_ms`.
pub fn save_to_string(state: &GameState, now_ms: f64) -> Result<String, serde_json::Error> {
    serde_json::to_string(&extract_save(state, now_ms))
}

/// Parse and merge a save over defaults, without offline progress.
/// A save without a usable `last_save` is treated as saved at `now_ms`.
pub fn parse_save(raw: &str, now_ms: f64) -> Result<GameState, LoadError> {
    let save: GameSave = serde_json::from_str(raw)?;

    if save.version < MIN_COMPATIBLE_VERSION {
        return Err(LoadError::Incompatible {
            found: save.version,
            min: MIN_COMPATIBLE_VERSION,
        });
    }
    if save.version < SAVE_VERSION {
        log::info!(
            "migrating save data (saved={}, current={})",
            save.version,
            SAVE_VERSION
        );
    }

    let mut state = GameState::new(now_ms);
    apply_save(&mut state, &save);
    Ok(state)
}

/// Seconds between the last save and `now_ms`, never negative.
pub fn elapsed_seconds(last_save_ms: f64, now_ms: f64) -> f64 {
    let elapsed = (now_ms - last_save_ms) / 1000.0;
    if elapsed.is_finite() {
        elapsed.max(0.0)
    } else {
        0.0
    }
}

/// Mass earned while the game was closed.
pub fn offline_gain(state: &GameState, now_ms: f64) -> f64 {
    economy::mass_per_second(state) * elapsed_seconds(state.last_save, now_ms) * OFFLINE_EFFICIENCY
}

/// Result of loading a save.
#[derive(Clone, Debug, PartialEq)]
pub struct Reconciled {
    pub state: GameState,
    /// Mass granted for the time away (0 when nothing was earned).
    pub offline_gain: f64,
}

/// Load previously saved data and credit offline progress.
///
/// Absent or unusable data yields a fresh game with no offline gain; this
/// never fails.
pub fn load_and_reconcile(raw: Option<&str>, now_ms: f64) -> Reconciled {
    let mut state = match raw.map(|r| parse_save(r, now_ms)) {
        Some(Ok(state)) => state,
        Some(Err(e)) => {
            log::warn!("discarding save data: {}", e);
            return Reconciled {
                state: GameState::new(now_ms),
                offline_gain: 0.0,
            };
        }
        None => {
            return Reconciled {
                state: GameState::new(now_ms),
                offline_gain: 0.0,
            }
        }
    };

    let gain = offline_gain(&state, now_ms).min(f64::MAX);
    logic::add_mass(&mut state, gain);
    state.last_save = now_ms;
    if gain > 0.0 {
        log::info!("offline earnings: {:e} g", gain);
    }

    Reconciled {
        state,
        offline_gain: gain,
    }
}
