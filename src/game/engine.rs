//! The running game: one `GameState` plus everything that drives it.
//!
//! The host feeds wall-clock frames and player commands in, and reads
//! snapshots and notifications out. All timers (income, meteor, autosave)
//! are tick countdowns advanced from `frame()`, so the engine is
//! deterministic when driven with `advance()`.

use crate::constants::{
    AUTOSAVE_INTERVAL_TICKS, METEOR_IMPACT_DELAY_TICKS, METEOR_PERIOD_TICKS,
    MUTATION_SAVE_DEBOUNCE_TICKS, TICKS_PER_SEC,
};
use crate::input::Command;
use crate::storage::SaveStore;
use crate::time::GameTime;

use super::economy;
use super::events::{EventQueue, Notification, ScheduledEvent};
use super::logic;
use super::save;
use super::state::GameState;

const MS_PER_TICK: f64 = 1000.0 / TICKS_PER_SEC as f64;

/// Derived values for display, computed from the current state.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub mass: f64,
    pub mass_per_click: f64,
    pub mass_per_second: f64,
    pub echo_threshold: f64,
    pub echo_progress_percent: f64,
    pub can_echo: bool,
    pub echo_multiplier_cost: u32,
}

pub struct Engine<S: SaveStore> {
    state: GameState,
    time: GameTime,
    events: EventQueue,
    notifications: Vec<Notification>,
    store: S,
    /// Wall-clock time the engine believes it is (ms since epoch).
    now_ms: f64,
    meteor_countdown: u32,
    autosave_countdown: u32,
    /// Ticks left before a debounced save, if one is pending.
    pending_save: Option<u32>,
}

impl<S: SaveStore> Engine<S> {
    /// Restore the game from `store`, crediting time spent away.
    pub fn load(store: S, now_ms: f64) -> Self {
        let raw = match store.read() {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("could not read save data: {}", e);
                None
            }
        };
        let reconciled = save::load_and_reconcile(raw.as_deref(), now_ms);

        let mut engine = Self::with_state(reconciled.state, store, now_ms);
        if reconciled.offline_gain > 0.0 {
            engine.notify(Notification::OfflineEarnings {
                mass: reconciled.offline_gain,
            });
        }
        engine.check_unlock();
        engine
    }

    /// Run an existing state. Nothing is read from `store` until a save.
    pub fn with_state(state: GameState, store: S, now_ms: f64) -> Self {
        Self {
            state,
            time: GameTime::new(TICKS_PER_SEC),
            events: EventQueue::new(),
            notifications: Vec::new(),
            store,
            now_ms,
            meteor_countdown: METEOR_PERIOD_TICKS,
            autosave_countdown: AUTOSAVE_INTERVAL_TICKS,
            pending_save: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Feed a wall-clock timestamp. Returns the number of ticks processed.
    ///
    /// All real time between frames is played, so income and timers do not
    /// depend on the frame rate. A long gap is worked off over several
    /// frames (see `GameTime`).
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        let ticks = self.time.update(now_ms);
        if now_ms.is_finite() {
            // Stamp saves during catch-up with the time the ticks cover.
            let owed = ticks as f64 + self.time.pending_ticks() as f64;
            let start = now_ms - owed * MS_PER_TICK;
            self.now_ms = self.now_ms.max(start);
        }
        self.advance(ticks);
        ticks
    }

    /// Run `ticks` fixed steps of game time.
    pub fn advance(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.now_ms += MS_PER_TICK;
            self.step();
        }
    }

    fn step(&mut self) {
        if logic::tick(&mut self.state, self.time.seconds_per_tick()) > 0.0 {
            self.mark_dirty();
        }

        for event in self.events.advance(1) {
            match event {
                ScheduledEvent::MeteorImpact { mass } => {
                    logic::apply_meteor(&mut self.state, mass);
                    log::info!("meteor struck for {:e} g", mass);
                    self.notify(Notification::MeteorStruck { mass });
                    self.mark_dirty();
                }
            }
        }

        self.meteor_countdown = self.meteor_countdown.saturating_sub(1);
        if self.meteor_countdown == 0 {
            self.meteor_countdown = METEOR_PERIOD_TICKS;
            let mass = logic::meteor_bonus(&self.state);
            self.events
                .schedule(METEOR_IMPACT_DELAY_TICKS, ScheduledEvent::MeteorImpact { mass });
            self.notify(Notification::MeteorIncoming { mass });
        }

        self.check_unlock();

        if let Some(left) = self.pending_save {
            if left <= 1 {
                self.save_now();
            } else {
                self.pending_save = Some(left - 1);
            }
        }

        self.autosave_countdown = self.autosave_countdown.saturating_sub(1);
        if self.autosave_countdown == 0 {
            self.save_now();
        }
    }

    /// Apply a player command.
    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Click => {
                let mass = logic::click(&mut self.state);
                self.notify(Notification::Clicked { mass });
                self.check_unlock();
                self.mark_dirty();
            }
            Command::Purchase { kind, amount } => {
                if logic::buy_upgrade(&mut self.state, kind, amount) > 0 {
                    self.save_now();
                }
            }
            Command::Echo => {
                if let Some(echo_points) = logic::perform_echo(&mut self.state) {
                    self.notify(Notification::EchoCompleted { echo_points });
                    self.save_now();
                }
            }
            Command::BuyEchoMultiplier => {
                if logic::buy_echo_multiplier(&mut self.state) {
                    self.save_now();
                }
            }
        }
    }

    /// Drain notifications raised since the last call.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mass: self.state.mass,
            mass_per_click: economy::mass_per_click(&self.state),
            mass_per_second: economy::mass_per_second(&self.state),
            echo_threshold: economy::echo_threshold(&self.state),
            echo_progress_percent: economy::echo_progress_percent(&self.state),
            can_echo: economy::can_echo(&self.state),
            echo_multiplier_cost: economy::echo_multiplier_cost(&self.state),
        }
    }

    /// Write the state to the store now. Failures are logged and the game
    /// keeps running; the next save retries.
    pub fn save_now(&mut self) {
        self.pending_save = None;
        self.autosave_countdown = AUTOSAVE_INTERVAL_TICKS;

        let json = match save::save_to_string(&self.state, self.now_ms) {
            Ok(j) => j,
            Err(e) => {
                log::warn!("failed to serialize save data: {}", e);
                return;
            }
        };
        match self.store.write(&json) {
            Ok(()) => self.state.last_save = self.now_ms,
            Err(e) => log::warn!("failed to write save data: {}", e),
        }
    }

    fn mark_dirty(&mut self) {
        if self.pending_save.is_none() {
            self.pending_save = Some(MUTATION_SAVE_DEBOUNCE_TICKS);
        }
    }

    fn check_unlock(&mut self) {
        if logic::check_first_echo_unlock(&mut self.state) {
            log::info!("quantum echo unlocked");
            self.notify(Notification::EchoUnlocked);
            self.mark_dirty();
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::UpgradeKind;
    use crate::input::PurchaseAmount;
    use crate::storage::MemoryStore;
    use crate::time::MAX_TICKS_PER_FRAME;

    const NOW: f64 = 1_700_000_000_000.0;

    fn fresh() -> Engine<MemoryStore> {
        Engine::load(MemoryStore::new(), NOW)
    }

    fn engine_with(state: GameState) -> Engine<MemoryStore> {
        Engine::with_state(state, MemoryStore::new(), NOW)
    }

    fn meteors(notes: &[Notification]) -> Vec<&Notification> {
        notes
            .iter()
            .filter(|n| {
                matches!(
                    n,
                    Notification::MeteorIncoming { .. } | Notification::MeteorStruck { .. }
                )
            })
            .collect()
    }

    #[test]
    fn fresh_load_has_defaults_and_no_notifications() {
        let mut engine = fresh();
        assert_eq!(engine.state(), &GameState::new(NOW));
        assert!(engine.take_notifications().is_empty());
    }

    #[test]
    fn click_adds_mass_and_notifies() {
        let mut engine = fresh();
        engine.handle(Command::Click);
        assert!((engine.state().mass - 2e-18).abs() < 1e-30);
        assert_eq!(engine.state().total_clicks, 1);
        assert_eq!(
            engine.take_notifications(),
            vec![Notification::Clicked { mass: 1e-18 }]
        );
    }

    #[test]
    fn passive_income_over_one_second() {
        let mut state = GameState::new(NOW);
        state.mass = 0.0;
        state.upgrade_mut(UpgradeKind::RadiationLeak).level = 1;
        let mut engine = engine_with(state);
        engine.advance(10);
        assert!((engine.state().mass / 1e-17 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn frame_converts_wall_clock_to_ticks() {
        let mut engine = fresh();
        assert_eq!(engine.frame(NOW), 0);
        assert_eq!(engine.frame(NOW + 350.0), 3);
        assert_eq!(engine.frame(NOW + 400.0), 1);
    }

    fn leaking(mass: f64) -> GameState {
        let mut state = GameState::new(NOW);
        state.mass = mass;
        state.upgrade_mut(UpgradeKind::RadiationLeak).level = 1; // 1e-17/s
        state
    }

    /// Play `seconds` of wall-clock time in frames of `frame_ms`.
    fn play(engine: &mut Engine<MemoryStore>, seconds: u32, frame_ms: f64) {
        engine.frame(NOW);
        let frames = (seconds as f64 * 1000.0 / frame_ms).round() as u32;
        for i in 1..=frames {
            engine.frame(NOW + i as f64 * frame_ms);
        }
    }

    #[test]
    fn frame_rate_does_not_change_the_game() {
        let mut smooth = engine_with(leaking(0.0));
        let mut choppy = engine_with(leaking(0.0));
        play(&mut smooth, 200, 100.0);
        play(&mut choppy, 200, 1000.0);

        // 200 s of leak plus one 1000-click meteor.
        assert!((smooth.state().mass / 3e-15 - 1.0).abs() < 1e-6);
        assert_eq!(smooth.state().mass, choppy.state().mass);
        assert_eq!(smooth.store().writes(), choppy.store().writes());
        assert_eq!(smooth.take_notifications(), choppy.take_notifications());
    }

    #[test]
    fn long_gap_is_worked_off_over_frames() {
        let mut engine = engine_with(leaking(0.0));
        engine.frame(NOW);
        // Ten minutes with the tab throttled.
        let later = NOW + 600_000.0;
        assert_eq!(engine.frame(later), MAX_TICKS_PER_FRAME);
        assert_eq!(engine.frame(later), 6_000 - MAX_TICKS_PER_FRAME);
        assert_eq!(engine.frame(later), 0);

        // 600 s of leak plus three meteors.
        assert!((engine.state().mass / 9e-15 - 1.0).abs() < 1e-6);
        assert!(engine.state().last_save <= later);
        let struck = engine
            .take_notifications()
            .iter()
            .filter(|n| matches!(n, Notification::MeteorStruck { .. }))
            .count();
        assert_eq!(struck, 3);
    }

    #[test]
    fn passive_income_is_saved_after_debounce() {
        let mut engine = engine_with(leaking(0.0));
        engine.advance(MUTATION_SAVE_DEBOUNCE_TICKS - 1);
        assert_eq!(engine.store().writes(), 0);
        engine.advance(1);
        assert_eq!(engine.store().writes(), 1);

        // Closing right after loses at most one debounce window of income.
        let reopened = Engine::load(engine.store().clone(), NOW + 1_000.0);
        assert!((reopened.state().mass / 1e-17 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn meteor_announced_then_lands_two_seconds_later() {
        let mut engine = fresh();
        let value = 1e-18 * 1000.0;
        engine.advance(METEOR_PERIOD_TICKS - 1);
        assert!(meteors(&engine.take_notifications()).is_empty());

        engine.advance(1);
        let notes = engine.take_notifications();
        assert_eq!(
            meteors(&notes),
            vec![&Notification::MeteorIncoming { mass: value }]
        );
        let before = engine.state().mass;

        engine.advance(METEOR_IMPACT_DELAY_TICKS - 1);
        assert!(meteors(&engine.take_notifications()).is_empty());
        assert_eq!(engine.state().mass, before);

        engine.advance(1);
        assert_eq!(
            meteors(&engine.take_notifications()),
            vec![&Notification::MeteorStruck { mass: value }]
        );
        assert!((engine.state().mass - (before + value)).abs() < 1e-27);
    }

    #[test]
    fn meteor_value_is_fixed_when_announced() {
        let mut state = GameState::new(NOW);
        state.mass = 1.0;
        let mut engine = engine_with(state);
        engine.advance(METEOR_PERIOD_TICKS);
        let announced = match meteors(&engine.take_notifications()).as_slice() {
            [Notification::MeteorIncoming { mass }] => *mass,
            other => panic!("unexpected notifications: {:?}", other),
        };

        // Upgrading in between must not change what lands.
        engine.handle(Command::Purchase {
            kind: UpgradeKind::ImpactForce,
            amount: PurchaseAmount::Count(50),
        });
        assert_eq!(engine.state().level(UpgradeKind::ImpactForce), 50);

        engine.advance(METEOR_IMPACT_DELAY_TICKS);
        assert_eq!(
            meteors(&engine.take_notifications()),
            vec![&Notification::MeteorStruck { mass: announced }]
        );
    }

    #[test]
    fn meteors_repeat_every_period() {
        let mut engine = fresh();
        engine.advance(METEOR_PERIOD_TICKS * 3);
        let notes = engine.take_notifications();
        let incoming = notes
            .iter()
            .filter(|n| matches!(n, Notification::MeteorIncoming { .. }))
            .count();
        let struck = notes
            .iter()
            .filter(|n| matches!(n, Notification::MeteorStruck { .. }))
            .count();
        assert_eq!(incoming, 3);
        assert_eq!(struck, 2);
    }

    #[test]
    fn autosave_every_thirty_seconds() {
        let mut engine = fresh();
        engine.advance(AUTOSAVE_INTERVAL_TICKS - 1);
        assert_eq!(engine.store().writes(), 0);
        engine.advance(1);
        assert_eq!(engine.store().writes(), 1);
        engine.advance(AUTOSAVE_INTERVAL_TICKS);
        assert_eq!(engine.store().writes(), 2);
    }

    #[test]
    fn autosave_stamps_last_save() {
        let mut engine = fresh();
        engine.advance(AUTOSAVE_INTERVAL_TICKS);
        let expected = NOW + 30_000.0;
        assert!((engine.state().last_save - expected).abs() < 1e-3);
        let saved = engine.store().data().unwrap();
        let value: serde_json::Value = serde_json::from_str(saved).unwrap();
        assert!((value["lastSave"].as_f64().unwrap() - expected).abs() < 1e-3);
    }

    #[test]
    fn purchase_persists_immediately() {
        let mut state = GameState::new(NOW);
        state.mass = 1e-15;
        let mut engine = engine_with(state);
        engine.handle(Command::Purchase {
            kind: UpgradeKind::ImpactForce,
            amount: PurchaseAmount::Count(1),
        });
        assert_eq!(engine.store().writes(), 1);
        let saved = engine.store().data().unwrap();
        assert!(saved.contains("\"impactForce\":{\"level\":1"));
    }

    #[test]
    fn failed_purchase_does_not_save() {
        let mut engine = fresh();
        engine.handle(Command::Purchase {
            kind: UpgradeKind::RadiationLeak,
            amount: PurchaseAmount::Count(1),
        });
        engine.handle(Command::Purchase {
            kind: UpgradeKind::ImpactForce,
            amount: PurchaseAmount::Count(0),
        });
        assert_eq!(engine.store().writes(), 0);
    }

    #[test]
    fn clicks_are_saved_after_debounce() {
        let mut engine = fresh();
        for _ in 0..5 {
            engine.handle(Command::Click);
        }
        assert_eq!(engine.store().writes(), 0);
        engine.advance(MUTATION_SAVE_DEBOUNCE_TICKS - 1);
        assert_eq!(engine.store().writes(), 0);
        engine.advance(1);
        assert_eq!(engine.store().writes(), 1);
    }

    #[test]
    fn echo_resets_and_notifies() {
        let mut state = GameState::new(NOW);
        state.mass = 2e-6;
        state.first_echo_unlocked = true;
        state.upgrade_mut(UpgradeKind::EmitterSpeed).level = 4;
        let mut engine = engine_with(state);

        engine.handle(Command::Echo);
        assert_eq!(engine.state().echo_points, 1);
        assert_eq!(engine.state().level(UpgradeKind::EmitterSpeed), 0);
        assert_eq!(
            engine.take_notifications(),
            vec![Notification::EchoCompleted { echo_points: 1 }]
        );
        assert_eq!(engine.store().writes(), 1);
    }

    #[test]
    fn echo_below_threshold_is_ignored() {
        let mut engine = fresh();
        engine.handle(Command::Echo);
        assert_eq!(engine.state().echo_points, 0);
        assert!(engine.take_notifications().is_empty());
        assert_eq!(engine.store().writes(), 0);
    }

    #[test]
    fn echo_multiplier_purchase() {
        let mut state = GameState::new(NOW);
        state.echo_points = 3;
        let mut engine = engine_with(state);
        engine.handle(Command::BuyEchoMultiplier);
        engine.handle(Command::BuyEchoMultiplier);
        assert_eq!(engine.state().echo_multiplier_level, 2);
        assert_eq!(engine.state().echo_points, 0);
        assert_eq!(engine.store().writes(), 2);
    }

    #[test]
    fn unlock_notifies_once() {
        let mut state = GameState::new(NOW);
        state.mass = 9.9999e-7;
        state.upgrade_mut(UpgradeKind::RadiationLeak).level = 100_000_000;
        let mut engine = engine_with(state);
        engine.advance(10);
        engine.advance(10);
        let unlocks = engine
            .take_notifications()
            .into_iter()
            .filter(|n| *n == Notification::EchoUnlocked)
            .count();
        assert_eq!(unlocks, 1);
        assert!(engine.state().first_echo_unlocked);
    }

    #[test]
    fn load_reports_offline_earnings() {
        let mut state = GameState::new(NOW - 60_000.0);
        state.mass = 0.0;
        state.upgrade_mut(UpgradeKind::RadiationLeak).level = 1;
        let json = save::save_to_string(&state, NOW - 60_000.0).unwrap();

        let mut engine = Engine::load(MemoryStore::with_data(json), NOW);
        let expected = 1e-17 * 60.0 * 0.5;
        match engine.take_notifications().as_slice() {
            [Notification::OfflineEarnings { mass }] => {
                assert!((mass / expected - 1.0).abs() < 1e-9)
            }
            other => panic!("unexpected notifications: {:?}", other),
        }
        assert_eq!(engine.state().last_save, NOW);
    }

    #[test]
    fn load_with_corrupt_store_starts_fresh() {
        let mut engine = Engine::load(MemoryStore::with_data("{{{"), NOW);
        assert_eq!(engine.state(), &GameState::new(NOW));
        assert!(engine.take_notifications().is_empty());
    }

    #[test]
    fn load_then_save_roundtrips() {
        let mut state = GameState::new(NOW);
        state.mass = 4.2e-10;
        state.echo_points = 2;
        state.total_clicks = 77;
        let mut engine = engine_with(state);
        engine.save_now();

        let store = engine.store().clone();
        let reloaded = Engine::load(store, NOW);
        assert_eq!(reloaded.state(), engine.state());
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut state = GameState::new(NOW);
        state.mass = 5e-7;
        let engine = engine_with(state);
        let snap = engine.snapshot();
        assert!((snap.mass_per_click - 1e-18).abs() < 1e-30);
        assert_eq!(snap.mass_per_second, 0.0);
        assert!((snap.echo_threshold - 1e-6).abs() < 1e-18);
        assert!((snap.echo_progress_percent - 50.0).abs() < 1e-9);
        assert!(!snap.can_echo);
        assert_eq!(snap.echo_multiplier_cost, 1);
    }
}
