//! Scheduled events and one-shot notifications.
//!
//! Effects that are decided now but land later (a meteor's impact) are queued
//! as `ScheduledEvent`s carrying their precomputed payload. The engine drains
//! the queue from its tick loop. Notifications flow the other way: the engine
//! pushes them, the presentation layer takes them.

/// An effect waiting to be applied.
#[derive(Clone, Debug, PartialEq)]
pub enum ScheduledEvent {
    /// Meteor impact worth `mass`, fixed when the meteor was announced.
    MeteorImpact { mass: f64 },
}

#[derive(Clone, Debug, PartialEq)]
struct Pending {
    ticks_left: u32,
    event: ScheduledEvent,
}

/// Countdown queue of scheduled events.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventQueue {
    pending: Vec<Pending>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` to come due after `delay_ticks` ticks.
    pub fn schedule(&mut self, delay_ticks: u32, event: ScheduledEvent) {
        self.pending.push(Pending {
            ticks_left: delay_ticks,
            event,
        });
    }

    /// Advance all countdowns by `delta_ticks` and return the events now due,
    /// in the order they were scheduled.
    pub fn advance(&mut self, delta_ticks: u32) -> Vec<ScheduledEvent> {
        for p in &mut self.pending {
            p.ticks_left = p.ticks_left.saturating_sub(delta_ticks);
        }
        let (due, waiting): (Vec<Pending>, Vec<Pending>) =
            self.pending.drain(..).partition(|p| p.ticks_left == 0);
        self.pending = waiting;
        due.into_iter().map(|p| p.event).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// One-shot messages for the presentation layer.
#[derive(Clone, Debug, PartialEq)]
pub enum Notification {
    /// Mass earned while the game was closed.
    OfflineEarnings { mass: f64 },
    /// Mass reached the echo threshold for the first time.
    EchoUnlocked,
    /// A Quantum Echo finished; `echo_points` is the new total.
    EchoCompleted { echo_points: u32 },
    /// A meteor is on its way; it will be worth `mass`.
    MeteorIncoming { mass: f64 },
    /// The meteor hit the core.
    MeteorStruck { mass: f64 },
    /// A manual click landed.
    Clicked { mass: f64 },
}

impl Notification {
    /// Text shown to the player, or `None` for purely visual feedback.
    pub fn message(&self) -> Option<String> {
        use crate::format::format_mass;
        match self {
            Notification::OfflineEarnings { mass } => Some(format!(
                "While you were away, you earned {}",
                format_mass(*mass)
            )),
            Notification::EchoUnlocked => {
                Some("Quantum Echo unlocked! You can now prestige.".to_string())
            }
            Notification::EchoCompleted { echo_points } => Some(format!(
                "Quantum Echo complete! Echo Points: {}",
                echo_points
            )),
            Notification::MeteorIncoming { .. } => None,
            Notification::MeteorStruck { .. } => {
                Some("A meteor struck your core! It was worth 1,000 particles.".to_string())
            }
            Notification::Clicked { .. } => None,
        }
    }
}
