//! Collidle: an idle game about accumulating mass in a particle collider.
//!
//! `state` holds the data model, `economy` derives rates and costs from it,
//! `logic` mutates it, `save` persists it, and `engine` runs it over time.

pub mod economy;
pub mod engine;
pub mod events;
pub mod logic;
pub mod save;
pub mod simulator;
pub mod state;

pub use engine::{Engine, Snapshot};
pub use events::Notification;
pub use state::{GameState, UpgradeKind};
