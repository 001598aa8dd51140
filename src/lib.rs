//! Economy engine for Collidle, an incremental game where a particle
//! collider's core gathers mass, from attograms upwards.
//!
//! The crate has no rendering of its own. A presentation layer drives an
//! [`game::Engine`] with frames and [`input::Command`]s and reads back
//! snapshots, notifications and [`format`]ted values.

pub mod clock;
pub mod console_log;
pub mod constants;
pub mod format;
pub mod game;
pub mod input;
pub mod storage;
pub mod time;
