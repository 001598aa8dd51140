//! Frame clock: turns wall-clock timestamps into whole game ticks.
//!
//! Every millisecond between two frames becomes game time, however rarely
//! the host calls in. A long gap (throttled background tab, sleeping
//! laptop) is not dropped; it is paid out over the following frames in
//! batches of at most `MAX_TICKS_PER_FRAME`.

/// Upper bound on ticks released by a single `update` (5 minutes at 10 Hz).
pub const MAX_TICKS_PER_FRAME: u32 = 3_000;

#[derive(Clone, Debug)]
pub struct GameTime {
    /// Milliseconds per tick (100 ms at 10 ticks/sec).
    ms_per_tick: f64,
    /// Elapsed milliseconds not yet handed out as ticks.
    backlog_ms: f64,
    /// Timestamp of the previous frame, `None` before the first one.
    last_timestamp: Option<f64>,
}

impl GameTime {
    pub fn new(ticks_per_sec: u32) -> Self {
        Self {
            ms_per_tick: 1000.0 / ticks_per_sec.max(1) as f64,
            backlog_ms: 0.0,
            last_timestamp: None,
        }
    }

    /// Record a frame at `now_ms` and return how many ticks to run now.
    ///
    /// The first frame only sets the reference point. Timestamps that go
    /// backwards or are not finite add no time.
    pub fn update(&mut self, now_ms: f64) -> u32 {
        if !now_ms.is_finite() {
            return 0;
        }
        if let Some(prev) = self.last_timestamp {
            self.backlog_ms += (now_ms - prev).max(0.0);
        }
        self.last_timestamp = Some(now_ms);

        let due = (self.backlog_ms / self.ms_per_tick).floor();
        let ticks = due.min(MAX_TICKS_PER_FRAME as f64) as u32;
        self.backlog_ms -= ticks as f64 * self.ms_per_tick;
        ticks
    }

    /// Whole ticks still owed from earlier frames.
    pub fn pending_ticks(&self) -> u64 {
        (self.backlog_ms / self.ms_per_tick).floor() as u64
    }

    /// Seconds of game time covered by one tick.
    pub fn seconds_per_tick(&self) -> f64 {
        self.ms_per_tick / 1000.0
    }
}
