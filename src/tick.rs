use std::time::{Duration, Instant};

pub const MAX_DIFFICULTY: u8 = 11;
pub const DEFAULT_DIFFICULTY: u8 = 5;

// Milliseconds between steps, indexed by difficulty
const DIFFICULTY_INTERVALS_MS: [u64; MAX_DIFFICULTY as usize + 1] = [
    300, 210, 180, 150, 130, 120, 100, 80, 60, 40, 30, 20,
];

/// Step interval for a difficulty, clamped to the table.
pub fn tick_interval(difficulty: u8) -> Duration {
    let idx = difficulty.min(MAX_DIFFICULTY) as usize;
    Duration::from_millis(DIFFICULTY_INTERVALS_MS[idx])
}

/// Fixed-interval gate deciding when the game may advance.
///
/// Missed intervals are not caught up: however long a frame stalls, a due
/// check consumes at most one tick.
#[derive(Clone, Debug)]
pub struct Ticker {
    interval: Duration,
    last_tick: Instant,
}

impl Ticker {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Ticker { interval, last_tick: now }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) > self.interval {
            self.last_tick = now;
            true
        } else {
            false
        }
    }
}
