//! Heartbeat scheduler
//!
//! Decides when a liveness frame is due by comparing the elapsed time
//! against a stored last-fire timestamp. Nothing here sleeps; the caller
//! supplies the current time on each tick.
//!
//! Timestamps are `u32` milliseconds and compared with wrapping
//! arithmetic, so the ~49 day rollover is harmless.

/// Default heartbeat period
pub const DEFAULT_HEARTBEAT_INTERVAL_MS: u32 = 1000;

/// Periodic heartbeat timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeartbeatScheduler {
    /// Period in ms (`None` = disabled)
    interval_ms: Option<u32>,
    /// Time of the last fire, or of the start if none yet
    last_fire_ms: u32,
}

impl HeartbeatScheduler {
    /// Create a scheduler; an interval of zero disables it
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: if interval_ms == 0 {
                None
            } else {
                Some(interval_ms)
            },
            last_fire_ms: 0,
        }
    }

    /// Create a scheduler that never fires
    pub fn disabled() -> Self {
        Self::new(0)
    }

    /// Restart the period from `now_ms`
    pub fn start(&mut self, now_ms: u32) {
        self.last_fire_ms = now_ms;
    }

    /// Configured interval, if enabled
    pub fn interval_ms(&self) -> Option<u32> {
        self.interval_ms
    }

    /// Check if heartbeats are enabled
    pub fn is_enabled(&self) -> bool {
        self.interval_ms.is_some()
    }

    /// Advance the timer
    ///
    /// Returns `true` if a heartbeat is due. Fires at most once per call;
    /// the next period is measured from the scheduled fire time rather
    /// than `now_ms`, so a late tick is caught up on subsequent calls
    /// and the long-run rate stays one per interval.
    pub fn tick(&mut self, now_ms: u32) -> bool {
        let Some(interval) = self.interval_ms else {
            return false;
        };

        if now_ms.wrapping_sub(self.last_fire_ms) >= interval {
            self.last_fire_ms = self.last_fire_ms.wrapping_add(interval);
            true
        } else {
            false
        }
    }
}

impl Default for HeartbeatScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_HEARTBEAT_INTERVAL_MS)
    }
}
