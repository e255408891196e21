/// Rate limiter for position sampling.
///
/// The host calls [`tick`](Self::tick) from whatever timer it has; a sample
/// is due at most once per interval. Pausing resets the clock so the first
/// tick after resuming samples immediately.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionSampler {
    interval_ms: f64,
    last_sample_ms: Option<f64>,
}

impl PositionSampler {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            last_sample_ms: None,
        }
    }

    /// Returns true when a sample is due at `now_ms`, and records it
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let due = match self.last_sample_ms {
            None => true,
            // A clock that went backwards restarts the interval
            Some(last) => now_ms < last || now_ms - last >= self.interval_ms,
        };
        if due {
            self.last_sample_ms = Some(now_ms);
        }
        due
    }

    pub fn reset(&mut self) {
        self.last_sample_ms = None;
    }
}
