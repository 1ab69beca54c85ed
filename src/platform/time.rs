//! Frame timing
//!
//! Turns `requestAnimationFrame` timestamps (fractional milliseconds) into
//! whole clock units for `GameSession::advance`.

/// Largest step accepted from a single frame (tab in background, debugger pause)
pub const MAX_FRAME_STEP: u64 = 250;

#[derive(Debug, Clone)]
pub struct FrameClock {
    last_time: Option<f64>,
    /// Sub-unit remainder carried to the next frame
    carry: f64,
    max_step: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_step(MAX_FRAME_STEP)
    }

    pub fn with_max_step(max_step: u64) -> Self {
        Self {
            last_time: None,
            carry: 0.0,
            max_step,
        }
    }

    /// Units elapsed since the previous frame. The first frame yields 0.
    pub fn step(&mut self, time: f64) -> u64 {
        let Some(last) = self.last_time.replace(time) else {
            return 0;
        };

        let elapsed = (time - last).max(0.0) + self.carry;
        let whole = elapsed.floor();
        self.carry = elapsed - whole;

        let units = whole as u64;
        if units > self.max_step {
            log::debug!("Frame gap of {} units clamped to {}", units, self.max_step);
            self.carry = 0.0;
            self.max_step
        } else {
            units
        }
    }

    /// Forget the previous timestamp (e.g. after the page was hidden)
    pub fn reset(&mut self) {
        self.last_time = None;
        self.carry = 0.0;
    }
}
