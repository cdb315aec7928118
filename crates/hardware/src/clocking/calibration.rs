//! Fixed-delay one-shot calibration gate.
//!
//! A countdown timer that holds a dependent calibration circuit in reset for
//! a fixed number of cycles after its clock domain stabilizes, then releases
//! it exactly once. The release is sticky: once released the gate never
//! re-asserts within a session, even if the domain's reset pulses again.
//!
//! The dependent circuit's own calibration algorithm is out of scope; only
//! the gate output is modeled.

use tracing::{info, trace};

/// One-shot calibration reset gate on a designated clock domain.
#[derive(Debug)]
pub struct CalibrationGate {
    countdown: u32,
    reload: u32,
    released: bool,
}

impl CalibrationGate {
    /// Creates the gate with the given delay in cycles of its domain.
    ///
    /// # Arguments
    ///
    /// * `delay_cycles` - Cycles to hold the dependent circuit after the
    ///   domain stabilizes.
    pub fn new(delay_cycles: u32) -> Self {
        Self {
            countdown: delay_cycles,
            reload: delay_cycles,
            released: false,
        }
    }

    /// Advances the gate by one cycle of its domain.
    ///
    /// # Arguments
    ///
    /// * `domain_in_reset` - Whether the hosting domain's reset is asserted
    ///   on this edge.
    ///
    /// While the domain is in reset the countdown holds at its reload value.
    /// Once the domain runs, the countdown decrements each cycle; at zero the
    /// output releases and freezes for the rest of the session.
    pub fn tick(&mut self, domain_in_reset: bool) {
        if self.released {
            // Sticky one-shot: later reset pulses are ignored.
            return;
        }
        if domain_in_reset {
            self.countdown = self.reload;
            return;
        }
        if self.countdown != 0 {
            self.countdown -= 1;
            trace!(countdown = self.countdown, "calibration countdown");
        } else {
            self.released = true;
            info!("calibration gate released");
        }
    }

    /// Returns whether the gate output has released.
    pub fn released(&self) -> bool {
        self.released
    }

    /// Returns the current countdown value (read-only; frozen after release).
    pub fn countdown(&self) -> u32 {
        self.countdown
    }
}
