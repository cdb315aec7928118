//! User LED controller.
//!
//! Owns the free-running activity counter that blinks the user LED; the LED
//! state is one bit of the counter. The counter has no external mutator —
//! both registers are read-only.
//!
//! # Registers
//!
//! * `0x00`: LED state (counter bit selected at composition)
//! * `0x04`: raw counter

use crate::soc::traits::Device;

/// LED controller device.
#[derive(Debug)]
pub struct LedController {
    base_addr: u64,
    /// Free-running counter, incremented once per sys cycle; owned here,
    /// exposed read-only.
    counter: u32,
    /// Counter bit driven onto the LED.
    led_bit: u32,
}

impl LedController {
    /// Creates the controller.
    ///
    /// # Arguments
    ///
    /// * `base_addr` - Base address of the CSR window.
    /// * `led_bit` - Counter bit to drive onto the LED.
    pub fn new(base_addr: u64, led_bit: u32) -> Self {
        Self {
            base_addr,
            counter: 0,
            led_bit,
        }
    }

    /// Returns the current LED level.
    pub fn led(&self) -> bool {
        self.counter >> self.led_bit & 1 != 0
    }

    /// Returns the raw counter value.
    pub fn counter(&self) -> u32 {
        self.counter
    }
}

impl Device for LedController {
    fn name(&self) -> &str {
        "LEDS"
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, 0x800)
    }

    fn read_u32(&mut self, offset: u64) -> u32 {
        match offset {
            0x00 => self.led() as u32,
            0x04 => self.counter,
            _ => 0,
        }
    }

    /// The counter has no external mutator; writes are dropped.
    fn write_u32(&mut self, _offset: u64, _val: u32) {}

    fn tick(&mut self) {
        self.counter = self.counter.wrapping_add(1);
    }
}
