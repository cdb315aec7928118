//! Frequency synthesizer (PLL) model.
//!
//! Derives N output clock domains with independent frequency and phase from
//! one reference clock. It provides:
//! 1. **Parameter validation:** The divide/multiply/phase table is checked
//!    against the device bounds at composition time; violations are fatal.
//! 2. **Lock modeling:** `locked` is false until a fixed settle count of
//!    reference edges has elapsed, then transitions false→true exactly once.
//! 3. **Domain derivation:** One [`ClockDomain`] per table entry.
//!
//! There is no re-lock path: a locked PLL stays locked for the session.

use tracing::{debug, info};

use crate::clocking::domain::ClockDomain;
use crate::common::ConfigError;
use crate::config::PllConfig;

/// Inclusive input-divider range the oscillator can realize.
const DIVCLK_DIVIDE_RANGE: (u32, u32) = (1, 56);

/// Inclusive feedback-multiplier range.
const CLKFBOUT_MULT_RANGE: (u32, u32) = (2, 64);

/// Inclusive per-output divider range.
const CLKOUT_DIVIDE_RANGE: (u32, u32) = (1, 128);

/// Phase bound in degrees, symmetric around zero.
const PHASE_BOUND_DEG: f64 = 360.0;

/// VCO operating band in Hz.
const VCO_RANGE_HZ: (u64, u64) = (800_000_000, 1_600_000_000);

/// Phase-locked-loop abstraction deriving the fabric's clock domains.
#[derive(Debug)]
pub struct Pll {
    outputs: Vec<ClockDomain>,
    vco_hz: u64,
    locked: bool,
    settle_remaining: u64,
}

impl Pll {
    /// Builds the synthesizer from its parameter table.
    ///
    /// # Arguments
    ///
    /// * `config` - Reference frequency, VCO parameters, and output taps.
    ///
    /// # Returns
    ///
    /// The unlocked synthesizer, or a [`ConfigError`] naming the first
    /// parameter outside the realizable range.
    ///
    /// # Errors
    ///
    /// `PllParamOutOfRange` or `VcoOutOfRange` when the table cannot be
    /// realized by the device.
    pub fn new(config: &PllConfig) -> Result<Self, ConfigError> {
        check_range(
            "DIVCLK_DIVIDE",
            config.divclk_divide as i64,
            DIVCLK_DIVIDE_RANGE.0 as i64,
            DIVCLK_DIVIDE_RANGE.1 as i64,
        )?;
        check_range(
            "CLKFBOUT_MULT",
            config.clkfbout_mult as i64,
            CLKFBOUT_MULT_RANGE.0 as i64,
            CLKFBOUT_MULT_RANGE.1 as i64,
        )?;

        let vco_hz =
            config.ref_clk_hz * config.clkfbout_mult as u64 / config.divclk_divide as u64;
        if vco_hz < VCO_RANGE_HZ.0 || vco_hz > VCO_RANGE_HZ.1 {
            return Err(ConfigError::VcoOutOfRange {
                vco_hz,
                min_hz: VCO_RANGE_HZ.0,
                max_hz: VCO_RANGE_HZ.1,
            });
        }

        let mut outputs = Vec::with_capacity(config.outputs.len());
        for tap in &config.outputs {
            check_range(
                "CLKOUT_DIVIDE",
                tap.divide as i64,
                CLKOUT_DIVIDE_RANGE.0 as i64,
                CLKOUT_DIVIDE_RANGE.1 as i64,
            )?;
            if tap.phase_deg.abs() > PHASE_BOUND_DEG {
                return Err(ConfigError::PllParamOutOfRange {
                    param: "CLKOUT_PHASE",
                    value: tap.phase_deg as i64,
                    min: -(PHASE_BOUND_DEG as i64),
                    max: PHASE_BOUND_DEG as i64,
                });
            }
            outputs.push(ClockDomain {
                name: tap.name.clone(),
                freq_hz: vco_hz / tap.divide as u64,
                phase_deg: tap.phase_deg,
                reset_less: tap.reset_less,
            });
        }

        debug!(vco_hz, outputs = outputs.len(), "synthesizer table validated");
        Ok(Self {
            outputs,
            vco_hz,
            locked: false,
            settle_remaining: config.lock_cycles,
        })
    }

    /// Advances the lock model by one reference-clock edge.
    ///
    /// `locked` rises after the configured settle count and never falls
    /// again; further edges are no-ops once locked.
    pub fn tick_ref(&mut self) {
        if self.locked {
            return;
        }
        self.settle_remaining = self.settle_remaining.saturating_sub(1);
        if self.settle_remaining == 0 {
            self.locked = true;
            info!("PLL locked");
        }
    }

    /// Returns whether the derived clocks are frequency/phase stable.
    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Returns the derived output domains in table order.
    pub fn outputs(&self) -> &[ClockDomain] {
        &self.outputs
    }

    /// Looks up an output domain by name.
    pub fn domain(&self, name: &str) -> Option<&ClockDomain> {
        self.outputs.iter().find(|d| d.name == name)
    }

    /// Returns the internal oscillator frequency in Hz.
    pub fn vco_hz(&self) -> u64 {
        self.vco_hz
    }
}

fn check_range(param: &'static str, value: i64, min: i64, max: i64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::PllParamOutOfRange {
            param,
            value,
            min,
            max,
        });
    }
    Ok(())
}
