//! Clock/reset generator: the composed domain coordinator.
//!
//! Wires the frequency synthesizer, the per-domain reset sequencers, and the
//! calibration gate into one unit. It owns the two board-level inputs — the
//! reference clock (delivered as `tick_ref` edges) and the external reset
//! request line — and exposes per-domain reset state to the rest of the
//! fabric.
//!
//! Reset gating is a single OR'd condition: a domain's reset must be held
//! whenever the synthesizer is unlocked or the external request is active.

use tracing::debug;

use crate::clocking::calibration::CalibrationGate;
use crate::clocking::domain::ClockDomain;
use crate::clocking::pll::Pll;
use crate::clocking::reset::{ResetSequencer, ResetState};
use crate::common::ConfigError;
use crate::config::{PllConfig, SystemConfig, defaults};

/// Composed clock/reset generator.
#[derive(Debug)]
pub struct Crg {
    pll: Pll,
    ext_reset: bool,
    /// One sequencer per managed (non-reset-less) domain.
    sequencers: Vec<ResetSequencer>,
    calibration: CalibrationGate,
    calibration_domain: String,
}

impl Crg {
    /// Builds the generator from the PLL table and system settings.
    ///
    /// Every non-reset-less output domain receives an independent reset
    /// sequencer; the calibration gate is hosted on the configured
    /// calibration domain.
    ///
    /// # Errors
    ///
    /// Propagates PLL parameter validation failures.
    pub fn new(pll_config: &PllConfig, system: &SystemConfig) -> Result<Self, ConfigError> {
        let pll = Pll::new(pll_config)?;
        let sequencers: Vec<ResetSequencer> = pll
            .outputs()
            .iter()
            .filter(|d| !d.reset_less)
            .map(|d| ResetSequencer::new(&d.name))
            .collect();
        debug!(
            domains = pll.outputs().len(),
            sequenced = sequencers.len(),
            "clock/reset generator composed"
        );
        Ok(Self {
            pll,
            ext_reset: false,
            sequencers,
            calibration: CalibrationGate::new(system.calibration_delay),
            calibration_domain: defaults::CALIBRATION_DOMAIN.to_owned(),
        })
    }

    /// The OR'd gating condition shared by every sequencer.
    fn gate(&self) -> bool {
        !self.pll.locked() || self.ext_reset
    }

    /// Drives the external reset request line.
    ///
    /// A rising request asserts every managed domain's reset immediately
    /// (asynchronous path); a falling request releases nothing by itself —
    /// releases happen on each domain's own clock edges.
    pub fn set_reset_request(&mut self, level: bool) {
        self.ext_reset = level;
        if self.gate() {
            for seq in &mut self.sequencers {
                seq.assert_async();
            }
        }
    }

    /// Returns the current external reset request level.
    pub fn reset_request(&self) -> bool {
        self.ext_reset
    }

    /// Advances the synthesizer by one reference-clock edge.
    pub fn tick_ref(&mut self) {
        self.pll.tick_ref();
    }

    /// Processes a rising edge of the named output domain.
    ///
    /// Samples that domain's sequencer against the gating condition, then
    /// ticks the calibration gate if this is its hosting domain. Edges of
    /// reset-less or unknown domains are accepted and do nothing.
    pub fn tick_domain(&mut self, name: &str) {
        let gate = self.gate();
        if let Some(seq) = self.sequencers.iter_mut().find(|s| s.domain() == name) {
            seq.sample(gate);
        }
        if name == self.calibration_domain {
            let in_reset = self.reset_asserted(name);
            self.calibration.tick(in_reset);
        }
    }

    /// Returns whether the named domain's reset is asserted.
    ///
    /// Reset-less domains report `false`: they carry no reset logic and are
    /// assumed stable once their source clock is stable.
    pub fn reset_asserted(&self, name: &str) -> bool {
        self.sequencers
            .iter()
            .find(|s| s.domain() == name)
            .is_some_and(|s| s.state() == ResetState::Asserted)
    }

    /// Returns whether the synthesizer has locked.
    pub fn locked(&self) -> bool {
        self.pll.locked()
    }

    /// Returns whether the calibration gate has released its circuit.
    pub fn calibration_released(&self) -> bool {
        self.calibration.released()
    }

    /// Returns the derived clock domains in table order.
    pub fn domains(&self) -> &[ClockDomain] {
        self.pll.outputs()
    }

    /// Looks up a derived domain by name.
    pub fn domain(&self, name: &str) -> Option<&ClockDomain> {
        self.pll.domain(name)
    }
}
