//! Clock and reset domain coordination.
//!
//! This module derives and sequences the clock/reset domains of the fabric:
//! 1. **Synthesis:** [`Pll`] derives the output domains from one reference
//!    clock and reports a one-shot `locked` signal.
//! 2. **Sequencing:** [`ResetSequencer`] applies the asynchronous-assert /
//!    synchronous-release discipline per managed domain.
//! 3. **Calibration:** [`CalibrationGate`] holds a dependent circuit in reset
//!    for a fixed cycle count after its domain stabilizes, exactly once.
//! 4. **Composition:** [`Crg`] wires the above together and owns the external
//!    reset request.

/// Fixed-delay one-shot calibration gate.
pub mod calibration;
/// Clock/reset generator composing PLL, sequencers, and calibration gate.
pub mod crg;
/// Clock domain descriptor.
pub mod domain;
/// Frequency synthesizer (PLL) model.
pub mod pll;
/// Per-domain reset sequencing state machine.
pub mod reset;

pub use calibration::CalibrationGate;
pub use crg::Crg;
pub use domain::ClockDomain;
pub use pll::Pll;
pub use reset::{ResetSequencer, ResetState};
