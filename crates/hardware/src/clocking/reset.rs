//! Per-domain reset sequencing.
//!
//! Implements the asynchronous-assert / synchronous-release discipline: reset
//! asserts the instant the gating condition rises, but release is sampled on
//! the target domain's own clock through a two-flop synchronizer, so the
//! domain leaves reset exactly two of its own edges after the gate clears.
//!
//! Each managed domain gets an independent instance. Domains marked
//! reset-less receive no sequencer at all.

use tracing::{debug, trace};

/// Externally observable reset state of one domain.
///
/// The synchronizer stages between `Asserted` and `Released` are internal
/// and never visible to consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResetState {
    /// Reset is asserted; logic in the domain is held inactive.
    Asserted,
    /// Reset has been released on a clean clock edge; the domain runs.
    Released,
}

/// Reset state machine for one clock domain.
#[derive(Debug)]
pub struct ResetSequencer {
    domain: String,
    /// First synchronizer flop; set on the first clean edge after the gate
    /// clears.
    stage1: bool,
    /// Second synchronizer flop; release is taken from here.
    stage2: bool,
    state: ResetState,
}

impl ResetSequencer {
    /// Creates the sequencer for the named domain, initially asserted.
    pub fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_owned(),
            stage1: false,
            stage2: false,
            state: ResetState::Asserted,
        }
    }

    /// Asynchronous assertion path.
    ///
    /// Called the instant the gating condition rises, between clock edges.
    /// Re-entry to `Asserted` is immediate and flushes the synchronizer.
    pub fn assert_async(&mut self) {
        if self.state == ResetState::Released || self.stage1 || self.stage2 {
            trace!(domain = %self.domain, "async reset assertion");
        }
        self.stage1 = false;
        self.stage2 = false;
        self.state = ResetState::Asserted;
    }

    /// Samples the gating condition on a rising edge of the domain's clock.
    ///
    /// # Arguments
    ///
    /// * `gate` - True while reset must be held (`!locked || ext_reset`).
    ///
    /// While the gate is set the machine stays `Asserted`. Once it clears,
    /// the release propagates through both flops: the state becomes
    /// `Released` on the second consecutive clean edge.
    pub fn sample(&mut self, gate: bool) {
        if gate {
            self.assert_async();
            return;
        }
        if self.state == ResetState::Released {
            return;
        }
        self.stage2 = self.stage1;
        self.stage1 = true;
        if self.stage2 {
            self.state = ResetState::Released;
            debug!(domain = %self.domain, "reset released");
        }
    }

    /// Returns the externally observable reset state.
    pub fn state(&self) -> ResetState {
        self.state
    }

    /// Returns whether reset is currently asserted.
    pub fn is_asserted(&self) -> bool {
        self.state == ResetState::Asserted
    }

    /// Returns the domain this sequencer manages.
    pub fn domain(&self) -> &str {
        &self.domain
    }
}
