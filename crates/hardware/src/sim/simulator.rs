//! Top-level simulator: owns the system and the edge scheduler.
//!
//! Maps scheduler entries onto the three edge kinds the fabric knows —
//! reference-clock edges feeding the PLL lock model, derived-domain edges
//! feeding the reset sequencers (and, for the sys domain, the bus and
//! devices), and transport edges feeding the bridge's endpoint side — and
//! stamps run milestones into the statistics block as they happen.

use crate::common::ConfigError;
use crate::config::{Config, defaults};
use crate::sim::scheduler::Scheduler;
use crate::soc::System;

/// What a scheduler entry drives.
#[derive(Clone, Debug)]
enum EdgeKind {
    /// Board reference clock into the PLL.
    Reference,
    /// A PLL output domain, by name.
    Domain(String),
    /// The transport endpoint clock.
    Transport,
}

/// Top-level simulator.
#[derive(Debug)]
pub struct Simulator {
    /// The composed fabric under simulation.
    pub system: System,
    scheduler: Scheduler,
    kinds: Vec<EdgeKind>,
}

impl Simulator {
    /// Composes a system from configuration and sets up its clock table.
    ///
    /// The reference clock registers first so that, on coincident edges, the
    /// lock model updates before any domain samples it; derived domains
    /// follow in PLL table order with their phase offsets; the transport
    /// clock registers last.
    ///
    /// # Errors
    ///
    /// Propagates composition failures from [`System::new`].
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let system = System::new(config)?;

        let mut scheduler = Scheduler::new();
        let mut kinds = Vec::new();

        let _ = scheduler.add_clock("ref", config.pll.ref_clk_hz, 0);
        kinds.push(EdgeKind::Reference);

        for domain in system.crg.domains() {
            let _ = scheduler.add_clock(&domain.name, domain.freq_hz, domain.phase_offset_ps());
            kinds.push(EdgeKind::Domain(domain.name.clone()));
        }

        let _ = scheduler.add_clock("transport", config.bridge.transport_clk_hz, 0);
        kinds.push(EdgeKind::Transport);

        Ok(Self {
            system,
            scheduler,
            kinds,
        })
    }

    /// Returns the current simulated time in picoseconds.
    pub fn now_ps(&self) -> u64 {
        self.scheduler.now_ps()
    }

    /// Drives the external reset request line.
    pub fn set_reset_request(&mut self, level: bool) {
        self.system.crg.set_reset_request(level);
    }

    /// Advances to the next instant with pending edges and processes them.
    ///
    /// # Returns
    ///
    /// `true` if the sys domain saw a rising edge at this instant.
    pub fn tick_next(&mut self) -> bool {
        let due = self.scheduler.advance();
        let now = self.scheduler.now_ps();
        let mut sys_edge = false;

        for idx in due {
            match &self.kinds[idx] {
                EdgeKind::Reference => {
                    self.system.crg.tick_ref();
                    self.system.stats.ref_cycles += 1;
                    if self.system.stats.lock_time_ps.is_none() && self.system.crg.locked() {
                        self.system.stats.lock_time_ps = Some(now);
                    }
                }
                EdgeKind::Domain(name) => {
                    let name = name.clone();
                    self.system.crg.tick_domain(&name);
                    self.system.stats.count_domain_edge(&name);
                    if name == defaults::SYS_DOMAIN {
                        sys_edge = true;
                        if self.system.stats.sys_reset_release_ps.is_none()
                            && !self.system.crg.reset_asserted(&name)
                        {
                            self.system.stats.sys_reset_release_ps = Some(now);
                        }
                        self.system.tick_sys();
                    }
                    if self.system.stats.calibration_release_ps.is_none()
                        && self.system.crg.calibration_released()
                    {
                        self.system.stats.calibration_release_ps = Some(now);
                    }
                }
                EdgeKind::Transport => {
                    self.system.tick_transport();
                }
            }
        }
        sys_edge
    }

    /// Runs until simulated time reaches `deadline_ps`.
    pub fn run_until_ps(&mut self, deadline_ps: u64) {
        loop {
            let Some(next) = self.scheduler.peek_next_ps() else {
                return;
            };
            if next > deadline_ps {
                return;
            }
            let _ = self.tick_next();
        }
    }

    /// Runs until the sys domain has seen `n` more rising edges.
    ///
    /// Edges count whether or not the domain is still in reset, matching a
    /// scope on the clock pin rather than on the logic behind it.
    pub fn run_sys_cycles(&mut self, n: u64) {
        let has_sys = self
            .kinds
            .iter()
            .any(|k| matches!(k, EdgeKind::Domain(name) if name == defaults::SYS_DOMAIN));
        if !has_sys {
            return;
        }
        let mut seen = 0;
        while seen < n {
            if self.tick_next() {
                seen += 1;
            }
        }
    }
}
