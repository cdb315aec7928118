//! Simulation statistics collection and reporting.
//!
//! This module tracks what the composed fabric did during a run. It
//! provides:
//! 1. **Cycle counts:** Reference, per-domain, and transport edges.
//! 2. **Milestones:** Simulated timestamps of PLL lock, sys reset release,
//!    and calibration release.
//! 3. **Traffic:** Bridge transaction counters, MSI events, DMA loopback
//!    words, and unclaimed bus accesses.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::soc::bridge::BridgeCounters;

/// Statistics structure tracking a simulation run.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Reference-clock edges processed.
    pub ref_cycles: u64,
    /// Sys-domain edges on which devices actually ran (out of reset).
    pub sys_cycles: u64,
    /// Transport-domain edges processed.
    pub transport_cycles: u64,
    /// Edges seen per derived domain, including while in reset.
    pub domain_cycles: BTreeMap<String, u64>,

    /// Simulated time at which the PLL locked.
    pub lock_time_ps: Option<u64>,
    /// Simulated time at which the sys domain left reset.
    pub sys_reset_release_ps: Option<u64>,
    /// Simulated time at which the calibration gate released.
    pub calibration_release_ps: Option<u64>,

    /// Bridge transaction counters, synced before reporting.
    pub bridge: BridgeCounters,
    /// Message-signaled interrupt events emitted.
    pub msi_events: u64,
    /// Words carried through the DMA loopback.
    pub dma_words_looped: u64,
    /// Bus accesses that decoded to no device.
    pub bus_unclaimed: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            ref_cycles: 0,
            sys_cycles: 0,
            transport_cycles: 0,
            domain_cycles: BTreeMap::new(),
            lock_time_ps: None,
            sys_reset_release_ps: None,
            calibration_release_ps: None,
            bridge: BridgeCounters::default(),
            msi_events: 0,
            dma_words_looped: 0,
            bus_unclaimed: 0,
        }
    }
}

impl SimStats {
    /// Records one edge of the named derived domain.
    pub fn count_domain_edge(&mut self, name: &str) {
        *self.domain_cycles.entry(name.to_owned()).or_insert(0) += 1;
    }

    /// Renders a human-readable report of the run.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let fmt_ps = |t: Option<u64>| {
            t.map_or_else(|| "never".to_owned(), |ps| format!("{:.3} us", ps as f64 / 1e6))
        };

        out.push_str("=== fabric run report ===\n");
        out.push_str(&format!(
            "wall time: {:.2?}\n",
            self.start_time.elapsed()
        ));
        out.push_str(&format!("reference edges:  {}\n", self.ref_cycles));
        out.push_str(&format!("sys cycles run:   {}\n", self.sys_cycles));
        out.push_str(&format!("transport edges:  {}\n", self.transport_cycles));
        for (name, edges) in &self.domain_cycles {
            out.push_str(&format!("  domain {name:<10} {edges} edges\n"));
        }
        out.push_str(&format!("PLL lock:            {}\n", fmt_ps(self.lock_time_ps)));
        out.push_str(&format!(
            "sys reset release:   {}\n",
            fmt_ps(self.sys_reset_release_ps)
        ));
        out.push_str(&format!(
            "calibration release: {}\n",
            fmt_ps(self.calibration_release_ps)
        ));
        out.push_str(&format!(
            "bridge: {} accepted, {} reads, {} writes, {} rejected, {} completions\n",
            self.bridge.accepted,
            self.bridge.reads,
            self.bridge.writes,
            self.bridge.rejected,
            self.bridge.completions
        ));
        out.push_str(&format!("MSI events:       {}\n", self.msi_events));
        out.push_str(&format!("DMA words looped: {}\n", self.dma_words_looped));
        out.push_str(&format!("unclaimed accesses: {}\n", self.bus_unclaimed));
        out
    }
}
