//! System construction and top-level `System` type.
//!
//! This module builds the complete fabric from configuration. It performs:
//! 1. **Clock/reset:** Composes the [`Crg`] from the PLL table.
//! 2. **Registry:** Merges the base slot maps with this composition's
//!    subsystems and freezes the result.
//! 3. **Bus setup:** Places every CSR device at its registry-derived
//!    address.
//! 4. **Wiring:** Attaches the DMA interrupt lines to the MSI aggregator and
//!    connects the DMA loopback.
//!
//! All failure paths are composition-time; once `new` returns, the per-cycle
//! tick methods cannot fail.

use std::collections::VecDeque;

use tracing::info;

use crate::clocking::Crg;
use crate::common::ConfigError;
use crate::config::{Config, defaults};
use crate::registry::{RegistryBuilder, ResourceRegistry};
use crate::soc::bridge::{TransportBridge, TransportCompletion, TransportRequest};
use crate::soc::devices::{DdrPhy, DmaEngine, Dna, Identifier, LedController, Xadc};
use crate::soc::interconnect::Bus;
use crate::soc::msi::{MsiAggregator, MsiEvent};
use crate::soc::sdram::SdramModule;
use crate::stats::SimStats;

/// Top-level composed fabric.
///
/// Holds the clock/reset generator, the frozen registry, the register bus
/// with its devices, the transport bridge, and the MSI aggregator. Created
/// once; none of its parts are destroyed or re-created at runtime.
#[derive(Debug)]
pub struct System {
    /// Clock/reset generator (PLL, sequencers, calibration gate).
    pub crg: Crg,
    /// Frozen name-to-slot registry.
    pub registry: ResourceRegistry,
    /// Register bus and its CSR devices.
    pub bus: Bus,
    /// Transport-to-bus bridge.
    pub bridge: TransportBridge,
    /// Message-signaled interrupt aggregator.
    pub msi: MsiAggregator,
    /// Run statistics.
    pub stats: SimStats,
    sdram: SdramModule,
    msi_events: VecDeque<MsiEvent>,
}

impl System {
    /// Builds a new system from configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Composition settings (PLL table, CSR geometry, bridge).
    ///
    /// # Returns
    ///
    /// A fully composed system ready for simulation.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`]: PLL bounds, registry collisions, or interrupt
    /// wiring faults.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let crg = Crg::new(&config.pll, &config.system)?;

        let mut builder = RegistryBuilder::with_base();
        builder.csr("ddrphy", 17)?;
        builder.csr("dna", 18)?;
        builder.csr("xadc", 19)?;
        builder.csr("pcie_phy", 20)?;
        builder.csr("dma", 21)?;
        builder.csr("msi", 22)?;
        builder.interrupt("dma_writer", 0)?;
        builder.interrupt("dma_reader", 1)?;
        let registry = builder.build();

        let window = |index: usize| {
            config.system.csr_base + index as u64 * config.system.csr_slot_bytes
        };

        let sdram = SdramModule::mt41j128m16();

        let mut bus = Bus::new();
        bus.add_device(Box::new(Identifier::new(
            window(registry.csr_index("identifier_mem")?),
            &config.system.ident,
        )));
        bus.add_device(Box::new(LedController::new(
            window(registry.csr_index("leds")?),
            defaults::LED_COUNTER_BIT,
        )));
        bus.add_device(Box::new(DdrPhy::new(
            window(registry.csr_index("ddrphy")?),
            defaults::DDRPHY_BITSLIP,
            defaults::DDRPHY_DELAY,
            sdram,
        )));
        bus.add_device(Box::new(Dna::new(window(registry.csr_index("dna")?))));
        bus.add_device(Box::new(Xadc::new(window(registry.csr_index("xadc")?))));

        let mut dma = DmaEngine::new(window(registry.csr_index("dma")?));
        dma.connect_loopback();
        bus.add_device(Box::new(dma));

        let mut msi = MsiAggregator::new(&registry)?;
        msi.attach("dma_writer", &registry)?;
        msi.attach("dma_reader", &registry)?;

        // The base composition accepts every address: identity translation
        // with an unbounded route.
        let bridge = TransportBridge::new(config.bridge.fifo_depth, Box::new(|_addr| true));

        info!(
            devices = bus.device_count(),
            vectors = msi.width(),
            sdram = sdram.name,
            "system composed"
        );

        Ok(Self {
            crg,
            registry,
            bus,
            bridge,
            msi,
            stats: SimStats::default(),
            sdram,
            msi_events: VecDeque::new(),
        })
    }

    /// Returns the SDRAM module registered with the DDR subsystem.
    pub fn sdram(&self) -> &SdramModule {
        &self.sdram
    }

    /// Queues one request from the transport endpoint.
    pub fn push_request(&mut self, req: TransportRequest) {
        self.bridge.push_request(req);
    }

    /// Drains completions delivered to the endpoint so far.
    pub fn take_completions(&mut self) -> Vec<TransportCompletion> {
        self.bridge.take_completions()
    }

    /// Drains MSI events raised so far, in order.
    pub fn take_msi_events(&mut self) -> Vec<MsiEvent> {
        self.msi_events.drain(..).collect()
    }

    /// Processes one rising edge of the sys domain.
    ///
    /// While the sys reset is asserted nothing runs; once released, the
    /// bridge executes one pending transaction, every device ticks, and the
    /// cycle's interrupt lines are aggregated into MSI events.
    pub fn tick_sys(&mut self) {
        if self.crg.reset_asserted(defaults::SYS_DOMAIN) {
            return;
        }
        self.stats.sys_cycles += 1;

        self.bridge.tick_sys(&mut self.bus);

        let calibrated = self.crg.calibration_released();
        if let Some(phy) = self.bus.find_ddrphy_mut() {
            phy.set_calibrated(calibrated);
        }

        let lines = self.bus.tick();
        for line in lines {
            self.msi.drive(line);
        }
        let events = self.msi.sample();
        self.stats.msi_events += events.len() as u64;
        self.msi_events.extend(events);
    }

    /// Processes one rising edge of the transport domain.
    pub fn tick_transport(&mut self) {
        self.stats.transport_cycles += 1;
        self.bridge.tick_transport();
    }

    /// Copies live counters (bridge, DMA, bus) into the stats block.
    pub fn sync_stats(&mut self) {
        self.stats.bridge = self.bridge.counters();
        self.stats.bus_unclaimed = self.bus.unclaimed_accesses();
        if let Some(dma) = self.bus.find_dma_mut() {
            self.stats.dma_words_looped = dma.words_looped();
        }
    }
}
