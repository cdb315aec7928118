//! CSR-mapped devices.
//!
//! This module contains the devices hosted on the register bus: the DMA
//! engine with its loopback wiring, the DDR PHY's calibration registers, the
//! device DNA and sensor blocks, the identity ROM, and the LED controller.

/// DDR PHY calibration and geometry registers.
pub mod ddrphy;

/// DMA engine with stream endpoints and loopback wiring.
pub mod dma;

/// Device DNA (unique identifier) block.
pub mod dna;

/// Identity string ROM.
pub mod identifier;

/// User LED controller with its owned activity counter.
pub mod leds;

/// On-die sensor block (temperature and supply voltages).
pub mod xadc;

pub use ddrphy::DdrPhy;
pub use dma::DmaEngine;
pub use dna::Dna;
pub use identifier::Identifier;
pub use leds::LedController;
pub use xadc::Xadc;

pub use crate::soc::traits::{Device, InterruptLine};
