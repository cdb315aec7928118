//! SoC fabric composition and simulation library.
//!
//! This crate implements a cycle-accurate model of a PCIe-attached SoC
//! fabric with the following:
//! 1. **Clocking:** A frequency synthesizer deriving independently clocked
//!    domains from one reference, per-domain reset sequencing, and a
//!    one-shot calibration gate.
//! 2. **Registry:** A static, composition-time-checked mapping from
//!    subsystem name to CSR address slot and interrupt vector slot.
//! 3. **SoC:** Register bus, transport-to-bus bridge with explicit
//!    clock-domain-crossing queues, MSI aggregation, and CSR devices
//!    including a loopback-wired DMA engine.
//! 4. **Simulation:** A multi-clock edge scheduler and top-level simulator.
//!
//! Everything is composed once at startup; composition failures (slot
//! collisions, unrealizable PLL parameters, miswired interrupts) abort with
//! a [`ConfigError`], and the running model's tick paths are infallible.

/// Clock and reset domain coordination.
pub mod clocking;
/// Common types and the composition error.
pub mod common;
/// Composition configuration (defaults, hierarchical config structures).
pub mod config;
/// Resource and interrupt slot registry.
pub mod registry;
/// Simulation driver (scheduler and simulator).
pub mod sim;
/// System-on-chip components (bus, bridge, MSI, devices, builder).
pub mod soc;
/// Run statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Composition-time error type.
pub use crate::common::ConfigError;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
/// Top-level composed fabric; construct with `System::new`.
pub use crate::soc::System;
