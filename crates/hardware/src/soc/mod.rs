//! System-on-Chip components.
//!
//! This module organizes the parts of the composed fabric that sit on the
//! stable, reset-sequenced domains: the register bus, the transport bridge,
//! the interrupt aggregator, the CSR devices, and the builder that assembles
//! the system.

/// System builder for assembling the fabric.
pub mod builder;

/// Transport-to-bus bridge with clock-domain-crossing queues.
pub mod bridge;

/// CSR-mapped device implementations.
pub mod devices;

/// Register bus interconnect and routing.
pub mod interconnect;

/// Message-signaled interrupt aggregation.
pub mod msi;

/// SDRAM module geometry and timing definitions.
pub mod sdram;

/// Device trait definitions for CSR access.
pub mod traits;

pub use builder::System;
