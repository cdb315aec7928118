//! Composition-time error definitions.
//!
//! Every failure mode in this crate occurs while the system is being
//! composed: registry slot collisions, unrealizable PLL parameters, and
//! miswired interrupt lines. It provides:
//! 1. **`ConfigError`:** The single error type returned by every fallible
//!    constructor and builder method.
//! 2. **`TableKind`:** Identifies which registry table an error refers to.
//!
//! Once a [`System`](crate::soc::System) is built, the per-cycle tick paths
//! are infallible; there is no runtime error recovery surface.

use std::fmt;

use thiserror::Error;

/// Identifies one of the two registry tables.
///
/// The CSR (address slot) table and the interrupt (vector slot) table share
/// the same uniqueness rules but occupy independent index spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    /// Address-slot table: subsystem name to CSR slot index.
    Csr,
    /// Interrupt-slot table: subsystem name to vector index.
    Interrupt,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csr => write!(f, "csr"),
            Self::Interrupt => write!(f, "interrupt"),
        }
    }
}

/// Errors raised while composing the system.
///
/// All variants are fatal: composition aborts and the partially built system
/// is discarded. None of these can occur after `System::new` returns.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Two distinct subsystem names claim the same slot index in one table.
    #[error("{table} slot {index} requested for \"{name}\" is already held by \"{holder}\"")]
    IndexCollision {
        /// Table in which the collision occurred.
        table: TableKind,
        /// Name whose registration failed.
        name: String,
        /// The contested slot index.
        index: usize,
        /// Name already occupying the slot.
        holder: String,
    },

    /// A lookup referenced a name never registered in the given table.
    #[error("no {table} slot registered for \"{name}\"")]
    UnknownResource {
        /// Table that was searched.
        table: TableKind,
        /// The unknown subsystem name.
        name: String,
    },

    /// A PLL parameter falls outside what the oscillator can realize.
    #[error("PLL parameter {param} = {value} outside realizable range {min}..={max}")]
    PllParamOutOfRange {
        /// Parameter name (e.g. `CLKFBOUT_MULT`).
        param: &'static str,
        /// The rejected value.
        value: i64,
        /// Lower bound, inclusive.
        min: i64,
        /// Upper bound, inclusive.
        max: i64,
    },

    /// The derived VCO frequency is outside the device operating band.
    #[error("VCO frequency {vco_hz} Hz outside operating band {min_hz}..={max_hz} Hz")]
    VcoOutOfRange {
        /// Derived VCO frequency.
        vco_hz: u64,
        /// Lower band edge, inclusive.
        min_hz: u64,
        /// Upper band edge, inclusive.
        max_hz: u64,
    },

    /// A named interrupt line was attached to the aggregator twice.
    ///
    /// The source design silently discarded the first wiring; here a second
    /// attach is rejected so a miswired composition cannot pass unnoticed.
    #[error("interrupt line \"{name}\" attached twice")]
    DuplicateAttach {
        /// Name of the doubly attached line.
        name: String,
    },

    /// The interrupt table needs more vectors than the channel carries.
    #[error("interrupt table needs {count} vectors but the channel carries at most {max}")]
    TooManyVectors {
        /// Vectors required by the registry.
        count: usize,
        /// Channel width limit.
        max: usize,
    },
}
