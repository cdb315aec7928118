//! Message-signaled interrupt aggregation.
//!
//! Collects named interrupt lines from heterogeneous subsystems and places
//! each onto a fixed vector slot in one shared multi-source channel. It
//! provides:
//! 1. **Attachment:** `attach` wires a named line to bit position
//!    `registry.interrupt_index(name)`. Attaching the same name twice is a
//!    composition error — the modeled hardware silently discarded the first
//!    wiring, which is upgraded here to fail fast.
//! 2. **Aggregation:** Per-cycle sampling latches every attached line into
//!    the channel and emits one event per rising bit, with vector number
//!    equal to bit position.
//!
//! The aggregated channel is read-only downstream; after composition the
//! name-to-vector map never changes.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::common::ConfigError;
use crate::registry::ResourceRegistry;
use crate::soc::traits::InterruptLine;

/// Widest channel the single hardware interrupt signal can carry.
const MAX_VECTORS: usize = 32;

/// One message-signaled interrupt event.
///
/// Carried to the transport layer; the vector number equals the bit
/// position of the line that rose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MsiEvent {
    /// Vector slot of the source line.
    pub vector: usize,
}

/// Many-to-one aggregator from named lines to the shared vector channel.
#[derive(Clone, Debug)]
pub struct MsiAggregator {
    width: usize,
    by_name: BTreeMap<String, usize>,
    level: u32,
    prev: u32,
}

impl MsiAggregator {
    /// Creates the aggregator sized to the registry's interrupt table.
    ///
    /// # Errors
    ///
    /// [`ConfigError::TooManyVectors`] if the table needs more slots than
    /// the channel carries.
    pub fn new(registry: &ResourceRegistry) -> Result<Self, ConfigError> {
        let width = registry.interrupt_count();
        if width > MAX_VECTORS {
            return Err(ConfigError::TooManyVectors {
                count: width,
                max: MAX_VECTORS,
            });
        }
        Ok(Self {
            width,
            by_name: BTreeMap::new(),
            level: 0,
            prev: 0,
        })
    }

    /// Wires the named line into its registered vector slot.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateAttach`] if the name is already wired;
    /// [`ConfigError::UnknownResource`] if the registry holds no vector for
    /// it.
    pub fn attach(&mut self, name: &str, registry: &ResourceRegistry) -> Result<(), ConfigError> {
        if self.by_name.contains_key(name) {
            return Err(ConfigError::DuplicateAttach {
                name: name.to_owned(),
            });
        }
        let vector = registry.interrupt_index(name)?;
        debug!(name, vector, "interrupt line attached");
        let _ = self.by_name.insert(name.to_owned(), vector);
        Ok(())
    }

    /// Drives one named line's current level into the channel.
    ///
    /// Lines that were never attached are ignored: they have no slot in the
    /// channel.
    pub fn drive(&mut self, line: InterruptLine) {
        if let Some(&vector) = self.by_name.get(line.source) {
            if line.level {
                self.level |= 1 << vector;
            } else {
                self.level &= !(1 << vector);
            }
        }
    }

    /// Latches the cycle's levels and emits one event per rising bit.
    pub fn sample(&mut self) -> Vec<MsiEvent> {
        let rising = self.level & !self.prev;
        self.prev = self.level;
        if rising == 0 {
            return Vec::new();
        }
        let events: Vec<MsiEvent> = (0..self.width)
            .filter(|&v| rising & (1 << v) != 0)
            .map(|vector| MsiEvent { vector })
            .collect();
        trace!(mask = format_args!("{rising:#06b}"), "MSI events raised");
        events
    }

    /// Returns the aggregated channel as a bitmask (read-only downstream).
    pub fn pending(&self) -> u32 {
        self.level
    }

    /// Returns the channel width in vector slots.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the vector a name was attached to, if any.
    pub fn vector_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }
}
