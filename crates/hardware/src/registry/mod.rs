//! Resource and interrupt slot registry.
//!
//! A static, composition-time-checked mapping from subsystem name to CSR
//! address slot and to interrupt vector slot. It provides:
//! 1. **Base inheritance:** A reserved base map is merged before derived
//!    entries are checked; derived names shadow base names.
//! 2. **Uniqueness:** No two names may hold the same slot index in the same
//!    table; collisions abort composition with the offending name and index.
//! 3. **Immutability:** `build()` freezes the registry; there is no removal
//!    operation and no mutation after composition.
//!
//! The two tables occupy independent index spaces: `"dma"` may hold CSR slot
//! 21 while vector 21 stays free.

use std::collections::BTreeMap;

use tracing::debug;

use crate::common::{ConfigError, TableKind};

/// Reserved base CSR slots inherited by every composition.
///
/// Slots 0..=16 belong to the base system-on-chip; derived subsystems start
/// at 17.
pub const BASE_CSR_SLOTS: &[(&str, usize)] = &[
    ("crg", 0),
    ("uart_phy", 1),
    ("uart", 2),
    ("identifier_mem", 3),
    ("timer0", 4),
    ("buttons", 5),
    ("leds", 6),
    ("spiflash", 7),
    ("sdram", 8),
    ("l2_cache", 9),
    ("memtest", 10),
    ("ethphy", 11),
    ("ethmac", 12),
    ("analyzer", 13),
    ("icap", 14),
    ("flash", 15),
    ("info", 16),
];

/// Reserved base interrupt vector slots inherited by every composition.
pub const BASE_INTERRUPT_SLOTS: &[(&str, usize)] = &[("uart", 2), ("timer0", 3)];

/// Write-once builder for the registry tables.
///
/// Registration fails the moment an index collides with an existing entry in
/// the same table, so a bad composition is reported at the offending call
/// rather than at `build()`.
#[derive(Clone, Debug, Default)]
pub struct RegistryBuilder {
    csr: BTreeMap<String, usize>,
    interrupt: BTreeMap<String, usize>,
}

impl RegistryBuilder {
    /// Creates an empty builder with no reserved slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-seeded with the base CSR and interrupt slots.
    pub fn with_base() -> Self {
        let mut builder = Self::new();
        for &(name, index) in BASE_CSR_SLOTS {
            builder.csr.insert(name.to_owned(), index);
        }
        for &(name, index) in BASE_INTERRUPT_SLOTS {
            builder.interrupt.insert(name.to_owned(), index);
        }
        builder
    }

    /// Registers a subsystem's CSR address slot.
    ///
    /// A repeated name replaces its previous entry (derived entries take
    /// precedence over inherited ones); an index held by a different name is
    /// a fatal collision.
    ///
    /// # Errors
    ///
    /// [`ConfigError::IndexCollision`] naming the holder of the contested
    /// slot.
    pub fn csr(&mut self, name: &str, index: usize) -> Result<(), ConfigError> {
        Self::insert(&mut self.csr, TableKind::Csr, name, index)
    }

    /// Registers a subsystem's interrupt vector slot.
    ///
    /// Same precedence and collision rules as [`RegistryBuilder::csr`], in
    /// the independent vector index space.
    ///
    /// # Errors
    ///
    /// [`ConfigError::IndexCollision`] naming the holder of the contested
    /// slot.
    pub fn interrupt(&mut self, name: &str, index: usize) -> Result<(), ConfigError> {
        Self::insert(&mut self.interrupt, TableKind::Interrupt, name, index)
    }

    fn insert(
        table: &mut BTreeMap<String, usize>,
        kind: TableKind,
        name: &str,
        index: usize,
    ) -> Result<(), ConfigError> {
        let collision = table
            .iter()
            .find(|entry| *entry.1 == index && entry.0.as_str() != name);
        if let Some((holder, _)) = collision {
            return Err(ConfigError::IndexCollision {
                table: kind,
                name: name.to_owned(),
                index,
                holder: holder.clone(),
            });
        }
        let _ = table.insert(name.to_owned(), index);
        Ok(())
    }

    /// Freezes the tables into an immutable registry.
    pub fn build(self) -> ResourceRegistry {
        debug!(
            csr_entries = self.csr.len(),
            interrupt_entries = self.interrupt.len(),
            "registry frozen"
        );
        ResourceRegistry {
            csr: self.csr,
            interrupt: self.interrupt,
        }
    }
}

/// Frozen name-to-slot lookup tables.
///
/// Built once during composition; immutable for the lifetime of the device.
#[derive(Clone, Debug)]
pub struct ResourceRegistry {
    csr: BTreeMap<String, usize>,
    interrupt: BTreeMap<String, usize>,
}

impl ResourceRegistry {
    /// Returns the CSR address slot registered for `name`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownResource`] if the name was never registered.
    pub fn csr_index(&self, name: &str) -> Result<usize, ConfigError> {
        self.csr
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownResource {
                table: TableKind::Csr,
                name: name.to_owned(),
            })
    }

    /// Returns the interrupt vector slot registered for `name`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownResource`] if the name was never registered.
    pub fn interrupt_index(&self, name: &str) -> Result<usize, ConfigError> {
        self.interrupt
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownResource {
                table: TableKind::Interrupt,
                name: name.to_owned(),
            })
    }

    /// Returns the number of vector slots the interrupt channel must carry
    /// (highest registered vector plus one).
    pub fn interrupt_count(&self) -> usize {
        self.interrupt.values().max().map_or(0, |&i| i + 1)
    }

    /// Iterates over the CSR table in name order.
    pub fn csr_entries(&self) -> impl Iterator<Item = (&str, usize)> {
        self.csr.iter().map(|(n, i)| (n.as_str(), *i))
    }

    /// Iterates over the interrupt table in name order.
    pub fn interrupt_entries(&self) -> impl Iterator<Item = (&str, usize)> {
        self.interrupt.iter().map(|(n, i)| (n.as_str(), *i))
    }
}
