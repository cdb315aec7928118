//! Register bus interconnect for CSR access.
//!
//! This module implements the bus that routes address accesses to devices.
//! It provides:
//! 1. **Device registration:** Devices are added by address range and sorted
//!    for lookup.
//! 2. **Access routing:** 32-bit read/write by address with a last-device
//!    hint for throughput; byte enables are applied here as read-modify-write
//!    so devices only ever see whole words.
//! 3. **Tick and IRQ:** Each device is ticked once per bus-domain cycle and
//!    its named interrupt lines are collected for aggregation.
//!
//! An access that no device claims reads as zero and drops writes — the
//! decode behavior the modeled hardware exhibits — but is logged and counted
//! because silent misrouting is a known design risk of the address map.

use tracing::warn;

use super::traits::{Device, InterruptLine};
use crate::soc::devices::{DdrPhy, DmaEngine};

/// Register bus connecting the transport bridge to CSR devices.
///
/// Holds a sorted list of devices and an index hint pointing at the most
/// recently hit device, which serves the common burst-to-one-block pattern.
pub struct Bus {
    /// Registered CSR devices (boxed for dynamic dispatch).
    devices: Vec<Box<dyn Device + Send + Sync>>,
    last_device_idx: usize,
    /// Accesses that decoded to no device (reads and writes combined).
    unclaimed: u64,
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("devices", &self.devices.len())
            .field("unclaimed", &self.unclaimed)
            .finish()
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    /// Creates an empty bus; add devices with `add_device`.
    pub fn new() -> Self {
        Self {
            devices: Vec::new(),
            last_device_idx: 0,
            unclaimed: 0,
        }
    }

    /// Registers a device on the bus; devices are sorted by base address for
    /// lookup.
    ///
    /// # Arguments
    ///
    /// * `dev` - The device to add (must implement `Device` and be
    ///   `Send + Sync`).
    pub fn add_device(&mut self, dev: Box<dyn Device + Send + Sync>) {
        self.devices.push(dev);
        self.devices.sort_by_key(|d| d.address_range().0);
        self.last_device_idx = 0;
    }

    /// Returns the number of registered devices.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Returns whether the given address is claimed by any device.
    pub fn is_valid_address(&self, addr: u64) -> bool {
        self.devices.iter().any(|d| {
            let (start, size) = d.address_range();
            addr >= start && addr < start + size
        })
    }

    /// Returns accesses so far that decoded to no device.
    pub fn unclaimed_accesses(&self) -> u64 {
        self.unclaimed
    }

    /// Advances all devices by one cycle and collects their interrupt lines.
    ///
    /// # Returns
    ///
    /// Every named line reported by every device this cycle, in device
    /// address order.
    pub fn tick(&mut self) -> Vec<InterruptLine> {
        let mut lines = Vec::new();
        for dev in &mut self.devices {
            dev.tick();
            lines.extend(dev.irq_lines());
        }
        lines
    }

    fn find_device(&mut self, addr: u64) -> Option<(&mut Box<dyn Device + Send + Sync>, u64)> {
        if self.last_device_idx < self.devices.len() {
            let (start, size) = self.devices[self.last_device_idx].address_range();
            if addr >= start && addr < start + size {
                return Some((&mut self.devices[self.last_device_idx], addr - start));
            }
        }

        for (i, dev) in self.devices.iter_mut().enumerate() {
            let (start, size) = dev.address_range();
            if addr >= start && addr < start + size {
                self.last_device_idx = i;
                return Some((dev, addr - start));
            }
        }
        None
    }

    /// Reads one 32-bit register at the given address.
    ///
    /// Returns 0 if no device claims the address (logged and counted).
    pub fn read_u32(&mut self, addr: u64) -> u32 {
        if let Some((dev, offset)) = self.find_device(addr) {
            dev.read_u32(offset)
        } else {
            self.unclaimed += 1;
            warn!(addr = format_args!("{addr:#010x}"), "read from unclaimed address");
            0
        }
    }

    /// Writes one 32-bit register at the given address.
    ///
    /// No-op if no device claims the address (logged and counted).
    pub fn write_u32(&mut self, addr: u64, val: u32) {
        if let Some((dev, offset)) = self.find_device(addr) {
            dev.write_u32(offset, val);
        } else {
            self.unclaimed += 1;
            warn!(addr = format_args!("{addr:#010x}"), "write to unclaimed address");
        }
    }

    /// Writes a 32-bit value under a 4-bit byte-enable mask.
    ///
    /// Partial enables are resolved as read-modify-write here; devices only
    /// see whole-word accesses.
    ///
    /// # Arguments
    ///
    /// * `addr` - Target address.
    /// * `val` - Write data.
    /// * `byte_enable` - Bit `i` enables byte lane `i` (little-endian).
    pub fn write_u32_masked(&mut self, addr: u64, val: u32, byte_enable: u8) {
        if byte_enable & 0xF == 0xF {
            self.write_u32(addr, val);
            return;
        }
        if byte_enable & 0xF == 0 {
            return;
        }
        let mut mask = 0u32;
        for lane in 0..4 {
            if byte_enable & (1 << lane) != 0 {
                mask |= 0xFF << (lane * 8);
            }
        }
        let current = self.read_u32(addr);
        self.write_u32(addr, (current & !mask) | (val & mask));
    }

    /// Returns a mutable reference to the DMA engine if one is registered.
    pub fn find_dma_mut(&mut self) -> Option<&mut DmaEngine> {
        for dev in &mut self.devices {
            if let Some(dma) = dev.as_dma_mut() {
                return Some(dma);
            }
        }
        None
    }

    /// Returns a mutable reference to the DDR PHY if one is registered.
    pub fn find_ddrphy_mut(&mut self) -> Option<&mut DdrPhy> {
        for dev in &mut self.devices {
            if let Some(phy) = dev.as_ddrphy_mut() {
                return Some(phy);
            }
        }
        None
    }
}
