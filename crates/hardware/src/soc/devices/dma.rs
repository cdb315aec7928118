//! DMA engine with stream endpoints and loopback wiring.
//!
//! The engine's descriptor processing is out of scope; what is modeled is
//! its pair of data streams (an outbound source and an inbound sink), the
//! CSR bank that feeds and drains them, and the per-word interrupt pulses on
//! the `dma_reader` and `dma_writer` lines.
//!
//! # Registers
//!
//! * `0x00`: CTRL (bit 0: enable)
//! * `0x04`: STATUS (bit 0: loopback wired, bit 1: source non-empty,
//!   bit 2: sink non-empty)
//! * `0x08`: PUSH (write: enqueue one word onto the source stream)
//! * `0x0C`: POP (read: dequeue one word from the sink stream)
//! * `0x10`: LEVEL (sink occupancy)
//! * `0x14`: LOOPED (words carried through the loopback)

use std::collections::VecDeque;

use tracing::debug;

use crate::soc::traits::{Device, InterruptLine};

/// Offset of the control register.
const CTRL_OFFSET: u64 = 0x00;
/// Offset of the status register.
const STATUS_OFFSET: u64 = 0x04;
/// Offset of the source-stream push register.
const PUSH_OFFSET: u64 = 0x08;
/// Offset of the sink-stream pop register.
const POP_OFFSET: u64 = 0x0C;
/// Offset of the sink occupancy register.
const LEVEL_OFFSET: u64 = 0x10;
/// Offset of the loopback word counter.
const LOOPED_OFFSET: u64 = 0x14;

/// DMA engine device.
pub struct DmaEngine {
    /// Base address of the CSR window.
    base_addr: u64,
    /// Whether the source stream is wired back to the sink.
    ///
    /// Set once at composition; there is no runtime mode switch. A
    /// loopback-wired engine cannot perform real outbound transfer without
    /// recomposition.
    loopback: bool,
    /// CSR-controlled enable; gates stream movement.
    enable: bool,
    /// Outbound data stream (reader output).
    source: VecDeque<u32>,
    /// Inbound data stream (writer input).
    sink: VecDeque<u32>,
    reader_irq: bool,
    writer_irq: bool,
    words_looped: u64,
}

impl std::fmt::Debug for DmaEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DmaEngine")
            .field("loopback", &self.loopback)
            .field("enable", &self.enable)
            .field("source", &self.source.len())
            .field("sink", &self.sink.len())
            .field("words_looped", &self.words_looped)
            .finish()
    }
}

impl DmaEngine {
    /// Creates the engine with empty streams and no loopback wiring.
    ///
    /// # Arguments
    ///
    /// * `base_addr` - Base address of the CSR window.
    pub fn new(base_addr: u64) -> Self {
        Self {
            base_addr,
            loopback: false,
            enable: false,
            source: VecDeque::new(),
            sink: VecDeque::new(),
            reader_irq: false,
            writer_irq: false,
            words_looped: 0,
        }
    }

    /// Wires the source stream back to the sink stream.
    ///
    /// A static composition decision for self-test without external
    /// hardware.
    pub fn connect_loopback(&mut self) {
        self.loopback = true;
        debug!("DMA loopback wired");
    }

    /// Returns whether the loopback wiring is in place.
    pub fn loopback_wired(&self) -> bool {
        self.loopback
    }

    /// Returns the number of words carried through the loopback so far.
    pub fn words_looped(&self) -> u64 {
        self.words_looped
    }

    /// Enqueues one word onto the source stream directly (test harness
    /// path; equivalent to a PUSH register write).
    pub fn push_source(&mut self, word: u32) {
        self.source.push_back(word);
    }

    /// Dequeues one word from the sink stream, if any.
    pub fn pop_sink(&mut self) -> Option<u32> {
        self.sink.pop_front()
    }
}

impl Device for DmaEngine {
    fn name(&self) -> &str {
        "DMA"
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, 0x800)
    }

    fn read_u32(&mut self, offset: u64) -> u32 {
        match offset {
            CTRL_OFFSET => self.enable as u32,
            STATUS_OFFSET => {
                (self.loopback as u32)
                    | ((!self.source.is_empty() as u32) << 1)
                    | ((!self.sink.is_empty() as u32) << 2)
            }
            POP_OFFSET => self.sink.pop_front().unwrap_or(0),
            LEVEL_OFFSET => self.sink.len() as u32,
            LOOPED_OFFSET => self.words_looped as u32,
            _ => 0,
        }
    }

    fn write_u32(&mut self, offset: u64, val: u32) {
        match offset {
            CTRL_OFFSET => self.enable = val & 1 != 0,
            PUSH_OFFSET => self.source.push_back(val),
            _ => {}
        }
    }

    /// Advances the engine by one sys cycle.
    ///
    /// Interrupt lines pulse for one cycle per word: `dma_reader` when a
    /// word leaves the source stream, `dma_writer` when it lands in the
    /// sink.
    fn tick(&mut self) {
        self.reader_irq = false;
        self.writer_irq = false;
        if !(self.enable && self.loopback) {
            return;
        }
        if let Some(word) = self.source.pop_front() {
            self.sink.push_back(word);
            self.words_looped += 1;
            self.reader_irq = true;
            self.writer_irq = true;
        }
    }

    fn irq_lines(&self) -> Vec<InterruptLine> {
        vec![
            InterruptLine {
                source: "dma_writer",
                level: self.writer_irq,
            },
            InterruptLine {
                source: "dma_reader",
                level: self.reader_irq,
            },
        ]
    }

    fn as_dma_mut(&mut self) -> Option<&mut DmaEngine> {
        Some(self)
    }
}
