//! DDR PHY calibration and geometry registers.
//!
//! The PHY's training algorithm is out of scope; this bank exposes the fixed
//! calibration constants, the geometry and timing of the attached SDRAM
//! module (registered verbatim at composition), and the state of the
//! calibration gate holding the delay-control circuit.
//!
//! # Registers
//!
//! * `0x00`: BITSLIP calibration constant
//! * `0x04`: DELAY calibration constant
//! * `0x08`: CALIBRATED (delay-control circuit released)
//! * `0x0C`..`0x14`: bank/row/column address bits
//! * `0x18`..`0x2C`: tRP, tRCD, tWR, tWTR, tREFI, tRFC

use crate::soc::sdram::SdramModule;
use crate::soc::traits::Device;

/// DDR PHY device.
#[derive(Debug)]
pub struct DdrPhy {
    /// Base address of the CSR window.
    base_addr: u64,
    bitslip: u32,
    delay: u32,
    /// Whether the calibration gate has released the delay-control circuit.
    calibrated: bool,
    module: SdramModule,
}

impl DdrPhy {
    /// Creates the PHY bank, registering the module's parameters verbatim.
    ///
    /// # Arguments
    ///
    /// * `base_addr` - Base address of the CSR window.
    /// * `bitslip` - Read bitslip calibration constant.
    /// * `delay` - Read delay calibration constant.
    /// * `module` - SDRAM module whose geometry/timing this PHY serves.
    pub fn new(base_addr: u64, bitslip: u32, delay: u32, module: SdramModule) -> Self {
        Self {
            base_addr,
            bitslip,
            delay,
            calibrated: false,
            module,
        }
    }

    /// Drives the calibration-gate output into the status register.
    pub fn set_calibrated(&mut self, released: bool) {
        self.calibrated = released;
    }

    /// Returns the registered SDRAM module.
    pub fn module(&self) -> &SdramModule {
        &self.module
    }
}

impl Device for DdrPhy {
    fn name(&self) -> &str {
        "DDRPHY"
    }

    fn address_range(&self) -> (u64, u64) {
        (self.base_addr, 0x800)
    }

    fn read_u32(&mut self, offset: u64) -> u32 {
        match offset {
            0x00 => self.bitslip,
            0x04 => self.delay,
            0x08 => self.calibrated as u32,
            0x0C => self.module.geom.bank_bits,
            0x10 => self.module.geom.row_bits,
            0x14 => self.module.geom.col_bits,
            0x18 => self.module.timing.t_rp,
            0x1C => self.module.timing.t_rcd,
            0x20 => self.module.timing.t_wr,
            0x24 => self.module.timing.t_wtr,
            0x28 => self.module.timing.t_refi,
            0x2C => self.module.timing.t_rfc,
            _ => 0,
        }
    }

    /// All registers are read-only; writes are dropped.
    fn write_u32(&mut self, _offset: u64, _val: u32) {}

    fn as_ddrphy_mut(&mut self) -> Option<&mut DdrPhy> {
        Some(self)
    }
}
