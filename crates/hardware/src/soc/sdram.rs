//! SDRAM module geometry and timing definitions.
//!
//! The DRAM controller's internal training and arbitration are out of scope;
//! the fabric's only obligation is to hand the controller a stable clock
//! domain and a reset, and to register the attached module's geometry and
//! timing parameters verbatim. This module holds those parameters.

/// Addressing geometry of an SDRAM module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeomSettings {
    /// Bank address bits.
    pub bank_bits: u32,
    /// Row address bits.
    pub row_bits: u32,
    /// Column address bits.
    pub col_bits: u32,
}

/// Timing parameters of an SDRAM module, in controller cycles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimingSettings {
    /// Row precharge time.
    pub t_rp: u32,
    /// Row-to-column delay.
    pub t_rcd: u32,
    /// Write recovery time.
    pub t_wr: u32,
    /// Write-to-read turnaround.
    pub t_wtr: u32,
    /// Refresh interval.
    pub t_refi: u32,
    /// Refresh cycle time.
    pub t_rfc: u32,
}

/// One attachable SDRAM part: name, clocking ratio, geometry, and timing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SdramModule {
    /// Manufacturer part name.
    pub name: &'static str,
    /// Controller-to-memory clocking ratio.
    pub rate: &'static str,
    /// Addressing geometry.
    pub geom: GeomSettings,
    /// Timing parameters at the controller clock.
    pub timing: TimingSettings,
}

impl SdramModule {
    /// The MT41J128M16 DDR3 part (128M x 16) at 1:4 clocking.
    pub fn mt41j128m16() -> Self {
        Self {
            name: "MT41J128M16",
            rate: "1:4",
            geom: GeomSettings {
                bank_bits: 3,
                row_bits: 14,
                col_bits: 10,
            },
            timing: TimingSettings {
                t_rp: 2,
                t_rcd: 2,
                t_wr: 2,
                t_wtr: 2,
                t_refi: 782,
                t_rfc: 16,
            },
        }
    }
}
