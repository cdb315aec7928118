//! Configuration system for the fabric model.
//!
//! This module defines all configuration structures used to parameterize the
//! composition. It provides:
//! 1. **Defaults:** Baseline hardware constants (reference clock, PLL table,
//!    calibration delay, CSR geometry, bridge queue depth).
//! 2. **Structures:** Hierarchical config for system, PLL, and bridge.
//!
//! The defaults reproduce the board composition this model was written for:
//! a 50 MHz reference feeding a 1600 MHz VCO, five derived domains, and a
//! 125 MHz transport endpoint. Supply overrides as JSON via the CLI or use
//! `Config::default()`.

use serde::{Deserialize, Serialize};

/// Default configuration constants for the fabric model.
///
/// These values define the baseline hardware composition when not explicitly
/// overridden in a JSON configuration file.
pub mod defaults {
    /// Board reference oscillator frequency (50 MHz).
    pub const REF_CLK_HZ: u64 = 50_000_000;

    /// PLL feedback multiplier; with [`REF_CLK_HZ`] this places the VCO at
    /// 1600 MHz.
    pub const PLL_CLKFBOUT_MULT: u32 = 32;

    /// PLL input divider applied to the reference before the VCO.
    pub const PLL_DIVCLK_DIVIDE: u32 = 1;

    /// Reference cycles the PLL takes to settle before asserting `locked`.
    ///
    /// The device datasheet gives a worst-case settle time rather than a
    /// cycle count; 16 reference cycles keeps simulations short while still
    /// exercising the unlocked window.
    pub const PLL_LOCK_CYCLES: u64 = 16;

    /// Cycles of the calibration domain the calibration gate holds its
    /// dependent circuit in reset after the domain stabilizes.
    pub const CALIBRATION_DELAY_CYCLES: u32 = 15;

    /// Name of the domain hosting the calibration gate.
    pub const CALIBRATION_DOMAIN: &str = "clk200";

    /// Name of the system domain hosting the register bus and devices.
    pub const SYS_DOMAIN: &str = "sys";

    /// Base address of the CSR region in the memory map.
    pub const CSR_BASE: u64 = 0x0000_0000;

    /// Bytes spanned by one CSR slot; slot `n` decodes at
    /// `CSR_BASE + n * CSR_SLOT_BYTES`.
    pub const CSR_SLOT_BYTES: u64 = 0x800;

    /// Transport endpoint clock frequency (125 MHz, PCIe domain).
    pub const TRANSPORT_CLK_HZ: u64 = 125_000_000;

    /// Depth of each clock-domain-crossing FIFO in the transport bridge.
    pub const BRIDGE_FIFO_DEPTH: usize = 8;

    /// Identity string exposed by the identifier CSR bank.
    pub const IDENT: &str = "NeTV2 fabric model";

    /// DDR PHY bitslip calibration constant.
    pub const DDRPHY_BITSLIP: u32 = 2;

    /// DDR PHY read delay calibration constant.
    pub const DDRPHY_DELAY: u32 = 8;

    /// Bit of the free-running activity counter driven onto the user LED.
    pub const LED_COUNTER_BIT: u32 = 26;
}

/// One PLL output tap: a derived clock domain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PllOutputConfig {
    /// Domain name (e.g. `"sys"`, `"clk200"`).
    pub name: String,
    /// Output divider applied to the VCO frequency.
    pub divide: u32,
    /// Phase offset in degrees relative to the zero-phase outputs.
    #[serde(default)]
    pub phase_deg: f64,
    /// Whether this domain is exempt from reset sequencing.
    ///
    /// Reset-less domains are assumed stable once their source clock is
    /// stable and receive no sequencer at all.
    #[serde(default)]
    pub reset_less: bool,
}

/// PLL configuration: reference input, VCO parameters, and output table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PllConfig {
    /// Reference clock frequency in Hz.
    pub ref_clk_hz: u64,
    /// Input divider (`DIVCLK_DIVIDE`).
    pub divclk_divide: u32,
    /// Feedback multiplier (`CLKFBOUT_MULT`).
    pub clkfbout_mult: u32,
    /// Reference cycles until `locked` asserts.
    pub lock_cycles: u64,
    /// Output tap table; one derived clock domain per entry.
    pub outputs: Vec<PllOutputConfig>,
}

impl Default for PllConfig {
    /// Returns the board composition's PLL table.
    ///
    /// VCO at 1600 MHz; outputs: `sys` 100 MHz, `sys4x` 400 MHz (reset-less),
    /// `sys4x_dqs` 400 MHz at 90° (reset-less), `clk200` 200 MHz, and
    /// `clk50` passing the reference frequency through.
    fn default() -> Self {
        let out = |name: &str, divide: u32, phase_deg: f64, reset_less: bool| PllOutputConfig {
            name: name.to_owned(),
            divide,
            phase_deg,
            reset_less,
        };
        Self {
            ref_clk_hz: defaults::REF_CLK_HZ,
            divclk_divide: defaults::PLL_DIVCLK_DIVIDE,
            clkfbout_mult: defaults::PLL_CLKFBOUT_MULT,
            lock_cycles: defaults::PLL_LOCK_CYCLES,
            outputs: vec![
                out("sys", 16, 0.0, false),
                out("sys4x", 4, 0.0, true),
                out("sys4x_dqs", 4, 90.0, true),
                out("clk200", 8, 0.0, false),
                out("clk50", 32, 0.0, false),
            ],
        }
    }
}

/// System-level configuration: CSR geometry, identity, calibration delay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Base address of the CSR region.
    pub csr_base: u64,
    /// Bytes spanned by one CSR slot.
    pub csr_slot_bytes: u64,
    /// Identity string served by the identifier CSR bank.
    pub ident: String,
    /// Calibration gate delay in cycles of the calibration domain.
    pub calibration_delay: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            csr_base: defaults::CSR_BASE,
            csr_slot_bytes: defaults::CSR_SLOT_BYTES,
            ident: defaults::IDENT.to_owned(),
            calibration_delay: defaults::CALIBRATION_DELAY_CYCLES,
        }
    }
}

/// Transport bridge configuration: endpoint clock and crossing queue depth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Transport endpoint clock frequency in Hz.
    pub transport_clk_hz: u64,
    /// Depth of each clock-domain-crossing FIFO (requests and completions).
    pub fifo_depth: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            transport_clk_hz: defaults::TRANSPORT_CLK_HZ,
            fifo_depth: defaults::BRIDGE_FIFO_DEPTH,
        }
    }
}

/// Root configuration structure containing all composition settings.
///
/// # Examples
///
/// ```
/// use fabsim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.pll.ref_clk_hz, 50_000_000);
/// assert_eq!(config.system.calibration_delay, 15);
/// ```
///
/// Deserializing a partial override from JSON:
///
/// ```
/// use fabsim_core::config::Config;
///
/// let json = r#"{ "bridge": { "fifo_depth": 4 } }"#;
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.bridge.fifo_depth, 4);
/// assert_eq!(config.pll.clkfbout_mult, 32);
/// ```
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// System-level settings (CSR geometry, identity, calibration).
    pub system: SystemConfig,
    /// PLL reference and output table.
    pub pll: PllConfig,
    /// Transport bridge settings.
    pub bridge: BridgeConfig,
}
