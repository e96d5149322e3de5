//! Output regulation settings (VO_REG and IO_REG)
//!
//! Both registers are retained when the rectifier drops below V_UVLO, unlike
//! the status and mailbox RAM.

use crate::units;

/// Output current limit as a fraction of the resistor-programmed I_ILIM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CurrentLimit {
    /// 10 %
    Percent10 = 0,
    /// 20 %
    Percent20 = 1,
    /// 30 %
    Percent30 = 2,
    /// 40 %
    Percent40 = 3,
    /// 50 %
    Percent50 = 4,
    /// 60 %
    Percent60 = 5,
    /// 90 %
    Percent90 = 6,
    /// 100 % (factory default)
    #[default]
    Percent100 = 7,
}

impl CurrentLimit {
    /// Decode a 3-bit I_ILIM code; bits above the field are ignored
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => Self::Percent10,
            1 => Self::Percent20,
            2 => Self::Percent30,
            3 => Self::Percent40,
            4 => Self::Percent50,
            5 => Self::Percent60,
            6 => Self::Percent90,
            _ => Self::Percent100,
        }
    }

    /// Register code
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Limit in percent
    pub const fn percent(self) -> u8 {
        units::ilim_percent(self as u8)
    }
}

/// Output regulation settings read in one transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputConfig {
    /// Raw 3-bit VO_REG code
    pub vo_reg_code: u8,
    /// Current limit
    pub current_limit: CurrentLimit,
}

impl OutputConfig {
    /// VO_REG target in millivolts
    pub const fn vo_reg_millivolts(&self) -> u16 {
        units::vo_reg_millivolts(self.vo_reg_code)
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            vo_reg_code: 1,
            current_limit: CurrentLimit::Percent100,
        }
    }
}

/// Snapshot of the output status RAM
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputStatus {
    /// Rectifier voltage in volts
    pub vrect: f32,
    /// Output voltage in volts
    pub vout: f32,
    /// Received power in watts
    pub received_power: f32,
}
