//! Device variants and the register capabilities they imply
//!
//! The bq51 family shares one register map, but the smallest member
//! (bq51021) does not implement the RX ID readback block or the mode
//! indicator register. The variant is fixed when the driver is constructed
//! and the resulting [`Capabilities`] are computed once at that point.

use crate::registers::Register;

/// Members of the bq51 receiver family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// bq51222: dual-mode (WPC/PMA) receiver with I2C, full register set
    #[default]
    Bq51222,
    /// bq51221: dual-mode receiver, full register set
    Bq51221,
    /// bq51021: WPC-only receiver without RX ID or mode indicator registers
    Bq51021,
}

impl Variant {
    /// Register capabilities of this variant
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Self::Bq51222 | Self::Bq51221 => Capabilities::FULL,
            Self::Bq51021 => Capabilities {
                rx_id: false,
                mode_indicator: false,
            },
        }
    }

    /// Part number as printed on the package
    pub const fn part_number(self) -> &'static str {
        match self {
            Self::Bq51222 => "bq51222",
            Self::Bq51221 => "bq51221",
            Self::Bq51021 => "bq51021",
        }
    }
}

/// Optional register groups that only some variants implement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Capability {
    /// Factory-programmed 6-byte receiver identifier (0xF5..=0xFA)
    RxId,
    /// Mode indicator register (0xEF)
    ModeIndicator,
}

/// Capability flags for a device handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Capabilities {
    /// RX ID readback block is implemented
    pub rx_id: bool,
    /// Mode indicator register is implemented
    pub mode_indicator: bool,
}

impl Capabilities {
    /// Every optional register group present
    pub const FULL: Self = Self {
        rx_id: true,
        mode_indicator: true,
    };

    /// Whether the given capability is present
    pub const fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::RxId => self.rx_id,
            Capability::ModeIndicator => self.mode_indicator,
        }
    }

    /// Whether a register may be accessed on the bus
    pub const fn supports(&self, register: &Register) -> bool {
        match register.capability {
            Some(capability) => self.has(capability),
            None => true,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::FULL
    }
}
