//! Power-rail inference and mode indication
//!
//! Most of the bq51 register file is held in reset while the rectifier
//! voltage (V_RECT) sits below the undervoltage lockout threshold (V_UVLO).
//! Whether the receiver is actually powered by a transmitter is therefore
//! inferred from two correlated signals:
//!
//! 1. The RX ID readback block reads as all ones (the idle bus level) while
//!    the device is below lockout, so six `0xFF` bytes mean "unpowered".
//! 2. Otherwise V_RECT is read and compared against [`UVLO_VOLTS`].
//!
//! The RX ID check runs first because the V_RECT register is itself reset in
//! the unpowered state and would report a misleading value. Nothing is cached:
//! the rail can drop between any two calls, taking the volatile registers
//! with it.
//!
//! # Example
//!
//! ```ignore
//! # use bq51::{Bq51Driver, I2cInterface, PowerState, Variant};
//! # let mut receiver: Bq51Driver<I2cInterface<_>> = todo!();
//! match receiver.check_power()? {
//!     PowerState::Powered(vrect) => { /* transmitter present */ }
//!     PowerState::Unpowered => { /* registers 0xE0.. are at reset values */ }
//! }
//! # Ok::<(), bq51::Error<()>>(())
//! ```

use crate::registers::{MODE_IND_ALIGN, MODE_IND_MODE, RX_ID_LEN};
use crate::units;

/// Maximum undervoltage lockout threshold from the bq51222 datasheet, in volts
pub const UVLO_VOLTS: f32 = 2.9;

/// Value every RX ID byte reads as while the device is below lockout
pub const RX_ID_UNPOWERED: u8 = 0xFF;

/// Inferred state of the receiver's power rail
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    /// V_RECT below V_UVLO: no transmitter, volatile registers at reset values
    Unpowered,
    /// V_RECT above V_UVLO, carrying the measured rectifier voltage in volts
    Powered(f32),
}

impl PowerState {
    /// Whether the rail is above lockout
    pub const fn is_powered(&self) -> bool {
        matches!(self, Self::Powered(_))
    }

    /// Rectifier voltage, if powered
    pub const fn vrect(&self) -> Option<f32> {
        match self {
            Self::Powered(volts) => Some(*volts),
            Self::Unpowered => None,
        }
    }
}

/// Whether an RX ID readback carries the powered-off signature (all ones)
pub fn rx_id_is_unpowered(rx_id: &[u8; RX_ID_LEN]) -> bool {
    rx_id.iter().all(|&byte| byte == RX_ID_UNPOWERED)
}

/// Classify a raw V_RECT status byte against the lockout threshold
pub fn classify_vrect(raw: u8) -> PowerState {
    let volts = units::raw_to_volts(raw);
    if volts < UVLO_VOLTS {
        PowerState::Unpowered
    } else {
        PowerState::Powered(volts)
    }
}

/// Wireless power protocol the receiver is operating under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChargeProtocol {
    /// Wireless Power Consortium (Qi)
    #[default]
    Wpc,
    /// Power Matters Alliance
    Pma,
}

/// Decoded mode indicator register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModeIndicator {
    /// Alignment mode active (otherwise normal operation)
    pub alignment_mode: bool,
    /// Active protocol
    pub protocol: ChargeProtocol,
}

impl ModeIndicator {
    /// Decode a mode indicator byte
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            alignment_mode: MODE_IND_ALIGN.extract(bits) != 0,
            protocol: if MODE_IND_MODE.extract(bits) != 0 {
                ChargeProtocol::Pma
            } else {
                ChargeProtocol::Wpc
            },
        }
    }
}
