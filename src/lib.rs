#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod macros;

pub mod device;
pub mod diagnostics;
pub mod fod;
pub mod interface;
pub mod output;
pub mod packet;
pub mod power;
pub mod registers;
pub mod status;
pub mod units;
pub mod variant;

// Re-export main types
pub use device::Bq51Driver;
pub use diagnostics::{Diagnostic, DiagnosticHook};
pub use fod::{EsrScale, FodConfig};
pub use interface::{I2cInterface, StatusInterface};
pub use output::{CurrentLimit, OutputConfig, OutputStatus};
pub use packet::{MailboxStatus, PacketError, ProprietaryPacket};
pub use power::{ChargeProtocol, ModeIndicator, PowerState, UVLO_VOLTS};
pub use registers::{BitField, Register};
pub use status::{ByteTransport, StatusCode, TransferFailed, TransferStatus};
pub use variant::{Capabilities, Capability, Variant};

/// Factory 7-bit I2C address of the bq51222 / bq51221 / bq51021
pub const I2C_ADDRESS: u8 = 0x6C;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device; read buffers were not interpreted
    Bus(E),
    /// Write attempted on a read-only register (contains the address)
    ReadOnlyRegister(u8),
    /// Block write longer than the largest register block (contains the length)
    InvalidLength(usize),
    /// The device did not report completion of a proprietary packet in time
    PacketTimeout,
}

impl<E> Error<E> {
    /// Whether this is a transport failure
    pub const fn is_bus(&self) -> bool {
        matches!(self, Self::Bus(_))
    }
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}

/// Result of every driver operation
pub type OperationResult<T, E> = Result<T, Error<E>>;
