//! Transport result normalization
//!
//! Byte-transfer backends report success in different ways: some return a
//! plain `bool`, some an enumerated status code with an "OK" sentinel, and
//! `embedded-hal` buses return `Result`. [`TransferStatus::is_success`] is the
//! single predicate that decides success for all of them. The rest of the
//! driver never inspects a raw status; it only sees `Result<_, Error<E>>`.
//!
//! Backends that speak in status codes implement [`ByteTransport`] and are
//! wrapped in [`StatusInterface`](crate::interface::StatusInterface) to become
//! a register interface.

use core::fmt;

/// Success predicate over a backend-specific transfer result
pub trait TransferStatus {
    /// Whether the transfer succeeded
    ///
    /// On failure any read buffer contents are undefined.
    fn is_success(&self) -> bool;
}

impl TransferStatus for bool {
    fn is_success(&self) -> bool {
        *self
    }
}

impl<E> TransferStatus for Result<(), E> {
    fn is_success(&self) -> bool {
        self.is_ok()
    }
}

/// Normalize any backend status to a success flag
pub fn is_success<S: TransferStatus>(status: &S) -> bool {
    status.is_success()
}

/// Enumerated bus status, as returned by common MCU I2C cores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusCode {
    /// Transfer completed
    Ok = 0,
    /// Data did not fit the transmit buffer
    DataTooLong = 1,
    /// Address byte was not acknowledged
    NackAddress = 2,
    /// A data byte was not acknowledged
    NackData = 3,
    /// Other bus error
    Other = 4,
    /// Transfer timed out
    Timeout = 5,
    /// Bus busy
    Busy = 6,
}

impl TransferStatus for StatusCode {
    fn is_success(&self) -> bool {
        *self == Self::Ok
    }
}

impl TryFrom<u8> for StatusCode {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Ok),
            1 => Ok(Self::DataTooLong),
            2 => Ok(Self::NackAddress),
            3 => Ok(Self::NackData),
            4 => Ok(Self::Other),
            5 => Ok(Self::Timeout),
            6 => Ok(Self::Busy),
            other => Err(other),
        }
    }
}

/// Addressed byte-block transport that reports a status code per transfer
///
/// Bus bring-up, clocking and any retry policy are the implementor's concern.
pub trait ByteTransport {
    /// Backend-specific transfer result
    type Status: TransferStatus;

    /// Bring up the bus
    fn init(&mut self) -> Self::Status;

    /// Read `buffer.len()` contiguous bytes starting at register `address`
    fn request_read_bytes(&mut self, address: u8, buffer: &mut [u8]) -> Self::Status;

    /// Write `buffer` to contiguous registers starting at `address`
    fn write_bytes(&mut self, address: u8, buffer: &[u8]) -> Self::Status;
}

/// A transfer that failed, carrying the backend status that reported it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransferFailed<S>(pub S);

impl<S: fmt::Debug> fmt::Display for TransferFailed<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transfer failed with status {:?}", self.0)
    }
}

/// Convert a raw status into a `Result`, keeping the failing status
pub fn check<S: TransferStatus>(status: S) -> Result<(), TransferFailed<S>> {
    if status.is_success() {
        Ok(())
    } else {
        Err(TransferFailed(status))
    }
}
