//! Bus interface implementations for the bq51 family
//!
//! This module provides implementations of the `device-driver` register
//! interface traits over two kinds of backend:
//!
//! - [`I2cInterface`]: any `embedded-hal` (or `embedded-hal-async`) I2C bus
//! - [`StatusInterface`]: any [`ByteTransport`] that reports a status code per
//!   transfer, normalized through [`TransferStatus`](crate::status::TransferStatus)

use crate::I2C_ADDRESS;
use crate::registers::RX_ID_LEN;
use crate::status::{self, ByteTransport, TransferFailed};
use device_driver::RegisterInterface;

/// Largest single transfer: the RX ID block
const MAX_TRANSFER: usize = RX_ID_LEN;

/// I2C interface for the bq51
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface at the factory address (0x6C)
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let mut receiver = Bq51Driver::new(interface, Variant::Bq51222);
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS,
        }
    }

    /// Create a new I2C interface with a custom device address
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    /// * `address` - The 7-bit I2C device address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// 7-bit device address used for every transfer
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

/// Prefix `write_data` with the register address
///
/// Returns `None` when the data does not fit one framed transfer.
fn frame(address: u8, write_data: &[u8], buffer: &mut [u8; MAX_TRANSFER + 1]) -> Option<usize> {
    let len = write_data.len();
    if len > MAX_TRANSFER {
        return None;
    }
    buffer[0] = address;
    buffer[1..=len].copy_from_slice(write_data);
    Some(len)
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut buffer = [0u8; MAX_TRANSFER + 1];
        match frame(address, write_data, &mut buffer) {
            Some(len) => self.i2c.write(self.address, &buffer[..=len]),
            // adjacent write operations go out as one transfer with no restart
            None => self.i2c.transaction(
                self.address,
                &mut [
                    embedded_hal::i2c::Operation::Write(&[address]),
                    embedded_hal::i2c::Operation::Write(write_data),
                ],
            ),
        }
    }
}

#[cfg(feature = "async")]
impl<I2C, E> device_driver::AsyncRegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.i2c
            .write_read(self.address, &[address], read_data)
            .await
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let mut buffer = [0u8; MAX_TRANSFER + 1];
        match frame(address, write_data, &mut buffer) {
            Some(len) => self.i2c.write(self.address, &buffer[..=len]).await,
            None => {
                self.i2c
                    .transaction(
                        self.address,
                        &mut [
                            embedded_hal_async::i2c::Operation::Write(&[address]),
                            embedded_hal_async::i2c::Operation::Write(write_data),
                        ],
                    )
                    .await
            }
        }
    }
}

/// Register interface over a status-code [`ByteTransport`]
///
/// Every transfer status is passed through the success predicate; a failing
/// status surfaces as [`TransferFailed`] carrying the backend's own code.
pub struct StatusInterface<T> {
    transport: T,
}

impl<T: ByteTransport> StatusInterface<T> {
    /// Wrap a byte transport
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Bring up the underlying bus
    pub fn init(&mut self) -> Result<(), TransferFailed<T::Status>> {
        status::check(self.transport.init())
    }

    /// Consume the interface and return the transport
    pub fn release(self) -> T {
        self.transport
    }
}

impl<T: ByteTransport> RegisterInterface for StatusInterface<T> {
    type Error = TransferFailed<T::Status>;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        status::check(self.transport.request_read_bytes(address, read_data))
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        status::check(self.transport.write_bytes(address, write_data))
    }
}

#[cfg(feature = "async")]
impl<T: ByteTransport> device_driver::AsyncRegisterInterface for StatusInterface<T> {
    type Error = TransferFailed<T::Status>;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        status::check(self.transport.request_read_bytes(address, read_data))
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        _size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        status::check(self.transport.write_bytes(address, write_data))
    }
}
