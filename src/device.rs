//! High-level driver API for the bq51 family
//!
//! [`Bq51Driver`] turns raw register-interface transfers into typed register
//! operations. Every access goes through a small set of primitives:
//!
//! - reads of registers the active [`Variant`] does not implement are
//!   short-circuited to a zero sentinel without touching the bus, and
//!   reported as a [`Diagnostic::UnsupportedRegister`]
//! - writes to read-only registers are rejected with
//!   [`Error::ReadOnlyRegister`]
//! - every byte written to the mailbox address has its reserved FOD scaler
//!   bit cleared
//! - a transport failure is reported as a [`Diagnostic::TransportFailure`]
//!   and returned as [`Error::Bus`] before any buffer is interpreted
//!
//! With the `async` feature the same API is exposed as `async fn`s over
//! [`device_driver::AsyncRegisterInterface`] instead of the blocking one.

use crate::diagnostics::{Diagnostic, DiagnosticHook};
use crate::fod::{EsrScale, FodConfig};
use crate::macros::{debug, trace, warn};
use crate::output::{CurrentLimit, OutputConfig, OutputStatus};
use crate::packet::{MailboxStatus, PacketError, ProprietaryPacket};
use crate::power::{self, ChargeProtocol, ModeIndicator, PowerState};
use crate::registers::{
    self, BitField, PACKET_PAYLOAD_LEN, RX_ID_LEN, FOD_ESR_ENABLE, FOD_ESR_SCALE, FOD_OFFSET,
    FOD_OFFSET_ENABLE, FOD_RAM, IO_REG, IO_REG_ILIM, IO_REG_RESERVED, MAILBOX, MAILBOX_ALIGN,
    MAILBOX_USER_PKT_DONE, MAILBOX_USER_PKT_ERR, MODE_IND, MODE_IND_ALIGN, MODE_IND_MODE,
    PACKET_PAYLOAD, REC_PWR_STATUS, RX_ID, USER_HEADER, VO_REG, VO_REG_RESERVED, VO_REG_TARGET,
    VOUT_STATUS, VRECT_STATUS,
};
use crate::units;
use crate::variant::{Capabilities, Variant};
use crate::{Error, OperationResult};

// Only import RegisterInterface when not using async feature
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

#[cfg(feature = "async")]
use device_driver::AsyncRegisterInterface;

/// Largest block transfer: the RX ID readback
const MAX_BLOCK: usize = RX_ID_LEN;

/// Total time to wait for USER_PKT_DONE after triggering a packet
const PACKET_TIMEOUT_MS: u32 = 100;

/// Interval between USER_PKT_DONE polls
const PACKET_POLL_MS: u32 = 1;

/// Reset image of VO_REG and IO_REG, written as one block at 0x01
const CONFIG_RESET: [u8; 2] = [VO_REG.default, IO_REG.default];

/// Reset image of MAILBOX, FOD_RAM and USER_HEADER, written as one block at 0xE0
const MAILBOX_RESET: [u8; 3] = [MAILBOX.default, FOD_RAM.default, USER_HEADER.default];

/// Reset image of the packet payload RAM
const PAYLOAD_RESET: [u8; PACKET_PAYLOAD_LEN] = [PACKET_PAYLOAD.default; PACKET_PAYLOAD_LEN];

/// Main driver for the bq51222 / bq51221 / bq51021
///
/// The driver owns its register interface and assumes it is the only master
/// touching the device: field writes are read-modify-write sequences with no
/// bus-level atomicity.
pub struct Bq51Driver<I> {
    interface: I,
    variant: Variant,
    capabilities: Capabilities,
    diagnostics: Option<DiagnosticHook>,
}

impl<I> Bq51Driver<I> {
    /// Create a driver for the given variant
    ///
    /// No bus traffic is issued; use [`connection_check`](Self::connection_check)
    /// to probe the device.
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// let mut receiver = Bq51Driver::new(interface, Variant::Bq51021);
    /// ```
    pub const fn new(interface: I, variant: Variant) -> Self {
        Self {
            interface,
            variant,
            capabilities: variant.capabilities(),
            diagnostics: None,
        }
    }

    /// Install a diagnostic hook
    ///
    /// The hook is called synchronously for every unsupported-register access
    /// and every transport failure.
    #[must_use]
    pub fn with_diagnostics(mut self, hook: DiagnosticHook) -> Self {
        self.diagnostics = Some(hook);
        self
    }

    /// Variant this driver was constructed for
    pub const fn variant(&self) -> Variant {
        self.variant
    }

    /// Register capabilities of the active variant
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Consume the driver and return the register interface
    pub fn release(self) -> I {
        self.interface
    }

    fn report(&self, diagnostic: Diagnostic) {
        if let Some(hook) = self.diagnostics {
            hook(&diagnostic);
        }
    }

    /// Whether a read of `len` bytes at `address` touches a register the
    /// variant lacks; reports the first such register
    fn gated(&self, address: u8, len: usize) -> bool {
        let missing = registers::overlapping(address, len)
            .find(|register| !self.capabilities.supports(register));
        if let Some(register) = missing {
            warn!(
                "{} not implemented on {}, returning sentinel",
                register.name,
                self.variant.part_number()
            );
            self.report(Diagnostic::UnsupportedRegister {
                variant: self.variant,
                register: register.name,
            });
            return true;
        }
        false
    }

    fn bus_error<E>(&self, address: u8, error: E) -> Error<E> {
        let register = registers::by_address(address).map_or("?", |register| register.name);
        warn!("transport failure at {:#x} ({})", address, register);
        self.report(Diagnostic::TransportFailure { register });
        Error::Bus(error)
    }
}

/// Validate a write and copy it into `buffer` with the write policy applied
///
/// Returns the number of bytes to send.
fn prepare_write<E>(
    address: u8,
    data: &[u8],
    buffer: &mut [u8; MAX_BLOCK],
) -> OperationResult<usize, E> {
    if data.len() > MAX_BLOCK {
        return Err(Error::InvalidLength(data.len()));
    }
    if let Some(register) = registers::overlapping(address, data.len()).find(|r| !r.is_writable())
    {
        return Err(Error::ReadOnlyRegister(register.address));
    }
    let len = data.len();
    buffer[..len].copy_from_slice(data);
    registers::sanitize_block(address, &mut buffer[..len]);
    Ok(len)
}

#[cfg(not(feature = "async"))]
impl<I> Bq51Driver<I>
where
    I: RegisterInterface<AddressType = u8>,
{
    // ==================== RAW ACCESS ====================

    /// Read one register byte
    ///
    /// Returns 0 without a bus transaction for registers the variant lacks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn read_register(&mut self, address: u8) -> OperationResult<u8, I::Error> {
        let mut byte = [0u8];
        self.read_block(address, &mut byte)?;
        Ok(byte[0])
    }

    /// Write one register byte
    ///
    /// A write to the mailbox has its reserved bit cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadOnlyRegister`] for a read-only address, or
    /// [`Error::Bus`] if the transfer fails.
    pub fn write_register(&mut self, address: u8, value: u8) -> OperationResult<(), I::Error> {
        self.write_block(address, &[value])
    }

    /// Read contiguous registers in one transaction
    ///
    /// If the range touches a register the variant lacks, `buffer` is zeroed
    /// and no bus transaction is issued.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails; `buffer` is then undefined.
    pub fn read_block(&mut self, address: u8, buffer: &mut [u8]) -> OperationResult<(), I::Error> {
        if self.gated(address, buffer.len()) {
            buffer.fill(0);
            return Ok(());
        }
        trace!("read {:#x} ({} bytes)", address, buffer.len());
        let size_bits = buffer.len() as u32 * 8;
        self.interface
            .read_register(address, size_bits, buffer)
            .map_err(|error| self.bus_error(address, error))
    }

    /// Write contiguous registers in one transaction
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] for more than six bytes,
    /// [`Error::ReadOnlyRegister`] if the range touches a read-only register,
    /// or [`Error::Bus`] if the transfer fails. Nothing is sent on the first two.
    pub fn write_block(&mut self, address: u8, data: &[u8]) -> OperationResult<(), I::Error> {
        let mut buffer = [0u8; MAX_BLOCK];
        let len = prepare_write::<I::Error>(address, data, &mut buffer)?;
        trace!("write {:#x} ({} bytes)", address, len);
        self.interface
            .write_register(address, len as u32 * 8, &buffer[..len])
            .map_err(|error| self.bus_error(address, error))
    }

    // ==================== FIELD CODEC ====================

    /// Read a bit field: one bus read, then `(byte & mask) >> shift`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn read_field(&mut self, field: BitField) -> OperationResult<u8, I::Error> {
        let byte = self.read_register(field.register.address)?;
        Ok(field.extract(byte))
    }

    /// Write a bit field with a read-modify-write of its register
    ///
    /// Bits outside the field are preserved, except the mailbox reserved bit
    /// which is always written as 0. Values wider than the field are truncated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadOnlyRegister`] for a field of a read-only
    /// register, or [`Error::Bus`] if either transfer fails.
    pub fn write_field(&mut self, field: BitField, value: u8) -> OperationResult<(), I::Error> {
        if !field.register.is_writable() {
            return Err(Error::ReadOnlyRegister(field.register.address));
        }
        let current = self.read_register(field.register.address)?;
        self.write_register(field.register.address, field.compose(current, value))
    }

    // ==================== OUTPUT CONFIGURATION ====================

    /// Read the raw VO_REG code (0..=7)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn vo_reg_code(&mut self) -> OperationResult<u8, I::Error> {
        self.read_field(VO_REG_TARGET)
    }

    /// Write the raw VO_REG code
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub fn set_vo_reg_code(&mut self, code: u8) -> OperationResult<(), I::Error> {
        self.write_field(VO_REG_TARGET, code)
    }

    /// Read the VO_REG target in millivolts
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn vo_reg_millivolts(&mut self) -> OperationResult<u16, I::Error> {
        Ok(units::vo_reg_millivolts(self.vo_reg_code()?))
    }

    /// Set the VO_REG target, clamped to 450..=800 mV and rounded to the
    /// nearest 50 mV step
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub fn set_vo_reg_millivolts(&mut self, millivolts: u16) -> OperationResult<(), I::Error> {
        self.set_vo_reg_code(units::vo_reg_code(millivolts))
    }

    /// Read the output current limit
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn current_limit(&mut self) -> OperationResult<CurrentLimit, I::Error> {
        Ok(CurrentLimit::from_bits(self.read_field(IO_REG_ILIM)?))
    }

    /// Set the output current limit
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub fn set_current_limit(&mut self, limit: CurrentLimit) -> OperationResult<(), I::Error> {
        self.write_field(IO_REG_ILIM, limit.bits())
    }

    /// Read VO_REG and IO_REG in a single two-byte transaction
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn read_output_config(&mut self) -> OperationResult<OutputConfig, I::Error> {
        let mut bytes = [0u8; 2];
        self.read_block(VO_REG.address, &mut bytes)?;
        Ok(OutputConfig {
            vo_reg_code: VO_REG_TARGET.extract(bytes[0]),
            current_limit: CurrentLimit::from_bits(IO_REG_ILIM.extract(bytes[1])),
        })
    }

    // ==================== MAILBOX / PROPRIETARY PACKETS ====================

    /// Read the whole mailbox byte
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn mailbox(&mut self) -> OperationResult<u8, I::Error> {
        self.read_register(MAILBOX.address)
    }

    /// Write the whole mailbox byte; the reserved bit is written as 0
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn set_mailbox(&mut self, value: u8) -> OperationResult<(), I::Error> {
        self.write_register(MAILBOX.address, value)
    }

    /// Read and decode the mailbox
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn read_mailbox_status(&mut self) -> OperationResult<MailboxStatus, I::Error> {
        Ok(MailboxStatus::from_bits(self.mailbox()?))
    }

    /// Trigger transmission of the loaded proprietary packet
    ///
    /// Writes 0 to USER_PKT_DONE; the bit reads back as 1 once sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub fn send_packet(&mut self) -> OperationResult<(), I::Error> {
        debug!("triggering proprietary packet");
        self.write_field(MAILBOX_USER_PKT_DONE, 0)
    }

    /// Whether no packet transmission is pending
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn packet_done(&mut self) -> OperationResult<bool, I::Error> {
        Ok(self.read_field(MAILBOX_USER_PKT_DONE)? != 0)
    }

    /// Outcome of the last proprietary packet transmission
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn packet_error(&mut self) -> OperationResult<PacketError, I::Error> {
        Ok(PacketError::from_bits(self.read_field(MAILBOX_USER_PKT_ERR)?))
    }

    /// Whether alignment aid mode is requested
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn alignment_aid(&mut self) -> OperationResult<bool, I::Error> {
        Ok(self.read_field(MAILBOX_ALIGN)? != 0)
    }

    /// Request or release alignment aid mode (CEP = 0 while set)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub fn set_alignment_aid(&mut self, enable: bool) -> OperationResult<(), I::Error> {
        self.write_field(MAILBOX_ALIGN, u8::from(enable))
    }

    /// Load header and payload, then trigger transmission
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub fn transmit_packet(&mut self, packet: &ProprietaryPacket) -> OperationResult<(), I::Error> {
        self.set_user_header(packet.header)?;
        self.set_packet_payload(&packet.payload)?;
        self.send_packet()
    }

    /// Poll until the device reports the packet sent, then return its outcome
    ///
    /// Polls every 1 ms for up to 100 ms.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PacketTimeout`] if USER_PKT_DONE never reads 1, or
    /// [`Error::Bus`] if a transfer fails.
    pub fn wait_for_packet<D>(&mut self, delay: &mut D) -> OperationResult<PacketError, I::Error>
    where
        D: embedded_hal::delay::DelayNs,
    {
        for _ in 0..(PACKET_TIMEOUT_MS / PACKET_POLL_MS) {
            let status = self.read_mailbox_status()?;
            if status.packet_done {
                debug!("proprietary packet done");
                return Ok(status.packet_error);
            }
            delay.delay_ms(PACKET_POLL_MS);
        }
        warn!("proprietary packet not sent within {} ms", PACKET_TIMEOUT_MS);
        Err(Error::PacketTimeout)
    }

    // ==================== FOREIGN OBJECT DETECTION ====================

    /// Read the whole FOD RAM byte
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn fod_ram(&mut self) -> OperationResult<u8, I::Error> {
        self.read_register(FOD_RAM.address)
    }

    /// Write the whole FOD RAM byte
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn set_fod_ram(&mut self, value: u8) -> OperationResult<(), I::Error> {
        self.write_register(FOD_RAM.address, value)
    }

    /// Read and decode the FOD configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn read_fod_config(&mut self) -> OperationResult<FodConfig, I::Error> {
        Ok(FodConfig::from_bits(self.fod_ram()?))
    }

    /// Write the full FOD configuration in one transfer
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn write_fod_config(&mut self, config: &FodConfig) -> OperationResult<(), I::Error> {
        self.set_fod_ram(config.bits())
    }

    /// Whether the ESR multiplier is applied
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn esr_enabled(&mut self) -> OperationResult<bool, I::Error> {
        Ok(self.read_field(FOD_ESR_ENABLE)? != 0)
    }

    /// Enable or disable the ESR multiplier
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub fn set_esr_enabled(&mut self, enable: bool) -> OperationResult<(), I::Error> {
        self.write_field(FOD_ESR_ENABLE, u8::from(enable))
    }

    /// Whether the offset power is applied
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn offset_enabled(&mut self) -> OperationResult<bool, I::Error> {
        Ok(self.read_field(FOD_OFFSET_ENABLE)? != 0)
    }

    /// Enable or disable the offset power
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub fn set_offset_enabled(&mut self, enable: bool) -> OperationResult<(), I::Error> {
        self.write_field(FOD_OFFSET_ENABLE, u8::from(enable))
    }

    /// Read the offset power code (0..=7)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn fod_offset(&mut self) -> OperationResult<u8, I::Error> {
        self.read_field(FOD_OFFSET)
    }

    /// Write the offset power code; values above 7 are truncated
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub fn set_fod_offset(&mut self, code: u8) -> OperationResult<(), I::Error> {
        self.write_field(FOD_OFFSET, code)
    }

    /// Read the offset power in watts
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn fod_offset_watts(&mut self) -> OperationResult<f32, I::Error> {
        Ok(units::raw_to_watts(self.fod_offset()?))
    }

    /// Read the ESR multiplier
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn esr_scale(&mut self) -> OperationResult<EsrScale, I::Error> {
        Ok(EsrScale::from_bits(self.read_field(FOD_ESR_SCALE)?))
    }

    /// Write the ESR multiplier
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub fn set_esr_scale(&mut self, scale: EsrScale) -> OperationResult<(), I::Error> {
        self.write_field(FOD_ESR_SCALE, scale.bits())
    }

    // ==================== PACKET RAM ====================

    /// Read the proprietary packet header
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn user_header(&mut self) -> OperationResult<u8, I::Error> {
        self.read_register(USER_HEADER.address)
    }

    /// Write the proprietary packet header
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn set_user_header(&mut self, header: u8) -> OperationResult<(), I::Error> {
        self.write_register(USER_HEADER.address, header)
    }

    /// Read the 4-byte packet payload
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn packet_payload(&mut self) -> OperationResult<[u8; PACKET_PAYLOAD_LEN], I::Error> {
        let mut payload = [0u8; PACKET_PAYLOAD_LEN];
        self.read_block(PACKET_PAYLOAD.address, &mut payload)?;
        Ok(payload)
    }

    /// Write the 4-byte packet payload in one transaction
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn set_packet_payload(
        &mut self,
        payload: &[u8; PACKET_PAYLOAD_LEN],
    ) -> OperationResult<(), I::Error> {
        self.write_block(PACKET_PAYLOAD.address, payload)
    }

    // ==================== STATUS ====================

    /// Read the raw rectifier voltage byte
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn vrect_raw(&mut self) -> OperationResult<u8, I::Error> {
        self.read_register(VRECT_STATUS.address)
    }

    /// Read the rectifier voltage in volts
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn vrect_volts(&mut self) -> OperationResult<f32, I::Error> {
        Ok(units::raw_to_volts(self.vrect_raw()?))
    }

    /// Read the raw output voltage byte
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn vout_raw(&mut self) -> OperationResult<u8, I::Error> {
        self.read_register(VOUT_STATUS.address)
    }

    /// Read the output voltage in volts
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn vout_volts(&mut self) -> OperationResult<f32, I::Error> {
        Ok(units::raw_to_volts(self.vout_raw()?))
    }

    /// Read the raw received power byte
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn received_power_raw(&mut self) -> OperationResult<u8, I::Error> {
        self.read_register(REC_PWR_STATUS.address)
    }

    /// Read the received power in watts
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn received_power_watts(&mut self) -> OperationResult<f32, I::Error> {
        Ok(units::raw_to_watts(self.received_power_raw()?))
    }

    /// Read V_RECT, V_OUT and received power
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if any transfer fails.
    pub fn read_output_status(&mut self) -> OperationResult<OutputStatus, I::Error> {
        Ok(OutputStatus {
            vrect: self.vrect_volts()?,
            vout: self.vout_volts()?,
            received_power: self.received_power_watts()?,
        })
    }

    // ==================== VARIANT-GATED ====================

    /// Read the whole mode indicator byte (0 on variants without it)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn mode_indicator_raw(&mut self) -> OperationResult<u8, I::Error> {
        self.read_register(MODE_IND.address)
    }

    /// Read and decode the mode indicator
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn read_mode_indicator(&mut self) -> OperationResult<ModeIndicator, I::Error> {
        Ok(ModeIndicator::from_bits(self.mode_indicator_raw()?))
    }

    /// Whether the receiver is in alignment mode (`false` on variants without it)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn alignment_status(&mut self) -> OperationResult<bool, I::Error> {
        Ok(self.read_field(MODE_IND_ALIGN)? != 0)
    }

    /// Active charging protocol (WPC on variants without a mode indicator)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn charge_protocol(&mut self) -> OperationResult<ChargeProtocol, I::Error> {
        Ok(if self.read_field(MODE_IND_MODE)? != 0 {
            ChargeProtocol::Pma
        } else {
            ChargeProtocol::Wpc
        })
    }

    /// Read the 6-byte RX ID (all zeros on variants without it)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn read_rx_id(&mut self) -> OperationResult<[u8; RX_ID_LEN], I::Error> {
        let mut rx_id = [0u8; RX_ID_LEN];
        self.read_block(RX_ID.address, &mut rx_id)?;
        Ok(rx_id)
    }

    // ==================== PROBING ====================

    /// Probe the device with one two-byte read of VO_REG and IO_REG
    ///
    /// Returns `Ok(true)` when every unused bit of both registers reads 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails (no device acknowledged).
    pub fn connection_check(&mut self) -> OperationResult<bool, I::Error> {
        let mut bytes = [0u8; 2];
        self.read_block(VO_REG.address, &mut bytes)?;
        let ok = bytes[0] & VO_REG_RESERVED == 0 && bytes[1] & IO_REG_RESERVED == 0;
        if !ok {
            warn!("reserved bits set in {:#x} / {:#x}", bytes[0], bytes[1]);
        }
        Ok(ok)
    }

    /// Infer whether a transmitter is powering the receiver
    ///
    /// Reads the RX ID block first (skipped on variants without it); six
    /// `0xFF` bytes mean unpowered. Otherwise V_RECT is compared against
    /// [`UVLO_VOLTS`](crate::UVLO_VOLTS). Nothing is cached between calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if either transfer fails.
    pub fn check_power(&mut self) -> OperationResult<PowerState, I::Error> {
        if self.capabilities.rx_id {
            let rx_id = self.read_rx_id()?;
            if power::rx_id_is_unpowered(&rx_id) {
                debug!("RX ID reads all ones, receiver unpowered");
                return Ok(PowerState::Unpowered);
            }
        }
        let raw = self.vrect_raw()?;
        let state = power::classify_vrect(raw);
        debug!("V_RECT raw {} -> powered: {}", raw, state.is_powered());
        Ok(state)
    }

    // ==================== RESETS ====================

    /// Restore VO_REG to its factory default
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn reset_vo_reg(&mut self) -> OperationResult<(), I::Error> {
        self.write_register(VO_REG.address, VO_REG.default)
    }

    /// Restore IO_REG to its factory default
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn reset_io_reg(&mut self) -> OperationResult<(), I::Error> {
        self.write_register(IO_REG.address, IO_REG.default)
    }

    /// Restore the mailbox to its factory default
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub fn reset_mailbox(&mut self) -> OperationResult<(), I::Error> {
        self.write_register(MAILBOX.address, MAILBOX.default)
    }

    /// Restore every writable register to its factory default
    ///
    /// Three block writes: configuration, mailbox RAM, packet payload. Stops
    /// at the first failure; later blocks are then left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] from the first failing transfer.
    pub fn reset_all_registers(&mut self) -> OperationResult<(), I::Error> {
        self.write_block(VO_REG.address, &CONFIG_RESET)?;
        self.write_block(MAILBOX.address, &MAILBOX_RESET)?;
        self.write_block(PACKET_PAYLOAD.address, &PAYLOAD_RESET)
    }
}

#[cfg(feature = "async")]
impl<I> Bq51Driver<I>
where
    I: AsyncRegisterInterface<AddressType = u8>,
{
    // ==================== RAW ACCESS ====================

    /// Read one register byte
    ///
    /// Returns 0 without a bus transaction for registers the variant lacks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn read_register(&mut self, address: u8) -> OperationResult<u8, I::Error> {
        let mut byte = [0u8];
        self.read_block(address, &mut byte).await?;
        Ok(byte[0])
    }

    /// Write one register byte
    ///
    /// A write to the mailbox has its reserved bit cleared.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadOnlyRegister`] for a read-only address, or
    /// [`Error::Bus`] if the transfer fails.
    pub async fn write_register(&mut self, address: u8, value: u8) -> OperationResult<(), I::Error> {
        self.write_block(address, &[value]).await
    }

    /// Read contiguous registers in one transaction
    ///
    /// If the range touches a register the variant lacks, `buffer` is zeroed
    /// and no bus transaction is issued.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails; `buffer` is then undefined.
    pub async fn read_block(
        &mut self,
        address: u8,
        buffer: &mut [u8],
    ) -> OperationResult<(), I::Error> {
        if self.gated(address, buffer.len()) {
            buffer.fill(0);
            return Ok(());
        }
        trace!("read {:#x} ({} bytes)", address, buffer.len());
        let size_bits = buffer.len() as u32 * 8;
        let result = self.interface.read_register(address, size_bits, buffer).await;
        result.map_err(|error| self.bus_error(address, error))
    }

    /// Write contiguous registers in one transaction
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] for more than six bytes,
    /// [`Error::ReadOnlyRegister`] if the range touches a read-only register,
    /// or [`Error::Bus`] if the transfer fails. Nothing is sent on the first two.
    pub async fn write_block(&mut self, address: u8, data: &[u8]) -> OperationResult<(), I::Error> {
        let mut buffer = [0u8; MAX_BLOCK];
        let len = prepare_write::<I::Error>(address, data, &mut buffer)?;
        trace!("write {:#x} ({} bytes)", address, len);
        let result = self
            .interface
            .write_register(address, len as u32 * 8, &buffer[..len])
            .await;
        result.map_err(|error| self.bus_error(address, error))
    }

    // ==================== FIELD CODEC ====================

    /// Read a bit field: one bus read, then `(byte & mask) >> shift`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn read_field(&mut self, field: BitField) -> OperationResult<u8, I::Error> {
        let byte = self.read_register(field.register.address).await?;
        Ok(field.extract(byte))
    }

    /// Write a bit field with a read-modify-write of its register
    ///
    /// Bits outside the field are preserved, except the mailbox reserved bit
    /// which is always written as 0. Values wider than the field are truncated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadOnlyRegister`] for a field of a read-only
    /// register, or [`Error::Bus`] if either transfer fails.
    pub async fn write_field(&mut self, field: BitField, value: u8) -> OperationResult<(), I::Error> {
        if !field.register.is_writable() {
            return Err(Error::ReadOnlyRegister(field.register.address));
        }
        let current = self.read_register(field.register.address).await?;
        self.write_register(field.register.address, field.compose(current, value))
            .await
    }

    // ==================== OUTPUT CONFIGURATION ====================

    /// Read the raw VO_REG code (0..=7)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn vo_reg_code(&mut self) -> OperationResult<u8, I::Error> {
        self.read_field(VO_REG_TARGET).await
    }

    /// Write the raw VO_REG code
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub async fn set_vo_reg_code(&mut self, code: u8) -> OperationResult<(), I::Error> {
        self.write_field(VO_REG_TARGET, code).await
    }

    /// Read the VO_REG target in millivolts
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn vo_reg_millivolts(&mut self) -> OperationResult<u16, I::Error> {
        Ok(units::vo_reg_millivolts(self.vo_reg_code().await?))
    }

    /// Set the VO_REG target, clamped to 450..=800 mV and rounded to the
    /// nearest 50 mV step
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub async fn set_vo_reg_millivolts(&mut self, millivolts: u16) -> OperationResult<(), I::Error> {
        self.set_vo_reg_code(units::vo_reg_code(millivolts)).await
    }

    /// Read the output current limit
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn current_limit(&mut self) -> OperationResult<CurrentLimit, I::Error> {
        Ok(CurrentLimit::from_bits(self.read_field(IO_REG_ILIM).await?))
    }

    /// Set the output current limit
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub async fn set_current_limit(&mut self, limit: CurrentLimit) -> OperationResult<(), I::Error> {
        self.write_field(IO_REG_ILIM, limit.bits()).await
    }

    /// Read VO_REG and IO_REG in a single two-byte transaction
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn read_output_config(&mut self) -> OperationResult<OutputConfig, I::Error> {
        let mut bytes = [0u8; 2];
        self.read_block(VO_REG.address, &mut bytes).await?;
        Ok(OutputConfig {
            vo_reg_code: VO_REG_TARGET.extract(bytes[0]),
            current_limit: CurrentLimit::from_bits(IO_REG_ILIM.extract(bytes[1])),
        })
    }

    // ==================== MAILBOX / PROPRIETARY PACKETS ====================

    /// Read the whole mailbox byte
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn mailbox(&mut self) -> OperationResult<u8, I::Error> {
        self.read_register(MAILBOX.address).await
    }

    /// Write the whole mailbox byte; the reserved bit is written as 0
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn set_mailbox(&mut self, value: u8) -> OperationResult<(), I::Error> {
        self.write_register(MAILBOX.address, value).await
    }

    /// Read and decode the mailbox
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn read_mailbox_status(&mut self) -> OperationResult<MailboxStatus, I::Error> {
        Ok(MailboxStatus::from_bits(self.mailbox().await?))
    }

    /// Trigger transmission of the loaded proprietary packet
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub async fn send_packet(&mut self) -> OperationResult<(), I::Error> {
        debug!("triggering proprietary packet");
        self.write_field(MAILBOX_USER_PKT_DONE, 0).await
    }

    /// Whether no packet transmission is pending
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn packet_done(&mut self) -> OperationResult<bool, I::Error> {
        Ok(self.read_field(MAILBOX_USER_PKT_DONE).await? != 0)
    }

    /// Outcome of the last proprietary packet transmission
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn packet_error(&mut self) -> OperationResult<PacketError, I::Error> {
        Ok(PacketError::from_bits(
            self.read_field(MAILBOX_USER_PKT_ERR).await?,
        ))
    }

    /// Whether alignment aid mode is requested
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn alignment_aid(&mut self) -> OperationResult<bool, I::Error> {
        Ok(self.read_field(MAILBOX_ALIGN).await? != 0)
    }

    /// Request or release alignment aid mode
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub async fn set_alignment_aid(&mut self, enable: bool) -> OperationResult<(), I::Error> {
        self.write_field(MAILBOX_ALIGN, u8::from(enable)).await
    }

    /// Load header and payload, then trigger transmission
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub async fn transmit_packet(
        &mut self,
        packet: &ProprietaryPacket,
    ) -> OperationResult<(), I::Error> {
        self.set_user_header(packet.header).await?;
        self.set_packet_payload(&packet.payload).await?;
        self.send_packet().await
    }

    /// Poll until the device reports the packet sent, then return its outcome
    ///
    /// Polls every 1 ms for up to 100 ms.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PacketTimeout`] if USER_PKT_DONE never reads 1, or
    /// [`Error::Bus`] if a transfer fails.
    pub async fn wait_for_packet<D>(
        &mut self,
        delay: &mut D,
    ) -> OperationResult<PacketError, I::Error>
    where
        D: embedded_hal_async::delay::DelayNs,
    {
        for _ in 0..(PACKET_TIMEOUT_MS / PACKET_POLL_MS) {
            let status = self.read_mailbox_status().await?;
            if status.packet_done {
                debug!("proprietary packet done");
                return Ok(status.packet_error);
            }
            delay.delay_ms(PACKET_POLL_MS).await;
        }
        warn!("proprietary packet not sent within {} ms", PACKET_TIMEOUT_MS);
        Err(Error::PacketTimeout)
    }

    // ==================== FOREIGN OBJECT DETECTION ====================

    /// Read the whole FOD RAM byte
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn fod_ram(&mut self) -> OperationResult<u8, I::Error> {
        self.read_register(FOD_RAM.address).await
    }

    /// Write the whole FOD RAM byte
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn set_fod_ram(&mut self, value: u8) -> OperationResult<(), I::Error> {
        self.write_register(FOD_RAM.address, value).await
    }

    /// Read and decode the FOD configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn read_fod_config(&mut self) -> OperationResult<FodConfig, I::Error> {
        Ok(FodConfig::from_bits(self.fod_ram().await?))
    }

    /// Write the full FOD configuration in one transfer
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn write_fod_config(&mut self, config: &FodConfig) -> OperationResult<(), I::Error> {
        self.set_fod_ram(config.bits()).await
    }

    /// Whether the ESR multiplier is applied
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn esr_enabled(&mut self) -> OperationResult<bool, I::Error> {
        Ok(self.read_field(FOD_ESR_ENABLE).await? != 0)
    }

    /// Enable or disable the ESR multiplier
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub async fn set_esr_enabled(&mut self, enable: bool) -> OperationResult<(), I::Error> {
        self.write_field(FOD_ESR_ENABLE, u8::from(enable)).await
    }

    /// Whether the offset power is applied
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn offset_enabled(&mut self) -> OperationResult<bool, I::Error> {
        Ok(self.read_field(FOD_OFFSET_ENABLE).await? != 0)
    }

    /// Enable or disable the offset power
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub async fn set_offset_enabled(&mut self, enable: bool) -> OperationResult<(), I::Error> {
        self.write_field(FOD_OFFSET_ENABLE, u8::from(enable)).await
    }

    /// Read the offset power code (0..=7)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn fod_offset(&mut self) -> OperationResult<u8, I::Error> {
        self.read_field(FOD_OFFSET).await
    }

    /// Write the offset power code; values above 7 are truncated
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub async fn set_fod_offset(&mut self, code: u8) -> OperationResult<(), I::Error> {
        self.write_field(FOD_OFFSET, code).await
    }

    /// Read the offset power in watts
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn fod_offset_watts(&mut self) -> OperationResult<f32, I::Error> {
        Ok(units::raw_to_watts(self.fod_offset().await?))
    }

    /// Read the ESR multiplier
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn esr_scale(&mut self) -> OperationResult<EsrScale, I::Error> {
        Ok(EsrScale::from_bits(self.read_field(FOD_ESR_SCALE).await?))
    }

    /// Write the ESR multiplier
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if a transfer fails.
    pub async fn set_esr_scale(&mut self, scale: EsrScale) -> OperationResult<(), I::Error> {
        self.write_field(FOD_ESR_SCALE, scale.bits()).await
    }

    // ==================== PACKET RAM ====================

    /// Read the proprietary packet header
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn user_header(&mut self) -> OperationResult<u8, I::Error> {
        self.read_register(USER_HEADER.address).await
    }

    /// Write the proprietary packet header
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn set_user_header(&mut self, header: u8) -> OperationResult<(), I::Error> {
        self.write_register(USER_HEADER.address, header).await
    }

    /// Read the 4-byte packet payload
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn packet_payload(&mut self) -> OperationResult<[u8; PACKET_PAYLOAD_LEN], I::Error> {
        let mut payload = [0u8; PACKET_PAYLOAD_LEN];
        self.read_block(PACKET_PAYLOAD.address, &mut payload).await?;
        Ok(payload)
    }

    /// Write the 4-byte packet payload in one transaction
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn set_packet_payload(
        &mut self,
        payload: &[u8; PACKET_PAYLOAD_LEN],
    ) -> OperationResult<(), I::Error> {
        self.write_block(PACKET_PAYLOAD.address, payload).await
    }

    // ==================== STATUS ====================

    /// Read the raw rectifier voltage byte
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn vrect_raw(&mut self) -> OperationResult<u8, I::Error> {
        self.read_register(VRECT_STATUS.address).await
    }

    /// Read the rectifier voltage in volts
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn vrect_volts(&mut self) -> OperationResult<f32, I::Error> {
        Ok(units::raw_to_volts(self.vrect_raw().await?))
    }

    /// Read the raw output voltage byte
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn vout_raw(&mut self) -> OperationResult<u8, I::Error> {
        self.read_register(VOUT_STATUS.address).await
    }

    /// Read the output voltage in volts
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn vout_volts(&mut self) -> OperationResult<f32, I::Error> {
        Ok(units::raw_to_volts(self.vout_raw().await?))
    }

    /// Read the raw received power byte
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn received_power_raw(&mut self) -> OperationResult<u8, I::Error> {
        self.read_register(REC_PWR_STATUS.address).await
    }

    /// Read the received power in watts
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn received_power_watts(&mut self) -> OperationResult<f32, I::Error> {
        Ok(units::raw_to_watts(self.received_power_raw().await?))
    }

    /// Read V_RECT, V_OUT and received power
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if any transfer fails.
    pub async fn read_output_status(&mut self) -> OperationResult<OutputStatus, I::Error> {
        Ok(OutputStatus {
            vrect: self.vrect_volts().await?,
            vout: self.vout_volts().await?,
            received_power: self.received_power_watts().await?,
        })
    }

    // ==================== VARIANT-GATED ====================

    /// Read the whole mode indicator byte (0 on variants without it)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn mode_indicator_raw(&mut self) -> OperationResult<u8, I::Error> {
        self.read_register(MODE_IND.address).await
    }

    /// Read and decode the mode indicator
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn read_mode_indicator(&mut self) -> OperationResult<ModeIndicator, I::Error> {
        Ok(ModeIndicator::from_bits(self.mode_indicator_raw().await?))
    }

    /// Whether the receiver is in alignment mode (`false` on variants without it)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn alignment_status(&mut self) -> OperationResult<bool, I::Error> {
        Ok(self.read_field(MODE_IND_ALIGN).await? != 0)
    }

    /// Active charging protocol (WPC on variants without a mode indicator)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn charge_protocol(&mut self) -> OperationResult<ChargeProtocol, I::Error> {
        Ok(if self.read_field(MODE_IND_MODE).await? != 0 {
            ChargeProtocol::Pma
        } else {
            ChargeProtocol::Wpc
        })
    }

    /// Read the 6-byte RX ID (all zeros on variants without it)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn read_rx_id(&mut self) -> OperationResult<[u8; RX_ID_LEN], I::Error> {
        let mut rx_id = [0u8; RX_ID_LEN];
        self.read_block(RX_ID.address, &mut rx_id).await?;
        Ok(rx_id)
    }

    // ==================== PROBING ====================

    /// Probe the device with one two-byte read of VO_REG and IO_REG
    ///
    /// Returns `Ok(true)` when every unused bit of both registers reads 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails (no device acknowledged).
    pub async fn connection_check(&mut self) -> OperationResult<bool, I::Error> {
        let mut bytes = [0u8; 2];
        self.read_block(VO_REG.address, &mut bytes).await?;
        let ok = bytes[0] & VO_REG_RESERVED == 0 && bytes[1] & IO_REG_RESERVED == 0;
        if !ok {
            warn!("reserved bits set in {:#x} / {:#x}", bytes[0], bytes[1]);
        }
        Ok(ok)
    }

    /// Infer whether a transmitter is powering the receiver
    ///
    /// Reads the RX ID block first (skipped on variants without it); six
    /// `0xFF` bytes mean unpowered. Otherwise V_RECT is compared against
    /// [`UVLO_VOLTS`](crate::UVLO_VOLTS). Nothing is cached between calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if either transfer fails.
    pub async fn check_power(&mut self) -> OperationResult<PowerState, I::Error> {
        if self.capabilities.rx_id {
            let rx_id = self.read_rx_id().await?;
            if power::rx_id_is_unpowered(&rx_id) {
                debug!("RX ID reads all ones, receiver unpowered");
                return Ok(PowerState::Unpowered);
            }
        }
        let raw = self.vrect_raw().await?;
        let state = power::classify_vrect(raw);
        debug!("V_RECT raw {} -> powered: {}", raw, state.is_powered());
        Ok(state)
    }

    // ==================== RESETS ====================

    /// Restore VO_REG to its factory default
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn reset_vo_reg(&mut self) -> OperationResult<(), I::Error> {
        self.write_register(VO_REG.address, VO_REG.default).await
    }

    /// Restore IO_REG to its factory default
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn reset_io_reg(&mut self) -> OperationResult<(), I::Error> {
        self.write_register(IO_REG.address, IO_REG.default).await
    }

    /// Restore the mailbox to its factory default
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] if the transfer fails.
    pub async fn reset_mailbox(&mut self) -> OperationResult<(), I::Error> {
        self.write_register(MAILBOX.address, MAILBOX.default).await
    }

    /// Restore every writable register to its factory default
    ///
    /// Stops at the first failing block write.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Bus`] from the first failing transfer.
    pub async fn reset_all_registers(&mut self) -> OperationResult<(), I::Error> {
        self.write_block(VO_REG.address, &CONFIG_RESET).await?;
        self.write_block(MAILBOX.address, &MAILBOX_RESET).await?;
        self.write_block(PACKET_PAYLOAD.address, &PAYLOAD_RESET)
            .await
    }
}
