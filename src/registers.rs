//! Register map and bit-field codec for the bq51 family
//!
//! The map is a set of immutable descriptors: every [`Register`] knows its
//! address, access mode and width, and every [`BitField`] knows its parent
//! register, mask and shift. The codec functions on [`BitField`] compose and
//! decompose register bytes; the driver uses them to build read-modify-write
//! sequences.
//!
//! ## Register groups
//! - **Configuration** (`0x01`, `0x02`): retained when V_RECT drops below V_UVLO
//! - **Output / status RAM** (`0xE0..=0xEF`): reset to defaults below V_UVLO
//! - **Proprietary packet payload** (`0xF1..=0xF4`): 4-byte block
//! - **RX ID readback** (`0xF5..=0xFA`): 6-byte factory identifier
//!
//! ## Mailbox reserved bit
//! Bit 2 of the mailbox register (FOD scaler) is documented as "must be 0".
//! [`sanitize`] clears it on every byte written to the mailbox address,
//! whichever field or block the write was meant for.

use crate::variant::Capability;

/// Register access mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Read only
    ReadOnly,
    /// Read and write
    ReadWrite,
}

/// Static description of an addressable register (or contiguous register block)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Register {
    /// Datasheet name
    pub name: &'static str,
    /// First byte address
    pub address: u8,
    /// Access mode
    pub access: Access,
    /// Width in bytes (1, 4 or 6)
    pub width: u8,
    /// Factory default of each byte
    pub default: u8,
    /// Contents are reset whenever V_RECT falls below V_UVLO
    pub volatile: bool,
    /// Variant capability required to access this register
    pub capability: Option<Capability>,
}

impl Register {
    const fn new(name: &'static str, address: u8, access: Access, width: u8) -> Self {
        Self {
            name,
            address,
            access,
            width,
            default: 0x00,
            volatile: true,
            capability: None,
        }
    }

    const fn with_default(mut self, default: u8) -> Self {
        self.default = default;
        self
    }

    const fn retained(mut self) -> Self {
        self.volatile = false;
        self
    }

    const fn requires(mut self, capability: Capability) -> Self {
        self.capability = Some(capability);
        self
    }

    /// Whether the register accepts writes
    pub const fn is_writable(&self) -> bool {
        matches!(self.access, Access::ReadWrite)
    }

    /// Transfer size in bits, as passed to the register interface
    pub const fn size_bits(&self) -> u32 {
        self.width as u32 * 8
    }

    /// Whether `address` falls inside this register's byte range
    pub const fn contains(&self, address: u8) -> bool {
        address >= self.address && (address as u16) < self.address as u16 + self.width as u16
    }

    /// Whole-register alias, for single-byte registers
    pub const fn whole(self) -> BitField {
        BitField::new(self, self.name, 0xFF)
    }
}

/// Static description of a sub-byte field inside a single-byte register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitField {
    /// Parent register
    pub register: Register,
    /// Datasheet name
    pub name: &'static str,
    /// Bit mask within the register byte
    pub mask: u8,
    /// Position of the lowest mask bit
    pub shift: u8,
}

impl BitField {
    /// Create a field; the shift is derived from the mask
    pub const fn new(register: Register, name: &'static str, mask: u8) -> Self {
        Self {
            register,
            name,
            mask,
            shift: mask.trailing_zeros() as u8,
        }
    }

    /// Largest value the field can hold
    pub const fn max_value(&self) -> u8 {
        self.mask >> self.shift
    }

    /// Whether this field spans the whole register byte
    pub const fn is_whole_register(&self) -> bool {
        self.mask == 0xFF
    }

    /// Extract the field value from a register byte: `(byte & mask) >> shift`
    pub const fn extract(&self, byte: u8) -> u8 {
        (byte & self.mask) >> self.shift
    }

    /// Replace the field inside `byte`, leaving all other bits untouched
    ///
    /// Values wider than the field are truncated to the mask.
    pub const fn insert(&self, byte: u8, value: u8) -> u8 {
        (byte & !self.mask) | ((value << self.shift) & self.mask)
    }

    /// Compose the byte to write back for a read-modify-write of this field
    ///
    /// `current` is the register byte just read from the device. The result
    /// has the field replaced and the register's write policy applied.
    pub const fn compose(&self, current: u8, value: u8) -> u8 {
        sanitize(self.register.address, self.insert(current, value))
    }
}

/// Apply the fixed write policy for the byte at `address`
///
/// Clears the mailbox FOD scaler bit; every other address passes through.
pub const fn sanitize(address: u8, byte: u8) -> u8 {
    if address == MAILBOX.address {
        byte & !MAILBOX_FOD_SCALER.mask
    } else {
        byte
    }
}

/// Apply [`sanitize`] to every byte of a block write starting at `start`
pub fn sanitize_block(start: u8, bytes: &mut [u8]) {
    for (offset, byte) in bytes.iter_mut().enumerate() {
        *byte = sanitize(start.wrapping_add(offset as u8), *byte);
    }
}

/// Look up the register whose byte range contains `address`
pub fn by_address(address: u8) -> Option<&'static Register> {
    ALL.iter().find(|register| register.contains(address))
}

/// Registers touched by a transfer of `len` bytes starting at `address`
pub fn overlapping(address: u8, len: usize) -> impl Iterator<Item = &'static Register> {
    let start = u16::from(address);
    let end = start + len.min(0x100) as u16;
    ALL.iter().filter(move |register| {
        let first = u16::from(register.address);
        first < end && start < first + u16::from(register.width)
    })
}

// ==================== CONFIGURATION REGISTERS ====================

/// Wireless Power Supply Current Register 1: output voltage regulation target
pub const VO_REG: Register = Register::new("VO_REG", 0x01, Access::ReadWrite, 1)
    .with_default(0x01)
    .retained();

/// Wireless Power Supply Current Register 2: output current limit
pub const IO_REG: Register = Register::new("IO_REG", 0x02, Access::ReadWrite, 1)
    .with_default(0x07)
    .retained();

// ==================== OUTPUT / STATUS RAM ====================

/// I2C mailbox: proprietary packet trigger and status, alignment aid
pub const MAILBOX: Register =
    Register::new("MAILBOX", 0xE0, Access::ReadWrite, 1).with_default(0x80);

/// Foreign object detection adjustments
pub const FOD_RAM: Register = Register::new("FOD_RAM", 0xE1, Access::ReadWrite, 1);

/// Header byte for proprietary packets
pub const USER_HEADER: Register = Register::new("USER_HEADER_RAM", 0xE2, Access::ReadWrite, 1);

/// Rectifier voltage, 46 mV per LSB
pub const VRECT_STATUS: Register = Register::new("VRECT_STATUS_RAM", 0xE3, Access::ReadOnly, 1);

/// Output voltage, 46 mV per LSB
pub const VOUT_STATUS: Register = Register::new("VOUT_STATUS_RAM", 0xE4, Access::ReadOnly, 1);

/// Received power, 39 mW per LSB
pub const REC_PWR_STATUS: Register =
    Register::new("REC_PWR_STATUS_RAM", 0xE8, Access::ReadOnly, 1);

/// Mode indicator: WPC/PMA and alignment status (not on bq51021)
pub const MODE_IND: Register =
    Register::new("MODE_IND", 0xEF, Access::ReadOnly, 1).requires(Capability::ModeIndicator);

// ==================== BLOCKS ====================

/// Size of the proprietary packet payload block
pub const PACKET_PAYLOAD_LEN: usize = 4;

/// Size of the RX ID readback block
pub const RX_ID_LEN: usize = 6;

/// Proprietary packet payload RAM, bytes 0..=3
pub const PACKET_PAYLOAD: Register = Register::new(
    "PROP_PACKET_PAYLOAD",
    0xF1,
    Access::ReadWrite,
    PACKET_PAYLOAD_LEN as u8,
);

/// Factory-programmed receiver identifier (not on bq51021)
pub const RX_ID: Register = Register::new("RXID_READBACK", 0xF5, Access::ReadOnly, RX_ID_LEN as u8)
    .requires(Capability::RxId);

/// Every register in the map, in address order
pub const ALL: [Register; 11] = [
    VO_REG,
    IO_REG,
    MAILBOX,
    FOD_RAM,
    USER_HEADER,
    VRECT_STATUS,
    VOUT_STATUS,
    REC_PWR_STATUS,
    MODE_IND,
    PACKET_PAYLOAD,
    RX_ID,
];

// ==================== FIELDS ====================

/// VO_REG target code: 450 mV + 50 mV per step
pub const VO_REG_TARGET: BitField = BitField::new(VO_REG, "VO_REG", 0b0000_0111);

/// I_ILIM code: 10..60, 90, 100 percent of the resistor-set limit
pub const IO_REG_ILIM: BitField = BitField::new(IO_REG, "IO_REG", 0b0000_0111);

/// USER_PKT_DONE: write 0 to send a packet, reads 1 once it has been sent
pub const MAILBOX_USER_PKT_DONE: BitField =
    BitField::new(MAILBOX, "USER_PKT_DONE", 0b1000_0000);

/// USER_PKT_ERR: result of the last proprietary packet transmission
pub const MAILBOX_USER_PKT_ERR: BitField = BitField::new(MAILBOX, "USER_PKT_ERR", 0b0110_0000);

/// ALIGN mailer: enable alignment aid mode (CEP = 0)
pub const MAILBOX_ALIGN: BitField = BitField::new(MAILBOX, "ALIGN_MAILER", 0b0000_1000);

/// FOD scaler, reserved: must always be written as 0
pub const MAILBOX_FOD_SCALER: BitField = BitField::new(MAILBOX, "FOD_SCALER", 0b0000_0100);

/// ESR_ENABLE: apply the I2C-set ESR multiplier to received power
pub const FOD_ESR_ENABLE: BitField = BitField::new(FOD_RAM, "ESR_ENABLE", 0b1000_0000);

/// OFF_ENABLE: apply the I2C-set offset power
pub const FOD_OFFSET_ENABLE: BitField = BitField::new(FOD_RAM, "OFF_ENABLE", 0b0100_0000);

/// RO_FODx: offset power, 39 mW per LSB
pub const FOD_OFFSET: BitField = BitField::new(FOD_RAM, "RO_FOD", 0b0011_1000);

/// RS_FODx: ESR multiplier code
pub const FOD_ESR_SCALE: BitField = BitField::new(FOD_RAM, "RS_FOD", 0b0000_0111);

/// ALIGN status: 1 = alignment mode, 0 = normal operation
pub const MODE_IND_ALIGN: BitField = BitField::new(MODE_IND, "ALIGN_STATUS", 0b0100_0000);

/// Mode bit: 1 = PMA, 0 = WPC (Qi)
pub const MODE_IND_MODE: BitField = BitField::new(MODE_IND, "MODE", 0b0000_0001);

/// Every named sub-byte field
pub const FIELDS: [BitField; 12] = [
    VO_REG_TARGET,
    IO_REG_ILIM,
    MAILBOX_USER_PKT_DONE,
    MAILBOX_USER_PKT_ERR,
    MAILBOX_ALIGN,
    MAILBOX_FOD_SCALER,
    FOD_ESR_ENABLE,
    FOD_OFFSET_ENABLE,
    FOD_OFFSET,
    FOD_ESR_SCALE,
    MODE_IND_ALIGN,
    MODE_IND_MODE,
];

/// Bits of VO_REG that are unused and read back as 0
pub const VO_REG_RESERVED: u8 = !VO_REG_TARGET.mask;

/// Bits of IO_REG that are unused and read back as 0
pub const IO_REG_RESERVED: u8 = !IO_REG_ILIM.mask;
