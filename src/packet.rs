//! Proprietary packet mailbox
//!
//! A proprietary packet is sent by loading the header into USER_HEADER_RAM,
//! the payload into the 4-byte payload RAM, and writing 0 to USER_PKT_DONE.
//! The bit reads back as 1 once the packet has gone out, and USER_PKT_ERR
//! then holds the outcome.

use crate::registers::{MAILBOX_ALIGN, MAILBOX_USER_PKT_DONE, MAILBOX_USER_PKT_ERR};

/// Outcome of the last proprietary packet transmission (USER_PKT_ERR)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketError {
    /// Packet sent without error
    NoError = 0,
    /// No transmitter present
    NoTransmitter = 1,
    /// Illegal header, packet was not sent
    IllegalHeader = 2,
    /// Error code not defined by the datasheet
    Unspecified = 3,
}

impl PacketError {
    /// Decode a 2-bit USER_PKT_ERR code; bits above the field are ignored
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::NoError,
            1 => Self::NoTransmitter,
            2 => Self::IllegalHeader,
            _ => Self::Unspecified,
        }
    }

    /// Whether the packet was sent successfully
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::NoError)
    }
}

/// Decoded mailbox register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MailboxStatus {
    /// USER_PKT_DONE: no transmission pending
    pub packet_done: bool,
    /// USER_PKT_ERR of the last transmission
    pub packet_error: PacketError,
    /// Alignment aid mode requested
    pub alignment_aid: bool,
}

impl MailboxStatus {
    /// Decode a mailbox byte
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            packet_done: MAILBOX_USER_PKT_DONE.extract(bits) != 0,
            packet_error: PacketError::from_bits(MAILBOX_USER_PKT_ERR.extract(bits)),
            alignment_aid: MAILBOX_ALIGN.extract(bits) != 0,
        }
    }
}

/// A proprietary packet: one header byte and a 4-byte payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProprietaryPacket {
    /// Header written to USER_HEADER_RAM
    pub header: u8,
    /// Payload written to the payload RAM, byte 0 first
    pub payload: [u8; crate::registers::PACKET_PAYLOAD_LEN],
}

impl ProprietaryPacket {
    /// Build a packet with a big-endian 32-bit payload
    pub const fn from_u32(header: u8, payload: u32) -> Self {
        Self {
            header,
            payload: payload.to_be_bytes(),
        }
    }
}
