//! Unit tests for the mailbox and proprietary packets

use crate::common::{MockDelay, create_mock_driver};
use bq51::{Error, PacketError, ProprietaryPacket, Variant};

#[test]
fn test_send_packet_clears_done_bit_only() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.set_packet_result(None);
    interface.set_register(0xE0, 0x88);

    driver.send_packet().unwrap();

    assert_eq!(interface.writes(), vec![(0xE0, vec![0x08])]);
    assert!(!driver.packet_done().unwrap());
}

#[test]
fn test_transmit_packet_loads_then_triggers() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    let packet = ProprietaryPacket::from_u32(0x18, 0xDEAD_BEEF);

    driver.transmit_packet(&packet).unwrap();

    assert_eq!(
        interface.writes(),
        vec![
            (0xE2, vec![0x18]),
            (0xF1, vec![0xDE, 0xAD, 0xBE, 0xEF]),
            (0xE0, vec![0x00]),
        ]
    );
    assert_eq!(driver.user_header().unwrap(), 0x18);
    assert_eq!(driver.packet_payload().unwrap(), [0xDE, 0xAD, 0xBE, 0xEF]);
}

#[test]
fn test_wait_for_packet_reports_outcome() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.set_packet_result(Some(1));
    let mut delay = MockDelay::default();

    driver
        .transmit_packet(&ProprietaryPacket::from_u32(0x18, 1))
        .unwrap();
    let outcome = driver.wait_for_packet(&mut delay).unwrap();

    assert_eq!(outcome, PacketError::NoTransmitter);
    assert_eq!(delay.elapsed_ms, 0);
}

#[test]
fn test_wait_for_packet_times_out() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.set_packet_result(None);
    let mut delay = MockDelay::default();

    driver.send_packet().unwrap();
    let result = driver.wait_for_packet(&mut delay);

    assert_eq!(result, Err(Error::PacketTimeout));
    assert_eq!(delay.elapsed_ms, 100);
}

#[test]
fn test_packet_error_codes() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);

    for (bits, expected) in [
        (0x80, PacketError::NoError),
        (0xA0, PacketError::NoTransmitter),
        (0xC0, PacketError::IllegalHeader),
        (0xE0, PacketError::Unspecified),
    ] {
        interface.set_register(0xE0, bits);
        assert_eq!(driver.packet_error().unwrap(), expected);
    }
}

#[test]
fn test_alignment_aid_roundtrip() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);

    driver.set_alignment_aid(true).unwrap();
    assert!(driver.alignment_aid().unwrap());
    assert_eq!(interface.get_register(0xE0), 0x88);

    driver.set_alignment_aid(false).unwrap();
    assert!(!driver.alignment_aid().unwrap());
    assert_eq!(interface.get_register(0xE0), 0x80);
}

#[test]
fn test_mailbox_status_decoding() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.set_register(0xE0, 0xC8);

    let status = driver.read_mailbox_status().unwrap();
    assert!(status.packet_done);
    assert_eq!(status.packet_error, PacketError::IllegalHeader);
    assert!(status.alignment_aid);
}

#[test]
fn test_reset_mailbox() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    driver.set_mailbox(0x88).unwrap();

    driver.reset_mailbox().unwrap();

    assert_eq!(driver.mailbox().unwrap(), 0x80);
    assert_eq!(interface.get_register(0xE0), 0x80);
}
