//! Unit tests for field reads and read-modify-write field writes

use crate::common::{Operation, create_mock_driver};
use bq51::registers::{
    self, FOD_ESR_SCALE, FOD_OFFSET, IO_REG_ILIM, MAILBOX, MAILBOX_ALIGN, MAILBOX_FOD_SCALER,
    MAILBOX_USER_PKT_ERR, VO_REG_TARGET,
};
use bq51::{Error, Variant};

#[test]
fn test_read_field_is_one_read() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.set_register(0xE1, 0b1101_0101);

    assert_eq!(driver.read_field(FOD_OFFSET).unwrap(), 0b010);
    assert_eq!(
        interface.operations(),
        vec![Operation::Read {
            address: 0xE1,
            len: 1
        }]
    );
}

#[test]
fn test_write_field_reads_then_writes() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.set_register(0xE1, 0b1100_0000);

    driver.write_field(FOD_ESR_SCALE, 0b011).unwrap();

    assert_eq!(
        interface.operations(),
        vec![
            Operation::Read {
                address: 0xE1,
                len: 1
            },
            Operation::Write {
                address: 0xE1,
                data: vec![0b1100_0011]
            },
        ]
    );
}

#[test]
fn test_field_isolation_across_all_fields() {
    for field in registers::FIELDS {
        if !field.register.is_writable() {
            continue;
        }
        for background in [0x00u8, 0xFF, 0b1010_1010, 0b0101_0001] {
            let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
            interface.set_packet_result(None);
            interface.set_register(field.register.address, background);

            driver.write_field(field, field.max_value()).unwrap();

            let after = interface.get_register(field.register.address);
            let mut untouched = !field.mask;
            if field.register == MAILBOX {
                untouched &= !MAILBOX_FOD_SCALER.mask;
            }
            assert_eq!(
                after & untouched,
                background & untouched,
                "{} disturbed other bits",
                field.name
            );
        }
    }
}

#[test]
fn test_mailbox_reserved_bit_always_cleared() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);

    // the device reports the reserved bit set; any field write must clear it
    interface.set_register(0xE0, 0x84);
    driver.write_field(MAILBOX_ALIGN, 1).unwrap();
    assert_eq!(interface.get_register(0xE0), 0x88);

    driver.write_field(MAILBOX_FOD_SCALER, 1).unwrap();
    assert_eq!(interface.get_register(0xE0) & 0x04, 0);

    driver.write_register(0xE0, 0xFF).unwrap();
    assert_eq!(interface.get_register(0xE0) & 0x04, 0);
}

#[test]
fn test_block_write_over_mailbox_is_sanitized() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);

    driver.write_block(0xE0, &[0x84, 0x04, 0x04]).unwrap();

    assert_eq!(interface.writes(), vec![(0xE0, vec![0x80, 0x04, 0x04])]);
}

#[test]
fn test_other_mailbox_writes_keep_send_bit() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.set_packet_result(None);

    driver.write_field(MAILBOX_USER_PKT_ERR, 0).unwrap();
    driver.set_alignment_aid(true).unwrap();

    for (address, data) in interface.writes() {
        assert_eq!(address, 0xE0);
        assert_eq!(data[0] & 0x80, 0x80, "send bit cleared as a side effect");
    }
}

#[test]
fn test_oversized_field_value_truncated() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.set_register(0x01, 0x00);

    driver.write_field(VO_REG_TARGET, 0x0F).unwrap();

    assert_eq!(interface.get_register(0x01), 0x07);
}

#[test]
fn test_whole_register_alias() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.set_register(0x02, 0x05);

    assert_eq!(driver.read_field(registers::IO_REG.whole()).unwrap(), 0x05);
    driver.write_field(registers::IO_REG.whole(), 0x03).unwrap();
    assert_eq!(driver.read_field(IO_REG_ILIM).unwrap(), 0x03);
}

#[test]
fn test_read_only_field_rejected_without_bus_access() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);

    let result = driver.write_field(registers::MODE_IND_MODE, 1);

    assert_eq!(result, Err(Error::ReadOnlyRegister(0xEF)));
    assert_eq!(interface.transaction_count(), 0);
}

#[test]
fn test_read_only_block_rejected() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);

    assert_eq!(
        driver.write_block(0xE2, &[0x00, 0x00]),
        Err(Error::ReadOnlyRegister(0xE3))
    );
    assert_eq!(
        driver.write_register(0xF5, 0x00),
        Err(Error::ReadOnlyRegister(0xF5))
    );
    assert_eq!(interface.transaction_count(), 0);
}

#[test]
fn test_oversized_block_rejected_without_bus_access() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);

    assert_eq!(
        driver.write_block(0x01, &[0x11; 8]),
        Err(Error::InvalidLength(8))
    );
    assert_eq!(interface.transaction_count(), 0);
    assert_eq!(interface.get_register(0x01), 0x01);

    // six bytes is the largest block and still goes out whole
    driver.write_block(0x10, &[1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(interface.writes(), vec![(0x10, vec![1, 2, 3, 4, 5, 6])]);
}
