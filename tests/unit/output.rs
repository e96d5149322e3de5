//! Unit tests for output regulation and status readings

use crate::common::{Operation, assert_float_eq, create_mock_driver};
use bq51::units;
use bq51::{CurrentLimit, Variant};

#[test]
fn test_vo_reg_code_table() {
    assert_eq!(units::vo_reg_millivolts(0), 450);
    assert_eq!(units::vo_reg_millivolts(7), 800);
    for code in 0..=7 {
        assert_eq!(units::vo_reg_code(units::vo_reg_millivolts(code)), code);
    }
}

#[test]
fn test_ilim_table() {
    assert_eq!(CurrentLimit::from_bits(6).percent(), 90);
    assert_eq!(CurrentLimit::from_bits(7).percent(), 100);
    assert_eq!(CurrentLimit::from_bits(3).percent(), 40);
}

#[test]
fn test_set_vo_reg_millivolts_rounds_and_clamps() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);

    driver.set_vo_reg_millivolts(620).unwrap();
    assert_eq!(interface.get_register(0x01), 3);
    assert_eq!(driver.vo_reg_millivolts().unwrap(), 600);

    driver.set_vo_reg_millivolts(5000).unwrap();
    assert_eq!(driver.vo_reg_code().unwrap(), 7);

    driver.set_vo_reg_millivolts(0).unwrap();
    assert_eq!(driver.vo_reg_code().unwrap(), 0);
}

#[test]
fn test_current_limit_roundtrip() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);

    assert_eq!(driver.current_limit().unwrap(), CurrentLimit::Percent100);
    driver.set_current_limit(CurrentLimit::Percent30).unwrap();
    assert_eq!(interface.get_register(0x02), 2);
    assert_eq!(driver.current_limit().unwrap(), CurrentLimit::Percent30);
}

#[test]
fn test_output_config_is_one_transaction() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.set_register(0x01, 0x04);
    interface.set_register(0x02, 0x06);

    let config = driver.read_output_config().unwrap();

    assert_eq!(config.vo_reg_millivolts(), 650);
    assert_eq!(config.current_limit, CurrentLimit::Percent90);
    assert_eq!(
        interface.operations(),
        vec![Operation::Read {
            address: 0x01,
            len: 2
        }]
    );
}

#[test]
fn test_output_status_units() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.set_register(0xE3, 0x80);
    interface.set_register(0xE4, 100);
    interface.set_register(0xE8, 50);

    let status = driver.read_output_status().unwrap();

    assert_float_eq(status.vrect, 5.888, 0.001);
    assert_float_eq(status.vout, 4.6, 0.001);
    assert_float_eq(status.received_power, 1.95, 0.001);
    assert_eq!(interface.transaction_count(), 3);
}

#[test]
fn test_connection_check() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    assert!(driver.connection_check().unwrap());
    assert_eq!(interface.transaction_count(), 1);

    interface.set_register(0x02, 0x17);
    assert!(!driver.connection_check().unwrap());

    interface.set_register(0x02, 0x07);
    interface.set_register(0x01, 0xFF);
    assert!(!driver.connection_check().unwrap());
}

#[test]
fn test_config_resets() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    driver.set_vo_reg_code(5).unwrap();
    driver.set_current_limit(CurrentLimit::Percent10).unwrap();

    driver.reset_vo_reg().unwrap();
    driver.reset_io_reg().unwrap();

    assert_eq!(interface.get_register(0x01), 0x01);
    assert_eq!(interface.get_register(0x02), 0x07);
}
