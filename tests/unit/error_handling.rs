//! Unit tests for transport failure propagation

use crate::common::{MockError, Operation, create_mock_driver, create_recording_driver, take_diagnostics};
use bq51::{Diagnostic, Error, Variant};

#[test]
fn test_read_failure_basic() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.fail_next_read();

    let result = driver.vrect_volts();
    assert_eq!(result, Err(Error::Bus(MockError::Communication)));
}

#[test]
fn test_read_failure_recovery() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.fail_next_read();

    assert!(driver.vout_raw().is_err(), "First read should fail");
    assert!(driver.vout_raw().is_ok(), "Failure is only injected once");
}

#[test]
fn test_failed_field_read_never_writes() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.fail_next_read();

    assert!(driver.set_current_limit(bq51::CurrentLimit::Percent50).is_err());
    assert!(interface.writes().is_empty());
    assert_eq!(interface.get_register(0x02), 0x07);
}

#[test]
fn test_write_failure_reported() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.fail_next_write();

    assert_eq!(
        driver.set_user_header(0x18),
        Err(Error::Bus(MockError::Communication))
    );
}

#[test]
fn test_transport_failure_diagnostic() {
    let (mut driver, interface) = create_recording_driver(Variant::Bq51222);
    interface.fail_next_read();

    let _ = driver.received_power_raw();

    assert_eq!(
        take_diagnostics(),
        vec![Diagnostic::TransportFailure {
            register: "REC_PWR_STATUS_RAM"
        }]
    );
}

#[test]
fn test_unknown_address_failure_diagnostic() {
    let (mut driver, interface) = create_recording_driver(Variant::Bq51222);
    interface.fail_next_read();

    let _ = driver.read_register(0x10);

    assert_eq!(
        take_diagnostics(),
        vec![Diagnostic::TransportFailure { register: "?" }]
    );
}

#[test]
fn test_connection_check_failure_is_error() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.fail_next_read();

    assert!(driver.connection_check().is_err());
}

#[test]
fn test_reset_all_short_circuits() {
    let (mut driver, interface) = create_mock_driver(Variant::Bq51222);
    interface.fail_next_write();

    assert!(driver.reset_all_registers().is_err());
    assert_eq!(
        interface.operations(),
        vec![Operation::Write {
            address: 0x01,
            data: vec![0x01, 0x07]
        }]
    );
}

#[test]
fn test_error_helpers() {
    let error: Error<MockError> = MockError::Communication.into();
    assert!(error.is_bus());
    assert!(!Error::<MockError>::PacketTimeout.is_bus());
    assert!(!Error::<MockError>::ReadOnlyRegister(0xE3).is_bus());
}
