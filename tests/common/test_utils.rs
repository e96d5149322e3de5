//! Test utilities and helper functions

use crate::common::mock_interface::MockInterface;
use bq51::{Bq51Driver, Diagnostic, Variant};
use std::cell::RefCell;

/// Mock delay implementation for testing
///
/// Counts requested milliseconds instead of sleeping.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockDelay {
    /// Total milliseconds requested
    pub elapsed_ms: u32,
}

impl embedded_hal::delay::DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {
        // No-op for testing
    }

    fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms += ms;
    }
}

#[cfg(feature = "async")]
impl embedded_hal_async::delay::DelayNs for MockDelay {
    async fn delay_ns(&mut self, _ns: u32) {
        // No-op for testing
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms += ms;
    }
}

/// Create a mock driver for testing
/// Returns (driver, interface) where interface is a clone that shares state with the driver
pub fn create_mock_driver(variant: Variant) -> (Bq51Driver<MockInterface>, MockInterface) {
    let interface = MockInterface::new();
    let interface_clone = interface.clone();
    let driver = Bq51Driver::new(interface, variant);
    (driver, interface_clone)
}

thread_local! {
    static DIAGNOSTICS: RefCell<Vec<Diagnostic>> = const { RefCell::new(Vec::new()) };
}

/// Diagnostic hook that records into a per-thread log
pub fn record_diagnostic(diagnostic: &Diagnostic) {
    DIAGNOSTICS.with(|log| log.borrow_mut().push(*diagnostic));
}

/// Drain the diagnostics recorded on this thread
pub fn take_diagnostics() -> Vec<Diagnostic> {
    DIAGNOSTICS.with(|log| log.borrow_mut().drain(..).collect())
}

/// Create a mock driver with the recording diagnostic hook installed
pub fn create_recording_driver(variant: Variant) -> (Bq51Driver<MockInterface>, MockInterface) {
    take_diagnostics();
    let (driver, interface) = create_mock_driver(variant);
    (driver.with_diagnostics(record_diagnostic), interface)
}

/// Assert that two floating point values are approximately equal
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    let diff = (a - b).abs();
    assert!(
        diff < epsilon,
        "Values not equal within epsilon: {} vs {} (diff: {}, epsilon: {})",
        a,
        b,
        diff,
        epsilon
    );
}
