//! Injectable diagnostics
//!
//! Conditions the driver absorbs instead of returning as errors (a register
//! the variant does not implement) and transport failures are reported to an
//! optional hook installed with
//! [`Bq51Driver::with_diagnostics`](crate::Bq51Driver::with_diagnostics).
//! The same events are also logged through `defmt`/`log` when those features
//! are enabled.

use crate::variant::Variant;

/// Event reported to a [`DiagnosticHook`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Diagnostic {
    /// A register absent on the active variant was requested; a sentinel
    /// was returned and no bus transaction was issued
    UnsupportedRegister {
        /// Active variant
        variant: Variant,
        /// Register name
        register: &'static str,
    },
    /// The transport reported failure for an access to this register
    TransportFailure {
        /// Register name, or `"?"` for an address outside the map
        register: &'static str,
    },
}

/// Diagnostic callback, called synchronously from the driver
pub type DiagnosticHook = fn(&Diagnostic);
