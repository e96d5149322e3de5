//! Logging shims
//!
//! Forwards to `defmt` and/or `log` depending on the enabled features. With
//! neither feature enabled the macros expand to nothing.

macro_rules! trace {
    ($($args:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::trace!($($args)*);
        #[cfg(feature = "log")]
        ::log::trace!($($args)*);
    };
}

macro_rules! debug {
    ($($args:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::debug!($($args)*);
        #[cfg(feature = "log")]
        ::log::debug!($($args)*);
    };
}

macro_rules! warn_ {
    ($($args:tt)*) => {
        #[cfg(feature = "defmt")]
        ::defmt::warn!($($args)*);
        #[cfg(feature = "log")]
        ::log::warn!($($args)*);
    };
}

// `warn` alone collides with the built-in lint attribute
#[allow(unused_imports)]
pub(crate) use {debug, trace, warn_ as warn};
