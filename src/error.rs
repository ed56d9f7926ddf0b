//! Error type shared by the dot-product objects and FFT plans.

use std::collections::TryReserveError;

/// Status code for a successful call at the C boundary
pub const STATUS_OK: i32 = 0;
/// Status code for a null or otherwise invalid handle
pub const STATUS_EIOBJ: i32 = 2;
/// Status code for an unsupported mode or configuration
pub const STATUS_EUMODE: i32 = 7;
/// Status code for a failed memory allocation
pub const STATUS_EIMEM: i32 = 9;

/// Errors reported by phastdsp objects.
///
/// Precondition violations (short input slices, buffers smaller than the FFT
/// size) are not represented here: they panic in safe Rust.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Reserving space for the coefficient buffer failed.
    #[error("failed to allocate {requested} coefficients")]
    Allocation {
        requested: usize,
        #[source]
        source: TryReserveError,
    },

    /// The requested FFT size has no accelerated instance, or acceleration is
    /// not compiled in. Callers should use a generic FFT instead.
    #[error("unsupported fft mode: size {size} has no accelerated instance")]
    UnsupportedMode { size: usize },
}

impl Error {
    /// The status code this error maps to at the C boundary
    pub fn code(&self) -> i32 {
        match self {
            Error::Allocation { .. } => STATUS_EIMEM,
            Error::UnsupportedMode { .. } => STATUS_EUMODE,
        }
    }

    pub(crate) fn allocation(requested: usize, source: TryReserveError) -> Self {
        Error::Allocation { requested, source }
    }
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
