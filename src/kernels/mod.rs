//! Dot-Product Kernels
//!
//! Every backend implements [`Kernel`] for the three element families used by the
//! structured dot product: real taps with real samples (`rrrf`), real taps with
//! complex samples (`crcf`) and complex taps with complex samples (`cccf`).
//!
//! The backend wired into [`DefaultKernel`] is picked by `build.rs` from the cargo
//! features, never at runtime:
//!
//! - `scalar`: ordinal multiply-accumulate, the numerical reference
//! - `unrolled`: four accumulators over groups of four, scalar remainder (default)
//! - `avx2`: x86_64 AVX2 + FMA intrinsics (`simd-avx2`)
//! - `neon`: aarch64 NEON intrinsics (`simd-neon`)
//!
//! `fft` holds the radix-2 butterflies used by the bounded FFT plan.

use num_complex::Complex32;

pub(crate) mod fft;
mod scalar;
mod unrolled;

#[cfg(dsp_backend = "avx2")]
mod avx2;
#[cfg(dsp_backend = "neon")]
mod neon;

#[cfg(dsp_backend = "avx2")]
pub use avx2::Avx2;
#[cfg(dsp_backend = "neon")]
pub use neon::Neon;
pub use scalar::Scalar;
pub use unrolled::Unrolled;

/// Length of the XOR pattern handed to [`Kernel::xor_pattern`], one 256-bit vector
pub const PATTERN_LEN: usize = 32;

/// A compile-time dot-product backend.
///
/// All slices passed to the dot-product methods have equal length; implementations
/// panic otherwise. For a given backend the result is a pure function of the inputs.
pub trait Kernel {
    /// Name reported in diagnostics
    const NAME: &'static str;

    /// `Σ h[i] * x[i]` over real taps and real samples
    fn dot_rrrf(h: &[f32], x: &[f32]) -> f32;

    /// `Σ h[i] * x[i]` over real taps and complex samples
    fn dot_crcf(h: &[f32], x: &[Complex32]) -> Complex32;

    /// `Σ h[i] * x[i]` over complex taps and complex samples
    fn dot_cccf(h: &[Complex32], x: &[Complex32]) -> Complex32;

    /// `Σ v[i]²`
    fn sumsq(v: &[f32]) -> f32 {
        Self::dot_rrrf(v, v)
    }

    /// XORs `data[i]` with `pattern[i % PATTERN_LEN]` for every `i`
    fn xor_pattern(data: &mut [u8], pattern: &[u8; PATTERN_LEN]);
}

/// The backend selected at build time
#[cfg(dsp_backend = "avx2")]
pub type DefaultKernel = Avx2;
/// The backend selected at build time
#[cfg(dsp_backend = "neon")]
pub type DefaultKernel = Neon;
/// The backend selected at build time
#[cfg(dsp_backend = "scalar")]
pub type DefaultKernel = Scalar;
/// The backend selected at build time
#[cfg(dsp_backend = "unrolled")]
pub type DefaultKernel = Unrolled;

/// Name of the backend selected at build time
pub const ACTIVE: &str = <DefaultKernel as Kernel>::NAME;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_backend_matches_build_script() {
        assert_eq!(ACTIVE, env!("PHASTDSP_BACKEND"));
    }

    #[test]
    fn four_tap_scenario_is_exact() {
        let h = [1.0, 2.0, 3.0, 4.0];
        let x = [4.0, 3.0, 2.0, 1.0];
        assert_eq!(Scalar::dot_rrrf(&h, &x), 20.0);
        assert_eq!(Unrolled::dot_rrrf(&h, &x), 20.0);
        assert_eq!(DefaultKernel::dot_rrrf(&h, &x), 20.0);
    }
}
