//! Power sums: `Σ |v[i]|²` over real and complex vectors.

use num_complex::Complex32;

use crate::kernels::{DefaultKernel, Kernel};
use crate::utils::as_reals;

/// `Σ v[i]²` on the build-time backend
#[inline]
pub fn sumsqf(v: &[f32]) -> f32 {
    sumsqf_with::<DefaultKernel>(v)
}

/// `Σ v[i]²` on backend `K`
#[inline]
pub fn sumsqf_with<K: Kernel>(v: &[f32]) -> f32 {
    K::sumsq(v)
}

/// `Σ |v[i]|²` on the build-time backend
#[inline]
pub fn sumsqcf(v: &[Complex32]) -> f32 {
    sumsqcf_with::<DefaultKernel>(v)
}

/// `Σ |v[i]|²` on backend `K`.
///
/// `|z|² = re² + im²`, so this is the real power sum over the interleaved view.
#[inline]
pub fn sumsqcf_with<K: Kernel>(v: &[Complex32]) -> f32 {
    K::sumsq(as_reals(v))
}
