//! Reference kernels: one accumulator, forward index order.

use std::ops::{AddAssign, Mul};

use num_complex::Complex32;
use num_traits::Zero;

use super::{Kernel, PATTERN_LEN};

/// Ordinal multiply-accumulate backend
pub enum Scalar {}

/// `Σ h[i] * x[i]`, accumulated left to right
///
/// # Panics
///
/// Panics if `h.len() != x.len()`
#[inline]
pub(crate) fn dot_ordinal<H, X>(h: &[H], x: &[X]) -> X
where
    H: Copy + Mul<X, Output = X>,
    X: Copy + Zero + AddAssign,
{
    assert_eq!(h.len(), x.len());

    let mut r = X::zero();
    for (h_i, x_i) in h.iter().zip(x.iter()) {
        r += *h_i * *x_i;
    }
    r
}

impl Kernel for Scalar {
    const NAME: &'static str = "scalar";

    fn dot_rrrf(h: &[f32], x: &[f32]) -> f32 {
        dot_ordinal(h, x)
    }

    fn dot_crcf(h: &[f32], x: &[Complex32]) -> Complex32 {
        dot_ordinal(h, x)
    }

    fn dot_cccf(h: &[Complex32], x: &[Complex32]) -> Complex32 {
        dot_ordinal(h, x)
    }

    fn xor_pattern(data: &mut [u8], pattern: &[u8; PATTERN_LEN]) {
        for (i, byte) in data.iter_mut().enumerate() {
            *byte ^= pattern[i % PATTERN_LEN];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_zero() {
        assert_eq!(Scalar::dot_rrrf(&[], &[]), 0.0);
        assert_eq!(Scalar::dot_cccf(&[], &[]), Complex32::new(0.0, 0.0));
    }

    #[test]
    fn complex_products() {
        // (1 + 2j)(3 - 1j) = 5 + 5j, (0 + 1j)(0 + 1j) = -1
        let h = [Complex32::new(1.0, 2.0), Complex32::new(0.0, 1.0)];
        let x = [Complex32::new(3.0, -1.0), Complex32::new(0.0, 1.0)];
        assert_eq!(Scalar::dot_cccf(&h, &x), Complex32::new(4.0, 5.0));
    }

    #[test]
    fn real_taps_scale_both_components() {
        let h = [2.0, -1.0];
        let x = [Complex32::new(1.0, 1.0), Complex32::new(3.0, -2.0)];
        assert_eq!(Scalar::dot_crcf(&h, &x), Complex32::new(-1.0, 4.0));
    }

    #[test]
    fn xor_pattern_wraps_every_32_bytes() {
        let mut pattern = [0u8; PATTERN_LEN];
        pattern[0] = 0xff;
        let mut data = vec![0u8; 70];
        Scalar::xor_pattern(&mut data, &pattern);
        for (i, byte) in data.iter().enumerate() {
            assert_eq!(*byte, if i % 32 == 0 { 0xff } else { 0 });
        }
    }

    #[test]
    #[should_panic]
    fn mismatched_lengths_panic() {
        Scalar::dot_rrrf(&[1.0, 2.0], &[1.0]);
    }
}
