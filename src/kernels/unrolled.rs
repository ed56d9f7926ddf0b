//! Portable kernels unrolled by four.
//!
//! Four independent accumulators break the add dependency chain; the remainder
//! (`len % 4`) is folded into the first one. The functions are multiversioned with
//! the static dispatcher, so the clone matching the compile-time target features is
//! chosen without any runtime detection.

use std::ops::{Add, AddAssign, Mul};

use multiversion::multiversion;
use num_complex::Complex32;
use num_traits::Zero;

use super::{Kernel, PATTERN_LEN};
use crate::utils::{chunked_fold, chunked_for_each_mut};

/// Group-of-four multiply-accumulate backend
pub enum Unrolled {}

const UNROLL: usize = 4;

#[multiversion(targets(
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
), dispatcher = "static")]
#[inline]
pub(crate) fn dot_unrolled<H: Copy + Mul<X, Output = X>, X: Copy + Zero + AddAssign + Add<Output = X>>(
    h: &[H],
    x: &[X],
) -> X {
    let [s0, s1, s2, s3] = chunked_fold::<_, _, _, UNROLL>(
        h,
        x,
        [X::zero(); UNROLL],
        |mut acc, h_chunk, x_chunk| {
            acc[0] += h_chunk[0] * x_chunk[0];
            acc[1] += h_chunk[1] * x_chunk[1];
            acc[2] += h_chunk[2] * x_chunk[2];
            acc[3] += h_chunk[3] * x_chunk[3];
            acc
        },
        |mut acc, h_i, x_i| {
            acc[0] += *h_i * *x_i;
            acc
        },
    );

    // Combine all partial sums
    (s0 + s1) + (s2 + s3)
}

#[multiversion(targets(
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
), dispatcher = "static")]
pub(crate) fn xor_pattern_portable(data: &mut [u8], pattern: &[u8; PATTERN_LEN]) {
    chunked_for_each_mut::<_, PATTERN_LEN>(
        data,
        |chunk| {
            chunk
                .iter_mut()
                .zip(pattern.iter())
                .for_each(|(byte, mask)| *byte ^= *mask);
        },
        |i, byte| *byte ^= pattern[i % PATTERN_LEN],
    );
}

impl Kernel for Unrolled {
    const NAME: &'static str = "unrolled";

    fn dot_rrrf(h: &[f32], x: &[f32]) -> f32 {
        dot_unrolled(h, x)
    }

    fn dot_crcf(h: &[f32], x: &[Complex32]) -> Complex32 {
        dot_unrolled(h, x)
    }

    fn dot_cccf(h: &[Complex32], x: &[Complex32]) -> Complex32 {
        dot_unrolled(h, x)
    }

    fn xor_pattern(data: &mut [u8], pattern: &[u8; PATTERN_LEN]) {
        xor_pattern_portable(data, pattern);
    }
}
