//! x86_64 AVX2 + FMA kernels.
//!
//! Only compiled when `build.rs` selected this backend, which guarantees that
//! `avx2` and `fma` are enabled for the whole compilation.

use std::arch::x86_64::*;

use num_complex::Complex32;

use super::{Kernel, PATTERN_LEN};
use crate::utils::{chunked_fold, chunked_for_each_mut};

/// AVX2 + FMA backend
pub enum Avx2 {}

/// `f32` lanes per 256-bit register
const LANES: usize = 8;
/// Complex samples per 256-bit register
const COMPLEX_LANES: usize = LANES / 2;

/// Horizontal sum of the 256-bit register
#[inline(always)]
unsafe fn hsum_ps(v: __m256) -> f32 {
    // v = [a, b, c, d, e, f, g, h]
    let hi = _mm256_extractf128_ps(v, 1); // [e, f, g, h]
    let lo = _mm256_castps256_ps128(v); // [a, b, c, d]
    let sum128 = _mm_add_ps(lo, hi); // [a+e, b+f, c+g, d+h]
    let shuf = _mm_movehdup_ps(sum128); // [b+f, b+f, d+h, d+h]
    let sums = _mm_add_ps(sum128, shuf);
    let shuf2 = _mm_movehl_ps(sums, sums);
    _mm_cvtss_f32(_mm_add_ss(sums, shuf2))
}

/// Sums the four interleaved complex values held in `v`
#[inline(always)]
unsafe fn hsum_complex(v: __m256) -> Complex32 {
    // v = [r0, i0, r1, i1, r2, i2, r3, i3]
    let hi = _mm256_extractf128_ps(v, 1); // [r2, i2, r3, i3]
    let lo = _mm256_castps256_ps128(v); // [r0, i0, r1, i1]
    let sum128 = _mm_add_ps(lo, hi); // [r0+r2, i0+i2, r1+r3, i1+i3]
    let folded = _mm_add_ps(sum128, _mm_movehl_ps(sum128, sum128));

    let mut out = [0.0f32; 4];
    _mm_storeu_ps(out.as_mut_ptr(), folded);
    Complex32::new(out[0], out[1])
}

impl Kernel for Avx2 {
    const NAME: &'static str = "avx2";

    fn dot_rrrf(h: &[f32], x: &[f32]) -> f32 {
        unsafe {
            let (acc, tail) = chunked_fold::<_, _, _, LANES>(
                h,
                x,
                (_mm256_setzero_ps(), 0.0f32),
                |(acc, tail), h_chunk, x_chunk| {
                    let h_vec = _mm256_loadu_ps(h_chunk.as_ptr());
                    let x_vec = _mm256_loadu_ps(x_chunk.as_ptr());
                    (_mm256_fmadd_ps(h_vec, x_vec, acc), tail)
                },
                |(acc, tail), h_i, x_i| (acc, tail + h_i * x_i),
            );
            hsum_ps(acc) + tail
        }
    }

    fn dot_crcf(h: &[f32], x: &[Complex32]) -> Complex32 {
        unsafe {
            // [h0, h0, h1, h1, h2, h2, h3, h3]
            let spread = _mm256_setr_epi32(0, 0, 1, 1, 2, 2, 3, 3);
            let (acc, tail) = chunked_fold::<_, _, _, COMPLEX_LANES>(
                h,
                x,
                (_mm256_setzero_ps(), Complex32::new(0.0, 0.0)),
                |(acc, tail), h_chunk, x_chunk| {
                    let h4 = _mm256_castps128_ps256(_mm_loadu_ps(h_chunk.as_ptr()));
                    let h_vec = _mm256_permutevar8x32_ps(h4, spread);
                    let x_vec = _mm256_loadu_ps(x_chunk.as_ptr().cast::<f32>());
                    (_mm256_fmadd_ps(h_vec, x_vec, acc), tail)
                },
                |(acc, tail), h_i, x_i| (acc, tail + *h_i * *x_i),
            );
            hsum_complex(acc) + tail
        }
    }

    fn dot_cccf(h: &[Complex32], x: &[Complex32]) -> Complex32 {
        unsafe {
            let (acc, tail) = chunked_fold::<_, _, _, COMPLEX_LANES>(
                h,
                x,
                (_mm256_setzero_ps(), Complex32::new(0.0, 0.0)),
                |(acc, tail), h_chunk, x_chunk| {
                    let h_vec = _mm256_loadu_ps(h_chunk.as_ptr().cast::<f32>());
                    let x_vec = _mm256_loadu_ps(x_chunk.as_ptr().cast::<f32>());

                    let h_re = _mm256_moveldup_ps(h_vec); // [hr, hr, ...]
                    let h_im = _mm256_movehdup_ps(h_vec); // [hi, hi, ...]
                    let x_swap = _mm256_permute_ps(x_vec, 0b10_11_00_01); // [xi, xr, ...]

                    // even lanes: hr*xr - hi*xi, odd lanes: hr*xi + hi*xr
                    let cross = _mm256_mul_ps(h_im, x_swap);
                    let prod = _mm256_fmaddsub_ps(h_re, x_vec, cross);
                    (_mm256_add_ps(acc, prod), tail)
                },
                |(acc, tail), h_i, x_i| (acc, tail + *h_i * *x_i),
            );
            hsum_complex(acc) + tail
        }
    }

    fn xor_pattern(data: &mut [u8], pattern: &[u8; PATTERN_LEN]) {
        unsafe {
            let mask = _mm256_loadu_si256(pattern.as_ptr().cast::<__m256i>());
            chunked_for_each_mut::<_, PATTERN_LEN>(
                data,
                |chunk| {
                    let ptr = chunk.as_mut_ptr().cast::<__m256i>();
                    let x = _mm256_loadu_si256(ptr);
                    _mm256_storeu_si256(ptr, _mm256_xor_si256(x, mask));
                },
                |i, byte| *byte ^= pattern[i % PATTERN_LEN],
            );
        }
    }
}
