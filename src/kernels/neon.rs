//! aarch64 NEON kernels.
//!
//! Complex operands are split into real and imaginary planes on load with
//! `vld2q_f32`, so each iteration handles four complex samples.

use std::arch::aarch64::*;

use num_complex::Complex32;

use super::{Kernel, PATTERN_LEN};
use crate::utils::{chunked_fold, chunked_for_each_mut};

/// NEON backend
pub enum Neon {}

/// `f32` lanes per 128-bit register
const LANES: usize = 4;
/// Bytes per 128-bit register
const BYTE_LANES: usize = 16;

impl Kernel for Neon {
    const NAME: &'static str = "neon";

    fn dot_rrrf(h: &[f32], x: &[f32]) -> f32 {
        unsafe {
            let (acc, tail) = chunked_fold::<_, _, _, LANES>(
                h,
                x,
                (vdupq_n_f32(0.0), 0.0f32),
                |(acc, tail), h_chunk, x_chunk| {
                    let h_vec = vld1q_f32(h_chunk.as_ptr());
                    let x_vec = vld1q_f32(x_chunk.as_ptr());
                    (vfmaq_f32(acc, h_vec, x_vec), tail)
                },
                |(acc, tail), h_i, x_i| (acc, tail + h_i * x_i),
            );
            vaddvq_f32(acc) + tail
        }
    }

    fn dot_crcf(h: &[f32], x: &[Complex32]) -> Complex32 {
        unsafe {
            let zero = vdupq_n_f32(0.0);
            let (acc_re, acc_im, tail) = chunked_fold::<_, _, _, LANES>(
                h,
                x,
                (zero, zero, Complex32::new(0.0, 0.0)),
                |(acc_re, acc_im, tail), h_chunk, x_chunk| {
                    let h_vec = vld1q_f32(h_chunk.as_ptr());
                    let x_vec = vld2q_f32(x_chunk.as_ptr().cast::<f32>());
                    (
                        vfmaq_f32(acc_re, h_vec, x_vec.0),
                        vfmaq_f32(acc_im, h_vec, x_vec.1),
                        tail,
                    )
                },
                |(acc_re, acc_im, tail), h_i, x_i| (acc_re, acc_im, tail + *h_i * *x_i),
            );
            Complex32::new(vaddvq_f32(acc_re), vaddvq_f32(acc_im)) + tail
        }
    }

    fn dot_cccf(h: &[Complex32], x: &[Complex32]) -> Complex32 {
        unsafe {
            let zero = vdupq_n_f32(0.0);
            let (acc_re, acc_im, tail) = chunked_fold::<_, _, _, LANES>(
                h,
                x,
                (zero, zero, Complex32::new(0.0, 0.0)),
                |(acc_re, acc_im, tail), h_chunk, x_chunk| {
                    let h_vec = vld2q_f32(h_chunk.as_ptr().cast::<f32>());
                    let x_vec = vld2q_f32(x_chunk.as_ptr().cast::<f32>());

                    // re += hr*xr - hi*xi
                    let acc_re = vfmaq_f32(acc_re, h_vec.0, x_vec.0);
                    let acc_re = vfmsq_f32(acc_re, h_vec.1, x_vec.1);
                    // im += hr*xi + hi*xr
                    let acc_im = vfmaq_f32(acc_im, h_vec.0, x_vec.1);
                    let acc_im = vfmaq_f32(acc_im, h_vec.1, x_vec.0);
                    (acc_re, acc_im, tail)
                },
                |(acc_re, acc_im, tail), h_i, x_i| (acc_re, acc_im, tail + *h_i * *x_i),
            );
            Complex32::new(vaddvq_f32(acc_re), vaddvq_f32(acc_im)) + tail
        }
    }

    fn xor_pattern(data: &mut [u8], pattern: &[u8; PATTERN_LEN]) {
        unsafe {
            let mask_lo = vld1q_u8(pattern.as_ptr());
            let mask_hi = vld1q_u8(pattern.as_ptr().add(BYTE_LANES));
            chunked_for_each_mut::<_, PATTERN_LEN>(
                data,
                |chunk| {
                    let lo = chunk.as_mut_ptr();
                    let hi = lo.add(BYTE_LANES);
                    vst1q_u8(lo, veorq_u8(vld1q_u8(lo), mask_lo));
                    vst1q_u8(hi, veorq_u8(vld1q_u8(hi), mask_hi));
                },
                |i, byte| *byte ^= pattern[i % PATTERN_LEN],
            );
        }
    }
}
