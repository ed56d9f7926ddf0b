//! Radix-2 DIF butterflies over interleaved complex samples.
//!
//! A stage with distance `dist` splits every chunk of `2 * dist` samples into two
//! halves and replaces `(a, b)` with `(a + b, (a - b) * w[k])`.

use multiversion::multiversion;
use num_complex::Complex;
use num_traits::Float;

#[multiversion(targets(
    "x86_64+avx2+fma",
    "x86_64+sse4.2",
    "x86+avx2+fma",
    "x86+sse4.2",
    "x86+sse2",
    "aarch64+neon",
), dispatcher = "static")]
#[inline]
pub(crate) fn fft_chunk_n<T: Float>(data: &mut [Complex<T>], twiddles: &[Complex<T>], dist: usize) {
    debug_assert_eq!(twiddles.len(), dist);
    let chunk_size = dist << 1;

    data.chunks_exact_mut(chunk_size).for_each(|chunk| {
        let (s0, s1) = chunk.split_at_mut(dist);

        s0.iter_mut()
            .zip(s1.iter_mut())
            .zip(twiddles.iter())
            .for_each(|((z0, z1), w)| {
                let c0 = *z0;
                let c1 = *z1;
                *z0 = c0 + c1;
                *z1 = (c0 - c1) * *w;
            });
    });
}

/// `chunk_size == 4`, so hard code twiddle factors
#[inline]
pub(crate) fn fft_chunk_4<T: Float>(data: &mut [Complex<T>]) {
    data.chunks_exact_mut(4).for_each(|chunk| {
        // W_4^0 = 1
        let c0 = chunk[0];
        let c1 = chunk[2];
        chunk[0] = c0 + c1;
        chunk[2] = c0 - c1;

        // W_4^1 = -i: (a + bi) * (-i) = b - ai
        let c0 = chunk[1];
        let c1 = chunk[3];
        let v = c0 - c1;
        chunk[1] = c0 + c1;
        chunk[3] = Complex::new(v.im, -v.re);
    });
}

/// `chunk_size == 2`, so skip phase
#[inline]
pub(crate) fn fft_chunk_2<T: Float>(data: &mut [Complex<T>]) {
    data.chunks_exact_mut(2).for_each(|chunk| {
        let z0 = chunk[0];
        let z1 = chunk[1];
        chunk[0] = z0 + z1;
        chunk[1] = z0 - z1;
    });
}
