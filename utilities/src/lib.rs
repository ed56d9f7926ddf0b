pub extern crate rustfft;

// export rustfft to phastdsp
use rand::{distributions::Uniform, prelude::*};
use rustfft::num_complex::Complex32;
use rustfft::num_traits::Float;

/// Asserts that two fp numbers are approximately equal.
///
/// # Panics
///
/// Panics if `actual` and `expected` are too far from each other
#[allow(dead_code)]
#[track_caller]
pub fn assert_float_closeness<T: Float + std::fmt::Display>(actual: T, expected: T, epsilon: T) {
    if (actual - expected).abs() >= epsilon {
        panic!(
            "Assertion failed: {actual} too far from expected value {expected} (with epsilon {epsilon})",
        );
    }
}

/// Asserts that `actual` is within `rel_tol` of `expected`, relative to `scale`.
///
/// `scale` is usually the sum of absolute products, so that cancellation in the
/// expected value does not shrink the tolerance to nothing.
///
/// # Panics
///
/// Panics if the relative error exceeds `rel_tol`
#[track_caller]
pub fn assert_relative_closeness(actual: f64, expected: f64, scale: f64, rel_tol: f64) {
    let err = (actual - expected).abs();
    let bound = rel_tol * scale.max(1.0);
    if err > bound {
        panic!(
            "Assertion failed: {actual} differs from {expected} by {err} (allowed {bound}, rel_tol {rel_tol})",
        );
    }
}

/// Generate `len` uniformly distributed reals in `[-1, 1)` from `seed`
pub fn gen_random_reals(len: usize, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let uniform_dist = Uniform::new(-1.0_f32, 1.0_f32);
    (0..len).map(|_| uniform_dist.sample(&mut rng)).collect()
}

/// Generate `len` complex samples with both components uniform in `[-1, 1)`
pub fn gen_random_complex(len: usize, seed: u64) -> Vec<Complex32> {
    let mut rng = StdRng::seed_from_u64(seed);
    let uniform_dist = Uniform::new(-1.0_f32, 1.0_f32);
    (0..len)
        .map(|_| Complex32::new(uniform_dist.sample(&mut rng), uniform_dist.sample(&mut rng)))
        .collect()
}

/// Generate `len` random bytes from `seed`
pub fn gen_random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bytes = vec![0u8; len];
    rng.fill_bytes(&mut bytes);
    bytes
}
