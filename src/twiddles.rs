use std::f64::consts::PI;

use num_complex::Complex32;

/// Roots of unity `exp(-iπk / dist)` for `k in 0..dist`.
///
/// Angles are evaluated in `f64` and rounded once to `f32`.
pub(crate) fn generate_twiddles(dist: usize) -> Vec<Complex32> {
    let angle_mult = -PI / dist as f64;
    (0..dist)
        .map(|k| {
            let (sin, cos) = (angle_mult * k as f64).sin_cos();
            Complex32::new(cos as f32, sin as f32)
        })
        .collect()
}

/// The twiddles of the next (half-sized) stage: every other factor
pub(crate) fn filter_twiddles(twiddles: &[Complex32]) -> Vec<Complex32> {
    twiddles.iter().step_by(2).copied().collect()
}

/// Twiddle tables for every DIF stage of a `len`-point transform whose distance
/// is at least 4, ordered from the first stage (`dist = len / 2`) down.
///
/// The two smallest stages use hard-coded factors and get no table.
pub(crate) fn generate_stage_twiddles(len: usize) -> Vec<Vec<Complex32>> {
    assert!(len.is_power_of_two());

    let mut stages = Vec::new();
    let mut dist = len >> 1;
    if dist < 4 {
        return stages;
    }

    let mut twiddles = generate_twiddles(dist);
    while dist >= 4 {
        let next = filter_twiddles(&twiddles);
        stages.push(twiddles);
        twiddles = next;
        dist >>= 1;
    }
    stages
}
