//! Data scrambling with a fixed repeating mask.
//!
//! Scrambling XORs byte `i` with `SCRAMBLE_MASK[i % 4]`, so it is its own
//! inverse. The soft variants work on one-byte-per-bit expansions of the same
//! data, MSB first: soft byte `8 * i + k` carries bit `7 - k` of byte `i`, and
//! is toggled with `0xFF` wherever that mask bit is set.
//!
//! Both patterns are expanded once to [`PATTERN_LEN`] bytes. The vector loop and
//! the scalar tail index the same table by absolute position, so they cannot
//! disagree on where the mask phase lies.

use crate::kernels::{DefaultKernel, Kernel, PATTERN_LEN};

/// The repeating 4-byte scramble mask
pub const SCRAMBLE_MASK: [u8; 4] = [0xb4, 0x6a, 0x8b, 0xe5];

/// Soft bytes per data byte
pub const SOFT_BITS_PER_BYTE: usize = 8;

const fn hard_pattern() -> [u8; PATTERN_LEN] {
    let mut pattern = [0u8; PATTERN_LEN];
    let mut i = 0;
    while i < PATTERN_LEN {
        pattern[i] = SCRAMBLE_MASK[i % SCRAMBLE_MASK.len()];
        i += 1;
    }
    pattern
}

const fn soft_pattern() -> [u8; PATTERN_LEN] {
    let mut pattern = [0u8; PATTERN_LEN];
    let mut i = 0;
    while i < PATTERN_LEN {
        let byte = SCRAMBLE_MASK[(i / SOFT_BITS_PER_BYTE) % SCRAMBLE_MASK.len()];
        let bit = 0x80u8 >> (i % SOFT_BITS_PER_BYTE);
        if byte & bit != 0 {
            pattern[i] = 0xFF;
        }
        i += 1;
    }
    pattern
}

/// [`SCRAMBLE_MASK`] repeated to one vector width
const HARD_PATTERN: [u8; PATTERN_LEN] = hard_pattern();

/// Soft expansion of [`SCRAMBLE_MASK`]: `0xFF` where the mask bit is set
const SOFT_PATTERN: [u8; PATTERN_LEN] = soft_pattern();

/// Scramble `data` in place on the build-time backend
pub fn scramble_data(data: &mut [u8]) {
    scramble_data_with::<DefaultKernel>(data);
}

/// Undo [`scramble_data`]; the operation is self-inverse
pub fn unscramble_data(data: &mut [u8]) {
    scramble_data_with::<DefaultKernel>(data);
}

/// Scramble soft bits in place on the build-time backend.
///
/// `soft` holds [`SOFT_BITS_PER_BYTE`] bytes per original data byte. A length that
/// is not a multiple of 8 is processed up to its end with the same phase.
pub fn scramble_data_soft(soft: &mut [u8]) {
    scramble_data_soft_with::<DefaultKernel>(soft);
}

/// Undo [`scramble_data_soft`]; the operation is self-inverse
pub fn unscramble_data_soft(soft: &mut [u8]) {
    scramble_data_soft_with::<DefaultKernel>(soft);
}

/// [`scramble_data`] on backend `K`
#[inline]
pub fn scramble_data_with<K: Kernel>(data: &mut [u8]) {
    K::xor_pattern(data, &HARD_PATTERN);
}

/// [`scramble_data_soft`] on backend `K`
#[inline]
pub fn scramble_data_soft_with<K: Kernel>(soft: &mut [u8]) {
    K::xor_pattern(soft, &SOFT_PATTERN);
}
