//! Utility functions such as chunked iteration and complex reinterpretation

use bytemuck::cast_slice;
use num_complex::Complex32;

/// Folds `a` and `b` pairwise: full chunks of `W` elements go to `chunk_op`,
/// the remaining `len % W` pairs go to `tail_op`, in index order.
///
/// Each chunk handed to `chunk_op` is exactly `W` elements long.
///
/// # Panics
///
/// Panics if `a.len() != b.len()`
#[inline(always)]
pub(crate) fn chunked_fold<A, B, Acc, const W: usize>(
    a: &[A],
    b: &[B],
    init: Acc,
    mut chunk_op: impl FnMut(Acc, &[A], &[B]) -> Acc,
    mut tail_op: impl FnMut(Acc, &A, &B) -> Acc,
) -> Acc {
    assert_eq!(a.len(), b.len());

    let a_chunks = a.chunks_exact(W);
    let b_chunks = b.chunks_exact(W);
    let a_rem = a_chunks.remainder();
    let b_rem = b_chunks.remainder();

    let acc = a_chunks
        .zip(b_chunks)
        .fold(init, |acc, (a_chunk, b_chunk)| chunk_op(acc, a_chunk, b_chunk));

    // Process the remainder, too small for the vectorized loop
    a_rem
        .iter()
        .zip(b_rem.iter())
        .fold(acc, |acc, (a, b)| tail_op(acc, a, b))
}

/// Transforms `data` in place: full chunks of `W` elements go to `chunk_op`,
/// each remaining element goes to `tail_op` together with its absolute index.
///
/// Each chunk handed to `chunk_op` is exactly `W` elements long.
#[inline(always)]
pub(crate) fn chunked_for_each_mut<T, const W: usize>(
    data: &mut [T],
    chunk_op: impl FnMut(&mut [T]),
    mut tail_op: impl FnMut(usize, &mut T),
) {
    let tail_start = data.len() - data.len() % W;

    let mut chunks = data.chunks_exact_mut(W);
    chunks.by_ref().for_each(chunk_op);

    // Process the remainder, too small for the vectorized loop
    chunks
        .into_remainder()
        .iter_mut()
        .enumerate()
        .for_each(|(i, value)| tail_op(tail_start + i, value));
}

/// Views `N` complex samples as `2N` interleaved reals
#[inline]
pub(crate) fn as_reals(signal: &[Complex32]) -> &[f32] {
    cast_slice(signal)
}
