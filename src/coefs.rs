//! Owned coefficient storage for the structured dot product.
//!
//! The buffer length is the tap count: there is no separate length field that could
//! disagree with the stored taps.

use crate::error::{Error, Result};

/// Order in which caller taps are stored
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TapOrder {
    /// `stored[i] = taps[i]`
    Forward,
    /// `stored[i] = taps[N - 1 - i]`, for convolution with a naturally ordered window
    Reversed,
}

impl TapOrder {
    fn extend_from<T: Copy>(self, dst: &mut Vec<T>, src: &[T]) {
        match self {
            TapOrder::Forward => dst.extend_from_slice(src),
            TapOrder::Reversed => dst.extend(src.iter().rev().copied()),
        }
    }

    fn overwrite<T: Copy>(self, dst: &mut [T], src: &[T]) {
        debug_assert_eq!(dst.len(), src.len());
        match self {
            TapOrder::Forward => dst.copy_from_slice(src),
            TapOrder::Reversed => dst
                .iter_mut()
                .zip(src.iter().rev())
                .for_each(|(d, s)| *d = *s),
        }
    }
}

/// An exclusively owned, resizable run of filter taps
#[derive(Debug, Clone, PartialEq)]
pub struct CoefBuffer<T> {
    taps: Vec<T>,
}

impl<T: Copy> CoefBuffer<T> {
    /// Copies `taps` into a freshly allocated buffer in the given `order`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`] if the buffer cannot be reserved.
    pub fn new(taps: &[T], order: TapOrder) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(taps.len())
            .map_err(|e| Error::allocation(taps.len(), e))?;
        order.extend_from(&mut buf, taps);
        Ok(Self { taps: buf })
    }

    /// Replaces every stored tap with `taps` in the given `order`.
    ///
    /// The buffer is reallocated only if the tap count changes, and the new buffer
    /// is filled before it replaces the old one. Returns whether a reallocation
    /// happened.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`] if a resize was needed and failed; the old taps
    /// are left untouched in that case.
    pub fn resize_and_overwrite(&mut self, taps: &[T], order: TapOrder) -> Result<bool> {
        if taps.len() == self.taps.len() {
            order.overwrite(&mut self.taps, taps);
            return Ok(false);
        }

        *self = Self::new(taps, order)?;
        Ok(true)
    }

    /// The stored taps
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.taps
    }

    /// Number of stored taps
    #[inline]
    pub fn len(&self) -> usize {
        self.taps.len()
    }

    /// Whether no taps are stored
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }
}
