//! The planner module binds a fixed-size complex FFT to caller buffers.
//!
//! Only the power-of-two sizes in [`SUPPORTED_SIZES`] have an accelerated
//! instance. Anything else is reported as [`Error::UnsupportedMode`] so the caller
//! can fall back to a general-purpose FFT. Instances (per-stage twiddles plus the
//! bit-reversal permutation) are built lazily, once per size, and shared by every
//! plan of that size.
//!
//! ```
//! use num_complex::Complex32;
//! use phastdsp::planner::{Direction, FftPlan};
//! use phastdsp::Error;
//!
//! let mut buf = vec![Complex32::new(0.0, 0.0); 16];
//! buf[0] = Complex32::new(1.0, 0.0);
//!
//! match FftPlan::create_in_place(16, &mut buf, Direction::Forward, 0) {
//!     Ok(mut plan) => {
//!         plan.execute();
//!         assert!(plan.output().iter().all(|z| *z == Complex32::new(1.0, 0.0)));
//!     }
//!     // built without `accel-fft`: hand the buffer to a generic FFT instead
//!     Err(Error::UnsupportedMode { size }) => assert_eq!(size, 16),
//!     Err(e) => panic!("{e}"),
//! }
//! ```

use std::fmt;
use std::sync::OnceLock;

use num_complex::Complex32;

use crate::error::{Error, Result};
use crate::kernels::fft::{fft_chunk_2, fft_chunk_4, fft_chunk_n};
use crate::twiddles::generate_stage_twiddles;

/// Forward is the regular FFT, Backward its unscaled inverse
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Twiddle exponent `-2πik/N`
    Forward = 1,
    /// Twiddle exponent `+2πik/N`.
    ///
    /// The output is never divided by `N`, so a forward then backward pass
    /// returns the input scaled by `N`, as with rustfft. Some vendor FFT
    /// libraries scale their inverse by `1/N`; callers switching from one of
    /// those must divide by `N` themselves.
    Backward = -1,
}

/// Sizes with an accelerated instance
pub const SUPPORTED_SIZES: [usize; 9] = [16, 32, 64, 128, 256, 512, 1024, 2048, 4096];

/// Whether `size` has an accelerated instance in this build
pub fn is_supported(size: usize) -> bool {
    cfg!(feature = "accel-fft") && SUPPORTED_SIZES.contains(&size)
}

/// A precomputed radix-2 DIF transform of one fixed size
pub(crate) struct FftInstance {
    len: usize,
    /// One table per stage with distance >= 4, first stage first
    stage_twiddles: Vec<Vec<Complex32>>,
    /// Index pairs `(i, rev(i))` with `i < rev(i)`
    bit_rev_swaps: Vec<(u16, u16)>,
}

impl FftInstance {
    fn new(len: usize) -> Self {
        debug_assert!(len.is_power_of_two() && len <= 1 << 16);
        let log_n = len.ilog2();

        let bit_rev_swaps = (0..len)
            .filter_map(|i| {
                let j = i.reverse_bits() >> (usize::BITS - log_n);
                (i < j).then_some((i as u16, j as u16))
            })
            .collect();

        Self {
            len,
            stage_twiddles: generate_stage_twiddles(len),
            bit_rev_swaps,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Transforms `buf[..len]` in place into natural-order output.
    ///
    /// # Panics
    ///
    /// Panics if `buf.len() < len`
    pub(crate) fn transform(&self, buf: &mut [Complex32], direction: Direction) {
        let buf = &mut buf[..self.len];

        // the inverse is conj(FFT(conj(x)))
        if direction == Direction::Backward {
            buf.iter_mut().for_each(|z| *z = z.conj());
        }

        for twiddles in &self.stage_twiddles {
            fft_chunk_n(buf, twiddles, twiddles.len());
        }
        fft_chunk_4(buf);
        fft_chunk_2(buf);

        for &(i, j) in &self.bit_rev_swaps {
            buf.swap(i as usize, j as usize);
        }

        if direction == Direction::Backward {
            buf.iter_mut().for_each(|z| *z = z.conj());
        }
    }
}

static INSTANCES: [OnceLock<FftInstance>; SUPPORTED_SIZES.len()] = [
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
    OnceLock::new(),
];

/// The shared instance for `size`, built on first use
pub(crate) fn lookup_instance(size: usize) -> Result<&'static FftInstance> {
    let slot = SUPPORTED_SIZES
        .iter()
        .position(|&s| s == size)
        .filter(|_| cfg!(feature = "accel-fft"));

    match slot {
        Some(slot) => Ok(INSTANCES[slot].get_or_init(|| FftInstance::new(size))),
        None => {
            tracing::debug!(size, accel = cfg!(feature = "accel-fft"), "no accelerated fft instance");
            Err(Error::UnsupportedMode { size })
        }
    }
}

enum PlanBuffers<'a> {
    InPlace(&'a mut [Complex32]),
    Split {
        input: &'a [Complex32],
        output: &'a mut [Complex32],
    },
}

/// An FFT of fixed size and direction bound to borrowed buffers.
///
/// The plan never owns its buffers. Dropping it releases only the plan; the
/// shared instance stays cached.
pub struct FftPlan<'a> {
    instance: &'static FftInstance,
    direction: Direction,
    flags: i32,
    buffers: PlanBuffers<'a>,
}

impl<'a> FftPlan<'a> {
    /// Plan a `size`-point transform from `input` into `output`.
    ///
    /// `flags` is stored and reported back, with the same `i32` the C ABI takes;
    /// it does not change the transform.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedMode`] if `size` is not in [`SUPPORTED_SIZES`] or
    /// acceleration is not compiled in. Neither buffer is touched in that case.
    ///
    /// # Panics
    ///
    /// Panics if either buffer is shorter than `size`
    pub fn create(
        size: usize,
        input: &'a [Complex32],
        output: &'a mut [Complex32],
        direction: Direction,
        flags: i32,
    ) -> Result<Self> {
        let instance = lookup_instance(size)?;
        assert!(input.len() >= size && output.len() >= size);
        Ok(Self::from_parts(
            instance,
            direction,
            flags,
            PlanBuffers::Split { input, output },
        ))
    }

    /// Plan a `size`-point transform that overwrites `buffer` with its own spectrum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedMode`] if `size` is not in [`SUPPORTED_SIZES`] or
    /// acceleration is not compiled in.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` is shorter than `size`
    pub fn create_in_place(
        size: usize,
        buffer: &'a mut [Complex32],
        direction: Direction,
        flags: i32,
    ) -> Result<Self> {
        let instance = lookup_instance(size)?;
        assert!(buffer.len() >= size);
        Ok(Self::from_parts(
            instance,
            direction,
            flags,
            PlanBuffers::InPlace(buffer),
        ))
    }

    fn from_parts(
        instance: &'static FftInstance,
        direction: Direction,
        flags: i32,
        buffers: PlanBuffers<'a>,
    ) -> Self {
        tracing::debug!(
            size = instance.len(),
            ?direction,
            flags,
            in_place = matches!(buffers, PlanBuffers::InPlace(_)),
            "created fft plan"
        );
        Self {
            instance,
            direction,
            flags,
            buffers,
        }
    }

    /// Copy the input into the output, then transform the output in place.
    ///
    /// Every call recomputes the output from the current input; only the first
    /// `size` samples of each buffer are used.
    pub fn execute(&mut self) {
        let n = self.instance.len();
        let out = match &mut self.buffers {
            PlanBuffers::InPlace(buf) => &mut buf[..n],
            PlanBuffers::Split { input, output } => {
                output[..n].copy_from_slice(&input[..n]);
                &mut output[..n]
            }
        };
        self.instance.transform(out, self.direction);
    }

    /// Transform size
    pub fn size(&self) -> usize {
        self.instance.len()
    }

    /// Transform direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Caller flags passed at creation
    pub fn flags(&self) -> i32 {
        self.flags
    }

    /// The first `size` samples of the output buffer
    pub fn output(&self) -> &[Complex32] {
        let n = self.instance.len();
        match &self.buffers {
            PlanBuffers::InPlace(buf) => &buf[..n],
            PlanBuffers::Split { output, .. } => &output[..n],
        }
    }

    /// Mutable access to the output buffer, e.g. to refill an in-place plan
    pub fn output_mut(&mut self) -> &mut [Complex32] {
        let n = self.instance.len();
        match &mut self.buffers {
            PlanBuffers::InPlace(buf) => &mut buf[..n],
            PlanBuffers::Split { output, .. } => &mut output[..n],
        }
    }
}

impl fmt::Debug for FftPlan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftPlan")
            .field("size", &self.size())
            .field("direction", &self.direction)
            .field("flags", &self.flags)
            .field("in_place", &matches!(self.buffers, PlanBuffers::InPlace(_)))
            .finish()
    }
}
