//! The structured dot product: a coefficient buffer built once, then executed
//! against many input windows.
//!
//! ```
//! use phastdsp::dotprod::DotProdRrrf;
//!
//! let q = DotProdRrrf::create(&[1.0, 2.0, 3.0, 4.0]).unwrap();
//! assert_eq!(q.execute(&[4.0, 3.0, 2.0, 1.0]), 20.0);
//! ```
//!
//! The element family is a type parameter drawn from the closed set [`Rrrf`],
//! [`Crcf`] and [`Cccf`]; the backend is a second type parameter that defaults to
//! the one selected at build time, so `execute` compiles straight down to a single
//! kernel call.

use std::fmt;
use std::marker::PhantomData;

use num_complex::Complex32;
use num_traits::Zero;

use crate::coefs::{CoefBuffer, TapOrder};
use crate::error::Result;
use crate::kernels::{DefaultKernel, Kernel, Scalar, Unrolled};

mod private {
    pub trait Sealed {}
}

/// A coefficient/sample element family.
///
/// Implemented only for [`Rrrf`], [`Crcf`] and [`Cccf`].
pub trait Variant: private::Sealed {
    /// Tap type stored by the object
    type Coef: Copy + fmt::Debug;
    /// Input sample type, also the output type
    type Sample: Copy + Zero + fmt::Debug;

    /// Short family name, e.g. `"rrrf"`
    const NAME: &'static str;

    /// `Σ h[i] * x[i]` on backend `K`; slices have equal length
    fn dot<K: Kernel>(h: &[Self::Coef], x: &[Self::Sample]) -> Self::Sample;

    /// Writes one tap for [`DotProd::print`]
    fn fmt_tap(tap: &Self::Coef, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Real taps, real samples
pub enum Rrrf {}
/// Real taps, complex samples
pub enum Crcf {}
/// Complex taps, complex samples
pub enum Cccf {}

impl private::Sealed for Rrrf {}
impl private::Sealed for Crcf {}
impl private::Sealed for Cccf {}

impl Variant for Rrrf {
    type Coef = f32;
    type Sample = f32;
    const NAME: &'static str = "rrrf";

    #[inline]
    fn dot<K: Kernel>(h: &[f32], x: &[f32]) -> f32 {
        K::dot_rrrf(h, x)
    }

    fn fmt_tap(tap: &f32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{tap:12.8}")
    }
}

impl Variant for Crcf {
    type Coef = f32;
    type Sample = Complex32;
    const NAME: &'static str = "crcf";

    #[inline]
    fn dot<K: Kernel>(h: &[f32], x: &[Complex32]) -> Complex32 {
        K::dot_crcf(h, x)
    }

    fn fmt_tap(tap: &f32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{tap:12.8}")
    }
}

impl Variant for Cccf {
    type Coef = Complex32;
    type Sample = Complex32;
    const NAME: &'static str = "cccf";

    #[inline]
    fn dot<K: Kernel>(h: &[Complex32], x: &[Complex32]) -> Complex32 {
        K::dot_cccf(h, x)
    }

    fn fmt_tap(tap: &Complex32, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:12.8} + j*{:12.8}", tap.re, tap.im)
    }
}

/// Structured dot product over family `V` on backend `K`.
///
/// The object exclusively owns its taps. It is not internally synchronized:
/// `recreate*` needs `&mut self`, so the borrow checker already rules out a
/// concurrent `execute`.
pub struct DotProd<V: Variant, K: Kernel = DefaultKernel> {
    coefs: CoefBuffer<V::Coef>,
    _kernel: PhantomData<K>,
}

/// Real taps, real samples, on the build-time backend
pub type DotProdRrrf = DotProd<Rrrf>;
/// Real taps, complex samples, on the build-time backend
pub type DotProdCrcf = DotProd<Crcf>;
/// Complex taps, complex samples, on the build-time backend
pub type DotProdCccf = DotProd<Cccf>;

impl<V: Variant, K: Kernel> DotProd<V, K> {
    /// Create an object holding a copy of `taps` in forward order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Allocation`] if the coefficient buffer cannot be
    /// allocated.
    pub fn create(taps: &[V::Coef]) -> Result<Self> {
        Self::with_order(taps, TapOrder::Forward)
    }

    /// Create an object holding `taps` in reverse order, so that `execute` on a
    /// naturally ordered window computes a convolution.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Allocation`] if the coefficient buffer cannot be
    /// allocated.
    pub fn create_rev(taps: &[V::Coef]) -> Result<Self> {
        Self::with_order(taps, TapOrder::Reversed)
    }

    fn with_order(taps: &[V::Coef], order: TapOrder) -> Result<Self> {
        let coefs = CoefBuffer::new(taps, order)?;
        tracing::debug!(
            variant = V::NAME,
            kernel = K::NAME,
            len = coefs.len(),
            ?order,
            "created dotprod object"
        );
        Ok(Self {
            coefs,
            _kernel: PhantomData,
        })
    }

    /// Replace all taps with `taps` in forward order, resizing if the count changed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Allocation`] if the resize fails; the object then
    /// keeps its previous taps.
    pub fn recreate(&mut self, taps: &[V::Coef]) -> Result<()> {
        self.recreate_with_order(taps, TapOrder::Forward)
    }

    /// Replace all taps with `taps` in reverse order, resizing if the count changed.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Allocation`] if the resize fails; the object then
    /// keeps its previous taps.
    pub fn recreate_rev(&mut self, taps: &[V::Coef]) -> Result<()> {
        self.recreate_with_order(taps, TapOrder::Reversed)
    }

    fn recreate_with_order(&mut self, taps: &[V::Coef], order: TapOrder) -> Result<()> {
        let old_len = self.coefs.len();
        if self.coefs.resize_and_overwrite(taps, order)? {
            tracing::debug!(
                variant = V::NAME,
                kernel = K::NAME,
                old_len,
                len = taps.len(),
                ?order,
                "reallocated dotprod coefficients"
            );
        } else {
            tracing::trace!(variant = V::NAME, len = taps.len(), ?order, "overwrote dotprod coefficients");
        }
        Ok(())
    }

    /// Compute `Σ h[i] * x[i]` over the `N` stored taps.
    ///
    /// Only the first `N` samples of `x` are read.
    ///
    /// # Panics
    ///
    /// Panics if `x.len() < self.len()`
    #[inline]
    pub fn execute(&self, x: &[V::Sample]) -> V::Sample {
        let h = self.coefs.as_slice();
        V::dot::<K>(h, &x[..h.len()])
    }

    /// Number of taps `N`
    #[inline]
    pub fn len(&self) -> usize {
        self.coefs.len()
    }

    /// Whether the object holds no taps (its output is always zero)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coefs.is_empty()
    }

    /// The taps in stored order
    #[inline]
    pub fn coefs(&self) -> &[V::Coef] {
        self.coefs.as_slice()
    }

    /// One-shot ordinal dot product of `h` with the first `h.len()` samples of `x`
    ///
    /// # Panics
    ///
    /// Panics if `x.len() < h.len()`
    pub fn run(h: &[V::Coef], x: &[V::Sample]) -> V::Sample {
        V::dot::<Scalar>(h, &x[..h.len()])
    }

    /// One-shot dot product unrolled by four
    ///
    /// # Panics
    ///
    /// Panics if `x.len() < h.len()`
    pub fn run4(h: &[V::Coef], x: &[V::Sample]) -> V::Sample {
        V::dot::<Unrolled>(h, &x[..h.len()])
    }

    /// Print the object and its taps to stdout
    pub fn print(&self) {
        print!("{self}");
    }

    /// Emit one `debug` event per tap
    pub fn debug_print(&self) {
        tracing::debug!(variant = V::NAME, kernel = K::NAME, len = self.len(), "dotprod object");
        for (i, tap) in self.coefs().iter().enumerate() {
            tracing::debug!(index = i, ?tap, "dotprod tap");
        }
    }
}

impl<V: Variant, K: Kernel> fmt::Display for DotProd<V, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "dotprod_{} [{}, {} coefficients]:",
            V::NAME,
            K::NAME,
            self.len()
        )?;
        for (i, tap) in self.coefs().iter().enumerate() {
            write!(f, "  {i:4}: ")?;
            V::fmt_tap(tap, f)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<V: Variant, K: Kernel> fmt::Debug for DotProd<V, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DotProd")
            .field("variant", &V::NAME)
            .field("kernel", &K::NAME)
            .field("coefs", &self.coefs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use num_complex::Complex64;
    use utilities::{assert_relative_closeness, gen_random_complex, gen_random_reals};

    use super::*;

    /// Relative tolerance between any two backends and the `f64` reference,
    /// measured against `Σ |h[i]| |x[i]|`
    const EQUIVALENCE_TOLERANCE: f64 = 1e-5;

    const LENGTHS: [usize; 8] = [0, 1, 3, 4, 5, 16, 127, 128];

    fn widen(z: Complex32) -> Complex64 {
        Complex64::new(z.re as f64, z.im as f64)
    }

    fn reference_rrrf(h: &[f32], x: &[f32]) -> (f64, f64) {
        let sum: f64 = h.iter().zip(x).map(|(a, b)| *a as f64 * *b as f64).sum();
        let scale: f64 = h.iter().zip(x).map(|(a, b)| (*a as f64 * *b as f64).abs()).sum();
        (sum, scale)
    }

    fn reference_complex(h: &[Complex64], x: &[Complex32]) -> (Complex64, f64) {
        let sum: Complex64 = h.iter().zip(x).map(|(a, b)| a * widen(*b)).sum();
        let scale: f64 = h
            .iter()
            .zip(x)
            .map(|(a, b)| (a.re.abs() + a.im.abs()) * (b.re.abs() + b.im.abs()) as f64)
            .sum();
        (sum, scale)
    }

    fn check_rrrf<K: Kernel>(len: usize) {
        let h = gen_random_reals(len, 100 + len as u64);
        let x = gen_random_reals(len, 200 + len as u64);
        let q = DotProd::<Rrrf, K>::create(&h).unwrap();
        let (expected, scale) = reference_rrrf(&h, &x);
        assert_relative_closeness(q.execute(&x) as f64, expected, scale, EQUIVALENCE_TOLERANCE);
    }

    fn check_crcf<K: Kernel>(len: usize) {
        let h = gen_random_reals(len, 300 + len as u64);
        let x = gen_random_complex(len, 400 + len as u64);
        let q = DotProd::<Crcf, K>::create(&h).unwrap();
        let wide_h: Vec<Complex64> = h.iter().map(|r| Complex64::new(*r as f64, 0.0)).collect();
        let (expected, scale) = reference_complex(&wide_h, &x);
        let y = widen(q.execute(&x));
        assert_relative_closeness(y.re, expected.re, scale, EQUIVALENCE_TOLERANCE);
        assert_relative_closeness(y.im, expected.im, scale, EQUIVALENCE_TOLERANCE);
    }

    fn check_cccf<K: Kernel>(len: usize) {
        let h = gen_random_complex(len, 500 + len as u64);
        let x = gen_random_complex(len, 600 + len as u64);
        let q = DotProd::<Cccf, K>::create(&h).unwrap();
        let wide_h: Vec<Complex64> = h.iter().copied().map(widen).collect();
        let (expected, scale) = reference_complex(&wide_h, &x);
        let y = widen(q.execute(&x));
        assert_relative_closeness(y.re, expected.re, scale, EQUIVALENCE_TOLERANCE);
        assert_relative_closeness(y.im, expected.im, scale, EQUIVALENCE_TOLERANCE);
    }

    macro_rules! backend_equivalence {
        ($test_name:ident, $kernel:ty) => {
            #[test]
            fn $test_name() {
                for len in LENGTHS {
                    check_rrrf::<$kernel>(len);
                    check_crcf::<$kernel>(len);
                    check_cccf::<$kernel>(len);
                }
            }
        };
    }

    backend_equivalence!(scalar_matches_reference, Scalar);
    backend_equivalence!(unrolled_matches_reference, Unrolled);
    backend_equivalence!(default_matches_reference, DefaultKernel);

    #[test]
    fn backends_agree_with_each_other() {
        for len in LENGTHS {
            let h = gen_random_complex(len, 700 + len as u64);
            let x = gen_random_complex(len, 800 + len as u64);
            let wide_h: Vec<Complex64> = h.iter().copied().map(widen).collect();
            let (_, scale) = reference_complex(&wide_h, &x);

            let scalar = widen(DotProd::<Cccf, Scalar>::create(&h).unwrap().execute(&x));
            let unrolled = widen(DotProd::<Cccf, Unrolled>::create(&h).unwrap().execute(&x));
            let default = widen(DotProd::<Cccf, DefaultKernel>::create(&h).unwrap().execute(&x));
            for other in [unrolled, default] {
                assert_relative_closeness(other.re, scalar.re, scale, EQUIVALENCE_TOLERANCE);
                assert_relative_closeness(other.im, scalar.im, scale, EQUIVALENCE_TOLERANCE);
            }
        }
    }

    #[test]
    fn four_taps_are_exact_on_every_backend() {
        let taps = [1.0, 2.0, 3.0, 4.0];
        let x = [4.0, 3.0, 2.0, 1.0];
        assert_eq!(DotProd::<Rrrf, Scalar>::create(&taps).unwrap().execute(&x), 20.0);
        assert_eq!(DotProd::<Rrrf, Unrolled>::create(&taps).unwrap().execute(&x), 20.0);
        assert_eq!(DotProdRrrf::create(&taps).unwrap().execute(&x), 20.0);
        assert_eq!(DotProdRrrf::run(&taps, &x), 20.0);
        assert_eq!(DotProdRrrf::run4(&taps, &x), 20.0);
    }

    #[test]
    fn reversed_taps_equal_reversed_input() {
        for len in LENGTHS {
            let h = gen_random_complex(len, 900 + len as u64);
            let x = gen_random_complex(len, 1000 + len as u64);
            let x_rev: Vec<Complex32> = x.iter().rev().copied().collect();

            let rev = DotProd::<Cccf, Scalar>::create_rev(&h).unwrap();
            let fwd = DotProd::<Cccf, Scalar>::create(&h).unwrap();
            let a = rev.execute(&x);
            let b = fwd.execute(&x_rev);
            assert!((a - b).norm() <= 1e-5 * (len as f32).max(1.0), "len {len}");

            let hr: Vec<f32> = h.iter().map(|z| z.re).collect();
            let rev = DotProdCrcf::create_rev(&hr).unwrap();
            let fwd = DotProdCrcf::create(&hr).unwrap();
            let a = rev.execute(&x);
            let b = fwd.execute(&x_rev);
            assert!((a - b).norm() <= 1e-5 * (len as f32).max(1.0), "len {len}");
        }
    }

    #[test]
    fn reversed_storage_order() {
        let q = DotProdRrrf::create_rev(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(q.coefs(), &[3.0, 2.0, 1.0]);
    }

    #[test]
    fn recreate_matches_fresh_object() {
        let old = gen_random_reals(16, 1);
        let new = gen_random_reals(16, 2);
        let x = gen_random_reals(16, 3);

        let mut q = DotProdRrrf::create(&old).unwrap();
        q.recreate(&new).unwrap();
        let fresh = DotProdRrrf::create(&new).unwrap();
        assert_eq!(q.execute(&x).to_bits(), fresh.execute(&x).to_bits());

        q.recreate_rev(&new).unwrap();
        let fresh = DotProdRrrf::create_rev(&new).unwrap();
        assert_eq!(q.execute(&x).to_bits(), fresh.execute(&x).to_bits());
    }

    #[test]
    fn resize_reads_no_stale_taps() {
        let x = gen_random_complex(128, 4);
        let mut q = DotProdCccf::create(&gen_random_complex(16, 5)).unwrap();

        for len in [127, 3, 0, 5, 128, 4] {
            let taps = gen_random_complex(len, 10 + len as u64);
            q.recreate(&taps).unwrap();
            assert_eq!(q.len(), len);
            let fresh = DotProdCccf::create(&taps).unwrap();
            assert_eq!(q.execute(&x[..len]), fresh.execute(&x[..len]));
        }
    }

    #[test]
    fn empty_object_yields_zero() {
        let q = DotProdCccf::create(&[]).unwrap();
        assert!(q.is_empty());
        assert_eq!(q.execute(&[]), Complex32::new(0.0, 0.0));
        assert_eq!(q.execute(&[Complex32::new(1.0, 1.0)]), Complex32::new(0.0, 0.0));
    }

    #[test]
    fn extra_input_is_ignored() {
        let q = DotProdRrrf::create(&[1.0, 1.0]).unwrap();
        assert_eq!(q.execute(&[1.0, 2.0, 100.0, 1000.0]), 3.0);
    }

    #[test]
    #[should_panic]
    fn short_input_panics() {
        let q = DotProdRrrf::create(&[1.0, 1.0, 1.0]).unwrap();
        q.execute(&[1.0, 2.0]);
    }

    #[test]
    fn execute_is_deterministic() {
        let h = gen_random_complex(127, 6);
        let x = gen_random_complex(127, 7);
        let q = DotProdCccf::create(&h).unwrap();
        let first = q.execute(&x);
        for _ in 0..16 {
            assert_eq!(q.execute(&x), first);
        }
    }

    #[test]
    fn print_does_not_mutate() {
        let q = DotProdCccf::create(&[Complex32::new(1.0, -2.0), Complex32::new(0.5, 0.25)]).unwrap();
        let before = q.coefs().to_vec();
        let dump = q.to_string();
        q.print();
        q.debug_print();
        assert_eq!(q.coefs(), before.as_slice());

        assert!(dump.starts_with("dotprod_cccf ["));
        assert!(dump.contains("2 coefficients"));
        assert!(dump.contains("   0:   1.00000000 + j* -2.00000000"));
        assert_eq!(dump.lines().count(), 3);
    }

    #[test]
    fn debug_names_variant_and_kernel() {
        let q = DotProd::<Crcf, Unrolled>::create(&[1.0]).unwrap();
        let dbg = format!("{q:?}");
        assert!(dbg.contains("crcf") && dbg.contains("unrolled"));
    }
}
