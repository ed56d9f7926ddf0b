//! C ABI over the dot-product objects, power sums, scramblers and FFT plans.
//!
//! Objects cross the boundary as opaque boxed handles. Constructors return null
//! on failure and write a status code through an optional out pointer; every
//! other call returns one of the `STATUS_*` codes from [`crate::error`].
//!
//! Handles are not internally synchronized. A handle may be used from any one
//! thread at a time, and `destroy` must be the last call made on it.

// Handles are opaque on the C side; their Rust layout never crosses the boundary.
#![allow(improper_ctypes_definitions)]

use std::ptr;
use std::slice;

use num_complex::Complex32;

use crate::dotprod::{DotProdCccf, DotProdCrcf, DotProdRrrf};
use crate::error::{Error, STATUS_EIOBJ, STATUS_OK};
use crate::planner::{lookup_instance, Direction, FftInstance};
use crate::scramble;
use crate::sumsq;

/// Caller slice, empty when `ptr` is null or `n == 0`
unsafe fn slice_or_empty<'a, T>(ptr: *const T, n: u32) -> &'a [T] {
    if ptr.is_null() || n == 0 {
        &[]
    } else {
        // SAFETY: the caller guarantees `ptr` points to `n` initialized values
        unsafe { slice::from_raw_parts(ptr, n as usize) }
    }
}

/// Mutable caller slice, empty when `ptr` is null or `n == 0`
unsafe fn slice_or_empty_mut<'a, T>(ptr: *mut T, n: usize) -> &'a mut [T] {
    if ptr.is_null() || n == 0 {
        &mut []
    } else {
        // SAFETY: the caller guarantees `ptr` points to `n` writable values
        unsafe { slice::from_raw_parts_mut(ptr, n) }
    }
}

unsafe fn write_status(status: *mut i32, code: i32) {
    if !status.is_null() {
        // SAFETY: a non-null status pointer is writable per the API contract
        unsafe { *status = code };
    }
}

fn status_of(result: Result<(), Error>) -> i32 {
    match result {
        Ok(()) => STATUS_OK,
        Err(e) => e.code(),
    }
}

macro_rules! impl_dotprod_ffi {
    (
        $object:ident, $coef:ty, $sample:ty,
        $create:ident, $create_rev:ident, $recreate:ident, $recreate_rev:ident,
        $execute:ident, $print:ident, $destroy:ident
    ) => {
        /// Create an object from `n` taps at `h`, in forward order.
        ///
        /// Returns null on failure, with the reason written to `status` if non-null.
        ///
        /// # Safety
        ///
        /// `h` must point to `n` readable taps unless `n == 0`. `status` must be null
        /// or writable.
        #[no_mangle]
        pub unsafe extern "C" fn $create(h: *const $coef, n: u32, status: *mut i32) -> *mut $object {
            let taps = unsafe { slice_or_empty(h, n) };
            match $object::create(taps) {
                Ok(q) => {
                    unsafe { write_status(status, STATUS_OK) };
                    Box::into_raw(Box::new(q))
                }
                Err(e) => {
                    unsafe { write_status(status, e.code()) };
                    ptr::null_mut()
                }
            }
        }

        /// Create an object from `n` taps at `h`, stored in reverse order.
        ///
        /// # Safety
        ///
        /// Same contract as the forward constructor.
        #[no_mangle]
        pub unsafe extern "C" fn $create_rev(
            h: *const $coef,
            n: u32,
            status: *mut i32,
        ) -> *mut $object {
            let taps = unsafe { slice_or_empty(h, n) };
            match $object::create_rev(taps) {
                Ok(q) => {
                    unsafe { write_status(status, STATUS_OK) };
                    Box::into_raw(Box::new(q))
                }
                Err(e) => {
                    unsafe { write_status(status, e.code()) };
                    ptr::null_mut()
                }
            }
        }

        /// Replace the taps of `q` with `n` taps at `h`, in forward order.
        ///
        /// On failure the object keeps its previous taps.
        ///
        /// # Safety
        ///
        /// `q` must be null or a live handle. `h` must point to `n` readable taps
        /// unless `n == 0`.
        #[no_mangle]
        pub unsafe extern "C" fn $recreate(q: *mut $object, h: *const $coef, n: u32) -> i32 {
            let Some(q) = (unsafe { q.as_mut() }) else {
                return STATUS_EIOBJ;
            };
            status_of(q.recreate(unsafe { slice_or_empty(h, n) }))
        }

        /// Replace the taps of `q` with `n` taps at `h`, stored in reverse order.
        ///
        /// # Safety
        ///
        /// Same contract as the forward recreate.
        #[no_mangle]
        pub unsafe extern "C" fn $recreate_rev(q: *mut $object, h: *const $coef, n: u32) -> i32 {
            let Some(q) = (unsafe { q.as_mut() }) else {
                return STATUS_EIOBJ;
            };
            status_of(q.recreate_rev(unsafe { slice_or_empty(h, n) }))
        }

        /// Write `Σ h[i] * x[i]` over the taps of `q` to `y`.
        ///
        /// # Safety
        ///
        /// `q` must be null or a live handle. `x` must point to at least as many
        /// readable samples as `q` has taps, and `y` must be writable.
        #[no_mangle]
        pub unsafe extern "C" fn $execute(q: *const $object, x: *const $sample, y: *mut $sample) -> i32 {
            let Some(q) = (unsafe { q.as_ref() }) else {
                return STATUS_EIOBJ;
            };
            if y.is_null() {
                return STATUS_EIOBJ;
            }
            let n = q.len();
            let x: &[$sample] = if n == 0 {
                &[]
            } else {
                // SAFETY: the caller guarantees `x` holds at least `n` samples
                unsafe { slice::from_raw_parts(x, n) }
            };
            unsafe { *y = q.execute(x) };
            STATUS_OK
        }

        /// Print `q` and its taps to stdout.
        ///
        /// # Safety
        ///
        /// `q` must be null or a live handle.
        #[no_mangle]
        pub unsafe extern "C" fn $print(q: *const $object) -> i32 {
            match unsafe { q.as_ref() } {
                Some(q) => {
                    q.print();
                    STATUS_OK
                }
                None => STATUS_EIOBJ,
            }
        }

        /// Release `q` and its taps.
        ///
        /// # Safety
        ///
        /// `q` must be null or a live handle; it is dangling afterwards.
        #[no_mangle]
        pub unsafe extern "C" fn $destroy(q: *mut $object) -> i32 {
            if q.is_null() {
                return STATUS_EIOBJ;
            }
            // SAFETY: `q` came from `Box::into_raw` in a constructor
            drop(unsafe { Box::from_raw(q) });
            STATUS_OK
        }
    };
}

impl_dotprod_ffi!(
    DotProdRrrf, f32, f32,
    phastdsp_dotprod_rrrf_create, phastdsp_dotprod_rrrf_create_rev,
    phastdsp_dotprod_rrrf_recreate, phastdsp_dotprod_rrrf_recreate_rev,
    phastdsp_dotprod_rrrf_execute, phastdsp_dotprod_rrrf_print, phastdsp_dotprod_rrrf_destroy
);
impl_dotprod_ffi!(
    DotProdCrcf, f32, Complex32,
    phastdsp_dotprod_crcf_create, phastdsp_dotprod_crcf_create_rev,
    phastdsp_dotprod_crcf_recreate, phastdsp_dotprod_crcf_recreate_rev,
    phastdsp_dotprod_crcf_execute, phastdsp_dotprod_crcf_print, phastdsp_dotprod_crcf_destroy
);
impl_dotprod_ffi!(
    DotProdCccf, Complex32, Complex32,
    phastdsp_dotprod_cccf_create, phastdsp_dotprod_cccf_create_rev,
    phastdsp_dotprod_cccf_recreate, phastdsp_dotprod_cccf_recreate_rev,
    phastdsp_dotprod_cccf_execute, phastdsp_dotprod_cccf_print, phastdsp_dotprod_cccf_destroy
);

/// `Σ v[i]²` over `n` reals
///
/// # Safety
///
/// `v` must point to `n` readable values unless `n == 0`.
#[no_mangle]
pub unsafe extern "C" fn phastdsp_sumsqf(v: *const f32, n: u32) -> f32 {
    sumsq::sumsqf(unsafe { slice_or_empty(v, n) })
}

/// `Σ |v[i]|²` over `n` complex samples
///
/// # Safety
///
/// `v` must point to `n` readable values unless `n == 0`.
#[no_mangle]
pub unsafe extern "C" fn phastdsp_sumsqcf(v: *const Complex32, n: u32) -> f32 {
    sumsq::sumsqcf(unsafe { slice_or_empty(v, n) })
}

/// Scramble `n` bytes at `x` in place
///
/// # Safety
///
/// `x` must point to `n` writable bytes unless `n == 0`.
#[no_mangle]
pub unsafe extern "C" fn phastdsp_scramble_data(x: *mut u8, n: u32) {
    scramble::scramble_data(unsafe { slice_or_empty_mut(x, n as usize) });
}

/// Unscramble `n` bytes at `x` in place
///
/// # Safety
///
/// `x` must point to `n` writable bytes unless `n == 0`.
#[no_mangle]
pub unsafe extern "C" fn phastdsp_unscramble_data(x: *mut u8, n: u32) {
    scramble::unscramble_data(unsafe { slice_or_empty_mut(x, n as usize) });
}

/// Scramble the soft bits of an `n`-byte message: `8 * n` bytes at `x`
///
/// # Safety
///
/// `x` must point to `8 * n` writable bytes unless `n == 0`.
#[no_mangle]
pub unsafe extern "C" fn phastdsp_scramble_data_soft(x: *mut u8, n: u32) {
    let len = n as usize * scramble::SOFT_BITS_PER_BYTE;
    scramble::scramble_data_soft(unsafe { slice_or_empty_mut(x, len) });
}

/// Unscramble the soft bits of an `n`-byte message: `8 * n` bytes at `x`
///
/// # Safety
///
/// `x` must point to `8 * n` writable bytes unless `n == 0`.
#[no_mangle]
pub unsafe extern "C" fn phastdsp_unscramble_data_soft(x: *mut u8, n: u32) {
    let len = n as usize * scramble::SOFT_BITS_PER_BYTE;
    scramble::unscramble_data_soft(unsafe { slice_or_empty_mut(x, len) });
}

/// A plan bound to caller pointers that may alias
pub struct FftPlanHandle {
    instance: &'static FftInstance,
    x: *const Complex32,
    y: *mut Complex32,
    direction: Direction,
    flags: i32,
}

/// Direction code for a forward transform; any other value selects the inverse
pub const FFT_FORWARD: i32 = Direction::Forward as i32;
/// Direction code for the unscaled inverse transform
pub const FFT_BACKWARD: i32 = Direction::Backward as i32;

/// Plan an `nfft`-point transform from `x` to `y`; `x == y` transforms in place.
///
/// Returns null with `STATUS_EUMODE` for sizes without an accelerated instance,
/// and with `STATUS_EIOBJ` for null buffers.
///
/// # Safety
///
/// `x` and `y` must stay valid for `nfft` samples for as long as the plan is
/// executed. `status` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn phastdsp_fft_create_plan(
    nfft: u32,
    x: *mut Complex32,
    y: *mut Complex32,
    dir: i32,
    flags: i32,
    status: *mut i32,
) -> *mut FftPlanHandle {
    let instance = match lookup_instance(nfft as usize) {
        Ok(instance) => instance,
        Err(e) => {
            unsafe { write_status(status, e.code()) };
            return ptr::null_mut();
        }
    };
    if x.is_null() || y.is_null() {
        unsafe { write_status(status, STATUS_EIOBJ) };
        return ptr::null_mut();
    }

    let direction = if dir == FFT_FORWARD {
        Direction::Forward
    } else {
        Direction::Backward
    };
    tracing::debug!(size = nfft, ?direction, flags, in_place = x == y, "created fft plan handle");

    unsafe { write_status(status, STATUS_OK) };
    Box::into_raw(Box::new(FftPlanHandle {
        instance,
        x,
        y,
        direction,
        flags,
    }))
}

/// Copy `x` into `y`, then transform `y` in place
///
/// # Safety
///
/// `q` must be null or a live plan whose buffers are still valid.
#[no_mangle]
pub unsafe extern "C" fn phastdsp_fft_execute(q: *mut FftPlanHandle) -> i32 {
    let Some(q) = (unsafe { q.as_ref() }) else {
        return STATUS_EIOBJ;
    };
    let n = q.instance.len();
    // SAFETY: both buffers hold `n` samples per the plan contract; `copy` allows overlap
    unsafe {
        if !ptr::eq(q.x, q.y) {
            ptr::copy(q.x, q.y, n);
        }
        q.instance.transform(slice::from_raw_parts_mut(q.y, n), q.direction);
    }
    STATUS_OK
}

/// Flags given at plan creation, or 0 for a null plan
///
/// # Safety
///
/// `q` must be null or a live plan.
#[no_mangle]
pub unsafe extern "C" fn phastdsp_fft_get_flags(q: *const FftPlanHandle) -> i32 {
    unsafe { q.as_ref() }.map_or(0, |q| q.flags)
}

/// Release the plan; its buffers are left alone
///
/// # Safety
///
/// `q` must be null or a live plan; it is dangling afterwards.
#[no_mangle]
pub unsafe extern "C" fn phastdsp_fft_destroy_plan(q: *mut FftPlanHandle) -> i32 {
    if q.is_null() {
        return STATUS_EIOBJ;
    }
    // SAFETY: `q` came from `Box::into_raw` in `phastdsp_fft_create_plan`
    drop(unsafe { Box::from_raw(q) });
    STATUS_OK
}
