//! Backend-polymorphic DSP primitives.
//!
//! - [`dotprod`]: structured dot products over real and complex taps
//! - [`sumsq`]: power sums
//! - [`planner`]: fixed-size FFT plans for 16..=4096 points
//! - [`scramble`]: self-inverse data whitening, hard and soft bits
//! - [`ffi`]: the same objects behind a C ABI
//!
//! The arithmetic backend is chosen at build time through cargo features (see
//! [`kernels`]); [`kernels::ACTIVE`] reports which one was compiled in.

pub mod coefs;
pub mod dotprod;
pub mod error;
pub mod ffi;
pub mod kernels;
pub mod planner;
pub mod scramble;
pub mod sumsq;
mod twiddles;
mod utils;

pub use crate::dotprod::{DotProd, DotProdCccf, DotProdCrcf, DotProdRrrf};
pub use crate::error::{Error, Result};
pub use crate::planner::{Direction, FftPlan};
