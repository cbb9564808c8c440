//! Deterministic Q31.32 fixed-point arithmetic
//!
//! This library provides a single 64-bit scalar, [`Fix64`], whose results are
//! bit-identical on every platform and compiler:
//!
//! - **`Fix64`**: signed Q31.32 stored in one `i64`
//!   - Range: ±2,147,483,648 (exactly `i64::MIN / 2^32` to `i64::MAX / 2^32`)
//!   - Precision: 2^-32 (≈ 0.00000000023283064365)
//!   - Use cases: lockstep simulation, replays, anything that must reproduce
//!     exactly across machines
//!
//! ## Features
//!
//! - **Saturating arithmetic**: `+ - * /` clamp to `MIN`/`MAX` instead of wrapping
//! - **Integer-only transcendentals**: sqrt, log2, pow, sin/cos/tan, atan/acos
//!   never touch the FPU at runtime
//! - **Table-driven trigonometry**: sine/tangent lookup tables with linear
//!   interpolation, generated once from integer arithmetic
//! - **no_std compatible**: needs only `alloc`
//! - **Serde support**: exact decimal strings for JSON, raw `i64` for binary formats
//!
//! ## Example
//!
//! ```rust
//! use fix64::Fix64;
//!
//! let half = Fix64::ONE / Fix64::from(2);
//! assert_eq!(half, Fix64::HALF);
//!
//! let hyp = (Fix64::from(3) * Fix64::from(3) + Fix64::from(4) * Fix64::from(4))
//!     .sqrt()
//!     .unwrap();
//! assert_eq!(hyp, Fix64::from(5));
//!
//! assert_eq!(Fix64::ZERO.sin(), Fix64::ZERO);
//! assert_eq!(Fix64::ZERO.cos(), Fix64::ONE);
//! ```

#![no_std]
#![cfg_attr(test, allow(unused_imports))]

#[cfg(test)]
#[macro_use]
extern crate std;

extern crate alloc;

mod fix64;
mod lut;
mod math;
mod transcendental;

pub use fix64::Fix64;

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("argument outside the function's domain")]
    OutOfDomain,

    #[error("overflow: value too large to represent")]
    Overflow,

    #[error("invalid string format")]
    InvalidFormat,
}

pub type Result<T> = core::result::Result<T, FixError>;

/// Builds the sine and tangent lookup tables if they are not built yet.
///
/// The tables are otherwise generated on the first trigonometric call. Calling
/// this during startup moves that one-time cost out of the simulation loop.
pub fn initialize_tables() {
    lut::initialize();
}
