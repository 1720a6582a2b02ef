//! Daiquilibrium coupon curve
//!
//! Deterministic pricing of the coupon redemption premium against protocol
//! debt. All arithmetic is integer fixed point with 18 decimals and a
//! 256-bit bound on every intermediate; no floating point is involved.

pub mod curve;
pub mod decimal;
pub mod errors;

pub use curve::*;
pub use decimal::{Decimal, BASE, DECIMALS};
pub use errors::*;

/// Module version for API introspection
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
