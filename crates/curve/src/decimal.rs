//! 18-decimal fixed-point numbers bounded to a 256-bit word.
//!
//! Values are stored as an unsigned integer scaled by `10^18`. Every
//! operation checks that its intermediate products fit in 256 bits, so a
//! computation that would wrap on a 256-bit machine word faults with
//! [`CurveError::ArithmeticOverflow`] instead. Division always truncates.

use crate::errors::{CurveError, Result};
use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use std::fmt;

/// Number of fractional decimal digits.
pub const DECIMALS: u32 = 18;

/// Scale factor (`10^18`) between a raw value and its real value.
pub const BASE: u128 = 1_000_000_000_000_000_000;

/// Width of the machine word every intermediate must fit in.
const WORD_BITS: u64 = 256;

fn base() -> BigUint {
    BigUint::from(BASE)
}

fn bounded(value: BigUint, op: &'static str) -> Result<BigUint> {
    if value.bits() > WORD_BITS {
        return Err(CurveError::ArithmeticOverflow(op));
    }
    Ok(value)
}

/// Unsigned fixed-point number with 18 decimal places.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal {
    raw: BigUint,
}

impl Decimal {
    pub fn zero() -> Self {
        Self {
            raw: BigUint::zero(),
        }
    }

    pub fn one() -> Self {
        Self { raw: base() }
    }

    /// Wrap a value that is already scaled by `10^18` (e.g. a risk rate).
    pub fn from_raw(raw: u128) -> Self {
        Self {
            raw: BigUint::from(raw),
        }
    }

    /// Lift a whole number into fixed point. A `u128` times `10^18` always
    /// fits in 256 bits.
    pub fn from_integer(value: u128) -> Self {
        Self {
            raw: BigUint::from(value) * base(),
        }
    }

    /// `numerator / denominator`, truncated to 18 decimals.
    pub fn ratio(numerator: u128, denominator: u128) -> Result<Self> {
        Self::ratio_big(&BigUint::from(numerator), &BigUint::from(denominator))
    }

    pub(crate) fn ratio_big(numerator: &BigUint, denominator: &BigUint) -> Result<Self> {
        if denominator.is_zero() {
            return Err(CurveError::DivisionByZero);
        }
        let scaled = bounded(numerator * base(), "ratio numerator")?;
        Ok(Self {
            raw: scaled / denominator,
        })
    }

    pub fn raw(&self) -> &BigUint {
        &self.raw
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    pub fn add(&self, other: &Self) -> Result<Self> {
        Ok(Self {
            raw: bounded(&self.raw + &other.raw, "addition")?,
        })
    }

    pub fn sub(&self, other: &Self) -> Result<Self> {
        if other.raw > self.raw {
            return Err(CurveError::ArithmeticOverflow("subtraction underflow"));
        }
        Ok(Self {
            raw: &self.raw - &other.raw,
        })
    }

    /// Fixed-point product, truncated.
    pub fn mul(&self, other: &Self) -> Result<Self> {
        let product = bounded(&self.raw * &other.raw, "multiplication")?;
        Ok(Self {
            raw: product / base(),
        })
    }

    /// Exact product with a whole number.
    pub fn mul_integer(&self, value: u128) -> Result<Self> {
        Ok(Self {
            raw: bounded(&self.raw * BigUint::from(value), "integer multiplication")?,
        })
    }

    /// `self * numerator / denominator` with a single truncation at the end.
    pub fn mul_div(&self, numerator: u128, denominator: u128) -> Result<Self> {
        if denominator == 0 {
            return Err(CurveError::DivisionByZero);
        }
        let product = bounded(&self.raw * BigUint::from(numerator), "scaled multiplication")?;
        Ok(Self {
            raw: product / BigUint::from(denominator),
        })
    }

    /// Integer part. Fails if it does not fit in a `u128`.
    pub fn floor(&self) -> Result<u128> {
        (&self.raw / base())
            .to_u128()
            .ok_or(CurveError::ArithmeticOverflow("integer part exceeds u128"))
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = &self.raw / base();
        let fraction = &self.raw % base();
        if fraction.is_zero() {
            return write!(f, "{whole}");
        }
        let digits = format!("{:0>width$}", fraction.to_string(), width = DECIMALS as usize);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}
