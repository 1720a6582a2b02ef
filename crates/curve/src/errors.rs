use thiserror::Error;

/// Faults raised while pricing coupons.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    #[error("division by zero: total supply is zero")]
    DivisionByZero,

    #[error("arithmetic overflow while pricing coupons: {0}")]
    ArithmeticOverflow(&'static str),
}

pub type Result<T> = std::result::Result<T, CurveError>;
