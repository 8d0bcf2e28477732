//! Errors raised by bit access, construction and arithmetic.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("attempted access of undefined bit: {0}")]
    IllegalAccess(isize),

    #[error("illegal operation: {0}")]
    IllegalOperation(&'static str),

    #[error("bit is neither zero nor one: {0}")]
    InvalidBit(u8),

    #[error("{0} is neither 1 nor -1")]
    InvalidSign(i64),

    #[error("division by zero")]
    DivisionByZero,

    #[error("indeterminate operation")]
    Indeterminate,

    #[error("bit shift does not support negative parameters: {0}")]
    NegativeShift(isize),

    #[error("value does not fit in i64")]
    Overflow,
}

impl Error {
    /// Both division failures, kept apart so callers can tell `x / 0` from `0 / 0`.
    #[inline]
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Error::DivisionByZero | Error::Indeterminate)
    }
}

#[test]
fn test_error_display() {
    assert_eq!(Error::DivisionByZero.to_string(), "division by zero");
    assert_eq!(Error::Indeterminate.to_string(), "indeterminate operation");
    assert_eq!(Error::InvalidSign(3).to_string(), "3 is neither 1 nor -1");
    assert_eq!(
        Error::IllegalAccess(-2).to_string(),
        "attempted access of undefined bit: -2"
    );
    assert!(Error::Indeterminate.is_arithmetic());
    assert!(!Error::NegativeShift(-1).is_arithmetic());
}
