use crate::error::{CodegenError, Result};
use num_rational::Ratio;
use num_traits::{CheckedAdd, CheckedDiv, CheckedMul, CheckedSub};
use std::fmt;

/// Exact fraction, always stored in lowest terms with a positive denominator.
///
/// Every arithmetic operation is checked: a zero divisor yields
/// [`CodegenError::DivisionByZero`] and anything that leaves the `i64` range
/// yields [`CodegenError::ArithmeticOverflow`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rational(Ratio<i64>);

impl Default for Rational {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Rational {
    pub const ZERO: Rational = Rational(Ratio::new_raw(0, 1));
    pub const ONE: Rational = Rational(Ratio::new_raw(1, 1));

    /// Build `numer / denom`, reduced.
    pub fn new(numer: i64, denom: i64) -> Result<Self> {
        if denom == 0 {
            return Err(CodegenError::DivisionByZero);
        }
        // Reducing or flipping the sign of i64::MIN has no representable result.
        if numer == i64::MIN || denom == i64::MIN {
            return Err(CodegenError::ArithmeticOverflow);
        }
        Ok(Self(Ratio::new(numer, denom)))
    }

    /// Unchecked integer constructor for compile-time catalog constants.
    /// `value` must not be `i64::MIN`; use [`Rational::try_from`] otherwise.
    pub(crate) const fn integer(value: i64) -> Self {
        debug_assert!(value != i64::MIN);
        Self(Ratio::new_raw(value, 1))
    }

    pub fn numer(&self) -> i64 {
        *self.0.numer()
    }

    pub fn denom(&self) -> i64 {
        *self.0.denom()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn is_zero(&self) -> bool {
        self.numer() == 0
    }

    pub fn is_negative(&self) -> bool {
        self.numer() < 0
    }

    pub fn checked_add(&self, other: &Rational) -> Result<Rational> {
        self.0
            .checked_add(&other.0)
            .map(Rational)
            .ok_or(CodegenError::ArithmeticOverflow)
    }

    pub fn checked_sub(&self, other: &Rational) -> Result<Rational> {
        self.0
            .checked_sub(&other.0)
            .map(Rational)
            .ok_or(CodegenError::ArithmeticOverflow)
    }

    pub fn checked_mul(&self, other: &Rational) -> Result<Rational> {
        self.0
            .checked_mul(&other.0)
            .map(Rational)
            .ok_or(CodegenError::ArithmeticOverflow)
    }

    pub fn checked_div(&self, other: &Rational) -> Result<Rational> {
        if other.is_zero() {
            return Err(CodegenError::DivisionByZero);
        }
        self.0
            .checked_div(&other.0)
            .map(Rational)
            .ok_or(CodegenError::ArithmeticOverflow)
    }

    pub fn checked_neg(&self) -> Result<Rational> {
        let numer = self
            .numer()
            .checked_neg()
            .ok_or(CodegenError::ArithmeticOverflow)?;
        Ok(Self(Ratio::new_raw(numer, self.denom())))
    }

    pub fn abs(&self) -> Result<Rational> {
        if self.is_negative() {
            self.checked_neg()
        } else {
            Ok(*self)
        }
    }

    pub fn recip(&self) -> Result<Rational> {
        Rational::ONE.checked_div(self)
    }

    pub fn to_f64(&self) -> f64 {
        self.numer() as f64 / self.denom() as f64
    }
}

impl TryFrom<i64> for Rational {
    type Error = CodegenError;

    fn try_from(value: i64) -> Result<Self> {
        Self::new(value, 1)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer())
        } else {
            write!(f, "{}/{}", self.numer(), self.denom())
        }
    }
}
