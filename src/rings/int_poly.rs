use std::cmp::max;
use std::fmt::{Display, Formatter};
use std::ops::*;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::integer::{gcd_all, sqrt_ceil};

///
/// A dense univariate polynomial over the integers, stored as the list of its coefficients
/// in ascending order. The list never ends in a zero coefficient, so the zero polynomial
/// is the empty list.
///
/// Contrary to the modular rings, integer polynomials carry their arithmetic themselves,
/// since there is only one ring `Z[X]`.
///
/// # Example
/// ```
/// # use feanor_factor::rings::int_poly::*;
/// let f = IntPoly::from_i64(&[1, 1]);
/// let g = IntPoly::from_i64(&[-1, 1]);
/// assert_eq!(IntPoly::from_i64(&[-1, 0, 1]), &f * &g);
/// assert_eq!(Some(f.clone()), (&f * &g).checked_div(&g));
/// ```
///
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(from = "Vec<BigInt>", into = "Vec<BigInt>")]
pub struct IntPoly {
    coefficients: Vec<BigInt>
}

impl From<Vec<BigInt>> for IntPoly {

    fn from(value: Vec<BigInt>) -> Self {
        IntPoly::from_coefficients(value)
    }
}

impl From<IntPoly> for Vec<BigInt> {

    fn from(value: IntPoly) -> Self {
        value.coefficients
    }
}

impl IntPoly {

    pub fn zero() -> Self {
        IntPoly { coefficients: Vec::new() }
    }

    pub fn one() -> Self {
        Self::constant(BigInt::one())
    }

    pub fn constant(c: BigInt) -> Self {
        Self::from_coefficients(vec![c])
    }

    ///
    /// Returns `c * X^e`.
    ///
    pub fn monomial(c: BigInt, e: usize) -> Self {
        let mut coefficients = Vec::new();
        coefficients.resize(e, BigInt::zero());
        coefficients.push(c);
        return Self::from_coefficients(coefficients);
    }

    ///
    /// Creates the polynomial `sum_i coefficients[i] X^i`.
    ///
    pub fn from_coefficients(mut coefficients: Vec<BigInt>) -> Self {
        while coefficients.last().map(|c| c.is_zero()).unwrap_or(false) {
            coefficients.pop();
        }
        IntPoly { coefficients: coefficients }
    }

    pub fn from_i64(coefficients: &[i64]) -> Self {
        Self::from_coefficients(coefficients.iter().map(|c| BigInt::from(*c)).collect())
    }

    pub fn coefficients(&self) -> &[BigInt] {
        &self.coefficients
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.coefficients.len() == 1 && self.coefficients[0].is_one()
    }

    pub fn degree(&self) -> Option<usize> {
        self.coefficients.len().checked_sub(1)
    }

    pub fn lc(&self) -> Option<&BigInt> {
        self.coefficients.last()
    }

    pub fn coefficient_at(&self, i: usize) -> BigInt {
        self.coefficients.get(i).cloned().unwrap_or_else(BigInt::zero)
    }

    ///
    /// Replaces the leading coefficient by `c`, which must not be zero.
    ///
    pub fn with_lc(mut self, c: BigInt) -> Self {
        assert!(!c.is_zero());
        if let Some(lc) = self.coefficients.last_mut() {
            *lc = c;
        }
        return self;
    }

    ///
    /// Returns the non-negative gcd of all coefficients.
    ///
    pub fn content(&self) -> BigInt {
        gcd_all(self.coefficients.iter())
    }

    ///
    /// Returns `f / (+/- content(f))` such that the result has a positive leading
    /// coefficient.
    ///
    pub fn primitive_part(&self) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        let mut content = self.content();
        if self.lc().unwrap().is_negative() {
            content = -content;
        }
        return self.div_int_exact(&content);
    }

    pub fn scale(&self, c: &BigInt) -> Self {
        Self::from_coefficients(self.coefficients.iter().map(|x| x * c).collect())
    }

    ///
    /// Divides each coefficient by `c`, which is required to divide all of them.
    ///
    pub fn div_int_exact(&self, c: &BigInt) -> Self {
        debug_assert!(self.coefficients.iter().all(|x| x.is_multiple_of(c)));
        Self::from_coefficients(self.coefficients.iter().map(|x| x / c).collect())
    }

    ///
    /// Returns `self / rhs` if this division is exact over the integers.
    ///
    pub fn checked_div(&self, rhs: &IntPoly) -> Option<IntPoly> {
        assert!(!rhs.is_zero());
        let rhs_deg = rhs.degree().unwrap();
        let lc = rhs.lc().unwrap();
        let self_deg = match self.degree() {
            None => return Some(IntPoly::zero()),
            Some(d) if d < rhs_deg => return None,
            Some(d) => d
        };
        let mut remainder = self.coefficients.clone();
        let mut quotient = Vec::new();
        quotient.resize(self_deg - rhs_deg + 1, BigInt::zero());
        for i in (0..=(self_deg - rhs_deg)).rev() {
            let (quo, rem) = remainder[i + rhs_deg].div_rem(lc);
            if !rem.is_zero() {
                return None;
            }
            if quo.is_zero() {
                continue;
            }
            for (j, c) in rhs.coefficients.iter().enumerate() {
                remainder[i + j] -= &quo * c;
            }
            quotient[i] = quo;
        }
        if remainder.iter().all(|c| c.is_zero()) {
            return Some(IntPoly::from_coefficients(quotient));
        } else {
            return None;
        }
    }

    pub fn derivative(&self) -> Self {
        Self::from_coefficients(self.coefficients.iter().enumerate().skip(1).map(|(i, c)| c * BigInt::from(i)).collect())
    }

    pub fn evaluate(&self, x: &BigInt) -> BigInt {
        let mut result = BigInt::zero();
        for c in self.coefficients.iter().rev() {
            result = result * x + c;
        }
        return result;
    }

    ///
    /// Returns the smallest integer that is at least the euclidean norm of the coefficient
    /// vector.
    ///
    pub fn norm2_ceil(&self) -> BigInt {
        sqrt_ceil(&self.coefficients.iter().map(|c| c * c).sum())
    }

    pub fn pow(&self, e: usize) -> Self {
        (0..e).fold(Self::one(), |current, _| &current * self)
    }
}

impl<'a, 'b> Add<&'b IntPoly> for &'a IntPoly {
    type Output = IntPoly;

    fn add(self, rhs: &'b IntPoly) -> IntPoly {
        let len = max(self.coefficients.len(), rhs.coefficients.len());
        IntPoly::from_coefficients((0..len).map(|i| self.coefficient_at(i) + rhs.coefficient_at(i)).collect())
    }
}

impl<'a, 'b> Sub<&'b IntPoly> for &'a IntPoly {
    type Output = IntPoly;

    fn sub(self, rhs: &'b IntPoly) -> IntPoly {
        let len = max(self.coefficients.len(), rhs.coefficients.len());
        IntPoly::from_coefficients((0..len).map(|i| self.coefficient_at(i) - rhs.coefficient_at(i)).collect())
    }
}

impl<'a, 'b> Mul<&'b IntPoly> for &'a IntPoly {
    type Output = IntPoly;

    fn mul(self, rhs: &'b IntPoly) -> IntPoly {
        if self.is_zero() || rhs.is_zero() {
            return IntPoly::zero();
        }
        let mut result = Vec::new();
        result.resize(self.coefficients.len() + rhs.coefficients.len() - 1, BigInt::zero());
        for (i, a) in self.coefficients.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in rhs.coefficients.iter().enumerate() {
                result[i + j] += a * b;
            }
        }
        return IntPoly::from_coefficients(result);
    }
}

impl<'a> Neg for &'a IntPoly {
    type Output = IntPoly;

    fn neg(self) -> IntPoly {
        IntPoly::from_coefficients(self.coefficients.iter().map(|c| -c).collect())
    }
}

macro_rules! impl_by_value_trait {
    ($trait_name:ident, $fn_name:ident) => {

        impl $trait_name for IntPoly {
            type Output = IntPoly;

            fn $fn_name(self, rhs: IntPoly) -> IntPoly {
                (&self).$fn_name(&rhs)
            }
        }

        impl<'a> $trait_name<&'a IntPoly> for IntPoly {
            type Output = IntPoly;

            fn $fn_name(self, rhs: &'a IntPoly) -> IntPoly {
                (&self).$fn_name(rhs)
            }
        }
    };
}

impl_by_value_trait!{ Add, add }
impl_by_value_trait!{ Sub, sub }
impl_by_value_trait!{ Mul, mul }

impl Display for IntPoly {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut first = true;
        for (i, c) in self.coefficients.iter().enumerate().rev() {
            if c.is_zero() {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            match i {
                0 => write!(f, "{}", c)?,
                1 => write!(f, "{}X", c)?,
                _ => write!(f, "{}X^{}", c, i)?
            }
        }
        return Ok(());
    }
}

#[test]
fn test_normalization() {
    let f = IntPoly::from_i64(&[1, 2, 0, 0]);
    assert_eq!(Some(1), f.degree());
    assert_eq!(None, IntPoly::from_i64(&[0, 0]).degree());
    assert_eq!(IntPoly::zero(), &f - &f);
}

#[test]
fn test_content_primitive_part() {
    let f = IntPoly::from_i64(&[6, -4, -2]);
    assert_eq!(BigInt::from(2), f.content());
    assert_eq!(IntPoly::from_i64(&[-3, 2, 1]), f.primitive_part());
}

#[test]
fn test_checked_div() {
    let f = IntPoly::from_i64(&[-5, 0, 1]);
    let g = IntPoly::from_i64(&[3, 2]);
    let prod = &f * &g;
    assert_eq!(Some(f.clone()), prod.checked_div(&g));
    assert_eq!(None, prod.checked_div(&IntPoly::from_i64(&[1, 2])));
    assert_eq!(None, IntPoly::from_i64(&[1, 1]).checked_div(&IntPoly::from_i64(&[0, 2])));
}

#[test]
fn test_evaluate_derivative() {
    let f = IntPoly::from_i64(&[7, -5, 0, 1]);
    assert_eq!(BigInt::from(7 - 10 + 8), f.evaluate(&BigInt::from(2)));
    assert_eq!(IntPoly::from_i64(&[-5, 0, 3]), f.derivative());
}

#[test]
fn test_norms() {
    let f = IntPoly::from_i64(&[3, -4]);
    assert_eq!(BigInt::from(5), f.norm2_ceil());
}

#[test]
fn test_serialize() {
    let f = IntPoly::from_i64(&[1, 0, -3]);
    let json = serde_json::to_string(&f).unwrap();
    assert_eq!(f, serde_json::from_str::<IntPoly>(&json).unwrap());
}
