use std::cmp::{max, min, Ordering};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::ops::*;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::integer::{gcd_all, symmetric_rem};
use crate::rings::int_poly::IntPoly;

///
/// A monomial `X0^e0 X1^e1 ... Xn^en`, stored as its exponent vector without
/// trailing zeros.
///
/// The derived ordering is the lexicographic monomial ordering with `X0 > X1 > ...`,
/// since comparing the exponent vectors lexicographically is exactly that (a shorter
/// vector is padded with zeros).
///
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(from = "Vec<u32>", into = "Vec<u32>")]
pub struct Monomial(Vec<u32>);

impl From<Vec<u32>> for Monomial {

    fn from(value: Vec<u32>) -> Self {
        Monomial::new(value)
    }
}

impl From<Monomial> for Vec<u32> {

    fn from(value: Monomial) -> Self {
        value.0
    }
}

impl Monomial {

    pub fn new(mut exponents: Vec<u32>) -> Self {
        while exponents.last() == Some(&0) {
            exponents.pop();
        }
        Monomial(exponents)
    }

    pub fn one() -> Self {
        Monomial(Vec::new())
    }

    ///
    /// Returns the monomial `X_var^e`.
    ///
    pub fn variable_power(var: usize, e: u32) -> Self {
        let mut exponents = Vec::new();
        exponents.resize(var + 1, 0);
        exponents[var] = e;
        return Self::new(exponents);
    }

    pub fn exponent(&self, var: usize) -> u32 {
        self.0.get(var).copied().unwrap_or(0)
    }

    pub fn exponents(&self) -> &[u32] {
        &self.0
    }

    pub fn is_one(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_degree(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn mul(&self, rhs: &Monomial) -> Monomial {
        let len = max(self.0.len(), rhs.0.len());
        Monomial::new((0..len).map(|i| self.exponent(i) + rhs.exponent(i)).collect())
    }

    pub fn checked_div(&self, rhs: &Monomial) -> Option<Monomial> {
        if rhs.0.len() > self.0.len() {
            return None;
        }
        let mut result = Vec::with_capacity(self.0.len());
        for i in 0..self.0.len() {
            result.push(self.exponent(i).checked_sub(rhs.exponent(i))?);
        }
        return Some(Monomial::new(result));
    }

    ///
    /// Returns the gcd of both monomials, i.e. the componentwise minimum of exponents.
    ///
    pub fn gcd(&self, rhs: &Monomial) -> Monomial {
        let len = min(self.0.len(), rhs.0.len());
        Monomial::new((0..len).map(|i| min(self.exponent(i), rhs.exponent(i))).collect())
    }

    fn with_exponent(&self, var: usize, e: u32) -> Monomial {
        let mut exponents = self.0.clone();
        if exponents.len() <= var {
            exponents.resize(var + 1, 0);
        }
        exponents[var] = e;
        return Monomial::new(exponents);
    }
}

///
/// A sparse multivariate polynomial over the integers in the variables `X0, X1, ...`.
///
/// Terms are stored strictly descending w.r.t. the lexicographic ordering of their
/// monomials (see [`Monomial`]), and no term has coefficient zero. This makes the
/// representation canonical, and the derived ordering on `MultiPoly` is a total order
/// that is used to sort factors.
///
/// # Example
/// ```
/// # use feanor_factor::rings::multivariate::*;
/// let x = MultiPoly::variable(0);
/// let y = MultiPoly::variable(1);
/// let f = &(&x * &y) + &MultiPoly::from_i64(3);
/// assert_eq!(2, f.total_degree());
/// assert_eq!(MultiPoly::from_i64(9), f.evaluate(0, &2.into()).evaluate(1, &3.into()));
/// assert_eq!("X0*X1 + 3", format!("{}", f));
/// ```
///
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(from = "Vec<(Monomial, BigInt)>", into = "Vec<(Monomial, BigInt)>")]
pub struct MultiPoly {
    terms: Vec<(Monomial, BigInt)>
}

impl From<Vec<(Monomial, BigInt)>> for MultiPoly {

    fn from(value: Vec<(Monomial, BigInt)>) -> Self {
        MultiPoly::from_terms(value)
    }
}

impl From<MultiPoly> for Vec<(Monomial, BigInt)> {

    fn from(value: MultiPoly) -> Self {
        value.terms
    }
}

impl PartialOrd for MultiPoly {

    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for MultiPoly {

    fn cmp(&self, other: &Self) -> Ordering {
        self.terms.cmp(&other.terms)
    }
}

impl MultiPoly {

    pub fn zero() -> Self {
        MultiPoly { terms: Vec::new() }
    }

    pub fn one() -> Self {
        Self::constant(BigInt::one())
    }

    pub fn constant(c: BigInt) -> Self {
        Self::from_terms([(Monomial::one(), c)])
    }

    pub fn from_i64(c: i64) -> Self {
        Self::constant(BigInt::from(c))
    }

    pub fn variable(var: usize) -> Self {
        Self::from_terms([(Monomial::variable_power(var, 1), BigInt::one())])
    }

    ///
    /// Creates the polynomial `sum c_i m_i` from the given `(m_i, c_i)`, in any order and
    /// possibly with repeated monomials.
    ///
    pub fn from_terms<I>(terms: I) -> Self
        where I: IntoIterator<Item = (Monomial, BigInt)>
    {
        let mut collected: BTreeMap<Monomial, BigInt> = BTreeMap::new();
        for (m, c) in terms {
            *collected.entry(m).or_insert_with(BigInt::zero) += c;
        }
        MultiPoly {
            terms: collected.into_iter().rev().filter(|(_, c)| !c.is_zero()).collect()
        }
    }

    ///
    /// Convenience constructor from `(exponents, coefficient)` pairs.
    ///
    pub fn from_i64_terms(terms: &[(&[u32], i64)]) -> Self {
        Self::from_terms(terms.iter().map(|(e, c)| (Monomial::new(e.to_vec()), BigInt::from(*c))))
    }

    pub fn terms(&self) -> &[(Monomial, BigInt)] {
        &self.terms
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.as_constant().map(|c| c.is_one()).unwrap_or(false)
    }

    ///
    /// Returns the value of the polynomial, if it is constant.
    ///
    pub fn as_constant(&self) -> Option<BigInt> {
        match self.terms.len() {
            0 => Some(BigInt::zero()),
            1 if self.terms[0].0.is_one() => Some(self.terms[0].1.clone()),
            _ => None
        }
    }

    ///
    /// Returns the indices of all variables that occur in this polynomial, in ascending order.
    ///
    pub fn variables(&self) -> Vec<usize> {
        let len = self.terms.iter().map(|(m, _)| m.exponents().len()).max().unwrap_or(0);
        (0..len).filter(|i| self.terms.iter().any(|(m, _)| m.exponent(*i) > 0)).collect()
    }

    pub fn degree_in(&self, var: usize) -> usize {
        self.terms.iter().map(|(m, _)| m.exponent(var) as usize).max().unwrap_or(0)
    }

    pub fn total_degree(&self) -> usize {
        self.terms.iter().map(|(m, _)| m.total_degree() as usize).max().unwrap_or(0)
    }

    ///
    /// Returns the coefficient of `X_var^k`, considering this as a polynomial in `X_var`.
    ///
    pub fn coefficient_in(&self, var: usize, k: usize) -> MultiPoly {
        MultiPoly::from_terms(self.terms.iter()
            .filter(|(m, _)| m.exponent(var) as usize == k)
            .map(|(m, c)| (m.with_exponent(var, 0), c.clone())))
    }

    ///
    /// Returns all coefficients `c_0, ..., c_d` of this polynomial, considered as a
    /// polynomial in `X_var`.
    ///
    pub fn coefficients_in(&self, var: usize) -> Vec<MultiPoly> {
        let mut result: Vec<Vec<(Monomial, BigInt)>> = Vec::new();
        result.resize_with(if self.is_zero() { 0 } else { self.degree_in(var) + 1 }, Vec::new);
        for (m, c) in &self.terms {
            result[m.exponent(var) as usize].push((m.with_exponent(var, 0), c.clone()));
        }
        return result.into_iter().map(MultiPoly::from_terms).collect();
    }

    ///
    /// Computes `sum_k coefficients[k] X_var^k`; the coefficients must not contain `X_var`.
    ///
    pub fn from_coefficients_in(var: usize, coefficients: Vec<MultiPoly>) -> MultiPoly {
        MultiPoly::from_terms(coefficients.into_iter().enumerate().flat_map(|(k, c)| {
            c.terms.into_iter().map(move |(m, c)| {
                debug_assert!(m.exponent(var) == 0);
                (m.with_exponent(var, k as u32), c)
            })
        }))
    }

    pub fn leading_coefficient_in(&self, var: usize) -> MultiPoly {
        self.coefficient_in(var, self.degree_in(var))
    }

    ///
    /// Returns the coefficient of the lexicographically largest term.
    ///
    pub fn lc(&self) -> Option<&BigInt> {
        self.terms.first().map(|(_, c)| c)
    }

    ///
    /// Substitutes `X_var = value`.
    ///
    pub fn evaluate(&self, var: usize, value: &BigInt) -> MultiPoly {
        let degree = self.degree_in(var);
        let mut powers = Vec::with_capacity(degree + 1);
        powers.push(BigInt::one());
        for i in 1..=degree {
            let next = &powers[i - 1] * value;
            powers.push(next);
        }
        MultiPoly::from_terms(self.terms.iter().map(|(m, c)| (m.with_exponent(var, 0), c * &powers[m.exponent(var) as usize])))
    }

    ///
    /// Computes `f(..., X_var + a, ...)`.
    ///
    pub fn shift(&self, var: usize, a: &BigInt) -> MultiPoly {
        let linear = &MultiPoly::variable(var) + &MultiPoly::constant(a.clone());
        let mut result = MultiPoly::zero();
        for c in self.coefficients_in(var).into_iter().rev() {
            result = &(&result * &linear) + &c;
        }
        return result;
    }

    ///
    /// Returns the coefficient of `(X_var - a)^k` in the Taylor expansion of this polynomial
    /// around `X_var = a`.
    ///
    pub fn taylor_coefficient(&self, var: usize, a: &BigInt, k: usize) -> MultiPoly {
        self.shift(var, a).coefficient_in(var, k)
    }

    pub fn derivative(&self, var: usize) -> MultiPoly {
        MultiPoly::from_terms(self.terms.iter()
            .filter(|(m, _)| m.exponent(var) > 0)
            .map(|(m, c)| (m.with_exponent(var, m.exponent(var) - 1), c * BigInt::from(m.exponent(var)))))
    }

    pub fn pow(&self, e: usize) -> MultiPoly {
        let mut result = MultiPoly::one();
        let mut power = self.clone();
        let mut e = e;
        while e > 0 {
            if e & 1 == 1 {
                result = &result * &power;
            }
            e >>= 1;
            if e > 0 {
                power = &power * &power;
            }
        }
        return result;
    }

    ///
    /// Returns the non-negative gcd of all coefficients.
    ///
    pub fn integer_content(&self) -> BigInt {
        gcd_all(self.terms.iter().map(|(_, c)| c))
    }

    ///
    /// Returns the monomial of largest degree that divides this polynomial.
    ///
    pub fn monomial_content(&self) -> Monomial {
        let mut iter = self.terms.iter().map(|(m, _)| m);
        match iter.next() {
            None => Monomial::one(),
            Some(first) => iter.fold(first.clone(), |current, m| current.gcd(m))
        }
    }

    pub fn mul_monomial(&self, m: &Monomial) -> MultiPoly {
        MultiPoly { terms: self.terms.iter().map(|(n, c)| (n.mul(m), c.clone())).collect() }
    }

    pub fn div_monomial(&self, m: &Monomial) -> Option<MultiPoly> {
        let mut terms = Vec::with_capacity(self.terms.len());
        for (n, c) in &self.terms {
            terms.push((n.checked_div(m)?, c.clone()));
        }
        return Some(MultiPoly::from_terms(terms));
    }

    pub fn scale(&self, c: &BigInt) -> MultiPoly {
        MultiPoly::from_terms(self.terms.iter().map(|(m, d)| (m.clone(), d * c)))
    }

    ///
    /// Divides all coefficients by `c`, which must divide each of them.
    ///
    pub fn div_int_exact(&self, c: &BigInt) -> MultiPoly {
        debug_assert!(self.terms.iter().all(|(_, d)| d.is_multiple_of(c)));
        MultiPoly::from_terms(self.terms.iter().map(|(m, d)| (m.clone(), d / c)))
    }

    ///
    /// Reduces each coefficient to its representative in `(-m/2, m/2]`.
    ///
    pub fn reduce_symmetric(&self, modulus: &BigInt) -> MultiPoly {
        MultiPoly::from_terms(self.terms.iter().map(|(m, c)| (m.clone(), symmetric_rem(c, modulus))))
    }

    ///
    /// Returns `self / rhs` if `rhs` divides `self` exactly over the integers.
    ///
    pub fn checked_div(&self, rhs: &MultiPoly) -> Option<MultiPoly> {
        assert!(!rhs.is_zero());
        if self.is_zero() {
            return Some(MultiPoly::zero());
        }
        for var in rhs.variables() {
            if rhs.degree_in(var) > self.degree_in(var) {
                return None;
            }
        }
        let (lm, lc) = &rhs.terms[0];
        let mut quotient = Vec::new();
        let mut remainder = self.clone();
        while let Some((rm, rc)) = remainder.terms.first() {
            let m = rm.checked_div(lm)?;
            let (c, rem) = rc.div_rem(lc);
            if !rem.is_zero() {
                return None;
            }
            remainder = &remainder - &rhs.mul_monomial(&m).scale(&c);
            quotient.push((m, c));
        }
        return Some(MultiPoly::from_terms(quotient));
    }

    ///
    /// Returns this polynomial as univariate polynomial in `X_var`, if no other variable
    /// occurs.
    ///
    pub fn to_univariate(&self, var: usize) -> Option<IntPoly> {
        let mut coefficients = Vec::new();
        coefficients.resize(if self.is_zero() { 0 } else { self.degree_in(var) + 1 }, BigInt::zero());
        for (m, c) in &self.terms {
            if m.exponents().iter().enumerate().any(|(i, e)| i != var && *e > 0) {
                return None;
            }
            coefficients[m.exponent(var) as usize] = c.clone();
        }
        return Some(IntPoly::from_coefficients(coefficients));
    }

    pub fn from_univariate(f: &IntPoly, var: usize) -> MultiPoly {
        MultiPoly::from_terms(f.coefficients().iter().enumerate().map(|(i, c)| (Monomial::variable_power(var, i as u32), c.clone())))
    }

    pub fn one_norm(&self) -> BigInt {
        self.terms.iter().map(|(_, c)| c.abs()).sum()
    }

    ///
    /// Returns `-self` if the leading coefficient is negative, otherwise `self`.
    ///
    pub fn with_positive_lc(self) -> MultiPoly {
        if self.lc().map(|c| c.is_negative()).unwrap_or(false) {
            -&self
        } else {
            self
        }
    }
}

impl<'a, 'b> Add<&'b MultiPoly> for &'a MultiPoly {
    type Output = MultiPoly;

    fn add(self, rhs: &'b MultiPoly) -> MultiPoly {
        let mut result = Vec::with_capacity(self.terms.len() + rhs.terms.len());
        let mut lhs_it = self.terms.iter().peekable();
        let mut rhs_it = rhs.terms.iter().peekable();
        loop {
            let ordering = match (lhs_it.peek(), rhs_it.peek()) {
                (None, None) => break,
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (Some((l, _)), Some((r, _))) => l.cmp(r)
            };
            match ordering {
                Ordering::Greater => result.push(lhs_it.next().unwrap().clone()),
                Ordering::Less => result.push(rhs_it.next().unwrap().clone()),
                Ordering::Equal => {
                    let (m, l) = lhs_it.next().unwrap();
                    let (_, r) = rhs_it.next().unwrap();
                    let sum = l + r;
                    if !sum.is_zero() {
                        result.push((m.clone(), sum));
                    }
                }
            }
        }
        return MultiPoly { terms: result };
    }
}

impl<'a> Neg for &'a MultiPoly {
    type Output = MultiPoly;

    fn neg(self) -> MultiPoly {
        MultiPoly { terms: self.terms.iter().map(|(m, c)| (m.clone(), -c)).collect() }
    }
}

impl<'a, 'b> Sub<&'b MultiPoly> for &'a MultiPoly {
    type Output = MultiPoly;

    fn sub(self, rhs: &'b MultiPoly) -> MultiPoly {
        self + &(-rhs)
    }
}

impl<'a, 'b> Mul<&'b MultiPoly> for &'a MultiPoly {
    type Output = MultiPoly;

    fn mul(self, rhs: &'b MultiPoly) -> MultiPoly {
        let mut result: BTreeMap<Monomial, BigInt> = BTreeMap::new();
        for (lm, lc) in &self.terms {
            for (rm, rc) in &rhs.terms {
                *result.entry(lm.mul(rm)).or_insert_with(BigInt::zero) += lc * rc;
            }
        }
        MultiPoly {
            terms: result.into_iter().rev().filter(|(_, c)| !c.is_zero()).collect()
        }
    }
}

macro_rules! impl_by_value_trait {
    ($trait_name:ident, $fn_name:ident) => {

        impl $trait_name for MultiPoly {
            type Output = MultiPoly;

            fn $fn_name(self, rhs: MultiPoly) -> MultiPoly {
                (&self).$fn_name(&rhs)
            }
        }

        impl<'a> $trait_name<&'a MultiPoly> for MultiPoly {
            type Output = MultiPoly;

            fn $fn_name(self, rhs: &'a MultiPoly) -> MultiPoly {
                (&self).$fn_name(rhs)
            }
        }
    };
}

impl_by_value_trait!{ Add, add }
impl_by_value_trait!{ Sub, sub }
impl_by_value_trait!{ Mul, mul }

impl Neg for MultiPoly {
    type Output = MultiPoly;

    fn neg(self) -> MultiPoly {
        -&self
    }
}

impl Display for MultiPoly {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        for (i, (m, c)) in self.terms.iter().enumerate() {
            if i == 0 {
                if c.is_negative() {
                    write!(f, "-")?;
                }
            } else if c.is_negative() {
                write!(f, " - ")?;
            } else {
                write!(f, " + ")?;
            }
            let abs = c.abs();
            let mut factors = Vec::new();
            if !abs.is_one() || m.is_one() {
                factors.push(format!("{}", abs));
            }
            for (var, e) in m.exponents().iter().enumerate() {
                match *e {
                    0 => {},
                    1 => factors.push(format!("X{}", var)),
                    e => factors.push(format!("X{}^{}", var, e))
                }
            }
            write!(f, "{}", factors.join("*"))?;
        }
        return Ok(());
    }
}

#[cfg(test)]
fn x() -> MultiPoly {
    MultiPoly::variable(0)
}

#[cfg(test)]
fn y() -> MultiPoly {
    MultiPoly::variable(1)
}

#[test]
fn test_canonical_form() {
    let f = MultiPoly::from_i64_terms(&[(&[0, 1], 2), (&[1], 1), (&[0, 1, 0], -2), (&[], 5)]);
    assert_eq!(2, f.terms().len());
    assert_eq!(&Monomial::new(vec![1]), &f.terms()[0].0);
    assert!(f.terms().windows(2).all(|w| w[0].0 > w[1].0));
    assert!(Monomial::new(vec![2]) > Monomial::new(vec![1, 7]));
    assert!(Monomial::new(vec![1, 1]) > Monomial::new(vec![1]));
}

#[test]
fn test_arithmetic() {
    let f = &x() + &y();
    let g = &x() - &y();
    let expected = MultiPoly::from_i64_terms(&[(&[2], 1), (&[0, 2], -1)]);
    assert_eq!(expected, &f * &g);
    assert_eq!(MultiPoly::zero(), &f - &f);
    assert_eq!(&f * &f, f.pow(2));
    assert_eq!(Some(g.clone()), (&f * &g).checked_div(&f));
    assert_eq!(None, (&f * &g).checked_div(&(&x() + &MultiPoly::one())));
    assert_eq!(None, f.checked_div(&f.pow(2)));
}

#[test]
fn test_coefficients_in() {
    let f = MultiPoly::from_i64_terms(&[(&[2, 1], 3), (&[0, 1], 1), (&[1], -2), (&[], 4)]);
    let coefficients = f.coefficients_in(0);
    assert_eq!(3, coefficients.len());
    assert_eq!(&y() + &MultiPoly::from_i64(4), coefficients[0]);
    assert_eq!(MultiPoly::from_i64(-2), coefficients[1]);
    assert_eq!(y().scale(&BigInt::from(3)), f.leading_coefficient_in(0));
    assert_eq!(f, MultiPoly::from_coefficients_in(0, coefficients));
    assert_eq!(1, f.degree_in(1));
    assert_eq!(vec![0, 1], f.variables());
}

#[test]
fn test_evaluate_shift() {
    let f = MultiPoly::from_i64_terms(&[(&[2, 1], 1), (&[0, 1], 1), (&[], 3)]);
    let at_two = f.evaluate(0, &BigInt::from(2));
    assert_eq!(&y().scale(&BigInt::from(5)) + &MultiPoly::from_i64(3), at_two);
    let shifted = f.shift(0, &BigInt::from(2));
    assert_eq!(at_two, shifted.evaluate(0, &BigInt::zero()));
    assert_eq!(y().scale(&BigInt::from(4)), f.taylor_coefficient(0, &BigInt::from(2), 1));
    assert_eq!(y(), f.taylor_coefficient(0, &BigInt::from(2), 2));
    assert_eq!(MultiPoly::zero(), f.taylor_coefficient(0, &BigInt::from(2), 3));
}

#[test]
fn test_univariate_conversion() {
    let f = MultiPoly::from_i64_terms(&[(&[0, 3], 1), (&[], -1)]);
    assert_eq!(None, f.to_univariate(0));
    let g = f.to_univariate(1).unwrap();
    assert_eq!(IntPoly::from_i64(&[-1, 0, 0, 1]), g);
    assert_eq!(f, MultiPoly::from_univariate(&g, 1));
}

#[test]
fn test_content() {
    let f = MultiPoly::from_i64_terms(&[(&[2, 1], 6), (&[1, 3], -4)]);
    assert_eq!(BigInt::from(2), f.integer_content());
    assert_eq!(Monomial::new(vec![1, 1]), f.monomial_content());
    assert_eq!(Some(MultiPoly::from_i64_terms(&[(&[1], 6), (&[0, 2], -4)])), f.div_monomial(&f.monomial_content()));
    assert_eq!(MultiPoly::from_i64_terms(&[(&[2, 1], -1), (&[1, 3], 3)]), f.reduce_symmetric(&BigInt::from(7)));
}

#[test]
fn test_display() {
    let f = MultiPoly::from_i64_terms(&[(&[2, 1], -1), (&[0, 1], 3), (&[], -2)]);
    assert_eq!("-X0^2*X1 + 3*X1 - 2", format!("{}", f));
    assert_eq!("0", format!("{}", MultiPoly::zero()));
}

#[test]
fn test_serialize() {
    let f = MultiPoly::from_i64_terms(&[(&[2, 1], -1), (&[], 5)]);
    let json = serde_json::to_string(&f).unwrap();
    assert_eq!(f, serde_json::from_str::<MultiPoly>(&json).unwrap());
}
