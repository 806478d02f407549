use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

use crate::rings::int_poly::IntPoly;
use crate::rings::zn::*;

///
/// A single nonzero term `c * X^e` of a [`ModPoly`].
///
/// The derived ordering compares exponents first and coefficients second, thus
/// the ordering on [`ModPoly`] is the lexicographic ordering of the term sequences.
///
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Term {
    pub exponent: usize,
    pub coefficient: ZnEl
}

///
/// A univariate polynomial over some ring `Z/nZ`, stored as the sequence of its nonzero
/// terms, sorted by strictly descending exponent. As for [`ZnEl`], all operations are
/// performed by the corresponding [`ModPolyRing`].
///
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModPoly {
    terms: Vec<Term>
}

impl ModPoly {

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }
}

impl Debug for ModPoly {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            match term.exponent {
                0 => write!(f, "{}", term.coefficient)?,
                1 => write!(f, "{}X", term.coefficient)?,
                e => write!(f, "{}X^{}", term.coefficient, e)?
            }
        }
        return Ok(());
    }
}

///
/// The polynomial ring `(Z/nZ)[X]`. If `n` is not prime, only those divisions are
/// supported where the leading coefficient of the divisor is a unit.
///
/// # Example
/// ```
/// # use feanor_factor::assert_el_eq;
/// # use feanor_factor::rings::zn::*;
/// # use feanor_factor::rings::poly::*;
/// # use num_bigint::BigInt;
/// let P = ModPolyRing::new(Zn::new(BigInt::from(5)));
/// let Fp = P.base_ring();
/// let f = P.from_terms([(Fp.one(), 2), (Fp.from_i64(-1), 0)]);
/// let x_plus_1 = P.from_terms([(Fp.one(), 1), (Fp.one(), 0)]);
/// let x_minus_1 = P.checked_div(&f, &x_plus_1).unwrap();
/// assert_el_eq!(P, P.from_terms([(Fp.one(), 1), (Fp.from_i64(-1), 0)]), x_minus_1);
/// ```
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModPolyRing {
    base_ring: Zn
}

impl ModPolyRing {

    pub fn new(base_ring: Zn) -> Self {
        ModPolyRing { base_ring: base_ring }
    }

    pub fn base_ring(&self) -> &Zn {
        &self.base_ring
    }

    pub fn zero(&self) -> ModPoly {
        ModPoly { terms: Vec::new() }
    }

    pub fn one(&self) -> ModPoly {
        self.from_constant(self.base_ring.one())
    }

    pub fn indeterminate(&self) -> ModPoly {
        self.monomial(self.base_ring.one(), 1)
    }

    pub fn from_constant(&self, c: ZnEl) -> ModPoly {
        self.monomial(c, 0)
    }

    pub fn monomial(&self, c: ZnEl, exponent: usize) -> ModPoly {
        if self.base_ring.is_zero(&c) {
            self.zero()
        } else {
            ModPoly { terms: vec![Term { exponent: exponent, coefficient: c }] }
        }
    }

    ///
    /// Creates the polynomial `sum c_i X^i` from the given `(c_i, i)`. Exponents may appear
    /// multiple times and in any order.
    ///
    pub fn from_terms<I>(&self, terms: I) -> ModPoly
        where I: IntoIterator<Item = (ZnEl, usize)>
    {
        let mut collected: BTreeMap<usize, ZnEl> = BTreeMap::new();
        for (c, e) in terms {
            let entry = collected.entry(e).or_insert_with(|| self.base_ring.zero());
            *entry = self.base_ring.add_ref(entry, &c);
        }
        ModPoly {
            terms: collected.into_iter().rev()
                .filter(|(_, c)| !self.base_ring.is_zero(c))
                .map(|(e, c)| Term { exponent: e, coefficient: c })
                .collect()
        }
    }

    pub fn terms<'a>(&self, f: &'a ModPoly) -> impl 'a + Iterator<Item = (&'a ZnEl, usize)> {
        f.terms.iter().map(|t| (&t.coefficient, t.exponent))
    }

    pub fn is_zero(&self, f: &ModPoly) -> bool {
        f.terms.is_empty()
    }

    pub fn is_one(&self, f: &ModPoly) -> bool {
        f.terms.len() == 1 && f.terms[0].exponent == 0 && self.base_ring.is_one(&f.terms[0].coefficient)
    }

    pub fn eq_el(&self, lhs: &ModPoly, rhs: &ModPoly) -> bool {
        lhs == rhs
    }

    pub fn clone_el(&self, f: &ModPoly) -> ModPoly {
        f.clone()
    }

    pub fn degree(&self, f: &ModPoly) -> Option<usize> {
        f.terms.first().map(|t| t.exponent)
    }

    pub fn lc<'a>(&self, f: &'a ModPoly) -> Option<&'a ZnEl> {
        f.terms.first().map(|t| &t.coefficient)
    }

    pub fn coefficient_at(&self, f: &ModPoly, i: usize) -> ZnEl {
        f.terms.iter().find(|t| t.exponent == i).map(|t| t.coefficient.clone()).unwrap_or_else(|| self.base_ring.zero())
    }

    fn to_dense(&self, f: &ModPoly) -> Vec<ZnEl> {
        let mut result = Vec::new();
        result.resize(self.degree(f).map(|d| d + 1).unwrap_or(0), self.base_ring.zero());
        for t in &f.terms {
            result[t.exponent] = t.coefficient.clone();
        }
        return result;
    }

    fn from_dense(&self, coefficients: Vec<ZnEl>) -> ModPoly {
        ModPoly {
            terms: coefficients.into_iter().enumerate().rev()
                .filter(|(_, c)| !self.base_ring.is_zero(c))
                .map(|(e, c)| Term { exponent: e, coefficient: c })
                .collect()
        }
    }

    pub fn add_ref(&self, lhs: &ModPoly, rhs: &ModPoly) -> ModPoly {
        let mut result = Vec::with_capacity(lhs.terms.len() + rhs.terms.len());
        let mut lhs_it = lhs.terms.iter().peekable();
        let mut rhs_it = rhs.terms.iter().peekable();
        loop {
            match (lhs_it.peek(), rhs_it.peek()) {
                (None, None) => break,
                (Some(_), None) => result.push(lhs_it.next().unwrap().clone()),
                (None, Some(_)) => result.push(rhs_it.next().unwrap().clone()),
                (Some(l), Some(r)) if l.exponent > r.exponent => result.push(lhs_it.next().unwrap().clone()),
                (Some(l), Some(r)) if l.exponent < r.exponent => result.push(rhs_it.next().unwrap().clone()),
                (Some(_), Some(_)) => {
                    let l = lhs_it.next().unwrap();
                    let r = rhs_it.next().unwrap();
                    let sum = self.base_ring.add_ref(&l.coefficient, &r.coefficient);
                    if !self.base_ring.is_zero(&sum) {
                        result.push(Term { exponent: l.exponent, coefficient: sum });
                    }
                }
            }
        }
        return ModPoly { terms: result };
    }

    pub fn add(&self, lhs: ModPoly, rhs: ModPoly) -> ModPoly {
        self.add_ref(&lhs, &rhs)
    }

    pub fn negate(&self, f: ModPoly) -> ModPoly {
        ModPoly {
            terms: f.terms.into_iter().map(|t| Term { exponent: t.exponent, coefficient: self.base_ring.negate(t.coefficient) }).collect()
        }
    }

    pub fn sub_ref(&self, lhs: &ModPoly, rhs: &ModPoly) -> ModPoly {
        self.add_ref(lhs, &self.negate(rhs.clone()))
    }

    pub fn sub(&self, lhs: ModPoly, rhs: ModPoly) -> ModPoly {
        self.add(lhs, self.negate(rhs))
    }

    pub fn mul_ref(&self, lhs: &ModPoly, rhs: &ModPoly) -> ModPoly {
        if self.is_zero(lhs) || self.is_zero(rhs) {
            return self.zero();
        }
        let mut result: BTreeMap<usize, BigInt> = BTreeMap::new();
        for l in &lhs.terms {
            let l_value = self.base_ring.smallest_positive_lift(&l.coefficient);
            for r in &rhs.terms {
                let entry = result.entry(l.exponent + r.exponent).or_insert_with(BigInt::zero);
                *entry += &l_value * self.base_ring.smallest_positive_lift(&r.coefficient);
            }
        }
        return self.from_terms(result.into_iter().map(|(e, c)| (self.base_ring.from_int(&c), e)));
    }

    pub fn mul(&self, lhs: ModPoly, rhs: ModPoly) -> ModPoly {
        self.mul_ref(&lhs, &rhs)
    }

    ///
    /// Computes `c * f` for a scalar `c`.
    ///
    pub fn scale(&self, f: &ModPoly, c: &ZnEl) -> ModPoly {
        ModPoly {
            terms: f.terms.iter()
                .map(|t| Term { exponent: t.exponent, coefficient: self.base_ring.mul_ref(&t.coefficient, c) })
                .filter(|t| !self.base_ring.is_zero(&t.coefficient))
                .collect()
        }
    }

    ///
    /// Computes `c * X^e * f`.
    ///
    pub fn mul_monomial(&self, f: &ModPoly, c: &ZnEl, exponent: usize) -> ModPoly {
        let mut result = self.scale(f, c);
        for t in &mut result.terms {
            t.exponent += exponent;
        }
        return result;
    }

    pub fn prod<I>(&self, factors: I) -> ModPoly
        where I: IntoIterator<Item = ModPoly>
    {
        factors.into_iter().fold(self.one(), |current, next| self.mul(current, next))
    }

    ///
    /// Computes `lhs = q * rhs + r` with `deg(r) < deg(rhs)`, and returns `(q, r)`.
    /// Returns `None` if the leading coefficient of `rhs` is not a unit.
    ///
    pub fn div_rem(&self, lhs: &ModPoly, rhs: &ModPoly) -> Option<(ModPoly, ModPoly)> {
        assert!(!self.is_zero(rhs));
        let rhs_deg = self.degree(rhs).unwrap();
        let lc_inv = self.base_ring.invert(self.lc(rhs).unwrap())?;
        let lhs_deg = match self.degree(lhs) {
            Some(d) if d >= rhs_deg => d,
            _ => return Some((self.zero(), lhs.clone()))
        };
        let mut remainder = self.to_dense(lhs);
        let mut quotient = Vec::new();
        quotient.resize(lhs_deg - rhs_deg + 1, self.base_ring.zero());
        for i in (0..=(lhs_deg - rhs_deg)).rev() {
            let quo = self.base_ring.mul_ref(&remainder[i + rhs_deg], &lc_inv);
            if self.base_ring.is_zero(&quo) {
                continue;
            }
            for t in &rhs.terms {
                let subtract = self.base_ring.mul_ref(&quo, &t.coefficient);
                remainder[i + t.exponent] = self.base_ring.sub_ref(&remainder[i + t.exponent], &subtract);
            }
            quotient[i] = quo;
        }
        remainder.truncate(rhs_deg);
        return Some((self.from_dense(quotient), self.from_dense(remainder)));
    }

    pub fn euclidean_rem(&self, lhs: &ModPoly, rhs: &ModPoly) -> Option<ModPoly> {
        self.div_rem(lhs, rhs).map(|(_, r)| r)
    }

    ///
    /// Returns `lhs / rhs` if `rhs` divides `lhs` and the leading coefficient of `rhs` is
    /// a unit.
    ///
    pub fn checked_div(&self, lhs: &ModPoly, rhs: &ModPoly) -> Option<ModPoly> {
        let (quo, rem) = self.div_rem(lhs, rhs)?;
        if self.is_zero(&rem) {
            Some(quo)
        } else {
            None
        }
    }

    pub fn derivative(&self, f: &ModPoly) -> ModPoly {
        ModPoly {
            terms: f.terms.iter()
                .filter(|t| t.exponent > 0)
                .map(|t| Term {
                    exponent: t.exponent - 1,
                    coefficient: self.base_ring.mul_ref(&t.coefficient, &self.base_ring.from_int(&BigInt::from(t.exponent)))
                })
                .filter(|t| !self.base_ring.is_zero(&t.coefficient))
                .collect()
        }
    }

    pub fn evaluate(&self, f: &ModPoly, x: &ZnEl) -> ZnEl {
        let mut result = self.base_ring.zero();
        let mut current_exponent = self.degree(f).unwrap_or(0);
        for t in &f.terms {
            result = self.base_ring.mul_ref(&result, &self.base_ring.pow(x, (current_exponent - t.exponent) as u64));
            result = self.base_ring.add_ref(&result, &t.coefficient);
            current_exponent = t.exponent;
        }
        return self.base_ring.mul_ref(&result, &self.base_ring.pow(x, current_exponent as u64));
    }

    ///
    /// Returns the unit-normal form of `f`, i.e. `f / lc(f)`. If the leading coefficient
    /// is not a unit (or `f` is zero), `f` is returned unchanged.
    ///
    pub fn normalize(&self, f: ModPoly) -> ModPoly {
        match self.lc(&f).and_then(|lc| self.base_ring.invert(lc)) {
            Some(lc_inv) => self.scale(&f, &lc_inv),
            None => f
        }
    }

    ///
    /// Computes `f^e mod modulus` using square-and-multiply.
    ///
    pub fn pow_mod(&self, f: &ModPoly, e: &BigInt, modulus: &ModPoly) -> Option<ModPoly> {
        assert!(!e.is_negative());
        let mut result = self.euclidean_rem(&self.one(), modulus)?;
        let mut power = self.euclidean_rem(f, modulus)?;
        let mut e = e.clone();
        while !e.is_zero() {
            if e.is_odd() {
                result = self.euclidean_rem(&self.mul_ref(&result, &power), modulus)?;
            }
            e >>= 1;
            if !e.is_zero() {
                power = self.euclidean_rem(&self.mul_ref(&power, &power), modulus)?;
            }
        }
        return Some(result);
    }

    pub fn pow(&self, f: &ModPoly, e: usize) -> ModPoly {
        (0..e).fold(self.one(), |current, _| self.mul_ref(&current, f))
    }

    ///
    /// Maps a polynomial from `from` to this ring, coefficient-wise via [`Zn::lift_from()`].
    /// This is used to lift polynomials from `Z/pZ[X]` to `Z/p^kZ[X]`, for the other direction
    /// use the reduction map [`ModPolyRing::can_hom_from()`].
    ///
    pub fn lift_from(&self, from: &ModPolyRing, f: &ModPoly) -> ModPoly {
        self.from_terms(from.terms(f).map(|(c, e)| (self.base_ring.lift_from(from.base_ring(), c), e)))
    }

    ///
    /// Returns the coefficient-wise reduction map `from -> self`, which exists if and only if
    /// the modulus of this ring divides the modulus of `from`.
    ///
    pub fn can_hom_from<'a>(&'a self, from: &'a ModPolyRing) -> Option<ModPolyReductionMap<'a>> {
        Some(ModPolyReductionMap {
            codomain: self,
            base_hom: self.base_ring.can_hom_from(&from.base_ring)?
        })
    }

    ///
    /// Reduces an integer polynomial modulo `n`.
    ///
    pub fn reduce(&self, f: &IntPoly) -> ModPoly {
        self.from_dense(f.coefficients().iter().map(|c| self.base_ring.from_int(c)).collect())
    }

    ///
    /// Lifts `f` to the integer polynomial whose coefficients are the smallest lifts of
    /// the coefficients of `f`.
    ///
    pub fn smallest_lift(&self, f: &ModPoly) -> IntPoly {
        let mut coefficients = Vec::new();
        coefficients.resize(self.degree(f).map(|d| d + 1).unwrap_or(0), BigInt::zero());
        for t in &f.terms {
            coefficients[t.exponent] = self.base_ring.smallest_lift(&t.coefficient);
        }
        return IntPoly::from_coefficients(coefficients);
    }

    ///
    /// Takes the smallest positive lift of each coefficient, divides it by `divisor`
    /// and maps the result into `target` along the reduction map. Returns `None` if
    /// `divisor` does not divide all coefficients, or the modulus of `target` does not
    /// divide the modulus of this ring.
    ///
    pub fn div_coefficients_into(&self, target: &ModPolyRing, f: &ModPoly, divisor: &BigInt) -> Option<ModPoly> {
        let hom = target.can_hom_from(self)?;
        let mut terms = Vec::with_capacity(f.terms.len());
        for t in &f.terms {
            let value = self.base_ring.smallest_positive_lift(&t.coefficient);
            if !(&value % divisor).is_zero() {
                return None;
            }
            terms.push(Term { exponent: t.exponent, coefficient: self.base_ring.from_int(&(value / divisor)) });
        }
        return Some(hom.map(ModPoly { terms: terms }));
    }
}

///
/// The coefficient-wise reduction `(Z/nZ)[X] -> (Z/mZ)[X]` for `m | n`.
///
pub struct ModPolyReductionMap<'a> {
    codomain: &'a ModPolyRing,
    base_hom: ZnReductionMap<'a>
}

impl<'a> ModPolyReductionMap<'a> {

    pub fn map_ref(&self, f: &ModPoly) -> ModPoly {
        self.codomain.from_terms(f.terms.iter().map(|t| (self.base_hom.map_ref(&t.coefficient), t.exponent)))
    }

    pub fn map(&self, f: ModPoly) -> ModPoly {
        self.map_ref(&f)
    }
}

#[cfg(test)]
fn poly(P: &ModPolyRing, coefficients: &[i64]) -> ModPoly {
    P.from_terms(coefficients.iter().enumerate().map(|(i, c)| (P.base_ring().from_i64(*c), i)))
}

#[test]
fn test_from_terms_invariant() {
    let P = ModPolyRing::new(Zn::new(BigInt::from(7)));
    let f = P.from_terms([(P.base_ring().from_i64(3), 1), (P.base_ring().from_i64(4), 1), (P.base_ring().from_i64(1), 5), (P.base_ring().from_i64(2), 0)]);
    assert_eq!(2, f.terms().len());
    assert_eq!(Some(5), P.degree(&f));
    assert!(f.terms().windows(2).all(|w| w[0].exponent > w[1].exponent));
    assert!(f.terms().iter().all(|t| !P.base_ring().is_zero(&t.coefficient)));
}

#[test]
fn test_arithmetic() {
    let P = ModPolyRing::new(Zn::new(BigInt::from(7)));
    let f = poly(&P, &[1, 1]);
    let g = poly(&P, &[-1, 1]);
    assert_el_eq!(P, poly(&P, &[-1, 0, 1]), P.mul_ref(&f, &g));
    assert_el_eq!(P, poly(&P, &[0, 2]), P.add_ref(&f, &g));
    assert_el_eq!(P, poly(&P, &[2]), P.sub_ref(&f, &g));
    assert_el_eq!(P, P.zero(), P.sub_ref(&f, &f));
    assert_el_eq!(P, poly(&P, &[3, 0, 3]), P.derivative(&poly(&P, &[0, 3, 0, 1])));
    assert_el_eq!(P, P.zero(), P.derivative(&poly(&P, &[1, 0, 0, 0, 0, 0, 0, 1])));
}

#[test]
fn test_div_rem() {
    let P = ModPolyRing::new(Zn::new(BigInt::from(7)));
    let f = poly(&P, &[1, 2, 3, 4, 5]);
    let g = poly(&P, &[3, 0, 2]);
    let (q, r) = P.div_rem(&f, &g).unwrap();
    assert!(P.degree(&r).map(|d| d < 2).unwrap_or(true));
    assert_el_eq!(P, f, P.add(P.mul_ref(&q, &g), r));

    let R = ModPolyRing::new(Zn::new(BigInt::from(9)));
    assert!(R.div_rem(&poly(&R, &[1, 1, 1]), &poly(&R, &[1, 3])).is_none());
    assert!(R.div_rem(&poly(&R, &[1, 1, 1]), &poly(&R, &[1, 2])).is_some());
}

#[test]
fn test_evaluate_and_normalize() {
    let P = ModPolyRing::new(Zn::new(BigInt::from(11)));
    let f = poly(&P, &[5, 0, 0, 3]);
    assert_el_eq!(P.base_ring(), P.base_ring().from_i64(5 + 3 * 8), P.evaluate(&f, &P.base_ring().from_i64(2)));
    let g = P.normalize(f);
    assert!(P.base_ring().is_one(P.lc(&g).unwrap()));
}

#[test]
fn test_pow_mod() {
    let P = ModPolyRing::new(Zn::new(BigInt::from(5)));
    let modulus = poly(&P, &[2, 0, 1]);
    let x = P.indeterminate();
    let expected = P.euclidean_rem(&P.pow(&x, 13), &modulus).unwrap();
    assert_el_eq!(P, expected, P.pow_mod(&x, &BigInt::from(13), &modulus).unwrap());
}

#[test]
fn test_ordering() {
    let P = ModPolyRing::new(Zn::new(BigInt::from(5)));
    let mut polys = vec![poly(&P, &[1, 1]), poly(&P, &[0, 0, 1]), poly(&P, &[1, 1])];
    polys.sort();
    polys.dedup();
    assert_eq!(2, polys.len());
    assert!(poly(&P, &[1, 1]) < poly(&P, &[0, 0, 1]));
}

#[test]
#[allow(non_snake_case)]
fn test_reduce_and_lift() {
    let Zpk = ModPolyRing::new(Zn::new_prime_power(5, 3));
    let Fp = ModPolyRing::new(Zn::new(BigInt::from(5)));
    assert!(Zpk.can_hom_from(&Fp).is_none());
    let reduce = Fp.can_hom_from(&Zpk).unwrap();
    assert_el_eq!(Fp, poly(&Fp, &[1, 0, 2]), reduce.map(poly(&Zpk, &[26, 10, 7])));
    assert_el_eq!(Zpk, poly(&Zpk, &[-1, 1]), Zpk.lift_from(&Fp, &poly(&Fp, &[4, 1])));

    assert_el_eq!(Fp, poly(&Fp, &[1, 2, 4]), Zpk.div_coefficients_into(&Fp, &poly(&Zpk, &[25, 50, -25]), &BigInt::from(25)).unwrap());
    assert!(Zpk.div_coefficients_into(&Fp, &poly(&Zpk, &[25, 1]), &BigInt::from(25)).is_none());
    let F7 = ModPolyRing::new(Zn::new(BigInt::from(7)));
    assert!(Zpk.div_coefficients_into(&F7, &poly(&Zpk, &[25]), &BigInt::from(25)).is_none());
}
