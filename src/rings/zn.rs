use std::fmt::{Debug, Display, Formatter};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::integer::symmetric_rem;

///
/// An element of a ring `Z/nZ`, stored as its canonical representative in `[0, n)`.
///
/// Elements do not know which ring they belong to, all arithmetic is performed through
/// the corresponding [`Zn`] object. Passing an element to another ring than the one that
/// created it is a logic error; use [`ZnReductionMap`] resp. [`Zn::lift_from()`] to
/// move elements between rings.
///
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZnEl(BigInt);

impl Debug for ZnEl {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for ZnEl {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

///
/// The ring `Z/nZ` for an arbitrary modulus `n >= 2`. In this crate, `n` is always
/// either a prime `p` or a prime power `p^k`.
///
/// # Example
/// ```
/// # use feanor_factor::rings::zn::*;
/// # use num_bigint::BigInt;
/// let R = Zn::new(BigInt::from(257));
/// let a = R.from_i64(16);
/// assert!(R.eq_el(&R.from_i64(-1), &R.mul_ref(&a, &a)));
/// assert!(R.is_one(&R.pow(&a, 4)));
/// ```
///
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Zn {
    modulus: BigInt
}

impl Zn {

    pub fn new(modulus: BigInt) -> Self {
        assert!(modulus >= BigInt::from(2));
        Zn { modulus: modulus }
    }

    ///
    /// Creates the ring `Z/p^eZ`.
    ///
    pub fn new_prime_power(p: u64, e: usize) -> Self {
        assert!(e >= 1);
        Self::new(crate::integer::int_pow(&BigInt::from(p), e))
    }

    pub fn modulus(&self) -> &BigInt {
        &self.modulus
    }

    pub fn zero(&self) -> ZnEl {
        ZnEl(BigInt::zero())
    }

    pub fn one(&self) -> ZnEl {
        ZnEl(BigInt::one())
    }

    pub fn is_zero(&self, x: &ZnEl) -> bool {
        x.0.is_zero()
    }

    pub fn is_one(&self, x: &ZnEl) -> bool {
        x.0.is_one()
    }

    pub fn eq_el(&self, lhs: &ZnEl, rhs: &ZnEl) -> bool {
        debug_assert!(lhs.0 < self.modulus && rhs.0 < self.modulus);
        lhs.0 == rhs.0
    }

    pub fn clone_el(&self, x: &ZnEl) -> ZnEl {
        x.clone()
    }

    ///
    /// The canonical homomorphism `Z -> Z/nZ`.
    ///
    pub fn from_int(&self, x: &BigInt) -> ZnEl {
        ZnEl(x.mod_floor(&self.modulus))
    }

    pub fn from_i64(&self, x: i64) -> ZnEl {
        self.from_int(&BigInt::from(x))
    }

    pub fn add_ref(&self, lhs: &ZnEl, rhs: &ZnEl) -> ZnEl {
        let result = &lhs.0 + &rhs.0;
        if result >= self.modulus {
            ZnEl(result - &self.modulus)
        } else {
            ZnEl(result)
        }
    }

    pub fn add(&self, lhs: ZnEl, rhs: ZnEl) -> ZnEl {
        self.add_ref(&lhs, &rhs)
    }

    pub fn negate(&self, x: ZnEl) -> ZnEl {
        if x.0.is_zero() {
            x
        } else {
            ZnEl(&self.modulus - x.0)
        }
    }

    pub fn sub_ref(&self, lhs: &ZnEl, rhs: &ZnEl) -> ZnEl {
        let result = &lhs.0 - &rhs.0;
        if result.is_negative() {
            ZnEl(result + &self.modulus)
        } else {
            ZnEl(result)
        }
    }

    pub fn sub(&self, lhs: ZnEl, rhs: ZnEl) -> ZnEl {
        self.sub_ref(&lhs, &rhs)
    }

    pub fn mul_ref(&self, lhs: &ZnEl, rhs: &ZnEl) -> ZnEl {
        ZnEl((&lhs.0 * &rhs.0).mod_floor(&self.modulus))
    }

    pub fn mul(&self, lhs: ZnEl, rhs: ZnEl) -> ZnEl {
        self.mul_ref(&lhs, &rhs)
    }

    pub fn pow(&self, x: &ZnEl, exponent: u64) -> ZnEl {
        ZnEl(x.0.modpow(&BigInt::from(exponent), &self.modulus))
    }

    ///
    /// Returns the multiplicative inverse of `x`, if it exists.
    ///
    pub fn invert(&self, x: &ZnEl) -> Option<ZnEl> {
        let extended = x.0.extended_gcd(&self.modulus);
        if extended.gcd.is_one() {
            Some(ZnEl(extended.x.mod_floor(&self.modulus)))
        } else {
            None
        }
    }

    ///
    /// Computes `lhs / rhs`, which is only done if `rhs` is a unit. Note that
    /// this does not try to solve `rhs * x = lhs` for zero-divisors `rhs`.
    ///
    pub fn checked_div(&self, lhs: &ZnEl, rhs: &ZnEl) -> Option<ZnEl> {
        Some(self.mul_ref(lhs, &self.invert(rhs)?))
    }

    ///
    /// Returns the representative of `x` of smallest absolute value, i.e.
    /// the one in `(-n/2, n/2]`.
    ///
    pub fn smallest_lift(&self, x: &ZnEl) -> BigInt {
        symmetric_rem(&x.0, &self.modulus)
    }

    ///
    /// Returns the representative of `x` in `[0, n)`.
    ///
    pub fn smallest_positive_lift(&self, x: &ZnEl) -> BigInt {
        x.0.clone()
    }

    ///
    /// Maps `x` from `from` into this ring, by taking its smallest lift and reducing
    /// it. This is a ring homomorphism only if the modulus of this ring divides the
    /// modulus of `from`, but it is also used to lift elements from `Z/pZ` to `Z/p^eZ`.
    ///
    pub fn lift_from(&self, from: &Zn, x: &ZnEl) -> ZnEl {
        self.from_int(&from.smallest_lift(x))
    }

    ///
    /// Returns the reduction map `from -> self`, which exists if and only if the modulus
    /// of this ring divides the modulus of `from`.
    ///
    pub fn can_hom_from<'a>(&'a self, from: &'a Zn) -> Option<ZnReductionMap<'a>> {
        if from.modulus.is_multiple_of(&self.modulus) {
            Some(ZnReductionMap { codomain: self })
        } else {
            None
        }
    }

    ///
    /// Iterates over the elements `0, 1, ..., n - 1`. Only sensible for small moduli.
    ///
    pub fn elements<'a>(&'a self) -> impl 'a + Iterator<Item = ZnEl> {
        num_iter_range(&self.modulus).map(ZnEl)
    }
}

fn num_iter_range(end: &BigInt) -> impl Iterator<Item = BigInt> {
    let end = end.clone();
    std::iter::successors(Some(BigInt::zero()), |x| Some(x + 1)).take_while(move |x| *x < end)
}

///
/// The reduction homomorphism `Z/nZ -> Z/mZ` for `m | n`.
///
pub struct ZnReductionMap<'a> {
    codomain: &'a Zn
}

impl<'a> ZnReductionMap<'a> {

    pub fn map_ref(&self, x: &ZnEl) -> ZnEl {
        self.codomain.from_int(&x.0)
    }
}

#[test]
fn test_ring_axioms() {
    let R = Zn::new(BigInt::from(12));
    let elements = R.elements().collect::<Vec<_>>();
    assert_eq!(12, elements.len());
    for a in &elements {
        assert_el_eq!(R, a, R.add_ref(a, &R.zero()));
        assert_el_eq!(R, R.zero(), R.sub_ref(a, a));
        assert_el_eq!(R, R.zero(), R.add(R.negate(a.clone()), a.clone()));
        for b in &elements {
            assert_el_eq!(R, R.add_ref(a, b), R.add_ref(b, a));
            assert_el_eq!(R, R.mul_ref(a, b), R.mul_ref(b, a));
            assert_el_eq!(R, a, R.add(R.sub_ref(a, b), b.clone()));
        }
    }
}

#[test]
fn test_invert() {
    let R = Zn::new(BigInt::from(12));
    assert!(R.invert(&R.from_i64(4)).is_none());
    assert!(R.invert(&R.from_i64(0)).is_none());
    let inv = R.invert(&R.from_i64(5)).unwrap();
    assert_el_eq!(R, R.one(), R.mul_ref(&inv, &R.from_i64(5)));
    assert_el_eq!(R, R.from_i64(7), R.checked_div(&R.from_i64(35), &R.from_i64(5)).unwrap());
}

#[test]
fn test_lifts() {
    let R = Zn::new(BigInt::from(9));
    assert_eq!(BigInt::from(-2), R.smallest_lift(&R.from_i64(7)));
    assert_eq!(BigInt::from(4), R.smallest_lift(&R.from_i64(4)));
    assert_eq!(BigInt::from(7), R.smallest_positive_lift(&R.from_i64(-2)));
}

#[test]
fn test_reduction_map() {
    let R = Zn::new_prime_power(3, 3);
    let F = Zn::new(BigInt::from(3));
    assert!(R.can_hom_from(&F).is_none());
    let hom = F.can_hom_from(&R).unwrap();
    assert_el_eq!(F, F.from_i64(2), hom.map_ref(&R.from_i64(26)));
    assert_el_eq!(R, R.from_i64(-1), R.lift_from(&F, &F.from_i64(2)));
}
