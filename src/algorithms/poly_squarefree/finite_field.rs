use num_traits::ToPrimitive;
use tracing::instrument;

use crate::algorithms::eea::poly_gcd_field;
use crate::error::FactorError;
use crate::rings::poly::*;

fn characteristic(poly_ring: &ModPolyRing) -> usize {
    // the moduli of prime fields used during factoring always fit into a machine word
    poly_ring.base_ring().modulus().to_usize().unwrap_or(usize::MAX)
}

///
/// Undoes the Frobenius `f -> f^p` for a polynomial over the prime field `Fp`, assuming that
/// every exponent of `f` is divisible by `p`. Since `c^p = c` for all `c` in `Fp`, this just
/// divides the exponents by `p`.
///
fn pth_root(poly_ring: &ModPolyRing, poly: &ModPoly) -> ModPoly {
    let p = characteristic(poly_ring);
    poly_ring.from_terms(poly_ring.terms(poly).map(|(c, i)| {
        debug_assert!(i % p == 0);
        (c.clone(), i / p)
    }))
}

fn exact_div(poly_ring: &ModPolyRing, lhs: &ModPoly, rhs: &ModPoly) -> Result<ModPoly, FactorError> {
    poly_ring.checked_div(lhs, rhs).ok_or(FactorError::InexactDivision("finite field square-free decomposition"))
}

///
/// Checks whether the given polynomial over a prime field is square-free, by checking
/// `gcd(f, f') = 1`.
///
pub fn is_squarefree_finite_field(poly_ring: &ModPolyRing, poly: &ModPoly) -> Result<bool, FactorError> {
    if poly_ring.is_zero(poly) {
        return Ok(false);
    }
    let derivate = poly_ring.derivative(poly);
    return Ok(poly_ring.is_one(&poly_gcd_field(poly_ring, poly, &derivate)?));
}

///
/// Returns a list of `(fi, ki)` such that the `fi` are monic, square-free, nonconstant and pairwise
/// coprime, the `ki` are distinct, and `f = a prod_i fi^ki` for a unit `a` of the prime field.
///
/// The factors with multiplicity not divisible by `p` are found using the derivative, as
/// `gcd(f, f')` contains each of them with multiplicity reduced by one. What remains is a `p`-th
/// power, whose `p`-th root is decomposed recursively.
///
#[stability::unstable(feature = "enable")]
#[instrument(skip_all, level = "trace")]
pub fn finite_field_power_decomposition(poly_ring: &ModPolyRing, poly: &ModPoly) -> Result<Vec<(ModPoly, usize)>, FactorError> {
    assert!(!poly_ring.is_zero(poly));
    let mut result = Vec::new();
    if poly_ring.degree(poly) == Some(0) {
        return Ok(result);
    }
    let p = characteristic(poly_ring);
    let poly = poly_ring.normalize(poly.clone());
    let derivate = poly_ring.derivative(&poly);

    let mut remaining = if poly_ring.is_zero(&derivate) {
        poly
    } else {
        let mut c = poly_gcd_field(poly_ring, &poly, &derivate)?;
        let mut w = exact_div(poly_ring, &poly, &c)?;
        let mut i = 1;
        while !poly_ring.is_one(&w) {
            let y = poly_gcd_field(poly_ring, &w, &c)?;
            let z = exact_div(poly_ring, &w, &y)?;
            if !poly_ring.is_one(&z) {
                result.push((poly_ring.normalize(z), i));
            }
            i += 1;
            c = exact_div(poly_ring, &c, &y)?;
            w = y;
        }
        c
    };
    remaining = poly_ring.normalize(remaining);
    if !poly_ring.is_one(&remaining) {
        for (f, k) in finite_field_power_decomposition(poly_ring, &pth_root(poly_ring, &remaining))? {
            result.push((f, k * p));
        }
    }
    result.sort_by_key(|(_, k)| *k);
    return Ok(result);
}

#[cfg(test)]
use num_bigint::BigInt;
#[cfg(test)]
use crate::rings::zn::Zn;
#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[cfg(test)]
fn poly(P: &ModPolyRing, coefficients: &[i64]) -> ModPoly {
    P.from_terms(coefficients.iter().enumerate().map(|(i, c)| (P.base_ring().from_i64(*c), i)))
}

#[test]
fn test_is_squarefree() {
    LogAlgorithmSubscriber::init_test();
    let P = ModPolyRing::new(Zn::new(BigInt::from(3)));
    let f = P.prod([P.pow(&poly(&P, &[1, 1]), 4), poly(&P, &[2, 1]), P.pow(&poly(&P, &[1, 0, 1]), 3)]);
    let expected = P.prod([poly(&P, &[1, 1]), poly(&P, &[2, 1]), poly(&P, &[1, 0, 1])]);
    assert!(!is_squarefree_finite_field(&P, &f).unwrap());
    assert!(is_squarefree_finite_field(&P, &expected).unwrap());
    // derivative of x^3 + 1 vanishes modulo 3
    assert!(!is_squarefree_finite_field(&P, &poly(&P, &[1, 0, 0, 1])).unwrap());
}

#[test]
fn test_power_decomposition() {
    LogAlgorithmSubscriber::init_test();
    let P = ModPolyRing::new(Zn::new(BigInt::from(3)));
    let a = poly(&P, &[1, 1]);
    let b = poly(&P, &[2, 1]);
    let c = poly(&P, &[1, 0, 1]);
    let d = poly(&P, &[0, 1]);
    let f = P.prod([P.pow(&a, 4), b.clone(), P.pow(&c, 3), P.pow(&d, 6)]);
    let f = P.scale(&f, &P.base_ring().from_i64(2));
    let decomposition = finite_field_power_decomposition(&P, &f).unwrap();
    assert_eq!(vec![(b, 1), (c, 3), (a, 4), (d, 6)], decomposition);
}

#[test]
fn test_power_decomposition_pth_power() {
    LogAlgorithmSubscriber::init_test();
    let P = ModPolyRing::new(Zn::new(BigInt::from(5)));
    let f = poly(&P, &[1, 0, 0, 0, 0, 1]);
    assert_eq!(vec![(poly(&P, &[1, 1]), 5)], finite_field_power_decomposition(&P, &f).unwrap());
}
