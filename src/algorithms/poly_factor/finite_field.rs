use tracing::instrument;

use crate::algorithms::berlekamp::berlekamp;
use crate::algorithms::poly_squarefree::finite_field::finite_field_power_decomposition;
use crate::error::FactorError;
use crate::rings::poly::*;
use crate::rings::zn::ZnEl;

///
/// Factors a polynomial with coefficients in a prime field.
///
/// The factors are monic and returned with multiplicities, sorted first by multiplicity and then
/// ascending. The unit `f / prod_i factor[i]^multiplicity[i]` is returned as second tuple element.
///
#[stability::unstable(feature = "enable")]
#[instrument(skip_all, level = "trace")]
pub fn poly_factor_finite_field(poly_ring: &ModPolyRing, f: &ModPoly) -> Result<(Vec<(ModPoly, usize)>, ZnEl), FactorError> {
    assert!(!poly_ring.is_zero(f));
    let unit = poly_ring.lc(f).cloned().unwrap_or_else(|| poly_ring.base_ring().one());

    let mut result = Vec::new();
    for (squarefree_part, k) in finite_field_power_decomposition(poly_ring, f)? {
        for factor in berlekamp(poly_ring, &squarefree_part)? {
            result.push((factor, k));
        }
    }
    return Ok((result, unit));
}

///
/// Factors a polynomial over a prime field that is known to be square-free, returning its monic
/// irreducible factors in ascending order.
///
#[stability::unstable(feature = "enable")]
pub fn squarefree_poly_factor_finite_field(poly_ring: &ModPolyRing, f: &ModPoly) -> Result<Vec<ModPoly>, FactorError> {
    if poly_ring.degree(f).unwrap_or(0) == 0 {
        return Ok(Vec::new());
    }
    return berlekamp(poly_ring, f);
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
fn test_poly_factor_finite_field() {
    LogAlgorithmSubscriber::init_test();
    let P = ModPolyRing::new(Zn::new(BigInt::from(5)));
    // 3 (x + 1)^2 (x + 2)^2 (x^2 + 2) x^5
    let f = P.prod([P.pow(&poly(&P, &[1, 1]), 2), P.pow(&poly(&P, &[2, 1]), 2), poly(&P, &[2, 0, 1]), P.pow(&poly(&P, &[0, 1]), 5)]);
    let f = P.scale(&f, &P.base_ring().from_i64(3));
    let (factors, unit) = poly_factor_finite_field(&P, &f).unwrap();
    assert_el_eq!(P.base_ring(), P.base_ring().from_i64(3), unit);
    assert_eq!(vec![
        (poly(&P, &[2, 0, 1]), 1),
        (poly(&P, &[1, 1]), 2),
        (poly(&P, &[2, 1]), 2),
        (poly(&P, &[0, 1]), 5)
    ], factors);
    let product = P.prod(factors.iter().map(|(g, k)| P.pow(g, *k)));
    assert_el_eq!(P, f, P.scale(&product, &unit));
}

#[test]
fn test_squarefree_poly_factor_finite_field() {
    LogAlgorithmSubscriber::init_test();
    let P = ModPolyRing::new(Zn::new(BigInt::from(17)));
    // x^4 + 1 splits into two quadratics modulo 17, since 17 = 1 mod 8 it even splits completely
    let factors = squarefree_poly_factor_finite_field(&P, &poly(&P, &[1, 0, 0, 0, 1])).unwrap();
    assert_eq!(4, factors.len());
    assert!(factors.iter().all(|f| P.degree(f) == Some(1)));
    assert!(squarefree_poly_factor_finite_field(&P, &P.one()).unwrap().is_empty());
}
