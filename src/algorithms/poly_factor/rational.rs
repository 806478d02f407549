use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Zero};
use tracing::instrument;

use crate::config::FactorConfig;
use crate::error::FactorError;
use crate::rings::multivariate::{Monomial, MultiPoly};

use super::{factor_with, Factorization};

///
/// Factors a polynomial with rational coefficients, given by its terms, into irreducible factors
/// over the rationals.
///
/// The factors are normalized in the same way as for [`factor_with()`], i.e. they have coprime
/// integer coefficients and positive leading coefficient, and the unit is the remaining rational
/// number. Terms with repeated monomials are added up.
///
/// # Example
/// ```
/// # use num_rational::BigRational;
/// # use num_bigint::BigInt;
/// # use feanor_factor::config::*;
/// # use feanor_factor::rings::multivariate::*;
/// # use feanor_factor::algorithms::poly_factor::rational::*;
/// let half = BigRational::new(BigInt::from(1), BigInt::from(2));
/// // x^2/2 - 1/2
/// let terms = vec![(Monomial::variable_power(0, 2), half.clone()), (Monomial::one(), -half.clone())];
/// let factorization = factor_rational(terms.clone(), &FactorConfig::default()).unwrap();
/// assert_eq!(half, factorization.unit);
/// assert_eq!(2, factorization.factors.len());
/// assert_eq!(terms, factorization.expand());
/// ```
///
#[instrument(skip_all, level = "trace")]
pub fn factor_rational<I>(terms: I, config: &FactorConfig) -> Result<Factorization, FactorError>
    where I: IntoIterator<Item = (Monomial, BigRational)>
{
    let terms = terms.into_iter().collect::<Vec<_>>();
    let denominator = terms.iter().fold(BigInt::one(), |current, (_, c)| current.lcm(c.denom()));
    let scaled = MultiPoly::from_terms(terms.into_iter().map(|(m, c)| {
        let c = c * BigRational::from_integer(denominator.clone());
        debug_assert!(c.is_integer());
        (m, c.to_integer())
    }));
    let mut result = factor_with(&scaled, config)?;
    if !result.unit.is_zero() {
        result.unit = result.unit / BigRational::from_integer(denominator);
    }
    return Ok(result);
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[cfg(test)]
fn q(num: i64, den: i64) -> BigRational {
    BigRational::new(BigInt::from(num), BigInt::from(den))
}

#[test]
fn test_factor_rational() {
    LogAlgorithmSubscriber::init_test();
    // 2/3 x^2 y - 1/6 y = 1/6 y (2x - 1)(2x + 1)
    let terms = vec![
        (Monomial::new(vec![2, 1]), q(2, 3)),
        (Monomial::new(vec![0, 1]), q(-1, 6))
    ];
    let factorization = factor_rational(terms.clone(), &FactorConfig::default()).unwrap();
    assert_eq!(q(1, 6), factorization.unit);
    let x = MultiPoly::variable(0);
    let y = MultiPoly::variable(1);
    let two_x = x.scale(&BigInt::from(2));
    assert_eq!(vec![(y, 1), (&two_x - &MultiPoly::one(), 1), (&two_x + &MultiPoly::one(), 1)], factorization.factors);
    assert_eq!(terms, factorization.expand());
}

#[test]
fn test_factor_rational_zero() {
    LogAlgorithmSubscriber::init_test();
    let terms = vec![(Monomial::one(), q(1, 2)), (Monomial::one(), q(-1, 2))];
    let factorization = factor_rational(terms, &FactorConfig::default()).unwrap();
    assert!(factorization.unit.is_zero());
    assert!(factorization.factors.is_empty());
    assert!(factorization.expand().is_empty());
}
