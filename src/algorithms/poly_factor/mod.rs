use std::fmt::{Display, Formatter};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use oorandom::Rand64;
use serde::{Deserialize, Serialize};
use tracing::{event, instrument, Level};

use crate::algorithms::poly_gcd::*;
use crate::algorithms::poly_squarefree::integer::poly_power_decomposition_integer;
use crate::config::FactorConfig;
use crate::error::FactorError;
use crate::rings::multivariate::{Monomial, MultiPoly};

///
/// Contains the factorization of polynomials over prime fields, based on
/// [`crate::algorithms::berlekamp`].
///
pub mod finite_field;
///
/// Contains the enumeration of splits of a set of modular factors, used during the
/// recombination of modular factors.
///
pub mod partition;
///
/// Contains the factorization of univariate polynomials over the integers via Hensel lifting
/// and recombination of modular factors.
///
pub mod integer;
///
/// Contains the factorization of multivariate polynomials over the integers via Wang's
/// leading coefficient distribution and multivariate Hensel lifting.
///
pub mod multivariate;
///
/// Contains the factorization of polynomials with rational coefficients.
///
pub mod rational;

///
/// The factorization of a polynomial `f` as `f = unit * prod_i factors[i].0^factors[i].1`.
///
/// The factors are pairwise distinct and irreducible, they have coprime integer coefficients
/// and a positive leading coefficient w.r.t. the lexicographic order. They are sorted by total
/// degree first, and then by their terms. All constant factors, including the sign, are part of
/// the unit. In particular, the factorization of `0` has unit `0` and no factors.
///
/// # Example
/// ```
/// # use feanor_factor::rings::multivariate::*;
/// # use feanor_factor::algorithms::poly_factor::*;
/// let x = MultiPoly::variable(0);
/// let f = &(&x * &x).scale(&(-2).into()) + &MultiPoly::from_i64(2);
/// let factorization = factor(&f).unwrap();
/// assert_eq!(2, factorization.factors.len());
/// assert_eq!(f, factorization.expand_integer().unwrap());
/// assert_eq!("-2 * (X0 - 1) * (X0 + 1)", format!("{}", factorization));
/// ```
///
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Factorization {
    pub unit: BigRational,
    pub factors: Vec<(MultiPoly, usize)>
}

impl Factorization {

    ///
    /// Computes the product of all factors (with multiplicities), without the unit.
    ///
    pub fn expand_factors(&self) -> MultiPoly {
        self.factors.iter().fold(MultiPoly::one(), |current, (f, k)| &current * &f.pow(*k))
    }

    ///
    /// Computes `unit * prod_i factors[i].0^factors[i].1`, as list of terms with rational
    /// coefficients in descending lexicographic order.
    ///
    pub fn expand(&self) -> Vec<(Monomial, BigRational)> {
        if self.unit.is_zero() {
            return Vec::new();
        }
        return self.expand_factors().terms().iter()
            .map(|(m, c)| (m.clone(), &self.unit * BigRational::from_integer(c.clone())))
            .collect();
    }

    ///
    /// Computes `unit * prod_i factors[i].0^factors[i].1`, if the unit is an integer.
    ///
    pub fn expand_integer(&self) -> Option<MultiPoly> {
        if !self.unit.is_integer() {
            return None;
        }
        return Some(self.expand_factors().scale(&self.unit.to_integer()));
    }
}

impl Display for Factorization {

    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.unit)?;
        for (factor, k) in &self.factors {
            write!(f, " * ({})", factor)?;
            if *k > 1 {
                write!(f, "^{}", k)?;
            }
        }
        return Ok(());
    }
}

///
/// Chooses the variable of smallest positive degree.
///
fn choose_main_variable(f: &MultiPoly) -> Option<usize> {
    f.variables().into_iter().min_by_key(|var| (f.degree_in(*var), *var))
}

///
/// Factors a square-free polynomial without integer content, returning its irreducible
/// factors with positive leading coefficient.
///
#[instrument(skip_all, level = "trace")]
fn factor_squarefree(f: &MultiPoly, config: &FactorConfig, rng: &mut Rand64) -> Result<Vec<MultiPoly>, FactorError> {
    let variables = f.variables();
    if variables.len() == 0 {
        return Ok(Vec::new());
    } else if variables.len() == 1 {
        let var = variables[0];
        let univariate = f.to_univariate(var).ok_or(FactorError::InexactDivision("factor_squarefree"))?;
        let factors = integer::poly_factor_squarefree_integer(&univariate.primitive_part(), config)?;
        return Ok(factors.iter().map(|g| MultiPoly::from_univariate(g, var)).collect());
    }
    let main_var = choose_main_variable(f).ok_or(FactorError::InexactDivision("factor_squarefree"))?;
    event!(Level::TRACE, main_var = main_var, degree = f.degree_in(main_var), "chose main variable");

    let content = content_in(f, main_var);
    let primitive_part = f.checked_div(&content).ok_or(FactorError::InexactDivision("factor_squarefree"))?.with_positive_lc();
    let mut result = factor_squarefree(&content, config, rng)?;
    if primitive_part.variables().len() < 2 {
        result.extend(factor_squarefree(&primitive_part, config, rng)?);
    } else if primitive_part.degree_in(main_var) == 1 {
        result.push(primitive_part);
    } else {
        let lc = primitive_part.leading_coefficient_in(main_var);
        let (lc_constant, lc_factors) = factor_integer(&lc, config, rng)?;
        result.extend(multivariate::poly_factor_squarefree_multivariate(&primitive_part, main_var, &lc_constant, &lc_factors, config, rng)?);
    }
    return Ok(result);
}

///
/// Factors a nonzero polynomial over the integers, returning an integer `u` and the irreducible
/// factors `fi` with multiplicities `ki` such that `f = u prod_i fi^ki`, in canonical order.
///
#[instrument(skip_all, level = "trace")]
pub(crate) fn factor_integer(f: &MultiPoly, config: &FactorConfig, rng: &mut Rand64) -> Result<(BigInt, Vec<(MultiPoly, usize)>), FactorError> {
    assert!(!f.is_zero());
    let mut result = Vec::new();

    let monomial_content = f.monomial_content();
    for (var, e) in monomial_content.exponents().iter().enumerate() {
        if *e > 0 {
            result.push((MultiPoly::variable(var), *e as usize));
        }
    }
    let remaining = f.div_monomial(&monomial_content).ok_or(FactorError::InexactDivision("factor_integer"))?;
    let remaining = remaining.div_int_exact(&unit_content(&remaining));

    for (g, k) in poly_power_decomposition_integer(&remaining)? {
        for h in factor_squarefree(&g, config, rng)? {
            result.push((h.with_positive_lc(), k));
        }
    }
    result.sort_by(|(lhs, _), (rhs, _)| lhs.total_degree().cmp(&rhs.total_degree()).then_with(|| lhs.cmp(rhs)));

    let mut lc_product = BigInt::one();
    for (g, k) in &result {
        let lc = g.lc().ok_or(FactorError::InexactDivision("factor_integer"))?;
        for _ in 0..*k {
            lc_product *= lc;
        }
    }
    let lc = f.lc().ok_or(FactorError::InexactDivision("factor_integer"))?;
    if !(lc % &lc_product).is_zero() {
        return Err(FactorError::InexactDivision("factor_integer"));
    }
    return Ok((lc / &lc_product, result));
}

///
/// Factors the given polynomial over the integers into irreducible factors, using the default
/// configuration.
///
/// This is equivalent to the factorization over the rationals, since by Gauss' lemma, a primitive
/// integer polynomial is irreducible over the integers if and only if it is irreducible over
/// the rationals.
///
pub fn factor(f: &MultiPoly) -> Result<Factorization, FactorError> {
    factor_with(f, &FactorConfig::default())
}

///
/// Factors the given polynomial over the integers into irreducible factors.
///
/// The result does not depend on the configuration, up to the different errors that might
/// occur if the configured resource limits are too small.
///
#[instrument(skip_all, level = "trace")]
pub fn factor_with(f: &MultiPoly, config: &FactorConfig) -> Result<Factorization, FactorError> {
    if f.is_zero() {
        return Ok(Factorization { unit: BigRational::zero(), factors: Vec::new() });
    }
    let mut rng = Rand64::new(config.seed as u128);
    let (unit, factors) = factor_integer(f, config, &mut rng)?;
    event!(Level::DEBUG, factors = factors.len(), "factored polynomial");
    return Ok(Factorization { unit: BigRational::from_integer(unit), factors: factors });
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[cfg(test)]
fn x() -> MultiPoly { MultiPoly::variable(0) }
#[cfg(test)]
fn y() -> MultiPoly { MultiPoly::variable(1) }
#[cfg(test)]
fn z() -> MultiPoly { MultiPoly::variable(2) }
#[cfg(test)]
fn c(value: i64) -> MultiPoly { MultiPoly::from_i64(value) }

#[cfg(test)]
fn assert_factorization(f: &MultiPoly, unit: i64, expected: &[(MultiPoly, usize)]) {
    let factorization = factor(f).unwrap();
    assert_eq!(BigRational::from_integer(BigInt::from(unit)), factorization.unit);
    assert_eq!(expected, &factorization.factors[..]);
    assert_eq!(Some(f.clone()), factorization.expand_integer());
    for (g, _) in &factorization.factors {
        let factored_again = factor(g).unwrap();
        assert!(factored_again.unit.is_one());
        assert_eq!(vec![(g.clone(), 1)], factored_again.factors);
    }
}

#[test]
fn test_factor_constant() {
    LogAlgorithmSubscriber::init_test();
    assert_factorization(&c(-6), -6, &[]);
    let zero = factor(&MultiPoly::zero()).unwrap();
    assert!(zero.unit.is_zero());
    assert!(zero.factors.is_empty());
    assert_eq!(Some(MultiPoly::zero()), zero.expand_integer());
}

#[test]
fn test_factor_univariate_irreducible() {
    LogAlgorithmSubscriber::init_test();
    // 1 + x - x^3
    let f = &(&c(1) + &x()) - &x().pow(3);
    assert_factorization(&f, -1, &[(-&f, 1)]);
}

#[test]
fn test_factor_univariate_power() {
    LogAlgorithmSubscriber::init_test();
    let f = (&x() + &c(1)).pow(3);
    assert_factorization(&f, 1, &[(&x() + &c(1), 3)]);
}

#[test]
fn test_factor_univariate() {
    LogAlgorithmSubscriber::init_test();
    // x^2 (x - 3)^2 (x^3 - 5x + 7)
    let cubic = &(&x().pow(3) - &x().scale(&BigInt::from(5))) + &c(7);
    let f = &(&x().pow(2) * &(&x() - &c(3)).pow(2)) * &cubic;
    assert_factorization(&f, 1, &[(x(), 2), (&x() - &c(3), 2), (cubic, 1)]);

    let f = &f.scale(&BigInt::from(-4));
    let factorization = factor(f).unwrap();
    assert_eq!(BigRational::from_integer(BigInt::from(-4)), factorization.unit);
}

#[test]
fn test_factor_many_modular_factors() {
    LogAlgorithmSubscriber::init_test();
    let f = &(&x().pow(16) + &x().pow(4).scale(&BigInt::from(11))) + &c(121);
    assert_factorization(&f, 1, &[(f.clone(), 1)]);
}

#[test]
fn test_factor_bivariate() {
    LogAlgorithmSubscriber::init_test();
    // (x^2 y + 3)(x y^2 - 2x + 1)(y + 1)^2
    let f1 = &(&x().pow(2) * &y()) + &c(3);
    let f2 = &(&(&x() * &y().pow(2)) - &x().scale(&BigInt::from(2))) + &c(1);
    let f3 = &y() + &c(1);
    let f = &(&f1 * &f2) * &f3.pow(2);
    assert_factorization(&f, 1, &[(f3, 2), (f2, 1), (f1, 1)]);
}

#[test]
fn test_factor_trivariate() {
    LogAlgorithmSubscriber::init_test();
    // -3 x z (x y - z^2 + 1)^2 (x + y + z)
    let f1 = &(&(&x() * &y()) - &z().pow(2)) + &c(1);
    let f2 = &(&x() + &y()) + &z();
    let f = &(&(&x() * &z()).scale(&BigInt::from(-3)) * &f1.pow(2)) * &f2;
    assert_factorization(&f, -3, &[(z(), 1), (x(), 1), (f2, 1), (f1, 2)]);
}

#[test]
fn test_factor_trivariate_within_time() {
    LogAlgorithmSubscriber::init_test();
    let start = std::time::Instant::now();
    // (x y^2 + 4z)(x^2 z + 9y)(2x + 3yz + 1)
    let f1 = &(&x() * &y().pow(2)) + &z().scale(&BigInt::from(4));
    let f2 = &(&x().pow(2) * &z()) + &y().scale(&BigInt::from(9));
    let f3 = &(&x().scale(&BigInt::from(2)) + &(&y() * &z()).scale(&BigInt::from(3))) + &c(1);
    assert_factorization(&(&(&f1 * &f2) * &f3), 1, &[(f3, 1), (f1, 1), (f2, 1)]);

    // (x^2 y z + y + 1)(x z + y^2)(x + z)
    let g1 = &(&(&x().pow(2) * &(&y() * &z())) + &y()) + &c(1);
    let g2 = &(&x() * &z()) + &y().pow(2);
    let g3 = &x() + &z();
    assert_factorization(&(&(&g1 * &g2) * &g3), 1, &[(g3, 1), (g2, 1), (g1, 1)]);
    assert!(start.elapsed() < std::time::Duration::from_secs(30));
}

#[test]
fn test_factor_no_usable_prime() {
    LogAlgorithmSubscriber::init_test();
    // the only odd prime up to 3 divides the leading coefficient
    let f = &(&x().pow(2).scale(&BigInt::from(3)) + &x()) + &c(1);
    let config = FactorConfig { max_prime: 3, ..FactorConfig::default() };
    assert_eq!(Err(FactorError::NoUsablePrime { bound: 3 }), factor_with(&f, &config));
}

#[test]
fn test_factor_difference_of_squares() {
    LogAlgorithmSubscriber::init_test();
    // 4 x^2 - 9 y^4
    let f = &x().pow(2).scale(&BigInt::from(4)) - &y().pow(4).scale(&BigInt::from(9));
    let f1 = &x().scale(&BigInt::from(2)) - &y().pow(2).scale(&BigInt::from(3));
    let f2 = &x().scale(&BigInt::from(2)) + &y().pow(2).scale(&BigInt::from(3));
    assert_factorization(&f, 1, &[(f1, 1), (f2, 1)]);
}

#[test]
fn test_factor_deterministic() {
    LogAlgorithmSubscriber::init_test();
    let f = &(&(&x().pow(2) * &y()) - &(&y() * &z())) * &(&(&x() * &z()) + &c(2));
    let config = FactorConfig { seed: 17, ..FactorConfig::default() };
    let first = factor_with(&f, &config).unwrap();
    let second = factor_with(&f, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(factor(&f).unwrap(), first);
}
