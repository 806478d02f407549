use std::cmp::Ordering;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use oorandom::Rand64;
use tracing::{event, instrument, Level};

use crate::algorithms::diophantine::*;
use crate::algorithms::hensel::{hensel_lift_multivariate, multivariate_coefficient_bound};
use crate::algorithms::poly_gcd::{poly_gcd, primitive_part_in};
use crate::algorithms::poly_squarefree::finite_field::is_squarefree_finite_field;
use crate::algorithms::primes::odd_primes_up_to;
use crate::config::FactorConfig;
use crate::error::FactorError;
use crate::integer::int_pow;
use crate::rings::int_poly::IntPoly;
use crate::rings::multivariate::MultiPoly;
use crate::rings::poly::ModPolyRing;
use crate::rings::zn::Zn;

use super::integer::poly_factor_squarefree_integer;

///
/// An evaluation point for all variables except the main variable, which passed all the tests
/// of [`test_evaluation_points()`].
///
struct EvaluationCandidate {
    points: Vec<EvaluationPoint>,
    /// the content of `f(a)`, with sign chosen such that `f(a) / content` has positive leading coefficient
    content: BigInt,
    /// the irreducible factors of `f(a) / content`
    factors: Vec<IntPoly>,
    /// the values of the irreducible factors of `lc(f)` at `a`
    lc_values: Vec<BigInt>
}

fn random_points(variables: &[usize], bound: u64, rng: &mut Rand64) -> Vec<EvaluationPoint> {
    variables.iter().map(|var| {
        let value = BigInt::from(rng.rand_range(0..(2 * bound))) - BigInt::from(bound) + BigInt::one();
        EvaluationPoint::new(*var, value)
    }).collect()
}

///
/// Wang's test that each of the `lc_values` has a prime divisor that divides neither `constant` nor
/// any of the previous `lc_values`. This makes sure that the factors of the leading coefficient can
/// be uniquely assigned to the univariate factors.
///
fn has_distinct_prime_divisors(lc_values: &[BigInt], constant: &BigInt) -> bool {
    let mut previous = vec![constant.abs()];
    for value in lc_values {
        let mut q = value.abs();
        for r in previous.iter().rev() {
            let mut r = r.clone();
            while !r.is_one() {
                r = r.gcd(&q);
                q = &q / &r;
            }
            if q.is_one() {
                return false;
            }
        }
        previous.push(q);
    }
    return true;
}

///
/// Checks whether the given evaluation point can be used for the factorization of `f`, i.e.
/// the leading coefficient does not vanish, the image is square-free and Wang's distinctness
/// condition holds. If so, factors the image.
///
#[instrument(skip_all, level = "trace")]
fn test_evaluation_points(f: &MultiPoly, main_var: usize, lc_factors: &[(MultiPoly, usize)], lc_constant: &BigInt, points: Vec<EvaluationPoint>, config: &FactorConfig) -> Result<Option<EvaluationCandidate>, FactorError> {
    let lc = f.leading_coefficient_in(main_var);
    if evaluate_at(&lc, &points).is_zero() {
        return Ok(None);
    }
    let image = evaluate_at(f, &points);
    if poly_gcd(&image, &image.derivative(main_var)).degree_in(main_var) > 0 {
        return Ok(None);
    }
    let image = image.to_univariate(main_var).ok_or(FactorError::InexactDivision("test_evaluation_points"))?;
    let mut content = image.content();
    let mut primitive_part = image.div_int_exact(&content);
    if primitive_part.lc().map(|c| c.is_negative()).unwrap_or(false) {
        content = -content;
        primitive_part = -&primitive_part;
    }

    let lc_values = lc_factors.iter()
        .map(|(t, _)| evaluate_at(t, &points).as_constant().ok_or(FactorError::InexactDivision("test_evaluation_points")))
        .collect::<Result<Vec<_>, _>>()?;
    if !has_distinct_prime_divisors(&lc_values, &(&content * lc_constant)) {
        return Ok(None);
    }
    let factors = poly_factor_squarefree_integer(&primitive_part, config)?;
    return Ok(Some(EvaluationCandidate { points, content, factors, lc_values }));
}

///
/// Wang's leading coefficient distribution: Assigns to each univariate factor `u_i` of `f(a)` the
/// factors of `lc(f)` whose values at `a` divide `lc(u_i)`, and then fixes the integer parts. Returns
/// the (possibly scaled) target polynomial, the scaled univariate factors and their leading coefficients,
/// or `None` if the distribution did not work out.
///
fn distribute_leading_coefficients(f: &MultiPoly, lc_factors: &[(MultiPoly, usize)], candidate: &EvaluationCandidate) -> Option<(MultiPoly, Vec<IntPoly>, Vec<MultiPoly>)> {
    let mut used = vec![false; lc_factors.len()];
    let mut leading_coefficients = Vec::with_capacity(candidate.factors.len());
    for u in &candidate.factors {
        let mut c = MultiPoly::one();
        let mut d = u.lc()? * &candidate.content;
        for i in (0..lc_factors.len()).rev() {
            let e = &candidate.lc_values[i];
            let mut k = 0;
            while (&d % e).is_zero() {
                d = &d / e;
                k += 1;
            }
            if k > 0 {
                c = &c * &lc_factors[i].0.pow(k);
                used[i] = true;
            }
        }
        leading_coefficients.push(c);
    }
    if !used.iter().all(|x| *x) {
        return None;
    }

    let mut content = candidate.content.clone();
    let mut factors = Vec::with_capacity(candidate.factors.len());
    for (c, u) in leading_coefficients.iter_mut().zip(candidate.factors.iter()) {
        let d = evaluate_at(c, &candidate.points).as_constant()?;
        let lc = u.lc()?;
        if content.is_one() {
            if !(lc % &d).is_zero() {
                return None;
            }
            *c = c.scale(&(lc / &d));
            factors.push(u.clone());
        } else {
            let g = lc.gcd(&d);
            let d = &d / &g;
            if !(&content % &d).is_zero() {
                return None;
            }
            *c = c.scale(&(lc / &g));
            factors.push(u.scale(&d));
            content = &content / &d;
        }
    }
    if content.is_one() {
        return Some((f.clone(), factors, leading_coefficients));
    }
    let target = f.scale(&int_pow(&content, factors.len() - 1));
    let factors = factors.iter().map(|u| u.scale(&content)).collect();
    let leading_coefficients = leading_coefficients.iter().map(|c| c.scale(&content)).collect();
    return Some((target, factors, leading_coefficients));
}

///
/// Finds a prime `p` that does not divide the leading coefficients of the given factors and
/// such that they remain pairwise coprime and square-free modulo `p`.
///
#[allow(non_snake_case)]
fn choose_lifting_prime(factors: &[IntPoly], config: &FactorConfig) -> Result<u64, FactorError> {
    let product = factors.iter().fold(IntPoly::one(), |current, f| &current * f);
    for p in odd_primes_up_to(config.max_prime) {
        let p_int = BigInt::from(p);
        if factors.iter().any(|f| f.lc().map(|c| (c % &p_int).is_zero()).unwrap_or(true)) {
            continue;
        }
        let Fp = ModPolyRing::new(Zn::new(p_int));
        if is_squarefree_finite_field(&Fp, &Fp.reduce(&product))? {
            return Ok(p);
        }
    }
    return Err(FactorError::NoUsablePrime { bound: config.max_prime });
}

///
/// Factors a square-free polynomial `f` in at least two variables, which is primitive w.r.t. the
/// main variable `X_main_var` and has positive degree in it, into irreducible factors over the integers.
///
/// The factors of `lc(f)` (w.r.t. the main variable) must be given as `lc_constant * prod_i lc_factors[i]`,
/// where the `lc_factors` are pairwise distinct irreducible polynomials. The returned factors are
/// primitive with positive leading coefficient, and their product is `f` up to sign.
///
/// This is the standard approach using Wang's leading coefficient distribution: We choose random
/// evaluation points for all but the main variable, factor the resulting univariate polynomial and
/// try to lift the factorization back via multivariate Hensel lifting. Since a "bad" evaluation point
/// might lead to more univariate factors than necessary, we use the evaluation point with the fewest
/// factors found within `evaluation_trials` successful trials. If the lifting fails, new evaluation
/// points are chosen.
///
#[stability::unstable(feature = "enable")]
#[instrument(skip_all, level = "trace")]
pub fn poly_factor_squarefree_multivariate(f: &MultiPoly, main_var: usize, lc_constant: &BigInt, lc_factors: &[(MultiPoly, usize)], config: &FactorConfig, rng: &mut Rand64) -> Result<Vec<MultiPoly>, FactorError> {
    assert!(f.degree_in(main_var) > 0);
    let variables = f.variables().into_iter().filter(|var| *var != main_var).collect::<Vec<_>>();
    let mut bound = config.initial_evaluation_bound.max(1);
    let mut attempts = 0;

    let mut next_points = |bound: u64, rng: &mut Rand64| {
        attempts += 1;
        if let Some(max) = config.max_evaluation_attempts {
            if attempts > max {
                return Err(FactorError::EvaluationPointsExhausted(max));
            }
        }
        return Ok(random_points(&variables, bound, rng));
    };

    loop {
        let mut best: Option<EvaluationCandidate> = None;
        let mut observed = 0;
        while observed < config.evaluation_trials.max(1) {
            let points = next_points(bound, &mut *rng)?;
            let candidate = match test_evaluation_points(f, main_var, lc_factors, lc_constant, points, config)? {
                Some(candidate) => candidate,
                None => {
                    bound += 1;
                    continue;
                }
            };
            if candidate.factors.len() == 1 {
                return Ok(vec![f.clone().with_positive_lc()]);
            }
            match best.as_ref().map(|current| candidate.factors.len().cmp(&current.factors.len())) {
                Some(Ordering::Greater) => {},
                Some(Ordering::Equal) => observed += 1,
                _ => {
                    best = Some(candidate);
                    observed = 1;
                }
            }
        }
        let candidate = match best {
            Some(candidate) => candidate,
            None => continue
        };
        let values = candidate.points.iter().map(|point| point.value.to_string()).collect::<Vec<_>>();
        event!(Level::DEBUG, factors = candidate.factors.len(), points = ?values, "chose evaluation points");

        let (target, factors, leading_coefficients) = match distribute_leading_coefficients(f, lc_factors, &candidate) {
            Some(result) => result,
            None => {
                event!(Level::DEBUG, "leading coefficient distribution failed");
                bound += 1;
                continue;
            }
        };
        let p = choose_lifting_prime(&factors, config)?;
        let coefficient_bound = multivariate_coefficient_bound(&target) * 2;
        let mut l = 1;
        let mut modulus = BigInt::from(p);
        while modulus <= coefficient_bound {
            modulus *= p;
            l += 1;
        }
        event!(Level::DEBUG, prime = p, exponent = l, "lifting");

        if let Some(lifted) = hensel_lift_multivariate(&target, main_var, &candidate.points, p, l, &factors, &leading_coefficients)? {
            return Ok(lifted.iter().map(|g| primitive_part_in(g, main_var)).collect());
        }
        event!(Level::DEBUG, "lifting failed, retrying with new evaluation points");
        bound += 1;
    }
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

#[test]
fn test_has_distinct_prime_divisors() {
    let values = |values: &[i64]| values.iter().map(|x| BigInt::from(*x)).collect::<Vec<_>>();
    assert!(has_distinct_prime_divisors(&values(&[4, 14]), &BigInt::from(1)));
    assert!(!has_distinct_prime_divisors(&values(&[3, 7]), &BigInt::from(3)));
    assert!(!has_distinct_prime_divisors(&values(&[2, 2]), &BigInt::from(1)));
    assert!(!has_distinct_prime_divisors(&values(&[-1]), &BigInt::from(1)));
    assert!(has_distinct_prime_divisors(&values(&[-5, 6]), &BigInt::from(2)));
}

#[test]
fn test_distribute_leading_coefficients() {
    LogAlgorithmSubscriber::init_test();
    // (y x^2 + 3)((y^2 - 2) x + 1) at y = 4
    let f = &(&(&y() * &x().pow(2)) + &c(3)) * &(&(&(&y().pow(2) - &c(2)) * &x()) + &c(1));
    let lc_factors = [(y(), 1), (&y().pow(2) - &c(2), 1)];
    let points = vec![EvaluationPoint::new(1, BigInt::from(4))];
    let candidate = test_evaluation_points(&f, 0, &lc_factors, &BigInt::from(1), points, &FactorConfig::default()).unwrap().unwrap();
    assert_eq!(BigInt::from(1), candidate.content);
    assert_eq!(vec![IntPoly::from_i64(&[1, 14]), IntPoly::from_i64(&[3, 0, 4])], candidate.factors);

    let (target, factors, leading_coefficients) = distribute_leading_coefficients(&f, &lc_factors, &candidate).unwrap();
    assert_eq!(f, target);
    assert_eq!(candidate.factors, factors);
    assert_eq!(vec![&y().pow(2) - &c(2), y()], leading_coefficients);
}

#[test]
fn test_evaluation_points_rejected() {
    LogAlgorithmSubscriber::init_test();
    let f = &(&(&y() * &x().pow(2)) + &c(3)) * &(&(&(&y().pow(2) - &c(2)) * &x()) + &c(1));
    let lc_factors = [(y(), 1), (&y().pow(2) - &c(2), 1)];
    // the leading coefficient vanishes
    let points = vec![EvaluationPoint::new(1, BigInt::from(0))];
    assert!(test_evaluation_points(&f, 0, &lc_factors, &BigInt::from(1), points, &FactorConfig::default()).unwrap().is_none());
    // 3 divides both the content of f(3) and lc_factors[0](3)
    let points = vec![EvaluationPoint::new(1, BigInt::from(3))];
    assert!(test_evaluation_points(&f, 0, &lc_factors, &BigInt::from(1), points, &FactorConfig::default()).unwrap().is_none());
}

#[test]
fn test_poly_factor_squarefree_multivariate() {
    LogAlgorithmSubscriber::init_test();
    let mut rng = Rand64::new(1);
    // (y x^2 + 3)((y^2 - 2) x + 1)
    let f1 = &(&y() * &x().pow(2)) + &c(3);
    let f2 = &(&(&y().pow(2) - &c(2)) * &x()) + &c(1);
    let f = &f1 * &f2;
    let lc_factors = [(y(), 1), (&y().pow(2) - &c(2), 1)];
    let mut factors = poly_factor_squarefree_multivariate(&f, 0, &BigInt::from(1), &lc_factors, &FactorConfig::default(), &mut rng).unwrap();
    factors.sort();
    let mut expected = vec![f1, f2];
    expected.sort();
    assert_eq!(expected, factors);
}

#[test]
fn test_poly_factor_squarefree_multivariate_constant_lc() {
    LogAlgorithmSubscriber::init_test();
    let mut rng = Rand64::new(1);
    // (x^2 + y z + 1)(x - y + 2 z) (x + y^2)
    let f1 = &(&x().pow(2) + &(&y() * &z())) + &c(1);
    let f2 = &(&x() - &y()) + &z().scale(&BigInt::from(2));
    let f3 = &x() + &y().pow(2);
    let f = &(&f1 * &f2) * &f3;
    let mut factors = poly_factor_squarefree_multivariate(&f, 0, &BigInt::from(1), &[], &FactorConfig::default(), &mut rng).unwrap();
    factors.sort();
    let mut expected = vec![f1, f2, f3];
    expected.sort();
    assert_eq!(expected, factors);
}

#[test]
fn test_poly_factor_squarefree_multivariate_irreducible() {
    LogAlgorithmSubscriber::init_test();
    let mut rng = Rand64::new(1);
    let f = &(&x().pow(2) + &y().pow(2)) + &c(1);
    let factors = poly_factor_squarefree_multivariate(&f, 0, &BigInt::from(1), &[], &FactorConfig::default(), &mut rng).unwrap();
    assert_eq!(vec![f], factors);
}

#[test]
fn test_evaluation_attempts_exhausted() {
    LogAlgorithmSubscriber::init_test();
    let mut rng = Rand64::new(1);
    // the leading coefficient y^2 + y vanishes often for small values of y
    let f = &(&(&y().pow(2) + &y()) * &x().pow(2)) + &c(1);
    let config = FactorConfig { max_evaluation_attempts: Some(0), ..FactorConfig::default() };
    let lc_factors = [(y(), 1), (&y() + &c(1), 1)];
    assert_eq!(Err(FactorError::EvaluationPointsExhausted(0)), poly_factor_squarefree_multivariate(&f, 0, &BigInt::from(1), &lc_factors, &config, &mut rng));
}
