use num_bigint::BigInt;
use num_traits::Zero;
use tracing::{event, instrument, Level};

use crate::algorithms::hensel::hensel_lift_univariate;
use crate::algorithms::poly_squarefree::finite_field::is_squarefree_finite_field;
use crate::algorithms::primes::odd_primes_up_to;
use crate::config::FactorConfig;
use crate::error::FactorError;
use crate::rings::int_poly::IntPoly;
use crate::rings::poly::*;
use crate::rings::zn::Zn;

use super::finite_field::squarefree_poly_factor_finite_field;
use super::partition::*;

///
/// A prime `p` together with the factorization of a polynomial modulo `p`.
///
#[allow(non_snake_case)]
pub struct ModularFactorization {
    pub Fp: ModPolyRing,
    pub factors: Vec<ModPoly>
}

impl ModularFactorization {

    pub fn prime(&self) -> &BigInt {
        self.Fp.base_ring().modulus()
    }
}

///
/// Factors the given square-free integer polynomial modulo several primes that do not divide
/// its leading coefficient and keep it square-free, and returns the factorization with the
/// fewest factors.
///
/// The search stops early if an irreducible reduction is found, as then `f` is irreducible.
///
#[stability::unstable(feature = "enable")]
#[allow(non_snake_case)]
#[instrument(skip_all, level = "trace")]
pub fn choose_modular_factorization(f: &IntPoly, config: &FactorConfig) -> Result<ModularFactorization, FactorError> {
    let lc = f.lc().ok_or(FactorError::InexactDivision("choose_modular_factorization"))?;
    let mut best: Option<ModularFactorization> = None;
    let mut usable_primes = 0;
    for p in odd_primes_up_to(config.max_prime) {
        if usable_primes >= config.prime_trials {
            break;
        }
        let p = BigInt::from(p);
        if (lc % &p).is_zero() {
            continue;
        }
        let Fp = ModPolyRing::new(Zn::new(p.clone()));
        let reduced = Fp.reduce(f);
        if !is_squarefree_finite_field(&Fp, &reduced)? {
            continue;
        }
        usable_primes += 1;
        let factors = squarefree_poly_factor_finite_field(&Fp, &reduced)?;
        event!(Level::DEBUG, prime = %p, factors = factors.len(), "factored modulo prime");
        let irreducible = factors.len() <= 1;
        if best.as_ref().map(|current| factors.len() < current.factors.len()).unwrap_or(true) {
            best = Some(ModularFactorization { Fp: Fp, factors: factors });
        }
        if irreducible {
            break;
        }
    }
    return best.ok_or(FactorError::NoUsablePrime { bound: config.max_prime });
}

///
/// Recombines the modular factors of `f` into the irreducible factors over the integers.
///
/// This is a depth-first search over the splits of the modular factors into two groups. For each
/// split, we try to lift it to a factorization of the current polynomial. If this works, we continue
/// with both factors (unless they correspond to a single modular factor, in which case they must be
/// irreducible). If no split can be lifted, the current polynomial is irreducible.
///
#[stability::unstable(feature = "enable")]
#[allow(non_snake_case)]
#[instrument(skip_all, level = "trace")]
pub fn recombine_factors(f: &IntPoly, modular: ModularFactorization) -> Result<Vec<IntPoly>, FactorError> {
    let Fp = &modular.Fp;
    let mut result = Vec::new();
    let mut stack = vec![SearchFrame::new(f.primitive_part(), modular.factors)];

    while let Some(frame) = stack.pop() {
        let mut partition = match Partition::new(frame.factors.len()) {
            Some(partition) => partition,
            None => {
                result.push(frame.poly);
                continue;
            }
        };
        loop {
            let left = partition.left().to_vec();
            let right = partition.right();
            let u1 = Fp.prod(frame.select(&left));
            let w1 = Fp.prod(frame.select(&right));
            if let Some((u, w)) = hensel_lift_univariate(Fp, &frame.poly, &u1, &w1)? {
                event!(Level::TRACE, left = left.len(), right = right.len(), "found factor");
                stack.push(SearchFrame::new(u.primitive_part(), frame.select(&left)));
                stack.push(SearchFrame::new(w.primitive_part(), frame.select(&right)));
                break;
            }
            if !partition.advance() {
                result.push(frame.poly);
                break;
            }
        }
    }
    return Ok(result);
}

///
/// Factors a square-free, primitive integer polynomial of positive degree into its irreducible
/// factors over the integers.
///
/// The factors are primitive and have positive leading coefficient; their product is `f` up to sign.
///
#[stability::unstable(feature = "enable")]
#[instrument(skip_all, level = "trace")]
pub fn poly_factor_squarefree_integer(f: &IntPoly, config: &FactorConfig) -> Result<Vec<IntPoly>, FactorError> {
    let degree = f.degree().ok_or(FactorError::InexactDivision("poly_factor_squarefree_integer"))?;
    assert!(degree > 0);
    if degree == 1 {
        return Ok(vec![f.primitive_part()]);
    }
    let modular = choose_modular_factorization(f, config)?;
    event!(Level::DEBUG, prime = %modular.prime(), factors = modular.factors.len(), "chose prime");
    if modular.factors.len() <= 1 {
        return Ok(vec![f.primitive_part()]);
    }
    let mut result = recombine_factors(f, modular)?;
    result.sort_by(|lhs, rhs| lhs.degree().cmp(&rhs.degree()).then_with(|| lhs.coefficients().cmp(rhs.coefficients())));
    return Ok(result);
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[cfg(test)]
fn product(factors: &[IntPoly]) -> IntPoly {
    factors.iter().fold(IntPoly::one(), |current, f| &current * f)
}

#[test]
fn test_choose_modular_factorization() {
    LogAlgorithmSubscriber::init_test();
    // x^4 + 1 is reducible modulo every prime, and has exactly two quadratic factors modulo 3
    let f = IntPoly::from_i64(&[1, 0, 0, 0, 1]);
    let modular = choose_modular_factorization(&f, &FactorConfig::default()).unwrap();
    assert_eq!(2, modular.factors.len());

    // 7x^2 - 5x + 4 = (x - 1)^2 mod 3, so the first usable prime is 5
    let g = IntPoly::from_i64(&[4, -5, 7]);
    let config = FactorConfig { prime_trials: 1, ..FactorConfig::default() };
    let modular = choose_modular_factorization(&g, &config).unwrap();
    assert_eq!(&BigInt::from(5), modular.prime());
}

#[test]
fn test_factor_irreducible() {
    LogAlgorithmSubscriber::init_test();
    let config = FactorConfig::default();
    let f = IntPoly::from_i64(&[1, 1, 0, -1]);
    assert_eq!(vec![f.primitive_part()], poly_factor_squarefree_integer(&f, &config).unwrap());
    let g = IntPoly::from_i64(&[1, 0, 0, 0, 1]);
    assert_eq!(vec![g.clone()], poly_factor_squarefree_integer(&g, &config).unwrap());
}

#[test]
fn test_factor_squarefree() {
    LogAlgorithmSubscriber::init_test();
    let config = FactorConfig::default();
    let factors = [IntPoly::from_i64(&[7, 2]), IntPoly::from_i64(&[-5, 0, 3]), IntPoly::from_i64(&[1, 1, 1]), IntPoly::from_i64(&[-1, 0, 0, 1, 1])];
    let f = product(&factors);
    let actual = poly_factor_squarefree_integer(&f, &config).unwrap();
    assert_eq!(factors.to_vec(), actual);
    assert_eq!(f, product(&actual));
}

#[test]
fn test_factor_many_modular_factors() {
    LogAlgorithmSubscriber::init_test();
    // irreducible over the integers, but reducible modulo all small primes
    let f = IntPoly::from_i64(&[121, 0, 0, 0, 11, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    let config = FactorConfig::default();
    assert_eq!(vec![f.clone()], poly_factor_squarefree_integer(&f, &config).unwrap());
}
