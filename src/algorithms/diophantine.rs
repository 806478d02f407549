use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::algorithms::eea::{div_rem_unit_lc, multiterm_eea_lift};
use crate::error::FactorError;
use crate::integer::int_pow;
use crate::rings::int_poly::IntPoly;
use crate::rings::multivariate::MultiPoly;
use crate::rings::poly::*;
use crate::rings::zn::Zn;

///
/// The substitution `X_variable = value`, used to reduce a multivariate polynomial to a
/// univariate one.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationPoint {
    pub variable: usize,
    pub value: BigInt
}

impl EvaluationPoint {

    pub fn new(variable: usize, value: BigInt) -> Self {
        EvaluationPoint { variable: variable, value: value }
    }
}

///
/// Evaluates `f` at all given points.
///
pub fn evaluate_at(f: &MultiPoly, points: &[EvaluationPoint]) -> MultiPoly {
    points.iter().fold(f.clone(), |current, point| current.evaluate(point.variable, &point.value))
}

///
/// Solves univariate Diophantine equations modulo `p^k` for fixed `a_1, ..., a_r`, i.e. finds
/// for a given `c` polynomials `sigma_1, ..., sigma_r` with `deg(sigma_j) < deg(a_j)` and
///
/// `sum_j sigma_j prod_(i != j) a_i = c mod p^k`
///
/// This requires that the `a_j` are pairwise coprime modulo `p` and their leading coefficients
/// are not divisible by `p`. The Bezout identity is computed only once, when creating the solver.
///
#[allow(non_snake_case)]
pub struct UnivariateDiophantine {
    Zpk: ModPolyRing,
    factors: Vec<ModPoly>,
    bezout_coefficients: Vec<ModPoly>
}

impl UnivariateDiophantine {

    #[stability::unstable(feature = "enable")]
    #[allow(non_snake_case)]
    pub fn new(p: u64, k: usize, factors: &[IntPoly]) -> Result<Self, FactorError> {
        let Fp = ModPolyRing::new(Zn::new(BigInt::from(p)));
        let Zpk = ModPolyRing::new(Zn::new(int_pow(&BigInt::from(p), k)));
        let reduced_factors = factors.iter().map(|f| Zpk.reduce(f)).collect::<Vec<_>>();
        let bezout_coefficients = multiterm_eea_lift(&Fp, &Zpk, &reduced_factors)?;
        return Ok(UnivariateDiophantine {
            Zpk: Zpk,
            factors: reduced_factors,
            bezout_coefficients: bezout_coefficients
        });
    }

    pub fn modulus(&self) -> &BigInt {
        self.Zpk.base_ring().modulus()
    }

    pub fn factor_count(&self) -> usize {
        self.factors.len()
    }

    ///
    /// Returns `sigma_1, ..., sigma_r` as polynomials with coefficients in `(-p^k/2, p^k/2]`.
    ///
    #[stability::unstable(feature = "enable")]
    pub fn solve(&self, rhs: &IntPoly) -> Result<Vec<IntPoly>, FactorError> {
        let rhs = self.Zpk.reduce(rhs);
        let mut result = Vec::with_capacity(self.factors.len());
        for (s, a) in self.bezout_coefficients.iter().zip(self.factors.iter()) {
            let (_, sigma) = div_rem_unit_lc(&self.Zpk, &self.Zpk.mul_ref(s, &rhs), a)?;
            result.push(self.Zpk.smallest_lift(&sigma));
        }
        return Ok(result);
    }
}

///
/// Solves the multivariate Diophantine equation
///
/// `sum_j sigma_j prod_(i != j) a_i = c mod (p^k, I^(d + 1))`
///
/// where `I` is the ideal `(X_1 - alpha_1, ..., X_m - alpha_m)` generated by the given evaluation points,
/// and all polynomials are in `X_main_var` and the variables of the evaluation points. The `sigma_j` have
/// degree less than `deg(a_j)` in the main variable.
///
/// The equation is solved for the polynomials evaluated at the last point first, and then the solution is
/// refined one Taylor coefficient w.r.t. the last variable at a time. At the bottom of the recursion, all
/// variables except the main variable are evaluated, and `solver` must be the univariate solver for these
/// evaluated factors.
///
#[stability::unstable(feature = "enable")]
#[instrument(skip_all, level = "trace")]
pub fn multivariate_diophantine(solver: &UnivariateDiophantine, factors: &[MultiPoly], main_var: usize, rhs: &MultiPoly, points: &[EvaluationPoint], degree_bound: usize) -> Result<Vec<MultiPoly>, FactorError> {
    assert_eq!(solver.factor_count(), factors.len());
    let modulus = solver.modulus();

    let (last_point, remaining_points) = match points.split_last() {
        Some(split) => split,
        None => {
            let rhs = rhs.to_univariate(main_var).ok_or(FactorError::InexactDivision("multivariate_diophantine"))?;
            return Ok(solver.solve(&rhs)?.iter().map(|sigma| MultiPoly::from_univariate(sigma, main_var)).collect());
        }
    };
    let var = last_point.variable;
    let alpha = &last_point.value;

    let product = factors.iter().fold(MultiPoly::one(), |current, f| &current * f);
    let mut cofactors = Vec::with_capacity(factors.len());
    for f in factors {
        cofactors.push(product.checked_div(f).ok_or(FactorError::InexactDivision("multivariate_diophantine"))?);
    }
    let evaluated_factors = factors.iter().map(|f| f.evaluate(var, alpha)).collect::<Vec<_>>();
    let evaluated_rhs = rhs.evaluate(var, alpha);

    let mut sigma = multivariate_diophantine(solver, &evaluated_factors, main_var, &evaluated_rhs, remaining_points, degree_bound)?;
    let compute_error = |sigma: &[MultiPoly]| {
        let approximation = sigma.iter().zip(cofactors.iter()).fold(MultiPoly::zero(), |current, (s, b)| &current + &(s * b));
        (rhs - &approximation).reduce_symmetric(modulus)
    };
    let mut error = compute_error(&sigma);

    let linear = &MultiPoly::variable(var) - &MultiPoly::constant(alpha.clone());
    let mut monomial = MultiPoly::one();
    let mut m = 1;
    while !error.is_zero() && error.degree_in(var) > 0 && m <= degree_bound {
        monomial = &monomial * &linear;
        let taylor_coefficient = error.taylor_coefficient(var, alpha, m).reduce_symmetric(modulus);
        if !taylor_coefficient.is_zero() {
            let delta = multivariate_diophantine(solver, &evaluated_factors, main_var, &taylor_coefficient, remaining_points, degree_bound)?;
            for (s, d) in sigma.iter_mut().zip(delta.into_iter()) {
                *s = (&*s + &(&d * &monomial)).reduce_symmetric(modulus);
            }
            error = compute_error(&sigma);
        }
        m += 1;
    }
    return Ok(sigma);
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[test]
fn test_univariate_diophantine() {
    LogAlgorithmSubscriber::init_test();
    let factors = [IntPoly::from_i64(&[1, 1]), IntPoly::from_i64(&[-2, 0, 1]), IntPoly::from_i64(&[3, 1])];
    let solver = UnivariateDiophantine::new(5, 3, &factors).unwrap();
    let rhs = IntPoly::from_i64(&[7, -3, 2, 1]);
    let sigma = solver.solve(&rhs).unwrap();
    let modulus = BigInt::from(125);
    let mut sum = IntPoly::zero();
    for j in 0..3 {
        assert!(sigma[j].degree().map(|d| d < factors[j].degree().unwrap()).unwrap_or(true));
        let cofactor = (0..3).filter(|i| *i != j).fold(IntPoly::one(), |current, i| &current * &factors[i]);
        sum = &sum + &(&sigma[j] * &cofactor);
    }
    let difference = &sum - &rhs;
    assert!(difference.coefficients().iter().all(|c| c % &modulus == BigInt::from(0)));
}

#[test]
fn test_multivariate_diophantine() {
    LogAlgorithmSubscriber::init_test();
    // factors x + y and x - 2y + 1, evaluated at y = 1
    let x = MultiPoly::variable(0);
    let y = MultiPoly::variable(1);
    let f1 = &x + &y;
    let f2 = &(&x - &y.scale(&BigInt::from(2))) + &MultiPoly::one();
    let points = [EvaluationPoint::new(1, BigInt::from(1))];
    let univariate = [f1.evaluate(1, &BigInt::from(1)), f2.evaluate(1, &BigInt::from(1))]
        .iter().map(|f| f.to_univariate(0).unwrap()).collect::<Vec<_>>();
    let solver = UnivariateDiophantine::new(7, 4, &univariate).unwrap();
    // rhs = 3 * f2 + (y - 1) * f1 has solution sigma_1 = 3 (times f2), sigma_2 = y - 1 (times f1)
    let rhs = &f2.scale(&BigInt::from(3)) + &(&(&y - &MultiPoly::one()) * &f1);
    let sigma = multivariate_diophantine(&solver, &[f1.clone(), f2.clone()], 0, &rhs, &points, 2).unwrap();
    assert_eq!(rhs, &(&sigma[0] * &f2) + &(&sigma[1] * &f1));
}
