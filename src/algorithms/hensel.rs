use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use tracing::{event, instrument, Level};

use crate::algorithms::diophantine::*;
use crate::algorithms::eea::{div_rem_unit_lc, poly_eea};
use crate::error::FactorError;
use crate::integer::{int_pow, symmetric_rem};
use crate::rings::int_poly::IntPoly;
use crate::rings::multivariate::MultiPoly;
use crate::rings::poly::*;

///
/// Replaces the leading coefficient of `f` by `c`, reducing the other coefficients into the
/// symmetric range modulo `modulus`.
///
fn replace_lc_symmetric(f: &IntPoly, c: &BigInt, modulus: &BigInt) -> IntPoly {
    IntPoly::from_coefficients(f.coefficients().iter().map(|x| symmetric_rem(x, modulus)).collect()).with_lc(c.clone())
}

///
/// Given a primitive polynomial `a` over the integers, a prime `p` not dividing its leading
/// coefficient and coprime polynomials `u1, w1` over `Fp = Z/pZ` with `a = u1 * w1 mod p`,
/// tries to find integer polynomials `u, w` with `a = u * w` that reduce to `u1, w1` modulo
/// `p` (up to a scalar factor).
///
/// The leading coefficient `lc(a)` is put on both factors during lifting (after scaling `a`
/// by it), so all coefficients of the sought factors are bounded in terms of the Mignotte
/// bound of `a`. If the lift did not result in an exact factorization once `p^k` exceeds
/// twice this bound, no such factorization exists and `None` is returned. Otherwise, the
/// returned `u` is primitive and `u * w = a`.
///
#[stability::unstable(feature = "enable")]
#[allow(non_snake_case)]
#[instrument(skip_all, level = "trace")]
pub fn hensel_lift_univariate(Fp: &ModPolyRing, a: &IntPoly, u1: &ModPoly, w1: &ModPoly) -> Result<Option<(IntPoly, IntPoly)>, FactorError> {
    let p = Fp.base_ring().modulus().clone();
    let degree = a.degree().ok_or(FactorError::InexactDivision("hensel_lift_univariate"))?;
    let alpha = a.lc().ok_or(FactorError::InexactDivision("hensel_lift_univariate"))?.clone();
    let alpha_p = Fp.base_ring().from_int(&alpha);
    let bound = alpha.abs() * int_pow(&BigInt::from(2), degree) * a.norm2_ceil();
    let target_modulus = &bound * 2;

    let a_scaled = a.scale(&alpha);
    let normalize_lc = |f: &ModPoly| Fp.lc(f).and_then(|lc| Fp.base_ring().checked_div(&alpha_p, lc)).map(|factor| Fp.scale(f, &factor));
    let u1 = normalize_lc(u1).ok_or_else(|| FactorError::NonInvertibleLeadingCoefficient { modulus: p.clone() })?;
    let w1 = normalize_lc(w1).ok_or_else(|| FactorError::NonInvertibleLeadingCoefficient { modulus: p.clone() })?;

    let (s, t, d) = poly_eea(Fp, u1.clone(), w1.clone())?;
    if !Fp.is_one(&d) {
        return Err(FactorError::NotCoprime { prime: p });
    }

    let mut u = replace_lc_symmetric(&Fp.smallest_lift(&u1), &alpha, &p);
    let mut w = replace_lc_symmetric(&Fp.smallest_lift(&w1), &alpha, &p);
    let mut error = &a_scaled - &(&u * &w);
    let mut modulus = p.clone();

    while !error.is_zero() && modulus < target_modulus {
        let c = error.coefficients().iter().map(|x| {
            if (x % &modulus).is_zero() { Some(x / &modulus) } else { None }
        }).collect::<Option<Vec<_>>>().ok_or(FactorError::InexactDivision("hensel_lift_univariate"))?;
        let c = Fp.reduce(&IntPoly::from_coefficients(c));

        let (quo, sigma) = div_rem_unit_lc(Fp, &Fp.mul_ref(&s, &c), &w1)?;
        let tau = Fp.add(Fp.mul_ref(&t, &c), Fp.mul_ref(&quo, &u1));

        u = &u + &Fp.smallest_lift(&tau).scale(&modulus);
        w = &w + &Fp.smallest_lift(&sigma).scale(&modulus);
        error = &a_scaled - &(&u * &w);
        modulus *= &p;
    }

    if !error.is_zero() {
        event!(Level::TRACE, degree_u = Fp.degree(&u1), "lift failed");
        return Ok(None);
    }
    let delta = u.content();
    let u = u.div_int_exact(&delta);
    let w_divisor = &alpha / &delta;
    let w = w.coefficients().iter().map(|x| {
        if (x % &w_divisor).is_zero() { Some(x / &w_divisor) } else { None }
    }).collect::<Option<Vec<_>>>().ok_or(FactorError::InexactDivision("hensel_lift_univariate"))?;
    return Ok(Some((u, IntPoly::from_coefficients(w))));
}

///
/// Returns an upper bound for the absolute value of the coefficients of any factor of
/// `f`, namely `2^(deg_1(f) + ... + deg_n(f)) |f|_1`.
///
pub fn multivariate_coefficient_bound(f: &MultiPoly) -> BigInt {
    let degree_sum: usize = f.variables().into_iter().map(|var| f.degree_in(var)).sum();
    return int_pow(&BigInt::from(2), degree_sum) * f.one_norm();
}

///
/// Given a polynomial `a` in `X_main_var` and the variables of `points`, and a factorization
/// `a(X_main_var, alpha) = u_1 ... u_r` over the integers, tries to find a factorization
/// `a = U_1 ... U_r` with `U_i(X_main_var, alpha) = u_i` and the leading coefficient of `U_i`
/// (w.r.t. `X_main_var`) equal to `leading_coefficients[i]`.
///
/// The computation is done modulo `p^l`, thus `p^l` must exceed twice the largest coefficient of
/// any factor of `a`, and `p` must be such that the `u_i` are pairwise coprime modulo `p`, with
/// leading coefficients not divisible by `p`. Variables are reintroduced one at a time, and for
/// each of them, the factors are refined Taylor coefficient by Taylor coefficient. Returns `None`
/// if the result is not an exact factorization of `a` over the integers.
///
#[stability::unstable(feature = "enable")]
#[instrument(skip_all, level = "trace")]
pub fn hensel_lift_multivariate(a: &MultiPoly, main_var: usize, points: &[EvaluationPoint], p: u64, l: usize, factors: &[IntPoly], leading_coefficients: &[MultiPoly]) -> Result<Option<Vec<MultiPoly>>, FactorError> {
    assert_eq!(factors.len(), leading_coefficients.len());
    let modulus = int_pow(&BigInt::from(p), l);
    let solver = UnivariateDiophantine::new(p, l, factors)?;

    // evaluated_targets[j] is a with only the first j points reintroduced
    let mut evaluated_targets = Vec::with_capacity(points.len() + 1);
    evaluated_targets.push(a.reduce_symmetric(&modulus));
    for point in points.iter().rev() {
        let next = evaluated_targets.last().unwrap().evaluate(point.variable, &point.value).reduce_symmetric(&modulus);
        evaluated_targets.push(next);
    }
    evaluated_targets.reverse();
    let degree_bound = points.iter().map(|point| a.degree_in(point.variable)).max().unwrap_or(0);

    let mut current = factors.iter().map(|f| MultiPoly::from_univariate(f, main_var)).collect::<Vec<_>>();
    for j in 1..=points.len() {
        let previous = current.clone();
        for (f, lc) in current.iter_mut().zip(leading_coefficients.iter()) {
            let lc = evaluate_at(lc, &points[j..]).reduce_symmetric(&modulus);
            let degree = f.degree_in(main_var);
            let mut coefficients = f.coefficients_in(main_var);
            coefficients[degree] = lc;
            *f = MultiPoly::from_coefficients_in(main_var, coefficients);
        }
        let target = &evaluated_targets[j];
        let product = |factors: &[MultiPoly]| factors.iter().fold(MultiPoly::one(), |current, f| &current * f);
        let mut error = (target - &product(&current)).reduce_symmetric(&modulus);

        let var = points[j - 1].variable;
        let alpha = &points[j - 1].value;
        let linear = &MultiPoly::variable(var) - &MultiPoly::constant(alpha.clone());
        let mut monomial = MultiPoly::one();
        for k in 1..=target.degree_in(var) {
            if error.is_zero() {
                break;
            }
            monomial = &monomial * &linear;
            let taylor_coefficient = error.taylor_coefficient(var, alpha, k).reduce_symmetric(&modulus);
            if taylor_coefficient.is_zero() {
                continue;
            }
            let delta = multivariate_diophantine(&solver, &previous, main_var, &taylor_coefficient, &points[..(j - 1)], degree_bound)?;
            for (f, d) in current.iter_mut().zip(delta.iter()) {
                *f = (&*f + &(d * &monomial)).reduce_symmetric(&modulus);
            }
            error = (target - &product(&current)).reduce_symmetric(&modulus);
        }
    }

    let product = current.iter().fold(MultiPoly::one(), |current, f| &current * f);
    if &product == a {
        return Ok(Some(current));
    } else {
        event!(Level::DEBUG, "multivariate lift did not yield a factorization");
        return Ok(None);
    }
}

#[cfg(test)]
use crate::rings::zn::Zn;
#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[test]
#[allow(non_snake_case)]
fn test_hensel_lift_univariate() {
    LogAlgorithmSubscriber::init_test();
    // (3x^2 - 5)(2x + 7)
    let u_expected = IntPoly::from_i64(&[-5, 0, 3]);
    let w_expected = IntPoly::from_i64(&[7, 2]);
    let a = &u_expected * &w_expected;
    let Fp = ModPolyRing::new(Zn::new(BigInt::from(11)));
    let (u, w) = hensel_lift_univariate(&Fp, &a, &Fp.reduce(&u_expected), &Fp.reduce(&w_expected)).unwrap().unwrap();
    assert_eq!(a, &u * &w);
    assert_eq!(u_expected, u.primitive_part());
}

#[test]
#[allow(non_snake_case)]
fn test_hensel_lift_univariate_wrong_combination() {
    LogAlgorithmSubscriber::init_test();
    // x^4 + 1 is irreducible over Z, but (x^2 + 4)(x^2 - 4) = x^4 + 1 mod 17
    let a = IntPoly::from_i64(&[1, 0, 0, 0, 1]);
    let Fp = ModPolyRing::new(Zn::new(BigInt::from(17)));
    let u1 = Fp.reduce(&IntPoly::from_i64(&[4, 0, 1]));
    let w1 = Fp.reduce(&IntPoly::from_i64(&[-4, 0, 1]));
    assert_el_eq!(Fp, Fp.reduce(&a), Fp.mul_ref(&u1, &w1));
    assert_eq!(None, hensel_lift_univariate(&Fp, &a, &u1, &w1).unwrap());
}

#[test]
fn test_hensel_lift_multivariate() {
    LogAlgorithmSubscriber::init_test();
    let x = MultiPoly::variable(0);
    let y = MultiPoly::variable(1);
    let z = MultiPoly::variable(2);
    // (y x^2 + z + 1) (x - 2y z + 3)
    let f1 = &(&y * &x.pow(2)) + &(&z + &MultiPoly::one());
    let f2 = &(&x - &(&y * &z).scale(&BigInt::from(2))) + &MultiPoly::from_i64(3);
    let a = &f1 * &f2;
    let points = [EvaluationPoint::new(1, BigInt::from(2)), EvaluationPoint::new(2, BigInt::from(-1))];
    let factors = [f1.clone(), f2.clone()].iter().map(|f| evaluate_at(f, &points).to_univariate(0).unwrap()).collect::<Vec<_>>();
    assert_eq!(IntPoly::from_i64(&[0, 0, 2]), factors[0]);
    // 2x^2 and x + 7 are coprime modulo 5
    let lcs = [y.clone(), MultiPoly::one()];
    let bound = multivariate_coefficient_bound(&a);
    let mut l = 1;
    while int_pow(&BigInt::from(5), l) <= &bound * 2 {
        l += 1;
    }
    let result = hensel_lift_multivariate(&a, 0, &points, 5, l, &factors, &lcs).unwrap().unwrap();
    assert_eq!(vec![f1, f2], result);
}

#[test]
fn test_coefficient_bound() {
    let f = MultiPoly::from_i64_terms(&[(&[2, 1], 3), (&[], -1)]);
    assert_eq!(BigInt::from(8 * 4), multivariate_coefficient_bound(&f));
}
