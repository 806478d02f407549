use tracing::instrument;

use crate::algorithms::poly_gcd::*;
use crate::error::FactorError;
use crate::rings::multivariate::MultiPoly;

fn exact_div(lhs: &MultiPoly, rhs: &MultiPoly) -> Result<MultiPoly, FactorError> {
    lhs.checked_div(rhs).ok_or(FactorError::InexactDivision("integer square-free decomposition"))
}

///
/// Yun's algorithm for a polynomial that is primitive w.r.t. `X_var`. Since we are in characteristic
/// zero, the derivative of a nonconstant polynomial never vanishes.
///
fn primitive_power_decomposition(f: &MultiPoly, var: usize) -> Result<Vec<(MultiPoly, usize)>, FactorError> {
    let mut result = Vec::new();
    let derivate = f.derivative(var);
    let a = poly_gcd(f, &derivate);
    let mut b = exact_div(f, &a)?;
    let mut c = exact_div(&derivate, &a)?;
    let mut d = &c - &b.derivative(var);
    let mut i = 1;
    while b.degree_in(var) > 0 {
        let factor = poly_gcd(&b, &d);
        b = exact_div(&b, &factor)?;
        c = exact_div(&d, &factor)?;
        d = &c - &b.derivative(var);
        if factor.degree_in(var) > 0 {
            result.push((factor.with_positive_lc(), i));
        }
        i += 1;
    }
    return Ok(result);
}

///
/// Computes the square-free decomposition of a polynomial over the integers, i.e. a list of
/// `(fi, ki)` such that the `fi` are square-free, nonconstant, pairwise coprime and have positive
/// leading coefficient, the `ki` are distinct, and `f = c prod_i fi^ki` for some integer `c`.
///
/// The polynomial is decomposed as polynomial in its smallest variable using Yun's algorithm, and
/// its content w.r.t. this variable is decomposed recursively. Factors of the same multiplicity are
/// then combined.
///
#[instrument(skip_all, level = "trace")]
pub fn poly_power_decomposition_integer(f: &MultiPoly) -> Result<Vec<(MultiPoly, usize)>, FactorError> {
    assert!(!f.is_zero());
    let var = match f.variables().first() {
        Some(var) => *var,
        None => return Ok(Vec::new())
    };
    let content = content_in(f, var);
    let primitive_part = exact_div(f, &content)?;

    let mut result = primitive_power_decomposition(&primitive_part, var)?;
    for (g, k) in poly_power_decomposition_integer(&content)? {
        if let Some(entry) = result.iter_mut().find(|(_, l)| *l == k) {
            entry.0 = &entry.0 * &g;
        } else {
            result.push((g, k));
        }
    }
    result.sort_by_key(|(_, k)| *k);
    return Ok(result);
}

#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[cfg(test)]
fn x() -> MultiPoly { MultiPoly::variable(0) }
#[cfg(test)]
fn y() -> MultiPoly { MultiPoly::variable(1) }
#[cfg(test)]
fn c(value: i64) -> MultiPoly { MultiPoly::from_i64(value) }

#[test]
fn test_power_decomposition_univariate() {
    LogAlgorithmSubscriber::init_test();
    let f1 = &x() + &c(1);
    let f2 = &(&x() * &x()) + &c(2);
    let f3 = &x() - &c(3);
    let f = &(&f1 * &f2.pow(3)) * &f3.pow(4);
    let f = &f * &c(-10);
    assert_eq!(vec![(f1, 1), (f2, 3), (f3, 4)], poly_power_decomposition_integer(&f).unwrap());
}

#[test]
fn test_power_decomposition_multivariate() {
    LogAlgorithmSubscriber::init_test();
    // (x y + 1)^2 (y + 1)^2 (x - y)
    let f1 = &(&x() * &y()) + &c(1);
    let f2 = &y() + &c(1);
    let f3 = &x() - &y();
    let f = &(&f1.pow(2) * &f2.pow(2)) * &f3;
    let decomposition = poly_power_decomposition_integer(&f).unwrap();
    assert_eq!(vec![(f3.clone(), 1), (&f1 * &f2, 2)], decomposition);
}
