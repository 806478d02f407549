use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};
use tracing::instrument;

use crate::integer::gcd_all;
use crate::rings::multivariate::{Monomial, MultiPoly};

///
/// Returns the smallest variable index occurring in any of the given polynomials.
///
fn first_variable(polys: &[&MultiPoly]) -> Option<usize> {
    polys.iter().filter_map(|f| f.variables().first().copied()).min()
}

///
/// Computes the pseudo-remainder `lc_X(b)^(deg(a) - deg(b) + 1) a mod b` w.r.t. `X = X_var`.
/// Requires `deg_X(a) >= deg_X(b) > 0`.
///
fn pseudo_rem(a: &MultiPoly, b: &MultiPoly, var: usize) -> MultiPoly {
    let b_degree = b.degree_in(var);
    let b_lc = b.leading_coefficient_in(var);
    let mut missing_factors = a.degree_in(var) + 1 - b_degree;
    let mut current = a.clone();
    while !current.is_zero() && current.degree_in(var) >= b_degree {
        let current_degree = current.degree_in(var);
        let current_lc = current.leading_coefficient_in(var);
        let shifted = b.mul_monomial(&Monomial::variable_power(var, (current_degree - b_degree) as u32));
        current = &(&current * &b_lc) - &(&shifted * &current_lc);
        missing_factors -= 1;
    }
    if missing_factors == 0 || current.is_zero() {
        return current;
    }
    return &current * &b_lc.pow(missing_factors);
}

///
/// Computes the greatest common divisor of two polynomials over the integers.
///
/// The result is normalized to have a positive leading coefficient (w.r.t. the lexicographic order),
/// and `gcd(0, 0) = 0`. The contents w.r.t. the smallest occurring variable are handled recursively,
/// and the primitive parts by the subresultant pseudo-remainder sequence. In the latter, the remainders
/// are divided by the factors `g h^d` that are known to divide them, so the coefficients grow only
/// moderately, and no content computation is necessary before the sequence terminates.
///
#[instrument(skip_all, level = "trace")]
pub fn poly_gcd(lhs: &MultiPoly, rhs: &MultiPoly) -> MultiPoly {
    if lhs.is_zero() {
        return rhs.clone().with_positive_lc();
    } else if rhs.is_zero() {
        return lhs.clone().with_positive_lc();
    } else if let Some(value) = lhs.as_constant() {
        return MultiPoly::constant(value.gcd(&rhs.integer_content()));
    } else if let Some(value) = rhs.as_constant() {
        return MultiPoly::constant(value.gcd(&lhs.integer_content()));
    }
    // both polynomials are nonconstant
    let var = first_variable(&[lhs, rhs]).unwrap_or(0);
    let content = poly_gcd(&content_in(lhs, var), &content_in(rhs, var));
    let (mut a, mut b) = (primitive_part_in(lhs, var), primitive_part_in(rhs, var));
    if a.degree_in(var) < b.degree_in(var) {
        std::mem::swap(&mut a, &mut b);
    }
    let mut g = MultiPoly::one();
    let mut h = MultiPoly::one();
    loop {
        if b.degree_in(var) == 0 {
            // the primitive parts are coprime
            return content;
        }
        let r = pseudo_rem(&a, &b, var);
        if r.is_zero() {
            return (&content * &primitive_part_in(&b, var)).with_positive_lc();
        }
        let delta = a.degree_in(var) - b.degree_in(var);
        let next_g = b.leading_coefficient_in(var);
        let next = r.checked_div(&(&g * &h.pow(delta))).and_then(|next_b| {
            let next_h = if delta == 0 {
                Some(h.clone())
            } else {
                next_g.pow(delta).checked_div(&h.pow(delta - 1))
            };
            next_h.map(|next_h| (next_b, next_h))
        });
        a = b;
        match next {
            Some((next_b, next_h)) => {
                b = next_b;
                g = next_g;
                h = next_h;
            },
            None => {
                // the divisors do not contain `X_var`, so restarting the sequence with a primitive remainder is valid
                b = primitive_part_in(&r, var);
                g = MultiPoly::one();
                h = MultiPoly::one();
            }
        }
    }
}

///
/// Returns the content of `f` w.r.t. `X_var`, i.e. the gcd of its coefficients when considered as
/// polynomial in `X_var`. The content of the zero polynomial is zero.
///
pub fn content_in(f: &MultiPoly, var: usize) -> MultiPoly {
    let mut coefficients = f.coefficients_in(var).into_iter().filter(|c| !c.is_zero()).collect::<Vec<_>>();
    if coefficients.iter().any(|c| c.as_constant().is_some()) {
        let integer_contents = coefficients.iter().map(|c| c.integer_content()).collect::<Vec<_>>();
        return MultiPoly::constant(gcd_all(integer_contents.iter()));
    }
    coefficients.sort_by_key(|c| c.terms().len());
    let mut result = MultiPoly::zero();
    for c in &coefficients {
        if result.is_one() {
            break;
        }
        result = poly_gcd(&result, c);
    }
    return result;
}

///
/// Returns `f / content_X(f)`, scaled such that the lexicographic leading coefficient is positive.
///
pub fn primitive_part_in(f: &MultiPoly, var: usize) -> MultiPoly {
    if f.is_zero() {
        return MultiPoly::zero();
    }
    let content = content_in(f, var);
    let result = if content.is_one() {
        f.clone()
    } else {
        // the content divides every coefficient by definition
        f.checked_div(&content).unwrap_or_else(|| f.clone())
    };
    return result.with_positive_lc();
}

///
/// Returns the sign of the lexicographic leading coefficient and the integer content, as one
/// integer `u` such that `f / u` has coprime coefficients and a positive leading coefficient.
///
pub fn unit_content(f: &MultiPoly) -> BigInt {
    let content = f.integer_content();
    if f.lc().map(|c| c.is_negative()).unwrap_or(false) {
        return -content;
    } else if content.is_zero() {
        return BigInt::zero();
    } else {
        return content;
    }
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
fn test_poly_gcd_univariate() {
    LogAlgorithmSubscriber::init_test();
    let common = &(&x() * &x()) - &c(2);
    let a = &common * &(&x() + &c(3));
    let b = &(&common * &(&x() - &c(5))).scale(&BigInt::from(-6));
    assert_eq!(common, poly_gcd(&a, &b));
    assert_eq!(c(1), poly_gcd(&(&x() + &c(3)), &(&x() - &c(5))));
    assert_eq!(c(6), poly_gcd(&c(-12), &c(18)));
    assert_eq!(common, poly_gcd(&MultiPoly::zero(), &-&common));
}

#[test]
fn test_poly_gcd_multivariate() {
    LogAlgorithmSubscriber::init_test();
    // (x y + 1)(2y + 3)
    let common = &(&(&x() * &y()) + &c(1)) * &(&y().scale(&BigInt::from(2)) + &c(3));
    let a = &(&common * &(&x() - &y())) * &c(4);
    let b = &(&common * &(&x() * &x() + &y())) * &c(6);
    assert_eq!(&common * &c(2), poly_gcd(&a, &b));
    assert_eq!(c(1), poly_gcd(&(&x() + &y()), &(&x() - &y())));
}

#[test]
fn test_poly_gcd_trivariate() {
    LogAlgorithmSubscriber::init_test();
    let z = MultiPoly::variable(2);
    // x y^2 + 4z
    let common = &(&x() * &y().pow(2)) + &z.scale(&BigInt::from(4));
    let f = &(&x().pow(2) * &z) + &y().scale(&BigInt::from(9));
    let g = &(&x().scale(&BigInt::from(2)) + &(&y() * &z).scale(&BigInt::from(3))) + &c(1);
    let a = &(&common * &f) * &z.scale(&BigInt::from(2));
    let b = &(&common.pow(2) * &g) * &(&y() + &z);
    assert_eq!(common, poly_gcd(&a, &b));
    assert_eq!(c(1), poly_gcd(&f, &g));

    let square = (&common * &f).pow(2);
    assert_eq!(&common * &f, poly_gcd(&square, &square.derivative(0)));
}

#[test]
fn test_content_in() {
    LogAlgorithmSubscriber::init_test();
    // (y + 1) x^2 + (y^2 - 1) x = (y + 1) x (x + y - 1)
    let f = &(&(&y() + &c(1)) * &(&x() * &x())) + &(&(&(&y() * &y()) - &c(1)) * &x());
    assert_eq!(&y() + &c(1), content_in(&f, 0));
    assert_eq!(&x() * &(&(&x() + &y()) - &c(1)), primitive_part_in(&f, 0));
    assert_eq!(BigInt::from(-3), unit_content(&(&x() * &c(-6) + &c(3))));
}
