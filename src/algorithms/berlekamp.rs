use tracing::{event, instrument, Level};

use crate::algorithms::eea::{div_rem_unit_lc, poly_gcd_field};
use crate::error::FactorError;
use crate::rings::poly::*;
use crate::rings::zn::*;

///
/// Builds the matrix `Q - I`, where the `i`-th row of `Q` contains the coefficients of
/// `X^(ip) mod f`. A row vector `v` then satisfies `v (Q - I) = 0` if and only if the
/// polynomial `v(X) = sum_i v_i X^i` satisfies `v^p = v mod f`.
///
fn berlekamp_matrix(ring: &ModPolyRing, f: &ModPoly) -> Result<Vec<Vec<ZnEl>>, FactorError> {
    let Fp = ring.base_ring();
    let n = ring.degree(f).unwrap_or(0);
    let x_power_p = ring.pow_mod(&ring.indeterminate(), Fp.modulus(), f)
        .ok_or_else(|| FactorError::NonInvertibleLeadingCoefficient { modulus: Fp.modulus().clone() })?;

    let mut result = Vec::with_capacity(n);
    let mut current = ring.one();
    for i in 0..n {
        let mut row = (0..n).map(|j| ring.coefficient_at(&current, j)).collect::<Vec<_>>();
        row[i] = Fp.sub_ref(&row[i], &Fp.one());
        result.push(row);
        current = div_rem_unit_lc(ring, &ring.mul_ref(&current, &x_power_p), f)?.1;
    }
    return Ok(result);
}

///
/// Computes a basis of the Berlekamp subalgebra of the square-free polynomial `f` over
/// a prime field, i.e. the polynomials `v` with `deg(v) < deg(f)` and `v^p = v mod f`.
///
/// This uses the column-operation variant of Gaussian elimination (Knuth's Algorithm N),
/// which produces the basis vectors directly. The first basis vector is always the constant
/// polynomial `1`, and the dimension of the subalgebra equals the number of distinct irreducible
/// factors of `f`.
///
#[stability::unstable(feature = "enable")]
#[instrument(skip_all, level = "trace")]
pub fn berlekamp_nullspace(ring: &ModPolyRing, f: &ModPoly) -> Result<Vec<ModPoly>, FactorError> {
    let Fp = ring.base_ring();
    let n = ring.degree(f).unwrap_or(0);
    let mut matrix = berlekamp_matrix(ring, f)?;
    // pivot_row[j] is the row in which column j was used as pivot column
    let mut pivot_row: Vec<Option<usize>> = vec![None; n];
    let mut result = Vec::new();

    for k in 0..n {
        let pivot_col = (0..n).find(|j| pivot_row[*j].is_none() && !Fp.is_zero(&matrix[k][*j]));
        if let Some(j) = pivot_col {
            let scale = Fp.negate(Fp.invert(&matrix[k][j]).ok_or_else(|| FactorError::NonInvertibleLeadingCoefficient { modulus: Fp.modulus().clone() })?);
            for row in matrix.iter_mut() {
                row[j] = Fp.mul_ref(&row[j], &scale);
            }
            for i in 0..n {
                if i == j {
                    continue;
                }
                let factor = matrix[k][i].clone();
                if Fp.is_zero(&factor) {
                    continue;
                }
                for row in matrix.iter_mut() {
                    let added = Fp.mul_ref(&row[j], &factor);
                    row[i] = Fp.add_ref(&row[i], &added);
                }
            }
            pivot_row[j] = Some(k);
        } else {
            let mut vector = Vec::with_capacity(n);
            for s in 0..n {
                vector.push((Fp.zero(), s));
            }
            vector[k].0 = Fp.one();
            for j in 0..n {
                if let Some(s) = pivot_row[j] {
                    vector[s].0 = matrix[k][j].clone();
                }
            }
            result.push(ring.from_terms(vector));
        }
    }
    return Ok(result);
}

///
/// Computes the distinct monic irreducible factors of the square-free polynomial `f` over a
/// prime field using Berlekamp's algorithm. The factors are returned in ascending order.
///
/// Each basis vector `v` of the Berlekamp subalgebra splits every factor `u` of `f` that it does
/// not reduce to a constant modulo `u`, as `prod_s gcd(u, v - s) = u`. Thus we refine the current
/// list of factors with the `gcd(u, v - s)` until the number of factors equals the dimension of
/// the subalgebra. If this does not happen, [`FactorError::BerlekampIncomplete`] is returned.
///
/// `f` must be square-free, otherwise the result is meaningless. For example, the subalgebra of
/// the square of an irreducible polynomial has dimension `1`, so it is returned as single factor.
///
#[stability::unstable(feature = "enable")]
#[instrument(skip_all, level = "trace")]
pub fn berlekamp(ring: &ModPolyRing, f: &ModPoly) -> Result<Vec<ModPoly>, FactorError> {
    let Fp = ring.base_ring();
    let f = ring.normalize(f.clone());
    if ring.degree(&f).unwrap_or(0) <= 1 {
        return Ok(vec![f]);
    }
    let basis = berlekamp_nullspace(ring, &f)?;
    let expected = basis.len();
    event!(Level::TRACE, degree = ring.degree(&f), factors = expected, "computed Berlekamp subalgebra");

    let mut factors = vec![f];
    for v in basis.iter().skip(1) {
        if factors.len() == expected {
            break;
        }
        let mut refined = Vec::with_capacity(expected);
        for u in factors.into_iter() {
            if ring.degree(&u).unwrap_or(0) <= 1 {
                refined.push(u);
                continue;
            }
            let mut remaining = u;
            for s in Fp.elements() {
                if ring.degree(&remaining).unwrap_or(0) <= 1 {
                    break;
                }
                let g = poly_gcd_field(ring, &remaining, &ring.sub_ref(v, &ring.from_constant(s)))?;
                if !ring.is_one(&g) && ring.degree(&g) != ring.degree(&remaining) {
                    remaining = ring.checked_div(&remaining, &g).ok_or(FactorError::InexactDivision("berlekamp"))?;
                    refined.push(g);
                }
            }
            refined.push(remaining);
        }
        factors = refined;
    }

    if factors.len() != expected {
        return Err(FactorError::BerlekampIncomplete { expected: expected, found: factors.len() });
    }
    factors.sort();
    return Ok(factors);
}

#[cfg(test)]
use num_bigint::BigInt;
#[cfg(test)]
use crate::tracing::LogAlgorithmSubscriber;

#[cfg(test)]
fn poly(P: &ModPolyRing, coefficients: &[i64]) -> ModPoly {
    P.from_terms(coefficients.iter().enumerate().map(|(i, c)| (P.base_ring().from_i64(*c), i)))
}

#[test]
fn test_berlekamp_nullspace() {
    LogAlgorithmSubscriber::init_test();
    let P = ModPolyRing::new(Zn::new(BigInt::from(5)));
    // (x + 1)(x + 2)(x^2 + 2), where x^2 + 2 is irreducible modulo 5
    let f = P.prod([poly(&P, &[1, 1]), poly(&P, &[2, 1]), poly(&P, &[2, 0, 1])]);
    let basis = berlekamp_nullspace(&P, &f).unwrap();
    assert_eq!(3, basis.len());
    assert!(P.is_one(&basis[0]));
    for v in &basis {
        let v_power_p = P.pow_mod(v, &BigInt::from(5), &f).unwrap();
        assert_el_eq!(P, P.euclidean_rem(v, &f).unwrap(), v_power_p);
    }
}

#[test]
fn test_berlekamp() {
    LogAlgorithmSubscriber::init_test();
    let P = ModPolyRing::new(Zn::new(BigInt::from(7)));
    let factors = [poly(&P, &[1, 1]), poly(&P, &[-1, 1]), poly(&P, &[1, 0, 1]), poly(&P, &[1, 1, 0, 1]), poly(&P, &[3, 1])];
    let f = P.prod(factors.iter().cloned());
    let mut expected = factors.to_vec();
    expected.sort();
    let actual = berlekamp(&P, &f).unwrap();
    assert_eq!(expected, actual);
    assert_el_eq!(P, f, P.prod(actual));
}

#[test]
fn test_berlekamp_irreducible() {
    LogAlgorithmSubscriber::init_test();
    let P = ModPolyRing::new(Zn::new(BigInt::from(3)));
    let f = poly(&P, &[2, 1, 0, 0, 1]);
    assert_eq!(1, berlekamp_nullspace(&P, &f).unwrap().len());
    assert_eq!(vec![f.clone()], berlekamp(&P, &f).unwrap());
}

#[test]
fn test_berlekamp_not_squarefree() {
    LogAlgorithmSubscriber::init_test();
    let P = ModPolyRing::new(Zn::new(BigInt::from(5)));
    // (x + 1)^2
    let f = poly(&P, &[1, 2, 1]);
    assert_eq!(1, berlekamp_nullspace(&P, &f).unwrap().len());
    assert_eq!(vec![f.clone()], berlekamp(&P, &f).unwrap());
}
