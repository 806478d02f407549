use std::mem::swap;

use tracing::instrument;

use crate::error::FactorError;
use crate::rings::poly::*;

///
/// Computes `(q, r)` with `lhs = q * rhs + r` and `deg(r) < deg(rhs)`, failing if the leading
/// coefficient of `rhs` is not a unit.
///
pub(crate) fn div_rem_unit_lc(ring: &ModPolyRing, lhs: &ModPoly, rhs: &ModPoly) -> Result<(ModPoly, ModPoly), FactorError> {
    ring.div_rem(lhs, rhs).ok_or_else(|| FactorError::NonInvertibleLeadingCoefficient { modulus: ring.base_ring().modulus().clone() })
}

///
/// For polynomials `a, b` over a prime field, computes `s, t, d` such that `s*a + t*b == d` is the
/// monic greatest common divisor of `a` and `b` (or zero, if both are zero).
///
/// The polynomial ring must be over a field, otherwise this might fail with
/// [`FactorError::NonInvertibleLeadingCoefficient`].
///
#[stability::unstable(feature = "enable")]
pub fn poly_eea(ring: &ModPolyRing, fst: ModPoly, snd: ModPoly) -> Result<(ModPoly, ModPoly, ModPoly), FactorError> {
    let (mut a, mut b) = (fst, snd);

    let (mut sa, mut ta) = (ring.one(), ring.zero());
    let (mut sb, mut tb) = (ring.zero(), ring.one());

    while !ring.is_zero(&b) {
        let (quo, rem) = div_rem_unit_lc(ring, &a, &b)?;
        ta = ring.sub(ta, ring.mul_ref(&quo, &tb));
        sa = ring.sub(sa, ring.mul_ref(&quo, &sb));
        a = rem;

        swap(&mut a, &mut b);
        swap(&mut sa, &mut sb);
        swap(&mut ta, &mut tb);
    }
    if let Some(lc_inv) = ring.lc(&a).and_then(|lc| ring.base_ring().invert(lc)) {
        return Ok((ring.scale(&sa, &lc_inv), ring.scale(&ta, &lc_inv), ring.scale(&a, &lc_inv)));
    }
    return Ok((sa, ta, a));
}

///
/// Computes the monic greatest common divisor of two polynomials over a prime field.
///
pub fn poly_gcd_field(ring: &ModPolyRing, fst: &ModPoly, snd: &ModPoly) -> Result<ModPoly, FactorError> {
    let (mut a, mut b) = (fst.clone(), snd.clone());
    while !ring.is_zero(&b) {
        let (_, rem) = div_rem_unit_lc(ring, &a, &b)?;
        a = b;
        b = rem;
    }
    return Ok(ring.normalize(a));
}

///
/// Given `a, b` over `Z/p^kZ` whose reductions modulo `p` are coprime, computes `s, t` over `Z/p^kZ`
/// with `s*a + t*b = 1`. This is done by computing the Bezout identity modulo `p` and then refining
/// it p-adically, in each step solving for the next `p`-adic digit of `s` and `t`.
///
/// Here `Fp` must be the ring `Z/pZ[X]` and `Zpk` the ring `Z/p^kZ[X]`.
///
#[stability::unstable(feature = "enable")]
#[allow(non_snake_case)]
#[instrument(skip_all, level = "trace")]
pub fn eea_lift(Fp: &ModPolyRing, Zpk: &ModPolyRing, a: &ModPoly, b: &ModPoly) -> Result<(ModPoly, ModPoly), FactorError> {
    let p = Fp.base_ring().modulus().clone();
    let reduce = Fp.can_hom_from(Zpk).ok_or(FactorError::InexactDivision("eea_lift"))?;

    let a_p = reduce.map_ref(a);
    let b_p = reduce.map_ref(b);
    let (s_p, t_p, d) = poly_eea(Fp, a_p.clone(), b_p.clone())?;
    if !Fp.is_one(&d) {
        return Err(FactorError::NotCoprime { prime: p });
    }
    let mut s = Zpk.lift_from(Fp, &s_p);
    let mut t = Zpk.lift_from(Fp, &t_p);

    let mut current_modulus = p.clone();
    while &current_modulus < Zpk.base_ring().modulus() {
        let error = Zpk.sub(Zpk.one(), Zpk.add(Zpk.mul_ref(a, &s), Zpk.mul_ref(b, &t)));
        let error_p = Zpk.div_coefficients_into(Fp, &error, &current_modulus).ok_or(FactorError::InexactDivision("eea_lift"))?;

        let (quo, sigma) = div_rem_unit_lc(Fp, &Fp.mul_ref(&s_p, &error_p), &b_p)?;
        let tau = Fp.add(Fp.mul_ref(&t_p, &error_p), Fp.mul_ref(&quo, &a_p));

        let scale = Zpk.base_ring().from_int(&current_modulus);
        s = Zpk.add(s, Zpk.scale(&Zpk.lift_from(Fp, &sigma), &scale));
        t = Zpk.add(t, Zpk.scale(&Zpk.lift_from(Fp, &tau), &scale));
        current_modulus *= &p;
    }
    return Ok((s, t));
}

///
/// Given `a_1, ..., a_r` over `Z/p^kZ` that are pairwise coprime modulo `p`, computes `s_1, ..., s_r`
/// with `sum_j s_j prod_(i != j) a_i = 1`.
///
/// This is done by cascading two-factor identities: Writing `q_j = a_(j + 1) ... a_r`, we
/// successively solve `beta_j = x a_j + y q_j` with `beta_1 = 1`, take `y` as `s_j` and continue
/// with `beta_(j + 1) = x`.
///
#[stability::unstable(feature = "enable")]
#[allow(non_snake_case)]
#[instrument(skip_all, level = "trace")]
pub fn multiterm_eea_lift(Fp: &ModPolyRing, Zpk: &ModPolyRing, factors: &[ModPoly]) -> Result<Vec<ModPoly>, FactorError> {
    assert!(factors.len() > 0);
    let r = factors.len();
    if r == 1 {
        return Ok(vec![Zpk.one()]);
    }
    let mut tail_products = Vec::with_capacity(r - 1);
    tail_products.push(factors[r - 1].clone());
    for j in (1..(r - 1)).rev() {
        let next = Zpk.mul_ref(&factors[j], tail_products.last().unwrap());
        tail_products.push(next);
    }
    tail_products.reverse();
    debug_assert_eq!(r - 1, tail_products.len());

    let mut result = Vec::with_capacity(r);
    let mut beta = Zpk.one();
    for j in 0..(r - 1) {
        let (s, t) = eea_lift(Fp, Zpk, &factors[j], &tail_products[j])?;
        let (quo, y) = div_rem_unit_lc(Zpk, &Zpk.mul_ref(&t, &beta), &factors[j])?;
        beta = Zpk.add(Zpk.mul_ref(&s, &beta), Zpk.mul_ref(&quo, &tail_products[j]));
        result.push(y);
    }
    result.push(beta);
    return Ok(result);
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
fn test_poly_eea() {
    LogAlgorithmSubscriber::init_test();
    let P = ModPolyRing::new(Zn::new(BigInt::from(7)));
    let common = poly(&P, &[1, 1]);
    let a = P.mul_ref(&common, &poly(&P, &[3, 0, 1]));
    let b = P.mul_ref(&common, &poly(&P, &[2, 5]));
    let (s, t, d) = poly_eea(&P, a.clone(), b.clone()).unwrap();
    assert_el_eq!(P, common, d);
    assert_el_eq!(P, d, P.add(P.mul_ref(&s, &a), P.mul_ref(&t, &b)));
    assert_el_eq!(P, common, poly_gcd_field(&P, &a, &b).unwrap());
    assert_el_eq!(P, P.one(), poly_gcd_field(&P, &poly(&P, &[3, 0, 1]), &poly(&P, &[2, 5])).unwrap());
}

#[test]
#[allow(non_snake_case)]
fn test_eea_lift() {
    LogAlgorithmSubscriber::init_test();
    let Fp = ModPolyRing::new(Zn::new(BigInt::from(5)));
    let Zpk = ModPolyRing::new(Zn::new_prime_power(5, 4));
    let a = poly(&Zpk, &[3, 7, 1]);
    let b = poly(&Zpk, &[-2, 1]);
    let (s, t) = eea_lift(&Fp, &Zpk, &a, &b).unwrap();
    assert_el_eq!(Zpk, Zpk.one(), Zpk.add(Zpk.mul_ref(&s, &a), Zpk.mul_ref(&t, &b)));

    let not_coprime = poly(&Zpk, &[-2 + 25, 1]);
    assert_eq!(Err(FactorError::NotCoprime { prime: BigInt::from(5) }), eea_lift(&Fp, &Zpk, &not_coprime, &b));

    let wrong_prime = ModPolyRing::new(Zn::new(BigInt::from(7)));
    assert_eq!(Err(FactorError::InexactDivision("eea_lift")), eea_lift(&wrong_prime, &Zpk, &a, &b));
}

#[test]
#[allow(non_snake_case)]
fn test_multiterm_eea_lift() {
    LogAlgorithmSubscriber::init_test();
    let Fp = ModPolyRing::new(Zn::new(BigInt::from(7)));
    let Zpk = ModPolyRing::new(Zn::new_prime_power(7, 3));
    let factors = [poly(&Zpk, &[1, 1]), poly(&Zpk, &[1, 0, 1]), poly(&Zpk, &[2, 1]), poly(&Zpk, &[-1, 1])];
    let s = multiterm_eea_lift(&Fp, &Zpk, &factors).unwrap();
    assert_eq!(4, s.len());
    let sum = (0..4).fold(Zpk.zero(), |current, j| {
        let cofactor = Zpk.prod((0..4).filter(|i| *i != j).map(|i| factors[i].clone()));
        Zpk.add(current, Zpk.mul(s[j].clone(), cofactor))
    });
    assert_el_eq!(Zpk, Zpk.one(), sum);
}
