use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

///
/// Computes the representative of `x mod modulus` of smallest absolute value,
/// i.e. the unique `r` with `-modulus/2 < r <= modulus/2` and `r = x mod modulus`.
///
pub fn symmetric_rem(x: &BigInt, modulus: &BigInt) -> BigInt {
    debug_assert!(modulus.is_positive());
    let r = x.mod_floor(modulus);
    if &r + &r > *modulus {
        r - modulus
    } else {
        r
    }
}

///
/// Returns the smallest integer `n` with `n^2 >= x`, for `x >= 0`.
///
pub fn sqrt_ceil(x: &BigInt) -> BigInt {
    assert!(!x.is_negative());
    let root = x.sqrt();
    if &root * &root == *x {
        root
    } else {
        root + 1
    }
}

///
/// Computes the non-negative greatest common divisor of the given integers;
/// the empty gcd is `0`.
///
pub fn gcd_all<'a, I>(values: I) -> BigInt
    where I: IntoIterator<Item = &'a BigInt>
{
    let mut result = BigInt::zero();
    for x in values {
        result = result.gcd(x);
        if result.is_one() {
            break;
        }
    }
    return result;
}

///
/// Returns `base^exponent`.
///
pub fn int_pow(base: &BigInt, exponent: usize) -> BigInt {
    num_traits::pow(base.clone(), exponent)
}

#[test]
fn test_symmetric_rem() {
    let m = BigInt::from(7);
    assert_eq!(BigInt::from(3), symmetric_rem(&BigInt::from(3), &m));
    assert_eq!(BigInt::from(-3), symmetric_rem(&BigInt::from(4), &m));
    assert_eq!(BigInt::from(-1), symmetric_rem(&BigInt::from(-8), &m));
    let m = BigInt::from(8);
    assert_eq!(BigInt::from(4), symmetric_rem(&BigInt::from(4), &m));
    assert_eq!(BigInt::from(-3), symmetric_rem(&BigInt::from(5), &m));
}

#[test]
fn test_sqrt_ceil() {
    assert_eq!(BigInt::from(0), sqrt_ceil(&BigInt::from(0)));
    assert_eq!(BigInt::from(4), sqrt_ceil(&BigInt::from(16)));
    assert_eq!(BigInt::from(5), sqrt_ceil(&BigInt::from(17)));
}

#[test]
fn test_gcd_all() {
    let values = [BigInt::from(12), BigInt::from(-18), BigInt::from(30)];
    assert_eq!(BigInt::from(6), gcd_all(values.iter()));
    assert_eq!(BigInt::from(0), gcd_all(std::iter::empty()));
}
