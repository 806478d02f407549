use std::sync::Mutex;

use append_only_vec::AppendOnlyVec;

///
/// Process-wide cache of all primes up to some bound, in ascending order. It is only
/// ever extended, so readers never need to synchronize; extensions are serialized
/// by [`EXTEND_LOCK`].
///
static PRIME_CACHE: AppendOnlyVec<u64> = AppendOnlyVec::new();
static EXTEND_LOCK: Mutex<()> = Mutex::new(());

const INITIAL_SIEVE_BOUND: u64 = 1024;

#[allow(non_snake_case)]
fn erathostenes(B: u64) -> Vec<u64> {
    let mut primes = Vec::new();
    if B <= 2 {
        return primes;
    }
    primes.push(2);
    let mut list = Vec::new();
    list.resize((B / 2) as usize, true);
    for i in 1..(B / 2) {
        let n = i * 2 + 1;
        if list[i as usize] {
            primes.push(n);
            let mut j = i + n;
            while j < B / 2 {
                list[j as usize] = false;
                j += n;
            }
        }
    }
    return primes;
}

fn is_prime_by_cache(n: u64) -> bool {
    for p in PRIME_CACHE.iter() {
        if p * p > n {
            return true;
        }
        if n % p == 0 {
            return false;
        }
    }
    unreachable!("the prime cache always contains primes up to the square root of the next candidate")
}

///
/// Makes sure that the cache contains at least `len` primes.
///
fn extend_cache(len: usize) {
    if PRIME_CACHE.len() >= len {
        return;
    }
    let _lock = EXTEND_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if PRIME_CACHE.len() == 0 {
        for p in erathostenes(INITIAL_SIEVE_BOUND) {
            _ = PRIME_CACHE.push(p);
        }
    }
    while PRIME_CACHE.len() < len {
        let mut candidate = PRIME_CACHE[PRIME_CACHE.len() - 1] + 2;
        while !is_prime_by_cache(candidate) {
            candidate += 2;
        }
        _ = PRIME_CACHE.push(candidate);
    }
}

///
/// Returns the `i`-th prime, starting with `nth_prime(0) = 2`.
///
pub fn nth_prime(i: usize) -> u64 {
    extend_cache(i + 1);
    return PRIME_CACHE[i];
}

///
/// Iterates over all odd primes `p <= bound` in ascending order.
///
/// # Example
/// ```
/// # use feanor_factor::algorithms::primes::*;
/// assert_eq!(vec![3, 5, 7, 11, 13], odd_primes_up_to(13).collect::<Vec<_>>());
/// ```
///
pub fn odd_primes_up_to(bound: u64) -> impl Iterator<Item = u64> {
    (1..).map(nth_prime).take_while(move |p| *p <= bound)
}

#[test]
fn test_erathostenes() {
    assert_eq!(Vec::<u64>::new(), erathostenes(2));
    assert_eq!(vec![2], erathostenes(3));
    assert_eq!(vec![2, 3], erathostenes(4));
    assert_eq!(vec![2, 3, 5, 7, 11, 13, 17, 19], erathostenes(20));
    assert_eq!(vec![2, 3, 5, 7, 11, 13, 17, 19, 23], erathostenes(25));
}

#[test]
fn test_nth_prime() {
    assert_eq!(2, nth_prime(0));
    assert_eq!(3, nth_prime(1));
    assert_eq!(1021, nth_prime(171));
    assert_eq!(1031, nth_prime(172));
    assert_eq!(104729, nth_prime(9999));
}

#[test]
fn test_odd_primes_up_to() {
    assert_eq!(vec![3, 5, 7], odd_primes_up_to(10).collect::<Vec<_>>());
    assert_eq!(0, odd_primes_up_to(2).count());
    assert_eq!(1228, odd_primes_up_to(10007).filter(|p| *p < 10000).count());
}
