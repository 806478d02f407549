use num_bigint::BigInt;
use thiserror::Error;

///
/// Hard failures of the factorization algorithms.
///
/// These indicate that an internal invariant was violated (or a configured resource
/// limit was hit), and are never retried. A candidate that simply does not work out,
/// e.g. a Hensel lift of a wrong combination of modular factors, is not an error but
/// reported as `None` by the corresponding function.
///
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FactorError {
    #[error("no usable prime below {bound}")]
    NoUsablePrime { bound: u64 },

    #[error("Berlekamp's algorithm found only {found} of {expected} factors")]
    BerlekampIncomplete { expected: usize, found: usize },

    #[error("polynomials to lift are not coprime modulo {prime}")]
    NotCoprime { prime: BigInt },

    #[error("leading coefficient is not invertible modulo {modulus}")]
    NonInvertibleLeadingCoefficient { modulus: BigInt },

    #[error("inexact division in {0}")]
    InexactDivision(&'static str),

    #[error("exceeded the maximal number of evaluation point trials ({0})")]
    EvaluationPointsExhausted(usize)
}

#[test]
fn test_display() {
    assert_eq!("no usable prime below 1024", format!("{}", FactorError::NoUsablePrime { bound: 1024 }));
    assert_eq!("Berlekamp's algorithm found only 2 of 3 factors", format!("{}", FactorError::BerlekampIncomplete { expected: 3, found: 2 }));
}
