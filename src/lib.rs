#![allow(non_snake_case)]
#![doc = include_str!("../Readme.md")]

///
/// Asserts that two elements of a ring are equal, using the equality of the given ring.
///
/// The ring can be anything with a method `eq_el(&self, lhs, rhs) -> bool`, like
/// [`crate::rings::zn::Zn`] or [`crate::rings::poly::ModPolyRing`].
///
#[macro_export]
macro_rules! assert_el_eq {
    ($ring:expr, $lhs:expr, $rhs:expr) => {
        match (&$ring, &$lhs, &$rhs) {
            (ring_val, lhs_val, rhs_val) => {
                assert!(ring_val.eq_el(lhs_val, rhs_val), "Assertion failed: {:?} != {:?}", lhs_val, rhs_val);
            }
        }
    }
}

///
/// Contains helper functions on arbitrary-precision integers, as used during polynomial
/// factorization.
///
pub mod integer;
///
/// Contains [`error::FactorError`], the hard failures of the factorization algorithms.
///
pub mod error;
///
/// Contains [`config::FactorConfig`], the tunable parameters of the factorization.
///
pub mod config;
///
/// Contains [`tracing::LogAlgorithmSubscriber`], a subscriber to the [`::tracing`] events
/// emitted by the algorithms of this crate that prints them in an easily readable format.
///
pub mod tracing;
///
/// Contains the rings `Z/nZ`, `(Z/nZ)[X]`, `Z[X]` and `Z[X0, ..., Xn]` used by the
/// factorization algorithms.
///
pub mod rings;
///
/// Contains the factorization algorithms and their building blocks.
///
pub mod algorithms;

pub use algorithms::poly_factor::{factor, factor_with, Factorization};
pub use algorithms::poly_factor::rational::factor_rational;
pub use config::FactorConfig;
pub use error::FactorError;
pub use rings::multivariate::{Monomial, MultiPoly};
