
///
/// This module contains [`zn::Zn`], the ring `Z/nZ` of integers modulo some `n`,
/// which is used both for prime fields and for rings `Z/p^kZ` during Hensel lifting.
///
pub mod zn;

///
/// This module contains [`poly::ModPolyRing`], the univariate polynomial ring `(Z/nZ)[X]`,
/// whose elements are stored as sparse lists of terms.
///
pub mod poly;

///
/// This module contains [`int_poly::IntPoly`], dense univariate polynomials over the integers.
///
pub mod int_poly;

///
/// This module contains [`multivariate::MultiPoly`], sparse multivariate polynomials over
/// the integers.
///
pub mod multivariate;
