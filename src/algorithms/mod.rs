
///
/// Contains a process-wide cache of small primes.
///
pub mod primes;
///
/// Contains the Extended Euclidean Algorithm for polynomials over prime fields, and its
/// lifts to Bezout identities over `Z/p^kZ`.
///
pub mod eea;
///
/// Contains solvers for univariate and multivariate polynomial Diophantine equations, as
/// required during Hensel lifting.
///
pub mod diophantine;
///
/// Contains univariate and multivariate Hensel lifting of factorizations.
///
pub mod hensel;
///
/// Contains Berlekamp's algorithm for finding the irreducible factors of a square-free
/// polynomial over a prime field.
///
pub mod berlekamp;
///
/// Contains an implementation of the greatest common divisor of multivariate integer
/// polynomials, and related functions.
///
pub mod poly_gcd;
///
/// Contains algorithms for computing the square-free decomposition of polynomials.
///
pub mod poly_squarefree;
///
/// Contains algorithms for computing the factorization of polynomials.
///
pub mod poly_factor;
