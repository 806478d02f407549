///
/// Square-free decompositions over prime fields, using the derivative and taking `p`-th roots
/// where the derivative vanishes.
///
pub mod finite_field;
///
/// Square-free decompositions over the integers, using Yun's algorithm.
///
pub mod integer;
