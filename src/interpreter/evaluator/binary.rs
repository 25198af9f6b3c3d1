/// The native operator set and the dispatch between its rules.
pub mod core;

/// Elementwise broadcasting over lists.
///
/// Pairs list elements with each other or with a scalar and recurses, so
/// nested lists broadcast at any depth.
pub mod array;

/// Arithmetic and ordering between two numbers.
pub mod scalar;

/// `=` and `!=`, which aggregate over two lists.
pub mod comparison;

/// Concatenation, repetition and ordering of text.
pub mod text;
