/// The standard library, written in the language itself.
///
/// Evaluated once by
/// [`Environment::standard`](crate::interpreter::evaluator::environment::Environment::standard)
/// on top of the native builtins. It defines the indexing, composition and
/// logic operators, arithmetic wrappers usable as values, list helpers, and
/// the macros behind `if`, `cond`, `switch`, `while`, `for` and `forin`.
pub const PRELUDE: &str = include_str!("prelude.tbl");
