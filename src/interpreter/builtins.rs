/// The builtin registry.
///
/// Declares every native builtin with its arity in one table and installs
/// them into an environment.
pub mod core;

/// Lists, texts and list-shaped syntax nodes: indexing, mutation, slicing
/// and construction.
pub mod collection;

/// Higher order builtins that apply a function across a list.
pub mod functional;

/// Object construction and key access.
pub mod object;

/// Numeric builtins and constants.
pub mod math;

/// Text manipulation.
pub mod text;

/// Getters, setters and predicates over syntax nodes, used by macros.
pub mod node;

/// Evaluation, introspection and error handling.
///
/// Builtins that reach into the interpreter itself: evaluating text and
/// nodes, listing bindings and precedence levels, generating fresh names,
/// and raising or catching errors.
pub mod meta;
