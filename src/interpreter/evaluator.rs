/// Core evaluation logic.
///
/// Contains the statement loop that keeps tokenization in step with the
/// operator table, the tree walk itself, and the dispatch of operation
/// nodes to the constructs below.
pub mod core;

/// The runtime environment.
///
/// Binding stacks, the live operator table, the link to the enclosing
/// environment, and guards that undo bindings and call depth on exit.
pub mod environment;

/// Native binary operator evaluation.
///
/// Arithmetic, comparison and text operators, broadcast over lists.
pub mod binary;

/// Evaluation of `:`, including destructuring.
pub mod binding;

/// Evaluation of operator definitions and user defined operators.
pub mod operator;

/// Function definition, plain and scoped application, and partial
/// application.
///
/// Manages parameter binding, self reference and the call depth limit.
pub mod function;

/// The conditional, while and for constructs.
pub mod control;
