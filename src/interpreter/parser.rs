/// Statement parsing by precedence collapse.
///
/// Classifies raw tokens into leaves, nested groups and operators, then
/// repeatedly folds the operators of each precedence level into operation
/// nodes until one node per statement remains.
pub mod core;

/// The live operator table.
///
/// Holds the ordered precedence levels, their associativity and the
/// implementations of operators defined by programs.
pub mod precedence;

/// Text literal bodies.
///
/// Substitutes escape sequences and parses `{...}` interpolations.
pub mod text;

/// Helpers shared by the parser: element splitting and group stripping.
pub mod utils;
