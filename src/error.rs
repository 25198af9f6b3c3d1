/// Lexing and parsing errors.
///
/// Defines every error that can be raised while splitting source text into
/// statement groups or while collapsing those groups into an AST. This covers
/// unmatched delimiters, unterminated groups, malformed statements and
/// literals that cannot be read.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all errors that can be raised while evaluating an AST: unbound
/// names, type and arity mismatches, range violations and operator-table
/// conflicts. Parse errors raised by nested parsing (interpolated text,
/// `eval`) are wrapped so a single error type reaches the caller.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
