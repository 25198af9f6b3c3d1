/// Native builtin functions.
///
/// The builtin table, the arity checks applied to every entry, and the
/// implementations grouped by what they work on: lists, objects, numbers,
/// text, syntax tree nodes and the interpreter itself.
pub mod builtins;
/// The evaluator walks syntax trees and computes values.
///
/// It owns the statement loop that keeps tokenization in step with the
/// operator table, the environments that hold bindings, and the semantics of
/// every built in operator: binding, definition, application, control flow,
/// operator definition and the native arithmetic.
///
/// # Responsibilities
/// - Evaluates syntax trees in an environment.
/// - Applies functions, user operators and macros.
/// - Reports runtime errors such as unbound names or mismatched list lengths.
pub mod evaluator;
/// The lexer splits source text into statement groups of raw tokens.
///
/// It is a character level state machine that tracks brackets, text
/// literals and comments, and cuts operator runs using the set of glyphs the
/// current operator table uses.
pub mod lexer;
/// The parser turns token groups into syntax trees.
///
/// Tokens are classified into literals, identifiers, groupings and
/// operators; a statement is then collapsed repeatedly at the tightest
/// operator level found in the live operator table.
///
/// # Responsibilities
/// - Classifies tokens and parses nested groupings recursively.
/// - Resolves precedence and associativity from the operator table.
/// - Parses interpolated text literals.
pub mod parser;
/// The standard library written in the language itself.
pub mod prelude;
/// Runtime values.
///
/// Numbers are complex, lists and objects are shared mutable handles, and
/// functions carry their parameters, body and captured bindings.
pub mod value;
