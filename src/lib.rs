//! # tbl
//!
//! tbl is a small expression language whose grammar lives in a runtime
//! operator table. Programs can define new binary operators, choose their
//! precedence and associativity, and use them in the very next statement.
//! Values are complex numbers, text, lists, objects, functions and quoted
//! syntax trees; arithmetic broadcasts over lists, and functions that
//! receive syntax trees act as macros.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::interpreter::evaluator::{core::evaluate, environment::Environment};

/// Defines the structure of parsed code.
///
/// This module declares the `Ast` enum: literals, identifiers, lists,
/// expression bodies, binary operations and quoted trees. The same type is
/// the parser's output, the evaluator's input, and a runtime value that
/// programs can inspect and rebuild.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// # Responsibilities
/// - Defines error enums for every failure mode of the lexer, parser and
///   evaluator.
/// - Wraps parse errors raised during evaluation so callers see one type.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations and the builtin library to provide a complete runtime.
///
/// # Responsibilities
/// - Coordinates the lexer, parser, evaluator and value types.
/// - Provides entry points for parsing and evaluating user code.
/// - Installs the native builtins and the standard library.
pub mod interpreter;
/// General utilities for numeric conversion and stack growth.
pub mod util;

/// Evaluates `source` in a fresh environment with the standard library.
///
/// When `auto_print` is set, the value of the last statement is printed to
/// standard output.
///
/// # Errors
/// Returns the first lexing, parsing or runtime error.
///
/// # Examples
/// ```
/// use tbl::run;
///
/// assert!(run("x : 2 + 2; x * x", false).is_ok());
///
/// // `y` is not bound.
/// assert!(run("x : y + 1", false).is_err());
/// ```
pub fn run(source: &str, auto_print: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env = Environment::standard()?;
    let value = evaluate(source, &env)?;

    if auto_print {
        println!("{value}");
    }

    Ok(())
}
