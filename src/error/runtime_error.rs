use thiserror::Error;

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Error)]
/// Represents all errors that can occur during evaluation.
pub enum RuntimeError {
    /// Parsing of nested source (interpolations, `eval`) failed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Tried to read an identifier with no live binding.
    #[error("{name} is not defined.")]
    UnboundIdentifier {
        /// The name of the identifier.
        name: String,
    },
    /// The target of a binding was not an identifier or a list of them.
    #[error("Invalid assignment: {details}.")]
    InvalidAssignment {
        /// Details about the target.
        details: String,
    },
    /// A value had an unexpected or incompatible type.
    #[error("Type error: {details}.")]
    TypeError {
        /// Details about the type mismatch.
        details: String,
    },
    /// No arithmetic or comparison rule accepts this operand pair.
    #[error("Invalid arguments {left} {operator} {right}.")]
    InvalidArguments {
        /// The operator token.
        operator: String,
        /// Display form of the left operand.
        left:     String,
        /// Display form of the right operand.
        right:    String,
    },
    /// An element-wise operation received lists of different lengths.
    #[error("Lists are of unequal length: {left} vs {right}.")]
    UnequalLength {
        /// Length of the left list.
        left:  usize,
        /// Length of the right list.
        right: usize,
    },
    /// A non-function value was used where a function is required.
    #[error("{details} must be a function.")]
    NotCallable {
        /// What was expected to be callable.
        details: String,
    },
    /// The wrong number of arguments was supplied to a function.
    #[error("Invalid number of arguments: expected {expected}, found {found}.")]
    ArgumentCountMismatch {
        /// Human readable expectation such as `2` or `at least 1`.
        expected: String,
        /// The number of arguments supplied.
        found:    usize,
    },
    /// An argument was invalid for the builtin receiving it.
    #[error("Invalid argument: {details}.")]
    InvalidArgument {
        /// Details about why the argument is invalid.
        details: String,
    },
    /// Tried to access an element outside the collection.
    #[error("Index out of range: {index} is not below {len}.")]
    IndexOutOfBounds {
        /// The index that was requested.
        index: f64,
        /// The length of the collection.
        len:   usize,
    },
    /// Tried to pop from an empty collection.
    #[error("Can not pop an empty {kind}.")]
    EmptyPop {
        /// The kind of collection.
        kind: &'static str,
    },
    /// An object lookup used a missing key.
    #[error("Could not find key \"{key}\" in object.")]
    KeyNotFound {
        /// The missing key.
        key: String,
    },
    /// An operator was registered at a level with a different associativity.
    #[error("Operators of precedence {precedence} associate {current}, not {requested}. Bind again with a list of five elements to force it.")]
    AssociativityConflict {
        /// The precedence level index.
        precedence: usize,
        /// The associativity the level already has.
        current:    String,
        /// The associativity that was requested.
        requested:  String,
    },
    /// A precedence index was negative, non-real or out of range.
    #[error("Invalid precedence: {details}.")]
    InvalidPrecedence {
        /// Details about the index.
        details: String,
    },
    /// An operator definition named an invalid or reserved operator.
    #[error("Invalid operator definition: {details}.")]
    InvalidOperator {
        /// Details about the operator text.
        details: String,
    },
    /// An operation node carried an operator nothing implements.
    #[error("Unrecognized operator {operator}.")]
    UnknownOperator {
        /// The operator token.
        operator: String,
    },
    /// The call stack grew past the configured limit.
    #[error("Maximum call depth of {depth} exceeded.")]
    RecursionLimit {
        /// The configured limit.
        depth: usize,
    },
    /// A list or object was walked that contains itself.
    #[error("Can not {operation} a value that contains itself.")]
    CyclicValue {
        /// What the walk was doing, such as `copy` or `compare`.
        operation: String,
    },
    /// An error raised from user code with `throw`.
    #[error("{message}")]
    User {
        /// The message supplied by the program.
        message: String,
    },
}

impl RuntimeError {
    /// Shorthand for a [`RuntimeError::TypeError`].
    pub fn type_error(details: impl Into<String>) -> Self {
        Self::TypeError { details: details.into() }
    }

    /// Shorthand for a [`RuntimeError::InvalidArgument`].
    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Self::InvalidArgument { details: details.into() }
    }
}
