use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// A closing delimiter appeared without a matching opener.
    #[error("Error on line {line}: Unmatched '{delimiter}'.")]
    UnmatchedDelimiter {
        /// The closing delimiter that was found.
        delimiter: char,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// The input ended while a group was still open.
    #[error("Error on line {line}: Incomplete {group}, expected '{expected}' before end of input.")]
    IncompleteGroup {
        /// The kind of group left open (`expression`, `list` or `text`).
        group:    &'static str,
        /// The delimiter that would have closed the group.
        expected: char,
        /// The line on which the group was opened.
        line:     usize,
    },
    /// A quote glyph was not followed by a text group.
    #[error("Error on line {line}: Expected '{{' after quote.")]
    DanglingQuote {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A statement did not collapse to exactly one value.
    #[error("AST is malformed: '{statement}' does not reduce to a single value.")]
    MalformedAst {
        /// The offending statement, as written.
        statement: String,
    },
    /// An operator is missing its left or right operand.
    #[error("Operator '{operator}' is missing an operand.")]
    MissingOperand {
        /// The operator token.
        operator: String,
    },
    /// A run of operator glyphs does not name a known operator.
    #[error("Unknown operator '{token}'.")]
    UnknownOperator {
        /// The token as written.
        token: String,
    },
    /// A token could not be read as a number or identifier.
    #[error("Invalid literal '{token}'.")]
    InvalidLiteral {
        /// The token as written.
        token: String,
    },
}
