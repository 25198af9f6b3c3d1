use std::fmt::{self, Display};

use crate::interpreter::value::complex::ComplexNumber;

/// One piece of a text literal.
///
/// Text literals are stored as the sequence of pieces they evaluate to:
/// literal runs (with escapes already substituted) and embedded expressions
/// whose values are stringified and spliced in.
#[derive(Debug, Clone, PartialEq)]
pub enum TextSegment {
    /// A run of characters copied verbatim into the result.
    Literal(String),
    /// An embedded `{...}` expression.
    Splice(Ast),
}

/// A text literal together with the source it was read from.
///
/// The source is kept so the literal can be re-serialized exactly as it was
/// written, escapes included.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLiteral {
    /// The body between the outer braces, as written.
    pub source:   String,
    /// The evaluated pieces of the body.
    pub segments: Vec<TextSegment>,
}

impl TextLiteral {
    /// Builds a literal with no interpolation from already-unescaped text.
    #[must_use]
    pub fn plain(text: &str) -> Self {
        Self { source:   escape_text(text),
               segments: vec![TextSegment::Literal(text.to_string())], }
    }
}

/// An abstract syntax tree node.
///
/// Nodes are produced by the parser, by quoting, and by macro code that
/// assembles programs at runtime. The tree is owned: cloning a node deep
/// copies every child, so a duplicate never shares structure with its
/// original.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    /// A sequence of statements; evaluates to the value of the last one.
    ExprBody(Vec<Self>),
    /// A list literal.
    List(Vec<Self>),
    /// A complex number literal.
    Number {
        /// Real part.
        real:      f64,
        /// Imaginary part.
        imaginary: f64,
    },
    /// A text literal, possibly with interpolation.
    Text(TextLiteral),
    /// A reference to a binding.
    Identifier(String),
    /// A binary operation `left operator right`.
    Operation {
        /// The operator token, exactly as written.
        operator: String,
        /// Left operand.
        left:     Box<Self>,
        /// Right operand.
        right:    Box<Self>,
    },
    /// A quoted node; evaluates to a copy of the wrapped node.
    Quoted(Box<Self>),
}

impl Ast {
    /// Builds an operation node.
    ///
    /// # Example
    /// ```
    /// use tbl::ast::Ast;
    ///
    /// let sum = Ast::operation("+", Ast::number(1.0), Ast::identifier("x"));
    /// assert_eq!(sum.to_string(), "1 + x");
    /// ```
    #[must_use]
    pub fn operation(operator: &str, left: Self, right: Self) -> Self {
        Self::Operation { operator: operator.to_string(),
                          left:     Box::new(left),
                          right:    Box::new(right), }
    }

    /// Builds an identifier node.
    #[must_use]
    pub fn identifier(name: &str) -> Self {
        Self::Identifier(name.to_string())
    }

    /// Builds a real number literal.
    #[must_use]
    pub const fn number(real: f64) -> Self {
        Self::Number { real,
                       imaginary: 0.0 }
    }

    /// The identifier name, if this node is an identifier.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// Short name of the node kind, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ExprBody(_) => "expression body",
            Self::List(_) => "list node",
            Self::Number { .. } => "number node",
            Self::Text(_) => "text node",
            Self::Identifier(_) => "identifier",
            Self::Operation { .. } => "operation",
            Self::Quoted(_) => "quoted node",
        }
    }
}

/// Escapes the characters that would otherwise open, close or escape inside
/// a text literal.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '{' | '}' | '\\' => {
                out.push('\\');
                out.push(c);
            },
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Writes a real number the way the lexer reads it back (`~` for negation).
fn write_real(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value < 0.0 {
        write!(f, "~{}", -value)
    } else {
        write!(f, "{value}")
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, node: &Ast) -> fmt::Result {
    match node {
        Ast::Operation { .. } => write!(f, "({node})"),
        _ => write!(f, "{node}"),
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, nodes: &[Ast], separator: &str) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{node}")?;
    }
    Ok(())
}

/// Re-serializes the node as source text that parses back to an equivalent
/// tree.
impl Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExprBody(statements) => {
                f.write_str("(")?;
                write_joined(f, statements, "; ")?;
                f.write_str(")")
            },
            Self::List(elements) => {
                f.write_str("[")?;
                write_joined(f, elements, ", ")?;
                f.write_str("]")
            },
            Self::Number { real, imaginary } => {
                let number = ComplexNumber::new(*real, *imaginary);
                if number.is_real_strict() {
                    write_real(f, *real)
                } else if number.is_imaginary_strict() {
                    write_real(f, *imaginary)?;
                    f.write_str("i")
                } else {
                    f.write_str("(")?;
                    write_real(f, *real)?;
                    f.write_str(" + ")?;
                    write_real(f, *imaginary)?;
                    f.write_str("i)")
                }
            },
            Self::Text(text) => write!(f, "{{{}}}", text.source),
            Self::Identifier(name) => f.write_str(name),
            Self::Operation { operator, left, right } => {
                write_operand(f, left)?;
                write!(f, " {operator} ")?;
                write_operand(f, right)
            },
            Self::Quoted(inner) => write!(f, "`{{{inner}}}"),
        }
    }
}
