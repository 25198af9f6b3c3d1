use std::fmt;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, environment::Environment},
        value::{ancestors::Ancestors, core::Value},
    },
};

/// The arithmetic and comparison operators implemented natively.
///
/// Every other operator is either a language construct handled by the
/// evaluator directly or a user defined operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `^`
    Pow,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `=`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
}

impl BinaryOperator {
    /// Looks up the operator spelled `token`.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::evaluator::binary::core::BinaryOperator;
    ///
    /// assert_eq!(BinaryOperator::from_token("<="), Some(BinaryOperator::LessEqual));
    /// assert_eq!(BinaryOperator::from_token("<>"), None);
    /// ```
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "^" => Self::Pow,
            "*" => Self::Mul,
            "/" => Self::Div,
            "%" => Self::Mod,
            "+" => Self::Add,
            "-" => Self::Sub,
            "=" => Self::Equal,
            "!=" => Self::NotEqual,
            "<" => Self::Less,
            ">" => Self::Greater,
            "<=" => Self::LessEqual,
            ">=" => Self::GreaterEqual,
            _ => return None,
        })
    }

    /// The operator's source spelling.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Pow => "^",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Equal => "=",
            Self::NotEqual => "!=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
        }
    }

    /// Whether the operator is one of the four orderings.
    #[must_use]
    pub const fn is_ordering(self) -> bool {
        matches!(self, Self::Less | Self::Greater | Self::LessEqual | Self::GreaterEqual)
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl Environment {
    /// Evaluates a native binary operation between two values.
    ///
    /// The first matching rule wins:
    /// 1. `=` and `!=` compare; see `eval_equality`.
    /// 2. `+` with text on either side concatenates display forms.
    /// 3. Two numbers use complex arithmetic or ordering.
    /// 4. A list on either side broadcasts element by element.
    /// 5. Text times a number repeats the text.
    /// 6. Two texts order lexicographically.
    ///
    /// Anything else is `RuntimeError::InvalidArguments`. Broadcasting over a
    /// list that contains itself is `RuntimeError::CyclicValue`.
    ///
    /// # Parameters
    /// - `op`: The operator.
    /// - `left`: Left operand.
    /// - `right`: Right operand.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the evaluated result.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::{
    ///     evaluator::{binary::core::BinaryOperator, environment::Environment},
    ///     value::core::Value,
    /// };
    ///
    /// let list = Value::from(vec![Value::from(1.0), Value::from(2.0)]);
    /// let result = Environment::eval_binary(BinaryOperator::Mul, &list, &Value::from(3.0)).unwrap();
    /// assert_eq!(result.to_string(), "[3, 6]");
    ///
    /// let text = Environment::eval_binary(BinaryOperator::Add, &Value::from("n = "), &list).unwrap();
    /// assert_eq!(text.to_string(), "n = [1, 2]");
    /// ```
    pub fn eval_binary(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
        Self::eval_binary_within(op, left, right, &Ancestors::default(), &Ancestors::default())
    }

    fn eval_binary_within(op: BinaryOperator,
                          left: &Value,
                          right: &Value,
                          lefts: &Ancestors,
                          rights: &Ancestors)
                          -> EvalResult<Value> {
        use BinaryOperator::{Add, Equal, Mul, NotEqual};
        use Value::{List, Number, Text};

        match (op, left, right) {
            (Equal | NotEqual, ..) => Self::eval_equality(op, left, right),
            (Add, Text(_), _) | (Add, _, Text(_)) => Ok(Self::concat_text(left, right)),
            (_, Number(a), Number(b)) => Self::eval_scalar_op(op, *a, *b),
            (_, List(_), _) | (_, _, List(_)) => {
                let _open = (lefts.enter(left, "broadcast over")?, rights.enter(right, "broadcast over")?);
                Self::map_list_binary(left, right, &|l, r| Self::eval_binary_within(op, l, r, lefts, rights))
            },
            (Mul, Text(text), Number(count)) => Self::repeat_text(&text.borrow(), *count),
            (_, Text(a), Text(b)) if op.is_ordering() => {
                Ok(Self::compare_text(op, &a.borrow(), &b.borrow()))
            },
            _ => Err(invalid_arguments(op, left, right)),
        }
    }
}

/// The error for an operand pair no rule accepts.
pub(super) fn invalid_arguments(op: BinaryOperator, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::InvalidArguments { operator: op.to_string(),
                                     left:     left.to_string(),
                                     right:    right.to_string(), }
}
