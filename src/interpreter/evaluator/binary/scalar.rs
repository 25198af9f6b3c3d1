use std::cmp::Ordering;

use crate::interpreter::{
    evaluator::{
        binary::core::{BinaryOperator, invalid_arguments},
        core::EvalResult,
        environment::Environment,
    },
    value::{complex::ComplexNumber, core::Value},
};

impl Environment {
    /// Evaluates an operation between two numbers.
    ///
    /// Arithmetic follows complex rules; a quotient of two strictly real
    /// numbers uses host division, so `1 / 0` is infinite rather than an
    /// error. `%` only accepts operands that are real within tolerance.
    /// Orderings use [`ComplexNumber::compare`]: `<=` is `<` or fuzzy equal,
    /// `>` is not `<=`, and `>=` is not `<`.
    ///
    /// # Errors
    /// - `RuntimeError::InvalidArguments` for `%` on complex operands.
    /// - `RuntimeError::InvalidArgument` for zero raised to a negative or
    ///   complex power.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::{
    ///     evaluator::{binary::core::BinaryOperator, environment::Environment},
    ///     value::complex::ComplexNumber,
    /// };
    ///
    /// let i = ComplexNumber::new(0.0, 1.0);
    /// let r = Environment::eval_scalar_op(BinaryOperator::Mul, i, i).unwrap();
    /// assert_eq!(r.to_string(), "-1");
    ///
    /// let r = Environment::eval_scalar_op(BinaryOperator::Mod, 7.0.into(), 3.0.into()).unwrap();
    /// assert_eq!(r.to_string(), "1");
    /// ```
    pub fn eval_scalar_op(op: BinaryOperator, a: ComplexNumber, b: ComplexNumber) -> EvalResult<Value> {
        use BinaryOperator::{
            Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Pow, Sub,
        };

        let result = match op {
            Pow => a.pow(b)?,
            Mul => a * b,
            Div => a / b,
            Add => a + b,
            Sub => a - b,
            Mod => a.checked_rem(b)
                    .ok_or_else(|| invalid_arguments(op, &Value::from(a), &Value::from(b)))?,
            Less | Greater | LessEqual | GreaterEqual => {
                ComplexNumber::from_bool(Self::compare_numbers(op, a, b))
            },
            Equal => ComplexNumber::from_bool(a.fuzzy_eq(&b)),
            NotEqual => ComplexNumber::from_bool(!a.fuzzy_eq(&b)),
        };

        Ok(Value::from(result))
    }

    /// Orders two numbers for one of the four ordering operators.
    #[must_use]
    pub fn compare_numbers(op: BinaryOperator, a: ComplexNumber, b: ComplexNumber) -> bool {
        let less = a.compare(&b) == Ordering::Less;
        let less_equal = less || a.fuzzy_eq(&b);

        match op {
            BinaryOperator::Less => less,
            BinaryOperator::LessEqual => less_equal,
            BinaryOperator::Greater => !less_equal,
            BinaryOperator::GreaterEqual => !less,
            _ => false,
        }
    }
}
