use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::core::BinaryOperator,
            core::EvalResult,
            environment::Environment,
        },
        value::{complex::ComplexNumber, core::Value},
    },
    util::num::f64_to_usize_checked,
};

impl Environment {
    /// Concatenates the display forms of two values.
    #[must_use]
    pub fn concat_text(left: &Value, right: &Value) -> Value {
        Value::from(format!("{left}{right}"))
    }

    /// Repeats `text` `count` times.
    ///
    /// # Errors
    /// `RuntimeError::TypeError` unless `count` is a non-negative integer
    /// with no imaginary part.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::evaluator::environment::Environment;
    ///
    /// assert_eq!(Environment::repeat_text("ab", 3.0.into()).unwrap().to_string(), "ababab");
    /// assert!(Environment::repeat_text("ab", 1.5.into()).is_err());
    /// ```
    pub fn repeat_text(text: &str, count: ComplexNumber) -> EvalResult<Value> {
        if !count.is_real_strict() {
            return Err(RuntimeError::type_error(format!("can not repeat text {count} times")));
        }
        let count = f64_to_usize_checked(count.real, "repeat count")
            .map_err(|_| RuntimeError::type_error(format!("can not repeat text {count} times")))?;

        Ok(Value::from(text.repeat(count)))
    }

    /// Orders two texts lexicographically.
    #[must_use]
    pub fn compare_text(op: BinaryOperator, a: &str, b: &str) -> Value {
        let holds = match op {
            BinaryOperator::Less => a < b,
            BinaryOperator::LessEqual => a <= b,
            BinaryOperator::Greater => a > b,
            BinaryOperator::GreaterEqual => a >= b,
            _ => false,
        };
        Value::from(holds)
    }
}
