use crate::interpreter::{
    evaluator::{binary::core::BinaryOperator, core::EvalResult, environment::Environment},
    value::{ancestors::Ancestors, core::Value},
};

impl Environment {
    /// Evaluates `=` or `!=`.
    ///
    /// - Two numbers compare each component within tolerance.
    /// - Two lists give a single answer: `=` holds when the lengths agree
    ///   and every pair is equal; `!=` holds when the lengths differ or any
    ///   pair is unequal.
    /// - A list against a number or text broadcasts, giving a list.
    /// - Two texts compare their characters.
    /// - Any other pair is unequal.
    ///
    /// # Errors
    /// `RuntimeError::CyclicValue` when the walk reaches a list that
    /// contains itself. No other pair fails.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::{
    ///     evaluator::{binary::core::BinaryOperator, environment::Environment},
    ///     value::core::Value,
    /// };
    ///
    /// let short = Value::from(vec![Value::from(1.0)]);
    /// let long = Value::from(vec![Value::from(1.0), Value::from(2.0)]);
    /// let equal = |l: &Value, r: &Value| Environment::eval_equality(BinaryOperator::Equal, l, r).unwrap();
    ///
    /// assert_eq!(equal(&short, &long).to_string(), "0");
    /// assert_eq!(equal(&long, &Value::from(2.0)).to_string(), "[0, 1]");
    ///
    /// let not_equal = Environment::eval_equality(BinaryOperator::NotEqual, &short, &long).unwrap();
    /// assert_eq!(not_equal.to_string(), "1");
    /// ```
    pub fn eval_equality(op: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
        Self::equality_within(op, left, right, &Ancestors::default(), &Ancestors::default())
    }

    fn equality_within(op: BinaryOperator,
                       left: &Value,
                       right: &Value,
                       lefts: &Ancestors,
                       rights: &Ancestors)
                       -> EvalResult<Value> {
        let negate = op == BinaryOperator::NotEqual;
        let _open = (lefts.enter(left, "compare")?, rights.enter(right, "compare")?);
        let pair = |l: &Value, r: &Value| Self::equality_within(op, l, r, lefts, rights);

        Ok(match (left, right) {
            (Value::Number(a), Value::Number(b)) => Value::from(a.fuzzy_eq(b) != negate),
            (Value::List(a), Value::List(b)) => {
                let (a, b) = (a.borrow().clone(), b.borrow().clone());
                if a.len() != b.len() {
                    return Ok(Value::from(negate));
                }
                let mut holds = !negate;
                for (l, r) in a.iter().zip(b.iter()) {
                    if pair(l, r)?.is_truthy() == negate {
                        holds = negate;
                        break;
                    }
                }
                Value::from(holds)
            },
            (Value::List(list), other @ (Value::Number(_) | Value::Text(_))) => {
                let list = list.borrow().clone();
                Value::from(list.iter().map(|l| pair(l, other)).collect::<EvalResult<Vec<_>>>()?)
            },
            (other @ (Value::Number(_) | Value::Text(_)), Value::List(list)) => {
                let list = list.borrow().clone();
                Value::from(list.iter().map(|r| pair(other, r)).collect::<EvalResult<Vec<_>>>()?)
            },
            (Value::Text(a), Value::Text(b)) => Value::from((*a.borrow() == *b.borrow()) != negate),
            _ => Value::from(negate),
        })
    }
}
