use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, environment::Environment},
        value::core::Value,
    },
};

impl Environment {
    /// Applies an elementwise binary operation where at least one side is a
    /// list.
    ///
    /// - List with list: the lengths must agree and elements pair up.
    /// - List with anything else: the other side pairs with every element.
    ///
    /// Each pair is passed to `f`, which normally recurses into
    /// `eval_binary`, so nested lists broadcast at every depth. The result
    /// is always a new list.
    ///
    /// # Errors
    /// `RuntimeError::UnequalLength` when two lists differ in length, and
    /// whatever `f` returns for a pair.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::{
    ///     evaluator::{binary::core::BinaryOperator, environment::Environment},
    ///     value::core::Value,
    /// };
    ///
    /// let left = Value::from(vec![Value::from(1.0), Value::from(2.0)]);
    /// let right = Value::from(vec![Value::from(10.0), Value::from(20.0)]);
    ///
    /// let r = Environment::map_list_binary(&left, &right, &|l, r| {
    ///             Environment::eval_binary(BinaryOperator::Add, l, r)
    ///         }).unwrap();
    /// assert_eq!(r.to_string(), "[11, 22]");
    /// ```
    pub fn map_list_binary<F>(left: &Value, right: &Value, f: &F) -> EvalResult<Value>
        where F: Fn(&Value, &Value) -> EvalResult<Value>
    {
        // Copy the handles out so `f` may touch the same lists.
        let out = match (left, right) {
            (Value::List(l), Value::List(r)) => {
                let (l, r) = (l.borrow().clone(), r.borrow().clone());
                if l.len() != r.len() {
                    return Err(RuntimeError::UnequalLength { left:  l.len(),
                                                             right: r.len(), });
                }
                l.iter().zip(r.iter()).map(|(a, b)| f(a, b)).collect::<EvalResult<Vec<_>>>()?
            },
            (Value::List(l), scalar) => {
                let l = l.borrow().clone();
                l.iter().map(|a| f(a, scalar)).collect::<EvalResult<Vec<_>>>()?
            },
            (scalar, Value::List(r)) => {
                let r = r.borrow().clone();
                r.iter().map(|b| f(scalar, b)).collect::<EvalResult<Vec<_>>>()?
            },
            (l, r) => return f(l, r),
        };

        Ok(Value::from(out))
    }
}
