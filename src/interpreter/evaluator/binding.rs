use std::rc::Rc;

use crate::{
    ast::Ast,
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, environment::Environment},
        value::core::Value,
    },
};

impl Environment {
    /// Evaluates `target : value`.
    ///
    /// An identifier target replaces the visible binding of that name. A
    /// list of identifiers destructures: a list value of the same length is
    /// spread over the names, a list of one element or any non-list value is
    /// copied to every name, each copy independent of the others.
    ///
    /// Functions remember every name they are bound to so that their body
    /// can call them recursively.
    ///
    /// # Returns
    /// The right hand value.
    ///
    /// # Errors
    /// `RuntimeError::InvalidAssignment` for any other target, and for a
    /// list value whose length matches neither the targets nor one.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
    ///
    /// let env = Environment::with_builtins();
    /// evaluate("[a, b] : [1, 2]; [c, d] : [[0]]", &env).unwrap();
    /// assert_eq!(evaluate("[a, b]", &env).unwrap().to_string(), "[1, 2]");
    ///
    /// // Broadcast copies do not share storage.
    /// evaluate("push @ [c, 9]", &env).unwrap();
    /// assert_eq!(evaluate("[c, d]", &env).unwrap().to_string(), "[[0, 9], [0]]");
    /// ```
    pub(crate) fn eval_bind(self: &Rc<Self>, target: &Ast, value: &Ast) -> EvalResult<Value> {
        match target {
            Ast::Identifier(name) => {
                let value = self.eval(value)?;
                self.assign(name, value.clone());
                Ok(value)
            },
            Ast::List(targets) => {
                let names = targets.iter()
                                   .map(|t| {
                                       t.as_identifier().map(str::to_string).ok_or_else(|| {
                                           RuntimeError::InvalidAssignment { details: format!("{t} is not an identifier") }
                                       })
                                   })
                                   .collect::<EvalResult<Vec<_>>>()?;

                let value = self.eval(value)?;
                let values = match &value {
                    Value::List(list) => {
                        let list = list.borrow();
                        if list.len() == names.len() {
                            list.clone()
                        } else if let [only] = list.as_slice() {
                            names.iter().map(|_| only.duplicate()).collect::<EvalResult<Vec<_>>>()?
                        } else {
                            return Err(RuntimeError::InvalidAssignment { details: format!("{} names can not take {} values",
                                                                                          names.len(),
                                                                                          list.len()) });
                        }
                    },
                    other => names.iter().map(|_| other.duplicate()).collect::<EvalResult<Vec<_>>>()?,
                };

                for (name, value) in names.iter().zip(values) {
                    self.assign(name, value);
                }
                Ok(value)
            },
            other => Err(RuntimeError::InvalidAssignment { details: format!("can not bind to {}", other.kind()) }),
        }
    }

    fn assign(&self, name: &str, value: Value) {
        if let Value::Function(function) = &value {
            function.borrow_mut().anchor(name);
        }
        self.bind(name, value);
    }
}
