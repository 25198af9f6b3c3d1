use std::rc::Rc;

use crate::{
    ast::Ast,
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, environment::Environment},
        parser::precedence::{CONDITIONAL, FOR},
        value::core::Value,
    },
};

/// A one element list used as a loop operand is a grouping, not a list.
fn grouped(ast: &Ast) -> &Ast {
    match ast {
        Ast::List(items) if items.len() == 1 => &items[0],
        other => other,
    }
}

impl Environment {
    /// Evaluates `condition ? [then, else]`.
    ///
    /// Only the chosen branch is evaluated.
    ///
    /// # Errors
    /// `RuntimeError::TypeError` unless the right operand is a list literal
    /// of exactly two branches.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
    ///
    /// let env = Environment::with_builtins();
    /// assert_eq!(evaluate("1 < 2 ? [{yes}, undefined_name]", &env).unwrap().to_string(), "yes");
    /// assert!(evaluate("1 ? [2]", &env).is_err());
    /// ```
    pub(crate) fn eval_conditional(self: &Rc<Self>, condition: &Ast, branches: &Ast) -> EvalResult<Value> {
        let Ast::List(branches) = branches else {
            return Err(RuntimeError::type_error(format!("the branches of {CONDITIONAL} must be a list literal")));
        };
        let [then_branch, else_branch] = branches.as_slice() else {
            return Err(RuntimeError::type_error(format!("{CONDITIONAL} takes exactly two branches, found {}",
                                                        branches.len())));
        };

        if self.eval(condition)?.is_truthy() {
            self.eval(then_branch)
        } else {
            self.eval(else_branch)
        }
    }

    /// Evaluates `condition !! body`.
    ///
    /// Re-evaluates `condition` before each round and stops once it is
    /// falsy. Evaluates to the last body value, or `0` if the body never
    /// ran.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
    ///
    /// let env = Environment::with_builtins();
    /// assert_eq!(evaluate("i : 0; [i < 3] !! [i : i + 1]", &env).unwrap().to_string(), "3");
    /// assert_eq!(evaluate("0 !! [1]", &env).unwrap().to_string(), "0");
    /// ```
    pub(crate) fn eval_while(self: &Rc<Self>, condition: &Ast, body: &Ast) -> EvalResult<Value> {
        let (condition, body) = (grouped(condition), grouped(body));

        let mut last = Value::default();
        while self.eval(condition)?.is_truthy() {
            last = self.eval(body)?;
        }
        Ok(last)
    }

    /// Evaluates `[init, condition, update] # body`.
    ///
    /// Runs `init` once, then alternates checking `condition`, running
    /// `body` and running `update`. Evaluates to the last body value, or `0`
    /// if the body never ran.
    ///
    /// # Errors
    /// `RuntimeError::TypeError` unless the head is a list literal of three
    /// clauses.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
    ///
    /// let env = Environment::with_builtins();
    /// let src = "s : 0; [i : 1, i <= 4, i : i + 1] # [s : s + i]";
    /// assert_eq!(evaluate(src, &env).unwrap().to_string(), "10");
    /// ```
    pub(crate) fn eval_for(self: &Rc<Self>, head: &Ast, body: &Ast) -> EvalResult<Value> {
        let Ast::List(clauses) = head else {
            return Err(RuntimeError::type_error(format!("the head of {FOR} must be a list literal")));
        };
        let [init, condition, update] = clauses.as_slice() else {
            return Err(RuntimeError::type_error(format!("the head of {FOR} takes three clauses, found {}",
                                                        clauses.len())));
        };
        let body = grouped(body);

        self.eval(init)?;
        let mut last = Value::default();
        while self.eval(condition)?.is_truthy() {
            last = self.eval(body)?;
            self.eval(update)?;
        }
        Ok(last)
    }
}
