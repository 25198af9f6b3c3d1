use std::rc::Rc;

use crate::{
    ast::Ast,
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, environment::Environment},
        parser::precedence::{Associativity, OPERATOR_BIND, OperatorDefinition, UserOperator},
        value::core::Value,
    },
};

impl Environment {
    /// Evaluates `{op} << form` or `{op} <<< form`.
    ///
    /// The left operand must evaluate to the operator text. The right
    /// operand is one of:
    /// - `f`: precedence 0, left associative.
    /// - `[p, f]`: precedence `p`, left associative.
    /// - `[p, assoc, f]`: with `assoc` the text `left` or `right`.
    /// - `[p, assoc, f, _, _]`: as above, overwriting the associativity of
    ///   an existing level instead of failing.
    ///
    /// `f` must be a builtin or take two arguments. `<<` operators receive
    /// their evaluated operands; `<<<` operators receive the operand trees.
    ///
    /// # Returns
    /// The implementing function.
    ///
    /// # Errors
    /// Type errors for a malformed definition, plus everything
    /// [`OperatorTable::define`](crate::interpreter::parser::precedence::OperatorTable::define)
    /// reports.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
    ///
    /// let env = Environment::with_builtins();
    /// let src = "{++} << [4, [a, b] -> concat @ [a, b]]; [1] ++ [2] ++ [3]";
    /// assert_eq!(evaluate(src, &env).unwrap().to_string(), "[1, 2, 3]");
    ///
    /// // Level 4 associates to the left.
    /// assert!(evaluate("{+++} << [4, {right}, [a, b] -> a]", &env).is_err());
    /// ```
    pub(crate) fn eval_operator_definition(self: &Rc<Self>,
                                           operator: &str,
                                           left: &Ast,
                                           right: &Ast)
                                           -> EvalResult<Value> {
        let token = self.eval(left)?.as_text("operator name")?;
        let form = self.eval(right)?;

        let (precedence, associativity, function, force) = match &form {
            Value::List(list) => match list.borrow().as_slice() {
                [p, f] => (p.clone(), None, f.clone(), false),
                [p, a, f] => (p.clone(), Some(a.clone()), f.clone(), false),
                [p, a, f, _, _] => (p.clone(), Some(a.clone()), f.clone(), true),
                other => {
                    return Err(RuntimeError::type_error(format!("an operator definition takes 2, 3 or 5 elements, found {}",
                                                                other.len())));
                },
            },
            other => (Value::default(), None, other.clone(), false),
        };

        let precedence = precedence.as_real("precedence index")?;
        let associativity = match associativity {
            Some(a) => Associativity::parse(&a.as_text("associativity")?)?,
            None => Associativity::Left,
        };
        check_binary(&function, operator)?;

        self.operators_mut()
            .define(OperatorDefinition { token,
                                         precedence,
                                         associativity,
                                         force,
                                         operator: UserOperator { function: function.clone(),
                                                                  eager:    operator == OPERATOR_BIND, }, })?;
        Ok(function)
    }

    /// Applies a user defined operator to the operands of an operation node.
    ///
    /// Eager operators see values; macro operators see copies of the operand
    /// trees as nodes.
    pub(crate) fn apply_user_operator(self: &Rc<Self>,
                                      user: &UserOperator,
                                      left: &Ast,
                                      right: &Ast)
                                      -> EvalResult<Value> {
        let args = if user.eager {
            vec![self.eval(left)?, self.eval(right)?]
        } else {
            vec![Value::from(left.clone()), Value::from(right.clone())]
        };

        self.apply(&user.function, args)
    }
}

/// Checks that `function` can be applied to two operands.
fn check_binary(function: &Value, operator: &str) -> EvalResult<()> {
    match function {
        Value::Builtin(_) => Ok(()),
        Value::Function(f) => {
            let f = f.borrow();
            let count = f.params.len();
            if count == 2 || (f.variadic && matches!(count, 1 | 2)) {
                Ok(())
            } else {
                Err(RuntimeError::ArgumentCountMismatch { expected: "2".to_string(),
                                                          found:    count, })
            }
        },
        _ => Err(RuntimeError::NotCallable { details: format!("the implementation given to {operator}") }),
    }
}
