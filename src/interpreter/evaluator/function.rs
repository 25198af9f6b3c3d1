use std::rc::Rc;

use crate::{
    ast::Ast,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            environment::{Environment, FrameGuard},
        },
        parser::precedence::{APPLICATION, PARTIAL, VARIADIC_DEFINITION},
        value::{
            core::Value,
            function::{Builtin, Function},
        },
    },
};

/// Name under which a running function can reach itself.
pub const RECURSION: &str = "$";

/// Placeholder marking an open slot in a partial application.
pub const SLOT: &str = "_";

impl Environment {
    /// Evaluates `params -> body` or `params => body`.
    ///
    /// The head is a single identifier or a list of identifiers. The new
    /// function captures a snapshot of the binding stacks visible here, so
    /// later rebinding in this environment does not change it.
    ///
    /// # Errors
    /// `RuntimeError::TypeError` when the head is anything else.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
    ///
    /// let env = Environment::with_builtins();
    /// let src = "x : 1; f : [] -> x; x : 2; f @ []";
    /// assert_eq!(evaluate(src, &env).unwrap().to_string(), "1");
    ///
    /// let src = "g : [a, rest] => len @ [rest]; g @ [1, 2, 3]";
    /// assert_eq!(evaluate(src, &env).unwrap().to_string(), "2");
    /// ```
    pub(crate) fn eval_definition(self: &Rc<Self>, operator: &str, head: &Ast, body: &Ast) -> EvalResult<Value> {
        let params = match head {
            Ast::Identifier(name) => vec![name.clone()],
            Ast::List(items) => items.iter()
                                     .map(|p| {
                                         p.as_identifier().map(str::to_string).ok_or_else(|| {
                                             RuntimeError::type_error(format!("parameter {p} is not an identifier"))
                                         })
                                     })
                                     .collect::<EvalResult<Vec<_>>>()?,
            other => {
                return Err(RuntimeError::type_error(format!("a function head must be an identifier or a list of them, found {}",
                                                            other.kind())));
            },
        };

        let closure = Rc::new(self.snapshot());
        Ok(Value::from(Function::new(params, body.clone(), closure, operator == VARIADIC_DEFINITION)))
    }

    /// Evaluates `f @ args` and its scoped forms `f @! args`, `f @!! args`,
    /// and so on.
    ///
    /// A list right operand supplies the arguments; anything else is a
    /// single argument. Plain application runs the function in a fresh
    /// child environment. With `k` scope markers the arguments are still
    /// evaluated here, but the body runs directly in the environment `k - 1`
    /// levels up, so its bindings are visible to, and outlive, the call.
    ///
    /// # Errors
    /// `RuntimeError::NotCallable` when the left operand is not a function,
    /// plus everything [`Environment::apply`] reports.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
    ///
    /// let env = Environment::with_builtins();
    /// assert_eq!(evaluate("(a -> a * a) @ 5", &env).unwrap().to_string(), "25");
    ///
    /// // A scoped application binds in the caller's environment.
    /// let src = "set_y : [] -> (y : 7); set_y @! []; y";
    /// assert_eq!(evaluate(src, &env).unwrap().to_string(), "7");
    /// ```
    pub(crate) fn eval_application(self: &Rc<Self>, operator: &str, left: &Ast, right: &Ast) -> EvalResult<Value> {
        let callee = self.eval(left)?;
        if !callee.is_callable() {
            return Err(RuntimeError::NotCallable { details: format!("the left operand of {operator}") });
        }

        let args = match self.eval(right)? {
            Value::List(list) => list.borrow().clone(),
            other => vec![other],
        };

        match operator.len() - APPLICATION.len() {
            0 => self.apply(&callee, args),
            markers => self.ancestor(markers - 1).call(&callee, args, false),
        }
    }

    /// Applies a function or builtin to already evaluated arguments in a
    /// fresh child environment.
    ///
    /// Builtins receive the arguments as they are. A function first checks
    /// its arity, then runs with its parameters bound, its own name(s) and
    /// `$` bound to itself.
    ///
    /// # Errors
    /// - `RuntimeError::NotCallable` for values that can not be applied.
    /// - `RuntimeError::ArgumentCountMismatch` for the wrong number of
    ///   arguments.
    /// - `RuntimeError::RecursionLimit` when applications nest too deeply.
    pub fn apply(self: &Rc<Self>, callee: &Value, args: Vec<Value>) -> EvalResult<Value> {
        self.call(callee, args, true)
    }

    #[tracing::instrument(level = "trace", skip_all, fields(args = args.len(), fresh = fresh))]
    fn call(self: &Rc<Self>, callee: &Value, args: Vec<Value>, fresh: bool) -> EvalResult<Value> {
        let function = match callee {
            Value::Builtin(builtin) => return builtin.call(args, self),
            Value::Function(f) => f.borrow().clone(),
            other => return Err(RuntimeError::NotCallable { details: format!("a value of type {}", other.type_name()) }),
        };

        if !function.accepts(args.len()) {
            return Err(RuntimeError::ArgumentCountMismatch { expected: function.arity(),
                                                             found:    args.len(), });
        }

        let _depth = self.enter_call()?;
        let env = if fresh {
            Self::child(self, &function.closure)
        } else {
            Rc::clone(self)
        };

        let mut frame = FrameGuard::new(&env);
        for anchor in &function.anchors {
            frame.push(anchor, callee.clone());
        }

        let last = function.params.len().saturating_sub(1);
        let mut args = args.into_iter();
        for (i, param) in function.params.iter().enumerate() {
            let value = if function.variadic && i == last {
                Value::from(args.by_ref().collect::<Vec<_>>())
            } else {
                args.next().unwrap_or_default()
            };
            frame.push(param, value);
        }
        frame.push(RECURSION, callee.clone());

        env.eval(&function.body)
    }

    /// Evaluates `f ' [fixed, _, ...]`.
    ///
    /// The fixed arguments are evaluated once, now. The result is a builtin
    /// that fills each `_` slot from its own arguments, left to right,
    /// appends any surplus, and applies `f`.
    ///
    /// # Errors
    /// `RuntimeError::NotCallable` when the left operand is not a function.
    /// The resulting builtin reports `RuntimeError::ArgumentCountMismatch`
    /// when called with fewer arguments than slots.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
    ///
    /// let env = Environment::with_builtins();
    /// let src = "sub : [a, b] -> a - b; from_ten : sub'[10, _]; from_ten @ 4";
    /// assert_eq!(evaluate(src, &env).unwrap().to_string(), "6");
    /// ```
    pub(crate) fn eval_partial(self: &Rc<Self>, left: &Ast, right: &Ast) -> EvalResult<Value> {
        let callee = self.eval(left)?;
        if !callee.is_callable() {
            return Err(RuntimeError::NotCallable { details: format!("the left operand of {PARTIAL}") });
        }

        let templates = match right {
            Ast::List(items) => items.as_slice(),
            other => std::slice::from_ref(other),
        };
        let fixed = templates.iter()
                             .map(|t| match t {
                                 Ast::Identifier(name) if name == SLOT => Ok(None),
                                 t => self.eval(t).map(Some),
                             })
                             .collect::<EvalResult<Vec<_>>>()?;
        let slots = fixed.iter().filter(|f| f.is_none()).count();
        let name = format!("{callee}{PARTIAL}{right}");

        Ok(Value::from(Builtin::new(&name, move |args, env| {
                           if args.len() < slots {
                               return Err(RuntimeError::ArgumentCountMismatch { expected: format!("at least {slots}"),
                                                                                found:    args.len(), });
                           }

                           let mut supplied = args.into_iter();
                           let mut full = fixed.iter()
                                               .map(|f| match f {
                                                   Some(value) => value.clone(),
                                                   None => supplied.next().unwrap_or_default(),
                                               })
                                               .collect::<Vec<_>>();
                           full.extend(supplied);

                           env.apply(&callee, full)
                       })))
    }
}
