use std::{fmt, rc::Rc};

use crate::{
    ast::Ast,
    interpreter::{
        evaluator::{
            core::EvalResult,
            environment::{Bindings, Environment},
        },
        value::core::Value,
    },
};

/// Signature of a native operation.
///
/// A builtin receives its evaluated (or, for macro operators, quoted)
/// arguments and the environment it was applied in.
pub type NativeFn = dyn Fn(Vec<Value>, &Rc<Environment>) -> EvalResult<Value>;

/// A function defined in the language with `->` or `=>`.
#[derive(Clone)]
pub struct Function {
    /// Parameter names, in order.
    pub params:   Vec<String>,
    /// The body evaluated on each application.
    pub body:     Rc<Ast>,
    /// Snapshot of the binding stacks visible where the function was defined.
    pub closure:  Rc<Bindings>,
    /// Whether the last parameter collects surplus arguments as a list.
    pub variadic: bool,
    /// Names this function has been bound to.
    ///
    /// Each application rebinds the function under these names so its body
    /// can refer to itself without the closure holding a reference to it.
    pub anchors:  Vec<String>,
}

impl Function {
    /// Creates a function with no anchors.
    #[must_use]
    pub fn new(params: Vec<String>, body: Ast, closure: Rc<Bindings>, variadic: bool) -> Self {
        Self { params,
               body: Rc::new(body),
               closure,
               variadic,
               anchors: Vec::new() }
    }

    /// Records `name` as one of the names the function is bound to.
    pub fn anchor(&mut self, name: &str) {
        if !self.anchors.iter().any(|a| a == name) {
            self.anchors.push(name.to_string());
        }
    }

    /// Whether `count` arguments satisfy this function's parameter list.
    #[must_use]
    pub fn accepts(&self, count: usize) -> bool {
        if self.variadic {
            count + 1 >= self.params.len()
        } else {
            count == self.params.len()
        }
    }

    /// Human readable arity, used in argument count errors.
    #[must_use]
    pub fn arity(&self) -> String {
        if self.variadic {
            format!("at least {}", self.params.len().saturating_sub(1))
        } else {
            self.params.len().to_string()
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
         .field("params", &self.params)
         .field("body", &self.body)
         .field("variadic", &self.variadic)
         .field("anchors", &self.anchors)
         .finish_non_exhaustive()
    }
}

/// A native operation exposed to the language under a name.
pub struct Builtin {
    /// Name shown when the builtin is displayed.
    pub name: String,
    /// The native implementation.
    pub func: Box<NativeFn>,
}

impl Builtin {
    /// Wraps a native closure.
    ///
    /// # Example
    /// ```
    /// use std::rc::Rc;
    ///
    /// use tbl::interpreter::{evaluator::environment::Environment,
    ///                        value::{core::Value, function::Builtin}};
    ///
    /// let count = Builtin::new("count", |args, _env| Ok(Value::from(args.len() as f64)));
    /// let env = Rc::new(Environment::new());
    /// let result = count.call(vec![Value::from(1.0), Value::from(2.0)], &env).unwrap();
    /// assert_eq!(result, Value::from(2.0));
    /// ```
    pub fn new<F>(name: &str, func: F) -> Self
        where F: Fn(Vec<Value>, &Rc<Environment>) -> EvalResult<Value> + 'static
    {
        Self { name: name.to_string(),
               func: Box::new(func), }
    }

    /// Invokes the native implementation.
    pub fn call(&self, args: Vec<Value>, env: &Rc<Environment>) -> EvalResult<Value> {
        tracing::trace!(builtin = %self.name, args = args.len(), "calling builtin");
        (self.func)(args, env)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish_non_exhaustive()
    }
}
