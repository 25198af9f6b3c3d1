use std::{
    cell::{Cell, Ref, RefCell, RefMut},
    collections::HashMap,
    rc::Rc,
};

use crate::{
    error::RuntimeError,
    interpreter::{
        builtins,
        evaluator::core::{EvalResult, MAX_CALL_DEPTH, evaluate},
        parser::precedence::OperatorTable,
        prelude::PRELUDE,
        value::{core::Value, function::Builtin},
    },
};

/// Name to binding stack. The top of each stack is the visible value.
pub type Bindings = HashMap<String, Vec<Value>>;

/// Stores the runtime evaluation state.
///
/// An environment holds a binding stack per name, the live operator table,
/// and a link to the environment it was created from. Function application
/// creates a child environment; scoped application instead runs inside an
/// existing one, which is why parameters are pushed onto stacks and popped
/// off again rather than stored in a fresh frame.
///
/// Environments are shared as `Rc<Environment>` and mutated through interior
/// mutability; borrows are never held across evaluation.
#[derive(Debug)]
pub struct Environment {
    bindings:  RefCell<Bindings>,
    operators: RefCell<OperatorTable>,
    upper:     Option<Rc<Self>>,
    depth:     Rc<Cell<usize>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Creates an environment with no bindings and the built in operators.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(Bindings::new(), OperatorTable::default())
    }

    /// Creates an environment from a pre-populated binding map and operator
    /// table, for hosts that bootstrap their own library.
    #[must_use]
    pub fn from_parts(bindings: Bindings, operators: OperatorTable) -> Self {
        Self { bindings:  RefCell::new(bindings),
               operators: RefCell::new(operators),
               upper:     None,
               depth:     Rc::new(Cell::new(0)), }
    }

    /// Creates an environment holding the native builtins and nothing
    /// written in the language itself.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
    ///
    /// let env = Environment::with_builtins();
    /// let value = evaluate("len @ [[1, 2, 3]]", &env).unwrap();
    /// assert_eq!(value.to_string(), "3");
    ///
    /// // Library definitions such as `max` are absent.
    /// assert!(evaluate("max @ [1, 2]", &env).is_err());
    /// ```
    #[must_use]
    pub fn with_builtins() -> Rc<Self> {
        let env = Rc::new(Self::new());
        builtins::core::register_natives(&env);
        env
    }

    /// Creates an environment with the native builtins and the standard
    /// library prelude.
    ///
    /// # Errors
    /// Only if the prelude itself fails to evaluate.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
    ///
    /// let env = Environment::standard().unwrap();
    /// assert_eq!(evaluate("max @ [3, 8]", &env).unwrap().to_string(), "8");
    /// assert_eq!(evaluate("fact @ 5", &env).unwrap().to_string(), "120");
    /// ```
    pub fn standard() -> EvalResult<Rc<Self>> {
        let env = Self::with_builtins();
        evaluate(PRELUDE, &env)?;
        Ok(env)
    }

    /// Creates the environment for a fresh function application.
    ///
    /// The child starts from the caller's bindings overlaid with the
    /// callee's closure, inherits a copy of the caller's operator table, and
    /// links back to the caller.
    ///
    /// Both copies are taken up front, so a call costs time linear in the
    /// number of visible names. Later rebinding in the caller, including by
    /// scoped application from inside this call, never reaches the child.
    #[must_use]
    pub fn child(caller: &Rc<Self>, closure: &Bindings) -> Rc<Self> {
        let mut bindings = caller.bindings.borrow().clone();
        bindings.extend(closure.iter().map(|(k, v)| (k.clone(), v.clone())));

        Rc::new(Self { bindings:  RefCell::new(bindings),
                       operators: RefCell::new(caller.operators.borrow().clone()),
                       upper:     Some(Rc::clone(caller)),
                       depth:     Rc::clone(&caller.depth), })
    }

    /// Walks `steps` links up the chain, stopping at the root.
    #[must_use]
    pub fn ancestor(self: &Rc<Self>, steps: usize) -> Rc<Self> {
        let mut env = Rc::clone(self);
        for _ in 0..steps {
            let Some(upper) = env.upper.clone() else {
                break;
            };
            env = upper;
        }
        env
    }

    /// Reads the visible value of `name`.
    ///
    /// # Errors
    /// `RuntimeError::UnboundIdentifier` if the name has no binding or its
    /// stack is exhausted.
    pub fn lookup(&self, name: &str) -> EvalResult<Value> {
        self.bindings
            .borrow()
            .get(name)
            .and_then(|stack| stack.last().cloned())
            .ok_or_else(|| RuntimeError::UnboundIdentifier { name: name.to_string() })
    }

    /// Whether `name` currently has a visible value.
    #[must_use]
    pub fn is_bound(&self, name: &str) -> bool {
        self.bindings.borrow().get(name).is_some_and(|stack| !stack.is_empty())
    }

    /// Replaces the visible value of `name`, creating the binding if needed.
    pub fn bind(&self, name: &str, value: Value) {
        let mut bindings = self.bindings.borrow_mut();
        let stack = bindings.entry(name.to_string()).or_default();
        stack.pop();
        stack.push(value);
    }

    /// Shadows `name` with a new value.
    pub fn push(&self, name: &str, value: Value) {
        self.bindings.borrow_mut().entry(name.to_string()).or_default().push(value);
    }

    /// Removes the top value of `name`, restoring what it shadowed.
    pub fn pop(&self, name: &str) {
        let mut bindings = self.bindings.borrow_mut();
        if let Some(stack) = bindings.get_mut(name) {
            stack.pop();
            if stack.is_empty() {
                bindings.remove(name);
            }
        }
    }

    /// Removes every binding of `name`.
    pub fn remove(&self, name: &str) {
        self.bindings.borrow_mut().remove(name);
    }

    /// Names with a visible value, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names = self.bindings
                            .borrow()
                            .iter()
                            .filter(|(_, stack)| !stack.is_empty())
                            .map(|(name, _)| name.clone())
                            .collect::<Vec<_>>();
        names.sort();
        names
    }

    /// Copies every binding stack, for a closure.
    ///
    /// The stacks are copied; the values on them remain shared handles.
    #[must_use]
    pub fn snapshot(&self) -> Bindings {
        self.bindings.borrow().clone()
    }

    /// The live operator table.
    pub fn operators(&self) -> Ref<'_, OperatorTable> {
        self.operators.borrow()
    }

    /// The live operator table, for definitions.
    pub fn operators_mut(&self) -> RefMut<'_, OperatorTable> {
        self.operators.borrow_mut()
    }

    /// Installs a native operation under `name`.
    ///
    /// # Example
    /// ```
    /// use std::rc::Rc;
    ///
    /// use tbl::interpreter::{
    ///     evaluator::{core::evaluate, environment::Environment},
    ///     value::core::Value,
    /// };
    ///
    /// let env = Rc::new(Environment::new());
    /// env.register_builtin("double", |args, _env| {
    ///        let n = args.first().cloned().unwrap_or_default().as_number("argument")?;
    ///        Ok(Value::from(n + n))
    ///    });
    /// assert_eq!(evaluate("double @ 21", &env).unwrap().to_string(), "42");
    /// ```
    pub fn register_builtin<F>(&self, name: &str, func: F)
        where F: Fn(Vec<Value>, &Rc<Self>) -> EvalResult<Value> + 'static
    {
        self.bind(name, Value::from(Builtin::new(name, func)));
    }

    /// Counts one more nested application.
    ///
    /// # Errors
    /// `RuntimeError::RecursionLimit` past [`MAX_CALL_DEPTH`].
    pub fn enter_call(&self) -> EvalResult<CallGuard> {
        let depth = self.depth.get() + 1;
        if depth > MAX_CALL_DEPTH {
            return Err(RuntimeError::RecursionLimit { depth: MAX_CALL_DEPTH });
        }
        self.depth.set(depth);
        Ok(CallGuard { depth: Rc::clone(&self.depth) })
    }
}

/// Decrements the shared call depth when an application returns.
#[derive(Debug)]
pub struct CallGuard {
    depth: Rc<Cell<usize>>,
}

impl Drop for CallGuard {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

/// Pops the bindings an application pushed, on every exit path.
///
/// Scoped application runs a function inside an environment that outlives
/// the call, so parameter and self bindings must come off even when the
/// body fails.
#[derive(Debug)]
pub struct FrameGuard<'a> {
    env:    &'a Environment,
    pushed: Vec<String>,
}

impl<'a> FrameGuard<'a> {
    /// Starts an empty frame on `env`.
    #[must_use]
    pub const fn new(env: &'a Environment) -> Self {
        Self { env,
               pushed: Vec::new() }
    }

    /// Pushes a binding that is popped when the guard drops.
    pub fn push(&mut self, name: &str, value: Value) {
        self.env.push(name, value);
        self.pushed.push(name.to_string());
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        for name in self.pushed.iter().rev() {
            self.env.pop(name);
        }
    }
}
