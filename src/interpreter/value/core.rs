use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

use crate::{
    ast::Ast,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            ancestors::Ancestors,
            complex::{ComplexNumber, ZERO},
            function::{Builtin, Function},
        },
    },
    util::num::f64_to_usize_checked,
};

/// Represents a runtime value in the interpreter.
///
/// Numbers are plain copies. Every other variant is a shared handle: binding
/// a list to a second name and pushing through either name changes the one
/// list both names refer to. Use [`Value::duplicate`] for an independent
/// copy.
#[derive(Debug, Clone)]
pub enum Value {
    /// A complex number; reals have a zero imaginary part.
    Number(ComplexNumber),
    /// A mutable character sequence.
    Text(Rc<RefCell<String>>),
    /// An ordered, mutable sequence of values.
    List(Rc<RefCell<Vec<Self>>>),
    /// A string keyed map of values.
    Object(Rc<RefCell<BTreeMap<String, Self>>>),
    /// A function written in the language.
    Function(Rc<RefCell<Function>>),
    /// A native operation.
    Builtin(Rc<Builtin>),
    /// An unevaluated syntax tree, produced by quoting or by macro operators.
    Node(Rc<RefCell<Ast>>),
}

impl From<ComplexNumber> for Value {
    fn from(c: ComplexNumber) -> Self {
        Self::Number(c)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(ComplexNumber::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Number(ComplexNumber::from_bool(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(Rc::new(RefCell::new(v.to_string())))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(Rc::new(RefCell::new(v)))
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(Rc::new(RefCell::new(v)))
    }
}

impl From<Ast> for Value {
    fn from(v: Ast) -> Self {
        Self::Node(Rc::new(RefCell::new(v)))
    }
}

impl From<Function> for Value {
    fn from(v: Function) -> Self {
        Self::Function(Rc::new(RefCell::new(v)))
    }
}

impl From<Builtin> for Value {
    fn from(v: Builtin) -> Self {
        Self::Builtin(Rc::new(v))
    }
}

impl From<BTreeMap<String, Self>> for Value {
    fn from(v: BTreeMap<String, Self>) -> Self {
        Self::Object(Rc::new(RefCell::new(v)))
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Number(ZERO)
    }
}

impl Value {
    /// Short name of the value's type, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Object(_) => "object",
            Self::Function(_) => "function",
            Self::Builtin(_) => "builtin",
            Self::Node(_) => "ast node",
        }
    }

    /// Truthiness: only the number whose parts are both exactly zero is
    /// false.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::value::core::Value;
    ///
    /// assert!(!Value::from(0.0).is_truthy());
    /// assert!(Value::from(1e-300).is_truthy());
    /// assert!(Value::from(Vec::new()).is_truthy());
    /// ```
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Number(c) => !c.is_zero_strict(),
            _ => true,
        }
    }

    /// Whether the value can be applied with `@`.
    #[must_use]
    pub const fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_) | Self::Builtin(_))
    }

    /// Returns the complex number, or a type error naming `what`.
    pub fn as_number(&self, what: &str) -> EvalResult<ComplexNumber> {
        match self {
            Self::Number(c) => Ok(*c),
            _ => Err(self.expected(what, "a number")),
        }
    }

    /// Returns the real part of a number whose imaginary part is exactly
    /// zero, or a type error naming `what`.
    pub fn as_real(&self, what: &str) -> EvalResult<f64> {
        match self {
            Self::Number(c) if c.is_real_strict() => Ok(c.real),
            _ => Err(self.expected(what, "a real number")),
        }
    }

    /// Reads the value as a non-negative integer index or count.
    pub fn as_index(&self, what: &str) -> EvalResult<usize> {
        f64_to_usize_checked(self.as_real(what)?, what)
    }

    /// Returns a copy of the text, or a type error naming `what`.
    pub fn as_text(&self, what: &str) -> EvalResult<String> {
        match self {
            Self::Text(t) => Ok(t.borrow().clone()),
            _ => Err(self.expected(what, "text")),
        }
    }

    /// Returns the list handle, or a type error naming `what`.
    pub fn as_list(&self, what: &str) -> EvalResult<Rc<RefCell<Vec<Self>>>> {
        match self {
            Self::List(l) => Ok(Rc::clone(l)),
            _ => Err(self.expected(what, "a list")),
        }
    }

    /// Returns the object handle, or a type error naming `what`.
    pub fn as_object(&self, what: &str) -> EvalResult<Rc<RefCell<BTreeMap<String, Self>>>> {
        match self {
            Self::Object(o) => Ok(Rc::clone(o)),
            _ => Err(self.expected(what, "an object")),
        }
    }

    /// Returns the node handle, or a type error naming `what`.
    pub fn as_node(&self, what: &str) -> EvalResult<Rc<RefCell<Ast>>> {
        match self {
            Self::Node(n) => Ok(Rc::clone(n)),
            _ => Err(self.expected(what, "an ast node")),
        }
    }

    /// Returns the user function handle, or a type error naming `what`.
    pub fn as_function(&self, what: &str) -> EvalResult<Rc<RefCell<Function>>> {
        match self {
            Self::Function(f) => Ok(Rc::clone(f)),
            Self::Builtin(_) => Err(RuntimeError::type_error(format!("{what} can not be a builtin"))),
            _ => Err(RuntimeError::NotCallable { details: what.to_string() }),
        }
    }

    /// Key used when the value indexes an object: text is used as is,
    /// identifier nodes by name, anything else by its display form.
    #[must_use]
    pub fn to_key(&self) -> String {
        match self {
            Self::Text(t) => t.borrow().clone(),
            Self::Node(n) => match &*n.borrow() {
                Ast::Identifier(name) => name.clone(),
                _ => self.to_string(),
            },
            _ => self.to_string(),
        }
    }

    /// Returns a deep copy that shares no mutable state with `self`.
    ///
    /// Lists, texts, objects and nodes are copied recursively. A duplicated
    /// function gets its own parameters and body but keeps sharing the
    /// closure snapshot, which is never mutated in place.
    ///
    /// # Errors
    /// `RuntimeError::CyclicValue` if a list or object contains itself.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::value::core::Value;
    ///
    /// let original = Value::from(vec![Value::from(1.0)]);
    /// let copy = original.duplicate().unwrap();
    /// if let Value::List(l) = &copy {
    ///     l.borrow_mut().push(Value::from(2.0));
    /// }
    /// assert_eq!(original.to_string(), "[1]");
    /// assert_eq!(copy.to_string(), "[1, 2]");
    ///
    /// if let Value::List(l) = &original {
    ///     l.borrow_mut().push(original.clone());
    /// }
    /// assert!(original.duplicate().is_err());
    /// ```
    pub fn duplicate(&self) -> EvalResult<Self> {
        self.duplicate_within(&Ancestors::default())
    }

    fn duplicate_within(&self, path: &Ancestors) -> EvalResult<Self> {
        let _open = path.enter(self, "copy")?;

        Ok(match self {
            Self::Number(c) => Self::Number(*c),
            Self::Text(t) => Self::from(t.borrow().clone()),
            Self::List(l) => {
                let items = l.borrow().clone();
                Self::from(items.iter()
                                .map(|v| v.duplicate_within(path))
                                .collect::<EvalResult<Vec<_>>>()?)
            },
            Self::Object(o) => {
                let entries = o.borrow().clone();
                Self::from(entries.iter()
                                  .map(|(k, v)| Ok((k.clone(), v.duplicate_within(path)?)))
                                  .collect::<EvalResult<BTreeMap<_, _>>>()?)
            },
            Self::Function(f) => {
                let copy = f.borrow().clone();
                Self::from(Function { body: Rc::new((*copy.body).clone()),
                                      ..copy })
            },
            Self::Builtin(b) => Self::Builtin(Rc::clone(b)),
            Self::Node(n) => Self::from(n.borrow().clone()),
        })
    }

    /// Writes the display form, printing a list or object met again inside
    /// itself as `[...]` or `{...}`.
    fn write_within(&self, f: &mut fmt::Formatter<'_>, path: &Ancestors) -> fmt::Result {
        let Some(_open) = path.open(self) else {
            return f.write_str(if matches!(self, Self::Object(_)) { "{...}" } else { "[...]" });
        };

        match self {
            Self::Number(c) => write!(f, "{c}"),
            Self::Text(t) => f.write_str(&t.borrow()),
            Self::List(l) => {
                f.write_str("[")?;
                for (i, v) in l.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    v.write_within(f, path)?;
                }
                f.write_str("]")
            },
            Self::Object(o) => {
                f.write_str("{")?;
                for (i, (k, v)) in o.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: ")?;
                    v.write_within(f, path)?;
                }
                f.write_str("}")
            },
            Self::Function(func) => write!(f, "#procedure [{}]", func.borrow().params.join(", ")),
            Self::Builtin(b) => write!(f, "#builtin {}", b.name),
            Self::Node(n) => write!(f, "`{{{}}}", n.borrow()),
        }
    }

    fn expected(&self, what: &str, kind: &str) -> RuntimeError {
        RuntimeError::type_error(format!("{what} must be {kind}, found {}", self.type_name()))
    }
}

/// Structural equality for numbers, text, lists, objects and nodes; identity
/// for callables. The language's `=` operator has its own fuzzy rules.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => *a.borrow() == *b.borrow(),
            (Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Self::Object(a), Self::Object(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => Rc::ptr_eq(a, b),
            (Self::Node(a), Self::Node(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_within(f, &Ancestors::default())
    }
}
