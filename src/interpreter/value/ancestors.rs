use std::{cell::RefCell, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// The list and object handles a recursive walk is currently inside.
///
/// Lists and objects are shared handles, so a list can be pushed into
/// itself. A walk that opens a handle already on this path has found such
/// a cycle and must stop.
///
/// # Example
/// ```
/// use tbl::interpreter::value::{ancestors::Ancestors, core::Value};
///
/// let list = Value::from(vec![Value::from(1.0)]);
/// let path = Ancestors::default();
///
/// let outer = path.open(&list);
/// assert!(outer.is_some());
/// assert!(path.open(&list).is_none());
///
/// drop(outer);
/// assert!(path.open(&list).is_some());
/// ```
#[derive(Debug, Default)]
pub struct Ancestors {
    open: RefCell<Vec<*const ()>>,
}

impl Ancestors {
    /// Opens `value` for the rest of the guard's scope.
    ///
    /// Values that are not lists or objects can not form cycles and always
    /// open. Returns `None` when `value` is already open on this path.
    #[must_use]
    pub fn open(&self, value: &Value) -> Option<Opened<'_>> {
        let Some(handle) = handle_of(value) else {
            return Some(Opened { path: None });
        };

        let mut open = self.open.borrow_mut();
        if open.contains(&handle) {
            return None;
        }
        open.push(handle);
        Some(Opened { path: Some(self) })
    }

    /// Like [`Ancestors::open`], but a cycle is a
    /// [`RuntimeError::CyclicValue`] naming `operation`.
    pub fn enter(&self, value: &Value, operation: &str) -> EvalResult<Opened<'_>> {
        self.open(value)
            .ok_or_else(|| RuntimeError::CyclicValue { operation: operation.to_string() })
    }
}

/// Closes the handle it opened when dropped.
#[derive(Debug)]
pub struct Opened<'a> {
    path: Option<&'a Ancestors>,
}

impl Drop for Opened<'_> {
    fn drop(&mut self) {
        if let Some(path) = self.path {
            path.open.borrow_mut().pop();
        }
    }
}

fn handle_of(value: &Value) -> Option<*const ()> {
    match value {
        Value::List(l) => Some(Rc::as_ptr(l).cast::<()>()),
        Value::Object(o) => Some(Rc::as_ptr(o).cast::<()>()),
        _ => None,
    }
}
