use std::rc::Rc;

use crate::{
    ast::Ast,
    error::RuntimeError,
    interpreter::{
        builtins::node::lift,
        evaluator::{core::EvalResult, environment::Environment},
        value::core::Value,
    },
    util::num::{f64_to_i64_checked, f64_to_usize_checked, usize_to_f64},
};

/// The elements of a list value or of a list or expression body node.
///
/// Node children come back as node values, so code can walk quoted lists
/// and real lists alike.
///
/// # Errors
/// `RuntimeError::TypeError` for anything else.
pub fn elements(value: &Value, what: &str) -> EvalResult<Vec<Value>> {
    match value {
        Value::List(list) => Ok(list.borrow().clone()),
        Value::Node(node) => match &*node.borrow() {
            Ast::List(children) | Ast::ExprBody(children) => {
                Ok(children.iter().cloned().map(Value::from).collect())
            },
            other => Err(RuntimeError::type_error(format!("{what} must be a list, found {}", other.kind()))),
        },
        other => Err(RuntimeError::type_error(format!("{what} must be a list, found {}", other.type_name()))),
    }
}

/// Checks that `index` is an integer position inside a collection of `len`
/// elements.
fn position(index: &Value, len: usize) -> EvalResult<usize> {
    let i = index.as_real("index")?;
    if i < 0.0 || i >= usize_to_f64(len) {
        return Err(RuntimeError::IndexOutOfBounds { index: i, len });
    }
    f64_to_usize_checked(i, "index")
}

/// Resolves a slice bound: negative bounds count from the end, and every
/// bound is clamped into `0..=len`.
fn bound(value: &Value, len: usize, what: &str) -> EvalResult<usize> {
    let i = f64_to_i64_checked(value.as_real(what)?, what)?;
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let clamped = if i < 0 { (len_i + i).max(0) } else { i.min(len_i) };
    Ok(usize::try_from(clamped).unwrap_or(0))
}

fn unsupported(operation: &str, value: &Value) -> RuntimeError {
    match value {
        Value::Node(node) => RuntimeError::type_error(format!("can not {operation} a {}", node.borrow().kind())),
        other => RuntimeError::type_error(format!("can not {operation} a value of type {}", other.type_name())),
    }
}

/// `get @ [container, index]`: reads a list element, a character of a text,
/// an object entry, or a copy of a child of a list or expression body node.
///
/// Object keys are converted with [`Value::to_key`].
///
/// # Errors
/// - `RuntimeError::IndexOutOfBounds` for positions outside the collection.
/// - `RuntimeError::KeyNotFound` for missing object keys.
pub fn get(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let (container, index) = (&args[0], &args[1]);
    match container {
        Value::List(list) => {
            let list = list.borrow();
            Ok(list[position(index, list.len())?].clone())
        },
        Value::Text(text) => {
            let chars = text.borrow().chars().collect::<Vec<_>>();
            Ok(Value::from(chars[position(index, chars.len())?].to_string()))
        },
        Value::Object(object) => {
            let key = index.to_key();
            object.borrow().get(&key).cloned().ok_or(RuntimeError::KeyNotFound { key })
        },
        Value::Node(node) => match &*node.borrow() {
            Ast::List(children) | Ast::ExprBody(children) => {
                Ok(Value::from(children[position(index, children.len())?].clone()))
            },
            _ => Err(unsupported("index", container)),
        },
        _ => Err(unsupported("index", container)),
    }
}

/// `set @ [container, index, value]`: replaces an element and returns the
/// new value.
///
/// On a text the value must itself be text and replaces one character. On an
/// object the entry is created if missing.
///
/// # Errors
/// As for [`get`], plus type errors for values the container can not hold.
pub fn set(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let (container, index, value) = (&args[0], &args[1], &args[2]);
    match container {
        Value::List(list) => {
            let i = position(index, list.borrow().len())?;
            list.borrow_mut()[i] = value.clone();
        },
        Value::Text(text) => {
            let replacement = value.as_text("the replacement")?;
            let mut chars = text.borrow().chars().map(String::from).collect::<Vec<_>>();
            let i = position(index, chars.len())?;
            chars[i] = replacement;
            *text.borrow_mut() = chars.concat();
        },
        Value::Object(object) => {
            object.borrow_mut().insert(index.to_key(), value.clone());
        },
        Value::Node(node) => {
            let child = lift(value)?;
            match &mut *node.borrow_mut() {
                Ast::List(children) | Ast::ExprBody(children) => {
                    let i = position(index, children.len())?;
                    children[i] = child;
                },
                other => return Err(RuntimeError::type_error(format!("can not index a {}", other.kind()))),
            }
        },
        _ => return Err(unsupported("index", container)),
    }
    Ok(value.clone())
}

/// `push @ [container, value]`: appends to a list, a text or a list node,
/// and returns the pushed value.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// let src = "l : [1]; m : l; push @ [m, 2]; l";
/// assert_eq!(evaluate(src, &env).unwrap().to_string(), "[1, 2]");
/// ```
pub fn push(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let (container, value) = (&args[0], &args[1]);
    match container {
        Value::List(list) => list.borrow_mut().push(value.clone()),
        Value::Text(text) => {
            let suffix = value.as_text("the pushed value")?;
            text.borrow_mut().push_str(&suffix);
        },
        Value::Node(node) => {
            let child = lift(value)?;
            match &mut *node.borrow_mut() {
                Ast::List(children) | Ast::ExprBody(children) => children.push(child),
                other => return Err(RuntimeError::type_error(format!("can not push onto a {}", other.kind()))),
            }
        },
        _ => return Err(unsupported("push onto", container)),
    }
    Ok(value.clone())
}

/// `pop @ [container]`: removes and returns the last element.
///
/// # Errors
/// `RuntimeError::EmptyPop` when there is nothing to remove.
pub fn pop(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    match &args[0] {
        Value::List(list) => list.borrow_mut().pop().ok_or(RuntimeError::EmptyPop { kind: "list" }),
        Value::Text(text) => text.borrow_mut()
                                 .pop()
                                 .map(|c| Value::from(c.to_string()))
                                 .ok_or(RuntimeError::EmptyPop { kind: "text" }),
        Value::Node(node) => match &mut *node.borrow_mut() {
            Ast::List(children) | Ast::ExprBody(children) => {
                children.pop().map(Value::from).ok_or(RuntimeError::EmptyPop { kind: "node" })
            },
            other => Err(RuntimeError::type_error(format!("can not pop a {}", other.kind()))),
        },
        other => Err(unsupported("pop", other)),
    }
}

/// `len @ [container]`: number of elements, characters or entries.
pub fn len(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let count = match &args[0] {
        Value::Text(text) => text.borrow().chars().count(),
        Value::Object(object) => object.borrow().len(),
        other => elements(other, "the argument of len")?.len(),
    };
    Ok(Value::from(usize_to_f64(count)))
}

/// `slice @ [container, start]` or `slice @ [container, start, end]`.
///
/// Returns a new container holding the elements from `start` up to, but
/// not including, `end`. Negative bounds count from the end and all bounds
/// are clamped, so slicing never fails on range.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// assert_eq!(evaluate("slice @ [[1, 2, 3, 4], 1, ~1]", &env).unwrap().to_string(), "[2, 3]");
/// assert_eq!(evaluate("slice @ [{hello}, 3]", &env).unwrap().to_string(), "lo");
/// assert_eq!(evaluate("slice @ [[1, 2], 5]", &env).unwrap().to_string(), "[]");
/// ```
pub fn slice(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let container = &args[0];
    let range = |len: usize| -> EvalResult<(usize, usize)> {
        let start = bound(&args[1], len, "slice start")?;
        let end = args.get(2).map_or(Ok(len), |e| bound(e, len, "slice end"))?;
        Ok((start, end.max(start)))
    };

    match container {
        Value::List(list) => {
            let list = list.borrow();
            let (start, end) = range(list.len())?;
            Ok(Value::from(list[start..end].to_vec()))
        },
        Value::Text(text) => {
            let chars = text.borrow().chars().collect::<Vec<_>>();
            let (start, end) = range(chars.len())?;
            Ok(Value::from(chars[start..end].iter().collect::<String>()))
        },
        Value::Node(node) => match &*node.borrow() {
            Ast::List(children) => {
                let (start, end) = range(children.len())?;
                Ok(Value::from(Ast::List(children[start..end].to_vec())))
            },
            Ast::ExprBody(children) => {
                let (start, end) = range(children.len())?;
                Ok(Value::from(Ast::ExprBody(children[start..end].to_vec())))
            },
            _ => Err(unsupported("slice", container)),
        },
        _ => Err(unsupported("slice", container)),
    }
}

/// `splice @ [container, start, count, items...]`: removes `count` elements
/// from `start`, inserts `items` in their place, and returns the removed
/// elements.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// let src = "l : [1, 2, 3, 4]; r : splice @ [l, 1, 2, 9]; [l, r]";
/// assert_eq!(evaluate(src, &env).unwrap().to_string(), "[[1, 9, 4], [2, 3]]");
/// ```
pub fn splice(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let (container, items) = (&args[0], &args[3..]);
    let count = args[2].as_index("splice count")?;
    let range = |len: usize| -> EvalResult<(usize, usize)> {
        let start = bound(&args[1], len, "splice start")?;
        Ok((start, start.saturating_add(count).min(len)))
    };

    match container {
        Value::List(list) => {
            let (start, end) = range(list.borrow().len())?;
            let removed = list.borrow_mut().splice(start..end, items.iter().cloned()).collect::<Vec<_>>();
            Ok(Value::from(removed))
        },
        Value::Text(text) => {
            let insert = items.iter()
                              .map(|item| item.as_text("an inserted value"))
                              .collect::<EvalResult<String>>()?;
            let mut chars = text.borrow().chars().collect::<Vec<_>>();
            let (start, end) = range(chars.len())?;
            let removed = chars.splice(start..end, insert.chars()).collect::<String>();
            *text.borrow_mut() = chars.into_iter().collect();
            Ok(Value::from(removed))
        },
        Value::Node(node) => {
            let insert = items.iter().map(lift).collect::<EvalResult<Vec<_>>>()?;
            match &mut *node.borrow_mut() {
                Ast::List(children) | Ast::ExprBody(children) => {
                    let (start, end) = range(children.len())?;
                    let removed = children.splice(start..end, insert).collect::<Vec<_>>();
                    Ok(Value::from(Ast::List(removed)))
                },
                other => Err(RuntimeError::type_error(format!("can not splice a {}", other.kind()))),
            }
        },
        _ => Err(unsupported("splice", container)),
    }
}

/// `concat @ [a, b, ...]`: joins lists into a new list, or texts into a new
/// text. With no arguments the result is the empty list.
///
/// # Errors
/// `RuntimeError::TypeError` when the arguments are not all lists or all
/// texts.
pub fn concat(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    if args.iter().all(|a| matches!(a, Value::List(_))) {
        let mut out = Vec::new();
        for arg in args {
            out.extend(elements(arg, "an argument of concat")?);
        }
        return Ok(Value::from(out));
    }
    if args.iter().all(|a| matches!(a, Value::Text(_))) {
        return args.iter()
                   .map(|a| a.as_text("an argument of concat"))
                   .collect::<EvalResult<String>>()
                   .map(Value::from);
    }
    Err(RuntimeError::type_error("concat takes only lists or only texts"))
}

/// `dup @ [value]`: a deep copy sharing nothing mutable with the original.
pub fn dup(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    args[0].duplicate()
}

/// `range @ [start, stop]` or `range @ [start, stop, step]`.
///
/// Both ends are included. The step defaults to `1` and may be negative.
///
/// # Errors
/// `RuntimeError::InvalidArgument` for a zero or non-finite step.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// assert_eq!(evaluate("range @ [1, 4]", &env).unwrap().to_string(), "[1, 2, 3, 4]");
/// assert_eq!(evaluate("range @ [3, 0, ~1]", &env).unwrap().to_string(), "[3, 2, 1, 0]");
/// assert_eq!(evaluate("range @ [0, 1, 0.5]", &env).unwrap().to_string(), "[0, 0.5, 1]");
/// assert_eq!(evaluate("range @ [2, 1]", &env).unwrap().to_string(), "[]");
/// ```
pub fn range(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let start = args[0].as_real("range start")?;
    let stop = args[1].as_real("range stop")?;
    let step = args.get(2).map_or(Ok(1.0), |s| s.as_real("range step"))?;
    if step == 0.0 || !step.is_finite() {
        return Err(RuntimeError::invalid_argument(format!("range step can not be {step}")));
    }

    let count = ((stop - start) / step + 1.0).floor().max(0.0);
    let count = f64_to_usize_checked(count, "range length")?;
    Ok(Value::from((0..count).map(|i| Value::from(start + usize_to_f64(i) * step))
                             .collect::<Vec<_>>()))
}

/// `split @ [text, separator]`: the pieces of `text` between separators. An
/// empty separator splits into characters.
pub fn split(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let text = args[0].as_text("the text to split")?;
    let separator = args[1].as_text("the separator")?;

    let pieces: Vec<Value> = if separator.is_empty() {
        text.chars().map(|c| Value::from(c.to_string())).collect()
    } else {
        text.split(separator.as_str()).map(Value::from).collect()
    };
    Ok(Value::from(pieces))
}

/// `join @ [list, separator]`: the display forms of the elements, joined.
pub fn join(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let items = args[0].as_list("the list to join")?;
    let separator = args[1].as_text("the separator")?;

    let joined = items.borrow().iter().map(ToString::to_string).collect::<Vec<_>>().join(separator.as_str());
    Ok(Value::from(joined))
}
