use std::rc::Rc;

use crate::{
    ast::{Ast, TextLiteral},
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, environment::Environment},
        parser::text::parse_text,
        value::{ancestors::Ancestors, core::Value},
    },
};

/// Turns a value into a syntax tree that evaluates back to it.
///
/// Nodes are copied; numbers and texts become literals and lists become
/// list nodes of their lifted elements.
///
/// # Errors
/// - `RuntimeError::TypeError` for objects and callables, which have no
///   literal form.
/// - `RuntimeError::CyclicValue` for a list that contains itself.
pub fn lift(value: &Value) -> EvalResult<Ast> {
    lift_within(value, &Ancestors::default())
}

fn lift_within(value: &Value, path: &Ancestors) -> EvalResult<Ast> {
    match value {
        Value::Node(node) => Ok(node.borrow().clone()),
        Value::Number(c) => Ok(Ast::Number { real:      c.real,
                                             imaginary: c.imaginary, }),
        Value::Text(text) => Ok(Ast::Text(TextLiteral::plain(&text.borrow()))),
        Value::List(list) => {
            let _open = path.enter(value, "place in a syntax tree")?;
            let list = list.borrow().clone();
            list.iter()
                .map(|v| lift_within(v, path))
                .collect::<EvalResult<Vec<_>>>()
                .map(Ast::List)
        },
        other => Err(RuntimeError::type_error(format!("a value of type {} can not be placed in a syntax tree",
                                                      other.type_name()))),
    }
}

/// `1` if `value` is a node of the given kind, else `0`.
pub fn is_node(value: &Value, kind: &str) -> EvalResult<Value> {
    Ok(Value::from(matches!(value, Value::Node(n) if n.borrow().kind() == kind)))
}

fn mismatch(builtin: &str, expected: &str, found: &Ast) -> RuntimeError {
    RuntimeError::type_error(format!("{builtin} needs {expected}, found {}", found.kind()))
}

/// Reads one operand of an operation node.
fn operand(args: &[Value], builtin: &str, right: bool) -> EvalResult<Value> {
    let node = args[0].as_node(&format!("the argument of {builtin}"))?;
    let node = node.borrow();
    match &*node {
        Ast::Operation { left, right: r, .. } => {
            Ok(Value::from(if right { (**r).clone() } else { (**left).clone() }))
        },
        other => Err(mismatch(builtin, "an operation", other)),
    }
}

/// Replaces one operand of an operation node and returns the node.
fn set_operand(args: &[Value], builtin: &str, right: bool) -> EvalResult<Value> {
    let node = args[0].as_node(&format!("the first argument of {builtin}"))?;
    let child = lift(&args[1])?;
    match &mut *node.borrow_mut() {
        Ast::Operation { left, right: r, .. } => {
            let slot = if right { r } else { left };
            **slot = child;
        },
        other => return Err(mismatch(builtin, "an operation", other)),
    }
    Ok(args[0].clone())
}

/// `getleft @ node`: a copy of the left operand of an operation node.
pub fn getleft(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    operand(args, "getleft", false)
}

/// `getright @ node`: a copy of the right operand of an operation node.
pub fn getright(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    operand(args, "getright", true)
}

/// `setleft @ [node, operand]`: replaces the left operand in place.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// let src = "n : `{1 + 2}; setleft @ [n, `{10}]; eval_ast @ n";
/// assert_eq!(evaluate(src, &env).unwrap().to_string(), "12");
/// ```
pub fn setleft(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    set_operand(args, "setleft", false)
}

/// `setright @ [node, operand]`: replaces the right operand in place.
pub fn setright(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    set_operand(args, "setright", true)
}

/// `getop @ node`: the operator of an operation node, as text.
pub fn getop(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let node = args[0].as_node("the argument of getop")?;
    let node = node.borrow();
    match &*node {
        Ast::Operation { operator, .. } => Ok(Value::from(operator.as_str())),
        other => Err(mismatch("getop", "an operation", other)),
    }
}

/// `setop @ [node, text]`: replaces the operator of an operation node.
pub fn setop(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let node = args[0].as_node("the first argument of setop")?;
    let token = args[1].as_text("the new operator")?;
    match &mut *node.borrow_mut() {
        Ast::Operation { operator, .. } => *operator = token,
        other => return Err(mismatch("setop", "an operation", other)),
    }
    Ok(args[0].clone())
}

/// `getname @ node`: the name of an identifier node, as text.
pub fn getname(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let node = args[0].as_node("the argument of getname")?;
    let node = node.borrow();
    match &*node {
        Ast::Identifier(name) => Ok(Value::from(name.as_str())),
        other => Err(mismatch("getname", "an identifier", other)),
    }
}

/// `setname @ [node, text]`: renames an identifier node.
pub fn setname(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let node = args[0].as_node("the first argument of setname")?;
    let new_name = args[1].as_text("the new name")?;
    match &mut *node.borrow_mut() {
        Ast::Identifier(name) => *name = new_name,
        other => return Err(mismatch("setname", "an identifier", other)),
    }
    Ok(args[0].clone())
}

/// `gettext @ node`: the body of a text node as written, escapes and
/// interpolations included.
pub fn gettext(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let node = args[0].as_node("the argument of gettext")?;
    let node = node.borrow();
    match &*node {
        Ast::Text(literal) => Ok(Value::from(literal.source.as_str())),
        other => Err(mismatch("gettext", "a text node", other)),
    }
}

/// `settext @ [node, text]`: replaces the body of a text node.
///
/// The new body is read like a literal written in source, so it may
/// interpolate.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// let src = "x : 4; n : `{{}}; settext @ [n, {x is \\{x\\}}]; eval_ast @ n";
/// assert_eq!(evaluate(src, &env).unwrap().to_string(), "x is 4");
/// ```
pub fn settext(args: &[Value], env: &Rc<Environment>) -> EvalResult<Value> {
    let node = args[0].as_node("the first argument of settext")?;
    let body = args[1].as_text("the new text")?;
    let literal = parse_text(&body, &env.operators())?;
    match &mut *node.borrow_mut() {
        Ast::Text(text) => *text = literal,
        other => return Err(mismatch("settext", "a text node", other)),
    }
    Ok(args[0].clone())
}

/// `getsubasts @ node`: the children of a list or expression body node.
pub fn getsubasts(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let node = args[0].as_node("the argument of getsubasts")?;
    let node = node.borrow();
    match &*node {
        Ast::List(children) | Ast::ExprBody(children) => {
            Ok(Value::from(children.iter().cloned().map(Value::from).collect::<Vec<_>>()))
        },
        other => Err(mismatch("getsubasts", "a list or expression body", other)),
    }
}

/// `getast @ node`: the tree wrapped by a quoted node.
pub fn getast(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let node = args[0].as_node("the argument of getast")?;
    let node = node.borrow();
    match &*node {
        Ast::Quoted(inner) => Ok(Value::from((**inner).clone())),
        other => Err(mismatch("getast", "a quoted node", other)),
    }
}

/// `getbody @ f`: a copy of a function's body.
pub fn getbody(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let function = args[0].as_function("the argument of getbody")?;
    let body = (*function.borrow().body).clone();
    Ok(Value::from(body))
}

/// `setbody @ [f, node]`: replaces a function's body in place and returns
/// the function.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// let src = "f : x -> x + 1; setbody @ [f, `{x * 10}]; f @ 3";
/// assert_eq!(evaluate(src, &env).unwrap().to_string(), "30");
/// ```
pub fn setbody(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let function = args[0].as_function("the first argument of setbody")?;
    let body = lift(&args[1])?;
    function.borrow_mut().body = Rc::new(body);
    Ok(args[0].clone())
}

/// `getparams @ f`: the parameter names as texts.
pub fn getparams(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let function = args[0].as_function("the argument of getparams")?;
    let params = function.borrow().params.iter().map(|p| Value::from(p.as_str())).collect::<Vec<_>>();
    Ok(Value::from(params))
}
