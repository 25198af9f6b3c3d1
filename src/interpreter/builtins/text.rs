use std::rc::Rc;

use crate::interpreter::{
    evaluator::{core::EvalResult, environment::Environment},
    value::core::Value,
};

/// `lower @ text`: a lowercase copy.
pub fn lower(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    Ok(Value::from(args[0].as_text("the argument of lower")?.to_lowercase()))
}

/// `upper @ text`: an uppercase copy.
pub fn upper(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    Ok(Value::from(args[0].as_text("the argument of upper")?.to_uppercase()))
}

/// `trim @ text`: a copy without leading and trailing whitespace.
pub fn trim(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    Ok(Value::from(args[0].as_text("the argument of trim")?.trim()))
}

/// `replace @ [text, from, to]`: a copy with every occurrence of `from`
/// replaced by `to`.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// let value = evaluate("replace @ [{a-b-c}, {-}, {+}]", &env).unwrap();
/// assert_eq!(value.to_string(), "a+b+c");
/// ```
pub fn replace(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let text = args[0].as_text("the text")?;
    let from = args[1].as_text("the pattern")?;
    let to = args[2].as_text("the replacement")?;
    Ok(Value::from(text.replace(&from, &to)))
}

/// `starts_with @ [text, prefix]`.
pub fn starts_with(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let text = args[0].as_text("the text")?;
    Ok(Value::from(text.starts_with(&args[1].as_text("the prefix")?)))
}

/// `ends_with @ [text, suffix]`.
pub fn ends_with(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let text = args[0].as_text("the text")?;
    Ok(Value::from(text.ends_with(&args[1].as_text("the suffix")?)))
}

/// `str @ value`: the display form as text.
pub fn str(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    Ok(Value::from(args[0].to_string()))
}
