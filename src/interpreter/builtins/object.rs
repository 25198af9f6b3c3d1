use std::{collections::BTreeMap, rc::Rc};

use crate::interpreter::{
    evaluator::{core::EvalResult, environment::Environment},
    value::core::Value,
};

/// `object @ []`: a new, empty object.
pub fn object(_: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    Ok(Value::from(BTreeMap::new()))
}

/// `keys @ [object]`: the keys as texts, sorted.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// let src = "o : object @ []; set @ [o, {b}, 2]; set @ [o, {a}, 1]; keys @ [o]";
/// assert_eq!(evaluate(src, &env).unwrap().to_string(), "[a, b]");
/// ```
pub fn keys(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let object = args[0].as_object("the argument of keys")?;
    let keys = object.borrow().keys().map(|k| Value::from(k.as_str())).collect::<Vec<_>>();
    Ok(Value::from(keys))
}

/// `values @ [object]`: the values, in key order.
pub fn values(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let object = args[0].as_object("the argument of values")?;
    let values = object.borrow().values().cloned().collect::<Vec<_>>();
    Ok(Value::from(values))
}

/// `items @ [object]`: `[key, value]` pairs, in key order.
pub fn items(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let object = args[0].as_object("the argument of items")?;
    let items = object.borrow()
                      .iter()
                      .map(|(k, v)| Value::from(vec![Value::from(k.as_str()), v.clone()]))
                      .collect::<Vec<_>>();
    Ok(Value::from(items))
}

/// `haskey @ [object, key]`: `1` if the key is present, else `0`.
pub fn haskey(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let object = args[0].as_object("the first argument of haskey")?;
    let present = object.borrow().contains_key(&args[1].to_key());
    Ok(Value::from(present))
}

/// `delkey @ [object, key]`: removes the key, returning `1` if it was
/// present.
pub fn delkey(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    let object = args[0].as_object("the first argument of delkey")?;
    let removed = object.borrow_mut().remove(&args[1].to_key()).is_some();
    Ok(Value::from(removed))
}
