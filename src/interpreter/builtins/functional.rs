use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        builtins::collection::elements,
        evaluator::{core::EvalResult, environment::Environment},
        value::core::Value,
    },
};

/// The values a higher order builtin walks: list elements, node children,
/// or the characters of a text.
fn items(value: &Value, what: &str) -> EvalResult<Vec<Value>> {
    match value {
        Value::Text(text) => Ok(text.borrow().chars().map(|c| Value::from(c.to_string())).collect()),
        other => elements(other, what),
    }
}

fn callable<'a>(value: &'a Value, builtin: &str) -> EvalResult<&'a Value> {
    if value.is_callable() {
        Ok(value)
    } else {
        Err(RuntimeError::NotCallable { details: format!("the first argument of {builtin}") })
    }
}

/// `map @ [f, list]`: a new list of `f` applied to every element.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// assert_eq!(evaluate("map @ [x -> x * x, [1, 2, 3]]", &env).unwrap().to_string(), "[1, 4, 9]");
/// ```
pub fn map(args: &[Value], env: &Rc<Environment>) -> EvalResult<Value> {
    let f = callable(&args[0], "map")?;
    let out = items(&args[1], "the second argument of map")?.into_iter()
                                                            .map(|item| env.apply(f, vec![item]))
                                                            .collect::<EvalResult<Vec<_>>>()?;
    Ok(Value::from(out))
}

/// `filter @ [f, list]`: a new list of the elements for which `f` is truthy.
pub fn filter(args: &[Value], env: &Rc<Environment>) -> EvalResult<Value> {
    let f = callable(&args[0], "filter")?;
    let mut out = Vec::new();
    for item in items(&args[1], "the second argument of filter")? {
        if env.apply(f, vec![item.clone()])?.is_truthy() {
            out.push(item);
        }
    }
    Ok(Value::from(out))
}

/// `reduce @ [f, list, init?]` and `accumulate @ [f, list, init?]`.
///
/// Folds `f` over the list from the left, starting from `init` or, without
/// one, from the first element. `reduce` returns the final accumulator;
/// `accumulate` returns every accumulator in order, the starting one
/// included.
///
/// # Errors
/// `RuntimeError::InvalidArgument` for an empty list with no initial value.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// let add = "add : [a, b] -> a + b;";
/// evaluate(add, &env).unwrap();
/// assert_eq!(evaluate("reduce @ [add, [1, 2, 3]]", &env).unwrap().to_string(), "6");
/// assert_eq!(evaluate("accumulate @ [add, [1, 2, 3], 10]", &env).unwrap().to_string(), "[10, 11, 13, 16]");
/// assert!(evaluate("reduce @ [add, []]", &env).is_err());
/// ```
pub fn fold(args: &[Value], env: &Rc<Environment>, accumulate: bool) -> EvalResult<Value> {
    let name = if accumulate { "accumulate" } else { "reduce" };
    let f = callable(&args[0], name)?;
    let mut rest = items(&args[1], &format!("the second argument of {name}"))?.into_iter();

    let mut acc = match args.get(2) {
        Some(init) => init.clone(),
        None => rest.next().ok_or_else(|| {
                               RuntimeError::invalid_argument(format!("{name} of an empty list needs an initial value"))
                           })?,
    };

    let mut history = vec![acc.clone()];
    for item in rest {
        acc = env.apply(f, vec![acc, item])?;
        if accumulate {
            history.push(acc.clone());
        }
    }

    Ok(if accumulate { Value::from(history) } else { acc })
}
