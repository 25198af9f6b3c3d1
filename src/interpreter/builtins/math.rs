use std::rc::Rc;

use crate::interpreter::{
    evaluator::{core::EvalResult, environment::Environment},
    value::{ancestors::Ancestors, complex::ComplexNumber, core::Value},
};

/// Applies `f` to a number, or to every number inside a (nested) list.
fn broadcast<F>(value: &Value, f: &F) -> EvalResult<Value>
    where F: Fn(&Value) -> EvalResult<Value>
{
    broadcast_within(value, f, &Ancestors::default())
}

fn broadcast_within<F>(value: &Value, f: &F, path: &Ancestors) -> EvalResult<Value>
    where F: Fn(&Value) -> EvalResult<Value>
{
    match value {
        Value::List(list) => {
            let _open = path.enter(value, "broadcast over")?;
            let list = list.borrow().clone();
            list.iter()
                .map(|v| broadcast_within(v, f, path))
                .collect::<EvalResult<Vec<_>>>()
                .map(Value::from)
        },
        other => f(other),
    }
}

/// `re @ z`: the real part.
pub fn re(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    broadcast(&args[0], &|v| Ok(Value::from(v.as_number("the argument of re")?.real)))
}

/// `im @ z`: the imaginary part, as a real number.
pub fn im(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    broadcast(&args[0], &|v| Ok(Value::from(v.as_number("the argument of im")?.imaginary)))
}

/// `abs @ z`: the magnitude.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// assert_eq!(evaluate("abs @ (3 + 4i)", &env).unwrap().to_string(), "5");
/// assert_eq!(evaluate("abs @ [[~1, 2]]", &env).unwrap().to_string(), "[1, 2]");
/// ```
pub fn abs(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    broadcast(&args[0], &|v| Ok(Value::from(v.as_number("the argument of abs")?.abs())))
}

/// Lifts a complex function into a builtin body.
pub fn complex_fn(name: &str, args: &[Value], f: fn(ComplexNumber) -> ComplexNumber) -> EvalResult<Value> {
    let what = format!("the argument of {name}");
    broadcast(&args[0], &|v| Ok(Value::from(f(v.as_number(&what)?))))
}

/// Lifts a real function into a builtin body; complex arguments are type
/// errors.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// assert_eq!(evaluate("floor @ 2.7", &env).unwrap().to_string(), "2");
/// assert!(evaluate("floor @ 2i", &env).is_err());
/// ```
pub fn real_fn(name: &str, args: &[Value], f: fn(f64) -> f64) -> EvalResult<Value> {
    let what = format!("the argument of {name}");
    broadcast(&args[0], &|v| Ok(Value::from(f(v.as_real(&what)?))))
}
