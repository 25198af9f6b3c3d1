use std::{
    rc::Rc,
    sync::atomic::{AtomicU64, Ordering},
};

use crate::{
    ast::Ast,
    error::RuntimeError,
    interpreter::{
        builtins::collection::elements,
        evaluator::{
            core::{EvalResult, evaluate},
            environment::Environment,
        },
        value::core::Value,
    },
    util::num::usize_to_f64,
};

/// Source of fresh identifier names.
static GENSYM_COUNTER: AtomicU64 = AtomicU64::new(0);

/// `eval @ value`: evaluates text as source in the calling environment;
/// any other value is returned unchanged.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// assert_eq!(evaluate("x : 2; eval @ {x * 21}", &env).unwrap().to_string(), "42");
/// assert_eq!(evaluate("eval @ [[1]]", &env).unwrap().to_string(), "[1]");
/// ```
pub fn eval(args: &[Value], env: &Rc<Environment>) -> EvalResult<Value> {
    match &args[0] {
        Value::Text(source) => {
            let source = source.borrow().clone();
            evaluate(&source, env)
        },
        other => Ok(other.clone()),
    }
}

/// `eval_ast @ node`: evaluates a syntax tree in the calling environment.
///
/// Values that are not nodes pass through unchanged, which lets macro code
/// treat already evaluated results and trees alike.
pub fn eval_ast(args: &[Value], env: &Rc<Environment>) -> EvalResult<Value> {
    match &args[0] {
        Value::Node(node) => {
            let ast = node.borrow().clone();
            env.eval(&ast)
        },
        other => Ok(other.clone()),
    }
}

/// `gensym @ []`: an identifier node whose name is bound nowhere yet.
///
/// Names start with `$`, which programs rarely use, and carry a counter
/// shared by every environment.
pub fn gensym(_: &[Value], env: &Rc<Environment>) -> EvalResult<Value> {
    loop {
        let n = GENSYM_COUNTER.fetch_add(1, Ordering::Relaxed);
        let name = format!("$g{n}");
        if !env.is_bound(&name) {
            return Ok(Value::from(Ast::Identifier(name)));
        }
    }
}

/// `del @ [names...]`: removes every binding of each name, given as
/// identifier nodes or texts. Returns `1`.
pub fn del(args: &[Value], env: &Rc<Environment>) -> EvalResult<Value> {
    let names = args.iter()
                    .map(|arg| match arg {
                        Value::Node(node) => node.borrow().as_identifier().map(str::to_string).ok_or_else(|| {
                                                 RuntimeError::type_error("del takes identifiers")
                                             }),
                        other => other.as_text("a name to delete"),
                    })
                    .collect::<EvalResult<Vec<_>>>()?;

    for name in &names {
        env.remove(name);
    }
    Ok(Value::from(true))
}

/// `defined @ []`: the names visible in the calling environment, sorted.
pub fn defined(_: &[Value], env: &Rc<Environment>) -> EvalResult<Value> {
    Ok(Value::from(env.names().into_iter().map(Value::from).collect::<Vec<_>>()))
}

/// `ptable @ []`: the precedence table, tightest level first, as
/// `[[operators...], associativity]` pairs.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// let value = evaluate("get @ [ptable @ [], 2]", &env).unwrap();
/// assert_eq!(value.to_string(), "[[^], left]");
/// ```
pub fn ptable(_: &[Value], env: &Rc<Environment>) -> EvalResult<Value> {
    let levels = env.operators()
                    .levels()
                    .iter()
                    .map(|level| {
                        let operators = level.operators.iter().map(|o| Value::from(o.as_str())).collect::<Vec<_>>();
                        Value::from(vec![Value::from(operators), Value::from(level.associativity.to_string())])
                    })
                    .collect::<Vec<_>>();
    Ok(Value::from(levels))
}

/// `op_priority @ text`: the index of the level holding an operator, or
/// `~1` if there is none.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// assert_eq!(evaluate("op_priority @ {*}", &env).unwrap().to_string(), "3");
/// assert_eq!(evaluate("op_priority @ {&&}", &env).unwrap().to_string(), "-1");
/// ```
pub fn op_priority(args: &[Value], env: &Rc<Environment>) -> EvalResult<Value> {
    let token = args[0].as_text("the operator")?;
    let level = env.operators().level_of(&token);
    Ok(Value::from(level.map_or(-1.0, usize_to_f64)))
}

/// `trycatch @- [attempt, fallback]`: evaluates `attempt`, and if that
/// fails, evaluates `fallback` instead.
///
/// Both clauses are syntax trees, passed either as one list node or as two
/// separate nodes.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// let src = "trycatch @ [`{[undefined_name, 1]}]";
/// assert_eq!(evaluate(src, &env).unwrap().to_string(), "1");
/// ```
pub fn trycatch(args: &[Value], env: &Rc<Environment>) -> EvalResult<Value> {
    let clauses = match args {
        [list] => elements(list, "the clauses of trycatch")?,
        pair => pair.to_vec(),
    };
    let [attempt, fallback] = clauses.as_slice() else {
        return Err(RuntimeError::ArgumentCountMismatch { expected: "2 clauses".to_string(),
                                                         found:    clauses.len(), });
    };
    let attempt = attempt.as_node("the first clause of trycatch")?;
    let fallback = fallback.as_node("the second clause of trycatch")?;

    let attempt = attempt.borrow().clone();
    match env.eval(&attempt) {
        Ok(value) => Ok(value),
        Err(error) => {
            tracing::debug!(%error, "trycatch recovered");
            let fallback = fallback.borrow().clone();
            env.eval(&fallback)
        },
    }
}

/// `throw @ value`: raises an error carrying the value's display form.
pub fn throw(args: &[Value], _: &Rc<Environment>) -> EvalResult<Value> {
    Err(RuntimeError::User { message: args[0].to_string() })
}
