use std::{f64::consts, fmt, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{
        builtins::{collection, functional, math, meta, node, object, text},
        evaluator::{core::EvalResult, environment::Environment},
        value::core::Value,
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives its arguments, already checked against its arity, and
/// the environment it was applied in.
type BuiltinFn = fn(&[Value], &Rc<Environment>) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
/// - `AtLeast(n)` means `n` or more arguments.
#[derive(Debug, Clone, Copy)]
pub enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    AtLeast(usize),
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::OneOf(arr) => arr.contains(&n),
            Self::AtLeast(m) => n >= m,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(m) => write!(f, "{m}"),
            Self::OneOf(arr) => {
                let options = arr.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(f, "one of {}", options.join(", "))
            },
            Self::AtLeast(m) => write!(f, "at least {m}"),
        }
    }
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for registration),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of every native builtin, in registration order.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "get"         => { arity: Arity::Exact(2), func: collection::get },
    "set"         => { arity: Arity::Exact(3), func: collection::set },
    "push"        => { arity: Arity::Exact(2), func: collection::push },
    "pop"         => { arity: Arity::Exact(1), func: collection::pop },
    "len"         => { arity: Arity::Exact(1), func: collection::len },
    "slice"       => { arity: Arity::OneOf(&[2, 3]), func: collection::slice },
    "splice"      => { arity: Arity::AtLeast(3), func: collection::splice },
    "concat"      => { arity: Arity::AtLeast(0), func: collection::concat },
    "dup"         => { arity: Arity::Exact(1), func: collection::dup },
    "range"       => { arity: Arity::OneOf(&[2, 3]), func: collection::range },
    "split"       => { arity: Arity::Exact(2), func: collection::split },
    "join"        => { arity: Arity::Exact(2), func: collection::join },
    "map"         => { arity: Arity::Exact(2), func: functional::map },
    "filter"      => { arity: Arity::Exact(2), func: functional::filter },
    "reduce"      => { arity: Arity::OneOf(&[2, 3]), func: |args, env| functional::fold(args, env, false) },
    "accumulate"  => { arity: Arity::OneOf(&[2, 3]), func: |args, env| functional::fold(args, env, true) },
    "object"      => { arity: Arity::Exact(0), func: object::object },
    "keys"        => { arity: Arity::Exact(1), func: object::keys },
    "values"      => { arity: Arity::Exact(1), func: object::values },
    "items"       => { arity: Arity::Exact(1), func: object::items },
    "haskey"      => { arity: Arity::Exact(2), func: object::haskey },
    "delkey"      => { arity: Arity::Exact(2), func: object::delkey },
    "re"          => { arity: Arity::Exact(1), func: math::re },
    "im"          => { arity: Arity::Exact(1), func: math::im },
    "abs"         => { arity: Arity::Exact(1), func: math::abs },
    "sqrt"        => { arity: Arity::Exact(1), func: |args, _| math::complex_fn("sqrt", args, |c| c.sqrt()) },
    "exp"         => { arity: Arity::Exact(1), func: |args, _| math::complex_fn("exp", args, |c| c.exp()) },
    "floor"       => { arity: Arity::Exact(1), func: |args, _| math::real_fn("floor", args, f64::floor) },
    "ceil"        => { arity: Arity::Exact(1), func: |args, _| math::real_fn("ceil", args, f64::ceil) },
    "round"       => { arity: Arity::Exact(1), func: |args, _| math::real_fn("round", args, f64::round) },
    "ln"          => { arity: Arity::Exact(1), func: |args, _| math::real_fn("ln", args, f64::ln) },
    "log10"       => { arity: Arity::Exact(1), func: |args, _| math::real_fn("log10", args, f64::log10) },
    "log2"        => { arity: Arity::Exact(1), func: |args, _| math::real_fn("log2", args, f64::log2) },
    "sin"         => { arity: Arity::Exact(1), func: |args, _| math::real_fn("sin", args, f64::sin) },
    "cos"         => { arity: Arity::Exact(1), func: |args, _| math::real_fn("cos", args, f64::cos) },
    "tan"         => { arity: Arity::Exact(1), func: |args, _| math::real_fn("tan", args, f64::tan) },
    "asin"        => { arity: Arity::Exact(1), func: |args, _| math::real_fn("asin", args, f64::asin) },
    "acos"        => { arity: Arity::Exact(1), func: |args, _| math::real_fn("acos", args, f64::acos) },
    "atan"        => { arity: Arity::Exact(1), func: |args, _| math::real_fn("atan", args, f64::atan) },
    "sinh"        => { arity: Arity::Exact(1), func: |args, _| math::real_fn("sinh", args, f64::sinh) },
    "cosh"        => { arity: Arity::Exact(1), func: |args, _| math::real_fn("cosh", args, f64::cosh) },
    "tanh"        => { arity: Arity::Exact(1), func: |args, _| math::real_fn("tanh", args, f64::tanh) },
    "lower"       => { arity: Arity::Exact(1), func: text::lower },
    "upper"       => { arity: Arity::Exact(1), func: text::upper },
    "trim"        => { arity: Arity::Exact(1), func: text::trim },
    "replace"     => { arity: Arity::Exact(3), func: text::replace },
    "starts_with" => { arity: Arity::Exact(2), func: text::starts_with },
    "ends_with"   => { arity: Arity::Exact(2), func: text::ends_with },
    "str"         => { arity: Arity::Exact(1), func: text::str },
    "getleft"     => { arity: Arity::Exact(1), func: node::getleft },
    "getright"    => { arity: Arity::Exact(1), func: node::getright },
    "getop"       => { arity: Arity::Exact(1), func: node::getop },
    "setleft"     => { arity: Arity::Exact(2), func: node::setleft },
    "setright"    => { arity: Arity::Exact(2), func: node::setright },
    "setop"       => { arity: Arity::Exact(2), func: node::setop },
    "getname"     => { arity: Arity::Exact(1), func: node::getname },
    "setname"     => { arity: Arity::Exact(2), func: node::setname },
    "gettext"     => { arity: Arity::Exact(1), func: node::gettext },
    "settext"     => { arity: Arity::Exact(2), func: node::settext },
    "getsubasts"  => { arity: Arity::Exact(1), func: node::getsubasts },
    "getast"      => { arity: Arity::Exact(1), func: node::getast },
    "getbody"     => { arity: Arity::Exact(1), func: node::getbody },
    "setbody"     => { arity: Arity::Exact(2), func: node::setbody },
    "getparams"   => { arity: Arity::Exact(1), func: node::getparams },
    "islist"      => { arity: Arity::Exact(1), func: |args, _| Ok(Value::from(matches!(args[0], Value::List(_)))) },
    "isnum"       => { arity: Arity::Exact(1), func: |args, _| Ok(Value::from(matches!(args[0], Value::Number(_)))) },
    "isfun"       => { arity: Arity::Exact(1), func: |args, _| Ok(Value::from(args[0].is_callable())) },
    "isstr"       => { arity: Arity::Exact(1), func: |args, _| Ok(Value::from(matches!(args[0], Value::Text(_)))) },
    "isobj"       => { arity: Arity::Exact(1), func: |args, _| Ok(Value::from(matches!(args[0], Value::Object(_)))) },
    "isnodeast"   => { arity: Arity::Exact(1), func: |args, _| node::is_node(&args[0], "quoted node") },
    "isnodestr"   => { arity: Arity::Exact(1), func: |args, _| node::is_node(&args[0], "text node") },
    "isnodelist"  => { arity: Arity::Exact(1), func: |args, _| node::is_node(&args[0], "list node") },
    "isnodenum"   => { arity: Arity::Exact(1), func: |args, _| node::is_node(&args[0], "number node") },
    "isnodeexpr"  => { arity: Arity::Exact(1), func: |args, _| node::is_node(&args[0], "expression body") },
    "isnodeident" => { arity: Arity::Exact(1), func: |args, _| node::is_node(&args[0], "identifier") },
    "isnodeop"    => { arity: Arity::Exact(1), func: |args, _| node::is_node(&args[0], "operation") },
    "eval"        => { arity: Arity::Exact(1), func: meta::eval },
    "eval_ast"    => { arity: Arity::Exact(1), func: meta::eval_ast },
    "gensym"      => { arity: Arity::Exact(0), func: meta::gensym },
    "del"         => { arity: Arity::AtLeast(0), func: meta::del },
    "defined"     => { arity: Arity::Exact(0), func: meta::defined },
    "ptable"      => { arity: Arity::Exact(0), func: meta::ptable },
    "op_priority" => { arity: Arity::Exact(1), func: meta::op_priority },
    "trycatch"    => { arity: Arity::OneOf(&[1, 2]), func: meta::trycatch },
    "throw"       => { arity: Arity::Exact(1), func: meta::throw },
}

/// Installs every native builtin and the numeric constants into `env`.
///
/// Each builtin checks its argument count before running.
///
/// # Example
/// ```
/// use std::rc::Rc;
///
/// use tbl::interpreter::{
///     builtins::core::{BUILTIN_FUNCTIONS, register_natives},
///     evaluator::{core::evaluate, environment::Environment},
/// };
///
/// let env = Rc::new(Environment::new());
/// register_natives(&env);
///
/// assert!(BUILTIN_FUNCTIONS.iter().all(|name| env.is_bound(name)));
/// assert!(evaluate("len @ [1, 2]", &env).is_err());
/// ```
pub fn register_natives(env: &Environment) {
    for def in BUILTIN_TABLE {
        let (name, arity, func) = (def.name, def.arity, def.func);
        env.register_builtin(name, move |args, env| {
               if !arity.check(args.len()) {
                   return Err(RuntimeError::ArgumentCountMismatch { expected: arity.to_string(),
                                                                    found:    args.len(), });
               }
               func(&args, env)
           });
    }

    env.bind("PI", Value::from(consts::PI));
    env.bind("E", Value::from(consts::E));
    tracing::debug!(count = BUILTIN_TABLE.len(), "registered native builtins");
}
