use std::{fmt::Write, rc::Rc};

use crate::{
    ast::{Ast, TextLiteral, TextSegment},
    error::RuntimeError,
    interpreter::{
        evaluator::{binary::core::BinaryOperator, environment::Environment},
        lexer::tokenize,
        parser::{
            core::parse_statement,
            precedence::{
                BIND, CONDITIONAL, DEFINITION, FOR, MACRO_BIND, OPERATOR_BIND, PARTIAL,
                VARIADIC_DEFINITION, WHILE, is_application,
            },
        },
        value::{complex::ComplexNumber, core::Value},
    },
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Deepest nesting of function applications before evaluation gives up with
/// `RuntimeError::RecursionLimit`.
pub const MAX_CALL_DEPTH: usize = 10_000;

/// Parses and evaluates every statement of `source` in `env`.
///
/// Returns the value of the last statement, or `0` for empty input.
/// Statements are parsed one at a time against the live operator table.
/// When a statement changes that table, the rest of the source is tokenized
/// again so that operators defined earlier in the same source are recognised
/// by later statements.
///
/// # Errors
/// The first lexing, parsing or runtime error aborts evaluation.
///
/// # Example
/// ```
/// use tbl::interpreter::evaluator::{core::evaluate, environment::Environment};
///
/// let env = Environment::with_builtins();
/// assert_eq!(evaluate("x : 3; y : 4; x + y", &env).unwrap().to_string(), "7");
///
/// // An operator defined by one statement is usable by the next.
/// let src = "{<+>} << [3.5, [a, b] -> a * 10 + b]; 1 <+> 2 + 3";
/// assert_eq!(evaluate(src, &env).unwrap().to_string(), "15");
/// ```
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn evaluate(source: &str, env: &Rc<Environment>) -> EvalResult<Value> {
    let mut result = Value::default();
    let mut rest = source;

    'tokenize: loop {
        let (groups, generation) = {
            let table = env.operators();
            (tokenize(rest, &table.glyphs())?, table.generation())
        };

        for group in &groups {
            let statement = parse_statement(&group.tokens, &env.operators())?;
            if let Some(ast) = statement {
                result = env.eval(&ast)?;
            }

            if env.operators().generation() != generation {
                tracing::debug!(offset = group.end, "operator table changed, tokenizing the rest again");
                rest = rest.get(group.end..).unwrap_or("");
                continue 'tokenize;
            }
        }

        return Ok(result);
    }
}

impl Environment {
    /// Evaluates a syntax tree and returns the resulting value.
    ///
    /// This is the main entry point for tree evaluation. Literals and
    /// identifiers evaluate directly; lists evaluate their elements in order;
    /// expression bodies evaluate to their last statement (`0` when empty);
    /// quoted trees evaluate to a fresh copy of the tree they wrap.
    ///
    /// # Parameters
    /// - `ast`: Tree to evaluate.
    ///
    /// # Returns
    /// The value of the tree.
    pub fn eval(self: &Rc<Self>, ast: &Ast) -> EvalResult<Value> {
        ensure_sufficient_stack(|| self.eval_node(ast))
    }

    fn eval_node(self: &Rc<Self>, ast: &Ast) -> EvalResult<Value> {
        match ast {
            Ast::ExprBody(statements) => {
                let mut value = Value::default();
                for statement in statements {
                    value = self.eval(statement)?;
                }
                Ok(value)
            },
            Ast::List(elements) => {
                let values = elements.iter()
                                     .map(|e| self.eval(e))
                                     .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::from(values))
            },
            Ast::Number { real, imaginary } => Ok(Value::from(ComplexNumber::new(*real, *imaginary))),
            Ast::Text(text) => self.eval_text(text),
            Ast::Identifier(name) => self.lookup(name),
            Ast::Operation { operator, left, right } => self.eval_operation(operator, left, right),
            Ast::Quoted(inner) => Ok(Value::from((**inner).clone())),
        }
    }

    /// Builds a text value, stringifying and splicing each interpolation.
    fn eval_text(self: &Rc<Self>, text: &TextLiteral) -> EvalResult<Value> {
        let mut out = String::new();
        for segment in &text.segments {
            match segment {
                TextSegment::Literal(s) => out.push_str(s),
                TextSegment::Splice(ast) => {
                    let value = self.eval(ast)?;
                    let _ = write!(out, "{value}");
                },
            }
        }
        Ok(Value::from(out))
    }

    /// Dispatches an operation node.
    ///
    /// Binding and operator definition come first and can not be overridden.
    /// User defined operators are tried next, then the language's own
    /// constructs, and finally arithmetic and comparison.
    fn eval_operation(self: &Rc<Self>, operator: &str, left: &Ast, right: &Ast) -> EvalResult<Value> {
        match operator {
            BIND => return self.eval_bind(left, right),
            OPERATOR_BIND | MACRO_BIND => return self.eval_operator_definition(operator, left, right),
            _ => {},
        }

        let user = self.operators().user_operator(operator).cloned();
        if let Some(user) = user {
            return self.apply_user_operator(&user, left, right);
        }

        match operator {
            DEFINITION | VARIADIC_DEFINITION => self.eval_definition(operator, left, right),
            PARTIAL => self.eval_partial(left, right),
            CONDITIONAL => self.eval_conditional(left, right),
            WHILE => self.eval_while(left, right),
            FOR => self.eval_for(left, right),
            _ if is_application(operator) => self.eval_application(operator, left, right),
            _ => {
                let op = BinaryOperator::from_token(operator).ok_or_else(|| {
                             RuntimeError::UnknownOperator { operator: operator.to_string() }
                         })?;
                let l = self.eval(left)?;
                let r = self.eval(right)?;
                Self::eval_binary(op, &l, &r)
            },
        }
    }
}
