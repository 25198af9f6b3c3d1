use crate::{
    ast::Ast,
    error::ParseError,
    interpreter::{
        lexer::{Leaf, QUOTE, classify, is_operator_char, tokenize},
        parser::{
            precedence::{Associativity, OperatorTable},
            text::parse_text,
            utils::{group_body, split_elements},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// A statement while it is being collapsed: either a finished subtree or an
/// operator still waiting for its operands.
#[derive(Debug)]
enum Item {
    Value(Ast),
    Operator(String),
}

/// Parses source text into an expression body holding one node per
/// statement.
///
/// The operator table is a parameter because programs can define operators
/// while they run; callers pass whatever table is live at the time.
///
/// # Errors
/// Any lexing error, plus:
/// - `ParseError::MissingOperand` when an operator lacks a neighbour.
/// - `ParseError::MalformedAst` when a statement does not reduce to one node.
/// - `ParseError::UnknownOperator` / `InvalidLiteral` for tokens nothing
///   recognises.
///
/// # Example
/// ```
/// use tbl::{
///     ast::Ast,
///     interpreter::parser::{core::parse, precedence::OperatorTable},
/// };
///
/// let ast = parse("1 + 2 * 3", &OperatorTable::default()).unwrap();
/// assert_eq!(ast.to_string(), "(1 + (2 * 3))");
///
/// // Definitions associate to the right.
/// let ast = parse("a -> b -> a", &OperatorTable::default()).unwrap();
/// let Ast::ExprBody(statements) = ast else { unreachable!() };
/// assert_eq!(statements[0].to_string(), "a -> (b -> a)");
/// ```
pub fn parse(text: &str, table: &OperatorTable) -> ParseResult<Ast> {
    let statements = tokenize(text, &table.glyphs())?.iter()
                                                     .filter_map(|group| {
                                                         parse_statement(&group.tokens, table).transpose()
                                                     })
                                                     .collect::<ParseResult<Vec<_>>>()?;

    Ok(Ast::ExprBody(statements))
}

/// Parses the inside of a group: a single statement stands for itself,
/// anything else becomes an expression body.
pub fn parse_body(text: &str, table: &OperatorTable) -> ParseResult<Ast> {
    match parse(text, table)? {
        Ast::ExprBody(mut statements) if statements.len() == 1 => Ok(statements.remove(0)),
        body => Ok(body),
    }
}

/// Parses the body of a list literal.
///
/// Whitespace alone is the empty list; otherwise each element between
/// unnested separators is parsed as a group body, so an empty element is an
/// empty expression body.
fn parse_list(body: &str, table: &OperatorTable) -> ParseResult<Ast> {
    if body.trim().is_empty() {
        return Ok(Ast::List(Vec::new()));
    }

    let elements = split_elements(body).into_iter()
                                       .map(|element| parse_body(element, table))
                                       .collect::<ParseResult<Vec<_>>>()?;
    Ok(Ast::List(elements))
}

/// Turns one raw token into a subtree or an operator.
fn classify_token(token: &str, table: &OperatorTable) -> ParseResult<Item> {
    let value = if token.starts_with('(') {
        parse_body(group_body(token, 1), table)?
    } else if token.starts_with('[') {
        parse_list(group_body(token, 1), table)?
    } else if token.starts_with('{') {
        Ast::Text(parse_text(group_body(token, 1), table)?)
    } else if token.starts_with(QUOTE) {
        Ast::Quoted(Box::new(parse_body(group_body(token, 2), table)?))
    } else if table.contains(token) {
        return Ok(Item::Operator(token.to_string()));
    } else {
        match classify(token) {
            Some(Leaf::Number(c)) => Ast::Number { real:      c.real,
                                                   imaginary: c.imaginary, },
            Some(Leaf::Identifier(name)) => Ast::Identifier(name),
            None if token.chars().all(is_operator_char) => {
                return Err(ParseError::UnknownOperator { token: token.to_string() });
            },
            None => return Err(ParseError::InvalidLiteral { token: token.to_string() }),
        }
    };

    Ok(Item::Value(value))
}

/// Collapses every operator of one level, leftmost first for left
/// associative levels and rightmost first for right associative ones.
fn collapse_level(items: &mut Vec<Item>,
                  level: usize,
                  associativity: Associativity,
                  table: &OperatorTable)
                  -> ParseResult<()> {
    let in_level = |item: &Item| matches!(item, Item::Operator(op) if table.level_of(op) == Some(level));

    loop {
        let position = match associativity {
            Associativity::Left => items.iter().position(in_level),
            Associativity::Right => items.iter().rposition(in_level),
        };
        let Some(position) = position else {
            return Ok(());
        };

        let token = match &items[position] {
            Item::Operator(op) => op.clone(),
            Item::Value(_) => String::new(),
        };
        if position == 0 || position + 1 >= items.len() {
            return Err(ParseError::MissingOperand { operator: token });
        }

        let right = items.remove(position + 1);
        let operator = items.remove(position);
        let left = items.remove(position - 1);
        let (Item::Value(left), Item::Operator(operator), Item::Value(right)) = (left, operator, right)
        else {
            return Err(ParseError::MissingOperand { operator: token });
        };

        items.insert(position - 1, Item::Value(Ast::operation(&operator, left, right)));
    }
}

/// Parses one statement group.
///
/// Returns `None` for an empty group.
///
/// # Errors
/// See [`parse`].
pub fn parse_statement(tokens: &[String], table: &OperatorTable) -> ParseResult<Option<Ast>> {
    let mut items = tokens.iter()
                          .map(|token| classify_token(token, table))
                          .collect::<ParseResult<Vec<_>>>()?;
    if items.is_empty() {
        return Ok(None);
    }

    for (level, entry) in table.levels().iter().enumerate() {
        collapse_level(&mut items, level, entry.associativity, table)?;
    }

    match items.pop() {
        Some(Item::Value(ast)) if items.is_empty() => Ok(Some(ast)),
        _ => Err(ParseError::MalformedAst { statement: tokens.join(" ") }),
    }
}
