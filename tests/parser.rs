use tbl::{
    ast::Ast,
    error::ParseError,
    interpreter::{
        parser::{
            core::parse,
            precedence::{Associativity, OperatorDefinition, OperatorTable, UserOperator},
        },
        value::core::Value,
    },
};

fn parsed(src: &str) -> String {
    parse(src, &OperatorTable::default()).unwrap().to_string()
}

fn with_operator(token: &str, precedence: f64, associativity: Associativity) -> OperatorTable {
    let mut table = OperatorTable::default();
    table.define(OperatorDefinition { token: token.to_string(),
                                      precedence,
                                      associativity,
                                      force: false,
                                      operator: UserOperator { function: Value::default(),
                                                               eager:    true, } })
         .unwrap();
    table
}

#[test]
fn tighter_levels_collapse_first() {
    assert_eq!(parsed("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(parsed("f @ x + 1"), "((f @ x) + 1)");
    assert_eq!(parsed("x : 1 < 2 ? [a, b]"), "(x : ((1 < 2) ? [a, b]))");
    assert_eq!(parsed("f'[_, 1] @ 2"), "((f ' [_, 1]) @ 2)");
}

#[test]
fn left_levels_group_leftmost_first() {
    assert_eq!(parsed("8 - 4 - 2"), "((8 - 4) - 2)");
    assert_eq!(parsed("2 ^ 3 ^ 2"), "((2 ^ 3) ^ 2)");
}

#[test]
fn definitions_group_to_the_right() {
    assert_eq!(parsed("a -> b => a"), "(a -> (b => a))");
    assert_eq!(parsed("f : x -> x + 1"), "(f : (x -> (x + 1)))");
}

#[test]
fn scoped_applications_share_the_application_level() {
    assert_eq!(parsed("f @!! x * 2"), "((f @!! x) * 2)");
}

#[test]
fn groups_lists_and_bodies() {
    assert_eq!(parsed("[1, 2, 3]"), "([1, 2, 3])");
    assert_eq!(parsed("[]"), "([])");
    assert_eq!(parsed("[1, , 2]"), "([1, (), 2])");
    assert_eq!(parsed("(1 + 2)"), "(1 + 2)");
    assert_eq!(parsed("(1; 2)"), "((1; 2))");
    assert_eq!(parsed("()"), "(())");
    assert_eq!(parsed("a; b"), "(a; b)");
}

#[test]
fn literals() {
    assert_eq!(parsed("~3"), "(~3)");
    assert_eq!(parsed("2i"), "(2i)");
    assert_eq!(parsed("{a {b} c}"), "({a {b} c})");
}

#[test]
fn quoted_groups_parse_as_code() {
    let ast = parse("`{1 + x}", &OperatorTable::default()).unwrap();
    let Ast::ExprBody(statements) = ast else {
        panic!("expected an expression body");
    };
    let Ast::Quoted(inner) = &statements[0] else {
        panic!("expected a quoted node, found {}", statements[0]);
    };
    assert_eq!(**inner, Ast::operation("+", Ast::number(1.0), Ast::identifier("x")));

    assert!(matches!(&statements[0], Ast::Quoted(_)));
    assert_eq!(parsed("`{[]}"), "(`{[]})");
}

#[test]
fn user_operators_follow_their_level() {
    let tight = with_operator("<>", 3.5, Associativity::Left);
    let ast = parse("a <> b + c", &tight).unwrap();
    assert_eq!(ast.to_string(), "((a <> b) + c)");

    let loose = with_operator("<>", 4.5, Associativity::Left);
    let ast = parse("a <> b + c", &loose).unwrap();
    assert_eq!(ast.to_string(), "(a <> (b + c))");
}

#[test]
fn right_associative_user_level() {
    let table = with_operator("|>", 4.5, Associativity::Right);
    let ast = parse("a |> b |> c", &table).unwrap();
    assert_eq!(ast.to_string(), "(a |> (b |> c))");
}

#[test]
fn malformed_statements_are_rejected() {
    let table = OperatorTable::default();
    assert!(matches!(parse("1 +", &table), Err(ParseError::MissingOperand { .. })));
    assert!(matches!(parse("* 2", &table), Err(ParseError::MissingOperand { .. })));
    assert!(matches!(parse("1 2", &table), Err(ParseError::MalformedAst { .. })));
    assert!(matches!(parse("1 & 2", &table), Err(ParseError::UnknownOperator { .. })));
    assert!(matches!(parse("1.2.3", &table), Err(ParseError::InvalidLiteral { .. })));
}

#[test]
fn errors_inside_groups_propagate() {
    let table = OperatorTable::default();
    assert!(parse("[1, 2 +]", &table).is_err());
    assert!(parse("(f @)", &table).is_err());
    assert!(parse("{a {1 +} b}", &table).is_err());
}
