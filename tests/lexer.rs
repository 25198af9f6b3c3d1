use std::collections::HashSet;

use tbl::{
    error::ParseError,
    interpreter::{
        lexer::{Leaf, classify, tokenize},
        parser::precedence::OperatorTable,
        value::complex::ComplexNumber,
    },
};

fn glyphs() -> HashSet<char> {
    OperatorTable::default().glyphs()
}

fn tokens(src: &str) -> Vec<Vec<String>> {
    tokenize(src, &glyphs()).unwrap()
                            .into_iter()
                            .map(|group| group.tokens)
                            .collect()
}

#[test]
fn splits_statements_on_separators() {
    assert_eq!(tokens("x : 1; y"), vec![vec!["x", ":", "1"], vec!["y"]]);
    assert_eq!(tokens(";;x;"), vec![vec!["x"]]);
    assert!(tokens("   ").is_empty());
}

#[test]
fn statement_ends_point_past_the_separator() {
    let groups = tokenize("a; b", &glyphs()).unwrap();
    assert_eq!(groups[0].end, 2);
    assert_eq!(groups[1].end, 4);
}

#[test]
fn operators_are_cut_greedily_without_spaces() {
    assert_eq!(tokens("a+b"), vec![vec!["a", "+", "b"]]);
    assert_eq!(tokens("a<=b"), vec![vec!["a", "<=", "b"]]);
    assert_eq!(tokens("f @!! x"), vec![vec!["f", "@!!", "x"]]);
    assert_eq!(tokens("a+-b"), vec![vec!["a", "+-", "b"]]);
}

#[test]
fn characters_outside_the_glyph_set_stand_alone() {
    assert_eq!(tokens("a&&b"), vec![vec!["a", "&", "&", "b"]]);

    let mut extended = glyphs();
    extended.insert('&');
    let groups = tokenize("a&&b", &extended).unwrap();
    assert_eq!(groups[0].tokens, vec!["a", "&&", "b"]);
}

#[test]
fn groups_are_single_tokens() {
    assert_eq!(tokens("f @ [(1, 2), {a]b}]"), vec![vec!["f", "@", "[(1, 2), {a]b}]"]]);
    assert_eq!(tokens("(a; b) + 1"), vec![vec!["(a; b)", "+", "1"]]);
    assert_eq!(tokens("{a;b}"), vec![vec!["{a;b}"]]);
    assert_eq!(tokens("{a {b} c}"), vec![vec!["{a {b} c}"]]);
    assert_eq!(tokens("{a\\}b}"), vec![vec!["{a\\}b}"]]);
    assert_eq!(tokens("`{x + 1}"), vec![vec!["`{x + 1}"]]);
}

#[test]
fn comments_run_to_the_end_of_the_line() {
    assert_eq!(tokens("x : 1 -- set x; y : 2\nx"), vec![vec!["x", ":", "1", "x"]]);

    let groups = tokens("[1, -- first\n 2]");
    assert_eq!(groups.len(), 1);
    assert!(!groups[0][0].contains("first"));
}

#[test]
fn numbers_and_identifiers() {
    assert_eq!(tokens("~2.5e3i + x_1"), vec![vec!["~2.5e3i", "+", "x_1"]]);
    assert_eq!(tokens("$ @ _"), vec![vec!["$", "@", "_"]]);
}

#[test]
fn classify_reads_literals() {
    assert_eq!(classify("42"), Some(Leaf::Number(ComplexNumber::new(42.0, 0.0))));
    assert_eq!(classify("~1.5i"), Some(Leaf::Number(ComplexNumber::new(0.0, -1.5))));
    assert_eq!(classify("2e2"), Some(Leaf::Number(ComplexNumber::new(200.0, 0.0))));
    assert_eq!(classify("$g1"), Some(Leaf::Identifier("$g1".to_string())));
    assert_eq!(classify("1.2.3"), None);
    assert_eq!(classify("~"), None);
}

#[test]
fn unbalanced_input_is_rejected() {
    assert!(matches!(tokenize("[1, 2", &glyphs()),
                     Err(ParseError::IncompleteGroup { expected: ']', .. })));
    assert!(matches!(tokenize("{abc", &glyphs()),
                     Err(ParseError::IncompleteGroup { expected: '}', .. })));
    assert!(matches!(tokenize("1)", &glyphs()),
                     Err(ParseError::UnmatchedDelimiter { delimiter: ')', .. })));
    assert!(matches!(tokenize("`x", &glyphs()), Err(ParseError::DanglingQuote { .. })));
}

#[test]
fn errors_report_the_line() {
    let err = tokenize("a;\nb;\n(c", &glyphs()).unwrap_err();
    assert!(matches!(err, ParseError::IncompleteGroup { line: 3, .. }));
}
