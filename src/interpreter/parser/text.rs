use crate::{
    ast::{TextLiteral, TextSegment},
    error::ParseError,
    interpreter::{
        lexer::ESCAPE,
        parser::{
            core::{ParseResult, parse_body},
            precedence::OperatorTable,
        },
    },
};

/// Character produced by an escape sequence.
///
/// `\n`, `\t`, `\r` and `\s` name whitespace; any other escaped character
/// stands for itself.
const fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        's' => ' ',
        other => other,
    }
}

/// Parses the body of a text literal into literal runs and interpolated
/// expressions.
///
/// Every unescaped `{...}` inside the body is parsed as an expression with
/// the current operator table and spliced in when the literal is evaluated.
///
/// # Errors
/// - `ParseError::IncompleteGroup` for an unterminated interpolation.
/// - Any error raised while parsing an interpolated expression.
///
/// # Example
/// ```
/// use tbl::{
///     ast::TextSegment,
///     interpreter::parser::{precedence::OperatorTable, text::parse_text},
/// };
///
/// let literal = parse_text(r"x = {x}\n", &OperatorTable::default()).unwrap();
/// assert_eq!(literal.segments.len(), 3);
/// assert!(matches!(&literal.segments[2], TextSegment::Literal(s) if s == "\n"));
/// ```
pub fn parse_text(body: &str, table: &OperatorTable) -> ParseResult<TextLiteral> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        if c == ESCAPE {
            if let Some((_, escaped)) = chars.next() {
                literal.push(unescape(escaped));
            }
            continue;
        }
        if c != '{' {
            literal.push(c);
            continue;
        }

        let start = i + c.len_utf8();
        let mut depth = 1;
        let mut escaped = false;
        let mut end = None;
        for (j, d) in chars.by_ref() {
            if escaped {
                escaped = false;
            } else if d == ESCAPE {
                escaped = true;
            } else if d == '{' {
                depth += 1;
            } else if d == '}' {
                depth -= 1;
                if depth == 0 {
                    end = Some(j);
                    break;
                }
            }
        }
        let Some(end) = end else {
            return Err(ParseError::IncompleteGroup { group:    "interpolation",
                                                     expected: '}',
                                                     line:     1, });
        };

        if !literal.is_empty() {
            segments.push(TextSegment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(TextSegment::Splice(parse_body(&body[start..end], table)?));
    }

    if !literal.is_empty() || segments.is_empty() {
        segments.push(TextSegment::Literal(literal));
    }

    Ok(TextLiteral { source: body.to_string(),
                     segments })
}
