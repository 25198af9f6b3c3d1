use crate::interpreter::lexer::{COMMENT, ELEMENT_SEPARATOR, ESCAPE};

/// Splits the body of a list literal on separators that are not nested in
/// another group, a text literal or a comment.
///
/// The returned slices borrow from `body` and are not trimmed.
///
/// # Example
/// ```
/// use tbl::interpreter::parser::utils::split_elements;
///
/// let parts = split_elements("a, f @ [1, 2], {x, y}");
/// assert_eq!(parts, vec!["a", " f @ [1, 2]", " {x, y}"]);
/// ```
#[must_use]
pub fn split_elements(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut text_depth = 0usize;
    let mut escaped = false;
    let mut in_comment = false;
    let mut start = 0;

    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        if in_comment {
            in_comment = c != '\n';
            continue;
        }
        if text_depth > 0 {
            if escaped {
                escaped = false;
            } else if c == ESCAPE {
                escaped = true;
            } else if c == '{' {
                text_depth += 1;
            } else if c == '}' {
                text_depth -= 1;
            }
            continue;
        }

        match c {
            '{' => text_depth = 1,
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ if body[i..].starts_with(COMMENT) => {
                chars.next();
                in_comment = true;
            },
            ELEMENT_SEPARATOR if depth == 0 => {
                parts.push(&body[start..i]);
                start = i + c.len_utf8();
            },
            _ => {},
        }
    }
    parts.push(&body[start..]);
    parts
}

/// Strips one leading and one trailing delimiter from a group token.
///
/// The lexer only emits group tokens whose first and last characters are the
/// matching delimiters, so both are single byte ASCII.
#[must_use]
pub fn group_body(token: &str, prefix_len: usize) -> &str {
    token.get(prefix_len..token.len().saturating_sub(1)).unwrap_or("")
}
