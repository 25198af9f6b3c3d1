use std::collections::HashSet;

use logos::Logos;

use crate::{
    error::ParseError,
    interpreter::{parser::core::ParseResult, value::complex::ComplexNumber},
};

/// Glyph that separates statements.
pub const STATEMENT_SEPARATOR: char = ';';
/// Glyph that separates list elements.
pub const ELEMENT_SEPARATOR: char = ',';
/// Glyph that marks a negative number literal, as in `~3`.
pub const NEGATIVE: char = '~';
/// Glyph that turns a text group into a quoted syntax tree.
pub const QUOTE: char = '`';
/// Escape glyph inside text literals.
pub const ESCAPE: char = '\\';
/// Opens a line comment; the comment runs to the end of the line.
pub const COMMENT: &str = "--";

/// A literal token, classified after the state machine has cut it out of the
/// source.
///
/// The state machine decides *where* tokens start and end; `Leaf` decides
/// whether a number-like or word-like token is well formed and what it means.
///
/// # Example
/// ```
/// use tbl::interpreter::{lexer::{Leaf, classify}, value::complex::ComplexNumber};
///
/// assert_eq!(classify("~2.5i"), Some(Leaf::Number(ComplexNumber::new(0.0, -2.5))));
/// assert_eq!(classify("foo_1"), Some(Leaf::Identifier("foo_1".to_string())));
/// assert_eq!(classify("1.2.3"), None);
/// ```
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Leaf {
    /// Decimal literals with optional `~` negation, exponent and trailing
    /// `i`, such as `3`, `2.5e-3`, `~1` or `4i`.
    #[regex(r"~?[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?i?", parse_number)]
    Number(ComplexNumber),
    /// Names such as `x`, `_`, `$` or `my_list2`.
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice().to_string())]
    Identifier(String),
}

/// Reads a number literal into a complex number.
fn parse_number(lex: &logos::Lexer<Leaf>) -> Option<ComplexNumber> {
    let slice = lex.slice();
    let (negative, rest) = slice.strip_prefix(NEGATIVE)
                                .map_or((false, slice), |rest| (true, rest));
    let (imaginary, digits) = rest.strip_suffix('i')
                                  .map_or((false, rest), |digits| (true, digits));

    let magnitude = digits.parse::<f64>().ok()?;
    let value = if negative { -magnitude } else { magnitude };

    Some(if imaginary {
             ComplexNumber::new(0.0, value)
         } else {
             ComplexNumber::new(value, 0.0)
         })
}

/// Classifies a whole token as a literal.
///
/// Returns `None` unless a single [`Leaf`] covers the entire token.
#[must_use]
pub fn classify(token: &str) -> Option<Leaf> {
    let mut lexer = Leaf::lexer(token);
    let leaf = lexer.next()?.ok()?;
    if lexer.span().end != token.len() {
        return None;
    }
    lexer.next().is_none().then_some(leaf)
}

/// Whether `c` may appear in an operator token.
///
/// Delimiters, separators, the quote, escape and negation glyphs and the
/// identifier characters `_` and `$` are excluded.
#[must_use]
pub fn is_operator_char(c: char) -> bool {
    c.is_ascii_punctuation() && !"()[]{},;`\\_$~\"".contains(c)
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// The tokens of one statement, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementGroup {
    /// Raw token text: literals, identifiers, operators and whole
    /// parenthesised, bracketed or braced groups including their delimiters.
    pub tokens: Vec<String>,
    /// Byte offset just past the separator that closed this statement, or the
    /// length of the input for the last statement.
    pub end:    usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Operator,
    Number,
    Identifier,
    Expression,
    List,
    Text,
    Comment,
}

/// Nesting inside an expression or list group.
///
/// Only the group's own delimiter pair changes `depth`; braces are tracked
/// separately so a text literal may contain unbalanced `(` or `]`.
#[derive(Debug, Default)]
struct GroupDepth {
    depth:      usize,
    text_depth: usize,
    escaped:    bool,
    comment:    bool,
}

struct Tokenizer<'a> {
    glyphs:     &'a HashSet<char>,
    state:      State,
    token:      String,
    group:      StatementGroup,
    groups:     Vec<StatementGroup>,
    nesting:    GroupDepth,
    line:       usize,
    group_line: usize,
}

impl<'a> Tokenizer<'a> {
    fn new(glyphs: &'a HashSet<char>) -> Self {
        Self { glyphs,
               state: State::Start,
               token: String::new(),
               group: StatementGroup { tokens: Vec::new(),
                                       end:    0, },
               groups: Vec::new(),
               nesting: GroupDepth::default(),
               line: 1,
               group_line: 1 }
    }

    fn emit(&mut self) {
        if !self.token.is_empty() {
            self.group.tokens.push(std::mem::take(&mut self.token));
        }
        self.state = State::Start;
    }

    fn close_statement(&mut self, end: usize) {
        let group = std::mem::replace(&mut self.group,
                                      StatementGroup { tokens: Vec::new(),
                                                       end:    0, });
        if !group.tokens.is_empty() {
            self.groups.push(StatementGroup { end, ..group });
        }
    }

    fn open_group(&mut self, state: State, c: char) {
        self.state = state;
        self.token.push(c);
        self.nesting = GroupDepth { depth: 1,
                                    ..GroupDepth::default() };
        self.group_line = self.line;
    }

    /// Processes one character. Returns `false` when the character must be
    /// fed again from the start state.
    fn step(&mut self, c: char, next: Option<char>, offset: usize) -> ParseResult<bool> {
        match self.state {
            State::Start => self.start(c, next, offset)?,
            State::Operator => {
                if !self.glyphs.contains(&c) {
                    self.emit();
                    return Ok(false);
                }
                self.token.push(c);
            },
            State::Number => {
                let after_exponent = self.token.ends_with(['e', 'E']);
                let accepted = c.is_ascii_digit()
                               || matches!(c, '.' | 'e' | 'E' | 'i')
                               || (after_exponent && matches!(c, '+' | '-'));
                if !accepted {
                    self.emit();
                    return Ok(false);
                }
                self.token.push(c);
            },
            State::Identifier => {
                if !is_identifier_char(c) {
                    self.emit();
                    return Ok(false);
                }
                self.token.push(c);
            },
            State::Expression => self.group_char(c, next, '(', ')'),
            State::List => self.group_char(c, next, '[', ']'),
            State::Text => {
                self.token.push(c);
                if self.nesting.escaped {
                    self.nesting.escaped = false;
                } else if c == ESCAPE {
                    self.nesting.escaped = true;
                } else if c == '{' {
                    self.nesting.depth += 1;
                } else if c == '}' {
                    self.nesting.depth -= 1;
                    if self.nesting.depth == 0 {
                        self.emit();
                    }
                }
            },
            State::Comment => {
                if c == '\n' {
                    self.state = State::Start;
                }
            },
        }
        Ok(true)
    }

    fn start(&mut self, c: char, next: Option<char>, offset: usize) -> ParseResult<()> {
        match c {
            STATEMENT_SEPARATOR => self.close_statement(offset + c.len_utf8()),
            '(' => self.open_group(State::Expression, c),
            '[' => self.open_group(State::List, c),
            '{' => self.open_group(State::Text, c),
            QUOTE => {
                if next != Some('{') {
                    return Err(ParseError::DanglingQuote { line: self.line });
                }
                self.token.push(c);
            },
            ')' | ']' | '}' => {
                return Err(ParseError::UnmatchedDelimiter { delimiter: c,
                                                            line:      self.line, });
            },
            '-' if next == Some('-') => self.state = State::Comment,
            _ if c.is_whitespace() => {},
            _ if self.glyphs.contains(&c) => {
                self.state = State::Operator;
                self.token.push(c);
            },
            _ if c.is_ascii_digit() || c == NEGATIVE => {
                self.state = State::Number;
                self.token.push(c);
            },
            _ if is_identifier_start(c) => {
                self.state = State::Identifier;
                self.token.push(c);
            },
            // Characters outside the live glyph set become single-character
            // tokens; the parser reports them if they are still unknown then.
            _ => self.group.tokens.push(c.to_string()),
        }
        Ok(())
    }

    fn group_char(&mut self, c: char, next: Option<char>, open: char, close: char) {
        let nesting = &mut self.nesting;

        if nesting.comment {
            if c == '\n' {
                nesting.comment = false;
                self.token.push(c);
            }
            return;
        }

        self.token.push(c);

        if nesting.text_depth > 0 {
            if nesting.escaped {
                nesting.escaped = false;
            } else if c == ESCAPE {
                nesting.escaped = true;
            } else if c == '{' {
                nesting.text_depth += 1;
            } else if c == '}' {
                nesting.text_depth -= 1;
            }
            return;
        }

        if c == '{' {
            nesting.text_depth = 1;
        } else if c == '-' && next == Some('-') {
            self.token.pop();
            nesting.comment = true;
        } else if c == open {
            nesting.depth += 1;
        } else if c == close {
            nesting.depth -= 1;
            if nesting.depth == 0 {
                self.emit();
            }
        }
    }

    fn finish(mut self, len: usize) -> ParseResult<Vec<StatementGroup>> {
        let (group, expected) = match self.state {
            State::Expression => ("expression", ')'),
            State::List => ("list", ']'),
            State::Text => ("text", '}'),
            _ => {
                self.emit();
                self.close_statement(len);
                return Ok(self.groups);
            },
        };

        Err(ParseError::IncompleteGroup { group,
                                          expected,
                                          line: self.group_line })
    }
}

/// Splits source text into statement groups of raw tokens.
///
/// `glyphs` is the set of characters that may form operator tokens; it comes
/// from the live operator table so user defined operators made of new
/// characters are cut out as a single token. Runs of glyph characters are
/// taken greedily.
///
/// # Errors
/// - `ParseError::UnmatchedDelimiter` for a closing delimiter with no opener.
/// - `ParseError::IncompleteGroup` when input ends inside a group.
/// - `ParseError::DanglingQuote` for a quote glyph not followed by `{`.
///
/// # Example
/// ```
/// use tbl::interpreter::{lexer::tokenize, parser::precedence::OperatorTable};
///
/// let glyphs = OperatorTable::default().glyphs();
/// let groups = tokenize("x : 3; f @ [x, {a;b}] -- done", &glyphs).unwrap();
///
/// assert_eq!(groups.len(), 2);
/// assert_eq!(groups[0].tokens, vec!["x", ":", "3"]);
/// assert_eq!(groups[1].tokens, vec!["f", "@", "[x, {a;b}]"]);
/// ```
pub fn tokenize(text: &str, glyphs: &HashSet<char>) -> ParseResult<Vec<StatementGroup>> {
    let mut tokenizer = Tokenizer::new(glyphs);
    let chars = text.char_indices().collect::<Vec<_>>();

    let mut i = 0;
    while i < chars.len() {
        let (offset, c) = chars[i];
        let next = chars.get(i + 1).map(|&(_, n)| n);

        if tokenizer.step(c, next, offset)? {
            if c == '\n' {
                tokenizer.line += 1;
            }
            i += 1;
        }
    }

    tokenizer.finish(text.len())
}
