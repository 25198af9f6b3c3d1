use std::{collections::{HashMap, HashSet},
          fmt};

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, lexer::is_operator_char, value::core::Value},
};

/// Binds an identifier or destructures into a list of identifiers.
pub const BIND: &str = ":";
/// Defines an operator whose operands are evaluated first.
pub const OPERATOR_BIND: &str = "<<";
/// Defines an operator whose operands are passed as syntax trees.
pub const MACRO_BIND: &str = "<<<";
/// Plain application; `@!`, `@!!`, ... are its scoped forms.
pub const APPLICATION: &str = "@";
/// Marker repeated after `@` to select a scoped application.
pub const SCOPE_MARKER: char = '!';
/// Fixed arity function definition.
pub const DEFINITION: &str = "->";
/// Variadic function definition.
pub const VARIADIC_DEFINITION: &str = "=>";
/// Partial application.
pub const PARTIAL: &str = "'";
/// Two branch conditional.
pub const CONDITIONAL: &str = "?";
/// While loop.
pub const WHILE: &str = "!!";
/// Three clause for loop.
pub const FOR: &str = "#";

/// Operators that can never be redefined.
pub const RESERVED: &[&str] = &[BIND, OPERATOR_BIND, MACRO_BIND];

/// How a run of operators from the same level groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// `a op b op c` is `(a op b) op c`.
    Left,
    /// `a op b op c` is `a op (b op c)`.
    Right,
}

impl Associativity {
    /// Reads `left` or `right`.
    pub fn parse(text: &str) -> EvalResult<Self> {
        match text {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(RuntimeError::invalid_argument(format!("associativity must be left or right, found {text}"))),
        }
    }
}

impl fmt::Display for Associativity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// One precedence level: a set of operator tokens sharing an associativity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    /// Tokens in the level, in registration order.
    pub operators:     Vec<String>,
    /// How operators of this level group.
    pub associativity: Associativity,
}

impl Level {
    fn new(operators: &[&str], associativity: Associativity) -> Self {
        Self { operators: operators.iter().map(ToString::to_string).collect(),
               associativity }
    }
}

/// The implementation behind an operator defined in the language.
#[derive(Debug, Clone)]
pub struct UserOperator {
    /// The function applied to the two operands.
    pub function: Value,
    /// `true` for `<<` operators, `false` for `<<<` macros.
    pub eager:    bool,
}

/// Everything needed to register an operator.
#[derive(Debug, Clone)]
pub struct OperatorDefinition {
    /// Operator text.
    pub token:         String,
    /// Requested precedence index; fractional values open a new level.
    pub precedence:    f64,
    /// Requested associativity.
    pub associativity: Associativity,
    /// Whether to overwrite a conflicting associativity at an existing level.
    pub force:         bool,
    /// The implementation.
    pub operator:      UserOperator,
}

/// The live precedence table shared by the parser and the evaluator.
///
/// Levels are ordered from tightest to loosest binding. The table starts
/// with the built in levels and grows as programs define operators; every
/// change bumps a generation counter so callers can tell when previously
/// tokenized source has become stale.
#[derive(Debug, Clone)]
pub struct OperatorTable {
    levels:     Vec<Level>,
    user:       HashMap<String, UserOperator>,
    generation: u64,
}

impl Default for OperatorTable {
    fn default() -> Self {
        use Associativity::{Left, Right};

        Self { levels:     vec![Level::new(&[PARTIAL], Left),
                                Level::new(&[APPLICATION], Left),
                                Level::new(&["^"], Left),
                                Level::new(&["*", "/"], Left),
                                Level::new(&["%", "+", "-"], Left),
                                Level::new(&["=", "!=", "<", ">", "<=", ">="], Left),
                                Level::new(&[CONDITIONAL], Left),
                                Level::new(&[WHILE, FOR], Left),
                                Level::new(&[DEFINITION, VARIADIC_DEFINITION], Right),
                                Level::new(&[BIND, OPERATOR_BIND, MACRO_BIND], Left),],
               user:       HashMap::new(),
               generation: 0, }
    }
}

/// Whether `token` is `@` followed only by scope markers.
#[must_use]
pub fn is_application(token: &str) -> bool {
    token.strip_prefix(APPLICATION)
         .is_some_and(|rest| rest.chars().all(|c| c == SCOPE_MARKER))
}

impl OperatorTable {
    /// The levels, tightest first.
    #[must_use]
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Counter bumped by every successful definition.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Index of the level holding `token`.
    ///
    /// Scoped applications share the level of `@` unless one has been given
    /// a level of its own.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::parser::precedence::OperatorTable;
    ///
    /// let table = OperatorTable::default();
    /// assert_eq!(table.level_of("+"), Some(4));
    /// assert_eq!(table.level_of("@!!"), table.level_of("@"));
    /// assert_eq!(table.level_of("&&"), None);
    /// ```
    #[must_use]
    pub fn level_of(&self, token: &str) -> Option<usize> {
        let position = |t: &str| self.levels.iter().position(|l| l.operators.iter().any(|o| o == t));
        position(token).or_else(|| is_application(token).then(|| position(APPLICATION)).flatten())
    }

    /// Whether `token` names an operator.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        self.level_of(token).is_some()
    }

    /// The characters the lexer treats as operator glyphs: every character of
    /// every registered token, plus the scope marker.
    #[must_use]
    pub fn glyphs(&self) -> HashSet<char> {
        self.levels
            .iter()
            .flat_map(|l| l.operators.iter())
            .flat_map(|o| o.chars())
            .chain(std::iter::once(SCOPE_MARKER))
            .collect()
    }

    /// The implementation of a user defined operator, if `token` is one.
    #[must_use]
    pub fn user_operator(&self, token: &str) -> Option<&UserOperator> {
        self.user.get(token)
    }

    /// Registers or redefines an operator.
    ///
    /// A redefined operator first leaves its old level, and a level left
    /// empty disappears. An integral precedence then joins that level; a
    /// fractional one opens a new level directly after level `floor(p)`.
    /// The table is unchanged when an error is returned.
    ///
    /// # Errors
    /// - `RuntimeError::InvalidOperator` for reserved tokens or tokens with
    ///   non-operator characters.
    /// - `RuntimeError::InvalidPrecedence` for negative or out of range
    ///   indices.
    /// - `RuntimeError::AssociativityConflict` when joining a level of the
    ///   other associativity without `force`.
    ///
    /// # Example
    /// ```
    /// use tbl::interpreter::{
    ///     parser::precedence::{Associativity, OperatorDefinition, OperatorTable, UserOperator},
    ///     value::core::Value,
    /// };
    ///
    /// let mut table = OperatorTable::default();
    /// let definition = OperatorDefinition { token:         "<>".to_string(),
    ///                                       precedence:    3.5,
    ///                                       associativity: Associativity::Left,
    ///                                       force:         false,
    ///                                       operator:      UserOperator { function: Value::default(),
    ///                                                                     eager:    true, }, };
    /// table.define(definition).unwrap();
    ///
    /// assert_eq!(table.level_of("<>"), Some(4));
    /// assert_eq!(table.level_of("+"), Some(5));
    /// assert!(table.glyphs().contains(&'>'));
    /// ```
    pub fn define(&mut self, definition: OperatorDefinition) -> EvalResult<()> {
        let OperatorDefinition { token,
                                 precedence,
                                 associativity,
                                 force,
                                 operator, } = definition;

        if RESERVED.contains(&token.as_str()) {
            return Err(RuntimeError::InvalidOperator { details: format!("{token} can not be redefined") });
        }
        if token.is_empty() || !token.chars().all(is_operator_char) {
            return Err(RuntimeError::InvalidOperator { details: format!("\"{token}\" is not an operator string") });
        }
        if !precedence.is_finite() || precedence < 0.0 {
            return Err(RuntimeError::InvalidPrecedence { details: format!("{precedence} can not be used as a precedence index") });
        }

        let mut levels = self.levels.clone();
        for level in &mut levels {
            level.operators.retain(|o| *o != token);
        }
        levels.retain(|l| !l.operators.is_empty());

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let index = precedence.floor() as usize;
        let count = levels.len();
        let Some(level) = levels.get_mut(index) else {
            return Err(RuntimeError::InvalidPrecedence { details: format!("there is no level {index}, the table has {count}") });
        };

        if precedence.fract() == 0.0 {
            if level.associativity != associativity {
                if !force {
                    return Err(RuntimeError::AssociativityConflict { precedence: index,
                                                                     current:    level.associativity.to_string(),
                                                                     requested:  associativity.to_string(), });
                }
                level.associativity = associativity;
            }
            level.operators.push(token.clone());
        } else {
            levels.insert(index + 1,
                          Level { operators: vec![token.clone()],
                                  associativity });
        }

        tracing::debug!(operator = %token, precedence, %associativity, eager = operator.eager, "defined operator");

        self.levels = levels;
        self.user.insert(token, operator);
        self.generation += 1;
        Ok(())
    }
}
