//! The [`Atom`] tree produced by the lexer (`src/token.rs`).
//!
//! Unlike `rhai::ast`, which builds a full typed AST during parsing, this
//! crate's lexer only groups bracket/brace nesting (`spec.md` §4.2); the
//! expression grammar itself is recursive-descent *at evaluation time*
//! (`spec.md` §4.3), so `Atom` stays a thin, mostly-flat token shape rather
//! than a typed expression tree.
//!
//! Every atom is one of:
//! - `Word`: raw scanned text, interpreted lazily wherever it appears.
//!   A leading `"` marks a string literal, a leading `:` marks a variable
//!   reference, an exact match against one of the operator spellings marks
//!   an infix operator, `(` / `)` mark grouping - the same text is used
//!   whether it came from top-level code or from re-running a list as a
//!   statement sequence (`RUN`, a procedure body, a re-evaluated `WHILE`
//!   condition list). This mirrors the reference implementations this
//!   family of languages descends from: tokens are plain strings and
//!   their grammatical role is decided at the use site, not baked in by
//!   the lexer.
//! - `UnaryMinus`: a sentinel produced only by the top-level lexer's
//!   unary/binary `-` disambiguation (`spec.md` §4.2). It never appears
//!   inside a `List`/`Array` literal, since bracket bodies have "no
//!   expression structure" (`spec.md` §4.2) and so never disambiguate `-`.
//! - `List` / `Array`: nested groups, produced by the lexer's recursive
//!   handling of `[ ... ]` / `{ ... }@origin`.

/// One token produced by the lexer, or one element of a list/array literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Atom {
    /// Raw token text, exactly as scanned (escapes already resolved).
    Word(String),
    /// Sentinel for a disambiguated unary minus; never round-trips through
    /// a bracketed list literal.
    UnaryMinus,
    /// A `[ ... ]` group: bare-word contents, themselves possibly nested
    /// `List`/`Array` groups.
    List(Vec<Atom>),
    /// A `{ ... }@origin` group.
    Array(Vec<Atom>, i64),
}

impl Atom {
    pub fn word(s: impl Into<String>) -> Self {
        Atom::Word(s.into())
    }

    pub fn as_word(&self) -> Option<&str> {
        match self {
            Atom::Word(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_word(&self, text: &str) -> bool {
        matches!(self, Atom::Word(s) if s == text)
    }

    pub fn is_lparen(&self) -> bool {
        self.is_word("(")
    }

    pub fn is_rparen(&self) -> bool {
        self.is_word(")")
    }

    /// One of the recognized infix/relational operator spellings. `(`/`)`
    /// are grouping, not operators, even though they are also stored as
    /// `Word`.
    pub fn operator(&self) -> Option<Op> {
        match self {
            Atom::Word(s) => Op::from_str(s),
            _ => None,
        }
    }
}

/// The operator set from `spec.md` §4.3's grammar, lowest to highest
/// precedence grouped by the level that consumes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
    Ne,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

impl Op {
    pub fn from_str(s: &str) -> Option<Self> {
        Some(match s {
            "=" => Op::Eq,
            "<" => Op::Lt,
            ">" => Op::Gt,
            "<=" => Op::Le,
            ">=" => Op::Ge,
            "<>" => Op::Ne,
            "+" => Op::Add,
            "-" => Op::Sub,
            "*" => Op::Mul,
            "/" => Op::Div,
            "%" => Op::Mod,
            "^" => Op::Pow,
            _ => return None,
        })
    }

    pub fn is_relational(self) -> bool {
        matches!(self, Op::Eq | Op::Lt | Op::Gt | Op::Le | Op::Ge | Op::Ne)
    }

    pub fn is_additive(self) -> bool {
        matches!(self, Op::Add | Op::Sub)
    }

    pub fn is_multiplicative(self) -> bool {
        matches!(self, Op::Mul | Op::Div | Op::Mod)
    }
}
