//! The [`Value`] type: the tagged union every primitive and every user
//! procedure operates on.
//!
//! A [`Value`] is one of a **word** (string or number), a **list**, or an
//! **array**. Lists are deep-copied on assignment; arrays are shared by
//! reference. See `SPEC_FULL.md` §3.

use crate::WordString;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Numeric words match this shape (see `spec.md` §3): an optional sign,
/// digits, an optional fractional part, and an optional exponent.
fn looks_numeric(s: &str) -> bool {
    parse_numeric(s).is_some()
}

/// Parses `s` as a Logo numeric word, returning `None` if it doesn't match
/// the grammar `-?[0-9]*\.?[0-9]+([eE][-+]?[0-9]+)?`.
pub fn parse_numeric(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut i = 0;
    if bytes[i] == b'-' || bytes[i] == b'+' {
        i += 1;
    }
    let start_digits = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut saw_digit = i > start_digits;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        saw_digit = saw_digit || i > frac_start;
    }
    if !saw_digit {
        return None;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'-' || bytes[j] == b'+') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    if i != bytes.len() {
        return None;
    }
    s.parse::<f64>().ok()
}

/// Origin-indexed, reference-shared array storage.
///
/// Unlike [`Value::List`], an array is never deep-copied: `MAKE`/`LOCALMAKE`
/// alias it, exactly as `spec.md` §3 requires.
#[derive(Debug)]
pub struct ArrayData {
    pub items: Vec<Value>,
    pub origin: i64,
}

impl ArrayData {
    pub fn new(items: Vec<Value>, origin: i64) -> Self {
        Self { items, origin }
    }

    /// Index by Logo's origin-relative 1-based (by default) numbering.
    pub fn index_of(&self, n: i64) -> Option<usize> {
        let idx = n - self.origin;
        if idx < 0 || idx as usize >= self.items.len() {
            None
        } else {
            Some(idx as usize)
        }
    }
}

/// A shared, mutable array handle. Cloning a `SharedArray` clones the
/// handle, not the data (`Rc<RefCell<_>>`), which is what gives arrays
/// reference semantics under `MAKE`.
pub type SharedArray = Rc<RefCell<ArrayData>>;

/// The tagged value every Logo expression evaluates to.
#[derive(Debug, Clone)]
pub enum Value {
    /// A word: immutable, either textual or numeric in origin. The
    /// original text is retained (for round-tripping `print`/`word`
    /// semantics) alongside a parsed numeric value when the text looks
    /// numeric.
    Word(WordValue),
    /// An ordered, mutable, deep-copied-on-assignment sequence.
    List(Vec<Value>),
    /// A fixed-size, origin-indexed, reference-shared sequence.
    Array(SharedArray),
}

/// The payload of [`Value::Word`]: source text plus an optional cached
/// numeric interpretation.
#[derive(Debug, Clone)]
pub struct WordValue {
    text: WordString,
    number: Option<f64>,
}

impl WordValue {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn number(&self) -> Option<f64> {
        self.number
    }

    pub fn is_numeric(&self) -> bool {
        self.number.is_some()
    }
}

impl Value {
    pub const TRUE_WORD: &'static str = "true";
    pub const FALSE_WORD: &'static str = "false";

    /// Builds a word value from arbitrary text, detecting numeric form.
    pub fn word(text: impl Into<WordString>) -> Self {
        let text: WordString = text.into();
        let number = parse_numeric(&text);
        Value::Word(WordValue { text, number })
    }

    /// Builds a word value directly from a number, using Logo's canonical
    /// numeric-to-text formatting (`spec.md` says numbers are f64; formatting
    /// beyond what's stated is a non-goal, so this sticks to Rust's
    /// shortest round-trip formatting for integral vs fractional values).
    pub fn number(n: f64) -> Self {
        let text = format_number(n);
        Value::Word(WordValue {
            text: text.into(),
            number: Some(n),
        })
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(items)
    }

    pub fn array(items: Vec<Value>, origin: i64) -> Self {
        Value::Array(Rc::new(RefCell::new(ArrayData::new(items, origin))))
    }

    pub fn empty_list() -> Self {
        Value::List(Vec::new())
    }

    /// True if this is a [`Value::Word`] whose text parses as a number.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Word(w) if w.is_numeric())
    }

    pub fn is_word(&self) -> bool {
        matches!(self, Value::Word(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    /// The numeric interpretation, if any.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Word(w) => w.number,
            _ => None,
        }
    }

    /// The textual interpretation, the way `print` renders it at top
    /// level: words print bare, but a list/array *nested inside* another
    /// list/array keeps its brackets/braces, exactly as `print [a [b c]
    /// d]` shows `a [b c] d`. This is also what the driver re-tokenizes
    /// when a stored list is executed as a statement body, so the
    /// bracket/brace nesting must round-trip losslessly.
    pub fn as_text(&self) -> String {
        match self {
            Value::Word(w) => w.text.to_string(),
            Value::List(items) => items
                .iter()
                .map(|v| v.as_nested_text())
                .collect::<Vec<_>>()
                .join(" "),
            Value::Array(a) => {
                let a = a.borrow();
                a.items
                    .iter()
                    .map(|v| v.as_nested_text())
                    .collect::<Vec<_>>()
                    .join(" ")
            }
        }
    }

    /// Like [`Self::as_text`], but renders the value the way it appears
    /// as an *element* of an enclosing list/array: words print bare,
    /// lists are wrapped in `[ ]`, arrays in `{ }` (plus a trailing
    /// `@origin` when the origin isn't the default 1).
    pub fn as_nested_text(&self) -> String {
        match self {
            Value::Word(_) => self.as_text(),
            Value::List(_) => format!("[{}]", self.as_text()),
            Value::Array(a) => {
                let origin = a.borrow().origin;
                if origin == 1 {
                    format!("{{{}}}", self.as_text())
                } else {
                    format!("{{{}}}@{}", self.as_text(), origin)
                }
            }
        }
    }

    /// Truthiness for conditions: the words `"true"`/`"false"` (case
    /// insensitive) are the only valid booleans in this core; anything
    /// else is a type error at the call site (the primitive that wants a
    /// boolean reports it).
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Word(w) if w.text.eq_ignore_ascii_case(Value::TRUE_WORD) => Some(true),
            Value::Word(w) if w.text.eq_ignore_ascii_case(Value::FALSE_WORD) => Some(false),
            _ => None,
        }
    }

    pub fn boolean(b: bool) -> Self {
        Value::word(if b { Self::TRUE_WORD } else { Self::FALSE_WORD })
    }

    /// Deep-copy, used whenever a [`Value::List`] is bound by `MAKE`,
    /// `LOCALMAKE`, or passed as a procedure argument. Arrays are *not*
    /// deep-copied - the `Rc` handle is cloned, preserving aliasing.
    pub fn deep_copy(&self) -> Self {
        match self {
            Value::Word(_) => self.clone(),
            Value::List(items) => Value::List(items.iter().map(Value::deep_copy).collect()),
            Value::Array(a) => Value::Array(Rc::clone(a)),
        }
    }

    /// Whether `other` is reachable from `self` by following list/array
    /// contents - used to reject `setitem`/`mdsetitem` assignments that
    /// would create a cycle through an array (`spec.md` §3 invariants).
    pub fn contains_array_identity(&self, target: &SharedArray) -> bool {
        match self {
            Value::Word(_) => false,
            Value::List(items) => items.iter().any(|v| v.contains_array_identity(target)),
            Value::Array(a) => Rc::ptr_eq(a, target) || {
                // Only recurse into a *different* array to avoid infinite
                // loops on already-circular (but distinct) structures.
                !Rc::ptr_eq(a, target)
                    && a.borrow()
                        .items
                        .iter()
                        .any(|v| v.contains_array_identity(target))
            },
        }
    }
}

/// Logo's `-?[0-9]*\.?[0-9]+([eE][-+]?[0-9]+)?` numeric words compare
/// equal when their canonical numeric values match; otherwise comparison
/// falls back to text. Arrays compare by identity only.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Word(a), Value::Word(b)) => match (a.number, b.number) {
                (Some(x), Some(y)) => x == y,
                _ => a.text.eq_ignore_ascii_case(&b.text),
            },
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

/// Formats a number the way Logo's `print` is expected to: integral
/// values with no trailing `.0`, everything else via the shortest
/// round-tripping decimal representation.
pub fn format_number(n: f64) -> String {
    if n.is_infinite() || n.is_nan() {
        // Division by zero and friends are caught before a value is ever
        // constructed from them (`spec.md` §4.3); this path only exists
        // defensively for values arriving from a host embedding.
        return if n.is_nan() { "nan".to_string() } else if n > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }
    if n == n.trunc() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        let mut s = format!("{}", n);
        if !s.contains('e') && !s.contains('.') {
            s.push_str(".0");
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_word_detection() {
        assert!(looks_numeric("3.14"));
        assert!(looks_numeric("-4"));
        assert!(looks_numeric("1e10"));
        assert!(looks_numeric(".5"));
        assert!(!looks_numeric("hello"));
        assert!(!looks_numeric("3.14.15"));
    }

    #[test]
    fn word_number_equality() {
        assert_eq!(Value::word("3"), Value::number(3.0));
        assert_eq!(Value::word("3.0"), Value::word("3"));
        assert_ne!(Value::word("abc"), Value::word("ABCD"));
        assert_eq!(Value::word("abc"), Value::word("ABC"));
    }

    #[test]
    fn list_deep_copy_independent() {
        let a = Value::list(vec![Value::number(1.0), Value::number(2.0)]);
        let b = a.deep_copy();
        if let Value::List(items) = &b {
            assert_eq!(items.len(), 2);
        } else {
            panic!("expected list");
        }
    }

    #[test]
    fn array_assignment_aliases() {
        let a = Value::array(vec![Value::number(1.0)], 1);
        let b = a.deep_copy();
        match (&a, &b) {
            (Value::Array(x), Value::Array(y)) => assert!(Rc::ptr_eq(x, y)),
            _ => panic!("expected arrays"),
        }
    }
}
