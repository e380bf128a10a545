//! Module containing error definitions and non-local control signals for
//! the evaluation process.
//!
//! Mirrors `rhai::error::EvalAltResult`: a single enum carries both true
//! errors and the non-error control-flow exits (`Output`, `Stop`, `Bye`)
//! because both unwind the call stack the same way, and every call site
//! that can produce one must handle the other.

use crate::interfaces::Localize;
use crate::value::Value;
use std::error::Error;
use std::fmt;

/// Evaluation result: either a true error or a non-local control signal.
///
/// All error-carrying variants are rendered through the optional
/// [`Localize`] hook and `{_PROC_}`/named-parameter substitution
/// (`spec.md` §7) via [`LogoError::render`].
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum LogoError {
    // --- parse errors ----------------------------------------------------
    /// Unexpected character encountered while scanning. `spec.md` §4.2.
    CouldntParse(char),
    /// Unclosed `[ ... ]`.
    ExpectedCloseBracket,
    /// Unclosed `{ ... }`.
    ExpectedCloseBrace,
    /// A parenthesized expression or explicit-arity call never saw `)`.
    ExpectedCloseParen,
    /// The token cursor ran out while a `Final` expression was expected.
    UnexpectedEndOfInput,
    /// `TO` never reached `END`.
    MissingEnd,

    // --- name errors -------------------------------------------------------
    /// Call to an unknown procedure.
    UnknownProcedure(String),
    /// A call like `SQ1` where stripping a trailing digit run yields a
    /// known routine name.
    NeedSpaceBetween(String, String),
    /// Read of an unbound variable.
    UnknownVariable(String),
    /// Read of an undefined property.
    UnknownProperty(String, String),

    // --- type / domain errors ----------------------------------------------
    ExpectedNumber(Value),
    ExpectedString(Value),
    ExpectedList(Value),
    ExpectedArray(Value),
    ExpectedListOfLength(Value, usize),
    DivisionByZero,
    IndexOutOfBounds(i64),
    NonPositiveArraySize(i64),
    ZeroScrunch,
    CircularArray,

    // --- redefinition errors -------------------------------------------------
    CantRedefinePrimitive(String),
    CantRedefineSpecial(String),
    CantErasePrimitive(String),
    CantEraseSpecial(String),

    // --- top level -----------------------------------------------------------
    /// A statement produced a value where none was expected.
    DontKnowWhatToDoWith(Value),
    /// A command (a routine that produced no value) was used somewhere a
    /// value was required - e.g. as an operand or an argument.
    DidntOutput(String),

    /// A resource limit (`Limits`) was exceeded.
    LimitExceeded(&'static str),

    /// An otherwise-uncategorized runtime error, with a pre-rendered
    /// message. Used to wrap host-supplied errors without inventing a new
    /// variant per host.
    Runtime(String),

    // --- control signals (not errors) ----------------------------------------
    /// Non-local return from a user procedure carrying a value.
    Output(Value),
    /// Non-local return from a user procedure with no value.
    Stop,
    /// Unwind to the top-level driver and terminate the run.
    Bye,
}

impl LogoError {
    /// True for the three control-flow variants that are not really
    /// errors and must never be reported to the user as one.
    pub fn is_signal(&self) -> bool {
        matches!(self, LogoError::Output(_) | LogoError::Stop | LogoError::Bye)
    }

    /// Produce the user-facing message, substituting `{_PROC_}` with the
    /// top of `proc_stack` and running the result through `localize` if
    /// one is installed.
    pub fn render(&self, proc_stack: &[String], localize: Option<&dyn Localize>) -> String {
        let template = self.template();
        let proc = proc_stack.last().map(String::as_str).unwrap_or("?");
        let filled = template.replace("{_PROC_}", proc);
        match localize {
            Some(hook) => hook.translate(&filled),
            None => filled,
        }
    }

    fn template(&self) -> String {
        match self {
            LogoError::CouldntParse(c) => format!("Couldn't parse: '{}'", c),
            LogoError::ExpectedCloseBracket => "Expected ']'".to_string(),
            LogoError::ExpectedCloseBrace => "Expected '}'".to_string(),
            LogoError::ExpectedCloseParen => "Expected ')'".to_string(),
            LogoError::UnexpectedEndOfInput => "{_PROC_}: not enough inputs".to_string(),
            LogoError::MissingEnd => "Expected 'END'".to_string(),
            LogoError::UnknownProcedure(name) => format!("I don't know how to {}", name),
            LogoError::NeedSpaceBetween(a, b) => format!("Need a space between {} and {}", a, b),
            LogoError::UnknownVariable(name) => format!("{{_PROC_}}: Don't know about variable {}", name),
            LogoError::UnknownProperty(plist, prop) => format!("{} has no property {}", plist, prop),
            LogoError::ExpectedNumber(v) => format!("{{_PROC_}} doesn't like {} as input", v),
            LogoError::ExpectedString(v) => format!("{{_PROC_}} doesn't like {} as input", v),
            LogoError::ExpectedList(v) => format!("{{_PROC_}} doesn't like {} as input", v),
            LogoError::ExpectedArray(v) => format!("{{_PROC_}} doesn't like {} as input", v),
            LogoError::ExpectedListOfLength(v, n) => {
                format!("{{_PROC_}} doesn't like {} as input, expected a list of length {}", v, n)
            }
            LogoError::DivisionByZero => "Division by zero".to_string(),
            LogoError::IndexOutOfBounds(i) => format!("Index {} out of bounds", i),
            LogoError::NonPositiveArraySize(n) => format!("Array size {} is not positive", n),
            LogoError::ZeroScrunch => "Scrunch factor cannot be zero".to_string(),
            LogoError::CircularArray => "Can't create circular array reference".to_string(),
            LogoError::CantRedefinePrimitive(name) => {
                format!("{} is a primitive; redefine only with REDEFP on", name)
            }
            LogoError::CantRedefineSpecial(name) => format!("Can't redefine special form {}", name),
            LogoError::CantErasePrimitive(name) => format!("Can't erase primitive {}", name),
            LogoError::CantEraseSpecial(name) => format!("Can't erase special form {}", name),
            LogoError::DontKnowWhatToDoWith(v) => format!("Don't know what to do with {}", v),
            LogoError::DidntOutput(name) => format!("{} didn't output to {{_PROC_}}", name),
            LogoError::LimitExceeded(which) => format!("Limit exceeded: {}", which),
            LogoError::Runtime(msg) => msg.clone(),
            LogoError::Output(_) => "unexpected OUTPUT outside of a procedure call".to_string(),
            LogoError::Stop => "unexpected STOP outside of a procedure call".to_string(),
            LogoError::Bye => "BYE".to_string(),
        }
    }
}

impl Error for LogoError {}

impl fmt::Display for LogoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(&[], None))
    }
}

pub type LogoResult<T> = Result<T, LogoError>;
