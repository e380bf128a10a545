//! Expression evaluator: recursive-descent precedence climbing over the
//! flat atom stream (`spec.md` §4.3).
//!
//! The five fixed precedence levels are modeled the way `rhai::parse`
//! models one rung of its (user-extensible) operator-precedence climber,
//! fixed here to exactly the grammar `spec.md` §4.3 states, since Logo
//! has no user-definable operators:
//!
//! ```text
//! Expression     := Relational
//! Relational     := Additive ( (= | < | > | <= | >= | <>) Additive )*
//! Additive       := Multiplicative ( (+ | -) Multiplicative )*
//! Multiplicative := Power ( (* | / | %) Power )*
//! Power          := Unary ( ^ Unary )*
//! Unary          := UNARY_MINUS Unary | Final
//! ```
//!
//! "Final" (literals, variable refs, parenthesized forms, and procedure
//! dispatch) is intricate enough that it gets its own module -
//! `src/fn_call.rs`, named after `rhai::fn_call` because the dispatch
//! protocol it implements plays the same role `rhai::fn_call::exec_fn_call`
//! plays for `rhai`.
//!
//! Parsing (`parse_expr`) eagerly consumes atoms from a [`Cursor`] and
//! builds a small [`Expr`] tree; evaluating that tree (`eval_expr`) is a
//! separate, `async`, step. Splitting parse from eval this way keeps the
//! "uniform asynchronous-result abstraction" `spec.md` §9 asks for
//! (every primitive - ready or turtle-suspending - flows through the
//! same `eval_expr` recursion) without needing a bespoke closure-based
//! thunk type: an `Expr` tree already *is* the deferred computation.

use crate::ast::{Atom, Op};
use crate::error::{LogoError, LogoResult};
use crate::value::Value;
use crate::Interpreter;
use std::future::Future;
use std::pin::Pin;

/// An index-advancing cursor over an atom slice - "an arena-allocated
/// vector of atoms" per `spec.md` §9's token-stream-mutation design note,
/// except the arena is just the caller's `Vec<Atom>` and the cursor is a
/// plain index rather than a linked structure of shared references.
pub struct Cursor<'a> {
    atoms: &'a [Atom],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(atoms: &'a [Atom]) -> Self {
        Self { atoms, pos: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.atoms.len()
    }

    pub fn peek(&self) -> Option<&'a Atom> {
        self.atoms.get(self.pos)
    }

    pub fn peek_at(&self, offset: usize) -> Option<&'a Atom> {
        self.atoms.get(self.pos + offset)
    }

    pub fn advance(&mut self) -> Option<&'a Atom> {
        let a = self.atoms.get(self.pos);
        if a.is_some() {
            self.pos += 1;
        }
        a
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> &'a [Atom] {
        &self.atoms[self.pos..]
    }
}

/// The deferred computation produced by parsing one expression. Built
/// eagerly (all atoms it needs are already consumed from the [`Cursor`]
/// by the time a node exists); evaluated lazily via [`eval_expr`].
#[derive(Debug, Clone)]
pub enum Expr {
    Number(f64),
    /// A `"word` literal, quote already stripped.
    Str(String),
    /// A `:name` variable reference.
    VarRef(String),
    /// A `[ ... ]` literal: resolved once, at parse time, into the
    /// literal `Value` it denotes (bracket bodies are inert data, never
    /// re-parsed as code unless something like `RUN` asks for it later).
    ListLit(Value),
    /// A `{ ... }@origin` literal, likewise pre-resolved.
    ArrayLit(Value),
    /// A parenthesized sub-expression, `( Expression )`.
    Paren(Box<Expr>),
    BinOp(Op, Box<Expr>, Box<Expr>),
    /// A disambiguated unary minus applied to its operand.
    Neg(Box<Expr>),
    /// A normal (eager-argument) procedure call - primitive or
    /// user-defined, resolved by name again at evaluation time.
    Call { name: String, args: Vec<Expr> },
    /// A noeval-primitive call (`AND`/`OR`/`WHILE`/...): the primitive
    /// receives the unevaluated argument expressions themselves, so it
    /// can short-circuit or re-evaluate them.
    NoEvalCall { name: String, args: Vec<Expr> },
    /// The result of a special form (only `TO`) that already executed
    /// its side effect while being parsed and produces no value.
    Unit,
}

/// Converts an `Atom::List`/`Atom::Array` literal body into the literal
/// [`Value`] it denotes: every bare word becomes `Value::word`, nested
/// groups recurse. This is *not* expression evaluation - list/array
/// literal contents are inert data (`spec.md` §4.2).
pub fn atoms_to_literal_items(atoms: &[Atom]) -> Vec<Value> {
    atoms.iter().map(atom_to_literal).collect()
}

fn atom_to_literal(atom: &Atom) -> Value {
    match atom {
        Atom::Word(s) => Value::word(s.clone()),
        Atom::UnaryMinus => Value::word("-"),
        Atom::List(items) => Value::list(atoms_to_literal_items(items)),
        Atom::Array(items, origin) => Value::array(atoms_to_literal_items(items), *origin),
    }
}

/// `Expression := Relational`
pub fn parse_expr(interp: &mut Interpreter, cur: &mut Cursor) -> LogoResult<Expr> {
    parse_relational(interp, cur)
}

fn parse_relational(interp: &mut Interpreter, cur: &mut Cursor) -> LogoResult<Expr> {
    let mut lhs = parse_additive(interp, cur)?;
    loop {
        let op = cur.peek().and_then(Atom::operator).filter(|o| o.is_relational());
        match op {
            Some(op) => {
                cur.advance();
                let rhs = parse_additive(interp, cur)?;
                lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs));
            }
            None => break,
        }
    }
    Ok(lhs)
}

fn parse_additive(interp: &mut Interpreter, cur: &mut Cursor) -> LogoResult<Expr> {
    let mut lhs = parse_multiplicative(interp, cur)?;
    loop {
        let op = cur.peek().and_then(Atom::operator).filter(|o| o.is_additive());
        match op {
            Some(op) => {
                cur.advance();
                let rhs = parse_multiplicative(interp, cur)?;
                lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs));
            }
            None => break,
        }
    }
    Ok(lhs)
}

fn parse_multiplicative(interp: &mut Interpreter, cur: &mut Cursor) -> LogoResult<Expr> {
    let mut lhs = parse_power(interp, cur)?;
    loop {
        let op = cur
            .peek()
            .and_then(Atom::operator)
            .filter(|o| o.is_multiplicative());
        match op {
            Some(op) => {
                cur.advance();
                let rhs = parse_power(interp, cur)?;
                lhs = Expr::BinOp(op, Box::new(lhs), Box::new(rhs));
            }
            None => break,
        }
    }
    Ok(lhs)
}

/// `Power := Unary ( ^ Unary )*`, right-folding by re-entering `Power`
/// itself (not `Unary`) on the right-hand side each time a `^` is seen,
/// so `2 ^ 3 ^ 2` parses as `2 ^ (3 ^ 2)` (`spec.md` §4.3: "repeated `^`
/// re-enters Unary on the right side" - which only yields the stated
/// right-associativity if that re-entry is itself allowed to chain
/// through further `^`s, i.e. a recursive call one level up from where
/// the single right operand is read).
fn parse_power(interp: &mut Interpreter, cur: &mut Cursor) -> LogoResult<Expr> {
    let lhs = parse_unary(interp, cur)?;
    match cur.peek().and_then(Atom::operator) {
        Some(Op::Pow) => {
            cur.advance();
            let rhs = parse_power(interp, cur)?;
            Ok(Expr::BinOp(Op::Pow, Box::new(lhs), Box::new(rhs)))
        }
        _ => Ok(lhs),
    }
}

fn parse_unary(interp: &mut Interpreter, cur: &mut Cursor) -> LogoResult<Expr> {
    if matches!(cur.peek(), Some(Atom::UnaryMinus)) {
        cur.advance();
        let operand = parse_unary(interp, cur)?;
        return Ok(Expr::Neg(Box::new(operand)));
    }
    crate::fn_call::parse_final(interp, cur)
}

/// Evaluates an already-parsed [`Expr`] tree. Recursive and `async`
/// (turtle-delegating primitives may genuinely suspend), so it is boxed
/// per call the way any recursive `async fn` in Rust must be.
pub fn eval_expr<'a>(
    interp: &'a mut Interpreter,
    expr: &'a Expr,
) -> Pin<Box<dyn Future<Output = LogoResult<Value>> + 'a>> {
    Box::pin(async move {
        interp.tick_operation()?;
        match expr {
            Expr::Number(n) => Ok(Value::number(*n)),
            Expr::Str(s) => Ok(Value::word(s.clone())),
            Expr::VarRef(name) => interp
                .scopes
                .lookup(name)
                .and_then(|b| b.value.clone())
                .ok_or_else(|| LogoError::UnknownVariable(name.clone())),
            Expr::ListLit(v) | Expr::ArrayLit(v) => Ok(v.clone()),
            Expr::Paren(inner) => eval_expr(interp, inner).await,
            Expr::Neg(inner) => {
                let v = eval_expr(interp, inner).await?;
                let n = v.as_number().ok_or_else(|| LogoError::ExpectedNumber(v.clone()))?;
                Ok(Value::number(-n))
            }
            Expr::BinOp(op, lhs, rhs) => {
                let l = eval_expr(interp, lhs).await?;
                let r = eval_expr(interp, rhs).await?;
                eval_binop(*op, l, r)
            }
            Expr::Call { name, args } => {
                let mut values = Vec::with_capacity(args.len());
                for a in args {
                    values.push(eval_expr(interp, a).await?);
                }
                crate::fn_call::invoke(interp, name, values)
                    .await?
                    .ok_or_else(|| LogoError::DidntOutput(name.clone()))
            }
            Expr::NoEvalCall { name, args } => crate::fn_call::invoke_noeval(interp, name, args)
                .await?
                .ok_or_else(|| LogoError::DidntOutput(name.clone())),
            // A special form (only `TO`) cannot appear nested inside a
            // value-context expression - it can only be the first atom
            // of a whole statement, where `src/driver.rs` evaluates
            // through `fn_call::eval_statement` instead of this path.
            Expr::Unit => Err(LogoError::DidntOutput("a special form".to_string())),
        }
    })
}

fn eval_binop(op: Op, l: Value, r: Value) -> LogoResult<Value> {
    if op.is_relational() {
        let truth = match op {
            Op::Eq => l == r,
            Op::Ne => l != r,
            _ => {
                let (a, b) = (
                    l.as_number().ok_or_else(|| LogoError::ExpectedNumber(l.clone()))?,
                    r.as_number().ok_or_else(|| LogoError::ExpectedNumber(r.clone()))?,
                );
                match op {
                    Op::Lt => a < b,
                    Op::Gt => a > b,
                    Op::Le => a <= b,
                    Op::Ge => a >= b,
                    _ => unreachable!(),
                }
            }
        };
        return Ok(Value::boolean(truth));
    }

    let a = l.as_number().ok_or_else(|| LogoError::ExpectedNumber(l.clone()))?;
    let b = r.as_number().ok_or_else(|| LogoError::ExpectedNumber(r.clone()))?;
    let result = match op {
        Op::Add => a + b,
        Op::Sub => a - b,
        Op::Mul => a * b,
        Op::Div => {
            if b == 0.0 {
                return Err(LogoError::DivisionByZero);
            }
            a / b
        }
        Op::Mod => {
            if b == 0.0 {
                return Err(LogoError::DivisionByZero);
            }
            a % b
        }
        Op::Pow => a.powf(b),
        _ => unreachable!("relational ops handled above"),
    };
    Ok(Value::number(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::lex_program;

    fn eval_source(interp: &mut Interpreter, src: &str) -> LogoResult<Value> {
        let atoms = lex_program(src).unwrap();
        let mut cur = Cursor::new(&atoms);
        let expr = parse_expr(interp, &mut cur)?;
        futures::executor::block_on(eval_expr(interp, &expr))
    }

    #[test]
    fn precedence_climbs_correctly() {
        let mut interp = Interpreter::headless();
        let v = eval_source(&mut interp, "2 + 3 * 4").unwrap();
        assert_eq!(v, Value::number(14.0));
    }

    #[test]
    fn power_is_right_folding() {
        let mut interp = Interpreter::headless();
        // 2 ^ 3 ^ 2 should re-enter Unary on the right per spec.md §4.3,
        // i.e. evaluate as 2 ^ (3 ^ 2) = 512, not (2^3)^2 = 64.
        let v = eval_source(&mut interp, "2 ^ 3 ^ 2").unwrap();
        assert_eq!(v, Value::number(512.0));
    }

    #[test]
    fn division_by_zero_errors() {
        let mut interp = Interpreter::headless();
        assert!(matches!(eval_source(&mut interp, "1 / 0"), Err(LogoError::DivisionByZero)));
    }

    #[test]
    fn unary_minus_parenthesized() {
        let mut interp = Interpreter::headless();
        let v = eval_source(&mut interp, "(- 4)").unwrap();
        assert_eq!(v, Value::number(-4.0));
    }

    #[test]
    fn relational_and_equality() {
        let mut interp = Interpreter::headless();
        assert_eq!(eval_source(&mut interp, "3 < 4").unwrap(), Value::boolean(true));
        assert_eq!(eval_source(&mut interp, "\"a = \"a").unwrap(), Value::boolean(true));
    }
}
