//! The dispatch protocol: the "Final" rung of the expression grammar
//! (`spec.md` §4.3), and the machinery that actually invokes a resolved
//! [`crate::module::Routine`] once its arguments have been gathered.
//!
//! Named after `rhai::fn_call`, whose `exec_fn_call` plays the analogous
//! role for `rhai`: look up the callable by name, decide how its
//! arguments are gathered, and invoke it. The three-way branch on
//! {special, noeval, normal} below is this crate's equivalent of
//! `rhai`'s overload-resolution-by-arity-and-type-hash - except Logo
//! resolves purely by name, with a single declared arity greedily
//! consumed from the token stream rather than chosen among overloads.

use crate::ast::Atom;
use crate::engine::{atoms_to_literal_items, eval_expr, parse_expr, Cursor, Expr};
use crate::error::{LogoError, LogoResult};
use crate::module::Routine;
use crate::value::Value;
use crate::Interpreter;

/// How a resolved routine wants its arguments gathered, decided once at
/// the call site and then acted on uniformly by both the
/// natural-arity and explicit-`(`-arity paths.
enum Kind {
    Special,
    NoEval(usize),
    Normal(usize),
}

fn classify(interp: &Interpreter, name: &str) -> Option<Kind> {
    interp.routines().get(name).map(|r| match r {
        Routine::Special { .. } => Kind::Special,
        Routine::NoEval { arity, .. } => Kind::NoEval(*arity),
        Routine::Primitive { arity, .. } => Kind::Normal(*arity),
        Routine::User { .. } => Kind::Normal(r.natural_arity()),
    })
}

/// `spec.md` §4.3's "unknown name has a trailing digit run" check:
/// `SQ1` reported as "need a space between SQ and 1" when `SQ` is a
/// known routine. Returns the non-digit prefix and the digit suffix.
fn split_trailing_digits(name: &str) -> Option<(&str, &str)> {
    let digit_start = name
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)?;
    if digit_start == 0 {
        return None;
    }
    Some((&name[..digit_start], &name[digit_start..]))
}

fn lookup_for_dispatch<'a>(interp: &'a Interpreter, name: &str) -> LogoResult<Kind> {
    if let Some(kind) = classify(interp, name) {
        return Ok(kind);
    }
    if let Some((prefix, suffix)) = split_trailing_digits(name) {
        if interp.routines().is_defined(prefix) {
            return Err(LogoError::NeedSpaceBetween(
                prefix.to_string(),
                suffix.to_string(),
            ));
        }
    }
    let _ = interp; // keep lifetime parameter meaningful for callers
    Err(LogoError::UnknownProcedure(name.to_string()))
}

/// `Final := number | quoted-word | :variable | list-literal`
/// `      | '(' Expression ')' | '(' procName args... ')'`
/// `      | procName args...`   (`spec.md` §4.3)
pub fn parse_final(interp: &mut Interpreter, cur: &mut Cursor) -> LogoResult<Expr> {
    let atom = match cur.peek() {
        Some(a) => a.clone(),
        None => return Err(LogoError::UnexpectedEndOfInput),
    };

    match atom {
        Atom::Word(ref s) if s.starts_with('"') => {
            cur.advance();
            Ok(Expr::Str(s[1..].to_string()))
        }
        Atom::Word(ref s) if s.starts_with(':') && s.len() > 1 => {
            cur.advance();
            Ok(Expr::VarRef(s[1..].to_string()))
        }
        Atom::Word(ref s) if s.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) => {
            cur.advance();
            Ok(Expr::Number(crate::value::parse_numeric(s).unwrap_or(0.0)))
        }
        Atom::List(items) => {
            cur.advance();
            Ok(Expr::ListLit(Value::list(atoms_to_literal_items(&items))))
        }
        Atom::Array(items, origin) => {
            cur.advance();
            Ok(Expr::ArrayLit(Value::array(atoms_to_literal_items(&items), origin)))
        }
        Atom::Word(ref s) if s == "(" => {
            cur.advance();
            parse_paren(interp, cur)
        }
        Atom::Word(ref name) => {
            cur.advance();
            parse_dispatch_natural(interp, cur, name)
        }
        Atom::UnaryMinus => unreachable!("parse_unary consumes UnaryMinus before reaching Final"),
    }
}

/// Disambiguates `( ... )` per `spec.md` §4.3: a parenthesized
/// procedure call (explicit arity) if the next atom names a known
/// routine and the one after that is not an infix operator; otherwise a
/// plain parenthesized sub-expression.
fn parse_paren(interp: &mut Interpreter, cur: &mut Cursor) -> LogoResult<Expr> {
    let is_call = match cur.peek() {
        Some(Atom::Word(name)) if interp.routines().is_defined(name) => {
            !matches!(cur.peek_at(1), Some(a) if a.operator().is_some())
        }
        _ => false,
    };

    if is_call {
        let name = match cur.advance() {
            Some(Atom::Word(s)) => s.clone(),
            _ => unreachable!("just matched Some(Atom::Word(_)) above"),
        };
        parse_dispatch_explicit(interp, cur, &name)
    } else {
        let inner = parse_expr(interp, cur)?;
        match cur.advance() {
            Some(a) if a.is_rparen() => Ok(Expr::Paren(Box::new(inner))),
            _ => Err(LogoError::ExpectedCloseParen),
        }
    }
}

/// Natural-arity dispatch: `spec.md` §4.3's core protocol. Looks up
/// `name`, then branches on {special, noeval, normal}.
fn parse_dispatch_natural(interp: &mut Interpreter, cur: &mut Cursor, name: &str) -> LogoResult<Expr> {
    match lookup_for_dispatch(interp, name)? {
        Kind::Special => {
            let func = interp
                .routines()
                .get(name)
                .and_then(Routine::as_special_fn)
                .expect("classify() reported Kind::Special for this routine");
            func(interp, cur)?;
            Ok(Expr::Unit)
        }
        Kind::NoEval(arity) => {
            let mut args = Vec::with_capacity(arity);
            for _ in 0..arity {
                args.push(parse_expr(interp, cur)?);
            }
            Ok(Expr::NoEvalCall {
                name: name.to_string(),
                args,
            })
        }
        Kind::Normal(arity) => {
            let mut args = Vec::with_capacity(arity);
            for _ in 0..arity {
                args.push(parse_expr(interp, cur)?);
            }
            // `IF`'s one narrow arity exception (`spec.md` §8 examples 5-6):
            // natural-arity `IF cond [then]` is complete with 2 expressions,
            // but `IF cond [then] [else]` must also parse with no parens,
            // so a bracket literal immediately following is greedily
            // consumed as a third, optional argument.
            if name.eq_ignore_ascii_case("IF") && matches!(cur.peek(), Some(Atom::List(_))) {
                args.push(parse_expr(interp, cur)?);
            }
            Ok(Expr::Call {
                name: name.to_string(),
                args,
            })
        }
    }
}

/// Explicit-`(`-arity dispatch: keep parsing expressions until `)`,
/// ignoring the routine's declared natural arity (`spec.md` §4.3).
fn parse_dispatch_explicit(interp: &mut Interpreter, cur: &mut Cursor, name: &str) -> LogoResult<Expr> {
    let kind = lookup_for_dispatch(interp, name)?;
    if matches!(kind, Kind::Special) {
        return Err(LogoError::Runtime(format!(
            "{} is a special form and can't be called with parentheses",
            name
        )));
    }

    let mut args = Vec::new();
    loop {
        match cur.peek() {
            Some(a) if a.is_rparen() => {
                cur.advance();
                break;
            }
            None => return Err(LogoError::ExpectedCloseParen),
            _ => args.push(parse_expr(interp, cur)?),
        }
    }

    Ok(if matches!(kind, Kind::NoEval(_)) {
        Expr::NoEvalCall {
            name: name.to_string(),
            args,
        }
    } else {
        Expr::Call {
            name: name.to_string(),
            args,
        }
    })
}

/// Evaluates one already-parsed statement's top-level expression,
/// returning `None` for a command (produced no value, fine at statement
/// position) rather than forcing one the way [`eval_expr`] does for
/// value-context operands. This is `src/driver.rs`'s only entry point
/// into the dispatcher.
pub async fn eval_statement(interp: &mut Interpreter, expr: &Expr) -> LogoResult<Option<Value>> {
    interp.tick_operation()?;
    match expr {
        Expr::Call { name, args } => {
            let mut values = Vec::with_capacity(args.len());
            for a in args {
                values.push(eval_expr(interp, a).await?);
            }
            invoke(interp, name, values).await
        }
        Expr::NoEvalCall { name, args } => invoke_noeval(interp, name, args).await,
        Expr::Unit => Ok(None),
        other => eval_expr(interp, other).await.map(Some),
    }
}

/// Invokes a normal (eager-argument) routine by name: a primitive or a
/// user-defined procedure, both already resolved to pre-evaluated
/// [`Value`] arguments. Pushes/pops the procedure-name stack around the
/// call so `{_PROC_}` error interpolation (`spec.md` §7) and the
/// call-depth limit (`SPEC_FULL.md` §9) both see it.
pub async fn invoke(interp: &mut Interpreter, name: &str, args: Vec<Value>) -> LogoResult<Option<Value>> {
    use tracing::Instrument;
    interp.push_proc(name.to_string())?;
    let span = tracing::trace_span!("invoke", proc = name);
    let result = invoke_inner(interp, name, args).instrument(span).await;
    interp.pop_proc();
    if let Err(err) = &result {
        if !err.is_signal() {
            tracing::debug!(proc = name, %err, "procedure call failed");
        }
    }
    result
}

enum Callable {
    Primitive(crate::module::PrimitiveFn),
    User(Vec<String>, Vec<Atom>),
}

async fn invoke_inner(interp: &mut Interpreter, name: &str, args: Vec<Value>) -> LogoResult<Option<Value>> {
    let callable = match interp.routines().get(name) {
        Some(r) if r.as_primitive_fn().is_some() => Callable::Primitive(r.as_primitive_fn().unwrap()),
        Some(r) if r.as_user().is_some() => {
            let (formals, body) = r.as_user().unwrap();
            Callable::User(formals.to_vec(), body.to_vec())
        }
        _ => return Err(LogoError::UnknownProcedure(name.to_string())),
    };
    match callable {
        Callable::Primitive(func) => func(interp, args).await,
        Callable::User(formals, body) => call_user_procedure(interp, &formals, &body, args).await,
    }
}

/// Invokes a noeval routine (`AND`/`OR`/`WHILE`/...) by name, handing it
/// the unevaluated argument expressions directly so it can short-circuit
/// or re-evaluate them on its own terms (`spec.md` §4.3).
pub async fn invoke_noeval(interp: &mut Interpreter, name: &str, args: &[Expr]) -> LogoResult<Option<Value>> {
    interp.push_proc(name.to_string())?;
    let func = match interp.routines().get(name).and_then(Routine::as_noeval_fn) {
        Some(f) => f,
        None => {
            interp.pop_proc();
            return Err(LogoError::UnknownProcedure(name.to_string()));
        }
    };
    let result = func(interp, args).await;
    interp.pop_proc();
    result
}

/// User-procedure call setup (`spec.md` §4.4): push a fresh scope
/// frame, bind formals to actuals (missing actuals leave the formal
/// unbound, per spec), run the body through the execution driver, and
/// translate the non-local-exit signals it may raise into this call's
/// return value.
async fn call_user_procedure(
    interp: &mut Interpreter,
    formals: &[String],
    body: &[Atom],
    args: Vec<Value>,
) -> LogoResult<Option<Value>> {
    interp.scopes_mut().push_frame();
    for (i, formal) in formals.iter().enumerate() {
        match args.get(i) {
            Some(v) => interp.scopes_mut().bind_formal(formal, v.clone()),
            None => interp.scopes_mut().local(formal),
        }
    }

    let result = crate::driver::run_body(interp, body).await;
    interp.scopes_mut().pop_frame();

    match result {
        Ok(()) => Ok(None),
        Err(LogoError::Output(v)) => Ok(Some(v)),
        Err(LogoError::Stop) => Ok(None),
        Err(other) => Err(other),
    }
}

/// `TO`: the one special form in this language (`spec.md` §4.4).
/// Consumes the procedure name, its `:input` formals, and body tokens
/// up to (and including) `END` directly from the live cursor.
pub fn to_special(interp: &mut Interpreter, cur: &mut Cursor) -> LogoResult<()> {
    let name = match cur.advance() {
        Some(Atom::Word(s)) => s.clone(),
        _ => return Err(LogoError::UnexpectedEndOfInput),
    };

    let mut formals = Vec::new();
    while let Some(Atom::Word(w)) = cur.peek() {
        match w.strip_prefix(':') {
            Some(stripped) if !stripped.is_empty() => {
                formals.push(stripped.to_string());
                cur.advance();
            }
            _ => break,
        }
    }

    let mut body = Vec::new();
    loop {
        match cur.peek() {
            None => return Err(LogoError::MissingEnd),
            Some(Atom::Word(w)) if interp.is_keyword(w, "END") => {
                cur.advance();
                break;
            }
            Some(_) => body.push(cur.advance().unwrap().clone()),
        }
    }

    define_user_procedure(interp, &name, formals, body)
}

/// Shared registration path for `TO` and `DEFINE` (`spec.md` §4.4):
/// honors the redefinition rules and fires the save hook with the
/// textual `to ... end` form (`spec.md` §6).
pub fn define_user_procedure(
    interp: &mut Interpreter,
    name: &str,
    formals: Vec<String>,
    body: Vec<Atom>,
) -> LogoResult<()> {
    let redefp = interp.redefp();
    interp
        .routines_mut()
        .define_user(name, formals, body, redefp)?;
    let definition = interp.routines().definition_text(name);
    interp.on_define(name, definition);
    Ok(())
}

/// Converts a stored list-of-words `Value` (as held by a `DEFINE`
/// formals/body argument) back into an `Atom` sequence by re-lexing its
/// rendered text, since "list contents are stored as bare words"
/// (`spec.md` §4.4) and only a fresh lexer pass can re-derive things
/// like the unary-minus sentinel.
pub fn relex_list_value(v: &Value) -> LogoResult<Vec<Atom>> {
    let text = v.as_text();
    crate::token::lex_program(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::lex_program;

    fn run(src: &str) -> LogoResult<Option<Value>> {
        let mut interp = Interpreter::headless();
        futures::executor::block_on(interp.run(src))
    }

    #[test]
    fn natural_arity_consumes_declared_input_count() {
        // SUM has arity 2; natural-arity call reads exactly two
        // expressions, leaving `+ 20` to apply to the whole call.
        let v = run("pr sum 1 2 + 20").unwrap();
        assert!(v.is_none());
    }

    #[test]
    fn explicit_parens_use_arbitrary_arity() {
        let v = run("output (sum 1 2 3)");
        match v {
            Ok(Some(val)) => assert_eq!(val, Value::number(6.0)),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn unknown_procedure_reports_name() {
        let atoms = lex_program("nosuchproc 1 2").unwrap();
        let mut cur = Cursor::new(&atoms);
        let mut interp = Interpreter::headless();
        let err = parse_final(&mut interp, &mut cur).unwrap_err();
        assert!(matches!(err, LogoError::UnknownProcedure(ref n) if n == "nosuchproc"));
    }

    #[test]
    fn trailing_digit_run_reports_need_space() {
        let atoms = lex_program("sum1 1 2").unwrap();
        let mut cur = Cursor::new(&atoms);
        let mut interp = Interpreter::headless();
        let err = parse_final(&mut interp, &mut cur).unwrap_err();
        assert!(matches!(err, LogoError::NeedSpaceBetween(ref a, ref b) if a == "SUM" && b == "1"));
    }
}
