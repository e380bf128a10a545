//! Control-flow primitives (`spec.md` §4.6). `TO` is the only true
//! special form (registered in `src/fn_call.rs`, wired up from here);
//! everything below is either an ordinary eager-argument primitive
//! (`IF`, `REPEAT`, `FOR`, ...) or a noeval primitive that receives its
//! unevaluated argument expressions directly (`AND`/`OR`/`WHILE`/...).

use super::support::{eval_condition, run_list_body};
use crate::ast::Atom;
use crate::engine::{eval_expr, Expr};
use crate::error::{LogoError, LogoResult};
use crate::fn_native::{command, PrimitiveFut};
use crate::module::RoutineTable;
use crate::value::Value;
use crate::Interpreter;

/// `IF cond thenlist [elselist]`: `cond` may already be a boolean word
/// (the common case - a relational expression was evaluated eagerly as
/// this call's first argument) or a list, which must be re-parsed and
/// evaluated (`spec.md` §4.6).
fn if_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    Box::pin(async move {
        let cond = eval_condition(interp, args[0].clone()).await?;
        if cond {
            run_list_body(interp, &args[1], false).await
        } else if let Some(else_list) = args.get(2) {
            run_list_body(interp, else_list, false).await
        } else {
            Ok(None)
        }
    })
}

fn ifelse_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    Box::pin(async move {
        let cond = eval_condition(interp, args[0].clone()).await?;
        if cond {
            run_list_body(interp, &args[1], true).await
        } else {
            run_list_body(interp, &args[2], true).await
        }
    })
}

/// `TEST cond`: stashes a boolean on the *current* scope frame
/// (`spec.md` §4.6), not inside any named binding.
fn test_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    Box::pin(async move {
        let cond = eval_condition(interp, args[0].clone()).await?;
        interp.scopes_mut().set_test(cond);
        Ok(None)
    })
}

fn ift_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    Box::pin(async move {
        if interp.scopes().test().unwrap_or(false) {
            run_list_body(interp, &args[0], false).await
        } else {
            Ok(None)
        }
    })
}

fn iff_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    Box::pin(async move {
        if !interp.scopes().test().unwrap_or(true) {
            run_list_body(interp, &args[0], false).await
        } else {
            Ok(None)
        }
    })
}

/// `REPEAT n stmts`: saves/restores `repcount` (`spec.md` §4.6), and
/// yields between iterations (`spec.md` §5).
fn repeat_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    Box::pin(async move {
        let n = super::support::integer(&args[0])?;
        interp.push_repcount(1);
        for i in 1..=n.max(0) {
            interp.set_repcount(i);
            run_list_body(interp, &args[1], false).await?;
            crate::driver::yield_now().await;
        }
        interp.pop_repcount();
        Ok(None)
    })
}

/// `FOREVER stmts`: loops without bound. `STOP`/`OUTPUT`/`BYE` raised
/// from the body are not caught here - they propagate to the nearest
/// user-procedure boundary (`spec.md` §4.4/§4.6), which is what actually
/// terminates the loop.
fn forever_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    Box::pin(async move {
        interp.push_repcount(1);
        let mut i: i64 = 1;
        let result = loop {
            interp.set_repcount(i);
            if let Err(e) = run_list_body(interp, &args[0], false).await {
                break Err(e);
            }
            crate::driver::yield_now().await;
            i += 1;
        };
        interp.pop_repcount();
        result
    })
}

/// `FOR [var start limit step?] stmts` (`spec.md` §4.6): `start`/`limit`
/// are parsed once; any trailing tokens form the `step` expression,
/// re-evaluated every iteration (defaulting to `sign(limit-start)`).
fn for_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    Box::pin(async move {
        let control_atoms: Vec<Atom> = crate::fn_call::relex_list_value(&args[0])?;
        let mut cur = crate::engine::Cursor::new(&control_atoms);
        let var = match cur.advance() {
            Some(Atom::Word(w)) => w.clone(),
            _ => return Err(LogoError::UnexpectedEndOfInput),
        };
        let start_expr = crate::engine::parse_expr(interp, &mut cur)?;
        let start = super::support::number(&eval_expr(interp, &start_expr).await?)?;
        let limit_expr = crate::engine::parse_expr(interp, &mut cur)?;
        let limit = super::support::number(&eval_expr(interp, &limit_expr).await?)?;
        let step_atoms: Vec<Atom> = cur.remaining().to_vec();
        let default_step = if limit >= start { 1.0 } else { -1.0 };

        interp.scopes_mut().push_frame();
        interp.scopes_mut().bind_formal(&var, Value::number(start));
        let outcome: LogoResult<()> = loop {
            let current = match interp
                .scopes()
                .lookup(&var)
                .and_then(|b| b.value.clone())
                .ok_or_else(|| LogoError::UnknownVariable(var.clone()))
                .and_then(|v| super::support::number(&v))
            {
                Ok(n) => n,
                Err(e) => break Err(e),
            };
            let step = if step_atoms.is_empty() {
                default_step
            } else {
                let mut c2 = crate::engine::Cursor::new(&step_atoms);
                let parsed = match crate::engine::parse_expr(interp, &mut c2) {
                    Ok(e) => e,
                    Err(e) => break Err(e),
                };
                let value = match eval_expr(interp, &parsed).await {
                    Ok(v) => v,
                    Err(e) => break Err(e),
                };
                match super::support::number(&value) {
                    Ok(n) => n,
                    Err(e) => break Err(e),
                }
            };
            let diff = current - limit;
            if diff != 0.0 && diff.signum() == step.signum() {
                break Ok(());
            }
            if let Err(e) = run_list_body(interp, &args[1], false).await {
                break Err(e);
            }
            crate::driver::yield_now().await;
            interp.scopes_mut().bind_formal(&var, Value::number(current + step));
        };
        interp.scopes_mut().pop_frame();
        outcome?;
        Ok(None)
    })
}

/// `AND`/`OR` (`spec.md` §4.3, §4.6): noeval, short-circuiting. Declared
/// natural arity 2; with explicit parens, `args` may hold any number of
/// operand expressions.
fn and_fn<'a>(interp: &'a mut Interpreter, args: &'a [Expr]) -> PrimitiveFut<'a> {
    Box::pin(async move {
        for a in args {
            let v = eval_expr(interp, a).await?;
            if !super::support::boolean(&v)? {
                return Ok(Some(Value::boolean(false)));
            }
        }
        Ok(Some(Value::boolean(true)))
    })
}

fn or_fn<'a>(interp: &'a mut Interpreter, args: &'a [Expr]) -> PrimitiveFut<'a> {
    Box::pin(async move {
        for a in args {
            let v = eval_expr(interp, a).await?;
            if super::support::boolean(&v)? {
                return Ok(Some(Value::boolean(true)));
            }
        }
        Ok(Some(Value::boolean(false)))
    })
}

/// Shared `WHILE`/`UNTIL`/`DO.WHILE`/`DO.UNTIL` core: `stop_when(cond)`
/// decides whether the loop is done; `post` means the body runs once
/// before the first check (`DO.*` variants).
async fn loop_while(
    interp: &mut Interpreter,
    cond_expr: &Expr,
    body_expr: &Expr,
    stop_when_true: bool,
    post: bool,
) -> crate::error::LogoResult<Option<Value>> {
    if post {
        let body = eval_expr(interp, body_expr).await?;
        run_list_body(interp, &body, false).await?;
        crate::driver::yield_now().await;
    }
    loop {
        let cond_value = eval_expr(interp, cond_expr).await?;
        let truth = eval_condition(interp, cond_value).await?;
        if truth == stop_when_true {
            break;
        }
        let body = eval_expr(interp, body_expr).await?;
        run_list_body(interp, &body, false).await?;
        crate::driver::yield_now().await;
    }
    Ok(None)
}

fn while_fn<'a>(interp: &'a mut Interpreter, args: &'a [Expr]) -> PrimitiveFut<'a> {
    Box::pin(loop_while(interp, &args[0], &args[1], false, false))
}

fn until_fn<'a>(interp: &'a mut Interpreter, args: &'a [Expr]) -> PrimitiveFut<'a> {
    Box::pin(loop_while(interp, &args[0], &args[1], true, false))
}

fn do_while_fn<'a>(interp: &'a mut Interpreter, args: &'a [Expr]) -> PrimitiveFut<'a> {
    Box::pin(loop_while(interp, &args[0], &args[1], false, true))
}

fn do_until_fn<'a>(interp: &'a mut Interpreter, args: &'a [Expr]) -> PrimitiveFut<'a> {
    Box::pin(loop_while(interp, &args[0], &args[1], true, true))
}

/// `CASE value clauses`: each clause's head is a list of candidates (or
/// `ELSE`); first match wins and its remainder is evaluated as an
/// expression (`spec.md` §4.6).
fn case_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    Box::pin(async move {
        let value = &args[0];
        let clauses = super::support::elements(&args[1])?;
        for clause in clauses {
            let parts = super::support::elements(&clause)?;
            if parts.is_empty() {
                continue;
            }
            let (head, rest) = (&parts[0], &parts[1..]);
            let matches = match head {
                Value::Word(w) if w.text().eq_ignore_ascii_case("ELSE") => true,
                other => super::support::elements(other)?.iter().any(|c| c == value),
            };
            if matches {
                let body = Value::list(rest.to_vec());
                let atoms = crate::fn_call::relex_list_value(&body)?;
                let mut cur = crate::engine::Cursor::new(&atoms);
                let expr = crate::engine::parse_expr(interp, &mut cur)?;
                return eval_expr(interp, &expr).await.map(Some);
            }
        }
        Ok(None)
    })
}

fn run_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    Box::pin(async move { run_list_body(interp, &args[0], true).await })
}

fn runresult_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    Box::pin(async move {
        let result = run_list_body(interp, &args[0], true).await?;
        Ok(Some(match result {
            Some(v) => Value::list(vec![v]),
            None => Value::empty_list(),
        }))
    })
}

fn output_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command(Err(LogoError::Output(args[0].clone())))
}

fn stop_fn<'a>(_interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    command(Err(LogoError::Stop))
}

fn bye_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    interp.set_force_bye(true);
    command(Err(LogoError::Bye))
}

pub fn register(table: &mut RoutineTable) {
    table.register_special("TO", crate::fn_call::to_special);
    // Declared natural arity is 2 (cond + then-list); `src/fn_call.rs`'s
    // dispatcher special-cases this name to also greedily consume a
    // second, optional bracket literal as an else-list when one
    // immediately follows - the one narrow lookahead this language's
    // otherwise-fixed-arity dispatch needs (`spec.md` §8 examples 5-6:
    // both the two-branch and the bare-else-omitted single-branch forms
    // appear with no parentheses).
    table.register_primitive("IF", 2, if_fn);
    table.register_primitive("IFELSE", 3, ifelse_fn);
    table.register_primitive("TEST", 1, test_fn);
    table.register_primitive("IFT", 1, ift_fn);
    table.register_primitive("IFF", 1, iff_fn);
    table.register_primitive("REPEAT", 2, repeat_fn);
    table.register_primitive("FOREVER", 1, forever_fn);
    table.register_primitive("FOR", 2, for_fn);
    table.register_noeval("AND", 2, and_fn);
    table.register_noeval("OR", 2, or_fn);
    table.register_noeval("WHILE", 2, while_fn);
    table.register_noeval("UNTIL", 2, until_fn);
    table.register_noeval("DO.WHILE", 2, do_while_fn);
    table.register_noeval("DO.UNTIL", 2, do_until_fn);
    table.register_primitive("CASE", 2, case_fn);
    table.register_primitive("RUN", 1, run_fn);
    table.register_primitive("RUNRESULT", 1, runresult_fn);
    table.register_primitive("OUTPUT", 1, output_fn);
    table.register_primitive("STOP", 0, stop_fn);
    table.register_primitive("BYE", 0, bye_fn);
}

#[cfg(test)]
mod tests {
    use crate::value::Value;
    use crate::Interpreter;

    fn run(src: &str) -> Option<Value> {
        let mut interp = Interpreter::headless();
        futures::executor::block_on(interp.run(src)).unwrap()
    }

    #[test]
    fn if_runs_then_branch_on_true() {
        let mut interp = Interpreter::headless();
        futures::executor::block_on(interp.run("make \"x 10  if :x > 5 [make \"r \"big] [make \"r \"small]")).unwrap();
        assert_eq!(interp.scopes().lookup("r").unwrap().value, Some(Value::word("big")));
    }

    #[test]
    fn fact_recursion_with_output() {
        let result = run(
            "to fact :n  if :n < 2 [output 1]  output :n * fact :n - 1  end  output fact 5",
        );
        assert_eq!(result, Some(Value::number(120.0)));
    }

    #[test]
    fn and_short_circuits() {
        let mut interp = Interpreter::headless();
        futures::executor::block_on(interp.run(
            "make \"hit \"false  to sideeffect  make \"hit \"true  output \"true  end  \
             if (and \"false sideeffect) [make \"r 1] [make \"r 0]",
        ))
        .unwrap();
        assert_eq!(interp.scopes().lookup("hit").unwrap().value, Some(Value::word("false")));
    }

    #[test]
    fn repeat_runs_n_times_and_sets_repcount() {
        let mut interp = Interpreter::headless();
        futures::executor::block_on(
            interp.run("make \"total 0  repeat 4 [make \"total :total + repcount]"),
        )
        .unwrap();
        assert_eq!(interp.scopes().lookup("total").unwrap().value, Some(Value::number(10.0)));
    }

    #[test]
    fn while_loop_counts_up() {
        let mut interp = Interpreter::headless();
        futures::executor::block_on(
            interp.run("make \"i 0  while [:i < 5] [make \"i :i + 1]"),
        )
        .unwrap();
        assert_eq!(interp.scopes().lookup("i").unwrap().value, Some(Value::number(5.0)));
    }

    #[test]
    fn for_loop_sums_range() {
        let mut interp = Interpreter::headless();
        futures::executor::block_on(
            interp.run("make \"total 0  for [i 1 5] [make \"total :total + :i]"),
        )
        .unwrap();
        assert_eq!(interp.scopes().lookup("total").unwrap().value, Some(Value::number(15.0)));
    }
}
