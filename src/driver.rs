//! Execution driver: runs a statement sequence cooperatively
//! (`spec.md` §4.7, §5).
//!
//! `rhai` never needed this module - its statements run to completion
//! synchronously, one `Engine::eval_ast_with_scope` call at a time. This
//! crate's driver generalizes that single-shot evaluation into a loop
//! that yields between statements (and at a few more points §5
//! enumerates), the way a cooperative scheduler interleaves with its
//! host event loop.

use crate::ast::Atom;
use crate::engine::{parse_expr, Cursor};
use crate::error::{LogoError, LogoResult};
use crate::fn_call::eval_statement;
use crate::value::Value;
use crate::Interpreter;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Yields control back to the host executor exactly once before
/// resolving. Used at every suspension point `spec.md` §5 names that
/// isn't already a suspension inherent to an awaited primitive (turtle
/// motion, `WAIT`): between statements, between loop iterations, and at
/// the end of a user-defined procedure body.
pub(crate) struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            Poll::Ready(())
        } else {
            self.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

pub(crate) fn yield_now() -> YieldNow {
    YieldNow { yielded: false }
}

/// Runs `atoms` as a statement sequence (`spec.md` §4.7): repeatedly
/// parses one expression from the front of the sequence and evaluates
/// it, enforcing that a statement produces no value unless
/// `return_result` is set (the mode `RUN`/`RUNRESULT` need for an
/// explicit-result list, as opposed to an ordinary command sequence).
///
/// Boxed rather than written as plain `async fn` because this function
/// and [`crate::fn_call::call_user_procedure`] are mutually recursive
/// (a user procedure's body runs through here, and a procedure call
/// inside that body runs back through `fn_call::invoke`) - exactly the
/// same reason `src/engine.rs`'s `eval_expr` boxes itself.
pub fn run_sequence<'a>(
    interp: &'a mut Interpreter,
    atoms: &'a [Atom],
    return_result: bool,
) -> Pin<Box<dyn Future<Output = LogoResult<Option<Value>>> + 'a>> {
    Box::pin(async move {
        let mut cur = Cursor::new(atoms);
        let mut last = None;
        loop {
            if interp.force_bye() {
                return Err(LogoError::Bye);
            }
            if cur.is_empty() {
                return Ok(last);
            }
            let expr = parse_expr(interp, &mut cur)?;
            let produced = eval_statement(interp, &expr).await?;
            yield_now().await;
            match produced {
                None => {}
                Some(v) if return_result => last = Some(v),
                Some(v) => return Err(LogoError::DontKnowWhatToDoWith(v)),
            }
        }
    })
}

/// Runs a user-defined procedure's body (`spec.md` §4.4): an ordinary
/// command sequence (no `return_result`), with the extra "yield before
/// returning" suspension point `spec.md` §5 calls out specifically for
/// procedure-body completion.
pub fn run_body<'a>(
    interp: &'a mut Interpreter,
    body: &'a [Atom],
) -> Pin<Box<dyn Future<Output = LogoResult<()>> + 'a>> {
    Box::pin(async move {
        let result = run_sequence(interp, body, false).await;
        yield_now().await;
        result.map(|_| ())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::lex_program;

    fn run(src: &str) -> LogoResult<Option<Value>> {
        let atoms = lex_program(src).unwrap();
        let mut interp = Interpreter::headless();
        futures::executor::block_on(run_sequence(&mut interp, &atoms, false))
    }

    #[test]
    fn empty_sequence_resolves_with_no_value() {
        assert_eq!(run("").unwrap(), None);
    }

    #[test]
    fn command_sequence_produces_no_value() {
        assert_eq!(run("make \"x 1  make \"y 2").unwrap(), None);
    }

    #[test]
    fn stray_value_at_top_level_is_an_error() {
        let err = run("sum 1 2").unwrap_err();
        assert!(matches!(err, LogoError::DontKnowWhatToDoWith(_)));
    }

    #[test]
    fn force_bye_unwinds_at_next_statement_boundary() {
        let atoms = lex_program("make \"x 1  make \"y 2").unwrap();
        let mut interp = Interpreter::headless();
        interp.set_force_bye(true);
        let result = futures::executor::block_on(run_sequence(&mut interp, &atoms, false));
        assert!(matches!(result, Err(LogoError::Bye)));
    }
}
