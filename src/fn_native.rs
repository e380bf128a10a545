//! Calling-convention plumbing shared by every built-in primitive
//! (`spec.md` §4.3, §9's "Special/noeval flags on routines" design note).
//!
//! Mirrors `rhai::fn_native`'s role - the home of the function-pointer
//! types every entry in the routines table is stored as - generalized to
//! three calling conventions instead of `rhai`'s one, since this
//! language's dispatcher distinguishes eager, noeval, and special
//! primitives (`spec.md` §4.3) where `rhai` only ever calls functions
//! with pre-evaluated arguments.
//!
//! Every primitive reports `LogoResult<Option<Value>>`: `None` is a
//! *command* that produced no result (`FD`, `PR`, `WHILE`, ...), `Some`
//! is a *reporter*'s output. This mirrors the distinction real Logos draw
//! between commands and reporters, and is what lets the driver
//! (`spec.md` §4.7) tell "ran fine, nothing to report" apart from
//! "produced a value nobody asked for".

use crate::error::LogoResult;
use crate::value::Value;
use std::future::Future;
use std::pin::Pin;

/// The uniform "eventually-a-value-or-nothing" shape every primitive
/// (and the evaluator itself) produces (`spec.md` §9's thunk/
/// asynchronous-result design note). Boxed because primitive functions
/// are stored as plain `fn` pointers in the routines table and therefore
/// cannot return an anonymous `impl Future` type - the same reason
/// `rhai`'s own `CallableFunction` boxes its closures, just one level
/// further down (here it's the future, not the closure, that needs
/// boxing).
pub type PrimitiveFut<'a> = Pin<Box<dyn Future<Output = LogoResult<Option<Value>>> + 'a>>;

/// Boxes an async block that already produces the right shape. Used by
/// primitives that must genuinely await something (turtle motion, `WAIT`)
/// and also report a value or its absence themselves.
pub fn native_async<'a, F>(fut: F) -> PrimitiveFut<'a>
where
    F: Future<Output = LogoResult<Option<Value>>> + 'a,
{
    Box::pin(fut)
}

/// A *reporter* that must await something before producing its value
/// (e.g. `TOWARDS`, which reads turtle state but via an async getter).
pub fn reporter_async<'a, F>(fut: F) -> PrimitiveFut<'a>
where
    F: Future<Output = LogoResult<Value>> + 'a,
{
    Box::pin(async move { fut.await.map(Some) })
}

/// A *command* that must await something (turtle motion, `WAIT`) and
/// produces no value on success.
pub fn command_async<'a, F>(fut: F) -> PrimitiveFut<'a>
where
    F: Future<Output = LogoResult<()>> + 'a,
{
    Box::pin(async move { fut.await.map(|()| None) })
}

/// A reporter whose value is already known synchronously - the common
/// case for arithmetic, predicates, and list/word selectors.
pub fn reporter<'a>(value: LogoResult<Value>) -> PrimitiveFut<'a> {
    Box::pin(std::future::ready(value.map(Some)))
}

/// A command whose effect already happened synchronously (workspace
/// mutation, variable assignment, property-list writes).
pub fn command<'a>(result: LogoResult<()>) -> PrimitiveFut<'a> {
    Box::pin(std::future::ready(result.map(|()| None)))
}
