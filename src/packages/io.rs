//! Textual input/output and the small grab-bag of reporters that don't
//! fit any other family: `REPCOUNT`/`#` (`spec.md` §4.6) and the
//! `numberwang` joke primitive `SPEC_FULL.md` §10 preserves.
//!
//! `PR`/`PRINT`/`SHOW`/`TYPE` all funnel through [`crate::interfaces::Stream::write`],
//! which takes a `&[&str]` rather than a single owned string - the same
//! "caller assembles the pieces, the sink just concatenates" shape
//! `rhai`'s own `Engine::on_print`/`on_debug` hooks use for output.

use crate::fn_native::{command_async, native_async, reporter, PrimitiveFut};
use crate::module::RoutineTable;
use crate::value::Value;
use crate::Interpreter;

/// `PRINT`/`PR thing`: writes each argument's top-level text form
/// (`as_text`, so a list argument prints without its own outer brackets),
/// space-separated, followed by a newline.
fn print_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let joined = args.iter().map(Value::as_text).collect::<Vec<_>>().join(" ");
        interp.stream_mut().write(&[&joined, "\n"]).await;
        Ok(())
    })
}

/// `SHOW thing`: like `PRINT`, but a list/array argument keeps its own
/// brackets (`as_nested_text`) - the distinction classic Logo draws
/// between the two (`spec.md` §9's primitive catalogue).
fn show_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let joined = args
            .iter()
            .map(Value::as_nested_text)
            .collect::<Vec<_>>()
            .join(" ");
        interp.stream_mut().write(&[&joined, "\n"]).await;
        Ok(())
    })
}

/// `TYPE thing`: like `PRINT`, but no trailing newline - classic Logo's
/// "print without advancing the line" primitive.
fn type_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let joined = args.iter().map(Value::as_text).collect::<Vec<_>>().join(" ");
        interp.stream_mut().write(&[&joined]).await;
        Ok(())
    })
}

/// `READLIST`/`RL`: reads one line of host input as a list, whatever
/// shape the installed [`crate::interfaces::Stream`] decides to hand back.
fn readlist_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    native_async(async move { Ok(Some(interp.stream_mut().read(None).await)) })
}

/// `READWORD`/`RW`: like `READLIST`, but the whole line collapses to a
/// single word rather than being split into list elements.
fn readword_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    native_async(async move {
        let line = interp.stream_mut().read(None).await;
        Ok(Some(Value::word(line.as_text())))
    })
}

/// `WAIT n`: no real timer hook exists in this core (`spec.md` §6 keeps
/// timing entirely out of scope), so this just yields control back to
/// the host executor `n` times - the only suspension mechanism §5
/// actually specifies. A host driving a real clock can simply make its
/// executor's poll cadence match whatever real delay it wants `WAIT` to
/// represent.
fn wait_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command_async(async move {
        let n = super::support::integer(&args[0])?;
        for _ in 0..n.max(0) {
            crate::driver::yield_now().await;
        }
        let _ = interp;
        Ok(())
    })
}

/// `REPCOUNT`/`#`: the innermost active `REPEAT`/`FOREVER` counter
/// (`spec.md` §4.6), or -1 outside any such loop.
fn repcount_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::number(interp.repcount() as f64)))
}

/// `NUMBERWANG`: the preserved joke primitive (`SPEC_FULL.md` §10) -
/// returns a pseudo-randomly chosen 0 or 1, nothing more.
fn numberwang_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    use rand::Rng;
    let n: u8 = interp.rng_mut().gen_range(0..2);
    reporter(Ok(Value::number(n as f64)))
}

pub fn register(table: &mut RoutineTable) {
    table.register_primitive("PRINT", 1, print_fn);
    table.register_primitive("PR", 1, print_fn);
    table.register_primitive("SHOW", 1, show_fn);
    table.register_primitive("TYPE", 1, type_fn);
    table.register_primitive("READLIST", 0, readlist_fn);
    table.register_primitive("RL", 0, readlist_fn);
    table.register_primitive("READWORD", 0, readword_fn);
    table.register_primitive("RW", 0, readword_fn);
    table.register_primitive("WAIT", 1, wait_fn);
    table.register_primitive("REPCOUNT", 0, repcount_fn);
    table.register_primitive("#", 0, repcount_fn);
    table.register_primitive("NUMBERWANG", 0, numberwang_fn);
}
