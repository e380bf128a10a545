//! Variable-binding primitives (`spec.md` §4.5) and the sidecar flags
//! `BindingFlags` tracks on a [`crate::scope::Binding`] - `BURY`/`TRACE`/
//! `STEP` apply only to variables in this core (procedure-level
//! bury/trace/step is out of scope here; see `DESIGN.md`).

use crate::error::LogoError;
use crate::fn_native::{command, reporter, PrimitiveFut};
use crate::module::RoutineTable;
use crate::value::Value;
use crate::Interpreter;

fn make_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    let name = args[0].as_text();
    interp.scopes_mut().make(&name, args[1].clone());
    command(Ok(()))
}

fn local_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    interp.scopes_mut().local(&args[0].as_text());
    command(Ok(()))
}

fn localmake_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    let name = args[0].as_text();
    interp.scopes_mut().local_make(&name, args[1].clone());
    command(Ok(()))
}

fn global_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    interp.scopes_mut().global(&args[0].as_text());
    command(Ok(()))
}

fn thing_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    let name = args[0].as_text();
    reporter(
        interp
            .scopes()
            .lookup(&name)
            .and_then(|b| b.value.clone())
            .ok_or(LogoError::UnknownVariable(name)),
    )
}

fn erase_name_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    interp.scopes_mut().erase(&args[0].as_text());
    command(Ok(()))
}

fn erase_names_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command((|| {
        for v in super::support::elements(&args[0])? {
            interp.scopes_mut().erase(&v.as_text());
        }
        Ok(())
    })())
}

fn bury_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    interp.scopes_mut().set_flag(&args[0].as_text(), |f| f.buried = true);
    command(Ok(()))
}

fn unbury_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    interp.scopes_mut().set_flag(&args[0].as_text(), |f| f.buried = false);
    command(Ok(()))
}

fn buriedp_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    let buried = interp
        .scopes()
        .flags(&args[0].as_text())
        .map(|f| f.buried)
        .unwrap_or(false);
    reporter(Ok(Value::boolean(buried)))
}

fn trace_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    interp.scopes_mut().set_flag(&args[0].as_text(), |f| f.traced = true);
    command(Ok(()))
}

fn untrace_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    interp.scopes_mut().set_flag(&args[0].as_text(), |f| f.traced = false);
    command(Ok(()))
}

fn step_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    interp.scopes_mut().set_flag(&args[0].as_text(), |f| f.stepped = true);
    command(Ok(()))
}

fn unstep_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    interp.scopes_mut().set_flag(&args[0].as_text(), |f| f.stepped = false);
    command(Ok(()))
}

pub fn register(table: &mut RoutineTable) {
    table.register_primitive("MAKE", 2, make_fn);
    table.register_primitive("LOCAL", 1, local_fn);
    table.register_primitive("LOCALMAKE", 2, localmake_fn);
    table.register_primitive("GLOBAL", 1, global_fn);
    table.register_primitive("THING", 1, thing_fn);
    table.register_primitive("ERN", 1, erase_name_fn);
    table.register_primitive("ERNS", 1, erase_names_fn);
    table.register_primitive("BURY", 1, bury_fn);
    table.register_primitive("UNBURY", 1, unbury_fn);
    table.register_primitive("BURIEDP", 1, buriedp_fn);
    table.register_primitive("TRACE", 1, trace_fn);
    table.register_primitive("UNTRACE", 1, untrace_fn);
    table.register_primitive("STEP", 1, step_fn);
    table.register_primitive("UNSTEP", 1, unstep_fn);
}

#[cfg(test)]
mod tests {
    use crate::value::Value;
    use crate::Interpreter;

    #[test]
    fn make_then_thing_round_trips() {
        let mut interp = Interpreter::headless();
        let result = futures::executor::block_on(
            interp.run("make \"x 42  output thing \"x"),
        );
        assert_eq!(result.unwrap(), Some(Value::number(42.0)));
    }

    #[test]
    fn thing_on_unbound_name_errors() {
        let mut interp = Interpreter::headless();
        let result = futures::executor::block_on(interp.run("output thing \"nope"));
        assert!(matches!(result, Err(crate::error::LogoError::UnknownVariable(_))));
    }

    #[test]
    fn bury_marks_binding() {
        let mut interp = Interpreter::headless();
        let result = futures::executor::block_on(
            interp.run("make \"x 1  bury \"x  output buriedp \"x"),
        );
        assert_eq!(result.unwrap(), Some(Value::boolean(true)));
    }
}
