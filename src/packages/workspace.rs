//! Workspace management: `DEFINE`/`ERASE`/`ERALL` over user procedures
//! (`spec.md` §4.4), and the property-list CRUD family `PPROP`/`GPROP`/
//! `REMPROP`/`PLIST` over [`crate::scope::PropertyTable`] (`SPEC_FULL.md`
//! §10's supplemented features).
//!
//! `DEFINE` is `TO`'s data-driven twin: `TO` parses `:input ... END`
//! straight off the live token cursor (`src/fn_call.rs::to_special`),
//! while `DEFINE name [[inputs][instr ...]]` receives the same shape
//! already built as list values and has to re-derive formals/body from
//! them - the same "re-lex a stored list" trick `support::run_list_body`
//! uses for thunk arguments.

use super::support::elements;
use crate::error::LogoError;
use crate::fn_native::{command, reporter, PrimitiveFut};
use crate::module::RoutineTable;
use crate::value::Value;
use crate::Interpreter;

fn define_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    let name = args[0].as_text();
    let result = (|| -> Result<(), LogoError> {
        let spec = elements(&args[1])?;
        if spec.len() != 2 {
            return Err(LogoError::ExpectedListOfLength(args[1].clone(), 2));
        }
        let formals = elements(&spec[0])?
            .into_iter()
            .map(|v| v.as_text())
            .collect::<Vec<_>>();
        let body_lines = elements(&spec[1])?;
        let mut flat = Vec::new();
        for line in &body_lines {
            flat.extend(elements(line)?);
        }
        let body = crate::fn_call::relex_list_value(&Value::list(flat))?;
        crate::fn_call::define_user_procedure(interp, &name, formals, body)
    })();
    command(result)
}

fn erase_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    let result = (|| -> Result<(), LogoError> {
        for name in elements(&args[0])? {
            interp.routines_mut().erase(&name.as_text())?;
        }
        Ok(())
    })();
    command(result)
}

fn erall_fn<'a>(interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    for name in interp.routines().user_names() {
        // Every name here is by construction a user procedure, so erase
        // can't fail; a concurrent primitive registration never happens
        // mid-iteration in this single-threaded interpreter.
        let _ = interp.routines_mut().erase(&name);
    }
    command(Ok(()))
}

fn pprop_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    let plist = args[0].as_text();
    let prop = args[1].as_text();
    interp.plists_mut().put(&plist, &prop, args[2].clone());
    command(Ok(()))
}

fn gprop_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    let plist = args[0].as_text();
    let prop = args[1].as_text();
    let result = interp
        .plists()
        .get(&plist, &prop)
        .cloned()
        .ok_or_else(|| LogoError::UnknownProperty(plist.clone(), prop.clone()));
    reporter(result)
}

fn remprop_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    let plist = args[0].as_text();
    let prop = args[1].as_text();
    interp.plists_mut().remove(&plist, &prop);
    command(Ok(()))
}

fn plist_fn<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    let plist = args[0].as_text();
    let flat = interp
        .plists()
        .plist(&plist)
        .into_iter()
        .flat_map(|(prop, value)| [Value::word(prop.to_lowercase()), value])
        .collect();
    reporter(Ok(Value::list(flat)))
}

pub fn register(table: &mut RoutineTable) {
    table.register_primitive("DEFINE", 2, define_fn);
    table.register_primitive("ERASE", 1, erase_fn);
    table.register_primitive("ERALL", 0, erall_fn);
    table.register_primitive("PPROP", 3, pprop_fn);
    table.register_primitive("GPROP", 2, gprop_fn);
    table.register_primitive("REMPROP", 2, remprop_fn);
    table.register_primitive("PLIST", 1, plist_fn);
}

#[cfg(test)]
mod tests {
    use crate::value::Value;
    use crate::Interpreter;

    #[test]
    fn define_then_call_runs_body() {
        let mut interp = Interpreter::headless();
        let src = r#"define "double [[:n] [output :n + :n]] output double 21"#;
        let result = futures::executor::block_on(interp.run(src)).unwrap();
        assert_eq!(result, Some(Value::number(42.0)));
    }

    #[test]
    fn erase_removes_a_user_procedure() {
        let mut interp = Interpreter::headless();
        futures::executor::block_on(interp.run("to noop end erase [noop]")).unwrap();
        assert!(!interp.routines().is_defined("noop"));
    }

    #[test]
    fn erall_clears_every_user_procedure() {
        let mut interp = Interpreter::headless();
        futures::executor::block_on(interp.run("to a end to b end erall")).unwrap();
        assert!(interp.routines().user_names().is_empty());
    }

    #[test]
    fn pprop_gprop_remprop_round_trip() {
        let mut interp = Interpreter::headless();
        futures::executor::block_on(interp.run(r#"pprop "turtle "color "red"#)).unwrap();
        let got = futures::executor::block_on(interp.run(r#"output gprop "turtle "color"#))
            .unwrap()
            .unwrap();
        assert_eq!(got, Value::word("red"));
        futures::executor::block_on(interp.run(r#"remprop "turtle "color"#)).unwrap();
        let err = futures::executor::block_on(interp.run(r#"output gprop "turtle "color"#));
        assert!(err.is_err());
    }

    #[test]
    fn plist_lists_every_property_pair() {
        let mut interp = Interpreter::headless();
        futures::executor::block_on(interp.run(r#"pprop "turtle "color "red"#)).unwrap();
        let got = futures::executor::block_on(interp.run(r#"output plist "turtle"#))
            .unwrap()
            .unwrap();
        assert_eq!(
            got,
            Value::list(vec![Value::word("color"), Value::word("red")])
        );
    }
}
