//! The two destructive list mutators, `.SETFIRST`/`.SETBF`. Unlike every
//! other word/list primitive in `packages::words`, these reach through to
//! the actual binding a variable names rather than operating on an
//! already-evaluated copy of it - `MAKE` deep-copies list values on
//! assignment (`spec.md` §3), so a mutation applied to an evaluated
//! argument would only ever touch a throwaway clone.
//!
//! Registered as `NoEval` primitives (`spec.md` §4.3's "Noeval routine")
//! purely to get at the unevaluated first argument's `Expr::VarRef` before
//! it's turned into a `Value` - the same reason `AND`/`OR` are `NoEval`
//! rather than `Normal`, just for a different end.

use crate::engine::{eval_expr, Expr};
use crate::error::LogoError;
use crate::fn_native::{command_async, PrimitiveFut};
use crate::module::RoutineTable;
use crate::value::Value;
use crate::Interpreter;

fn var_name<'a>(expr: &'a Expr) -> Result<&'a str, LogoError> {
    match expr {
        Expr::VarRef(name) => Ok(name),
        other => Err(LogoError::Runtime(format!(
            "{{_PROC_}} needs a variable name as its first input, not {:?}",
            other
        ))),
    }
}

fn replace_first(target: &mut Value, new_first: Value) -> Result<(), LogoError> {
    match target {
        Value::List(items) if !items.is_empty() => {
            items[0] = new_first;
            Ok(())
        }
        other => Err(LogoError::ExpectedList(other.clone())),
    }
}

fn replace_butfirst(target: &mut Value, new_rest: Vec<Value>) -> Result<(), LogoError> {
    match target {
        Value::List(items) if !items.is_empty() => {
            let first = items[0].clone();
            *items = std::iter::once(first).chain(new_rest).collect();
            Ok(())
        }
        other => Err(LogoError::ExpectedList(other.clone())),
    }
}

fn setfirst_fn<'a>(interp: &'a mut Interpreter, args: &'a [Expr]) -> PrimitiveFut<'a> {
    command_async(async move {
        let name = var_name(&args[0])?.to_string();
        let new_first = eval_expr(interp, &args[1]).await?;
        match interp
            .scopes_mut()
            .with_binding_value_mut(&name, |v| replace_first(v, new_first))
        {
            Some(result) => result,
            None => Err(LogoError::UnknownVariable(name)),
        }
    })
}

fn setbf_fn<'a>(interp: &'a mut Interpreter, args: &'a [Expr]) -> PrimitiveFut<'a> {
    command_async(async move {
        let name = var_name(&args[0])?.to_string();
        let new_rest = super::support::elements(&eval_expr(interp, &args[1]).await?)?;
        match interp
            .scopes_mut()
            .with_binding_value_mut(&name, |v| replace_butfirst(v, new_rest))
        {
            Some(result) => result,
            None => Err(LogoError::UnknownVariable(name)),
        }
    })
}

pub fn register(table: &mut RoutineTable) {
    table.register_noeval(".SETFIRST", 2, setfirst_fn);
    table.register_noeval(".SETBF", 2, setbf_fn);
}

#[cfg(test)]
mod tests {
    use crate::value::Value;
    use crate::Interpreter;

    #[test]
    fn setfirst_mutates_the_named_binding_in_place() {
        let mut interp = Interpreter::headless();
        let result = futures::executor::block_on(
            interp.run(r#"make "x [a b c] .setfirst :x "z output :x"#),
        )
        .unwrap();
        assert_eq!(
            result,
            Some(Value::list(vec![
                Value::word("z"),
                Value::word("b"),
                Value::word("c"),
            ]))
        );
    }

    #[test]
    fn setbf_mutates_everything_after_the_first() {
        let mut interp = Interpreter::headless();
        let result = futures::executor::block_on(
            interp.run(r#"make "x [a b c] .setbf :x [y z] output :x"#),
        )
        .unwrap();
        assert_eq!(
            result,
            Some(Value::list(vec![
                Value::word("a"),
                Value::word("y"),
                Value::word("z"),
            ]))
        );
    }

    #[test]
    fn setfirst_on_unbound_name_reports_unknown_variable() {
        let mut interp = Interpreter::headless();
        let result = futures::executor::block_on(interp.run(r#".setfirst :nope "z"#));
        assert!(matches!(result, Err(crate::error::LogoError::UnknownVariable(_))));
    }
}
