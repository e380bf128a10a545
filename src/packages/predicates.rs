//! Type and comparison predicates (`spec.md` §2.8). All reporters,
//! output `"true"`/`"false"` words via [`Value::boolean`].

use super::support::{count_of, number};
use crate::fn_native::{reporter, PrimitiveFut};
use crate::module::RoutineTable;
use crate::value::Value;
use crate::Interpreter;

fn numberp<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::boolean(args[0].is_number())))
}

fn wordp<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::boolean(args[0].is_word())))
}

fn listp<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::boolean(args[0].is_list())))
}

fn arrayp<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::boolean(args[0].is_array())))
}

fn emptyp<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(super::support::is_empty(&args[0]).map(Value::boolean))
}

fn equalp<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::boolean(args[0] == args[1])))
}

fn notequalp<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::boolean(args[0] != args[1])))
}

fn zerop<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(number(&args[0]).map(|n| Value::boolean(n == 0.0)))
}

fn greaterp<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| Ok(Value::boolean(number(&args[0])? > number(&args[1])?)))())
}

fn lessp<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| Ok(Value::boolean(number(&args[0])? < number(&args[1])?)))())
}

fn greaterequalp<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| Ok(Value::boolean(number(&args[0])? >= number(&args[1])?)))())
}

fn lessequalp<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| Ok(Value::boolean(number(&args[0])? <= number(&args[1])?)))())
}

fn beforep<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::boolean(args[0].as_text() < args[1].as_text())))
}

fn substringp<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::boolean(args[1].as_text().contains(&args[0].as_text()))))
}

fn memberp<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let needle = &args[0];
        let haystack = super::support::elements(&args[1])?;
        Ok(Value::boolean(haystack.iter().any(|v| v == needle)))
    })())
}

fn namep<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::boolean(interp.scopes().is_defined(&args[0].as_text()))))
}

fn procedurep<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::boolean(interp.routines().is_defined(&args[0].as_text()))))
}

fn primitivep<'a>(interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    let name = args[0].as_text();
    let is_primitive = interp
        .routines()
        .get(&name)
        .map(|r| !r.is_user())
        .unwrap_or(false);
    reporter(Ok(Value::boolean(is_primitive)))
}

fn count_primitive<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(count_of(&args[0]).map(|n| Value::number(n as f64)))
}

pub fn register(table: &mut RoutineTable) {
    table.register_primitive("NUMBERP", 1, numberp);
    table.register_primitive("WORDP", 1, wordp);
    table.register_primitive("LISTP", 1, listp);
    table.register_primitive("ARRAYP", 1, arrayp);
    table.register_primitive("EMPTYP", 1, emptyp);
    table.register_primitive("EQUALP", 2, equalp);
    table.register_primitive("NOTEQUALP", 2, notequalp);
    table.register_primitive("ZEROP", 1, zerop);
    table.register_primitive("GREATERP", 2, greaterp);
    table.register_primitive("LESSP", 2, lessp);
    table.register_primitive("GREATEREQUALP", 2, greaterequalp);
    table.register_primitive("LESSEQUALP", 2, lessequalp);
    table.register_primitive("BEFOREP", 2, beforep);
    table.register_primitive("SUBSTRINGP", 2, substringp);
    table.register_primitive("MEMBERP", 2, memberp);
    table.register_primitive("NAMEP", 1, namep);
    table.register_primitive("PROCEDUREP", 1, procedurep);
    table.register_primitive("PRIMITIVEP", 1, primitivep);
    table.register_primitive("COUNT", 1, count_primitive);
}
