//! Array constructors and in-place mutators (`spec.md` §3: arrays are
//! fixed-size, origin-indexed, and reference-shared). `ITEM`/`ARRAYP` for
//! arrays are handled generically in `packages::words`/`packages::predicates`;
//! this module owns what's array-specific: construction, `SETITEM`, and
//! conversion to/from lists.

use super::support::integer;
use crate::error::LogoError;
use crate::fn_native::{command, reporter, PrimitiveFut};
use crate::module::RoutineTable;
use crate::value::Value;
use crate::Interpreter;

fn array_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let size = integer(&args[0])?;
        if size <= 0 {
            return Err(LogoError::NonPositiveArraySize(size));
        }
        let origin = match args.get(1) {
            Some(v) => integer(v)?,
            None => 1,
        };
        Ok(Value::array(vec![Value::empty_list(); size as usize], origin))
    })())
}

fn listtoarray_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let items = super::support::elements(&args[0])?;
        let origin = match args.get(1) {
            Some(v) => integer(v)?,
            None => 1,
        };
        Ok(Value::array(items, origin))
    })())
}

fn arraytolist_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| match &args[0] {
        Value::Array(a) => Ok(Value::list(a.borrow().items.clone())),
        other => Err(LogoError::ExpectedArray(other.clone())),
    })())
}

fn array_origin_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(match &args[0] {
        Value::Array(a) => Ok(Value::number(a.borrow().origin as f64)),
        other => Err(LogoError::ExpectedArray(other.clone())),
    })
}

/// `SETITEM n array value`: in-place mutation (`spec.md` §3: "Unlike
/// lists, arrays are shared by reference"). Rejects an assignment that
/// would make the array contain itself, directly or through a nested
/// structure (`spec.md` §3 invariants, "circular array").
fn setitem_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    command((|| {
        let n = integer(&args[0])?;
        let array = match &args[1] {
            Value::Array(a) => a.clone(),
            other => return Err(LogoError::ExpectedArray(other.clone())),
        };
        let value = args[2].clone();
        if value.contains_array_identity(&array) {
            return Err(LogoError::CircularArray);
        }
        let mut data = array.borrow_mut();
        let idx = data.index_of(n).ok_or(LogoError::IndexOutOfBounds(n))?;
        data.items[idx] = value;
        Ok(())
    })())
}

pub fn register(table: &mut RoutineTable) {
    table.register_primitive("ARRAY", 1, array_fn);
    table.register_primitive("LISTTOARRAY", 1, listtoarray_fn);
    table.register_primitive("ARRAYTOLIST", 1, arraytolist_fn);
    table.register_primitive("ARRAYORIGIN", 1, array_origin_fn);
    table.register_primitive("SETITEM", 3, setitem_fn);
}
