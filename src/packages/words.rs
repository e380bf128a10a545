//! Word/list selectors and constructors shared across both value shapes
//! (`spec.md` §3: a word is also addressable as a sequence of
//! characters). `COUNT`/`EMPTYP`/`MEMBERP` live in `packages::predicates`
//! since they're predicates/reporters of the same family but grouped
//! there by shape of output rather than shape of input.

use super::support::{butfirst, butlast, first, item_at, last};
use crate::error::LogoError;
use crate::fn_native::{reporter, PrimitiveFut};
use crate::module::RoutineTable;
use crate::value::Value;
use crate::Interpreter;

fn first_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(first(&args[0]))
}

fn last_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(last(&args[0]))
}

fn butfirst_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(butfirst(&args[0]))
}

fn butlast_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(butlast(&args[0]))
}

fn item_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let n = super::support::integer(&args[0])?;
        item_at(&args[1], n)
    })())
}

fn reverse_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let mut items = super::support::elements(&args[0])?;
        items.reverse();
        Ok(super::support::rebuild_like(&args[0], items))
    })())
}

fn word_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::word(
        args.iter().map(|v| v.as_text()).collect::<String>(),
    )))
}

/// `LIST a b ...`: builds a list with each argument as one element,
/// without flattening nested lists (unlike `SENTENCE`).
fn list_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::list(args)))
}

/// `SENTENCE a b ...` (`SE`): like `LIST`, but a list argument is
/// spliced in rather than nested.
fn sentence_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::list(
        args.into_iter()
            .flat_map(|v| match v {
                Value::List(items) => items,
                other => vec![other],
            })
            .collect(),
    )))
}

fn fput_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let mut items = super::support::elements(&args[1])?;
        items.insert(0, args[0].clone());
        Ok(super::support::rebuild_like(&args[1], items))
    })())
}

fn lput_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let mut items = super::support::elements(&args[1])?;
        items.push(args[0].clone());
        Ok(super::support::rebuild_like(&args[1], items))
    })())
}

fn combine_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    // `COMBINE a b`: `FPUT`-like when `b` is a word and `a` is a word
    // (concatenates), otherwise behaves like `SENTENCE a b` - the two
    // shapes classic Logo's `COMBINE` folds together.
    reporter((|| {
        match (&args[0], &args[1]) {
            (Value::Word(_), Value::Word(_)) => {
                Ok(Value::word(format!("{}{}", args[0].as_text(), args[1].as_text())))
            }
            _ => {
                let mut items = super::support::elements(&args[1])?;
                items.insert(0, args[0].clone());
                Ok(Value::list(items))
            }
        }
    })())
}

fn member_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let items = super::support::elements(&args[1])?;
        match items.iter().position(|v| *v == args[0]) {
            Some(idx) => Ok(super::support::rebuild_like(&args[1], items[idx..].to_vec())),
            None => Ok(super::support::rebuild_like(&args[1], Vec::new())),
        }
    })())
}

fn uppercase_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::word(args[0].as_text().to_uppercase())))
}

fn lowercase_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::word(args[0].as_text().to_lowercase())))
}

fn ascii_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let text = args[0].as_text();
        let c = text.chars().next().ok_or_else(|| LogoError::ExpectedString(args[0].clone()))?;
        Ok(Value::number(c as u32 as f64))
    })())
}

fn char_fn<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let code = super::support::integer(&args[0])?;
        let c = char::from_u32(code as u32).ok_or_else(|| LogoError::ExpectedNumber(args[0].clone()))?;
        Ok(Value::word(c.to_string()))
    })())
}

pub fn register(table: &mut RoutineTable) {
    table.register_primitive("FIRST", 1, first_fn);
    table.register_primitive("LAST", 1, last_fn);
    table.register_primitive("BUTFIRST", 1, butfirst_fn);
    table.register_primitive("BF", 1, butfirst_fn);
    table.register_primitive("BUTLAST", 1, butlast_fn);
    table.register_primitive("BL", 1, butlast_fn);
    table.register_primitive("ITEM", 2, item_fn);
    table.register_primitive("REVERSE", 1, reverse_fn);
    table.register_primitive("WORD", 2, word_fn);
    table.register_primitive("LIST", 2, list_fn);
    table.register_primitive("SENTENCE", 2, sentence_fn);
    table.register_primitive("SE", 2, sentence_fn);
    table.register_primitive("FPUT", 2, fput_fn);
    table.register_primitive("LPUT", 2, lput_fn);
    table.register_primitive("COMBINE", 2, combine_fn);
    table.register_primitive("MEMBER", 2, member_fn);
    table.register_primitive("UPPERCASE", 1, uppercase_fn);
    table.register_primitive("LOWERCASE", 1, lowercase_fn);
    table.register_primitive("ASCII", 1, ascii_fn);
    table.register_primitive("CHAR", 1, char_fn);
}
