//! Small extraction helpers shared by every primitive family. Not a
//! module `rhai` itself needs (its `Dynamic` casts do this job), but the
//! same kind of glue any tree-walking interpreter's builtin library
//! collects once the primitive count grows past a couple dozen.

use crate::ast::Atom;
use crate::engine::{eval_expr, parse_expr, Cursor};
use crate::error::{LogoError, LogoResult};
use crate::value::Value;
use crate::Interpreter;

pub fn number(v: &Value) -> LogoResult<f64> {
    v.as_number().ok_or_else(|| LogoError::ExpectedNumber(v.clone()))
}

pub fn boolean(v: &Value) -> LogoResult<bool> {
    v.as_bool().ok_or_else(|| LogoError::ExpectedNumber(v.clone()))
}

pub fn integer(v: &Value) -> LogoResult<i64> {
    Ok(number(v)?.round() as i64)
}

/// `FIRST`/`LAST`/`BUTFIRST`/`BUTLAST`/`ITEM`/`COUNT` all treat a word as
/// a sequence of one-character words (`spec.md` §9's primitive catalogue
/// implies this the same way every classic Logo does); a list is just
/// its elements. Arrays are out of scope for these - they have their own
/// `ITEM`/`SETITEM` in `packages::arrays`.
pub fn elements(v: &Value) -> LogoResult<Vec<Value>> {
    match v {
        Value::Word(w) => Ok(w.text().chars().map(|c| Value::word(c.to_string())).collect()),
        Value::List(items) => Ok(items.clone()),
        Value::Array(_) => Err(LogoError::ExpectedList(v.clone())),
    }
}

/// Rebuilds a value of the same shape as `like` from `items` - a word
/// stays a word (characters concatenated back into text), a list stays
/// a list.
pub fn rebuild_like(like: &Value, items: Vec<Value>) -> Value {
    match like {
        Value::Word(_) => Value::word(items.iter().map(|v| v.as_text()).collect::<String>()),
        _ => Value::list(items),
    }
}

pub fn first(v: &Value) -> LogoResult<Value> {
    elements(v)?.into_iter().next().ok_or_else(|| LogoError::ExpectedList(v.clone()))
}

pub fn last(v: &Value) -> LogoResult<Value> {
    elements(v)?.into_iter().last().ok_or_else(|| LogoError::ExpectedList(v.clone()))
}

pub fn butfirst(v: &Value) -> LogoResult<Value> {
    let mut items = elements(v)?;
    if items.is_empty() {
        return Err(LogoError::ExpectedList(v.clone()));
    }
    items.remove(0);
    Ok(rebuild_like(v, items))
}

pub fn butlast(v: &Value) -> LogoResult<Value> {
    let mut items = elements(v)?;
    if items.is_empty() {
        return Err(LogoError::ExpectedList(v.clone()));
    }
    items.pop();
    Ok(rebuild_like(v, items))
}

pub fn count_of(v: &Value) -> LogoResult<i64> {
    match v {
        Value::Array(a) => Ok(a.borrow().items.len() as i64),
        other => Ok(elements(other)?.len() as i64),
    }
}

pub fn is_empty(v: &Value) -> LogoResult<bool> {
    Ok(count_of(v)? == 0)
}

/// `ITEM n thing` (1-based for words/lists, origin-based for arrays).
pub fn item_at(v: &Value, n: i64) -> LogoResult<Value> {
    match v {
        Value::Array(a) => {
            let a = a.borrow();
            a.index_of(n)
                .map(|i| a.items[i].clone())
                .ok_or(LogoError::IndexOutOfBounds(n))
        }
        other => {
            let items = elements(other)?;
            let idx = n - 1;
            if idx < 0 || idx as usize >= items.len() {
                Err(LogoError::IndexOutOfBounds(n))
            } else {
                Ok(items[idx as usize].clone())
            }
        }
    }
}

/// Re-tokenizes a stored list-of-words `Value` and parses+evaluates it
/// as a single expression - the "if the thunk returns a list, it is
/// re-parsed and evaluated as an expression" rule shared by `IF`,
/// `WHILE`/`UNTIL`, and friends (`spec.md` §4.6).
pub async fn eval_condition(interp: &mut Interpreter, v: Value) -> LogoResult<bool> {
    match v {
        Value::List(_) => {
            let atoms = crate::fn_call::relex_list_value(&v)?;
            let mut cur = Cursor::new(&atoms);
            let expr = parse_expr(interp, &mut cur)?;
            let result = eval_expr(interp, &expr).await?;
            boolean(&result)
        }
        other => boolean(&other),
    }
}

/// Runs a stored list-of-words `Value` as an ordinary command sequence
/// (no value expected unless `return_result`), re-tokenizing it first
/// since list contents are bare words, not an already-parsed `Expr` tree
/// (`spec.md` §4.4).
pub async fn run_list_body(
    interp: &mut Interpreter,
    v: &Value,
    return_result: bool,
) -> LogoResult<Option<Value>> {
    let atoms: Vec<Atom> = match v {
        Value::List(_) => crate::fn_call::relex_list_value(v)?,
        _ => return Err(LogoError::ExpectedList(v.clone())),
    };
    crate::driver::run_sequence(interp, &atoms, return_result).await
}
