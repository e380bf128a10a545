//! Arithmetic reporters (`spec.md` §2.8). The five operators with their
//! own grammar rung (`+ - * / % ^`) already live in `src/engine.rs`'s
//! `eval_binop`; these are their named-procedure equivalents
//! (`SUM`/`DIFFERENCE`/`PRODUCT`/`QUOTIENT`/...), plus the transcendental
//! functions classic Logo exposes as ordinary reporters.
//!
//! `PrimitiveFn` is a plain `fn` pointer (no capture), so every primitive
//! here is a named top-level function rather than a closure - the same
//! shape `rhai`'s packages use (one `pub fn` per registered builtin),
//! just without the `#[rhai_fn]` macro plumbing this crate doesn't need.
//!
//! Natural arity is declared as the common one/two-argument case; called
//! with explicit parens a primitive folds over however many arguments it
//! was actually given, e.g. `(sum 1 2 3 4)`.

use super::support::number;
use crate::error::{LogoError, LogoResult};
use crate::fn_native::{reporter, PrimitiveFut};
use crate::module::RoutineTable;
use crate::value::Value;
use crate::Interpreter;

fn sum<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let mut total = 0.0;
        for a in &args {
            total += number(a)?;
        }
        Ok(Value::number(total))
    })())
}

fn difference<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let a = number(args.first().ok_or(LogoError::UnexpectedEndOfInput)?)?;
        let b = number(args.get(1).ok_or(LogoError::UnexpectedEndOfInput)?)?;
        Ok(Value::number(a - b))
    })())
}

fn minus<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| Ok(Value::number(-number(&args[0])?)))())
}

fn product<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let mut total = 1.0;
        for a in &args {
            total *= number(a)?;
        }
        Ok(Value::number(total))
    })())
}

fn quotient<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        if args.len() == 1 {
            let a = number(&args[0])?;
            if a == 0.0 {
                return Err(LogoError::DivisionByZero);
            }
            return Ok(Value::number(1.0 / a));
        }
        let a = number(&args[0])?;
        let b = number(&args[1])?;
        if b == 0.0 {
            return Err(LogoError::DivisionByZero);
        }
        Ok(Value::number(a / b))
    })())
}

fn remainder<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let a = number(&args[0])?;
        let b = number(&args[1])?;
        if b == 0.0 {
            return Err(LogoError::DivisionByZero);
        }
        Ok(Value::number(a % b))
    })())
}

fn modulo<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        let a = number(&args[0])?;
        let b = number(&args[1])?;
        if b == 0.0 {
            return Err(LogoError::DivisionByZero);
        }
        Ok(Value::number(((a % b) + b) % b))
    })())
}

fn power<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| Ok(Value::number(number(&args[0])?.powf(number(&args[1])?))))())
}

fn arctan<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter((|| {
        if args.len() >= 2 {
            let y = number(&args[0])?;
            let x = number(&args[1])?;
            Ok(Value::number(y.atan2(x).to_degrees()))
        } else {
            Ok(Value::number(number(&args[0])?.atan().to_degrees()))
        }
    })())
}

fn pi<'a>(_interp: &'a mut Interpreter, _args: Vec<Value>) -> PrimitiveFut<'a> {
    reporter(Ok(Value::number(std::f64::consts::PI)))
}

macro_rules! unary_math_fn {
    ($fn_name:ident, $op:expr) => {
        fn $fn_name<'a>(_interp: &'a mut Interpreter, args: Vec<Value>) -> PrimitiveFut<'a> {
            reporter((|| -> LogoResult<Value> { Ok(Value::number($op(number(&args[0])?))) })())
        }
    };
}

unary_math_fn!(sqrt, f64::sqrt);
unary_math_fn!(exp, f64::exp);
unary_math_fn!(log10, f64::log10);
unary_math_fn!(ln, f64::ln);
unary_math_fn!(abs, f64::abs);
unary_math_fn!(round, |n: f64| n.round());
unary_math_fn!(int_fn, |n: f64| n.trunc());
unary_math_fn!(sin_fn, |n: f64| n.to_radians().sin());
unary_math_fn!(cos_fn, |n: f64| n.to_radians().cos());
unary_math_fn!(tan_fn, |n: f64| n.to_radians().tan());
unary_math_fn!(arcsin, |n: f64| n.asin().to_degrees());
unary_math_fn!(arccos, |n: f64| n.acos().to_degrees());

pub fn register(table: &mut RoutineTable) {
    table.register_primitive("SUM", 2, sum);
    table.register_primitive("DIFFERENCE", 2, difference);
    table.register_primitive("MINUS", 1, minus);
    table.register_primitive("PRODUCT", 2, product);
    table.register_primitive("QUOTIENT", 2, quotient);
    table.register_primitive("REMAINDER", 2, remainder);
    table.register_primitive("MODULO", 2, modulo);
    table.register_primitive("POWER", 2, power);
    table.register_primitive("SQRT", 1, sqrt);
    table.register_primitive("EXP", 1, exp);
    table.register_primitive("LOG10", 1, log10);
    table.register_primitive("LN", 1, ln);
    table.register_primitive("ABS", 1, abs);
    table.register_primitive("ROUND", 1, round);
    table.register_primitive("INT", 1, int_fn);
    table.register_primitive("SIN", 1, sin_fn);
    table.register_primitive("COS", 1, cos_fn);
    table.register_primitive("TAN", 1, tan_fn);
    table.register_primitive("ARCSIN", 1, arcsin);
    table.register_primitive("ARCCOS", 1, arccos);
    table.register_primitive("ARCTAN", 1, arctan);
    table.register_primitive("PI", 0, pi);
}

#[cfg(test)]
mod tests {
    use crate::Interpreter;

    fn run(src: &str) -> crate::value::Value {
        let mut interp = Interpreter::headless();
        futures::executor::block_on(interp.run(&format!("output {}", src)))
            .unwrap()
            .unwrap()
    }

    #[test]
    fn sum_folds_over_explicit_arity() {
        assert_eq!(run("(sum 1 2 3 4)"), crate::value::Value::number(10.0));
    }

    #[test]
    fn quotient_single_arg_is_reciprocal() {
        assert_eq!(run("(quotient 4)"), crate::value::Value::number(0.25));
    }

    #[test]
    fn power_matches_caret_operator() {
        assert_eq!(run("power 2 10"), crate::value::Value::number(1024.0));
    }
}
