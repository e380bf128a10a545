//! Black-box dynamic-scoping coverage (`spec.md` §3, §4.5, §8): `MAKE`
//! falling through to the nearest existing binding or else creating a
//! global, `LOCAL` shadowing within one procedure activation, and the
//! "caller's variables are visible to the callee" dynamic-scope scenario
//! `spec.md` §8 names explicitly.

use turtlescript_core::value::Value;
use turtlescript_core::Interpreter;

fn run(src: &str) -> Option<Value> {
    let mut interp = Interpreter::headless();
    futures::executor::block_on(interp.run(src)).unwrap()
}

#[test]
fn make_with_no_existing_binding_creates_a_global() {
    let mut interp = Interpreter::headless();
    futures::executor::block_on(interp.run(r#"make "x 1"#)).unwrap();
    assert_eq!(
        interp.scopes().lookup("x").and_then(|b| b.value.clone()),
        Some(Value::number(1.0))
    );
}

#[test]
fn local_shadows_a_global_of_the_same_name_only_within_the_call() {
    let result = run(
        r#"make "x 1
           to f  local "x  make "x 2  output :x  end
           output (list f :x)"#,
    );
    assert_eq!(
        result,
        Some(Value::list(vec![Value::number(2.0), Value::number(1.0)]))
    );
}

#[test]
fn dynamic_scope_lets_a_callee_see_a_caller_local_of_the_same_name() {
    // spec.md §8: make "x 5 to f output :x end to g local "x make "x 9
    // output f end pr g -> 9, since f's unqualified reference to :x
    // resolves dynamically to g's local, not to the global set up
    // beforehand.
    let result = run(
        r#"make "x 5
           to f  output :x  end
           to g  local "x  make "x 9  output f  end
           output g"#,
    );
    assert_eq!(result, Some(Value::number(9.0)));
}

#[test]
fn a_procedures_formal_parameters_are_local_to_its_own_call() {
    let result = run(
        r#"to f :n  output :n * 2  end
           make "n 100
           output (list f 3 :n)"#,
    );
    assert_eq!(
        result,
        Some(Value::list(vec![Value::number(6.0), Value::number(100.0)]))
    );
}

#[test]
fn global_forces_a_name_to_resolve_to_the_outermost_frame_from_then_on() {
    let result = run(
        r#"to f
             global "x
             make "x 42
           end
           f
           output :x"#,
    );
    assert_eq!(result, Some(Value::number(42.0)));
}

#[test]
fn thing_reports_unknown_variable_for_a_name_nothing_ever_bound() {
    let mut interp = Interpreter::headless();
    let result = futures::executor::block_on(interp.run(r#"output thing "nope"#));
    assert!(matches!(
        result,
        Err(turtlescript_core::error::LogoError::UnknownVariable(_))
    ));
}

#[test]
fn recursive_calls_each_get_their_own_formal_binding() {
    let result = run(
        r#"to count.down :n
             if :n = 0 [output 0]
             output 1 + count.down :n - 1
           end
           output count.down 5"#,
    );
    assert_eq!(result, Some(Value::number(5.0)));
}
