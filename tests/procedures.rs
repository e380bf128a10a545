//! Black-box user-procedure coverage (`spec.md` §4.4, §8): `TO`/`END`
//! definition, missing-argument tolerance, the textual round-trip via
//! `DEFINE`/[`turtlescript_core::module::RoutineTable::definition_text`],
//! and `DEFINE`'s data-driven twin of `TO`.

use turtlescript_core::value::Value;
use turtlescript_core::Interpreter;

fn run(src: &str) -> Option<Value> {
    let mut interp = Interpreter::headless();
    futures::executor::block_on(interp.run(src)).unwrap()
}

#[test]
fn a_defined_procedure_with_no_formals_just_runs_its_body() {
    let mut interp = Interpreter::headless();
    futures::executor::block_on(interp.run(
        r#"to greet
             make "greeting "hello
           end
           greet"#,
    ))
    .unwrap();
    assert_eq!(
        interp.scopes().lookup("greeting").and_then(|b| b.value.clone()),
        Some(Value::word("hello"))
    );
}

#[test]
fn a_call_with_fewer_arguments_than_formals_leaves_the_rest_unbound() {
    // spec.md §4.4: a missing actual argument just leaves its formal
    // unbound rather than raising an arity error; only an attempt to
    // read the unbound formal fails.
    let mut interp = Interpreter::headless();
    futures::executor::block_on(interp.run("to f :a :b  make \"got :a  end")).unwrap();
    assert!(futures::executor::block_on(interp.run("(f 1)")).is_ok());
    assert_eq!(
        interp.scopes().lookup("got").and_then(|b| b.value.clone()),
        Some(Value::number(1.0))
    );

    let result = futures::executor::block_on(interp.run("to g :a :b  output :b  end  (g 1)"));
    assert!(matches!(
        result,
        Err(turtlescript_core::error::LogoError::UnknownVariable(_))
    ));
}

#[test]
fn output_from_a_procedure_becomes_the_calls_value() {
    let result = run("to sq :n  output :n * :n  end  output sq 7");
    assert_eq!(result, Some(Value::number(49.0)));
}

#[test]
fn falling_off_the_end_of_a_procedure_without_output_or_stop_is_a_no_value_command() {
    let mut interp = Interpreter::headless();
    let result = futures::executor::block_on(interp.run("to f  make \"x 1  end  f")).unwrap();
    assert_eq!(result, None);
}

#[test]
fn procedures_table_reports_user_defined_procedures_by_name() {
    let mut interp = Interpreter::headless();
    futures::executor::block_on(interp.run("to sq :n  output :n * :n  end")).unwrap();
    assert!(interp.routines().is_defined("sq"));
    assert!(interp.routines().user_names().contains(&"SQ".to_string()));
    assert!(!interp.routines().is_defined("nonesuch"));
}

#[test]
fn definition_text_round_trips_a_procedures_source() {
    let mut interp = Interpreter::headless();
    futures::executor::block_on(interp.run("to sq :n  output :n * :n  end")).unwrap();
    let text = interp.routines().definition_text("sq").unwrap();
    assert!(text.starts_with("to sq :n\n"));
    assert!(text.trim_end().ends_with("end"));
    assert!(text.contains("output :n * :n"));
}

#[test]
fn define_and_to_produce_procedures_that_call_each_other_interchangeably() {
    let result = run(
        r#"to via.to :n  output :n + 1  end
           define "via.define [[:n] [output via.to :n]]
           output via.define 41"#,
    );
    assert_eq!(result, Some(Value::number(42.0)));
}

#[test]
fn recursion_through_a_shared_helper_procedure_works() {
    let result = run(
        r#"to is.even :n
             if :n = 0 [output "true]
             output is.odd :n - 1
           end
           to is.odd :n
             if :n = 0 [output "false]
             output is.even :n - 1
           end
           output is.even 10"#,
    );
    assert_eq!(result, Some(Value::word("true")));
}
