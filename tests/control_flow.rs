//! Black-box control-flow coverage beyond what `src/packages/control.rs`'s
//! own unit tests already exercise: `STOP`/`OUTPUT`/`BYE` as non-local
//! signals that unwind to the nearest procedure boundary, `CASE`, and the
//! `REPEAT`/`FOREVER` + `REPCOUNT` interaction (`spec.md` §4.6, §8).

use turtlescript_core::error::LogoError;
use turtlescript_core::value::Value;
use turtlescript_core::Interpreter;

fn run(src: &str) -> Result<Option<Value>, LogoError> {
    let mut interp = Interpreter::headless();
    futures::executor::block_on(interp.run(src))
}

#[test]
fn stop_exits_a_procedure_without_a_value() {
    let mut interp = Interpreter::headless();
    futures::executor::block_on(interp.run(
        r#"to f
             make "hit "true
             stop
             make "hit "false
           end
           f"#,
    ))
    .unwrap();
    assert_eq!(
        interp.scopes().lookup("hit").and_then(|b| b.value.clone()),
        Some(Value::word("true"))
    );
}

#[test]
fn output_unwinds_through_nested_control_structures_to_the_calling_procedure() {
    let result = run(
        r#"to find.first.even :items
             if emptyp :items [output "none]
             if (modulo first :items 2) = 0 [output first :items]
             output find.first.even butfirst :items
           end
           output find.first.even [1 3 4 5]"#,
    )
    .unwrap();
    assert_eq!(result, Some(Value::number(4.0)));
}

#[test]
fn bye_at_top_level_terminates_the_run_silently_rather_than_erroring() {
    let result = run("make \"x 1  bye  make \"x 2");
    assert_eq!(result.unwrap(), None);
}

#[test]
fn bye_inside_a_procedure_still_unwinds_to_the_top_level() {
    let mut interp = Interpreter::headless();
    let result = futures::executor::block_on(interp.run(
        r#"to f  make "hit "true  bye  end
           f
           make "after "true"#,
    ));
    assert_eq!(result.unwrap(), None);
    assert_eq!(
        interp.scopes().lookup("hit").and_then(|b| b.value.clone()),
        Some(Value::word("true"))
    );
    assert!(interp.scopes().lookup("after").is_none());
}

#[test]
fn case_runs_the_first_matching_clause_and_falls_back_to_else() {
    let result = run(
        r#"output case 2 [[[1] "one] [[2 3] "two-or-three] [else "other]]"#,
    )
    .unwrap();
    assert_eq!(result, Some(Value::word("two-or-three")));

    let result = run(
        r#"output case 99 [[[1] "one] [[2 3] "two-or-three] [else "other]]"#,
    )
    .unwrap();
    assert_eq!(result, Some(Value::word("other")));
}

#[test]
fn repcount_is_minus_one_outside_any_loop_and_tracks_the_innermost_repeat() {
    let result = run(
        r#"make "log []
           repeat 3 [make "log lput repcount :log]
           output :log"#,
    )
    .unwrap();
    assert_eq!(
        result,
        Some(Value::list(vec![
            Value::number(1.0),
            Value::number(2.0),
            Value::number(3.0),
        ]))
    );
}

#[test]
fn nested_repeat_tracks_repcount_of_the_innermost_loop_only() {
    let result = run(
        r#"make "log []
           repeat 2 [repeat 2 [make "log lput repcount :log]]
           output :log"#,
    )
    .unwrap();
    assert_eq!(
        result,
        Some(Value::list(vec![
            Value::number(1.0),
            Value::number(2.0),
            Value::number(1.0),
            Value::number(2.0),
        ]))
    );
}

#[test]
fn do_while_runs_the_body_at_least_once_even_if_the_condition_is_already_false() {
    let result = run(
        r#"make "n 10
           do.while [make "n :n + 1] [:n < 0]
           output :n"#,
    )
    .unwrap();
    assert_eq!(result, Some(Value::number(11.0)));
}

#[test]
fn for_loop_counts_down_when_the_limit_is_below_the_start() {
    let result = run(
        r#"make "log []
           for [i 3 1] [make "log lput :i :log]
           output :log"#,
    )
    .unwrap();
    assert_eq!(
        result,
        Some(Value::list(vec![
            Value::number(3.0),
            Value::number(2.0),
            Value::number(1.0),
        ]))
    );
}
