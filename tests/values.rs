//! Black-box value-model coverage: word/number duality, list deep-copy
//! vs array reference-sharing, and the textual rendering rules
//! (`spec.md` §3, §8).

use async_trait::async_trait;
use std::cell::RefCell;
use std::rc::Rc;
use turtlescript_core::interfaces::{NullTurtle, Stream};
use turtlescript_core::value::Value;
use turtlescript_core::Interpreter;

fn run(src: &str) -> Option<Value> {
    let mut interp = Interpreter::headless();
    futures::executor::block_on(interp.run(src)).unwrap()
}

/// A stream that records every write into a handle the test keeps
/// alongside the interpreter, since [`Interpreter::stream`] only exposes
/// `&dyn Stream` and the built-in `NullStream`'s fields aren't reachable
/// through that trait object.
#[derive(Default)]
struct RecordingStream(Rc<RefCell<Vec<String>>>);

#[async_trait(?Send)]
impl Stream for RecordingStream {
    async fn write(&mut self, text: &[&str]) {
        self.0.borrow_mut().push(text.concat());
    }
    async fn read(&mut self, _prompt: Option<&str>) -> Value {
        Value::empty_list()
    }
    fn clear(&mut self) {
        self.0.borrow_mut().clear();
    }
}

#[test]
fn a_numeric_word_compares_equal_to_its_number_form() {
    let result = run(r#"output "5 = 5"#);
    assert_eq!(result, Some(Value::boolean(true)));
}

#[test]
fn word_equality_is_case_insensitive() {
    let result = run(r#"output "Hello = "hello"#);
    assert_eq!(result, Some(Value::boolean(true)));
}

#[test]
fn list_assignment_deep_copies_so_mutation_does_not_alias() {
    let result = run(
        r#"make "a [1 2 3]
           make "b :a
           .setfirst :b "z
           output :a"#,
    );
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
fn array_assignment_shares_identity_so_mutation_is_visible_through_both_names() {
    let result = run(
        r#"make "a array 3
           make "b :a
           setitem 1 :b "hi
           output item 1 :a"#,
    );
    assert_eq!(result, Some(Value::word("hi")));
}

#[test]
fn show_keeps_nested_brackets_but_print_strips_the_outer_pair() {
    let written = Rc::new(RefCell::new(Vec::new()));
    let mut interp = Interpreter::new(
        Box::new(NullTurtle::default()),
        Box::new(RecordingStream(written.clone())),
    );
    futures::executor::block_on(interp.run("print [a b c]")).unwrap();
    futures::executor::block_on(interp.run("show [a b c]")).unwrap();
    assert_eq!(
        *written.borrow(),
        vec!["a b c\n".to_string(), "[a b c]\n".to_string()]
    );
}

#[test]
fn large_integral_numbers_render_without_a_trailing_decimal_point() {
    let result = run("output 2 + 2");
    assert_eq!(result.unwrap().as_text(), "4");
}

#[test]
fn fput_and_lput_build_lists_without_mutating_their_inputs() {
    let result = run(
        r#"make "a [2 3]
           make "b fput 1 :a
           make "c lput 4 :a
           output (list :b :c :a)"#,
    );
    assert_eq!(
        result,
        Some(Value::list(vec![
            Value::list(vec![Value::number(1.0), Value::number(2.0), Value::number(3.0)]),
            Value::list(vec![Value::number(2.0), Value::number(3.0), Value::number(4.0)]),
            Value::list(vec![Value::number(2.0), Value::number(3.0)]),
        ]))
    );
}
