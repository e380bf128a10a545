//! End-to-end scenarios from `spec.md` §8, asserted against the turtle
//! call log and/or stream output of test-double `Turtle`/`Stream`
//! implementations rather than against `NullTurtle`'s internal state,
//! so a scenario's exact sequence of backend calls - not just the final
//! pose - is part of what each test pins down.

use async_trait::async_trait;
use std::cell::RefCell;
use std::rc::Rc;
use turtlescript_core::interfaces::{PenMode, Stream, Turtle, TurtleMode};
use turtlescript_core::value::Value;
use turtlescript_core::Interpreter;

/// Records every call made through the `Turtle` trait as a short tag,
/// the way a host's replay/debug log would, without tracking any
/// simulated pose itself - the scenarios below only care about what the
/// interpreter asked the backend to do.
#[derive(Default)]
struct LoggingTurtle {
    log: Rc<RefCell<Vec<String>>>,
}

#[async_trait(?Send)]
impl Turtle for LoggingTurtle {
    async fn move_by(&mut self, distance: f64) {
        self.log.borrow_mut().push(format!("move({})", distance));
    }
    async fn turn(&mut self, degrees: f64) {
        self.log.borrow_mut().push(format!("turn({})", degrees));
    }
    async fn set_position(&mut self, x: Option<f64>, y: Option<f64>) {
        self.log.borrow_mut().push(format!("setpos({:?}, {:?})", x, y));
    }
    async fn set_heading(&mut self, degrees: f64) {
        self.log.borrow_mut().push(format!("setheading({})", degrees));
    }
    async fn home(&mut self) {
        self.log.borrow_mut().push("home()".to_string());
    }
    async fn arc(&mut self, angle: f64, radius: f64) {
        self.log.borrow_mut().push(format!("arc({}, {})", angle, radius));
    }
    fn get_xy(&self) -> (f64, f64) {
        (0.0, 0.0)
    }
    fn get_heading(&self) -> f64 {
        0.0
    }
    fn towards(&self, _x: f64, _y: f64) -> f64 {
        0.0
    }
    async fn set_visible(&mut self, visible: bool) {
        self.log.borrow_mut().push(format!("setvisible({})", visible));
    }
    fn is_visible(&self) -> bool {
        true
    }
    async fn clear(&mut self) {
        self.log.borrow_mut().push("clear()".to_string());
    }
    async fn clear_screen(&mut self) {
        self.log.borrow_mut().push("clearscreen()".to_string());
    }
    async fn set_turtle_mode(&mut self, _mode: TurtleMode) {}
    fn get_turtle_mode(&self) -> TurtleMode {
        TurtleMode::Wrap
    }
    async fn fill(&mut self) {}
    async fn begin_path(&mut self) {}
    async fn fill_path(&mut self, _color: Value) {}
    async fn draw_text(&mut self, _text: &str) {}
    async fn set_font_size(&mut self, _size: f64) {}
    fn get_font_size(&self) -> f64 {
        14.0
    }
    async fn set_font_name(&mut self, _name: &str) {}
    fn get_font_name(&self) -> String {
        String::new()
    }
    async fn set_pen_down(&mut self, _down: bool) {}
    fn is_pen_down(&self) -> bool {
        true
    }
    async fn set_pen_mode(&mut self, _mode: PenMode) {}
    fn get_pen_mode(&self) -> PenMode {
        PenMode::Paint
    }
    async fn set_color(&mut self, _color: Value) {}
    fn get_color(&self) -> Value {
        Value::word("black")
    }
    async fn set_bg_color(&mut self, _color: Value) {}
    fn get_bg_color(&self) -> Value {
        Value::word("white")
    }
    async fn set_width(&mut self, _width: f64) {}
    fn get_width(&self) -> f64 {
        1.0
    }
    async fn set_scrunch(&mut self, _x: f64, _y: f64) {}
    fn get_scrunch(&self) -> (f64, f64) {
        (1.0, 1.0)
    }
}

#[derive(Default)]
struct RecordingStream {
    written: Rc<RefCell<Vec<String>>>,
}

#[async_trait(?Send)]
impl Stream for RecordingStream {
    async fn write(&mut self, text: &[&str]) {
        self.written.borrow_mut().push(text.concat());
    }
    async fn read(&mut self, _prompt: Option<&str>) -> Value {
        Value::empty_list()
    }
    fn clear(&mut self) {
        self.written.borrow_mut().clear();
    }
}

fn harness() -> (Interpreter, Rc<RefCell<Vec<String>>>, Rc<RefCell<Vec<String>>>) {
    let turtle_log = Rc::new(RefCell::new(Vec::new()));
    let stream_log = Rc::new(RefCell::new(Vec::new()));
    let interp = Interpreter::new(
        Box::new(LoggingTurtle { log: turtle_log.clone() }),
        Box::new(RecordingStream { written: stream_log.clone() }),
    );
    (interp, turtle_log, stream_log)
}

#[test]
fn repeat_drives_the_turtle_through_four_forward_right_pairs() {
    let (mut interp, turtle_log, _stream) = harness();
    futures::executor::block_on(interp.run("repeat 4 [fd 50 rt 90]")).unwrap();
    assert_eq!(
        *turtle_log.borrow(),
        vec![
            "move(50)".to_string(),
            "turn(90)".to_string(),
            "move(50)".to_string(),
            "turn(90)".to_string(),
            "move(50)".to_string(),
            "turn(90)".to_string(),
            "move(50)".to_string(),
            "turn(90)".to_string(),
        ]
    );
}

#[test]
fn a_square_drawing_procedure_issues_the_same_call_sequence_as_inlined_repeat() {
    let (mut interp, turtle_log, _stream) = harness();
    futures::executor::block_on(
        interp.run("to sq :n  repeat 4 [fd :n rt 90]  end  sq 10"),
    )
    .unwrap();
    assert_eq!(
        *turtle_log.borrow(),
        vec![
            "move(10)".to_string(),
            "turn(90)".to_string(),
            "move(10)".to_string(),
            "turn(90)".to_string(),
            "move(10)".to_string(),
            "turn(90)".to_string(),
            "move(10)".to_string(),
            "turn(90)".to_string(),
        ]
    );
}

#[test]
fn factorial_recursion_reports_the_expected_value() {
    let (mut interp, _turtle, _stream) = harness();
    let result = futures::executor::block_on(interp.run(
        "to fact :n  if :n < 2 [output 1]  output :n * fact :n - 1  end  output fact 5",
    ))
    .unwrap();
    assert_eq!(result, Some(Value::number(120.0)));
}

#[test]
fn dynamic_scope_lets_a_callee_see_a_caller_established_local() {
    let (mut interp, _turtle, stream) = harness();
    futures::executor::block_on(interp.run(
        r#"make "x 5
           to f  output :x  end
           to g  local "x  make "x 9  output f  end
           pr g"#,
    ))
    .unwrap();
    assert_eq!(*stream.borrow(), vec!["9\n".to_string()]);
}

#[test]
fn home_and_clearscreen_reach_the_backend_in_the_order_issued() {
    let (mut interp, turtle_log, _stream) = harness();
    futures::executor::block_on(interp.run("fd 100 home cs")).unwrap();
    assert_eq!(
        *turtle_log.borrow(),
        vec![
            "move(100)".to_string(),
            "home()".to_string(),
            "clearscreen()".to_string(),
        ]
    );
}

#[test]
fn a_spiral_built_from_for_issues_growing_forward_distances() {
    let (mut interp, turtle_log, _stream) = harness();
    futures::executor::block_on(
        interp.run("for [i 1 3] [fd :i * 10 rt 90]"),
    )
    .unwrap();
    assert_eq!(
        *turtle_log.borrow(),
        vec![
            "move(10)".to_string(),
            "turn(90)".to_string(),
            "move(20)".to_string(),
            "turn(90)".to_string(),
            "move(30)".to_string(),
            "turn(90)".to_string(),
        ]
    );
}
