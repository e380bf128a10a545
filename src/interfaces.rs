//! External collaborators the core consumes but does not implement:
//! turtle graphics, the textual stream, the persistence save hook, and the
//! pluggable keyword-alias/localization hooks (`spec.md` §6).
//!
//! Modeled as `#[async_trait]` traits so a host can supply any backend -
//! the same shape `ouros::asyncio` documents: "the host acts as the event
//! loop; external calls return futures that can be awaited." A headless
//! no-op pair (`NullTurtle`, `NullStream`) ships for tests and for hosts
//! that only care about non-graphical evaluation.

use crate::value::Value;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurtleMode {
    Wrap,
    Window,
    Fence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PenMode {
    Paint,
    Erase,
    Reverse,
}

/// The turtle-graphics backend. Every method that can plausibly animate
/// is `async`; a host that wants true suspension (e.g. one animation
/// frame per `move`) can simply not resolve the returned future
/// immediately. A synchronous host resolves on first poll.
#[async_trait(?Send)]
pub trait Turtle {
    async fn move_by(&mut self, distance: f64);
    async fn turn(&mut self, degrees: f64);
    async fn set_position(&mut self, x: Option<f64>, y: Option<f64>);
    async fn set_heading(&mut self, degrees: f64);
    async fn home(&mut self);
    async fn arc(&mut self, angle: f64, radius: f64);

    fn get_xy(&self) -> (f64, f64);
    fn get_heading(&self) -> f64;
    fn towards(&self, x: f64, y: f64) -> f64;

    async fn set_visible(&mut self, visible: bool);
    fn is_visible(&self) -> bool;

    async fn clear(&mut self);
    async fn clear_screen(&mut self);

    async fn set_turtle_mode(&mut self, mode: TurtleMode);
    fn get_turtle_mode(&self) -> TurtleMode;

    async fn fill(&mut self);
    async fn begin_path(&mut self);
    async fn fill_path(&mut self, color: Value);

    async fn draw_text(&mut self, text: &str);
    async fn set_font_size(&mut self, size: f64);
    fn get_font_size(&self) -> f64;
    async fn set_font_name(&mut self, name: &str);
    fn get_font_name(&self) -> String;

    async fn set_pen_down(&mut self, down: bool);
    fn is_pen_down(&self) -> bool;
    async fn set_pen_mode(&mut self, mode: PenMode);
    fn get_pen_mode(&self) -> PenMode;

    async fn set_color(&mut self, color: Value);
    fn get_color(&self) -> Value;
    async fn set_bg_color(&mut self, color: Value);
    fn get_bg_color(&self) -> Value;

    async fn set_width(&mut self, width: f64);
    fn get_width(&self) -> f64;

    async fn set_scrunch(&mut self, x: f64, y: f64);
    fn get_scrunch(&self) -> (f64, f64);
}

/// The textual input/output stream.
#[async_trait(?Send)]
pub trait Stream {
    async fn write(&mut self, text: &[&str]);
    /// May suspend waiting for host-side input.
    async fn read(&mut self, prompt: Option<&str>) -> Value;
    fn clear(&mut self);
}

/// Called on definition or erasure of a user procedure, so a host can
/// persist the workspace.
pub trait SaveHook {
    fn on_define(&mut self, name: &str, definition_text: Option<&str>);
}

/// Pluggable localization of the small set of reserved keywords
/// (`ELSE`, `END`) recognized by special forms.
pub trait KeywordAlias {
    fn resolve(&self, word: &str) -> Option<&'static str>;
}

/// Translates error message templates before parameter interpolation.
pub trait Localize {
    fn translate(&self, template: &str) -> String;
}

/// A headless turtle that tracks just enough state to answer queries;
/// motion/drawing calls are no-ops. Useful for unit tests and for hosts
/// that embed only the language core.
#[derive(Debug, Clone)]
pub struct NullTurtle {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
    pub visible: bool,
    pub pen_down: bool,
    pub pen_mode: PenMode,
    pub turtle_mode: TurtleMode,
    pub color: Value,
    pub bg_color: Value,
    pub width: f64,
    pub font_size: f64,
    pub font_name: String,
    pub scrunch: (f64, f64),
}

impl Default for NullTurtle {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            visible: true,
            pen_down: true,
            pen_mode: PenMode::Paint,
            turtle_mode: TurtleMode::Wrap,
            color: Value::word("black"),
            bg_color: Value::word("white"),
            width: 1.0,
            font_size: 14.0,
            font_name: String::from("Arial"),
            scrunch: (1.0, 1.0),
        }
    }
}

#[async_trait(?Send)]
impl Turtle for NullTurtle {
    async fn move_by(&mut self, distance: f64) {
        let rad = self.heading.to_radians();
        self.x += distance * rad.sin();
        self.y += distance * rad.cos();
    }
    async fn turn(&mut self, degrees: f64) {
        self.heading = (self.heading + degrees).rem_euclid(360.0);
    }
    async fn set_position(&mut self, x: Option<f64>, y: Option<f64>) {
        if let Some(x) = x {
            self.x = x;
        }
        if let Some(y) = y {
            self.y = y;
        }
    }
    async fn set_heading(&mut self, degrees: f64) {
        self.heading = degrees.rem_euclid(360.0);
    }
    async fn home(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
        self.heading = 0.0;
    }
    async fn arc(&mut self, _angle: f64, _radius: f64) {}

    fn get_xy(&self) -> (f64, f64) {
        (self.x, self.y)
    }
    fn get_heading(&self) -> f64 {
        self.heading
    }
    fn towards(&self, x: f64, y: f64) -> f64 {
        (x - self.x).atan2(y - self.y).to_degrees().rem_euclid(360.0)
    }

    async fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
    fn is_visible(&self) -> bool {
        self.visible
    }

    async fn clear(&mut self) {}
    async fn clear_screen(&mut self) {
        self.home().await;
    }

    async fn set_turtle_mode(&mut self, mode: TurtleMode) {
        self.turtle_mode = mode;
    }
    fn get_turtle_mode(&self) -> TurtleMode {
        self.turtle_mode
    }

    async fn fill(&mut self) {}
    async fn begin_path(&mut self) {}
    async fn fill_path(&mut self, _color: Value) {}

    async fn draw_text(&mut self, _text: &str) {}
    async fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }
    fn get_font_size(&self) -> f64 {
        self.font_size
    }
    async fn set_font_name(&mut self, name: &str) {
        self.font_name = name.to_string();
    }
    fn get_font_name(&self) -> String {
        self.font_name.clone()
    }

    async fn set_pen_down(&mut self, down: bool) {
        self.pen_down = down;
    }
    fn is_pen_down(&self) -> bool {
        self.pen_down
    }
    async fn set_pen_mode(&mut self, mode: PenMode) {
        self.pen_mode = mode;
    }
    fn get_pen_mode(&self) -> PenMode {
        self.pen_mode
    }

    async fn set_color(&mut self, color: Value) {
        self.color = color;
    }
    fn get_color(&self) -> Value {
        self.color.clone()
    }
    async fn set_bg_color(&mut self, color: Value) {
        self.bg_color = color;
    }
    fn get_bg_color(&self) -> Value {
        self.bg_color.clone()
    }

    async fn set_width(&mut self, width: f64) {
        self.width = width;
    }
    fn get_width(&self) -> f64 {
        self.width
    }

    async fn set_scrunch(&mut self, x: f64, y: f64) {
        self.scrunch = (x, y);
    }
    fn get_scrunch(&self) -> (f64, f64) {
        self.scrunch
    }
}

/// A stream that records writes and never produces input, for tests that
/// only care about turtle behavior or control flow.
#[derive(Debug, Clone, Default)]
pub struct NullStream {
    pub written: Vec<String>,
}

#[async_trait(?Send)]
impl Stream for NullStream {
    async fn write(&mut self, text: &[&str]) {
        self.written.push(text.concat());
    }
    async fn read(&mut self, _prompt: Option<&str>) -> Value {
        Value::empty_list()
    }
    fn clear(&mut self) {
        self.written.clear();
    }
}
