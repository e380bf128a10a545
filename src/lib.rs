//! # turtlescript-core
//!
//! The core of a Logo interpreter: lexer, parser, expression evaluator,
//! procedure dispatcher, dynamic scoping, and a cooperative execution
//! driver, together with the value model every built-in operates on.
//!
//! Turtle rendering, textual I/O, persistence, a REPL, and localization
//! tables are external collaborators the core consumes through the
//! traits in [`interfaces`] - this crate supplies only a headless
//! default pair ([`interfaces::NullTurtle`], [`interfaces::NullStream`])
//! for embedding without a real graphics/IO backend.
//!
//! ```no_run
//! use turtlescript_core::Interpreter;
//!
//! # futures::executor::block_on(async {
//! let mut interp = Interpreter::headless();
//! interp.run("to sq :n  repeat 4 [fd :n rt 90]  end  sq 10").await.unwrap();
//! # });
//! ```

pub mod ast;
pub mod driver;
pub mod engine;
pub mod error;
mod fn_call;
pub mod fn_native;
pub mod interfaces;
pub mod limits;
pub mod module;
pub mod packages;
pub mod scope;
pub mod token;
pub mod value;

use ahash::AHashMap;
use error::{LogoError, LogoResult};
use interfaces::{KeywordAlias, Localize, NullStream, NullTurtle, SaveHook, Stream, Turtle};
use limits::{Limits, OperationCounter};
use module::RoutineTable;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use scope::{PropertyTable, ScopeStack};
use value::Value;

/// Small-string storage for word text, inline for short words the way
/// `rhai::ImmutableString` inlines via the same `smartstring` crate.
pub type WordString = smartstring::alias::String;

/// Case-folded name -> value map, used for both the routines table and
/// every scope frame. `ahash` is the teacher's hasher of choice for
/// exactly this "lots of small string-keyed lookups" workload.
pub type WordMap<V> = AHashMap<String, V>;

/// Owns every piece of mutable interpreter state: the routines table,
/// the dynamic scope stack, the process-wide property-list table, the
/// PRNG, resource limits, the in-flight procedure-name stack (for
/// `{_PROC_}` error interpolation), `REPEAT`'s `repcount` stack, the
/// `forceBye` cancellation flag, and the pluggable external hooks
/// (`spec.md` §6).
///
/// Mirrors `rhai::Engine` as the embedding's single entry point, with
/// `Scope` folded in as an owned field rather than passed alongside
/// each call - this language's dynamic scoping makes the scope stack
/// as central to the engine as the routines table itself.
pub struct Interpreter {
    pub(crate) scopes: ScopeStack,
    pub(crate) routines: RoutineTable,
    pub(crate) plists: PropertyTable,
    rng: ChaCha8Rng,
    limits: Limits,
    op_counter: OperationCounter,
    pub(crate) proc_stack: Vec<String>,
    repcounts: Vec<i64>,
    force_bye: bool,
    turtle: Box<dyn Turtle>,
    stream: Box<dyn Stream>,
    save_hook: Option<Box<dyn SaveHook>>,
    keyword_alias: Option<Box<dyn KeywordAlias>>,
    localize: Option<Box<dyn Localize>>,
}

impl Interpreter {
    /// Builds an interpreter over caller-supplied `Turtle`/`Stream`
    /// backends, with every other hook left unset and default
    /// [`Limits`]. Registers the full built-in primitive table
    /// (`src/packages/*.rs`) up front, the way `Engine::new()` registers
    /// its standard package.
    pub fn new(turtle: Box<dyn Turtle>, stream: Box<dyn Stream>) -> Self {
        let mut routines = RoutineTable::new();
        packages::register_all(&mut routines);
        Self {
            scopes: ScopeStack::new(),
            routines,
            plists: PropertyTable::new(),
            rng: ChaCha8Rng::seed_from_u64(0x5EED_1E55),
            limits: Limits::default(),
            op_counter: OperationCounter::default(),
            proc_stack: Vec::new(),
            repcounts: Vec::new(),
            force_bye: false,
            turtle,
            stream,
            save_hook: None,
            keyword_alias: None,
            localize: None,
        }
    }

    /// An interpreter with no real graphics/IO backend - [`NullTurtle`]
    /// and [`NullStream`] - for unit tests and hosts that only embed the
    /// language core.
    pub fn headless() -> Self {
        Self::new(Box::new(NullTurtle::default()), Box::new(NullStream::default()))
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn set_save_hook(&mut self, hook: Box<dyn SaveHook>) {
        self.save_hook = Some(hook);
    }

    pub fn set_keyword_alias(&mut self, hook: Box<dyn KeywordAlias>) {
        self.keyword_alias = Some(hook);
    }

    pub fn set_localize(&mut self, hook: Box<dyn Localize>) {
        self.localize = Some(hook);
    }

    pub fn routines(&self) -> &RoutineTable {
        &self.routines
    }

    pub fn routines_mut(&mut self) -> &mut RoutineTable {
        &mut self.routines
    }

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut ScopeStack {
        &mut self.scopes
    }

    pub fn plists(&self) -> &PropertyTable {
        &self.plists
    }

    pub fn plists_mut(&mut self) -> &mut PropertyTable {
        &mut self.plists
    }

    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn turtle(&self) -> &dyn Turtle {
        self.turtle.as_ref()
    }

    pub fn turtle_mut(&mut self) -> &mut dyn Turtle {
        self.turtle.as_mut()
    }

    pub fn stream(&self) -> &dyn Stream {
        self.stream.as_ref()
    }

    pub fn stream_mut(&mut self) -> &mut dyn Stream {
        self.stream.as_mut()
    }

    /// Ticks the cooperative step counter (`spec.md` §9's watchdog note);
    /// called once per evaluated expression and once per statement.
    pub fn tick_operation(&mut self) -> LogoResult<()> {
        self.op_counter.tick(&self.limits)
    }

    /// Pushes a procedure name onto the in-flight call stack, enforcing
    /// `Limits::max_call_depth` as a stand-in for native stack overflow
    /// (`spec.md` §4.3: "push name onto the procedure stack ... pop on
    /// exit").
    pub fn push_proc(&mut self, name: String) -> LogoResult<()> {
        if self.proc_stack.len() >= self.limits.get_max_call_depth() {
            return Err(LogoError::LimitExceeded("max_call_depth"));
        }
        self.proc_stack.push(name);
        Ok(())
    }

    pub fn pop_proc(&mut self) {
        self.proc_stack.pop();
    }

    pub fn proc_stack(&self) -> &[String] {
        &self.proc_stack
    }

    /// The truthiness of the `REDEFP` variable (`spec.md` §4.4), read
    /// like any other dynamically-scoped binding rather than stored as
    /// a dedicated field.
    pub fn redefp(&self) -> bool {
        self.scopes
            .lookup("REDEFP")
            .and_then(|b| b.value.as_ref())
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Matches `word` against `keyword` (`ELSE`/`END`), first consulting
    /// the pluggable keyword-alias hook (`spec.md` §4.4, §6).
    pub fn is_keyword(&self, word: &str, keyword: &'static str) -> bool {
        if let Some(alias) = &self.keyword_alias {
            if let Some(resolved) = alias.resolve(word) {
                return resolved.eq_ignore_ascii_case(keyword);
            }
        }
        word.eq_ignore_ascii_case(keyword)
    }

    /// Fires the save hook on definition or erasure of a user procedure
    /// (`spec.md` §6).
    pub fn on_define(&mut self, name: &str, definition: Option<String>) {
        if let Some(hook) = &mut self.save_hook {
            hook.on_define(name, definition.as_deref());
        }
    }

    pub fn force_bye(&self) -> bool {
        self.force_bye
    }

    pub fn set_force_bye(&mut self, value: bool) {
        self.force_bye = value;
    }

    /// `REPCOUNT`/`#`: the innermost active `REPEAT`/`FOREVER` counter,
    /// or -1 if none is active (`spec.md` §4.6).
    pub fn repcount(&self) -> i64 {
        self.repcounts.last().copied().unwrap_or(-1)
    }

    pub fn push_repcount(&mut self, value: i64) {
        self.repcounts.push(value);
    }

    pub fn set_repcount(&mut self, value: i64) {
        if let Some(top) = self.repcounts.last_mut() {
            *top = value;
        }
    }

    pub fn pop_repcount(&mut self) {
        self.repcounts.pop();
    }

    /// Renders an error through the installed localize hook and this
    /// interpreter's current procedure stack (`spec.md` §7).
    pub fn render_error(&self, err: &LogoError) -> String {
        err.render(&self.proc_stack, self.localize.as_deref())
    }

    /// Parses and runs `source` as a top-level program (`spec.md` §4.7).
    /// A `Bye` signal unwinds silently (`spec.md` §7: "caught only at the
    /// top-level driver and causes silent termination"). An `Output`
    /// escaping all the way to the top level - no enclosing procedure
    /// call caught it - surfaces as that output's value rather than as
    /// an error, the same way a procedure's own `output` wrapper turns
    /// the signal into its return value; a bare `Stop` with no enclosing
    /// procedure is still reported as the ordinary error its template
    /// describes.
    pub async fn run(&mut self, source: &str) -> LogoResult<Option<Value>> {
        let atoms = token::lex_program(source)?;
        match driver::run_sequence(self, &atoms, false).await {
            Ok(value) => Ok(value),
            Err(LogoError::Bye) => Ok(None),
            Err(LogoError::Output(value)) => Ok(Some(value)),
            Err(other) => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_run_executes_commands() {
        let mut interp = Interpreter::headless();
        let result = futures::executor::block_on(interp.run("make \"x 1"));
        assert_eq!(result.unwrap(), None);
    }

    #[test]
    fn bye_terminates_silently() {
        let mut interp = Interpreter::headless();
        interp.set_force_bye(true);
        let result = futures::executor::block_on(interp.run("make \"x 1"));
        assert_eq!(result.unwrap(), None);
    }

    #[test]
    fn redefp_defaults_false() {
        let interp = Interpreter::headless();
        assert!(!interp.redefp());
    }

    #[test]
    fn repcount_defaults_to_negative_one() {
        let interp = Interpreter::headless();
        assert_eq!(interp.repcount(), -1);
    }
}
