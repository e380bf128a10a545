//! Procedure machinery: the routines table, primitive registration, and
//! user-defined-procedure bookkeeping (`spec.md` §4.4, §9; `SPEC_FULL.md`
//! §2 maps this to the teacher's `module.rs`, which likewise owns
//! "what names resolve to what callable" for `rhai`).

use crate::ast::Atom;
use crate::error::LogoError;
use crate::fn_native::PrimitiveFut;
use crate::WordMap;
use crate::Interpreter;

/// A primitive that evaluates its arguments eagerly before being called.
pub type PrimitiveFn = for<'a> fn(&'a mut Interpreter, Vec<crate::value::Value>) -> PrimitiveFut<'a>;

/// A primitive that receives its arguments as unevaluated expressions -
/// used by `AND`/`OR` (short-circuit) and the `WHILE`/`UNTIL` family
/// (re-evaluated every iteration). `spec.md` §4.3's "Noeval routine".
pub type NoEvalFn = for<'a> fn(&'a mut Interpreter, &'a [crate::engine::Expr]) -> PrimitiveFut<'a>;

/// A special form receives the raw remaining atom cursor and consumes
/// whatever it needs itself (only `TO`, per `spec.md` §4.4).
pub type SpecialFn = fn(&mut Interpreter, &mut crate::engine::Cursor) -> Result<(), LogoError>;

/// One entry in the routines table.
pub enum Routine {
    Primitive {
        arity: usize,
        func: PrimitiveFn,
    },
    NoEval {
        arity: usize,
        func: NoEvalFn,
    },
    Special {
        func: SpecialFn,
    },
    User {
        formals: Vec<String>,
        body: Vec<Atom>,
    },
}

impl Routine {
    pub fn is_special(&self) -> bool {
        matches!(self, Routine::Special { .. })
    }

    pub fn is_user(&self) -> bool {
        matches!(self, Routine::User { .. })
    }

    pub fn is_noeval(&self) -> bool {
        matches!(self, Routine::NoEval { .. })
    }

    /// Natural arity: number of expressions consumed when this routine
    /// is invoked without parentheses. Special forms have none - they
    /// consume raw tokens on their own terms.
    pub fn natural_arity(&self) -> usize {
        match self {
            Routine::Primitive { arity, .. } | Routine::NoEval { arity, .. } => *arity,
            Routine::User { formals, .. } => formals.len(),
            Routine::Special { .. } => 0,
        }
    }

    /// The raw function pointer of a [`Routine::Special`], for the
    /// dispatcher to invoke directly against the live token cursor
    /// (`spec.md` §4.3's "Special routine" dispatch rule).
    pub fn as_special_fn(&self) -> Option<SpecialFn> {
        match self {
            Routine::Special { func } => Some(*func),
            _ => None,
        }
    }

    /// The raw function pointer of a [`Routine::Primitive`].
    pub fn as_primitive_fn(&self) -> Option<PrimitiveFn> {
        match self {
            Routine::Primitive { func, .. } => Some(*func),
            _ => None,
        }
    }

    /// The raw function pointer of a [`Routine::NoEval`].
    pub fn as_noeval_fn(&self) -> Option<NoEvalFn> {
        match self {
            Routine::NoEval { func, .. } => Some(*func),
            _ => None,
        }
    }

    /// The formals/body of a [`Routine::User`], for the call-setup code
    /// in `src/fn_call.rs` that pushes a fresh scope frame and runs the
    /// body through the execution driver.
    pub fn as_user(&self) -> Option<(&[String], &[Atom])> {
        match self {
            Routine::User { formals, body } => Some((formals, body)),
            _ => None,
        }
    }
}

fn fold(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// The name -> [`Routine`] table. Case-insensitive, exactly like
/// [`crate::scope::ScopeStack`]'s variable bindings.
#[derive(Default)]
pub struct RoutineTable {
    routines: WordMap<Routine>,
}

impl RoutineTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Routine> {
        self.routines.get(&fold(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.routines.contains_key(&fold(name))
    }

    /// Registers a built-in primitive. Called only from `src/packages/*`
    /// at interpreter construction time, never by user code, so there is
    /// no redefinition check here - that check lives in
    /// [`Self::define_user`]/[`Self::register_special`], the entry points
    /// reachable from `TO`/`DEFINE`.
    pub fn register_primitive(&mut self, name: &str, arity: usize, func: PrimitiveFn) {
        self.routines
            .insert(fold(name), Routine::Primitive { arity, func });
    }

    pub fn register_noeval(&mut self, name: &str, arity: usize, func: NoEvalFn) {
        self.routines.insert(fold(name), Routine::NoEval { arity, func });
    }

    pub fn register_special(&mut self, name: &str, func: SpecialFn) {
        self.routines.insert(fold(name), Routine::Special { func });
    }

    /// `TO`/`DEFINE`: registers a user-defined procedure, honoring the
    /// redefinition rules of `spec.md` §4.4: special forms can never be
    /// redefined; primitives require `REDEFP` to be truthy.
    pub fn define_user(
        &mut self,
        name: &str,
        formals: Vec<String>,
        body: Vec<Atom>,
        redefp: bool,
    ) -> Result<(), LogoError> {
        let key = fold(name);
        if let Some(existing) = self.routines.get(&key) {
            if existing.is_special() {
                return Err(LogoError::CantRedefineSpecial(name.to_string()));
            }
            if !existing.is_user() && !redefp {
                return Err(LogoError::CantRedefinePrimitive(name.to_string()));
            }
        }
        self.routines.insert(key, Routine::User { formals, body });
        Ok(())
    }

    /// `ERASE`: removes a user-defined procedure. Primitives and special
    /// forms can never be erased.
    pub fn erase(&mut self, name: &str) -> Result<(), LogoError> {
        let key = fold(name);
        match self.routines.get(&key) {
            Some(r) if r.is_special() => Err(LogoError::CantEraseSpecial(name.to_string())),
            Some(r) if !r.is_user() => Err(LogoError::CantErasePrimitive(name.to_string())),
            _ => {
                self.routines.remove(&key);
                Ok(())
            }
        }
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.routines.contains_key(&fold(name))
    }

    pub fn names(&self) -> Vec<String> {
        self.routines.keys().cloned().collect()
    }

    /// All user-defined procedure names, for `PROCEDURES`-style workspace
    /// queries.
    pub fn user_names(&self) -> Vec<String> {
        self.routines
            .iter()
            .filter(|(_, r)| r.is_user())
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// Renders a user procedure's `TO ... END` source text, the textual
    /// format `spec.md` §6 specifies for `DEF`/the persistence save hook.
    pub fn definition_text(&self, name: &str) -> Option<String> {
        match self.routines.get(&fold(name)) {
            Some(Routine::User { formals, body }) => {
                let mut s = format!("to {}", name.to_lowercase());
                for f in formals {
                    s.push_str(&format!(" :{}", f));
                }
                s.push('\n');
                s.push_str("  ");
                s.push_str(&render_body(body));
                s.push('\n');
                s.push_str("end");
                Some(s)
            }
            _ => None,
        }
    }
}

fn render_body(atoms: &[Atom]) -> String {
    // Joined with spaces, except a unary-minus sentinel glues to the atom
    // that follows it with no intervening space (`spec.md` §6).
    let mut out = String::new();
    let mut prev_was_unary_minus = false;
    for (i, a) in atoms.iter().enumerate() {
        if i > 0 && !prev_was_unary_minus {
            out.push(' ');
        }
        out.push_str(&render_atom(a));
        prev_was_unary_minus = matches!(a, Atom::UnaryMinus);
    }
    out
}

fn render_atom(a: &Atom) -> String {
    match a {
        Atom::Word(s) => s.clone(),
        // A rendered body never contains a bare UnaryMinus sentinel on
        // its own - it always precedes the operand it negates, and the
        // two together should print without an intervening space
        // (`spec.md` §6: "emitted as `-` without a trailing space").
        Atom::UnaryMinus => "-".to_string(),
        Atom::List(items) => format!("[{}]", render_body(items)),
        Atom::Array(items, origin) => {
            if *origin == 1 {
                format!("{{{}}}", render_body(items))
            } else {
                format!("{{{}}}@{}", render_body(items), origin)
            }
        }
    }
}
