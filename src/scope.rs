//! Dynamic (not lexical) variable scoping (`spec.md` §3, §4.5).
//!
//! Modeled the way `rhai::scope::Scope` models a flat call-stack scope,
//! generalized to a *stack* of frames since Logo's `MAKE`/`LOCAL` walk a
//! stack of dynamically-nested procedure activations rather than a single
//! flat list (`rhai` only ever has one active scope per `eval_with_scope`
//! call; this crate pushes one frame per user-procedure invocation).

use crate::value::Value;
use crate::WordMap;

/// Sidecar flags on a [`Binding`], named directly in `spec.md` §3's
/// Binding definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindingFlags {
    pub buried: bool,
    pub traced: bool,
    pub stepped: bool,
}

/// A mutable cell reachable by a case-insensitive name within one scope
/// frame. `value` is `None` for a binding created by `LOCAL`/`GLOBAL`
/// before it is ever assigned - reading it is `Don't know about variable
/// X` per `spec.md` §4.5, same as if no binding existed at all.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    pub value: Option<Value>,
    pub flags: BindingFlags,
}

impl Binding {
    fn unset() -> Self {
        Self::default()
    }

    fn with_value(value: Value) -> Self {
        Self {
            value: Some(value),
            flags: BindingFlags::default(),
        }
    }
}

/// One level of the dynamic environment stack. Carries `TEST`'s hidden
/// boolean sidecar directly on the frame (not inside any binding's
/// cell), per `spec.md` §4.6/§9.
#[derive(Debug, Default)]
pub struct Frame {
    vars: WordMap<Binding>,
    test_value: Option<bool>,
}

impl Frame {
    fn new() -> Self {
        Self::default()
    }
}

fn fold(name: &str) -> String {
    name.to_ascii_uppercase()
}

/// The scope stack: index 0 is the permanent global frame; every
/// subsequent index is one nested procedure activation. Never empty
/// (`spec.md` §3 invariants).
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new()],
        }
    }

    pub fn push_frame(&mut self) {
        self.frames.push(Frame::new());
    }

    pub fn pop_frame(&mut self) {
        debug_assert!(self.frames.len() > 1, "global frame must never be popped");
        self.frames.pop();
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    fn current_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("scope stack is never empty")
    }

    fn global_mut(&mut self) -> &mut Frame {
        &mut self.frames[0]
    }

    /// Dynamic-scope lookup: walks frames top (most recent) to bottom
    /// (global), returning the first binding found regardless of which
    /// frame it lives in (`spec.md` §4.5).
    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        let key = fold(name);
        self.frames.iter().rev().find_map(|f| f.vars.get(&key))
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Binding> {
        let key = fold(name);
        self.frames.iter_mut().rev().find_map(|f| f.vars.get_mut(&key))
    }

    /// `MAKE name value`: assigns to the first binding found by dynamic
    /// lookup, deep-copying list values; creates a fresh global binding
    /// if none exists anywhere on the stack.
    pub fn make(&mut self, name: &str, value: Value) {
        let value = value.deep_copy();
        if let Some(binding) = self.lookup_mut(name) {
            binding.value = Some(value);
        } else {
            let key = fold(name);
            self.global_mut().vars.insert(key, Binding::with_value(value));
        }
    }

    /// `LOCAL name`: creates an uninitialized binding in the *current*
    /// frame, shadowing any outer binding of the same name for the rest
    /// of this activation.
    pub fn local(&mut self, name: &str) {
        let key = fold(name);
        self.current_mut().vars.insert(key, Binding::unset());
    }

    /// `LOCALMAKE name value`: `LOCAL` followed immediately by an
    /// assignment in the same frame.
    pub fn local_make(&mut self, name: &str, value: Value) {
        let key = fold(name);
        self.current_mut()
            .vars
            .insert(key, Binding::with_value(value.deep_copy()));
    }

    /// `GLOBAL name`: creates an uninitialized binding in the global
    /// frame, regardless of current depth.
    pub fn global(&mut self, name: &str) {
        let key = fold(name);
        self.global_mut().vars.entry(key).or_insert_with(Binding::unset);
    }

    /// Binds a formal input in a freshly-pushed frame (user-procedure
    /// call setup). Missing/extra arguments are the caller's concern;
    /// this just performs one assignment in the current frame.
    pub fn bind_formal(&mut self, name: &str, value: Value) {
        let key = fold(name);
        self.current_mut()
            .vars
            .insert(key, Binding::with_value(value));
    }

    /// Deletes the named binding from *every* frame that has one,
    /// including buried bindings - `spec.md` §9's `ERNS`/`ERN` preserved
    /// ambiguity, kept as observed.
    pub fn erase(&mut self, name: &str) {
        let key = fold(name);
        for frame in &mut self.frames {
            frame.vars.remove(&key);
        }
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.lookup(name).map(|b| b.value.is_some()).unwrap_or(false)
    }

    /// Mutable access to the value of the first binding found by dynamic
    /// lookup. `.SETFIRST`/`.SETBF` (`packages::mutators`) go through this
    /// rather than taking an already-evaluated `Value`, because `MAKE`
    /// deep-copies lists on assignment (`spec.md` §3): mutating a cloned
    /// argument would never be observed by the binding it came from.
    pub fn with_binding_value_mut<R>(&mut self, name: &str, f: impl FnOnce(&mut Value) -> R) -> Option<R> {
        self.lookup_mut(name).and_then(|b| b.value.as_mut()).map(f)
    }

    pub fn set_flag(&mut self, name: &str, f: impl FnOnce(&mut BindingFlags)) -> bool {
        if let Some(binding) = self.lookup_mut(name) {
            f(&mut binding.flags);
            true
        } else {
            false
        }
    }

    pub fn flags(&self, name: &str) -> Option<BindingFlags> {
        self.lookup(name).map(|b| b.flags)
    }

    /// `TEST`: stashes a boolean on the *current* frame, not inside any
    /// named binding (`spec.md` §4.6).
    pub fn set_test(&mut self, value: bool) {
        self.current_mut().test_value = Some(value);
    }

    /// `IFT`/`IFF` consult the nearest frame (walking outward) that has
    /// ever recorded a `TEST` value - `TEST`'s sidecar is itself dynamic,
    /// the same as every other binding in this environment.
    pub fn test(&self) -> Option<bool> {
        self.frames.iter().rev().find_map(|f| f.test_value)
    }

    /// All case-folded names bound anywhere on the stack, most recent
    /// frame first - used by workspace-query primitives that must
    /// snapshot before mutating (`spec.md` §5: "iteration-during-mutation
    /// ... must snapshot keys before deleting").
    pub fn all_names(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for frame in self.frames.iter().rev() {
            for name in frame.vars.keys() {
                if seen.insert(name.clone()) {
                    out.push(name.clone());
                }
            }
        }
        out
    }
}

/// The process-wide property-list table (`spec.md` §3), orthogonal to
/// [`ScopeStack`].
#[derive(Debug, Default)]
pub struct PropertyTable {
    plists: WordMap<WordMap<Value>>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, plist: &str, prop: &str, value: Value) {
        self.plists
            .entry(fold(plist))
            .or_default()
            .insert(fold(prop), value);
    }

    pub fn get(&self, plist: &str, prop: &str) -> Option<&Value> {
        self.plists.get(&fold(plist)).and_then(|p| p.get(&fold(prop)))
    }

    pub fn remove(&mut self, plist: &str, prop: &str) {
        if let Some(p) = self.plists.get_mut(&fold(plist)) {
            p.remove(&fold(prop));
        }
    }

    /// `PLIST name`: the property/value pairs as a flat list, in
    /// insertion-unordered (hash-map) order - real UCBLogo doesn't
    /// guarantee an order here either.
    pub fn plist(&self, plist: &str) -> Vec<(String, Value)> {
        self.plists
            .get(&fold(plist))
            .map(|p| p.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    pub fn erase_all(&mut self, plist: &str) {
        self.plists.remove(&fold(plist));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut s = ScopeStack::new();
        s.make("Foo", Value::number(1.0));
        assert_eq!(s.lookup("FOO").unwrap().value, Some(Value::number(1.0)));
        assert_eq!(s.lookup("foo").unwrap().value, Some(Value::number(1.0)));
    }

    #[test]
    fn dynamic_scope_sees_caller_binding() {
        // make "x 5 ; local "x ; make "x 9 (from a nested frame) ; caller still sees :x as 5
        let mut s = ScopeStack::new();
        s.make("x", Value::number(5.0));
        s.push_frame();
        s.local("x");
        s.make("x", Value::number(9.0));
        assert_eq!(s.lookup("x").unwrap().value, Some(Value::number(9.0)));
        s.pop_frame();
        assert_eq!(s.lookup("x").unwrap().value, Some(Value::number(5.0)));
    }

    #[test]
    fn make_without_local_binding_falls_through_to_global() {
        let mut s = ScopeStack::new();
        s.push_frame();
        s.make("g", Value::number(1.0));
        s.pop_frame();
        assert_eq!(s.lookup("g").unwrap().value, Some(Value::number(1.0)));
    }

    #[test]
    fn local_shadows_without_touching_outer_binding() {
        let mut s = ScopeStack::new();
        s.make("x", Value::number(1.0));
        s.push_frame();
        s.local_make("x", Value::number(2.0));
        assert_eq!(s.lookup("x").unwrap().value, Some(Value::number(2.0)));
        s.pop_frame();
        assert_eq!(s.lookup("x").unwrap().value, Some(Value::number(1.0)));
    }

    #[test]
    fn undefined_variable_has_no_binding() {
        let s = ScopeStack::new();
        assert!(s.lookup("nope").is_none());
    }

    #[test]
    fn global_creates_in_bottom_frame_regardless_of_depth() {
        let mut s = ScopeStack::new();
        s.push_frame();
        s.push_frame();
        s.global("deep");
        s.pop_frame();
        s.pop_frame();
        assert!(s.lookup("deep").is_some());
    }

    #[test]
    fn test_sidecar_is_per_frame_and_dynamic() {
        let mut s = ScopeStack::new();
        assert_eq!(s.test(), None);
        s.set_test(true);
        assert_eq!(s.test(), Some(true));
    }

    #[test]
    fn property_table_crud() {
        let mut p = PropertyTable::new();
        p.put("turtle", "color", Value::word("red"));
        assert_eq!(p.get("TURTLE", "COLOR"), Some(&Value::word("red")));
        p.remove("turtle", "color");
        assert_eq!(p.get("turtle", "color"), None);
    }
}
