//! The built-in primitive catalogue, one file per family, mirroring
//! `rhai`'s own `src/packages/*.rs` split (arithmetic, iterators, strings,
//! ... each registering into the one shared `Engine`/`RoutineTable`).
//!
//! [`register_all`] is called once from [`crate::Interpreter::new`], the
//! same place `rhai::Engine::new()` registers its standard package.

mod arithmetic;
mod arrays;
mod control;
mod io;
mod mutators;
mod predicates;
pub(crate) mod support;
mod turtle;
mod variables;
mod words;
mod workspace;

use crate::module::RoutineTable;

pub fn register_all(table: &mut RoutineTable) {
    arithmetic::register(table);
    arrays::register(table);
    control::register(table);
    io::register(table);
    mutators::register(table);
    predicates::register(table);
    turtle::register(table);
    variables::register(table);
    words::register(table);
    workspace::register(table);
}
