//! Interpreter-wide configuration.
//!
//! A plain builder-style struct, the way `rhai::engine_settings` exposes
//! `Engine::set_max_call_levels`/`set_max_operations`/etc rather than
//! pulling in an external configuration crate - this *is* the ambient
//! "configuration" concern for this crate (`SPEC_FULL.md` §9).

/// Bounds on recursion depth, collection sizes, and cooperative step
/// count. A runaway `FOREVER` loop trips `max_operations` even if the
/// host never sets `forceBye`, mirroring `rhai`'s `max_operations`
/// watchdog.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    max_call_depth: usize,
    max_expr_depth: usize,
    max_list_size: usize,
    max_array_size: usize,
    max_string_size: usize,
    max_operations: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_call_depth: 1_024,
            max_expr_depth: 256,
            max_list_size: 1_000_000,
            max_array_size: 1_000_000,
            max_string_size: 1_000_000,
            max_operations: 50_000_000,
        }
    }
}

impl Limits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_call_depth(mut self, n: usize) -> Self {
        self.max_call_depth = n;
        self
    }

    pub fn max_expr_depth(mut self, n: usize) -> Self {
        self.max_expr_depth = n;
        self
    }

    pub fn max_list_size(mut self, n: usize) -> Self {
        self.max_list_size = n;
        self
    }

    pub fn max_array_size(mut self, n: usize) -> Self {
        self.max_array_size = n;
        self
    }

    pub fn max_string_size(mut self, n: usize) -> Self {
        self.max_string_size = n;
        self
    }

    pub fn max_operations(mut self, n: u64) -> Self {
        self.max_operations = n;
        self
    }

    pub fn get_max_call_depth(&self) -> usize {
        self.max_call_depth
    }

    pub fn get_max_expr_depth(&self) -> usize {
        self.max_expr_depth
    }

    pub fn get_max_list_size(&self) -> usize {
        self.max_list_size
    }

    pub fn get_max_array_size(&self) -> usize {
        self.max_array_size
    }

    pub fn get_max_string_size(&self) -> usize {
        self.max_string_size
    }

    pub fn get_max_operations(&self) -> u64 {
        self.max_operations
    }
}

/// A cooperative step counter, ticked once per evaluated expression and
/// once per statement executed by the driver. Exceeding `Limits::max_operations`
/// raises [`crate::error::LogoError::LimitExceeded`] without requiring
/// `forceBye` to be set by the host.
#[derive(Debug, Default)]
pub struct OperationCounter {
    count: u64,
}

impl OperationCounter {
    pub fn tick(&mut self, limits: &Limits) -> Result<(), crate::error::LogoError> {
        self.count += 1;
        if self.count > limits.get_max_operations() {
            Err(crate::error::LogoError::LimitExceeded("max_operations"))
        } else {
            Ok(())
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
