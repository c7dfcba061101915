//! Checker configuration. This is a plain struct constructed and passed in
//! by the embedding caller — no file, environment, or CLI surface.

/// Which of the two type-checking strategies the façade runs.
///
/// Both strategies exist behind a single abstract `typeCheckExpression`
/// operation; this only selects which one a `typeCheck` call uses.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Direct, recursive type synthesis with no intermediate constraint set.
    /// Stricter: an `if`/`else` with mismatched branch types is rejected
    /// rather than widened.
    #[default]
    Algorithmic,
    /// Collect constraints while walking the program, then solve them all
    /// at once with the unifier.
    ConstraintBased,
}

/// Compiler options for type checking.
#[derive(Clone, Debug)]
pub struct CheckerOptions {
    pub strategy: Strategy,
    /// When true, the fresh type-variable counter resets at the start of
    /// every `typeCheck` call, so two calls on unrelated programs produce
    /// identical variable names. When false, the counter is process-wide
    /// and keeps advancing across calls.
    pub reset_fresh_vars_per_run: bool,
    /// Maximum recursion depth for the constraint collector and pattern
    /// checker. Guards against stack overflow on pathological (or
    /// adversarial) deeply nested expressions; `None` disables the guard.
    pub max_recursion_depth: Option<usize>,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            reset_fresh_vars_per_run: true,
            max_recursion_depth: Some(500),
        }
    }
}
