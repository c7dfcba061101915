//! Process-wide fresh type-variable generation.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::ty::{Type, TypeVar};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns a `Type::Var` whose id has never been issued before (within this
/// counter's lifetime). The counter is process-wide; callers that need
/// determinism across unrelated `typeCheck` invocations should call
/// [`reset_fresh_counter`] at the start of each run (this is what
/// `CheckerOptions::reset_fresh_vars_per_run` controls in `tl-checker`).
pub fn fresh_var() -> Type {
    let id = COUNTER.fetch_add(1, Ordering::Relaxed);
    Type::var(TypeVar::new(format!("t{id}")))
}

/// Resets the fresh-variable counter to zero. Not safe to call concurrently
/// with an in-flight `typeCheck` on another thread; the checker is
/// single-threaded and synchronous, so this is only ever called between
/// runs.
pub fn reset_fresh_counter() {
    COUNTER.store(0, Ordering::Relaxed);
}
