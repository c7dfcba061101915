//! A recursion-depth guard for the checker's recursive descents, grounded
//! on `tsz-checker`'s `ExpressionChecker` (`expr.rs`), which holds its own
//! `depth: Cell<u32>` counter against a `MAX_EXPR_CHECK_DEPTH` constant for
//! exactly this reason — "prevent stack overflow" on deeply nested
//! expressions. This module generalizes that single-struct counter into a
//! thread-local so every recursive entry point in this crate graph
//! (expression synthesis, constraint collection, pattern matching) can
//! share one guard without threading a counter through every signature.

use std::cell::Cell;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    static MAX_DEPTH: Cell<Option<usize>> = const { Cell::new(None) };
}

/// Bounds the recursion guard for the duration of one top-level descent
/// (one `typeCheck` call over one expression tree). Resets the depth
/// counter to zero on creation so that an earlier descent's guards, even
/// if a panic unwound past their `Drop`, can't leak into this one.
pub struct RecursionScope;

impl RecursionScope {
    pub fn new(max_depth: Option<usize>) -> Self {
        MAX_DEPTH.with(|m| m.set(max_depth));
        DEPTH.with(|d| d.set(0));
        RecursionScope
    }
}

/// RAII token for one level of recursion. Held by the caller for the
/// duration of the recursive call it guards; dropping it restores the
/// depth counter.
pub struct RecursionGuard(());

impl RecursionGuard {
    /// Enters one more level of recursion under the innermost
    /// [`RecursionScope`]. Returns `None` once `CheckerOptions::max_recursion_depth`
    /// is exceeded, so the caller can bail out instead of recursing further.
    pub fn enter() -> Option<Self> {
        let max = MAX_DEPTH.with(|m| m.get());
        let depth = DEPTH.with(|d| {
            let next = d.get() + 1;
            d.set(next);
            next
        });
        if let Some(max) = max {
            if depth > max {
                DEPTH.with(|d| d.set(d.get() - 1));
                return None;
            }
        }
        Some(RecursionGuard(()))
    }
}

impl Drop for RecursionGuard {
    fn drop(&mut self) {
        DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
