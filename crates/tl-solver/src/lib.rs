//! Constraint sets (component F's output shape) and the unifier
//! (component E): Robinson-style most-general-unifier over `Substitution`,
//! plus a worklist solver that consumes a whole `ConstraintSet`.

pub mod constraint;
pub mod error;
pub mod unify;

pub use constraint::{Constraint, ConstraintSet};
pub use error::UnificationError;
pub use unify::{instantiate, solve, unify_types};
