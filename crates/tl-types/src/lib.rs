//! The TL type model.
//!
//! This crate owns the type language itself (`Type`, `TypeVar`,
//! `TypeScheme`) plus the pure, substitution-independent queries over it:
//! structural equality, subtyping, numeric widening, and free-variable
//! extraction. It has no notion of constraints or unification; those live
//! in `tl-solver`, which is built on top of this crate.

pub mod fresh;
pub mod numeric;
pub mod ty;
pub mod compare;

pub use fresh::{fresh_var, reset_fresh_counter};
pub use numeric::{get_wider_numeric_type, is_numeric, Numeric};
pub use ty::{Type, TypeScheme, TypeVar, PRIMITIVE_NAMES};
pub use compare::{
    are_compatible, are_equal, contains_type_variable, extract_type_variables, is_subtype,
    type_variable_name,
};
