//! The checker's output representation: a program with every top-level
//! declaration's inferred type attached, for callers (e.g. a downstream
//! code generator or language server) that want typed results rather than
//! just pass/fail.

use tl_types::Type;

/// One function's checked signature, with parameter and return types fully
/// resolved (no leftover unsolved fresh variables).
#[derive(Clone, Debug)]
pub struct TypedFunction {
    pub name: String,
    pub parameter_types: Vec<Type>,
    pub return_type: Type,
    pub body_type: Type,
}

/// One top-level `val`/`var` binding's inferred type.
#[derive(Clone, Debug)]
pub struct TypedBinding {
    pub name: String,
    pub ty: Type,
    pub mutable: bool,
}

/// The result of successfully checking a whole program.
#[derive(Clone, Debug, Default)]
pub struct TypedProgram {
    pub functions: Vec<TypedFunction>,
    pub bindings: Vec<TypedBinding>,
}

impl TypedProgram {
    pub fn new() -> Self {
        Self::default()
    }
}
