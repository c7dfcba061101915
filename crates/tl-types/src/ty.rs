//! The type language (component A) and type schemes.

use rustc_hash::FxHashSet;
use tl_common::Span;

/// The built-in primitive type names, in widening order where applicable.
pub const PRIMITIVE_NAMES: &[&str] =
    &["Int", "Long", "Float", "Double", "Boolean", "String", "Unit"];

/// An explicit type variable, identified by a string id (e.g. `"t12"`).
///
/// Ids are produced by [`crate::fresh_var`] and are guaranteed unique within
/// one counter lifetime; nothing about their textual form is load-bearing
/// beyond equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeVar(pub String);

impl TypeVar {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// A TL type. Every variant carries an optional [`Span`] pointing back at
/// the source construct that produced it; spans are never significant for
/// equality, subtyping, or unification and are only read by diagnostic
/// rendering.
#[derive(Clone, Debug)]
pub enum Type {
    /// A built-in primitive (`Int`, `Long`, `Float`, `Double`, `Boolean`,
    /// `String`, `Unit`).
    Primitive { name: &'static str, span: Span },
    /// A named reference: either a user type with no arguments, or — by
    /// convention — a type variable whose name is a single uppercase
    /// letter or `T` followed by digits. See [`crate::type_variable_name`].
    Named { name: String, span: Span },
    /// An explicit type variable produced by `fresh_var` or written
    /// directly by a component that isn't going through the naming
    /// convention.
    Var { var: TypeVar, span: Span },
    /// A parameterized reference, e.g. `List[Int]`.
    Generic { name: String, args: Vec<Type>, span: Span },
    /// A reference to a declared union (sum) type, instantiated with type
    /// arguments.
    Union { name: String, type_args: Vec<Type>, span: Span },
    /// `base` extended with a distinct null inhabitant.
    Nullable { base: Box<Type>, span: Span },
    /// A fixed-arity product. `Tuple([])` is distinct from `Unit`.
    Tuple { elems: Vec<Type>, span: Span },
    /// A function type.
    Function { params: Vec<Type>, ret: Box<Type>, span: Span },
}

impl Type {
    pub fn primitive(name: &'static str) -> Self {
        Type::Primitive { name, span: Span::dummy() }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Type::Named { name: name.into(), span: Span::dummy() }
    }

    pub fn var(v: TypeVar) -> Self {
        Type::Var { var: v, span: Span::dummy() }
    }

    pub fn generic(name: impl Into<String>, args: Vec<Type>) -> Self {
        Type::Generic { name: name.into(), args, span: Span::dummy() }
    }

    pub fn union(name: impl Into<String>, type_args: Vec<Type>) -> Self {
        Type::Union { name: name.into(), type_args, span: Span::dummy() }
    }

    pub fn nullable(base: Type) -> Self {
        Type::Nullable { base: Box::new(base), span: Span::dummy() }
    }

    pub fn tuple(elems: Vec<Type>) -> Self {
        Type::Tuple { elems, span: Span::dummy() }
    }

    pub fn function(params: Vec<Type>, ret: Type) -> Self {
        Type::Function { params, ret: Box::new(ret), span: Span::dummy() }
    }

    pub fn unit() -> Self {
        Type::primitive("Unit")
    }

    pub fn int() -> Self {
        Type::primitive("Int")
    }

    pub fn double() -> Self {
        Type::primitive("Double")
    }

    pub fn boolean() -> Self {
        Type::primitive("Boolean")
    }

    pub fn string() -> Self {
        Type::primitive("String")
    }

    pub fn span(&self) -> Span {
        match self {
            Type::Primitive { span, .. }
            | Type::Named { span, .. }
            | Type::Var { span, .. }
            | Type::Generic { span, .. }
            | Type::Union { span, .. }
            | Type::Nullable { span, .. }
            | Type::Tuple { span, .. }
            | Type::Function { span, .. } => *span,
        }
    }

    pub fn with_span(mut self, new_span: Span) -> Self {
        match &mut self {
            Type::Primitive { span, .. }
            | Type::Named { span, .. }
            | Type::Var { span, .. }
            | Type::Generic { span, .. }
            | Type::Union { span, .. }
            | Type::Nullable { span, .. }
            | Type::Tuple { span, .. }
            | Type::Function { span, .. } => *span = new_span,
        }
        self
    }
}

/// A polymorphic type signature: `forall quantified_vars. ty`.
///
/// A scheme with an empty `quantified_vars` set is monomorphic.
#[derive(Clone, Debug)]
pub struct TypeScheme {
    pub quantified_vars: FxHashSet<TypeVar>,
    pub ty: Type,
}

impl TypeScheme {
    pub fn monomorphic(ty: Type) -> Self {
        Self { quantified_vars: FxHashSet::default(), ty }
    }

    pub fn polymorphic(quantified_vars: FxHashSet<TypeVar>, ty: Type) -> Self {
        Self { quantified_vars, ty }
    }

    pub fn is_monomorphic(&self) -> bool {
        self.quantified_vars.is_empty()
    }
}
