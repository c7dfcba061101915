//! `Constraint` and `ConstraintSet`.

use tl_common::Span;
use tl_types::{Type, TypeScheme, TypeVar};

#[derive(Clone, Debug)]
pub enum Constraint {
    /// Requires `left ~ right`.
    Equality { left: Type, right: Type, span: Span },
    /// Requires `sub <: sup`.
    Subtype { sub: Type, sup: Type, span: Span },
    /// Requires `tv` to be an instantiation of `scheme`.
    Instance { tv: TypeVar, scheme: TypeScheme, span: Span },
}

impl Constraint {
    pub fn equality(left: Type, right: Type, span: Span) -> Self {
        Constraint::Equality { left, right, span }
    }

    pub fn subtype(sub: Type, sup: Type, span: Span) -> Self {
        Constraint::Subtype { sub, sup, span }
    }

    pub fn instance(tv: TypeVar, scheme: TypeScheme, span: Span) -> Self {
        Constraint::Instance { tv, scheme, span }
    }

    pub fn span(&self) -> Span {
        match self {
            Constraint::Equality { span, .. }
            | Constraint::Subtype { span, .. }
            | Constraint::Instance { span, .. } => *span,
        }
    }
}

/// An ordered, deduplication-free collection of constraints. Insertion
/// order is preserved so that solving order, and therefore error order,
/// is deterministic for a given program.
#[derive(Clone, Debug, Default)]
pub struct ConstraintSet {
    items: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn of(constraint: Constraint) -> Self {
        Self { items: vec![constraint] }
    }

    pub fn add(&mut self, constraint: Constraint) {
        self.items.push(constraint);
    }

    pub fn merge(&mut self, other: ConstraintSet) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Constraint> {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl FromIterator<Constraint> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect() }
    }
}
