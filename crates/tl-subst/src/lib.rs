//! Immutable substitutions (component C).
//!
//! A `Substitution` maps type-variable ids to types. Every operation
//! returns a new value; nothing is mutated in place. `apply` chases chains
//! transitively so that a substitution produced by [`Substitution::compose`]
//! is idempotent: applying it twice gives the same result as applying it
//! once.

use rustc_hash::{FxHashMap, FxHashSet};
use tl_types::{Type, TypeVar};

#[derive(Clone, Debug, Default)]
pub struct Substitution {
    map: FxHashMap<String, Type>,
}

impl Substitution {
    pub fn empty() -> Self {
        Self { map: FxHashMap::default() }
    }

    pub fn single(v: TypeVar, ty: Type) -> Self {
        let mut map = FxHashMap::default();
        map.insert(v.0, ty);
        Self { map }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Adds or overwrites a single binding. Unlike `compose`, this does not
    /// propagate the new binding into the existing entries' values; callers
    /// that need that should use `compose` with a `Substitution::single`.
    pub fn extend(&self, v: TypeVar, ty: Type) -> Self {
        let mut map = self.map.clone();
        map.insert(v.0, ty);
        Self { map }
    }

    pub fn remove(&self, vars: &FxHashSet<TypeVar>) -> Self {
        let map = self.map.iter().filter(|(k, _)| !vars.contains(&TypeVar::new(k.as_str()))).map(|(k, v)| (k.clone(), v.clone())).collect();
        Self { map }
    }

    pub fn restrict_to(&self, vars: &FxHashSet<TypeVar>) -> Self {
        let map = self.map.iter().filter(|(k, _)| vars.contains(&TypeVar::new(k.as_str()))).map(|(k, v)| (k.clone(), v.clone())).collect();
        Self { map }
    }

    /// Applies this substitution to `ty`, chasing chains to a fixpoint so
    /// the result contains no variable bound by this substitution.
    pub fn apply(&self, ty: &Type) -> Type {
        if self.map.is_empty() {
            return ty.clone();
        }
        if let Some(name) = tl_types::type_variable_name(ty) {
            if let Some(bound) = self.map.get(name) {
                if tl_types::type_variable_name(bound) == Some(name) {
                    // A variable bound to itself; avoid infinite recursion.
                    return bound.clone();
                }
                return self.apply(bound);
            }
            return ty.clone();
        }
        match ty {
            Type::Generic { name, args, span } => Type::Generic {
                name: name.clone(),
                args: args.iter().map(|a| self.apply(a)).collect(),
                span: *span,
            },
            Type::Union { name, type_args, span } => Type::Union {
                name: name.clone(),
                type_args: type_args.iter().map(|a| self.apply(a)).collect(),
                span: *span,
            },
            Type::Nullable { base, span } => {
                Type::Nullable { base: Box::new(self.apply(base)), span: *span }
            }
            Type::Tuple { elems, span } => {
                Type::Tuple { elems: elems.iter().map(|e| self.apply(e)).collect(), span: *span }
            }
            Type::Function { params, ret, span } => Type::Function {
                params: params.iter().map(|p| self.apply(p)).collect(),
                ret: Box::new(self.apply(ret)),
                span: *span,
            },
            other => other.clone(),
        }
    }

    /// `self.compose(other)` returns `s` such that for every type `t`,
    /// `s.apply(t) == self.apply(other.apply(t))`.
    pub fn compose(&self, other: &Substitution) -> Substitution {
        let mut map: FxHashMap<String, Type> =
            other.map.iter().map(|(k, v)| (k.clone(), self.apply(v))).collect();
        for (k, v) in &self.map {
            map.entry(k.clone()).or_insert_with(|| v.clone());
        }
        Substitution { map }
    }

    pub fn get(&self, v: &TypeVar) -> Option<&Type> {
        self.map.get(&v.0)
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tl_types::Type;

    #[test]
    fn apply_empty_is_identity() {
        let s = Substitution::empty();
        let t = Type::generic("List", vec![Type::int()]);
        assert!(tl_types::are_equal(&s.apply(&t), &t));
    }

    #[test]
    fn apply_chases_chains() {
        let s = Substitution::empty()
            .extend(TypeVar::new("a"), Type::var(TypeVar::new("b")))
            .extend(TypeVar::new("b"), Type::int());
        let resolved = s.apply(&Type::var(TypeVar::new("a")));
        assert!(tl_types::are_equal(&resolved, &Type::int()));
    }

    #[test]
    fn apply_is_idempotent() {
        let s = Substitution::single(TypeVar::new("a"), Type::int());
        let once = s.apply(&Type::var(TypeVar::new("a")));
        let twice = s.apply(&once);
        assert!(tl_types::are_equal(&once, &twice));
    }

    #[test]
    fn compose_matches_sequential_application() {
        let s1 = Substitution::single(TypeVar::new("b"), Type::int());
        let s2 = Substitution::single(TypeVar::new("a"), Type::var(TypeVar::new("b")));
        let composed = s1.compose(&s2);
        let direct = s1.apply(&s2.apply(&Type::var(TypeVar::new("a"))));
        let via_compose = composed.apply(&Type::var(TypeVar::new("a")));
        assert!(tl_types::are_equal(&direct, &via_compose));
    }

    #[test]
    fn compose_is_associative() {
        let s1 = Substitution::single(TypeVar::new("c"), Type::double());
        let s2 = Substitution::single(TypeVar::new("b"), Type::var(TypeVar::new("c")));
        let s3 = Substitution::single(TypeVar::new("a"), Type::var(TypeVar::new("b")));
        let left = s1.compose(&s2).compose(&s3);
        let right = s1.compose(&s2.compose(&s3));
        let t = Type::var(TypeVar::new("a"));
        assert!(tl_types::are_equal(&left.apply(&t), &right.apply(&t)));
    }
}
