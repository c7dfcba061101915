//! Immutable symbol tables (component D).
//!
//! A `TypeContext` is three maps (variables, functions, types) plus an
//! optional parent. Every `with_*` method returns a new context that
//! shares the parent and any untouched maps; nested scopes (blocks,
//! lambdas, for-loops, match arms) are modeled by `child_scope`, whose
//! lookups fall back to the parent when a name isn't bound locally.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tl_types::{Type, TypeScheme};

#[derive(Clone, Debug)]
pub struct FunctionSignature {
    pub type_parameters: Vec<String>,
    pub parameter_types: Vec<Type>,
    pub return_type: Type,
}

#[derive(Clone, Debug)]
pub struct UnionVariant {
    pub name: String,
    pub fields: Vec<Type>,
}

#[derive(Clone, Debug)]
pub enum TypeDefinition {
    Union { type_parameters: Vec<String>, variants: Vec<UnionVariant> },
}

impl TypeDefinition {
    pub fn find_variant(&self, name: &str) -> Option<&UnionVariant> {
        match self {
            TypeDefinition::Union { variants, .. } => variants.iter().find(|v| v.name == name),
        }
    }
}

#[derive(Clone, Debug)]
pub struct VariableBinding {
    pub scheme: TypeScheme,
    pub mutable: bool,
}

#[derive(Clone, Debug, Default)]
struct Scope {
    variables: FxHashMap<String, VariableBinding>,
    functions: FxHashMap<String, FunctionSignature>,
    types: FxHashMap<String, TypeDefinition>,
}

#[derive(Clone, Debug)]
pub struct TypeContext {
    scope: Rc<Scope>,
    parent: Option<Rc<TypeContext>>,
}

impl TypeContext {
    pub fn empty() -> Self {
        Self { scope: Rc::new(Scope::default()), parent: None }
    }

    /// The root context, seeded with the primitive types and the built-in
    /// polymorphic functions.
    pub fn with_builtins() -> Self {
        let mut ctx = Self::empty();
        for name in ["println", "emptyList", "singletonList", "listOf", "listOf2", "listOf3", "listOf4"] {
            let arity = match name {
                "emptyList" => 0,
                "listOf2" => 2,
                "listOf3" => 3,
                "listOf4" => 4,
                _ => 1,
            };
            let param = Type::named("T");
            let sig = FunctionSignature {
                type_parameters: vec!["T".to_string()],
                parameter_types: match name {
                    "println" => vec![param.clone()],
                    "emptyList" => vec![],
                    _ => std::iter::repeat(param.clone()).take(arity.max(1)).collect(),
                },
                return_type: if name == "println" {
                    Type::unit()
                } else {
                    Type::generic("List", vec![param])
                },
            };
            ctx = ctx.with_function(name, sig);
        }
        ctx
    }

    pub fn child_scope(&self) -> Self {
        Self { scope: Rc::new(Scope::default()), parent: Some(Rc::new(self.clone())) }
    }

    fn with_scope_mut(&self, f: impl FnOnce(&mut Scope)) -> Self {
        let mut scope = (*self.scope).clone();
        f(&mut scope);
        Self { scope: Rc::new(scope), parent: self.parent.clone() }
    }

    pub fn with_variable(&self, name: impl Into<String>, ty: Type, mutable: bool) -> Self {
        let name = name.into();
        self.with_scope_mut(|scope| {
            scope.variables.insert(name, VariableBinding { scheme: TypeScheme::monomorphic(ty), mutable });
        })
    }

    pub fn with_variable_scheme(&self, name: impl Into<String>, scheme: TypeScheme, mutable: bool) -> Self {
        let name = name.into();
        self.with_scope_mut(|scope| {
            scope.variables.insert(name, VariableBinding { scheme, mutable });
        })
    }

    pub fn with_function(&self, name: impl Into<String>, sig: FunctionSignature) -> Self {
        let name = name.into();
        self.with_scope_mut(|scope| {
            scope.functions.insert(name, sig);
        })
    }

    pub fn with_type(&self, name: impl Into<String>, def: TypeDefinition) -> Self {
        let name = name.into();
        self.with_scope_mut(|scope| {
            scope.types.insert(name, def);
        })
    }

    pub fn lookup_variable(&self, name: &str) -> Option<&VariableBinding> {
        if let Some(v) = self.scope.variables.get(name) {
            return Some(v);
        }
        self.parent.as_ref().and_then(|p| p.lookup_variable(name))
    }

    pub fn lookup_function(&self, name: &str) -> Option<&FunctionSignature> {
        if let Some(f) = self.scope.functions.get(name) {
            return Some(f);
        }
        self.parent.as_ref().and_then(|p| p.lookup_function(name))
    }

    pub fn lookup_type(&self, name: &str) -> Option<&TypeDefinition> {
        if let Some(t) = self.scope.types.get(name) {
            return Some(t);
        }
        self.parent.as_ref().and_then(|p| p.lookup_type(name))
    }

    /// Searches every visible union type definition for a variant with this
    /// name, returning `(union_name, type_parameters, variant)`.
    pub fn find_constructor(&self, name: &str) -> Option<(&str, &[String], &UnionVariant)> {
        for (type_name, def) in self.all_types() {
            if let TypeDefinition::Union { type_parameters, .. } = def {
                if let Some(variant) = def.find_variant(name) {
                    return Some((type_name, type_parameters, variant));
                }
            }
        }
        None
    }

    fn all_types(&self) -> Vec<(&str, &TypeDefinition)> {
        let mut out: Vec<(&str, &TypeDefinition)> =
            self.scope.types.iter().map(|(k, v)| (k.as_str(), v)).collect();
        if let Some(parent) = &self.parent {
            out.extend(parent.all_types());
        }
        out
    }
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_scope_sees_parent_bindings() {
        let root = TypeContext::empty().with_variable("x", Type::int(), false);
        let child = root.child_scope();
        assert!(child.lookup_variable("x").is_some());
    }

    #[test]
    fn shadowing_is_by_name_in_local_scope() {
        let root = TypeContext::empty().with_variable("x", Type::int(), false);
        let child = root.child_scope().with_variable("x", Type::string(), false);
        let binding = child.lookup_variable("x").unwrap();
        assert!(tl_types::are_equal(&binding.scheme.ty, &Type::string()));
        let parent_binding = root.lookup_variable("x").unwrap();
        assert!(tl_types::are_equal(&parent_binding.scheme.ty, &Type::int()));
    }

    #[test]
    fn builtins_resolve() {
        let ctx = TypeContext::with_builtins();
        assert!(ctx.lookup_function("listOf").is_some());
    }
}
