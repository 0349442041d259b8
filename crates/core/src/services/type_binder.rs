//! Binds written type names to namespaces
//!
//! Lookup order for a simple name: keyword types, type parameters in scope,
//! declarations in the enclosing namespace chain (innermost first), then
//! declarations in `using` namespaces, then the well-known framework table.

use std::collections::HashMap;

use super::well_known::KnownTypes;
use crate::{
    model::{DeclarationId, TypeDeclaration},
    types::{TypeRef, TypeSyntax, is_keyword_type},
};

/// Declarations keyed by `(namespace, nested name, arity)`.
#[derive(Debug, Default)]
pub struct DeclarationIndex {
    entries: HashMap<(Option<String>, String, usize), Vec<DeclarationId>>,
}

impl DeclarationIndex {
    pub fn build<'a>(declarations: impl IntoIterator<Item = &'a TypeDeclaration>) -> Self {
        let mut index = Self::default();
        for declaration in declarations {
            let key = (
                declaration.namespace.clone().filter(|ns| !ns.is_empty()),
                declaration.nested_name(),
                declaration.type_parameters.len(),
            );
            index.entries.entry(key).or_default().push(declaration.id);
        }
        index
    }

    pub fn lookup(&self, namespace: Option<&str>, name: &str, arity: usize) -> &[DeclarationId] {
        self.entries
            .get(&(namespace.map(str::to_string), name.to_string(), arity))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, namespace: Option<&str>, name: &str, arity: usize) -> bool {
        !self.lookup(namespace, name, arity).is_empty()
    }
}

/// Names visible at the point a type is written.
#[derive(Debug, Clone, Default)]
pub struct BindingScope<'a> {
    pub namespace: Option<&'a str>,
    pub usings: &'a [String],
    pub type_parameters: Vec<&'a str>,
}

impl<'a> BindingScope<'a> {
    pub fn for_declaration(declaration: &'a TypeDeclaration) -> Self {
        let type_parameters = declaration
            .containing_types
            .iter()
            .flat_map(|containing| containing.type_parameters.iter())
            .chain(declaration.type_parameters.iter())
            .map(String::as_str)
            .collect();
        Self {
            namespace: declaration.namespace.as_deref().filter(|ns| !ns.is_empty()),
            usings: &declaration.usings,
            type_parameters,
        }
    }

    pub fn with_type_parameters(mut self, parameters: &'a [String]) -> Self {
        self.type_parameters
            .extend(parameters.iter().map(String::as_str));
        self
    }

    /// `A.B.C` → `A.B.C`, `A.B`, `A`, global
    fn namespace_chain(&self) -> Vec<Option<&'a str>> {
        let mut chain = Vec::new();
        let mut current = self.namespace;
        while let Some(ns) = current {
            chain.push(Some(ns));
            current = ns.rsplit_once('.').map(|(parent, _)| parent);
        }
        chain.push(None);
        chain
    }
}

pub struct TypeBinder<'a> {
    index: &'a DeclarationIndex,
    known: &'a KnownTypes,
}

impl<'a> TypeBinder<'a> {
    pub fn new(index: &'a DeclarationIndex, known: &'a KnownTypes) -> Self {
        Self { index, known }
    }

    pub fn bind(&self, syntax: &TypeSyntax, scope: &BindingScope<'_>) -> TypeRef {
        match syntax {
            TypeSyntax::Opaque(text) => TypeRef::opaque(text.clone()),
            TypeSyntax::Named { name, args, suffix } => {
                let args: Vec<TypeRef> = args.iter().map(|arg| self.bind(arg, scope)).collect();
                let bound = match name.rsplit_once('.') {
                    Some((qualifier, simple)) => self.bind_qualified(qualifier, simple, args, scope),
                    None => self.bind_simple(name, args, scope),
                };
                bound.with_suffix(suffix.clone())
            }
            TypeSyntax::Tuple { elements, suffix } => TypeRef::tuple(
                elements
                    .iter()
                    .map(|element| (self.bind(&element.ty, scope), element.name.clone()))
                    .collect(),
            )
            .with_suffix(suffix.clone()),
        }
    }

    fn bind_simple(&self, name: &str, args: Vec<TypeRef>, scope: &BindingScope<'_>) -> TypeRef {
        let arity = args.len();
        if arity == 0 && is_keyword_type(name) {
            return TypeRef::keyword(name);
        }
        if arity == 0 && scope.type_parameters.contains(&name) {
            return TypeRef::type_parameter(name);
        }

        let declared = scope
            .namespace_chain()
            .into_iter()
            .chain(scope.usings.iter().map(|u| Some(u.as_str())))
            .find(|ns| self.index.contains(*ns, name, arity));
        if let Some(namespace) = declared {
            return TypeRef::named(namespace, name, args);
        }

        match self.known.namespace_of(name, arity) {
            Some(namespace) => TypeRef::named(Some(namespace), name, args),
            None => TypeRef::unresolved(name, args),
        }
    }

    fn bind_qualified(
        &self,
        qualifier: &str,
        simple: &str,
        args: Vec<TypeRef>,
        scope: &BindingScope<'_>,
    ) -> TypeRef {
        let arity = args.len();

        // Namespace-qualified, absolute or relative to an enclosing namespace
        for enclosing in scope.namespace_chain() {
            let candidate = match enclosing {
                Some(ns) => format!("{ns}.{qualifier}"),
                None => qualifier.to_string(),
            };
            if self.index.contains(Some(candidate.as_str()), simple, arity) {
                return TypeRef::named(Some(candidate.as_str()), simple, args);
            }
        }

        // Nested type `Outer.Inner`
        let nested = format!("{qualifier}.{simple}");
        let container = scope
            .namespace_chain()
            .into_iter()
            .chain(scope.usings.iter().map(|u| Some(u.as_str())))
            .find(|ns| self.index.contains(*ns, &nested, arity));
        if let Some(namespace) = container {
            return TypeRef::named(namespace, nested, args);
        }

        if self.known.namespace_of(simple, arity) == Some(qualifier) {
            return TypeRef::named(Some(qualifier), simple, args);
        }

        // Keep the written form; it needs no import to stay valid
        TypeRef::unresolved(nested, args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::SourceModel,
        types::{DeclarationKind, TypeRefKind},
    };

    fn model() -> SourceModel {
        SourceModel::new(vec![
            TypeDeclaration::new(DeclarationKind::Class, "Customer").in_namespace("Shop.Models"),
            TypeDeclaration::new(DeclarationKind::Class, "Order").in_namespace("Shop"),
            TypeDeclaration::new(DeclarationKind::Class, "Global"),
            {
                let mut inner = TypeDeclaration::new(DeclarationKind::Class, "Line")
                    .in_namespace("Shop");
                inner.containing_types.push(crate::types::ContainingType {
                    name: "Order".to_string(),
                    kind: DeclarationKind::Class,
                    type_parameters: vec![],
                });
                inner
            },
        ])
    }

    fn bind(text: &str, namespace: Option<&str>, usings: &[String]) -> TypeRef {
        let model = model();
        let index = DeclarationIndex::build(&model.declarations);
        let known = KnownTypes::framework();
        let binder = TypeBinder::new(&index, &known);
        let scope = BindingScope {
            namespace,
            usings,
            type_parameters: vec!["T"],
        };
        binder.bind(&TypeSyntax::parse(text), &scope)
    }

    #[test]
    fn test_keyword_and_type_parameter() {
        assert_eq!(bind("string", None, &[]).kind, TypeRefKind::Keyword);
        assert_eq!(bind("string", None, &[]).namespace, None);
        let t = bind("T?", None, &[]);
        assert_eq!(t.kind, TypeRefKind::TypeParameter);
        assert_eq!(t.to_string(), "T?");
    }

    #[test]
    fn test_enclosing_namespace_chain() {
        let order = bind("Order", Some("Shop.Api.V1"), &[]);
        assert_eq!(order.namespace.as_deref(), Some("Shop"));
        assert_eq!(order.kind, TypeRefKind::Named);

        let global = bind("Global", Some("Shop"), &[]);
        assert_eq!(global.kind, TypeRefKind::Named);
        assert_eq!(global.namespace, None);
    }

    #[test]
    fn test_using_namespaces() {
        let usings = vec!["Shop.Models".to_string()];
        let customer = bind("Customer", Some("Shop.Api"), &usings);
        assert_eq!(customer.namespace.as_deref(), Some("Shop.Models"));

        let missing = bind("Customer", Some("Shop.Api"), &[]);
        assert_eq!(missing.kind, TypeRefKind::Unresolved);
        assert_eq!(missing.namespace, None);
    }

    #[test]
    fn test_well_known_types_and_arguments() {
        let usings = vec!["Shop.Models".to_string()];
        let task = bind("Task<List<Customer>>", Some("Shop"), &usings);
        assert_eq!(task.namespace.as_deref(), Some("System.Threading.Tasks"));
        assert_eq!(
            task.args[0].namespace.as_deref(),
            Some("System.Collections.Generic")
        );
        assert_eq!(
            task.args[0].args[0].namespace.as_deref(),
            Some("Shop.Models")
        );
    }

    #[test]
    fn test_qualified_names() {
        let absolute = bind("Shop.Models.Customer", None, &[]);
        assert_eq!(absolute.namespace.as_deref(), Some("Shop.Models"));
        assert_eq!(absolute.to_string(), "Customer");

        let relative = bind("Models.Customer", Some("Shop"), &[]);
        assert_eq!(relative.namespace.as_deref(), Some("Shop.Models"));

        let nested = bind("Order.Line", Some("Shop"), &[]);
        assert_eq!(nested.namespace.as_deref(), Some("Shop"));
        assert_eq!(nested.to_string(), "Order.Line");

        let framework = bind("System.IO.Stream", None, &[]);
        assert_eq!(framework.namespace.as_deref(), Some("System.IO"));

        let unknown = bind("Vendor.Sdk.Client", None, &[]);
        assert_eq!(unknown.kind, TypeRefKind::Unresolved);
        assert_eq!(unknown.to_string(), "Vendor.Sdk.Client");
    }

    #[test]
    fn test_tuple_elements_bind_through_scope() {
        let usings = vec!["Shop.Models".to_string()];
        let task = bind("Task<(Customer Buyer, List<T> Items)>", Some("Shop"), &usings);
        assert_eq!(task.kind, TypeRefKind::Named);
        assert_eq!(task.arity(), 1);

        let pair = &task.args[0];
        assert_eq!(pair.kind, TypeRefKind::Tuple);
        assert_eq!(pair.args[1].args[0].kind, TypeRefKind::TypeParameter);
        assert_eq!(pair.to_string(), "(Customer Buyer, List<T> Items)");
        assert_eq!(
            task.namespaces(),
            vec![
                "System.Threading.Tasks".to_string(),
                "Shop.Models".to_string(),
                "System.Collections.Generic".to_string(),
            ]
        );
    }
}
