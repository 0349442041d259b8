use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// C# keyword types. They bind to no namespace, so they never produce a `using`.
pub const KEYWORD_TYPES: &[&str] = &[
    "bool", "byte", "sbyte", "char", "decimal", "double", "float", "int", "uint", "nint", "nuint",
    "long", "ulong", "short", "ushort", "object", "string", "void", "dynamic",
];

pub fn is_keyword_type(name: &str) -> bool {
    KEYWORD_TYPES.contains(&name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeRefKind {
    /// A declared or well-known type with a known namespace (possibly global)
    Named,
    Keyword,
    TypeParameter,
    /// A name the provider could not bind; kept as written, contributes no namespace
    Unresolved,
    /// `(T1 a, T2 b)`; element types are the arguments
    Tuple,
    /// Syntax the front end could not break down (function pointers)
    Opaque,
}

/// A bound type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    /// Name as it should appear in minimally qualified output
    pub name: String,
    /// Containing namespace; `None` is the global namespace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub suffix: String,
    /// Tuple element names, parallel to `args`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub element_names: Vec<Option<String>>,
    pub kind: TypeRefKind,
}

impl TypeRef {
    pub fn named(namespace: Option<&str>, name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.filter(|ns| !ns.is_empty()).map(str::to_string),
            args,
            suffix: String::new(),
            element_names: Vec::new(),
            kind: TypeRefKind::Named,
        }
    }

    pub fn keyword(name: impl Into<String>) -> Self {
        Self::bare(name, TypeRefKind::Keyword)
    }

    pub fn type_parameter(name: impl Into<String>) -> Self {
        Self::bare(name, TypeRefKind::TypeParameter)
    }

    pub fn unresolved(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            args,
            ..Self::bare(name, TypeRefKind::Unresolved)
        }
    }

    pub fn opaque(text: impl Into<String>) -> Self {
        Self::bare(text, TypeRefKind::Opaque)
    }

    pub fn tuple(elements: Vec<(TypeRef, Option<String>)>) -> Self {
        let (args, element_names): (Vec<_>, Vec<_>) = elements.into_iter().unzip();
        Self {
            args,
            element_names,
            ..Self::bare("", TypeRefKind::Tuple)
        }
    }

    fn bare(name: impl Into<String>, kind: TypeRefKind) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            args: Vec::new(),
            suffix: String::new(),
            element_names: Vec::new(),
            kind,
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }

    pub fn is_void(&self) -> bool {
        self.kind == TypeRefKind::Keyword && self.name == "void" && self.suffix.is_empty()
    }

    /// No type was written at all
    pub fn is_missing(&self) -> bool {
        self.kind != TypeRefKind::Tuple && self.name.is_empty()
    }

    /// True for a named type (keywords included) that is neither an array
    /// nor a pointer, the only shape a Task-like result can take.
    pub fn is_named_shape(&self) -> bool {
        matches!(
            self.kind,
            TypeRefKind::Named | TypeRefKind::Unresolved | TypeRefKind::Keyword
        )
            && !self.suffix.contains('[')
            && !self.suffix.contains('*')
    }

    /// `Namespace.Name<Args>`, used for identities and unit identifiers
    pub fn display_qualified(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{ns}.{self}"),
            None => self.to_string(),
        }
    }

    /// Every namespace this reference touches: its own, then each generic
    /// argument's, recursively. Global-namespace entries are omitted.
    pub fn namespaces(&self) -> Vec<String> {
        self.namespace
            .iter()
            .cloned()
            .chain(self.args.iter().flat_map(TypeRef::namespaces))
            .collect()
    }

    /// Replace type parameters with the supplied arguments.
    pub fn substitute(&self, map: &HashMap<String, TypeRef>) -> TypeRef {
        if self.kind == TypeRefKind::TypeParameter {
            if let Some(replacement) = map.get(&self.name) {
                let mut replaced = replacement.clone();
                replaced.suffix.push_str(&self.suffix);
                return replaced;
            }
        }
        TypeRef {
            args: self.args.iter().map(|arg| arg.substitute(map)).collect(),
            ..self.clone()
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == TypeRefKind::Tuple {
            let elements: Vec<String> = self
                .args
                .iter()
                .enumerate()
                .map(|(i, ty)| match self.element_names.get(i).and_then(Option::as_ref) {
                    Some(name) => format!("{ty} {name}"),
                    None => ty.to_string(),
                })
                .collect();
            return write!(f, "({}){}", elements.join(", "), self.suffix);
        }
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            let rendered: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
            write!(f, "<{}>", rendered.join(", "))?;
        }
        write!(f, "{}", self.suffix)
    }
}
