//! Syntax-level declaration model
//!
//! A [`SourceModel`] is the read-only set of type declarations a pass works
//! on. The C# front end in [`crate::parser`] produces one from source text;
//! other hosts can deserialize one from JSON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    error::{Error, Result},
    impl_case_insensitive_deserialize,
    types::{ContainingType, DeclarationKind, TypeSyntax},
};

/// Position of a declaration inside its [`SourceModel`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DeclarationId(pub usize);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceModel {
    #[serde(default)]
    pub declarations: Vec<TypeDeclaration>,
}

impl SourceModel {
    pub fn new(declarations: Vec<TypeDeclaration>) -> Self {
        let mut model = Self::default();
        for declaration in declarations {
            model.push(declaration);
        }
        model
    }

    /// Add a declaration, assigning it the next id
    pub fn push(&mut self, mut declaration: TypeDeclaration) -> DeclarationId {
        let id = DeclarationId(self.declarations.len());
        declaration.id = id;
        self.declarations.push(declaration);
        id
    }

    pub fn extend(&mut self, declarations: impl IntoIterator<Item = TypeDeclaration>) {
        for declaration in declarations {
            self.push(declaration);
        }
    }

    pub fn get(&self, id: DeclarationId) -> Option<&TypeDeclaration> {
        self.declarations.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let parsed: SourceModel = serde_json::from_str(json)?;
        // Ids in hand-written models are not trusted
        Ok(Self::new(parsed.declarations))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents).map_err(|e| {
            Error::ParseError(format!(
                "Failed to read declaration model {}: {e}",
                path.display()
            ))
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One class, record, struct or interface declaration as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    #[serde(default)]
    pub id: DeclarationId,
    pub kind: DeclarationKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containing_types: Vec<ContainingType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeSyntax>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub base_types: Vec<TypeSyntax>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<MemberDeclaration>,
    /// `using` namespaces in effect for the declaration
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub usings: Vec<String>,
    /// Source text of the declaration, used for cache fingerprints
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Set by the front end when the declaration cannot be bound
    #[serde(default)]
    pub malformed: bool,
}

impl TypeDeclaration {
    pub fn new(kind: DeclarationKind, name: impl Into<String>) -> Self {
        Self {
            id: DeclarationId::default(),
            kind,
            name: name.into(),
            namespace: None,
            containing_types: Vec::new(),
            type_parameters: Vec::new(),
            attributes: Vec::new(),
            base_types: Vec::new(),
            members: Vec::new(),
            usings: Vec::new(),
            text: String::new(),
            file: None,
            malformed: false,
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_attribute(mut self, attribute: AttributeSyntax) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_member(mut self, member: MemberDeclaration) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_using(mut self, namespace: impl Into<String>) -> Self {
        self.usings.push(namespace.into());
        self
    }

    pub fn with_base(mut self, base: impl Into<TypeSyntax>) -> Self {
        self.base_types.push(base.into());
        self
    }

    pub fn with_type_parameters(mut self, parameters: &[&str]) -> Self {
        self.type_parameters = parameters.iter().map(|p| p.to_string()).collect();
        self
    }

    /// Name including containing types, without type parameters (`Outer.Widget`)
    pub fn nested_name(&self) -> String {
        let mut parts: Vec<&str> = self
            .containing_types
            .iter()
            .map(|containing| containing.name.as_str())
            .collect();
        parts.push(&self.name);
        parts.join(".")
    }
}

/// An attribute as written: `[AddImplementation<IGreeter>]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSyntax {
    /// Attribute name without type arguments, possibly qualified
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_arguments: Vec<TypeSyntax>,
}

impl AttributeSyntax {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_arguments: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, argument: impl Into<TypeSyntax>) -> Self {
        Self {
            name: name.into(),
            type_arguments: vec![argument.into()],
        }
    }

    /// Build from the written name, e.g. `AddImplementation<IGreeter>`
    pub fn from_written(text: &str) -> Self {
        match TypeSyntax::parse(text) {
            TypeSyntax::Named { name, args, .. } => Self {
                name,
                type_arguments: args,
            },
            other => Self::new(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Method,
    Operator,
    Conversion,
    Constructor,
    Destructor,
    Property,
    Indexer,
    Event,
    Field,
}

impl_case_insensitive_deserialize!(
    MemberKind,
    Method => "method",
    Operator => "operator",
    Conversion => "conversion",
    Constructor => "constructor",
    Destructor => "destructor",
    Property => "property",
    Indexer => "indexer",
    Event => "event",
    Field => "field"
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDeclaration {
    pub name: String,
    pub kind: MemberKind,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<TypeSyntax>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterDeclaration>,
}

impl MemberDeclaration {
    pub fn method(name: impl Into<String>, return_type: impl Into<TypeSyntax>) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Method,
            is_static: false,
            type_parameters: Vec::new(),
            return_type: Some(return_type.into()),
            parameters: Vec::new(),
        }
    }

    pub fn of_kind(kind: MemberKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            is_static: false,
            type_parameters: Vec::new(),
            return_type: None,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, name: &str, ty: impl Into<TypeSyntax>) -> Self {
        self.parameters.push(ParameterDeclaration::new(name, ty));
        self
    }

    pub fn with_type_parameters(mut self, parameters: &[&str]) -> Self {
        self.type_parameters = parameters.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn into_static(mut self) -> Self {
        self.is_static = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSyntax,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ParameterDeclaration {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeSyntax>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifier: None,
            default_value: None,
        }
    }
}
