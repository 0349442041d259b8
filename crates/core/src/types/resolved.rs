use serde::{Deserialize, Serialize};

use super::type_ref::TypeRef;
use crate::impl_case_insensitive_deserialize;
use crate::model::DeclarationId;

/// The declaration keyword of a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Class,
    Record,
    RecordStruct,
    Struct,
    Interface,
    Enum,
}

impl_case_insensitive_deserialize!(
    DeclarationKind,
    Class => "class",
    Record => "record",
    RecordStruct => "record_struct",
    Struct => "struct",
    Interface => "interface",
    Enum => "enum"
);

impl DeclarationKind {
    /// Kinds the marker may be attached to
    pub fn accepts_marker(self) -> bool {
        matches!(
            self,
            DeclarationKind::Class
                | DeclarationKind::Record
                | DeclarationKind::RecordStruct
                | DeclarationKind::Struct
        )
    }

    pub fn keyword(self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Record => "record",
            DeclarationKind::RecordStruct => "record struct",
            DeclarationKind::Struct => "struct",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Enum => "enum",
        }
    }
}

/// A type enclosing a nested declaration, outermost first in a chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContainingType {
    pub name: String,
    pub kind: DeclarationKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
}

impl ContainingType {
    pub fn display_name(&self) -> String {
        display_with_parameters(&self.name, &self.type_parameters)
    }
}

/// A declared type the pipeline generates a unit for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedType {
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containing_types: Vec<ContainingType>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    pub kind: DeclarationKind,
    /// Every partial declaration that contributed to this type
    pub declarations: Vec<DeclarationId>,
}

impl ResolvedType {
    /// `Widget<T>`
    pub fn display_name(&self) -> String {
        display_with_parameters(&self.name, &self.type_parameters)
    }

    /// `Demo.Outer.Widget<T>`, the identity used for deduplication, caching and unit names
    pub fn qualified_name(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(ns) = &self.namespace {
            parts.push(ns.clone());
        }
        parts.extend(self.containing_types.iter().map(ContainingType::display_name));
        parts.push(self.display_name());
        parts.join(".")
    }
}

fn display_with_parameters(name: &str, type_parameters: &[String]) -> String {
    if type_parameters.is_empty() {
        name.to_string()
    } else {
        format!("{}<{}>", name, type_parameters.join(", "))
    }
}

/// Describes which attribute names count as the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSpec {
    short_name: String,
}

impl MarkerSpec {
    pub fn new(short_name: impl Into<String>) -> Self {
        let short_name: String = short_name.into();
        let short_name = short_name
            .strip_suffix("Attribute")
            .map(str::to_string)
            .unwrap_or(short_name);
        Self { short_name }
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn base_name(&self) -> String {
        format!("{}Attribute", self.short_name)
    }

    /// Match on the rightmost name segment, in short or base form.
    /// `attribute_name` must not include type arguments.
    pub fn matches(&self, attribute_name: &str) -> bool {
        let simple = attribute_name
            .rsplit(['.', ':'])
            .next()
            .unwrap_or(attribute_name)
            .trim();
        simple == self.short_name || simple == self.base_name()
    }
}

impl Default for MarkerSpec {
    fn default() -> Self {
        Self::new("AddImplementation")
    }
}

/// One marker instance on a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerUsage {
    /// `[AddImplementation]`: metadata only, no target
    Bare,
    /// `[AddImplementation<IFoo>]`
    Parameterized(TypeRef),
}

/// Answer to a marker query against the type-system provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerLookup {
    Found(Vec<MarkerUsage>),
    NotFound,
}

impl MarkerLookup {
    pub fn interfaces(&self) -> Vec<TypeRef> {
        match self {
            MarkerLookup::Found(usages) => usages
                .iter()
                .filter_map(|usage| match usage {
                    MarkerUsage::Parameterized(interface) => Some(interface.clone()),
                    MarkerUsage::Bare => None,
                })
                .collect(),
            MarkerLookup::NotFound => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_matches_short_base_and_qualified_forms() {
        let marker = MarkerSpec::default();
        assert!(marker.matches("AddImplementation"));
        assert!(marker.matches("AddImplementationAttribute"));
        assert!(marker.matches("CustomCode.Common.AddImplementation"));
        assert!(marker.matches("global::CustomCode.Common.AddImplementationAttribute"));
        assert!(!marker.matches("AddImplementations"));
        assert!(!marker.matches("Serializable"));
    }

    #[test]
    fn test_marker_spec_accepts_base_form() {
        let marker = MarkerSpec::new("ImplementsAttribute");
        assert_eq!(marker.short_name(), "Implements");
        assert!(marker.matches("Implements"));
    }

    #[test]
    fn test_qualified_name_includes_containing_types_and_arity() {
        let resolved = ResolvedType {
            namespace: Some("Demo".to_string()),
            containing_types: vec![ContainingType {
                name: "Outer".to_string(),
                kind: DeclarationKind::Class,
                type_parameters: vec!["TKey".to_string()],
            }],
            name: "Widget".to_string(),
            type_parameters: vec!["T".to_string(), "U".to_string()],
            kind: DeclarationKind::Record,
            declarations: vec![DeclarationId(0)],
        };
        assert_eq!(resolved.qualified_name(), "Demo.Outer<TKey>.Widget<T, U>");
    }

    #[test]
    fn test_marker_lookup_skips_bare_usages() {
        let lookup = MarkerLookup::Found(vec![
            MarkerUsage::Bare,
            MarkerUsage::Parameterized(TypeRef::named(Some("Demo"), "IGreeter", vec![])),
        ]);
        assert_eq!(lookup.interfaces().len(), 1);
        assert!(MarkerLookup::NotFound.interfaces().is_empty());
    }

    #[test]
    fn test_declaration_kind_deserializes_case_insensitively() {
        let kind: DeclarationKind = serde_json::from_str("\"Record_Struct\"").unwrap();
        assert_eq!(kind, DeclarationKind::RecordStruct);
        assert!(kind.accepts_marker());
        assert!(!DeclarationKind::Interface.accepts_marker());
    }
}
