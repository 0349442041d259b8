use serde::{Deserialize, Serialize};

use super::namespace::NamespaceSet;
use super::type_ref::TypeRef;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// `ref`, `out`, `in`, `params`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            modifier: None,
            default_value: None,
        }
    }

    /// `ref Customer customer = default`
    pub fn render(&self) -> String {
        let mut rendered = String::new();
        if let Some(modifier) = &self.modifier {
            rendered.push_str(modifier);
            rendered.push(' ');
        }
        rendered.push_str(&format!("{} {}", self.ty, self.name));
        if let Some(default_value) = &self.default_value {
            rendered.push_str(" = ");
            rendered.push_str(default_value);
        }
        rendered
    }
}

/// What a member hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultShape {
    VoidLike,
    Value(TypeRef),
    /// Task-like result; `None` is a bare completion signal
    AsyncValue(Option<TypeRef>),
}

impl ResultShape {
    pub fn is_async(&self) -> bool {
        matches!(self, ResultShape::AsyncValue(_))
    }

    pub fn carries_value(&self) -> bool {
        matches!(
            self,
            ResultShape::Value(_) | ResultShape::AsyncValue(Some(_))
        )
    }
}

/// A method contract taken from an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeRef,
    pub result: ResultShape,
    /// The interface that declares the member, which may be a base of the annotated one
    pub declaring_interface: TypeRef,
    pub namespaces: NamespaceSet,
}

impl Signature {
    pub fn new(
        name: impl Into<String>,
        type_parameters: Vec<String>,
        parameters: Vec<Parameter>,
        return_type: TypeRef,
        result: ResultShape,
        declaring_interface: TypeRef,
    ) -> Self {
        let namespaces = return_type
            .namespaces()
            .into_iter()
            .chain(parameters.iter().flat_map(|p| p.ty.namespaces()))
            .collect();
        Self {
            name: name.into(),
            type_parameters,
            parameters,
            return_type,
            result,
            declaring_interface,
            namespaces,
        }
    }

    pub fn parameter_list(&self) -> String {
        self.parameters
            .iter()
            .map(Parameter::render)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `Find<T>` or `Find`
    pub fn method_name(&self) -> String {
        if self.type_parameters.is_empty() {
            self.name.clone()
        } else {
            format!("{}<{}>", self.name, self.type_parameters.join(", "))
        }
    }
}
