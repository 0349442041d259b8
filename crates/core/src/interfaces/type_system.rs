//! Type-system provider interface
//!
//! The pipeline never inspects source directly; everything semantic is a
//! query against this trait.

use serde::{Deserialize, Serialize};

use crate::{
    error::SynthesisError,
    model::{DeclarationId, MemberKind, TypeDeclaration},
    types::{MarkerLookup, MarkerSpec, Parameter, ResolvedType, TypeRef},
};

/// A member of an interface with every type reference bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSymbol {
    pub name: String,
    pub kind: MemberKind,
    pub is_static: bool,
    pub type_parameters: Vec<String>,
    pub return_type: Option<TypeRef>,
    pub parameters: Vec<Parameter>,
    /// Interface that declares the member; differs from the queried one for inherited members
    pub declaring_interface: TypeRef,
}

impl MemberSymbol {
    /// Ordinary instance method: not static, not an operator, accessor or constructor
    pub fn is_ordinary_instance_method(&self) -> bool {
        self.kind == MemberKind::Method && !self.is_static
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.declaring_interface, self.name)
    }
}

/// Read-only semantic view over one pass's declarations.
pub trait TypeSystemProvider {
    /// Every type declaration visible to the pass, in source order
    fn declarations(&self) -> &[TypeDeclaration];

    /// Bind a declaration to its type identity; `None` when it cannot be bound
    fn resolve_declaration(&self, id: DeclarationId) -> Option<ResolvedType>;

    /// Marker instances attached directly to the declaration, with bound type arguments
    fn find_markers(&self, id: DeclarationId, marker: &MarkerSpec) -> MarkerLookup;

    /// Members visible on an interface, inherited ones included
    fn interface_members(
        &self,
        interface: &TypeRef,
    ) -> std::result::Result<Vec<MemberSymbol>, SynthesisError>;

    /// Declarations (partial parts included) that define the referenced type
    fn find_declaration(&self, reference: &TypeRef) -> Vec<&TypeDeclaration>;
}

