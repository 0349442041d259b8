use serde::{Deserialize, Serialize};

use super::diagnostic::Diagnostic;
use super::namespace::NamespaceSet;
use super::signature::Signature;
use super::type_ref::TypeRef;

/// A member that was either converted to a signature or degraded to a diagnostic.
pub type MemberOutcome = std::result::Result<Signature, Diagnostic>;

/// An interface reference with the members a type must implement for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceContract {
    pub interface: TypeRef,
    pub members: Vec<MemberOutcome>,
}

impl InterfaceContract {
    pub fn new(interface: TypeRef, members: Vec<MemberOutcome>) -> Self {
        Self { interface, members }
    }

    pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
        self.members.iter().filter_map(|member| member.as_ref().ok())
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.members.iter().filter_map(|member| member.as_ref().err())
    }

    /// Namespaces of the interface reference itself and of every successful signature
    pub fn namespaces(&self) -> NamespaceSet {
        self.interface
            .namespaces()
            .into_iter()
            .chain(
                self.signatures()
                    .flat_map(|signature| signature.namespaces.iter().map(str::to_string)),
            )
            .collect()
    }
}
