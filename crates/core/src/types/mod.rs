pub mod contract;
pub mod diagnostic;
pub mod namespace;
pub mod resolved;
pub mod signature;
pub mod type_ref;
pub mod type_syntax;
pub mod unit;

// Re-export commonly used types
pub use contract::{InterfaceContract, MemberOutcome};
pub use diagnostic::{Diagnostic, DiagnosticScope};
pub use namespace::{NamespaceSet, is_global_namespace};
pub use resolved::{
    ContainingType, DeclarationKind, MarkerLookup, MarkerSpec, MarkerUsage, ResolvedType,
};
pub use signature::{Parameter, ResultShape, Signature};
pub use type_ref::{TypeRef, TypeRefKind, is_keyword_type};
pub use type_syntax::{TupleElement, TypeSyntax};
pub use unit::GeneratedUnit;
