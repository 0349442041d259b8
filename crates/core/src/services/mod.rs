//! Concrete implementations of the interface traits
//!
//! [`SemanticModel`] answers type-system queries over a parsed
//! [`crate::model::SourceModel`]; [`CollectingSink`] keeps emitted units in
//! memory.

pub mod collecting_sink;
pub mod semantic_model;
pub mod type_binder;
pub mod well_known;

pub use collecting_sink::CollectingSink;
pub use semantic_model::SemanticModel;
pub use type_binder::{BindingScope, DeclarationIndex, TypeBinder};
pub use well_known::KnownTypes;
