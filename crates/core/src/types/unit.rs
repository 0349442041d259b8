use serde::{Deserialize, Serialize};

use super::diagnostic::Diagnostic;

/// The emitted text for one annotated type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedUnit {
    /// Collision-free name handed to the host sink (`Demo.Widget[T].g.cs`)
    pub identifier: String,
    /// Qualified name of the owning type
    pub type_name: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl GeneratedUnit {
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// True when the whole body was replaced by a diagnostic comment
    pub fn is_degenerate(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_type_level)
    }
}
