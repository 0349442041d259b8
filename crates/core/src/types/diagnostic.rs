use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::SynthesisError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticScope {
    /// The whole unit degraded to a comment
    Type,
    /// One member slot degraded to a comment
    Member(String),
}

/// A failure that was absorbed into a generated unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub scope: DiagnosticScope,
    pub message: String,
    /// Innermost frame first
    #[serde(default)]
    pub trace: Vec<String>,
    /// Header of the no-value stub written after a degraded member's comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_stub: Option<String>,
}

impl Diagnostic {
    pub fn for_type(error: &SynthesisError) -> Self {
        Self {
            scope: DiagnosticScope::Type,
            message: error.to_string(),
            trace: Vec::new(),
            fallback_stub: None,
        }
    }

    pub fn for_member(member: impl Into<String>, error: &SynthesisError) -> Self {
        Self {
            scope: DiagnosticScope::Member(member.into()),
            message: error.to_string(),
            trace: Vec::new(),
            fallback_stub: None,
        }
    }

    pub fn with_fallback_stub(mut self, header: Option<String>) -> Self {
        self.fallback_stub = header;
        self
    }

    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.trace.push(frame.into());
        self
    }

    pub fn is_type_level(&self) -> bool {
        self.scope == DiagnosticScope::Type
    }

    /// The diagnostic as a block comment, one entry per output line.
    pub fn comment_lines(&self) -> Vec<String> {
        let mut lines = vec!["/*".to_string()];
        lines.extend(self.message.lines().map(escape_comment));
        lines.extend(
            self.trace
                .iter()
                .map(|frame| format!("   at {}", escape_comment(frame))),
        );
        lines.push("*/".to_string());
        lines
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.scope {
            DiagnosticScope::Type => write!(f, "{}", self.message),
            DiagnosticScope::Member(member) => write!(f, "{member}: {}", self.message),
        }
    }
}

fn escape_comment(text: &str) -> String {
    text.replace("*/", "* /")
}
