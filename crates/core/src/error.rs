use std::io;

/// Errors that can occur during implgen operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Tree-sitter error: {0}")]
    TreeSitterError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Sink error: {0}")]
    SinkError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for implgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised while turning one annotated type into source.
///
/// These never leave the unit they belong to: the synthesizer converts them
/// into [`crate::types::Diagnostic`] values that end up as comments in the
/// generated text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SynthesisError {
    #[error("Method {method} must have a Task return type")]
    NotAwaitable { method: String },

    #[error("Method {method} returns {return_type}, which has more than one type argument")]
    AmbiguousResult { method: String, return_type: String },

    #[error("Interface {0} could not be resolved")]
    UnresolvedInterface(String),

    #[error("{0} is not an interface")]
    NotAnInterface(String),

    #[error("Cannot compose implements clause: {0}")]
    InvalidImplements(String),

    #[error("Cannot render member {member}: {reason}")]
    InvalidMember { member: String, reason: String },
}
