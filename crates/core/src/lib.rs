//! implgen-core - Source generation of explicit interface implementations
//!
//! This crate provides functionality to:
//! - Parse C# source files into a declaration model
//! - Find types marked with `[AddImplementation<TInterface>]` and bind the
//!   interfaces they name
//! - Synthesize a partial declaration implementing every interface member
//!   as an explicit async stub
//! - Cache generated units between passes and hand them to a host sink
pub mod cache;
pub mod config;
pub mod error;
pub mod interfaces;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod services;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{Error, Result, SynthesisError};
pub use types::*;

// Re-export main API components
pub use cache::GenerationCache;
pub use config::Config;
pub use interfaces::{SourceSink, TypeSystemProvider};
pub use model::{SourceModel, TypeDeclaration};
pub use parser::{CSharpParser, SourceFile};
pub use pipeline::{CancellationToken, GenerationReport, Generator};
pub use services::{CollectingSink, SemanticModel};
