//! C# source parsing using tree-sitter

pub mod csharp_parser;
pub mod declaration_collector;
pub mod utils;

// Re-export commonly used items
pub use csharp_parser::{CSharpParser, SourceFile};
pub use declaration_collector::{CollectedFile, DeclarationCollector};
