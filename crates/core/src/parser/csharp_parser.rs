use std::path::{Path, PathBuf};

use tracing::debug;
use tree_sitter::Parser;

use super::declaration_collector::{CollectedFile, DeclarationCollector};
use crate::{
    error::{Error, Result},
    model::SourceModel,
};

/// One C# file handed to the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: Option<PathBuf>,
    pub text: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            text: text.into(),
        }
    }

    /// Source text with no backing file
    pub fn inline(text: impl Into<String>) -> Self {
        Self {
            path: None,
            text: text.into(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(path, text))
    }
}

pub struct CSharpParser {
    parser: Parser,
}

impl CSharpParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_c_sharp::LANGUAGE.into())
            .map_err(|e| Error::TreeSitterError(format!("Failed to set language: {e}")))?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str) -> Result<tree_sitter::Tree> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| Error::ParseError("Failed to parse source code".to_string()))
    }

    pub fn collect_declarations(
        &mut self,
        source: &str,
        file_path: Option<&Path>,
    ) -> Result<CollectedFile> {
        let tree = self.parse(source)?;
        if tree.root_node().has_error() {
            debug!(
                "Syntax errors in {}",
                file_path.map_or_else(|| "<inline>".to_string(), |p| p.display().to_string())
            );
        }
        Ok(DeclarationCollector::new(source, file_path).collect(&tree))
    }

    /// Parse every file and merge the result into one model. `global using`
    /// directives from any file apply to the declarations of all files.
    pub fn build_model(&mut self, files: &[SourceFile]) -> Result<SourceModel> {
        let mut declarations = Vec::new();
        let mut global_usings: Vec<String> = Vec::new();
        for file in files {
            let collected = self.collect_declarations(&file.text, file.path.as_deref())?;
            declarations.extend(collected.declarations);
            for namespace in collected.global_usings {
                if !global_usings.contains(&namespace) {
                    global_usings.push(namespace);
                }
            }
        }

        for declaration in &mut declarations {
            for namespace in &global_usings {
                if !declaration.usings.contains(namespace) {
                    declaration.usings.push(namespace.clone());
                }
            }
        }

        debug!(
            "Built declaration model from {} files: {} declarations",
            files.len(),
            declarations.len()
        );
        Ok(SourceModel::new(declarations))
    }
}
