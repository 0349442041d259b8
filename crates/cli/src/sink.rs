//! Sink that writes units as files under one directory

use std::fs;
use std::path::{Path, PathBuf};

use implgen_core::{Error, Result, SourceSink};
use tracing::debug;

#[derive(Debug)]
pub struct DirectorySink {
    root: PathBuf,
    written: Vec<PathBuf>,
    unchanged: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            written: Vec::new(),
            unchanged: Vec::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files whose content changed in this sink's lifetime
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// Files left alone because they already held the same text
    pub fn unchanged(&self) -> &[PathBuf] {
        &self.unchanged
    }
}

impl SourceSink for DirectorySink {
    fn add_source(&mut self, identifier: &str, text: &str) -> Result<()> {
        if identifier.is_empty()
            || identifier.contains(['/', '\\'])
            || identifier.starts_with('.')
        {
            return Err(Error::SinkError(format!(
                "{identifier:?} is not a valid file name"
            )));
        }

        let path = self.root.join(identifier);
        if fs::read_to_string(&path).is_ok_and(|existing| existing == text) {
            debug!("Unchanged: {}", path.display());
            self.unchanged.push(path);
            return Ok(());
        }

        fs::write(&path, text)?;
        debug!("Wrote {}", path.display());
        self.written.push(path);
        Ok(())
    }
}
