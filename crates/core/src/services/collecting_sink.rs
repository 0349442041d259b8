//! In-memory source sink

use std::collections::BTreeMap;

use crate::{
    error::{Error, Result},
    interfaces::SourceSink,
};

/// Keeps every emitted unit in memory, in emission order.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    sources: Vec<(String, String)>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sources(&self) -> &[(String, String)] {
        &self.sources
    }

    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.sources
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, text)| text.as_str())
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.sources.iter().map(|(id, _)| id.as_str()).collect()
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.sources.into_iter().collect()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl SourceSink for CollectingSink {
    fn add_source(&mut self, identifier: &str, text: &str) -> Result<()> {
        if self.get(identifier).is_some() {
            return Err(Error::SinkError(format!(
                "A source named {identifier} was already added"
            )));
        }
        self.sources.push((identifier.to_string(), text.to_string()));
        Ok(())
    }
}
