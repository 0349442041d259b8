//! Output interface
//!
//! Hosts receive each generated unit as an `(identifier, text)` pair and
//! decide how to persist it.

use crate::error::Result;

pub trait SourceSink {
    fn add_source(&mut self, identifier: &str, text: &str) -> Result<()>;
}
