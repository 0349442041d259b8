//! Unit identifiers and delivery to the host sink

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    interfaces::SourceSink,
    types::{GeneratedUnit, ResolvedType},
};

/// `Demo.Outer.Widget<T, U>` → `Demo.Outer.Widget[T, U].g.cs`
pub fn unit_identifier(resolved: &ResolvedType, extension: &str) -> String {
    let name = resolved.qualified_name().replace('<', "[").replace('>', "]");
    format!("{name}{extension}")
}

/// Outcome of handing one batch to the sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmissionSummary {
    pub emitted: Vec<String>,
    pub duplicates: Vec<String>,
    /// `(identifier, error message)` for units the sink refused
    pub sink_failures: Vec<(String, String)>,
}

pub struct EmissionController<'s, S: SourceSink + ?Sized> {
    sink: &'s mut S,
    seen: HashSet<String>,
    summary: EmissionSummary,
}

impl<'s, S: SourceSink + ?Sized> EmissionController<'s, S> {
    pub fn new(sink: &'s mut S) -> Self {
        Self {
            sink,
            seen: HashSet::new(),
            summary: EmissionSummary::default(),
        }
    }

    /// Forward a unit unless its identifier was already used in this batch.
    /// A sink error is recorded and does not stop later units.
    pub fn emit(&mut self, unit: &GeneratedUnit) {
        if !self.seen.insert(unit.identifier.clone()) {
            warn!("Skipping duplicate unit {}", unit.identifier);
            self.summary.duplicates.push(unit.identifier.clone());
            return;
        }

        match self.sink.add_source(&unit.identifier, &unit.text) {
            Ok(()) => {
                debug!("Emitted {}", unit.identifier);
                self.summary.emitted.push(unit.identifier.clone());
            }
            Err(e) => {
                warn!("Sink rejected {}: {}", unit.identifier, e);
                self.summary
                    .sink_failures
                    .push((unit.identifier.clone(), e.to_string()));
            }
        }
    }

    pub fn emit_all<'u>(mut self, units: impl IntoIterator<Item = &'u GeneratedUnit>) -> EmissionSummary {
        for unit in units {
            self.emit(unit);
        }
        self.finish()
    }

    pub fn finish(self) -> EmissionSummary {
        self.summary
    }
}
