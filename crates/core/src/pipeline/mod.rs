//! The generation pipeline
//!
//! Stages run in order: [`selector`] picks marked declarations, [`resolver`]
//! binds and merges them, [`introspector`] turns each target interface into a
//! contract, [`synthesizer`] renders the unit and [`emitter`] hands it to the
//! host. [`Generator`] drives one pass over a provider.

pub mod emitter;
pub mod generator;
pub mod introspector;
pub mod resolver;
pub mod selector;
pub mod source_builder;
pub mod synthesizer;

pub use emitter::{EmissionController, EmissionSummary, unit_identifier};
pub use generator::{CancellationToken, GenerationReport, Generator, input_fingerprint};
pub use introspector::{ContractOutcome, Introspector, classify};
pub use resolver::{AnnotatedType, resolve_candidates};
pub use selector::{is_candidate, select_candidates};
pub use source_builder::SourceBuilder;
pub use synthesizer::{UnitSource, synthesize};
