//! One generation pass: select, resolve, introspect, synthesize, emit

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{
    emitter::{EmissionController, EmissionSummary, unit_identifier},
    introspector::{ContractOutcome, Introspector},
    resolver::{AnnotatedType, resolve_candidates},
    selector::select_candidates,
    synthesizer::synthesize,
};
use crate::{
    cache::{GenerationCache, fingerprint},
    config::Config,
    error::Result,
    interfaces::{SourceSink, TypeSystemProvider},
    model::TypeDeclaration,
    parser::{CSharpParser, SourceFile},
    services::SemanticModel,
    types::{DeclarationKind, GeneratedUnit, MarkerSpec},
};

/// Shared flag checked between candidates.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Units in candidate order
    pub units: Vec<GeneratedUnit>,
    /// Declarations carrying the marker
    pub candidates: usize,
    /// Candidates that resolved to no type or no bound marker
    pub dropped: usize,
    pub cache_hits: usize,
    pub cancelled: bool,
    /// Filled in when the units were handed to a sink
    pub emission: EmissionSummary,
}

impl GenerationReport {
    pub fn diagnostic_count(&self) -> usize {
        self.units.iter().map(|unit| unit.diagnostics.len()).sum()
    }
}

/// A type that still needs synthesis, with the digest of its inputs.
struct PendingType {
    annotated: AnnotatedType,
    fingerprint: String,
}

enum Slot {
    Cached(GeneratedUnit),
    Pending(PendingType),
}

pub struct Generator {
    config: Config,
    marker: MarkerSpec,
    cache: Option<GenerationCache>,
}

impl Generator {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let cache = if config.cache.enabled {
            let mut cache = GenerationCache::new(config.cache.capacity, config.cache.dir.clone());
            cache.load_from_disk()?;
            debug!("Generation cache ready with {} entries", cache.len());
            Some(cache)
        } else {
            None
        };

        Ok(Self {
            marker: config.marker_spec(),
            config,
            cache,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> Option<&GenerationCache> {
        self.cache.as_ref()
    }

    /// Parse C# sources into a provider bound with the configured extra types
    pub fn semantic_model(&self, files: &[SourceFile]) -> Result<SemanticModel> {
        let mut parser = CSharpParser::new()?;
        let model = parser.build_model(files)?;
        Ok(SemanticModel::with_known_types(
            model,
            &self.config.known_types,
        ))
    }

    /// Produce one unit per annotated type without emitting anything
    pub fn generate<P>(&mut self, provider: &P, token: &CancellationToken) -> GenerationReport
    where
        P: TypeSystemProvider + Sync + ?Sized,
    {
        let started = Instant::now();
        let candidates = select_candidates(provider, &self.marker);
        let annotated = resolve_candidates(provider, &candidates, &self.marker);
        let kept: usize = annotated
            .iter()
            .map(|annotated| annotated.resolved.declarations.len())
            .sum();
        let dropped = candidates.len().saturating_sub(kept);

        let mut report = GenerationReport {
            candidates: candidates.len(),
            dropped,
            ..GenerationReport::default()
        };

        let options = self.option_parts();
        let slots: Vec<Slot> = annotated
            .into_iter()
            .map(|annotated| {
                let fingerprint = input_fingerprint(provider, &annotated, &options);
                let cached = self
                    .cache
                    .as_mut()
                    .and_then(|cache| cache.get(&annotated.qualified_name(), &fingerprint));
                match cached {
                    Some(unit) => Slot::Cached(unit),
                    None => Slot::Pending(PendingType {
                        annotated,
                        fingerprint,
                    }),
                }
            })
            .collect();

        let produced: Vec<Option<(GeneratedUnit, Option<String>)>> = if self.config.parallel {
            slots
                .into_par_iter()
                .map(|slot| self.produce(provider, slot, token))
                .collect()
        } else {
            slots
                .into_iter()
                .map(|slot| self.produce(provider, slot, token))
                .collect()
        };

        for (unit, fresh) in produced.into_iter().flatten() {
            match fresh {
                Some(fingerprint) => {
                    if let Some(cache) = self.cache.as_mut() {
                        if let Err(e) = cache.insert(unit.clone(), fingerprint) {
                            warn!("Failed to cache {}: {}", unit.type_name, e);
                        }
                    }
                }
                None => report.cache_hits += 1,
            }
            report.units.push(unit);
        }

        report.cancelled = token.is_cancelled();
        if report.cancelled {
            warn!(
                "Generation cancelled after {} units",
                report.units.len()
            );
        }
        info!(
            "Generated {} units from {} candidates ({} dropped, {} cached, {} diagnostics) in {:?}",
            report.units.len(),
            report.candidates,
            report.dropped,
            report.cache_hits,
            report.diagnostic_count(),
            started.elapsed()
        );
        report
    }

    /// Generate and forward every unit to `sink`
    pub fn generate_into<P, S>(
        &mut self,
        provider: &P,
        sink: &mut S,
        token: &CancellationToken,
    ) -> GenerationReport
    where
        P: TypeSystemProvider + Sync + ?Sized,
        S: SourceSink + ?Sized,
    {
        let mut report = self.generate(provider, token);
        report.emission = EmissionController::new(sink).emit_all(&report.units);
        report
    }

    /// Parse, generate and emit in one call
    pub fn run<S>(
        &mut self,
        files: &[SourceFile],
        sink: &mut S,
        token: &CancellationToken,
    ) -> Result<GenerationReport>
    where
        S: SourceSink + ?Sized,
    {
        let semantic = self.semantic_model(files)?;
        Ok(self.generate_into(&semantic, sink, token))
    }

    /// `None` when cancelled before the slot was reached. The fingerprint is
    /// returned only for freshly synthesized units.
    fn produce<P>(
        &self,
        provider: &P,
        slot: Slot,
        token: &CancellationToken,
    ) -> Option<(GeneratedUnit, Option<String>)>
    where
        P: TypeSystemProvider + ?Sized,
    {
        if token.is_cancelled() {
            return None;
        }
        match slot {
            Slot::Cached(unit) => {
                debug!("Reusing cached unit for {}", unit.type_name);
                Some((unit, None))
            }
            Slot::Pending(pending) => {
                let unit = self.synthesize_unit(provider, &pending.annotated);
                Some((unit, Some(pending.fingerprint)))
            }
        }
    }

    fn synthesize_unit<P>(&self, provider: &P, annotated: &AnnotatedType) -> GeneratedUnit
    where
        P: TypeSystemProvider + ?Sized,
    {
        let introspector = Introspector::new(provider)
            .allow_synchronous_members(self.config.allow_synchronous_members);
        let contracts: Vec<ContractOutcome> = annotated
            .interfaces()
            .iter()
            .map(|interface| introspector.introspect(interface))
            .collect();
        let source = synthesize(annotated, &contracts);

        GeneratedUnit {
            identifier: unit_identifier(&annotated.resolved, &self.config.output_extension),
            type_name: annotated.qualified_name(),
            text: source.text,
            diagnostics: source.diagnostics,
        }
    }

    /// Options that change the text of a unit
    fn option_parts(&self) -> Vec<String> {
        let mut parts = vec![
            format!("marker={}", self.marker.short_name()),
            format!("extension={}", self.config.output_extension),
            format!("sync={}", self.config.allow_synchronous_members),
        ];
        parts.extend(
            self.config
                .known_types
                .iter()
                .map(|(name, namespace)| format!("known={name}={namespace}")),
        );
        parts
    }
}

/// Digest over the candidate's declarations, every interface declaration its
/// targets may reach through their base lists, and the output options.
/// Bases are matched by simple name and arity so the set is a superset of
/// what binding would pick.
pub fn input_fingerprint<P>(provider: &P, annotated: &AnnotatedType, options: &[String]) -> String
where
    P: TypeSystemProvider + ?Sized,
{
    let declarations = provider.declarations();
    let mut parts: Vec<String> = options.to_vec();
    parts.extend(
        annotated
            .resolved
            .declarations
            .iter()
            .filter_map(|id| declarations.get(id.0))
            .map(declaration_text),
    );

    let mut visited = HashSet::new();
    let mut pending: Vec<&TypeDeclaration> = annotated
        .interfaces()
        .iter()
        .flat_map(|interface| provider.find_declaration(interface))
        .collect();
    while let Some(declaration) = pending.pop() {
        if !visited.insert(declaration.id) {
            continue;
        }
        parts.push(declaration_text(declaration));
        for base in &declaration.base_types {
            pending.extend(declarations.iter().filter(|candidate| {
                candidate.kind == DeclarationKind::Interface
                    && candidate.name == base.simple_name()
                    && candidate.type_parameters.len() == base.arity()
            }));
        }
    }

    fingerprint(parts)
}

fn declaration_text(declaration: &TypeDeclaration) -> String {
    let body = if declaration.text.is_empty() {
        // Models loaded from JSON carry no source text
        serde_json::to_string(&(&declaration.members, &declaration.base_types, &declaration.attributes))
            .unwrap_or_default()
    } else {
        declaration.text.clone()
    };
    format!(
        "{}|{}|{}",
        declaration.namespace.as_deref().unwrap_or_default(),
        declaration.usings.join(","),
        body
    )
}
