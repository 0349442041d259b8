//! Candidate resolution and partial-declaration merging

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::{
    interfaces::TypeSystemProvider,
    model::DeclarationId,
    types::{MarkerLookup, MarkerSpec, MarkerUsage, ResolvedType, TypeRef},
};

/// A resolved type with every marker usage found on its declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedType {
    pub resolved: ResolvedType,
    pub usages: Vec<MarkerUsage>,
}

impl AnnotatedType {
    /// Target interfaces in annotation order, duplicates kept
    pub fn interfaces(&self) -> Vec<TypeRef> {
        MarkerLookup::Found(self.usages.clone()).interfaces()
    }

    pub fn qualified_name(&self) -> String {
        self.resolved.qualified_name()
    }
}

/// Resolve candidates to types. Candidates the provider cannot bind are
/// dropped; partial declarations of one type merge into the first one seen.
pub fn resolve_candidates<P>(
    provider: &P,
    candidates: &[DeclarationId],
    marker: &MarkerSpec,
) -> Vec<AnnotatedType>
where
    P: TypeSystemProvider + ?Sized,
{
    let mut resolved_types: Vec<AnnotatedType> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for &id in candidates {
        let Some(resolved) = provider.resolve_declaration(id) else {
            debug!("Dropping candidate {:?}: declaration could not be resolved", id);
            continue;
        };
        let usages = match provider.find_markers(id, marker) {
            MarkerLookup::Found(usages) => usages,
            MarkerLookup::NotFound => {
                debug!(
                    "Dropping candidate {}: no marker bound",
                    resolved.qualified_name()
                );
                continue;
            }
        };

        let qualified_name = resolved.qualified_name();
        match positions.get(&qualified_name) {
            Some(&position) => {
                debug!("Merging partial declaration of {}", qualified_name);
                let existing = &mut resolved_types[position];
                existing.resolved.declarations.extend(resolved.declarations);
                existing.usages.extend(usages);
            }
            None => {
                positions.insert(qualified_name, resolved_types.len());
                resolved_types.push(AnnotatedType { resolved, usages });
            }
        }
    }

    resolved_types
}
