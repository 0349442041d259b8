//! Candidate selection from declaration syntax alone

use std::collections::HashSet;

use tracing::debug;

use crate::{
    interfaces::TypeSystemProvider,
    model::{DeclarationId, TypeDeclaration},
    types::MarkerSpec,
};

/// True when the declaration can carry the marker and one of its attributes names it
pub fn is_candidate(declaration: &TypeDeclaration, marker: &MarkerSpec) -> bool {
    declaration.kind.accepts_marker()
        && declaration
            .attributes
            .iter()
            .any(|attribute| marker.matches(&attribute.name))
}

/// Declarations carrying the marker, in input order, each id at most once
pub fn select_candidates<P>(provider: &P, marker: &MarkerSpec) -> Vec<DeclarationId>
where
    P: TypeSystemProvider + ?Sized,
{
    let mut seen = HashSet::new();
    let candidates: Vec<DeclarationId> = provider
        .declarations()
        .iter()
        .filter(|declaration| is_candidate(declaration, marker))
        .map(|declaration| declaration.id)
        .filter(|id| seen.insert(*id))
        .collect();

    debug!(
        "Selected {} of {} declarations carrying [{}]",
        candidates.len(),
        provider.declarations().len(),
        marker.short_name()
    );
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{AttributeSyntax, SourceModel},
        services::SemanticModel,
        types::DeclarationKind,
    };

    #[test]
    fn test_selects_marked_classes_records_and_structs() {
        let marker = AttributeSyntax::generic("AddImplementation", "IGreeter");
        let semantic = SemanticModel::new(SourceModel::new(vec![
            TypeDeclaration::new(DeclarationKind::Class, "Plain"),
            TypeDeclaration::new(DeclarationKind::Class, "Widget").with_attribute(marker.clone()),
            TypeDeclaration::new(DeclarationKind::Interface, "IMarked")
                .with_attribute(marker.clone()),
            TypeDeclaration::new(DeclarationKind::RecordStruct, "Money")
                .with_attribute(AttributeSyntax::new("Common.AddImplementationAttribute")),
            TypeDeclaration::new(DeclarationKind::Struct, "Point")
                .with_attribute(AttributeSyntax::new("Serializable")),
            TypeDeclaration::new(DeclarationKind::Record, "Receipt").with_attribute(marker),
        ]));

        let candidates = select_candidates(&semantic, &MarkerSpec::default());
        assert_eq!(
            candidates,
            vec![DeclarationId(1), DeclarationId(3), DeclarationId(5)]
        );
    }

    #[test]
    fn test_custom_marker_name() {
        let semantic = SemanticModel::new(SourceModel::new(vec![
            TypeDeclaration::new(DeclarationKind::Class, "Widget")
                .with_attribute(AttributeSyntax::generic("AddImplementation", "IGreeter")),
            TypeDeclaration::new(DeclarationKind::Class, "Gadget")
                .with_attribute(AttributeSyntax::generic("Implements", "IGreeter")),
        ]));

        let candidates = select_candidates(&semantic, &MarkerSpec::new("Implements"));
        assert_eq!(candidates, vec![DeclarationId(1)]);
    }
}
