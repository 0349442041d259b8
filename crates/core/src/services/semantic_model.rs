//! `TypeSystemProvider` over a [`SourceModel`]

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use super::{
    type_binder::{BindingScope, DeclarationIndex, TypeBinder},
    well_known::KnownTypes,
};
use crate::{
    error::SynthesisError,
    interfaces::{MemberSymbol, TypeSystemProvider},
    model::{DeclarationId, SourceModel, TypeDeclaration},
    types::{
        DeclarationKind, MarkerLookup, MarkerSpec, MarkerUsage, Parameter, ResolvedType,
        TypeRef, TypeRefKind, TypeSyntax,
    },
    utils::identifiers::is_identifier,
};

pub struct SemanticModel {
    model: SourceModel,
    index: DeclarationIndex,
    known: KnownTypes,
}

impl SemanticModel {
    pub fn new(model: SourceModel) -> Self {
        Self::with_known_types(model, &BTreeMap::new())
    }

    pub fn with_known_types(model: SourceModel, known_types: &BTreeMap<String, String>) -> Self {
        let index = DeclarationIndex::build(&model.declarations);
        Self {
            model,
            index,
            known: KnownTypes::with_extra(known_types),
        }
    }

    pub fn model(&self) -> &SourceModel {
        &self.model
    }

    fn binder(&self) -> TypeBinder<'_> {
        TypeBinder::new(&self.index, &self.known)
    }

    fn lookup(&self, reference: &TypeRef) -> Vec<&TypeDeclaration> {
        if reference.kind != TypeRefKind::Named {
            return Vec::new();
        }
        self.index
            .lookup(reference.namespace.as_deref(), &reference.name, reference.arity())
            .iter()
            .filter_map(|id| self.model.get(*id))
            .collect()
    }

    fn collect_members(
        &self,
        interface: &TypeRef,
        visited: &mut HashSet<String>,
        members: &mut Vec<MemberSymbol>,
    ) -> Result<(), SynthesisError> {
        match interface.kind {
            TypeRefKind::Named => {}
            TypeRefKind::Keyword | TypeRefKind::TypeParameter | TypeRefKind::Tuple => {
                return Err(SynthesisError::NotAnInterface(interface.to_string()));
            }
            TypeRefKind::Unresolved | TypeRefKind::Opaque => {
                return Err(SynthesisError::UnresolvedInterface(interface.to_string()));
            }
        }

        let declarations = self.lookup(interface);
        if declarations.is_empty() {
            return Err(SynthesisError::UnresolvedInterface(interface.to_string()));
        }
        if declarations
            .iter()
            .any(|declaration| declaration.kind != DeclarationKind::Interface)
        {
            return Err(SynthesisError::NotAnInterface(interface.to_string()));
        }
        if !visited.insert(interface.display_qualified()) {
            return Ok(());
        }

        let substitutions: HashMap<String, TypeRef> = declarations[0]
            .type_parameters
            .iter()
            .cloned()
            .zip(interface.args.iter().cloned())
            .collect();
        let binder = self.binder();

        for declaration in &declarations {
            let scope = BindingScope::for_declaration(declaration);
            for member in &declaration.members {
                let member_scope = scope.clone().with_type_parameters(&member.type_parameters);
                let bind = |syntax: &TypeSyntax| {
                    binder
                        .bind(syntax, &member_scope)
                        .substitute(&substitutions)
                };
                members.push(MemberSymbol {
                    name: member.name.clone(),
                    kind: member.kind,
                    is_static: member.is_static,
                    type_parameters: member.type_parameters.clone(),
                    return_type: member.return_type.as_ref().map(bind),
                    parameters: member
                        .parameters
                        .iter()
                        .map(|parameter| Parameter {
                            name: parameter.name.clone(),
                            ty: bind(&parameter.ty),
                            modifier: parameter.modifier.clone(),
                            default_value: parameter.default_value.clone(),
                        })
                        .collect(),
                    declaring_interface: interface.clone(),
                });
            }
        }

        for declaration in &declarations {
            let scope = BindingScope::for_declaration(declaration);
            for base in &declaration.base_types {
                let base = binder.bind(base, &scope).substitute(&substitutions);
                if let Err(e) = self.collect_members(&base, visited, members) {
                    debug!("Skipping base interface {} of {}: {}", base, interface, e);
                }
            }
        }

        Ok(())
    }
}

impl TypeSystemProvider for SemanticModel {
    fn declarations(&self) -> &[TypeDeclaration] {
        &self.model.declarations
    }

    fn resolve_declaration(&self, id: DeclarationId) -> Option<ResolvedType> {
        let declaration = self.model.get(id)?;
        if declaration.malformed || !declaration.kind.accepts_marker() {
            return None;
        }
        let names_valid = is_identifier(&declaration.name)
            && declaration
                .containing_types
                .iter()
                .all(|containing| is_identifier(&containing.name));
        if !names_valid {
            debug!("Declaration {:?} has an invalid name", declaration.name);
            return None;
        }

        Some(ResolvedType {
            namespace: declaration.namespace.clone().filter(|ns| !ns.is_empty()),
            containing_types: declaration.containing_types.clone(),
            name: declaration.name.clone(),
            type_parameters: declaration.type_parameters.clone(),
            kind: declaration.kind,
            declarations: vec![id],
        })
    }

    fn find_markers(&self, id: DeclarationId, marker: &MarkerSpec) -> MarkerLookup {
        let Some(declaration) = self.model.get(id) else {
            return MarkerLookup::NotFound;
        };
        let binder = self.binder();
        let scope = BindingScope::for_declaration(declaration);

        let mut usages = Vec::new();
        for attribute in &declaration.attributes {
            if !marker.matches(&attribute.name) {
                continue;
            }
            if attribute.type_arguments.is_empty() {
                usages.push(MarkerUsage::Bare);
            } else {
                usages.extend(
                    attribute
                        .type_arguments
                        .iter()
                        .map(|argument| MarkerUsage::Parameterized(binder.bind(argument, &scope))),
                );
            }
        }

        if usages.is_empty() {
            MarkerLookup::NotFound
        } else {
            MarkerLookup::Found(usages)
        }
    }

    fn interface_members(&self, interface: &TypeRef) -> Result<Vec<MemberSymbol>, SynthesisError> {
        let mut members = Vec::new();
        let mut visited = HashSet::new();
        self.collect_members(interface, &mut visited, &mut members)?;
        Ok(members)
    }

    fn find_declaration(&self, reference: &TypeRef) -> Vec<&TypeDeclaration> {
        self.lookup(reference)
    }
}
