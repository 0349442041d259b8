//! Interface member enumeration and result-shape classification

use tracing::{debug, warn};

use crate::{
    error::SynthesisError,
    interfaces::{MemberSymbol, TypeSystemProvider},
    types::{Diagnostic, InterfaceContract, Parameter, ResultShape, Signature, TypeRef, TypeRefKind},
};

/// An interface that could be enumerated, or the reason it could not.
pub type ContractOutcome = std::result::Result<InterfaceContract, Diagnostic>;

pub struct Introspector<'p, P: ?Sized> {
    provider: &'p P,
    allow_synchronous_members: bool,
}

impl<'p, P> Introspector<'p, P>
where
    P: TypeSystemProvider + ?Sized,
{
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            allow_synchronous_members: false,
        }
    }

    pub fn allow_synchronous_members(mut self, allow: bool) -> Self {
        self.allow_synchronous_members = allow;
        self
    }

    pub fn introspect(&self, interface: &TypeRef) -> ContractOutcome {
        let frame = format!("introspect {}", interface.display_qualified());
        let members = self.provider.interface_members(interface).map_err(|e| {
            warn!("Cannot enumerate {}: {}", interface, e);
            Diagnostic::for_type(&e).with_frame(frame.clone())
        })?;

        let outcomes = members
            .iter()
            .filter(|member| member.is_ordinary_instance_method())
            .map(|member| {
                self.signature(member).map_err(|e| {
                    warn!("Member {} degraded: {}", member.qualified_name(), e);
                    Diagnostic::for_member(member.qualified_name(), &e)
                        .with_fallback_stub(fallback_stub(member))
                        .with_frame(frame.clone())
                })
            })
            .collect::<Vec<_>>();

        debug!(
            "{} exposes {} of {} members as methods",
            interface,
            outcomes.len(),
            members.len()
        );
        Ok(InterfaceContract::new(interface.clone(), outcomes))
    }

    fn signature(&self, member: &MemberSymbol) -> std::result::Result<Signature, SynthesisError> {
        let return_type = member
            .return_type
            .clone()
            .filter(|ty| !ty.is_missing())
            .ok_or_else(|| SynthesisError::InvalidMember {
                member: member.name.clone(),
                reason: "the return type is missing".to_string(),
            })?;
        if let Some(parameter) = member.parameters.iter().find(|p| p.ty.is_missing()) {
            return Err(SynthesisError::InvalidMember {
                member: member.name.clone(),
                reason: format!("parameter {} has no type", parameter.name),
            });
        }

        let result = classify(&member.name, &return_type, self.allow_synchronous_members)?;
        Ok(Signature::new(
            member.name.clone(),
            member.type_parameters.clone(),
            member.parameters.clone(),
            return_type,
            result,
            member.declaring_interface.clone(),
        ))
    }
}

/// `<declared return> <Interface>.<Name>(<params>)` for a member that could
/// not be classified, or `None` when its types were never written.
fn fallback_stub(member: &MemberSymbol) -> Option<String> {
    let return_type = member.return_type.as_ref().filter(|ty| !ty.is_missing())?;
    if member.parameters.iter().any(|p| p.ty.is_missing()) {
        return None;
    }
    let name = if member.type_parameters.is_empty() {
        member.name.clone()
    } else {
        format!("{}<{}>", member.name, member.type_parameters.join(", "))
    };
    let parameters: Vec<String> = member.parameters.iter().map(Parameter::render).collect();
    Some(format!(
        "{return_type} {}.{name}({})",
        member.declaring_interface,
        parameters.join(", ")
    ))
}

/// Classify a declared return type. Every member is assumed asynchronous:
/// a named type (keywords included) is the awaitable wrapper and its single
/// type argument, if any, is the logical value. With synchronous members
/// allowed, keyword returns and non-named shapes are plain values instead.
pub fn classify(
    method: &str,
    return_type: &TypeRef,
    allow_synchronous_members: bool,
) -> std::result::Result<ResultShape, SynthesisError> {
    let keyword = return_type.kind == TypeRefKind::Keyword;
    if return_type.is_named_shape() && !(keyword && allow_synchronous_members) {
        return match return_type.args.as_slice() {
            [] => Ok(ResultShape::AsyncValue(None)),
            [value] => Ok(ResultShape::AsyncValue(Some(value.clone()))),
            _ => Err(SynthesisError::AmbiguousResult {
                method: method.to_string(),
                return_type: return_type.to_string(),
            }),
        };
    }

    if allow_synchronous_members {
        if return_type.is_void() {
            Ok(ResultShape::VoidLike)
        } else {
            Ok(ResultShape::Value(return_type.clone()))
        }
    } else {
        Err(SynthesisError::NotAwaitable {
            method: method.to_string(),
        })
    }
}
