//! Turns a resolved type and its interface contracts into C# text

use tracing::warn;

use super::{introspector::ContractOutcome, resolver::AnnotatedType, source_builder::SourceBuilder};
use crate::{
    error::SynthesisError,
    types::{Diagnostic, NamespaceSet, Signature, TypeRef, TypeRefKind},
};

/// Text of one unit plus every failure folded into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSource {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn synthesize(annotated: &AnnotatedType, contracts: &[ContractOutcome]) -> UnitSource {
    let type_name = annotated.qualified_name();
    let frame = format!("synthesize {type_name}");

    let mut failures: Vec<Diagnostic> = contracts
        .iter()
        .filter_map(|contract| contract.as_ref().err())
        .map(|diagnostic| diagnostic.clone().with_frame(frame.clone()))
        .collect();
    let implements = if failures.is_empty() {
        match implements_clause(&annotated.interfaces()) {
            Ok(clause) => clause,
            Err(e) => {
                failures.push(Diagnostic::for_type(&e).with_frame(frame.clone()));
                String::new()
            }
        }
    } else {
        String::new()
    };
    if !failures.is_empty() {
        warn!("{} degraded to a diagnostic unit", type_name);
        return degenerate(failures);
    }

    let resolved = &annotated.resolved;
    let mut builder = SourceBuilder::new();
    if let Some(namespace) = &resolved.namespace {
        builder.line(format!("namespace {namespace};")).blank_line();
    }
    for containing in &resolved.containing_types {
        builder.open_block(format!(
            "partial {} {}",
            containing.kind.keyword(),
            containing.display_name()
        ));
    }
    builder.open_block(format!(
        "partial {} {}{}",
        resolved.kind.keyword(),
        resolved.display_name(),
        implements
    ));

    let mut diagnostics = Vec::new();
    let mut first = true;
    for contract in contracts.iter().filter_map(|contract| contract.as_ref().ok()) {
        for member in &contract.members {
            if !first {
                builder.blank_line();
            }
            first = false;
            match member {
                Ok(signature) => write_stub(&mut builder, signature),
                Err(diagnostic) => {
                    let diagnostic = diagnostic.clone().with_frame(frame.clone());
                    builder.lines(diagnostic.comment_lines());
                    if let Some(header) = &diagnostic.fallback_stub {
                        builder.open_block(header).line("return;").close_block();
                    }
                    diagnostics.push(diagnostic);
                }
            }
        }
    }
    builder.close_all();

    let namespaces: NamespaceSet = contracts
        .iter()
        .filter_map(|contract| contract.as_ref().ok())
        .flat_map(|contract| {
            let mut namespaces: Vec<String> =
                contract.namespaces().iter().map(str::to_string).collect();
            namespaces.extend(
                contract
                    .signatures()
                    .flat_map(|signature| signature.declaring_interface.namespaces()),
            );
            namespaces
        })
        .collect();
    let mut head = vec!["#nullable enable".to_string(), String::new()];
    if !namespaces.is_empty() {
        head.extend(namespaces.using_directives());
        head.push(String::new());
    }
    builder.prepend(head);

    UnitSource {
        text: builder.finish(),
        diagnostics,
    }
}

/// ` : IFirst, ISecond<T>`, or nothing for a bare marker
fn implements_clause(interfaces: &[TypeRef]) -> Result<String, SynthesisError> {
    if interfaces.is_empty() {
        return Ok(String::new());
    }
    let mut rendered = Vec::with_capacity(interfaces.len());
    for interface in interfaces {
        let composable = matches!(interface.kind, TypeRefKind::Named | TypeRefKind::Unresolved)
            && interface.suffix.is_empty()
            && !interface.name.is_empty();
        if !composable {
            return Err(SynthesisError::InvalidImplements(format!(
                "{interface} cannot be used as a base interface"
            )));
        }
        rendered.push(interface.to_string());
    }
    Ok(format!(" : {}", rendered.join(", ")))
}

fn write_stub(builder: &mut SourceBuilder, signature: &Signature) {
    let modifier = if signature.result.is_async() { "async " } else { "" };
    builder.open_block(format!(
        "{}{} {}.{}({})",
        modifier,
        signature.return_type,
        signature.declaring_interface,
        signature.method_name(),
        signature.parameter_list()
    ));
    if signature.result.carries_value() {
        builder.line("return default;");
    } else {
        builder.line("return;");
    }
    builder.close_block();
}

/// The whole body replaced by the failures as comments
fn degenerate(failures: Vec<Diagnostic>) -> UnitSource {
    let mut builder = SourceBuilder::new();
    for (i, failure) in failures.iter().enumerate() {
        if i > 0 {
            builder.blank_line();
        }
        builder.lines(failure.comment_lines());
    }
    UnitSource {
        text: builder.finish(),
        diagnostics: failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        model::{AttributeSyntax, MemberDeclaration, SourceModel, TypeDeclaration},
        pipeline::{introspector::Introspector, resolver::resolve_candidates},
        services::SemanticModel,
        types::{ContainingType, DeclarationKind, MarkerSpec, MarkerUsage, ResolvedType},
    };

    fn run(declarations: Vec<TypeDeclaration>) -> UnitSource {
        let semantic = SemanticModel::new(SourceModel::new(declarations));
        let annotated = resolve_candidates(
            &semantic,
            &[crate::model::DeclarationId(0)],
            &MarkerSpec::default(),
        )
        .remove(0);
        let introspector = Introspector::new(&semantic);
        let contracts: Vec<ContractOutcome> = annotated
            .interfaces()
            .iter()
            .map(|interface| introspector.introspect(interface))
            .collect();
        synthesize(&annotated, &contracts)
    }

    fn widget(interfaces: &[&str]) -> TypeDeclaration {
        interfaces.iter().fold(
            TypeDeclaration::new(DeclarationKind::Class, "Widget")
                .in_namespace("Demo")
                .with_using("Demo.Contracts"),
            |declaration, interface| {
                declaration.with_attribute(AttributeSyntax::generic("AddImplementation", *interface))
            },
        )
    }

    fn greeter() -> TypeDeclaration {
        TypeDeclaration::new(DeclarationKind::Interface, "IGreeter")
            .in_namespace("Demo.Contracts")
            .with_member(
                MemberDeclaration::method("greet", "Task<string>").with_parameter("name", "string"),
            )
    }

    #[test]
    fn test_single_interface_unit() {
        let unit = run(vec![widget(&["IGreeter"]), greeter()]);
        assert!(unit.diagnostics.is_empty());
        insta::assert_snapshot!(unit.text, @r"
#nullable enable

using Demo.Contracts;
using System.Threading.Tasks;

namespace Demo;

partial class Widget : IGreeter
{
    async Task<string> IGreeter.greet(string name)
    {
        return default;
    }
}
");
    }

    #[test]
    fn test_same_member_name_on_two_interfaces() {
        let farewell = TypeDeclaration::new(DeclarationKind::Interface, "IFarewell")
            .in_namespace("Demo.Contracts")
            .with_member(MemberDeclaration::method("say", "Task"));
        let greeter = TypeDeclaration::new(DeclarationKind::Interface, "IGreeter")
            .in_namespace("Demo.Contracts")
            .with_member(MemberDeclaration::method("say", "Task"));

        let unit = run(vec![widget(&["IGreeter", "IFarewell"]), greeter, farewell]);
        insta::assert_snapshot!(unit.text, @r"
#nullable enable

using Demo.Contracts;
using System.Threading.Tasks;

namespace Demo;

partial class Widget : IGreeter, IFarewell
{
    async Task IGreeter.say()
    {
        return;
    }

    async Task IFarewell.say()
    {
        return;
    }
}
");
    }

    #[test]
    fn test_failing_member_becomes_comment_and_empty_stub() {
        let greeter = greeter().with_member(
            MemberDeclaration::method("Names", "string[]").with_parameter("limit", "int"),
        );
        let unit = run(vec![widget(&["IGreeter"]), greeter]);

        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.text.contains(
            "    }\n\n    /*\n    Method Names must have a Task return type\n       \
             at introspect Demo.Contracts.IGreeter\n       at synthesize Demo.Widget\n    */\n    \
             string[] IGreeter.Names(int limit)\n    {\n        return;\n    }\n}\n"
        ));
        assert!(unit.text.contains("async Task<string> IGreeter.greet(string name)"));
        assert_eq!(unit.text.matches('{').count(), unit.text.matches('}').count());
    }

    #[test]
    fn test_keyword_returns_are_async_without_value() {
        let ping = TypeDeclaration::new(DeclarationKind::Interface, "IPing")
            .in_namespace("Demo.Contracts")
            .with_member(MemberDeclaration::method("Ping", "void"));
        let unit = run(vec![widget(&["IPing"]), ping]);

        assert!(unit.diagnostics.is_empty());
        insta::assert_snapshot!(unit.text, @r"
#nullable enable

using Demo.Contracts;

namespace Demo;

partial class Widget : IPing
{
    async void IPing.Ping()
    {
        return;
    }
}
");
    }

    #[test]
    fn test_tuple_value_member() {
        let pairs = TypeDeclaration::new(DeclarationKind::Interface, "IPairs")
            .in_namespace("Demo.Contracts")
            .with_member(MemberDeclaration::method("Load", "Task<(int Id, string Name)>"));
        let unit = run(vec![widget(&["IPairs"]), pairs]);

        assert!(unit.diagnostics.is_empty());
        assert!(unit.text.contains(
            "    async Task<(int Id, string Name)> IPairs.Load()\n    {\n        return default;\n    }\n"
        ));
        assert!(unit.text.contains("using System.Threading.Tasks;"));
    }

    #[test]
    fn test_unresolved_interface_degrades_whole_unit() {
        let unit = run(vec![widget(&["IMissing"])]);
        assert_eq!(unit.diagnostics.len(), 1);
        assert!(unit.diagnostics[0].is_type_level());
        assert_eq!(
            unit.text,
            "/*\nInterface IMissing could not be resolved\n   \
             at introspect IMissing\n   at synthesize Demo.Widget\n*/\n"
        );
    }

    #[test]
    fn test_nested_generic_type_and_global_namespace() {
        let annotated = AnnotatedType {
            resolved: ResolvedType {
                namespace: None,
                containing_types: vec![ContainingType {
                    name: "Outer".to_string(),
                    kind: DeclarationKind::Struct,
                    type_parameters: vec!["TKey".to_string()],
                }],
                name: "Widget".to_string(),
                type_parameters: vec!["T".to_string()],
                kind: DeclarationKind::RecordStruct,
                declarations: vec![crate::model::DeclarationId(0)],
            },
            usages: vec![MarkerUsage::Bare],
        };

        let unit = synthesize(&annotated, &[]);
        assert_eq!(
            unit.text,
            "#nullable enable\n\npartial struct Outer<TKey>\n{\n    \
             partial record struct Widget<T>\n    {\n    }\n}\n"
        );
    }

    #[test]
    fn test_inherited_member_is_qualified_with_declaring_interface() {
        let repository = TypeDeclaration::new(DeclarationKind::Interface, "IRepository")
            .in_namespace("Data")
            .with_type_parameters(&["TEntity"])
            .with_member(MemberDeclaration::method("Get", "Task<TEntity>").with_parameter("id", "Guid"));
        let customers = TypeDeclaration::new(DeclarationKind::Interface, "ICustomers")
            .in_namespace("Demo.Contracts")
            .with_using("Data")
            .with_base("IRepository<Customer>");
        let customer = TypeDeclaration::new(DeclarationKind::Class, "Customer").in_namespace("Demo");

        let unit = run(vec![widget(&["ICustomers"]), repository, customers, customer]);
        assert!(
            unit.text
                .contains("async Task<Customer> IRepository<Customer>.Get(Guid id)")
        );
        for using in [
            "using Data;",
            "using Demo;",
            "using Demo.Contracts;",
            "using System;",
            "using System.Threading.Tasks;",
        ] {
            assert!(unit.text.contains(using), "missing {using}");
        }
    }

    #[test]
    fn test_implements_clause_rejects_arrays() {
        let error = implements_clause(&[TypeRef::named(None, "IGreeter", vec![]).with_suffix("[]")])
            .unwrap_err();
        assert!(matches!(error, SynthesisError::InvalidImplements(_)));
        assert_eq!(implements_clause(&[]), Ok(String::new()));
    }
}
