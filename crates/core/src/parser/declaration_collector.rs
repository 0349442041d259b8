//! Walks a C# syntax tree and builds [`TypeDeclaration`]s

use std::path::{Path, PathBuf};

use tracing::debug;
use tree_sitter::{Node, Tree};

use super::utils::{
    child_of_kind, compact, field_or_kind, has_modifier, node_text, type_parameter_names,
};
use crate::{
    model::{AttributeSyntax, MemberDeclaration, MemberKind, ParameterDeclaration, TypeDeclaration},
    types::{ContainingType, DeclarationKind, TypeSyntax},
    utils::identifiers::is_qualified_identifier,
};

const PARAMETER_MODIFIERS: &[&str] = &["this", "scoped", "ref", "out", "in", "readonly", "params"];

/// Declarations found in one file.
#[derive(Debug, Default, Clone)]
pub struct CollectedFile {
    pub declarations: Vec<TypeDeclaration>,
    /// `global using` namespaces; they apply to every file of a compilation
    pub global_usings: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct Scope {
    namespace: Option<String>,
    usings: Vec<String>,
    containing: Vec<ContainingType>,
}

pub struct DeclarationCollector<'s> {
    source: &'s str,
    file: Option<PathBuf>,
    collected: CollectedFile,
}

impl<'s> DeclarationCollector<'s> {
    pub fn new(source: &'s str, file: Option<&Path>) -> Self {
        Self {
            source,
            file: file.map(Path::to_path_buf),
            collected: CollectedFile::default(),
        }
    }

    pub fn collect(mut self, tree: &Tree) -> CollectedFile {
        self.visit_items(&tree.root_node(), Scope::default());

        let globals = self.collected.global_usings.clone();
        for declaration in &mut self.collected.declarations {
            for namespace in &globals {
                if !declaration.usings.contains(namespace) {
                    declaration.usings.push(namespace.clone());
                }
            }
        }
        self.collected
    }

    /// Compilation unit or namespace body. Using directives and file-scoped
    /// namespaces apply to the siblings that follow them.
    fn visit_items(&mut self, node: &Node, mut scope: Scope) {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.named_children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "using_directive" => self.handle_using(&child, &mut scope),
                "namespace_declaration" => {
                    let inner = self.enter_namespace(&child, &scope);
                    if let Some(body) = field_or_kind(&child, "body", "declaration_list") {
                        self.visit_items(&body, inner);
                    }
                }
                "file_scoped_namespace_declaration" => {
                    scope = self.enter_namespace(&child, &scope);
                    // Some grammar revisions nest the members inside the declaration
                    self.visit_items(&child, scope.clone());
                }
                "declaration_list" | "ERROR" => self.visit_items(&child, scope.clone()),
                kind if declaration_kind(kind).is_some() => self.handle_type(&child, &scope),
                _ => {}
            }
        }
    }

    fn handle_using(&mut self, node: &Node, scope: &mut Scope) {
        let text = node_text(node, self.source).trim().trim_end_matches(';');
        let (is_global, rest) = match text.strip_prefix("global") {
            Some(rest) if rest.starts_with(char::is_whitespace) => (true, rest.trim_start()),
            _ => (false, text),
        };
        let Some(rest) = rest.strip_prefix("using") else {
            return;
        };
        let rest = rest.trim();
        // Aliases and `using static` bring no namespace into scope
        if rest.contains('=') || rest.starts_with("static ") {
            return;
        }
        let namespace: String = rest.split_whitespace().collect();
        let namespace = namespace
            .strip_prefix("global::")
            .map(str::to_string)
            .unwrap_or(namespace);
        if !is_qualified_identifier(&namespace) {
            debug!("Ignoring using directive {:?}", text);
            return;
        }

        if is_global {
            if !self.collected.global_usings.contains(&namespace) {
                self.collected.global_usings.push(namespace);
            }
        } else if !scope.usings.contains(&namespace) {
            scope.usings.push(namespace);
        }
    }

    fn enter_namespace(&self, node: &Node, scope: &Scope) -> Scope {
        let name: String = node
            .child_by_field_name("name")
            .map(|name| node_text(&name, self.source).split_whitespace().collect())
            .unwrap_or_default();
        let namespace = match (&scope.namespace, name.is_empty()) {
            (_, true) => scope.namespace.clone(),
            (Some(outer), false) => Some(format!("{outer}.{name}")),
            (None, false) => Some(name),
        };
        Scope {
            namespace,
            usings: scope.usings.clone(),
            containing: Vec::new(),
        }
    }

    fn handle_type(&mut self, node: &Node, scope: &Scope) {
        let Some(mut kind) = declaration_kind(node.kind()) else {
            return;
        };
        if kind == DeclarationKind::Record && child_of_kind(node, "struct").is_some() {
            kind = DeclarationKind::RecordStruct;
        }

        let name_node = node
            .child_by_field_name("name")
            .filter(|name| !name.is_missing());
        let name = name_node
            .map(|name| node_text(&name, self.source).to_string())
            .unwrap_or_default();

        let mut declaration = TypeDeclaration::new(kind, name.clone());
        declaration.namespace = scope.namespace.clone();
        declaration.containing_types = scope.containing.clone();
        declaration.type_parameters = type_parameter_names(node, self.source);
        declaration.usings = scope.usings.clone();
        declaration.attributes = self.attributes(node);
        declaration.base_types = self.base_types(node);
        declaration.text = node_text(node, self.source).to_string();
        declaration.file = self.file.clone();
        declaration.malformed = name_node.is_none() || node.is_missing();

        let mut nested = Vec::new();
        if kind != DeclarationKind::Enum {
            if let Some(body) = field_or_kind(node, "body", "declaration_list") {
                let mut cursor = body.walk();
                for member in body.named_children(&mut cursor) {
                    if declaration_kind(member.kind()).is_some() {
                        nested.push(member);
                    } else {
                        declaration.members.extend(self.members(&member));
                    }
                }
            }
        }

        debug!(
            "Collected {} {} ({} members, {} nested types)",
            kind.keyword(),
            declaration.nested_name(),
            declaration.members.len(),
            nested.len()
        );

        let mut inner = scope.clone();
        inner.containing.push(ContainingType {
            name,
            kind,
            type_parameters: declaration.type_parameters.clone(),
        });
        self.collected.declarations.push(declaration);

        for child in nested {
            self.handle_type(&child, &inner);
        }
    }

    fn attributes(&self, node: &Node) -> Vec<AttributeSyntax> {
        let mut attributes = Vec::new();
        let mut cursor = node.walk();
        for list in node
            .children(&mut cursor)
            .filter(|child| child.kind() == "attribute_list")
        {
            let mut list_cursor = list.walk();
            for attribute in list
                .named_children(&mut list_cursor)
                .filter(|child| child.kind() == "attribute")
            {
                let name = attribute
                    .child_by_field_name("name")
                    .or_else(|| attribute.named_child(0));
                if let Some(name) = name {
                    attributes.push(AttributeSyntax::from_written(node_text(&name, self.source)));
                }
            }
        }
        attributes
    }

    fn base_types(&self, node: &Node) -> Vec<TypeSyntax> {
        let Some(bases) = child_of_kind(node, "base_list").or_else(|| child_of_kind(node, "record_base"))
        else {
            return Vec::new();
        };
        let mut cursor = bases.walk();
        bases
            .named_children(&mut cursor)
            .filter(|base| base.kind() != "argument_list")
            .filter_map(|base| {
                let ty = if base.kind() == "primary_constructor_base_type" {
                    base.child_by_field_name("type").or_else(|| base.named_child(0))?
                } else {
                    base
                };
                Some(TypeSyntax::parse(&compact(node_text(&ty, self.source))))
            })
            .collect()
    }

    fn members(&self, node: &Node) -> Vec<MemberDeclaration> {
        let source = self.source;
        let named = |kind: MemberKind, fallback: &str| {
            let name = node
                .child_by_field_name("name")
                .map(|name| node_text(&name, source).to_string())
                .unwrap_or_else(|| fallback.to_string());
            let mut member = MemberDeclaration::of_kind(kind, name);
            member.is_static = has_modifier(node, source, "static");
            member.return_type = node
                .child_by_field_name("type")
                .map(|ty| TypeSyntax::parse(&compact(node_text(&ty, source))));
            member
        };

        match node.kind() {
            "method_declaration" => self.method(node).into_iter().collect(),
            "operator_declaration" => vec![named(MemberKind::Operator, "operator")],
            "conversion_operator_declaration" => vec![named(MemberKind::Conversion, "operator")],
            "constructor_declaration" => vec![named(MemberKind::Constructor, ".ctor")],
            "destructor_declaration" => vec![named(MemberKind::Destructor, "Finalize")],
            "property_declaration" => vec![named(MemberKind::Property, "")],
            "indexer_declaration" => vec![named(MemberKind::Indexer, "this")],
            "event_declaration" => vec![named(MemberKind::Event, "")],
            "field_declaration" | "event_field_declaration" => {
                let kind = if node.kind() == "field_declaration" {
                    MemberKind::Field
                } else {
                    MemberKind::Event
                };
                self.variables(node, kind)
            }
            _ => Vec::new(),
        }
    }

    fn variables(&self, node: &Node, kind: MemberKind) -> Vec<MemberDeclaration> {
        let Some(variables) = child_of_kind(node, "variable_declaration") else {
            return Vec::new();
        };
        let is_static = has_modifier(node, self.source, "static");
        let ty = variables
            .child_by_field_name("type")
            .map(|ty| TypeSyntax::parse(&compact(node_text(&ty, self.source))));

        let mut cursor = variables.walk();
        variables
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "variable_declarator")
            .filter_map(|declarator| {
                let name = declarator
                    .child_by_field_name("name")
                    .or_else(|| child_of_kind(&declarator, "identifier"))?;
                let mut member =
                    MemberDeclaration::of_kind(kind, node_text(&name, self.source).to_string());
                member.is_static = is_static;
                member.return_type = ty.clone();
                Some(member)
            })
            .collect()
    }

    fn method(&self, node: &Node) -> Option<MemberDeclaration> {
        // `void IOther.Run()` implements another interface's member
        if child_of_kind(node, "explicit_interface_specifier").is_some() {
            return None;
        }
        let name = node.child_by_field_name("name")?;
        let return_type = node
            .child_by_field_name("returns")
            .or_else(|| node.child_by_field_name("type"))
            .or_else(|| name.prev_named_sibling())
            .filter(|ty| !matches!(ty.kind(), "modifier" | "attribute_list"))
            .map(|ty| TypeSyntax::parse(&compact(node_text(&ty, self.source))))
            .unwrap_or_else(|| TypeSyntax::Opaque(String::new()));

        let mut method = MemberDeclaration::method(node_text(&name, self.source), return_type);
        method.is_static = has_modifier(node, self.source, "static");
        method.type_parameters = type_parameter_names(node, self.source);
        if let Some(list) = field_or_kind(node, "parameters", "parameter_list") {
            method.parameters = self.parameters(&list);
        }
        Some(method)
    }

    fn parameters(&self, list: &Node) -> Vec<ParameterDeclaration> {
        let mut parameters = Vec::new();
        // Grammar revisions that inline `params T[] name` into the list
        let mut params_type: Option<String> = None;
        let mut pending_params = false;

        let mut cursor = list.walk();
        for child in list.children(&mut cursor) {
            match child.kind() {
                "parameter" | "parameter_array" => {
                    parameters.extend(self.parameter(&child));
                }
                "params" => pending_params = true,
                "attribute_list" | "," | "(" | ")" => {}
                _ if pending_params && child.is_named() => match params_type.take() {
                    None => params_type = Some(compact(node_text(&child, self.source))),
                    Some(ty) => {
                        let mut parameter = ParameterDeclaration::new(
                            node_text(&child, self.source),
                            TypeSyntax::parse(&ty),
                        );
                        parameter.modifier = Some("params".to_string());
                        parameters.push(parameter);
                        pending_params = false;
                    }
                },
                _ => {}
            }
        }
        parameters
    }

    fn parameter(&self, node: &Node) -> Option<ParameterDeclaration> {
        let name = node
            .child_by_field_name("name")
            .or_else(|| last_child_of_kind(node, "identifier"))?;
        let type_node = node.child_by_field_name("type");
        let boundary = type_node.map_or(name.start_byte(), |ty| ty.start_byte());

        let mut modifiers = Vec::new();
        let mut prefix_end = node.start_byte();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.start_byte() >= boundary {
                break;
            }
            prefix_end = child.end_byte();
            if child.kind() == "attribute_list" {
                continue;
            }
            modifiers.extend(
                node_text(&child, self.source)
                    .split_whitespace()
                    .filter(|word| PARAMETER_MODIFIERS.contains(word)),
            );
        }

        let type_text = match type_node {
            Some(ty) => node_text(&ty, self.source),
            None => self
                .source
                .get(prefix_end..name.start_byte())
                .unwrap_or("")
                .trim(),
        };

        let default_value = {
            let mut cursor = node.walk();
            let mut value = None;
            for child in node.children(&mut cursor) {
                match child.kind() {
                    "=" => {
                        value = self.source.get(child.end_byte()..node.end_byte());
                    }
                    "equals_value_clause" => {
                        value = Some(node_text(&child, self.source).trim_start_matches('='));
                    }
                    _ => {}
                }
            }
            value.map(|v| compact(v.trim()))
        };

        let mut parameter = ParameterDeclaration::new(
            node_text(&name, self.source),
            TypeSyntax::parse(&compact(type_text)),
        );
        if !modifiers.is_empty() {
            parameter.modifier = Some(modifiers.join(" "));
        }
        parameter.default_value = default_value;
        Some(parameter)
    }
}

fn declaration_kind(node_kind: &str) -> Option<DeclarationKind> {
    match node_kind {
        "class_declaration" => Some(DeclarationKind::Class),
        "struct_declaration" => Some(DeclarationKind::Struct),
        "record_declaration" => Some(DeclarationKind::Record),
        "record_struct_declaration" => Some(DeclarationKind::RecordStruct),
        "interface_declaration" => Some(DeclarationKind::Interface),
        "enum_declaration" => Some(DeclarationKind::Enum),
        _ => None,
    }
}

fn last_child_of_kind<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| child.kind() == kind)
        .last()
}
