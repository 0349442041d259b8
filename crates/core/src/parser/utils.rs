use tree_sitter::Node;

/// Source text covered by a node. Nodes always come from a tree parsed from
/// `source`, so the range is in bounds.
pub fn node_text<'s>(node: &Node, source: &'s str) -> &'s str {
    source.get(node.byte_range()).unwrap_or("")
}

/// First direct child of the given kind
pub fn child_of_kind<'t>(node: &Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).find(|child| child.kind() == kind)
}

/// Field lookup with a fallback on the child kind, for grammar revisions
/// that do not name the field
pub fn field_or_kind<'t>(node: &Node<'t>, field: &str, kind: &str) -> Option<Node<'t>> {
    node.child_by_field_name(field)
        .or_else(|| child_of_kind(node, kind))
}

pub fn has_modifier(node: &Node, source: &str, modifier: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor).any(|child| {
        (child.kind() == "modifier" && node_text(&child, source).trim() == modifier)
            || child.kind() == modifier
    })
}

/// `<T, in TKey, out TValue>` → `["T", "TKey", "TValue"]`
pub fn type_parameter_names(node: &Node, source: &str) -> Vec<String> {
    let Some(list) = field_or_kind(node, "type_parameters", "type_parameter_list") else {
        return Vec::new();
    };
    let mut cursor = list.walk();
    list.named_children(&mut cursor)
        .filter(|child| child.kind() == "type_parameter")
        .filter_map(|parameter| {
            let name = match parameter.child_by_field_name("name") {
                Some(name) => node_text(&name, source),
                None => node_text(&parameter, source).split_whitespace().last()?,
            };
            Some(name.to_string())
        })
        .collect()
}

/// Collapse whitespace inside a name or type written across lines
pub fn compact(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
