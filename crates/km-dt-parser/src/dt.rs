//! Devicetree syntax-tree navigation helpers.
//!
//! The upgrade passes never inspect concrete node internals beyond this
//! capability set: text extraction, named-field access, parent/sibling
//! traversal, containing-node lookup, node-path reconstruction, and
//! property search.

use tree_sitter::{Node, Query, QueryMatch};

/// Returns the node for the named capture of a query match, if present.
pub fn find_capture<'tree>(
    query: &Query,
    match_: &QueryMatch<'_, 'tree>,
    name: &str,
) -> Option<Node<'tree>> {
    let index = query.capture_index_for_name(name)?;

    match_
        .captures
        .iter()
        .find(|c| c.index == index)
        .map(|c| c.node)
}

/// Returns the source text covered by a node.
///
/// Tree-sitter byte spans always land on UTF-8 boundaries for valid input;
/// a span that does not decode yields an empty string rather than a panic.
#[must_use]
pub fn node_text<'s>(node: Node<'_>, source: &'s str) -> &'s str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Returns the nearest `node`-typed ancestor of a syntax node.
///
/// The node itself is excluded: for a `property`, this is the devicetree
/// node holding the property; for a devicetree node, its parent node.
#[must_use]
pub fn containing_node<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    let mut current = node.parent();

    while let Some(n) = current {
        if n.kind() == "node" {
            return Some(n);
        }
        current = n.parent();
    }

    None
}

/// Reconstructs the absolute devicetree path of a node.
///
/// Walks the ancestor chain collecting the `name` field of every
/// `node`-typed ancestor (including the node itself), skipping intermediate
/// non-node syntax such as preprocessor conditionals, and joins the names
/// with `/`. The root node's name is the literal `/`, so a leading double
/// slash is collapsed.
///
/// A node reached through a label reference (`&sensors { ... };`) reports
/// the reference text as its name, e.g. `&sensors`.
#[must_use]
pub fn node_path(node: Node<'_>, source: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    let mut current = Some(node);

    while let Some(n) = current {
        if n.kind() == "node" {
            if let Some(name) = n.child_by_field_name("name") {
                parts.push(node_text(name, source));
            }
        }
        current = n.parent();
    }

    parts.reverse();
    let path = parts.join("/");

    match path.strip_prefix("//") {
        Some(rest) => format!("/{rest}"),
        None => path,
    }
}

/// Returns the name of a `property` node, if it has one.
#[must_use]
pub fn property_name<'s>(prop: Node<'_>, source: &'s str) -> Option<&'s str> {
    prop.child_by_field_name("name")
        .map(|name| node_text(name, source))
}

/// Finds a property among the direct children of a devicetree node.
///
/// Devicetree semantics are last-wins for duplicated properties, so the
/// last matching child is returned.
#[must_use]
pub fn find_child_property<'tree>(
    node: Node<'tree>,
    source: &str,
    name: &str,
) -> Option<Node<'tree>> {
    let mut found = None;
    let mut cursor = node.walk();

    for child in node.named_children(&mut cursor) {
        if child.kind() == "property" && property_name(child, source) == Some(name) {
            found = Some(child);
        }
    }

    found
}

/// Finds every property with the given name anywhere in a subtree.
///
/// Results are in document order.
#[must_use]
pub fn find_properties<'tree>(root: Node<'tree>, source: &str, name: &str) -> Vec<Node<'tree>> {
    let mut found = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if node.kind() == "property" && property_name(node, source) == Some(name) {
            found.push(node);
        }

        for i in (0..node.named_child_count()).rev() {
            if let Some(child) = node.named_child(i) {
                stack.push(child);
            }
        }
    }

    found
}
