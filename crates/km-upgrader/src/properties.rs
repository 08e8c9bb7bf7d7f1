//! Upgrade pass for deprecated `label` properties.
//!
//! Layer labels inside a keymap node were renamed to `display-name`; every
//! other `label` property was dropped from the schema and is deleted
//! outright (line collapse in the edit applier removes the emptied line).

use km_core::TextEdit;
use km_dt_parser::{dt, queries, Node, QueryCursor, Tree};
use streaming_iterator::StreamingIterator;

use crate::error::PassError;

/// Compatible string identifying a keymap node.
const KEYMAP_COMPATIBLE: &str = "\"zmk,keymap\"";

/// Upgrades deprecated `label` properties.
///
/// # Errors
///
/// Returns [`PassError::Query`] if the property query fails to compile.
pub fn upgrade_properties(tree: &Tree, source: &str) -> Result<Vec<TextEdit>, PassError> {
    let query = queries::property_query()?;
    let mut edits = Vec::new();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source.as_bytes());

    while let Some(match_) = matches.next() {
        let (Some(name), Some(prop)) = (
            dt::find_capture(query, match_, "name"),
            dt::find_capture(query, match_, "prop"),
        ) else {
            continue;
        };

        if dt::node_text(name, source) != "label" {
            continue;
        }

        if is_layer_label(prop, source) {
            edits.push(TextEdit::new(
                name.start_byte(),
                name.end_byte(),
                "display-name",
            ));
        } else {
            edits.push(TextEdit::new(prop.start_byte(), prop.end_byte(), ""));
        }
    }

    Ok(edits)
}

/// Returns whether a `label` property names a keymap layer.
///
/// A layer label's property sits in a layer node whose parent node carries
/// `compatible = "zmk,keymap"`. The compatible lookup considers only that
/// parent's direct child properties, last instance winning, which matches
/// devicetree's own duplicate-property semantics.
fn is_layer_label(prop: Node<'_>, source: &str) -> bool {
    let Some(layer) = dt::containing_node(prop) else {
        return false;
    };
    let Some(keymap) = dt::containing_node(layer) else {
        return false;
    };

    dt::find_child_property(keymap, source, "compatible")
        .and_then(|compatible| compatible.child_by_field_name("value"))
        .is_some_and(|value| dt::node_text(value, source) == KEYMAP_COMPATIBLE)
}
