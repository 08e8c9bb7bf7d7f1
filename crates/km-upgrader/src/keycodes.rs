//! Upgrade pass for deprecated key code identifiers.
//!
//! Only identifiers inside a `bindings` or `sensor-bindings` property are
//! touched: several deprecated codes are still legitimate tokens in other
//! properties such as `mods`.

use km_core::TextEdit;
use km_dt_parser::{dt, queries, Node, QueryCursor, Tree};
use streaming_iterator::StreamingIterator;
use tracing::warn;

use crate::error::PassError;
use crate::rules::{self, RuleAction};

/// Upgrades deprecated key code identifiers inside bindings arrays.
///
/// Renamed codes replace just the identifier. Removed codes replace the
/// whole enclosing behavior invocation with a `&none` placeholder and a
/// comment preserving the original text.
///
/// # Errors
///
/// Returns [`PassError::Query`] if the identifier query fails to compile.
pub fn upgrade_keycodes(tree: &Tree, source: &str) -> Result<Vec<TextEdit>, PassError> {
    let query = queries::identifier_query()?;
    let mut edits = Vec::new();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source.as_bytes());

    while let Some(match_) = matches.next() {
        let Some(node) = dt::find_capture(query, match_, "name") else {
            continue;
        };

        if !is_in_bindings_array(node, source) {
            continue;
        }

        match rules::keycode_replacement(dt::node_text(node, source)) {
            Some(RuleAction::Renamed(replacement)) => {
                edits.push(TextEdit::new(
                    node.start_byte(),
                    node.end_byte(),
                    replacement,
                ));
            }
            Some(RuleAction::Removed) => edits.extend(replace_removed_code(node, source)),
            None => {}
        }
    }

    Ok(edits)
}

/// Returns whether an identifier sits inside a bindings property value.
fn is_in_bindings_array(identifier: Node<'_>, source: &str) -> bool {
    let mut current = identifier.parent();

    while let Some(node) = current {
        if node.kind() == "property" {
            return dt::property_name(node, source)
                .is_some_and(|name| matches!(name, "bindings" | "sensor-bindings"));
        }
        current = node.parent();
    }

    false
}

/// Replaces an invocation using a removed key code.
///
/// The enclosing behavior and all its parameters are replaced by `&none`
/// plus a comment holding the original text. If no enclosing behavior
/// reference exists the input is malformed; only the identifier is
/// commented out and a warning is logged.
fn replace_removed_code(node: Node<'_>, source: &str) -> Vec<TextEdit> {
    let text = dt::node_text(node, source);
    let nodes = find_behavior_nodes(node);

    if nodes.is_empty() {
        warn!(code = text, "deprecated code is not a parameter to a behavior");
        return vec![TextEdit::new(
            node.start_byte(),
            node.end_byte(),
            format!("/* \"{text}\" no longer exists */"),
        )];
    }

    let old_text = nodes
        .iter()
        .map(|n| dt::node_text(*n, source))
        .collect::<Vec<_>>()
        .join(" ");
    let new_text = format!("&none /* \"{old_text}\" no longer exists */");

    let start = nodes[0].start_byte();
    let end = nodes[nodes.len() - 1].end_byte();

    vec![TextEdit::new(start, end, new_text)]
}

/// Given a parameter to a keymap behavior, returns the nodes of the whole
/// invocation: the behavior reference followed by all its parameters.
///
/// Returns an empty list if no behavior reference precedes the parameter.
fn find_behavior_nodes(param: Node<'_>) -> Vec<Node<'_>> {
    // Walk backwards from the parameter to find the behavior reference.
    let mut behavior = param.prev_named_sibling();
    while let Some(node) = behavior {
        if node.kind() == "reference" {
            break;
        }
        behavior = node.prev_named_sibling();
    }

    let Some(behavior) = behavior else {
        return Vec::new();
    };

    // Walk forward from the behavior to collect all its parameters.
    let mut nodes = vec![behavior];
    let mut param = behavior.next_named_sibling();
    while let Some(node) = param {
        if node.kind() == "reference" {
            break;
        }
        nodes.push(node);
        param = node.next_named_sibling();
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use km_core::apply_edits;
    use km_dt_parser::DtParser;

    fn run(source: &str) -> Vec<TextEdit> {
        let tree = DtParser::new()
            .expect("Parser creation failed")
            .parse(source)
            .expect("Parse failed");
        upgrade_keycodes(&tree, source).expect("Pass failed")
    }

    #[test]
    fn test_renames_code_in_bindings() {
        let source = "/ { keymap { bindings = <&kp BKSP>; }; };";
        let edits = run(source);

        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].new_text, "BSPC");
    }

    #[test]
    fn test_renames_code_in_sensor_bindings() {
        let source = "/ { keymap { sensor-bindings = <&inc_dec_kp M_VOLU M_VOLD>; }; };";
        let edits = run(source);

        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0].new_text, "C_VOL_UP");
        assert_eq!(edits[1].new_text, "C_VOL_DN");
    }

    #[test]
    fn test_leaves_code_outside_bindings() {
        // MOD_LSFT is still valid in a "mods" property.
        let source = "/ { behaviors { mods = <MOD_LSFT>; }; };";
        assert!(run(source).is_empty());
    }

    #[test]
    fn test_removed_code_replaces_whole_invocation() {
        let source = "/ { keymap { bindings = <&kp A &kp KSPC &kp B>; }; };";
        let edits = run(source);

        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].new_text, "&none /* \"&kp KSPC\" no longer exists */");

        let result = apply_edits(source, &edits);
        assert_eq!(
            result.text,
            "/ { keymap { bindings = <&kp A &none /* \"&kp KSPC\" no longer exists */ &kp B>; }; };"
        );
    }

    #[test]
    fn test_removed_code_without_behavior() {
        // Malformed: no behavior reference before the code.
        let source = "/ { keymap { bindings = <KSPC>; }; };";
        let edits = run(source);

        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].new_text, "/* \"KSPC\" no longer exists */");
    }
}
