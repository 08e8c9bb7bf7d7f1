//! Upgrade pass for renamed configuration nodes.
//!
//! Reconstructs each devicetree node's absolute path and, on a rule table
//! hit, replaces just the node's `name` field text with the new bare
//! identifier. Relocating a node elsewhere in the tree is unsupported.

use km_core::TextEdit;
use km_dt_parser::{dt, queries, QueryCursor, Tree};
use streaming_iterator::StreamingIterator;

use crate::error::PassError;
use crate::rules::{self, RuleAction};

/// Upgrades nodes at deprecated absolute paths.
///
/// # Errors
///
/// Returns [`PassError::Query`] if the node query fails to compile.
pub fn upgrade_nodes(tree: &Tree, source: &str) -> Result<Vec<TextEdit>, PassError> {
    let query = queries::node_query()?;
    let mut edits = Vec::new();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source.as_bytes());

    while let Some(match_) = matches.next() {
        let Some(node) = dt::find_capture(query, match_, "node") else {
            continue;
        };

        let path = dt::node_path(node, source);
        if let Some(RuleAction::Renamed(new_name)) = rules::node_path_replacement(&path) {
            if let Some(name) = node.child_by_field_name("name") {
                edits.push(TextEdit::new(name.start_byte(), name.end_byte(), new_name));
            }
        }
    }

    Ok(edits)
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
        upgrade_nodes(&tree, source).expect("Pass failed")
    }

    #[test]
    fn test_renames_node_at_deprecated_path() {
        let source = "/ { encoder_sensors { }; };";
        let result = apply_edits(source, &run(source));
        assert_eq!(result.text, "/ { sensors { }; };");
    }

    #[test]
    fn test_same_name_at_other_path_untouched() {
        // Same local name at an unrelated path is not a match.
        let source = "/ { parent { encoder_sensors { }; }; };";
        assert!(run(source).is_empty());
    }

    #[test]
    fn test_only_name_field_replaced() {
        let source = "/ { encoder_sensors { status = \"okay\"; }; };";
        let edits = run(source);

        assert_eq!(edits.len(), 1);
        assert_eq!(
            &source[edits[0].range.start..edits[0].range.end],
            "encoder_sensors"
        );
    }
}
