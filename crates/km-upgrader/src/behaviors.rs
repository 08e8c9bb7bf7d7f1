//! Upgrade pass for deprecated behavior references.
//!
//! Finds every `&name` reference and renames the identifier when the name
//! is in the behavior rule table.

use km_core::TextEdit;
use km_dt_parser::{dt, queries, QueryCursor, Tree};
use streaming_iterator::StreamingIterator;

use crate::error::PassError;
use crate::rules::{self, RuleAction};

/// Upgrades deprecated behavior references.
///
/// # Errors
///
/// Returns [`PassError::Query`] if the reference query fails to compile.
pub fn upgrade_behaviors(tree: &Tree, source: &str) -> Result<Vec<TextEdit>, PassError> {
    let query = queries::reference_query()?;
    let mut edits = Vec::new();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source.as_bytes());

    while let Some(match_) = matches.next() {
        let Some(node) = dt::find_capture(query, match_, "ref") else {
            continue;
        };

        if let Some(RuleAction::Renamed(replacement)) =
            rules::behavior_replacement(dt::node_text(node, source))
        {
            edits.push(TextEdit::new(
                node.start_byte(),
                node.end_byte(),
                replacement,
            ));
        }
    }

    Ok(edits)
}
