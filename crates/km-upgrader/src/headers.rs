//! Upgrade pass for renamed include header paths.
//!
//! Matches `#include "..."` and `#include <...>` directives, compares the
//! bare path against the header rule table, and rewrites only the inner
//! path text so the original delimiters survive.

use km_core::TextEdit;
use km_dt_parser::{dt, queries, QueryCursor, Tree};
use streaming_iterator::StreamingIterator;

use crate::error::PassError;
use crate::rules::{self, RuleAction};

/// Upgrades deprecated include header paths.
///
/// # Errors
///
/// Returns [`PassError::Query`] if the include query fails to compile, or
/// [`PassError::HeaderRemoval`] if the rule table marks a matched header as
/// removed; removal is not expressible as an include rewrite, so such an
/// entry is rule-data inconsistency rather than an input problem.
pub fn upgrade_headers(tree: &Tree, source: &str) -> Result<Vec<TextEdit>, PassError> {
    let query = queries::include_query()?;
    let mut edits = Vec::new();

    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, tree.root_node(), source.as_bytes());

    while let Some(match_) = matches.next() {
        let Some(node) = dt::find_capture(query, match_, "path") else {
            continue;
        };

        // Strip the quotes or angle brackets around the path.
        let text = dt::node_text(node, source);
        if text.len() < 2 {
            continue;
        }
        let bare = &text[1..text.len() - 1];

        match rules::header_replacement(bare) {
            Some(RuleAction::Renamed(replacement)) => {
                edits.push(TextEdit::new(
                    node.start_byte() + 1,
                    node.end_byte() - 1,
                    replacement,
                ));
            }
            Some(RuleAction::Removed) => {
                return Err(PassError::HeaderRemoval {
                    path: bare.to_owned(),
                });
            }
            None => {}
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
        upgrade_headers(&tree, source).expect("Pass failed")
    }

    #[test]
    fn test_renames_quoted_include() {
        let source = "#include \"dt-bindings/zmk/matrix-transform.h\"\n";
        let result = apply_edits(source, &run(source));
        assert_eq!(result.text, "#include \"dt-bindings/zmk/matrix_transform.h\"\n");
    }

    #[test]
    fn test_renames_angle_bracket_include() {
        let source = "#include <dt-bindings/zmk/matrix-transform.h>\n";
        let result = apply_edits(source, &run(source));
        assert_eq!(result.text, "#include <dt-bindings/zmk/matrix_transform.h>\n");
    }

    #[test]
    fn test_leaves_current_includes() {
        let source = "#include <dt-bindings/zmk/keys.h>\n#include <behaviors.dtsi>\n";
        assert!(run(source).is_empty());
    }

    #[test]
    fn test_exact_match_only() {
        // A prefix match is not a match.
        let source = "#include <dt-bindings/zmk/matrix-transform.h.bak>\n";
        assert!(run(source).is_empty());
    }
}
