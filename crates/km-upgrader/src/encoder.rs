//! Upgrade pass for the encoder resolution convention change.
//!
//! `resolution = <n>;` on an encoder became `steps`, measured in total
//! triggers per rotation instead of detents. The pass rewrites the property
//! and, when anything was upgraded, appends a single
//! `triggers-per-rotation` stanza at the end of the document.

use km_core::TextEdit;
use km_dt_parser::{dt, Node, Tree};

use crate::error::PassError;

/// Compatible string for the supported EC11 encoder hardware.
const ALPS_EC11_COMPATIBLE: &str = "\"alps,ec11\"";

/// Fallback detent count when the old resolution value is not a plain int.
const DEFAULT_RESOLUTION: u32 = 4;

/// Trigger count per full rotation used to scale old resolution values.
const TRIGGERS_PER_ROTATION: u32 = 20;

/// Builds the `&sensors` stanza appended when no `triggers-per-rotation`
/// property exists yet.
fn triggers_per_rotation_stanza() -> String {
    format!(
        "\n\n&sensors {{\n    // Change this to your encoder's number of detents.\n    // If you have multiple encoders with different detents, see\n    // https://zmk.dev/docs/config/encoders#keymap-sensor-config\n    triggers-per-rotation = <{TRIGGERS_PER_ROTATION}>;\n}};"
    )
}

/// Upgrades `resolution` properties on encoder nodes to `steps`.
///
/// # Errors
///
/// This pass performs no queries and currently cannot fail; the `Result`
/// keeps its signature uniform with the other passes.
pub fn upgrade_encoder_resolution(tree: &Tree, source: &str) -> Result<Vec<TextEdit>, PassError> {
    let mut edits = Vec::new();

    let resolution_props: Vec<Node<'_>> =
        dt::find_properties(tree.root_node(), source, "resolution")
            .into_iter()
            .filter(|prop| {
                dt::containing_node(*prop).is_some_and(|node| is_encoder_node(node, source))
            })
            .collect();

    for prop in &resolution_props {
        edits.extend(upgrade_resolution_property(*prop, source));
    }

    if !resolution_props.is_empty() && !has_triggers_per_rotation(tree, source) {
        // Inserting a property into an existing node while keeping the
        // text readable in all cases is hard, so append a fresh &sensors
        // override at the end of the document instead.
        let end = tree.root_node().end_byte();
        edits.push(TextEdit::new(end, end, triggers_per_rotation_stanza()));
    }

    Ok(edits)
}

/// Classifies a devicetree node as an encoder.
///
/// The nearest ancestor-or-self node carrying a direct `compatible`
/// property decides: an exact EC11 match is an encoder, anything else is
/// not. Keymaps rarely set `compatible` on referenced overrides, so when
/// none exists the node path is the fallback heuristic.
fn is_encoder_node(node: Node<'_>, source: &str) -> bool {
    let mut current = Some(node);

    while let Some(n) = current {
        if let Some(compatible) = dt::find_child_property(n, source, "compatible") {
            return compatible
                .child_by_field_name("value")
                .is_some_and(|value| dt::node_text(value, source) == ALPS_EC11_COMPATIBLE);
        }
        current = dt::containing_node(n);
    }

    dt::node_path(node, source)
        .to_lowercase()
        .contains("encoder")
}

/// Rewrites one `resolution` property to `steps` with a scaled value.
fn upgrade_resolution_property(prop: Node<'_>, source: &str) -> Vec<TextEdit> {
    let (Some(name), Some(value)) = (
        prop.child_by_field_name("name"),
        prop.child_by_field_name("value"),
    ) else {
        return Vec::new();
    };

    // New steps value is triggers-per-rotation times the old resolution,
    // falling back to a default when the value is something more complex
    // than a single int.
    let raw = dt::node_text(value, source).trim();
    let raw = raw.strip_prefix('<').unwrap_or(raw);
    let resolution = raw.strip_suffix('>').unwrap_or(raw).trim();

    let steps = resolution
        .parse::<u32>()
        .ok()
        .filter(|&n| n != 0)
        .unwrap_or(DEFAULT_RESOLUTION)
        * TRIGGERS_PER_ROTATION;

    let hint = format!("/* Change this to your encoder's number of detents times {resolution} */");

    vec![
        TextEdit::new(name.start_byte(), name.end_byte(), "steps"),
        TextEdit::new(value.start_byte(), value.end_byte(), format!("<{steps}> {hint}")),
    ]
}

/// Returns whether the tree already defines `triggers-per-rotation`.
///
/// A keymap may already contain it, for example when the user upgraded
/// some but not all `resolution` properties by hand; re-scanning keeps the
/// appended stanza unique and makes the pass idempotent.
fn has_triggers_per_rotation(tree: &Tree, source: &str) -> bool {
    !dt::find_properties(tree.root_node(), source, "triggers-per-rotation").is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use km_core::apply_edits;
    use km_dt_parser::DtParser;

    fn upgrade(source: &str) -> String {
        let tree = DtParser::new()
            .expect("Parser creation failed")
            .parse(source)
            .expect("Parse failed");
        let edits = upgrade_encoder_resolution(&tree, source).expect("Pass failed");
        apply_edits(source, &edits).text
    }

    #[test]
    fn test_upgrades_by_compatible() {
        let source = "/ { encoder_node { compatible = \"alps,ec11\"; resolution = <2>; }; };";
        let upgraded = upgrade(source);

        assert!(upgraded.contains("steps = <40> /* Change this to your encoder's number of detents times 2 */;"));
        assert!(upgraded.contains("triggers-per-rotation = <20>;"));
    }

    #[test]
    fn test_upgrades_by_path_heuristic() {
        let source = "&left_encoder { resolution = <4>; };";
        let upgraded = upgrade(source);

        assert!(upgraded.contains("steps = <80>"));
    }

    #[test]
    fn test_other_compatible_excludes_node() {
        // An explicit non-encoder compatible wins over the path heuristic.
        let source = "/ { encoder_thing { compatible = \"other,device\"; resolution = <2>; }; };";
        assert_eq!(upgrade(source), source);
    }

    #[test]
    fn test_non_encoder_resolution_untouched() {
        let source = "/ { adc { resolution = <12>; }; };";
        assert_eq!(upgrade(source), source);
    }

    #[test]
    fn test_unparsable_resolution_uses_default() {
        let source = "&left_encoder { resolution = <RES>; };";
        let upgraded = upgrade(source);

        assert!(upgraded.contains("steps = <80> /* Change this to your encoder's number of detents times RES */;"));
    }

    #[test]
    fn test_single_stanza_for_multiple_encoders() {
        let source = "&left_encoder { resolution = <2>; };\n&right_encoder { resolution = <2>; };\n";
        let upgraded = upgrade(source);

        assert_eq!(upgraded.matches("triggers-per-rotation").count(), 1);
    }

    #[test]
    fn test_existing_property_suppresses_stanza() {
        let source =
            "&sensors { triggers-per-rotation = <20>; };\n&left_encoder { resolution = <2>; };\n";
        let upgraded = upgrade(source);

        assert_eq!(upgraded.matches("triggers-per-rotation").count(), 1);
        assert!(upgraded.contains("steps = <40>"));
    }
}
