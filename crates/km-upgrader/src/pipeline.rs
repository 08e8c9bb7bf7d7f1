//! The upgrade pipeline: parse once, run every pass, merge, apply.
//!
//! The driver is intentionally simple: no state machine and no conditional
//! routing. Each pass re-derives everything it needs from the shared
//! read-only tree and returns independent edits against the original text;
//! correctness rests on the passes producing non-overlapping spans, with
//! the edit applier's deterministic drop policy as the backstop.

use km_core::{apply_edits, ranges_to_line_numbers, EditResult, Range, TextEdit};
use km_dt_parser::{DtParser, ParseError, Tree};
use tracing::{debug, warn};

use crate::behaviors::upgrade_behaviors;
use crate::encoder::upgrade_encoder_resolution;
use crate::error::{PassError, UpgradeError};
use crate::headers::upgrade_headers;
use crate::keycodes::upgrade_keycodes;
use crate::nodes::upgrade_nodes;
use crate::properties::upgrade_properties;

/// An upgrade pass: read-only tree in, edits against the original text out.
type Pass = fn(&Tree, &str) -> Result<Vec<TextEdit>, PassError>;

/// All passes in their fixed execution order.
const PASSES: &[(&str, Pass)] = &[
    ("behaviors", upgrade_behaviors),
    ("keycodes", upgrade_keycodes),
    ("headers", upgrade_headers),
    ("nodes", upgrade_nodes),
    ("properties", upgrade_properties),
    ("encoder-resolution", upgrade_encoder_resolution),
];

/// The result of one upgrade invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeOutcome {
    /// The upgraded source text.
    pub text: String,

    /// Byte ranges within [`text`](Self::text) that changed, ascending and
    /// non-overlapping.
    pub changed_ranges: Vec<Range>,

    /// Changed ranges as a line-highlight directive, e.g. `{3,7-9}`.
    pub highlight: String,
}

/// Upgrades deprecated syntax in devicetree keymap files.
///
/// Holding an `Upgrader` is proof the grammar loaded; construction is the
/// only initialization step and the only place a grammar failure can
/// surface.
///
/// # Examples
///
/// ```
/// use km_upgrader::Upgrader;
///
/// let mut upgrader = Upgrader::new()?;
/// let outcome = upgrader.upgrade("/ { keymap { bindings = <&reset>; }; };")?;
///
/// assert_eq!(outcome.text, "/ { keymap { bindings = <&sys_reset>; }; };");
/// assert_eq!(outcome.highlight, "{1}");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Upgrader {
    /// Parser owned per upgrader so concurrent callers never share one.
    parser: DtParser,
}

impl Upgrader {
    /// Creates an upgrader with its own parser instance.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the devicetree grammar
    /// cannot be loaded. This is fatal: no upgrade call can proceed.
    pub fn new() -> Result<Self, ParseError> {
        Ok(Self {
            parser: DtParser::new()?,
        })
    }

    /// Upgrades all deprecated constructs in one keymap source.
    ///
    /// Parses once, runs every pass against the same tree, merges the edit
    /// lists, applies them, and derives the changed-line highlight string.
    /// A pass that fails internally is logged and skipped; the other
    /// passes' edits still apply. Partially invalid input degrades to
    /// "leave the unparsable part unchanged" rather than failing.
    ///
    /// # Errors
    ///
    /// Returns [`UpgradeError::Parse`] only if tree-sitter fails outright;
    /// syntactically invalid input still succeeds.
    pub fn upgrade(&mut self, source: &str) -> Result<UpgradeOutcome, UpgradeError> {
        let tree = self.parser.parse(source)?;

        let edits = run_passes(PASSES, &tree, source);

        let EditResult {
            text,
            changed_ranges,
        } = apply_edits(source, &edits);
        let highlight = ranges_to_line_numbers(&text, &changed_ranges);

        Ok(UpgradeOutcome {
            text,
            changed_ranges,
            highlight,
        })
    }
}

/// Runs each pass against the shared tree, merging the edit lists.
///
/// A pass that returns an error is logged and skipped; the remaining
/// passes still contribute their edits.
fn run_passes(passes: &[(&str, Pass)], tree: &Tree, source: &str) -> Vec<TextEdit> {
    let mut edits = Vec::new();

    for (name, pass) in passes {
        match pass(tree, source) {
            Ok(pass_edits) => {
                debug!(pass = name, edits = pass_edits.len(), "pass complete");
                edits.extend(pass_edits);
            }
            Err(error) => {
                warn!(pass = name, %error, "upgrade pass failed; continuing without it");
            }
        }
    }

    edits
}
