//! Error types for the km-upgrader crate.
//!
//! Errors split into two tiers matching the pipeline's fault model:
//! [`UpgradeError`] is fatal for a single `upgrade` call (the source could
//! not be parsed at all), while [`PassError`] is scoped to one pass: the
//! pipeline logs it and keeps the other passes' edits.

use km_dt_parser::ParseError;

/// An error scoped to a single upgrade pass.
///
/// A failing pass never aborts its sibling passes; the pipeline drops the
/// failed pass's edits and continues.
#[derive(Debug, thiserror::Error)]
pub enum PassError {
    /// A header rule table entry marks a header as removed.
    ///
    /// The header pass only supports renaming include paths; a removal
    /// entry indicates inconsistent rule data, not a recoverable input
    /// condition.
    #[error("header rule for '{path}' has no replacement; removing headers is not supported")]
    HeaderRemoval {
        /// The deprecated include path with the inconsistent rule.
        path: String,
    },

    /// A tree-sitter query failed to compile.
    #[error(transparent)]
    Query(#[from] ParseError),
}

/// A fatal error for one `upgrade` invocation.
#[derive(Debug, thiserror::Error)]
pub enum UpgradeError {
    /// The source text could not be parsed into a syntax tree.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
