//! Error types for the km-dt-parser crate.
//!
//! This module provides the [`ParseError`] type for errors that can occur
//! while loading the devicetree grammar and parsing keymap source.

/// Errors that can occur during devicetree parsing.
///
/// Grammar loading failures are fatal: no upgrade can proceed without a
/// parser. Because the pipeline can only be constructed from a successfully
/// built parser, "called before initialization" has no runtime
/// representation here.
///
/// # Examples
///
/// ```
/// use km_dt_parser::ParseError;
///
/// fn handle_error(err: ParseError) {
///     match err {
///         ParseError::LanguageInit => eprintln!("Failed to load devicetree grammar"),
///         ParseError::QueryCompile { offset, .. } => {
///             eprintln!("Query compilation failed at offset {offset}");
///         }
///         ParseError::Parse => eprintln!("Failed to parse keymap source"),
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Failed to set the devicetree language on the parser.
    #[error("failed to load devicetree grammar")]
    LanguageInit,

    /// Failed to compile a tree-sitter query.
    ///
    /// Contains the byte offset where the error occurred and the error kind.
    #[error("failed to compile query at offset {offset}: {kind:?}")]
    QueryCompile {
        /// The byte offset in the query string where the error occurred.
        offset: usize,
        /// The kind of query error.
        kind: tree_sitter::QueryError,
    },

    /// Failed to parse the source code.
    ///
    /// This typically indicates the parser ran out of memory or was
    /// cancelled; syntactically invalid input still produces a tree with
    /// inline error nodes rather than this error.
    #[error("failed to parse keymap source")]
    Parse,
}
