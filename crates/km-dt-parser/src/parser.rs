//! Devicetree parser management using tree-sitter.
//!
//! This module provides the [`DtParser`] struct for parsing devicetree-style
//! keymap source into a syntax tree.

use tree_sitter::{Language, Parser, Tree};

use crate::error::ParseError;

/// Devicetree parser for keymap source files.
///
/// Wraps a tree-sitter parser configured with the statically linked
/// devicetree grammar. The grammar is set once at construction; a parser
/// that exists is always ready to parse, so there is no separate
/// "initialized" state to check at call sites.
///
/// # Thread Safety
///
/// `DtParser` is `Send` but not `Sync`. Callers that parse from multiple
/// threads should create one parser per thread; the compiled queries in
/// [`queries`](crate::queries) are thread-safe and shared.
///
/// # Examples
///
/// ```
/// use km_dt_parser::DtParser;
///
/// let mut parser = DtParser::new()?;
/// let tree = parser.parse("/ { keymap { }; };")?;
/// assert_eq!(tree.root_node().kind(), "document");
/// # Ok::<(), km_dt_parser::ParseError>(())
/// ```
pub struct DtParser {
    /// The underlying tree-sitter parser.
    parser: Parser,
    /// The devicetree language for the parser.
    language: Language,
}

impl DtParser {
    /// Creates a new devicetree parser.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::LanguageInit`] if the devicetree grammar
    /// cannot be set on the parser (an ABI mismatch between the grammar
    /// and the linked tree-sitter runtime).
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        let language: Language = tree_sitter_devicetree::LANGUAGE.into();

        parser
            .set_language(&language)
            .map_err(|_| ParseError::LanguageInit)?;

        Ok(Self { parser, language })
    }

    /// Parses devicetree source into a syntax tree.
    ///
    /// Syntactically invalid input still succeeds: the grammar reports
    /// error nodes inline and leaves the rest of the tree intact, which
    /// lets the upgrade passes degrade to "leave that part unchanged".
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Parse`] if tree-sitter fails outright
    /// (out of memory or cancellation), which is unrelated to the
    /// syntactic validity of `source`.
    pub fn parse(&mut self, source: &str) -> Result<Tree, ParseError> {
        self.parser.parse(source, None).ok_or(ParseError::Parse)
    }

    /// Returns the tree-sitter language used by this parser.
    ///
    /// Useful when compiling additional queries compatible with the trees
    /// this parser produces.
    #[inline]
    pub fn language(&self) -> &Language {
        &self.language
    }
}

impl std::fmt::Debug for DtParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DtParser")
            .field("language", &"Devicetree")
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_new() {
        let parser = DtParser::new();
        assert!(parser.is_ok());
    }

    #[test]
    fn test_parse_simple_keymap() {
        let mut parser = DtParser::new().expect("Parser creation failed");
        let source = "/ { keymap { compatible = \"zmk,keymap\"; }; };";

        let tree = parser.parse(source).expect("Parse failed");
        assert_eq!(tree.root_node().kind(), "document");
        assert!(!tree.root_node().has_error());
    }

    #[test]
    fn test_parse_empty_source() {
        let mut parser = DtParser::new().expect("Parser creation failed");
        let tree = parser.parse("").expect("Parse failed");
        assert_eq!(tree.root_node().child_count(), 0);
    }

    #[test]
    fn test_parse_invalid_source_reports_error_nodes() {
        let mut parser = DtParser::new().expect("Parser creation failed");
        let tree = parser.parse("/ { bindings = <&kp").expect("Parse failed");
        // Malformed input parses to a tree with inline error nodes rather
        // than failing the whole call.
        assert!(tree.root_node().has_error());
    }

    #[test]
    fn test_parser_debug() {
        let parser = DtParser::new().expect("Parser creation failed");
        let debug = format!("{parser:?}");
        assert!(debug.contains("DtParser"));
        assert!(debug.contains("Devicetree"));
    }
}
