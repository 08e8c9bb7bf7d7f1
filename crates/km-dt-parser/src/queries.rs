//! Pre-compiled tree-sitter queries over the devicetree grammar.
//!
//! Each query is compiled once per process and cached in a `OnceLock`; the
//! compiled [`Query`] values are thread-safe and shared by every parser
//! instance.

use std::sync::OnceLock;

use tree_sitter::{Language, Query};

use crate::error::ParseError;

/// Query matching behavior references (`&name`), capturing the identifier.
///
/// # Capture Names
///
/// - `ref` - The identifier following the `&`
pub const REFERENCE_QUERY: &str = "(reference label: (identifier) @ref)";

/// Query matching every identifier in the tree.
///
/// # Capture Names
///
/// - `name` - The identifier node
pub const IDENTIFIER_QUERY: &str = "(identifier) @name";

/// Query matching preprocessor includes, capturing the path string.
///
/// Both quoted (`"a/b.h"`) and angle-bracket (`<a/b.h>`) forms are
/// captured; the delimiters are part of the captured node's text.
///
/// # Capture Names
///
/// - `path` - The `string_literal` or `system_lib_string` path node
pub const INCLUDE_QUERY: &str =
    "(preproc_include path: [(string_literal) (system_lib_string)] @path)";

/// Query matching devicetree properties, capturing name and whole property.
///
/// Name filtering (`label`, `resolution`, ...) happens in Rust rather than
/// through an `#eq?` predicate because tree-sitter predicates are not
/// evaluated by the core library.
///
/// # Capture Names
///
/// - `name` - The property's name identifier
/// - `prop` - The full `property` node (including the terminating `;`)
pub const PROPERTY_QUERY: &str = "(property name: (identifier) @name) @prop";

/// Query matching every devicetree node.
///
/// # Capture Names
///
/// - `node` - The `node` syntax node
pub const NODE_QUERY: &str = "(node) @node";

/// Global cache for the compiled reference query.
static REFERENCE: OnceLock<Query> = OnceLock::new();

/// Global cache for the compiled identifier query.
static IDENTIFIER: OnceLock<Query> = OnceLock::new();

/// Global cache for the compiled include query.
static INCLUDE: OnceLock<Query> = OnceLock::new();

/// Global cache for the compiled property query.
static PROPERTY: OnceLock<Query> = OnceLock::new();

/// Global cache for the compiled node query.
static NODE: OnceLock<Query> = OnceLock::new();

/// Returns the compiled reference query.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn reference_query() -> Result<&'static Query, ParseError> {
    cached_query(&REFERENCE, REFERENCE_QUERY)
}

/// Returns the compiled identifier query.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn identifier_query() -> Result<&'static Query, ParseError> {
    cached_query(&IDENTIFIER, IDENTIFIER_QUERY)
}

/// Returns the compiled include query.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn include_query() -> Result<&'static Query, ParseError> {
    cached_query(&INCLUDE, INCLUDE_QUERY)
}

/// Returns the compiled property query.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn property_query() -> Result<&'static Query, ParseError> {
    cached_query(&PROPERTY, PROPERTY_QUERY)
}

/// Returns the compiled node query.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn node_query() -> Result<&'static Query, ParseError> {
    cached_query(&NODE, NODE_QUERY)
}

/// Compiles `source` against the devicetree grammar, caching the result.
fn cached_query(cell: &'static OnceLock<Query>, source: &str) -> Result<&'static Query, ParseError> {
    if let Some(query) = cell.get() {
        return Ok(query);
    }

    let language: Language = tree_sitter_devicetree::LANGUAGE.into();
    let query = compile_query(&language, source)?;

    Ok(cell.get_or_init(|| query))
}

/// Compiles a query for the given language.
fn compile_query(language: &Language, source: &str) -> Result<Query, ParseError> {
    Query::new(language, source).map_err(|e| ParseError::QueryCompile {
        offset: e.offset,
        kind: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_queries_compile() {
        let language: Language = tree_sitter_devicetree::LANGUAGE.into();

        for source in [
            REFERENCE_QUERY,
            IDENTIFIER_QUERY,
            INCLUDE_QUERY,
            PROPERTY_QUERY,
            NODE_QUERY,
        ] {
            let result = compile_query(&language, source);
            assert!(result.is_ok(), "query should compile: {source}");
        }
    }

    #[test]
    fn test_cached_query_returns_same_instance() {
        let first = reference_query().expect("query should compile");
        let second = reference_query().expect("query should compile");
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_capture_names() {
        let query = property_query().expect("query should compile");
        let names = query.capture_names();
        assert!(names.contains(&"name"));
        assert!(names.contains(&"prop"));
    }
}
