//! Devicetree parsing and syntax-tree navigation for keymap migration.
//!
//! This crate wraps the `tree-sitter` devicetree grammar behind a small
//! capability set used by the upgrade passes:
//!
//! - [`DtParser`]: parse keymap source into an immutable syntax tree
//! - [`queries`]: pre-compiled, process-wide cached tree-sitter queries
//! - [`dt`]: node navigation covering text, fields, containing node, node
//!   paths, and property search
//!
//! # Initialization
//!
//! The grammar is statically linked and set on the parser at construction.
//! [`DtParser::new`] is the only fallible initialization step; holding a
//! `DtParser` is proof the grammar loaded, so no call-site "is initialized"
//! checks exist anywhere downstream.
//!
//! ```
//! use km_dt_parser::{dt, DtParser};
//!
//! let mut parser = DtParser::new()?;
//! let source = "/ { keymap { compatible = \"zmk,keymap\"; }; };";
//! let tree = parser.parse(source)?;
//!
//! let props = dt::find_properties(tree.root_node(), source, "compatible");
//! assert_eq!(props.len(), 1);
//! # Ok::<(), km_dt_parser::ParseError>(())
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod dt;
pub mod error;
mod parser;
pub mod queries;

pub use error::ParseError;
pub use parser::DtParser;

// Re-export tree-sitter types that appear in our public API
pub use tree_sitter::{Node, Query, QueryCursor, Tree};
