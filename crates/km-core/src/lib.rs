//! Core text-edit types and utilities for the keymap-migration workspace.
//!
//! This crate provides the foundational pieces shared by the upgrade
//! pipeline:
//!
//! - [`Range`], [`TextEdit`], and [`EditResult`]: the span and edit model
//! - [`apply_edits`]: apply edits to text, report changed output ranges
//! - [`LineIndex`] and [`ranges_to_line_numbers`]: line mapping for UI
//!   highlighting
//! - `FxHashMap`/`FxHashSet` aliases for fast string-keyed tables
//!
//! Everything here is purely functional over in-memory strings: no I/O, no
//! shared mutable state.

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod hash;
pub mod lines;
pub mod textedit;

pub use hash::{FxBuildHasher, FxHashMap, FxHashSet};
pub use lines::{ranges_to_line_numbers, LineIndex};
pub use textedit::{apply_edits, expand_edit_to_line, EditResult, Range, TextEdit};
