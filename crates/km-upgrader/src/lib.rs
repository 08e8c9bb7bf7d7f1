//! Deprecation upgrader for devicetree keymap files.
//!
//! Given the full text of a keymap, this crate locates deprecated
//! constructs (renamed behavior references, renamed or removed key codes,
//! renamed include headers, renamed configuration nodes, `label`
//! properties, and the encoder resolution convention change), computes
//! minimal non-overlapping text edits, applies them, and reports exactly
//! which output ranges changed.
//!
//! # Overview
//!
//! The entry point is [`Upgrader`]:
//!
//! ```
//! use km_upgrader::Upgrader;
//!
//! let mut upgrader = Upgrader::new()?;
//! let outcome = upgrader.upgrade("/ { keymap { bindings = <&kp BKSP>; }; };")?;
//!
//! assert_eq!(outcome.text, "/ { keymap { bindings = <&kp BSPC>; }; };");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Fault Model
//!
//! - Grammar load failure is fatal and surfaces once, at [`Upgrader::new`].
//! - A pass that fails internally is logged and skipped; sibling passes
//!   still contribute their edits.
//! - Overlapping edits resolve deterministically: first in sorted order
//!   wins, the conflict is dropped with a warning.
//! - Unparsable regions simply produce no matches and stay unchanged.

#![deny(clippy::all)]
#![warn(missing_docs)]

mod behaviors;
mod encoder;
pub mod error;
mod headers;
mod keycodes;
mod nodes;
mod pipeline;
mod properties;
pub mod rules;

pub use behaviors::upgrade_behaviors;
pub use encoder::upgrade_encoder_resolution;
pub use error::{PassError, UpgradeError};
pub use headers::upgrade_headers;
pub use keycodes::upgrade_keycodes;
pub use nodes::upgrade_nodes;
pub use pipeline::{UpgradeOutcome, Upgrader};
pub use properties::upgrade_properties;
pub use rules::RuleAction;

// Re-export the core result types callers consume
pub use km_core::{EditResult, Range, TextEdit};
