//! Static rule tables mapping deprecated syntax to its replacement.
//!
//! Tables are pure data: deprecated key to [`RuleAction`]. Lookups return
//! `Option<RuleAction>` so the three states stay distinct:
//!
//! - `None`: not deprecated, leave it alone
//! - `Some(RuleAction::Renamed(_))`: direct textual replacement exists
//! - `Some(RuleAction::Removed)`: removed with no successor; the consuming
//!   pass decides the fallback (e.g. commenting out the whole invocation)
//!
//! Each table is a static slice loaded once into an `FxHashMap` on first
//! lookup.

use std::sync::OnceLock;

use km_core::FxHashMap;

/// The action a rule table prescribes for a deprecated key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    /// The construct was renamed; substitute this text.
    Renamed(&'static str),

    /// The construct was removed outright with no direct replacement.
    Removed,
}

use RuleAction::{Removed, Renamed};

/// Deprecated behavior reference names (the identifier after `&`).
const BEHAVIORS: &[(&str, RuleAction)] = &[
    ("cp", Renamed("kp")),
    ("inc_dec_cp", Renamed("inc_dec_kp")),
    ("reset", Renamed("sys_reset")),
];

/// Deprecated key code identifiers normalized to their canonical names.
///
/// `KSPC` was removed outright and maps to [`RuleAction::Removed`].
const CODES: &[(&str, RuleAction)] = &[
    ("NUM_1", Renamed("N1")),
    ("NUM_2", Renamed("N2")),
    ("NUM_3", Renamed("N3")),
    ("NUM_4", Renamed("N4")),
    ("NUM_5", Renamed("N5")),
    ("NUM_6", Renamed("N6")),
    ("NUM_7", Renamed("N7")),
    ("NUM_8", Renamed("N8")),
    ("NUM_9", Renamed("N9")),
    ("NUM_0", Renamed("N0")),
    ("BKSP", Renamed("BSPC")),
    ("SPC", Renamed("SPACE")),
    ("EQL", Renamed("EQUAL")),
    ("TILD", Renamed("TILDE")),
    ("SCLN", Renamed("SEMI")),
    ("QUOT", Renamed("SQT")),
    ("GRAV", Renamed("GRAVE")),
    ("CMMA", Renamed("COMMA")),
    ("PRSC", Renamed("PSCRN")),
    ("SCLK", Renamed("SLCK")),
    ("PAUS", Renamed("PAUSE_BREAK")),
    ("PGUP", Renamed("PG_UP")),
    ("PGDN", Renamed("PG_DN")),
    ("RARW", Renamed("RIGHT")),
    ("LARW", Renamed("LEFT")),
    ("DARW", Renamed("DOWN")),
    ("UARW", Renamed("UP")),
    ("KDIV", Renamed("KP_DIVIDE")),
    ("KMLT", Renamed("KP_MULTIPLY")),
    ("KMIN", Renamed("KP_MINUS")),
    ("KPLS", Renamed("KP_PLUS")),
    ("UNDO", Renamed("K_UNDO")),
    ("CUT", Renamed("K_CUT")),
    ("COPY", Renamed("K_COPY")),
    ("PSTE", Renamed("K_PASTE")),
    ("VOLU", Renamed("K_VOL_UP")),
    ("VOLD", Renamed("K_VOL_DN")),
    ("CURU", Renamed("DLLR")),
    ("LPRN", Renamed("LPAR")),
    ("RPRN", Renamed("RPAR")),
    ("LCUR", Renamed("LBRC")),
    ("RCUR", Renamed("RBRC")),
    ("CRRT", Renamed("CARET")),
    ("PRCT", Renamed("PRCNT")),
    ("LABT", Renamed("LT")),
    ("RABT", Renamed("GT")),
    ("COLN", Renamed("COLON")),
    ("KSPC", Removed),
    ("ATSN", Renamed("AT")),
    ("BANG", Renamed("EXCL")),
    ("LCTL", Renamed("LCTRL")),
    ("LSFT", Renamed("LSHIFT")),
    ("RCTL", Renamed("RCTRL")),
    ("RSFT", Renamed("RSHIFT")),
    ("M_NEXT", Renamed("C_NEXT")),
    ("M_PREV", Renamed("C_PREV")),
    ("M_STOP", Renamed("C_STOP")),
    ("M_EJCT", Renamed("C_EJECT")),
    ("M_PLAY", Renamed("C_PP")),
    ("M_MUTE", Renamed("C_MUTE")),
    ("M_VOLU", Renamed("C_VOL_UP")),
    ("M_VOLD", Renamed("C_VOL_DN")),
    ("GUI", Renamed("K_CMENU")),
    ("MOD_LCTL", Renamed("LCTRL")),
    ("MOD_LSFT", Renamed("LSHIFT")),
    ("MOD_LALT", Renamed("LALT")),
    ("MOD_LGUI", Renamed("LGUI")),
    ("MOD_RCTL", Renamed("RCTRL")),
    ("MOD_RSFT", Renamed("RSHIFT")),
    ("MOD_RALT", Renamed("RALT")),
    ("MOD_RGUI", Renamed("RGUI")),
];

/// Renamed include header paths, matched without their delimiters.
const HEADERS: &[(&str, RuleAction)] = &[(
    "dt-bindings/zmk/matrix-transform.h",
    Renamed("dt-bindings/zmk/matrix_transform.h"),
)];

/// Deprecated absolute node paths mapped to the node's new bare name.
const NODE_PATHS: &[(&str, RuleAction)] = &[
    // Old trees nested encoder sensor definitions under a nonstandard
    // node name; only the name changes, never the node's position.
    ("/encoder_sensors", Renamed("sensors")),
];

static BEHAVIOR_MAP: OnceLock<FxHashMap<&'static str, RuleAction>> = OnceLock::new();
static CODE_MAP: OnceLock<FxHashMap<&'static str, RuleAction>> = OnceLock::new();
static HEADER_MAP: OnceLock<FxHashMap<&'static str, RuleAction>> = OnceLock::new();
static NODE_PATH_MAP: OnceLock<FxHashMap<&'static str, RuleAction>> = OnceLock::new();

/// Looks up a table, building its map on first use.
fn lookup(
    cell: &'static OnceLock<FxHashMap<&'static str, RuleAction>>,
    table: &'static [(&'static str, RuleAction)],
    key: &str,
) -> Option<RuleAction> {
    cell.get_or_init(|| table.iter().copied().collect())
        .get(key)
        .copied()
}

/// Returns the rule for a behavior reference name, if it is deprecated.
#[must_use]
pub fn behavior_replacement(name: &str) -> Option<RuleAction> {
    lookup(&BEHAVIOR_MAP, BEHAVIORS, name)
}

/// Returns the rule for a key code identifier, if it is deprecated.
#[must_use]
pub fn keycode_replacement(name: &str) -> Option<RuleAction> {
    lookup(&CODE_MAP, CODES, name)
}

/// Returns the rule for a bare include path, if it is deprecated.
#[must_use]
pub fn header_replacement(path: &str) -> Option<RuleAction> {
    lookup(&HEADER_MAP, HEADERS, path)
}

/// Returns the rule for an absolute node path, if it is deprecated.
#[must_use]
pub fn node_path_replacement(path: &str) -> Option<RuleAction> {
    lookup(&NODE_PATH_MAP, NODE_PATHS, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_behavior_rename() {
        assert_eq!(
            behavior_replacement("reset"),
            Some(RuleAction::Renamed("sys_reset"))
        );
        assert_eq!(behavior_replacement("kp"), None);
    }

    #[test]
    fn test_keycode_rename() {
        assert_eq!(keycode_replacement("BKSP"), Some(RuleAction::Renamed("BSPC")));
        assert_eq!(keycode_replacement("A"), None);
    }

    #[test]
    fn test_keycode_removed() {
        assert_eq!(keycode_replacement("KSPC"), Some(RuleAction::Removed));
    }

    #[test]
    fn test_header_rename() {
        assert_eq!(
            header_replacement("dt-bindings/zmk/matrix-transform.h"),
            Some(RuleAction::Renamed("dt-bindings/zmk/matrix_transform.h"))
        );
        assert_eq!(header_replacement("dt-bindings/zmk/keys.h"), None);
    }

    #[test]
    fn test_node_path_rename() {
        assert_eq!(
            node_path_replacement("/encoder_sensors"),
            Some(RuleAction::Renamed("sensors"))
        );
        assert_eq!(node_path_replacement("/keymap"), None);
    }

    #[test]
    fn test_no_duplicate_table_keys() {
        for table in [BEHAVIORS, CODES, HEADERS, NODE_PATHS] {
            let map: FxHashMap<&str, RuleAction> = table.iter().copied().collect();
            assert_eq!(map.len(), table.len());
        }
    }
}
