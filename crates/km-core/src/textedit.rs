//! Text edit model: spans, replacements, and the edit applier.
//!
//! This module provides the [`Range`], [`TextEdit`], and [`EditResult`] value
//! types plus [`apply_edits`], which rewrites a source string and reports
//! which byte ranges of the *output* changed.
//!
//! # Offset Conventions
//!
//! - All edit offsets are byte offsets into the **original** source text.
//! - Ranges are half-open: `[start, end)`.
//! - [`EditResult::changed_ranges`] is expressed in offsets into the **new**
//!   text, ascending and non-overlapping.
//!
//! Edits are never expressed in terms of each other; every edit must be
//! independently derivable from the original text.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A half-open byte range `[start, end)` within a source string.
///
/// # Examples
///
/// ```
/// use km_core::Range;
///
/// let range = Range::new(3, 7);
/// assert_eq!(range.len(), 4);
/// assert!(!range.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    /// Start byte offset (inclusive).
    pub start: usize,

    /// End byte offset (exclusive).
    pub end: usize,
}

impl Range {
    /// Creates a new range.
    ///
    /// Callers must uphold `start <= end`.
    #[inline]
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the number of bytes covered by this range.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the range covers no bytes.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A replacement of one original-text span with new text.
///
/// # Examples
///
/// ```
/// use km_core::TextEdit;
///
/// // Replace bytes 4..9 with "steps"
/// let edit = TextEdit::new(4, 9, "steps");
/// assert_eq!(edit.range.start, 4);
/// assert_eq!(edit.new_text, "steps");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// The span of original text to replace.
    pub range: Range,

    /// The replacement text. Empty for a pure deletion.
    pub new_text: String,
}

impl TextEdit {
    /// Creates an edit replacing `[start, end)` with `new_text`.
    #[must_use]
    pub fn new(start: usize, end: usize, new_text: impl Into<String>) -> Self {
        Self {
            range: Range::new(start, end),
            new_text: new_text.into(),
        }
    }

    /// Creates an edit replacing an existing range with `new_text`.
    #[must_use]
    pub fn from_range(range: Range, new_text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: new_text.into(),
        }
    }

    /// Returns `true` if this edit deletes its span outright.
    #[inline]
    #[must_use]
    pub fn is_deletion(&self) -> bool {
        self.new_text.is_empty()
    }
}

/// The outcome of applying a set of edits to a source string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditResult {
    /// The rewritten text.
    pub text: String,

    /// Byte ranges within [`text`](Self::text) that were inserted or
    /// changed, ascending and non-overlapping. A pure deletion contributes
    /// a zero-width range at the deletion site, so line mapping still
    /// reports the line a removal touched.
    pub changed_ranges: Vec<Range>,
}

/// Applies a set of text edits and reports the changed output ranges.
///
/// Edits are sorted by start offset (stable, so equal starts keep their
/// submission order) and applied left to right. An edit that starts before
/// the write cursor overlaps an already-applied edit; it is dropped with a
/// warning rather than corrupting the output. This makes conflict
/// resolution deterministic: the first edit in sorted order wins.
///
/// Pure deletions are first expanded to swallow the whole line when the
/// deleted span is the only content on that line (see [`expand_edit_to_line`]).
///
/// Changed ranges are accumulated against the growing output length, so they
/// stay correct even though insertions and deletions shift all subsequent
/// offsets. Every applied edit contributes a range, including deletions,
/// which yield a zero-width range marking where text was removed.
///
/// # Examples
///
/// ```
/// use km_core::{apply_edits, Range, TextEdit};
///
/// let result = apply_edits("a cat sat", &[TextEdit::new(2, 5, "dog")]);
/// assert_eq!(result.text, "a dog sat");
/// assert_eq!(result.changed_ranges, vec![Range::new(2, 5)]);
/// ```
#[must_use]
pub fn apply_edits(text: &str, edits: &[TextEdit]) -> EditResult {
    let mut edits: Vec<TextEdit> = edits
        .iter()
        .map(|e| {
            if e.is_deletion() {
                expand_edit_to_line(text, e.clone())
            } else {
                e.clone()
            }
        })
        .collect();

    edits.sort_by_key(|e| e.range.start);

    let mut result = EditResult {
        text: String::with_capacity(text.len()),
        changed_ranges: Vec::new(),
    };
    let mut cursor = 0;

    for edit in &edits {
        if edit.range.start < cursor {
            warn!(
                start = edit.range.start,
                end = edit.range.end,
                new_text = %edit.new_text,
                "discarding overlapping edit"
            );
            continue;
        }

        result.text.push_str(&text[cursor..edit.range.start]);

        let changed_start = result.text.len();
        result.text.push_str(&edit.new_text);
        result
            .changed_ranges
            .push(Range::new(changed_start, result.text.len()));

        cursor = edit.range.end;
    }

    result.text.push_str(&text[cursor..]);

    result
}

/// Expands a deletion to cover its whole line when only whitespace surrounds
/// it on that line, else returns the edit unmodified.
///
/// The span is grown through adjacent spaces and tabs in both directions. If
/// the grown span then reaches from a line start (or the start of the text)
/// to a line end (or the end of the text), one adjacent line break is
/// absorbed so the emptied line is removed entirely instead of being left
/// blank.
#[must_use]
pub fn expand_edit_to_line(text: &str, edit: TextEdit) -> TextEdit {
    let bytes = text.as_bytes();
    let mut new_start = edit.range.start;
    let mut new_end = edit.range.end;

    // Expand the selection through adjacent horizontal whitespace.
    while new_start > 0 && matches!(bytes[new_start - 1], b' ' | b'\t') {
        new_start -= 1;
    }

    while new_end < bytes.len() && matches!(bytes[new_end], b' ' | b'\t') {
        new_end += 1;
    }

    // Check that we selected the entire line.
    if (new_end != bytes.len() && bytes[new_end] != b'\n')
        || (new_start > 0 && bytes[new_start - 1] != b'\n')
    {
        return edit;
    }

    // Select one of the line breaks to remove.
    if new_end != bytes.len() {
        new_end += 1;
    } else if new_start != 0 {
        new_start -= 1;
    }

    TextEdit::new(new_start, new_end, edit.new_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_len() {
        let range = Range::new(2, 10);
        assert_eq!(range.len(), 8);
        assert!(!range.is_empty());
        assert!(Range::new(3, 3).is_empty());
    }

    #[test]
    fn test_range_serialization() {
        let range = Range::new(3, 9);
        let json = serde_json::to_string(&range).expect("serialization failed");
        let parsed: Range = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(range, parsed);
    }

    #[test]
    fn test_apply_no_edits() {
        let result = apply_edits("abc def", &[]);
        assert_eq!(result.text, "abc def");
        assert!(result.changed_ranges.is_empty());
    }

    #[test]
    fn test_apply_single_replacement() {
        let result = apply_edits("one two three", &[TextEdit::new(4, 7, "TWO")]);
        assert_eq!(result.text, "one TWO three");
        assert_eq!(result.changed_ranges, vec![Range::new(4, 7)]);
    }

    #[test]
    fn test_apply_insertion() {
        let result = apply_edits("ab", &[TextEdit::new(1, 1, "XY")]);
        assert_eq!(result.text, "aXYb");
        assert_eq!(result.changed_ranges, vec![Range::new(1, 3)]);
    }

    #[test]
    fn test_apply_edits_out_of_order() {
        let edits = vec![TextEdit::new(8, 13, "THREE"), TextEdit::new(0, 3, "ONE")];
        let result = apply_edits("one two three", &edits);
        assert_eq!(result.text, "ONE two THREE");
        assert_eq!(
            result.changed_ranges,
            vec![Range::new(0, 3), Range::new(8, 13)]
        );
    }

    #[test]
    fn test_changed_ranges_shift_with_growth() {
        // First edit grows the text by 3 bytes; the second range must be
        // reported against the new offsets.
        let edits = vec![TextEdit::new(0, 1, "aaaa"), TextEdit::new(3, 4, "b")];
        let result = apply_edits("x yz", &edits);
        assert_eq!(result.text, "aaaa yb");
        assert_eq!(
            result.changed_ranges,
            vec![Range::new(0, 4), Range::new(6, 7)]
        );
    }

    #[test]
    fn test_overlapping_edit_dropped() {
        // Both edits cover byte 2; the one sorting first wins.
        let edits = vec![TextEdit::new(0, 3, "AAA"), TextEdit::new(2, 5, "BBB")];
        let result = apply_edits("abcdef", &edits);
        assert_eq!(result.text, "AAAdef");
        assert_eq!(result.changed_ranges, vec![Range::new(0, 3)]);
    }

    #[test]
    fn test_overlap_tie_is_deterministic() {
        // Equal start offsets: stable sort keeps submission order, so the
        // first-submitted edit wins every time.
        let edits = vec![TextEdit::new(1, 2, "first"), TextEdit::new(1, 3, "second")];
        let result = apply_edits("abcd", &edits);
        assert_eq!(result.text, "afirstcd");
    }

    #[test]
    fn test_delete_sole_content_removes_line() {
        let text = "one;\n    gone;\ntwo;\n";
        let result = apply_edits(text, &[TextEdit::new(9, 14, "")]);
        assert_eq!(result.text, "one;\ntwo;\n");
        // Deletions report a zero-width range at the removal site.
        assert_eq!(result.changed_ranges, vec![Range::new(5, 5)]);
    }

    #[test]
    fn test_delete_partial_line_keeps_line() {
        let text = "keep; gone;\n";
        let result = apply_edits(text, &[TextEdit::new(6, 11, "")]);
        // "keep;" remains on the line, so the edit is not expanded and the
        // surrounding whitespace stays.
        assert_eq!(result.text, "keep; \n");
    }

    #[test]
    fn test_delete_last_line_absorbs_preceding_break() {
        let text = "one;\n  gone;";
        let result = apply_edits(text, &[TextEdit::new(7, 12, "")]);
        assert_eq!(result.text, "one;");
    }

    #[test]
    fn test_delete_entire_text() {
        let result = apply_edits("  gone  ", &[TextEdit::new(2, 6, "")]);
        assert_eq!(result.text, "");
    }

    #[test]
    fn test_expand_edit_not_on_line_boundary() {
        let edit = TextEdit::new(2, 4, "");
        let expanded = expand_edit_to_line("ab cd ef", edit.clone());
        // "ab" remains before the whitespace run, so no expansion.
        assert_eq!(expanded.range, edit.range);
    }

    #[test]
    fn test_replacement_on_own_line_is_not_expanded() {
        // Line expansion only applies to pure deletions.
        let text = "a\n  b\nc\n";
        let result = apply_edits(text, &[TextEdit::new(4, 5, "B")]);
        assert_eq!(result.text, "a\n  B\nc\n");
    }

    #[test]
    fn test_changed_ranges_sorted_and_disjoint() {
        let edits = vec![
            TextEdit::new(0, 1, "X"),
            TextEdit::new(2, 3, "Y"),
            TextEdit::new(4, 5, "Z"),
        ];
        let result = apply_edits("a b c", &edits);
        for pair in result.changed_ranges.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
    }
}
