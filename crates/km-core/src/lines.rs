//! Mapping byte ranges to 1-based line numbers for display.
//!
//! The upgrade pipeline reports changed ranges as byte offsets into the new
//! text. UIs highlight whole lines, so this module converts those ranges
//! into a compact highlight directive of the form `{3,7-9,12}`.

use crate::Range;

/// Precomputed byte offsets of every line break in a source string.
///
/// Build one per text and reuse it for all lookups; construction is O(n),
/// each lookup is a binary search.
///
/// # Examples
///
/// ```
/// use km_core::LineIndex;
///
/// let index = LineIndex::new("one\ntwo\nthree");
/// assert_eq!(index.line_at(0), 1);
/// assert_eq!(index.line_at(5), 2);
/// assert_eq!(index.line_at(12), 3);
/// ```
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Sorted byte offsets of `\n` characters.
    breaks: Vec<usize>,
}

impl LineIndex {
    /// Scans the text and records every line break offset.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let breaks = text
            .bytes()
            .enumerate()
            .filter(|&(_, b)| b == b'\n')
            .map(|(i, _)| i)
            .collect();

        Self { breaks }
    }

    /// Returns the 1-based line number containing the given byte offset.
    ///
    /// Offsets at or beyond the final line break map to the last line.
    #[must_use]
    pub fn line_at(&self, offset: usize) -> usize {
        self.breaks.partition_point(|&b| b < offset) + 1
    }
}

/// Formats changed ranges as a line-highlight directive string.
///
/// Each range is rendered as its 1-based line number (`"12"`) or line span
/// (`"7-9"`); all entries are joined with commas inside braces. The result
/// is suitable for a code-block renderer's highlight syntax.
///
/// # Examples
///
/// ```
/// use km_core::{ranges_to_line_numbers, Range};
///
/// let text = "a\nb\nc\nd\n";
/// let ranges = vec![Range::new(2, 3), Range::new(4, 7)];
/// assert_eq!(ranges_to_line_numbers(text, &ranges), "{2,3-4}");
/// ```
#[must_use]
pub fn ranges_to_line_numbers(text: &str, ranges: &[Range]) -> String {
    let index = LineIndex::new(text);

    let lines: Vec<String> = ranges
        .iter()
        .map(|range| {
            let start_line = index.line_at(range.start);
            let end_line = index.line_at(range.end);

            if start_line == end_line {
                format!("{start_line}")
            } else {
                format!("{start_line}-{end_line}")
            }
        })
        .collect();

    format!("{{{}}}", lines.join(","))
}
