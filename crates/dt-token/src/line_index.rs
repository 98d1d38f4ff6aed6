//! Byte-offset to LSP-position conversion (spec.md §4.3 "Range semantics").
//!
//! Shared by every parser/analyzer that walks source text with byte offsets
//! (tree-sitter, jsonc-parser, yaml-rust2) but must hand back 0-based
//! line/UTF-16-character [`Range`]s to the protocol layer.

use crate::range::{ByteRange, Position, Range};

/// Precomputed line-start byte offsets for a single document snapshot, so
/// converting thousands of ranges does not mean rescanning from the start
/// of the file each time.
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    pub fn position(&self, text: &str, byte_offset: usize) -> Position {
        let offset = byte_offset.min(text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(l) => l,
            Err(l) => l.saturating_sub(1),
        };
        let line_start = self.line_starts[line];
        let character = text[line_start..offset].encode_utf16().count() as u32;
        Position::new(line as u32, character)
    }

    pub fn range(&self, text: &str, byte_range: ByteRange) -> Range {
        Range::new(self.position(text, byte_range.start), self.position(text, byte_range.end))
    }

    /// Inverse of [`Self::position`]: the byte offset of a line/character
    /// position, clamped to the document's bounds rather than panicking on
    /// an out-of-range position a client might still send us.
    pub fn byte_offset(&self, text: &str, position: Position) -> usize {
        let Some(&line_start) = self.line_starts.get(position.line as usize) else {
            return text.len();
        };
        let line_end = self
            .line_starts
            .get(position.line as usize + 1)
            .map(|&next| next.saturating_sub(1))
            .unwrap_or(text.len());
        let line = &text[line_start..line_end.min(text.len())];

        let mut units = 0u32;
        for (byte_idx, ch) in line.char_indices() {
            if units >= position.character {
                return line_start + byte_idx;
            }
            units += ch.len_utf16() as u32;
        }
        line_start + line.len()
    }
}
