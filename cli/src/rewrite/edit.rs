//! # Applicator Edit Buffer
//!
//! File: cli/src/rewrite/edit.rs
//!
//! ## Overview
//!
//! A positional text-splicing primitive. The buffer borrows the original bytes
//! of one file and records replacements expressed in *original* offsets.
//! Nothing is applied until `materialize` is called, which interleaves the
//! untouched original ranges with the replacement text in a single pass.
//!
//! ## Ordering Contract
//!
//! Edits must be recorded in non-decreasing `start` order and must not overlap.
//! The header scanner guarantees this by emitting edits during one forward pass
//! over the file, so the buffer never sorts. Two edits at the same position are
//! applied in call order: an `insert` followed by a `replace` at the same offset
//! produces the inserted text first.
//!
//! ```rust
//! let mut buf = EditBuffer::new(b"import \"a/b\"");
//! buf.insert(7, "alias ");
//! buf.replace(7, 12, "\"c/b\"");
//! assert_eq!(buf.materialize(), b"import alias \"c/b\"".to_vec());
//! ```
//!

/// A single pending replacement of `original[start..end]` with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

/// Accumulates edits against an immutable byte slice.
#[derive(Debug)]
pub struct EditBuffer<'a> {
    original: &'a [u8],
    edits: Vec<Edit>,
}

impl<'a> EditBuffer<'a> {
    /// Creates a buffer over `original` with no pending edits.
    pub fn new(original: &'a [u8]) -> Self {
        Self {
            original,
            edits: Vec::new(),
        }
    }

    /// Inserts `text` at `pos`. Shorthand for `replace(pos, pos, text)`.
    pub fn insert(&mut self, pos: usize, text: impl Into<String>) {
        self.replace(pos, pos, text);
    }

    /// Replaces the original byte range `[start, end)` with `text`.
    ///
    /// Offsets always refer to the original content, never to the output of
    /// earlier edits.
    pub fn replace(&mut self, start: usize, end: usize, text: impl Into<String>) {
        debug_assert!(start <= end, "edit range is reversed: {start}..{end}");
        debug_assert!(
            end <= self.original.len(),
            "edit range {start}..{end} exceeds buffer length {}",
            self.original.len()
        );
        if let Some(last) = self.edits.last() {
            debug_assert!(
                start >= last.end,
                "edit at {start} is out of order or overlaps previous edit {}..{}",
                last.start,
                last.end
            );
        }
        self.edits.push(Edit {
            start,
            end,
            text: text.into(),
        });
    }

    /// Produces the final content. Consumes the buffer so the result is built
    /// exactly once.
    pub fn materialize(self) -> Vec<u8> {
        if self.edits.is_empty() {
            return self.original.to_vec();
        }

        let extra: usize = self.edits.iter().map(|e| e.text.len()).sum();
        let mut out = Vec::with_capacity(self.original.len() + extra);
        let mut cursor = 0;
        for edit in &self.edits {
            out.extend_from_slice(&self.original[cursor..edit.start]);
            out.extend_from_slice(edit.text.as_bytes());
            cursor = edit.end;
        }
        out.extend_from_slice(&self.original[cursor..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_edits_returns_original() {
        let src = b"package main\n\nfunc main() {}\n";
        let buf = EditBuffer::new(src);
        assert_eq!(buf.materialize(), src.to_vec());
    }

    #[test]
    fn test_replace_and_insert() {
        let src = b"hello world";
        let mut buf = EditBuffer::new(src);
        buf.insert(0, ">> ");
        buf.replace(6, 11, "rust");
        assert_eq!(buf.materialize(), b">> hello rust".to_vec());
    }

    #[test]
    fn test_insert_before_replace_at_same_position() {
        let src = br#"import "github.com/a/tmpl""#;
        let mut buf = EditBuffer::new(src);
        buf.insert(7, "tmpl ");
        buf.replace(7, src.len(), r#""github.com/b/app""#);
        assert_eq!(
            String::from_utf8(buf.materialize()).unwrap(),
            r#"import tmpl "github.com/b/app""#
        );
    }

    #[test]
    fn test_replace_with_shorter_and_longer_text() {
        let src = b"aaa bbb ccc";
        let mut buf = EditBuffer::new(src);
        buf.replace(0, 3, "x");
        buf.replace(4, 7, "yyyyyy");
        buf.replace(8, 11, "");
        assert_eq!(buf.materialize(), b"x yyyyyy ".to_vec());
    }

    #[test]
    fn test_edit_at_end_of_buffer() {
        let src = b"abc";
        let mut buf = EditBuffer::new(src);
        buf.insert(3, "def");
        assert_eq!(buf.materialize(), b"abcdef".to_vec());
    }
}
