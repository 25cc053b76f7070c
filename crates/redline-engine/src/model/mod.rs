//! Document model types shared by the editing core and the formatter.
//!
//! Offsets everywhere in this crate count chars (Unicode scalar values) within
//! a single block's text, never bytes.

pub mod block;
pub mod selection;
pub mod style;

pub use block::{BlockKey, BlockType, ContentBlock};
pub use selection::{Position, Selection};
pub use style::{InlineStyle, StyleRange, StyleSet, StyleSpan};

/// Number of chars in `text`
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Convert a char offset into a byte offset, clamped to the end of `text`
pub(crate) fn char_to_byte(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map_or(text.len(), |(byte, _)| byte)
}
