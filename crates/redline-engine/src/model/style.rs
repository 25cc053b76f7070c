use std::collections::BTreeSet;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::model::BlockKey;

/// Inline styles the formatter can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InlineStyle {
    Bold,
    Underline,
    /// Rendered in red by the decorator
    Redline,
}

impl InlineStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            InlineStyle::Bold => "BOLD",
            InlineStyle::Underline => "UNDERLINE",
            InlineStyle::Redline => "REDLINE",
        }
    }
}

/// Styles covering a single char
pub type StyleSet = BTreeSet<InlineStyle>;

/// A style applied over a char range of the block that owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSpan {
    pub style: InlineStyle,
    pub range: Range<usize>,
}

impl StyleSpan {
    pub fn new(style: InlineStyle, range: Range<usize>) -> Self {
        Self { style, range }
    }
}

/// A style span addressed by block, as exposed across the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRange {
    pub block: BlockKey,
    pub range: Range<usize>,
    pub style: InlineStyle,
}

/// Sort spans and merge overlapping or touching spans of the same style.
///
/// Empty spans are dropped. The result never holds two spans of one style
/// that share a char, so identical spans cannot be duplicated.
pub(crate) fn normalize(mut spans: Vec<StyleSpan>) -> Vec<StyleSpan> {
    spans.retain(|span| span.range.start < span.range.end);
    spans.sort_by_key(|span| (span.style, span.range.start, span.range.end));

    let mut merged: Vec<StyleSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if last.style == span.style && span.range.start <= last.range.end => {
                last.range.end = last.range.end.max(span.range.end);
            }
            _ => merged.push(span),
        }
    }
    merged
}

/// Move spans through a text replacement of `edit` by `inserted` chars.
///
/// Text removed by the edit takes its styling with it and the inserted text
/// is unstyled, so a span straddling the edit splits around the new text.
pub(crate) fn shift(spans: &[StyleSpan], edit: &Range<usize>, inserted: usize) -> Vec<StyleSpan> {
    let moved = |offset: usize| offset - edit.end + edit.start + inserted;
    let mut shifted = Vec::with_capacity(spans.len() + 1);

    for span in spans {
        let range = &span.range;
        if range.end <= edit.start {
            shifted.push(span.clone());
        } else if range.start >= edit.end {
            shifted.push(StyleSpan::new(span.style, moved(range.start)..moved(range.end)));
        } else {
            if range.start < edit.start {
                shifted.push(StyleSpan::new(span.style, range.start..edit.start));
            }
            if range.end > edit.end {
                shifted.push(StyleSpan::new(
                    span.style,
                    edit.start + inserted..moved(range.end),
                ));
            }
        }
    }

    normalize(shifted)
}
