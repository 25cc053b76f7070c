use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use xi_rope::delta::Builder;
use xi_rope::{Rope, RopeInfo};

use crate::model::style::{self, InlineStyle, StyleSet, StyleSpan};
use crate::model::{char_len, char_to_byte};

/// Opaque block identifier, stable across edits
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockKey(String);

impl BlockKey {
    /// Generate a fresh random key
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for BlockKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl fmt::Display for BlockKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Block-level type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    #[default]
    Unstyled,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
}

impl BlockType {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Unstyled => "unstyled",
            BlockType::HeaderOne => "header-one",
            BlockType::HeaderTwo => "header-two",
            BlockType::HeaderThree => "header-three",
            BlockType::HeaderFour => "header-four",
            BlockType::HeaderFive => "header-five",
            BlockType::HeaderSix => "header-six",
        }
    }

    pub fn is_heading(self) -> bool {
        !matches!(self, BlockType::Unstyled)
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single line of rich text: plain content plus its style spans.
///
/// The text lives in an `xi_rope::Rope`, so cloning a block (and therefore a
/// whole document snapshot) shares the underlying text instead of copying it.
#[derive(Clone)]
pub struct ContentBlock {
    pub(crate) key: BlockKey,
    pub(crate) kind: BlockType,
    pub(crate) text: Rope,
    pub(crate) depth: usize,
    /// Normalized: sorted, same-style spans never overlap or touch
    pub(crate) styles: Vec<StyleSpan>,
}

impl ContentBlock {
    pub fn new(key: BlockKey, kind: BlockType, text: &str) -> Self {
        Self {
            key,
            kind,
            text: Rope::from(text),
            depth: 0,
            styles: Vec::new(),
        }
    }

    /// An unstyled empty block with a fresh key
    pub fn empty() -> Self {
        Self::new(BlockKey::generate(), BlockType::Unstyled, "")
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    pub fn kind(&self) -> BlockType {
        self.kind
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn text(&self) -> String {
        self.text.to_string()
    }

    /// Length in chars
    pub fn len(&self) -> usize {
        char_len(&self.text())
    }

    pub fn is_empty(&self) -> bool {
        self.text.len() == 0
    }

    pub fn styles(&self) -> &[StyleSpan] {
        &self.styles
    }

    /// Every style covering the char at `offset`
    pub fn styles_at(&self, offset: usize) -> StyleSet {
        self.styles
            .iter()
            .filter(|span| span.range.contains(&offset))
            .map(|span| span.style)
            .collect()
    }

    pub fn has_style_at(&self, offset: usize, style: InlineStyle) -> bool {
        self.styles
            .iter()
            .any(|span| span.style == style && span.range.contains(&offset))
    }

    /// Replace the char range with `text`. Callers validate the range.
    pub(crate) fn replace(&mut self, range: Range<usize>, text: &str) {
        let current = self.text();
        let start = char_to_byte(&current, range.start);
        let end = char_to_byte(&current, range.end);

        let mut builder: Builder<RopeInfo> = Builder::new(self.text.len());
        builder.replace(start..end, Rope::from(text));
        let delta = builder.build();
        self.text = delta.apply(&self.text);

        self.styles = style::shift(&self.styles, &range, char_len(text));
    }

    pub(crate) fn add_style(&mut self, inline: InlineStyle, range: Range<usize>) {
        let mut styles = std::mem::take(&mut self.styles);
        styles.push(StyleSpan::new(inline, range));
        self.styles = style::normalize(styles);
    }

    /// Append another block's text and styles to the end of this one
    pub(crate) fn append(&mut self, other: &ContentBlock) {
        let offset = self.len();
        self.replace(offset..offset, &other.text());

        let mut styles = std::mem::take(&mut self.styles);
        styles.extend(other.styles.iter().map(|span| {
            StyleSpan::new(
                span.style,
                span.range.start + offset..span.range.end + offset,
            )
        }));
        self.styles = style::normalize(styles);
    }

    /// Cut the text from `at` to the end, returning it with its styles
    /// rebased to start at zero
    pub(crate) fn split_off(&mut self, at: usize) -> (String, Vec<StyleSpan>) {
        let len = self.len();
        let text = self.text();
        let tail = text[char_to_byte(&text, at)..].to_string();

        let tail_styles = self
            .styles
            .iter()
            .filter(|span| span.range.end > at)
            .map(|span| {
                StyleSpan::new(span.style, span.range.start.max(at) - at..span.range.end - at)
            })
            .collect();

        self.replace(at..len, "");
        (tail, style::normalize(tail_styles))
    }
}

impl fmt::Debug for ContentBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentBlock")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("text", &self.text())
            .field("depth", &self.depth)
            .field("styles", &self.styles)
            .finish()
    }
}

impl PartialEq for ContentBlock {
    fn eq(&self, other: &Self) -> bool {
        // Compare rope contents as strings; the tree shapes may differ
        self.key == other.key
            && self.kind == other.kind
            && self.depth == other.depth
            && self.styles == other.styles
            && self.text() == other.text()
    }
}
