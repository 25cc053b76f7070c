use std::collections::HashSet;
use std::ops::Range;

use crate::editing::{DocumentEngine, EditError, raw};
use crate::model::{
    BlockKey, BlockType, ContentBlock, InlineStyle, Position, Selection, StyleRange,
};

/// Immutable document snapshot: ordered blocks plus the selection.
///
/// A `Document` is never edited in place once handed out. Every primitive in
/// [`DocumentEngine`] and every [`Cmd`](crate::editing::Cmd) works on a private
/// clone and returns the result as a new snapshot. Cloning is cheap because
/// block text is held in persistent ropes.
///
/// ## Invariants
///
/// - At least one block
/// - Block keys are unique
/// - Both selection ends name existing blocks at offsets within their text
/// - Style spans satisfy `0 <= start < end <= len(text)`
///
/// ## Usage Pattern
///
/// ```rust
/// use redline_engine::{Cmd, Document, DocumentEngine};
///
/// let doc = Document::create_empty();
/// let doc = doc.apply(&Cmd::InsertText { text: "hello".to_string() }).unwrap();
/// assert_eq!(doc.active_block().text(), "hello");
///
/// // Round-trip through the persisted form
/// let raw = doc.serialize().unwrap();
/// let restored = Document::create_from_serialized_form(&raw).unwrap();
/// assert_eq!(restored.blocks(), doc.blocks());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) blocks: Vec<ContentBlock>,
    pub(crate) selection: Selection,
}

impl Document {
    /// Build a document from blocks, with the caret at the start of the first
    pub fn new(blocks: Vec<ContentBlock>) -> Result<Self, EditError> {
        let Some(first) = blocks.first() else {
            return Err(EditError::malformed("document has no blocks"));
        };

        let mut seen = HashSet::new();
        for block in &blocks {
            if !seen.insert(block.key()) {
                return Err(EditError::malformed(format!(
                    "duplicate block key {}",
                    block.key()
                )));
            }
        }

        let selection = Selection::collapsed(first.key().clone(), 0);
        Ok(Self { blocks, selection })
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn block(&self, key: &BlockKey) -> Option<&ContentBlock> {
        self.blocks.iter().find(|block| block.key() == key)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The block holding the selection focus
    pub fn active_block(&self) -> &ContentBlock {
        self.block(&self.selection.focus.block)
            .unwrap_or(&self.blocks[0])
    }

    /// Every style span in the document, in block order
    pub fn style_ranges(&self) -> Vec<StyleRange> {
        self.blocks
            .iter()
            .flat_map(|block| {
                block.styles().iter().map(|span| StyleRange {
                    block: block.key().clone(),
                    range: span.range.clone(),
                    style: span.style,
                })
            })
            .collect()
    }

    /// Block texts joined by newlines
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(ContentBlock::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub(crate) fn block_index(&self, key: &BlockKey) -> Result<usize, EditError> {
        self.blocks
            .iter()
            .position(|block| block.key() == key)
            .ok_or_else(|| EditError::UnknownBlock(key.clone()))
    }

    pub(crate) fn block_mut(&mut self, key: &BlockKey) -> Result<&mut ContentBlock, EditError> {
        let index = self.block_index(key)?;
        Ok(&mut self.blocks[index])
    }

    /// Selection ends in document order
    pub(crate) fn ordered_selection(&self) -> Result<(Position, Position), EditError> {
        let anchor = &self.selection.anchor;
        let focus = &self.selection.focus;
        let anchor_at = (self.block_index(&anchor.block)?, anchor.offset);
        let focus_at = (self.block_index(&focus.block)?, focus.offset);

        if anchor_at <= focus_at {
            Ok((anchor.clone(), focus.clone()))
        } else {
            Ok((focus.clone(), anchor.clone()))
        }
    }

    /// A key no block in this document uses yet
    pub(crate) fn fresh_key(&self) -> BlockKey {
        loop {
            let key = BlockKey::generate();
            if self.block(&key).is_none() {
                return key;
            }
        }
    }

    fn check_position(&self, position: &Position) -> Result<(), EditError> {
        let block = self
            .block(&position.block)
            .ok_or_else(|| EditError::UnknownBlock(position.block.clone()))?;
        let len = block.len();
        if position.offset > len {
            return Err(EditError::OffsetOutOfRange {
                offset: position.offset,
                len,
            });
        }
        Ok(())
    }
}

impl DocumentEngine for Document {
    fn create_empty() -> Self {
        let block = ContentBlock::empty();
        let selection = Selection::collapsed(block.key().clone(), 0);
        Self {
            blocks: vec![block],
            selection,
        }
    }

    fn create_from_serialized_form(raw: &str) -> Result<Self, EditError> {
        raw::decode(raw)
    }

    fn serialize(&self) -> Result<String, EditError> {
        raw::encode(self)
    }

    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn block_text(&self, key: &BlockKey) -> Option<String> {
        self.block(key).map(ContentBlock::text)
    }

    fn replace_text_range(
        &self,
        key: &BlockKey,
        range: Range<usize>,
        text: &str,
    ) -> Result<Self, EditError> {
        if text.contains('\n') {
            return Err(EditError::LineBreakInBlock);
        }

        let mut next = self.clone();
        let block = next.block_mut(key)?;
        let len = block.len();
        if range.start > range.end || range.end > len {
            return Err(EditError::OffsetOutOfRange {
                offset: range.start.max(range.end),
                len,
            });
        }

        block.replace(range.clone(), text);
        next.selection = Selection::collapsed(key.clone(), range.start + text.chars().count());
        Ok(next)
    }

    fn apply_style_over_range(
        &self,
        key: &BlockKey,
        range: Range<usize>,
        style: InlineStyle,
    ) -> Result<Self, EditError> {
        let mut next = self.clone();
        let block = next.block_mut(key)?;
        let len = block.len();
        if range.start >= range.end || range.end > len {
            return Err(EditError::StyleRangeInvalid { range, len });
        }

        block.add_style(style, range);
        Ok(next)
    }

    fn set_block_type(&self, key: &BlockKey, kind: BlockType) -> Result<Self, EditError> {
        let mut next = self.clone();
        next.block_mut(key)?.kind = kind;
        Ok(next)
    }

    fn push_selection(&self, selection: Selection) -> Result<Self, EditError> {
        self.check_position(&selection.anchor)?;
        self.check_position(&selection.focus)?;

        let mut next = self.clone();
        next.selection = selection;
        Ok(next)
    }
}
