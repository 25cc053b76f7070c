use std::ops::Range;

use crate::editing::EditError;
use crate::model::{BlockKey, BlockType, InlineStyle, Selection};

/// Rich-text primitives the formatter is written against.
///
/// Every operation takes a snapshot by reference and returns a new one, so
/// a chain of primitives can be composed on local values and only the final
/// result published. A failed step leaves the input snapshot untouched.
pub trait DocumentEngine: Sized {
    /// A document with a single empty unstyled block
    fn create_empty() -> Self;

    /// Decode a serialized document.
    ///
    /// # Errors
    ///
    /// `EditError::MalformedDocument` when `raw` cannot be decoded or violates
    /// the model invariants.
    fn create_from_serialized_form(raw: &str) -> Result<Self, EditError>;

    /// Encode for persistence
    fn serialize(&self) -> Result<String, EditError>;

    fn selection(&self) -> &Selection;

    /// Current text of a block, `None` if the key is unknown
    fn block_text(&self, key: &BlockKey) -> Option<String>;

    /// Replace a char range of a block's text. The caret lands after the new
    /// text unless a selection is pushed afterwards.
    fn replace_text_range(
        &self,
        key: &BlockKey,
        range: Range<usize>,
        text: &str,
    ) -> Result<Self, EditError>;

    /// Layer `style` over a non-empty char range of a block
    fn apply_style_over_range(
        &self,
        key: &BlockKey,
        range: Range<usize>,
        style: InlineStyle,
    ) -> Result<Self, EditError>;

    fn set_block_type(&self, key: &BlockKey, kind: BlockType) -> Result<Self, EditError>;

    /// Force the selection to an explicit position, overriding the natural
    /// post-edit placement
    fn push_selection(&self, selection: Selection) -> Result<Self, EditError>;
}
