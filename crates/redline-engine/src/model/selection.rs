use crate::model::BlockKey;

/// A caret location: a block plus a char offset into its text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub block: BlockKey,
    pub offset: usize,
}

impl Position {
    pub fn new(block: BlockKey, offset: usize) -> Self {
        Self { block, offset }
    }
}

/// Text selection with anchor and focus positions.
///
/// The anchor is where the selection started, the focus is where the caret is
/// now. They may be in any order; the document resolves which comes first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
}

impl Selection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// A single caret with nothing selected
    pub fn collapsed(block: BlockKey, offset: usize) -> Self {
        let position = Position::new(block, offset);
        Self {
            anchor: position.clone(),
            focus: position,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The caret position, if the selection is collapsed
    pub fn caret(&self) -> Option<&Position> {
        self.is_collapsed().then_some(&self.focus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapsed_selection_has_caret() {
        let selection = Selection::collapsed(BlockKey::from("a"), 3);
        assert!(selection.is_collapsed());
        assert_eq!(
            selection.caret(),
            Some(&Position::new(BlockKey::from("a"), 3))
        );
    }

    #[test]
    fn test_range_selection_has_no_caret() {
        let selection = Selection::new(
            Position::new(BlockKey::from("a"), 0),
            Position::new(BlockKey::from("a"), 2),
        );
        assert!(!selection.is_collapsed());
        assert_eq!(selection.caret(), None);
    }

    #[test]
    fn test_same_offset_in_different_blocks_is_not_collapsed() {
        let selection = Selection::new(
            Position::new(BlockKey::from("a"), 1),
            Position::new(BlockKey::from("b"), 1),
        );
        assert!(!selection.is_collapsed());
    }
}
