use crate::editing::{Document, DocumentEngine, EditError};
use crate::model::{BlockType, ContentBlock, Position, Selection, StyleSet};

/// Raw input edits, as produced by the input surface
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Insert at the selection, replacing any selected text. Line breaks
    /// split blocks.
    InsertText { text: String },
    DeleteBackward,
    DeleteForward,
    SplitBlock,
    MoveCaret { to: CaretMove },
    Select { selection: Selection },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaretMove {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
}

impl Document {
    /// Apply a raw input command, returning the next snapshot
    pub fn apply(&self, cmd: &Cmd) -> Result<Document, EditError> {
        match cmd {
            Cmd::InsertText { text } => insert_text(self, text),
            Cmd::DeleteBackward => delete_backward(self),
            Cmd::DeleteForward => delete_forward(self),
            Cmd::SplitBlock => split_block(&delete_selection(self)?),
            Cmd::MoveCaret { to } => move_caret(self, *to),
            Cmd::Select { selection } => self.push_selection(selection.clone()),
        }
    }

    fn caret_position(&self) -> &Position {
        &self.selection.focus
    }
}

fn insert_text(doc: &Document, text: &str) -> Result<Document, EditError> {
    let styles = insertion_styles(doc)?;
    let mut next = delete_selection(doc)?;

    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            next = split_block(&next)?;
        }
        if line.is_empty() {
            continue;
        }

        let caret = next.caret_position().clone();
        let end = caret.offset + line.chars().count();
        next = next.replace_text_range(&caret.block, caret.offset..caret.offset, line)?;
        for style in &styles {
            next = next.apply_style_over_range(&caret.block, caret.offset..end, *style)?;
        }
    }

    Ok(next)
}

/// Styles typed text picks up from its surroundings.
///
/// Text inherits the char before the caret; at the start of a block it
/// inherits the first char, and an empty block looks upward for the last
/// char of the nearest non-empty block.
fn insertion_styles(doc: &Document) -> Result<StyleSet, EditError> {
    let (start, _) = doc.ordered_selection()?;
    let index = doc.block_index(&start.block)?;
    let block = &doc.blocks[index];

    if start.offset > 0 {
        return Ok(block.styles_at(start.offset - 1));
    }
    if !block.is_empty() {
        return Ok(block.styles_at(0));
    }

    let above = doc.blocks[..index]
        .iter()
        .rev()
        .find(|block| !block.is_empty())
        .map(|block| block.styles_at(block.len() - 1));
    Ok(above.unwrap_or_default())
}

/// Remove the selected text, leaving a collapsed caret at the selection start
fn delete_selection(doc: &Document) -> Result<Document, EditError> {
    if doc.selection.is_collapsed() {
        return Ok(doc.clone());
    }

    let (start, end) = doc.ordered_selection()?;
    if start.block == end.block {
        return doc.replace_text_range(&start.block, start.offset..end.offset, "");
    }

    let start_len = doc.blocks[doc.block_index(&start.block)?].len();
    let mut next = doc
        .replace_text_range(&start.block, start.offset..start_len, "")?
        .replace_text_range(&end.block, 0..end.offset, "")?;

    let first = next.block_index(&start.block)?;
    let last = next.block_index(&end.block)?;
    next.blocks.drain(first + 1..last);
    merge_with_next(&mut next, first);

    next.selection = Selection::collapsed(start.block, start.offset);
    Ok(next)
}

/// Join the block after `index` onto the block at `index`
fn merge_with_next(doc: &mut Document, index: usize) {
    let lower = doc.blocks.remove(index + 1);
    doc.blocks[index].append(&lower);
}

fn delete_backward(doc: &Document) -> Result<Document, EditError> {
    if !doc.selection.is_collapsed() {
        return delete_selection(doc);
    }

    let caret = doc.caret_position().clone();
    let index = doc.block_index(&caret.block)?;
    let block = &doc.blocks[index];

    if caret.offset > 0 {
        let previous = caret.offset - 1;
        return doc.replace_text_range(&caret.block, previous..caret.offset, "");
    }
    if block.kind().is_heading() {
        return doc.set_block_type(&caret.block, BlockType::Unstyled);
    }
    if index == 0 {
        return Ok(doc.clone());
    }

    let mut next = doc.clone();
    let above = &next.blocks[index - 1];
    let selection = Selection::collapsed(above.key().clone(), above.len());
    merge_with_next(&mut next, index - 1);
    next.selection = selection;
    Ok(next)
}

fn delete_forward(doc: &Document) -> Result<Document, EditError> {
    if !doc.selection.is_collapsed() {
        return delete_selection(doc);
    }

    let caret = doc.caret_position().clone();
    let index = doc.block_index(&caret.block)?;
    let len = doc.blocks[index].len();

    if caret.offset < len {
        return doc.replace_text_range(&caret.block, caret.offset..caret.offset + 1, "");
    }
    if index + 1 == doc.blocks.len() {
        return Ok(doc.clone());
    }

    let mut next = doc.clone();
    merge_with_next(&mut next, index);
    Ok(next)
}

/// Move the text after the caret into a new block below.
///
/// Splitting a heading at its end starts an unstyled block.
fn split_block(doc: &Document) -> Result<Document, EditError> {
    let caret = doc.caret_position().clone();
    let index = doc.block_index(&caret.block)?;
    let key = doc.fresh_key();

    let mut next = doc.clone();
    let upper = &mut next.blocks[index];
    let at_end = caret.offset >= upper.len();
    let (tail, styles) = upper.split_off(caret.offset);

    let kind = if at_end && upper.kind().is_heading() {
        BlockType::Unstyled
    } else {
        upper.kind()
    };
    let mut lower = ContentBlock::new(key.clone(), kind, &tail);
    lower.depth = upper.depth();
    lower.styles = styles;

    next.blocks.insert(index + 1, lower);
    next.selection = Selection::collapsed(key, 0);
    Ok(next)
}

fn move_caret(doc: &Document, to: CaretMove) -> Result<Document, EditError> {
    let (start, end) = doc.ordered_selection()?;
    if !doc.selection.is_collapsed() {
        match to {
            CaretMove::Left => {
                return doc.push_selection(Selection::collapsed(start.block, start.offset));
            }
            CaretMove::Right => {
                return doc.push_selection(Selection::collapsed(end.block, end.offset));
            }
            _ => {}
        }
    }

    let caret = doc.caret_position();
    let index = doc.block_index(&caret.block)?;
    let block = &doc.blocks[index];
    let above = index.checked_sub(1).map(|i| &doc.blocks[i]);
    let below = doc.blocks.get(index + 1);

    let (target, offset) = match to {
        CaretMove::Left if caret.offset > 0 => (block, caret.offset - 1),
        CaretMove::Left => above.map_or((block, 0), |above| (above, above.len())),
        CaretMove::Right if caret.offset < block.len() => (block, caret.offset + 1),
        CaretMove::Right => below.map_or((block, block.len()), |below| (below, 0)),
        CaretMove::Up => above.map_or((block, 0), |above| {
            (above, caret.offset.min(above.len()))
        }),
        CaretMove::Down => below.map_or((block, block.len()), |below| {
            (below, caret.offset.min(below.len()))
        }),
        CaretMove::LineStart => (block, 0),
        CaretMove::LineEnd => (block, block.len()),
    };

    doc.push_selection(Selection::collapsed(target.key().clone(), offset))
}
