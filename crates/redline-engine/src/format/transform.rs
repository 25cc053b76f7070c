//! Corrective rewrites for fired shorthand rules.
//!
//! Each rewrite chains [`DocumentEngine`] primitives on local snapshots and
//! hands back only the final one, so a half-applied rewrite is never
//! observable. Any failing step abandons the rewrite and the caller keeps its
//! pre-transform snapshot.

use crate::editing::{DocumentEngine, EditError};
use crate::format::{Detection, Trigger};
use crate::model::{BlockType, InlineStyle, Selection, char_len};

/// Rewrite the block a rule fired on.
///
/// Returns `None` when the rewrite cannot be applied cleanly (the marker is
/// gone, the computed span is invalid, the block vanished); the document is
/// then left as it was.
pub fn transform<D: DocumentEngine>(doc: &D, detection: &Detection) -> Option<D> {
    match rewrite(doc, detection) {
        Ok(next) => Some(next),
        Err(err) => {
            log::debug!(
                "{:?} left block {} untouched: {err}",
                detection.trigger,
                detection.block
            );
            None
        }
    }
}

fn rewrite<D: DocumentEngine>(doc: &D, detection: &Detection) -> Result<D, EditError> {
    let current = doc
        .block_text(&detection.block)
        .ok_or_else(|| EditError::UnknownBlock(detection.block.clone()))?;
    let len = char_len(&current);
    if current != detection.line || detection.offset > len {
        // Stale detection: the block moved on since the rule fired
        return Err(EditError::OffsetOutOfRange {
            offset: detection.offset,
            len,
        });
    }

    match detection.trigger {
        Trigger::Header => header(doc, detection),
        Trigger::Redline => redline(doc, detection),
        Trigger::Bold => styled_tail(doc, detection, InlineStyle::Bold),
        Trigger::Underline => styled_tail(doc, detection, InlineStyle::Underline),
    }
}

/// Strip `# `, make the block a heading and put the caret at the end of the
/// remaining text
fn header<D: DocumentEngine>(doc: &D, detection: &Detection) -> Result<D, EditError> {
    let key = &detection.block;
    let marker_len = Trigger::Header.offset();
    let len = char_len(&detection.line);
    let caret = len
        .checked_sub(marker_len)
        .ok_or(EditError::OffsetOutOfRange { offset: marker_len, len })?;

    doc.replace_text_range(key, 0..marker_len, "")?
        .set_block_type(key, BlockType::HeaderOne)?
        .push_selection(Selection::collapsed(key.clone(), caret))
}

/// Bold and underline: the marker and its space collapse to one space and the
/// style covers that space plus the rest of the line
fn styled_tail<D: DocumentEngine>(
    doc: &D,
    detection: &Detection,
    style: InlineStyle,
) -> Result<D, EditError> {
    let key = &detection.block;
    let marker_index = marker_before_caret(detection)?;
    let tail_len = char_len(&detection.line) - detection.offset;
    let end = marker_index + tail_len + 1;

    doc.replace_text_range(key, marker_index..detection.offset, " ")?
        .apply_style_over_range(key, marker_index..end, style)?
        .push_selection(Selection::collapsed(key.clone(), end))
}

/// Redline: like the other inline rules, but the style reaches forward only to
/// the end of the next word. With no space after the caret the word runs to
/// the end of the line, which is the caret itself when nothing follows it.
fn redline<D: DocumentEngine>(doc: &D, detection: &Detection) -> Result<D, EditError> {
    let key = &detection.block;
    let marker_index = marker_before_caret(detection)?;
    let caret = marker_index + 1;

    let replaced = doc.replace_text_range(key, marker_index..detection.offset, " ")?;
    let text = replaced
        .block_text(key)
        .ok_or_else(|| EditError::UnknownBlock(key.clone()))?;
    let word_end = text
        .chars()
        .skip(caret)
        .position(|c| c == ' ')
        .map_or_else(|| char_len(&text), |index| caret + index);

    replaced
        .apply_style_over_range(key, marker_index..word_end, InlineStyle::Redline)?
        .push_selection(Selection::collapsed(key.clone(), caret))
}

/// Char index of the last marker run before the caret
fn marker_before_caret(detection: &Detection) -> Result<usize, EditError> {
    let before: String = detection.line.chars().take(detection.offset).collect();
    before
        .rfind(detection.trigger.marker())
        .map(|byte| char_len(&before[..byte]))
        .ok_or(EditError::OffsetOutOfRange {
            offset: detection.offset,
            len: char_len(&detection.line),
        })
}
