use std::ops::Range;

use crate::model::BlockKey;

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("Malformed document: {reason}")]
    MalformedDocument { reason: String },

    #[error("Failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Unknown block: {0}")]
    UnknownBlock(BlockKey),

    #[error("Offset {offset} out of range for block of length {len}")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("Invalid style range {}..{} for block of length {len}", .range.start, .range.end)]
    StyleRangeInvalid { range: Range<usize>, len: usize },

    #[error("Block text cannot contain line breaks")]
    LineBreakInBlock,
}

impl EditError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        EditError::MalformedDocument {
            reason: reason.into(),
        }
    }
}
