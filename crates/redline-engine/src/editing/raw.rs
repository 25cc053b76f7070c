//! Persisted document form.
//!
//! The JSON layout follows the raw content format of browser rich-text
//! editors (`blocks` with `inlineStyleRanges`, plus an `entityMap`), so stored
//! documents stay readable by other tools. Offsets and lengths count chars.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::editing::{Document, EditError};
use crate::model::{BlockKey, BlockType, ContentBlock, InlineStyle, StyleSpan, char_len, style};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDocument {
    pub blocks: Vec<RawBlock>,
    #[serde(default)]
    pub entity_map: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBlock {
    pub key: String,
    pub text: String,
    #[serde(rename = "type", default)]
    pub kind: BlockType,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub inline_style_ranges: Vec<RawStyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<Value>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: InlineStyle,
}

pub(crate) fn encode(doc: &Document) -> Result<String, EditError> {
    let blocks = doc
        .blocks()
        .iter()
        .map(|block| {
            let mut inline_style_ranges: Vec<RawStyleRange> = block
                .styles()
                .iter()
                .map(|span| RawStyleRange {
                    offset: span.range.start,
                    length: span.range.end - span.range.start,
                    style: span.style,
                })
                .collect();
            inline_style_ranges.sort_by_key(|range| (range.offset, range.style));

            RawBlock {
                key: block.key().to_string(),
                text: block.text(),
                kind: block.kind(),
                depth: block.depth(),
                inline_style_ranges,
                entity_ranges: Vec::new(),
                data: Map::new(),
            }
        })
        .collect();

    let raw = RawDocument {
        blocks,
        entity_map: Map::new(),
    };
    serde_json::to_string(&raw).map_err(EditError::Encode)
}

pub(crate) fn decode(raw: &str) -> Result<Document, EditError> {
    let raw: RawDocument =
        serde_json::from_str(raw).map_err(|err| EditError::malformed(err.to_string()))?;

    let blocks = raw
        .blocks
        .into_iter()
        .map(decode_block)
        .collect::<Result<Vec<_>, _>>()?;

    Document::new(blocks)
}

fn decode_block(raw: RawBlock) -> Result<ContentBlock, EditError> {
    if raw.text.contains('\n') {
        return Err(EditError::malformed(format!(
            "block {} contains a line break",
            raw.key
        )));
    }

    let len = char_len(&raw.text);
    let mut styles = Vec::with_capacity(raw.inline_style_ranges.len());
    for range in &raw.inline_style_ranges {
        let end = range.offset.checked_add(range.length);
        match end {
            Some(end) if range.length > 0 && end <= len => {
                styles.push(StyleSpan::new(range.style, range.offset..end));
            }
            _ => {
                return Err(EditError::malformed(format!(
                    "style range {}+{} outside block {} of length {len}",
                    range.offset, range.length, raw.key
                )));
            }
        }
    }

    let mut block = ContentBlock::new(BlockKey::from(raw.key), raw.kind, &raw.text);
    block.depth = raw.depth;
    block.styles = style::normalize(styles);
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::DocumentEngine;
    use pretty_assertions::assert_eq;

    const STORED: &str = r#"{
        "blocks": [
            {"key": "a1b2c", "text": "Title", "type": "header-one", "depth": 0,
             "inlineStyleRanges": [], "entityRanges": [], "data": {}},
            {"key": "d3e4f", "text": " bold red", "type": "unstyled", "depth": 0,
             "inlineStyleRanges": [
                {"offset": 0, "length": 5, "style": "BOLD"},
                {"offset": 5, "length": 4, "style": "REDLINE"}
             ],
             "entityRanges": [], "data": {}}
        ],
        "entityMap": {}
    }"#;

    #[test]
    fn test_decode_stored_document() {
        let doc = Document::create_from_serialized_form(STORED).unwrap();

        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.blocks()[0].text(), "Title");
        assert_eq!(doc.blocks()[0].kind(), BlockType::HeaderOne);
        assert_eq!(doc.blocks()[1].key().as_str(), "d3e4f");
        assert_eq!(
            doc.blocks()[1].styles(),
            &[
                StyleSpan::new(InlineStyle::Bold, 0..5),
                StyleSpan::new(InlineStyle::Redline, 5..9),
            ]
        );
        // Caret starts at the beginning of the first block
        assert_eq!(
            doc.selection().caret().map(|caret| caret.block.as_str()),
            Some("a1b2c")
        );
    }

    #[test]
    fn test_decode_accepts_missing_optional_fields() {
        let doc =
            Document::create_from_serialized_form(r#"{"blocks":[{"key":"k","text":"hi"}]}"#)
                .unwrap();

        assert_eq!(doc.active_block().text(), "hi");
        assert_eq!(doc.active_block().kind(), BlockType::Unstyled);
    }

    #[test]
    fn test_encode_then_decode_is_stable() {
        let doc = Document::create_from_serialized_form(STORED).unwrap();

        let once = doc.serialize().unwrap();
        let twice = Document::create_from_serialized_form(&once)
            .unwrap()
            .serialize()
            .unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_encode_writes_raw_field_names() {
        let doc = Document::create_from_serialized_form(STORED).unwrap();
        let value: Value = serde_json::from_str(&doc.serialize().unwrap()).unwrap();

        assert_eq!(value["blocks"][0]["type"], "header-one");
        assert_eq!(value["blocks"][1]["inlineStyleRanges"][1]["style"], "REDLINE");
        assert!(value["entityMap"].is_object());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = Document::create_from_serialized_form("not json");
        assert!(matches!(result, Err(EditError::MalformedDocument { .. })));
    }

    #[test]
    fn test_decode_rejects_unknown_style() {
        let raw = r#"{"blocks":[{"key":"k","text":"hi","inlineStyleRanges":[{"offset":0,"length":1,"style":"ITALIC"}]}]}"#;
        let result = Document::create_from_serialized_form(raw);
        assert!(matches!(result, Err(EditError::MalformedDocument { .. })));
    }

    #[test]
    fn test_decode_rejects_out_of_bounds_style_range() {
        let raw = r#"{"blocks":[{"key":"k","text":"hi","inlineStyleRanges":[{"offset":1,"length":5,"style":"BOLD"}]}]}"#;
        let result = Document::create_from_serialized_form(raw);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("outside block k of length 2")
        );
    }

    #[test]
    fn test_decode_rejects_empty_block_list() {
        let result = Document::create_from_serialized_form(r#"{"blocks":[],"entityMap":{}}"#);
        assert!(matches!(result, Err(EditError::MalformedDocument { .. })));
    }

    #[test]
    fn test_decode_rejects_duplicate_keys() {
        let raw = r#"{"blocks":[{"key":"k","text":"a"},{"key":"k","text":"b"}]}"#;
        let result = Document::create_from_serialized_form(raw);
        assert!(matches!(result, Err(EditError::MalformedDocument { .. })));
    }
}
