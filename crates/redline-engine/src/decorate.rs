//! Render snapshots for frontends.
//!
//! A [`Snapshot`] flattens a [`Document`] into blocks of uniformly styled
//! segments. Redline text is found by scanning each block for runs carrying
//! the `REDLINE` style; those runs are flagged so a frontend can draw them
//! red without knowing anything about style spans.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::ops::Range;

use crate::editing::Document;
use crate::model::{BlockKey, BlockType, ContentBlock, InlineStyle, StyleSet};

/// Find maximal runs of chars whose style set satisfies `predicate`
pub fn find_style_ranges(
    block: &ContentBlock,
    mut predicate: impl FnMut(&StyleSet) -> bool,
) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = None;

    for offset in 0..block.len() {
        match (predicate(&block.styles_at(offset)), start) {
            (true, None) => start = Some(offset),
            (false, Some(from)) => {
                ranges.push(from..offset);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(from) = start {
        ranges.push(from..block.len());
    }
    ranges
}

/// Runs of redline text in a block
pub fn redline_spans(block: &ContentBlock) -> Vec<Range<usize>> {
    find_style_ranges(block, |styles| styles.contains(&InlineStyle::Redline))
}

/// Complete render state of a document
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub blocks: Vec<RenderBlock>,
}

/// A block ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBlock {
    pub key: BlockKey,
    pub kind: BlockType,
    pub segments: Vec<Segment>,
    /// Caret offset when the collapsed caret sits in this block
    pub caret: Option<usize>,
}

/// Uniformly styled stretch of text
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub text: String,
    pub range: Range<usize>,
    pub styles: StyleSet,
    /// Drawn by the redline decorator
    pub redline: bool,
}

/// Flatten a document into render blocks
pub fn create_snapshot(doc: &Document) -> Snapshot {
    let caret = doc.selection().caret();
    let blocks = doc
        .blocks()
        .iter()
        .map(|block| RenderBlock {
            key: block.key().clone(),
            kind: block.kind(),
            segments: segments(block),
            caret: caret
                .filter(|position| &position.block == block.key())
                .map(|position| position.offset),
        })
        .collect();
    Snapshot { blocks }
}

fn segments(block: &ContentBlock) -> Vec<Segment> {
    let text: Vec<char> = block.text().chars().collect();
    let redline = redline_spans(block);

    let mut cuts = BTreeSet::from([0, text.len()]);
    for span in block.styles() {
        cuts.insert(span.range.start);
        cuts.insert(span.range.end);
    }
    for run in &redline {
        cuts.insert(run.start);
        cuts.insert(run.end);
    }

    let cuts: Vec<usize> = cuts.into_iter().collect();
    cuts.windows(2)
        .filter(|pair| pair[0] < pair[1])
        .map(|pair| {
            let range = pair[0]..pair[1];
            Segment {
                text: text[range.clone()].iter().collect(),
                styles: block.styles_at(range.start),
                redline: redline.iter().any(|run| run.contains(&range.start)),
                range,
            }
        })
        .collect()
}

/// Plain text rendering of a snapshot, one line per block.
///
/// ```text
/// header-one |5: "Title"
/// unstyled: " bold"[BOLD] " and "
/// ```
pub fn format_snapshot(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    for block in &snapshot.blocks {
        let _ = write!(out, "{}", block.kind);
        if let Some(caret) = block.caret {
            let _ = write!(out, " |{caret}");
        }
        out.push(':');

        for segment in &block.segments {
            let _ = write!(out, " {:?}", segment.text);
            if !segment.styles.is_empty() {
                let names: Vec<&str> = segment.styles.iter().map(|style| style.as_str()).collect();
                let _ = write!(out, "[{}]", names.join(","));
            }
            if segment.redline {
                out.push('~');
            }
        }
        out.push('\n');
    }
    out
}
