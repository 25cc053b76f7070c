use crate::editing::DocumentEngine;
use crate::model::{BlockKey, InlineStyle};

/// A shorthand rule that rewrites the line it was typed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// `# ` turns the block into a level one heading
    Header,
    /// `** ` starts redline text
    Redline,
    /// `*** ` starts underlined text
    Underline,
    /// `* ` starts bold text
    Bold,
}

impl Trigger {
    /// Longest prefixes first
    pub const ALL: [Trigger; 4] = [
        Trigger::Underline,
        Trigger::Redline,
        Trigger::Header,
        Trigger::Bold,
    ];

    /// Literal text the line must start with
    pub fn prefix(self) -> &'static str {
        match self {
            Trigger::Header => "# ",
            Trigger::Redline => "** ",
            Trigger::Underline => "*** ",
            Trigger::Bold => "* ",
        }
    }

    /// The marker run the transform searches for, without the space
    pub fn marker(self) -> &'static str {
        match self {
            Trigger::Header => "#",
            Trigger::Redline => "**",
            Trigger::Underline => "***",
            Trigger::Bold => "*",
        }
    }

    /// Caret offset at which the rule fires: right after the prefix
    pub fn offset(self) -> usize {
        self.prefix().chars().count()
    }

    /// Inline style the rule applies, `None` for block-level rules
    pub fn style(self) -> Option<InlineStyle> {
        match self {
            Trigger::Header => None,
            Trigger::Redline => Some(InlineStyle::Redline),
            Trigger::Underline => Some(InlineStyle::Underline),
            Trigger::Bold => Some(InlineStyle::Bold),
        }
    }
}

/// Which rule, if any, fires for a line with a collapsed caret at
/// `start_offset`.
///
/// Prefixes are mutually exclusive char by char (`"*** "` does not start with
/// `"** "`), so at most one rule matches.
pub fn detect(line_text: &str, start_offset: usize) -> Option<Trigger> {
    Trigger::ALL
        .into_iter()
        .find(|trigger| {
            line_text.starts_with(trigger.prefix()) && start_offset == trigger.offset()
        })
}

/// A rule that fired, with the state it fired against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub trigger: Trigger,
    pub block: BlockKey,
    /// The block's text when the rule fired
    pub line: String,
    /// The caret offset when the rule fired
    pub offset: usize,
}

/// Watches the active line and reports rules the moment they fire.
///
/// Rules are only evaluated when the active block's text differs from the
/// last observation, so a rule fires once per keystroke that completes its
/// prefix and never again for the same text.
#[derive(Debug, Default)]
pub struct TriggerDetector {
    last_observed: Option<String>,
}

impl TriggerDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a freshly committed snapshot
    pub fn observe<D: DocumentEngine>(&mut self, doc: &D) -> Option<Detection> {
        let selection = doc.selection();
        let line = doc.block_text(&selection.focus.block)?;
        if self.last_observed.as_deref() == Some(line.as_str()) {
            return None;
        }
        self.last_observed = Some(line.clone());

        let caret = selection.caret()?;
        let trigger = detect(&line, caret.offset)?;
        log::debug!("{trigger:?} fired on block {} at offset {}", caret.block, caret.offset);

        Some(Detection {
            trigger,
            block: caret.block.clone(),
            line,
            offset: caret.offset,
        })
    }

    /// Record a snapshot produced by a corrective edit without evaluating any
    /// rule against it
    pub fn acknowledge<D: DocumentEngine>(&mut self, doc: &D) {
        self.last_observed = doc.block_text(&doc.selection().focus.block);
    }

    pub fn reset(&mut self) {
        self.last_observed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Cmd, Document};
    use crate::model::{Position, Selection};
    use crate::tests::line_document;
    use rstest::rstest;

    #[rstest]
    #[case("# ", 2, Some(Trigger::Header))]
    #[case("# Title", 2, Some(Trigger::Header))]
    #[case("* ", 2, Some(Trigger::Bold))]
    #[case("** ", 3, Some(Trigger::Redline))]
    #[case("*** ", 4, Some(Trigger::Underline))]
    #[case("*** tail", 4, Some(Trigger::Underline))]
    // Prefix matched but caret elsewhere
    #[case("# ", 1, None)]
    #[case("# Title", 7, None)]
    // Longer prefixes never satisfy shorter rules
    #[case("** ", 2, None)]
    #[case("*** ", 3, None)]
    #[case("**", 2, None)]
    #[case("#", 1, None)]
    #[case("", 0, None)]
    #[case(" # ", 3, None)]
    #[case("#  ", 2, Some(Trigger::Header))]
    fn test_detect(#[case] line: &str, #[case] offset: usize, #[case] expected: Option<Trigger>) {
        assert_eq!(detect(line, offset), expected);
    }

    #[test]
    fn test_offsets_match_prefix_lengths() {
        assert_eq!(Trigger::Header.offset(), 2);
        assert_eq!(Trigger::Bold.offset(), 2);
        assert_eq!(Trigger::Redline.offset(), 3);
        assert_eq!(Trigger::Underline.offset(), 4);
    }

    #[test]
    fn test_detector_fires_once_per_text() {
        let mut detector = TriggerDetector::new();
        let doc = line_document("# ", 2);

        let detection = detector.observe(&doc).expect("rule fires");
        assert_eq!(detection.trigger, Trigger::Header);
        assert_eq!(detection.line, "# ");
        assert_eq!(detection.offset, 2);

        // Same text again: nothing new to observe
        assert_eq!(detector.observe(&doc), None);
    }

    #[test]
    fn test_detector_ignores_range_selections() {
        let mut detector = TriggerDetector::new();
        let doc = line_document("* ", 2);
        let key = doc.active_block().key().clone();
        let doc = doc
            .apply(&Cmd::Select {
                selection: Selection::new(Position::new(key.clone(), 0), Position::new(key, 2)),
            })
            .unwrap();

        assert_eq!(detector.observe(&doc), None);
    }

    #[test]
    fn test_acknowledge_suppresses_evaluation() {
        let mut detector = TriggerDetector::new();
        let doc = line_document("* ", 2);

        detector.acknowledge(&doc);
        assert_eq!(detector.observe(&doc), None);

        detector.reset();
        assert!(detector.observe(&doc).is_some());
    }

    #[test]
    fn test_detector_on_empty_document() {
        let mut detector = TriggerDetector::new();
        assert_eq!(detector.observe(&Document::create_empty()), None);
    }
}
