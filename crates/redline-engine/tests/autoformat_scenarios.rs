//! End-to-end typing scenarios through a session

use pretty_assertions::assert_eq;
use redline_engine::editing::raw::RawDocument;
use redline_engine::{
    BlockType, CaretMove, Cmd, Document, DocumentEngine, EditError, FileStore, InlineStyle,
    KeyValueStore, MemoryStore, Session, SessionError, StoreError, Trigger,
    DEFAULT_STORAGE_KEY, format_snapshot,
};
use rstest::rstest;

fn session() -> Session<MemoryStore> {
    Session::open(MemoryStore::new(), DEFAULT_STORAGE_KEY).unwrap()
}

/// Type one char per command and collect the rules that fired
fn type_text<S: KeyValueStore>(session: &mut Session<S>, text: &str) -> Vec<Trigger> {
    text.chars()
        .filter_map(|c| {
            session
                .apply(&Cmd::InsertText {
                    text: c.to_string(),
                })
                .unwrap()
                .fired
        })
        .collect()
}

fn caret(session: &Session<impl KeyValueStore>) -> usize {
    session.document().selection().caret().unwrap().offset
}

fn styles(session: &Session<impl KeyValueStore>) -> Vec<(InlineStyle, std::ops::Range<usize>)> {
    session
        .document()
        .active_block()
        .styles()
        .iter()
        .map(|span| (span.style, span.range.clone()))
        .collect()
}

#[test]
fn test_header_shorthand() {
    let mut session = session();

    let fired = type_text(&mut session, "# ");

    assert_eq!(fired, vec![Trigger::Header]);
    let block = session.document().active_block();
    assert_eq!(block.kind(), BlockType::HeaderOne);
    assert_eq!(block.text(), "");
    assert_eq!(caret(&session), 0);
}

#[rstest]
#[case("* ", Trigger::Bold, InlineStyle::Bold)]
#[case("*** ", Trigger::Underline, InlineStyle::Underline)]
#[case("** ", Trigger::Redline, InlineStyle::Redline)]
fn test_inline_shorthand(#[case] input: &str, #[case] trigger: Trigger, #[case] style: InlineStyle) {
    let mut session = session();

    let fired = type_text(&mut session, input);

    assert_eq!(fired, vec![trigger]);
    assert_eq!(session.document().active_block().text(), " ");
    assert_eq!(styles(&session), vec![(style, 0..1)]);
    assert_eq!(caret(&session), 1);
}

#[test]
fn test_typing_after_bold_keeps_bold() {
    let mut session = session();

    type_text(&mut session, "* strong words");

    assert_eq!(session.document().active_block().text(), " strong words");
    assert_eq!(styles(&session), vec![(InlineStyle::Bold, 0..13)]);
}

#[test]
fn test_typing_under_heading() {
    let mut session = session();

    type_text(&mut session, "# Chapter one");
    session.apply(&Cmd::SplitBlock).unwrap();
    type_text(&mut session, "body");

    insta::assert_snapshot!(format_snapshot(&session.snapshot()), @r#"
    header-one: "Chapter one"
    unstyled |4: "body"
    "#);
}

#[test]
fn test_redline_grows_while_typing() {
    let mut session = session();

    type_text(&mut session, "** fix");

    assert_eq!(session.document().active_block().text(), " fix");
    assert_eq!(styles(&session), vec![(InlineStyle::Redline, 0..4)]);
    let snapshot = session.snapshot();
    assert!(snapshot.blocks[0].segments.iter().all(|segment| segment.redline));
}

#[test]
fn test_shorthand_only_fires_at_line_start() {
    let mut session = session();

    let fired = type_text(&mut session, "a * b ** c # d");

    assert!(fired.is_empty());
    assert_eq!(session.document().active_block().text(), "a * b ** c # d");
    assert!(styles(&session).is_empty());
}

#[test]
fn test_rewritten_line_is_stable() {
    let mut session = session();
    type_text(&mut session, "*** ");
    let after_rewrite = session.document().clone();

    // Moving around without changing text never re-fires a rule
    for to in [CaretMove::LineStart, CaretMove::LineEnd, CaretMove::Left] {
        let patch = session.apply(&Cmd::MoveCaret { to }).unwrap();
        assert_eq!(patch.fired, None);
    }
    assert_eq!(session.document().blocks(), after_rewrite.blocks());
}

#[test]
fn test_marker_typed_before_existing_text() {
    let mut session = session();
    type_text(&mut session, "title");
    session
        .apply(&Cmd::MoveCaret {
            to: CaretMove::LineStart,
        })
        .unwrap();

    let fired = type_text(&mut session, "# ");

    assert_eq!(fired, vec![Trigger::Header]);
    assert_eq!(session.document().active_block().text(), "title");
    assert_eq!(caret(&session), 5);
}

#[test]
fn test_serialized_form_round_trips() {
    let mut session = session();
    type_text(&mut session, "# Notes");
    session.apply(&Cmd::SplitBlock).unwrap();
    type_text(&mut session, "* bold");
    session.apply(&Cmd::SplitBlock).unwrap();
    type_text(&mut session, "** red words");

    let once = session.document().serialize().unwrap();
    let restored = Document::create_from_serialized_form(&once).unwrap();
    let twice = restored.serialize().unwrap();

    assert_eq!(once, twice);
    assert_eq!(restored.blocks(), session.document().blocks());
}

#[test]
fn test_serialized_form_shape() {
    let mut session = session();
    type_text(&mut session, "* hi");

    let raw = session.document().serialize().unwrap();
    let parsed: RawDocument = serde_json::from_str(&raw).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(parsed.blocks.len(), 1);
    assert_eq!(parsed.blocks[0].text, " hi");
    assert_eq!(value["blocks"][0]["type"], "unstyled");
    assert_eq!(
        value["blocks"][0]["inlineStyleRanges"],
        serde_json::json!([{ "offset": 0, "length": 3, "style": "BOLD" }])
    );
    assert!(value["entityMap"].is_object());
}

#[test]
fn test_save_then_clear() {
    let mut session = session();
    type_text(&mut session, "* keep me");
    session.save().unwrap();
    assert!(session.store().get(DEFAULT_STORAGE_KEY).unwrap().is_some());

    session.clear().unwrap();

    assert_eq!(session.store().get(DEFAULT_STORAGE_KEY).unwrap(), None);
    assert_eq!(session.document().plain_text(), "");

    let fresh = Session::open(session.store().clone(), DEFAULT_STORAGE_KEY).unwrap();
    assert_eq!(fresh.document().blocks().len(), 1);
    assert_eq!(fresh.document().plain_text(), "");
}

#[test]
fn test_file_store_session_persists_across_opens() {
    let dir = tempfile::tempdir().unwrap();

    let mut session = Session::open(FileStore::open(dir.path()).unwrap(), "notes").unwrap();
    type_text(&mut session, "*** under");
    session.save().unwrap();
    assert!(dir.path().join("notes.json").exists());

    let mut reopened = Session::open(FileStore::new(dir.path()), "notes").unwrap();
    let block = reopened.document().active_block();
    assert_eq!(block.text(), " under");
    assert!(block.has_style_at(5, InlineStyle::Underline));

    reopened.clear().unwrap();
    assert!(!dir.path().join("notes.json").exists());
}

#[test]
fn test_malformed_stored_document_is_an_error() {
    let mut store = MemoryStore::new();
    store
        .set(
            DEFAULT_STORAGE_KEY,
            r#"{"blocks":[{"key":"a","text":"hi","type":"unstyled","depth":0,
                "inlineStyleRanges":[{"offset":1,"length":9,"style":"BOLD"}],
                "entityRanges":[],"data":{}}],"entityMap":{}}"#,
        )
        .unwrap();

    let result = Session::open(store, DEFAULT_STORAGE_KEY);

    assert!(matches!(
        result,
        Err(SessionError::Edit(EditError::MalformedDocument { .. }))
    ));
}

#[test]
fn test_invalid_storage_key_surfaces_store_error() {
    let dir = tempfile::tempdir().unwrap();

    let result = Session::open(FileStore::new(dir.path()), "../outside");

    assert!(matches!(
        result,
        Err(SessionError::Store(StoreError::InvalidKey(_)))
    ));
}
