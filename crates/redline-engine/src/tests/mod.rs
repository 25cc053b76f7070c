use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::editing::{Cmd, Document, DocumentEngine};
use crate::model::{BlockKey, BlockType, ContentBlock, Selection};
use crate::session::Session;
use crate::store::KeyValueStore;

/// Single-block document with a collapsed caret at `caret`
pub fn line_document(text: &str, caret: usize) -> Document {
    let block = ContentBlock::new(BlockKey::generate(), BlockType::Unstyled, text);
    let key = block.key().clone();
    Document::new(vec![block])
        .unwrap()
        .push_selection(Selection::collapsed(key, caret))
        .unwrap()
}

/// Type `text` one char at a time, the way keystrokes arrive
pub fn type_text<S: KeyValueStore>(session: &mut Session<S>, text: &str) {
    for c in text.chars() {
        session
            .apply(&Cmd::InsertText {
                text: c.to_string(),
            })
            .unwrap();
    }
}

/// Create a temporary store directory
pub fn create_test_store_dir() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Create a file in the store directory with content
pub fn create_test_file(store_dir: &TempDir, filename: &str, content: &str) -> PathBuf {
    let file_path = store_dir.path().join(filename);
    fs::write(&file_path, content).unwrap();
    file_path
}
