/*!
 * # Editing Core Module
 *
 * This module implements the document side of the editor: the immutable
 * rich-text model and the primitives the live formatter is written against.
 *
 * ## Architecture Overview
 *
 * ### 1. Immutable Snapshots
 * - A [`Document`] is an ordered list of blocks plus the current selection
 * - Every edit returns a new `Document`; published snapshots never change
 * - Block text lives in **`xi_rope::Rope`** buffers, so snapshots share text
 *   structurally and cloning is cheap
 *
 * ### 2. The Document Engine Contract
 * - [`DocumentEngine`] names the primitives the formatter needs: replace a
 *   text range, layer a style, change a block type, push a selection,
 *   serialize and decode
 * - The formatter is generic over this trait and composes primitives on local
 *   values, publishing only the final snapshot
 *
 * ### 3. Command-Based Input
 * - Raw keystrokes arrive as **Commands** ([`Cmd`]) applied with
 *   [`Document::apply`]
 * - Typed text inherits the inline styles around the caret, which is what
 *   carries a freshly applied style forward as the user keeps typing
 *
 * ### 4. Persisted Form
 * - [`raw`] encodes documents as JSON with `blocks`, `inlineStyleRanges` and
 *   an `entityMap`; decoding failures are `MalformedDocument`
 *
 * ## Module Structure
 *
 * - **`document`**: `Document` and its `DocumentEngine` implementation
 * - **`engine`**: the `DocumentEngine` trait
 * - **`commands`**: `Cmd` and raw input editing
 * - **`raw`**: serialized form
 * - **`patch`**: result metadata for committed commands
 * - **`error`**: `EditError`
 *
 * ## Usage Pattern
 *
 * ```rust
 * use redline_engine::editing::*;
 * use redline_engine::model::InlineStyle;
 *
 * let doc = Document::create_empty();
 * let doc = doc.apply(&Cmd::InsertText { text: "hello".to_string() }).unwrap();
 * let key = doc.active_block().key().clone();
 *
 * let bold = doc.apply_style_over_range(&key, 0..5, InlineStyle::Bold).unwrap();
 * assert!(bold.active_block().has_style_at(0, InlineStyle::Bold));
 * assert!(!doc.active_block().has_style_at(0, InlineStyle::Bold));
 * ```
 */

pub mod commands;
pub mod document;
pub mod engine;
pub mod error;
pub mod patch;
pub mod raw;

pub use commands::{CaretMove, Cmd};
pub use document::Document;
pub use engine::DocumentEngine;
pub use error::EditError;
pub use patch::Patch;
