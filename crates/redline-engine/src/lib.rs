pub mod decorate;
pub mod editing;
pub mod format;
pub mod model;
pub mod session;
pub mod store;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use decorate::{RenderBlock, Segment, Snapshot, create_snapshot, format_snapshot};
pub use editing::{CaretMove, Cmd, Document, DocumentEngine, EditError, Patch};
pub use format::{Detection, Trigger, TriggerDetector};
pub use model::{BlockKey, BlockType, ContentBlock, InlineStyle, Position, Selection};
pub use session::{DEFAULT_STORAGE_KEY, Session, SessionError};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};
