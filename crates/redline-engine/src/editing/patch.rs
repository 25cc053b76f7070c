use crate::format::Trigger;
use crate::model::Selection;

/// Result of committing a command through a session
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// Count of snapshots committed so far in the session
    pub version: u64,
    pub selection: Selection,
    /// The shorthand rule that rewrote the block, if any
    pub fired: Option<Trigger>,
}
