//! Live shorthand formatting.
//!
//! [`TriggerDetector`] watches committed snapshots for a line that just
//! completed one of the shorthand prefixes (`# `, `* `, `** `, `*** `) and
//! [`transform`] rewrites that line: the marker goes away and the heading or
//! inline style takes its place.

pub mod transform;
pub mod trigger;

pub use transform::transform;
pub use trigger::{Detection, Trigger, TriggerDetector, detect};
