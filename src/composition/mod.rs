//! # Composition
//!
//! The compositor validates strip targets, lays the strips out, writes their
//! placement and then runs every resolved animation against a keyframe sink.
//! Layout and target problems abort a run; everything else is recorded as an
//! issue and the run continues.

pub mod engine;

// Re-exports for convenience
pub use engine::{AnimationIssue, CompositionRequest, CompositionResult, Compositor, IssueReason};
