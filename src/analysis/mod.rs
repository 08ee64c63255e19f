//! # Analysis Events
//!
//! Reads the audio analysis document produced by an external analyzer and
//! turns trigger names into ordered event timelines.
//!
//! ## Trigger mapping
//!
//! | trigger        | category       |
//! |----------------|----------------|
//! | `beat`         | `beats`        |
//! | `bass`         | `energy_peaks` |
//! | `energy_peaks` | `energy_peaks` |
//! | `sections`     | `sections`     |
//! | `onsets`       | `onsets`       |
//! | `one_time`     | single event at 0s |
//! | `continuous`   | none           |
//!
//! ## Usage
//!
//! ```rust,no_run
//! use strip_compositor::analysis::{extract, AnalysisDocument, Trigger};
//!
//! # fn main() -> strip_compositor::Result<()> {
//! let document = AnalysisDocument::from_file("analysis/audio.json")?;
//! let beats = extract(&document, Trigger::Beat);
//! println!("{} beat events", beats.len());
//! # Ok(())
//! # }
//! ```

pub mod timeline;
pub mod types;

pub use timeline::{extract, EventTimeline, Trigger};
pub use types::{AnalysisDocument, AnimationEvents, Section};
