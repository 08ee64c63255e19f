//! # Strip Compositor
//!
//! Lay out media strips on a canvas and drive beat-synchronized keyframe
//! animations from a precomputed audio analysis.
//!
//! The library reads a declarative TOML configuration, an analysis document
//! of audio events and an ordered strip list, then writes placement and
//! animation keyframes into a [`KeyframeSink`](sink::KeyframeSink).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use strip_compositor::{
//!     analysis::AnalysisDocument,
//!     composition::{CompositionRequest, Compositor},
//!     config::Config,
//!     sink::KeyframeStore,
//!     strip::load_manifest,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::from_file("compositor.toml")?.validate()?;
//! let strips = load_manifest("strips.json")?;
//! let analysis = AnalysisDocument::from_file("analysis.json")?;
//!
//! let request = CompositionRequest::from_config(&config, strips, analysis);
//! let mut store = KeyframeStore::new();
//! let result = Compositor::new().compose(&request, &mut store);
//!
//! println!("{} keyframes, {} issues", result.total_keyframes(), result.issues.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - Configuration document and validation
//! - [`strip`] - Strip model and manifest loading
//! - [`analysis`] - Analysis document and trigger timelines
//! - [`layout`] - Scatter and primary-secondary layouts
//! - [`animation`] - Closed set of audio-driven animations
//! - [`sink`] - Keyframe sink boundary and an in-memory store
//! - [`composition`] - The compositor tying it all together

pub mod analysis;
pub mod animation;
pub mod composition;
pub mod config;
pub mod error;
pub mod layout;
pub mod sink;
pub mod strip;

// Re-export commonly used types for convenience
pub use crate::{
    composition::{CompositionRequest, CompositionResult, Compositor},
    config::Config,
    error::{CompositorError, Result},
    sink::{KeyframeSink, KeyframeStore},
    strip::Strip,
};
