//! # Layout Engine
//!
//! Computes where each strip sits on the canvas and how large it is. Offsets
//! are relative to the canvas center, in pixels; scale is a fraction of the
//! canvas size.
//!
//! ## Strategies
//!
//! - **Scatter**: seeded random placement, optionally avoiding overlaps
//! - **Primary-secondary**: two full-canvas main strips, the rest as corner insets
//!
//! ## Usage
//!
//! ```rust
//! use strip_compositor::layout::{CanvasResolution, LayoutEngine, LayoutSpec, PipParams};
//!
//! let spec = LayoutSpec::PrimarySecondary(PipParams::default());
//! let positions = LayoutEngine::compute(5, CanvasResolution::new(1920, 1080), &spec).unwrap();
//! assert_eq!(positions.len(), 5);
//! ```

pub mod primary_secondary;
pub mod scatter;
pub mod types;

pub use primary_secondary::{Corner, PrimarySecondaryLayout};
pub use scatter::{ScatterLayout, ScatterPlacement};
pub use types::{CanvasResolution, LayoutPosition, LayoutSpec, PipParams, Rect, ScatterParams};

use crate::error::Result;

/// Core trait implemented by every layout strategy
pub trait Layout {
    /// Returns the unique name of this strategy
    fn name(&self) -> &str;

    /// Compute one position per strip, index-aligned with strip order
    ///
    /// Must accept `strip_count` of 0 and 1.
    fn calculate_positions(
        &self,
        strip_count: usize,
        resolution: CanvasResolution,
    ) -> Result<Vec<LayoutPosition>>;
}

/// Entry point that dispatches a [`LayoutSpec`] to its strategy
pub struct LayoutEngine;

impl LayoutEngine {
    /// Instantiate the strategy described by `spec`
    pub fn layout_for(spec: &LayoutSpec) -> Box<dyn Layout> {
        match spec {
            LayoutSpec::Scatter(params) => Box::new(ScatterLayout::new(params.clone())),
            LayoutSpec::PrimarySecondary(params) => {
                Box::new(PrimarySecondaryLayout::new(params.clone()))
            }
        }
    }

    /// Compute positions for `strip_count` strips
    pub fn compute(
        strip_count: usize,
        resolution: CanvasResolution,
        spec: &LayoutSpec,
    ) -> Result<Vec<LayoutPosition>> {
        let layout = Self::layout_for(spec);
        tracing::debug!(
            "Computing {} layout for {} strips on {}x{}",
            layout.name(),
            strip_count,
            resolution.width,
            resolution.height
        );
        layout.calculate_positions(strip_count, resolution)
    }
}
