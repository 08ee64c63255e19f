use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{debug, warn};

use crate::{
    error::Result,
    layout::{
        types::{CanvasResolution, LayoutPosition, Rect, ScatterParams},
        Layout,
    },
};

/// Placement attempts per strip before the last draw is kept anyway
pub const MAX_ATTEMPTS: usize = 100;

/// Stochastic placement with optional overlap avoidance
pub struct ScatterLayout {
    params: ScatterParams,
}

/// Scatter result including the strips that could not avoid a collision
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPlacement {
    pub positions: Vec<LayoutPosition>,

    /// Indices whose position was accepted after every attempt collided
    pub fallbacks: Vec<usize>,
}

impl ScatterLayout {
    pub fn new(params: ScatterParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ScatterParams {
        &self.params
    }

    /// Place `strip_count` strips and report collision fallbacks
    pub fn place(&self, strip_count: usize, resolution: CanvasResolution) -> Result<ScatterPlacement> {
        resolution.validate()?;
        self.params.validate()?;

        let mut rng = match self.params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let (half_width, half_height) = resolution.half_extents();
        let margin_x = (half_width as f64 * self.params.margin).floor() as i64;
        let margin_y = (half_height as f64 * self.params.margin).floor() as i64;
        let x_range = (-half_width + margin_x)..=(half_width - margin_x);
        let y_range = (-half_height + margin_y)..=(half_height - margin_y);

        let mut positions = Vec::with_capacity(strip_count);
        let mut occupied: Vec<Rect> = Vec::new();
        let mut fallbacks = Vec::new();

        for index in 0..strip_count {
            let scale = rng.gen_range(self.params.min_scale..=self.params.max_scale);

            let mut candidate = LayoutPosition::new(0.0, 0.0, scale);
            let mut accepted = false;

            for _ in 0..MAX_ATTEMPTS {
                let x = rng.gen_range(x_range.clone());
                let y = rng.gen_range(y_range.clone());
                candidate = LayoutPosition::new(x as f64, y as f64, scale);

                if self.params.overlap_allowed {
                    accepted = true;
                    break;
                }

                let bounds = candidate.bounds(resolution);
                if !occupied.iter().any(|other| other.overlaps(&bounds)) {
                    accepted = true;
                    break;
                }
            }

            if !accepted {
                warn!(
                    "No free spot for strip {} after {} attempts, keeping last draw",
                    index, MAX_ATTEMPTS
                );
                fallbacks.push(index);
            }

            if !self.params.overlap_allowed {
                occupied.push(candidate.bounds(resolution));
            }

            debug!(
                "Strip {} placed at ({}, {}) scale {:.3}",
                index, candidate.offset_x, candidate.offset_y, candidate.scale
            );
            positions.push(candidate);
        }

        Ok(ScatterPlacement {
            positions,
            fallbacks,
        })
    }
}

impl Layout for ScatterLayout {
    fn name(&self) -> &str {
        "scatter"
    }

    fn calculate_positions(
        &self,
        strip_count: usize,
        resolution: CanvasResolution,
    ) -> Result<Vec<LayoutPosition>> {
        Ok(self.place(strip_count, resolution)?.positions)
    }
}
