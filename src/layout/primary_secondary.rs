use tracing::debug;

use crate::{
    error::Result,
    layout::{
        types::{CanvasResolution, LayoutPosition, PipParams},
        Layout,
    },
};

/// Canvas corner used for inset strips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
}

impl Corner {
    /// Fixed cyclic assignment order for strips 2, 3, 4, 5, 6, ...
    pub const ORDER: [Corner; 4] = [
        Corner::TopRight,
        Corner::TopLeft,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// Corner for strip `index`; `None` for the two main strips
    pub fn for_index(index: usize) -> Option<Corner> {
        index
            .checked_sub(2)
            .map(|secondary| Self::ORDER[secondary % Self::ORDER.len()])
    }

    fn signs(self) -> (f64, f64) {
        match self {
            Corner::TopRight => (1.0, 1.0),
            Corner::TopLeft => (-1.0, 1.0),
            Corner::BottomRight => (1.0, -1.0),
            Corner::BottomLeft => (-1.0, -1.0),
        }
    }
}

/// Two full-canvas main strips, every other strip inset in a corner
///
/// Corner centers sit so that an inset's edges keep `margin_percent` of the
/// half canvas away from the canvas edges.
pub struct PrimarySecondaryLayout {
    params: PipParams,
}

impl PrimarySecondaryLayout {
    pub fn new(params: PipParams) -> Self {
        Self { params }
    }

    /// Center offset of an inset in the given corner
    pub fn corner_offset(&self, corner: Corner, resolution: CanvasResolution) -> (f64, f64) {
        let (half_width, half_height) = resolution.half_extents();
        let margin_x = (half_width as f64 * self.params.margin_percent).floor() as i64;
        let margin_y = (half_height as f64 * self.params.margin_percent).floor() as i64;
        let pip_half_width = (half_width as f64 * self.params.pip_scale).floor() as i64;
        let pip_half_height = (half_height as f64 * self.params.pip_scale).floor() as i64;

        let x = (half_width - margin_x - pip_half_width) as f64;
        let y = (half_height - margin_y - pip_half_height) as f64;
        let (sx, sy) = corner.signs();
        (sx * x, sy * y)
    }
}

impl Layout for PrimarySecondaryLayout {
    fn name(&self) -> &str {
        "primary-secondary"
    }

    fn calculate_positions(
        &self,
        strip_count: usize,
        resolution: CanvasResolution,
    ) -> Result<Vec<LayoutPosition>> {
        resolution.validate()?;
        self.params.validate()?;

        let positions: Vec<LayoutPosition> = (0..strip_count)
            .map(|index| match Corner::for_index(index) {
                None => LayoutPosition::centered(),
                Some(corner) => {
                    let (x, y) = self.corner_offset(corner, resolution);
                    LayoutPosition::new(x, y, self.params.pip_scale)
                }
            })
            .collect();

        debug!(
            "Primary-secondary layout: {} strips, {} insets",
            strip_count,
            strip_count.saturating_sub(2)
        );

        Ok(positions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HD: CanvasResolution = CanvasResolution {
        width: 1920,
        height: 1080,
    };

    #[test]
    fn test_two_main_strips_centered() {
        let layout = PrimarySecondaryLayout::new(PipParams::default());
        let positions = layout.calculate_positions(2, HD).unwrap();
        assert_eq!(positions, vec![LayoutPosition::centered(); 2]);
    }

    #[test]
    fn test_five_strips_corner_order() {
        let layout = PrimarySecondaryLayout::new(PipParams::default());
        let positions = layout.calculate_positions(5, HD).unwrap();

        // half 960x540, margin 96x54, inset half 240x135
        let top_right = LayoutPosition::new(624.0, 351.0, 0.25);
        let top_left = LayoutPosition::new(-624.0, 351.0, 0.25);
        let bottom_right = LayoutPosition::new(624.0, -351.0, 0.25);

        assert_eq!(positions[0], LayoutPosition::centered());
        assert_eq!(positions[1], LayoutPosition::centered());
        assert_eq!(&positions[2..], &[top_right, top_left, bottom_right]);
    }

    #[test]
    fn test_corners_cycle_with_period_four() {
        let layout = PrimarySecondaryLayout::new(PipParams::default());
        let positions = layout.calculate_positions(11, HD).unwrap();
        for i in 2..7 {
            assert_eq!(positions[i], positions[i + 4]);
        }
        assert_eq!(Corner::for_index(5), Some(Corner::BottomLeft));
        assert_eq!(Corner::for_index(6), Some(Corner::TopRight));
    }

    #[test]
    fn test_single_and_empty() {
        let layout = PrimarySecondaryLayout::new(PipParams::default());
        assert!(layout.calculate_positions(0, HD).unwrap().is_empty());
        assert_eq!(
            layout.calculate_positions(1, HD).unwrap(),
            vec![LayoutPosition::centered()]
        );
    }

    #[test]
    fn test_offsets_stay_on_canvas() {
        let params = PipParams {
            pip_scale: 1.0,
            margin_percent: 0.9,
        };
        let layout = PrimarySecondaryLayout::new(params);
        for position in layout.calculate_positions(6, HD).unwrap() {
            assert!(position.offset_x.abs() <= 960.0);
            assert!(position.offset_y.abs() <= 540.0);
        }
    }
}
