use serde::{Deserialize, Serialize};

use crate::{
    config::params::{ParamReader, Params},
    error::{ConfigError, LayoutError, Result},
};

/// Canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasResolution {
    pub width: u32,
    pub height: u32,
}

impl CanvasResolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Integer half extents in the center-origin coordinate system
    pub fn half_extents(&self) -> (i64, i64) {
        ((self.width / 2) as i64, (self.height / 2) as i64)
    }

    pub fn validate(&self) -> std::result::Result<(), LayoutError> {
        if self.width == 0 || self.height == 0 {
            return Err(LayoutError::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for CanvasResolution {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Placement of one strip, relative to the canvas center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPosition {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl LayoutPosition {
    pub fn new(offset_x: f64, offset_y: f64, scale: f64) -> Self {
        Self {
            offset_x,
            offset_y,
            scale,
        }
    }

    /// Full-canvas, centered placement
    pub fn centered() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    /// Axis-aligned rectangle covered by this strip on the given canvas
    pub fn bounds(&self, resolution: CanvasResolution) -> Rect {
        Rect {
            center_x: self.offset_x,
            center_y: self.offset_y,
            half_width: resolution.width as f64 * self.scale * 0.5,
            half_height: resolution.height as f64 * self.scale * 0.5,
        }
    }
}

/// Centered axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub center_x: f64,
    pub center_y: f64,
    pub half_width: f64,
    pub half_height: f64,
}

impl Rect {
    /// Strict overlap; touching edges do not count
    pub fn overlaps(&self, other: &Rect) -> bool {
        let x_overlap = (self.center_x - other.center_x).abs() < self.half_width + other.half_width;
        let y_overlap =
            (self.center_y - other.center_y).abs() < self.half_height + other.half_height;
        x_overlap && y_overlap
    }
}

/// Parameters for the scatter strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterParams {
    /// Whether strips may overlap each other
    pub overlap_allowed: bool,

    /// Edge margin as a fraction of the half canvas, in `[0, 1)`
    pub margin: f64,

    pub min_scale: f64,

    pub max_scale: f64,

    /// Seed for reproducible placement; `None` draws from entropy
    pub seed: Option<u64>,
}

impl Default for ScatterParams {
    fn default() -> Self {
        Self {
            overlap_allowed: true,
            margin: 0.05,
            min_scale: 0.3,
            max_scale: 0.8,
            seed: None,
        }
    }
}

impl ScatterParams {
    pub fn validate(&self) -> std::result::Result<(), LayoutError> {
        let in_unit = |v: f64| v > 0.0 && v <= 1.0;
        if !in_unit(self.min_scale) || !in_unit(self.max_scale) {
            return Err(LayoutError::InvalidParameters {
                details: format!(
                    "scale range must lie in (0, 1], got {}..{}",
                    self.min_scale, self.max_scale
                ),
            });
        }
        if self.min_scale > self.max_scale {
            return Err(LayoutError::InvalidParameters {
                details: format!("min_scale {} exceeds max_scale {}", self.min_scale, self.max_scale),
            });
        }
        if !(0.0..1.0).contains(&self.margin) {
            return Err(LayoutError::InvalidParameters {
                details: format!("margin must lie in [0, 1), got {}", self.margin),
            });
        }
        Ok(())
    }
}

/// Parameters for the primary-secondary (main + picture-in-picture) strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipParams {
    /// Scale of corner strips, in `(0, 1]`
    pub pip_scale: f64,

    /// Corner margin as a fraction of the half canvas, in `[0, 1)`
    pub margin_percent: f64,
}

impl Default for PipParams {
    fn default() -> Self {
        Self {
            pip_scale: 0.25,
            margin_percent: 0.1,
        }
    }
}

impl PipParams {
    pub fn validate(&self) -> std::result::Result<(), LayoutError> {
        if !(self.pip_scale > 0.0 && self.pip_scale <= 1.0) {
            return Err(LayoutError::InvalidParameters {
                details: format!("pip_scale must lie in (0, 1], got {}", self.pip_scale),
            });
        }
        if !(0.0..1.0).contains(&self.margin_percent) {
            return Err(LayoutError::InvalidParameters {
                details: format!("margin_percent must lie in [0, 1), got {}", self.margin_percent),
            });
        }
        Ok(())
    }
}

/// Layout strategy with its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LayoutSpec {
    Scatter(ScatterParams),
    PrimarySecondary(PipParams),
}

impl Default for LayoutSpec {
    fn default() -> Self {
        LayoutSpec::Scatter(ScatterParams::default())
    }
}

impl LayoutSpec {
    pub const KINDS: [&'static str; 2] = ["scatter", "primary-secondary"];

    pub fn name(&self) -> &'static str {
        match self {
            LayoutSpec::Scatter(_) => "scatter",
            LayoutSpec::PrimarySecondary(_) => "primary-secondary",
        }
    }

    /// Build a typed layout spec from the `[layout]` section of a config
    ///
    /// `random` and `main-pip` are accepted as older names of the two
    /// strategies. `fallback_seed` is used when the section has no seed.
    pub fn from_section(kind: &str, params: &Params, fallback_seed: Option<u64>) -> Result<Self> {
        let mut reader = ParamReader::new(params, "layout.config");

        let spec = match kind {
            "scatter" | "random" => {
                let defaults = ScatterParams::default();
                let overlap_allowed = reader.bool_or("overlap_allowed", defaults.overlap_allowed)?;
                let margin = reader.margin_or("margin", defaults.margin)?;
                let min_scale = reader.unit_fraction_or("min_scale", defaults.min_scale)?;
                let max_scale = reader.unit_fraction_or("max_scale", defaults.max_scale)?;
                if min_scale > max_scale {
                    return Err(reader.invalid("min_scale", min_scale));
                }
                let seed = reader.optional_u64("seed")?.or(fallback_seed);
                LayoutSpec::Scatter(ScatterParams {
                    overlap_allowed,
                    margin,
                    min_scale,
                    max_scale,
                    seed,
                })
            }
            "primary-secondary" | "main-pip" => {
                let defaults = PipParams::default();
                LayoutSpec::PrimarySecondary(PipParams {
                    pip_scale: reader.unit_fraction_or("pip_scale", defaults.pip_scale)?,
                    margin_percent: reader.margin_or("margin_percent", defaults.margin_percent)?,
                })
            }
            other => {
                return Err(ConfigError::InvalidValue {
                    key: "layout.type".to_string(),
                    value: other.to_string(),
                }
                .into())
            }
        };

        reader.finish()?;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompositorError;

    #[test]
    fn test_rect_overlap_is_strict() {
        let res = CanvasResolution::new(100, 100);
        let a = LayoutPosition::new(0.0, 0.0, 0.5).bounds(res);
        let touching = LayoutPosition::new(50.0, 0.0, 0.5).bounds(res);
        let overlapping = LayoutPosition::new(49.0, 10.0, 0.5).bounds(res);

        assert!(!a.overlaps(&touching));
        assert!(a.overlaps(&overlapping));
    }

    #[test]
    fn test_from_section_aliases() {
        let spec = LayoutSpec::from_section("main-pip", &Params::new(), None).unwrap();
        assert_eq!(spec, LayoutSpec::PrimarySecondary(PipParams::default()));

        let spec = LayoutSpec::from_section("random", &Params::new(), Some(9)).unwrap();
        match spec {
            LayoutSpec::Scatter(params) => assert_eq!(params.seed, Some(9)),
            other => panic!("unexpected spec {other:?}"),
        }
    }

    #[test]
    fn test_section_seed_overrides_fallback() {
        let params = Params::new().set("seed", 42i64);
        let spec = LayoutSpec::from_section("scatter", &params, Some(1)).unwrap();
        assert!(matches!(spec, LayoutSpec::Scatter(ScatterParams { seed: Some(42), .. })));
    }

    #[test]
    fn test_unknown_kind_names_field() {
        let err = LayoutSpec::from_section("spiral", &Params::new(), None).unwrap_err();
        match err {
            CompositorError::Config(ConfigError::InvalidValue { key, value }) => {
                assert_eq!(key, "layout.type");
                assert_eq!(value, "spiral");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_inverted_scale_range_rejected() {
        let params = Params::new().set("min_scale", 0.9).set("max_scale", 0.2);
        assert!(LayoutSpec::from_section("scatter", &params, None).is_err());
    }

    #[test]
    fn test_zero_resolution_invalid() {
        assert!(CanvasResolution::new(0, 1080).validate().is_err());
        assert!(CanvasResolution::new(1, 1).validate().is_ok());
    }
}
