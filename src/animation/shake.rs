use rand::Rng;

use crate::{
    animation::{
        keyframes::{check_displacement, pulse_and_return, MAX_DISPLACEMENT},
        traits::AnimationContext,
        Animation,
    },
    config::params::ParamReader,
    error::{AnimationError, Result},
    sink::TransformKey,
    strip::Capability,
};

/// Positional kick on each event
#[derive(Debug, Clone, PartialEq)]
pub struct ShakeParams {
    /// Maximum displacement in pixels
    pub intensity: f64,

    pub return_frames: u32,

    /// Random displacement per axis; otherwise a fixed kick along +x
    pub random_direction: bool,
}

impl Default for ShakeParams {
    fn default() -> Self {
        Self {
            intensity: 10.0,
            return_frames: 2,
            random_direction: true,
        }
    }
}

impl ShakeParams {
    pub(crate) fn read(reader: &mut ParamReader<'_>) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            intensity: reader.at_most_or("intensity", defaults.intensity, MAX_DISPLACEMENT)?,
            return_frames: reader.u32_or("return_frames", defaults.return_frames)?,
            random_direction: reader.bool_or("random_direction", defaults.random_direction)?,
        })
    }
}

impl Animation for ShakeParams {
    fn name(&self) -> &'static str {
        "shake"
    }

    fn required_capability(&self) -> Capability {
        Capability::Transform
    }

    fn apply(&self, ctx: &mut AnimationContext<'_>, events: &[f64]) -> std::result::Result<usize, AnimationError> {
        check_displacement(self.name(), "intensity", self.intensity)?;

        let base_x = ctx.base.position.offset_x;
        let base_y = ctx.base.position.offset_y;
        let intensity = self.intensity;

        pulse_and_return(
            ctx,
            events,
            self.return_frames,
            |ctx, frame| ctx.set_transform(frame, TransformKey::offset(base_x, base_y)),
            |ctx, _, frame| {
                let (dx, dy) = if self.random_direction {
                    (
                        ctx.rng.gen_range(-intensity..=intensity),
                        ctx.rng.gen_range(-intensity..=intensity),
                    )
                } else {
                    (intensity, 0.0)
                };
                ctx.set_transform(frame, TransformKey::offset(base_x + dx, base_y + dy))
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::testing::Harness;
    use crate::animation::BaseState;
    use crate::layout::LayoutPosition;
    use crate::sink::Property;

    fn placed() -> BaseState {
        BaseState::from_position(LayoutPosition::new(100.0, -50.0, 0.4))
    }

    #[test]
    fn test_fixed_direction_kick() {
        let mut harness = Harness::new().with_base(placed());
        let params = ShakeParams {
            intensity: 8.0,
            return_frames: 2,
            random_direction: false,
        };
        harness.apply(&params, &[1.0]).unwrap();

        let id = harness.strip.id.clone();
        assert_eq!(
            harness.store.channel(&id, Property::OffsetX),
            vec![(1, 100.0), (30, 108.0), (32, 100.0)]
        );
        assert_eq!(
            harness.store.channel(&id, Property::OffsetY),
            vec![(1, -50.0), (30, -50.0), (32, -50.0)]
        );
    }

    #[test]
    fn test_random_kicks_stay_within_intensity() {
        let mut harness = Harness::new().with_base(placed());
        let params = ShakeParams {
            intensity: 5.0,
            ..Default::default()
        };
        let events: Vec<f64> = (1..20).map(|i| i as f64 * 0.5).collect();
        harness.apply(&params, &events).unwrap();

        let id = harness.strip.id.clone();
        for (_, x) in harness.store.channel(&id, Property::OffsetX) {
            assert!((x - 100.0).abs() <= 5.0);
        }
        for (_, y) in harness.store.channel(&id, Property::OffsetY) {
            assert!((y + 50.0).abs() <= 5.0);
        }
    }

    #[test]
    fn test_oversized_intensity_fails_without_writes() {
        let mut harness = Harness::new();
        let params = ShakeParams {
            intensity: 1e308,
            ..Default::default()
        };
        let err = harness.apply(&params, &[1.0]).unwrap_err();
        assert!(matches!(err, AnimationError::InvalidParameters { .. }));
        assert!(harness.store.is_empty());
    }

    #[test]
    fn test_oversized_intensity_rejected_in_config() {
        use crate::config::params::Params;

        let params = Params::new().set("intensity", 1e308);
        let mut reader = ParamReader::new(&params, "strip_animations.Cam[0]");
        assert!(ShakeParams::read(&mut reader).is_err());
    }

    #[test]
    fn test_returns_to_captured_base() {
        let mut harness = Harness::new().with_base(placed());
        harness.apply(&ShakeParams::default(), &[0.2, 0.4]).unwrap();

        let id = harness.strip.id.clone();
        // Return frames 8 and 14 always hold the base, never a prior peak.
        assert_eq!(harness.store.value(&id, Property::OffsetX, 8), Some(100.0));
        assert_eq!(harness.store.value(&id, Property::OffsetX, 14), Some(100.0));
    }
}
