use rand::Rng;

use crate::{
    animation::{
        keyframes::{check_displacement, BASE_FRAME, MAX_DISPLACEMENT},
        traits::AnimationContext,
        Animation,
    },
    config::params::ParamReader,
    error::{AnimationError, Result},
    sink::{Frame, TransformKey},
    strip::Capability,
};

/// Continuous small offset noise over the whole strip
///
/// Event times are ignored; the cadence is drawn from the interval range.
#[derive(Debug, Clone, PartialEq)]
pub struct JitterParams {
    /// Maximum displacement in pixels
    pub intensity: f64,

    pub min_interval_frames: u32,

    pub max_interval_frames: u32,
}

impl Default for JitterParams {
    fn default() -> Self {
        Self {
            intensity: 2.0,
            min_interval_frames: 3,
            max_interval_frames: 8,
        }
    }
}

impl JitterParams {
    pub(crate) fn read(reader: &mut ParamReader<'_>) -> Result<Self> {
        let defaults = Self::default();
        let min_key = reader.pick("min_interval_frames", "min_interval")?;
        let max_key = reader.pick("max_interval_frames", "max_interval")?;

        let intensity = reader.at_most_or("intensity", defaults.intensity, MAX_DISPLACEMENT)?;
        let min_interval_frames = reader.u32_or(min_key, defaults.min_interval_frames)?;
        let max_interval_frames = reader.u32_or(max_key, defaults.max_interval_frames)?;

        if min_interval_frames == 0 {
            return Err(reader.invalid(min_key, min_interval_frames));
        }
        if min_interval_frames > max_interval_frames {
            return Err(reader.invalid(
                max_key,
                format!("{} (below minimum {})", max_interval_frames, min_interval_frames),
            ));
        }

        Ok(Self {
            intensity,
            min_interval_frames,
            max_interval_frames,
        })
    }

    fn check(&self) -> std::result::Result<(), AnimationError> {
        check_displacement(self.name(), "intensity", self.intensity)?;
        if self.min_interval_frames == 0 || self.min_interval_frames > self.max_interval_frames {
            return Err(AnimationError::InvalidParameters {
                details: format!(
                    "jitter interval {}..={} frames (minimum must be at least 1 and at most the maximum)",
                    self.min_interval_frames, self.max_interval_frames
                ),
            });
        }
        Ok(())
    }
}

impl Animation for JitterParams {
    fn name(&self) -> &'static str {
        "jitter"
    }

    fn required_capability(&self) -> Capability {
        Capability::Transform
    }

    fn apply(&self, ctx: &mut AnimationContext<'_>, _events: &[f64]) -> std::result::Result<usize, AnimationError> {
        self.check()?;

        let duration = ctx
            .strip
            .duration_frames
            .map(Frame::from)
            .ok_or_else(|| AnimationError::MissingDuration {
                strip: ctx.strip.id.to_string(),
            })?;

        let base_x = ctx.base.position.offset_x;
        let base_y = ctx.base.position.offset_y;
        let intensity = self.intensity;

        ctx.set_transform(BASE_FRAME, TransformKey::offset(base_x, base_y))?;

        let mut frame = BASE_FRAME;
        loop {
            let gap = ctx
                .rng
                .gen_range(self.min_interval_frames..=self.max_interval_frames);
            frame += Frame::from(gap);
            if frame > duration {
                break;
            }

            let dx = ctx.rng.gen_range(-intensity..=intensity);
            let dy = ctx.rng.gen_range(-intensity..=intensity);
            ctx.set_transform(frame, TransformKey::offset(base_x + dx, base_y + dy))?;

            // The last settle is clamped to the strip end.
            let settle = (frame + Frame::from((gap / 2).max(1))).min(duration);
            if settle > frame {
                ctx.set_transform(settle, TransformKey::offset(base_x, base_y))?;
            }
        }

        Ok(ctx.written())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::testing::Harness;
    use crate::sink::Property;
    use crate::strip::Strip;

    #[test]
    fn test_requires_duration() {
        let mut harness = Harness::new().with_strip(Strip::video("v9", "NoLength", 1));
        let err = harness.apply(&JitterParams::default(), &[]).unwrap_err();
        assert!(matches!(err, AnimationError::MissingDuration { .. }));
        assert!(harness.store.is_empty());
    }

    #[test]
    fn test_fixed_cadence_covers_strip() {
        let mut harness = Harness::new().with_strip(Strip::video("v1", "Cam", 1).with_duration(20));
        let params = JitterParams {
            intensity: 1.0,
            min_interval_frames: 4,
            max_interval_frames: 4,
        };
        let written = harness.apply(&params, &[]).unwrap();

        // Perturbations at 5, 9, 13, 17, each settling 2 frames later.
        let frames: Vec<Frame> = harness
            .store
            .channel(&harness.strip.id, Property::OffsetX)
            .into_iter()
            .map(|(frame, _)| frame)
            .collect();
        assert_eq!(frames, vec![1, 5, 7, 9, 11, 13, 15, 17, 19]);
        assert_eq!(written, 9);
    }

    #[test]
    fn test_settle_clamped_to_strip_end() {
        let mut harness = Harness::new().with_strip(Strip::video("v1", "Cam", 1).with_duration(18));
        let params = JitterParams {
            intensity: 1.0,
            min_interval_frames: 4,
            max_interval_frames: 4,
        };
        harness.apply(&params, &[]).unwrap();

        let frames: Vec<Frame> = harness
            .store
            .channel(&harness.strip.id, Property::OffsetX)
            .into_iter()
            .map(|(frame, _)| frame)
            .collect();
        assert_eq!(frames, vec![1, 5, 7, 9, 11, 13, 15, 17, 18]);
        assert_eq!(harness.store.value(&harness.strip.id, Property::OffsetX, 18), Some(0.0));
    }

    #[test]
    fn test_unvalidated_intervals_fail_without_writes() {
        for (min, max) in [(0, 0), (9, 2)] {
            let mut harness = Harness::new();
            let params = JitterParams {
                intensity: 1.0,
                min_interval_frames: min,
                max_interval_frames: max,
            };
            let err = harness.apply(&params, &[]).unwrap_err();
            assert!(matches!(err, AnimationError::InvalidParameters { .. }));
            assert!(harness.store.is_empty());
        }
    }

    #[test]
    fn test_offsets_stay_near_base() {
        let mut harness = Harness::new();
        harness.apply(&JitterParams::default(), &[]).unwrap();
        for (_, x) in harness.store.channel(&harness.strip.id, Property::OffsetX) {
            assert!(x.abs() <= 2.0);
        }
    }

    #[test]
    fn test_inverted_interval_rejected() {
        use crate::config::params::Params;

        let params = Params::new().set("min_interval", 9i64).set("max_interval", 2i64);
        let mut reader = ParamReader::new(&params, "x");
        assert!(JitterParams::read(&mut reader).is_err());
    }
}
