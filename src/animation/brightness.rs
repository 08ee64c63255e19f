use crate::{
    animation::{keyframes::pulse_and_return, traits::AnimationContext, Animation},
    config::params::ParamReader,
    error::{AnimationError, Result},
    strip::Capability,
};

/// Short brightness dip on each event
#[derive(Debug, Clone, PartialEq)]
pub struct BrightnessParams {
    /// Amount subtracted from the base brightness at the peak
    pub intensity: f64,

    pub duration_frames: u32,
}

impl Default for BrightnessParams {
    fn default() -> Self {
        Self {
            intensity: 0.15,
            duration_frames: 1,
        }
    }
}

impl BrightnessParams {
    pub(crate) fn read(reader: &mut ParamReader<'_>) -> Result<Self> {
        let defaults = Self::default();
        let duration_key = reader.pick("duration_frames", "return_frames")?;
        Ok(Self {
            intensity: reader.non_negative_or("intensity", defaults.intensity)?,
            duration_frames: reader.u32_or(duration_key, defaults.duration_frames)?,
        })
    }
}

impl Animation for BrightnessParams {
    fn name(&self) -> &'static str {
        "brightness_flicker"
    }

    fn required_capability(&self) -> Capability {
        Capability::Brightness
    }

    fn apply(&self, ctx: &mut AnimationContext<'_>, events: &[f64]) -> std::result::Result<usize, AnimationError> {
        let base = ctx.base.brightness;
        let dimmed = (base - self.intensity).max(0.0);

        pulse_and_return(
            ctx,
            events,
            self.duration_frames,
            |ctx, frame| ctx.set_brightness(frame, base),
            |ctx, _, frame| ctx.set_brightness(frame, dimmed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::testing::Harness;
    use crate::sink::Property;

    #[test]
    fn test_flicker_dims_then_restores() {
        let mut harness = Harness::new();
        let params = BrightnessParams {
            intensity: 0.25,
            duration_frames: 1,
        };
        harness.apply(&params, &[2.0]).unwrap();

        assert_eq!(
            harness.store.channel(&harness.strip.id, Property::Brightness),
            vec![(1, 1.0), (60, 0.75), (61, 1.0)]
        );
    }

    #[test]
    fn test_flicker_never_goes_negative() {
        let mut harness = Harness::new();
        let params = BrightnessParams {
            intensity: 3.0,
            duration_frames: 1,
        };
        harness.apply(&params, &[1.0]).unwrap();
        assert_eq!(
            harness.store.value(&harness.strip.id, Property::Brightness, 30),
            Some(0.0)
        );
    }
}
