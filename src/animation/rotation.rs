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

/// Small rotation wobble on each event
#[derive(Debug, Clone, PartialEq)]
pub struct RotationParams {
    /// Maximum wobble in degrees; keyframes are written in radians
    pub wobble_degrees: f64,

    pub return_frames: u32,

    /// Alternate the wobble direction per event instead of picking it at random
    pub oscillate: bool,
}

impl Default for RotationParams {
    fn default() -> Self {
        Self {
            wobble_degrees: 1.0,
            return_frames: 3,
            oscillate: true,
        }
    }
}

impl RotationParams {
    pub(crate) fn read(reader: &mut ParamReader<'_>) -> Result<Self> {
        let defaults = Self::default();
        let wobble_key = reader.pick("wobble_degrees", "degrees")?;
        Ok(Self {
            wobble_degrees: reader.at_most_or(wobble_key, defaults.wobble_degrees, MAX_DISPLACEMENT)?,
            return_frames: reader.u32_or("return_frames", defaults.return_frames)?,
            oscillate: reader.bool_or("oscillate", defaults.oscillate)?,
        })
    }

    fn sign(&self, ctx: &mut AnimationContext<'_>, event_index: usize) -> f64 {
        let positive = if self.oscillate {
            event_index % 2 == 0
        } else {
            ctx.rng.gen_bool(0.5)
        };
        if positive {
            1.0
        } else {
            -1.0
        }
    }
}

impl Animation for RotationParams {
    fn name(&self) -> &'static str {
        "rotation"
    }

    fn required_capability(&self) -> Capability {
        Capability::Transform
    }

    fn apply(&self, ctx: &mut AnimationContext<'_>, events: &[f64]) -> std::result::Result<usize, AnimationError> {
        check_displacement(self.name(), "wobble_degrees", self.wobble_degrees)?;

        let base = ctx.base.rotation;
        let wobble = self.wobble_degrees;

        pulse_and_return(
            ctx,
            events,
            self.return_frames,
            |ctx, frame| ctx.set_transform(frame, TransformKey::rotation(base)),
            |ctx, index, frame| {
                let sign = self.sign(ctx, index);
                let degrees = sign * ctx.rng.gen_range(0.0..=wobble);
                ctx.set_transform(frame, TransformKey::rotation(base + degrees.to_radians()))
            },
        )
    }
}
