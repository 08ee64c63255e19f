use crate::{
    animation::{keyframes::pulse_and_return, traits::AnimationContext, Animation},
    config::params::ParamReader,
    error::{AnimationError, Result},
    sink::TransformKey,
    strip::Capability,
};

/// Interpolation the host should use between scale keys
///
/// Keys are written the same way for every easing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub const ALL: [Easing; 4] = [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut];

    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease_in",
            Easing::EaseOut => "ease_out",
            Easing::EaseInOut => "ease_in_out",
        }
    }

    /// Case-insensitive, so `EASE_OUT` and `ease_out` both parse
    fn parse(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        Self::ALL.into_iter().find(|easing| easing.name() == lower)
    }
}

/// Uniform scale pulse on each event
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleParams {
    /// Relative growth at the peak, `peak = base * (1 + intensity)`
    pub intensity: f64,

    /// Frames from the peak back to the base scale
    pub duration_frames: u32,

    pub easing: Easing,
}

impl Default for ScaleParams {
    fn default() -> Self {
        Self {
            intensity: 0.3,
            duration_frames: 2,
            easing: Easing::Linear,
        }
    }
}

impl ScaleParams {
    pub(crate) fn read(reader: &mut ParamReader<'_>) -> Result<Self> {
        let defaults = Self::default();
        let easing_name = reader.str_or("easing", defaults.easing.name())?;
        let easing = Easing::parse(easing_name).ok_or_else(|| reader.invalid("easing", easing_name))?;

        Ok(Self {
            intensity: reader.non_negative_or("intensity", defaults.intensity)?,
            duration_frames: reader.u32_or("duration_frames", defaults.duration_frames)?,
            easing,
        })
    }
}

impl Animation for ScaleParams {
    fn name(&self) -> &'static str {
        "scale"
    }

    fn required_capability(&self) -> Capability {
        Capability::Transform
    }

    fn apply(&self, ctx: &mut AnimationContext<'_>, events: &[f64]) -> std::result::Result<usize, AnimationError> {
        let base = ctx.base.position.scale;
        let peak = base * (1.0 + self.intensity);

        pulse_and_return(
            ctx,
            events,
            self.duration_frames,
            |ctx, frame| ctx.set_transform(frame, TransformKey::scale(base)),
            |ctx, _, frame| ctx.set_transform(frame, TransformKey::scale(peak)),
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

    #[test]
    fn test_scale_pulses_from_layout_scale() {
        let mut harness =
            Harness::new().with_base(BaseState::from_position(LayoutPosition::new(10.0, 5.0, 0.5)));
        let params = ScaleParams {
            intensity: 0.5,
            duration_frames: 2,
            ..Default::default()
        };

        harness.apply(&params, &[1.0]).unwrap();

        let id = harness.strip.id.clone();
        assert_eq!(
            harness.store.channel(&id, Property::ScaleX),
            vec![(1, 0.5), (30, 0.75), (32, 0.5)]
        );
        // Offsets are never touched by a scale pulse.
        assert!(harness.store.channel(&id, Property::OffsetX).is_empty());
    }

    #[test]
    fn test_zero_intensity_keeps_base() {
        let mut harness = Harness::new();
        let params = ScaleParams {
            intensity: 0.0,
            duration_frames: 1,
            ..Default::default()
        };
        harness.apply(&params, &[0.5]).unwrap();

        let id = harness.strip.id.clone();
        assert!(harness
            .store
            .channel(&id, Property::ScaleY)
            .iter()
            .all(|(_, value)| *value == 1.0));
    }

    #[test]
    fn test_easing_names_parse_in_either_case() {
        use crate::config::params::Params;

        let params = Params::new().set("easing", "EASE_OUT").set("intensity", 0.2);
        let mut reader = ParamReader::new(&params, "strip_animations.Camera1[0]");
        let scale = ScaleParams::read(&mut reader).unwrap();
        reader.finish().unwrap();
        assert_eq!(scale.easing, Easing::EaseOut);

        let params = Params::new().set("easing", "bounce");
        let mut reader = ParamReader::new(&params, "strip_animations.Camera1[0]");
        assert!(ScaleParams::read(&mut reader).is_err());
    }
}
