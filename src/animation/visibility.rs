use crate::{
    animation::{
        keyframes::{frame_for, BASE_FRAME},
        traits::AnimationContext,
        Animation,
    },
    config::params::ParamReader,
    error::{AnimationError, Result},
    sink::Frame,
    strip::Capability,
};

/// How a strip's visibility reacts to events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisibilityPattern {
    /// The two main strips take turns, switching on each event; any
    /// further strip stays visible
    Alternate,
    Show,
    Hide,
    /// Visible for `duration_frames` after each event
    Pulse,
}

impl VisibilityPattern {
    pub const ALL: [VisibilityPattern; 4] = [
        VisibilityPattern::Alternate,
        VisibilityPattern::Show,
        VisibilityPattern::Hide,
        VisibilityPattern::Pulse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VisibilityPattern::Alternate => "alternate",
            VisibilityPattern::Show => "show",
            VisibilityPattern::Hide => "hide",
            VisibilityPattern::Pulse => "pulse",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityParams {
    pub pattern: VisibilityPattern,
    pub duration_frames: u32,
}

impl Default for VisibilityParams {
    fn default() -> Self {
        Self {
            pattern: VisibilityPattern::Alternate,
            duration_frames: 10,
        }
    }
}

impl VisibilityParams {
    pub(crate) fn read(reader: &mut ParamReader<'_>) -> Result<Self> {
        let defaults = Self::default();
        let name = reader.str_or("pattern", defaults.pattern.name())?;
        let pattern = VisibilityPattern::ALL
            .into_iter()
            .find(|pattern| pattern.name() == name)
            .ok_or_else(|| reader.invalid("pattern", name))?;

        Ok(Self {
            pattern,
            duration_frames: reader.u32_or("duration_frames", defaults.duration_frames)?,
        })
    }

    /// Whether the strip shows at event `event_index`
    fn visible_at(&self, strip_index: usize, event_index: usize) -> bool {
        match self.pattern {
            VisibilityPattern::Alternate if strip_index < 2 => (event_index + strip_index) % 2 == 0,
            VisibilityPattern::Alternate => true,
            VisibilityPattern::Show | VisibilityPattern::Pulse => true,
            VisibilityPattern::Hide => false,
        }
    }
}

impl Animation for VisibilityParams {
    fn name(&self) -> &'static str {
        "visibility"
    }

    fn required_capability(&self) -> Capability {
        Capability::Opacity
    }

    fn apply(&self, ctx: &mut AnimationContext<'_>, events: &[f64]) -> std::result::Result<usize, AnimationError> {
        let initial = match self.pattern {
            VisibilityPattern::Alternate if ctx.strip_index < 2 => ctx.strip_index == 0,
            _ => ctx.base.visible,
        };
        ctx.set_visibility(BASE_FRAME, initial)?;

        for (index, &time) in events.iter().enumerate() {
            let frame = frame_for(time, ctx.fps);
            ctx.set_visibility(frame, self.visible_at(ctx.strip_index, index))?;

            if self.pattern == VisibilityPattern::Pulse {
                ctx.set_visibility(frame + Frame::from(self.duration_frames), false)?;
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

    fn states(harness: &Harness) -> Vec<(Frame, f64)> {
        harness.store.channel(&harness.strip.id, Property::Visible)
    }

    #[test]
    fn test_alternate_parity_between_neighbours() {
        let events = [1.0, 2.0, 3.0];

        let mut first = Harness::new().with_index(0);
        first.apply(&VisibilityParams::default(), &events).unwrap();
        assert_eq!(states(&first), vec![(1, 1.0), (30, 1.0), (60, 0.0), (90, 1.0)]);

        let mut second = Harness::new().with_index(1);
        second.apply(&VisibilityParams::default(), &events).unwrap();
        assert_eq!(states(&second), vec![(1, 0.0), (30, 0.0), (60, 1.0), (90, 0.0)]);
    }

    #[test]
    fn test_alternate_keeps_insets_visible() {
        for index in [2, 3] {
            let mut inset = Harness::new().with_index(index);
            inset.apply(&VisibilityParams::default(), &[1.0, 2.0]).unwrap();
            assert_eq!(states(&inset), vec![(1, 1.0), (30, 1.0), (60, 1.0)]);
        }
    }

    #[test]
    fn test_pulse_hides_after_duration() {
        let params = VisibilityParams {
            pattern: VisibilityPattern::Pulse,
            duration_frames: 5,
        };
        let mut harness = Harness::new();
        let written = harness.apply(&params, &[1.0]).unwrap();

        assert_eq!(written, 3);
        assert_eq!(states(&harness), vec![(1, 1.0), (30, 1.0), (35, 0.0)]);
    }

    #[test]
    fn test_hide_is_constant() {
        let params = VisibilityParams {
            pattern: VisibilityPattern::Hide,
            ..Default::default()
        };
        let mut harness = Harness::new();
        harness.apply(&params, &[1.0, 2.0]).unwrap();
        assert_eq!(states(&harness), vec![(1, 1.0), (30, 0.0), (60, 0.0)]);
    }

    #[test]
    fn test_unknown_pattern_rejected() {
        use crate::config::params::Params;

        let params = Params::new().set("pattern", "strobe");
        let mut reader = ParamReader::new(&params, "strip_animations.*[0]");
        assert!(VisibilityParams::read(&mut reader).is_err());
    }
}
