//! # Animations
//!
//! Audio-driven property perturbations for a single strip. The family is
//! closed: [`AnimationKind`] lists every kind and carries its parameters.
//!
//! ## Available Animations
//!
//! - **scale**: uniform scale pulse on each event
//! - **shake**: positional kick on each event
//! - **rotation**: small rotation wobble on each event
//! - **visibility**: show, hide, alternate or pulse the strip on events
//! - **brightness_flicker**: short brightness dip on each event
//! - **jitter**: continuous offset noise, independent of events
//!
//! Every event-driven kind writes its captured base state at frame 1 and
//! returns to it after each peak (see [`keyframes::pulse_and_return`]).

pub mod brightness;
pub mod jitter;
pub mod keyframes;
pub mod rotation;
pub mod scale;
pub mod shake;
pub mod traits;
pub mod visibility;

pub use brightness::BrightnessParams;
pub use jitter::JitterParams;
pub use rotation::RotationParams;
pub use scale::{Easing, ScaleParams};
pub use shake::ShakeParams;
pub use traits::{Animation, AnimationContext, BaseState};
pub use visibility::{VisibilityParams, VisibilityPattern};

use crate::{
    analysis::Trigger,
    config::params::{ParamReader, Params},
    error::{ConfigError, Result},
};

/// One configured animation with its typed parameters
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationKind {
    Scale(ScaleParams),
    Shake(ShakeParams),
    Rotation(RotationParams),
    Visibility(VisibilityParams),
    BrightnessFlicker(BrightnessParams),
    Jitter(JitterParams),
}

impl AnimationKind {
    pub const NAMES: [&'static str; 6] = [
        "scale",
        "shake",
        "rotation",
        "visibility",
        "brightness_flicker",
        "jitter",
    ];

    /// Parse a kind name and its parameter table
    ///
    /// `path` is the document location of the entry, used in error messages.
    /// Unknown parameter names are rejected.
    pub fn from_params(kind: &str, params: &Params, path: &str) -> Result<Self> {
        let mut reader = ParamReader::new(params, path);

        let animation = match kind {
            "scale" => AnimationKind::Scale(ScaleParams::read(&mut reader)?),
            "shake" => AnimationKind::Shake(ShakeParams::read(&mut reader)?),
            "rotation" | "rotation_wobble" => {
                AnimationKind::Rotation(RotationParams::read(&mut reader)?)
            }
            "visibility" => AnimationKind::Visibility(VisibilityParams::read(&mut reader)?),
            "brightness_flicker" => {
                AnimationKind::BrightnessFlicker(BrightnessParams::read(&mut reader)?)
            }
            "jitter" => AnimationKind::Jitter(JitterParams::read(&mut reader)?),
            other => {
                return Err(ConfigError::InvalidValue {
                    key: format!("{}.type", path),
                    value: other.to_string(),
                }
                .into())
            }
        };

        reader.finish()?;
        Ok(animation)
    }

    /// Trigger used when an entry does not name one
    pub fn default_trigger(&self) -> Trigger {
        match self {
            AnimationKind::Scale(_) => Trigger::Bass,
            AnimationKind::Jitter(_) => Trigger::Continuous,
            AnimationKind::Shake(_)
            | AnimationKind::Rotation(_)
            | AnimationKind::Visibility(_)
            | AnimationKind::BrightnessFlicker(_) => Trigger::Beat,
        }
    }

    pub fn as_animation(&self) -> &dyn Animation {
        match self {
            AnimationKind::Scale(params) => params,
            AnimationKind::Shake(params) => params,
            AnimationKind::Rotation(params) => params,
            AnimationKind::Visibility(params) => params,
            AnimationKind::BrightnessFlicker(params) => params,
            AnimationKind::Jitter(params) => params,
        }
    }

    pub fn name(&self) -> &'static str {
        self.as_animation().name()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompositorError;
    use crate::strip::Capability;

    #[test]
    fn test_every_name_parses_with_defaults() {
        for name in AnimationKind::NAMES {
            let kind = AnimationKind::from_params(name, &Params::new(), "a").unwrap();
            assert_eq!(kind.name(), name);
        }
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let scale = AnimationKind::from_params("scale", &Params::new(), "a").unwrap();
        assert_eq!(scale, AnimationKind::Scale(ScaleParams::default()));
        assert_eq!(scale.default_trigger(), Trigger::Bass);

        let jitter = AnimationKind::from_params("jitter", &Params::new(), "a").unwrap();
        assert_eq!(jitter.default_trigger(), Trigger::Continuous);
        assert_eq!(jitter.as_animation().required_capability(), Capability::Transform);
    }

    #[test]
    fn test_unknown_kind_names_type_field() {
        let err = AnimationKind::from_params("film_grain", &Params::new(), "strip_animations.*[2]")
            .unwrap_err();
        match err {
            CompositorError::Config(ConfigError::InvalidValue { key, value }) => {
                assert_eq!(key, "strip_animations.*[2].type");
                assert_eq!(value, "film_grain");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_param_rejected() {
        let params = Params::new().set("speed", 2.0);
        let err = AnimationKind::from_params("shake", &params, "strip_animations.Cam[0]").unwrap_err();
        assert!(err.to_string().contains("strip_animations.Cam[0].speed"));
    }

    #[test]
    fn test_negative_intensity_rejected() {
        let params = Params::new().set("intensity", -1.0);
        assert!(AnimationKind::from_params("brightness_flicker", &params, "a").is_err());
    }
}
