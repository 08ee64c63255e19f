use rand::rngs::StdRng;

use crate::{
    error::AnimationError,
    layout::LayoutPosition,
    sink::{Frame, KeyframeSink, TransformKey},
    strip::{Capability, Strip},
};

/// Core trait that every animation kind implements
pub trait Animation {
    /// Returns the configuration name of this animation
    fn name(&self) -> &'static str;

    /// Property family the animation writes to
    ///
    /// Strips without it are skipped by the compositor before `apply` runs.
    fn required_capability(&self) -> Capability;

    /// Write this animation's keyframes for one strip
    ///
    /// # Arguments
    ///
    /// * `ctx` - The strip being animated, its base state and the sink
    /// * `events` - Event times in seconds, processed in the given order
    ///
    /// # Returns
    ///
    /// The number of keyframes written.
    fn apply(&self, ctx: &mut AnimationContext<'_>, events: &[f64]) -> Result<usize, AnimationError>;
}

/// Strip state the animations pulse away from and return to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseState {
    pub position: LayoutPosition,

    /// Radians
    pub rotation: f64,

    pub brightness: f64,

    pub visible: bool,
}

impl BaseState {
    pub fn from_position(position: LayoutPosition) -> Self {
        Self {
            position,
            rotation: 0.0,
            brightness: 1.0,
            visible: true,
        }
    }
}

impl Default for BaseState {
    fn default() -> Self {
        Self::from_position(LayoutPosition::centered())
    }
}

/// Everything one (strip, animation) run may read or write
///
/// Writes go through the context so the number of keyframes is tracked even
/// when an animation fails part way.
pub struct AnimationContext<'a> {
    pub strip: &'a Strip,

    /// Position of the strip in the request's strip order
    pub strip_index: usize,

    pub base: BaseState,

    pub fps: u32,

    pub rng: StdRng,

    sink: &'a mut dyn KeyframeSink,
    written: usize,
}

impl<'a> AnimationContext<'a> {
    pub fn new(
        strip: &'a Strip,
        strip_index: usize,
        base: BaseState,
        fps: u32,
        rng: StdRng,
        sink: &'a mut dyn KeyframeSink,
    ) -> Self {
        Self {
            strip,
            strip_index,
            base,
            fps,
            rng,
            sink,
            written: 0,
        }
    }

    /// Keyframes written so far through this context
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn set_transform(&mut self, frame: Frame, transform: TransformKey) -> Result<(), AnimationError> {
        self.sink.set_transform(&self.strip.id, frame, &transform)?;
        self.written += 1;
        Ok(())
    }

    pub fn set_visibility(&mut self, frame: Frame, visible: bool) -> Result<(), AnimationError> {
        self.sink.set_visibility(&self.strip.id, frame, visible)?;
        self.written += 1;
        Ok(())
    }

    pub fn set_brightness(&mut self, frame: Frame, value: f64) -> Result<(), AnimationError> {
        self.sink.set_brightness(&self.strip.id, frame, value)?;
        self.written += 1;
        Ok(())
    }
}
