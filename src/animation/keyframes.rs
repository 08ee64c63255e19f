//! Shared keyframe timing used by the event-driven animations.

use crate::{animation::traits::AnimationContext, error::AnimationError, sink::Frame};

/// Frame the captured base state is written at
pub const BASE_FRAME: Frame = 1;

/// Largest random displacement, in pixels or degrees, an animation draws
pub const MAX_DISPLACEMENT: f64 = 100_000.0;

/// Reject a displacement range the RNG cannot sample from
pub fn check_displacement(animation: &str, field: &str, value: f64) -> Result<(), AnimationError> {
    if (0.0..=MAX_DISPLACEMENT).contains(&value) {
        return Ok(());
    }
    Err(AnimationError::InvalidParameters {
        details: format!("{} {} = {} (expected 0 to {})", animation, field, value, MAX_DISPLACEMENT),
    })
}

/// Nearest frame for an event time in seconds
pub fn frame_for(time: f64, fps: u32) -> Frame {
    (time * fps as f64).round() as Frame
}

/// Pulse-and-return: base at [`BASE_FRAME`], then per event a peak at the
/// event frame and the base again `hold` frames later.
///
/// `write_base` always writes the value captured before the first event;
/// the base is never re-read from the sink. `write_peak` gets the event index.
pub fn pulse_and_return<B, P>(
    ctx: &mut AnimationContext<'_>,
    events: &[f64],
    hold: u32,
    mut write_base: B,
    mut write_peak: P,
) -> Result<usize, AnimationError>
where
    B: FnMut(&mut AnimationContext<'_>, Frame) -> Result<(), AnimationError>,
    P: FnMut(&mut AnimationContext<'_>, usize, Frame) -> Result<(), AnimationError>,
{
    write_base(ctx, BASE_FRAME)?;

    for (index, &time) in events.iter().enumerate() {
        let frame = frame_for(time, ctx.fps);
        write_peak(ctx, index, frame)?;
        write_base(ctx, frame + Frame::from(hold))?;
    }

    Ok(ctx.written())
}
