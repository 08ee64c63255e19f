//! # Keyframe Sink
//!
//! The host environment that stores and renders strip properties sits behind
//! [`KeyframeSink`]. The compositor is its only writer and writes strictly in
//! order, so implementations only need last-write-wins insertion keyed by
//! (strip, property, frame).
//!
//! [`KeyframeStore`] is an in-memory sink used by the command line tool and
//! by tests.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::{
    error::{Result, SinkError},
    layout::LayoutPosition,
    strip::StripId,
};

/// Frame number on the host timeline
pub type Frame = i64;

/// Partial transform; only the channels that are `Some` get keyed
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransformKey {
    pub offset: Option<(f64, f64)>,
    pub scale: Option<(f64, f64)>,
    /// Radians
    pub rotation: Option<f64>,
}

impl TransformKey {
    pub fn offset(x: f64, y: f64) -> Self {
        Self {
            offset: Some((x, y)),
            ..Default::default()
        }
    }

    /// Uniform scale on both axes
    pub fn scale(scale: f64) -> Self {
        Self {
            scale: Some((scale, scale)),
            ..Default::default()
        }
    }

    pub fn rotation(radians: f64) -> Self {
        Self {
            rotation: Some(radians),
            ..Default::default()
        }
    }

    /// Offset and uniform scale of a layout placement
    pub fn placement(position: &LayoutPosition) -> Self {
        Self {
            offset: Some((position.offset_x, position.offset_y)),
            scale: Some((position.scale, position.scale)),
            rotation: None,
        }
    }
}

/// Receiver of keyframe writes
pub trait KeyframeSink {
    fn set_transform(
        &mut self,
        strip: &StripId,
        frame: Frame,
        transform: &TransformKey,
    ) -> std::result::Result<(), SinkError>;

    fn set_visibility(
        &mut self,
        strip: &StripId,
        frame: Frame,
        visible: bool,
    ) -> std::result::Result<(), SinkError>;

    fn set_opacity(
        &mut self,
        strip: &StripId,
        frame: Frame,
        alpha: f64,
    ) -> std::result::Result<(), SinkError>;

    fn set_brightness(
        &mut self,
        strip: &StripId,
        frame: Frame,
        value: f64,
    ) -> std::result::Result<(), SinkError>;
}

/// Individually keyed strip property
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    OffsetX,
    OffsetY,
    ScaleX,
    ScaleY,
    Rotation,
    Visible,
    Opacity,
    Brightness,
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Property::OffsetX => "offset_x",
            Property::OffsetY => "offset_y",
            Property::ScaleX => "scale_x",
            Property::ScaleY => "scale_y",
            Property::Rotation => "rotation",
            Property::Visible => "visible",
            Property::Opacity => "opacity",
            Property::Brightness => "brightness",
        };
        f.write_str(name)
    }
}

/// One stored keyframe, as exported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyframeRecord {
    pub strip: StripId,
    pub property: Property,
    pub frame: Frame,
    pub value: f64,
}

/// In-memory last-write-wins keyframe store
#[derive(Debug, Default)]
pub struct KeyframeStore {
    keys: BTreeMap<(StripId, Property, Frame), f64>,
    known: Option<HashSet<StripId>>,
    writes: usize,
}

impl KeyframeStore {
    /// A store that accepts writes for any strip
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects writes for strips outside `ids`
    pub fn with_strips<I: IntoIterator<Item = StripId>>(ids: I) -> Self {
        Self {
            known: Some(ids.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Value keyed at exactly `frame`
    pub fn value(&self, strip: &StripId, property: Property, frame: Frame) -> Option<f64> {
        self.keys.get(&(strip.clone(), property, frame)).copied()
    }

    /// All keys of one property channel, ordered by frame
    pub fn channel(&self, strip: &StripId, property: Property) -> Vec<(Frame, f64)> {
        self.keys
            .iter()
            .filter(|((s, p, _), _)| s == strip && *p == property)
            .map(|((_, _, frame), value)| (*frame, *value))
            .collect()
    }

    /// Number of distinct (strip, property, frame) keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of individual channel writes, including overwrites
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn records(&self) -> Vec<KeyframeRecord> {
        self.keys
            .iter()
            .map(|((strip, property, frame), value)| KeyframeRecord {
                strip: strip.clone(),
                property: *property,
                frame: *frame,
                value: *value,
            })
            .collect()
    }

    /// Write every keyframe as a pretty JSON array
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.records())?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn check(&self, strip: &StripId) -> std::result::Result<(), SinkError> {
        match &self.known {
            Some(known) if !known.contains(strip) => Err(SinkError::UnknownStrip {
                strip: strip.to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn insert(&mut self, strip: &StripId, property: Property, frame: Frame, value: f64) {
        self.keys.insert((strip.clone(), property, frame), value);
        self.writes += 1;
    }
}

impl KeyframeSink for KeyframeStore {
    fn set_transform(
        &mut self,
        strip: &StripId,
        frame: Frame,
        transform: &TransformKey,
    ) -> std::result::Result<(), SinkError> {
        self.check(strip)?;
        if let Some((x, y)) = transform.offset {
            self.insert(strip, Property::OffsetX, frame, x);
            self.insert(strip, Property::OffsetY, frame, y);
        }
        if let Some((x, y)) = transform.scale {
            self.insert(strip, Property::ScaleX, frame, x);
            self.insert(strip, Property::ScaleY, frame, y);
        }
        if let Some(rotation) = transform.rotation {
            self.insert(strip, Property::Rotation, frame, rotation);
        }
        Ok(())
    }

    fn set_visibility(
        &mut self,
        strip: &StripId,
        frame: Frame,
        visible: bool,
    ) -> std::result::Result<(), SinkError> {
        self.check(strip)?;
        self.insert(strip, Property::Visible, frame, if visible { 1.0 } else { 0.0 });
        Ok(())
    }

    fn set_opacity(
        &mut self,
        strip: &StripId,
        frame: Frame,
        alpha: f64,
    ) -> std::result::Result<(), SinkError> {
        self.check(strip)?;
        self.insert(strip, Property::Opacity, frame, alpha);
        Ok(())
    }

    fn set_brightness(
        &mut self,
        strip: &StripId,
        frame: Frame,
        value: f64,
    ) -> std::result::Result<(), SinkError> {
        self.check(strip)?;
        self.insert(strip, Property::Brightness, frame, value);
        Ok(())
    }
}
