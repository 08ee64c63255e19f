//! # Strip Model
//!
//! Strips are the addressable media elements that get placed and animated.
//! They are supplied by the host environment; this crate only reads them.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Stable strip identifier, assigned once when the strip list is built
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StripId(String);

impl StripId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StripId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Kind of media a strip carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Image,
    Audio,
}

/// Which animatable properties the host exposes for a strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Offset, scale and rotation
    #[serde(default)]
    pub transform: bool,

    /// Visibility and alpha blending
    #[serde(default)]
    pub opacity: bool,

    /// Brightness multiplier
    #[serde(default)]
    pub brightness: bool,
}

impl Capabilities {
    /// Everything a visual strip normally supports
    pub fn visual() -> Self {
        Self {
            transform: true,
            opacity: true,
            brightness: true,
        }
    }

    /// No animatable properties at all
    pub fn none() -> Self {
        Self {
            transform: false,
            opacity: false,
            brightness: false,
        }
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Transform => self.transform,
            Capability::Opacity => self.opacity,
            Capability::Brightness => self.brightness,
        }
    }
}

impl MediaKind {
    /// Capabilities a strip of this kind has unless the host says otherwise
    pub fn default_capabilities(self) -> Capabilities {
        match self {
            MediaKind::Video | MediaKind::Image => Capabilities::visual(),
            MediaKind::Audio => Capabilities::none(),
        }
    }
}

/// A single property family an animation needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Transform,
    Opacity,
    Brightness,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Transform => "transform",
            Capability::Opacity => "opacity",
            Capability::Brightness => "brightness",
        };
        f.write_str(name)
    }
}

/// A media strip as exposed by the host
#[derive(Debug, Clone, PartialEq)]
pub struct Strip {
    pub id: StripId,

    /// Display name (may repeat across strips)
    pub name: String,

    pub channel: u32,

    pub kind: MediaKind,

    pub capabilities: Capabilities,

    /// Length of the strip in frames, if the host knows it
    pub duration_frames: Option<u32>,
}

impl Strip {
    /// Create a strip whose capabilities follow its media kind
    pub fn new<I: Into<StripId>, N: Into<String>>(id: I, name: N, channel: u32, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            channel,
            kind,
            capabilities: kind.default_capabilities(),
            duration_frames: None,
        }
    }

    /// Shorthand for a video strip with full visual capabilities
    pub fn video<I: Into<StripId>, N: Into<String>>(id: I, name: N, channel: u32) -> Self {
        Self::new(id, name, channel, MediaKind::Video)
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_duration(mut self, frames: u32) -> Self {
        self.duration_frames = Some(frames);
        self
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.supports(capability)
    }
}

impl From<String> for StripId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// One entry of a strip manifest file
#[derive(Debug, Clone, Deserialize)]
struct ManifestEntry {
    id: String,
    name: Option<String>,
    #[serde(default)]
    channel: u32,
    kind: MediaKind,
    capabilities: Option<Capabilities>,
    duration_frames: Option<u32>,
}

/// Load an ordered strip list from a JSON manifest
///
/// The manifest is a JSON array; order in the file is strip order.
pub fn load_manifest<P: AsRef<Path>>(path: P) -> Result<Vec<Strip>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.display().to_string(),
    })?;
    parse_manifest(&content)
}

/// Parse an ordered strip list from JSON text
pub fn parse_manifest(content: &str) -> Result<Vec<Strip>> {
    let entries: Vec<ManifestEntry> = serde_json::from_str(content)?;

    let strips = entries
        .into_iter()
        .map(|entry| {
            let name = entry.name.unwrap_or_else(|| entry.id.clone());
            Strip {
                capabilities: entry
                    .capabilities
                    .unwrap_or_else(|| entry.kind.default_capabilities()),
                id: StripId::new(entry.id),
                name,
                channel: entry.channel,
                kind: entry.kind,
                duration_frames: entry.duration_frames,
            }
        })
        .collect();

    Ok(strips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_audio_strip_has_no_visual_capabilities() {
        let strip = Strip::new("a1", "Song", 1, MediaKind::Audio);
        assert!(!strip.supports(Capability::Transform));
        assert!(!strip.supports(Capability::Opacity));
    }

    #[test]
    fn test_parse_manifest_defaults() {
        let strips = parse_manifest(
            r#"[
                {"id": "v1", "name": "Camera1", "channel": 1, "kind": "video", "duration_frames": 900},
                {"id": "v2", "channel": 2, "kind": "image",
                 "capabilities": {"transform": true}},
                {"id": "a1", "kind": "audio"}
            ]"#,
        )
        .unwrap();

        assert_eq!(strips.len(), 3);
        assert_eq!(strips[0].name, "Camera1");
        assert_eq!(strips[0].duration_frames, Some(900));
        assert_eq!(strips[1].name, "v2");
        assert!(strips[1].supports(Capability::Transform));
        assert!(!strips[1].supports(Capability::Opacity));
        assert_eq!(strips[2].capabilities, Capabilities::none());
    }

    #[test]
    fn test_load_manifest_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "v1", "kind": "video"}}]"#).unwrap();

        let strips = load_manifest(file.path()).unwrap();
        assert_eq!(strips[0].id, StripId::from("v1"));
    }

    #[test]
    fn test_missing_manifest() {
        assert!(load_manifest("/definitely/not/here.json").is_err());
    }
}
