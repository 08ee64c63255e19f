use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Audio analysis document produced by the external analyzer
///
/// Only the event categories are consumed here; any other fields the
/// analyzer writes (tempo, frequency bands, ...) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisDocument {
    /// Total duration of the analyzed audio in seconds
    #[serde(default)]
    pub duration: Option<f64>,

    /// Named event categories
    #[serde(default)]
    pub animation_events: AnimationEvents,
}

/// Event categories, each an ordered list of seconds since audio start
///
/// A category that was not produced by the analyzer stays `None`, which is
/// distinct from a category that was produced but happens to be empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnimationEvents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beats: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_peaks: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onsets: Option<Vec<f64>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Section>>,
}

/// Musical section boundary; only `start` is used as a trigger event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub start: f64,
    pub end: f64,
    #[serde(default)]
    pub label: Option<String>,
}

impl AnalysisDocument {
    /// Load an analysis document from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_json_str(&content)
    }

    /// Parse an analysis document from JSON text
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Builder helper mostly used by tests and adapters
    pub fn with_beats(mut self, beats: Vec<f64>) -> Self {
        self.animation_events.beats = Some(beats);
        self
    }

    pub fn with_energy_peaks(mut self, peaks: Vec<f64>) -> Self {
        self.animation_events.energy_peaks = Some(peaks);
        self
    }

    pub fn with_onsets(mut self, onsets: Vec<f64>) -> Self {
        self.animation_events.onsets = Some(onsets);
        self
    }

    pub fn with_sections(mut self, sections: Vec<Section>) -> Self {
        self.animation_events.sections = Some(sections);
        self
    }

    /// Raw event times for a document category, `None` when absent
    pub fn category(&self, name: &str) -> Option<Vec<f64>> {
        let events = &self.animation_events;
        match name {
            "beats" => events.beats.clone(),
            "energy_peaks" => events.energy_peaks.clone(),
            "onsets" => events.onsets.clone(),
            "sections" => events
                .sections
                .as_ref()
                .map(|sections| sections.iter().map(|s| s.start).collect()),
            _ => None,
        }
    }
}
