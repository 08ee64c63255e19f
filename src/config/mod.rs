//! Configuration document and its validation.
//!
//! [`Config`] mirrors the TOML document as written. [`Config::validate`]
//! turns it into a [`CompositionConfig`] whose layout and animations are
//! typed, bounds-checked and drawn from closed vocabularies.

pub mod params;
pub mod targets;

pub use params::{ParamReader, ParamValue, Params};
pub use targets::{AnimationConfig, AnimationSpec, Target, WILDCARD};

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    analysis::Trigger,
    animation::AnimationKind,
    error::{ConfigError, Result},
    layout::{CanvasResolution, LayoutSpec},
};

/// Configuration document as written on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Canvas, frame rate and seed
    #[serde(default)]
    pub project: ProjectConfig,

    /// Layout strategy and its parameters
    #[serde(default)]
    pub layout: LayoutSection,

    /// Animation lists keyed by strip id, strip name or `"*"`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub strip_animations: BTreeMap<String, Vec<AnimationEntry>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,

    /// Seed for scatter placement and animation randomness
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(default)]
    pub resolution: CanvasResolution,
}

fn default_fps() -> u32 {
    30
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            resolution: CanvasResolution::default(),
            fps: default_fps(),
            seed: None,
        }
    }
}

impl ProjectConfig {
    fn validate(&self) -> Result<()> {
        if self.resolution.validate().is_err() {
            return Err(ConfigError::InvalidValue {
                key: "project.resolution".to_string(),
                value: format!("{}x{}", self.resolution.width, self.resolution.height),
            }
            .into());
        }

        if self.fps == 0 {
            return Err(ConfigError::InvalidValue {
                key: "project.fps".to_string(),
                value: self.fps.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSection {
    #[serde(rename = "type", alias = "kind", default = "default_layout_kind")]
    pub kind: String,

    #[serde(default, alias = "params", skip_serializing_if = "Params::is_empty")]
    pub config: Params,
}

fn default_layout_kind() -> String {
    "scatter".to_string()
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            kind: default_layout_kind(),
            config: Params::new(),
        }
    }
}

/// One `[[strip_animations.<key>]]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationEntry {
    #[serde(rename = "type", alias = "kind", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Falls back to the kind's usual trigger when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,

    /// Every other key of the table
    #[serde(flatten)]
    pub params: Params,
}

impl AnimationEntry {
    pub fn new<S: Into<String>>(kind: S) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Default::default()
        }
    }

    pub fn with_trigger<S: Into<String>>(mut self, trigger: S) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }
}

/// Validated project settings
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectSettings {
    pub resolution: CanvasResolution,
    pub fps: u32,
    pub seed: Option<u64>,
}

/// Fully validated configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CompositionConfig {
    pub project: ProjectSettings,
    pub layout: LayoutSpec,
    pub animations: AnimationConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        toml::from_str(&content).map_err(|e| {
            ConfigError::ParseFailed {
                path: path.display().to_string(),
                reason: e.message().to_string(),
            }
            .into()
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ConfigError::ParseFailed {
                path: "<inline>".to_string(),
                reason: e.message().to_string(),
            }
            .into()
        })
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration into its typed form
    ///
    /// Fails on the first offending field, naming its path and value.
    pub fn validate(&self) -> Result<CompositionConfig> {
        self.project.validate()?;

        let layout = LayoutSpec::from_section(&self.layout.kind, &self.layout.config, self.project.seed)?;
        let animations = self.validate_animations()?;

        Ok(CompositionConfig {
            project: ProjectSettings {
                resolution: self.project.resolution,
                fps: self.project.fps,
                seed: self.project.seed,
            },
            layout,
            animations,
        })
    }

    fn validate_animations(&self) -> Result<AnimationConfig> {
        let mut animations = AnimationConfig::new();

        for (key, entries) in &self.strip_animations {
            if key.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "strip_animations".to_string(),
                    value: format!("{:?}", key),
                }
                .into());
            }

            for (index, entry) in entries.iter().enumerate() {
                let path = format!("strip_animations.{}[{}]", key, index);

                let kind_name = entry.kind.as_deref().ok_or_else(|| ConfigError::MissingKey {
                    key: format!("{}.type", path),
                })?;
                let kind = AnimationKind::from_params(kind_name, &entry.params, &path)?;

                let trigger = match entry.trigger.as_deref() {
                    None => kind.default_trigger(),
                    Some(name) => name.parse::<Trigger>().map_err(|_| ConfigError::InvalidValue {
                        key: format!("{}.trigger", path),
                        value: name.to_string(),
                    })?,
                };

                animations.push(AnimationSpec {
                    kind,
                    trigger,
                    target: Target::from_key(key),
                });
            }
        }

        Ok(animations)
    }
}
