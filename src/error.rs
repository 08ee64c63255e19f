use thiserror::Error;

/// Main error type for the strip compositor
#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Animation error: {0}")]
    Animation(#[from] AnimationError),

    #[error("Keyframe sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path} ({reason})")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {key}")]
    MissingKey { key: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Animation target '{key}' does not match any strip")]
    UnknownTarget { key: String },

    #[error("Animation target '{key}' matches {matches} strips")]
    AmbiguousTarget { key: String, matches: usize },

    #[error("Strip id '{id}' is used by {count} strips")]
    DuplicateStripId { id: String, count: usize },
}

/// Layout computation errors. Always fatal for a composition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Invalid canvas resolution: {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },

    #[error("Invalid layout parameters: {details}")]
    InvalidParameters { details: String },
}

/// Errors raised while running a single animation on a single strip
#[derive(Error, Debug)]
pub enum AnimationError {
    #[error("Strip '{strip}' has no known duration")]
    MissingDuration { strip: String },

    #[error("Invalid animation parameters: {details}")]
    InvalidParameters { details: String },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Errors reported by a keyframe sink
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    #[error("Unknown strip: {strip}")]
    UnknownStrip { strip: String },

    #[error("Property '{property}' rejected at frame {frame}: {reason}")]
    Rejected {
        property: String,
        frame: i64,
        reason: String,
    },
}

/// Convenience type alias for Results using CompositorError
pub type Result<T> = std::result::Result<T, CompositorError>;

impl CompositorError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Config(ConfigError::InvalidValue { key, value }) => {
                format!("Configuration field '{}' has an invalid value '{}'.", key, value)
            }
            Self::Config(ConfigError::UnknownTarget { key }) => {
                format!(
                    "No strip is named '{}'. Use a strip id or its exact name, or '*' for all strips.",
                    key
                )
            }
            Self::Layout(LayoutError::InvalidResolution { width, height }) => {
                format!("Cannot lay out strips on a {}x{} canvas.", width, height)
            }
            _ => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_for_unknown_target() {
        let err: CompositorError = ConfigError::UnknownTarget { key: "Camera9".into() }.into();
        assert!(err.user_message().contains("'Camera9'"));

        let layout: CompositorError = LayoutError::InvalidResolution { width: 0, height: 10 }.into();
        assert_eq!(layout.user_message(), "Cannot lay out strips on a 0x10 canvas.");
    }

    #[test]
    fn test_invalid_value_names_field_and_value() {
        let err: CompositorError = ConfigError::InvalidValue {
            key: "layout.type".into(),
            value: "spiral".into(),
        }
        .into();
        let message = err.to_string();
        assert!(message.contains("layout.type"));
        assert!(message.contains("spiral"));
    }
}
