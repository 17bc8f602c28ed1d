//! Configuration system
//!
//! [`Config`] gives any serde type TOML/RON file persistence. The collision
//! tunables live in [`CollisionConfig`].

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is out of its allowed range
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field
        field: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Tunables for collision detection and movement resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Gap left between a resolved character and the face it was pushed out of
    pub skin_width: f32,

    /// Catch panics raised by collision handlers, log them and keep sweeping
    pub isolate_callback_panics: bool,

    /// Initial state of the debug visualization flag
    pub debug_visible: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            skin_width: 0.002,
            isolate_callback_panics: true,
            debug_visible: false,
        }
    }
}

impl Config for CollisionConfig {}

impl CollisionConfig {
    /// Load, then validate, a collision config file
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        log::info!("Loaded collision config from {path}");
        Ok(config)
    }

    /// Reject a negative or non-finite skin width
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.skin_width.is_finite() || self.skin_width < 0.0 {
            return Err(ConfigError::Invalid {
                field: "skin_width",
                reason: format!("expected a finite, non-negative number, got {}", self.skin_width),
            });
        }
        Ok(())
    }
}
