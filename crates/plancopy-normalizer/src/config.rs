//! Normalizer configuration
//!
//! Loaded from TOML or built in code with `with_*` methods. Every field has a
//! default, so a partial file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Naming and copy settings for the normalizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Prefix of the host's default setup beam name; the default name of the
    /// k-th setup beam in a set is this prefix followed by k
    pub setup_beam_default_prefix: String,
    /// Separator between plan name and ordinal in positional isocenter names
    pub isocenter_separator: String,
    /// Separator between new beam number and preserved old name
    pub context_separator: String,
    /// First n tried for copy names `"<plan> (<n>)"`
    pub copy_suffix_start: u32,
    /// Copy names tried before giving up
    pub max_copy_attempts: u32,
}

impl NormalizerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With setup beam default name prefix
    #[inline]
    #[must_use]
    pub fn with_setup_beam_default_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.setup_beam_default_prefix = prefix.into();
        self
    }

    /// With context separator
    #[inline]
    #[must_use]
    pub fn with_context_separator(mut self, separator: impl Into<String>) -> Self {
        self.context_separator = separator.into();
        self
    }

    /// With isocenter separator
    #[inline]
    #[must_use]
    pub fn with_isocenter_separator(mut self, separator: impl Into<String>) -> Self {
        self.isocenter_separator = separator.into();
        self
    }

    /// With copy name attempt limit
    #[inline]
    #[must_use]
    pub fn with_max_copy_attempts(mut self, attempts: u32) -> Self {
        self.max_copy_attempts = attempts;
        self
    }

    /// Parse configuration from TOML
    ///
    /// # Errors
    /// Returns error if the TOML is malformed or has wrongly typed fields
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Host default name of the k-th (1-based) setup beam of a beam set
    #[inline]
    #[must_use]
    pub fn default_setup_beam_name(&self, ordinal: usize) -> String {
        format!("{}{ordinal}", self.setup_beam_default_prefix)
    }
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            setup_beam_default_prefix: "SB1_".to_string(),
            isocenter_separator: " ".to_string(),
            context_separator: " ".to_string(),
            copy_suffix_start: 1,
            max_copy_attempts: 100,
        }
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read config {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// TOML could not be parsed
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}
