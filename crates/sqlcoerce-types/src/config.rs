//! Type system configuration
//!
//! Limits and defaults that parameterize the type factory: maximum decimal
//! precision and scale, the default DECIMAL parameters, and string length
//! bounds. Configuration is plain serde data, loadable from JSON.

use serde::{Deserialize, Serialize};
use sqlcoerce_diagnostics::{ErrorBuilder, SQC0400, SQC0401, SqlError};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A setting is out of range or inconsistent with another setting
    #[error("Invalid type system configuration: {message}")]
    Invalid { message: String },

    /// The configuration document could not be read or parsed
    #[error("Failed to load type system configuration: {message}")]
    Parse { message: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

impl From<ConfigError> for SqlError {
    fn from(err: ConfigError) -> Self {
        let code = match err {
            ConfigError::Invalid { .. } => SQC0400,
            ConfigError::Parse { .. } => SQC0401,
        };
        ErrorBuilder::new(code, err.to_string()).config()
    }
}

/// Limits and defaults of the SQL type system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeSystemConfig {
    /// Maximum precision of DECIMAL (and of derived arithmetic results)
    pub max_numeric_precision: u32,
    /// Maximum scale of DECIMAL
    pub max_numeric_scale: u32,
    /// Precision of DECIMAL declared without parameters
    pub default_decimal_precision: u32,
    /// Scale of DECIMAL declared without parameters
    pub default_decimal_scale: u32,
    /// Length of CHAR declared without a length
    pub default_char_length: u32,
    /// Length of BINARY declared without a length
    pub default_binary_length: u32,
    pub max_char_length: u32,
    pub max_binary_length: u32,
}

impl Default for TypeSystemConfig {
    fn default() -> Self {
        Self {
            max_numeric_precision: 19,
            max_numeric_scale: 19,
            default_decimal_precision: 19,
            default_decimal_scale: 0,
            default_char_length: 1,
            default_binary_length: 1,
            max_char_length: 65536,
            max_binary_length: 65536,
        }
    }
}

impl TypeSystemConfig {
    /// Parse a JSON document and validate it
    ///
    /// Missing keys take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TypeSystemConfig = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Parse {
            message: format!("{}: {}", path.as_ref().display(), e),
        })?;
        Self::from_json(&content)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_numeric_precision == 0 {
            return Err(ConfigError::invalid("max_numeric_precision cannot be 0"));
        }

        if self.default_decimal_precision == 0 {
            return Err(ConfigError::invalid("default_decimal_precision cannot be 0"));
        }

        if self.default_decimal_precision > self.max_numeric_precision {
            return Err(ConfigError::invalid(format!(
                "default_decimal_precision ({}) cannot exceed max_numeric_precision ({})",
                self.default_decimal_precision, self.max_numeric_precision
            )));
        }

        if self.default_decimal_scale > self.default_decimal_precision {
            return Err(ConfigError::invalid(format!(
                "default_decimal_scale ({}) cannot exceed default_decimal_precision ({})",
                self.default_decimal_scale, self.default_decimal_precision
            )));
        }

        if self.default_decimal_scale > self.max_numeric_scale {
            return Err(ConfigError::invalid(format!(
                "default_decimal_scale ({}) cannot exceed max_numeric_scale ({})",
                self.default_decimal_scale, self.max_numeric_scale
            )));
        }

        for (name, default, max) in [
            ("char", self.default_char_length, self.max_char_length),
            ("binary", self.default_binary_length, self.max_binary_length),
        ] {
            if default == 0 || max == 0 {
                return Err(ConfigError::invalid(format!("{} lengths cannot be 0", name)));
            }
            if default > max {
                return Err(ConfigError::invalid(format!(
                    "default_{}_length ({}) cannot exceed max_{}_length ({})",
                    name, default, name, max
                )));
            }
        }

        Ok(())
    }

    /// Scale of the max-precision decimal: `min(max_scale, max_precision)`
    pub fn max_decimal_scale(&self) -> u32 {
        self.max_numeric_scale.min(self.max_numeric_precision)
    }
}
