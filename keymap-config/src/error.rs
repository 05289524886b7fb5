//! Unified error types for keymap-config
//!
//! Every failure while reading, parsing or type-checking a keymap configuration
//! ends up as a [`ConfigError`]. The library never panics on malformed input.

use std::fmt;

/// Unified error type for keymap-config
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// File I/O error
    FileRead { path: String, message: String },
    /// `config.h` parsing error
    HeaderParse {
        source_name: String,
        line: usize,
        column: usize,
        message: String,
    },
    /// TOML parsing error
    TomlParse { path: String, message: String },
    /// TOML serialization error
    TomlSerialize { message: String },
    /// A flag name is defined more than once
    DuplicateDefinition { name: String },
    /// Invalid value
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
    /// Two flags that cannot be defined together
    Conflict { first: String, second: String },
    /// The file extension doesn't map to a known config format
    UnsupportedFormat { path: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileRead { path, message } => {
                write!(f, "Failed to read config file '{}': {}", path, message)
            }
            ConfigError::HeaderParse {
                source_name,
                line,
                column,
                message,
            } => {
                write!(f, "Failed to parse '{}' at {}:{}: {}", source_name, line, column, message)
            }
            ConfigError::TomlParse { path, message } => {
                write!(f, "Failed to parse '{}': {}", path, message)
            }
            ConfigError::TomlSerialize { message } => {
                write!(f, "Failed to serialize keymap config to TOML: {}", message)
            }
            ConfigError::DuplicateDefinition { name } => {
                write!(f, "'{}' is defined more than once", name)
            }
            ConfigError::InvalidValue { field, value, expected } => {
                write!(f, "Invalid value '{}' for '{}', expected: {}", value, field, expected)
            }
            ConfigError::Conflict { first, second } => {
                write!(f, "'{}' and '{}' cannot be defined together", first, second)
            }
            ConfigError::UnsupportedFormat { path } => {
                write!(f, "Unsupported config format for '{}', expected a `.h` or `.toml` file", path)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
