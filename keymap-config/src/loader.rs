// Keymap configuration loader

use std::path::Path;

use config::{Config, Environment, File, FileFormat, Map};
use log::debug;

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};
use crate::flag_set::FlagSet;
use crate::header::parse_header;
use crate::keymap_config::KeymapConfig;
use crate::toml_config::KeymapTomlConfig;

/// Format of a keymap configuration file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `config.h`
    Header,
    /// `keymap.toml`
    Toml,
}

impl ConfigFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("h") => Ok(ConfigFormat::Header),
            Some("toml") => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a keymap configuration from a `config.h` or a `keymap.toml`.
    ///
    /// TOML values can be overridden by `KEYMAP_OVERRIDE_`-prefixed environment variables,
    /// with `__` between nested keys, e.g. `KEYMAP_OVERRIDE_FIRMWARE__VERSION`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use keymap_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::load("keymap.toml").unwrap();
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<KeymapConfig> {
        let path = path.as_ref();
        match ConfigFormat::from_path(path)? {
            ConfigFormat::Header => KeymapConfig::try_from(&Self::load_header(path)?),
            ConfigFormat::Toml => Self::load_toml(path)?.to_keymap_config(),
        }
    }

    /// Load the raw flags of a `config.h`, unrecognized flags and literal forms included
    pub fn load_header<P: AsRef<Path>>(path: P) -> ConfigResult<FlagSet> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("Parsing {}", path.display());
        parse_header(&source, &path.display().to_string())
    }

    /// Load a `keymap.toml` with environment overrides applied
    pub fn load_toml<P: AsRef<Path>>(path: P) -> ConfigResult<KeymapTomlConfig> {
        Self::load_toml_with_env(path, None)
    }

    /// Load a `keymap.toml`, taking overrides from `env` instead of the process environment if given
    pub fn load_toml_with_env<P: AsRef<Path>>(path: P, env: Option<Map<String, String>>) -> ConfigResult<KeymapTomlConfig> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::FileRead {
                path: path.display().to_string(),
                message: "file not found".to_string(),
            });
        }
        let to_error = |e: config::ConfigError| ConfigError::TomlParse {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        debug!("Loading {}", path.display());
        Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(
                Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator(defaults::ENV_PREFIX_SEPARATOR)
                    .separator(defaults::ENV_SEPARATOR)
                    .source(env),
            )
            .build()
            .map_err(to_error)?
            .try_deserialize()
            .map_err(to_error)
    }
}
