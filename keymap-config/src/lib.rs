//! Keymap configuration: the `config.h` flag list of a QMK keymap, its typed record,
//! the equivalent `keymap.toml`, and the constants the firmware build generates from them.

pub mod codegen;
pub mod defaults;
pub mod error;
pub mod flag;
pub mod flag_set;
pub mod header;
pub mod keymap_config;
pub mod loader;
pub mod toml_config;
mod validation;

pub use error::{ConfigError, ConfigResult};
pub use flag::{EncodingPrefix, Flag, FlagKind, FlagValue, IntLiteral, KnownFlag, Radix, StrLiteral};
pub use flag_set::FlagSet;
pub use header::{parse_header, parse_value};
pub use keymap_config::{KeymapConfig, LayerStateWidth};
pub use loader::{ConfigFormat, ConfigLoader};
pub use toml_config::{HexU16, KeymapTomlConfig};
pub use validation::validate_flags;
