use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserializer, Serializer};
use serde_derive::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};
use crate::flag::{Flag, KnownFlag};
use crate::flag_set::FlagSet;
use crate::header::parse_value;
use crate::keymap_config::{KeymapConfig, LayerStateWidth};

/// Configurations of a keymap, the `keymap.toml` counterpart of `config.h`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeymapTomlConfig {
    /// Firmware image config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware: Option<FirmwareConfig>,
    /// Key behavior config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behavior: Option<BehaviorConfig>,
    /// USB config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usb: Option<UsbConfig>,
    /// Indicator config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator: Option<IndicatorConfig>,
    /// Layer config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<LayerConfig>,
    /// Raw HID interface config
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_hid: Option<RawHidConfig>,
    /// Extra `#define`s passed to the firmware framework as they are
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub define: Vec<DefineConfig>,
}

/// Configurations for the firmware image
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FirmwareConfig {
    /// Opaque version string embedded in the image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Build with the Oryx configurator conventions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oryx_configurator: Option<bool>,
}

/// Configurations for key behavior
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BehaviorConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_mod_tap_interrupt: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub double_report: Option<bool>,
}

/// Configurations for usb
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsbConfig {
    /// Delay in ms before reporting after a wakeup, 0 means no delay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suspend_wakeup_delay: Option<u32>,
}

/// Configurations for indicators
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndicatorConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caps_lock_status: Option<bool>,
}

/// Configurations for layers
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerConfig {
    /// Width of the layer state, 8, 16 or 32
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_bits: Option<u8>,
}

/// Configurations for the raw HID interface
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawHidConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_page: Option<HexU16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_id: Option<HexU16>,
}

/// A pass-through `#define`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefineConfig {
    pub name: String,
    /// Replacement text as it would appear in `config.h`, e.g. `"200"` or `"u8\"abc\""`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// 16-bit protocol identifier.
///
/// Accepts either a TOML integer (`0xFF60`) or a string (`"0xFF60"`), and is always
/// written back as a hex string so the hex form survives a round trip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexU16(pub u16);

impl serde::Serialize for HexU16 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{:#X}", self.0))
    }
}

impl<'de> serde::Deserialize<'de> for HexU16 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(HexU16Visitor)
    }
}

struct HexU16Visitor;

impl<'de> Visitor<'de> for HexU16Visitor {
    type Value = HexU16;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a 16-bit integer or a hex string like \"0xFF60\"")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        u16::try_from(v)
            .map(HexU16)
            .map_err(|_| E::custom(format!("{v:#X} doesn't fit in 16 bits")))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u16::try_from(v)
            .map(HexU16)
            .map_err(|_| E::custom(format!("{v} doesn't fit in 16 bits")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        let v = v.trim();
        let parsed = match v.strip_prefix("0x").or_else(|| v.strip_prefix("0X")) {
            Some(hex) => u16::from_str_radix(hex, 16),
            None => v.parse(),
        };
        parsed
            .map(HexU16)
            .map_err(|_| E::custom(format!("Invalid 16-bit value \"{v}\"")))
    }
}

impl KeymapTomlConfig {
    /// Parse `keymap.toml` contents, `path` is only used in error messages
    pub fn from_toml_str(source: &str, path: &str) -> ConfigResult<Self> {
        toml::from_str(source).map_err(|e| ConfigError::TomlParse {
            path: path.to_string(),
            message: e.message().to_string(),
        })
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string(self).map_err(|e| ConfigError::TomlSerialize { message: e.to_string() })
    }

    /// Type-check into a [`KeymapConfig`]
    pub fn to_keymap_config(&self) -> ConfigResult<KeymapConfig> {
        let firmware = self.firmware.clone().unwrap_or_default();
        let behavior = self.behavior.clone().unwrap_or_default();
        let raw_hid = self.raw_hid.clone().unwrap_or_default();

        let layer_state_width = match self.layer.as_ref().and_then(|l| l.state_bits) {
            Some(bits) => Some(LayerStateWidth::from_bits(bits).ok_or(ConfigError::InvalidValue {
                field: "layer.state_bits".to_string(),
                value: bits.to_string(),
                expected: format!(
                    "one of {}",
                    defaults::SUPPORTED_LAYER_STATE_BITS.map(|b| b.to_string()).join(", ")
                ),
            })?),
            None => None,
        };

        Ok(KeymapConfig {
            oryx_configurator: firmware.oryx_configurator.unwrap_or(false),
            ignore_mod_tap_interrupt: behavior.ignore_mod_tap_interrupt.unwrap_or(false),
            usb_suspend_wakeup_delay: self.usb.as_ref().and_then(|u| u.suspend_wakeup_delay),
            caps_lock_status: self
                .indicator
                .as_ref()
                .and_then(|i| i.caps_lock_status)
                .unwrap_or(false),
            firmware_version: firmware.version,
            raw_usage_page: raw_hid.usage_page.map(|v| v.0),
            raw_usage_id: raw_hid.usage_id.map(|v| v.0),
            layer_state_width,
            double_report: behavior.double_report.unwrap_or(false),
            extra: self.extra_flags()?,
        })
    }

    fn extra_flags(&self) -> ConfigResult<FlagSet> {
        let mut flags = FlagSet::new();
        for define in &self.define {
            if !is_identifier(&define.name) {
                return Err(ConfigError::InvalidValue {
                    field: "define.name".to_string(),
                    value: define.name.clone(),
                    expected: "a C identifier".to_string(),
                });
            }
            if KnownFlag::from_name(&define.name).is_some() {
                return Err(ConfigError::InvalidValue {
                    field: "define.name".to_string(),
                    value: define.name.clone(),
                    expected: "a flag without a dedicated keymap.toml key".to_string(),
                });
            }
            let value = match &define.value {
                Some(text) => parse_value(text)?,
                None => None,
            };
            flags.insert(Flag {
                name: define.name.clone(),
                value,
            })?;
        }
        Ok(flags)
    }
}

impl From<&KeymapConfig> for KeymapTomlConfig {
    fn from(config: &KeymapConfig) -> Self {
        let flag = |enabled: bool| enabled.then_some(true);

        let firmware = FirmwareConfig {
            version: config.firmware_version.clone(),
            oryx_configurator: flag(config.oryx_configurator),
        };
        let behavior = BehaviorConfig {
            ignore_mod_tap_interrupt: flag(config.ignore_mod_tap_interrupt),
            double_report: flag(config.double_report),
        };
        let usb = UsbConfig {
            suspend_wakeup_delay: config.usb_suspend_wakeup_delay,
        };
        let indicator = IndicatorConfig {
            caps_lock_status: flag(config.caps_lock_status),
        };
        let layer = LayerConfig {
            state_bits: config.layer_state_width.map(|w| w.bits()),
        };
        let raw_hid = RawHidConfig {
            usage_page: config.raw_usage_page.map(HexU16),
            usage_id: config.raw_usage_id.map(HexU16),
        };

        KeymapTomlConfig {
            firmware: non_empty(firmware),
            behavior: non_empty(behavior),
            usb: non_empty(usb),
            indicator: non_empty(indicator),
            layer: non_empty(layer),
            raw_hid: non_empty(raw_hid),
            define: config
                .extra
                .iter()
                .map(|f| DefineConfig {
                    name: f.name.clone(),
                    value: f.value.as_ref().map(|v| v.to_string()),
                })
                .collect(),
        }
    }
}

impl TryFrom<&KeymapTomlConfig> for KeymapConfig {
    type Error = ConfigError;

    fn try_from(config: &KeymapTomlConfig) -> Result<Self, Self::Error> {
        config.to_keymap_config()
    }
}

fn non_empty<T: Default + PartialEq>(section: T) -> Option<T> {
    (section != T::default()).then_some(section)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
