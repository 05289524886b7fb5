use log::warn;

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};
use crate::flag::{FlagValue, IntLiteral, KnownFlag, StrLiteral};
use crate::flag_set::FlagSet;
use crate::validation::{self, integer_value, string_value};

/// Width of the bitmask that tracks active layers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerStateWidth {
    Bits8,
    Bits16,
    Bits32,
}

impl LayerStateWidth {
    pub fn bits(&self) -> u8 {
        match self {
            LayerStateWidth::Bits8 => 8,
            LayerStateWidth::Bits16 => 16,
            LayerStateWidth::Bits32 => 32,
        }
    }

    /// One bit per layer
    pub fn max_layers(&self) -> u8 {
        self.bits()
    }

    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(LayerStateWidth::Bits8),
            16 => Some(LayerStateWidth::Bits16),
            32 => Some(LayerStateWidth::Bits32),
            _ => None,
        }
    }

    /// The `LAYER_STATE_*BIT` flag selecting this width
    pub fn selector(&self) -> KnownFlag {
        match self {
            LayerStateWidth::Bits8 => KnownFlag::LayerState8Bit,
            LayerStateWidth::Bits16 => KnownFlag::LayerState16Bit,
            LayerStateWidth::Bits32 => KnownFlag::LayerState32Bit,
        }
    }
}

/// Typed keymap configuration.
///
/// Built once from a `config.h` or `keymap.toml` and passed by reference afterwards.
/// Scalars are `Option`s: a flag that isn't defined stays `None` instead of taking the
/// framework default, so "absent" and "explicitly zero" remain different.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeymapConfig {
    /// Follow the Oryx configurator build conventions
    pub oryx_configurator: bool,
    /// Disable the early tap/hold decision of mod-tap keys on interrupt
    pub ignore_mod_tap_interrupt: bool,
    /// Delay in ms before reports resume after USB wakeup
    pub usb_suspend_wakeup_delay: Option<u32>,
    /// Report caps lock state to the indicator logic
    pub caps_lock_status: bool,
    /// Opaque build identifier embedded in the image
    pub firmware_version: Option<String>,
    /// Usage page of the raw HID interface
    pub raw_usage_page: Option<u16>,
    /// Usage id of the raw HID interface
    pub raw_usage_id: Option<u16>,
    pub layer_state_width: Option<LayerStateWidth>,
    /// Send every key report twice
    pub double_report: bool,
    /// Flags this crate doesn't know about, passed through untouched
    pub extra: FlagSet,
}

impl KeymapConfig {
    /// Parse and type-check the contents of a `config.h`
    pub fn from_header(source: &str) -> ConfigResult<Self> {
        Self::try_from(&FlagSet::from_header(source)?)
    }

    /// Render as `config.h`
    pub fn to_header(&self) -> ConfigResult<String> {
        Ok(self.to_flag_set()?.to_header())
    }

    /// Convert back to flags.
    ///
    /// Recognized flags come first in a fixed order, usage page and id are written in
    /// hex and the firmware version gets the `u8` prefix. Fails if `extra` redefines a
    /// recognized flag.
    pub fn to_flag_set(&self) -> ConfigResult<FlagSet> {
        let mut flags = FlagSet::new();
        if self.oryx_configurator {
            flags.define(KnownFlag::OryxConfigurator.name())?;
        }
        if self.ignore_mod_tap_interrupt {
            flags.define(KnownFlag::IgnoreModTapInterrupt.name())?;
        }
        if let Some(delay) = self.usb_suspend_wakeup_delay {
            flags.define_value(
                KnownFlag::UsbSuspendWakeupDelay.name(),
                FlagValue::Integer(IntLiteral::decimal(delay.into())),
            )?;
        }
        if self.caps_lock_status {
            flags.define(KnownFlag::CapsLockStatus.name())?;
        }
        if let Some(version) = &self.firmware_version {
            flags.define_value(
                KnownFlag::FirmwareVersion.name(),
                FlagValue::String(StrLiteral::utf8(version.as_str())),
            )?;
        }
        if let Some(page) = self.raw_usage_page {
            flags.define_value(KnownFlag::RawUsagePage.name(), FlagValue::Integer(IntLiteral::hex(page.into())))?;
        }
        if let Some(id) = self.raw_usage_id {
            flags.define_value(KnownFlag::RawUsageId.name(), FlagValue::Integer(IntLiteral::hex(id.into())))?;
        }
        if let Some(width) = self.layer_state_width {
            flags.define(width.selector().name())?;
        }
        if self.double_report {
            flags.define(KnownFlag::DoubleReport.name())?;
        }
        for flag in &self.extra {
            if let Some(known) = flag.known() {
                return Err(ConfigError::Conflict {
                    first: known.name().to_string(),
                    second: format!("extra {}", flag.name),
                });
            }
            flags.insert(flag.clone())?;
        }
        Ok(flags)
    }

    /// Raw HID usage page and id, falling back to the framework defaults
    pub fn raw_hid_usage(&self) -> (u16, u16) {
        (
            self.raw_usage_page.unwrap_or(defaults::RAW_USAGE_PAGE),
            self.raw_usage_id.unwrap_or(defaults::RAW_USAGE_ID),
        )
    }

    /// Layer state width in bits, falling back to the framework default
    pub fn layer_state_bits(&self) -> u8 {
        self.layer_state_width
            .map(|w| w.bits())
            .unwrap_or(defaults::LAYER_STATE_BITS)
    }
}

impl TryFrom<&FlagSet> for KeymapConfig {
    type Error = ConfigError;

    fn try_from(flags: &FlagSet) -> Result<Self, Self::Error> {
        validation::validate_flags(flags)?;

        let mut config = KeymapConfig::default();
        for flag in flags {
            let Some(known) = flag.known() else {
                warn!("{} is not a recognized keymap flag, passing it through", flag.name);
                config.extra.insert(flag.clone())?;
                continue;
            };
            match known {
                KnownFlag::OryxConfigurator => config.oryx_configurator = true,
                KnownFlag::IgnoreModTapInterrupt => config.ignore_mod_tap_interrupt = true,
                KnownFlag::UsbSuspendWakeupDelay => {
                    let delay = integer_value(flag, defaults::USB_SUSPEND_WAKEUP_DELAY_MAX)?;
                    config.usb_suspend_wakeup_delay = Some(delay as u32);
                }
                KnownFlag::CapsLockStatus => config.caps_lock_status = true,
                KnownFlag::FirmwareVersion => config.firmware_version = Some(string_value(flag)?.to_string()),
                KnownFlag::RawUsagePage => {
                    config.raw_usage_page = Some(integer_value(flag, defaults::RAW_USAGE_MAX)? as u16);
                }
                KnownFlag::RawUsageId => {
                    config.raw_usage_id = Some(integer_value(flag, defaults::RAW_USAGE_MAX)? as u16);
                }
                // Resolved together below
                KnownFlag::LayerState8Bit | KnownFlag::LayerState16Bit | KnownFlag::LayerState32Bit => {}
                KnownFlag::DoubleReport => config.double_report = true,
            }
        }
        config.layer_state_width = validation::layer_state_width(flags)?;

        Ok(config)
    }
}

impl TryFrom<FlagSet> for KeymapConfig {
    type Error = ConfigError;

    fn try_from(flags: FlagSet) -> Result<Self, Self::Error> {
        Self::try_from(&flags)
    }
}
