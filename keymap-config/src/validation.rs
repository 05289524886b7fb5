//! Centralized validation for keymap flags
//!
//! Recognized flags are type-checked here before they are turned into a
//! [`crate::KeymapConfig`]. Unrecognized flags are never validated, the firmware
//! framework owns them.

use log::warn;

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};
use crate::flag::{Flag, FlagKind, FlagValue, KnownFlag};
use crate::flag_set::FlagSet;
use crate::keymap_config::LayerStateWidth;

/// Validates every recognized flag of the set
pub fn validate_flags(flags: &FlagSet) -> ConfigResult<()> {
    for flag in flags {
        let Some(known) = flag.known() else {
            continue;
        };
        match known.kind() {
            FlagKind::Presence => validate_presence(flag),
            FlagKind::Integer => {
                integer_value(flag, integer_limit(known))?;
            }
            FlagKind::String => {
                string_value(flag)?;
            }
        }
    }
    layer_state_width(flags)?;
    Ok(())
}

/// Presence flags are tested with `#ifdef`, a value doesn't change anything
fn validate_presence(flag: &Flag) {
    if let Some(value) = &flag.value {
        warn!(
            "{} is a presence-only flag, its value `{}` is ignored",
            flag.name, value
        );
    }
}

fn integer_limit(flag: KnownFlag) -> u64 {
    match flag {
        KnownFlag::RawUsagePage | KnownFlag::RawUsageId => defaults::RAW_USAGE_MAX,
        _ => defaults::USB_SUSPEND_WAKEUP_DELAY_MAX,
    }
}

/// Integer value of a flag, which must be an integer literal not larger than `max`
pub(crate) fn integer_value(flag: &Flag, max: u64) -> ConfigResult<u64> {
    let invalid = |value: String| ConfigError::InvalidValue {
        field: flag.name.clone(),
        value,
        expected: format!("an integer between 0 and {max:#X}"),
    };
    match &flag.value {
        Some(FlagValue::Integer(i)) if i.value() <= max => Ok(i.value()),
        Some(value) => Err(invalid(value.to_string())),
        None => Err(invalid(String::new())),
    }
}

/// String value of a flag, which must be a string literal
pub(crate) fn string_value(flag: &Flag) -> ConfigResult<&str> {
    match &flag.value {
        Some(FlagValue::String(s)) => Ok(&s.value),
        other => Err(ConfigError::InvalidValue {
            field: flag.name.clone(),
            value: other.as_ref().map(|v| v.to_string()).unwrap_or_default(),
            expected: "a string literal".to_string(),
        }),
    }
}

/// The layer state width selected by the `LAYER_STATE_*BIT` flags.
///
/// At most one selector may be defined.
pub(crate) fn layer_state_width(flags: &FlagSet) -> ConfigResult<Option<LayerStateWidth>> {
    let selectors = [
        (KnownFlag::LayerState8Bit, LayerStateWidth::Bits8),
        (KnownFlag::LayerState16Bit, LayerStateWidth::Bits16),
        (KnownFlag::LayerState32Bit, LayerStateWidth::Bits32),
    ];
    let mut selected: Option<(KnownFlag, LayerStateWidth)> = None;
    for (flag, width) in selectors {
        if !flags.contains(flag.name()) {
            continue;
        }
        if let Some((first, _)) = selected {
            return Err(ConfigError::Conflict {
                first: first.name().to_string(),
                second: flag.name().to_string(),
            });
        }
        selected = Some((flag, width));
    }
    Ok(selected.map(|(_, width)| width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::{IntLiteral, StrLiteral};

    #[test]
    fn test_valid_flags() {
        let flags = FlagSet::from_header(
            "#define RAW_USAGE_PAGE 0xFFFF\n#define USB_SUSPEND_WAKEUP_DELAY 200\n#define FIRMWARE_VERSION \"v1\"\n#define UNKNOWN -1\n",
        )
        .unwrap();
        assert!(validate_flags(&flags).is_ok());
    }

    #[test]
    fn test_usage_page_out_of_range() {
        let mut flags = FlagSet::new();
        flags
            .define_value("RAW_USAGE_PAGE", FlagValue::Integer(IntLiteral::hex(0x10000)))
            .unwrap();
        assert_eq!(
            validate_flags(&flags),
            Err(ConfigError::InvalidValue {
                field: "RAW_USAGE_PAGE".to_string(),
                value: "0x10000".to_string(),
                expected: "an integer between 0 and 0xFFFF".to_string(),
            })
        );
    }

    #[test]
    fn test_integer_flag_needs_literal() {
        let flags = FlagSet::from_header("#define USB_SUSPEND_WAKEUP_DELAY -1\n").unwrap();
        assert!(matches!(
            validate_flags(&flags),
            Err(ConfigError::InvalidValue { field, .. }) if field == "USB_SUSPEND_WAKEUP_DELAY"
        ));

        let flags = FlagSet::from_header("#define RAW_USAGE_ID\n").unwrap();
        assert!(validate_flags(&flags).is_err());
    }

    #[test]
    fn test_firmware_version_needs_string() {
        let mut flags = FlagSet::new();
        flags
            .define_value("FIRMWARE_VERSION", FlagValue::Integer(IntLiteral::decimal(3)))
            .unwrap();
        assert_eq!(
            validate_flags(&flags),
            Err(ConfigError::InvalidValue {
                field: "FIRMWARE_VERSION".to_string(),
                value: "3".to_string(),
                expected: "a string literal".to_string(),
            })
        );

        let mut flags = FlagSet::new();
        flags
            .define_value("FIRMWARE_VERSION", FlagValue::String(StrLiteral::new("")))
            .unwrap();
        assert!(validate_flags(&flags).is_ok());
    }

    #[test]
    fn test_presence_flag_with_value_is_accepted() {
        let flags = FlagSet::from_header("#define DOUBLE_REPORT 1\n").unwrap();
        assert!(validate_flags(&flags).is_ok());
    }

    #[test]
    fn test_layer_state_selectors_conflict() {
        let flags = FlagSet::from_header("#define LAYER_STATE_8BIT\n#define LAYER_STATE_16BIT\n").unwrap();
        assert_eq!(
            validate_flags(&flags),
            Err(ConfigError::Conflict {
                first: "LAYER_STATE_8BIT".to_string(),
                second: "LAYER_STATE_16BIT".to_string(),
            })
        );

        let flags = FlagSet::from_header("#define LAYER_STATE_16BIT\n").unwrap();
        assert_eq!(layer_state_width(&flags), Ok(Some(LayerStateWidth::Bits16)));
        assert_eq!(layer_state_width(&FlagSet::new()), Ok(None));
    }
}
