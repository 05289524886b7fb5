pub mod common;

use std::io::Write;

use keymap_config::codegen::{constants_source, rustc_cfgs};
use keymap_config::{ConfigLoader, FlagSet, KeymapConfig, KeymapTomlConfig, KnownFlag, LayerStateWidth};

use crate::common::{FREEVOID_MAIN_HEADER, header_config, header_flags, toml_config};

const FREEVOID_MAIN_FLAGS: [&str; 9] = [
    "ORYX_CONFIGURATOR",
    "IGNORE_MOD_TAP_INTERRUPT",
    "USB_SUSPEND_WAKEUP_DELAY",
    "CAPS_LOCK_STATUS",
    "FIRMWARE_VERSION",
    "RAW_USAGE_PAGE",
    "RAW_USAGE_ID",
    "LAYER_STATE_8BIT",
    "DOUBLE_REPORT",
];

#[test]
fn test_freevoid_main_record() {
    let config = header_config();
    assert!(config.oryx_configurator);
    assert!(config.ignore_mod_tap_interrupt);
    assert_eq!(config.usb_suspend_wakeup_delay, Some(0));
    assert!(config.caps_lock_status);
    assert_eq!(config.firmware_version.as_deref(), Some("lzxz0/AZjZE"));
    assert_eq!(config.raw_usage_page, Some(0xFF60));
    assert_eq!(config.raw_usage_id, Some(0x61));
    assert_eq!(config.layer_state_width, Some(LayerStateWidth::Bits8));
    assert!(config.double_report);
    assert!(config.extra.is_empty());
}

#[test]
fn test_freevoid_main_names_are_unique() {
    let flags = header_flags();
    assert_eq!(flags.len(), FREEVOID_MAIN_FLAGS.len());
    for name in FREEVOID_MAIN_FLAGS {
        assert_eq!(flags.iter().filter(|f| f.name == name).count(), 1, "{name}");
        assert!(KnownFlag::from_name(name).is_some(), "{name}");
    }
}

#[test]
fn test_freevoid_main_header_round_trip() {
    let flags = header_flags();
    let emitted = flags.to_header();
    assert!(emitted.contains("#define RAW_USAGE_PAGE 0xFF60\n"));
    assert!(emitted.contains("#define RAW_USAGE_ID 0x61\n"));
    assert!(emitted.contains("#define FIRMWARE_VERSION u8\"lzxz0/AZjZE\"\n"));
    assert!(emitted.contains("#define USB_SUSPEND_WAKEUP_DELAY 0\n"));
    assert!(!emitted.contains("65376"));

    let reparsed = FlagSet::from_header(&emitted).unwrap();
    assert_eq!(reparsed, flags);

    // The typed record renders the same flags in the same order
    let config = header_config();
    assert_eq!(config.to_flag_set().unwrap(), flags);
    assert_eq!(KeymapConfig::from_header(&config.to_header().unwrap()).unwrap(), config);
}

#[test]
fn test_freevoid_main_toml_matches_header() {
    assert_eq!(toml_config(), header_config());

    let toml = KeymapTomlConfig::from(&header_config()).to_toml_string().unwrap();
    assert!(toml.contains("usage_page = \"0xFF60\""));
    let reparsed = KeymapTomlConfig::from_toml_str(&toml, "generated.toml")
        .unwrap()
        .to_keymap_config()
        .unwrap();
    assert_eq!(reparsed, header_config());
}

#[test]
fn test_omitted_delay_stays_absent() {
    let source: String = FREEVOID_MAIN_HEADER
        .lines()
        .filter(|line| !line.contains("USB_SUSPEND_WAKEUP_DELAY"))
        .map(|line| format!("{line}\n"))
        .collect();
    let config = KeymapConfig::from_header(&source).unwrap();
    assert_eq!(config.usb_suspend_wakeup_delay, None);
    assert_ne!(config.usb_suspend_wakeup_delay, Some(0));
    assert!(!config.to_header().unwrap().contains("USB_SUSPEND_WAKEUP_DELAY"));
}

#[test]
fn test_freevoid_main_codegen() {
    let config = header_config();
    let source = constants_source(&config);
    assert!(source.contains("Some(0xFF60)"));
    assert!(source.contains("Some(0)"));
    assert!(source.contains("Some(8)"));
    assert!(rustc_cfgs(&config).contains(&"layer_state_8bit"));
}

#[test]
fn test_loader_reads_both_formats() {
    let mut header = tempfile::Builder::new().suffix(".h").tempfile().unwrap();
    header.write_all(FREEVOID_MAIN_HEADER.as_bytes()).unwrap();
    let from_header = ConfigLoader::load(header.path()).unwrap();
    assert_eq!(from_header, header_config());

    let mut toml = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    toml.write_all(common::FREEVOID_MAIN_TOML.as_bytes()).unwrap();
    let from_toml = ConfigLoader::load_toml_with_env(toml.path(), Some(Default::default()))
        .unwrap()
        .to_keymap_config()
        .unwrap();
    assert_eq!(from_toml, from_header);
}
