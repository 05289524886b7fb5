use keymap_config::{FlagSet, KeymapConfig, KeymapTomlConfig};

pub const FREEVOID_MAIN_HEADER: &str =
    include_str!("../../../keyboards/ergodox_ez/shine/keymaps/freevoid_main/config.h");
pub const FREEVOID_MAIN_TOML: &str =
    include_str!("../../../keyboards/ergodox_ez/shine/keymaps/freevoid_main/keymap.toml");

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub fn header_flags() -> FlagSet {
    FlagSet::from_header(FREEVOID_MAIN_HEADER).unwrap()
}

pub fn header_config() -> KeymapConfig {
    KeymapConfig::from_header(FREEVOID_MAIN_HEADER).unwrap()
}

pub fn toml_config() -> KeymapConfig {
    KeymapTomlConfig::from_toml_str(FREEVOID_MAIN_TOML, "keymap.toml")
        .unwrap()
        .to_keymap_config()
        .unwrap()
}
