//! Compile-time view of the keymap's `config.h`.
//!
//! `build.rs` loads the keymap config (the bundled `freevoid_main/config.h` unless
//! `KEYMAP_CONFIG_PATH` says otherwise), generates `constants.rs` from it and enables a
//! `rustc-cfg` for every presence flag, so firmware code can either read [`CONFIG`] or
//! compile parts out with `#[cfg(double_report)]` and friends.

#![cfg_attr(not(test), no_std)]

mod constants {
    include!(concat!(env!("OUT_DIR"), "/constants.rs"));
}

/// Raw HID usage page used when `RAW_USAGE_PAGE` is not defined
pub const DEFAULT_RAW_USAGE_PAGE: u16 = constants::DEFAULT_RAW_USAGE_PAGE;
/// Raw HID usage id used when `RAW_USAGE_ID` is not defined
pub const DEFAULT_RAW_USAGE_ID: u16 = constants::DEFAULT_RAW_USAGE_ID;
/// Layer state width used when no `LAYER_STATE_*BIT` is defined
pub const DEFAULT_LAYER_STATE_BITS: u8 = constants::DEFAULT_LAYER_STATE_BITS;

/// Bitmask of active layers, sized by the layer state selector
#[cfg(layer_state_8bit)]
pub type LayerState = u8;
#[cfg(layer_state_16bit)]
pub type LayerState = u16;
#[cfg(not(any(layer_state_8bit, layer_state_16bit)))]
pub type LayerState = u32;

/// Keymap flags as seen by the firmware
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareConfig {
    pub oryx_configurator: bool,
    pub ignore_mod_tap_interrupt: bool,
    /// Milliseconds, `None` when the framework default applies
    pub usb_suspend_wakeup_delay: Option<u32>,
    pub caps_lock_status: bool,
    pub firmware_version: Option<&'static str>,
    pub raw_usage_page: Option<u16>,
    pub raw_usage_id: Option<u16>,
    pub layer_state_bits: Option<u8>,
    pub double_report: bool,
}

/// The config this crate was built with
pub const CONFIG: FirmwareConfig = FirmwareConfig {
    oryx_configurator: constants::ORYX_CONFIGURATOR,
    ignore_mod_tap_interrupt: constants::IGNORE_MOD_TAP_INTERRUPT,
    usb_suspend_wakeup_delay: constants::USB_SUSPEND_WAKEUP_DELAY,
    caps_lock_status: constants::CAPS_LOCK_STATUS,
    firmware_version: constants::FIRMWARE_VERSION,
    raw_usage_page: constants::RAW_USAGE_PAGE,
    raw_usage_id: constants::RAW_USAGE_ID,
    layer_state_bits: constants::LAYER_STATE_BITS,
    double_report: constants::DOUBLE_REPORT,
};

impl FirmwareConfig {
    /// How many times each key report is sent
    pub const fn report_copies(&self) -> u8 {
        if self.double_report { 2 } else { 1 }
    }

    /// Raw HID usage page and id, falling back to the framework defaults
    pub const fn raw_hid_usage(&self) -> (u16, u16) {
        let page = match self.raw_usage_page {
            Some(page) => page,
            None => DEFAULT_RAW_USAGE_PAGE,
        };
        let id = match self.raw_usage_id {
            Some(id) => id,
            None => DEFAULT_RAW_USAGE_ID,
        };
        (page, id)
    }

    pub const fn layer_state_bits(&self) -> u8 {
        match self.layer_state_bits {
            Some(bits) => bits,
            None => DEFAULT_LAYER_STATE_BITS,
        }
    }

    /// One layer per bit of the layer state
    pub const fn max_layers(&self) -> u8 {
        self.layer_state_bits()
    }

    /// Delay before reports resume after USB wakeup, no delay when unset
    pub const fn usb_wakeup_delay_ms(&self) -> u32 {
        match self.usb_suspend_wakeup_delay {
            Some(delay) => delay,
            None => 0,
        }
    }
}
