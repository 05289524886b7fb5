//! Rust code generation for the firmware crate's build script
//!
//! The build script turns a [`KeymapConfig`] into a `constants.rs` that is
//! `include!`d by the firmware, plus a set of `rustc-cfg` names for code that must be
//! compiled out when a flag is not set.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{LitInt, LitStr};

use crate::defaults;
use crate::keymap_config::{KeymapConfig, LayerStateWidth};

/// Every cfg name [`rustc_cfgs`] can emit, for `rustc-check-cfg`
pub const ALL_CFGS: [&str; 7] = [
    "oryx_configurator",
    "ignore_mod_tap_interrupt",
    "caps_lock_status",
    "double_report",
    "layer_state_8bit",
    "layer_state_16bit",
    "layer_state_32bit",
];

/// cfg names enabled by this config
pub fn rustc_cfgs(config: &KeymapConfig) -> Vec<&'static str> {
    let mut cfgs = Vec::new();
    if config.oryx_configurator {
        cfgs.push("oryx_configurator");
    }
    if config.ignore_mod_tap_interrupt {
        cfgs.push("ignore_mod_tap_interrupt");
    }
    if config.caps_lock_status {
        cfgs.push("caps_lock_status");
    }
    if config.double_report {
        cfgs.push("double_report");
    }
    match config.layer_state_width {
        Some(LayerStateWidth::Bits8) => cfgs.push("layer_state_8bit"),
        Some(LayerStateWidth::Bits16) => cfgs.push("layer_state_16bit"),
        Some(LayerStateWidth::Bits32) => cfgs.push("layer_state_32bit"),
        None => {}
    }
    cfgs
}

/// Pretty-printed `constants.rs` source
pub fn constants_source(config: &KeymapConfig) -> String {
    let tokens = constants_tokens(config);
    let file: syn::File = syn::parse_quote!(#tokens);
    format!(
        "// Generated by keymap-config from the keymap configuration, do not edit.\n\n{}",
        prettyplease::unparse(&file)
    )
}

/// `pub(crate) const` items for every keymap flag.
///
/// Presence flags become `bool`s, scalars become `Option`s so an unset flag stays
/// distinguishable from a zero. Usage page and id are emitted as hex literals. The
/// framework defaults for unset scalars are emitted alongside as `DEFAULT_*`.
pub fn constants_tokens(config: &KeymapConfig) -> TokenStream {
    let oryx_configurator = config.oryx_configurator;
    let ignore_mod_tap_interrupt = config.ignore_mod_tap_interrupt;
    let caps_lock_status = config.caps_lock_status;
    let double_report = config.double_report;

    let usb_suspend_wakeup_delay = option_tokens(
        config
            .usb_suspend_wakeup_delay
            .map(|delay| int_literal(&delay.to_string())),
    );
    let firmware_version = option_tokens(
        config
            .firmware_version
            .as_ref()
            .map(|version| LitStr::new(version, Span::call_site())),
    );
    let raw_usage_page = option_tokens(config.raw_usage_page.map(|page| int_literal(&format!("{page:#X}"))));
    let raw_usage_id = option_tokens(config.raw_usage_id.map(|id| int_literal(&format!("{id:#X}"))));
    let layer_state_bits = option_tokens(
        config
            .layer_state_width
            .map(|width| int_literal(&width.bits().to_string())),
    );

    let default_raw_usage_page = int_literal(&format!("{:#X}", defaults::RAW_USAGE_PAGE));
    let default_raw_usage_id = int_literal(&format!("{:#X}", defaults::RAW_USAGE_ID));
    let default_layer_state_bits = int_literal(&defaults::LAYER_STATE_BITS.to_string());

    quote! {
        /// Build with the Oryx configurator conventions
        pub(crate) const ORYX_CONFIGURATOR: bool = #oryx_configurator;
        /// Don't decide mod-tap keys early on interrupt
        pub(crate) const IGNORE_MOD_TAP_INTERRUPT: bool = #ignore_mod_tap_interrupt;
        /// Delay in ms before reporting after USB wakeup
        pub(crate) const USB_SUSPEND_WAKEUP_DELAY: Option<u32> = #usb_suspend_wakeup_delay;
        /// Report caps lock state to the indicators
        pub(crate) const CAPS_LOCK_STATUS: bool = #caps_lock_status;
        /// Opaque firmware version
        pub(crate) const FIRMWARE_VERSION: Option<&str> = #firmware_version;
        /// Raw HID usage page
        pub(crate) const RAW_USAGE_PAGE: Option<u16> = #raw_usage_page;
        /// Raw HID usage id
        pub(crate) const RAW_USAGE_ID: Option<u16> = #raw_usage_id;
        /// Layer state width in bits
        pub(crate) const LAYER_STATE_BITS: Option<u8> = #layer_state_bits;
        /// Send every key report twice
        pub(crate) const DOUBLE_REPORT: bool = #double_report;

        /// Raw HID usage page used when `RAW_USAGE_PAGE` is not defined
        pub(crate) const DEFAULT_RAW_USAGE_PAGE: u16 = #default_raw_usage_page;
        /// Raw HID usage id used when `RAW_USAGE_ID` is not defined
        pub(crate) const DEFAULT_RAW_USAGE_ID: u16 = #default_raw_usage_id;
        /// Layer state width used when no `LAYER_STATE_*BIT` is defined
        pub(crate) const DEFAULT_LAYER_STATE_BITS: u8 = #default_layer_state_bits;
    }
}

fn int_literal(repr: &str) -> LitInt {
    LitInt::new(repr, Span::call_site())
}

fn option_tokens<T: quote::ToTokens>(value: Option<T>) -> TokenStream {
    match value {
        Some(v) => quote! { Some(#v) },
        None => quote! { None },
    }
}
