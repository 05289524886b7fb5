//! Centralized default values and limits for keymap configuration
//!
//! Defaults listed here are the ones the firmware framework falls back to when a
//! flag is not defined. They are never written into a [`crate::KeymapConfig`];
//! an absent flag stays absent.

// ============================================================================
// Raw HID Defaults
// ============================================================================

/// Usage page advertised by the raw HID interface when `RAW_USAGE_PAGE` is unset
pub const RAW_USAGE_PAGE: u16 = 0xFF60;

/// Usage id advertised by the raw HID interface when `RAW_USAGE_ID` is unset
pub const RAW_USAGE_ID: u16 = 0x61;

// ============================================================================
// Layer State Defaults
// ============================================================================

/// Layer state width in bits when no `LAYER_STATE_*BIT` selector is defined
pub const LAYER_STATE_BITS: u8 = 32;

/// Bit widths accepted by the layer state selector
pub const SUPPORTED_LAYER_STATE_BITS: [u8; 3] = [8, 16, 32];

// ============================================================================
// Loader Defaults
// ============================================================================

/// Prefix of environment variables that override `keymap.toml` values
pub const ENV_PREFIX: &str = "KEYMAP_OVERRIDE";

/// Separator between the prefix and the key of an override environment variable
pub const ENV_PREFIX_SEPARATOR: &str = "_";

/// Separator between nested keys in override environment variables
pub const ENV_SEPARATOR: &str = "__";

// ============================================================================
// Validation Limits
// ============================================================================

/// Maximum value of a raw HID usage page or usage id
pub const RAW_USAGE_MAX: u64 = u16::MAX as u64;

/// Maximum USB suspend wakeup delay in milliseconds
pub const USB_SUSPEND_WAKEUP_DELAY_MAX: u64 = u32::MAX as u64;
