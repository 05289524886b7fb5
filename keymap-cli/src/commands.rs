use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use keymap_config::codegen::constants_source;
use keymap_config::{ConfigFormat, ConfigLoader, KeymapConfig, KeymapTomlConfig};
use log::info;

use crate::error::FetchError;
use crate::oryx::OryxClient;
use crate::sync::{install_archive, keymap_destination};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `config.h`
    Header,
    /// `keymap.toml`
    Toml,
    /// Rust constants, as generated for the firmware crate
    Rust,
}

/// Load a keymap config and describe it
pub fn check(path: &Path) -> Result<String> {
    let context = || format!("invalid keymap config {}", path.display());
    let config = match ConfigFormat::from_path(path).with_context(context)? {
        ConfigFormat::Header => {
            let flags = ConfigLoader::load_header(path).with_context(context)?;
            info!("{} defines {} flags", path.display(), flags.len());
            KeymapConfig::try_from(&flags).with_context(context)?
        }
        ConfigFormat::Toml => ConfigLoader::load(path).with_context(context)?,
    };
    Ok(summary(&config))
}

/// Load a keymap config and render it in `format`
pub fn convert(path: &Path, format: OutputFormat) -> Result<String> {
    let config = ConfigLoader::load(path).with_context(|| format!("invalid keymap config {}", path.display()))?;
    render(&config, format)
}

pub fn render(config: &KeymapConfig, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Header => config.to_header()?,
        OutputFormat::Toml => KeymapTomlConfig::from(config).to_toml_string()?,
        OutputFormat::Rust => constants_source(config),
    })
}

pub fn summary(config: &KeymapConfig) -> String {
    let (usage_page, usage_id) = config.raw_hid_usage();
    let mut lines = vec![
        format!("oryx configurator:        {}", config.oryx_configurator),
        format!("ignore mod-tap interrupt: {}", config.ignore_mod_tap_interrupt),
        format!(
            "usb wakeup delay:         {}",
            config
                .usb_suspend_wakeup_delay
                .map(|d| format!("{d} ms"))
                .unwrap_or_else(|| "unset".to_string())
        ),
        format!("caps lock status:         {}", config.caps_lock_status),
        format!(
            "firmware version:         {}",
            config.firmware_version.as_deref().unwrap_or("unset")
        ),
        format!("raw hid usage:            {usage_page:#X}/{usage_id:#X}"),
        format!("layer state bits:         {}", config.layer_state_bits()),
        format!("double report:            {}", config.double_report),
    ];
    if !config.extra.is_empty() {
        let names: Vec<&str> = config.extra.iter().map(|f| f.name.as_str()).collect();
        lines.push(format!("other flags:              {}", names.join(", ")));
    }
    lines.join("\n")
}

pub struct FetchOptions {
    pub hash_id: String,
    pub geometry: String,
    pub keyboard_folder: String,
    pub keymap_folder: String,
    pub firmware_root: PathBuf,
    pub endpoint: String,
}

/// Fetch the latest revision of an Oryx layout into the firmware tree
pub async fn fetch(options: FetchOptions) -> Result<PathBuf> {
    let client = OryxClient::new(options.endpoint.as_str());
    let layout = client.layout(&options.hash_id, &options.geometry).await?;
    let zip_url = layout
        .zip_url()
        .ok_or_else(|| FetchError::MissingZipUrl(options.hash_id.clone()))?;
    if let Some(revision) = &layout.revision {
        info!(
            "Layout {} revision {} (QMK {})",
            layout.title.as_deref().unwrap_or(&options.hash_id),
            revision.hash_id,
            revision.qmk_version.as_deref().unwrap_or("unknown")
        );
    }

    let workdir = tempfile::tempdir().context("failed to create a temporary directory")?;
    let zip_path = client.download(zip_url, workdir.path()).await?;
    let destination = keymap_destination(&options.firmware_root, &options.keyboard_folder, &options.keymap_folder);

    let target = destination.clone();
    let copied = tokio::task::spawn_blocking(move || install_archive(&zip_path, workdir.path(), &target)).await??;
    info!("Copied {} files to {}", copied, destination.display());

    let config_path = destination.join("config.h");
    if config_path.is_file() {
        let config = ConfigLoader::load(&config_path)?;
        info!("{}:\n{}", config_path.display(), summary(&config));
    }
    Ok(destination)
}
