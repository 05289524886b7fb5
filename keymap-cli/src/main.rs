mod commands;
mod error;
mod oryx;
mod sync;
#[cfg(test)]
mod test_server;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use crate::commands::{FetchOptions, OutputFormat};

#[derive(Parser)]
#[command(name = "keymap", version, about = "Check, convert and fetch keymap configs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and validate a config.h or keymap.toml
    Check {
        path: PathBuf,
    },
    /// Convert a config.h or keymap.toml to another format
    Convert {
        path: PathBuf,
        #[arg(long, value_enum)]
        format: OutputFormat,
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Download the latest revision of an Oryx layout into the firmware tree
    Fetch(FetchArgs),
}

#[derive(Args)]
struct FetchArgs {
    /// Layout hash id
    #[arg(long)]
    hash_id: String,
    /// Path within keyboards/ up to the keymaps parent, e.g. ergodox_ez/shine
    #[arg(long)]
    keyboard_folder: String,
    /// Name of the keymap folder
    #[arg(long)]
    keymap_folder: String,
    #[arg(long, default_value = oryx::DEFAULT_GEOMETRY)]
    geometry: String,
    /// Root of the firmware tree holding keyboards/
    #[arg(long, default_value = ".")]
    firmware_root: PathBuf,
    #[arg(long, default_value = oryx::ORYX_ENDPOINT)]
    endpoint: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Check { path } => {
            println!("{}", commands::check(&path)?);
        }
        Command::Convert { path, format, output } => {
            let rendered = commands::convert(&path, format)?;
            match output {
                Some(output) => std::fs::write(&output, rendered)
                    .with_context(|| format!("failed to write {}", output.display()))?,
                None => print!("{rendered}"),
            }
        }
        Command::Fetch(args) => {
            let destination = commands::fetch(FetchOptions {
                hash_id: args.hash_id,
                geometry: args.geometry,
                keyboard_folder: args.keyboard_folder,
                keymap_folder: args.keymap_folder,
                firmware_root: args.firmware_root,
                endpoint: args.endpoint,
            })
            .await?;
            println!("Synced layout into {}", destination.display());
        }
    }

    Ok(())
}
