use std::path::{Path, PathBuf};
use std::{env, fs};

use keymap_config::ConfigLoader;
use keymap_config::codegen::{ALL_CFGS, constants_source, rustc_cfgs};

const DEFAULT_CONFIG_PATH: &str = "../keyboards/ergodox_ez/shine/keymaps/freevoid_main/config.h";

fn main() {
    // Ensure build.rs is re-run when files change
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=KEYMAP_CONFIG_PATH");

    // Keymap config selected by the user, the bundled freevoid_main one otherwise
    let config_path = match env::var("KEYMAP_CONFIG_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => Path::new(&env::var("CARGO_MANIFEST_DIR").unwrap()).join(DEFAULT_CONFIG_PATH),
    };
    println!("cargo:rerun-if-changed={}", config_path.display());

    let config = ConfigLoader::load(&config_path)
        .unwrap_or_else(|e| panic!("Failed to load keymap config {}: {}", config_path.display(), e));

    for cfg in ALL_CFGS {
        println!("cargo:rustc-check-cfg=cfg({cfg})");
    }
    for cfg in rustc_cfgs(&config) {
        println!("cargo:rustc-cfg={cfg}");
    }

    // Write to constants.rs file
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("constants.rs");
    fs::write(&dest_path, constants_source(&config)).expect("Failed to write constants.rs file");
}
