//! Unpacking an Oryx source archive into the firmware tree

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::error::FetchError;

/// Length of the `<hash>_<revision>.zip` tail Oryx appends to archive names
const ARCHIVE_SUFFIX_LEN: usize = 15;

/// Last path segment of `url`
pub fn zip_basename(url: &str) -> Result<String, FetchError> {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|url| url.path_segments()?.next_back().map(str::to_string))
        .filter(|name| !name.is_empty())
        .ok_or_else(|| FetchError::InvalidZipUrl(url.to_string()))
}

/// Name of the directory holding the keymap sources inside the archive.
///
/// `zsa_ergodox_ez_m32u4_shine_lzxz0_AZjZE.zip` unpacks to `zsa_ergodox_ez_m32u4_shine_source`.
pub fn infer_source_directory(zip_basename: &str) -> String {
    let keep = zip_basename.chars().count().saturating_sub(ARCHIVE_SUFFIX_LEN);
    let stem: String = zip_basename.chars().take(keep).collect();
    format!("{stem}source")
}

/// `<firmware_root>/keyboards/<keyboard_folder>/keymaps/<keymap_folder>`
pub fn keymap_destination(firmware_root: &Path, keyboard_folder: &str, keymap_folder: &str) -> PathBuf {
    firmware_root
        .join("keyboards")
        .join(keyboard_folder)
        .join("keymaps")
        .join(keymap_folder)
}

pub fn extract_archive(zip_path: &Path, directory: &Path) -> Result<(), FetchError> {
    info!("Extracting {}", zip_path.display());
    let to_error = |source| FetchError::Extract {
        path: zip_path.to_path_buf(),
        source,
    };
    let file = fs::File::open(zip_path).map_err(FetchError::io(zip_path))?;
    ZipArchive::new(file).map_err(to_error)?.extract(directory).map_err(to_error)
}

/// Copy `source` over `destination` recursively, creating directories and overwriting
/// files. Files only present in `destination` are kept. Returns the number of files copied.
pub fn sync_directory(source: &Path, destination: &Path) -> Result<usize, FetchError> {
    info!("Syncing {} => {}", source.display(), destination.display());
    if !source.is_dir() {
        return Err(FetchError::MissingSource(source.to_path_buf()));
    }

    let mut copied = 0;
    for entry in WalkDir::new(source) {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = destination.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(FetchError::io(&target))?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(FetchError::io(parent))?;
            }
            fs::copy(entry.path(), &target).map_err(FetchError::io(&target))?;
            debug!("Copied {}", relative.display());
            copied += 1;
        }
    }
    Ok(copied)
}

/// Extract a downloaded archive into `workdir` and sync its source directory to `destination`
pub fn install_archive(zip_path: &Path, workdir: &Path, destination: &Path) -> Result<usize, FetchError> {
    extract_archive(zip_path, workdir)?;
    let basename = zip_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| FetchError::InvalidZipUrl(zip_path.display().to_string()))?;
    sync_directory(&workdir.join(infer_source_directory(basename)), destination)
}
