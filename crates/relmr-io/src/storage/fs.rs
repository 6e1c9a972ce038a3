use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;

const PART_PREFIX: &str = "part-r-";

/// Remove whatever a previous run left at `dir` and create it empty.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        debug!(dir = %dir.display(), "clearing previous output");
        if dir.is_dir() {
            fs::remove_dir_all(dir)?;
        } else {
            fs::remove_file(dir)?;
        }
    }
    fs::create_dir_all(dir)?;
    Ok(())
}

/// All `part-r-*` files directly under `dir`, sorted by name.
pub fn list_part_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut parts = Vec::new();
    if !dir.is_dir() {
        return Ok(parts);
    }
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_part = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(PART_PREFIX));
        if is_part && path.is_file() {
            parts.push(path);
        }
    }
    parts.sort();
    Ok(parts)
}
