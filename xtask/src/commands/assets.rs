// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::commands::assets_config::AssetManifest;
use crate::helpers::*;
use anyhow::{Context, Result};
use blammo_io::{PackArchive, PackBuilder};
use std::fs;
use std::path::{Path, PathBuf};

/// Packs every source directory named by the manifest into one archive.
pub fn pack(manifest_path: &Path, out: Option<PathBuf>) -> Result<()> {
    print_task_start("Packing Assets", ROCKET, MAGENTA);

    let manifest = load_manifest(manifest_path)?;
    let dest_dir = out.unwrap_or(manifest.output_directory);

    let mut builder = PackBuilder::new();
    for dir in &manifest.source_directories {
        if !dir.is_dir() {
            log::warn!("Skipping missing source directory '{}'", dir.display());
            continue;
        }
        let before = builder.len();
        builder.add_dir(dir)?;
        log::info!(
            "Collected {} files from '{}'",
            builder.len() - before,
            dir.display()
        );
    }

    if builder.is_empty() {
        print_error("No asset files found. Nothing to pack.");
        return Ok(());
    }

    println!("{}📦 Packing {} assets...{}", BOLD, builder.len(), RESET);
    let summary = builder.write_to(&dest_dir)?;

    println!(
        "{}{} {} Wrote {} index entries to '{}' ({:.2} KB){}",
        BOLD,
        GREEN,
        CHECK,
        summary.entries,
        dest_dir.display(),
        summary.index_bytes as f64 / 1024.0,
        RESET
    );
    println!(
        "{}{} {} Wrote asset data ({:.2} MB){}",
        BOLD,
        GREEN,
        CHECK,
        summary.data_bytes as f64 / (1024.0 * 1024.0),
        RESET
    );
    print_success("Asset pipeline finished successfully.");
    Ok(())
}

/// Prints every entry of the archive in `dir`.
pub fn list(dir: &Path) -> Result<()> {
    let archive = PackArchive::open(dir)
        .with_context(|| format!("Failed to open archive in '{}'", dir.display()))?;
    let mut total = 0u64;
    for entry in archive.index().entries() {
        println!("{:>10}  {:>10}  {}", entry.offset, entry.size, entry.path);
        total += entry.size;
    }
    println!(
        "{}{} entries, {} bytes{}",
        BOLD,
        archive.index().len(),
        total,
        RESET
    );
    Ok(())
}

/// Loads the manifest, or the default configuration if the file does not exist.
fn load_manifest(path: &Path) -> Result<AssetManifest> {
    if !path.exists() {
        log::info!("No '{}' found. Using default configuration.", path.display());
        return Ok(AssetManifest::default());
    }
    log::info!("Found '{}'. Loading configuration.", path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest file at '{}'", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Failed to parse TOML from '{}'", path.display()))
}
