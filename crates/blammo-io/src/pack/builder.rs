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

use anyhow::{Context, Result};
use blammo_core::asset::AssetKey;
use blammo_core::vfs::{ArchiveIndex, PackEntry, DATA_FILE_NAME, INDEX_FILE_NAME};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

enum Source {
    Bytes(Vec<u8>),
    File(PathBuf),
}

/// Totals reported after an archive has been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackSummary {
    /// Number of entries written to the index.
    pub entries: usize,
    /// Size of the data file, in bytes.
    pub data_bytes: u64,
    /// Size of the index file, in bytes.
    pub index_bytes: u64,
}

/// Collects resources and writes them out as `index.bin` + `data.pack`.
///
/// Entries are written in key order, so the same inputs always produce the
/// same archive. Adding a key twice keeps the last source.
#[derive(Default)]
pub struct PackBuilder {
    sources: BTreeMap<AssetKey, Source>,
}

impl PackBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an in-memory resource under `key`.
    pub fn add(&mut self, key: impl Into<AssetKey>, bytes: impl Into<Vec<u8>>) -> &mut Self {
        self.sources.insert(key.into(), Source::Bytes(bytes.into()));
        self
    }

    /// Adds a file from disk under `key`. The file is read when the archive is written.
    pub fn add_file(&mut self, key: impl Into<AssetKey>, path: impl Into<PathBuf>) -> &mut Self {
        self.sources.insert(key.into(), Source::File(path.into()));
        self
    }

    /// Adds every file below `root`, keyed by its forward-slash path relative
    /// to `root`.
    pub fn add_dir(&mut self, root: impl AsRef<Path>) -> Result<&mut Self> {
        let root = root.as_ref();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("Failed to walk directory '{}'", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(root)
                .with_context(|| format!("'{}' escapes the packed root", entry.path().display()))?;
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_str().context("Invalid path encoding"))
                .collect::<Result<Vec<_>>>()?
                .join("/");
            self.add_file(key, entry.into_path());
        }
        Ok(self)
    }

    /// Number of resources collected so far.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns `true` if nothing has been added.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// The keys collected so far, in archive order.
    pub fn keys(&self) -> impl Iterator<Item = &AssetKey> {
        self.sources.keys()
    }

    /// Writes the archive into `dest_dir`, creating the directory if needed.
    pub fn write_to(&self, dest_dir: impl AsRef<Path>) -> Result<PackSummary> {
        let dest_dir = dest_dir.as_ref();
        fs::create_dir_all(dest_dir)
            .with_context(|| format!("Failed to create '{}'", dest_dir.display()))?;
        let index_path = dest_dir.join(INDEX_FILE_NAME);
        let data_path = dest_dir.join(DATA_FILE_NAME);

        let data_file = File::create(&data_path)
            .with_context(|| format!("Failed to create data pack at '{}'", data_path.display()))?;
        let mut data = BufWriter::new(data_file);

        let mut entries = Vec::with_capacity(self.sources.len());
        let mut offset = 0u64;
        for (key, source) in &self.sources {
            let bytes = match source {
                Source::Bytes(bytes) => std::borrow::Cow::Borrowed(bytes.as_slice()),
                Source::File(path) => std::borrow::Cow::Owned(
                    fs::read(path)
                        .with_context(|| format!("Failed to read asset file '{}'", path.display()))?,
                ),
            };
            data.write_all(&bytes)
                .with_context(|| format!("Failed to write '{key}' to the data pack"))?;
            let size = bytes.len() as u64;
            log::debug!("Packed '{}' at {} ({} bytes)", key, offset, size);
            entries.push(PackEntry {
                path: key.to_string(),
                offset,
                size,
            });
            offset += size;
        }
        data.flush().context("Failed to flush the data pack")?;

        let encoded = ArchiveIndex::encode_entries(&entries)
            .context("Failed to serialize the archive index")?;
        fs::write(&index_path, &encoded)
            .with_context(|| format!("Failed to write index file to '{}'", index_path.display()))?;

        Ok(PackSummary {
            entries: entries.len(),
            data_bytes: offset,
            index_bytes: encoded.len() as u64,
        })
    }
}
