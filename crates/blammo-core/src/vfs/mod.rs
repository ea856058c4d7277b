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

//! Archive index module for fast, in-memory lookup of packed resources.
//!
//! This module provides the [`ArchiveIndex`] struct, which decodes the
//! `index.bin` file of a pack archive and answers "where in `data.pack` does
//! this key live" in O(1). It knows nothing about reading the data file
//! itself; that is the job of the I/O layer.

use crate::asset::AssetKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// File name of the archive index inside an archive directory.
pub const INDEX_FILE_NAME: &str = "index.bin";
/// File name of the archive data blob inside an archive directory.
pub const DATA_FILE_NAME: &str = "data.pack";

/// Location of one resource inside `data.pack`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackEntry {
    /// The resource key, a forward-slash path relative to the packed root.
    pub path: String,
    /// Byte offset of the resource inside the data file.
    pub offset: u64,
    /// Size of the resource, in bytes.
    pub size: u64,
}

impl PackEntry {
    /// One past the last byte of the entry.
    pub fn end(&self) -> u64 {
        self.offset.saturating_add(self.size)
    }
}

/// The runtime representation of the archive index (`index.bin`).
#[derive(Debug, Default)]
pub struct ArchiveIndex {
    entries: HashMap<AssetKey, PackEntry>,
}

impl ArchiveIndex {
    /// Decodes an index from the raw bytes of `index.bin`.
    ///
    /// # Errors
    /// Returns a `DecodeError` if the bytes are not a bincode-encoded list of
    /// [`PackEntry`].
    pub fn from_bytes(index_bytes: &[u8]) -> Result<Self, bincode::error::DecodeError> {
        let config = bincode::config::standard();
        let (entries, _): (Vec<PackEntry>, _) =
            bincode::serde::decode_from_slice(index_bytes, config)?;
        Ok(Self::from_entries(entries))
    }

    /// Builds an index from already decoded entries.
    pub fn from_entries(entries: impl IntoIterator<Item = PackEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (AssetKey::new(&entry.path), entry))
            .collect();
        Self { entries }
    }

    /// Encodes a list of entries the way `index.bin` stores them.
    pub fn encode_entries(
        entries: &[PackEntry],
    ) -> Result<Vec<u8>, bincode::error::EncodeError> {
        bincode::serde::encode_to_vec(entries, bincode::config::standard())
    }

    /// Retrieves the location of a resource.
    pub fn get(&self, key: &AssetKey) -> Option<&PackEntry> {
        self.entries.get(key)
    }

    /// Returns `true` if the archive holds the key.
    pub fn contains(&self, key: &AssetKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of resources in the archive.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` for an archive with no resources.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over every entry, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = &PackEntry> {
        self.entries.values()
    }
}
