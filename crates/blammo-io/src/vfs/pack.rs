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

use blammo_core::asset::AssetKey;
use blammo_core::vfs::{ArchiveIndex, DATA_FILE_NAME, INDEX_FILE_NAME};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while mounting a pack archive.
#[derive(Debug, Error)]
pub enum PackError {
    /// A file of the archive could not be opened.
    #[error("failed to open '{path}': {source}")]
    Open {
        /// The file that could not be opened.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// `index.bin` is not a valid index.
    #[error("corrupt archive index '{path}': {source}")]
    CorruptIndex {
        /// The index file.
        path: PathBuf,
        /// The decode failure.
        #[source]
        source: bincode::error::DecodeError,
    },
    /// An index entry points past the end of `data.pack`.
    #[error("entry '{key}' ends at byte {end} but the data file holds {len} bytes")]
    EntryOutOfBounds {
        /// The offending entry.
        key: String,
        /// One past the entry's last byte.
        end: u64,
        /// Size of the data file.
        len: u64,
    },
}

/// A mounted pack archive: a decoded index and one open data file handle.
#[derive(Debug)]
pub struct PackArchive {
    index: ArchiveIndex,
    data: File,
    dir: PathBuf,
}

impl PackArchive {
    /// Mounts the archive stored in `dir`.
    ///
    /// The index is decoded and checked against the size of the data file, so
    /// a mounted archive never reads out of bounds.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, PackError> {
        let dir = dir.as_ref();
        let index_path = dir.join(INDEX_FILE_NAME);
        let data_path = dir.join(DATA_FILE_NAME);

        let index_bytes = std::fs::read(&index_path).map_err(|source| PackError::Open {
            path: index_path.clone(),
            source,
        })?;
        let index = ArchiveIndex::from_bytes(&index_bytes).map_err(|source| {
            PackError::CorruptIndex {
                path: index_path.clone(),
                source,
            }
        })?;

        let data = File::open(&data_path).map_err(|source| PackError::Open {
            path: data_path.clone(),
            source,
        })?;
        let len = data
            .metadata()
            .map_err(|source| PackError::Open {
                path: data_path.clone(),
                source,
            })?
            .len();
        if let Some(entry) = index.entries().find(|entry| entry.end() > len) {
            return Err(PackError::EntryOutOfBounds {
                key: entry.path.clone(),
                end: entry.end(),
                len,
            });
        }

        log::info!(
            "Mounted archive '{}' with {} entries",
            dir.display(),
            index.len()
        );
        Ok(Self {
            index,
            data,
            dir: dir.to_path_buf(),
        })
    }

    /// Reads the bytes of a resource, or `None` if the archive lacks the key.
    pub fn read(&self, key: &AssetKey) -> std::io::Result<Option<Vec<u8>>> {
        let Some(entry) = self.index.get(key) else {
            return Ok(None);
        };
        let mut buffer = vec![0; entry.size as usize];
        let mut file = &self.data;
        file.seek(SeekFrom::Start(entry.offset))?;
        file.read_exact(&mut buffer)?;
        Ok(Some(buffer))
    }

    /// Returns `true` if the archive holds the key.
    pub fn contains(&self, key: &AssetKey) -> bool {
        self.index.contains(key)
    }

    /// The decoded index.
    pub fn index(&self) -> &ArchiveIndex {
        &self.index
    }

    /// The directory the archive was mounted from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
