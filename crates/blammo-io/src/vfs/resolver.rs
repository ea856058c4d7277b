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

use super::{OverrideDir, PackArchive};
use crate::config::ResourceConfig;
use blammo_core::asset::AssetKey;
use blammo_core::AssetError;

/// Turns asset keys into raw bytes.
///
/// When an override directory is configured it is consulted first and a hit
/// there wins; otherwise, or on a miss, the mounted archive is queried. Bytes
/// are never cached: every call reads again.
#[derive(Debug)]
pub struct ArchiveResolver {
    archive: PackArchive,
    overrides: Option<OverrideDir>,
    resource_root: String,
}

impl ArchiveResolver {
    /// Mounts the archive named by `config` and sets up the override lookup.
    ///
    /// # Errors
    /// Returns [`AssetError::Archive`] when the archive is missing or corrupt.
    pub fn open(config: &ResourceConfig) -> Result<Self, AssetError> {
        let archive = PackArchive::open(&config.archive_dir)
            .map_err(|e| AssetError::Archive(e.to_string()))?;
        let overrides = config.enable_override.then(|| {
            OverrideDir::new(
                &config.base_dir,
                &config.resource_root,
                &config.override_root,
            )
        });
        if let Some(overrides) = &overrides {
            log::info!(
                "Override lookups enabled under '{}'",
                overrides.base_dir().display()
            );
        }
        Ok(Self::from_parts(archive, overrides, &config.resource_root))
    }

    /// Assembles a resolver from an already mounted archive.
    pub fn from_parts(
        archive: PackArchive,
        overrides: Option<OverrideDir>,
        resource_root: impl Into<String>,
    ) -> Self {
        Self {
            archive,
            overrides,
            resource_root: resource_root.into(),
        }
    }

    /// Reads the bytes of a resource.
    ///
    /// # Errors
    /// [`AssetError::NotFound`] when neither source has the key, and
    /// [`AssetError::Io`] when the archive read fails.
    pub fn load_bytes(&self, key: &AssetKey) -> Result<Vec<u8>, AssetError> {
        if let Some(bytes) = self.overrides.as_ref().and_then(|o| o.read(key)) {
            return Ok(bytes);
        }
        match self.archive.read(key)? {
            Some(bytes) => Ok(bytes),
            None => Err(AssetError::NotFound(key.clone())),
        }
    }

    /// Reads a resource as UTF-8 text.
    ///
    /// # Errors
    /// As [`ArchiveResolver::load_bytes`], plus [`AssetError::Parse`] for
    /// invalid UTF-8.
    pub fn load_text(&self, key: &AssetKey) -> Result<String, AssetError> {
        let bytes = self.load_bytes(key)?;
        String::from_utf8(bytes).map_err(|e| AssetError::parse(key, e))
    }

    /// Returns `true` if either source holds the key.
    pub fn exists(&self, key: &AssetKey) -> bool {
        self.overrides.as_ref().is_some_and(|o| o.contains(key)) || self.archive.contains(key)
    }

    /// The path segment naming the packaged resource tree.
    pub fn resource_root(&self) -> &str {
        &self.resource_root
    }

    /// The mounted archive.
    pub fn archive(&self) -> &PackArchive {
        &self.archive
    }
}
