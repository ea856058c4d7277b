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
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// A loose-file directory that shadows the archive during development.
///
/// The override tree mirrors the archive with the resource root renamed:
/// with the defaults, `resources/meshes/block.obj` is looked up as
/// `<base_dir>/mod/meshes/block.obj`.
#[derive(Debug, Clone)]
pub struct OverrideDir {
    base_dir: PathBuf,
    resource_root: String,
    override_root: String,
}

impl OverrideDir {
    /// Creates an override lookup under `base_dir`.
    pub fn new(
        base_dir: impl Into<PathBuf>,
        resource_root: impl Into<String>,
        override_root: impl Into<String>,
    ) -> Self {
        Self {
            base_dir: base_dir.into(),
            resource_root: resource_root.into(),
            override_root: override_root.into(),
        }
    }

    /// The directory override paths are resolved under.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The file that would override `key`, or `None` when the key has no
    /// resource root segment to rename.
    pub fn path_for(&self, key: &AssetKey) -> Option<PathBuf> {
        let renamed = key.replace_segment(&self.resource_root, &self.override_root)?;
        let mut path = self.base_dir.clone();
        path.extend(renamed.segments());
        Some(path)
    }

    /// Reads the override file for `key`, if one exists.
    pub fn read(&self, key: &AssetKey) -> Option<Vec<u8>> {
        let path = self.path_for(key)?;
        match std::fs::read(&path) {
            Ok(bytes) => {
                log::debug!("'{}' served from override '{}'", key, path.display());
                Some(bytes)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Ignoring unreadable override '{}': {}", path.display(), e);
                None
            }
        }
    }

    /// Returns `true` if an override file exists for `key`.
    pub fn contains(&self, key: &AssetKey) -> bool {
        self.path_for(key).is_some_and(|path| path.is_file())
    }
}
