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

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A normalized, case-sensitive path naming one logical resource.
///
/// Keys always use forward slashes, never start or end with a separator and
/// contain no `.` or `..` segments, so `resources\\meshes/./block.obj` and
/// `resources/meshes/block.obj` name the same resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AssetKey(String);

impl AssetKey {
    /// Creates a key from any path-like string, normalizing it.
    pub fn new(path: impl AsRef<str>) -> Self {
        let mut segments: Vec<&str> = Vec::new();
        let unified = path.as_ref().replace('\\', "/");
        for segment in unified.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }
        Self(segments.join("/"))
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty key, which never names a resource.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the key's segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Returns the first segment of the key, if any.
    pub fn first_segment(&self) -> Option<&str> {
        self.segments().next()
    }

    /// Returns the file name (last segment).
    pub fn file_name(&self) -> Option<&str> {
        self.0.rsplit('/').next().filter(|s| !s.is_empty())
    }

    /// Returns the lowercase extension of the file name, if any.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// Returns the key of the directory containing this key.
    pub fn parent(&self) -> AssetKey {
        match self.0.rsplit_once('/') {
            Some((parent, _)) => AssetKey(parent.to_string()),
            None => AssetKey(String::new()),
        }
    }

    /// Joins a relative reference onto this key, treating this key as a directory.
    pub fn join(&self, relative: impl AsRef<str>) -> AssetKey {
        if self.0.is_empty() {
            return AssetKey::new(relative);
        }
        AssetKey::new(format!("{}/{}", self.0, relative.as_ref()))
    }

    /// Resolves a reference found inside the file named by this key.
    ///
    /// References that already start with `root` (the resource root segment)
    /// are taken as-is; everything else is relative to this key's directory.
    pub fn resolve_reference(&self, reference: &str, root: &str) -> AssetKey {
        let candidate = AssetKey::new(reference);
        if candidate.first_segment() == Some(root) {
            candidate
        } else {
            self.parent().join(reference)
        }
    }

    /// Replaces the first segment equal to `from` with `to`.
    ///
    /// Returns `None` when no segment matches.
    pub fn replace_segment(&self, from: &str, to: &str) -> Option<AssetKey> {
        let mut replaced = false;
        let segments: Vec<&str> = self
            .segments()
            .map(|segment| {
                if !replaced && segment == from {
                    replaced = true;
                    to
                } else {
                    segment
                }
            })
            .collect();
        replaced.then(|| AssetKey::new(segments.join("/")))
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetKey {
    fn from(path: &str) -> Self {
        AssetKey::new(path)
    }
}

impl From<String> for AssetKey {
    fn from(path: String) -> Self {
        AssetKey::new(path)
    }
}

impl From<&String> for AssetKey {
    fn from(path: &String) -> Self {
        AssetKey::new(path)
    }
}

impl From<&AssetKey> for AssetKey {
    fn from(key: &AssetKey) -> Self {
        key.clone()
    }
}

impl From<AssetKey> for String {
    fn from(key: AssetKey) -> Self {
        key.0
    }
}

impl AsRef<str> for AssetKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for AssetKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}
