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

//! Configuration of the resource manager.

use anyhow::{Context, Result};
use blammo_core::asset::AssetKey;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where resources come from and how they are looked up.
///
/// Every field has a default, so a RON file only needs to name the fields it
/// changes:
///
/// ```ron
/// (
///     archive_dir: "dist/assets",
///     enable_override: true,
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Directory holding `index.bin` and `data.pack`.
    pub archive_dir: PathBuf,
    /// Directory the override root is resolved under, usually the executable's.
    pub base_dir: PathBuf,
    /// Path segment naming the packaged resource tree.
    pub resource_root: String,
    /// Path segment that replaces `resource_root` in override lookups.
    pub override_root: String,
    /// Whether loose files under the override root take precedence over the archive.
    pub enable_override: bool,
    /// Effect used by materials that do not name one.
    pub default_effect: AssetKey,
    /// One-pixel-tall gradient used as the cel-shading step function.
    pub cel_gradient: AssetKey,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            archive_dir: PathBuf::from("assets"),
            base_dir: default_base_dir(),
            resource_root: "resources".to_string(),
            override_root: "mod".to_string(),
            enable_override: cfg!(debug_assertions),
            default_effect: AssetKey::new("resources/effects/default.fx"),
            cel_gradient: AssetKey::new("resources/textures/cel_gradient.png"),
        }
    }
}

fn default_base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl ResourceConfig {
    /// Creates a configuration for an archive directory and a base directory,
    /// keeping every other default.
    pub fn new(archive_dir: impl Into<PathBuf>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            archive_dir: archive_dir.into(),
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Sets whether the override directory is consulted.
    pub fn with_override(mut self, enabled: bool) -> Self {
        self.enable_override = enabled;
        self
    }

    /// Sets the effect used by materials that do not name one.
    pub fn with_default_effect(mut self, key: impl Into<AssetKey>) -> Self {
        self.default_effect = key.into();
        self
    }

    /// Sets the texture used as the cel-shading step function.
    pub fn with_cel_gradient(mut self, key: impl Into<AssetKey>) -> Self {
        self.cel_gradient = key.into();
        self
    }

    /// Parses a configuration from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self> {
        ron::from_str(text).context("Failed to parse resource configuration")
    }

    /// Loads a configuration from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration '{}'", path.display()))?;
        ron::from_str(&text)
            .with_context(|| format!("Failed to parse configuration '{}'", path.display()))
    }
}
