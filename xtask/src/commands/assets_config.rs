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

use serde::Deserialize;
use std::path::PathBuf;

/// Represents the structure of the `Assets.toml` manifest file.
///
/// ```toml
/// source_directories = ["content"]
/// output_directory = ".dist/assets"
/// ```
///
/// Each source directory is packed with keys relative to it, so a file at
/// `content/resources/meshes/robot.obj` is stored as `resources/meshes/robot.obj`.
/// Later directories win when two of them hold the same key.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct AssetManifest {
    /// Directories to scan for source assets.
    pub source_directories: Vec<PathBuf>,
    /// Where `index.bin` and `data.pack` are written.
    pub output_directory: PathBuf,
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self {
            source_directories: vec![PathBuf::from("content")],
            output_directory: PathBuf::from(".dist/assets"),
        }
    }
}
