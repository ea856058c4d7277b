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

//! Defines lanes for loading mesh assets.
//!
//! A mesh lane produces a [`MeshDescription`]: geometry and material data with
//! every external reference (textures, effects) still expressed as a key. The
//! mesh cache turns those keys into handles.

mod obj_loader_lane;
mod resource_resolver;

pub use obj_loader_lane::*;
pub use resource_resolver::*;

use blammo_core::asset::{AssetKey, MaterialProperties, PolygonGroup, TextureFilter};
use blammo_core::lane::Lane;
use std::error::Error;

/// A parsed material, with its texture and effect still expressed as keys.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDescription {
    /// The material name.
    pub name: String,
    /// Surface properties from the material definition.
    pub properties: MaterialProperties,
    /// The diffuse texture, resolved to a key.
    pub diffuse_texture: Option<AssetKey>,
    /// Filter requested for the diffuse texture.
    pub texture_filter: TextureFilter,
    /// The effect named by the material, resolved to a key.
    pub effect: Option<AssetKey>,
}

impl MaterialDescription {
    /// A material with default properties and no texture or effect.
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: MaterialProperties::default(),
            diffuse_texture: None,
            texture_filter: TextureFilter::default(),
            effect: None,
        }
    }
}

/// One material of a parsed mesh, with its geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupDescription {
    /// The material the group is keyed by.
    pub material: MaterialDescription,
    /// Geometry drawn with this material.
    pub geometry: PolygonGroup,
}

/// A parsed mesh, before any dependency has been loaded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshDescription {
    /// The mesh's material groups, sorted by material name.
    pub groups: Vec<GroupDescription>,
}

/// Common trait for all mesh loaders.
///
/// Mesh formats reference material libraries by path, so the lane gets a
/// resolver to fetch them through.
pub trait MeshLoaderLane: Lane {
    /// Parses the mesh stored under `key`.
    fn load(
        &self,
        key: &AssetKey,
        bytes: &[u8],
        resolver: &dyn MaterialLibraryResolver,
    ) -> Result<MeshDescription, Box<dyn Error + Send + Sync>>;

    /// Parses the material library stored under `key` on its own.
    ///
    /// References inside the library resolve relative to `key`. A library
    /// defining no material is an error.
    fn load_materials(
        &self,
        key: &AssetKey,
        bytes: &[u8],
        resolver: &dyn MaterialLibraryResolver,
    ) -> Result<Vec<MaterialDescription>, Box<dyn Error + Send + Sync>>;
}
