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

//! Defines a lane for loading Wavefront OBJ meshes and their MTL libraries.

use super::{
    GroupDescription, MaterialDescription, MaterialLibraryResolver, MeshDescription, MeshLoaderLane,
};
use ahash::AHashMap;
use anyhow::Context;
use blammo_core::asset::{AssetKey, MaterialProperties, PolygonGroup, TextureFilter};
use blammo_core::lane::{Lane, LaneKind};
use std::collections::BTreeMap;
use std::error::Error;
use std::io::Cursor;
use std::path::Path;

/// Material name used for faces without a usable material.
pub const DEFAULT_MATERIAL: &str = "default";

/// MTL statement naming the effect a material renders with.
pub const EFFECT_PARAM: &str = "effect";

/// MTL statement choosing the diffuse texture's filter.
pub const TEXTURE_FILTER_PARAM: &str = "texture_filter";

/// Lane for loading OBJ mesh assets.
#[derive(Clone, Default)]
pub struct ObjLoaderLane;

impl MeshLoaderLane for ObjLoaderLane {
    fn load(
        &self,
        key: &AssetKey,
        bytes: &[u8],
        resolver: &dyn MaterialLibraryResolver,
    ) -> Result<MeshDescription, Box<dyn Error + Send + Sync>> {
        let obj_text = std::str::from_utf8(bytes).context("OBJ file is not valid UTF-8")?;

        let (models, materials) = tobj::load_obj_buf(
            &mut Cursor::new(obj_text),
            &tobj::LoadOptions {
                triangulate: true,
                single_index: true,
                ..Default::default()
            },
            |library: &Path| load_library(key, library, resolver),
        )
        .context("Failed to parse OBJ file")?;

        let materials = materials.unwrap_or_else(|e| {
            log::warn!("'{}': material library unavailable ({}), using default material", key, e);
            Vec::new()
        });

        let mut groups: BTreeMap<String, GroupDescription> = BTreeMap::new();
        for model in models {
            let mesh = model.mesh;
            if mesh.indices.is_empty() {
                continue;
            }
            let material = mesh.material_id.and_then(|id| materials.get(id));
            let name = material
                .map(|m| m.name.clone())
                .unwrap_or_else(|| DEFAULT_MATERIAL.to_string());
            let geometry = PolygonGroup {
                positions: mesh.positions,
                normals: mesh.normals,
                texcoords: mesh.texcoords,
                indices: mesh.indices,
            };

            match groups.get_mut(&name) {
                Some(group) => group.geometry.append(geometry),
                None => {
                    let material = match material {
                        Some(material) => describe_material(key, material, resolver),
                        None => MaterialDescription::plain(name.clone()),
                    };
                    groups.insert(name, GroupDescription { material, geometry });
                }
            }
        }

        if groups.is_empty() {
            return Err("OBJ file contains no faces".into());
        }

        Ok(MeshDescription {
            groups: groups.into_values().collect(),
        })
    }

    fn load_materials(
        &self,
        key: &AssetKey,
        bytes: &[u8],
        resolver: &dyn MaterialLibraryResolver,
    ) -> Result<Vec<MaterialDescription>, Box<dyn Error + Send + Sync>> {
        let (materials, _) =
            tobj::load_mtl_buf(&mut Cursor::new(bytes)).context("Failed to parse MTL file")?;
        if materials.is_empty() {
            return Err("MTL file defines no material".into());
        }
        Ok(materials
            .iter()
            .map(|material| describe_material(key, material, resolver))
            .collect())
    }
}

impl Lane for ObjLoaderLane {
    fn strategy_name(&self) -> &'static str {
        "ObjLoader"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Mesh
    }
}

fn load_library(
    mesh_key: &AssetKey,
    library: &Path,
    resolver: &dyn MaterialLibraryResolver,
) -> tobj::MTLLoadResult {
    let reference = library.to_string_lossy();
    let library_key = resolver.resolve_reference(mesh_key, &reference);
    let bytes = match resolver.read(&library_key) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::warn!("'{}': cannot read material library: {}", mesh_key, e);
            return Err(tobj::LoadError::OpenFileFailed);
        }
    };
    let parsed: Result<(Vec<tobj::Material>, AHashMap<String, usize>), _> =
        tobj::load_mtl_buf(&mut Cursor::new(bytes));
    if let Err(e) = &parsed {
        log::warn!("'{}': malformed material library: {}", library_key, e);
    }
    parsed
}

/// Reads one MTL material. References resolve relative to `owner`.
fn describe_material(
    owner: &AssetKey,
    material: &tobj::Material,
    resolver: &dyn MaterialLibraryResolver,
) -> MaterialDescription {
    let defaults = MaterialProperties::default();
    let properties = MaterialProperties {
        diffuse: material.diffuse.unwrap_or(defaults.diffuse),
        specular: material.specular.unwrap_or(defaults.specular),
        shininess: material.shininess.unwrap_or(defaults.shininess),
        alpha: material.dissolve.unwrap_or(defaults.alpha).clamp(0.0, 1.0),
    };

    let texture_filter = match material.unknown_param.get(TEXTURE_FILTER_PARAM) {
        Some(name) => name.parse().unwrap_or_else(|e| {
            log::warn!("'{}', material '{}': {}", owner, material.name, e);
            TextureFilter::default()
        }),
        None => TextureFilter::default(),
    };

    MaterialDescription {
        name: material.name.clone(),
        properties,
        diffuse_texture: material
            .diffuse_texture
            .as_deref()
            .filter(|path| !path.trim().is_empty())
            .map(|path| resolver.resolve_reference(owner, path.trim())),
        texture_filter,
        effect: material
            .unknown_param
            .get(EFFECT_PARAM)
            .map(|effect| effect.trim())
            .filter(|effect| !effect.is_empty())
            .map(|effect| resolver.resolve_reference(owner, effect)),
    }
}
