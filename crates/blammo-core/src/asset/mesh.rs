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

//! Defines the mesh asset and the per-consumer overlays layered over it.

use super::{Asset, EffectHandle, TechniqueTable, TextureHandle};
use std::collections::BTreeMap;

/// Immutable surface properties read from a material definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialProperties {
    /// Diffuse RGB color.
    pub diffuse: [f32; 3],
    /// Specular RGB color.
    pub specular: [f32; 3],
    /// Specular exponent.
    pub shininess: f32,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
}

impl Default for MaterialProperties {
    fn default() -> Self {
        Self {
            diffuse: [0.8, 0.8, 0.8],
            specular: [0.0, 0.0, 0.0],
            shininess: 1.0,
            alpha: 1.0,
        }
    }
}

/// Triangle geometry owned by one material group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonGroup {
    /// Flattened XYZ positions.
    pub positions: Vec<f32>,
    /// Flattened XYZ normals. Empty when the source had none.
    pub normals: Vec<f32>,
    /// Flattened UV coordinates. Empty when the source had none.
    pub texcoords: Vec<f32>,
    /// Triangle list indices into the vertex arrays.
    pub indices: Vec<u32>,
}

impl PolygonGroup {
    /// Number of vertices in the group.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles in the group.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Appends another block, rebasing its indices.
    ///
    /// An attribute is kept only when both blocks carry it for every vertex.
    pub fn append(&mut self, other: PolygonGroup) {
        if self.positions.is_empty() {
            *self = other;
            return;
        }
        let own = self.vertex_count();
        let theirs = other.vertex_count();
        merge_attribute(&mut self.normals, other.normals, own, theirs, 3);
        merge_attribute(&mut self.texcoords, other.texcoords, own, theirs, 2);
        self.positions.extend(other.positions);
        let base = own as u32;
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }
}

fn merge_attribute(
    own: &mut Vec<f32>,
    theirs: Vec<f32>,
    own_vertices: usize,
    their_vertices: usize,
    width: usize,
) {
    if own.len() == own_vertices * width && theirs.len() == their_vertices * width {
        own.extend(theirs);
    } else {
        own.clear();
    }
}

/// A material whose effect and texture are held through the caches.
///
/// Each handle counts as one holder in its cache and must be given back when
/// the material is dropped.
#[derive(Debug, Clone)]
pub struct Material {
    /// Surface properties.
    pub properties: MaterialProperties,
    /// The effect the material renders with.
    pub effect: EffectHandle,
    /// The effect's techniques, as handed out by the effect cache.
    pub techniques: TechniqueTable,
    /// The diffuse texture, when one could be loaded.
    pub texture: Option<TextureHandle>,
}

/// One material of a mesh together with the geometry drawn with it.
///
/// The group owns its geometry and its effect reference. The texture handle
/// is a separate holder counted by the texture cache.
#[derive(Debug, Clone)]
pub struct MaterialGroup {
    /// Surface properties.
    pub properties: MaterialProperties,
    /// Geometry drawn with this material.
    pub geometry: PolygonGroup,
    /// The effect the material renders with.
    pub effect: EffectHandle,
    /// The effect's techniques, as handed out by the effect cache.
    pub techniques: TechniqueTable,
    /// The diffuse texture, when one could be loaded.
    pub texture: Option<TextureHandle>,
}

impl MaterialGroup {
    /// Pairs a material with its geometry.
    pub fn new(material: Material, geometry: PolygonGroup) -> Self {
        Self {
            properties: material.properties,
            geometry,
            effect: material.effect,
            techniques: material.techniques,
            texture: material.texture,
        }
    }

    /// Splits the group back into its material and geometry.
    pub fn into_parts(self) -> (Material, PolygonGroup) {
        let material = Material {
            properties: self.properties,
            effect: self.effect,
            techniques: self.techniques,
            texture: self.texture,
        };
        (material, self.geometry)
    }
}

/// A loaded mesh: a set of material groups keyed by material name.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Name of the mesh, usually its key.
    pub name: String,
    /// The material groups, sorted by material name.
    pub groups: BTreeMap<String, MaterialGroup>,
}

impl Asset for Mesh {}

impl Mesh {
    /// Looks up a material group by name.
    pub fn group(&self, name: &str) -> Option<&MaterialGroup> {
        self.groups.get(name)
    }

    /// Consumes the mesh, returning its groups so their references can be released.
    pub fn into_groups(self) -> impl Iterator<Item = (String, MaterialGroup)> {
        self.groups.into_iter()
    }

    /// Creates an overlay with neutral values for every group of this mesh.
    pub fn overlay(&self) -> MeshOverlay {
        MeshOverlay {
            groups: self
                .groups
                .keys()
                .map(|name| (name.clone(), MaterialOverlay::default()))
                .collect(),
        }
    }
}

/// Mutable render state one consumer layers over a shared material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialOverlay {
    /// Multiplied with the material's diffuse color.
    pub diffuse_tint: [f32; 3],
    /// Multiplied with the material's alpha.
    pub alpha_multiplier: f32,
}

impl Default for MaterialOverlay {
    fn default() -> Self {
        Self {
            diffuse_tint: [1.0, 1.0, 1.0],
            alpha_multiplier: 1.0,
        }
    }
}

impl MaterialOverlay {
    /// Combines the overlay with the shared properties it sits on.
    pub fn apply(&self, base: &MaterialProperties) -> MaterialProperties {
        MaterialProperties {
            diffuse: [
                base.diffuse[0] * self.diffuse_tint[0],
                base.diffuse[1] * self.diffuse_tint[1],
                base.diffuse[2] * self.diffuse_tint[2],
            ],
            alpha: (base.alpha * self.alpha_multiplier).clamp(0.0, 1.0),
            ..*base
        }
    }
}

/// Per-consumer overlays for every group of one mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshOverlay {
    groups: BTreeMap<String, MaterialOverlay>,
}

impl MeshOverlay {
    /// Returns the overlay of one group.
    pub fn group(&self, name: &str) -> Option<&MaterialOverlay> {
        self.groups.get(name)
    }

    /// Returns the overlay of one group for modification.
    pub fn group_mut(&mut self, name: &str) -> Option<&mut MaterialOverlay> {
        self.groups.get_mut(name)
    }

    /// Sets the same alpha multiplier on every group.
    pub fn set_alpha(&mut self, alpha: f32) {
        for overlay in self.groups.values_mut() {
            overlay.alpha_multiplier = alpha;
        }
    }

    /// Sets the same diffuse tint on every group.
    pub fn set_tint(&mut self, tint: [f32; 3]) {
        for overlay in self.groups.values_mut() {
            overlay.diffuse_tint = tint;
        }
    }

    /// Resolves the effective properties of one group of `mesh`.
    pub fn resolve(&self, mesh: &Mesh, name: &str) -> Option<MaterialProperties> {
        let group = mesh.group(name)?;
        let overlay = self.groups.get(name).copied().unwrap_or_default();
        Some(overlay.apply(&group.properties))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::EffectHandle;

    fn mesh_with_group(name: &str) -> Mesh {
        let mut mesh = Mesh {
            name: "m".into(),
            ..Default::default()
        };
        let material = Material {
            properties: MaterialProperties {
                diffuse: [0.5, 0.5, 0.5],
                alpha: 0.8,
                ..Default::default()
            },
            effect: EffectHandle::from_raw(0, 0),
            techniques: TechniqueTable::default(),
            texture: None,
        };
        mesh.groups.insert(
            name.to_string(),
            MaterialGroup::new(material, PolygonGroup::default()),
        );
        mesh
    }

    #[test]
    fn overlays_do_not_touch_the_shared_mesh() {
        let mesh = mesh_with_group("hull");
        let mut first = mesh.overlay();
        let second = mesh.overlay();
        first.set_alpha(0.5);
        first.set_tint([1.0, 0.0, 0.0]);

        let tinted = first.resolve(&mesh, "hull").unwrap();
        assert_eq!(tinted.diffuse, [0.5, 0.0, 0.0]);
        assert!((tinted.alpha - 0.4).abs() < 1e-6);

        let untouched = second.resolve(&mesh, "hull").unwrap();
        assert_eq!(untouched, mesh.groups["hull"].properties);
    }

    #[test]
    fn append_rebases_indices() {
        let mut a = PolygonGroup {
            positions: vec![0.0; 9],
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        let b = PolygonGroup {
            positions: vec![1.0; 9],
            normals: vec![0.0; 9],
            indices: vec![0, 1, 2],
            ..Default::default()
        };
        a.append(b);
        assert_eq!(a.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(a.triangle_count(), 2);
        assert!(a.normals.is_empty());
    }

    #[test]
    fn groups_split_back_into_material_and_geometry() {
        let group = mesh_with_group("hull").groups.remove("hull").unwrap();
        let (material, geometry) = group.into_parts();
        assert_eq!(material.properties.diffuse, [0.5, 0.5, 0.5]);
        assert_eq!(material.effect, EffectHandle::from_raw(0, 0));
        assert!(material.texture.is_none());
        assert_eq!(geometry, PolygonGroup::default());
    }
}
