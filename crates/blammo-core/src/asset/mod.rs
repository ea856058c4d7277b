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

//! Provides the foundational traits and primitive types for the asset cache.
//!
//! This module defines the "common language" for all asset-related operations.
//! It contains the asset data types that the caches hand out, the keys used to
//! name them, and the typed handles used to refer to them, but it has no
//! knowledge of how assets are loaded or stored.
//!
//! The key components are:
//! - The [`Asset`] trait: A marker for all types that can be stored in a cache.
//! - [`AssetKey`]: the normalized path naming a resource.
//! - [`ResourceHandle`]: the opaque, generational reference returned by a `get`.
//! - The per-kind asset types: [`Mesh`], [`Texture`], [`ShaderEffect`], [`FontSet`].

mod effect;
mod font;
mod handle;
mod key;
mod mesh;
mod texture;

pub use effect::*;
pub use font::*;
pub use handle::*;
pub use key::*;
pub use mesh::*;
pub use texture::*;

/// A marker trait for types that can be managed by the asset caches.
///
/// The supertraits keep asset data free of borrowed state so that a cached
/// instance can live for as long as any holder keeps its handle.
///
/// # Examples
///
/// ```
/// use blammo_core::asset::Asset;
///
/// struct Heightmap {
///     samples: Vec<f32>,
/// }
///
/// impl Asset for Heightmap {}
/// ```
pub trait Asset: Send + Sync + 'static {}

/// Handle to a mesh held by the mesh cache.
pub type MeshHandle = ResourceHandle<Mesh>;

/// Handle to a texture held by the texture cache.
pub type TextureHandle = ResourceHandle<Texture>;

/// Handle to a compiled shader effect held by the effect cache.
pub type EffectHandle = ResourceHandle<ShaderEffect>;
