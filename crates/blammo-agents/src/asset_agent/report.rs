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

//! Counters and teardown reports of the resource manager.

use blammo_core::asset::AssetKey;
use std::fmt;

/// The cache an asset lived in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// The mesh cache.
    Mesh,
    /// The texture cache.
    Texture,
    /// The shader effect cache.
    Effect,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AssetKind::Mesh => "mesh",
            AssetKind::Texture => "texture",
            AssetKind::Effect => "shader effect",
        };
        f.write_str(name)
    }
}

/// An asset still held when the manager was shut down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeakedAsset {
    /// The cache it was found in.
    pub kind: AssetKind,
    /// Its key.
    pub key: AssetKey,
    /// Holders that never released it.
    pub ref_count: u32,
}

/// Everything found still cached at shutdown.
///
/// Only assets the caller held directly are listed: textures and effects
/// that were only kept alive by a leaked mesh are freed with that mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeakReport {
    /// The leaked assets, meshes first, then effects, then textures.
    pub leaks: Vec<LeakedAsset>,
    /// Effects still alive in the runtime when it was torn down.
    pub runtime_effects: usize,
}

impl LeakReport {
    /// Returns `true` when every asset had been released.
    pub fn is_clean(&self) -> bool {
        self.leaks.is_empty() && self.runtime_effects == 0
    }

    /// The leaks of one kind.
    pub fn of_kind(&self, kind: AssetKind) -> impl Iterator<Item = &LeakedAsset> {
        self.leaks.iter().filter(move |leak| leak.kind == kind)
    }
}

/// Number of live entries in each cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheSizes {
    /// Cached meshes.
    pub meshes: usize,
    /// Cached textures.
    pub textures: usize,
    /// Cached shader effects.
    pub effects: usize,
    /// Loaded sound sources across every pallet.
    pub sound_sources: usize,
}

impl CacheSizes {
    /// Returns `true` when no mesh, texture, or effect is cached.
    pub fn is_empty(&self) -> bool {
        self.meshes == 0 && self.textures == 0 && self.effects == 0
    }
}

/// Lookup counters for one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheCounters {
    /// Gets served from the cache.
    pub hits: u64,
    /// Gets that had to load.
    pub misses: u64,
    /// Misses that produced a new entry.
    pub loads: u64,
    /// Misses that failed.
    pub failures: u64,
    /// Entries destroyed after their last release.
    pub destroyed: u64,
}

/// Lookup counters for every cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceStats {
    /// Mesh cache counters.
    pub meshes: CacheCounters,
    /// Texture cache counters.
    pub textures: CacheCounters,
    /// Shader effect cache counters.
    pub effects: CacheCounters,
}

impl ResourceStats {
    /// The counters of one cache.
    pub fn of(&self, kind: AssetKind) -> CacheCounters {
        match kind {
            AssetKind::Mesh => self.meshes,
            AssetKind::Texture => self.textures,
            AssetKind::Effect => self.effects,
        }
    }
}
