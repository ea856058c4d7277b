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

//! # Lane Abstraction
//!
//! A **Lane** is a swappable loading strategy used by a cache. Each lane turns
//! raw resource bytes of one kind into a decoded asset, and the caches hold
//! their lanes behind trait objects so that a host can replace any decoder
//! without touching the caching logic.
//!
//! Domain-specific traits extend [`Lane`] with their decode method, for
//! example `AssetLoaderLane<A>: Lane` in `blammo-lanes`.

use std::fmt;

/// Classification of lane types, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    /// Mesh and material parsing.
    Mesh,
    /// Image decoding into textures.
    Texture,
    /// Shader effect compilation.
    Effect,
    /// Bitmap font rasterization.
    Font,
    /// Audio clip decoding.
    Audio,
}

impl fmt::Display for LaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaneKind::Mesh => "mesh",
            LaneKind::Texture => "texture",
            LaneKind::Effect => "effect",
            LaneKind::Font => "font",
            LaneKind::Audio => "audio",
        };
        f.write_str(name)
    }
}

/// The base trait shared by every loading strategy.
pub trait Lane: Send + Sync {
    /// A short, human readable name for the strategy, e.g. `"WavLoader"`.
    fn strategy_name(&self) -> &'static str;

    /// The kind of asset this lane produces.
    fn lane_kind(&self) -> LaneKind;
}
