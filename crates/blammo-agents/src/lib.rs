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

//! # Blammo Agents
//!
//! The per-kind asset caches and the [`ResourceManager`] facade that drives
//! them, plus the sound pallets that batch audio sources per world.

#![warn(missing_docs)]

pub mod asset_agent;
pub mod audio_agent;

pub use asset_agent::{
    AssetKind, CacheCounters, CacheSizes, LeakReport, LeakedAsset, LoaderSet, ResourceManager,
    ResourceStats,
};
pub use audio_agent::{
    ClipProvider, RandomSoundSource, SingleSoundSource, Sound, SoundPallet, SoundPalletRegistry,
    SoundSource,
};
