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

use super::Asset;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// An opaque, typed reference to an asset held by one of the caches.
///
/// It combines a slot index with a generation count. When a cached asset is
/// destroyed its slot can be recycled for another asset, but the generation is
/// incremented, so a handle kept past its release no longer matches the slot
/// and is reported as untracked instead of touching the new occupant.
///
/// Handles are `Copy`: copying one does not add a holder. Holders are only
/// counted through the cache's `get`/`release` pair.
pub struct ResourceHandle<A: Asset> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> A>,
}

impl<A: Asset> ResourceHandle<A> {
    /// Builds a handle from its raw parts.
    ///
    /// Caches use this when they allocate a slot. Outside a cache it can only
    /// produce handles that are checked against the slot table on every use.
    pub const fn from_raw(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// The slot index this handle points at.
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// The generation of the slot at the time the handle was issued.
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

impl<A: Asset> Clone for ResourceHandle<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: Asset> Copy for ResourceHandle<A> {}

impl<A: Asset> PartialEq for ResourceHandle<A> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<A: Asset> Eq for ResourceHandle<A> {}

impl<A: Asset> Hash for ResourceHandle<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.generation.hash(state);
    }
}

impl<A: Asset> fmt::Debug for ResourceHandle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_name = std::any::type_name::<A>();
        let short = type_name.rsplit("::").next().unwrap_or(type_name);
        write!(f, "Handle<{short}>({}v{})", self.index, self.generation)
    }
}
