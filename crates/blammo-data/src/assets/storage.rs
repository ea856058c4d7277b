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

//! A keyed, reference-counted storage for loaded assets.

use super::SlotTable;
use blammo_core::asset::{Asset, AssetKey, ResourceHandle};
use std::collections::HashMap;

struct Entry<A> {
    key: AssetKey,
    asset: A,
    ref_count: u32,
}

/// Outcome of releasing a handle.
#[derive(Debug)]
pub enum Release<A> {
    /// The handle does not refer to a live entry. Nothing changed.
    Untracked,
    /// The count was decremented and other holders remain.
    Retained {
        /// Holders left after this release.
        remaining: u32,
    },
    /// The last holder released the entry. It has been removed from the
    /// storage and is handed back so the caller can destroy it.
    Destroyed {
        /// The key the entry was stored under.
        key: AssetKey,
        /// The asset instance.
        asset: A,
    },
}

/// A central, in-memory cache for a specific type of asset `A`.
///
/// Every entry lives in a generational slot and is reachable both by handle
/// and by key. The key map holds exactly the handles of the live slots, and
/// a slot is live exactly while its reference count is above zero.
pub struct Assets<A: Asset> {
    slots: SlotTable<Entry<A>>,
    by_key: HashMap<AssetKey, ResourceHandle<A>>,
}

impl<A: Asset> Default for Assets<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Asset> Assets<A> {
    /// Creates a new, empty asset storage.
    pub fn new() -> Self {
        Self {
            slots: SlotTable::new(),
            by_key: HashMap::new(),
        }
    }

    /// Adds a holder to the entry stored under `key`, if there is one.
    pub fn acquire(&mut self, key: &AssetKey) -> Option<ResourceHandle<A>> {
        let handle = *self.by_key.get(key)?;
        let entry = self.slots.get_mut(handle.index(), handle.generation())?;
        entry.ref_count += 1;
        log::trace!("'{}' acquired, {} holders", key, entry.ref_count);
        Some(handle)
    }

    /// Stores a freshly loaded asset with a single holder.
    ///
    /// If the key is already present the stored instance is kept, the new
    /// one is dropped, and the call behaves like [`Assets::acquire`].
    pub fn insert(&mut self, key: AssetKey, asset: A) -> ResourceHandle<A> {
        if let Some(handle) = self.acquire(&key) {
            log::warn!("'{}' inserted while already cached; keeping the cached instance", key);
            return handle;
        }
        let (index, generation) = self.slots.insert(Entry {
            key: key.clone(),
            asset,
            ref_count: 1,
        });
        let handle = ResourceHandle::from_raw(index, generation);
        self.by_key.insert(key, handle);
        handle
    }

    /// Removes one holder. The entry is removed when the last holder leaves.
    pub fn release(&mut self, handle: ResourceHandle<A>) -> Release<A> {
        let Some(entry) = self.slots.get_mut(handle.index(), handle.generation()) else {
            return Release::Untracked;
        };
        entry.ref_count -= 1;
        if entry.ref_count > 0 {
            return Release::Retained {
                remaining: entry.ref_count,
            };
        }
        match self.slots.remove(handle.index(), handle.generation()) {
            Some(entry) => {
                self.by_key.remove(&entry.key);
                Release::Destroyed {
                    key: entry.key,
                    asset: entry.asset,
                }
            }
            None => Release::Untracked,
        }
    }

    /// Retrieves the asset behind a handle.
    pub fn get(&self, handle: ResourceHandle<A>) -> Option<&A> {
        self.slots
            .get(handle.index(), handle.generation())
            .map(|entry| &entry.asset)
    }

    /// Retrieves the asset behind a handle mutably.
    pub fn get_mut(&mut self, handle: ResourceHandle<A>) -> Option<&mut A> {
        self.slots
            .get_mut(handle.index(), handle.generation())
            .map(|entry| &mut entry.asset)
    }

    /// The key an entry is stored under.
    pub fn key_of(&self, handle: ResourceHandle<A>) -> Option<&AssetKey> {
        self.slots
            .get(handle.index(), handle.generation())
            .map(|entry| &entry.key)
    }

    /// The handle currently stored under a key, without adding a holder.
    pub fn handle_of(&self, key: &AssetKey) -> Option<ResourceHandle<A>> {
        self.by_key.get(key).copied()
    }

    /// Number of holders of a handle, or `None` if it is untracked.
    pub fn ref_count(&self, handle: ResourceHandle<A>) -> Option<u32> {
        self.slots
            .get(handle.index(), handle.generation())
            .map(|entry| entry.ref_count)
    }

    /// Number of holders of the entry stored under a key.
    pub fn ref_count_by_key(&self, key: &AssetKey) -> Option<u32> {
        self.handle_of(key).and_then(|handle| self.ref_count(handle))
    }

    /// Returns `true` if an entry is stored under the key.
    pub fn contains(&self, key: &AssetKey) -> bool {
        self.by_key.contains_key(key)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    /// Returns `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Iterates over live entries as `(handle, key, holders)`.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceHandle<A>, &AssetKey, u32)> {
        self.slots.iter().map(|(index, generation, entry)| {
            (
                ResourceHandle::from_raw(index, generation),
                &entry.key,
                entry.ref_count,
            )
        })
    }

    /// Removes every entry regardless of holders, returning
    /// `(key, asset, holders)` for each. Used at teardown.
    pub fn drain(&mut self) -> Vec<(AssetKey, A, u32)> {
        let handles: Vec<_> = self.by_key.drain().map(|(_, handle)| handle).collect();
        handles
            .into_iter()
            .filter_map(|handle| self.slots.remove(handle.index(), handle.generation()))
            .map(|entry| (entry.key, entry.asset, entry.ref_count))
            .collect()
    }
}
