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

//! Generational slot storage backing every resource handle.

/// A dense list of slots with index recycling.
///
/// Each slot carries a generation counter. Freeing a slot pushes its index on
/// a free list; reusing it bumps the generation, so `(index, generation)`
/// pairs issued before the reuse stop matching.
#[derive(Debug, Clone)]
pub struct SlotTable<T> {
    slots: Vec<(u32, Option<T>)>,
    free: Vec<u32>,
    live: usize,
}

impl<T> Default for SlotTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SlotTable<T> {
    /// Creates a new, empty table.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Stores a value in a new or recycled slot, returning `(index, generation)`.
    pub fn insert(&mut self, value: T) -> (u32, u32) {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let (generation, slot) = &mut self.slots[index as usize];
            *generation = generation.wrapping_add(1);
            *slot = Some(value);
            (index, *generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push((0, Some(value)));
            (index, 0)
        }
    }

    /// Returns the value in a slot if the generation still matches.
    pub fn get(&self, index: u32, generation: u32) -> Option<&T> {
        self.slots
            .get(index as usize)
            .and_then(|(slot_generation, value)| {
                if *slot_generation == generation {
                    value.as_ref()
                } else {
                    None
                }
            })
    }

    /// Returns the value in a slot mutably if the generation still matches.
    pub fn get_mut(&mut self, index: u32, generation: u32) -> Option<&mut T> {
        self.slots
            .get_mut(index as usize)
            .and_then(|(slot_generation, value)| {
                if *slot_generation == generation {
                    value.as_mut()
                } else {
                    None
                }
            })
    }

    /// Takes the value out of a slot and frees the index for reuse.
    pub fn remove(&mut self, index: u32, generation: u32) -> Option<T> {
        let (slot_generation, value) = self.slots.get_mut(index as usize)?;
        if *slot_generation != generation {
            return None;
        }
        let value = value.take()?;
        self.free.push(index);
        self.live -= 1;
        Some(value)
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` when no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Iterates over occupied slots as `(index, generation, value)`.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, (generation, value))| {
                value.as_ref().map(|v| (index as u32, *generation, v))
            })
    }
}
