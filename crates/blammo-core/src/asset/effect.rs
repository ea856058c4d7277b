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

//! Defines compiled shader effects and their named techniques.

use super::Asset;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Identifier of a compiled effect inside an effect runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EffectId(pub u64);

/// A named rendering variant of a compiled effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Technique {
    /// The technique's name as written in the effect source.
    pub name: String,
    /// Position of the technique inside its effect.
    pub index: u32,
    /// The effect the technique belongs to.
    pub effect: EffectId,
}

/// A name-to-technique lookup for one compiled effect.
///
/// The table is metadata only. Each caller of the effect cache receives its
/// own copy, and the table never keeps the effect alive on its own.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TechniqueTable {
    techniques: Arc<BTreeMap<String, Technique>>,
}

impl TechniqueTable {
    /// Builds a table from a list of techniques. Later duplicates win.
    pub fn new(techniques: impl IntoIterator<Item = Technique>) -> Self {
        let map = techniques
            .into_iter()
            .map(|technique| (technique.name.clone(), technique))
            .collect();
        Self {
            techniques: Arc::new(map),
        }
    }

    /// Looks a technique up by name.
    pub fn get(&self, name: &str) -> Option<&Technique> {
        self.techniques.get(name)
    }

    /// Number of techniques in the table.
    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    /// Returns `true` when the table has no techniques.
    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }

    /// Technique names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.techniques.keys().map(String::as_str)
    }

    /// Iterates over all techniques, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &Technique> {
        self.techniques.values()
    }
}

/// A compiled shader effect held by the effect cache.
#[derive(Debug, Clone)]
pub struct ShaderEffect {
    /// The runtime-side id, destroyed when the cache entry goes away.
    pub id: EffectId,
    /// The shared technique table.
    pub techniques: TechniqueTable,
}

impl Asset for ShaderEffect {}
