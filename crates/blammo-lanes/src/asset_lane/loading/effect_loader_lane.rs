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

//! Shader effect compilation.
//!
//! Effects are compiled by an [`EffectRuntime`], which owns every compiled
//! program until it is told to destroy it. The runtime is torn down after
//! the last effect is gone.

use blammo_core::asset::{AssetKey, EffectId};
use blammo_core::lane::{Lane, LaneKind};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::error::Error;

/// One technique reported by the runtime after compiling an effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTechnique {
    /// The technique's name.
    pub name: String,
    /// The technique's position inside the effect.
    pub index: u32,
    /// Why the technique cannot be used, or `None` if it validated.
    pub invalid: Option<String>,
}

/// The result of compiling one effect source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledEffect {
    /// The runtime-side id of the compiled effect.
    pub id: EffectId,
    /// Every technique the source declared, valid or not.
    pub techniques: Vec<CompiledTechnique>,
}

/// The shader-effect compiler and owner of compiled effects.
pub trait EffectRuntime: Lane {
    /// Compiles an effect source. On success the runtime holds the effect
    /// until [`EffectRuntime::destroy`] is called with its id.
    fn compile(
        &mut self,
        key: &AssetKey,
        source: &[u8],
    ) -> Result<CompiledEffect, Box<dyn Error + Send + Sync>>;

    /// Destroys a compiled effect.
    fn destroy(&mut self, id: EffectId);

    /// Number of effects compiled and not yet destroyed.
    fn live_effects(&self) -> usize;

    /// Tears the runtime down. Called once, after every effect was destroyed.
    fn shutdown(&mut self);
}

#[derive(Debug, Deserialize)]
struct EffectSource {
    techniques: Vec<TechniqueSource>,
}

#[derive(Debug, Deserialize)]
struct TechniqueSource {
    name: String,
    #[serde(default)]
    passes: Vec<PassSource>,
}

#[derive(Debug, Deserialize)]
struct PassSource {
    vertex: String,
    fragment: String,
}

/// An effect runtime that compiles RON effect descriptions on the host.
///
/// An effect source lists techniques, each made of passes naming a vertex
/// and a fragment entry point:
///
/// ```ron
/// (techniques: [
///     (name: "Cel", passes: [(vertex: "cel_vs", fragment: "cel_fs")]),
/// ])
/// ```
///
/// A technique without passes, or with a pass missing an entry point, is
/// reported as invalid.
#[derive(Debug, Default)]
pub struct HostEffectRuntime {
    next_id: u64,
    live: BTreeSet<EffectId>,
    shut_down: bool,
}

impl HostEffectRuntime {
    /// Creates a runtime with no compiled effects.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once [`EffectRuntime::shutdown`] has run.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl EffectRuntime for HostEffectRuntime {
    fn compile(
        &mut self,
        key: &AssetKey,
        source: &[u8],
    ) -> Result<CompiledEffect, Box<dyn Error + Send + Sync>> {
        if self.shut_down {
            return Err("effect runtime has been shut down".into());
        }
        let text = std::str::from_utf8(source)?;
        let parsed: EffectSource = ron::from_str(text)?;

        let techniques = parsed
            .techniques
            .into_iter()
            .enumerate()
            .map(|(index, technique)| CompiledTechnique {
                invalid: validate(&technique),
                name: technique.name,
                index: index as u32,
            })
            .collect();

        let id = EffectId(self.next_id);
        self.next_id += 1;
        self.live.insert(id);
        log::trace!("Compiled effect '{}' as {:?}", key, id);
        Ok(CompiledEffect { id, techniques })
    }

    fn destroy(&mut self, id: EffectId) {
        if !self.live.remove(&id) {
            log::warn!("Destroying unknown effect {:?}", id);
        }
    }

    fn live_effects(&self) -> usize {
        self.live.len()
    }

    fn shutdown(&mut self) {
        if !self.live.is_empty() {
            log::error!(
                "Effect runtime shut down with {} live effects",
                self.live.len()
            );
            self.live.clear();
        }
        self.shut_down = true;
    }
}

impl Lane for HostEffectRuntime {
    fn strategy_name(&self) -> &'static str {
        "HostEffectRuntime"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Effect
    }
}

fn validate(technique: &TechniqueSource) -> Option<String> {
    if technique.name.trim().is_empty() {
        return Some("technique has no name".to_string());
    }
    if technique.passes.is_empty() {
        return Some("technique has no passes".to_string());
    }
    technique
        .passes
        .iter()
        .position(|pass| pass.vertex.trim().is_empty() || pass.fragment.trim().is_empty())
        .map(|pass| format!("pass {pass} is missing an entry point"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CEL: &str = r#"(techniques: [
        (name: "Cel", passes: [(vertex: "cel_vs", fragment: "cel_fs")]),
        (name: "Outline", passes: []),
        (name: "Shadow", passes: [(vertex: "shadow_vs", fragment: "")]),
    ])"#;

    #[test]
    fn reports_each_technique_with_its_validity() {
        let mut runtime = HostEffectRuntime::new();
        let effect = runtime
            .compile(&AssetKey::new("resources/effects/cel.fx"), CEL.as_bytes())
            .unwrap();
        assert_eq!(effect.techniques.len(), 3);
        assert_eq!(effect.techniques[0].invalid, None);
        assert!(effect.techniques[1].invalid.is_some());
        assert!(effect.techniques[2].invalid.is_some());
        assert_eq!(effect.techniques[2].index, 2);
        assert_eq!(runtime.live_effects(), 1);
    }

    #[test]
    fn every_compile_yields_a_fresh_id() {
        let mut runtime = HostEffectRuntime::new();
        let key = AssetKey::new("e.fx");
        let a = runtime.compile(&key, CEL.as_bytes()).unwrap();
        let b = runtime.compile(&key, CEL.as_bytes()).unwrap();
        assert_ne!(a.id, b.id);
        runtime.destroy(a.id);
        assert_eq!(runtime.live_effects(), 1);
        runtime.shutdown();
        assert!(runtime.is_shut_down());
        assert_eq!(runtime.live_effects(), 0);
        assert!(runtime.compile(&key, CEL.as_bytes()).is_err());
    }

    #[test]
    fn malformed_sources_fail_without_allocating() {
        let mut runtime = HostEffectRuntime::new();
        assert!(runtime
            .compile(&AssetKey::new("bad.fx"), b"(techniques: [")
            .is_err());
        assert_eq!(runtime.live_effects(), 0);
    }
}
