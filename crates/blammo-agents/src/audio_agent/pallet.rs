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

use super::{ClipProvider, Sound, SoundSource};
use std::collections::BTreeMap;

/// A named batch of sound sources loaded and unloaded together.
pub struct SoundPallet {
    name: String,
    sources: Vec<Box<dyn SoundSource>>,
    loaded: bool,
}

impl SoundPallet {
    /// Creates an empty, unloaded pallet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sources: Vec::new(),
            loaded: false,
        }
    }

    /// The pallet's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a source. A source with the same name is replaced.
    ///
    /// On a loaded pallet the newcomer is loaded through `clips` first. If
    /// that fails it is dropped and the pallet is left as it was. Returns
    /// whether the source was added.
    pub fn add(&mut self, mut source: Box<dyn SoundSource>, clips: &dyn ClipProvider) -> bool {
        if self.loaded && !source.load(clips) {
            log::error!(
                "Pallet '{}': rejecting sound source '{}' after a failed load",
                self.name,
                source.name()
            );
            return false;
        }
        if let Some(existing) = self
            .sources
            .iter_mut()
            .find(|existing| existing.name() == source.name())
        {
            log::warn!(
                "Pallet '{}': replacing sound source '{}'",
                self.name,
                source.name()
            );
            existing.unload();
            *existing = source;
        } else {
            self.sources.push(source);
        }
        true
    }

    /// Loads every source. Sources that fail are removed from the pallet.
    ///
    /// Returns the number of sources left loaded.
    pub fn load(&mut self, clips: &dyn ClipProvider) -> usize {
        let pallet = &self.name;
        self.sources.retain_mut(|source| {
            let ok = source.load(clips);
            if !ok {
                log::error!(
                    "Pallet '{}': removing sound source '{}' after a failed load",
                    pallet,
                    source.name()
                );
            }
            ok
        });
        self.loaded = true;
        self.sources.len()
    }

    /// Unloads every source, keeping them registered.
    pub fn unload(&mut self) {
        for source in &mut self.sources {
            source.unload();
        }
        self.loaded = false;
    }

    /// Returns `true` between [`SoundPallet::load`] and [`SoundPallet::unload`].
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Returns `true` if a source with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.sources.iter().any(|source| source.name() == name)
    }

    /// Looks a source up by name.
    pub fn source(&self, name: &str) -> Option<&dyn SoundSource> {
        self.sources
            .iter()
            .find(|source| source.name() == name)
            .map(|source| source.as_ref())
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns `true` if no source is registered.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Spawns a sound from the named source, if it is registered and loaded.
    pub fn spawn(
        &mut self,
        name: &str,
        looped: bool,
        position: Option<[f32; 3]>,
    ) -> Option<Sound> {
        self.sources
            .iter_mut()
            .find(|source| source.name() == name)
            .and_then(|source| source.spawn_sound(looped, position))
    }
}

/// The global sound pallet plus one pallet per world.
///
/// Only one world is current at a time: loading a world unloads every other
/// world's pallet. The global pallet is independent of worlds.
pub struct SoundPalletRegistry {
    global: SoundPallet,
    worlds: BTreeMap<String, SoundPallet>,
    current_world: Option<String>,
}

impl Default for SoundPalletRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundPalletRegistry {
    /// Creates a registry with an empty global pallet and no worlds.
    pub fn new() -> Self {
        Self {
            global: SoundPallet::new("global"),
            worlds: BTreeMap::new(),
            current_world: None,
        }
    }

    /// The global pallet.
    pub fn global(&self) -> &SoundPallet {
        &self.global
    }

    /// The global pallet, for registering sources.
    pub fn global_mut(&mut self) -> &mut SoundPallet {
        &mut self.global
    }

    /// A world's pallet, if the world has any sources.
    pub fn world(&self, world: &str) -> Option<&SoundPallet> {
        self.worlds.get(world)
    }

    /// A world's pallet, created on first use.
    pub fn world_mut(&mut self, world: &str) -> &mut SoundPallet {
        self.worlds
            .entry(world.to_string())
            .or_insert_with(|| SoundPallet::new(world))
    }

    /// The world whose pallet was loaded last.
    pub fn current_world(&self) -> Option<&str> {
        self.current_world.as_deref()
    }

    /// Loads the global pallet. Returns the number of loaded sources.
    pub fn load_global(&mut self, clips: &dyn ClipProvider) -> usize {
        let loaded = self.global.load(clips);
        log::info!("Loaded {} global sound sources", loaded);
        loaded
    }

    /// Makes `world` current: unloads every other world's pallet, then loads
    /// this one. Returns the number of loaded sources.
    pub fn load_world(&mut self, world: &str, clips: &dyn ClipProvider) -> usize {
        for (name, pallet) in self.worlds.iter_mut() {
            if name != world && pallet.is_loaded() {
                pallet.unload();
                log::debug!("Unloaded sounds of world '{}'", name);
            }
        }
        self.current_world = Some(world.to_string());
        match self.worlds.get_mut(world) {
            Some(pallet) => {
                let loaded = pallet.load(clips);
                log::info!("Loaded {} sound sources for world '{}'", loaded, world);
                loaded
            }
            None => {
                log::warn!("World '{}' has no sound sources", world);
                0
            }
        }
    }

    /// Spawns a sound by source name, looking in the global pallet first and
    /// then in the current world's pallet.
    pub fn spawn(
        &mut self,
        name: &str,
        looped: bool,
        position: Option<[f32; 3]>,
    ) -> Option<Sound> {
        if self.global.contains(name) {
            return self.global.spawn(name, looped, position);
        }
        let world = self.current_world.as_deref()?;
        self.worlds.get_mut(world)?.spawn(name, looped, position)
    }

    /// Unloads every pallet and forgets the current world.
    pub fn unload_all(&mut self) {
        self.global.unload();
        for pallet in self.worlds.values_mut() {
            pallet.unload();
        }
        self.current_world = None;
    }

    /// Number of loaded sources across every pallet.
    pub fn loaded_sources(&self) -> usize {
        std::iter::once(&self.global)
            .chain(self.worlds.values())
            .flat_map(|pallet| pallet.sources.iter())
            .filter(|source| source.is_loaded())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_agent::source::tests::FakeClips;
    use crate::audio_agent::{RandomSoundSource, SingleSoundSource};

    fn registry() -> SoundPalletRegistry {
        let clips = clips();
        let mut registry = SoundPalletRegistry::new();
        registry
            .global_mut()
            .add(Box::new(SingleSoundSource::new("click", "ui/click.wav")), &clips);
        registry
            .global_mut()
            .add(Box::new(SingleSoundSource::new("broken", "ui/missing.wav")), &clips);
        registry
            .world_mut("forest")
            .add(Box::new(SingleSoundSource::new("birds", "forest/birds.wav")), &clips);
        registry
            .world_mut("forest")
            .add(Box::new(SingleSoundSource::new("click", "forest/twig.wav")), &clips);
        registry.world_mut("cave").add(
            Box::new(RandomSoundSource::with_seed(
                "drip",
                ["cave/drip1.wav", "cave/drip2.wav"],
                3,
            )),
            &clips,
        );
        registry
    }

    fn clips() -> FakeClips {
        FakeClips::new(&[
            "ui/click.wav",
            "forest/birds.wav",
            "forest/twig.wav",
            "cave/drip1.wav",
            "cave/drip2.wav",
        ])
    }

    #[test]
    fn failing_sources_are_removed_from_their_pallet() {
        let clips = clips();
        let mut registry = registry();
        assert_eq!(registry.load_global(&clips), 1);
        assert!(!registry.global().contains("broken"));
        assert!(registry.global().is_loaded());
    }

    #[test]
    fn loading_a_world_unloads_the_others() {
        let clips = clips();
        let mut registry = registry();
        registry.load_world("forest", &clips);
        assert!(registry.world("forest").unwrap().is_loaded());
        assert!(registry.spawn("birds", false, None).is_some());

        registry.load_world("cave", &clips);
        assert_eq!(registry.current_world(), Some("cave"));
        assert!(!registry.world("forest").unwrap().is_loaded());
        assert!(registry.world("cave").unwrap().is_loaded());
        assert!(registry.spawn("birds", false, None).is_none());
        assert!(registry.spawn("drip", false, None).is_some());
    }

    #[test]
    fn spawn_prefers_the_global_pallet() {
        let clips = clips();
        let mut registry = registry();
        registry.load_global(&clips);
        registry.load_world("forest", &clips);
        let sound = registry.spawn("click", false, None).unwrap();
        // "ui/click.wav" is the first fake clip.
        assert_eq!(sound.clip.samples[0], 0.0);
    }

    #[test]
    fn unknown_worlds_load_nothing_but_become_current() {
        let clips = clips();
        let mut registry = registry();
        registry.load_world("forest", &clips);
        assert_eq!(registry.load_world("desert", &clips), 0);
        assert_eq!(registry.current_world(), Some("desert"));
        assert!(!registry.world("forest").unwrap().is_loaded());
    }

    #[test]
    fn unload_all_leaves_nothing_loaded() {
        let clips = clips();
        let mut registry = registry();
        registry.load_global(&clips);
        registry.load_world("cave", &clips);
        assert_eq!(registry.loaded_sources(), 2);
        registry.unload_all();
        assert_eq!(registry.loaded_sources(), 0);
        assert_eq!(registry.current_world(), None);
        assert!(registry.spawn("click", false, None).is_none());
    }

    #[test]
    fn sources_added_to_a_loaded_pallet_load_immediately() {
        let clips = clips();
        let mut registry = registry();
        registry.load_global(&clips);

        let added = registry
            .global_mut()
            .add(Box::new(SingleSoundSource::new("birds", "forest/birds.wav")), &clips);
        assert!(added);
        assert!(registry.global().source("birds").unwrap().is_loaded());
        assert!(registry.spawn("birds", false, None).is_some());
    }

    #[test]
    fn a_replacement_that_fails_to_load_keeps_the_original() {
        let clips = clips();
        let mut registry = registry();
        registry.load_global(&clips);

        let added = registry
            .global_mut()
            .add(Box::new(SingleSoundSource::new("click", "ui/missing.wav")), &clips);
        assert!(!added);
        let sound = registry.spawn("click", false, None).unwrap();
        assert_eq!(sound.clip.samples[0], 0.0);

        // Replacing with a loadable source swaps the clip.
        let added = registry
            .global_mut()
            .add(Box::new(SingleSoundSource::new("click", "forest/twig.wav")), &clips);
        assert!(added);
        let sound = registry.spawn("click", false, None).unwrap();
        assert_eq!(sound.clip.samples[0], 2.0);
        assert_eq!(registry.global().len(), 1);
    }
}
