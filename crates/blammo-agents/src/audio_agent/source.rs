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

use blammo_core::asset::AssetKey;
use blammo_core::AssetError;
use blammo_data::assets::SoundData;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Loads decoded clips for sound sources.
pub trait ClipProvider {
    /// Reads and decodes the clip stored under `key`.
    fn load_clip(&self, key: &AssetKey) -> Result<Arc<SoundData>, AssetError>;
}

/// A playable instance handed out by a sound source.
#[derive(Debug, Clone)]
pub struct Sound {
    /// Name of the source that spawned the sound.
    pub source: String,
    /// The clip to play.
    pub clip: Arc<SoundData>,
    /// Whether playback loops.
    pub looped: bool,
    /// World position for positional playback, `None` for non-positional sounds.
    pub position: Option<[f32; 3]>,
}

/// A named, loadable producer of sounds.
pub trait SoundSource: Send {
    /// The name sounds are spawned by.
    fn name(&self) -> &str;

    /// Returns `true` while the source's clips are in memory.
    fn is_loaded(&self) -> bool;

    /// Loads the source's clips. Loading an already loaded source does nothing.
    ///
    /// Returns `false` if the source could not be loaded, in which case it
    /// stays unloaded.
    fn load(&mut self, clips: &dyn ClipProvider) -> bool;

    /// Drops the source's clips.
    fn unload(&mut self);

    /// Creates a sound, or `None` if the source is not loaded.
    fn spawn_sound(&mut self, looped: bool, position: Option<[f32; 3]>) -> Option<Sound>;
}

/// A source playing a single clip.
pub struct SingleSoundSource {
    name: String,
    key: AssetKey,
    clip: Option<Arc<SoundData>>,
}

impl SingleSoundSource {
    /// Creates an unloaded source for one clip.
    pub fn new(name: impl Into<String>, key: impl Into<AssetKey>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            clip: None,
        }
    }
}

impl SoundSource for SingleSoundSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_loaded(&self) -> bool {
        self.clip.is_some()
    }

    fn load(&mut self, clips: &dyn ClipProvider) -> bool {
        if self.clip.is_some() {
            return true;
        }
        match clips.load_clip(&self.key) {
            Ok(clip) => {
                self.clip = Some(clip);
                true
            }
            Err(e) => {
                log::error!("Sound '{}': {}", self.name, e);
                false
            }
        }
    }

    fn unload(&mut self) {
        self.clip = None;
    }

    fn spawn_sound(&mut self, looped: bool, position: Option<[f32; 3]>) -> Option<Sound> {
        let clip = self.clip.clone()?;
        Some(Sound {
            source: self.name.clone(),
            clip,
            looped,
            position,
        })
    }
}

/// A source choosing uniformly at random among several clips on every spawn.
///
/// Loading is all or nothing: if any clip fails, the clips loaded so far
/// are dropped and the source stays unloaded.
pub struct RandomSoundSource {
    name: String,
    keys: Vec<AssetKey>,
    clips: Vec<Arc<SoundData>>,
    rng: StdRng,
}

impl RandomSoundSource {
    /// Creates an unloaded source over `keys`, seeded from the OS.
    pub fn new<K: Into<AssetKey>>(
        name: impl Into<String>,
        keys: impl IntoIterator<Item = K>,
    ) -> Self {
        Self::with_rng(name, keys, StdRng::from_entropy())
    }

    /// Creates an unloaded source with a fixed seed, for reproducible choices.
    pub fn with_seed<K: Into<AssetKey>>(
        name: impl Into<String>,
        keys: impl IntoIterator<Item = K>,
        seed: u64,
    ) -> Self {
        Self::with_rng(name, keys, StdRng::seed_from_u64(seed))
    }

    fn with_rng<K: Into<AssetKey>>(
        name: impl Into<String>,
        keys: impl IntoIterator<Item = K>,
        rng: StdRng,
    ) -> Self {
        Self {
            name: name.into(),
            keys: keys.into_iter().map(Into::into).collect(),
            clips: Vec::new(),
            rng,
        }
    }

    /// Number of clips the source chooses from.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the source has no clips to choose from.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl SoundSource for RandomSoundSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_loaded(&self) -> bool {
        !self.clips.is_empty()
    }

    fn load(&mut self, clips: &dyn ClipProvider) -> bool {
        if self.is_loaded() {
            return true;
        }
        if self.keys.is_empty() {
            log::error!("Sound '{}' has no clips to choose from", self.name);
            return false;
        }
        let mut loaded = Vec::with_capacity(self.keys.len());
        for key in &self.keys {
            match clips.load_clip(key) {
                Ok(clip) => loaded.push(clip),
                Err(e) => {
                    log::error!("Sound '{}': {}", self.name, e);
                    return false;
                }
            }
        }
        self.clips = loaded;
        true
    }

    fn unload(&mut self) {
        self.clips.clear();
    }

    fn spawn_sound(&mut self, looped: bool, position: Option<[f32; 3]>) -> Option<Sound> {
        if self.clips.is_empty() {
            return None;
        }
        let choice = self.rng.gen_range(0..self.clips.len());
        Some(Sound {
            source: self.name.clone(),
            clip: Arc::clone(&self.clips[choice]),
            looped,
            position,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves clips from memory and records every request.
    pub(crate) struct FakeClips {
        clips: HashMap<String, Arc<SoundData>>,
        pub(crate) requests: RefCell<Vec<String>>,
    }

    impl FakeClips {
        pub(crate) fn new(keys: &[&str]) -> Self {
            let clips = keys
                .iter()
                .enumerate()
                .map(|(i, key)| {
                    let clip = SoundData {
                        samples: vec![i as f32; 4],
                        channels: 1,
                        sample_rate: 8000,
                    };
                    (key.to_string(), Arc::new(clip))
                })
                .collect();
            Self {
                clips,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl ClipProvider for FakeClips {
        fn load_clip(&self, key: &AssetKey) -> Result<Arc<SoundData>, AssetError> {
            self.requests.borrow_mut().push(key.to_string());
            self.clips
                .get(key.as_str())
                .cloned()
                .ok_or_else(|| AssetError::NotFound(key.clone()))
        }
    }

    #[test]
    fn single_source_load_is_idempotent() {
        let clips = FakeClips::new(&["a.wav"]);
        let mut source = SingleSoundSource::new("blip", "a.wav");
        assert!(source.spawn_sound(false, None).is_none());
        assert!(source.load(&clips));
        assert!(source.load(&clips));
        assert_eq!(clips.requests.borrow().len(), 1);

        let sound = source.spawn_sound(true, Some([1.0, 2.0, 3.0])).unwrap();
        assert_eq!(sound.source, "blip");
        assert!(sound.looped);
        assert_eq!(sound.position, Some([1.0, 2.0, 3.0]));

        source.unload();
        assert!(!source.is_loaded());
        assert!(source.spawn_sound(false, None).is_none());
    }

    #[test]
    fn random_source_loads_all_or_nothing() {
        let clips = FakeClips::new(&["a.wav", "b.wav"]);
        let mut broken = RandomSoundSource::with_seed("hit", ["a.wav", "missing.wav", "b.wav"], 1);
        assert!(!broken.load(&clips));
        assert!(!broken.is_loaded());
        assert!(broken.spawn_sound(false, None).is_none());

        let mut empty = RandomSoundSource::with_seed("none", Vec::<&str>::new(), 1);
        assert!(!empty.load(&clips));
    }

    #[test]
    fn random_source_picks_every_clip_eventually() {
        let clips = FakeClips::new(&["a.wav", "b.wav", "c.wav"]);
        let mut source = RandomSoundSource::with_seed("step", ["a.wav", "b.wav", "c.wav"], 42);
        assert!(source.load(&clips));

        let mut seen = [false; 3];
        for _ in 0..200 {
            let sound = source.spawn_sound(false, None).unwrap();
            seen[sound.clip.samples[0] as usize] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn seeded_sources_repeat_their_choices() {
        let clips = FakeClips::new(&["a.wav", "b.wav", "c.wav"]);
        let keys = ["a.wav", "b.wav", "c.wav"];
        let mut first = RandomSoundSource::with_seed("x", keys, 7);
        let mut second = RandomSoundSource::with_seed("x", keys, 7);
        first.load(&clips);
        second.load(&clips);
        for _ in 0..20 {
            let a = first.spawn_sound(false, None).unwrap();
            let b = second.spawn_sound(false, None).unwrap();
            assert_eq!(a.clip.samples[0], b.clip.samples[0]);
        }
    }
}
