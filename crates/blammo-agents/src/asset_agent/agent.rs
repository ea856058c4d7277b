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

//! The resource manager: one reference-counted cache per asset kind behind a
//! single context object.
//!
//! Every `get_*` either finds the key in its cache and adds a holder, or
//! resolves the bytes, decodes them through the matching lane, and inserts
//! the result with one holder. Every `release_*` removes a holder and destroys
//! the asset with the last one. Meshes hold their material groups' effects
//! and textures through the same caches, so a mesh load acquires them and a
//! mesh destruction releases them.

use super::{AssetKind, CacheSizes, LeakReport, LeakedAsset, LoaderSet, ResourceStats};
use crate::audio_agent::{ClipProvider, Sound, SoundPalletRegistry, SoundSource};
use blammo_core::asset::{
    AssetKey, EffectHandle, FontSet, Material, MaterialGroup, Mesh, MeshHandle, ShaderEffect,
    Technique, TechniqueTable, Texture, TextureDimension, TextureFilter, TextureHandle,
};
use blammo_core::AssetError;
use blammo_data::assets::{Assets, Release, SoundData};
use blammo_io::{ArchiveResolver, ResourceConfig};
use blammo_lanes::asset_lane::{
    build_texture, AudioDecoderLane, EffectRuntime, HostEffectRuntime, MaterialDescription,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Loads clips through the resolver and the audio lane.
struct ResolverClips<'a> {
    resolver: &'a ArchiveResolver,
    decoder: &'a dyn AudioDecoderLane,
}

impl ClipProvider for ResolverClips<'_> {
    fn load_clip(&self, key: &AssetKey) -> Result<Arc<SoundData>, AssetError> {
        let bytes = self.resolver.load_bytes(key)?;
        let clip = self
            .decoder
            .decode(key, &bytes)
            .map_err(|e| AssetError::parse(key, e))?;
        log::debug!(
            "Decoded clip '{}' ({:.2}s, {} channels)",
            key,
            clip.duration_secs(),
            clip.channels
        );
        Ok(Arc::new(clip))
    }
}

fn log_failure(kind: AssetKind, key: &AssetKey, error: &AssetError) {
    match error {
        AssetError::NotFound(_) => log::warn!("Cannot load {} '{}': {}", kind, key, error),
        _ => log::error!("Cannot load {} '{}': {}", kind, key, error),
    }
}

/// The asset resource cache.
///
/// Create one with [`ResourceManager::init`] and pass it to whatever needs
/// assets. Tear it down with [`ResourceManager::shutdown`] to get the leak
/// report; dropping it runs the same teardown.
pub struct ResourceManager {
    config: ResourceConfig,
    resolver: ArchiveResolver,
    loaders: LoaderSet,
    meshes: Assets<Mesh>,
    textures: Assets<Texture>,
    effects: Assets<ShaderEffect>,
    sounds: SoundPalletRegistry,
    runtime: Box<dyn EffectRuntime>,
    cel_shading: Option<TextureHandle>,
    torn_down: bool,
    stats: ResourceStats,
}

impl ResourceManager {
    /// Mounts the configured archive and creates a manager with the default
    /// lanes and the host effect runtime.
    ///
    /// # Errors
    /// Returns [`AssetError::Archive`] if the archive is missing or corrupt.
    pub fn init(config: ResourceConfig) -> Result<Self, AssetError> {
        Self::init_with(
            config,
            LoaderSet::default(),
            Box::new(HostEffectRuntime::new()),
        )
    }

    /// Creates a manager with custom lanes and effect runtime.
    pub fn init_with(
        config: ResourceConfig,
        loaders: LoaderSet,
        runtime: Box<dyn EffectRuntime>,
    ) -> Result<Self, AssetError> {
        let resolver = ArchiveResolver::open(&config)?;
        log::info!(
            "Resource manager ready: archive '{}', lanes {:?}, effect runtime {}",
            config.archive_dir.display(),
            loaders.strategy_names(),
            runtime.strategy_name()
        );
        Ok(Self {
            config,
            resolver,
            loaders,
            meshes: Assets::new(),
            textures: Assets::new(),
            effects: Assets::new(),
            sounds: SoundPalletRegistry::new(),
            runtime,
            cel_shading: None,
            torn_down: false,
            stats: ResourceStats::default(),
        })
    }

    /// The configuration the manager was created with.
    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// The resolver used for every read.
    pub fn resolver(&self) -> &ArchiveResolver {
        &self.resolver
    }

    // --- Meshes ---

    /// Returns a handle to the mesh stored under `key`, loading it on a miss.
    ///
    /// Loading a mesh acquires the texture and effect of each of its material
    /// groups. A texture that cannot be loaded leaves its group untextured; an
    /// effect that cannot be loaded fails the whole mesh, and everything
    /// acquired for it is released again.
    pub fn get_mesh(&mut self, key: impl Into<AssetKey>) -> Result<MeshHandle, AssetError> {
        let key = key.into();
        if let Some(handle) = self.meshes.acquire(&key) {
            self.stats.meshes.hits += 1;
            return Ok(handle);
        }
        self.stats.meshes.misses += 1;
        match self.load_mesh(&key) {
            Ok(mesh) => {
                log::debug!("Loaded mesh '{}' with {} groups", key, mesh.groups.len());
                self.stats.meshes.loads += 1;
                Ok(self.meshes.insert(key, mesh))
            }
            Err(e) => {
                self.stats.meshes.failures += 1;
                log_failure(AssetKind::Mesh, &key, &e);
                Err(e)
            }
        }
    }

    fn load_mesh(&mut self, key: &AssetKey) -> Result<Mesh, AssetError> {
        let bytes = self.resolver.load_bytes(key)?;
        let description = self
            .loaders
            .mesh
            .load(key, &bytes, &self.resolver)
            .map_err(|e| AssetError::parse(key, e))?;

        let mut groups: BTreeMap<String, MaterialGroup> = BTreeMap::new();
        for group in description.groups {
            match self.acquire_material(key, &group.material) {
                Ok(material) => {
                    let group_name = group.material.name;
                    let group = MaterialGroup::new(material, group.geometry);
                    if let Some(replaced) = groups.insert(group_name, group) {
                        self.release_group(replaced);
                    }
                }
                Err(e) => {
                    for (_, acquired) in groups {
                        self.release_group(acquired);
                    }
                    return Err(AssetError::Dependency {
                        key: key.clone(),
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(Mesh {
            name: key.to_string(),
            groups,
        })
    }

    /// Acquires the texture and effect of one material on behalf of `owner`.
    ///
    /// A texture that cannot be loaded is skipped. An effect that cannot be
    /// loaded fails the material and its texture is released again.
    fn acquire_material(
        &mut self,
        owner: &AssetKey,
        description: &MaterialDescription,
    ) -> Result<Material, AssetError> {
        let texture = description.diffuse_texture.as_ref().and_then(|texture_key| {
            match self.get_texture(
                texture_key.clone(),
                description.texture_filter,
                TextureDimension::D2,
            ) {
                Ok(handle) => Some(handle),
                Err(e) => {
                    log::warn!(
                        "'{}', material '{}': continuing without texture: {}",
                        owner,
                        description.name,
                        e
                    );
                    None
                }
            }
        });

        let effect_key = description
            .effect
            .clone()
            .unwrap_or_else(|| self.config.default_effect.clone());
        match self.get_shader_effect(effect_key) {
            Ok((effect, techniques)) => Ok(Material {
                properties: description.properties,
                effect,
                techniques,
                texture,
            }),
            Err(e) => {
                if let Some(texture) = texture {
                    self.release_texture(texture);
                }
                Err(e)
            }
        }
    }

    fn release_group(&mut self, group: MaterialGroup) {
        let (material, _) = group.into_parts();
        self.release_material(material);
    }

    /// Releases one holder of a mesh. The last release destroys the mesh and
    /// releases the textures and effects of its groups.
    ///
    /// Returns `false`, changing nothing, for a handle the cache does not track.
    pub fn release_mesh(&mut self, handle: MeshHandle) -> bool {
        match self.meshes.release(handle) {
            Release::Untracked => {
                log::warn!("Release of untracked mesh handle {:?}", handle);
                false
            }
            Release::Retained { .. } => true,
            Release::Destroyed { key, asset } => {
                log::debug!("Destroyed mesh '{}'", key);
                self.stats.meshes.destroyed += 1;
                for (_, group) in asset.into_groups() {
                    self.release_group(group);
                }
                true
            }
        }
    }

    /// The mesh behind a handle.
    pub fn mesh(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(handle)
    }

    /// Number of holders of the mesh stored under `key`.
    pub fn mesh_ref_count(&self, key: impl Into<AssetKey>) -> Option<u32> {
        self.meshes.ref_count_by_key(&key.into())
    }

    // --- Material libraries ---

    /// Loads the material library stored under `key` on its own and acquires
    /// the texture and effect of every material in it.
    ///
    /// Libraries are not cached. Each call parses the file again and takes new
    /// holders, which [`ResourceManager::release_materials`] gives back. As
    /// with meshes, a missing texture is skipped and a failing effect fails
    /// the whole library.
    pub fn get_materials(
        &mut self,
        key: impl Into<AssetKey>,
    ) -> Result<BTreeMap<String, Material>, AssetError> {
        let key = key.into();
        let loaded = self.load_materials(&key);
        match &loaded {
            Ok(materials) => log::debug!(
                "Loaded material library '{}' with {} materials",
                key,
                materials.len()
            ),
            Err(AssetError::NotFound(_)) => log::warn!("Material library '{}' not found", key),
            Err(e) => log::error!("Cannot load material library '{}': {}", key, e),
        }
        loaded
    }

    fn load_materials(&mut self, key: &AssetKey) -> Result<BTreeMap<String, Material>, AssetError> {
        let bytes = self.resolver.load_bytes(key)?;
        let descriptions = self
            .loaders
            .mesh
            .load_materials(key, &bytes, &self.resolver)
            .map_err(|e| AssetError::parse(key, e))?;

        let mut materials = BTreeMap::new();
        for description in descriptions {
            match self.acquire_material(key, &description) {
                Ok(material) => {
                    if let Some(replaced) = materials.insert(description.name, material) {
                        self.release_material(replaced);
                    }
                }
                Err(e) => {
                    self.release_materials(materials);
                    return Err(AssetError::Dependency {
                        key: key.clone(),
                        source: Box::new(e),
                    });
                }
            }
        }
        Ok(materials)
    }

    /// Gives back the effect and texture held by one material.
    pub fn release_material(&mut self, material: Material) {
        self.release_shader_effect(material.effect);
        if let Some(texture) = material.texture {
            self.release_texture(texture);
        }
    }

    /// Gives back every holder taken by [`ResourceManager::get_materials`].
    pub fn release_materials(&mut self, materials: BTreeMap<String, Material>) {
        for (_, material) in materials {
            self.release_material(material);
        }
    }

    // --- Textures ---

    /// Returns a handle to the texture stored under `key`, loading it on a miss.
    ///
    /// The filter is applied when the texture is loaded. A hit keeps the
    /// cached filter and logs a warning if a different one was asked for; use
    /// [`ResourceManager::set_texture_filter`] to change it. A hit with a
    /// different dimensionality is refused.
    pub fn get_texture(
        &mut self,
        key: impl Into<AssetKey>,
        filter: TextureFilter,
        dimension: TextureDimension,
    ) -> Result<TextureHandle, AssetError> {
        let key = key.into();
        if let Some(handle) = self.textures.handle_of(&key) {
            if let Some(cached) = self.textures.get(handle) {
                if cached.dimension != dimension {
                    return Err(AssetError::DimensionMismatch {
                        key,
                        cached: cached.dimension,
                        requested: dimension,
                    });
                }
                if cached.filter() != filter {
                    log::warn!(
                        "Texture '{}' is cached with filter {}, ignoring request for {}",
                        key,
                        cached.filter(),
                        filter
                    );
                }
            }
            if let Some(handle) = self.textures.acquire(&key) {
                self.stats.textures.hits += 1;
                return Ok(handle);
            }
        }

        self.stats.textures.misses += 1;
        match self.load_texture(&key, filter, dimension) {
            Ok(texture) => {
                log::debug!(
                    "Loaded {} texture '{}' ({}x{}x{})",
                    dimension,
                    key,
                    texture.width,
                    texture.height,
                    texture.layers
                );
                self.stats.textures.loads += 1;
                Ok(self.textures.insert(key, texture))
            }
            Err(e) => {
                self.stats.textures.failures += 1;
                log_failure(AssetKind::Texture, &key, &e);
                Err(e)
            }
        }
    }

    fn load_texture(
        &self,
        key: &AssetKey,
        filter: TextureFilter,
        dimension: TextureDimension,
    ) -> Result<Texture, AssetError> {
        let bytes = self.resolver.load_bytes(key)?;
        let image = self
            .loaders
            .image
            .load(&bytes)
            .map_err(|e| AssetError::parse(key, e))?;
        build_texture(key.as_str(), image, dimension, filter).map_err(|e| AssetError::parse(key, e))
    }

    /// Releases one holder of a texture.
    ///
    /// Returns `false`, changing nothing, for a handle the cache does not track.
    pub fn release_texture(&mut self, handle: TextureHandle) -> bool {
        match self.textures.release(handle) {
            Release::Untracked => {
                log::warn!("Release of untracked texture handle {:?}", handle);
                false
            }
            Release::Retained { .. } => true,
            Release::Destroyed { key, .. } => {
                log::debug!("Destroyed texture '{}'", key);
                self.stats.textures.destroyed += 1;
                true
            }
        }
    }

    /// The step-function texture for cel shading: the configured gradient as
    /// a 1D texture with nearest filtering.
    ///
    /// Loaded on first use and held by the manager until teardown. Callers do
    /// not release the handle.
    pub fn cel_shading_texture(&mut self) -> Result<TextureHandle, AssetError> {
        if let Some(handle) = self.cel_shading {
            return Ok(handle);
        }
        let handle = self.get_texture(
            self.config.cel_gradient.clone(),
            TextureFilter::Nearest,
            TextureDimension::D1,
        )?;
        self.cel_shading = Some(handle);
        Ok(handle)
    }

    /// Changes the filter of a cached texture for every holder.
    ///
    /// Returns `false` for a handle the cache does not track.
    pub fn set_texture_filter(&mut self, handle: TextureHandle, filter: TextureFilter) -> bool {
        match self.textures.get_mut(handle) {
            Some(texture) => {
                texture.set_filter(filter);
                true
            }
            None => false,
        }
    }

    /// The texture behind a handle.
    pub fn texture(&self, handle: TextureHandle) -> Option<&Texture> {
        self.textures.get(handle)
    }

    /// Number of holders of the texture stored under `key`.
    pub fn texture_ref_count(&self, key: impl Into<AssetKey>) -> Option<u32> {
        self.textures.ref_count_by_key(&key.into())
    }

    // --- Shader effects ---

    /// Returns a handle to the effect stored under `key` together with a copy
    /// of its technique table, compiling the effect on a miss.
    ///
    /// Techniques the runtime reports as invalid are left out of the table. An
    /// effect with no valid technique is a parse failure.
    pub fn get_shader_effect(
        &mut self,
        key: impl Into<AssetKey>,
    ) -> Result<(EffectHandle, TechniqueTable), AssetError> {
        let key = key.into();
        if let Some(handle) = self.effects.acquire(&key) {
            if let Some(effect) = self.effects.get(handle) {
                self.stats.effects.hits += 1;
                return Ok((handle, effect.techniques.clone()));
            }
        }

        self.stats.effects.misses += 1;
        match self.compile_effect(&key) {
            Ok(effect) => {
                log::debug!(
                    "Compiled effect '{}' with techniques {:?}",
                    key,
                    effect.techniques.names().collect::<Vec<_>>()
                );
                self.stats.effects.loads += 1;
                let techniques = effect.techniques.clone();
                Ok((self.effects.insert(key, effect), techniques))
            }
            Err(e) => {
                self.stats.effects.failures += 1;
                log_failure(AssetKind::Effect, &key, &e);
                Err(e)
            }
        }
    }

    fn compile_effect(&mut self, key: &AssetKey) -> Result<ShaderEffect, AssetError> {
        let bytes = self.resolver.load_bytes(key)?;
        let compiled = self
            .runtime
            .compile(key, &bytes)
            .map_err(|e| AssetError::parse(key, e))?;

        let mut valid = Vec::with_capacity(compiled.techniques.len());
        for technique in compiled.techniques {
            match technique.invalid {
                Some(reason) => log::warn!(
                    "Effect '{}': skipping technique '{}': {}",
                    key,
                    technique.name,
                    reason
                ),
                None => valid.push(Technique {
                    name: technique.name,
                    index: technique.index,
                    effect: compiled.id,
                }),
            }
        }
        if valid.is_empty() {
            self.runtime.destroy(compiled.id);
            return Err(AssetError::parse(key, "effect has no valid technique"));
        }

        Ok(ShaderEffect {
            id: compiled.id,
            techniques: TechniqueTable::new(valid),
        })
    }

    /// Releases one holder of an effect. The last release destroys the
    /// compiled effect in the runtime.
    ///
    /// Returns `false`, changing nothing, for a handle the cache does not track.
    pub fn release_shader_effect(&mut self, handle: EffectHandle) -> bool {
        match self.effects.release(handle) {
            Release::Untracked => {
                log::warn!("Release of untracked effect handle {:?}", handle);
                false
            }
            Release::Retained { .. } => true,
            Release::Destroyed { key, asset } => {
                log::debug!("Destroyed effect '{}'", key);
                self.stats.effects.destroyed += 1;
                self.runtime.destroy(asset.id);
                true
            }
        }
    }

    /// The effect behind a handle.
    pub fn shader_effect(&self, handle: EffectHandle) -> Option<&ShaderEffect> {
        self.effects.get(handle)
    }

    /// Number of holders of the effect stored under `key`.
    pub fn effect_ref_count(&self, key: impl Into<AssetKey>) -> Option<u32> {
        self.effects.ref_count_by_key(&key.into())
    }

    // --- Uncached reads ---

    /// Rasterizes the font stored under `key` at each requested height.
    ///
    /// Fonts are not cached; the caller owns the returned sets.
    pub fn load_font(
        &self,
        key: impl Into<AssetKey>,
        heights: &[u32],
        filter: TextureFilter,
    ) -> Result<Vec<FontSet>, AssetError> {
        let key = key.into();
        let bytes = self.resolver.load_bytes(&key)?;
        self.loaders
            .font
            .rasterize(&key, &bytes, heights, filter)
            .map_err(|e| {
                let error = AssetError::parse(&key, e);
                log::error!("Cannot load font '{}': {}", key, error);
                error
            })
    }

    /// Reads the raw bytes stored under `key`, bypassing every cache.
    pub fn read_bytes(&self, key: impl Into<AssetKey>) -> Result<Vec<u8>, AssetError> {
        self.resolver.load_bytes(&key.into())
    }

    /// Reads and decodes a single audio clip, bypassing the pallets.
    pub fn load_sound_clip(&self, key: impl Into<AssetKey>) -> Result<Arc<SoundData>, AssetError> {
        self.clips().load_clip(&key.into())
    }

    // --- Sounds ---

    fn clips(&self) -> ResolverClips<'_> {
        ResolverClips {
            resolver: &self.resolver,
            decoder: self.loaders.audio.as_ref(),
        }
    }

    /// The sound pallets.
    pub fn sound_pallets(&self) -> &SoundPalletRegistry {
        &self.sounds
    }

    /// Registers a source in the global pallet, replacing one with the same
    /// name. If the pallet is already loaded the source is loaded now.
    ///
    /// Returns `false` if that load failed and the source was not added.
    pub fn add_global_sound(&mut self, source: Box<dyn SoundSource>) -> bool {
        let clips = ResolverClips {
            resolver: &self.resolver,
            decoder: self.loaders.audio.as_ref(),
        };
        self.sounds.global_mut().add(source, &clips)
    }

    /// Registers a source in the pallet of `world`, like
    /// [`ResourceManager::add_global_sound`].
    pub fn add_world_sound(&mut self, world: &str, source: Box<dyn SoundSource>) -> bool {
        let clips = ResolverClips {
            resolver: &self.resolver,
            decoder: self.loaders.audio.as_ref(),
        };
        self.sounds.world_mut(world).add(source, &clips)
    }

    /// Loads the global sound pallet. Returns the number of loaded sources.
    pub fn load_global_sounds(&mut self) -> usize {
        let clips = ResolverClips {
            resolver: &self.resolver,
            decoder: self.loaders.audio.as_ref(),
        };
        self.sounds.load_global(&clips)
    }

    /// Loads the pallet of `world` and unloads every other world's pallet.
    /// Returns the number of loaded sources.
    pub fn load_world_sounds(&mut self, world: &str) -> usize {
        let clips = ResolverClips {
            resolver: &self.resolver,
            decoder: self.loaders.audio.as_ref(),
        };
        self.sounds.load_world(world, &clips)
    }

    /// Unloads every sound pallet.
    pub fn unload_all_sounds(&mut self) {
        self.sounds.unload_all();
    }

    /// Spawns a sound from the global pallet or, failing that, the current
    /// world's pallet.
    pub fn spawn_sound(
        &mut self,
        name: &str,
        looped: bool,
        position: Option<[f32; 3]>,
    ) -> Option<Sound> {
        let sound = self.sounds.spawn(name, looped, position);
        if sound.is_none() {
            log::debug!("No loaded sound source named '{}'", name);
        }
        sound
    }

    // --- Introspection ---

    /// Number of live entries in each cache.
    pub fn cache_sizes(&self) -> CacheSizes {
        CacheSizes {
            meshes: self.meshes.len(),
            textures: self.textures.len(),
            effects: self.effects.len(),
            sound_sources: self.sounds.loaded_sources(),
        }
    }

    /// Lookup counters since the manager was created.
    pub fn stats(&self) -> ResourceStats {
        self.stats
    }

    /// Number of effects alive in the effect runtime.
    pub fn live_runtime_effects(&self) -> usize {
        self.runtime.live_effects()
    }

    // --- Teardown ---

    /// Tears the manager down and reports every asset that was never released.
    ///
    /// Sounds are unloaded and the cel-shading texture is released first.
    /// Leaked meshes are destroyed next, releasing their textures and
    /// effects, then the remaining effects and textures. The effect runtime
    /// is shut down last.
    pub fn shutdown(mut self) -> LeakReport {
        self.teardown()
    }

    fn teardown(&mut self) -> LeakReport {
        let mut report = LeakReport::default();
        if self.torn_down {
            return report;
        }
        self.torn_down = true;
        log::info!("Shutting down resource manager");

        self.sounds.unload_all();
        if let Some(handle) = self.cel_shading.take() {
            self.release_texture(handle);
        }

        for (key, mesh, ref_count) in self.meshes.drain() {
            log::error!("Leaked mesh '{}' ({} holders)", key, ref_count);
            report.leaks.push(LeakedAsset {
                kind: AssetKind::Mesh,
                key,
                ref_count,
            });
            for (_, group) in mesh.into_groups() {
                self.release_group(group);
            }
        }

        for (key, effect, ref_count) in self.effects.drain() {
            log::error!("Leaked shader effect '{}' ({} holders)", key, ref_count);
            self.runtime.destroy(effect.id);
            report.leaks.push(LeakedAsset {
                kind: AssetKind::Effect,
                key,
                ref_count,
            });
        }

        for (key, _texture, ref_count) in self.textures.drain() {
            log::error!("Leaked texture '{}' ({} holders)", key, ref_count);
            report.leaks.push(LeakedAsset {
                kind: AssetKind::Texture,
                key,
                ref_count,
            });
        }

        report.runtime_effects = self.runtime.live_effects();
        if report.runtime_effects > 0 {
            log::error!(
                "{} effects still alive in the runtime at shutdown",
                report.runtime_effects
            );
        }
        self.runtime.shutdown();

        if report.is_clean() {
            log::info!("Resource manager shut down cleanly");
        }
        report
    }
}

impl Drop for ResourceManager {
    fn drop(&mut self) {
        self.teardown();
    }
}
