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

mod common;

use anyhow::Result;
use blammo_agents::ResourceManager;
use blammo_core::asset::{TextureDimension, TextureFilter};
use blammo_core::AssetError;
use common::Fixture;

const PROPS: &str = "resources/materials/props.mtl";
const WALL: &str = "resources/textures/wall.png";
const METAL: &str = "resources/textures/metal.png";
const LOCAL_CEL: &str = "resources/materials/cel.fx";
const CEL: &str = "resources/effects/cel.fx";
const DEFAULT: &str = "resources/effects/default.fx";
const GRADIENT: &str = "resources/textures/cel_gradient.png";

#[test]
fn libraries_load_without_a_mesh() -> Result<()> {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();

    // 1. Every material is acquired, references resolved next to the library.
    let materials = manager.get_materials(PROPS)?;
    assert_eq!(materials.keys().collect::<Vec<_>>(), ["crate", "glass"]);
    let crate_material = &materials["crate"];
    assert_eq!(crate_material.properties.diffuse, [0.7, 0.5, 0.3]);
    assert!(crate_material.texture.is_some());
    assert_eq!(
        crate_material.techniques.names().collect::<Vec<_>>(),
        ["Cel"]
    );
    assert_eq!(manager.texture_ref_count(WALL), Some(1));
    assert_eq!(manager.effect_ref_count(LOCAL_CEL), Some(1));

    // 2. Materials without an effect fall back to the default one.
    let glass = &materials["glass"];
    assert!(glass.texture.is_none());
    assert!((glass.properties.alpha - 0.25).abs() < 1e-6);
    assert_eq!(manager.effect_ref_count(DEFAULT), Some(1));

    // 3. Libraries are not cached: a second get takes new holders.
    let again = manager.get_materials(PROPS)?;
    assert_eq!(manager.texture_ref_count(WALL), Some(2));
    assert_eq!(manager.effect_ref_count(LOCAL_CEL), Some(2));

    manager.release_materials(materials);
    manager.release_materials(again);
    assert!(manager.cache_sizes().is_empty());
    assert!(manager.shutdown().is_clean());
    Ok(())
}

#[test]
fn a_failing_effect_gives_back_the_whole_library() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();

    // "fine" acquires metal.png and cel.fx before "haunted" fails.
    let error = manager
        .get_materials("resources/materials/cursed.mtl")
        .expect_err("effect is missing");
    match &error {
        AssetError::Dependency { key, source } => {
            assert_eq!(key.as_str(), "resources/materials/cursed.mtl");
            assert!(source.is_not_found());
        }
        other => panic!("expected a dependency error, got {other:?}"),
    }
    assert_eq!(manager.texture_ref_count(METAL), None);
    assert_eq!(manager.effect_ref_count(CEL), None);
    assert_eq!(manager.live_runtime_effects(), 0);
    assert!(manager.shutdown().is_clean());
}

#[test]
fn missing_and_empty_libraries_fail() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();

    let missing = manager
        .get_materials("resources/materials/nowhere.mtl")
        .expect_err("library is missing");
    assert!(missing.is_not_found());

    let empty = manager
        .get_materials("resources/materials/empty.mtl")
        .expect_err("library has no material");
    assert!(matches!(empty, AssetError::Parse { .. }));
    assert!(manager.cache_sizes().is_empty());
}

#[test]
fn the_cel_texture_loads_once_and_is_held_by_the_manager() -> Result<()> {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();
    assert_eq!(manager.texture_ref_count(GRADIENT), None);

    // 1. First use loads the gradient as a 1D nearest-filtered texture.
    let handle = manager.cel_shading_texture()?;
    let texture = manager.texture(handle).expect("cel texture is cached");
    assert_eq!(texture.dimension, TextureDimension::D1);
    assert_eq!(texture.filter(), TextureFilter::Nearest);
    assert_eq!(texture.width, 4);

    // 2. Later calls hand out the same handle without adding holders.
    assert_eq!(manager.cel_shading_texture()?, handle);
    assert_eq!(manager.texture_ref_count(GRADIENT), Some(1));
    assert_eq!(manager.stats().textures.loads, 1);

    // 3. The manager's own holder is not reported as a leak.
    assert!(manager.shutdown().is_clean());
    Ok(())
}

#[test]
fn a_missing_cel_gradient_is_retried_on_the_next_call() {
    let fixture = Fixture::new();
    let config = fixture
        .config()
        .with_cel_gradient("resources/textures/missing_gradient.png");
    let mut manager = ResourceManager::init(config).expect("init resource manager");

    let first = manager.cel_shading_texture().expect_err("gradient is missing");
    assert!(first.is_not_found());
    assert!(manager.cel_shading_texture().is_err());
    assert_eq!(manager.stats().textures.misses, 2);
    assert!(manager.shutdown().is_clean());
}
