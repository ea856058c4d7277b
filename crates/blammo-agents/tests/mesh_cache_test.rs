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
use blammo_agents::AssetKind;
use blammo_core::asset::{MeshHandle, TextureDimension, TextureFilter};
use blammo_core::AssetError;
use common::Fixture;

const ROBOT: &str = "resources/meshes/robot.obj";
const METAL: &str = "resources/textures/metal.png";
const CEL: &str = "resources/effects/cel.fx";
const DEFAULT: &str = "resources/effects/default.fx";

#[test]
fn repeated_gets_share_one_entry() -> Result<()> {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();

    // 1. Two gets of the same key return the same handle.
    let first = manager.get_mesh(ROBOT)?;
    let second = manager.get_mesh(ROBOT)?;
    assert_eq!(first, second);
    assert_eq!(manager.mesh_ref_count(ROBOT), Some(2));
    assert_eq!(manager.cache_sizes().meshes, 1);

    // 2. Only the first get loaded anything.
    let stats = manager.stats().of(AssetKind::Mesh);
    assert_eq!((stats.hits, stats.misses, stats.loads), (1, 1, 1));

    // 3. The dependencies were acquired once.
    assert_eq!(manager.texture_ref_count(METAL), Some(1));

    assert!(manager.release_mesh(first));
    assert!(manager.release_mesh(second));
    assert!(manager.shutdown().is_clean());
    Ok(())
}

#[test]
fn last_release_destroys_and_the_next_get_reloads() -> Result<()> {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();

    let handle = manager.get_mesh(ROBOT)?;
    assert!(manager.release_mesh(handle));
    assert_eq!(manager.mesh_ref_count(ROBOT), None);
    assert!(manager.mesh(handle).is_none());
    assert!(manager.cache_sizes().is_empty());

    // The stale handle is no longer tracked.
    assert!(!manager.release_mesh(handle));

    let reloaded = manager.get_mesh(ROBOT)?;
    assert_ne!(reloaded, handle);
    assert_eq!(manager.stats().meshes.loads, 2);
    assert_eq!(manager.stats().meshes.destroyed, 1);
    manager.release_mesh(reloaded);
    Ok(())
}

#[test]
fn releasing_an_untracked_handle_changes_nothing() -> Result<()> {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();
    let held = manager.get_mesh(ROBOT)?;
    let before = manager.cache_sizes();

    assert!(!manager.release_mesh(MeshHandle::from_raw(42, 7)));
    assert_eq!(manager.cache_sizes(), before);
    assert_eq!(manager.mesh_ref_count(ROBOT), Some(1));

    manager.release_mesh(held);
    Ok(())
}

#[test]
fn mesh_groups_hold_their_textures_and_effects() -> Result<()> {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();

    // 1. Load the robot: two groups, both rendering with cel.fx.
    let handle = manager.get_mesh(ROBOT)?;
    let mesh = manager.mesh(handle).expect("mesh is cached");
    assert_eq!(mesh.name, ROBOT);
    assert_eq!(mesh.groups.len(), 2);
    let metal = mesh.group("metal").expect("metal group");
    let paint = mesh.group("paint").expect("paint group");

    // 2. Both groups share one effect entry and one technique table.
    assert_eq!(metal.effect, paint.effect);
    assert_eq!(metal.techniques, paint.techniques);
    assert_eq!(metal.techniques.names().collect::<Vec<_>>(), vec!["Cel"]);
    assert_eq!(manager.effect_ref_count(CEL), Some(2));
    assert_eq!(manager.effect_ref_count(DEFAULT), None);

    // 3. Only the metal group is textured, with its material's filter.
    let texture = metal.texture.expect("metal is textured");
    assert!(paint.texture.is_none());
    assert_eq!(manager.texture_ref_count(METAL), Some(1));
    let cached = manager.texture(texture).expect("texture is cached");
    assert_eq!((cached.width, cached.height), (2, 2));
    assert_eq!(cached.filter(), TextureFilter::Nearest);

    // 4. Destroying the mesh releases both.
    assert!(manager.release_mesh(handle));
    assert_eq!(manager.texture_ref_count(METAL), None);
    assert_eq!(manager.effect_ref_count(CEL), None);
    assert_eq!(manager.live_runtime_effects(), 0);
    Ok(())
}

#[test]
fn dependencies_outlive_the_mesh_while_held_elsewhere() -> Result<()> {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();

    let texture = manager.get_texture(METAL, TextureFilter::Nearest, TextureDimension::D2)?;
    let mesh = manager.get_mesh(ROBOT)?;
    assert_eq!(manager.texture_ref_count(METAL), Some(2));

    manager.release_mesh(mesh);
    assert_eq!(manager.texture_ref_count(METAL), Some(1));
    assert!(manager.texture(texture).is_some());

    manager.release_texture(texture);
    assert!(manager.cache_sizes().is_empty());
    Ok(())
}

#[test]
fn materials_without_an_effect_use_the_default_effect() -> Result<()> {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();

    let handle = manager.get_mesh("resources/meshes/block.obj")?;
    let mesh = manager.mesh(handle).expect("mesh is cached");
    let group = mesh.group("default").expect("default material group");
    assert_eq!(group.geometry.triangle_count(), 2);
    assert!(group.texture.is_none());
    assert_eq!(group.techniques.names().collect::<Vec<_>>(), vec!["Default"]);
    assert_eq!(manager.effect_ref_count(DEFAULT), Some(1));

    manager.release_mesh(handle);
    Ok(())
}

#[test]
fn a_missing_texture_leaves_its_group_untextured() -> Result<()> {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();

    let handle = manager.get_mesh("resources/meshes/untextured.obj")?;
    let mesh = manager.mesh(handle).expect("mesh is cached");
    assert!(mesh.group("plain").expect("plain group").texture.is_none());
    assert_eq!(manager.cache_sizes().textures, 0);
    assert_eq!(manager.stats().textures.failures, 1);

    manager.release_mesh(handle);
    Ok(())
}

#[test]
fn a_missing_mesh_is_not_found_and_caches_nothing() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();
    let before = manager.cache_sizes();

    let error = manager
        .get_mesh("resources/meshes/missing.obj")
        .expect_err("mesh does not exist");
    assert!(matches!(error, AssetError::NotFound(ref key) if key.as_str() == "resources/meshes/missing.obj"));
    assert!(error.is_not_found());
    assert_eq!(manager.cache_sizes(), before);
    assert_eq!(manager.stats().meshes.failures, 1);
}

#[test]
fn malformed_geometry_is_a_parse_error() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();

    let error = manager
        .get_mesh("resources/meshes/bad.obj")
        .expect_err("geometry is malformed");
    assert!(matches!(error, AssetError::Parse { .. }));
    assert_eq!(manager.mesh_ref_count("resources/meshes/bad.obj"), None);
    assert!(manager.cache_sizes().is_empty());
}

#[test]
fn an_effect_failure_rolls_back_every_acquired_dependency() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();

    // 1. Material "a" acquires metal.png and cel.fx, then "b" fails on a
    //    missing effect.
    let error = manager
        .get_mesh("resources/meshes/doomed.obj")
        .expect_err("effect is missing");
    match &error {
        AssetError::Dependency { key, source } => {
            assert_eq!(key.as_str(), "resources/meshes/doomed.obj");
            assert!(source.is_not_found());
        }
        other => panic!("expected a dependency error, got {other:?}"),
    }

    // 2. Nothing acquired along the way is still held.
    assert!(manager.cache_sizes().is_empty());
    assert_eq!(manager.texture_ref_count(METAL), None);
    assert_eq!(manager.effect_ref_count(CEL), None);
    assert_eq!(manager.live_runtime_effects(), 0);
    assert!(manager.shutdown().is_clean());
}

#[test]
fn overlays_tint_one_consumer_without_touching_the_cached_mesh() -> Result<()> {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();
    let handle = manager.get_mesh(ROBOT)?;
    let mesh = manager.mesh(handle).expect("mesh is cached");

    let mut ghost = mesh.overlay();
    ghost.set_alpha(0.25);
    let plain = mesh.overlay();

    let ghosted = ghost.resolve(mesh, "paint").expect("paint group");
    let untouched = plain.resolve(mesh, "paint").expect("paint group");
    assert!((ghosted.alpha - 0.25).abs() < 1e-6);
    assert!((untouched.alpha - 1.0).abs() < 1e-6);
    assert_eq!(
        mesh.group("paint").expect("paint group").properties,
        untouched
    );

    manager.release_mesh(handle);
    Ok(())
}
