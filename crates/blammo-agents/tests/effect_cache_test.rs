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
use blammo_core::asset::EffectHandle;
use blammo_core::AssetError;
use common::{Fixture, Journal};

const CEL: &str = "resources/effects/cel.fx";

#[test]
fn invalid_techniques_are_left_out_of_the_table() -> Result<()> {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();

    let (handle, techniques) = manager.get_shader_effect(CEL)?;
    assert_eq!(techniques.len(), 1);
    let cel = techniques.get("Cel").expect("Cel technique");
    assert_eq!(cel.index, 0);
    assert!(techniques.get("Outline").is_none());

    let effect = manager.shader_effect(handle).expect("effect is cached");
    assert_eq!(cel.effect, effect.id);
    assert_eq!(effect.techniques, techniques);

    manager.release_shader_effect(handle);
    Ok(())
}

#[test]
fn hits_share_the_compiled_effect() -> Result<()> {
    let fixture = Fixture::new();
    let journal = Journal::default();
    let mut manager = fixture.recording_manager(&journal);

    let (first, first_table) = manager.get_shader_effect(CEL)?;
    let (second, second_table) = manager.get_shader_effect(CEL)?;
    assert_eq!(first, second);
    assert_eq!(first_table, second_table);
    assert_eq!(manager.effect_ref_count(CEL), Some(2));
    assert_eq!(journal.entries(), vec!["compile 0"]);

    // The runtime only sees the destroy once the last holder lets go.
    manager.release_shader_effect(first);
    assert_eq!(manager.live_runtime_effects(), 1);
    manager.release_shader_effect(second);
    assert_eq!(manager.live_runtime_effects(), 0);
    assert_eq!(journal.entries(), vec!["compile 0", "destroy 0"]);
    Ok(())
}

#[test]
fn an_effect_without_valid_techniques_fails_and_is_destroyed() {
    let fixture = Fixture::new();
    let journal = Journal::default();
    let mut manager = fixture.recording_manager(&journal);

    let error = manager
        .get_shader_effect("resources/effects/broken.fx")
        .expect_err("no valid technique");
    assert!(matches!(error, AssetError::Parse { .. }));
    assert_eq!(manager.cache_sizes().effects, 0);
    assert_eq!(manager.live_runtime_effects(), 0);
    assert_eq!(journal.entries(), vec!["compile 0", "destroy 0"]);
}

#[test]
fn unparsable_sources_create_no_entry() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();

    let error = manager
        .get_shader_effect("resources/effects/garbage.fx")
        .expect_err("source is malformed");
    assert!(matches!(error, AssetError::Parse { ref key, .. } if key.as_str() == "resources/effects/garbage.fx"));
    assert_eq!(manager.effect_ref_count("resources/effects/garbage.fx"), None);
    assert_eq!(manager.live_runtime_effects(), 0);
    assert_eq!(manager.stats().effects.failures, 1);
}

#[test]
fn missing_effects_are_not_found() {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();
    let error = manager
        .get_shader_effect("resources/effects/missing.fx")
        .expect_err("effect does not exist");
    assert!(error.is_not_found());
}

#[test]
fn releasing_an_unknown_effect_handle_is_refused() -> Result<()> {
    let fixture = Fixture::new();
    let mut manager = fixture.manager();
    let (handle, _) = manager.get_shader_effect(CEL)?;

    assert!(!manager.release_shader_effect(EffectHandle::from_raw(5, 3)));
    assert_eq!(manager.effect_ref_count(CEL), Some(1));

    assert!(manager.release_shader_effect(handle));
    assert!(!manager.release_shader_effect(handle));
    Ok(())
}
