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

//! Shared fixtures: a packed archive of small meshes, textures, effects,
//! fonts, and clips written to a temporary directory.

#![allow(dead_code)]

use blammo_agents::{LoaderSet, ResourceManager};
use blammo_core::asset::EffectId;
use blammo_core::lane::{Lane, LaneKind};
use blammo_io::{PackBuilder, ResourceConfig};
use blammo_lanes::asset_lane::{CompiledEffect, EffectRuntime, HostEffectRuntime};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const DEFAULT_FX: &str = r#"(techniques: [
    (name: "Default", passes: [(vertex: "default_vs", fragment: "default_fs")]),
])"#;

pub const CEL_FX: &str = r#"(techniques: [
    (name: "Cel", passes: [(vertex: "cel_vs", fragment: "cel_fs")]),
    (name: "Outline", passes: []),
])"#;

pub const BROKEN_FX: &str = r#"(techniques: [
    (name: "Nothing", passes: []),
])"#;

const QUAD: &str = "v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
";

pub fn robot_obj() -> String {
    format!("mtllib robot.mtl\n{QUAD}o body\nusemtl metal\nf 1 2 3\no head\nusemtl paint\nf 2 4 3\n")
}

pub const ROBOT_MTL: &str = "newmtl metal
Kd 0.6 0.6 0.6
map_Kd ../textures/metal.png
effect resources/effects/cel.fx
texture_filter nearest

newmtl paint
Kd 1 0 0
effect resources/effects/cel.fx
";

pub fn block_obj() -> String {
    format!("{QUAD}f 1 2 3\nf 2 4 3\n")
}

pub fn doomed_obj() -> String {
    format!("mtllib doomed.mtl\n{QUAD}usemtl a\nf 1 2 3\nusemtl b\nf 2 4 3\n")
}

pub const DOOMED_MTL: &str = "newmtl a
map_Kd ../textures/metal.png
effect resources/effects/cel.fx

newmtl b
effect resources/effects/missing.fx
";

pub fn untextured_obj() -> String {
    format!("mtllib untextured.mtl\n{QUAD}usemtl plain\nf 1 2 3\n")
}

pub const UNTEXTURED_MTL: &str = "newmtl plain
map_Kd nothing.png
";

pub const PROPS_MTL: &str = "newmtl crate
Kd 0.7 0.5 0.3
map_Kd ../textures/wall.png
effect cel.fx

newmtl glass
Kd 0.9 0.9 1
d 0.25
";

pub const CURSED_MTL: &str = "newmtl fine
map_Kd ../textures/metal.png
effect resources/effects/cel.fx

newmtl haunted
effect resources/effects/missing.fx
";

/// Encodes a solid-color PNG.
pub fn png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    png_from_fn(width, height, |_, _| color)
}

/// Encodes a PNG from a per-pixel function.
pub fn png_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| Rgba(f(x, y)));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    bytes
}

/// Encodes a mono 16-bit WAV clip.
pub fn wav(samples: &[i16]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut bytes = Vec::new();
    {
        let mut writer = hound::WavWriter::new(Cursor::new(&mut bytes), spec).expect("wav writer");
        for &sample in samples {
            writer.write_sample(sample).expect("write sample");
        }
        writer.finalize().expect("finalize wav");
    }
    bytes
}

/// A temporary game directory holding a packed archive under `dist/`.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    /// Packs the standard set of test resources.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let mut builder = PackBuilder::new();
        builder
            .add("resources/effects/default.fx", DEFAULT_FX)
            .add("resources/effects/cel.fx", CEL_FX)
            .add("resources/effects/broken.fx", BROKEN_FX)
            .add("resources/effects/garbage.fx", "(techniques: [")
            .add("resources/meshes/robot.obj", robot_obj())
            .add("resources/meshes/robot.mtl", ROBOT_MTL)
            .add("resources/meshes/block.obj", block_obj())
            .add("resources/meshes/doomed.obj", doomed_obj())
            .add("resources/meshes/doomed.mtl", DOOMED_MTL)
            .add("resources/meshes/untextured.obj", untextured_obj())
            .add("resources/meshes/untextured.mtl", UNTEXTURED_MTL)
            .add("resources/meshes/bad.obj", "v 0 zero 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n")
            .add("resources/textures/metal.png", png(2, 2, [90, 90, 100, 255]))
            .add("resources/textures/wall.png", png(4, 4, [200, 10, 10, 255]))
            .add("resources/textures/gradient.png", png_from_fn(4, 1, |x, _| [x as u8 * 60, 0, 0, 255]))
            .add(
                "resources/textures/sky.png",
                png_from_fn(12, 2, |x, _| [(x / 2) as u8, 0, 0, 255]),
            )
            .add("resources/textures/corrupt.png", "definitely not a png")
            .add(
                "resources/textures/cel_gradient.png",
                png_from_fn(4, 1, |x, _| {
                    let step = [64, 64, 160, 255][x as usize];
                    [step, step, step, 255]
                }),
            )
            .add("resources/materials/props.mtl", PROPS_MTL)
            .add("resources/materials/cel.fx", CEL_FX)
            .add("resources/materials/cursed.mtl", CURSED_MTL)
            .add("resources/materials/empty.mtl", "# no materials\n")
            .add(
                "resources/fonts/mono.png",
                png_from_fn(128, 128, |x, y| {
                    if (y / 8) * 16 + x / 8 == 65 && x % 8 < 5 {
                        [255, 255, 255, 255]
                    } else {
                        [0, 0, 0, 0]
                    }
                }),
            )
            .add("resources/sounds/click.wav", wav(&[0, 1000, -1000, 0]))
            .add("resources/sounds/step1.wav", wav(&[100; 8]))
            .add("resources/sounds/step2.wav", wav(&[200; 8]))
            .add("resources/sounds/noise.wav", "RIFF but not really");
        builder.write_to(dir.path().join("dist")).expect("write archive");
        Self { dir }
    }

    /// The configuration pointing at the fixture's archive, overrides off.
    pub fn config(&self) -> ResourceConfig {
        ResourceConfig::new(self.dir.path().join("dist"), self.dir.path()).with_override(false)
    }

    /// The override directory the fixture's base directory maps `resources` to.
    pub fn override_dir(&self) -> PathBuf {
        self.dir.path().join("mod")
    }

    /// A manager with the default lanes.
    pub fn manager(&self) -> ResourceManager {
        ResourceManager::init(self.config()).expect("init resource manager")
    }

    /// A manager whose effect runtime records its calls in `journal`.
    pub fn recording_manager(&self, journal: &Journal) -> ResourceManager {
        ResourceManager::init_with(
            self.config(),
            LoaderSet::default(),
            Box::new(RecordingRuntime {
                inner: HostEffectRuntime::new(),
                journal: journal.clone(),
            }),
        )
        .expect("init resource manager")
    }
}

/// A shared log of effect runtime calls.
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().expect("journal lock").clone()
    }

    fn push(&self, entry: String) {
        self.0.lock().expect("journal lock").push(entry);
    }
}

/// Wraps the host runtime and records every call.
pub struct RecordingRuntime {
    inner: HostEffectRuntime,
    journal: Journal,
}

impl Lane for RecordingRuntime {
    fn strategy_name(&self) -> &'static str {
        "RecordingRuntime"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Effect
    }
}

impl EffectRuntime for RecordingRuntime {
    fn compile(
        &mut self,
        key: &blammo_core::asset::AssetKey,
        source: &[u8],
    ) -> Result<CompiledEffect, Box<dyn std::error::Error + Send + Sync>> {
        let compiled = self.inner.compile(key, source)?;
        self.journal.push(format!("compile {}", compiled.id.0));
        Ok(compiled)
    }

    fn destroy(&mut self, id: EffectId) {
        self.journal.push(format!("destroy {}", id.0));
        self.inner.destroy(id);
    }

    fn live_effects(&self) -> usize {
        self.inner.live_effects()
    }

    fn shutdown(&mut self) {
        self.journal.push("shutdown".to_string());
        self.inner.shutdown();
    }
}
