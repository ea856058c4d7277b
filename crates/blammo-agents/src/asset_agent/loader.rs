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

//! The set of decoding lanes a resource manager loads with.

use blammo_lanes::asset_lane::{
    AssetLoaderLane, AudioDecoderLane, AudioLoaderLane, DecodedImage, FontRasterizer, GlyphSheetRasterizer,
    MeshLoaderLane, ObjLoaderLane, TextureLoaderLane,
};

/// One loader per asset kind.
///
/// The default set parses meshes as OBJ/MTL, decodes images with `image`,
/// rasterizes glyph-sheet fonts, and decodes audio with `hound`/`symphonia`.
pub struct LoaderSet {
    pub(crate) mesh: Box<dyn MeshLoaderLane>,
    pub(crate) image: Box<dyn AssetLoaderLane<DecodedImage>>,
    pub(crate) font: Box<dyn FontRasterizer>,
    pub(crate) audio: Box<dyn AudioDecoderLane>,
}

impl Default for LoaderSet {
    fn default() -> Self {
        Self {
            mesh: Box::new(ObjLoaderLane),
            image: Box::new(TextureLoaderLane),
            font: Box::new(GlyphSheetRasterizer),
            audio: Box::new(AudioLoaderLane::new()),
        }
    }
}

impl LoaderSet {
    /// Replaces the mesh loader.
    pub fn with_mesh_loader(mut self, lane: impl MeshLoaderLane + 'static) -> Self {
        self.mesh = Box::new(lane);
        self
    }

    /// Replaces the image decoder used for textures.
    pub fn with_image_loader(mut self, lane: impl AssetLoaderLane<DecodedImage> + 'static) -> Self {
        self.image = Box::new(lane);
        self
    }

    /// Replaces the font rasterizer.
    pub fn with_font_rasterizer(mut self, lane: impl FontRasterizer + 'static) -> Self {
        self.font = Box::new(lane);
        self
    }

    /// Replaces the audio decoder.
    pub fn with_audio_loader(mut self, lane: impl AudioDecoderLane + 'static) -> Self {
        self.audio = Box::new(lane);
        self
    }

    /// Strategy names of the lanes in use, for diagnostics.
    pub fn strategy_names(&self) -> [&'static str; 4] {
        [
            self.mesh.strategy_name(),
            self.image.strategy_name(),
            self.font.strategy_name(),
            self.audio.strategy_name(),
        ]
    }
}
