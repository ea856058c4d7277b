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

//! Defines the bitmap font asset produced by a font rasterizer.

use super::Texture;

/// Number of glyphs in a font set: one per code point 0-255.
pub const GLYPH_COUNT: usize = 256;

/// Placement and metrics of one glyph inside a font atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Glyph {
    /// Left edge of the glyph cell in the atlas, in texels.
    pub x: u32,
    /// Top edge of the glyph cell in the atlas, in texels.
    pub y: u32,
    /// Cell width, in texels.
    pub width: u32,
    /// Cell height, in texels.
    pub height: u32,
    /// Horizontal advance after drawing the glyph, in pixels.
    pub advance: u32,
}

/// A font rasterized at one pixel height.
///
/// Font sets are not cached. The caller owns every set it loads.
#[derive(Debug, Clone)]
pub struct FontSet {
    /// The requested pixel height.
    pub height: u32,
    /// The atlas holding every glyph.
    pub atlas: Texture,
    glyphs: Vec<Glyph>,
}

impl FontSet {
    /// Creates a font set. `glyphs` is indexed by code point and padded or
    /// truncated to [`GLYPH_COUNT`] entries.
    pub fn new(height: u32, atlas: Texture, mut glyphs: Vec<Glyph>) -> Self {
        glyphs.resize(GLYPH_COUNT, Glyph::default());
        Self {
            height,
            atlas,
            glyphs,
        }
    }

    /// Looks up the glyph for a character. Characters outside 0-255 have none.
    pub fn glyph(&self, c: char) -> Option<&Glyph> {
        self.glyphs.get(c as usize)
    }

    /// Width in pixels of a single line of text.
    pub fn measure(&self, text: &str) -> u32 {
        text.chars()
            .filter_map(|c| self.glyph(c))
            .map(|glyph| glyph.advance)
            .sum()
    }
}
