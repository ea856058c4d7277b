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

//! Bitmap font rasterization.

use anyhow::Context;
use blammo_core::asset::{
    AssetKey, FontSet, Glyph, Texture, TextureDimension, TextureFilter, GLYPH_COUNT,
};
use blammo_core::lane::{Lane, LaneKind};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::error::Error;

/// Glyphs per row and per column of a glyph sheet.
pub const GLYPH_GRID: u32 = 16;

/// Largest glyph atlas side, in pixels.
pub const MAX_ATLAS_SIZE: u32 = 16384;

/// Turns font file bytes into glyph atlases.
pub trait FontRasterizer: Lane {
    /// Rasterizes the font at each requested pixel height.
    fn rasterize(
        &self,
        key: &AssetKey,
        bytes: &[u8],
        heights: &[u32],
        filter: TextureFilter,
    ) -> Result<Vec<FontSet>, Box<dyn Error + Send + Sync>>;
}

/// A rasterizer for glyph sheets: images holding a 16x16 grid of equally
/// sized cells for code points 0-255, in row-major order.
///
/// Each requested height rescales the sheet so a cell is that many pixels
/// tall. A glyph's advance is the width of its visible pixels plus one pixel
/// of spacing; fully transparent cells advance by half a cell.
#[derive(Clone, Default)]
pub struct GlyphSheetRasterizer;

impl FontRasterizer for GlyphSheetRasterizer {
    fn rasterize(
        &self,
        key: &AssetKey,
        bytes: &[u8],
        heights: &[u32],
        filter: TextureFilter,
    ) -> Result<Vec<FontSet>, Box<dyn Error + Send + Sync>> {
        let sheet = image::load_from_memory(bytes)
            .context("Failed to decode glyph sheet")?
            .to_rgba8();
        let (width, height) = sheet.dimensions();
        if width == 0 || width % GLYPH_GRID != 0 || height == 0 || height % GLYPH_GRID != 0 {
            return Err(
                format!("glyph sheet is {width}x{height}, not a {GLYPH_GRID}x{GLYPH_GRID} grid")
                    .into(),
            );
        }
        let (cell_width, cell_height) = (width / GLYPH_GRID, height / GLYPH_GRID);

        let mut sets = Vec::with_capacity(heights.len());
        for &target in heights {
            if target == 0 {
                return Err("font height must be positive".into());
            }
            let scaled_width =
                ((cell_width as f32 * target as f32 / cell_height as f32).round() as u32).max(1);
            let (Some(atlas_width), Some(atlas_height)) = (
                scaled_width.checked_mul(GLYPH_GRID),
                target.checked_mul(GLYPH_GRID),
            ) else {
                return Err(format!("font height {target} is too large").into());
            };
            if atlas_width > MAX_ATLAS_SIZE || atlas_height > MAX_ATLAS_SIZE {
                return Err(format!(
                    "font height {target} needs a {atlas_width}x{atlas_height} atlas, over {MAX_ATLAS_SIZE}"
                )
                .into());
            }
            let atlas = if scaled_width == cell_width && target == cell_height {
                sheet.clone()
            } else {
                imageops::resize(&sheet, atlas_width, atlas_height, FilterType::Triangle)
            };
            let glyphs = measure_glyphs(&atlas, scaled_width, target);
            let texture = Texture::new(
                format!("{key}@{target}"),
                atlas_width,
                atlas_height,
                1,
                atlas.into_raw(),
                TextureDimension::D2,
                filter,
            )
            .context("glyph atlas has an inconsistent pixel buffer")?;
            sets.push(FontSet::new(target, texture, glyphs));
        }
        Ok(sets)
    }
}

impl Lane for GlyphSheetRasterizer {
    fn strategy_name(&self) -> &'static str {
        "GlyphSheetRasterizer"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Font
    }
}

fn measure_glyphs(atlas: &RgbaImage, cell_width: u32, cell_height: u32) -> Vec<Glyph> {
    (0..GLYPH_COUNT as u32)
        .map(|code| {
            let x = (code % GLYPH_GRID) * cell_width;
            let y = (code / GLYPH_GRID) * cell_height;
            let visible = (0..cell_width)
                .rev()
                .find(|&column| {
                    (0..cell_height).any(|row| atlas.get_pixel(x + column, y + row)[3] > 0)
                })
                .map(|column| column + 1);
            Glyph {
                x,
                y,
                width: cell_width,
                height: cell_height,
                advance: match visible {
                    Some(visible) => (visible + 1).min(cell_width),
                    None => (cell_width / 2).max(1),
                },
            }
        })
        .collect()
}
