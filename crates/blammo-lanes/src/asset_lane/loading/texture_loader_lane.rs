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

//! Texture decoding and layout.

use super::AssetLoaderLane;
use anyhow::Context;
use blammo_core::asset::{Asset, Texture, TextureDimension, TextureFilter};
use blammo_core::lane::{Lane, LaneKind};
use thiserror::Error;

/// An image decoded to tightly packed RGBA8, before it is laid out as a texture.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 pixel rows, top to bottom.
    pub pixels: Vec<u8>,
}

impl Asset for DecodedImage {}

/// A lane dedicated to decoding image files on the CPU.
#[derive(Clone, Default)]
pub struct TextureLoaderLane;

impl AssetLoaderLane<DecodedImage> for TextureLoaderLane {
    fn load(
        &self,
        bytes: &[u8],
    ) -> Result<DecodedImage, Box<dyn std::error::Error + Send + Sync + 'static>> {
        let img = image::load_from_memory(bytes).context("Failed to decode image from memory")?;

        // Convert to RGBA8 (keep in sRGB space)
        let rgba_img = img.to_rgba8();
        let (width, height) = rgba_img.dimensions();

        Ok(DecodedImage {
            width,
            height,
            pixels: rgba_img.into_raw(),
        })
    }
}

impl Lane for TextureLoaderLane {
    fn strategy_name(&self) -> &'static str {
        "ImageDecoder"
    }

    fn lane_kind(&self) -> LaneKind {
        LaneKind::Texture
    }
}

/// Reasons a decoded image cannot be laid out with the requested dimensionality.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextureBuildError {
    /// The image has no pixels.
    #[error("image is empty")]
    Empty,
    /// A 1D texture needs an image exactly one pixel tall.
    #[error("1D textures must be 1 pixel tall, image is {width}x{height}")]
    NotOneDimensional {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },
    /// A cube map needs a horizontal strip of six square faces.
    #[error("cube maps must be a 6:1 horizontal strip, image is {width}x{height}")]
    NotCubeStrip {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },
    /// The pixel buffer does not match the stated size.
    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BadPixelBuffer {
        /// Bytes expected from the dimensions.
        expected: usize,
        /// Bytes present.
        actual: usize,
    },
}

/// Lays a decoded image out as a texture of the requested dimensionality.
///
/// Cube maps are read from a horizontal strip whose width is six times its
/// height; the faces are taken left to right as +X, -X, +Y, -Y, +Z, -Z.
pub fn build_texture(
    label: &str,
    image: DecodedImage,
    dimension: TextureDimension,
    filter: TextureFilter,
) -> Result<Texture, TextureBuildError> {
    let DecodedImage {
        width,
        height,
        pixels,
    } = image;
    if width == 0 || height == 0 {
        return Err(TextureBuildError::Empty);
    }
    let expected = width as usize * height as usize * 4;
    if pixels.len() != expected {
        return Err(TextureBuildError::BadPixelBuffer {
            expected,
            actual: pixels.len(),
        });
    }

    let (layer_width, layers, pixels) = match dimension {
        TextureDimension::D1 if height != 1 => {
            return Err(TextureBuildError::NotOneDimensional { width, height });
        }
        TextureDimension::D1 | TextureDimension::D2 => (width, 1, pixels),
        TextureDimension::Cube => {
            if width != height * 6 {
                return Err(TextureBuildError::NotCubeStrip { width, height });
            }
            (height, 6, split_strip(&pixels, width, height))
        }
    };

    Texture::new(label, layer_width, height, layers, pixels, dimension, filter).ok_or(
        TextureBuildError::BadPixelBuffer {
            expected,
            actual: expected,
        },
    )
}

fn split_strip(pixels: &[u8], width: u32, face: u32) -> Vec<u8> {
    let row_bytes = width as usize * 4;
    let face_row_bytes = face as usize * 4;
    let mut out = Vec::with_capacity(pixels.len());
    for index in 0..6 {
        let start = index * face_row_bytes;
        for row in pixels.chunks_exact(row_bytes) {
            out.extend_from_slice(&row[start..start + face_row_bytes]);
        }
    }
    out
}
