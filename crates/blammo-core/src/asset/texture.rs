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

//! Defines the decoded texture asset and its sampling parameters.

use super::Asset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The dimensionality of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureDimension {
    /// A one-dimensional texture. The source image must be one pixel tall.
    D1,
    /// A two-dimensional texture.
    D2,
    /// A cube map built from a horizontal strip of six square faces.
    Cube,
}

impl fmt::Display for TextureDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextureDimension::D1 => "1D",
            TextureDimension::D2 => "2D",
            TextureDimension::Cube => "cube",
        };
        f.write_str(name)
    }
}

/// Defines the filtering mode used when the texture is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFilter {
    /// Point sampling, no mipmaps.
    Nearest,
    /// Linear magnification, nearest minification.
    Linear,
    /// Linear filtering within the nearest mip level.
    Bilinear,
    /// Linear filtering within and between mip levels.
    #[default]
    Trilinear,
}

impl fmt::Display for TextureFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextureFilter::Nearest => "nearest",
            TextureFilter::Linear => "linear",
            TextureFilter::Bilinear => "bilinear",
            TextureFilter::Trilinear => "trilinear",
        };
        f.write_str(name)
    }
}

/// Error returned when a filter name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFilter(pub String);

impl fmt::Display for UnknownFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown texture filter '{}'", self.0)
    }
}

impl std::error::Error for UnknownFilter {}

impl FromStr for TextureFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" | "point" => Ok(TextureFilter::Nearest),
            "linear" => Ok(TextureFilter::Linear),
            "bilinear" => Ok(TextureFilter::Bilinear),
            "trilinear" => Ok(TextureFilter::Trilinear),
            _ => Err(UnknownFilter(s.to_string())),
        }
    }
}

/// A decoded texture held in CPU memory.
///
/// Pixels are tightly packed RGBA8. A cube map stores its six faces as
/// consecutive layers in the order +X, -X, +Y, -Y, +Z, -Z, each
/// `width * height` texels.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    /// The key the texture was loaded from, kept for diagnostics.
    pub label: String,
    /// Width of one layer, in texels.
    pub width: u32,
    /// Height of one layer, in texels.
    pub height: u32,
    /// Number of layers: 1, or 6 for cube maps.
    pub layers: u32,
    /// RGBA8 texel data for all layers.
    pub pixels: Vec<u8>,
    /// The dimensionality the texture was built with.
    pub dimension: TextureDimension,
    filter: TextureFilter,
}

impl Asset for Texture {}

impl Texture {
    /// Creates a texture from already laid out RGBA8 layers.
    ///
    /// Returns `None` when the pixel buffer does not hold exactly
    /// `width * height * layers` texels.
    pub fn new(
        label: impl Into<String>,
        width: u32,
        height: u32,
        layers: u32,
        pixels: Vec<u8>,
        dimension: TextureDimension,
        filter: TextureFilter,
    ) -> Option<Self> {
        let expected = width as usize * height as usize * layers as usize * 4;
        if pixels.len() != expected {
            return None;
        }
        Some(Self {
            label: label.into(),
            width,
            height,
            layers,
            pixels,
            dimension,
            filter,
        })
    }

    /// The filter currently used to sample this texture.
    pub fn filter(&self) -> TextureFilter {
        self.filter
    }

    /// Changes the sampling filter. Every holder of the texture sees the change.
    pub fn set_filter(&mut self, filter: TextureFilter) {
        self.filter = filter;
    }

    /// Returns the RGBA8 texels of one layer.
    pub fn layer(&self, layer: u32) -> Option<&[u8]> {
        if layer >= self.layers {
            return None;
        }
        let size = self.width as usize * self.height as usize * 4;
        let start = layer as usize * size;
        self.pixels.get(start..start + size)
    }

    /// Returns the RGBA value of one texel of a layer.
    pub fn texel(&self, layer: u32, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let data = self.layer(layer)?;
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut texel = [0u8; 4];
        texel.copy_from_slice(&data[offset..offset + 4]);
        Some(texel)
    }
}
