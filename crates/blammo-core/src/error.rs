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

//! Error types shared by every layer of the resource cache.

use crate::asset::{AssetKey, TextureDimension};
use thiserror::Error;

/// Errors reported by resource lookups and cache operations.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Neither the override directory nor the archive holds the key.
    #[error("resource '{0}' not found")]
    NotFound(AssetKey),
    /// The bytes were found but could not be decoded.
    #[error("failed to parse '{key}': {reason}")]
    Parse {
        /// The resource that failed to parse.
        key: AssetKey,
        /// A human readable description of the failure.
        reason: String,
    },
    /// A resource required to build this one failed.
    #[error("dependency of '{key}' failed")]
    Dependency {
        /// The resource whose construction was aborted.
        key: AssetKey,
        /// The dependency's own failure.
        #[source]
        source: Box<AssetError>,
    },
    /// The texture is already cached with another dimensionality.
    #[error("texture '{key}' is cached as {cached}, requested as {requested}")]
    DimensionMismatch {
        /// The texture key.
        key: AssetKey,
        /// Dimensionality of the cached instance.
        cached: TextureDimension,
        /// Dimensionality asked for by the caller.
        requested: TextureDimension,
    },
    /// An I/O error while reading an archive or override file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The archive could not be mounted or is inconsistent.
    #[error("archive error: {0}")]
    Archive(String),
}

impl AssetError {
    /// Builds a [`AssetError::Parse`] from anything displayable.
    pub fn parse(key: &AssetKey, reason: impl std::fmt::Display) -> Self {
        AssetError::Parse {
            key: key.clone(),
            reason: reason.to_string(),
        }
    }

    /// Returns `true` for [`AssetError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, AssetError::NotFound(_))
    }
}
