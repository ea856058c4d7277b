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

//! Defines the abstraction for resolving material libraries referenced by a mesh.

use blammo_core::asset::AssetKey;
use blammo_core::AssetError;
use blammo_io::ArchiveResolver;

/// A trait for resolving external files referenced from inside a mesh file.
pub trait MaterialLibraryResolver {
    /// The path segment naming the packaged resource tree.
    ///
    /// References that start with it are absolute; everything else is
    /// relative to the referencing file.
    fn resource_root(&self) -> &str;

    /// Reads the bytes of a resolved key.
    fn read(&self, key: &AssetKey) -> Result<Vec<u8>, AssetError>;

    /// Resolves a reference found in the file named by `from`.
    fn resolve_reference(&self, from: &AssetKey, reference: &str) -> AssetKey {
        from.resolve_reference(reference, self.resource_root())
    }
}

impl MaterialLibraryResolver for ArchiveResolver {
    fn resource_root(&self) -> &str {
        ArchiveResolver::resource_root(self)
    }

    fn read(&self, key: &AssetKey) -> Result<Vec<u8>, AssetError> {
        self.load_bytes(key)
    }
}
