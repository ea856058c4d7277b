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

//! # Blammo IO
//!
//! I/O services for the resource cache: mounting the pack archive, reading
//! the development override directory, resolving keys to bytes, building new
//! archives, and loading the resource configuration.

#![warn(missing_docs)]

pub mod config;
pub mod pack;
pub mod vfs;

pub use config::ResourceConfig;
pub use pack::PackBuilder;
pub use vfs::{ArchiveResolver, OverrideDir, PackArchive, PackError};
