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

//! # Sprig Core
//!
//! Foundational crate containing the types, contracts, and bookkeeping shared
//! by every stage of the project loading pipeline.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod interpreter;
pub mod memory;
pub mod platform;
pub mod project;
pub mod status;

pub use config::{LoaderConfig, StoragePaths};
pub use error::LoadError;
pub use interpreter::{CloudSink, DiscardSprites, SpriteLoader};
pub use memory::{MemoryStats, MemoryTracker, TrackedBuffer};
pub use platform::{HeadlessScreen, LoadingScreen, NullPlatform, Platform};
pub use project::{
    is_archive_path, ManifestDocument, SourceDescriptor, SourceKind, ARCHIVE_EXTENSION,
    MANIFEST_ENTRY_NAME,
};
pub use status::{LoadCode, LoadStatus};
