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

//! Contracts towards the block interpreter that consumes a loaded project.

use crate::project::ManifestDocument;

/// Receives the parsed manifest once extraction has succeeded.
///
/// The document is handed over by value; the loader keeps no copy.
pub trait SpriteLoader: Send + Sync {
    /// Builds sprites and scripts from the manifest.
    ///
    /// An error is logged by the loader but does not turn a load into a
    /// failure.
    fn load_sprites(&self, manifest: ManifestDocument) -> anyhow::Result<()>;
}

/// Receives a verbatim copy of the manifest text, for cloud-variable sync.
pub trait CloudSink: Send + Sync {
    /// Stores the raw manifest text.
    fn store_project_json(&self, text: &str);
}

/// A sprite loader that discards the manifest.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardSprites;

impl SpriteLoader for DiscardSprites {
    fn load_sprites(&self, manifest: ManifestDocument) -> anyhow::Result<()> {
        log::debug!(
            "Discarding manifest with {} top-level members",
            manifest.as_value().as_object().map_or(0, |map| map.len())
        );
        Ok(())
    }
}
