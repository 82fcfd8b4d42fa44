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

//! Descriptions of where a project lives and what its manifest contains.

use serde_json::Value;
use std::path::{Path, PathBuf};

/// Name of the manifest entry inside a project archive, and of the manifest
/// file inside an expanded project folder.
pub const MANIFEST_ENTRY_NAME: &str = "project.json";

/// Suffix identifying a compressed project archive.
pub const ARCHIVE_EXTENSION: &str = ".sb3";

/// Returns `true` when `path` ends with the archive extension.
///
/// The comparison is a literal, case-sensitive suffix match on the path text.
pub fn is_archive_path(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(ARCHIVE_EXTENSION)
}

/// How the manifest of a resolved project has to be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// The manifest is a plain file next to loose asset files.
    Unzipped,
    /// A compressed archive shipped with the application.
    Embedded,
    /// A compressed archive selected by the user on removable storage.
    Unembedded,
}

impl SourceKind {
    /// Whether the manifest sits inside a compressed archive.
    pub fn is_archive(self) -> bool {
        !matches!(self, SourceKind::Unzipped)
    }
}

/// The outcome of project resolution: which decode strategy to use and the
/// path that subsequent reads are relative to.
///
/// For archives `base_path` is the archive file; for expanded projects it is
/// the folder holding the manifest and the loose assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Decode strategy.
    pub kind: SourceKind,
    /// Resolved archive file or project folder.
    pub base_path: PathBuf,
    /// Set for expanded projects found on removable storage.
    pub is_expanded_on_removable_storage: bool,
}

impl SourceDescriptor {
    /// An expanded project shipped with the application.
    pub fn bundled_expanded(folder: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::Unzipped,
            base_path: folder.into(),
            is_expanded_on_removable_storage: false,
        }
    }

    /// An archive shipped with the application.
    pub fn embedded(archive: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::Embedded,
            base_path: archive.into(),
            is_expanded_on_removable_storage: false,
        }
    }

    /// An archive selected on removable storage.
    pub fn unembedded(archive: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::Unembedded,
            base_path: archive.into(),
            is_expanded_on_removable_storage: false,
        }
    }

    /// An expanded project folder selected on removable storage.
    pub fn removable_expanded(folder: impl Into<PathBuf>) -> Self {
        Self {
            kind: SourceKind::Unzipped,
            base_path: folder.into(),
            is_expanded_on_removable_storage: true,
        }
    }

    /// Path of a loose asset belonging to an expanded project.
    ///
    /// Returns `None` for archives, whose assets are read through the archive
    /// handle instead.
    pub fn asset_path(&self, name: &str) -> Option<PathBuf> {
        match self.kind {
            SourceKind::Unzipped => Some(self.base_path.join(name)),
            SourceKind::Embedded | SourceKind::Unembedded => None,
        }
    }
}

/// The parsed project manifest.
///
/// A successful extraction never yields an empty document; see
/// [`ManifestDocument::is_empty`].
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument(Value);

impl ManifestDocument {
    /// Wraps a parsed value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// `true` for `null`, an object without members, or an empty array.
    pub fn is_empty(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::Object(map) => map.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Looks up a top-level member.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrows the underlying tree.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the document and returns the underlying tree.
    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for ManifestDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn archive_suffix_is_literal_and_case_sensitive() {
        assert!(is_archive_path(Path::new("MyGame.sb3")));
        assert!(is_archive_path(Path::new("games/nested/MyGame.sb3")));
        assert!(!is_archive_path(Path::new("MyGame.SB3")));
        assert!(!is_archive_path(Path::new("MyGame")));
        assert!(!is_archive_path(Path::new("MyGame.sb3/")));
    }

    #[test]
    fn asset_paths_only_exist_for_expanded_projects() {
        let expanded = SourceDescriptor::removable_expanded("/sd/MyGame");
        assert_eq!(
            expanded.asset_path("cat.svg"),
            Some(PathBuf::from("/sd/MyGame/cat.svg"))
        );
        assert!(expanded.is_expanded_on_removable_storage);

        let archive = SourceDescriptor::unembedded("/sd/MyGame.sb3");
        assert_eq!(archive.asset_path("cat.svg"), None);
        assert!(archive.kind.is_archive());
    }

    #[test]
    fn empty_documents_are_detected() {
        assert!(ManifestDocument::new(Value::Null).is_empty());
        assert!(ManifestDocument::new(json!({})).is_empty());
        assert!(ManifestDocument::new(json!([])).is_empty());
        assert!(!ManifestDocument::new(json!({ "targets": [] })).is_empty());
        assert!(!ManifestDocument::new(json!(3)).is_empty());
    }
}
