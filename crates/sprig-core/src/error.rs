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

//! Defines the error taxonomy of the project loading pipeline.

use crate::status::LoadCode;
use std::path::PathBuf;
use thiserror::Error;

/// An error raised while opening or decoding a project.
///
/// Routing to the project chooser is not an error and has no variant here.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No storage tier produced a readable stream.
    #[error("Failed to open project at '{}': {source}", path.display())]
    StorageOpen {
        /// The last path that was attempted.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The archive header or central directory could not be decoded.
    #[error("Failed to decode project archive: {0}")]
    ArchiveDecode(String),
    /// The archive does not contain the manifest entry.
    #[error("Archive has no '{entry}' entry")]
    EntryNotFound {
        /// The entry name that was looked up.
        entry: String,
    },
    /// The manifest bytes are not a valid document.
    #[error("Failed to parse project manifest: {0}")]
    DocumentParse(#[from] serde_json::Error),
    /// The manifest parsed but has no members.
    #[error("Project manifest is empty")]
    DocumentEmpty,
    /// The stream could not be read.
    #[error("Failed to read project data: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// The code the worker publishes for this error.
    pub fn code(&self) -> LoadCode {
        match self {
            LoadError::StorageOpen { .. } => LoadCode::OpenFailed,
            LoadError::ArchiveDecode(_)
            | LoadError::EntryNotFound { .. }
            | LoadError::DocumentParse(_)
            | LoadError::DocumentEmpty
            | LoadError::Io(_) => LoadCode::ParseFailed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn errors_collapse_to_published_codes() {
        let open = LoadError::StorageOpen {
            path: PathBuf::from("sd/MyGame.sb3"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(open.code(), LoadCode::OpenFailed);
        assert!(open.to_string().contains("sd/MyGame.sb3"));

        let missing = LoadError::EntryNotFound {
            entry: "project.json".to_string(),
        };
        assert_eq!(missing.code(), LoadCode::ParseFailed);
        assert_eq!(LoadError::DocumentEmpty.code(), LoadCode::ParseFailed);
        assert_eq!(
            LoadError::ArchiveDecode("bad header".into()).code(),
            LoadCode::ParseFailed
        );
    }
}
