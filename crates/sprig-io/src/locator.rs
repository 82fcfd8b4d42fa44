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

//! Finds which storage location holds the project to load.
//!
//! The search is a fixed sequence of tiers and the first tier whose file opens
//! wins:
//!
//! 1. the expanded manifest bundled with the application,
//! 2. the project archive bundled with the application,
//! 3. the project remembered from the chooser, resolved against the user
//!    storage root. A selection ending in the archive extension is opened as an
//!    archive; anything else is a folder holding an expanded manifest.
//!
//! Without a remembered selection the outcome is [`Resolution::GoToChooser`].
//! Each tier attempts exactly one open, and a failed open means "absent".

use crate::storage::{ProjectStream, Storage};
use sprig_core::{
    is_archive_path, LoadError, SourceDescriptor, StoragePaths, MANIFEST_ENTRY_NAME,
};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// A located project together with the stream its manifest is read from.
pub struct ResolvedProject {
    /// Where the project lives and how to decode it.
    pub source: SourceDescriptor,
    /// The open stream: the archive for archive sources, the manifest file
    /// otherwise.
    pub stream: Box<dyn ProjectStream>,
}

impl fmt::Debug for ResolvedProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedProject")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// The outcome of [`ProjectLocator::resolve`].
#[derive(Debug)]
pub enum Resolution {
    /// A tier opened successfully.
    Found(ResolvedProject),
    /// A selection was remembered but its file did not open.
    NotFound {
        /// The path of the failed open.
        attempted: PathBuf,
        /// Why it failed.
        source: io::Error,
    },
    /// Nothing is bundled and nothing was selected.
    GoToChooser,
}

impl Resolution {
    /// Converts a [`Resolution::NotFound`] into the matching [`LoadError`].
    pub fn into_open_error(self) -> Option<LoadError> {
        match self {
            Resolution::NotFound { attempted, source } => Some(LoadError::StorageOpen {
                path: attempted,
                source,
            }),
            _ => None,
        }
    }
}

/// Searches the configured storage tiers for a project.
pub struct ProjectLocator<'a> {
    storage: &'a dyn Storage,
    paths: &'a StoragePaths,
}

impl<'a> ProjectLocator<'a> {
    /// Creates a locator over `storage` using the configured paths.
    pub fn new(storage: &'a dyn Storage, paths: &'a StoragePaths) -> Self {
        Self { storage, paths }
    }

    /// Runs the tier search. `selected` is the relative path remembered from
    /// the project chooser, if any.
    pub fn resolve(&self, selected: Option<&Path>) -> Resolution {
        let bundled_manifest = &self.paths.bundled_manifest;
        match self.storage.open(bundled_manifest) {
            Ok(stream) => {
                log::info!("Using bundled expanded project at '{}'", bundled_manifest.display());
                let folder = bundled_manifest.parent().unwrap_or(Path::new(""));
                return Resolution::Found(ResolvedProject {
                    source: SourceDescriptor::bundled_expanded(self.storage.normalize(folder)),
                    stream,
                });
            }
            Err(e) => log::info!("No unzipped project, trying embedded. ({e})"),
        }

        let bundled_archive = &self.paths.bundled_archive;
        match self.storage.open(bundled_archive) {
            Ok(stream) => {
                log::info!("Using bundled archive at '{}'", bundled_archive.display());
                return Resolution::Found(ResolvedProject {
                    source: SourceDescriptor::embedded(self.storage.normalize(bundled_archive)),
                    stream,
                });
            }
            Err(e) => log::info!("No embedded project, trying removable storage. ({e})"),
        }

        let Some(selected) = selected.filter(|path| !path.as_os_str().is_empty()) else {
            log::info!("No project selected.");
            return Resolution::GoToChooser;
        };

        let target = self.anchor(selected);
        if is_archive_path(selected) {
            match self.storage.open(&target) {
                Ok(stream) => Resolution::Found(ResolvedProject {
                    source: SourceDescriptor::unembedded(self.storage.normalize(&target)),
                    stream,
                }),
                Err(source) => {
                    log::error!("Couldn't find project archive '{}'", target.display());
                    Resolution::NotFound {
                        attempted: target,
                        source,
                    }
                }
            }
        } else {
            let manifest = target.join(MANIFEST_ENTRY_NAME);
            match self.storage.open(&manifest) {
                Ok(stream) => Resolution::Found(ResolvedProject {
                    source: SourceDescriptor::removable_expanded(self.storage.normalize(&target)),
                    stream,
                }),
                Err(source) => {
                    log::error!("Couldn't find project manifest '{}'", manifest.display());
                    Resolution::NotFound {
                        attempted: manifest,
                        source,
                    }
                }
            }
        }
    }

    /// Resolves a relative selection against the user storage root. Absolute
    /// selections, such as the normalized path remembered by an earlier load,
    /// are used as they are.
    fn anchor(&self, selected: &Path) -> PathBuf {
        if selected.is_absolute() {
            selected.to_path_buf()
        } else {
            self.paths.user_root.join(selected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use sprig_core::SourceKind;

    fn paths() -> StoragePaths {
        StoragePaths {
            bundled_manifest: PathBuf::from("romfs/project/project.json"),
            bundled_archive: PathBuf::from("romfs/project.sb3"),
            user_root: PathBuf::from("sd/sprig"),
        }
    }

    #[test]
    fn bundled_manifest_short_circuits_every_other_tier() {
        let paths = paths();
        let storage = MemoryStorage::new()
            .with_file("romfs/project/project.json", b"{\"a\":1}".to_vec())
            .with_file("romfs/project.sb3", b"zip".to_vec())
            .with_file("sd/sprig/MyGame.sb3", b"zip".to_vec());

        let resolution =
            ProjectLocator::new(&storage, &paths).resolve(Some(Path::new("MyGame.sb3")));

        let Resolution::Found(found) = resolution else {
            panic!("expected the bundled manifest to be found");
        };
        assert_eq!(found.source.kind, SourceKind::Unzipped);
        assert_eq!(found.source.base_path, PathBuf::from("romfs/project"));
        assert!(!found.source.is_expanded_on_removable_storage);
        assert_eq!(storage.attempts(), vec![paths.bundled_manifest.clone()]);
    }

    #[test]
    fn bundled_archive_is_second_tier() {
        let paths = paths();
        let storage = MemoryStorage::new()
            .with_file("romfs/project.sb3", b"zip".to_vec())
            .with_file("sd/sprig/MyGame.sb3", b"zip".to_vec());

        let resolution =
            ProjectLocator::new(&storage, &paths).resolve(Some(Path::new("MyGame.sb3")));

        let Resolution::Found(found) = resolution else {
            panic!("expected the bundled archive to be found");
        };
        assert_eq!(found.source, SourceDescriptor::embedded("romfs/project.sb3"));
        assert_eq!(
            storage.attempts(),
            vec![paths.bundled_manifest.clone(), paths.bundled_archive.clone()]
        );
    }

    #[test]
    fn no_selection_routes_to_chooser() {
        let paths = paths();
        let storage = MemoryStorage::new();
        let locator = ProjectLocator::new(&storage, &paths);

        assert!(matches!(locator.resolve(None), Resolution::GoToChooser));
        assert!(matches!(
            locator.resolve(Some(Path::new(""))),
            Resolution::GoToChooser
        ));
        assert_eq!(storage.attempts().len(), 4);
    }

    #[test]
    fn archive_selection_is_opened_as_unembedded() {
        let paths = paths();
        let storage = MemoryStorage::new().with_file("sd/sprig/MyGame.sb3", b"zip".to_vec());

        let resolution =
            ProjectLocator::new(&storage, &paths).resolve(Some(Path::new("MyGame.sb3")));

        let Resolution::Found(found) = resolution else {
            panic!("expected the selected archive to be found");
        };
        assert_eq!(found.source, SourceDescriptor::unembedded("sd/sprig/MyGame.sb3"));
    }

    #[test]
    fn archive_suffix_never_falls_back_to_folder_lookup() {
        let paths = paths();
        let storage =
            MemoryStorage::new().with_file("sd/sprig/MyGame.sb3/project.json", b"{}".to_vec());

        let resolution =
            ProjectLocator::new(&storage, &paths).resolve(Some(Path::new("MyGame.sb3")));

        match resolution {
            Resolution::NotFound { attempted, .. } => {
                assert_eq!(attempted, PathBuf::from("sd/sprig/MyGame.sb3"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert_eq!(storage.attempts().len(), 3);
    }

    #[test]
    fn folder_selection_reads_its_manifest() {
        let paths = paths();
        let storage =
            MemoryStorage::new().with_file("sd/sprig/MyGame/project.json", b"{}".to_vec());

        let resolution = ProjectLocator::new(&storage, &paths).resolve(Some(Path::new("MyGame")));

        let Resolution::Found(found) = resolution else {
            panic!("expected the folder manifest to be found");
        };
        assert_eq!(found.source, SourceDescriptor::removable_expanded("sd/sprig/MyGame"));
        assert_eq!(
            found.source.asset_path("costume.svg"),
            Some(PathBuf::from("sd/sprig/MyGame/costume.svg"))
        );
    }

    #[test]
    fn absolute_selection_is_not_re_anchored() {
        let paths = StoragePaths {
            user_root: PathBuf::from("/sd/sprig"),
            ..paths()
        };
        let storage =
            MemoryStorage::new().with_file("/sd/sprig/MyGame/project.json", b"{}".to_vec());

        let resolution =
            ProjectLocator::new(&storage, &paths).resolve(Some(Path::new("/sd/sprig/MyGame")));

        assert!(matches!(resolution, Resolution::Found(_)));
        assert_eq!(
            storage.attempts().last(),
            Some(&PathBuf::from("/sd/sprig/MyGame/project.json"))
        );
    }

    #[test]
    fn relative_selection_is_anchored_even_when_it_repeats_the_root() {
        let paths = StoragePaths {
            user_root: PathBuf::from("projects"),
            ..paths()
        };
        let storage =
            MemoryStorage::new().with_file("projects/projects/x/project.json", b"{}".to_vec());

        let resolution =
            ProjectLocator::new(&storage, &paths).resolve(Some(Path::new("projects/x")));

        let Resolution::Found(found) = resolution else {
            panic!("expected the nested folder to be found");
        };
        assert_eq!(
            found.source,
            SourceDescriptor::removable_expanded("projects/projects/x")
        );
    }

    #[test]
    fn missing_folder_manifest_reports_attempted_path() {
        let paths = paths();
        let storage = MemoryStorage::new();

        let resolution = ProjectLocator::new(&storage, &paths).resolve(Some(Path::new("MyGame")));

        let error = resolution
            .into_open_error()
            .expect("a missing manifest is an open failure");
        assert_eq!(error.code(), sprig_core::LoadCode::OpenFailed);
        assert!(error.to_string().contains("sd/sprig/MyGame/project.json"));
    }
}
