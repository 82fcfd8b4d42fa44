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

//! The body of the loader worker thread.

use sprig_core::status::{PHASE_LOADING_SPRITES, PHASE_OPENING, PHASE_UNZIPPING};
use sprig_core::{LoadCode, LoadStatus, SourceKind};
use sprig_io::{ManifestExtractor, ProjectLocator, Resolution, ResolvedProject};

use crate::loader::ProjectLoader;
use crate::session::LoadSession;

/// Raises the completion flag when dropped, so the foreground loop ends even
/// if a collaborator panics on the worker.
struct CompletionGuard<'a> {
    status: &'a LoadStatus,
    finished: bool,
}

impl<'a> CompletionGuard<'a> {
    fn new(status: &'a LoadStatus) -> Self {
        Self {
            status,
            finished: false,
        }
    }

    fn finish(mut self, code: LoadCode, message: impl Into<String>) {
        self.status.finish(code, message);
        self.finished = true;
    }
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.status.finish(
                LoadCode::ParseFailed,
                "Project loader stopped unexpectedly",
            );
        }
    }
}

impl ProjectLoader {
    /// Resolves, extracts, and hands over the project of `session`.
    pub(crate) fn open_project(&self, session: &LoadSession) {
        let status = session.status();
        let guard = CompletionGuard::new(status);

        log::info!("{PHASE_OPENING}");
        status.publish_phase(PHASE_OPENING);

        let ResolvedProject { source, mut stream } = match self.open_file(session) {
            Resolution::Found(resolved) => resolved,
            Resolution::GoToChooser => {
                log::info!("Project chooser activated.");
                guard.finish(LoadCode::RoutedToChooser, "No project selected");
                return;
            }
            not_found => {
                let message = not_found
                    .into_open_error()
                    .map_or_else(|| "Failed to open project".to_string(), |e| e.to_string());
                log::error!("{message}");
                guard.finish(LoadCode::OpenFailed, message);
                return;
            }
        };

        log::info!("{PHASE_UNZIPPING}");
        status.publish_phase(PHASE_UNZIPPING);

        let mut extractor = ManifestExtractor::new(session.memory(), &*self.images);
        if let Some(cloud) = &self.cloud {
            extractor = extractor.with_cloud_sink(&**cloud);
        }

        let manifest = match extractor.extract(&source, &mut *stream) {
            Ok(manifest) => manifest,
            Err(e) => {
                log::error!("Failed to extract project manifest: {e}");
                guard.finish(LoadCode::ParseFailed, e.to_string());
                return;
            }
        };
        drop(stream);

        log::info!("{PHASE_LOADING_SPRITES}");
        status.publish_phase(PHASE_LOADING_SPRITES);

        if let Err(e) = self.sprites.load_sprites(manifest) {
            log::warn!("Sprite loader reported an error: {e:#}");
        }

        guard.finish(LoadCode::Succeeded, "Project loaded");
    }

    /// Runs the locator and remembers where the project was found.
    fn open_file(&self, session: &LoadSession) -> Resolution {
        let selected = session.selected_project();
        let locator = ProjectLocator::new(&*self.storage, &self.config.paths);
        let resolution = locator.resolve(selected.as_deref());

        if let Resolution::Found(resolved) = &resolution {
            let source = &resolved.source;
            if source.kind != SourceKind::Unzipped || source.is_expanded_on_removable_storage {
                session.remember_resolved(&source.base_path);
            }
        }

        resolution
    }
}
