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

//! The state of one project-loading session.
//!
//! A session owns everything the worker and the foreground share: the status
//! cell, the memory tracker, and the project remembered from the chooser.
//! Nothing about a load is process-global, so independent sessions can be
//! loaded one after another or side by side.

use sprig_core::{LoadStatus, MemoryTracker};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Shared state of a project load.
#[derive(Debug, Default)]
pub struct LoadSession {
    status: LoadStatus,
    memory: MemoryTracker,
    selected_project: Mutex<Option<PathBuf>>,
}

impl LoadSession {
    /// Creates a session with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session that remembers `path` as the chooser's selection.
    pub fn with_selected_project(path: impl Into<PathBuf>) -> Self {
        let session = Self::new();
        session.select_project(path);
        session
    }

    /// Remembers a project picked in the chooser. Relative paths are
    /// resolved against the user storage root at load time.
    pub fn select_project(&self, path: impl Into<PathBuf>) {
        self.write_selection(Some(path.into()));
    }

    /// Forgets the remembered project.
    pub fn clear_selection(&self) {
        self.write_selection(None);
    }

    /// The remembered project, if any.
    pub fn selected_project(&self) -> Option<PathBuf> {
        match self.selected_project.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replaces the selection with the fully qualified path the locator
    /// resolved, so later asset lookups skip the search.
    pub(crate) fn remember_resolved(&self, path: &Path) {
        self.write_selection(Some(path.to_path_buf()));
    }

    /// The status published by the worker.
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Bytes held by load buffers of this session.
    pub fn memory(&self) -> &MemoryTracker {
        &self.memory
    }

    fn write_selection(&self, selection: Option<PathBuf>) {
        match self.selected_project.lock() {
            Ok(mut guard) => *guard = selection,
            Err(poisoned) => *poisoned.into_inner() = selection,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_can_be_set_replaced_and_cleared() {
        let session = LoadSession::with_selected_project("MyGame.sb3");
        assert_eq!(session.selected_project(), Some(PathBuf::from("MyGame.sb3")));

        session.remember_resolved(Path::new("/sd/sprig/MyGame.sb3"));
        assert_eq!(
            session.selected_project(),
            Some(PathBuf::from("/sd/sprig/MyGame.sb3"))
        );

        session.clear_selection();
        assert_eq!(session.selected_project(), None);
    }
}
