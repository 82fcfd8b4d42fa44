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

//! Loader configuration.
//!
//! Every field has a default so a partial configuration file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where the locator looks for projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoragePaths {
    /// Expanded manifest shipped with the application.
    pub bundled_manifest: PathBuf,
    /// Project archive shipped with the application.
    pub bundled_archive: PathBuf,
    /// Root of the user's removable storage; the remembered selection is
    /// resolved against it.
    pub user_root: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self {
            bundled_manifest: PathBuf::from("romfs/project/project.json"),
            bundled_archive: PathBuf::from("romfs/project.sb3"),
            user_root: PathBuf::from("projects"),
        }
    }
}

/// Settings for one project loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Candidate storage locations.
    pub paths: StoragePaths,
    /// Render loading-screen frames while waiting. When `false` the
    /// foreground loop only yields.
    pub render_loading_frames: bool,
    /// Pause between two rendered frames, in milliseconds.
    pub frame_interval_ms: u64,
    /// Stack size of the worker thread, in bytes.
    pub worker_stack_size: usize,
    /// Worker priority relative to the caller's.
    pub worker_priority_offset: i32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            paths: StoragePaths::default(),
            render_loading_frames: true,
            frame_interval_ms: 16,
            worker_stack_size: 256 * 1024,
            worker_priority_offset: 1,
        }
    }
}

impl LoaderConfig {
    /// The pause between two rendered frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: LoaderConfig =
            serde_json::from_str(r#"{ "paths": { "user_root": "/sd/sprig" }, "frame_interval_ms": 5 }"#)
                .expect("valid config");

        assert_eq!(config.paths.user_root, PathBuf::from("/sd/sprig"));
        assert_eq!(
            config.paths.bundled_archive,
            StoragePaths::default().bundled_archive
        );
        assert_eq!(config.frame_interval(), Duration::from_millis(5));
        assert!(config.render_loading_frames);
        assert_eq!(config.worker_priority_offset, 1);
    }
}
