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

//! Lists the project archives a chooser screen can offer.

use sprig_core::is_archive_path;
use std::path::Path;
use walkdir::WalkDir;

/// Returns the file names of the project archives directly inside `directory`.
///
/// Sub-directories are not searched. A missing directory, or a path that is
/// not a directory, yields an empty list. Entries that cannot be read are
/// logged and skipped.
pub fn list_projects(directory: &Path) -> Vec<String> {
    if !directory.exists() {
        log::warn!("Directory does not exist! {}", directory.display());
        return Vec::new();
    }

    if !directory.is_dir() {
        log::warn!("Path is not a directory! {}", directory.display());
        return Vec::new();
    }

    let mut projects: Vec<String> = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Failed to read directory entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_archive_path(entry.path()))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();

    projects.sort();
    projects
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn lists_only_top_level_archives() -> std::io::Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("b.sb3"), b"zip")?;
        fs::write(dir.path().join("a.sb3"), b"zip")?;
        fs::write(dir.path().join("notes.txt"), b"text")?;
        fs::create_dir(dir.path().join("folder.sb3"))?;
        fs::create_dir(dir.path().join("nested"))?;
        fs::write(dir.path().join("nested").join("deep.sb3"), b"zip")?;

        assert_eq!(list_projects(dir.path()), vec!["a.sb3", "b.sb3"]);
        Ok(())
    }

    #[test]
    fn missing_or_non_directory_paths_are_empty() -> std::io::Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("game.sb3");
        fs::write(&file, b"zip")?;

        assert!(list_projects(&dir.path().join("missing")).is_empty());
        assert!(list_projects(&file).is_empty());
        Ok(())
    }
}
