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

//! Access to the storage devices a project can be read from.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A readable, seekable byte stream that can move to the worker thread.
pub trait ProjectStream: Read + Seek + Send {}

impl<T: Read + Seek + Send> ProjectStream for T {}

/// A storage backend the locator can open files on.
pub trait Storage: Send + Sync {
    /// Opens `path` for reading. A failure means the file is absent for the
    /// caller's purposes; it is never retried.
    fn open(&self, path: &Path) -> io::Result<Box<dyn ProjectStream>>;

    /// Turns a path that opened successfully into its fully qualified form.
    fn normalize(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// The local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileStorage;

impl Storage for FileStorage {
    fn open(&self, path: &Path) -> io::Result<Box<dyn ProjectStream>> {
        let file = File::open(path)?;
        if file.metadata()?.is_dir() {
            return Err(io::Error::other(format!(
                "'{}' is a directory",
                path.display()
            )));
        }
        Ok(Box::new(file))
    }

    fn normalize(&self, path: &Path) -> PathBuf {
        std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
    }
}

/// An in-memory storage that records every path it is asked to open.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: HashMap<PathBuf, Vec<u8>>,
    attempts: Mutex<Vec<PathBuf>>,
}

impl MemoryStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, replacing any previous contents.
    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_file(mut self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    /// Every path passed to [`Storage::open`], in call order.
    pub fn attempts(&self) -> Vec<PathBuf> {
        match self.attempts.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Forgets the recorded attempts.
    pub fn clear_attempts(&self) {
        match self.attempts.lock() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl Storage for MemoryStorage {
    fn open(&self, path: &Path) -> io::Result<Box<dyn ProjectStream>> {
        match self.attempts.lock() {
            Ok(mut guard) => guard.push(path.to_path_buf()),
            Err(poisoned) => poisoned.into_inner().push(path.to_path_buf()),
        }

        let bytes = self.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("'{}' does not exist", path.display()),
            )
        })?;
        Ok(Box::new(Cursor::new(bytes.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn memory_storage_records_attempts() {
        let storage = MemoryStorage::new().with_file("a/project.json", b"{}".to_vec());

        assert!(storage.open(Path::new("missing.sb3")).is_err());
        let mut stream = storage
            .open(Path::new("a/project.json"))
            .expect("file was inserted");
        let mut text = String::new();
        stream.read_to_string(&mut text).expect("readable");

        assert_eq!(text, "{}");
        assert_eq!(
            storage.attempts(),
            vec![PathBuf::from("missing.sb3"), PathBuf::from("a/project.json")]
        );
        storage.clear_attempts();
        assert!(storage.attempts().is_empty());
    }

    #[test]
    fn file_storage_rejects_directories() -> io::Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join("project.json"), b"{}")?;

        assert!(FileStorage.open(dir.path()).is_err());
        assert!(FileStorage.open(&dir.path().join("project.json")).is_ok());
        assert!(FileStorage.open(&dir.path().join("nope.sb3")).is_err());
        Ok(())
    }

    #[test]
    fn file_storage_normalizes_to_absolute_paths() {
        let normalized = FileStorage.normalize(Path::new("relative/MyGame.sb3"));
        assert!(normalized.is_absolute());
        assert!(normalized.ends_with("relative/MyGame.sb3"));
    }
}
