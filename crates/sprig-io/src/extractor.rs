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

//! Turns a resolved project source into a parsed manifest.
//!
//! Archives are read whole into a tracked load buffer and decoded in memory;
//! the manifest entry is inflated into a second tracked block, parsed, and
//! released. Expanded projects are parsed straight from the manifest stream.
//! Whatever the outcome, the image loader is invoked once per extraction.

use crate::storage::ProjectStream;
use serde_json::Value;
use sprig_core::{
    CloudSink, LoadError, ManifestDocument, MemoryTracker, SourceDescriptor, SourceKind,
    TrackedBuffer, MANIFEST_ENTRY_NAME,
};
use std::io::{BufReader, Cursor, Read, Seek, SeekFrom};
use zip::result::ZipError;
use zip::ZipArchive;

/// An archive decoded in memory from a project load buffer.
pub type ProjectArchive<'a> = ZipArchive<Cursor<&'a [u8]>>;

/// Loads costume and sound images once the manifest has been extracted.
pub trait ImageLoader: Send + Sync {
    /// `archive` is `None` for expanded projects, whose images are loose
    /// files next to the manifest, and when the archive could not be decoded.
    fn load_images(&self, source: &SourceDescriptor, archive: Option<&mut ProjectArchive<'_>>);
}

/// An image loader that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SkipImages;

impl ImageLoader for SkipImages {
    fn load_images(&self, _source: &SourceDescriptor, _archive: Option<&mut ProjectArchive<'_>>) {}
}

/// Extracts and parses the manifest of one resolved project.
pub struct ManifestExtractor<'a> {
    memory: &'a MemoryTracker,
    images: &'a dyn ImageLoader,
    cloud: Option<&'a dyn CloudSink>,
}

impl<'a> ManifestExtractor<'a> {
    /// Creates an extractor that accounts its buffers to `memory`.
    pub fn new(memory: &'a MemoryTracker, images: &'a dyn ImageLoader) -> Self {
        Self {
            memory,
            images,
            cloud: None,
        }
    }

    /// Mirrors the raw manifest text into `sink` on every extraction.
    pub fn with_cloud_sink(mut self, sink: &'a dyn CloudSink) -> Self {
        self.cloud = Some(sink);
        self
    }

    /// Produces the manifest of `source` from its open `stream`.
    ///
    /// # Errors
    /// Fails when the stream cannot be read, the archive cannot be decoded,
    /// the manifest entry is missing, or the document is invalid or empty.
    pub fn extract(
        &self,
        source: &SourceDescriptor,
        stream: &mut dyn ProjectStream,
    ) -> Result<ManifestDocument, LoadError> {
        match source.kind {
            SourceKind::Unzipped => {
                let result = self.parse_manifest_stream(stream);
                self.images.load_images(source, None);
                result
            }
            SourceKind::Embedded | SourceKind::Unembedded => {
                self.extract_from_archive(source, stream)
            }
        }
    }

    fn parse_manifest_stream(
        &self,
        stream: &mut dyn ProjectStream,
    ) -> Result<ManifestDocument, LoadError> {
        stream.rewind()?;

        let value: Value = match self.cloud {
            Some(sink) => {
                let mut text = String::new();
                stream.read_to_string(&mut text)?;
                sink.store_project_json(&text);
                serde_json::from_str(&text)?
            }
            None => serde_json::from_reader(BufReader::new(stream))?,
        };

        non_empty(value)
    }

    fn extract_from_archive(
        &self,
        source: &SourceDescriptor,
        stream: &mut dyn ProjectStream,
    ) -> Result<ManifestDocument, LoadError> {
        log::info!("Reading project archive...");
        let buffer = match self.read_load_buffer(stream) {
            Ok(buffer) => buffer,
            Err(e) => {
                self.images.load_images(source, None);
                return Err(e);
            }
        };

        log::info!("Opening project archive...");
        let mut archive = match ZipArchive::new(Cursor::new(buffer.as_slice())) {
            Ok(archive) => archive,
            Err(e) => {
                self.images.load_images(source, None);
                return Err(LoadError::ArchiveDecode(e.to_string()));
            }
        };

        let result = self.read_manifest_entry(&mut archive);
        self.images.load_images(source, Some(&mut archive));
        result
    }

    fn read_load_buffer(
        &self,
        stream: &mut dyn ProjectStream,
    ) -> Result<TrackedBuffer<'a>, LoadError> {
        let size = stream.seek(SeekFrom::End(0))?;
        stream.rewind()?;

        let mut bytes = Vec::with_capacity(size as usize);
        stream.read_to_end(&mut bytes)?;
        Ok(TrackedBuffer::new(self.memory, bytes))
    }

    fn read_manifest_entry(
        &self,
        archive: &mut ProjectArchive<'_>,
    ) -> Result<ManifestDocument, LoadError> {
        log::info!("Extracting {MANIFEST_ENTRY_NAME}...");
        let mut entry = match archive.by_name(MANIFEST_ENTRY_NAME) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => {
                return Err(LoadError::EntryNotFound {
                    entry: MANIFEST_ENTRY_NAME.to_string(),
                })
            }
            Err(e) => return Err(LoadError::ArchiveDecode(e.to_string())),
        };

        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        let block = TrackedBuffer::new(self.memory, bytes);

        if let Some(sink) = self.cloud {
            sink.store_project_json(&String::from_utf8_lossy(&block));
        }

        log::info!("Parsing {MANIFEST_ENTRY_NAME}...");
        let value: Value = serde_json::from_slice(&block)?;
        drop(block);

        non_empty(value)
    }
}

fn non_empty(value: Value) -> Result<ManifestDocument, LoadError> {
    let document = ManifestDocument::new(value);
    if document.is_empty() {
        return Err(LoadError::DocumentEmpty);
    }
    Ok(document)
}
