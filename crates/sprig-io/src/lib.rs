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

//! I/O services for locating a project and extracting its manifest.

pub mod extractor;
pub mod listing;
pub mod locator;
pub mod storage;

pub use extractor::{ImageLoader, ManifestExtractor, ProjectArchive, SkipImages};
pub use listing::list_projects;
pub use locator::{ProjectLocator, Resolution, ResolvedProject};
pub use storage::{FileStorage, MemoryStorage, ProjectStream, Storage};
