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

//! Drives a project load on a background thread.
//!
//! [`ProjectLoader::load`] spawns one worker that resolves the project,
//! extracts its manifest, and hands it to the sprite loader, while the calling
//! thread renders a loading screen. The only state crossing the two threads is
//! the [`LoadStatus`](sprig_core::LoadStatus) inside the [`LoadSession`].

mod loader;
mod session;
mod worker;

pub use loader::ProjectLoader;
pub use session::LoadSession;
