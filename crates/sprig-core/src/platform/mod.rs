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

//! Platform capabilities the loader relies on.
//!
//! One concrete implementation of each trait is chosen at startup by the
//! host application. The loader never branches on the platform itself.

use crate::status::LoadStatus;

/// Hooks into platform services around a load.
///
/// Every method has a no-op default so desktop hosts can implement the trait
/// with an empty `impl` block.
pub trait Platform: Send + Sync {
    /// A short, human-readable platform name (used by splash texts).
    fn name(&self) -> &str {
        "Desktop"
    }

    /// Scheduling priority of the calling thread, if the platform exposes one.
    fn current_thread_priority(&self) -> Option<i32> {
        None
    }

    /// Applies a scheduling priority to the calling thread.
    fn set_current_thread_priority(&self, _priority: i32) {}

    /// Turns off any CPU speed-boost mode. Called once after a successful load.
    fn disable_speed_boost(&self) {}
}

/// A platform with no special capabilities.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPlatform;

impl Platform for NullPlatform {}

/// A loading screen rendered by the foreground thread while the worker runs.
pub trait LoadingScreen {
    /// Acquires display resources. Called once before the first frame.
    fn init(&mut self);

    /// Draws one frame. May read the status published by the worker.
    fn render(&mut self, status: &LoadStatus);

    /// Releases display resources. Called once after the worker is joined.
    fn cleanup(&mut self);
}

/// A loading screen that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessScreen;

impl LoadingScreen for HeadlessScreen {
    fn init(&mut self) {}

    fn render(&mut self, _status: &LoadStatus) {}

    fn cleanup(&mut self) {}
}
