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

use sprig_core::Platform;

/// Desktop platform. Threads keep the OS default priority and there is no
/// speed-boost mode to leave.
#[derive(Debug, Clone)]
pub struct DesktopPlatform {
    name: String,
}

impl DesktopPlatform {
    /// Creates a platform reporting `name` to splash texts.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Platform for DesktopPlatform {
    fn name(&self) -> &str {
        &self.name
    }

    fn disable_speed_boost(&self) {
        log::debug!("{}: no speed boost to disable", self.name);
    }
}
