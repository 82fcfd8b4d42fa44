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

//! Splash lines shown on the loading screen.

use std::fs;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Shown when no splash line is available.
pub const FALLBACK_SPLASH: &str = "Everywhere!";

const PLATFORM_PLACEHOLDER: &str = "{PlatformName}";

/// Picks a random line from the splash file at `path`.
pub fn pick(path: &Path, platform_name: &str) -> String {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            log::debug!("No splash file at '{}': {e}", path.display());
            return FALLBACK_SPLASH.to_string();
        }
    };
    choose(&text, platform_name, time_seed())
}

/// Picks the non-empty line selected by `seed` and fills in the platform name.
pub fn choose(text: &str, platform_name: &str, seed: u64) -> String {
    let lines: Vec<&str> = text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return FALLBACK_SPLASH.to_string();
    }

    let index = (seed % lines.len() as u64) as usize;
    lines[index].replace(PLATFORM_PLACEHOLDER, platform_name)
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
