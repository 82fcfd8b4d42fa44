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

//! Installs the process-wide logger.

use env_logger::Env;

/// Installs `env_logger` as the `log` backend.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` (for example
/// `"info"` or `"sprig_io=debug,info"`) is used. Calling this twice keeps the
/// first logger and returns `false`.
pub fn init(default_level: &str) -> bool {
    let result = env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init();

    match result {
        Ok(()) => {
            log::debug!("Logger initialized with default level '{default_level}'.");
            true
        }
        Err(e) => {
            log::warn!("Logger already initialized: {e}");
            false
        }
    }
}
