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

//! The status cell shared between the loading worker and the foreground loop.
//!
//! The worker is the only writer and the foreground loop the only reader. The
//! completion flag is always the last field written: a reader that observes
//! [`LoadStatus::is_finished`] returning `true` is guaranteed to see the final
//! code and message.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Mutex;

/// Phase label published when the worker starts resolving the project.
pub const PHASE_OPENING: &str = "Opening project";
/// Phase label published while the manifest is being extracted.
pub const PHASE_UNZIPPING: &str = "Unzipping project";
/// Phase label published while sprites are handed to the interpreter.
pub const PHASE_LOADING_SPRITES: &str = "Loading Sprites";

/// The result code of a load, as published to the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadCode {
    /// The worker is still running.
    Pending,
    /// The project was resolved, parsed, and handed to the interpreter.
    Succeeded,
    /// No storage tier produced a readable stream.
    OpenFailed,
    /// The manifest could not be extracted or was empty.
    ParseFailed,
    /// Nothing was selected; the caller should show the project chooser.
    RoutedToChooser,
}

impl LoadCode {
    /// The integer published in the status cell.
    pub const fn as_i32(self) -> i32 {
        match self {
            LoadCode::Pending => 0,
            LoadCode::Succeeded => 1,
            LoadCode::OpenFailed => -1,
            LoadCode::ParseFailed => -2,
            LoadCode::RoutedToChooser => -3,
        }
    }

    /// Decodes a published integer. Unknown values yield `None`.
    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(LoadCode::Pending),
            1 => Some(LoadCode::Succeeded),
            -1 => Some(LoadCode::OpenFailed),
            -2 => Some(LoadCode::ParseFailed),
            -3 => Some(LoadCode::RoutedToChooser),
            _ => None,
        }
    }

    /// Whether this code ends a load.
    pub const fn is_terminal(self) -> bool {
        !matches!(self, LoadCode::Pending)
    }
}

impl fmt::Display for LoadCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoadCode::Pending => "pending",
            LoadCode::Succeeded => "succeeded",
            LoadCode::OpenFailed => "open failure",
            LoadCode::ParseFailed => "parse failure",
            LoadCode::RoutedToChooser => "routed to chooser",
        };
        write!(f, "{label} ({})", self.as_i32())
    }
}

/// Completion flag, result code, and phase message of one load.
///
/// The flag and the code are lock-free. The message sits behind a mutex that
/// is held only while the string is swapped or copied, so neither side can
/// block the other for longer than one copy. `finish` writes the message and
/// the code before raising the flag with `Release`; a reader that sees the
/// flag through `is_finished` also sees both.
#[derive(Debug)]
pub struct LoadStatus {
    finished: AtomicBool,
    code: AtomicI32,
    // Held only for the duration of a copy.
    message: Mutex<String>,
}

impl Default for LoadStatus {
    fn default() -> Self {
        Self {
            finished: AtomicBool::new(false),
            code: AtomicI32::new(LoadCode::Pending.as_i32()),
            message: Mutex::new(String::new()),
        }
    }
}

impl LoadStatus {
    /// Creates a pending status with an empty message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cell to the pending state for a new load.
    pub fn reset(&self) {
        self.finished.store(false, Ordering::Release);
        self.code
            .store(LoadCode::Pending.as_i32(), Ordering::Relaxed);
        self.write_message(String::new());
    }

    /// Overwrites the phase message.
    pub fn publish_phase(&self, message: impl Into<String>) {
        self.write_message(message.into());
    }

    /// Publishes a terminal code and message, then raises the completion flag.
    pub fn finish(&self, code: LoadCode, message: impl Into<String>) {
        self.write_message(message.into());
        self.code.store(code.as_i32(), Ordering::Relaxed);
        self.finished.store(true, Ordering::Release);
    }

    /// Whether the worker has reached a terminal state.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// The last published code.
    pub fn code(&self) -> LoadCode {
        LoadCode::from_i32(self.code.load(Ordering::Acquire)).unwrap_or(LoadCode::Pending)
    }

    /// A copy of the last published message.
    pub fn message(&self) -> String {
        match self.message.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn write_message(&self, message: String) {
        match self.message.lock() {
            Ok(mut guard) => *guard = message,
            Err(poisoned) => *poisoned.into_inner() = message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn codes_round_trip_through_integers() {
        for code in [
            LoadCode::Pending,
            LoadCode::Succeeded,
            LoadCode::OpenFailed,
            LoadCode::ParseFailed,
            LoadCode::RoutedToChooser,
        ] {
            assert_eq!(LoadCode::from_i32(code.as_i32()), Some(code));
        }
        assert_eq!(LoadCode::from_i32(7), None);
        assert!(!LoadCode::Pending.is_terminal());
        assert!(LoadCode::RoutedToChooser.is_terminal());
    }

    #[test]
    fn finish_publishes_code_and_message() {
        let status = LoadStatus::new();
        status.publish_phase(PHASE_OPENING);
        assert!(!status.is_finished());
        assert_eq!(status.code(), LoadCode::Pending);
        assert_eq!(status.message(), PHASE_OPENING);

        status.finish(LoadCode::ParseFailed, "Project manifest is empty");
        assert!(status.is_finished());
        assert_eq!(status.code(), LoadCode::ParseFailed);
        assert_eq!(status.message(), "Project manifest is empty");

        status.reset();
        assert!(!status.is_finished());
        assert_eq!(status.code(), LoadCode::Pending);
        assert!(status.message().is_empty());
    }

    #[test]
    fn reader_sees_final_fields_once_flag_is_set() {
        let status = Arc::new(LoadStatus::new());
        let writer = Arc::clone(&status);

        let handle = thread::spawn(move || {
            writer.publish_phase(PHASE_UNZIPPING);
            writer.finish(LoadCode::Succeeded, PHASE_LOADING_SPRITES);
        });

        while !status.is_finished() {
            std::hint::spin_loop();
        }
        assert_eq!(status.code(), LoadCode::Succeeded);
        assert_eq!(status.message(), PHASE_LOADING_SPRITES);
        handle.join().expect("writer thread panicked");
    }

    #[test]
    fn poisoned_message_cell_keeps_publishing() {
        let status = Arc::new(LoadStatus::new());
        let poisoner = Arc::clone(&status);
        let _ = thread::spawn(move || {
            let _guard = poisoner.message.lock().unwrap();
            panic!("poison the message cell");
        })
        .join();
        assert!(status.message.is_poisoned());

        status.finish(LoadCode::OpenFailed, "Couldn't find project archive");
        assert!(status.is_finished());
        assert_eq!(status.message(), "Couldn't find project archive");
    }
}
