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

use sprig_core::{LoadStatus, LoadingScreen};
use std::io::{self, Write};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Draws the loading screen as a single, rewritten terminal line.
pub struct ConsoleScreen<W: Write> {
    out: W,
    splash: String,
    frame: usize,
}

impl ConsoleScreen<io::Stderr> {
    /// A screen writing to standard error.
    pub fn stderr(splash: String) -> Self {
        Self::new(io::stderr(), splash)
    }
}

impl<W: Write> ConsoleScreen<W> {
    /// A screen writing to `out`.
    pub fn new(out: W, splash: String) -> Self {
        Self {
            out,
            splash,
            frame: 0,
        }
    }

    /// Number of frames drawn since `init`.
    pub fn frames(&self) -> usize {
        self.frame
    }

    /// Consumes the screen and returns its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(e) = self.out.write_fmt(line).and_then(|()| self.out.flush()) {
            log::trace!("Loading screen write failed: {e}");
        }
    }
}

impl<W: Write> LoadingScreen for ConsoleScreen<W> {
    fn init(&mut self) {
        self.frame = 0;
        let splash = self.splash.clone();
        self.write_line(format_args!("{splash}\n"));
    }

    fn render(&mut self, status: &LoadStatus) {
        let spinner = SPINNER[self.frame % SPINNER.len()];
        self.frame += 1;
        let message = status.message();
        // Trailing padding clears leftovers from a longer previous message.
        self.write_line(format_args!("\r{spinner} {message:<40}"));
    }

    fn cleanup(&mut self) {
        self.write_line(format_args!("\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_show_the_published_phase() {
        let status = LoadStatus::new();
        let mut screen = ConsoleScreen::new(Vec::new(), "Everywhere!".to_string());

        screen.init();
        status.publish_phase("Opening project");
        screen.render(&status);
        status.publish_phase("Unzipping project");
        screen.render(&status);
        screen.cleanup();

        assert_eq!(screen.frames(), 2);
        let output = String::from_utf8(screen.into_inner()).unwrap();
        assert!(output.starts_with("Everywhere!\n"));
        assert!(output.contains("| Opening project"));
        assert!(output.contains("/ Unzipping project"));
        assert!(output.ends_with('\n'));
    }
}
