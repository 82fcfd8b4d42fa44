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

// Command-line host for the project loader.
// Run with: sprig [--config Sprig.toml] [--project MyGame.sb3] [--list [DIR]]

mod config;
mod platform;
mod screen;
mod splash;

use anyhow::{bail, Result};
use clap::Parser;
use config::{RuntimeConfig, CONFIG_FILE_NAME};
use platform::DesktopPlatform;
use screen::ConsoleScreen;
use sprig_core::{HeadlessScreen, LoadCode, LoadingScreen, Platform};
use sprig_io::{list_projects, FileStorage};
use sprig_loader::{LoadSession, ProjectLoader};
use sprig_telemetry::MemoryMonitor;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(version, about = "Resolves and loads a project")]
struct Cli {
    /// Configuration file.
    #[arg(long, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Project to load, relative to the user storage root.
    #[arg(long)]
    project: Option<PathBuf>,

    /// List the project archives in DIR (the user storage root by default)
    /// and exit.
    #[arg(long, value_name = "DIR", num_args = 0..=1)]
    list: Option<Option<PathBuf>>,

    /// Skip loading-screen frames and only yield while waiting.
    #[arg(long)]
    minimal_ui: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = RuntimeConfig::load(&cli.config)?;
    sprig_telemetry::logging::init(&config.log_level);
    log::debug!("Configuration: {config:?}");

    if let Some(dir) = cli.list {
        let dir = dir.unwrap_or_else(|| config.loader.paths.user_root.clone());
        print_projects(&dir);
        return Ok(());
    }

    if cli.minimal_ui {
        config.loader.render_loading_frames = false;
    }

    let platform = DesktopPlatform::new(config.platform_name.clone());
    let mut screen: Box<dyn LoadingScreen> = if config.loader.render_loading_frames {
        Box::new(ConsoleScreen::stderr(splash::pick(
            &config.splash_text,
            platform.name(),
        )))
    } else {
        Box::new(HeadlessScreen)
    };

    let user_root = config.loader.paths.user_root.clone();
    let loader = ProjectLoader::new(config.loader, FileStorage).with_platform(platform);
    let session = match cli.project {
        Some(project) => LoadSession::with_selected_project(project),
        None => LoadSession::new(),
    };

    let loaded = loader.load(&session, screen.as_mut());
    MemoryMonitor::new("LoadMemory").log_summary(session.memory());

    let status = session.status();
    if loaded {
        log::info!("{}", status.message());
        return Ok(());
    }
    match status.code() {
        LoadCode::RoutedToChooser => {
            println!("No project selected. Pick one with --project:");
            print_projects(&user_root);
            Ok(())
        }
        code => bail!("Project load failed ({code}): {}", status.message()),
    }
}

fn print_projects(dir: &Path) {
    let projects = list_projects(dir);
    if projects.is_empty() {
        println!("  (no projects in '{}')", dir.display());
    }
    for name in projects {
        println!("  {name}");
    }
}
