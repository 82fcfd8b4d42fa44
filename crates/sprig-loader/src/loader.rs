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

//! The ProjectLoader runs a load on a worker thread while the calling thread
//! keeps a loading screen alive.

use std::thread;

use sprig_core::{
    CloudSink, DiscardSprites, LoadCode, LoaderConfig, LoadingScreen, NullPlatform, Platform,
    SpriteLoader,
};
use sprig_io::{ImageLoader, SkipImages, Storage};

use crate::session::LoadSession;

/// Coordinates project resolution, manifest extraction, and sprite loading.
pub struct ProjectLoader {
    pub(crate) config: LoaderConfig,
    pub(crate) storage: Box<dyn Storage>,
    pub(crate) sprites: Box<dyn SpriteLoader>,
    pub(crate) images: Box<dyn ImageLoader>,
    pub(crate) cloud: Option<Box<dyn CloudSink>>,
    pub(crate) platform: Box<dyn Platform>,
}

impl ProjectLoader {
    /// Creates a loader reading from `storage`.
    ///
    /// Sprites and images are discarded and no platform hooks run until the
    /// matching `with_*` method installs a collaborator.
    pub fn new(config: LoaderConfig, storage: impl Storage + 'static) -> Self {
        Self {
            config,
            storage: Box::new(storage),
            sprites: Box::new(DiscardSprites),
            images: Box::new(SkipImages),
            cloud: None,
            platform: Box::new(NullPlatform),
        }
    }

    /// Installs the interpreter-side sprite loader.
    pub fn with_sprite_loader(mut self, sprites: impl SpriteLoader + 'static) -> Self {
        self.sprites = Box::new(sprites);
        self
    }

    /// Installs the image loader that receives the archive handle.
    pub fn with_image_loader(mut self, images: impl ImageLoader + 'static) -> Self {
        self.images = Box::new(images);
        self
    }

    /// Mirrors the raw manifest text into a cloud-variable sink.
    pub fn with_cloud_sink(mut self, cloud: impl CloudSink + 'static) -> Self {
        self.cloud = Some(Box::new(cloud));
        self
    }

    /// Installs the platform hooks.
    pub fn with_platform(mut self, platform: impl Platform + 'static) -> Self {
        self.platform = Box::new(platform);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Loads the project of `session`, rendering `screen` until the worker is
    /// done.
    ///
    /// Blocks until the worker reaches a terminal state. Returns `true` only
    /// when the published code is [`LoadCode::Succeeded`]; the exact outcome
    /// is left in `session.status()`.
    pub fn load(&self, session: &LoadSession, screen: &mut dyn LoadingScreen) -> bool {
        let status = session.status();
        status.reset();

        let worker_priority = self
            .platform
            .current_thread_priority()
            .map(|priority| priority + self.config.worker_priority_offset);

        thread::scope(|scope| {
            let spawned = thread::Builder::new()
                .name("sprig-project-loader".to_string())
                .stack_size(self.config.worker_stack_size)
                .spawn_scoped(scope, move || {
                    if let Some(priority) = worker_priority {
                        self.platform.set_current_thread_priority(priority);
                    }
                    self.open_project(session);
                });

            let worker = match spawned {
                Ok(handle) => Some(handle),
                Err(e) => {
                    log::error!("Failed to spawn the project loader thread: {e}");
                    status.finish(
                        LoadCode::RoutedToChooser,
                        format!("Failed to start loading: {e}"),
                    );
                    None
                }
            };

            screen.init();

            let mut frames = 0u64;
            while !status.is_finished() {
                if self.config.render_loading_frames {
                    screen.render(status);
                    frames += 1;
                    thread::sleep(self.config.frame_interval());
                } else {
                    thread::yield_now();
                }
            }
            log::debug!("Loading screen rendered {frames} frames.");

            if let Some(handle) = worker {
                if handle.join().is_err() {
                    log::error!("Project loader thread panicked.");
                }
            }

            screen.cleanup();
        });

        let code = status.code();
        if code != LoadCode::Succeeded {
            log::warn!("Project load ended with {code}: {}", status.message());
            return false;
        }

        self.platform.disable_speed_boost();
        true
    }
}
