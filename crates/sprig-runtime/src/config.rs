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

use anyhow::{Context, Result};
use serde::Deserialize;
use sprig_core::LoaderConfig;
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the runtime configuration file.
pub const CONFIG_FILE_NAME: &str = "Sprig.toml";

/// Represents the structure of the `Sprig.toml` configuration file.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Log filter used when `RUST_LOG` is not set.
    pub log_level: String,
    /// File holding one splash line per row.
    pub splash_text: PathBuf,
    /// Substituted for `{PlatformName}` in splash lines.
    pub platform_name: String,
    /// Settings handed to the project loader.
    pub loader: LoaderConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            splash_text: PathBuf::from("romfs/splash.txt"),
            platform_name: "Desktop".to_string(),
            loader: LoaderConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Loads `path`, or the defaults when the file does not exist.
    ///
    /// When the file leaves `loader.paths.user_root` unset, the user storage
    /// root is placed under the platform documents directory.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file at '{}'", path.display()))?;
            let (config, explicit_root) = Self::parse(&text)
                .with_context(|| format!("Failed to parse TOML from '{}'", path.display()))?;
            if explicit_root {
                config
            } else {
                config.with_documents_user_root()
            }
        } else {
            Self::default().with_documents_user_root()
        };
        config.loader.paths.user_root = normalize_root(&config.loader.paths.user_root);
        Ok(config)
    }

    /// Parses configuration text. The flag tells whether the user storage root
    /// was given explicitly.
    fn parse(text: &str) -> Result<(Self, bool)> {
        let config: RuntimeConfig = toml::from_str(text)?;
        let table: toml::Table = toml::from_str(text)?;
        let explicit_root = table
            .get("loader")
            .and_then(|loader| loader.get("paths"))
            .and_then(|paths| paths.get("user_root"))
            .is_some();
        Ok((config, explicit_root))
    }

    fn with_documents_user_root(mut self) -> Self {
        if let Some(documents) = dirs::document_dir() {
            self.loader.paths.user_root = documents.join("sprig");
        }
        self
    }
}

fn normalize_root(root: &Path) -> PathBuf {
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let (config, explicit_root) = RuntimeConfig::parse(
            r#"
            log_level = "debug"

            [loader]
            render_loading_frames = false
            "#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.platform_name, "Desktop");
        assert!(!config.loader.render_loading_frames);
        assert_eq!(config.loader.frame_interval_ms, 16);
        assert_eq!(
            config.loader.paths.bundled_archive,
            PathBuf::from("romfs/project.sb3")
        );
        assert!(!explicit_root);
    }

    #[test]
    fn explicit_user_root_is_detected() {
        let (config, explicit_root) = RuntimeConfig::parse(
            r#"
            [loader.paths]
            user_root = "/media/sd/sprig"
            "#,
        )
        .unwrap();

        assert!(explicit_root);
        assert_eq!(config.loader.paths.user_root, PathBuf::from("/media/sd/sprig"));
    }

    #[test]
    fn missing_file_yields_defaults() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let config = RuntimeConfig::load(&dir.path().join(CONFIG_FILE_NAME))?;

        assert_eq!(config.log_level, "info");
        assert!(config.loader.render_loading_frames);
        assert!(config.loader.paths.user_root.is_absolute());
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "log_level = [")?;

        let error = RuntimeConfig::load(&path).unwrap_err();
        assert!(error.to_string().contains("Failed to parse TOML"));
        Ok(())
    }
}
