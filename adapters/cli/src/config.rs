//! TOML configuration file read at startup.

use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use snake_core::{GameOptions, Viewport};
use snake_system_motion::Palette;

/// Everything the binary can be configured with from a file.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    /// Seed for apple relocation; a fresh seed is drawn when absent.
    pub(crate) seed: Option<u64>,
    /// Options applied to every new game.
    pub(crate) options: GameOptions,
    /// Ribbon colours.
    pub(crate) palette: Palette,
    /// Window settings.
    pub(crate) window: WindowConfig,
    /// File the best score is kept in.
    pub(crate) high_score_file: Option<String>,
}

/// Size and presentation of the game window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct WindowConfig {
    /// Board width in pixels.
    pub(crate) width: u32,
    /// Board height in pixels.
    pub(crate) height: u32,
    /// Whether presentation waits for the display refresh.
    pub(crate) vsync: bool,
    /// Whether frame rate metrics are printed.
    pub(crate) show_fps: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 800,
            vsync: true,
            show_fps: false,
        }
    }
}

impl WindowConfig {
    pub(crate) fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

impl Config {
    /// Parses a configuration from TOML text.
    pub(crate) fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse configuration")
    }

    /// Loads the configuration at `path`; a missing file yields the defaults.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text)
                .with_context(|| format!("invalid configuration in {}", path.display())),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(error) => {
                Err(error).with_context(|| format!("failed to read {}", path.display()))
            }
        }
    }
}
