//! Best score persisted in a small text file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use snake_system_controller::HighScoreStore;
use tracing::{info, warn};

/// High score store backed by a file holding a single number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FileHighScore {
    path: PathBuf,
    best: u32,
}

impl FileHighScore {
    /// Opens the store at `path`, starting from zero when the file is missing.
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let best = read_best(&path)?;
        Ok(Self { path, best })
    }

    /// Opens the store, logging and starting from zero when the file is unreadable.
    pub(crate) fn open_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::open(path.clone()) {
            Ok(store) => store,
            Err(error) => {
                warn!(?error, path = %path.display(), "ignoring unreadable high score");
                Self { path, best: 0 }
            }
        }
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, format!("{}\n", self.best))
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}

fn read_best(path: &Path) -> Result<u32> {
    match fs::read_to_string(path) {
        Ok(text) => text
            .trim()
            .parse()
            .with_context(|| format!("{} does not hold a score", path.display())),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(0),
        Err(error) => Err(error).with_context(|| format!("failed to read {}", path.display())),
    }
}

impl HighScoreStore for FileHighScore {
    fn high_score(&self) -> u32 {
        self.best
    }

    fn save_high_score(&mut self, score: u32) {
        self.best = score;
        match self.persist() {
            Ok(()) => info!(score, path = %self.path.display(), "high score saved"),
            Err(error) => warn!(?error, "failed to save high score"),
        }
    }
}
