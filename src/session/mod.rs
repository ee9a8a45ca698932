// ── Configuration persistence ─────────────────────────────────────────────────
//
// Reads and writes `%APPDATA%\ChordScroll\config.json` (or the XDG config
// directory elsewhere).  Loaded once at startup, saved once at orderly
// shutdown.  No `unsafe` here.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::theme::Theme;

// ── Recent files ──────────────────────────────────────────────────────────────

/// Maximum number of entries kept in the recent-files list.
pub(crate) const RECENT_CAPACITY: usize = 5;

/// Most-recent-first list of opened paths, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct RecentFiles(Vec<PathBuf>);

impl RecentFiles {
    /// Record `path` as the most recently used file.
    ///
    /// The path is prepended, the list is cut to `RECENT_CAPACITY`, and only
    /// then de-duplicated (keeping first occurrences).  Re-inserting a path
    /// that is already present therefore moves it to the front, and can leave
    /// the list one entry short when the old copy was inside the window.
    pub(crate) fn insert(&mut self, path: PathBuf) {
        self.0.insert(0, path);
        self.0.truncate(RECENT_CAPACITY);
        let mut seen: Vec<PathBuf> = Vec::with_capacity(self.0.len());
        self.0.retain(|p| {
            if seen.contains(p) {
                false
            } else {
                seen.push(p.clone());
                true
            }
        });
    }

    /// All entries, most-recent-first.
    pub(crate) fn all(&self) -> &[PathBuf] {
        &self.0
    }

    pub(crate) fn first(&self) -> Option<&Path> {
        self.0.first().map(PathBuf::as_path)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    /// Enforce the capacity and uniqueness invariants on a hand-edited list.
    fn normalise(&mut self) {
        let mut kept: Vec<PathBuf> = Vec::with_capacity(RECENT_CAPACITY);
        for p in std::mem::take(&mut self.0) {
            if kept.len() == RECENT_CAPACITY {
                break;
            }
            if !kept.contains(&p) {
                kept.push(p);
            }
        }
        self.0 = kept;
    }
}

// ── On-disk type ──────────────────────────────────────────────────────────────

/// Root of the JSON configuration file.
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) recent: RecentFiles,
    #[serde(default)] // files written before the dark theme parse as light
    pub(crate) theme: Theme,
    /// Fields this version does not know about, written back untouched.
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// Return the path to the configuration file.
///
/// Windows: `%APPDATA%\ChordScroll\config.json`.
/// Elsewhere: `$XDG_CONFIG_HOME/chord-scroll/config.json`, falling back to
/// `$HOME/.config/chord-scroll/config.json`.
///
/// Returns `None` if none of those environment variables is set.
pub(crate) fn config_path() -> Option<PathBuf> {
    if cfg!(windows) {
        let mut p = PathBuf::from(std::env::var_os("APPDATA")?);
        p.push("ChordScroll");
        p.push("config.json");
        return Some(p);
    }
    let mut p = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let mut home = PathBuf::from(std::env::var_os("HOME")?);
            home.push(".config");
            home
        }
    };
    p.push("chord-scroll");
    p.push("config.json");
    Some(p)
}

impl Config {
    // ── Load ──────────────────────────────────────────────────────────────────

    /// Read and parse the configuration at `path`.
    ///
    /// Any failure (file missing, unreadable, malformed JSON) yields the
    /// default configuration.  The user is never told.
    pub(crate) fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => {
                debug!(path = %path.display(), recent = config.recent.len(), "configuration loaded");
                config
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "configuration unavailable, using defaults");
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> io::Result<Self> {
        let data = fs::read(path)?;
        let mut config: Self = serde_json::from_slice(&data).map_err(io::Error::other)?;
        config.recent.normalise();
        Ok(config)
    }

    // ── Save ──────────────────────────────────────────────────────────────────

    /// Write the configuration to `path`, creating the parent directory if it
    /// does not exist.
    pub(crate) fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self).map_err(io::Error::other)?;
        debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
