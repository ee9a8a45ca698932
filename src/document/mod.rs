// ── Document persistence ──────────────────────────────────────────────────────
//
// A chord sheet is plain text optionally terminated by a settings block:
//
//     <body>\n\nChordsAutoscrollSettings:{"Speed": 30, "Size": 14}
//
// `DocumentStore` owns the association between the open view and a file on
// disk.  It never prompts the user; `App` resolves prompts before calling in.

use std::{
    borrow::Cow,
    fmt, fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::{
    error::{ChordScrollError, Result},
    scroll::{font_size_in_range, speed_in_range, DEFAULT_FONT_SIZE, DEFAULT_SPEED},
};

// ── Settings block ────────────────────────────────────────────────────────────

/// Separator between the document body and the settings block.
const BLOCK_SEPARATOR: &str = "\n\n";

/// Marker that introduces the JSON settings object.
pub(crate) const SETTINGS_PREFIX: &str = "ChordsAutoscrollSettings:";

/// File name offered by "Save as…" for a document that has never been saved.
const UNTITLED_NAME: &str = "New chords";

/// Playback settings embedded at the end of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct Settings {
    /// Scroll steps per minute.
    #[serde(rename = "Speed")]
    pub(crate) speed: u32,
    /// Text size in points.
    #[serde(rename = "Size")]
    pub(crate) font_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl Settings {
    /// Decode the JSON object that follows `SETTINGS_PREFIX`.
    ///
    /// Unknown keys are ignored; out-of-range values are rejected.
    pub(crate) fn decode(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        if !speed_in_range(i64::from(settings.speed)) {
            return Err(ChordScrollError::SettingsCorrupt(format!(
                "speed {} out of range",
                settings.speed
            )));
        }
        if !font_size_in_range(i64::from(settings.font_size)) {
            return Err(ChordScrollError::SettingsCorrupt(format!(
                "size {} out of range",
                settings.font_size
            )));
        }
        Ok(settings)
    }
}

/// Writes the block JSON with `", "` / `": "` separators, byte-compatible with
/// files produced by earlier releases.
impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, r#"{{"Speed": {}, "Size": {}}}"#, self.speed, self.font_size)
    }
}

/// Append the settings block to `body`.
pub(crate) fn embed_settings(body: &str, settings: Settings) -> String {
    format!("{body}{BLOCK_SEPARATOR}{SETTINGS_PREFIX}{settings}")
}

/// Split `raw` into the displayable body and its settings block, if any.
///
/// The block must be the last thing in the file: a single-line JSON object
/// after the final marker.  Anything else is treated as ordinary text.
pub(crate) fn extract_settings(raw: &str) -> (&str, Option<Result<Settings>>) {
    let marker_len = BLOCK_SEPARATOR.len() + SETTINGS_PREFIX.len();
    let Some(at) = raw.rfind(&format!("{BLOCK_SEPARATOR}{SETTINGS_PREFIX}")) else {
        return (raw, None);
    };
    let json = raw[at + marker_len..].trim_end();
    if !json.starts_with('{') || !json.ends_with('}') || json.contains('\n') {
        return (raw, None);
    }
    (&raw[..at], Some(Settings::decode(json)))
}

// ── Fingerprint ───────────────────────────────────────────────────────────────

/// Content hash used to compare the view against the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fingerprint([u8; 32]);

pub(crate) fn fingerprint(text: &str) -> Fingerprint {
    Fingerprint(Sha256::digest(text.as_bytes()).into())
}

// ── Document ──────────────────────────────────────────────────────────────────

/// The file currently associated with the view.
#[derive(Debug, Default)]
pub(crate) struct Document {
    /// Location on disk, or `None` for a document that was never saved.
    pub(crate) path: Option<PathBuf>,
    /// Full text as last read from or written to disk, settings included.
    pub(crate) raw_content: String,
    /// `raw_content` without the settings block.
    pub(crate) display_content: String,
    pub(crate) settings: Settings,
}

impl Document {
    /// The bare filename component, or `None` if no path is set.
    pub(crate) fn file_name(&self) -> Option<String> {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
    }
}

/// Where the settings of a freshly opened document came from.
#[derive(Debug)]
pub(crate) enum SettingsSource {
    /// Decoded from the file's settings block.
    Embedded,
    /// The file has no settings block; the fallback values were used.
    Missing,
    /// The block exists but is unusable; the fallback values were used.
    Corrupt(ChordScrollError),
}

/// Result of a save request.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum SaveOutcome {
    Saved(PathBuf),
    /// The user dismissed the destination dialog.  Nothing was written.
    Cancelled,
}

// ── DocumentStore ─────────────────────────────────────────────────────────────

pub(crate) struct DocumentStore {
    doc: Document,
    /// Initial directory for the open/save dialogs.
    last_used_dir: PathBuf,
}

impl DocumentStore {
    /// An empty store whose dialogs start in `last_used_dir`, or in the user's
    /// home directory when that is `None`.
    pub(crate) fn new(last_used_dir: Option<&Path>) -> Self {
        Self {
            doc: Document::default(),
            last_used_dir: last_used_dir.map_or_else(home_dir, Path::to_path_buf),
        }
    }

    pub(crate) fn document(&self) -> &Document {
        &self.doc
    }

    pub(crate) fn path(&self) -> Option<&Path> {
        self.doc.path.as_deref()
    }

    pub(crate) fn last_used_dir(&self) -> &Path {
        &self.last_used_dir
    }

    // ── Open ──────────────────────────────────────────────────────────────────

    /// Load `path`, replacing the current document.
    ///
    /// `fallback` supplies the settings when the file has no usable block.
    /// A corrupt block does not fail the open; it is reported through
    /// `SettingsSource::Corrupt`.
    pub(crate) fn open(&mut self, path: &Path, fallback: Settings) -> Result<SettingsSource> {
        if !path.is_file() {
            return Err(ChordScrollError::FileNotFound(path.to_path_buf()));
        }
        let raw = read_text(path)?;

        let (body, block) = extract_settings(&raw);
        let (settings, source) = match block {
            Some(Ok(settings)) => (settings, SettingsSource::Embedded),
            Some(Err(e)) => (fallback, SettingsSource::Corrupt(e)),
            None => (fallback, SettingsSource::Missing),
        };
        let display_content = body.to_owned();

        info!(path = %path.display(), ?settings, "document opened");
        self.doc = Document {
            path: Some(path.to_path_buf()),
            raw_content: raw,
            display_content,
            settings,
        };
        self.remember_dir(path);
        Ok(source)
    }

    // ── Save ──────────────────────────────────────────────────────────────────

    /// Write `display_text` plus the settings block to disk.
    ///
    /// When the document has no path, or `save_as` is set, `pick_destination`
    /// is called with the initial directory and a suggested file name.  A
    /// chosen path without an extension gets `.txt`.
    pub(crate) fn save<F>(
        &mut self,
        display_text: &str,
        settings: Settings,
        save_as: bool,
        pick_destination: F,
    ) -> Result<SaveOutcome>
    where
        F: FnOnce(&Path, &str) -> Option<PathBuf>,
    {
        let current = if save_as { None } else { self.doc.path.clone() };
        let destination = match current {
            Some(path) => path,
            None => {
                let suggested = self.doc.file_name().unwrap_or_else(|| UNTITLED_NAME.to_owned());
                match pick_destination(&self.last_used_dir, &suggested) {
                    Some(mut path) => {
                        if path.extension().is_none() {
                            path.set_extension("txt");
                        }
                        path
                    }
                    None => {
                        debug!("save cancelled");
                        return Ok(SaveOutcome::Cancelled);
                    }
                }
            }
        };

        let display_text = normalise_newlines(display_text);
        let raw = embed_settings(&display_text, settings);
        fs::write(&destination, &raw)?;

        info!(path = %destination.display(), ?settings, "document saved");
        self.doc = Document {
            path: Some(destination.clone()),
            raw_content: raw,
            display_content: display_text.into_owned(),
            settings,
        };
        self.remember_dir(&destination);
        Ok(SaveOutcome::Saved(destination))
    }

    // ── Change detection ──────────────────────────────────────────────────────

    /// `true` when `assembled` differs from the file currently on disk.
    ///
    /// The file is re-read on every call; a missing or unreadable file counts
    /// as empty.  Both sides are compared with `\n` line endings.
    pub(crate) fn has_unsaved_changes(&self, assembled: &str) -> bool {
        let on_disk = self
            .doc
            .path
            .as_deref()
            .and_then(|p| read_text(p).ok())
            .unwrap_or_default();
        fingerprint(&normalise_newlines(assembled)) != fingerprint(&on_disk)
    }

    // ── Close ─────────────────────────────────────────────────────────────────

    /// Forget the current document.  Disk is not touched.
    pub(crate) fn close(&mut self) {
        if let Some(path) = self.doc.path.take() {
            debug!(path = %path.display(), "document closed");
        }
        self.doc = Document::default();
    }

    fn remember_dir(&mut self, path: &Path) {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            self.last_used_dir = dir.to_path_buf();
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Read a text file as UTF-8.
///
/// A UTF-8 BOM is dropped, invalid sequences are replaced, and `\r\n` line
/// endings are normalised to `\n` so the settings marker is found in files
/// written on Windows.
fn read_text(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&bytes);
    Ok(normalise_newlines(&String::from_utf8_lossy(bytes)).into_owned())
}

/// `text` with every `\r\n` turned into `\n`.  Borrows when there is none.
fn normalise_newlines(text: &str) -> Cow<'_, str> {
    if text.contains("\r\n") {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn home_dir() -> PathBuf {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    std::env::var_os(var).map_or_else(|| PathBuf::from("."), PathBuf::from)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(speed: u32, font_size: u32) -> Settings {
        Settings { speed, font_size }
    }

    #[test]
    fn embed_then_extract_is_lossless() {
        for (body, s) in [
            ("", settings(1, 8)),
            ("Verse one", settings(45, 16)),
            ("C  G  Am  F\nLet it be\n\n", settings(999, 72)),
        ] {
            let raw = embed_settings(body, s);
            let (got_body, got) = extract_settings(&raw);
            assert_eq!(got_body, body);
            assert_eq!(got.expect("block present").expect("valid block"), s);
        }
    }

    #[test]
    fn block_uses_spaced_json() {
        let raw = embed_settings("Verse one", settings(45, 16));
        assert_eq!(
            raw,
            "Verse one\n\nChordsAutoscrollSettings:{\"Speed\": 45, \"Size\": 16}"
        );
    }

    #[test]
    fn compact_json_is_accepted() {
        let raw = "x\n\nChordsAutoscrollSettings:{\"Speed\":50,\"Size\":20}";
        let (body, got) = extract_settings(raw);
        assert_eq!(body, "x");
        assert_eq!(got.expect("present").expect("valid"), settings(50, 20));
    }

    #[test]
    fn body_without_marker_is_unchanged() {
        let raw = "Am  C  G\nno settings here\n";
        let (body, got) = extract_settings(raw);
        assert_eq!(body, raw);
        assert!(got.is_none());
    }

    #[test]
    fn marker_not_at_end_is_plain_text() {
        let raw = "a\n\nChordsAutoscrollSettings:{\"Speed\": 1, \"Size\": 9}\nmore lyrics";
        let (body, got) = extract_settings(raw);
        assert_eq!(body, raw);
        assert!(got.is_none());
    }

    #[test]
    fn unparseable_block_is_corrupt() {
        let raw = "a\n\nChordsAutoscrollSettings:{\"Speed\": \"fast\"}";
        let (body, got) = extract_settings(raw);
        assert_eq!(body, "a");
        assert!(matches!(got, Some(Err(ChordScrollError::SettingsCorrupt(_)))));
    }

    #[test]
    fn out_of_range_values_are_corrupt() {
        assert!(Settings::decode(r#"{"Speed": 0, "Size": 14}"#).is_err());
        assert!(Settings::decode(r#"{"Speed": 1000, "Size": 14}"#).is_err());
        assert!(Settings::decode(r#"{"Speed": 30, "Size": 7}"#).is_err());
        assert!(Settings::decode(r#"{"Speed": 30, "Size": 73}"#).is_err());
        assert!(Settings::decode(r#"{"Speed": -5, "Size": 14}"#).is_err());
        assert!(Settings::decode(r#"{"Speed": 30, "Size": 14, "Key": "G"}"#).is_ok());
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(fingerprint("abc"), fingerprint("abc"));
        assert_ne!(fingerprint("abc"), fingerprint("abd"));
    }

    #[test]
    fn open_missing_file_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = DocumentStore::new(Some(dir.path()));
        let err = store
            .open(&dir.path().join("missing.txt"), Settings::default())
            .expect_err("should fail");
        assert!(matches!(err, ChordScrollError::FileNotFound(_)));
        assert!(store.path().is_none());
    }

    #[test]
    fn open_reads_embedded_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("song.txt");
        fs::write(&path, "Verse one\n\nChordsAutoscrollSettings:{\"Speed\": 45, \"Size\": 16}")
            .expect("write");

        let mut store = DocumentStore::new(None);
        let source = store.open(&path, Settings::default()).expect("open");
        assert!(matches!(source, SettingsSource::Embedded));
        let doc = store.document();
        assert_eq!(doc.display_content, "Verse one");
        assert_eq!(doc.settings, settings(45, 16));
        assert_eq!(store.last_used_dir(), dir.path());
    }

    #[test]
    fn open_without_block_uses_fallback() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("plain.txt");
        fs::write(&path, "just lyrics").expect("write");

        let mut store = DocumentStore::new(None);
        let source = store.open(&path, settings(60, 20)).expect("open");
        assert!(matches!(source, SettingsSource::Missing));
        assert_eq!(store.document().display_content, "just lyrics");
        assert_eq!(store.document().settings, settings(60, 20));
    }

    #[test]
    fn open_with_corrupt_block_still_opens() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.txt");
        fs::write(&path, "body\n\nChordsAutoscrollSettings:{oops}").expect("write");

        let mut store = DocumentStore::new(None);
        let source = store.open(&path, settings(30, 14)).expect("open");
        assert!(matches!(source, SettingsSource::Corrupt(_)));
        assert_eq!(store.document().display_content, "body");
        assert_eq!(store.document().settings, settings(30, 14));
    }

    #[test]
    fn open_normalises_crlf() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("win.txt");
        fs::write(&path, "a\r\nb\r\n\r\nChordsAutoscrollSettings:{\"Speed\": 40, \"Size\": 12}")
            .expect("write");

        let mut store = DocumentStore::new(None);
        store.open(&path, Settings::default()).expect("open");
        assert_eq!(store.document().display_content, "a\nb");
        assert_eq!(store.document().settings, settings(40, 12));
    }

    #[test]
    fn save_untitled_asks_for_destination() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = DocumentStore::new(Some(dir.path()));
        let target = dir.path().join("chords");

        let outcome = store
            .save("Intro", settings(30, 14), false, |initial, name| {
                assert_eq!(initial, dir.path());
                assert_eq!(name, "New chords");
                Some(target.clone())
            })
            .expect("save");

        let written = dir.path().join("chords.txt");
        assert_eq!(outcome, SaveOutcome::Saved(written.clone()));
        assert_eq!(
            fs::read_to_string(&written).expect("read"),
            "Intro\n\nChordsAutoscrollSettings:{\"Speed\": 30, \"Size\": 14}"
        );
        assert_eq!(store.path(), Some(written.as_path()));
    }

    #[test]
    fn save_with_known_path_skips_dialog() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("song.txt");
        fs::write(&path, "old").expect("write");

        let mut store = DocumentStore::new(None);
        store.open(&path, Settings::default()).expect("open");
        let outcome = store
            .save("new", settings(31, 14), false, |_, _| panic!("dialog must not open"))
            .expect("save");
        assert_eq!(outcome, SaveOutcome::Saved(path.clone()));
        assert!(fs::read_to_string(&path).expect("read").starts_with("new\n\n"));
    }

    #[test]
    fn save_as_suggests_current_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("song.txt");
        fs::write(&path, "x").expect("write");

        let mut store = DocumentStore::new(None);
        store.open(&path, Settings::default()).expect("open");
        let outcome = store
            .save("x", Settings::default(), true, |_, name| {
                assert_eq!(name, "song.txt");
                None
            })
            .expect("save");
        assert_eq!(outcome, SaveOutcome::Cancelled);
        assert_eq!(fs::read_to_string(&path).expect("read"), "x");
    }

    #[test]
    fn save_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = DocumentStore::new(None);
        let err = store
            .save("x", Settings::default(), false, |_, _| {
                Some(dir.path().join("no").join("such").join("dir.txt"))
            })
            .expect_err("should fail");
        assert!(matches!(err, ChordScrollError::Io(_)));
        assert!(store.path().is_none());
    }

    #[test]
    fn unsaved_changes_track_disk_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = DocumentStore::new(Some(dir.path()));
        let s = settings(30, 14);

        // Nothing on disk: only the empty string counts as unchanged.
        assert!(!store.has_unsaved_changes(""));
        assert!(store.has_unsaved_changes(&embed_settings("Intro", s)));

        store
            .save("Intro", s, false, |d, _| Some(d.join("a.txt")))
            .expect("save");
        assert!(!store.has_unsaved_changes(&embed_settings("Intro", s)));
        assert!(store.has_unsaved_changes(&embed_settings("Intro!", s)));
        assert!(store.has_unsaved_changes(&embed_settings("Intro", settings(31, 14))));
    }

    #[test]
    fn crlf_text_is_clean_right_after_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("win.txt");
        let mut store = DocumentStore::new(Some(dir.path()));
        let s = settings(30, 14);

        store
            .save("Intro\r\nVerse", s, false, |_, _| Some(target.clone()))
            .expect("save");
        assert!(
            !store.has_unsaved_changes(&embed_settings("Intro\r\nVerse", s)),
            "CRLF text reported as modified right after saving it"
        );
        assert!(!store.has_unsaved_changes(&embed_settings("Intro\nVerse", s)));
        assert_eq!(
            fs::read_to_string(&target).expect("read"),
            embed_settings("Intro\nVerse", s)
        );
        assert_eq!(store.document().display_content, "Intro\nVerse");
    }

    #[test]
    fn unsaved_changes_reread_the_file_each_time() {
        let dir = tempfile::tempdir().expect("tempdir");
        let target = dir.path().join("song.txt");
        let mut store = DocumentStore::new(Some(dir.path()));
        let s = settings(30, 14);
        let assembled = embed_settings("Verse", s);

        store
            .save("Verse", s, false, |_, _| Some(target.clone()))
            .expect("save");
        assert!(!store.has_unsaved_changes(&assembled));

        // Edited behind the store's back.
        fs::write(&target, "Someone else's verse").expect("rewrite");
        assert!(store.has_unsaved_changes(&assembled));
        assert!(!store.has_unsaved_changes("Someone else's verse"));

        // Deleted: compared against the empty string.
        fs::remove_file(&target).expect("remove");
        assert!(store.has_unsaved_changes(&assembled));
        assert!(!store.has_unsaved_changes(""));
    }

    #[test]
    fn close_forgets_document_but_keeps_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("song.txt");
        fs::write(&path, "x").expect("write");

        let mut store = DocumentStore::new(None);
        store.open(&path, Settings::default()).expect("open");
        store.close();
        assert!(store.path().is_none());
        assert!(store.document().display_content.is_empty());
        assert_eq!(store.last_used_dir(), dir.path());
        assert!(path.is_file());
    }
}
