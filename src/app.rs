// ── Application lifecycle & top-level state ────────────────────────────────────
//
// A single `App` is created on startup and owned by the front end for the
// lifetime of the main window.  All mutations happen on the UI thread; there
// is no global mutable state.  The front end supplies the text view
// (`DisplaySurface`) and the modal dialogs (`Prompter`) per call.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{
    document::{embed_settings, DocumentStore, SaveOutcome, Settings, SettingsSource},
    editor::DisplaySurface,
    error::ChordScrollError,
    scroll::{AutoscrollController, ScrollQueue, ScrollRequest},
    session::Config,
};

/// Title bar text when no document is open.
pub(crate) const APP_NAME: &str = "Chord Scroll";

// ── Prompter ──────────────────────────────────────────────────────────────────

/// Modal dialogs the orchestration needs from the front end.
pub(crate) trait Prompter {
    /// Ask for a file to open.  `None` when cancelled.
    fn pick_open_path(&mut self, initial_dir: &Path) -> Option<PathBuf>;

    /// Ask for a save destination.  `None` when cancelled.
    fn pick_save_path(&mut self, initial_dir: &Path, default_name: &str) -> Option<PathBuf>;

    /// Yes/no question.
    fn confirm(&mut self, title: &str, message: &str) -> bool;

    /// Show a warning with a single OK button.
    fn warn(&mut self, title: &str, message: &str);
}

// ── App ───────────────────────────────────────────────────────────────────────

/// Top-level application state.
///
/// Passed by mutable reference through the window procedure so that all
/// application logic sees a single, explicit state root rather than a
/// collection of disconnected globals.
pub(crate) struct App {
    pub(crate) config: Config,
    /// Where `config` is written at shutdown; `None` disables persistence.
    config_path: Option<PathBuf>,
    pub(crate) store: DocumentStore,
    pub(crate) scroller: AutoscrollController,
}

impl App {
    /// Build the application context around a loaded configuration.
    ///
    /// The open/save dialogs start in the directory of the most recent file.
    pub(crate) fn new(config: Config, config_path: Option<PathBuf>) -> Self {
        let store = DocumentStore::new(config.recent.first().and_then(Path::parent));
        Self {
            config,
            config_path,
            store,
            scroller: AutoscrollController::default(),
        }
    }

    /// Settings that would be embedded if the document were saved now.
    pub(crate) fn current_settings(&self) -> Settings {
        self.scroller.settings()
    }

    /// Compute the title string for the main window.
    ///
    /// | State | Title |
    /// |---|---|
    /// | No document | `"Chord Scroll"` |
    /// | Document | `"song.txt — Chord Scroll"` |
    pub(crate) fn window_title(&self) -> String {
        match self.store.document().file_name() {
            Some(name) => format!("{name} \u{2014} {APP_NAME}"),
            None => APP_NAME.to_owned(),
        }
    }

    /// Playback summary shown next to the title.
    pub(crate) fn status_text(&self) -> String {
        let state = if self.scroller.is_running() { "Playing" } else { "Stopped" };
        format!(
            "{state} \u{00B7} Speed: {} \u{00B7} Size: {}",
            self.scroller.speed(),
            self.scroller.font_size()
        )
    }

    // ── File open ─────────────────────────────────────────────────────────────

    /// Open `path`, or ask for one when `None`.
    ///
    /// The current document is closed first, which may prompt to save it.
    /// Returns `true` when a new document is now shown.
    pub(crate) fn open_document<S, P>(
        &mut self,
        path: Option<PathBuf>,
        surface: &mut S,
        prompter: &mut P,
    ) -> bool
    where
        S: DisplaySurface + ?Sized,
        P: Prompter + ?Sized,
    {
        let path = match path {
            Some(path) => path,
            None => match prompter.pick_open_path(self.store.last_used_dir()) {
                Some(path) => path,
                None => return false,
            },
        };
        let path = std::path::absolute(&path).unwrap_or(path);

        if !path.is_file() {
            prompter.warn("Not found", "Selected file was not found. Sorry.");
            return false;
        }
        if !self.close_document(surface, prompter) {
            return false;
        }

        let source = match self.store.open(&path, self.current_settings()) {
            Ok(source) => source,
            Err(ChordScrollError::FileNotFound(_)) => {
                prompter.warn("Not found", "Selected file was not found. Sorry.");
                return false;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "open failed");
                prompter.warn("Open failed", &e.to_string());
                return false;
            }
        };

        self.config.recent.insert(path);
        let doc = self.store.document();
        let settings = doc.settings;
        let body = doc.display_content.clone();

        self.scroller.set_speed(i64::from(settings.speed));
        self.scroller.set_font_size(i64::from(settings.font_size), surface);
        surface.set_text(&body);

        if let SettingsSource::Corrupt(e) = source {
            warn!(error = %e, "embedded settings ignored");
            prompter.warn("Warning", "Cannot load setting data. Sorry.");
        }
        true
    }

    // ── File save ─────────────────────────────────────────────────────────────

    /// "Save" (`save_as = false`) or "Save as…" (`save_as = true`).
    ///
    /// Returns `true` when the document was written.  A cancelled dialog is a
    /// silent no-op; a failed write is shown as a warning.
    pub(crate) fn save_document<S, P>(&mut self, save_as: bool, surface: &mut S, prompter: &mut P) -> bool
    where
        S: DisplaySurface + ?Sized,
        P: Prompter + ?Sized,
    {
        // The padding must not end up in the file.
        self.scroller.stop(surface);

        let text = surface.text();
        let settings = self.current_settings();
        let outcome = self.store.save(&text, settings, save_as, |dir, name| {
            prompter.pick_save_path(dir, name)
        });
        match outcome {
            Ok(SaveOutcome::Saved(path)) => {
                self.config.recent.insert(path);
                true
            }
            Ok(SaveOutcome::Cancelled) => false,
            Err(e) => {
                warn!(error = %e, "save failed");
                prompter.warn("Save failed", &e.to_string());
                false
            }
        }
    }

    // ── File close ────────────────────────────────────────────────────────────

    /// Close the current document, offering to save unsaved changes.
    ///
    /// Agreeing to save always asks for the destination, pre-filled with the
    /// current name, even when the document already has a path.
    ///
    /// Returns `false` when the user agreed to save but the save did not
    /// happen (dialog cancelled or write failed); the document stays open.
    pub(crate) fn close_document<S, P>(&mut self, surface: &mut S, prompter: &mut P) -> bool
    where
        S: DisplaySurface + ?Sized,
        P: Prompter + ?Sized,
    {
        self.scroller.stop(surface);

        let text = surface.text();
        if text.is_empty() {
            self.store.close();
            return true;
        }

        let assembled = embed_settings(&text, self.current_settings());
        if self.store.has_unsaved_changes(&assembled)
            && prompter.confirm(
                "Save changes",
                "Current document has been modified. Do you want to save changes?",
            )
            && !self.save_document(true, surface, prompter)
        {
            return false;
        }

        surface.set_text("");
        self.store.close();
        true
    }

    // ── Quit ──────────────────────────────────────────────────────────────────

    /// Confirm and prepare to quit.  Returns `true` when the window may close.
    pub(crate) fn request_quit<S, P>(&mut self, surface: &mut S, prompter: &mut P) -> bool
    where
        S: DisplaySurface + ?Sized,
        P: Prompter + ?Sized,
    {
        prompter.confirm("Quit", "Do you want to quit?") && self.close_document(surface, prompter)
    }

    /// Final bookkeeping once the window is gone: release the scroll worker
    /// and write the configuration.
    pub(crate) fn shutdown(&mut self) {
        self.scroller.abandon();
        let Some(path) = self.config_path.as_deref() else {
            return;
        };
        match self.config.save(path) {
            Ok(()) => info!(path = %path.display(), "configuration written"),
            Err(e) => warn!(path = %path.display(), error = %e, "failed to write configuration"),
        }
    }

    // ── Playback ──────────────────────────────────────────────────────────────

    /// Start scrolling if idle, stop if running.  Returns the new running state.
    pub(crate) fn toggle_autoscroll<S, Q>(&mut self, surface: &mut S, queue: Q) -> bool
    where
        S: DisplaySurface + ?Sized,
        Q: ScrollQueue,
    {
        if self.scroller.is_running() {
            self.scroller.stop(surface);
        } else {
            self.scroller.start(surface, queue);
        }
        self.scroller.is_running()
    }

    /// Forward a worker request to the controller.
    pub(crate) fn handle_scroll<S>(&mut self, request: ScrollRequest, surface: &mut S)
    where
        S: DisplaySurface + ?Sized,
    {
        self.scroller.handle(request, surface);
    }

    pub(crate) fn adjust_speed(&mut self, delta: i32) -> u32 {
        self.scroller.adjust_speed(delta)
    }

    pub(crate) fn adjust_font_size<S>(&mut self, delta: i32, surface: &mut S) -> u32
    where
        S: DisplaySurface + ?Sized,
    {
        self.scroller.adjust_font_size(delta, surface)
    }

    /// Switch between light and dark and repaint the view.
    pub(crate) fn toggle_theme<S>(&mut self, surface: &mut S)
    where
        S: DisplaySurface + ?Sized,
    {
        self.config.theme = self.config.theme.toggled();
        surface.apply_theme(self.config.theme);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
