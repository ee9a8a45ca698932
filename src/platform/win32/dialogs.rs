// ── Common dialogs ─────────────────────────────────────────────────────────────
//
// Thin wrappers around the Win32 common-dialog and message-box APIs.  File
// dialogs return `Some(path)` on user confirmation and `None` on cancel or
// error.  `Win32Prompter` bundles them behind `app::Prompter`.
//
// `unsafe` is permitted here per the crate policy in main.rs.

#![allow(unsafe_code)]

use std::path::{Path, PathBuf};

use windows::{
    core::{PCWSTR, PWSTR},
    Win32::{
        Foundation::HWND,
        UI::{
            Controls::Dialogs::{
                GetOpenFileNameW, GetSaveFileNameW, OFN_FILEMUSTEXIST, OFN_HIDEREADONLY,
                OFN_OVERWRITEPROMPT, OFN_PATHMUSTEXIST, OPENFILENAMEW,
            },
            WindowsAndMessaging::{
                MessageBoxW, IDYES, MB_ICONERROR, MB_ICONQUESTION, MB_ICONWARNING, MB_OK,
                MB_YESNO, MESSAGEBOX_RESULT, MESSAGEBOX_STYLE,
            },
        },
    },
};

use crate::app::Prompter;

// ── Buffer size ───────────────────────────────────────────────────────────────

/// Maximum path length in `WCHAR`s, including the null terminator.
/// `MAX_PATH` (260) is too short for modern Windows paths; use 32 768 which
/// is the documented maximum for `\\?\` extended paths.
const PATH_BUF_LEN: usize = 32_768;

/// Null-separated filter pairs ending with a double null.
const FILTER: &str =
    "Text files (*.txt)\0*.txt\0Chord (*.crd)\0*.crd\0Tab (*.tab)\0*.tab\0All Files (*.*)\0*.*\0\0";

// ── Open dialog ───────────────────────────────────────────────────────────────

/// Show the standard "Open File" dialog starting in `initial_dir`.
///
/// Returns the chosen path, or `None` if the user cancelled.
pub(crate) fn show_open_dialog(hwnd_owner: HWND, initial_dir: &Path) -> Option<PathBuf> {
    let mut buf = vec![0u16; PATH_BUF_LEN];
    let filter: Vec<u16> = FILTER.encode_utf16().collect();
    let dir = wide(&initial_dir.to_string_lossy());
    let title = wide("Select a text file to open");

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        hwndOwner: hwnd_owner,
        lpstrFilter: PCWSTR(filter.as_ptr()),
        lpstrFile: PWSTR(buf.as_mut_ptr()),
        nMaxFile: PATH_BUF_LEN as u32,
        lpstrInitialDir: PCWSTR(dir.as_ptr()),
        lpstrTitle: PCWSTR(title.as_ptr()),
        Flags: OFN_FILEMUSTEXIST | OFN_PATHMUSTEXIST | OFN_HIDEREADONLY,
        ..Default::default()
    };

    // SAFETY: `ofn` is fully initialised; `buf`, `filter`, `dir` and `title`
    // outlive this call.  GetOpenFileNameW reads and writes only within the
    // buffers we provided.  Called on the UI thread (required for modal
    // dialogs).
    let ok = unsafe { GetOpenFileNameW(&mut ofn) };

    if ok.as_bool() {
        Some(path_from_buf(&buf))
    } else {
        None
    }
}

// ── Save dialog ───────────────────────────────────────────────────────────────

/// Show the standard "Save As" dialog.
///
/// `default_name` pre-populates the filename field.  A name typed without an
/// extension gets `.txt`.  Returns the chosen path, or `None` if cancelled.
pub(crate) fn show_save_dialog(
    hwnd_owner: HWND,
    initial_dir: &Path,
    default_name: &str,
) -> Option<PathBuf> {
    let mut buf: Vec<u16> = default_name
        .encode_utf16()
        .chain(std::iter::repeat(0).take(PATH_BUF_LEN))
        .take(PATH_BUF_LEN)
        .collect();
    let filter: Vec<u16> = FILTER.encode_utf16().collect();
    let dir = wide(&initial_dir.to_string_lossy());
    let title = wide("Select destination");
    let def_ext = wide("txt");

    let mut ofn = OPENFILENAMEW {
        lStructSize: std::mem::size_of::<OPENFILENAMEW>() as u32,
        hwndOwner: hwnd_owner,
        lpstrFilter: PCWSTR(filter.as_ptr()),
        lpstrFile: PWSTR(buf.as_mut_ptr()),
        nMaxFile: PATH_BUF_LEN as u32,
        lpstrInitialDir: PCWSTR(dir.as_ptr()),
        lpstrTitle: PCWSTR(title.as_ptr()),
        lpstrDefExt: PCWSTR(def_ext.as_ptr()),
        Flags: OFN_OVERWRITEPROMPT | OFN_PATHMUSTEXIST,
        ..Default::default()
    };

    // SAFETY: same invariants as show_open_dialog above.
    let ok = unsafe { GetSaveFileNameW(&mut ofn) };

    if ok.as_bool() {
        Some(path_from_buf(&buf))
    } else {
        None
    }
}

// ── Message boxes ─────────────────────────────────────────────────────────────

fn message_box(owner: HWND, title: &str, message: &str, style: MESSAGEBOX_STYLE) -> MESSAGEBOX_RESULT {
    let msg_wide = wide(message);
    let title_wide = wide(title);
    // SAFETY: msg_wide and title_wide are valid null-terminated UTF-16 strings
    // that remain allocated for the duration of the MessageBoxW call.
    // A null owner means the dialog has no owner window.
    unsafe {
        MessageBoxW(
            owner,
            PCWSTR(msg_wide.as_ptr()),
            PCWSTR(title_wide.as_ptr()),
            style,
        )
    }
}

/// Show a modal error dialog.  Used by `main()` when startup fails.
pub(crate) fn show_error(owner: HWND, title: &str, message: &str) {
    let _ = message_box(owner, title, message, MB_OK | MB_ICONERROR);
}

/// Show a modal informational dialog.
pub(crate) fn show_info(owner: HWND, title: &str, message: &str) {
    let _ = message_box(owner, title, message, MB_OK);
}

// ── Prompter ──────────────────────────────────────────────────────────────────

/// `app::Prompter` backed by the dialogs above, owned by the main window.
pub(crate) struct Win32Prompter {
    pub(crate) owner: HWND,
}

impl Prompter for Win32Prompter {
    fn pick_open_path(&mut self, initial_dir: &Path) -> Option<PathBuf> {
        show_open_dialog(self.owner, initial_dir)
    }

    fn pick_save_path(&mut self, initial_dir: &Path, default_name: &str) -> Option<PathBuf> {
        show_save_dialog(self.owner, initial_dir, default_name)
    }

    fn confirm(&mut self, title: &str, message: &str) -> bool {
        message_box(self.owner, title, message, MB_YESNO | MB_ICONQUESTION) == IDYES
    }

    fn warn(&mut self, title: &str, message: &str) {
        let _ = message_box(self.owner, title, message, MB_OK | MB_ICONWARNING);
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Null-terminated UTF-16 copy of `s`.
pub(crate) fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Convert a null-terminated UTF-16 buffer to a `PathBuf`.
fn path_from_buf(buf: &[u16]) -> PathBuf {
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    PathBuf::from(String::from_utf16_lossy(&buf[..len]))
}
