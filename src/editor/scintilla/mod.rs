// ── Scintilla child-window hosting ────────────────────────────────────────────
//
// One of the two modules where `unsafe` is permitted.
// Every `unsafe` block MUST carry a `// SAFETY:` comment.
//
// ── DLL ownership model ───────────────────────────────────────────────────────
//
// `SciDll` owns the single `LoadLibraryW` call for `SciLexer.dll`.  It is
// stored in `WindowState` and lives longer than the `ScintillaView`.
// `ScintillaView` holds only a child `HWND`; it does not own the DLL.
//
// `WindowState` is dropped on WM_NCDESTROY, after Windows has destroyed the
// Scintilla child, so `FreeLibrary` never runs under a live Scintilla window.

#![allow(unsafe_code)]

pub mod messages;

use messages::{
    SC_CP_UTF8, SC_EOL_LF, SC_WRAP_WORD, SCI_DELETERANGE, SCI_EMPTYUNDOBUFFER, SCI_GETFIRSTVISIBLELINE,
    SCI_GETLENGTH, SCI_GETLINECOUNT, SCI_GETTEXT, SCI_INSERTTEXT, SCI_LINESCROLL,
    SCI_LINESONSCREEN, SCI_SETCARETFORE, SCI_SETCODEPAGE, SCI_SETEOLMODE, SCI_SETFIRSTVISIBLELINE,
    SCI_SETMARGINWIDTHN, SCI_SETREADONLY, SCI_SETSELBACK, SCI_SETTEXT, SCI_SETWRAPMODE,
    SCI_STYLECLEARALL, SCI_STYLESETBACK, SCI_STYLESETFONT, SCI_STYLESETFORE, SCI_STYLESETSIZE,
    SCI_VISIBLEFROMDOCLINE, STYLE_DEFAULT,
};

use windows::{
    core::PCWSTR,
    Win32::{
        Foundation::{GetLastError, HINSTANCE, HMODULE, HWND, LPARAM, WPARAM},
        System::LibraryLoader::{FreeLibrary, LoadLibraryW},
        UI::WindowsAndMessaging::{
            CreateWindowExW, MoveWindow, SendMessageW, HMENU, WINDOW_EX_STYLE, WINDOW_STYLE,
            WS_CHILD, WS_CLIPSIBLINGS, WS_VISIBLE, WS_VSCROLL,
        },
    },
};

use crate::{
    editor::DisplaySurface,
    error::{ChordScrollError, Result},
    scroll::DEFAULT_FONT_SIZE,
    theme::Theme,
};

// ── DLL identity ──────────────────────────────────────────────────────────────

const DLL_NAME: &str = "SciLexer.dll";
const CLASS_NAME: &str = "Scintilla";

/// Monospaced face so chord symbols stay aligned over the lyrics.
const FONT_FACE: &[u8] = b"Courier New\0";

// ── SciDll ────────────────────────────────────────────────────────────────────

/// RAII handle to the loaded `SciLexer.dll`.
///
/// Loading the DLL causes it to register the `"Scintilla"` window class.
/// `FreeLibrary` is called on `Drop`, which should happen after the
/// `ScintillaView` child window has been destroyed.
pub(crate) struct SciDll(HMODULE);

impl SciDll {
    /// Load `SciLexer.dll` from the application directory.
    pub(crate) fn load() -> Result<Self> {
        let path: Vec<u16> = DLL_NAME.encode_utf16().chain(std::iter::once(0)).collect();
        // SAFETY: path is a valid null-terminated UTF-16 string.
        // LoadLibraryW searches the application directory first on Win10/11.
        let dll = unsafe { LoadLibraryW(PCWSTR(path.as_ptr())) }.map_err(ChordScrollError::from)?;
        Ok(Self(dll))
    }
}

impl Drop for SciDll {
    fn drop(&mut self) {
        // SAFETY: self.0 was returned by a successful LoadLibraryW and has not
        // been freed since.  The Scintilla child window is already destroyed.
        unsafe {
            let _ = FreeLibrary(self.0);
        }
    }
}

// ── ScintillaView ─────────────────────────────────────────────────────────────

/// The Scintilla child window showing the chord sheet.
pub(crate) struct ScintillaView {
    hwnd: HWND,
    font_size: u32,
    theme: Theme,
    /// Byte length of the padding inserted at position 0, if any.
    padding: usize,
}

impl ScintillaView {
    /// Create a visible Scintilla child window inside `hwnd_parent`.
    ///
    /// `_dll` proves that `SciLexer.dll` is loaded and the `"Scintilla"` class
    /// is registered.  The window starts with zero size; call `resize`.
    pub(crate) fn create(
        hwnd_parent: HWND,
        hinstance: HINSTANCE,
        _dll: &SciDll,
        theme: Theme,
    ) -> Result<Self> {
        let class_wide: Vec<u16> =
            CLASS_NAME.encode_utf16().chain(std::iter::once(0)).collect();

        // SAFETY: class_wide is null-terminated UTF-16 for the class registered
        // by SciLexer.dll (_dll proves the DLL is loaded).  hwnd_parent and
        // hinstance are valid Win32 handles owned by the caller.
        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                PCWSTR(class_wide.as_ptr()),
                PCWSTR::null(),
                WS_CHILD | WS_VISIBLE | WS_VSCROLL | WS_CLIPSIBLINGS,
                0, 0, 0, 0,
                hwnd_parent,
                HMENU::default(),
                hinstance,
                None,
            )
        };

        if hwnd == HWND::default() {
            // SAFETY: GetLastError reads thread-local state set by the just-
            // failed CreateWindowExW; no Win32 calls between them.
            let code = unsafe { GetLastError().0 };
            return Err(ChordScrollError::Win32 { function: "CreateWindowExW (Scintilla)", code });
        }

        let mut view = Self {
            hwnd,
            font_size: DEFAULT_FONT_SIZE,
            theme,
            padding: 0,
        };
        view.send(SCI_SETCODEPAGE, SC_CP_UTF8, 0);
        view.send(SCI_SETEOLMODE, SC_EOL_LF, 0);
        view.send(SCI_SETWRAPMODE, SC_WRAP_WORD, 0);
        // Hide the symbol margin; a chord sheet has no gutter.
        view.send(SCI_SETMARGINWIDTHN, 1, 0);
        view.apply_styles();
        Ok(view)
    }

    /// Fill the rectangle `(0, 0, width, height)` of the parent's client area.
    pub(crate) fn resize(&self, width: i32, height: i32) {
        // SAFETY: hwnd is a valid child window handle.
        unsafe {
            let _ = MoveWindow(self.hwnd, 0, 0, width, height, true);
        }
    }

    /// Send a message with plain integer parameters.
    fn send(&self, msg: u32, wparam: usize, lparam: isize) -> isize {
        // SAFETY: hwnd is a valid Scintilla window; every caller passes
        // integer parameters (no pointers), which Scintilla reads by value.
        unsafe { SendMessageW(self.hwnd, msg, WPARAM(wparam), LPARAM(lparam)).0 }
    }

    /// Re-apply font, size and colours to every style slot.
    fn apply_styles(&mut self) {
        let p = self.theme.palette();
        self.send(SCI_STYLESETFORE, STYLE_DEFAULT, p.fg.to_bgr() as isize);
        self.send(SCI_STYLESETBACK, STYLE_DEFAULT, p.bg.to_bgr() as isize);
        // SAFETY: hwnd valid; FONT_FACE is a static null-terminated string.
        unsafe {
            let _ = SendMessageW(
                self.hwnd,
                SCI_STYLESETFONT,
                WPARAM(STYLE_DEFAULT),
                LPARAM(FONT_FACE.as_ptr() as isize),
            );
        }
        self.send(SCI_STYLESETSIZE, STYLE_DEFAULT, self.font_size as isize);
        // Clone STYLE_DEFAULT into all 256 slots.
        self.send(SCI_STYLECLEARALL, 0, 0);
        self.send(SCI_SETCARETFORE, p.caret.to_bgr() as usize, 0);
        self.send(SCI_SETSELBACK, 1, p.selection_bg.to_bgr() as isize);
    }

    /// Total display lines, counting wrapped lines.
    fn display_line_count(&self) -> usize {
        let doc_lines = self.send(SCI_GETLINECOUNT, 0, 0).max(1) as usize;
        self.send(SCI_VISIBLEFROMDOCLINE, doc_lines, 0).max(1) as usize
    }
}

impl DisplaySurface for ScintillaView {
    fn scroll_fraction(&self) -> f64 {
        let total = self.display_line_count();
        let first = self.send(SCI_GETFIRSTVISIBLELINE, 0, 0).max(0) as usize;
        let on_screen = self.send(SCI_LINESONSCREEN, 0, 0).max(0) as usize;
        if total <= on_screen {
            return 1.0;
        }
        ((first + on_screen) as f64 / total as f64).min(1.0)
    }

    fn scroll_by_one_unit(&mut self) {
        self.send(SCI_LINESCROLL, 0, 1);
    }

    fn scroll_to_top(&mut self) {
        self.send(SCI_SETFIRSTVISIBLELINE, 0, 0);
    }

    fn set_editable(&mut self, editable: bool) {
        self.send(SCI_SETREADONLY, usize::from(!editable), 0);
    }

    fn insert_padding_at_top(&mut self, lines: usize) {
        let mut pad = "\n".repeat(lines).into_bytes();
        let len = pad.len();
        pad.push(0);
        // SAFETY: hwnd valid; pad is null-terminated UTF-8 that outlives the call.
        unsafe {
            let _ = SendMessageW(self.hwnd, SCI_INSERTTEXT, WPARAM(0), LPARAM(pad.as_ptr() as isize));
        }
        self.padding += len;
    }

    fn remove_padding_at_top(&mut self) {
        if self.padding > 0 {
            self.send(SCI_DELETERANGE, 0, self.padding as isize);
            self.padding = 0;
        }
    }

    /// Read the full document text as UTF-8.
    fn text(&self) -> String {
        let len = self.send(SCI_GETLENGTH, 0, 0).max(0) as usize;
        let mut buf = vec![0u8; len + 1];
        // SAFETY: buf is len+1 bytes; SCI_GETTEXT with matching buffer size is safe.
        unsafe {
            let _ = SendMessageW(
                self.hwnd, SCI_GETTEXT,
                WPARAM(len + 1), LPARAM(buf.as_mut_ptr() as isize),
            );
        }
        buf.truncate(len);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Replace all document text and reset the undo history.
    fn set_text(&mut self, text: &str) {
        let mut buf: Vec<u8> = Vec::with_capacity(text.len() + 1);
        buf.extend_from_slice(text.as_bytes());
        buf.push(0);
        // SAFETY: hwnd valid; buf is null-terminated UTF-8 that outlives the call.
        unsafe {
            let _ = SendMessageW(self.hwnd, SCI_SETTEXT, WPARAM(0), LPARAM(buf.as_ptr() as isize));
        }
        self.send(SCI_EMPTYUNDOBUFFER, 0, 0);
        self.padding = 0;
    }

    fn font_size(&self) -> u32 {
        self.font_size
    }

    fn set_font_size(&mut self, size: u32) {
        self.font_size = size;
        self.apply_styles();
    }

    fn apply_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.apply_styles();
    }
}
