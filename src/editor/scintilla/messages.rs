// ── Scintilla message constants ───────────────────────────────────────────────
//
// Source of truth: Scintilla.h (https://www.scintilla.org/ScintillaDoc.html)
// Only the subset the viewer needs is listed here.
// All SCI_* values are sent via SendMessageW(hwnd_sci, SCI_*, wparam, lparam).

// ── Code page ─────────────────────────────────────────────────────────────────

/// Set the code page.  Pass `SC_CP_UTF8` as WPARAM.
pub(super) const SCI_SETCODEPAGE: u32 = 2037;
/// UTF-8 code page value for `SCI_SETCODEPAGE`.
pub(super) const SC_CP_UTF8: usize = 65001;

// ── Document content ──────────────────────────────────────────────────────────

/// Replace all document text.  WPARAM=0; LPARAM=null-terminated UTF-8 string.
pub(super) const SCI_SETTEXT: u32 = 2181;
/// Return byte count of the document (excluding null terminator).
pub(super) const SCI_GETLENGTH: u32 = 2006;
/// Copy document bytes.  WPARAM=buffer len (incl. null); LPARAM=buffer ptr.
pub(super) const SCI_GETTEXT: u32 = 2182;
/// Insert text.  WPARAM=position; LPARAM=null-terminated UTF-8 string.
pub(super) const SCI_INSERTTEXT: u32 = 2003;
/// Delete a range.  WPARAM=start; LPARAM=length.
pub(super) const SCI_DELETERANGE: u32 = 2645;
/// Discard the undo history.
pub(super) const SCI_EMPTYUNDOBUFFER: u32 = 2175;
/// Toggle read-only mode.  WPARAM=1 for read-only.
pub(super) const SCI_SETREADONLY: u32 = 2171;

// ── EOL mode ──────────────────────────────────────────────────────────────────

/// Set the line ending inserted by Enter.  WPARAM = SC_EOL_*.
pub(super) const SCI_SETEOLMODE: u32 = 2031;
/// EOL mode: Unix `\n`, the form documents are compared and saved in.
pub(super) const SC_EOL_LF: usize = 1;

// ── Scrolling ─────────────────────────────────────────────────────────────────

/// Index of the first visible display line.
pub(super) const SCI_GETFIRSTVISIBLELINE: u32 = 2152;
/// Make a display line the first visible one.
pub(super) const SCI_SETFIRSTVISIBLELINE: u32 = 2613;
/// Number of complete lines that fit in the viewport.
pub(super) const SCI_LINESONSCREEN: u32 = 2370;
/// Number of document lines.
pub(super) const SCI_GETLINECOUNT: u32 = 2154;
/// Display line of a document line; past the end gives total display lines.
pub(super) const SCI_VISIBLEFROMDOCLINE: u32 = 2220;
/// Scroll by columns (WPARAM) and lines (LPARAM).
pub(super) const SCI_LINESCROLL: u32 = 2168;

// ── Word wrap ─────────────────────────────────────────────────────────────────

/// Set word-wrap mode.
pub(super) const SCI_SETWRAPMODE: u32 = 2268;
/// Wrap at word boundaries.
pub(super) const SC_WRAP_WORD: usize = 1;

// ── Margins ───────────────────────────────────────────────────────────────────

/// Set the pixel width of margin WPARAM.
pub(super) const SCI_SETMARGINWIDTHN: u32 = 2242;

// ── Styles ────────────────────────────────────────────────────────────────────

pub(super) const SCI_STYLECLEARALL: u32 = 2050;
pub(super) const SCI_STYLESETFORE: u32 = 2051;
pub(super) const SCI_STYLESETBACK: u32 = 2052;
pub(super) const SCI_STYLESETSIZE: u32 = 2055;
pub(super) const SCI_STYLESETFONT: u32 = 2056;
pub(super) const SCI_SETSELBACK: u32 = 2068;
pub(super) const SCI_SETCARETFORE: u32 = 2069;

/// Style slot every other style is cloned from by `SCI_STYLECLEARALL`.
pub(super) const STYLE_DEFAULT: usize = 32;
